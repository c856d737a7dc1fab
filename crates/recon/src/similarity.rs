//! String similarity on a 0–100 scale.
//!
//! Both scorers are case-sensitive and operate on Unicode scalar values with
//! no preprocessing. Scores are rounded half-to-even.

/// Overall edit similarity between two whole strings.
pub fn ratio(s1: &str, s2: &str) -> u8 {
    let a: Vec<char> = s1.chars().collect();
    let b: Vec<char> = s2.chars().collect();
    ratio_chars(&a, &b)
}

/// Best alignment of the shorter string against any window of the longer
/// one, including windows that overhang either end of it.
pub fn partial_ratio(s1: &str, s2: &str) -> u8 {
    let a: Vec<char> = s1.chars().collect();
    let b: Vec<char> = s2.chars().collect();

    if a.is_empty() && b.is_empty() {
        return 100;
    }
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    match a.len().cmp(&b.len()) {
        std::cmp::Ordering::Less => best_window(&a, &b),
        std::cmp::Ordering::Greater => best_window(&b, &a),
        std::cmp::Ordering::Equal => best_window(&a, &b).max(best_window(&b, &a)),
    }
}

/// `needle` must not be longer than `haystack`.
fn best_window(needle: &[char], haystack: &[char]) -> u8 {
    let n = needle.len();
    let m = haystack.len();
    let mut best = 0;

    let windows = (1..n)
        .map(move |end| &haystack[..end])
        .chain((0..=m - n).map(move |start| &haystack[start..start + n]))
        .chain((m - n + 1..m).map(move |start| &haystack[start..]));

    for window in windows {
        best = best.max(ratio_chars(needle, window));
        if best == 100 {
            break;
        }
    }
    best
}

fn ratio_chars(a: &[char], b: &[char]) -> u8 {
    let total = a.len() + b.len();
    if total == 0 {
        return 100;
    }
    // indel distance = total - 2·lcs, so similarity = 2·lcs / total.
    round_half_even(200 * lcs_len(a, b), total)
}

fn round_half_even(numerator: usize, denominator: usize) -> u8 {
    let quotient = numerator / denominator;
    let twice_remainder = 2 * (numerator % denominator);
    let rounded = match twice_remainder.cmp(&denominator) {
        std::cmp::Ordering::Greater => quotient + 1,
        std::cmp::Ordering::Equal if quotient % 2 == 1 => quotient + 1,
        _ => quotient,
    };
    rounded.min(100) as u8
}

/// Longest common subsequence length using the two-row O(min(m,n)) space
/// algorithm.
fn lcs_len(a: &[char], b: &[char]) -> usize {
    // Keep the shorter string in the inner loop to minimise allocation.
    let (outer, inner) = if a.len() >= b.len() { (a, b) } else { (b, a) };
    if inner.is_empty() {
        return 0;
    }

    let mut prev = vec![0usize; inner.len() + 1];
    let mut curr = vec![0usize; inner.len() + 1];

    for &oc in outer {
        for (j, &ic) in inner.iter().enumerate() {
            curr[j + 1] = if oc == ic {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[inner.len()]
}
