use std::io::Write;

use almoner_recon::{ContributionLoader, ContributionPayload, LoadError};

/// Stands in for the ledger API: writes each payload as one JSON line and
/// hands back a local payment id.
pub struct DryRunLoader<W: Write> {
    out: W,
    written: usize,
}

impl<W: Write> DryRunLoader<W> {
    pub fn new(out: W) -> Self {
        Self { out, written: 0 }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ContributionLoader for DryRunLoader<W> {
    fn load(&mut self, payload: &ContributionPayload) -> Result<String, LoadError> {
        let line = serde_json::to_string(payload).map_err(|e| LoadError::Rejected(e.to_string()))?;
        writeln!(self.out, "{line}").map_err(|e| LoadError::Unavailable(e.to_string()))?;
        self.written += 1;
        Ok(format!("dry-run-{}", self.written))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use almoner_recon::loader::FundLine;

    fn payload(name: &str) -> ContributionPayload {
        ContributionPayload {
            date: "2024-02-01".into(),
            name: name.into(),
            person_id: "00001234".into(),
            method: "Check".into(),
            funds: vec![FundLine {
                id: "9".into(),
                name: "Cemetery Fund".into(),
                amount: "100".parse().unwrap(),
            }],
            amount: "100".parse().unwrap(),
            group: "202402030907".into(),
            batch_name: "Auto Contribution Loader".into(),
        }
    }

    #[test]
    fn writes_one_json_line_per_payload() {
        let mut loader = DryRunLoader::new(Vec::new());
        assert_eq!(loader.load(&payload("John Smith")).unwrap(), "dry-run-1");
        assert_eq!(loader.load(&payload("Peter Okafor")).unwrap(), "dry-run-2");

        let out = String::from_utf8(loader.into_inner()).unwrap();
        let lines: Vec<serde_json::Value> = out
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["person_id"], "00001234");
        assert_eq!(lines[0]["amount"], "100.00");
        assert_eq!(lines[1]["name"], "Peter Okafor");
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
            Err(std::io::ErrorKind::BrokenPipe.into())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn write_failure_is_unavailable() {
        let mut loader = DryRunLoader::new(BrokenPipe);
        let err = loader.load(&payload("John Smith")).unwrap_err();
        assert!(matches!(err, LoadError::Unavailable(_)));
    }
}
