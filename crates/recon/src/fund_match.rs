use almoner_core::DirectoryFund;

use crate::similarity::partial_ratio;

/// First-over-threshold fund lookup. Directory order decides between several
/// funds that clear the threshold.
pub struct FundMatcher<'a> {
    funds: &'a [DirectoryFund],
    threshold: u8,
}

impl<'a> FundMatcher<'a> {
    pub fn new(funds: &'a [DirectoryFund], threshold: u8) -> Self {
        Self { funds, threshold }
    }

    pub fn resolve(&self, fund_name: &str) -> Option<&'a DirectoryFund> {
        self.funds
            .iter()
            .find(|fund| partial_ratio(fund_name, &fund.name) >= self.threshold)
    }
}
