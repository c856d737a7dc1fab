use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use almoner_core::{Money, RecordId};

use crate::error::LoadError;
use crate::model::{AutoLoadable, ReconciliationResult};

pub const DEFAULT_BATCH_NAME: &str = "Auto Contribution Loader";
pub const DEFAULT_PERSON_ID_WIDTH: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundLine {
    pub id: String,
    pub name: String,
    pub amount: Money,
}

/// What a loader needs to create one contribution in the external ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionPayload {
    pub date: String,
    pub name: String,
    pub person_id: String,
    pub method: String,
    pub funds: Vec<FundLine>,
    pub amount: Money,
    pub group: String,
    pub batch_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchInfo {
    pub group: String,
    pub batch_name: String,
}

impl BatchInfo {
    /// Groups everything loaded in the same minute under one id.
    pub fn new(batch_name: &str, now: NaiveDateTime) -> Self {
        BatchInfo {
            group: now.format("%Y%m%d%H%M").to_string(),
            batch_name: batch_name.to_string(),
        }
    }
}

impl ContributionPayload {
    pub fn build(item: &AutoLoadable, batch: &BatchInfo, person_id_width: usize) -> Self {
        let record = &item.record;
        ContributionPayload {
            date: record.date.format("%Y-%m-%d").to_string(),
            name: record.contributor_name.clone(),
            person_id: item.person.id.padded(person_id_width).0,
            method: record.method.clone(),
            funds: vec![FundLine {
                id: item.fund.id.0.clone(),
                name: item.fund.name.clone(),
                amount: record.amount,
            }],
            amount: record.amount,
            group: batch.group.clone(),
            batch_name: batch.batch_name.clone(),
        }
    }
}

/// Side-effecting write of one contribution. Returns the external payment id.
pub trait ContributionLoader {
    fn load(&mut self, payload: &ContributionPayload) -> Result<String, LoadError>;
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub loaded: Vec<(RecordId, String)>,
    pub failed: Vec<(RecordId, LoadError)>,
}

/// Feed every auto-loadable record to `loader`. A failed record is reported
/// and the rest of the batch still goes through.
pub fn load_all<L: ContributionLoader + ?Sized>(
    loader: &mut L,
    result: &ReconciliationResult,
    batch: &BatchInfo,
    person_id_width: usize,
) -> LoadReport {
    let mut report = LoadReport::default();

    for item in &result.matched {
        let payload = ContributionPayload::build(item, batch, person_id_width);
        match loader.load(&payload) {
            Ok(payment_id) => {
                tracing::debug!(record = %item.record_id, %payment_id, "contribution loaded");
                report.loaded.push((item.record_id, payment_id));
            }
            Err(e) => {
                tracing::warn!(record = %item.record_id, "contribution load failed: {e}");
                report.failed.push((item.record_id, e));
            }
        }
    }

    tracing::info!(
        loaded = report.loaded.len(),
        failed = report.failed.len(),
        group = %batch.group,
        "load finished"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MatchConfig;
    use crate::engine::reconcile;
    use almoner_core::{ContributionRecord, DirectoryFund, DirectoryPerson};
    use chrono::NaiveDate;

    fn batch() -> BatchInfo {
        let now = NaiveDate::from_ymd_opt(2024, 2, 3)
            .unwrap()
            .and_hms_opt(9, 7, 45)
            .unwrap();
        BatchInfo::new(DEFAULT_BATCH_NAME, now)
    }

    fn result() -> ReconciliationResult {
        let date = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let records = vec![
            ContributionRecord::new(date, "John Smith", "100".parse().unwrap(), "Cemetery", "Check").unwrap(),
            ContributionRecord::new(date, "Peter Okafor", "25.5".parse().unwrap(), "Cemetery", "Cash").unwrap(),
        ];
        let people = vec![
            DirectoryPerson::new("1234", "John", "Smith"),
            DirectoryPerson::new("77", "Peter", "Okafor"),
        ];
        let funds = vec![DirectoryFund::new("9", "Cemetery Fund")];
        reconcile(&records, &people, &funds, &MatchConfig::default())
    }

    struct RecordingLoader {
        payloads: Vec<ContributionPayload>,
        reject: Option<String>,
    }

    impl ContributionLoader for RecordingLoader {
        fn load(&mut self, payload: &ContributionPayload) -> Result<String, LoadError> {
            if self.reject.as_deref() == Some(payload.name.as_str()) {
                return Err(LoadError::Rejected("duplicate payment".into()));
            }
            self.payloads.push(payload.clone());
            Ok(format!("pay-{}", self.payloads.len()))
        }
    }

    #[test]
    fn batch_group_is_minute_stamp() {
        let b = batch();
        assert_eq!(b.group, "202402030907");
        assert_eq!(b.batch_name, "Auto Contribution Loader");
    }

    #[test]
    fn payload_fields() {
        let result = result();
        let payload = ContributionPayload::build(&result.matched[0], &batch(), DEFAULT_PERSON_ID_WIDTH);
        assert_eq!(payload.date, "2024-02-01");
        assert_eq!(payload.name, "John Smith");
        assert_eq!(payload.person_id, "00001234");
        assert_eq!(payload.method, "Check");
        assert_eq!(payload.amount.to_string(), "100.00");
        assert_eq!(payload.funds.len(), 1);
        assert_eq!(payload.funds[0].id, "9");
        assert_eq!(payload.funds[0].name, "Cemetery Fund");
        assert_eq!(payload.funds[0].amount, payload.amount);
    }

    #[test]
    fn loads_every_auto_loadable_record() {
        let mut loader = RecordingLoader { payloads: Vec::new(), reject: None };
        let report = load_all(&mut loader, &result(), &batch(), DEFAULT_PERSON_ID_WIDTH);
        assert_eq!(
            report.loaded,
            vec![(RecordId(0), "pay-1".to_string()), (RecordId(1), "pay-2".to_string())]
        );
        assert!(report.failed.is_empty());
        assert_eq!(loader.payloads[1].amount.to_string(), "25.50");
    }

    #[test]
    fn failure_does_not_stop_the_batch() {
        let mut loader = RecordingLoader {
            payloads: Vec::new(),
            reject: Some("John Smith".into()),
        };
        let report = load_all(&mut loader, &result(), &batch(), DEFAULT_PERSON_ID_WIDTH);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, RecordId(0));
        assert_eq!(report.loaded, vec![(RecordId(1), "pay-1".to_string())]);
    }
}
