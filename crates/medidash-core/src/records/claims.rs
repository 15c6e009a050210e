//! Insurance claims.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::{Record, RecordStore};
use crate::money::Money;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum ClaimStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
    Paid,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Claim {
    pub id: String,
    pub patient_name: String,
    /// Insurance company name.
    pub provider: String,
    pub policy_number: String,
    pub amount: Money,
    #[ts(as = "String")]
    pub submitted_on: NaiveDate,
    pub status: ClaimStatus,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Record for Claim {
    const ENTITY: &'static str = "Claim";
    type Status = ClaimStatus;

    fn id(&self) -> &str {
        &self.id
    }

    fn status(&self) -> ClaimStatus {
        self.status
    }

    fn set_status(&mut self, status: ClaimStatus) {
        self.status = status;
    }
}

/// Claim amounts grouped by status, for the insurance overview cards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ClaimTotals {
    pub pending: Money,
    pub approved: Money,
    pub rejected: Money,
    pub paid: Money,
}

pub fn totals(store: &RecordStore<Claim>) -> ClaimTotals {
    store.list().iter().fold(ClaimTotals::default(), |mut acc, c| {
        match c.status {
            ClaimStatus::Pending => acc.pending += c.amount,
            ClaimStatus::Approved => acc.approved += c.amount,
            ClaimStatus::Rejected => acc.rejected += c.amount,
            ClaimStatus::Paid => acc.paid += c.amount,
        }
        acc
    })
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

/// Fixture claims shown until the claims backend exists.
pub fn seed() -> Vec<Claim> {
    vec![
        Claim {
            id: "CLM-1001".into(),
            patient_name: "Amara Okafor".into(),
            provider: "BlueShield Health".into(),
            policy_number: "BSH-448812".into(),
            amount: Money::from_cents(125_000),
            submitted_on: date(2024, 3, 4),
            status: ClaimStatus::Pending,
            notes: None,
        },
        Claim {
            id: "CLM-1002".into(),
            patient_name: "Youssef Haddad".into(),
            provider: "MedCare Mutual".into(),
            policy_number: "MCM-10337".into(),
            amount: Money::from_cents(48_050),
            submitted_on: date(2024, 3, 1),
            status: ClaimStatus::Approved,
            notes: Some("Pre-authorised outpatient procedure".into()),
        },
        Claim {
            id: "CLM-1003".into(),
            patient_name: "Lena Fischer".into(),
            provider: "BlueShield Health".into(),
            policy_number: "BSH-502291".into(),
            amount: Money::from_cents(9_900),
            submitted_on: date(2024, 2, 20),
            status: ClaimStatus::Rejected,
            notes: Some("Policy lapsed".into()),
        },
        Claim {
            id: "CLM-1004".into(),
            patient_name: "Rahul Mehta".into(),
            provider: "Unity Insurance".into(),
            policy_number: "UNI-77120".into(),
            amount: Money::from_cents(310_000),
            submitted_on: date(2024, 2, 11),
            status: ClaimStatus::Paid,
            notes: None,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_totals_by_status() {
        let mut store = RecordStore::with_records(seed());
        let t = totals(&store);
        assert_eq!(t.pending.cents(), 125_000);
        assert_eq!(t.paid.cents(), 310_000);

        store.update_status("CLM-1001", ClaimStatus::Paid).unwrap();
        let t = totals(&store);
        assert!(t.pending.is_zero());
        assert_eq!(t.paid.cents(), 435_000);
    }
}
