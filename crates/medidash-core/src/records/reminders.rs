//! Dosage reminders for patients on recurring medication.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::{Record, RecordStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum ReminderStatus {
    #[default]
    Active,
    Paused,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    #[default]
    Daily,
    /// Every other day, counted from the start date.
    AlternateDays,
    Weekly,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    pub id: String,
    pub patient_name: String,
    pub medication: String,
    pub dosage: String,
    /// Times of day the dose is due.
    #[ts(as = "Vec<String>")]
    pub times: Vec<NaiveTime>,
    pub frequency: Frequency,
    #[ts(as = "String")]
    pub start_date: NaiveDate,
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub end_date: Option<NaiveDate>,
    pub status: ReminderStatus,
}

impl Reminder {
    /// Whether a dose falls on `date`. Paused and completed reminders are
    /// never due.
    pub fn is_due_on(&self, date: NaiveDate) -> bool {
        if self.status != ReminderStatus::Active || date < self.start_date {
            return false;
        }
        if self.end_date.is_some_and(|end| date > end) {
            return false;
        }
        let days = (date - self.start_date).num_days();
        match self.frequency {
            Frequency::Daily => true,
            Frequency::AlternateDays => days % 2 == 0,
            Frequency::Weekly => days % 7 == 0,
        }
    }
}

impl Record for Reminder {
    const ENTITY: &'static str = "Reminder";
    type Status = ReminderStatus;

    fn id(&self) -> &str {
        &self.id
    }

    fn status(&self) -> ReminderStatus {
        self.status
    }

    fn set_status(&mut self, status: ReminderStatus) {
        self.status = status;
    }
}

/// Reminders with a dose on `date`, ordered by their first dose time.
pub fn due_on(store: &RecordStore<Reminder>, date: NaiveDate) -> Vec<&Reminder> {
    let mut due: Vec<&Reminder> = store.list().iter().filter(|r| r.is_due_on(date)).collect();
    due.sort_by_key(|r| r.times.iter().min().copied());
    due
}

/// Fixture reminders.
pub fn seed() -> Vec<Reminder> {
    let t = |h, m| NaiveTime::from_hms_opt(h, m, 0).unwrap_or_default();
    let d = |m, day| NaiveDate::from_ymd_opt(2024, m, day).unwrap_or_default();
    vec![
        Reminder {
            id: "REM-3001".into(),
            patient_name: "Amara Okafor".into(),
            medication: "Amoxicillin".into(),
            dosage: "500mg".into(),
            times: vec![t(8, 0), t(14, 0), t(20, 0)],
            frequency: Frequency::Daily,
            start_date: d(3, 5),
            end_date: Some(d(3, 12)),
            status: ReminderStatus::Active,
        },
        Reminder {
            id: "REM-3002".into(),
            patient_name: "Youssef Haddad".into(),
            medication: "Warfarin".into(),
            dosage: "5mg".into(),
            times: vec![t(18, 0)],
            frequency: Frequency::Daily,
            start_date: d(3, 4),
            end_date: None,
            status: ReminderStatus::Active,
        },
        Reminder {
            id: "REM-3003".into(),
            patient_name: "Lena Fischer".into(),
            medication: "Vitamin D3".into(),
            dosage: "50,000 IU".into(),
            times: vec![t(9, 30)],
            frequency: Frequency::Weekly,
            start_date: d(3, 1),
            end_date: None,
            status: ReminderStatus::Paused,
        },
    ]
}
