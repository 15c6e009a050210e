//! Prescriptions awaiting verification and dispensing.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::Record;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum PrescriptionStatus {
    #[default]
    Pending,
    Verified,
    Filled,
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PrescribedMedication {
    pub name: String,
    pub dosage: String,
    pub quantity: u32,
    #[serde(default)]
    pub instructions: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Prescription {
    pub id: String,
    pub patient_name: String,
    pub doctor_name: String,
    pub medications: Vec<PrescribedMedication>,
    #[ts(as = "String")]
    pub date: NaiveDate,
    pub status: PrescriptionStatus,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Prescription {
    /// Names of the prescribed drugs, for the interaction check.
    pub fn drug_names(&self) -> Vec<&str> {
        self.medications.iter().map(|m| m.name.as_str()).collect()
    }
}

impl Record for Prescription {
    const ENTITY: &'static str = "Prescription";
    type Status = PrescriptionStatus;

    fn id(&self) -> &str {
        &self.id
    }

    fn status(&self) -> PrescriptionStatus {
        self.status
    }

    fn set_status(&mut self, status: PrescriptionStatus) {
        self.status = status;
    }
}

fn med(name: &str, dosage: &str, quantity: u32) -> PrescribedMedication {
    PrescribedMedication {
        name: name.to_string(),
        dosage: dosage.to_string(),
        quantity,
        instructions: None,
    }
}

/// Fixture prescriptions.
pub fn seed() -> Vec<Prescription> {
    let date = |d| NaiveDate::from_ymd_opt(2024, 3, d).unwrap_or_default();
    vec![
        Prescription {
            id: "RX-2001".into(),
            patient_name: "Amara Okafor".into(),
            doctor_name: "Dr. Samuel Reyes".into(),
            medications: vec![med("Amoxicillin", "500mg", 21), med("Paracetamol", "1g", 12)],
            date: date(5),
            status: PrescriptionStatus::Pending,
            notes: None,
        },
        Prescription {
            id: "RX-2002".into(),
            patient_name: "Youssef Haddad".into(),
            doctor_name: "Dr. Ingrid Holm".into(),
            medications: vec![med("Warfarin", "5mg", 30), med("Aspirin", "81mg", 30)],
            date: date(4),
            status: PrescriptionStatus::Verified,
            notes: Some("Check INR before filling".into()),
        },
        Prescription {
            id: "RX-2003".into(),
            patient_name: "Lena Fischer".into(),
            doctor_name: "Dr. Samuel Reyes".into(),
            medications: vec![med("Levothyroxine", "50mcg", 90)],
            date: date(1),
            status: PrescriptionStatus::Filled,
            notes: None,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interactions::check_interactions;

    #[test]
    fn test_seeded_prescription_carries_an_interaction() {
        let rx = seed().into_iter().find(|p| p.id == "RX-2002").unwrap();
        assert_eq!(check_interactions(&rx.drug_names()).len(), 1);
    }
}
