//! # Drug Interaction Checker
//!
//! Pairwise lookup of known interactions between drugs in the cart.
//!
//! ## How a Pair Is Resolved
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  cart: ["Aspirin", "Warfarin", "Tylenol"]                               │
//! │            │                                                            │
//! │            ▼  trim, lowercase, strip strength, drop duplicates          │
//! │  ["aspirin", "warfarin", "tylenol"]                                     │
//! │            │                                                            │
//! │            ▼  every unordered pair (i < j)                              │
//! │  (aspirin, warfarin) (aspirin, tylenol) (warfarin, tylenol)            │
//! │            │                                                            │
//! │            ▼  ADJACENCY[a] ∋ b  or  ADJACENCY[b] ∋ a ?                  │
//! │  (aspirin, warfarin) ✓  (stored under "warfarin" only)                 │
//! │            │                                                            │
//! │            ▼  DETAILS lookup, either order                              │
//! │  High: "Increased risk of bleeding..."                                 │
//! │  (listed pair with no detail row ──► Moderate, generic description)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The result drives a confirmation dialog before checkout. It never blocks
//! a sale.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Severity of a drug-drug interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum Severity {
    Low,
    Moderate,
    High,
}

/// A detected interaction between two drugs in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Interaction {
    pub severity: Severity,
    pub description: String,
    /// The two drug names as they appeared in the cart.
    pub drugs: Vec<String>,
}

/// Which drugs interact with which. Storage is one-directional; lookups
/// check both directions.
const ADJACENCY: &[(&str, &[&str])] = &[
    (
        "warfarin",
        &["aspirin", "ibuprofen", "naproxen", "amiodarone", "fluconazole", "metronidazole"],
    ),
    ("aspirin", &["ibuprofen", "clopidogrel", "methotrexate"]),
    ("simvastatin", &["clarithromycin", "erythromycin", "amiodarone"]),
    ("lisinopril", &["spironolactone", "potassium chloride", "ibuprofen"]),
    ("sildenafil", &["nitroglycerin", "isosorbide mononitrate"]),
    ("fluoxetine", &["tramadol", "linezolid"]),
    ("ciprofloxacin", &["tizanidine", "theophylline"]),
    ("digoxin", &["amiodarone", "verapamil"]),
    ("methotrexate", &["trimethoprim"]),
    ("levothyroxine", &["calcium carbonate", "omeprazole"]),
];

/// Severity and description for listed pairs.
const DETAILS: &[(&str, &str, Severity, &str)] = &[
    ("warfarin", "aspirin", Severity::High, "Increased risk of bleeding when an anticoagulant is combined with an antiplatelet."),
    ("warfarin", "ibuprofen", Severity::High, "NSAIDs raise bleeding risk and can displace warfarin from plasma proteins."),
    ("warfarin", "naproxen", Severity::High, "NSAIDs raise bleeding risk and can displace warfarin from plasma proteins."),
    ("warfarin", "amiodarone", Severity::High, "Amiodarone inhibits warfarin metabolism; INR may rise sharply."),
    ("warfarin", "fluconazole", Severity::High, "Fluconazole inhibits CYP2C9 and potentiates warfarin."),
    ("aspirin", "ibuprofen", Severity::Moderate, "Ibuprofen may blunt the cardioprotective effect of low-dose aspirin."),
    ("aspirin", "clopidogrel", Severity::Moderate, "Additive antiplatelet effect increases bleeding risk."),
    ("aspirin", "methotrexate", Severity::High, "Salicylates reduce methotrexate clearance and raise toxicity."),
    ("simvastatin", "clarithromycin", Severity::High, "CYP3A4 inhibition raises statin levels; risk of rhabdomyolysis."),
    ("simvastatin", "amiodarone", Severity::Moderate, "Higher simvastatin exposure; limit the statin dose."),
    ("lisinopril", "spironolactone", Severity::High, "Combined potassium retention can cause hyperkalemia."),
    ("lisinopril", "potassium chloride", Severity::Moderate, "Potassium supplements with ACE inhibitors can raise serum potassium."),
    ("lisinopril", "ibuprofen", Severity::Moderate, "NSAIDs reduce the antihypertensive effect and may impair kidney function."),
    ("sildenafil", "nitroglycerin", Severity::High, "Profound hypotension; combination is contraindicated."),
    ("fluoxetine", "tramadol", Severity::High, "Risk of serotonin syndrome and lowered seizure threshold."),
    ("ciprofloxacin", "tizanidine", Severity::High, "Ciprofloxacin greatly increases tizanidine levels; severe hypotension."),
    ("ciprofloxacin", "theophylline", Severity::Moderate, "Ciprofloxacin raises theophylline levels."),
    ("digoxin", "amiodarone", Severity::Moderate, "Amiodarone increases digoxin concentration."),
    ("digoxin", "verapamil", Severity::Moderate, "Verapamil increases digoxin concentration and slows AV conduction."),
    ("methotrexate", "trimethoprim", Severity::High, "Additive antifolate effect; risk of bone marrow suppression."),
    ("levothyroxine", "calcium carbonate", Severity::Low, "Calcium reduces levothyroxine absorption; separate doses by 4 hours."),
];

const DEFAULT_DESCRIPTION: &str = "Potential interaction. Review with a pharmacist before dispensing.";

/// Reduces a product name to the generic name the table knows, so
/// `"Warfarin 5mg"` and `"warfarin"` are the same drug. The longest table
/// name that matches whole leading words wins. Unknown names are kept as
/// typed, trimmed and lowercased.
fn normalize(name: &str) -> String {
    let name = name.trim().to_lowercase();
    known_drugs()
        .filter(|drug| {
            name.strip_prefix(drug)
                .is_some_and(|rest| rest.is_empty() || rest.starts_with(char::is_whitespace))
        })
        .max_by_key(|drug| drug.len())
        .map(str::to_string)
        .unwrap_or(name)
}

fn known_drugs() -> impl Iterator<Item = &'static str> {
    ADJACENCY
        .iter()
        .flat_map(|(drug, others)| std::iter::once(*drug).chain(others.iter().copied()))
}

fn listed(a: &str, b: &str) -> bool {
    let contains = |from: &str, to: &str| {
        ADJACENCY
            .iter()
            .any(|(drug, others)| *drug == from && others.contains(&to))
    };
    contains(a, b) || contains(b, a)
}

fn detail(a: &str, b: &str) -> Option<(Severity, &'static str)> {
    DETAILS
        .iter()
        .find(|(x, y, _, _)| (*x == a && *y == b) || (*x == b && *y == a))
        .map(|(_, _, severity, description)| (*severity, *description))
}

/// Looks a single pair up, in either order.
pub fn lookup_pair(a: &str, b: &str) -> Option<(Severity, &'static str)> {
    let (a, b) = (normalize(a), normalize(b));
    if a == b || !listed(&a, &b) {
        return None;
    }
    Some(detail(&a, &b).unwrap_or((Severity::Moderate, DEFAULT_DESCRIPTION)))
}

/// Returns every known interaction among the given drug names.
///
/// Pure and deterministic; results follow the input order of the pairs.
///
/// ```rust
/// use medidash_core::interactions::{check_interactions, Severity};
///
/// let found = check_interactions(&["Aspirin", "Warfarin"]);
/// assert_eq!(found.len(), 1);
/// assert_eq!(found[0].severity, Severity::High);
///
/// assert!(check_interactions(&["Aspirin"]).is_empty());
/// assert!(check_interactions(&["Aspirin", "Tylenol"]).is_empty());
/// ```
pub fn check_interactions<S: AsRef<str>>(drug_names: &[S]) -> Vec<Interaction> {
    let mut drugs: Vec<(String, &str)> = Vec::with_capacity(drug_names.len());
    for name in drug_names {
        let display = name.as_ref().trim();
        let key = normalize(display);
        if key.is_empty() || drugs.iter().any(|(k, _)| *k == key) {
            continue;
        }
        drugs.push((key, display));
    }

    let mut found = Vec::new();
    for i in 0..drugs.len() {
        for j in (i + 1)..drugs.len() {
            let (a, a_display) = &drugs[i];
            let (b, b_display) = &drugs[j];
            if !listed(a, b) {
                continue;
            }
            let (severity, description) =
                detail(a, b).unwrap_or((Severity::Moderate, DEFAULT_DESCRIPTION));
            found.push(Interaction {
                severity,
                description: description.to_string(),
                drugs: vec![a_display.to_string(), b_display.to_string()],
            });
        }
    }
    found
}

/// Highest severity in a result set, if any.
pub fn max_severity(interactions: &[Interaction]) -> Option<Severity> {
    interactions.iter().map(|i| i.severity).max()
}
