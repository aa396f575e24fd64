//! Documentation Modes
//!
//! Mode strings arrive from the frontend and are never trusted: unknown
//! values fall back to the family default.

use serde::{Deserialize, Serialize};

/// Mode for `/api/generate` requests
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerateMode {
    /// General clinical reasoning (default)
    Clinical,
    /// Broad differential diagnosis with red-flag exclusion
    Differential,
    /// Medication safety and optimisation review
    MedicationReview,
    /// Pragmatic investigation strategy
    InvestigationPlan,
    /// DVA D0904 new referral
    DvaNew,
    /// DVA D0904 renewal
    DvaRenew,
    /// DVA-prefixed mode that is neither new nor renewal
    DvaOther,
}

impl GenerateMode {
    /// Parse a mode string, falling back to `Clinical` for unknown values
    pub fn parse(s: &str) -> Self {
        let s = s.trim().to_lowercase();
        match s.as_str() {
            "differential" => GenerateMode::Differential,
            "medication_review" => GenerateMode::MedicationReview,
            "investigation_plan" => GenerateMode::InvestigationPlan,
            "dva_new" => GenerateMode::DvaNew,
            "dva_renew" => GenerateMode::DvaRenew,
            _ if s.starts_with("dva") => GenerateMode::DvaOther,
            _ => GenerateMode::Clinical,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GenerateMode::Clinical => "clinical",
            GenerateMode::Differential => "differential",
            GenerateMode::MedicationReview => "medication_review",
            GenerateMode::InvestigationPlan => "investigation_plan",
            GenerateMode::DvaNew => "dva_new",
            GenerateMode::DvaRenew => "dva_renew",
            GenerateMode::DvaOther => "dva",
        }
    }

    /// Whether this mode uses the DVA referral prompt family
    pub fn is_dva(&self) -> bool {
        matches!(
            self,
            GenerateMode::DvaNew | GenerateMode::DvaRenew | GenerateMode::DvaOther
        )
    }

    /// Referral intent line embedded in the DVA prompt
    pub fn referral_intent(&self) -> &'static str {
        match self {
            GenerateMode::DvaNew => "D0904 new",
            GenerateMode::DvaRenew => "D0904 renewal",
            _ => "D0904 (unspecified)",
        }
    }
}

impl Default for GenerateMode {
    fn default() -> Self {
        GenerateMode::Clinical
    }
}

/// Mode for `/api/consult` requests
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsultMode {
    /// Polished consultation note (default)
    ConsultNote,
    /// Verbal-ready clinical handover
    Handover,
    /// Discharge summary with explicit follow-up actions
    DischargeSummary,
}

impl ConsultMode {
    /// Parse a mode string, falling back to `ConsultNote` for unknown values
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "handover" => ConsultMode::Handover,
            "discharge_summary" => ConsultMode::DischargeSummary,
            _ => ConsultMode::ConsultNote,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConsultMode::ConsultNote => "consult_note",
            ConsultMode::Handover => "handover",
            ConsultMode::DischargeSummary => "discharge_summary",
        }
    }
}

impl Default for ConsultMode {
    fn default() -> Self {
        ConsultMode::ConsultNote
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_mode_parse() {
        assert_eq!(GenerateMode::parse("differential"), GenerateMode::Differential);
        assert_eq!(GenerateMode::parse("DVA_NEW"), GenerateMode::DvaNew);
        assert_eq!(GenerateMode::parse("dva_renew"), GenerateMode::DvaRenew);
        assert_eq!(GenerateMode::parse("dva_something"), GenerateMode::DvaOther);
    }

    #[test]
    fn test_unknown_generate_mode_falls_back_to_clinical() {
        assert_eq!(GenerateMode::parse("banana"), GenerateMode::Clinical);
        assert_eq!(GenerateMode::parse(""), GenerateMode::Clinical);
    }

    #[test]
    fn test_consult_mode_parse() {
        assert_eq!(ConsultMode::parse("handover"), ConsultMode::Handover);
        assert_eq!(ConsultMode::parse("discharge_summary"), ConsultMode::DischargeSummary);
        assert_eq!(ConsultMode::parse("unknown"), ConsultMode::ConsultNote);
    }

    #[test]
    fn test_referral_intent() {
        assert_eq!(GenerateMode::DvaNew.referral_intent(), "D0904 new");
        assert_eq!(GenerateMode::DvaRenew.referral_intent(), "D0904 renewal");
        assert_eq!(GenerateMode::DvaOther.referral_intent(), "D0904 (unspecified)");
    }
}
