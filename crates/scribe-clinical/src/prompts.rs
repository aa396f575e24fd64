//! Prompt Builders
//!
//! System prompts are fixed; the user content is assembled per mode. DVA
//! modes get the structured referral header prepended to the dictation.

use scribe_core::Message;

use crate::dva::build_dva_header;
use crate::modes::{ConsultMode, GenerateMode};

const CLINICAL_SYSTEM_PROMPT: &str = "You are an Australian clinical education assistant for qualified medical doctors.\n\n\
OUTPUT FORMAT (MANDATORY):\n\
Summary\nAssessment\nDiagnosis\nInvestigations\nTreatment\nMonitoring\nFollow-up & Safety Netting\nRed Flags\nReferences\n\n\
STYLE:\n\
Plain text only. Registrar-level depth. Australian practice framing.\n\
If the user pastes mixed notes/results, organise them cleanly under the correct headings.\n";

const DVA_SYSTEM_PROMPT: &str = "You are an Australian medical practitioner assisting other qualified clinicians with DVA documentation.\n\n\
Primary use-case: DVA D0904 allied health referrals (new + renewal).\n\n\
IMPORTANT:\n\
Do not invent accepted conditions or entitlements. Do not advise misrepresentation.\n\
You may propose legitimate alternative pathways.\n\n\
OUTPUT FORMAT (MANDATORY):\n\
DVA_META\n\
Referral type: <D0904 new | D0904 renewal | other/unclear>\n\
Provider type: <dietitian | physiotherapist | exercise physiologist | psychologist | OT | podiatrist | other/unclear>\n\
Provider-type checks:\n\
- <bullet>\n\
Renewal audit checks:\n\
- <bullet>\n\
Justification strength: <strong | moderate | weak>\n\
Audit risk: <low | medium | high>\n\
Missing items:\n\
- <bullet>\n\
Suggested amendments:\n\
- <bullet>\n\
Alternative legitimate pathways:\n\
- <bullet>\n\
END_DVA_META\n\n\
Then output clinical sections:\n\
Summary\nAssessment\nDiagnosis\nInvestigations\nTreatment\nMonitoring\nFollow-up & Safety Netting\nRed Flags\nReferences\n";

const CONSULT_NOTE_SYSTEM_PROMPT: &str = "You are an Australian clinician assistant.\n\n\
Task: Convert the provided raw dictation/pasted data into a high-quality clinical note.\n\
If content is messy or partial, infer structure but do not invent facts.\n\
Use Australian spelling.\n\n\
OUTPUT FORMAT (MANDATORY):\n\
Summary\nAssessment\nDiagnosis\nInvestigations\nTreatment\nMonitoring\nFollow-up & Safety Netting\nRed Flags\nReferences\n";

const HANDOVER_SYSTEM_PROMPT: &str = "You are an Australian emergency medicine handover assistant.\n\n\
Task: Produce a crisp handover/presentation from the provided raw dictation/pasted data.\n\
Primary default is ED handover, BUT if the content clearly matches another context \
(e.g., ward round, ICU, theatre, psych, GP), adapt the handover style accordingly.\n\
Do not invent facts.\n\
Make it usable for verbal handover.\n\n\
OUTPUT FORMAT (MANDATORY):\n\
Summary\nAssessment\nDiagnosis\nInvestigations\nTreatment\nMonitoring\nFollow-up & Safety Netting\nRed Flags\nReferences\n";

/// Per-mode guidance appended to generate prompts
fn generate_guidance(mode: GenerateMode) -> &'static str {
    match mode {
        GenerateMode::Differential => {
            "Prioritise broad differential diagnosis: rank likely and dangerous causes, \
             state supporting/opposing features for each, and include red-flag exclusion logic."
        }
        GenerateMode::MedicationReview => {
            "Focus on medication safety and optimisation: interactions, duplications, contraindications, \
             deprescribing opportunities, monitoring, and practical regimen simplification."
        }
        GenerateMode::InvestigationPlan => {
            "Focus on pragmatic investigation strategy: first-line tests, escalation triggers, \
             and how each result changes management."
        }
        _ => "General clinical reasoning mode.",
    }
}

/// Per-mode guidance appended to consult prompts
fn consult_guidance(mode: ConsultMode) -> &'static str {
    match mode {
        ConsultMode::ConsultNote => "Build a polished consultation note from raw dictation.",
        ConsultMode::Handover => "Build a concise, verbal-ready clinical handover.",
        ConsultMode::DischargeSummary => {
            "Build a concise discharge summary with diagnosis, treatment provided, \
             medication changes, pending tests, and explicit follow-up instructions."
        }
    }
}

/// A system/user prompt pair ready for the chat provider
#[derive(Clone, Debug)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

impl Prompt {
    /// Convert to the message list the chat provider expects
    pub fn to_messages(&self) -> Vec<Message> {
        vec![
            Message::system(self.system.clone()),
            Message::user(self.user.clone()),
        ]
    }
}

/// Mode-aware prompt builder
pub struct PromptBuilder {
    clinician_name: String,
}

impl PromptBuilder {
    pub fn new(clinician_name: impl Into<String>) -> Self {
        Self {
            clinician_name: clinician_name.into(),
        }
    }

    /// Create from environment variables
    pub fn from_env() -> Self {
        let clinician_name = std::env::var("CLINICIAN_NAME")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| "Telehealth Clinician".into());
        Self::new(clinician_name)
    }

    /// Build the prompt for a `/api/generate` request
    pub fn generate(&self, mode: GenerateMode, query: &str) -> Prompt {
        if mode.is_dva() {
            let header = build_dva_header(query, &self.clinician_name);
            let user = format!(
                "Referral intent: {}\n\n{header}\n\nDETAILS:\n{query}\n\n\
                 Follow DVA_META format then clinical headings.",
                mode.referral_intent(),
            );
            return Prompt {
                system: DVA_SYSTEM_PROMPT.into(),
                user,
            };
        }

        let user = format!(
            "Mode: {}\nGuidance: {}\n\nClinical question:\n{query}\n\n\
             If pasted data is included, sort it into the correct headings.",
            mode.as_str(),
            generate_guidance(mode),
        );
        Prompt {
            system: CLINICAL_SYSTEM_PROMPT.into(),
            user,
        }
    }

    /// Build the prompt for a `/api/consult` request
    pub fn consult(&self, mode: ConsultMode, text: &str) -> Prompt {
        let guidance = consult_guidance(mode);
        match mode {
            ConsultMode::Handover => Prompt {
                system: HANDOVER_SYSTEM_PROMPT.into(),
                user: format!(
                    "Guidance: {guidance}\n\
                     Create a handover/presentation from the following raw dictation/pasted data. \
                     If the context is not ED, adapt appropriately.\n\n{text}"
                ),
            },
            ConsultMode::DischargeSummary => Prompt {
                system: CONSULT_NOTE_SYSTEM_PROMPT.into(),
                user: format!(
                    "Guidance: {guidance}\n\
                     Create a discharge summary from the following raw dictation/pasted data. \
                     Do not invent facts. Ensure medication changes and follow-up actions are explicit.\n\n{text}"
                ),
            },
            ConsultMode::ConsultNote => Prompt {
                system: CONSULT_NOTE_SYSTEM_PROMPT.into(),
                user: format!(
                    "Guidance: {guidance}\n\
                     Create a structured clinical note from the following raw dictation/pasted data. \
                     Do not invent facts; organise clearly.\n\n{text}"
                ),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> PromptBuilder {
        PromptBuilder::new("Dr Example")
    }

    #[test]
    fn test_generate_clinical_prompt() {
        let prompt = builder().generate(GenerateMode::Clinical, "chest pain workup");
        assert!(prompt.system.contains("clinical education assistant"));
        assert!(prompt.user.contains("Mode: clinical"));
        assert!(prompt.user.contains("chest pain workup"));
    }

    #[test]
    fn test_generate_differential_guidance() {
        let prompt = builder().generate(GenerateMode::Differential, "fever and rash");
        assert!(prompt.user.contains("broad differential diagnosis"));
    }

    #[test]
    fn test_generate_dva_prompt_includes_header_and_intent() {
        let query = "Patient name: Jane Doe\nCard type: gold\nknee pain referral";
        let prompt = builder().generate(GenerateMode::DvaNew, query);
        assert!(prompt.system.contains("DVA_META"));
        assert!(prompt.user.starts_with("Referral intent: D0904 new"));
        assert!(prompt.user.contains("DVA Card Type: Gold"));
        assert!(prompt.user.contains("DETAILS:\nPatient name: Jane Doe"));
    }

    #[test]
    fn test_consult_handover_uses_handover_system_prompt() {
        let prompt = builder().consult(ConsultMode::Handover, "raw dictation");
        assert!(prompt.system.contains("handover assistant"));
        assert!(prompt.user.contains("verbal-ready"));
    }

    #[test]
    fn test_consult_discharge_uses_note_system_prompt() {
        let prompt = builder().consult(ConsultMode::DischargeSummary, "raw dictation");
        assert!(prompt.system.contains("clinician assistant"));
        assert!(prompt.user.contains("discharge summary"));
    }

    #[test]
    fn test_prompt_to_messages() {
        let prompt = builder().consult(ConsultMode::ConsultNote, "note text");
        let messages = prompt.to_messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, scribe_core::Role::System);
        assert_eq!(messages[1].role, scribe_core::Role::User);
    }
}
