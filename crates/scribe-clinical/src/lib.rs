//! # scribe-clinical
//!
//! Clinical prompt system for clinscribe.
//!
//! Maps user-selected documentation modes onto system prompts and user
//! content for the chat provider. Two families exist:
//!
//! - **Generate modes**: clinical reasoning, differential diagnosis,
//!   medication review, investigation planning, and DVA D0904 referrals
//!   (new/renewal) with a structured header extracted from the dictation.
//! - **Consult modes**: consult note, handover, discharge summary, built
//!   from raw dictation or pasted data.
//!
//! Unknown mode strings fall back to the family default rather than erroring,
//! so a stale frontend can never break generation.

pub mod dva;
pub mod modes;
pub mod prompts;

pub use dva::{build_dva_header, normalise_card_type};
pub use modes::{ConsultMode, GenerateMode};
pub use prompts::{Prompt, PromptBuilder};
