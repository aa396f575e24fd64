//! DVA Referral Headers
//!
//! Extracts labelled fields from free-form dictation ("DVA number: 12345")
//! and assembles the structured header that precedes a D0904 referral prompt.

use chrono::{FixedOffset, Utc};

/// AWST is fixed UTC+8; Western Australia observes no daylight saving.
const AWST_OFFSET_SECS: i32 = 8 * 3600;

/// Extract the first field matching any of the given labels.
///
/// A field line looks like `Label: value`, `Label = value`, or
/// `Label - value`, matched case-insensitively at the start of a line.
/// Labels are tried in order; the first label with a match anywhere in the
/// text wins.
pub fn extract_field(text: &str, labels: &[&str]) -> String {
    for label in labels {
        for line in text.lines() {
            let line = line.trim();
            let Some(prefix) = line.get(..label.len()) else {
                continue;
            };
            if !prefix.eq_ignore_ascii_case(label) {
                continue;
            }
            let rest = line[label.len()..].trim_start();
            if let Some(value) = rest.strip_prefix([':', '=', '-']) {
                let value = value.trim();
                if !value.is_empty() {
                    return value.to_string();
                }
            }
        }
    }
    String::new()
}

/// Normalise a DVA card type to its canonical capitalisation.
///
/// "gold"/"white" anywhere in the value map to "Gold"/"White"; anything else
/// is capitalised as given.
pub fn normalise_card_type(s: &str) -> String {
    let s = s.trim().to_lowercase();
    if s.is_empty() {
        return String::new();
    }
    if s.contains("gold") {
        return "Gold".into();
    }
    if s.contains("white") {
        return "White".into();
    }
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Current time in AWST, formatted for the referral header
pub fn now_awst() -> String {
    let offset = FixedOffset::east_opt(AWST_OFFSET_SECS).unwrap_or_else(|| {
        // 8h is always a valid offset
        unreachable!("fixed AWST offset")
    });
    Utc::now()
        .with_timezone(&offset)
        .format("%d %b %Y, %H:%M (AWST)")
        .to_string()
}

/// Build the structured DVA header from labelled lines in the dictation.
///
/// Missing name/number/referral/contact fields render as empty values;
/// missing card type and accepted conditions render as "Not specified".
pub fn build_dva_header(user_text: &str, clinician_name: &str) -> String {
    let name = extract_field(user_text, &["DVA patient name", "Patient name", "Name", "Patient"]);
    let card = extract_field(user_text, &["DVA card", "Card type", "Card", "DVA card type"]);
    let dva_no = extract_field(user_text, &["DVA number", "DVA no", "File number", "File no"]);
    let accepted = extract_field(
        user_text,
        &[
            "Accepted conditions",
            "Accepted condition",
            "Accepted",
            "White card accepted conditions",
        ],
    );
    let referral = extract_field(
        user_text,
        &["Referral type", "Referral", "Requested referral", "Discipline"],
    );
    let contact = extract_field(user_text, &["Contact number", "Phone", "Mobile", "Contact"]);

    let card = normalise_card_type(&card);

    let mut header = Vec::new();
    header.push(format!("DVA Patient Name: {name}"));
    header.push(format!(
        "DVA Card Type: {}",
        if card.is_empty() { "Not specified" } else { &card }
    ));
    header.push(format!("DVA Number: {dva_no}"));
    header.push(format!(
        "Accepted Conditions: {}",
        if accepted.is_empty() { "Not specified" } else { &accepted }
    ));
    header.push(format!("Referral Type: {referral}"));
    header.push(format!("Contact Number: {contact}"));
    header.push(String::new());
    header.push("Telehealth Consult:".into());
    header.push(clinician_name.to_string());
    header.push(format!("Date & Time (AWST): {}", now_awst()));

    header.join("\n").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_field_colon_and_dash() {
        let text = "DVA number: N123456\nContact - 0400 000 000";
        assert_eq!(extract_field(text, &["DVA number"]), "N123456");
        assert_eq!(extract_field(text, &["Contact number", "Phone", "Mobile", "Contact"]), "0400 000 000");
    }

    #[test]
    fn test_extract_field_case_insensitive() {
        let text = "dva PATIENT name = John Citizen";
        assert_eq!(extract_field(text, &["DVA patient name"]), "John Citizen");
    }

    #[test]
    fn test_extract_field_label_priority() {
        // First label in the list wins even if a later one appears earlier.
        let text = "Patient: Wrong Person\nDVA patient name: Right Person";
        assert_eq!(
            extract_field(text, &["DVA patient name", "Patient name", "Name", "Patient"]),
            "Right Person"
        );
    }

    #[test]
    fn test_extract_field_missing() {
        assert_eq!(extract_field("no labels here", &["DVA number"]), "");
        assert_eq!(extract_field("", &["DVA number"]), "");
    }

    #[test]
    fn test_card_normalisation() {
        assert_eq!(normalise_card_type("gold card"), "Gold");
        assert_eq!(normalise_card_type("WHITE"), "White");
        assert_eq!(normalise_card_type("orange"), "Orange");
        assert_eq!(normalise_card_type("  "), "");
    }

    #[test]
    fn test_header_defaults() {
        let header = build_dva_header("Name: Jane Doe", "Dr Example");
        assert!(header.contains("DVA Patient Name: Jane Doe"));
        assert!(header.contains("DVA Card Type: Not specified"));
        assert!(header.contains("Accepted Conditions: Not specified"));
        assert!(header.contains("Dr Example"));
        assert!(header.contains("Date & Time (AWST):"));
    }

    #[test]
    fn test_header_card_type_normalised() {
        let text = "Card type: gold\nDVA number: QX99";
        let header = build_dva_header(text, "Dr Example");
        assert!(header.contains("DVA Card Type: Gold"));
        assert!(header.contains("DVA Number: QX99"));
    }
}
