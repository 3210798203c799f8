use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Serialize, Serializer};

/// RFQ number patterns in priority order. The first one that matches anywhere
/// in the text wins; later patterns are only tried when earlier ones miss.
static RFQ_NO_PATTERNS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    [
        ("rfq", r"(?i)\bRFQ[:\s\-]*([A-Za-z0-9_/\-]+)"),
        ("enquiry", r"(?i)\bEnquiry[:\s\-]*([A-Za-z0-9_/\-]+)"),
        ("enq", r"(?i)\bEnq[:\s\-]*([A-Za-z0-9_/\-]+)"),
        ("inquiry", r"(?i)\bInquiry[:\s\-]*([A-Za-z0-9_/\-]+)"),
        ("bare_2800", r"\b2800\d{5,}\b"),
    ]
    .into_iter()
    .map(|(name, re)| (name, Regex::new(re).unwrap()))
    .collect()
});

static QTY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\b(?:Qty|Quantity)[:\s]*([\d.]+)").unwrap());

static PART_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:Part\s*Number|Model|PN|Item Code)[:\s\-]*([A-Za-z0-9_/\-]+)").unwrap()
});

static DESCRIPTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)(?:Description|Desc)[:\s\-]*(.*)").unwrap());

/// Best-effort structured fields pulled out of an RFQ email.
///
/// `None` means the field was not found. Serialized, an absent field is an
/// empty string, which is what the sheet and dashboard consumers expect.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct RfqFields {
    #[serde(serialize_with = "empty_if_absent")]
    pub rfq_no: Option<String>,
    #[serde(serialize_with = "empty_if_absent")]
    pub qty: Option<String>,
    #[serde(serialize_with = "empty_if_absent")]
    pub part: Option<String>,
    #[serde(serialize_with = "empty_if_absent")]
    pub description: Option<String>,
}

impl RfqFields {
    /// `[rfq_no, qty, part, description]`, absent fields as empty strings.
    pub fn as_row(&self) -> [String; 4] {
        [&self.rfq_no, &self.qty, &self.part, &self.description]
            .map(|field| field.clone().unwrap_or_default())
    }
}

fn empty_if_absent<S: Serializer>(value: &Option<String>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(value.as_deref().unwrap_or_default())
}

fn group_one(caps: Captures) -> Option<String> {
    caps.get(1).map(|m| m.as_str().to_string())
}

fn find_rfq_no(text: &str) -> Option<String> {
    RFQ_NO_PATTERNS.iter().find_map(|(name, re)| {
        let caps = re.captures(text)?;
        // The bare numeric pattern has no label, so the whole match is the number
        let value = caps.get(1).or_else(|| caps.get(0))?.as_str().to_string();
        tracing::debug!("RFQ number matched by {} pattern: {}", name, value);
        Some(value)
    })
}

/// Pull RFQ number, quantity, part and description out of subject + body.
///
/// Single pass, first match wins. Captured values are not validated.
/// The description runs from its label to the end of the text, so anything
/// after it on later lines (signatures included) ends up in the field.
pub fn extract_rfq_fields(subject: &str, body: &str) -> RfqFields {
    let text = format!("{subject}\n{body}");

    let description = DESCRIPTION_RE
        .captures(&text)
        .and_then(group_one)
        .map(|d| d.trim().to_string());

    RfqFields {
        rfq_no: find_rfq_no(&text),
        qty: QTY_RE.captures(&text).and_then(group_one),
        part: PART_RE.captures(&text).and_then(group_one),
        description,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subject_and_body_fields() {
        let fields = extract_rfq_fields("RFQ-2025/447 for pump", "Qty: 10 Pcs, Part Number: PX-99");
        assert_eq!(
            fields,
            RfqFields {
                rfq_no: Some("2025/447".to_string()),
                qty: Some("10".to_string()),
                part: Some("PX-99".to_string()),
                description: None,
            }
        );
        assert_eq!(fields.as_row(), ["2025/447", "10", "PX-99", ""].map(String::from));
    }

    #[test]
    fn test_rfq_label_beats_enquiry_label() {
        let fields = extract_rfq_fields("Enquiry: E-11", "Our RFQ: R-22");
        assert_eq!(fields.rfq_no.as_deref(), Some("R-22"));
    }

    #[test]
    fn test_enquiry_and_inquiry_labels() {
        let fields = extract_rfq_fields("Enquiry no 5531_A", "");
        assert_eq!(fields.rfq_no.as_deref(), Some("no"));

        let fields = extract_rfq_fields("Inquiry:INQ/77", "");
        assert_eq!(fields.rfq_no.as_deref(), Some("INQ/77"));

        let fields = extract_rfq_fields("enq - 4410", "");
        assert_eq!(fields.rfq_no.as_deref(), Some("4410"));
    }

    #[test]
    fn test_bare_2800_number_is_last_resort() {
        let fields = extract_rfq_fields("Ref 280012345 pricing", "please quote");
        assert_eq!(fields.rfq_no.as_deref(), Some("280012345"));

        let fields = extract_rfq_fields("Ref 28001234", "");
        assert_eq!(fields.rfq_no, None);
    }

    #[test]
    fn test_quantity_variants() {
        let fields = extract_rfq_fields("", "QUANTITY 2.5 MT");
        assert_eq!(fields.qty.as_deref(), Some("2.5"));

        let fields = extract_rfq_fields("", "qty:   40 nos");
        assert_eq!(fields.qty.as_deref(), Some("40"));
    }

    #[test]
    fn test_part_labels() {
        let fields = extract_rfq_fields("", "Model - ABC_12/3");
        assert_eq!(fields.part.as_deref(), Some("ABC_12/3"));

        let fields = extract_rfq_fields("", "Item Code: IC-900");
        assert_eq!(fields.part.as_deref(), Some("IC-900"));

        let fields = extract_rfq_fields("", "PartNumber:77X");
        assert_eq!(fields.part.as_deref(), Some("77X"));
    }

    #[test]
    fn test_description_runs_to_end_of_text() {
        let fields = extract_rfq_fields("Need quote", "Description: Ball valve 2 inch\nSS316 body  ");
        assert_eq!(
            fields.description.as_deref(),
            Some("Ball valve 2 inch\nSS316 body")
        );
    }

    #[test]
    fn test_empty_input_yields_absent_fields() {
        let fields = extract_rfq_fields("", "");
        assert_eq!(fields, RfqFields::default());
        assert_eq!(fields.as_row(), ["", "", "", ""].map(String::from));
    }

    #[test]
    fn test_absent_fields_serialize_as_empty_strings() {
        let fields = RfqFields {
            qty: Some("3".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_value(&fields).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"rfq_no": "", "qty": "3", "part": "", "description": ""})
        );
    }
}
