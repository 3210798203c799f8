use google_gmail1::api::{Message, MessagePart};
use lib_rfq::{html_to_text, RawEmail};

/// Text bodies found while walking a message payload
#[derive(Debug, Default)]
struct ExtractedBody {
    text: Option<String>,
    html: Option<String>,
}

impl ExtractedBody {
    /// Plain text wins; an HTML-only message is rendered down to text.
    fn into_text(self) -> Option<String> {
        self.text
            .or_else(|| self.html.map(|html| html_to_text(&html)))
            .filter(|body| !body.trim().is_empty())
    }
}

/// Convert a `format=full` Gmail message into the extractor's input record.
/// A message without a usable body falls back to its snippet.
pub fn raw_email_from_gmail_message(message: Message) -> RawEmail {
    let id = message.id.clone().unwrap_or_default();
    let (subject, from, date) = message
        .payload
        .as_ref()
        .map(extract_headers)
        .unwrap_or_default();

    let mut extracted = ExtractedBody::default();
    if let Some(payload) = message.payload.as_ref() {
        extract_body_from_part(payload, &mut extracted);
    }

    let body = extracted
        .into_text()
        .or(message.snippet)
        .unwrap_or_default();

    RawEmail::new(
        id,
        subject.unwrap_or_default(),
        from.unwrap_or_default(),
        date.unwrap_or_default(),
        body,
    )
}

/// Recursively collect the first text/plain and last text/html body
fn extract_body_from_part(part: &MessagePart, extracted: &mut ExtractedBody) {
    let mime_type = part.mime_type.as_deref().unwrap_or("");
    match mime_type {
        "text/plain" => {
            if extracted.text.is_none() {
                extracted.text = decode_body_data(part);
            }
        }
        "text/html" => {
            if let Some(html) = decode_body_data(part) {
                extracted.html = Some(html);
            }
        }
        _ => {
            if let Some(parts) = &part.parts {
                for sub_part in parts {
                    extract_body_from_part(sub_part, extracted);
                }
            }
        }
    }
}

/// The google_gmail1 crate already decodes base64url, so data is raw bytes
fn decode_body_data(part: &MessagePart) -> Option<String> {
    let data = part.body.as_ref()?.data.as_ref()?;
    if data.is_empty() {
        return None;
    }
    Some(String::from_utf8_lossy(data).into_owned())
}

fn extract_headers(part: &MessagePart) -> (Option<String>, Option<String>, Option<String>) {
    let subject = get_header(part, "Subject");
    let from = get_header(part, "From");
    let date = get_header(part, "Date");
    (subject, from, date)
}

fn get_header(part: &MessagePart, name: &str) -> Option<String> {
    part.headers.as_ref()?.iter().find_map(|h| {
        if h.name.as_deref()?.eq_ignore_ascii_case(name) {
            h.value.clone()
        } else {
            None
        }
    })
}
