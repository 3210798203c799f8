use serde::Serialize;

use crate::{extract_rfq_fields, truncate_to_latest_message, RfqFields};

/// An email as handed over by the mail-fetching side.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct RawEmail {
    pub id: String,
    pub subject: String,
    pub sender: String,
    pub date: String,
    pub raw_body: String,
    pub latest_message: String,
}

impl RawEmail {
    pub fn new(
        id: impl Into<String>,
        subject: impl Into<String>,
        sender: impl Into<String>,
        date: impl Into<String>,
        raw_body: impl Into<String>,
    ) -> Self {
        let raw_body = raw_body.into();
        let latest_message = truncate_to_latest_message(&raw_body);

        Self {
            id: id.into(),
            subject: subject.into(),
            sender: sender.into(),
            date: date.into(),
            raw_body,
            latest_message,
        }
    }

    /// Fields are read from the latest message, or the whole body when the
    /// latest message came out empty.
    pub fn rfq_fields(&self) -> RfqFields {
        let body = if self.latest_message.is_empty() {
            &self.raw_body
        } else {
            &self.latest_message
        };
        extract_rfq_fields(&self.subject, body)
    }
}
