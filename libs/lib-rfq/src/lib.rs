//! Pure transforms behind the RFQ mailbox-to-sheet workflow.
//!
//! Nothing in this crate performs I/O. Every operation is total: malformed or
//! empty input degrades to empty / `None` values instead of an error.

pub mod dates;
pub mod email;
pub mod fields;
pub mod html;
pub mod latest_message;
pub mod record;
pub mod sheet_row;
pub mod status;

pub use dates::parse_flexible_date;
pub use email::RawEmail;
pub use fields::{extract_rfq_fields, RfqFields};
pub use html::html_to_text;
pub use latest_message::truncate_to_latest_message;
pub use record::{build_record, RfqRecord};
pub use sheet_row::{normalize_row, SheetRow};
pub use status::{compute_aging_days, compute_status, RfqStatus};
