use std::fmt;

use chrono::NaiveDate;
use serde::{Serialize, Serializer};

use crate::{parse_flexible_date, SheetRow};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RfqStatus {
    /// Manually entered `final_status`, shown verbatim
    Override(String),
    QuotationSent,
    VendorPending,
    ClarificationRequired,
    Pending,
}

impl RfqStatus {
    pub fn label(&self) -> &str {
        match self {
            RfqStatus::Override(label) => label,
            RfqStatus::QuotationSent => "QUOTATION SENT",
            RfqStatus::VendorPending => "VENDOR PENDING",
            RfqStatus::ClarificationRequired => "CLARIFICATION REQUIRED",
            RfqStatus::Pending => "PENDING",
        }
    }
}

impl fmt::Display for RfqStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for RfqStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

type StatusRule = fn(&SheetRow) -> Option<RfqStatus>;

/// Evaluated top to bottom, the first rule that fires decides the status.
const STATUS_RULES: [StatusRule; 5] = [
    final_status_override,
    offer_sent,
    vendor_quote_missing,
    post_offer_query,
    pending,
];

fn final_status_override(row: &SheetRow) -> Option<RfqStatus> {
    non_empty(row, "final_status").map(|s| RfqStatus::Override(s.to_string()))
}

fn offer_sent(row: &SheetRow) -> Option<RfqStatus> {
    non_empty(row, "vepl_offer_date").map(|_| RfqStatus::QuotationSent)
}

fn vendor_quote_missing(row: &SheetRow) -> Option<RfqStatus> {
    let quoted = field(row, "vendor_quotation_status").trim();
    quoted.is_empty().then_some(RfqStatus::VendorPending)
}

fn post_offer_query(row: &SheetRow) -> Option<RfqStatus> {
    non_empty(row, "post_offer_query").map(|_| RfqStatus::ClarificationRequired)
}

fn pending(_: &SheetRow) -> Option<RfqStatus> {
    Some(RfqStatus::Pending)
}

fn field<'r>(row: &'r SheetRow, key: &str) -> &'r str {
    row.get(key).map(String::as_str).unwrap_or_default()
}

fn non_empty<'r>(row: &'r SheetRow, key: &str) -> Option<&'r str> {
    Some(field(row, key)).filter(|v| !v.is_empty())
}

pub fn compute_status(row: &SheetRow) -> RfqStatus {
    STATUS_RULES
        .iter()
        .find_map(|rule| rule(row))
        .unwrap_or(RfqStatus::Pending)
}

/// Whole days from the row's `rfq_date` to `now`. Future dates give a
/// negative count; a missing or unparseable date gives `None`.
pub fn compute_aging_days(row: &SheetRow, now: NaiveDate) -> Option<i64> {
    let rfq_date = parse_flexible_date(field(row, "rfq_date"))?;
    Some((now - rfq_date).num_days())
}
