use chrono::NaiveDate;
use serde::Serialize;

use crate::{compute_aging_days, compute_status, normalize_row, RfqStatus, SheetRow};

/// One tracker row prepared for the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RfqRecord {
    pub rfq_no: String,
    pub customer: String,
    pub location: String,
    pub rfq_date: String,
    pub due_date: String,
    pub vendor: String,
    pub concern_person: String,
    pub vepl_offer_no: String,
    pub current_status: RfqStatus,
    pub aging_days: Option<i64>,
    pub remarks: String,
    /// Every normalized column, including ones not promoted above
    pub raw: SheetRow,
}

pub fn build_record<H, V>(headers: &[H], values: &[V], now: NaiveDate) -> RfqRecord
where
    H: AsRef<str>,
    V: AsRef<str>,
{
    let raw = normalize_row(headers, values);
    let get = |key: &str| raw.get(key).cloned().unwrap_or_default();

    RfqRecord {
        rfq_no: get("rfq_no"),
        customer: get("customer_name"),
        location: get("location"),
        rfq_date: get("rfq_date"),
        due_date: get("due_date"),
        vendor: get("vendor"),
        concern_person: get("concern_person"),
        vepl_offer_no: get("vepl_offer_no"),
        current_status: compute_status(&raw),
        aging_days: compute_aging_days(&raw, now),
        remarks: get("remarks"),
        raw,
    }
}
