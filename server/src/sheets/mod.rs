pub mod client;

use chrono::NaiveDate;
use lib_rfq::{build_record, RawEmail, RfqRecord};

use crate::server_config::SheetTarget;

use self::client::SheetsClient;

pub const EMAIL_SOURCE: &str = "gmail";
const READ_CELLS: &str = "A1:Z";
const APPEND_CELLS: &str = "A2";

/// `[date, from, subject, rfq_no, qty, part, description, latest_message, source]`
pub fn rfq_sheet_row(email: &RawEmail) -> Vec<String> {
    let mut row = Vec::with_capacity(9);
    row.extend([email.date.clone(), email.sender.clone(), email.subject.clone()]);
    row.extend(email.rfq_fields().as_row());
    row.extend([email.latest_message.clone(), EMAIL_SOURCE.to_string()]);
    row
}

/// First row is the header, everything below is one RFQ each.
pub fn records_from_values(values: &[Vec<String>], now: NaiveDate) -> Vec<RfqRecord> {
    let Some((headers, rows)) = values.split_first() else {
        return vec![];
    };
    rows.iter()
        .map(|row| build_record(headers.as_slice(), row.as_slice(), now))
        .collect()
}

pub async fn read_rfq_records(
    client: &SheetsClient,
    target: &SheetTarget,
    now: NaiveDate,
) -> anyhow::Result<Vec<RfqRecord>> {
    let range = client
        .read_values(&target.sheet_id, &target.range(READ_CELLS))
        .await?;
    tracing::info!(
        "Read {} rows from {}",
        range.values.len(),
        range.range.as_deref().unwrap_or(&target.tab_name)
    );
    Ok(records_from_values(&range.values, now))
}

pub async fn append_rfq_rows(
    client: &SheetsClient,
    target: &SheetTarget,
    rows: &[Vec<String>],
) -> anyhow::Result<()> {
    if rows.is_empty() {
        tracing::info!("No RFQ rows to append");
        return Ok(());
    }

    let resp = client
        .append_rows(&target.sheet_id, &target.range(APPEND_CELLS), rows)
        .await?;
    let updates = resp.updates.unwrap_or_default();
    tracing::info!(
        "Appended {} rows to {}",
        updates.updated_rows.unwrap_or(rows.len() as u64),
        updates.updated_range.as_deref().unwrap_or(&target.tab_name)
    );
    Ok(())
}
