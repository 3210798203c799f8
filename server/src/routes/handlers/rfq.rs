use axum::{extract::State, Json};
use chrono::Local;
use lib_rfq::RfqRecord;
use serde::Serialize;

use crate::{
    email::{self, client::GmailClient, client::UnreadListOptions},
    error::{AppError, AppJsonResult},
    sheets::{self, client::SheetsClient},
    ServerState,
};

/// Successful outcome, tagged `"status": "success"` next to its payload.
#[derive(Debug, Serialize)]
pub struct ApiSuccess<T> {
    status: &'static str,
    #[serde(flatten)]
    data: T,
}

impl<T> ApiSuccess<T> {
    pub fn new(data: T) -> Self {
        Self {
            status: "success",
            data,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RunRfqSummary {
    pub emails_received: usize,
    pub rows_written: usize,
}

#[derive(Debug, Serialize)]
pub struct RfqStatusRows {
    pub rows: Vec<RfqRecord>,
}

async fn connect_sheets(state: &ServerState) -> Result<SheetsClient, AppError> {
    SheetsClient::connect(state.http_client.clone(), &state.sheets_key)
        .await
        .map_err(AppError::Credentials)
}

/// Unread mail -> extracted RFQ rows -> appended to the intake tab.
/// Emails are only marked read after their rows were written.
pub async fn run_rfq(State(state): State<ServerState>) -> AppJsonResult<ApiSuccess<RunRfqSummary>> {
    let gmail_cfg = &state.config.gmail;
    let gmail = GmailClient::connect(state.http_client.clone(), &state.gmail_credentials)
        .await
        .map_err(AppError::Credentials)?;

    let options = UnreadListOptions {
        query: gmail_cfg.query.clone(),
        max_results: gmail_cfg.max_results,
    };
    let emails = email::fetch_unread_emails(&gmail, &options)
        .await
        .map_err(AppError::Gmail)?;

    let rows: Vec<Vec<String>> = emails.iter().map(sheets::rfq_sheet_row).collect();
    if !rows.is_empty() {
        let sheets_client = connect_sheets(&state).await?;
        sheets::append_rfq_rows(&sheets_client, &state.config.sheets.write, &rows)
            .await
            .map_err(AppError::Sheets)?;
    }

    if gmail_cfg.mark_as_read {
        email::mark_emails_read(&gmail, &emails).await;
    }

    tracing::info!(
        "RFQ run finished: {} emails, {} rows",
        emails.len(),
        rows.len()
    );

    Ok(Json(ApiSuccess::new(RunRfqSummary {
        emails_received: emails.len(),
        rows_written: rows.len(),
    })))
}

/// Tracker rows with computed status and aging, for the dashboard.
pub async fn get_rfq_status(
    State(state): State<ServerState>,
) -> AppJsonResult<ApiSuccess<RfqStatusRows>> {
    let sheets_client = connect_sheets(&state).await?;
    let today = Local::now().date_naive();

    let rows = sheets::read_rfq_records(&sheets_client, &state.config.sheets.read, today)
        .await
        .map_err(AppError::Sheets)?;

    Ok(Json(ApiSuccess::new(RfqStatusRows { rows })))
}
