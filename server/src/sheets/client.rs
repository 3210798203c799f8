use anyhow::{anyhow, Context};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{
    auth::google::{exchange_service_account_assertion, ServiceAccountKey, SHEETS_SCOPE},
    HttpClient,
};

const SHEETS_ENDPOINT: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// Cell values as returned by `values.get`; rows may be ragged.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueRange {
    #[serde(default)]
    pub range: Option<String>,
    #[serde(default)]
    pub values: Vec<Vec<String>>,
}

#[derive(Debug, Serialize)]
struct AppendBody<'a> {
    values: &'a [Vec<String>],
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppendResponse {
    #[serde(default)]
    pub updates: Option<AppendUpdates>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppendUpdates {
    #[serde(default)]
    pub updated_range: Option<String>,
    #[serde(default)]
    pub updated_rows: Option<u64>,
}

/// `.../spreadsheets/{id}/values/{range}{suffix}` with the range percent-encoded.
fn values_url(sheet_id: &str, range: &str, suffix: &str) -> anyhow::Result<Url> {
    let mut url = Url::parse(SHEETS_ENDPOINT)?;
    url.path_segments_mut()
        .map_err(|_| anyhow!("Sheets endpoint cannot be a base"))?
        .push(sheet_id)
        .push("values")
        .push(&format!("{range}{suffix}"));
    Ok(url)
}

#[derive(Debug, Clone)]
pub struct SheetsClient {
    http_client: HttpClient,
    access_token: String,
}

impl SheetsClient {
    pub async fn connect(
        http_client: HttpClient,
        key: &ServiceAccountKey,
    ) -> anyhow::Result<SheetsClient> {
        let token = exchange_service_account_assertion(&http_client, key, SHEETS_SCOPE)
            .await
            .map_err(|e| anyhow!("Could not get Sheets access token: {e}"))?;
        tracing::debug!("Sheets access token expires in {}s", token.expires_in);

        Ok(SheetsClient {
            http_client,
            access_token: token.access_token,
        })
    }

    pub async fn read_values(&self, sheet_id: &str, range: &str) -> anyhow::Result<ValueRange> {
        let resp = self
            .http_client
            .get(values_url(sheet_id, range, "")?)
            .bearer_auth(&self.access_token)
            .send()
            .await?;

        if !resp.status().is_success() {
            let json = resp.json::<serde_json::Value>().await?;
            return Err(anyhow!("Error reading {range}: {:?}", json));
        }

        resp.json::<ValueRange>()
            .await
            .context("Unexpected values response")
    }

    /// Append rows below the table found at `range`, values stored as typed.
    pub async fn append_rows(
        &self,
        sheet_id: &str,
        range: &str,
        rows: &[Vec<String>],
    ) -> anyhow::Result<AppendResponse> {
        let resp = self
            .http_client
            .post(values_url(sheet_id, range, ":append")?)
            .query(&[("valueInputOption", "RAW")])
            .bearer_auth(&self.access_token)
            .json(&AppendBody { values: rows })
            .send()
            .await?;

        if !resp.status().is_success() {
            let json = resp.json::<serde_json::Value>().await?;
            return Err(anyhow!("Error appending to {range}: {:?}", json));
        }

        resp.json::<AppendResponse>()
            .await
            .context("Unexpected append response")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_values_url_encodes_tab_name() {
        let url = values_url("abc123", "RFQ TEST SHEET!A2", ":append").unwrap();
        assert_eq!(
            url.as_str(),
            "https://sheets.googleapis.com/v4/spreadsheets/abc123/values/RFQ%20TEST%20SHEET!A2:append"
        );
    }

    #[test]
    fn test_value_range_without_values() {
        let range: ValueRange = serde_json::from_str(r#"{"range": "Tracker!A1:Z1000"}"#).unwrap();
        assert!(range.values.is_empty());
        assert_eq!(range.range.as_deref(), Some("Tracker!A1:Z1000"));
    }

    #[test]
    fn test_append_body_shape() {
        let rows = vec![vec!["a".to_string(), "b".to_string()]];
        let body = serde_json::to_value(AppendBody { values: &rows }).unwrap();
        assert_eq!(body, serde_json::json!({"values": [["a", "b"]]}));
    }
}
