use std::sync::Arc;

use crate::{
    auth::google::{AuthorizedUserCredentials, ServiceAccountKey},
    server_config::{GmailConfig, HttpConfig, ServerConfig, SheetTarget, SheetsConfig},
    ServerState,
};

pub fn test_config() -> ServerConfig {
    ServerConfig {
        server: HttpConfig::default(),
        gmail: GmailConfig {
            credentials_path: "token.json".into(),
            mark_as_read: false,
            max_results: 50,
            query: None,
        },
        sheets: SheetsConfig {
            credentials_path: "service_account.json".into(),
            read: SheetTarget {
                sheet_id: "read-sheet".to_string(),
                tab_name: "RFQ Tracker".to_string(),
            },
            write: SheetTarget {
                sheet_id: "write-sheet".to_string(),
                tab_name: "RFQ TEST SHEET".to_string(),
            },
        },
    }
}

/// State with placeholder credentials; fine for routes that never reach Google.
pub fn test_state() -> ServerState {
    ServerState {
        http_client: reqwest::Client::new(),
        config: Arc::new(test_config()),
        gmail_credentials: Arc::new(AuthorizedUserCredentials {
            client_id: "client-id".to_string(),
            client_secret: "client-secret".to_string(),
            refresh_token: "refresh-token".to_string(),
            token_uri: "http://127.0.0.1:9/token".to_string(),
        }),
        sheets_key: Arc::new(ServiceAccountKey {
            client_email: "rfq@example.iam.gserviceaccount.com".to_string(),
            private_key: String::new(),
            token_uri: "http://127.0.0.1:9/token".to_string(),
        }),
    }
}
