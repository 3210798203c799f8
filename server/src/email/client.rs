use anyhow::{anyhow, Context};
use google_gmail1::api::{ListMessagesResponse, Message};
use serde_json::json;

use crate::{
    auth::google::{exchange_refresh_token, AuthorizedUserCredentials},
    HttpClient,
};

macro_rules! gmail_url {
    ($($params:expr),*) => {
        {
            const GMAIL_ENDPOINT: &str = "https://www.googleapis.com/gmail/v1/users/me";
            let list_params = vec![$($params),*];
            let path = list_params.join("/");
            format!("{}/{}", GMAIL_ENDPOINT, path)
        }
    };
}

pub const UNREAD_LABEL: &str = "UNREAD";

#[derive(Debug, Default, Clone)]
/// Filter and paging options for the unread message list
pub struct UnreadListOptions {
    /// Extra Gmail search terms, e.g. `subject:RFQ`
    pub query: Option<String>,
    pub max_results: u32,
}

impl UnreadListOptions {
    pub fn search_query(&self) -> String {
        match self.query.as_deref().map(str::trim) {
            Some(extra) if !extra.is_empty() => format!("is:unread {extra}"),
            _ => "is:unread".to_string(),
        }
    }
}

/// Gmail access for one mailbox, authorized for the lifetime of a single run.
#[derive(Debug, Clone)]
pub struct GmailClient {
    http_client: HttpClient,
    access_token: String,
}

impl GmailClient {
    pub async fn connect(
        http_client: HttpClient,
        credentials: &AuthorizedUserCredentials,
    ) -> anyhow::Result<GmailClient> {
        let token = exchange_refresh_token(&http_client, credentials)
            .await
            .map_err(|e| anyhow!("Could not get Gmail access token: {e}"))?;
        tracing::debug!("Gmail access token expires in {}s", token.expires_in);

        Ok(GmailClient {
            http_client,
            access_token: token.access_token,
        })
    }

    /// First page of unread message ids.
    pub async fn list_unread(&self, options: &UnreadListOptions) -> anyhow::Result<Vec<String>> {
        let query = [
            ("q".to_string(), options.search_query()),
            ("maxResults".to_string(), options.max_results.to_string()),
        ];

        let resp = self
            .http_client
            .get(gmail_url!("messages"))
            .query(&query)
            .bearer_auth(&self.access_token)
            .send()
            .await?;

        if !resp.status().is_success() {
            let json = resp.json::<serde_json::Value>().await?;
            return Err(anyhow!("Error listing unread messages: {:?}", json));
        }

        let data = resp.json::<ListMessagesResponse>().await?;
        let ids = data
            .messages
            .unwrap_or_default()
            .into_iter()
            .filter_map(|m| m.id)
            .collect();

        Ok(ids)
    }

    pub async fn get_message_by_id(&self, message_id: &str) -> anyhow::Result<Message> {
        let id = message_id;
        let resp = self
            .http_client
            .get(gmail_url!("messages", id))
            .bearer_auth(&self.access_token)
            .query(&[("format", "full")])
            .send()
            .await?;

        if !resp.status().is_success() {
            let json = resp.json::<serde_json::Value>().await?;
            return Err(anyhow!("Error getting message {id}: {:?}", json));
        }

        resp.json::<Message>().await.context("Error getting message")
    }

    pub async fn mark_as_read(&self, message_id: &str) -> anyhow::Result<()> {
        let id = message_id;
        let resp = self
            .http_client
            .post(gmail_url!("messages", id, "modify"))
            .bearer_auth(&self.access_token)
            .json(&json!({ "removeLabelIds": [UNREAD_LABEL] }))
            .send()
            .await?;

        if !resp.status().is_success() {
            let json = resp.json::<serde_json::Value>().await?;
            return Err(anyhow!("Error marking message {id} as read: {:?}", json));
        }

        Ok(())
    }
}
