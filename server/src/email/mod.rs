pub mod client;
pub mod rfq_message;

use lib_rfq::RawEmail;

use self::{
    client::{GmailClient, UnreadListOptions},
    rfq_message::raw_email_from_gmail_message,
};

/// Read the unread messages one by one. A message that cannot be fetched is
/// logged and skipped so one bad message does not sink the whole run.
pub async fn fetch_unread_emails(
    client: &GmailClient,
    options: &UnreadListOptions,
) -> anyhow::Result<Vec<RawEmail>> {
    let ids = client.list_unread(options).await?;
    tracing::info!("Found {} unread messages", ids.len());

    let mut emails = Vec::with_capacity(ids.len());
    for id in ids {
        match client.get_message_by_id(&id).await {
            Ok(message) => emails.push(raw_email_from_gmail_message(message)),
            Err(e) => tracing::warn!("Skipping message {}: {:?}", id, e),
        }
    }

    Ok(emails)
}

/// Clear the unread flag on processed emails. Failures are logged only; the
/// message simply shows up again on the next run.
pub async fn mark_emails_read(client: &GmailClient, emails: &[RawEmail]) {
    for email in emails {
        if let Err(e) = client.mark_as_read(&email.id).await {
            tracing::warn!("Could not mark message {} as read: {:?}", email.id, e);
        }
    }
}
