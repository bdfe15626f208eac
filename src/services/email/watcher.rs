use crate::services::email::attachment::AttachmentHandler;
use crate::services::email::config::WatcherConfig;
use crate::services::email::imap_service::{ImapService, MailboxWake};
use crate::services::email::store::AttachmentStore;
use anyhow::{Context, Result};
use mail_parser::MessageParser;
use tracing::{debug, error, info};

/// Watches a single mailbox over a long-lived IMAP session and saves
/// every PDF attachment from newly arrived mail.
pub struct InboxWatcher<S> {
    config: WatcherConfig,
    session: S,
    store: AttachmentStore,
}

impl<S: ImapService> InboxWatcher<S> {
    pub fn new(config: WatcherConfig, session: S, store: AttachmentStore) -> Self {
        Self {
            config,
            session,
            store,
        }
    }

    /// Connects, selects the watched mailbox and runs the wait/drain loop
    /// until the connection fails. Startup failures propagate to the
    /// caller; nothing is retried.
    pub async fn watch(&mut self) -> Result<()> {
        self.session.connect().await?;
        self.session.select_mailbox(&self.config.mailbox).await?;

        info!(
            "Watching {} on {} (idle timeout: {}s)",
            self.config.mailbox,
            self.config.imap_server,
            self.config.idle_timeout.as_secs()
        );
        info!("Saving PDF attachments to {:?}", self.store.root());

        loop {
            match self
                .session
                .wait_for_new_mail(self.config.idle_timeout)
                .await?
            {
                MailboxWake::Timeout => {
                    debug!("Idle timeout elapsed, waiting again");
                    continue;
                }
                MailboxWake::NewMail => {}
            }

            self.drain_unseen().await?;
            tokio::time::sleep(self.config.drain_pause).await;
        }
    }

    /// Fetches and processes every message currently flagged unseen, in
    /// the order the server returned them. A failure on one message is
    /// logged and the drain moves on to the next.
    async fn drain_unseen(&mut self) -> Result<()> {
        let ids = self.session.search_unseen().await?;
        if ids.is_empty() {
            debug!("Woke up with no unseen messages");
            return Ok(());
        }

        info!("Found {} unseen messages", ids.len());
        for id in ids {
            if let Err(e) = self.process_message(id).await {
                error!("Failed to process message {}: {:#}", id, e);
            }
        }

        Ok(())
    }

    async fn process_message(&mut self, id: u32) -> Result<()> {
        let raw = self
            .session
            .fetch_message(id)
            .await?
            .with_context(|| format!("No data returned for message {}", id))?;

        let parsed = MessageParser::default()
            .parse(&raw)
            .context("Failed to parse message")?;

        let from = parsed
            .from()
            .and_then(|list| list.first())
            .and_then(|addr| addr.address.as_deref())
            .unwrap_or_default();
        let subject = parsed.subject().unwrap_or_default();
        info!("New message {} from {}: {}", id, from, subject);

        for attachment in AttachmentHandler::pdf_attachments(&parsed) {
            info!("Extracting attachment: {}", attachment.filename);
            if let Err(e) = self.store.save(&attachment.filename, attachment.data) {
                error!("Failed to save {}: {:#}", attachment.filename, e);
            }
        }

        Ok(())
    }
}
