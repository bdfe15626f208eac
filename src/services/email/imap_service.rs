use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;

/// What an idle wait came back with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MailboxWake {
    /// The server pushed an unsolicited response while idling.
    NewMail,
    /// The wait elapsed without any server activity.
    Timeout,
}

#[async_trait]
pub trait ImapService: Send + Sync {
    async fn connect(&mut self) -> Result<()>;
    async fn select_mailbox(&mut self, mailbox: &str) -> Result<()>;
    async fn wait_for_new_mail(&mut self, timeout: Duration) -> Result<MailboxWake>;
    async fn search_unseen(&mut self) -> Result<Vec<u32>>;
    async fn fetch_message(&mut self, id: u32) -> Result<Option<Vec<u8>>>;
}
