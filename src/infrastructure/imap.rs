use crate::services::email::imap_service::{ImapService, MailboxWake};
use anyhow::{Context, Result};
use async_imap::extensions::idle::IdleResponse;
use async_trait::async_trait;
use futures::StreamExt;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio_native_tls::TlsConnector;
use tracing::{debug, info};

pub type ImapSession = async_imap::Session<tokio_native_tls::TlsStream<TcpStream>>;

/// Session-layer failures that are not plain protocol errors.
#[derive(Debug, thiserror::Error)]
pub enum ImapError {
    #[error("IMAP session not connected")]
    NotConnected,
    #[error("IMAP server does not advertise IDLE capability")]
    IdleNotSupported,
}

pub struct ImapClient {
    server: String,
    port: u16,
    username: String,
    password: String,
    session: Option<ImapSession>,
}

impl ImapClient {
    pub fn new(server: String, port: u16, username: String, password: String) -> Self {
        Self {
            server,
            port,
            username,
            password,
            session: None,
        }
    }

    fn session_mut(&mut self) -> Result<&mut ImapSession> {
        self.session.as_mut().ok_or(ImapError::NotConnected.into())
    }
}

#[async_trait]
impl ImapService for ImapClient {
    async fn connect(&mut self) -> Result<()> {
        if self.session.is_some() {
            return Ok(());
        }

        info!("Connecting to IMAP server...");
        let tcp_stream = TcpStream::connect((self.server.as_str(), self.port))
            .await
            .context("Failed to connect to IMAP server (TCP)")?;

        let native_tls = native_tls::TlsConnector::builder()
            .build()
            .context("Failed to create TLS connector")?;
        let connector = TlsConnector::from(native_tls);

        let tls_stream = connector
            .connect(&self.server, tcp_stream)
            .await
            .context("Failed to establish TLS connection")?;

        let client = async_imap::Client::new(tls_stream);

        let mut session = client
            .login(&self.username, &self.password)
            .await
            .map_err(|e| e.0)
            .context("IMAP authentication failed")?;

        let capabilities = session
            .capabilities()
            .await
            .context("Failed to query server capabilities")?;
        if !capabilities.has_str("IDLE") {
            return Err(ImapError::IdleNotSupported.into());
        }

        info!("Successfully connected to IMAP server");
        self.session = Some(session);
        Ok(())
    }

    async fn select_mailbox(&mut self, mailbox: &str) -> Result<()> {
        let session = self.session_mut()?;
        let selected = session
            .select(mailbox)
            .await
            .with_context(|| format!("Failed to select mailbox {}", mailbox))?;
        debug!("Mailbox selected: {:?}", selected);
        Ok(())
    }

    async fn wait_for_new_mail(&mut self, timeout: Duration) -> Result<MailboxWake> {
        // IDLE takes the session by value; it comes back from done().
        let session = self.session.take().ok_or(ImapError::NotConnected)?;

        let mut idle = session.idle();
        idle.init().await.context("Failed to enter IDLE")?;
        let (idle_wait, _interrupt) = idle.wait_with_timeout(timeout);
        let response = idle_wait.await.context("IDLE wait failed")?;
        self.session = Some(idle.done().await.context("Failed to leave IDLE")?);

        Ok(match response {
            IdleResponse::NewData(_) => MailboxWake::NewMail,
            IdleResponse::Timeout | IdleResponse::ManualInterrupt => MailboxWake::Timeout,
        })
    }

    async fn search_unseen(&mut self) -> Result<Vec<u32>> {
        let session = self.session_mut()?;
        let result = session
            .search("UNSEEN")
            .await
            .context("Failed to search unseen")?;

        // SEARCH results come back as an unordered set; ascending id order
        // is the server's message order.
        let mut ids: Vec<u32> = result.into_iter().collect();
        ids.sort_unstable();
        Ok(ids)
    }

    async fn fetch_message(&mut self, id: u32) -> Result<Option<Vec<u8>>> {
        let session = self.session_mut()?;
        let mut fetch_stream = session
            .fetch(id.to_string(), "RFC822")
            .await
            .context("Failed to fetch message")?;

        if let Some(msg) = fetch_stream.next().await {
            let msg = msg.context("Failed to read fetch result")?;
            return Ok(msg.body().map(|b| b.to_vec()));
        }
        Ok(None)
    }
}
