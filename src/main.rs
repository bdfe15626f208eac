use anyhow::Result;
use pdf_collector::config::logging::{self, LogConfig};
use pdf_collector::infrastructure::imap::ImapClient;
use pdf_collector::services::email::{AttachmentStore, InboxWatcher, WatcherConfig};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    logging::init(&LogConfig::from_env());

    let config = WatcherConfig::from_env()?;

    info!("Starting pdf-collector");
    info!(
        "IMAP server: {}:{}",
        config.imap_server, config.imap_port
    );

    let store = AttachmentStore::new(config.save_dir.clone());
    store.ensure_root()?;

    let client = ImapClient::new(
        config.imap_server.clone(),
        config.imap_port,
        config.username.clone(),
        config.password.clone(),
    );

    let mut watcher = InboxWatcher::new(config, client, store);
    watcher.watch().await
}
