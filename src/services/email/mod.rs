pub mod attachment;
pub mod config;
pub mod imap_service;
pub mod sanitize;
pub mod store;
pub mod watcher;

pub use attachment::{AttachmentHandler, PdfAttachment};
pub use config::WatcherConfig;
pub use store::AttachmentStore;
pub use watcher::InboxWatcher;
