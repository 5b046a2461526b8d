pub mod api;
pub mod config;
pub mod error;
pub mod format;
pub mod session;
pub mod source;
pub mod state;
pub mod status;
pub mod view;

// Re-export main types for convenience
pub use api::{ChatBackend, ChatReply, HistoryEntry, HttpBackend};
pub use config::Config;
pub use error::{ClientError, ClientResult};
pub use format::{format_message, format_meta, format_source, split_markup};
pub use session::{ChatSession, Rejection, SendOutcome};
pub use source::Source;
pub use state::{ChatMessage, ChatRole, SendState};
pub use status::{ModelInfo, ServerStatus, StatusIndicator};
pub use view::{ChannelView, ChatView, ViewEvent};
