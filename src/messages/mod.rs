mod delete;
mod list;
mod send;

use axum::{Router, routing::get, routing::post};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::AppState;

pub use delete::delete_message;
pub use list::list_messages;
pub use send::{send_announcement, send_message};

/// Hard cutoff for the listing window, not a page boundary.
pub const LIST_WINDOW: i64 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Message,
    Announcement,
}

impl MessageKind {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            MessageKind::Message => "message",
            MessageKind::Announcement => "announcement",
        }
    }

    pub(crate) fn from_column(kind: &str) -> Self {
        match kind {
            "announcement" => MessageKind::Announcement,
            _ => MessageKind::Message,
        }
    }

    /// Attribution of last resort, when neither a profile nor the
    /// identity provider supplies a name. Announcements fall back to
    /// "Administration" on purpose.
    pub(crate) fn anonymous_name(&self) -> &'static str {
        match self {
            MessageKind::Message => "Utilisateur anonyme",
            MessageKind::Announcement => "Administration",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: Uuid,
    pub content: String,
    pub author_id: String,
    pub author_name: String,
    #[serde(rename = "type")]
    pub kind: MessageKind,
    pub category: Option<String>,
    pub created_at: i64,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list::list).post(send::send))
        .route("/announcement", post(send::announce))
        .route("/{id}", axum::routing::delete(delete::remove))
}
