use serde::{Deserialize, Serialize};

/// Message kind used when a request does not name one.
pub const DEFAULT_MESSAGE_TYPE: &str = "love";

/// URL prefix under which uploaded photos are served.
pub const UPLOADS_URL_PREFIX: &str = "/static/uploads";

/// A stored message, exactly as it appears in the messages file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: u64,
    pub text: String,
    /// ISO-8601 instant, kept as written so older entries survive untouched.
    pub timestamp: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Input for appending a message; the store fills in `id` and `timestamp`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct NewMessage {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

impl NewMessage {
    pub fn into_message(self, id: u64, timestamp: String) -> Message {
        Message {
            id,
            text: self.text.unwrap_or_default(),
            timestamp,
            kind: self
                .kind
                .unwrap_or_else(|| DEFAULT_MESSAGE_TYPE.to_string()),
        }
    }
}

/// An uploaded image file. Photos have no record of their own: the file on
/// disk is the photo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    pub filename: String,
    pub url: String,
}

impl Photo {
    pub fn from_filename(filename: impl Into<String>) -> Self {
        let filename = filename.into();
        let url = format!("{}/{}", UPLOADS_URL_PREFIX, filename);
        Self { filename, url }
    }
}

/// Derived relationship statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub days_together: i64,
    pub messages_sent: u64,
    pub photos_shared: u64,
    pub love_level: i64,
}
