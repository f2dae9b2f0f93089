use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Snapshot of the HTTP request that produced an upload.
///
/// Serialized with the field names clients of the upload endpoint already rely on
/// (`Origin`, `Path`, `Method`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpHistory {
    pub id: Uuid,
    #[serde(rename = "Origin")]
    pub origin: String,
    #[serde(rename = "Path")]
    pub path: String,
    #[serde(rename = "Method")]
    pub method: String,
    #[serde(rename = "UserAgent")]
    pub user_agent: String,
    #[serde(rename = "RemoteAddr")]
    pub remote_addr: String,
    #[serde(rename = "DateTime")]
    pub date_time: DateTime<Utc>,
}

/// Persisted description of an uploaded image and the request that carried it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageMetadata {
    pub id: Uuid,
    #[serde(rename = "Filename")]
    pub filename: String,
    #[serde(rename = "Size")]
    pub size: i64,
    #[serde(rename = "ContentType")]
    pub content_type: String,
    #[serde(rename = "HTTPHistory")]
    pub http_history: HttpHistory,
}

/// Request provenance before the store has assigned it an identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewHttpHistory {
    pub origin: String,
    pub path: String,
    pub method: String,
    pub user_agent: String,
    pub remote_addr: String,
    pub date_time: DateTime<Utc>,
}

/// Image metadata built from a validated upload, not yet persisted.
///
/// The image and its history are always inserted together; neither has an
/// identity until the store assigns one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewImageMetadata {
    pub filename: String,
    pub size: i64,
    pub content_type: String,
    pub http_history: NewHttpHistory,
}

impl NewImageMetadata {
    /// Attach the identities assigned by the store on insert.
    pub fn into_persisted(self, image_id: Uuid, history_id: Uuid) -> ImageMetadata {
        let NewHttpHistory {
            origin,
            path,
            method,
            user_agent,
            remote_addr,
            date_time,
        } = self.http_history;

        ImageMetadata {
            id: image_id,
            filename: self.filename,
            size: self.size,
            content_type: self.content_type,
            http_history: HttpHistory {
                id: history_id,
                origin,
                path,
                method,
                user_agent,
                remote_addr,
                date_time,
            },
        }
    }
}
