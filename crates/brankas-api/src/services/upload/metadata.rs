use brankas_core::{NewHttpHistory, NewImageMetadata};
use chrono::{DateTime, Utc};

use crate::utils::provenance::RequestProvenance;
use crate::utils::upload::FormFile;

/// Describe a validated upload and the request that carried it.
pub fn build_metadata(
    file: &FormFile,
    provenance: RequestProvenance,
    now: DateTime<Utc>,
) -> NewImageMetadata {
    let RequestProvenance {
        origin,
        path,
        method,
        user_agent,
        remote_addr,
    } = provenance;

    NewImageMetadata {
        filename: file.filename.clone(),
        size: i64::try_from(file.data.len()).unwrap_or(i64::MAX),
        content_type: file.content_type.clone(),
        http_history: NewHttpHistory {
            origin,
            path,
            method,
            user_agent,
            remote_addr,
            date_time: now,
        },
    }
}
