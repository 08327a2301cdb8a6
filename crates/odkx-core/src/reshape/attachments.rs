//! Keying of row attachment manifests by filename.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::resource::FileManifestEntry;

/// Display shape of a row attachment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentEntry {
    /// File name, relative to the row.
    pub filename: String,
    /// Size in bytes.
    pub content_length: Option<u64>,
    /// MIME type.
    pub content_type: Option<String>,
    /// Content hash as reported upstream.
    #[serde(rename = "md5hash")]
    pub md5hash: Option<String>,
    /// URL the file can be downloaded from.
    pub download_url: Option<String>,
}

/// Filename to attachment mapping for one row.
pub type AttachmentMap = BTreeMap<String, AttachmentEntry>;

/// Keys manifest entries by filename.
///
/// Entries without a filename are skipped. On duplicate filenames the later
/// entry wins.
#[must_use]
pub fn map_attachments(entries: &[FileManifestEntry]) -> AttachmentMap {
    let mut mapped = AttachmentMap::new();
    for entry in entries {
        let Some(filename) = entry.filename.as_deref() else {
            tracing::warn!(
                download_url = ?entry.download_url,
                "skipping attachment without filename"
            );
            continue;
        };

        mapped.insert(
            filename.to_string(),
            AttachmentEntry {
                filename: filename.to_string(),
                content_length: entry.content_length,
                content_type: entry.content_type.clone(),
                md5hash: entry.md5hash.clone(),
                download_url: entry.download_url.clone(),
            },
        );
    }
    mapped
}
