//! Upstream resource entities.
//!
//! These mirror the JSON documents served by the table data service and are
//! treated as read-only snapshots: fetched per request, never cached.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A table and the schema version token used to address its rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TableResource {
    /// Table identifier.
    pub table_id: String,
    /// Version token of the current table schema.
    #[serde(rename = "schemaETag")]
    pub schema_etag: String,
    /// Version token of the current table data.
    #[serde(rename = "dataETag", default)]
    pub data_etag: Option<String>,
    /// Version token of the table-level file manifest.
    #[serde(rename = "tableLevelManifestETag", default)]
    pub table_level_manifest_etag: Option<String>,
    /// URI of this resource.
    #[serde(default)]
    pub self_uri: Option<String>,
    /// URI of the table definition.
    #[serde(default)]
    pub definition_uri: Option<String>,
    /// URI of the table data.
    #[serde(default)]
    pub data_uri: Option<String>,
    /// URI of the table's instance files.
    #[serde(default)]
    pub instance_files_uri: Option<String>,
    /// URI of the data diff feed.
    #[serde(default)]
    pub diff_uri: Option<String>,
    /// URI of the table ACL.
    #[serde(default)]
    pub acl_uri: Option<String>,
}

impl TableResource {
    /// Creates a table resource with only the identifying fields set.
    #[must_use]
    pub fn new(table_id: impl Into<String>, schema_etag: impl Into<String>) -> Self {
        Self {
            table_id: table_id.into(),
            schema_etag: schema_etag.into(),
            data_etag: None,
            table_level_manifest_etag: None,
            self_uri: None,
            definition_uri: None,
            data_uri: None,
            instance_files_uri: None,
            diff_uri: None,
            acl_uri: None,
        }
    }
}

/// A single column/value pair of a row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DataKeyValue {
    /// Column name.
    pub column: String,
    /// Column value; `null` when the cell is empty.
    #[serde(default)]
    pub value: Option<String>,
}

impl DataKeyValue {
    /// Creates a column/value pair.
    #[must_use]
    pub fn new(column: impl Into<String>, value: Option<&str>) -> Self {
        Self {
            column: column.into(),
            value: value.map(str::to_string),
        }
    }
}

/// Row-level access filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RowFilterScope {
    /// Default access level (e.g. `FULL`, `HIDDEN`).
    #[serde(default)]
    pub default_access: Option<String>,
    /// Owner of the row.
    #[serde(default)]
    pub row_owner: Option<String>,
    /// Group with read-only access.
    #[serde(default)]
    pub group_read_only: Option<String>,
    /// Group allowed to modify the row.
    #[serde(default)]
    pub group_modify: Option<String>,
    /// Privileged group.
    #[serde(default)]
    pub group_privileged: Option<String>,
}

/// A row of a table, as served by the upstream service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RowResource {
    /// Row identifier.
    pub id: String,
    /// Version token of this row.
    #[serde(rename = "rowETag", default)]
    pub row_etag: Option<String>,
    /// Data ETag of the table when this row was last modified.
    #[serde(rename = "dataETagAtModification", default)]
    pub data_etag_at_modification: Option<String>,
    /// Whether the row is deleted.
    #[serde(default)]
    pub deleted: bool,
    /// User that created the row.
    #[serde(default)]
    pub create_user: Option<String>,
    /// User that last updated the row.
    #[serde(default)]
    pub last_update_user: Option<String>,
    /// Form that produced the row.
    #[serde(default)]
    pub form_id: Option<String>,
    /// Locale the row was captured in.
    #[serde(default)]
    pub locale: Option<String>,
    /// Savepoint type (`COMPLETE`, `INCOMPLETE`).
    #[serde(default)]
    pub savepoint_type: Option<String>,
    /// Savepoint timestamp as written by the capturing device.
    #[serde(default)]
    pub savepoint_timestamp: Option<String>,
    /// Savepoint creator.
    #[serde(default)]
    pub savepoint_creator: Option<String>,
    /// Row-level access filter.
    #[serde(default)]
    pub row_filter_scope: Option<RowFilterScope>,
    /// Column values in table order.
    #[serde(default)]
    pub ordered_columns: Vec<DataKeyValue>,
    /// URI of this resource.
    #[serde(default)]
    pub self_uri: Option<String>,
}

impl RowResource {
    /// Creates a row resource with the given values and no metadata.
    #[must_use]
    pub fn new(id: impl Into<String>, ordered_columns: Vec<DataKeyValue>) -> Self {
        Self {
            id: id.into(),
            row_etag: None,
            data_etag_at_modification: None,
            deleted: false,
            create_user: None,
            last_update_user: None,
            form_id: None,
            locale: None,
            savepoint_type: None,
            savepoint_timestamp: None,
            savepoint_creator: None,
            row_filter_scope: None,
            ordered_columns,
            self_uri: None,
        }
    }

    /// Returns the row's column/value pairs in table order.
    #[must_use]
    pub fn values(&self) -> &[DataKeyValue] {
        &self.ordered_columns
    }
}

/// A downloadable file associated with a table or row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FileManifestEntry {
    /// File name, relative to the table or row.
    #[serde(default)]
    pub filename: Option<String>,
    /// Size in bytes.
    #[serde(default)]
    pub content_length: Option<u64>,
    /// MIME type.
    #[serde(default)]
    pub content_type: Option<String>,
    /// Content hash as reported upstream (`md5:<hex>`).
    #[serde(rename = "md5hash", default)]
    pub md5hash: Option<String>,
    /// URL the file can be downloaded from.
    #[serde(default)]
    pub download_url: Option<String>,
}

impl FileManifestEntry {
    /// Creates an entry with a filename and download URL.
    #[must_use]
    pub fn new(filename: impl Into<String>, download_url: impl Into<String>) -> Self {
        Self {
            filename: Some(filename.into()),
            download_url: Some(download_url.into()),
            ..Self::default()
        }
    }
}

/// A list of downloadable files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FileManifest {
    /// Manifest entries in upstream order.
    #[serde(default)]
    pub files: Vec<FileManifestEntry>,
}

impl FileManifest {
    /// Creates a manifest from entries.
    #[must_use]
    pub fn new(files: Vec<FileManifestEntry>) -> Self {
        Self { files }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn table_resource_uses_upstream_etag_names() {
        let table: TableResource = serde_json::from_value(json!({
            "tableId": "census",
            "schemaETag": "uuid:schema-1",
            "dataETag": "uuid:data-7",
            "selfUri": "http://sync/odktables/default/tables/census"
        }))
        .unwrap();

        assert_eq!(table.table_id, "census");
        assert_eq!(table.schema_etag, "uuid:schema-1");
        assert_eq!(table.data_etag.as_deref(), Some("uuid:data-7"));

        let value = serde_json::to_value(&table).unwrap();
        assert_eq!(value["schemaETag"], "uuid:schema-1");
        assert_eq!(value["tableLevelManifestETag"], serde_json::Value::Null);
    }

    #[test]
    fn row_resource_parses_ordered_columns_with_null_values() {
        let row: RowResource = serde_json::from_value(json!({
            "id": "uuid:row-1",
            "rowETag": "uuid:etag",
            "savepointType": "COMPLETE",
            "rowFilterScope": {"defaultAccess": "FULL", "rowOwner": "mailto:a@b.org"},
            "orderedColumns": [
                {"column": "name", "value": "Ada"},
                {"column": "photo_uriFragment", "value": null}
            ]
        }))
        .unwrap();

        assert_eq!(row.values().len(), 2);
        assert_eq!(row.values()[1].value, None);
        assert_eq!(
            row.row_filter_scope
                .as_ref()
                .and_then(|scope| scope.default_access.as_deref()),
            Some("FULL")
        );
    }

    #[test]
    fn manifest_entry_keeps_md5hash_spelling() {
        let entry = FileManifestEntry {
            md5hash: Some("md5:abc".to_string()),
            ..FileManifestEntry::new("formDef.json", "http://sync/files/formDef.json")
        };
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["md5hash"], "md5:abc");
        assert_eq!(value["downloadUrl"], "http://sync/files/formDef.json");
    }
}
