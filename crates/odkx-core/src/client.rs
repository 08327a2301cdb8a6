//! Upstream table data client abstraction.
//!
//! The facade never talks to the table data service directly; every fetch
//! goes through [`TableDataClient`]. [`MemoryTableClient`] is a complete
//! in-process implementation used by tests and local runs.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::RwLock;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::resource::{FileManifest, RowResource, TableResource};

/// Read access to the upstream table data service.
///
/// Implementations must be safe to share across request handlers.
#[async_trait]
pub trait TableDataClient: Send + Sync + 'static {
    /// Fetches a table and its current schema ETag.
    async fn get_table_resource(&self, table_id: &str) -> Result<TableResource>;

    /// Fetches a single row addressed through the table's schema ETag.
    async fn get_single_row(
        &self,
        table_id: &str,
        schema_etag: &str,
        row_id: &str,
    ) -> Result<RowResource>;

    /// Fetches the attachment manifest of a single row.
    async fn get_single_row_attachments(
        &self,
        table_id: &str,
        schema_etag: &str,
        row_id: &str,
    ) -> Result<FileManifest>;

    /// Fetches the table-level file manifest.
    async fn get_table_manifest(&self, table_id: &str) -> Result<FileManifest>;

    /// Downloads a form definition document by URL and returns its raw text.
    async fn get_form_definition(&self, url: &str) -> Result<String>;
}

/// A serialized set of upstream resources used to seed a [`MemoryTableClient`].
///
/// ```json
/// {
///   "tables": [{
///     "table": {"tableId": "census", "schemaETag": "s1"},
///     "rows": [{"id": "r1", "orderedColumns": [{"column": "name", "value": "Ada"}]}],
///     "attachments": {"r1": {"files": []}},
///     "manifest": {"files": [{"filename": "formDef.json", "downloadUrl": "mem://census/formDef.json"}]}
///   }],
///   "documents": {"mem://census/formDef.json": {"xlsx": {"survey": []}}}
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    /// Tables with their rows and manifests.
    #[serde(default)]
    pub tables: Vec<TableSnapshot>,
    /// Downloadable documents keyed by URL. String values are served verbatim;
    /// any other JSON value is served as its serialized text.
    #[serde(default)]
    pub documents: BTreeMap<String, Value>,
}

/// One table inside a [`Snapshot`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableSnapshot {
    /// The table resource.
    pub table: TableResource,
    /// Rows of the table.
    #[serde(default)]
    pub rows: Vec<RowResource>,
    /// Row attachment manifests keyed by row id.
    #[serde(default)]
    pub attachments: BTreeMap<String, FileManifest>,
    /// Table-level file manifest.
    #[serde(default)]
    pub manifest: FileManifest,
}

#[derive(Debug, Default)]
struct MemoryTables {
    tables: HashMap<String, TableResource>,
    rows: HashMap<(String, String), RowResource>,
    row_attachments: HashMap<(String, String), FileManifest>,
    table_manifests: HashMap<String, FileManifest>,
    documents: HashMap<String, String>,
}

impl MemoryTables {
    fn table(&self, table_id: &str) -> Result<&TableResource> {
        self.tables
            .get(table_id)
            .ok_or_else(|| Error::resource_not_found("table", table_id))
    }

    fn check_schema(&self, table_id: &str, schema_etag: &str) -> Result<()> {
        let table = self.table(table_id)?;
        if table.schema_etag != schema_etag {
            return Err(Error::PreconditionFailed {
                message: format!(
                    "schema ETag {schema_etag} does not match current schema {} of table {table_id}",
                    table.schema_etag
                ),
            });
        }
        Ok(())
    }
}

/// In-memory [`TableDataClient`].
#[derive(Debug, Default)]
pub struct MemoryTableClient {
    state: RwLock<MemoryTables>,
}

impl MemoryTableClient {
    /// Creates an empty client.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a client seeded from a snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if a row or attachment manifest refers to a table
    /// that is not part of the snapshot.
    pub fn from_snapshot(snapshot: Snapshot) -> Result<Self> {
        let client = Self::new();
        for table in snapshot.tables {
            let table_id = table.table.table_id.clone();
            client.insert_table(table.table)?;
            client.insert_table_manifest(&table_id, table.manifest)?;
            for row in table.rows {
                client.insert_row(&table_id, row)?;
            }
            for (row_id, manifest) in table.attachments {
                client.insert_row_attachments(&table_id, &row_id, manifest)?;
            }
        }
        for (url, document) in snapshot.documents {
            let text = match document {
                Value::String(text) => text,
                other => serde_json::to_string(&other)?,
            };
            client.insert_document(url, text)?;
        }
        Ok(client)
    }

    /// Creates a client from snapshot JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid snapshot.
    pub fn from_snapshot_json(json: &str) -> Result<Self> {
        let snapshot: Snapshot = serde_json::from_str(json)?;
        Self::from_snapshot(snapshot)
    }

    /// Creates a client from a snapshot file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid snapshot.
    pub fn from_snapshot_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            Error::InvalidInput(format!("failed to read snapshot {}: {e}", path.display()))
        })?;
        Self::from_snapshot_json(&json)
    }

    /// Inserts or replaces a table.
    ///
    /// # Errors
    ///
    /// Returns an error if the internal lock is poisoned.
    pub fn insert_table(&self, table: TableResource) -> Result<()> {
        let mut state = self.write()?;
        state.tables.insert(table.table_id.clone(), table);
        Ok(())
    }

    /// Inserts or replaces a row of an existing table.
    ///
    /// # Errors
    ///
    /// Returns an error if the table does not exist.
    pub fn insert_row(&self, table_id: &str, row: RowResource) -> Result<()> {
        let mut state = self.write()?;
        state.table(table_id)?;
        state
            .rows
            .insert((table_id.to_string(), row.id.clone()), row);
        Ok(())
    }

    /// Inserts or replaces the attachment manifest of a row.
    ///
    /// # Errors
    ///
    /// Returns an error if the table does not exist.
    pub fn insert_row_attachments(
        &self,
        table_id: &str,
        row_id: &str,
        manifest: FileManifest,
    ) -> Result<()> {
        let mut state = self.write()?;
        state.table(table_id)?;
        state
            .row_attachments
            .insert((table_id.to_string(), row_id.to_string()), manifest);
        Ok(())
    }

    /// Inserts or replaces the table-level file manifest.
    ///
    /// # Errors
    ///
    /// Returns an error if the table does not exist.
    pub fn insert_table_manifest(&self, table_id: &str, manifest: FileManifest) -> Result<()> {
        let mut state = self.write()?;
        state.table(table_id)?;
        state
            .table_manifests
            .insert(table_id.to_string(), manifest);
        Ok(())
    }

    /// Inserts or replaces a downloadable document.
    ///
    /// # Errors
    ///
    /// Returns an error if the internal lock is poisoned.
    pub fn insert_document(&self, url: impl Into<String>, text: impl Into<String>) -> Result<()> {
        let mut state = self.write()?;
        state.documents.insert(url.into(), text.into());
        Ok(())
    }

    /// Returns the number of tables held.
    ///
    /// # Errors
    ///
    /// Returns an error if the internal lock is poisoned.
    pub fn table_count(&self) -> Result<usize> {
        Ok(self.read()?.tables.len())
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, MemoryTables>> {
        self.state.read().map_err(|_| Error::Internal {
            message: "lock poisoned".into(),
        })
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, MemoryTables>> {
        self.state.write().map_err(|_| Error::Internal {
            message: "lock poisoned".into(),
        })
    }
}

#[async_trait]
impl TableDataClient for MemoryTableClient {
    async fn get_table_resource(&self, table_id: &str) -> Result<TableResource> {
        self.read()?.table(table_id).cloned()
    }

    async fn get_single_row(
        &self,
        table_id: &str,
        schema_etag: &str,
        row_id: &str,
    ) -> Result<RowResource> {
        let state = self.read()?;
        state.check_schema(table_id, schema_etag)?;
        state
            .rows
            .get(&(table_id.to_string(), row_id.to_string()))
            .cloned()
            .ok_or_else(|| Error::resource_not_found("row", row_id))
    }

    async fn get_single_row_attachments(
        &self,
        table_id: &str,
        schema_etag: &str,
        row_id: &str,
    ) -> Result<FileManifest> {
        let state = self.read()?;
        state.check_schema(table_id, schema_etag)?;
        let key = (table_id.to_string(), row_id.to_string());
        if !state.rows.contains_key(&key) {
            return Err(Error::resource_not_found("row", row_id));
        }
        Ok(state.row_attachments.get(&key).cloned().unwrap_or_default())
    }

    async fn get_table_manifest(&self, table_id: &str) -> Result<FileManifest> {
        let state = self.read()?;
        state.table(table_id)?;
        Ok(state
            .table_manifests
            .get(table_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn get_form_definition(&self, url: &str) -> Result<String> {
        self.read()?
            .documents
            .get(url)
            .cloned()
            .ok_or_else(|| Error::resource_not_found("document", url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::{DataKeyValue, FileManifestEntry};

    fn seeded() -> MemoryTableClient {
        let client = MemoryTableClient::new();
        client
            .insert_table(TableResource::new("census", "schema-1"))
            .unwrap();
        client
            .insert_row(
                "census",
                RowResource::new("r1", vec![DataKeyValue::new("name", Some("Ada"))]),
            )
            .unwrap();
        client
    }

    #[tokio::test]
    async fn row_lookup_requires_current_schema_etag() {
        let client = seeded();

        let row = client.get_single_row("census", "schema-1", "r1").await.unwrap();
        assert_eq!(row.id, "r1");

        let err = client
            .get_single_row("census", "schema-0", "r1")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::PreconditionFailed { .. }));
    }

    #[tokio::test]
    async fn missing_resources_are_not_found() {
        let client = seeded();

        assert!(client.get_table_resource("nope").await.unwrap_err().is_not_found());
        assert!(
            client
                .get_single_row("census", "schema-1", "r2")
                .await
                .unwrap_err()
                .is_not_found()
        );
        assert!(
            client
                .get_form_definition("mem://missing")
                .await
                .unwrap_err()
                .is_not_found()
        );
    }

    #[tokio::test]
    async fn manifests_default_to_empty_for_known_resources() {
        let client = seeded();

        let manifest = client.get_table_manifest("census").await.unwrap();
        assert!(manifest.files.is_empty());

        let attachments = client
            .get_single_row_attachments("census", "schema-1", "r1")
            .await
            .unwrap();
        assert!(attachments.files.is_empty());
    }

    #[test]
    fn rows_for_unknown_tables_are_rejected() {
        let client = MemoryTableClient::new();
        let err = client
            .insert_row("ghost", RowResource::new("r1", Vec::new()))
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn snapshot_documents_accept_text_and_json() {
        let client = MemoryTableClient::from_snapshot_json(
            r#"{
                "tables": [{
                    "table": {"tableId": "census", "schemaETag": "s1"},
                    "manifest": {"files": [{"filename": "formDef.json", "downloadUrl": "mem://a"}]}
                }],
                "documents": {
                    "mem://a": {"xlsx": {"survey": []}},
                    "mem://b": "{not json"
                }
            }"#,
        )
        .unwrap();

        let manifest = client.get_table_manifest("census").await.unwrap();
        assert_eq!(
            manifest.files,
            vec![FileManifestEntry::new("formDef.json", "mem://a")]
        );

        let parsed: Value =
            serde_json::from_str(&client.get_form_definition("mem://a").await.unwrap()).unwrap();
        assert_eq!(parsed["xlsx"]["survey"], serde_json::json!([]));
        assert_eq!(
            client.get_form_definition("mem://b").await.unwrap(),
            "{not json"
        );
    }
}
