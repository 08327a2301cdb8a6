//! Upstream failure propagation through the table routes.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use odkx_api::{TablesConfig, TablesState, tables_router};
use odkx_core::resource::{FileManifest, RowResource, TableResource};
use odkx_core::{Error, Result, TableDataClient};

#[derive(Clone, Copy)]
enum Mode {
    Unreachable,
    SchemaMoves,
    Slow { millis: u64 },
}

struct FlakyClient {
    mode: Mode,
    table_fetches: AtomicUsize,
}

impl FlakyClient {
    fn new(mode: Mode) -> Self {
        Self {
            mode,
            table_fetches: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl TableDataClient for FlakyClient {
    async fn get_table_resource(&self, table_id: &str) -> Result<TableResource> {
        self.table_fetches.fetch_add(1, Ordering::SeqCst);
        match self.mode {
            Mode::Unreachable => Err(Error::upstream_with_source(
                "fetch table resource",
                std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused"),
            )),
            Mode::SchemaMoves => Ok(TableResource::new(table_id, "uuid:schema-old")),
            Mode::Slow { millis } => {
                tokio::time::sleep(Duration::from_millis(millis)).await;
                Ok(TableResource::new(table_id, "uuid:schema-1"))
            }
        }
    }

    async fn get_single_row(
        &self,
        _table_id: &str,
        schema_etag: &str,
        row_id: &str,
    ) -> Result<RowResource> {
        if schema_etag == "uuid:schema-old" {
            return Err(Error::PreconditionFailed {
                message: "schema ETag is stale".to_string(),
            });
        }
        Ok(RowResource::new(row_id, Vec::new()))
    }

    async fn get_single_row_attachments(
        &self,
        _table_id: &str,
        _schema_etag: &str,
        _row_id: &str,
    ) -> Result<FileManifest> {
        Ok(FileManifest::default())
    }

    async fn get_table_manifest(&self, _table_id: &str) -> Result<FileManifest> {
        Err(Error::upstream("manifest service returned 500"))
    }

    async fn get_form_definition(&self, _url: &str) -> Result<String> {
        Err(Error::upstream("unreachable"))
    }
}

async fn get(router: axum::Router, uri: &str) -> (StatusCode, Value) {
    let response = router
        .oneshot(
            Request::builder()
                .uri(uri)
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    (status, serde_json::from_slice(&body).expect("json body"))
}

#[tokio::test]
async fn transport_failures_surface_as_bad_gateway() {
    let client = Arc::new(FlakyClient::new(Mode::Unreachable));
    let router = tables_router(TablesState::new(client.clone()));

    let (status, body) = get(router.clone(), "/tables/census/rows/r1/map").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"]["error_code"], "BAD_GATEWAY");

    let (status, _) = get(router, "/tables/census/questions").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);

    // Questions never consult the table resource.
    assert_eq!(client.table_fetches.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn stale_schema_surfaces_as_conflict() {
    let router = tables_router(TablesState::new(Arc::new(FlakyClient::new(
        Mode::SchemaMoves,
    ))));

    let (status, body) = get(router, "/tables/census/rows/r1").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["error_code"], "CONFLICT");
}

#[tokio::test]
async fn slow_upstream_times_out() {
    let state = TablesState::with_config(
        Arc::new(FlakyClient::new(Mode::Slow { millis: 500 })),
        TablesConfig {
            request_timeout: Some(Duration::from_millis(20)),
            ..TablesConfig::default()
        },
    );

    let (status, body) = get(tables_router(state), "/tables/census/rows/r1").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"]["error_code"], "SERVICE_UNAVAILABLE");
}
