pub mod arango;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use arango::{ArangoStore, Config, EdgeDefinition, GraphOptions};

use crate::{error::Error, query::BindVars};

/// Document metadata the server reports on write operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentMeta {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_key")]
    pub key: String,
    #[serde(rename = "_rev")]
    pub rev: String,
}

/// -----------------------------
/// Store contract
/// -----------------------------
///
/// The only component that performs I/O. Everything above it hands over a
/// compiled text/bind-vars pair or a plain JSON document and gets raw rows
/// back; retries, timeouts and cancellation are the caller's business.
#[async_trait]
pub trait Store: Send + Sync + 'static {
    /* ---------------- QUERIES ---------------- */

    /// Runs a compiled query and drains the server-side cursor.
    async fn execute(
        &self,
        query: &str,
        bind_vars: &BindVars,
    ) -> Result<Vec<serde_json::Value>, Error>;

    /* ---------------- VERTICES ---------------- */

    async fn fetch_vertex(&self, collection: &str, key: &str)
    -> Result<serde_json::Value, Error>;

    async fn create_vertex(
        &self,
        collection: &str,
        document: &serde_json::Value,
    ) -> Result<DocumentMeta, Error>;

    async fn update_vertex(
        &self,
        collection: &str,
        key: &str,
        document: &serde_json::Value,
    ) -> Result<DocumentMeta, Error>;

    async fn remove_vertex(&self, collection: &str, key: &str) -> Result<(), Error>;

    /* ---------------- EDGES ---------------- */

    async fn fetch_edge(&self, collection: &str, key: &str) -> Result<serde_json::Value, Error>;

    async fn create_edge(
        &self,
        collection: &str,
        document: &serde_json::Value,
    ) -> Result<DocumentMeta, Error>;

    /// Bulk insert into an edge collection, one meta per inserted document.
    async fn create_edges(
        &self,
        collection: &str,
        documents: &[serde_json::Value],
    ) -> Result<Vec<DocumentMeta>, Error>;

    async fn update_edge(
        &self,
        collection: &str,
        key: &str,
        document: &serde_json::Value,
    ) -> Result<DocumentMeta, Error>;

    async fn remove_edge(&self, collection: &str, key: &str) -> Result<(), Error>;
}
