//! # Arangorm
//!
//! A fluent AQL query builder for ArangoDB with thin store glue.
//!
//! The heart of the crate is the compiler: a chain of builder calls
//! describing a graph traversal or collection scan is turned into
//! parameterized AQL text plus a collision-free bind-variable map. The
//! compilation step is pure and synchronous — the only I/O in the crate is
//! the [`Store`] handing the compiled pair to the server.
//!
//! ```rust,ignore
//! let engine = Engine::new(Box::new(
//!     ArangoStore::connect(config, "flightGraph").await?,
//! ));
//!
//! let mut q = engine.query("flights");
//! q.inbound(DocumentId::new("airports", "BIS")).limit(100);
//! q.name_vertex("airport").name_edge("flight");
//!
//! let flight = q.edge.clone();
//! q.filter(FilterOption::new("Month", 1).target(&flight))
//!     .or(FilterOption::new("Day", 5).target(&flight).operation(">="))
//!     .and(FilterOption::new("Day", 7).target(&flight).operation("<="));
//!
//! let rows: Vec<serde_json::Value> = engine.execute(&q).await?;
//! ```
//!
//! Filter chains stay flat: `or`/`and` append a sibling condition to the
//! group they were called on and hand the same group back, so the compiled
//! clause order is exactly the call order.

pub mod error;
pub mod query;
pub mod store;

use std::sync::Arc;
use std::time::Instant;

use metrics::histogram;
use serde::{Serialize, de::DeserializeOwned};

pub use crate::error::Error;
pub use crate::query::{
    BindValue, BindVars, CompiledQuery, Direction, DocumentId, Filter, FilterOption, Query,
    QueryElement, QueryKind, ToBindValue,
};
pub use crate::store::{ArangoStore, Config, DocumentMeta, EdgeDefinition, GraphOptions, Store};

/// The Engine is the primary interface for querying and maintaining graph
/// documents. It abstracts away the wire details behind a [`Store`] and
/// decodes rows into caller types.
#[derive(Clone)]
pub struct Engine {
    inner: Arc<Arangorm>,
}

struct Arangorm {
    store: Box<dyn Store>,
}

impl Engine {
    pub fn new(store: Box<dyn Store>) -> Self {
        Self {
            inner: Arc::new(Arangorm { store }),
        }
    }

    // ==================== Queries ====================

    /// Start a fluent query against `collection`.
    pub fn query(&self, collection: impl Into<String>) -> Query {
        Query::new(collection)
    }

    /// Compile `query` and hand it to the store, decoding each row.
    ///
    /// Compile errors and store errors surface unchanged.
    pub async fn execute<T: DeserializeOwned>(&self, query: &Query) -> Result<Vec<T>, Error> {
        let compiled = query.compile()?;

        let start = Instant::now();
        let rows = self
            .inner
            .store
            .execute(&compiled.text, &compiled.bind_vars)
            .await?;
        histogram!("arangorm.query.duration_ms",
            "collection" => query.collection().to_string()
        )
        .record(start.elapsed().as_millis() as f64);

        rows.into_iter()
            .map(|row| {
                serde_json::from_value(row).map_err(|err| Error::Deserialize(err.to_string()))
            })
            .collect()
    }

    // ==================== Vertex CRUD ====================

    pub async fn create_vertex<T: Serialize>(
        &self,
        collection: &str,
        document: &T,
    ) -> Result<DocumentMeta, Error> {
        let value = Self::encode(document)?;
        self.inner.store.create_vertex(collection, &value).await
    }

    pub async fn fetch_vertex<T: DeserializeOwned>(
        &self,
        collection: &str,
        key: &str,
    ) -> Result<T, Error> {
        let row = self.inner.store.fetch_vertex(collection, key).await?;
        Self::decode(row)
    }

    pub async fn update_vertex<T: Serialize>(
        &self,
        collection: &str,
        key: &str,
        document: &T,
    ) -> Result<DocumentMeta, Error> {
        let value = Self::encode(document)?;
        self.inner
            .store
            .update_vertex(collection, key, &value)
            .await
    }

    pub async fn remove_vertex(&self, collection: &str, key: &str) -> Result<(), Error> {
        self.inner.store.remove_vertex(collection, key).await
    }

    // ==================== Edge CRUD ====================

    pub async fn create_edge<T: Serialize>(
        &self,
        collection: &str,
        document: &T,
    ) -> Result<DocumentMeta, Error> {
        let value = Self::encode(document)?;
        self.inner.store.create_edge(collection, &value).await
    }

    /// Bulk insert into an edge collection.
    pub async fn create_edges<T: Serialize>(
        &self,
        collection: &str,
        documents: &[T],
    ) -> Result<Vec<DocumentMeta>, Error> {
        let values = documents
            .iter()
            .map(Self::encode)
            .collect::<Result<Vec<_>, _>>()?;
        self.inner.store.create_edges(collection, &values).await
    }

    pub async fn fetch_edge<T: DeserializeOwned>(
        &self,
        collection: &str,
        key: &str,
    ) -> Result<T, Error> {
        let row = self.inner.store.fetch_edge(collection, key).await?;
        Self::decode(row)
    }

    pub async fn update_edge<T: Serialize>(
        &self,
        collection: &str,
        key: &str,
        document: &T,
    ) -> Result<DocumentMeta, Error> {
        let value = Self::encode(document)?;
        self.inner.store.update_edge(collection, key, &value).await
    }

    pub async fn remove_edge(&self, collection: &str, key: &str) -> Result<(), Error> {
        self.inner.store.remove_edge(collection, key).await
    }

    // ==================== Helpers ====================

    fn encode<T: Serialize>(document: &T) -> Result<serde_json::Value, Error> {
        serde_json::to_value(document).map_err(|err| Error::Serialize(err.to_string()))
    }

    fn decode<T: DeserializeOwned>(row: serde_json::Value) -> Result<T, Error> {
        serde_json::from_value(row).map_err(|err| Error::Deserialize(err.to_string()))
    }
}
