use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::{
    error::Error,
    query::BindVars,
    store::{DocumentMeta, Store},
};

/// Connection settings for an ArangoDB deployment.
#[derive(Debug, Clone)]
pub struct Config {
    pub endpoints: Vec<String>,
    pub username: String,
    pub password: String,
    pub database: String,
}

/// Edge collection registered when the named graph is first created.
#[derive(Debug, Clone, Serialize)]
pub struct EdgeDefinition {
    pub collection: String,
    pub from: Vec<String>,
    pub to: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct GraphOptions {
    #[serde(rename = "edgeDefinitions")]
    pub edge_definitions: Vec<EdgeDefinition>,
}

#[derive(Debug, Deserialize)]
struct CursorResponse {
    #[serde(default)]
    result: Vec<Value>,
    #[serde(rename = "hasMore", default)]
    has_more: bool,
    id: Option<String>,
}

/// HTTP store over the ArangoDB REST API.
///
/// Thin glue only: opens the connection, bootstraps the database and graph
/// on first use, runs compiled queries through the cursor API and wraps the
/// gharial per-document CRUD. No pooling, no retries, no timeouts of its own.
pub struct ArangoStore {
    client: Client,
    endpoint: String,
    username: String,
    password: String,
    database: String,
    graph: String,
}

impl ArangoStore {
    /// Opens the connection and creates the database if it does not exist yet.
    pub async fn connect(config: Config, graph: impl Into<String>) -> Result<Self, Error> {
        let endpoint = config
            .endpoints
            .first()
            .ok_or_else(|| Error::Store("no endpoint configured".to_string()))?
            .trim_end_matches('/')
            .to_string();

        let store = Self {
            client: Client::new(),
            endpoint,
            username: config.username,
            password: config.password,
            database: config.database,
            graph: graph.into(),
        };

        store.ensure_database().await?;
        Ok(store)
    }

    /// Creates the named graph with its edge definitions if absent.
    pub async fn ensure_graph(&self, options: GraphOptions) -> Result<(), Error> {
        let url = format!("{}/_api/gharial/{}", self.db_url(), self.graph);
        let (status, body) = self.request(Method::GET, url, None).await?;
        if status.is_success() {
            return Ok(());
        }
        if status != StatusCode::NOT_FOUND {
            return Err(Self::server_error(status, &body));
        }

        let payload = serde_json::json!({
            "name": self.graph,
            "edgeDefinitions": options.edge_definitions,
        });
        let url = format!("{}/_api/gharial", self.db_url());
        let (status, body) = self.request(Method::POST, url, Some(payload)).await?;
        Self::check(status, &body)
    }

    async fn ensure_database(&self) -> Result<(), Error> {
        let url = format!("{}/_db/_system/_api/database", self.endpoint);
        let (status, body) = self.request(Method::GET, url.clone(), None).await?;
        Self::check(status, &body)?;

        let existing: Vec<String> = body
            .get("result")
            .cloned()
            .map(serde_json::from_value)
            .transpose()
            .map_err(|err| Error::Deserialize(err.to_string()))?
            .unwrap_or_default();
        if existing.contains(&self.database) {
            return Ok(());
        }

        let payload = serde_json::json!({
            "name": self.database,
            "users": [{ "username": self.username, "passwd": self.password }],
        });
        let (status, body) = self.request(Method::POST, url, Some(payload)).await?;
        Self::check(status, &body)
    }

    fn db_url(&self) -> String {
        format!("{}/_db/{}", self.endpoint, self.database)
    }

    async fn request(
        &self,
        method: Method,
        url: String,
        body: Option<Value>,
    ) -> Result<(StatusCode, Value), Error> {
        let mut request = self
            .client
            .request(method, &url)
            .basic_auth(&self.username, Some(&self.password));
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request
            .send()
            .await
            .map_err(|err| Error::Store(err.to_string()))?;
        let status = response.status();
        let body = response
            .json::<Value>()
            .await
            .map_err(|err| Error::Store(err.to_string()))?;
        Ok((status, body))
    }

    fn check(status: StatusCode, body: &Value) -> Result<(), Error> {
        if status.is_success() {
            return Ok(());
        }
        Err(Self::server_error(status, body))
    }

    fn server_error(status: StatusCode, body: &Value) -> Error {
        let message = body
            .get("errorMessage")
            .and_then(Value::as_str)
            .unwrap_or("unknown server error");
        Error::Store(format!("{}: {}", status, message))
    }

    fn meta_from(body: &Value, field: &str) -> Result<DocumentMeta, Error> {
        let meta = body
            .get(field)
            .cloned()
            .ok_or_else(|| Error::Deserialize(format!("response missing `{}`", field)))?;
        serde_json::from_value(meta).map_err(|err| Error::Deserialize(err.to_string()))
    }

    async fn fetch_document(
        &self,
        kind: &str,
        collection: &str,
        key: &str,
    ) -> Result<Value, Error> {
        let url = format!(
            "{}/_api/gharial/{}/{}/{}/{}",
            self.db_url(),
            self.graph,
            kind,
            collection,
            key
        );
        let (status, body) = self.request(Method::GET, url, None).await?;
        Self::check(status, &body)?;
        body.get(kind)
            .cloned()
            .ok_or_else(|| Error::Deserialize(format!("response missing `{}`", kind)))
    }

    async fn create_document(
        &self,
        kind: &str,
        collection: &str,
        document: &Value,
    ) -> Result<DocumentMeta, Error> {
        let url = format!(
            "{}/_api/gharial/{}/{}/{}",
            self.db_url(),
            self.graph,
            kind,
            collection
        );
        let (status, body) = self
            .request(Method::POST, url, Some(document.clone()))
            .await?;
        Self::check(status, &body)?;
        Self::meta_from(&body, kind)
    }

    async fn update_document(
        &self,
        kind: &str,
        collection: &str,
        key: &str,
        document: &Value,
    ) -> Result<DocumentMeta, Error> {
        let url = format!(
            "{}/_api/gharial/{}/{}/{}/{}",
            self.db_url(),
            self.graph,
            kind,
            collection,
            key
        );
        let (status, body) = self
            .request(Method::PATCH, url, Some(document.clone()))
            .await?;
        Self::check(status, &body)?;
        Self::meta_from(&body, kind)
    }

    async fn remove_document(&self, kind: &str, collection: &str, key: &str) -> Result<(), Error> {
        let url = format!(
            "{}/_api/gharial/{}/{}/{}/{}",
            self.db_url(),
            self.graph,
            kind,
            collection,
            key
        );
        let (status, body) = self.request(Method::DELETE, url, None).await?;
        Self::check(status, &body)
    }
}

#[async_trait]
impl Store for ArangoStore {
    async fn execute(&self, query: &str, bind_vars: &BindVars) -> Result<Vec<Value>, Error> {
        debug!(query, "executing query");

        let url = format!("{}/_api/cursor", self.db_url());
        let payload = serde_json::json!({ "query": query, "bindVars": bind_vars });
        let (status, body) = self.request(Method::POST, url, Some(payload)).await?;
        Self::check(status, &body)?;

        let mut cursor: CursorResponse =
            serde_json::from_value(body).map_err(|err| Error::Deserialize(err.to_string()))?;
        let mut rows = cursor.result;

        while cursor.has_more {
            let id = cursor
                .id
                .as_deref()
                .ok_or_else(|| Error::Store("cursor continuation without id".to_string()))?;
            let url = format!("{}/_api/cursor/{}", self.db_url(), id);
            let (status, body) = self.request(Method::PUT, url, None).await?;
            Self::check(status, &body)?;
            cursor =
                serde_json::from_value(body).map_err(|err| Error::Deserialize(err.to_string()))?;
            rows.append(&mut cursor.result);
        }

        Ok(rows)
    }

    async fn fetch_vertex(&self, collection: &str, key: &str) -> Result<Value, Error> {
        self.fetch_document("vertex", collection, key).await
    }

    async fn create_vertex(
        &self,
        collection: &str,
        document: &Value,
    ) -> Result<DocumentMeta, Error> {
        self.create_document("vertex", collection, document).await
    }

    async fn update_vertex(
        &self,
        collection: &str,
        key: &str,
        document: &Value,
    ) -> Result<DocumentMeta, Error> {
        self.update_document("vertex", collection, key, document)
            .await
    }

    async fn remove_vertex(&self, collection: &str, key: &str) -> Result<(), Error> {
        self.remove_document("vertex", collection, key).await
    }

    async fn fetch_edge(&self, collection: &str, key: &str) -> Result<Value, Error> {
        self.fetch_document("edge", collection, key).await
    }

    async fn create_edge(&self, collection: &str, document: &Value) -> Result<DocumentMeta, Error> {
        self.create_document("edge", collection, document).await
    }

    async fn create_edges(
        &self,
        collection: &str,
        documents: &[Value],
    ) -> Result<Vec<DocumentMeta>, Error> {
        // The graph API has no bulk endpoint; the document API keeps edge
        // semantics as long as _from/_to are present on each document.
        let url = format!("{}/_api/document/{}", self.db_url(), collection);
        let (status, body) = self
            .request(Method::POST, url, Some(Value::Array(documents.to_vec())))
            .await?;
        Self::check(status, &body)?;

        let rows: Vec<Value> =
            serde_json::from_value(body).map_err(|err| Error::Deserialize(err.to_string()))?;
        rows.into_iter()
            .map(|row| {
                if row.get("error").and_then(Value::as_bool).unwrap_or(false) {
                    let message = row
                        .get("errorMessage")
                        .and_then(Value::as_str)
                        .unwrap_or("bulk insert failed")
                        .to_string();
                    return Err(Error::Store(message));
                }
                serde_json::from_value(row).map_err(|err| Error::Deserialize(err.to_string()))
            })
            .collect()
    }

    async fn update_edge(
        &self,
        collection: &str,
        key: &str,
        document: &Value,
    ) -> Result<DocumentMeta, Error> {
        self.update_document("edge", collection, key, document)
            .await
    }

    async fn remove_edge(&self, collection: &str, key: &str) -> Result<(), Error> {
        self.remove_document("edge", collection, key).await
    }
}
