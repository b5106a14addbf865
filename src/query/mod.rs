mod element;
mod filter;
mod params;
mod value;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use element::QueryElement;
pub use filter::{Filter, FilterOption};
pub use params::BindVars;
pub use value::{BindValue, ToBindValue};

use crate::error::Error;

/// -----------------------------
/// Query plan (store contract)
/// -----------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum QueryKind {
    #[default]
    Document,
    Edge,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Direction {
    #[default]
    Inbound,
    Outbound,
    Any,
}

impl Direction {
    fn render(self) -> &'static str {
        match self {
            Direction::Inbound => "INBOUND",
            Direction::Outbound => "OUTBOUND",
            Direction::Any => "ANY",
        }
    }
}

/// Fully qualified document handle of the form `collection/key`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn new(collection: &str, key: &str) -> Self {
        Self(format!("{}/{}", collection, key))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for DocumentId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for DocumentId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Compiled artifact handed to the store: parameterized AQL text plus its
/// bind-variable map.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledQuery {
    pub text: String,
    pub bind_vars: BindVars,
}

/// Fluent traversal/scan builder.
///
/// Single-use by convention: built up through chained calls, compiled, then
/// discarded. Compilation itself is pure — it holds no pass-local state on
/// the builder, so compiling the same unmutated builder twice yields
/// identical output.
#[derive(Debug, Clone)]
pub struct Query {
    collection: String,
    kind: QueryKind,
    direction: Direction,
    depth: String,
    start_vertex: DocumentId,
    limit: u32,
    returns: Vec<String>,
    filters: Vec<Filter>,
    pub document: QueryElement,
    pub vertex: QueryElement,
    pub edge: QueryElement,
}

impl Query {
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            kind: QueryKind::default(),
            direction: Direction::default(),
            depth: String::new(),
            start_vertex: DocumentId::default(),
            limit: 0,
            returns: Vec::new(),
            filters: Vec::new(),
            document: QueryElement::new("document"),
            vertex: QueryElement::new("vertex"),
            edge: QueryElement::new("edge"),
        }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn kind(&self) -> QueryKind {
        self.kind
    }

    // ==================== Aliases ====================

    pub fn name_document(&mut self, name: impl Into<String>) -> &mut Self {
        self.document = QueryElement::new(name);
        self
    }

    pub fn name_vertex(&mut self, name: impl Into<String>) -> &mut Self {
        self.vertex = QueryElement::new(name);
        self
    }

    pub fn name_edge(&mut self, name: impl Into<String>) -> &mut Self {
        self.edge = QueryElement::new(name);
        self
    }

    // ==================== Traversal ====================

    pub fn inbound(&mut self, vertex: impl Into<DocumentId>) -> &mut Self {
        self.walk(Direction::Inbound, vertex.into())
    }

    pub fn outbound(&mut self, vertex: impl Into<DocumentId>) -> &mut Self {
        self.walk(Direction::Outbound, vertex.into())
    }

    pub fn any(&mut self, vertex: impl Into<DocumentId>) -> &mut Self {
        self.walk(Direction::Any, vertex.into())
    }

    fn walk(&mut self, direction: Direction, vertex: DocumentId) -> &mut Self {
        self.kind = QueryKind::Edge;
        self.direction = direction;
        self.start_vertex = vertex;
        self
    }

    /// Traversal depth segment, emitted verbatim between the direction and
    /// the start vertex (e.g. `1..3`). Empty by default.
    pub fn depth(&mut self, depth: impl Into<String>) -> &mut Self {
        self.depth = depth.into();
        self
    }

    // ==================== Shaping ====================

    /// Caps the result set. Zero means no limit clause.
    pub fn limit(&mut self, limit: u32) -> &mut Self {
        self.limit = limit;
        self
    }

    /// Appends one projection expression to the RETURN block, in call order.
    pub fn returns(&mut self, expression: impl Into<String>) -> &mut Self {
        self.returns.push(expression.into());
        self
    }

    /// Starts a new top-level filter group and returns its handle for
    /// `and`/`or` chaining.
    pub fn filter(&mut self, option: FilterOption) -> &mut Filter {
        self.filters.push(Filter::group(option));
        self.filters.last_mut().expect("group just pushed")
    }

    // ==================== Compilation ====================

    /// Compiles the accumulated state into query text plus bind variables.
    ///
    /// Pure and synchronous: each pass allocates its own key counter and
    /// accumulates into its own map, so independent builders compile
    /// concurrently without coordination.
    pub fn compile(&self) -> Result<CompiledQuery, Error> {
        let mut text = String::from("\nFOR\t");
        let mut bind_vars = BindVars::new();

        match self.kind {
            QueryKind::Edge => text.push_str(&format!("{}, {}\t", self.vertex, self.edge)),
            QueryKind::Document => text.push_str(&format!("{}\t", self.document)),
        }

        text.push_str("IN\t");

        if self.kind == QueryKind::Edge {
            if self.start_vertex.is_empty() {
                return Err(Error::MissingDirective);
            }
            text.push_str(&format!(
                "{}\t{}\t'{}'\t",
                self.direction.render(),
                self.depth,
                self.start_vertex
            ));
        }

        text.push_str(&self.collection);
        text.push('\n');

        let mut counter = 0usize;
        for group in &self.filters {
            let (clause, params) = group.compile(&self.document, &mut counter)?;
            bind_vars.merge(params)?;
            text.push_str(&clause);
        }

        if self.limit > 0 {
            text.push_str("LIMIT @_limit\n");
            bind_vars.insert("_limit".to_string(), BindValue::Int(self.limit as i64))?;
        }

        text.push_str("RETURN\t");
        if self.returns.is_empty() {
            match self.kind {
                QueryKind::Edge => {
                    text.push_str(&format!("{{{}, {}}}", self.vertex, self.edge));
                }
                QueryKind::Document => text.push_str(self.document.name()),
            }
        } else {
            text.push_str("{\n\t");
            text.push_str(&self.returns.join(",\n\t"));
            text.push_str("\n}\n");
        }

        Ok(CompiledQuery { text, bind_vars })
    }
}
