use std::fmt;

use serde::{Deserialize, Serialize};

/// Named alias used as a loop variable / reference target inside a query.
///
/// The name is emitted verbatim into query text — callers are responsible
/// for supplying a syntactically valid AQL identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryElement {
    name: String,
}

impl QueryElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for QueryElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
