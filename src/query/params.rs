use std::collections::BTreeMap;

use serde::Serialize;

use crate::{error::Error, query::value::BindValue};

/// Bind-variable map for one compiled query.
///
/// Inserts are collision-checked: a key that already exists is an invariant
/// violation, never a silent overwrite. The monotonic key counter makes a
/// clash impossible in practice, but the check is enforced regardless.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct BindVars(BTreeMap<String, BindValue>);

impl BindVars {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: String, value: BindValue) -> Result<(), Error> {
        if self.0.contains_key(&key) {
            return Err(Error::ParameterCollision(key));
        }
        self.0.insert(key, value);
        Ok(())
    }

    /// Folds `other` into this map, failing on the first duplicate key.
    pub fn merge(&mut self, other: BindVars) -> Result<(), Error> {
        for (key, value) in other.0 {
            self.insert(key, value)?;
        }
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&BindValue> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &BindValue)> {
        self.0.iter()
    }
}
