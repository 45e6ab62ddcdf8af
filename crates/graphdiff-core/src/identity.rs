//! Identity keys for matching collection elements across versions.
//!
//! Collections are compared as sets keyed by logical identity, not by
//! position. An [`IdentityExtractor`] maps each element to its key; two
//! elements with equal keys are the "same" element and are diffed against
//! each other.

use std::collections::BTreeMap;

use graphdiff_types::Value;
use tracing::warn;

use crate::config::DiffConfig;

/// Maps a collection element to the key it is matched by.
pub trait IdentityExtractor: Send + Sync {
    fn identity_key(&self, item: &Value) -> Value;
}

impl<F> IdentityExtractor for F
where
    F: Fn(&Value) -> Value + Send + Sync,
{
    fn identity_key(&self, item: &Value) -> Value {
        self(item)
    }
}

/// Identity declared per bean type as a list of identifying properties.
///
/// A bean whose type declares identity properties is keyed by its projection
/// onto those properties (same type name, only those properties). Every other
/// value, including beans of undeclared types, is its own key.
///
/// If a declared property is missing or null the projection would not
/// identify anything, so the whole element becomes its key and a warning is
/// logged.
#[derive(Clone, Debug, Default)]
pub struct DeclaredIdentity {
    properties: BTreeMap<String, Vec<String>>,
}

impl DeclaredIdentity {
    pub fn new() -> Self {
        Self::default()
    }

    /// Identity declarations taken from a [`DiffConfig`].
    pub fn from_config(config: &DiffConfig) -> Self {
        Self {
            properties: config.identity.clone(),
        }
    }

    /// Declare the identifying properties of a bean type.
    pub fn declare<I, S>(mut self, type_name: impl Into<String>, properties: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.properties.insert(
            type_name.into(),
            properties.into_iter().map(Into::into).collect(),
        );
        self
    }
}

impl IdentityExtractor for DeclaredIdentity {
    fn identity_key(&self, item: &Value) -> Value {
        let Value::Bean(bean) = item else {
            return item.clone();
        };
        let Some(names) = self.properties.get(bean.type_name()) else {
            return item.clone();
        };
        if names.is_empty() {
            return item.clone();
        }
        match bean.project(names.as_slice()) {
            Some(projection) => Value::Bean(projection),
            None => {
                warn!(
                    type_name = bean.type_name(),
                    identity = ?names,
                    "identity property missing or null; matching element by full value"
                );
                item.clone()
            }
        }
    }
}
