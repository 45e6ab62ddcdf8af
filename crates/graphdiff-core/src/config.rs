//! Comparison settings, loadable from TOML.

use std::collections::{BTreeMap, BTreeSet};

use graphdiff_types::{Path, PathElement};
use serde::{Deserialize, Serialize};

use crate::error::{DiffError, DiffResult};

/// Configuration for an [`ObjectDiffer`](crate::ObjectDiffer).
///
/// Every field defaults to empty, which compares everything and matches
/// collection elements by their full value. A TOML file looks like:
///
/// ```toml
/// ignored_properties = ["updated_at"]
/// excluded_paths = ["/owner/password"]
/// equals_only_types = ["Money"]
///
/// [identity]
/// Person = ["id"]
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffConfig {
    /// Bean type name to the properties that identify an instance inside a
    /// collection.
    pub identity: BTreeMap<String, Vec<String>>,
    /// Property names skipped wherever they occur.
    pub ignored_properties: BTreeSet<String>,
    /// Paths skipped along with their subtrees. Written in display form in
    /// TOML and parsed on load.
    #[serde(with = "path_strings")]
    pub excluded_paths: BTreeSet<Path>,
    /// Bean types compared by equality instead of property by property.
    pub equals_only_types: BTreeSet<String>,
}

impl DiffConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> DiffResult<Self> {
        toml::from_str(text).map_err(|e| DiffError::Config(e.to_string()))
    }

    /// Read and parse a TOML configuration file.
    pub fn load(path: impl AsRef<std::path::Path>) -> DiffResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn with_identity<I, S>(mut self, type_name: impl Into<String>, properties: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.identity.insert(
            type_name.into(),
            properties.into_iter().map(Into::into).collect(),
        );
        self
    }

    pub fn ignore_property(mut self, name: impl Into<String>) -> Self {
        self.ignored_properties.insert(name.into());
        self
    }

    pub fn exclude_path(mut self, path: &Path) -> Self {
        self.excluded_paths.insert(path.clone());
        self
    }

    pub fn equals_only(mut self, type_name: impl Into<String>) -> Self {
        self.equals_only_types.insert(type_name.into());
        self
    }

    /// Returns `true` if `path` names an ignored property or an excluded path.
    pub fn is_excluded(&self, path: &Path) -> bool {
        if let Some(PathElement::Property(name)) = path.last() {
            if self.ignored_properties.contains(name) {
                return true;
            }
        }
        self.excluded_paths.contains(path)
    }

    pub fn is_equals_only(&self, type_name: &str) -> bool {
        self.equals_only_types.contains(type_name)
    }
}

mod path_strings {
    use std::collections::BTreeSet;

    use graphdiff_types::Path;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(paths: &BTreeSet<Path>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(paths.iter().map(ToString::to_string))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<BTreeSet<Path>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Vec::<String>::deserialize(deserializer)?
            .iter()
            .map(|text| text.parse::<Path>().map_err(serde::de::Error::custom))
            .collect()
    }
}
