use crate::types::Target;
use serde::{Deserialize, Deserializer};
use serde_yaml_ng::Value;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LockError {
    #[error("failed to read lockfile: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse lockfile: {0}")]
    Parse(#[from] serde_yaml_ng::Error),
}

/// Read-only view of a conda-lock document.
///
/// Only the keys needed to derive an environment are modelled; everything
/// else conda-lock records (hashes, dependency graphs, sources) is ignored.
/// Every level is optional so that partial lockfiles still parse.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct LockDocument {
    #[serde(default)]
    pub metadata: Option<LockMetadata>,
    #[serde(default)]
    pub package: Option<Vec<PackageRecord>>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct LockMetadata {
    #[serde(default, deserialize_with = "mapping_entries")]
    pub channels: Option<Vec<ChannelEntry>>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct ChannelEntry {
    #[serde(default, deserialize_with = "lenient_scalar")]
    pub url: Option<String>,
}

/// One pinned package for one platform.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct PackageRecord {
    #[serde(default, deserialize_with = "lenient_scalar")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_scalar")]
    pub version: Option<String>,
    #[serde(default, deserialize_with = "lenient_scalar")]
    pub manager: Option<String>,
    #[serde(default, deserialize_with = "lenient_scalar")]
    pub platform: Option<String>,
}

impl PackageRecord {
    /// `name=version` when both fields are present and non-empty.
    pub fn pin(&self) -> Option<String> {
        let name = self.name.as_deref().filter(|s| !s.is_empty())?;
        let version = self.version.as_deref().filter(|s| !s.is_empty())?;
        Some(format!("{name}={version}"))
    }
}

impl LockDocument {
    /// Channel URLs in declaration order, one per entry that carries a url.
    pub fn channel_urls(&self) -> Vec<String> {
        self.metadata
            .as_ref()
            .and_then(|m| m.channels.as_deref())
            .unwrap_or_default()
            .iter()
            .filter_map(|c| c.url.clone())
            .collect()
    }

    /// Package records solved for `target`, in lockfile order.
    pub fn packages_for<'a>(
        &'a self,
        target: &'a Target,
    ) -> impl Iterator<Item = &'a PackageRecord> + 'a {
        self.package
            .as_deref()
            .unwrap_or_default()
            .iter()
            .filter(move |p| target.matches(p.platform.as_deref(), p.manager.as_deref()))
    }

    pub fn package_count(&self) -> usize {
        self.package.as_ref().map_or(0, Vec::len)
    }
}

/// Accept any YAML scalar as text: unquoted versions such as `2.1` arrive as
/// numbers. Null and collections are treated as absent.
fn lenient_scalar<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}

/// Keep only mapping entries of a sequence; bare scalars such as
/// `channels: [conda-forge]` carry no url and are skipped.
fn mapping_entries<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let Some(items) = Option::<Vec<Value>>::deserialize(deserializer)? else {
        return Ok(None);
    };
    items
        .into_iter()
        .filter(Value::is_mapping)
        .map(|v| serde_yaml_ng::from_value(v).map_err(serde::de::Error::custom))
        .collect::<Result<Vec<T>, D::Error>>()
        .map(Some)
}

pub fn parse_lock_str(input: &str) -> Result<LockDocument, LockError> {
    Ok(serde_yaml_ng::from_str(input)?)
}

pub fn parse_lock_file(path: impl AsRef<Path>) -> Result<LockDocument, LockError> {
    let content = fs::read_to_string(path)?;
    parse_lock_str(&content)
}
