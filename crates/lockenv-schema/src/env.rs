use crate::types::Platform;
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EnvError {
    #[error("failed to serialize environment: {0}")]
    Serialize(#[source] serde_yaml_ng::Error),
    #[error("failed to parse environment file: {0}")]
    Parse(#[source] serde_yaml_ng::Error),
}

/// Environment definition consumed by `conda env create` and ASV.
///
/// Field order is the emission order: `name`, `channels`, `dependencies`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EnvDocument {
    pub name: String,
    pub channels: Vec<String>,
    pub dependencies: Vec<String>,
}

/// Provenance written as a comment block above the YAML body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvHeader {
    /// File name of the lockfile the environment was derived from.
    pub source: String,
    pub platform: Platform,
    /// Command line that regenerates the file.
    pub regenerate: String,
}

impl EnvHeader {
    fn write_to(&self, out: &mut String, package_count: usize) {
        // Writing into a String cannot fail.
        let _ = writeln!(
            out,
            "# This file is auto-generated from {} for ASV benchmarks",
            self.source
        );
        out.push_str("# DO NOT EDIT MANUALLY\n");
        out.push_str("#\n");
        out.push_str("# To regenerate this file, run:\n");
        let _ = writeln!(out, "#   {}", self.regenerate);
        out.push_str("#\n");
        let _ = writeln!(out, "# Source: {} ({} platform)", self.source, self.platform);
        let _ = writeln!(out, "# Total packages: {package_count}");
        out.push_str("#\n\n");
    }
}

impl EnvDocument {
    /// Header comments followed by the block-style YAML body.
    ///
    /// Output is a pure function of `self` and `header`, so regenerating from
    /// an unchanged lockfile yields identical bytes.
    pub fn render(&self, header: &EnvHeader) -> Result<String, EnvError> {
        let body = serde_yaml_ng::to_string(self).map_err(EnvError::Serialize)?;
        let mut out = String::with_capacity(body.len() + 320);
        header.write_to(&mut out, self.dependencies.len());
        out.push_str(&body);
        Ok(out)
    }
}

/// Parse a generated environment file. Header comments are skipped by the
/// YAML parser.
pub fn parse_env_str(input: &str) -> Result<EnvDocument, EnvError> {
    serde_yaml_ng::from_str(input).map_err(EnvError::Parse)
}
