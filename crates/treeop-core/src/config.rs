//! Operator configuration types.

use std::path::Path;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// Default block size for streamed file copies.
pub const DEFAULT_BUFFER_SIZE: usize = 8192;

/// How the destination-inside-source guard compares canonical paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AncestryCheck {
    /// Raw string prefix: `/a/b2` counts as inside `/a/b`.
    #[default]
    Textual,
    /// Whole path components only.
    Components,
}

impl AncestryCheck {
    /// Check whether `dst` is considered to lie inside `src`.
    pub fn is_inside(&self, src: &Path, dst: &Path) -> bool {
        match self {
            Self::Textual => dst
                .as_os_str()
                .as_encoded_bytes()
                .starts_with(src.as_os_str().as_encoded_bytes()),
            Self::Components => dst.starts_with(src),
        }
    }
}

/// Configuration for a tree operator.
#[derive(Debug, Clone, PartialEq, Eq, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct OperatorConfig {
    /// Emit a trace event for every traversal step.
    #[builder(default = "false")]
    #[serde(default)]
    pub debug_trace: bool,

    /// Actually remove entries. When false, removals are only counted.
    #[builder(default = "true")]
    #[serde(default = "default_true")]
    pub deletion_enabled: bool,

    /// Block size for streamed file copies.
    #[builder(default = "DEFAULT_BUFFER_SIZE")]
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,

    /// Comparison used by the destination-inside-source guard.
    #[builder(default)]
    #[serde(default)]
    pub ancestry_check: AncestryCheck,

    /// Maximum collision-rename attempts (None = unlimited).
    #[builder(default)]
    #[serde(default)]
    pub rename_limit: Option<u64>,
}

fn default_true() -> bool {
    true
}

fn default_buffer_size() -> usize {
    DEFAULT_BUFFER_SIZE
}

impl OperatorConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if self.buffer_size == Some(0) {
            return Err("Buffer size must be greater than zero".to_string());
        }
        if self.rename_limit == Some(Some(0)) {
            return Err("Rename limit must be greater than zero".to_string());
        }
        Ok(())
    }
}

impl OperatorConfig {
    /// Create a new config builder.
    pub fn builder() -> OperatorConfigBuilder {
        OperatorConfigBuilder::default()
    }

    /// Default config: deletion enabled, no tracing.
    pub fn new() -> Self {
        Self {
            debug_trace: false,
            deletion_enabled: true,
            buffer_size: DEFAULT_BUFFER_SIZE,
            ancestry_check: AncestryCheck::Textual,
            rename_limit: None,
        }
    }

    /// Config with deletion disabled.
    pub fn safe() -> Self {
        Self::new().with_deletion_enabled(false)
    }

    /// Set debug tracing.
    pub fn with_debug_trace(mut self, debug_trace: bool) -> Self {
        self.debug_trace = debug_trace;
        self
    }

    /// Set whether removals are performed.
    pub fn with_deletion_enabled(mut self, deletion_enabled: bool) -> Self {
        self.deletion_enabled = deletion_enabled;
        self
    }
}

impl Default for OperatorConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = OperatorConfig::builder()
            .debug_trace(true)
            .buffer_size(4096usize)
            .rename_limit(Some(10u64))
            .build()
            .unwrap();

        assert!(config.debug_trace);
        assert!(config.deletion_enabled);
        assert_eq!(config.buffer_size, 4096);
        assert_eq!(config.rename_limit, Some(10));
        assert_eq!(config.ancestry_check, AncestryCheck::Textual);
    }

    #[test]
    fn test_config_builder_rejects_zero_buffer() {
        let result = OperatorConfig::builder().buffer_size(0usize).build();
        assert!(result.is_err());
    }

    #[test]
    fn test_config_builder_rejects_zero_rename_limit() {
        let result = OperatorConfig::builder().rename_limit(Some(0u64)).build();
        assert!(result.is_err());
    }

    #[test]
    fn test_safe_config() {
        let config = OperatorConfig::safe();
        assert!(!config.deletion_enabled);
        assert!(!config.debug_trace);
        assert_eq!(config.buffer_size, DEFAULT_BUFFER_SIZE);
    }

    #[test]
    fn test_textual_ancestry_is_string_prefix() {
        let check = AncestryCheck::Textual;
        assert!(check.is_inside(Path::new("/a/b"), Path::new("/a/b/c")));
        assert!(check.is_inside(Path::new("/a/b"), Path::new("/a/b")));
        assert!(check.is_inside(Path::new("/a/b"), Path::new("/a/b2")));
        assert!(!check.is_inside(Path::new("/a/b"), Path::new("/a")));
    }

    #[test]
    fn test_component_ancestry() {
        let check = AncestryCheck::Components;
        assert!(check.is_inside(Path::new("/a/b"), Path::new("/a/b/c")));
        assert!(!check.is_inside(Path::new("/a/b"), Path::new("/a/b2")));
    }
}
