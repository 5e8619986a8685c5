//! Marshaling configuration
//!
//! Settings that influence how values are bound, most notably where text
//! switches from VARCHAR2 to CLOB.

use crate::constants::VARCHAR_MAX_SIZE;

/// Configuration for a [`MarshalRegistry`](crate::MarshalRegistry).
///
/// # Examples
///
/// ```rust
/// use oracle_udt::MarshalConfig;
///
/// let config = MarshalConfig::new()
///     .with_varchar_max_size(4000)
///     .with_large_text_for_output(false);
/// assert_eq!(config.varchar_max_size(), 4000);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarshalConfig {
    /// Longest text, in characters, that is still bound as VARCHAR2
    varchar_max_size: usize,
    /// Bind OUT and IN OUT text as CLOB instead of a sized VARCHAR2
    large_text_for_output: bool,
}

impl MarshalConfig {
    /// Create a configuration with the default limits
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the VARCHAR2 capacity in characters
    pub fn with_varchar_max_size(mut self, size: usize) -> Self {
        self.varchar_max_size = size;
        self
    }

    /// Choose whether OUT and IN OUT text binds as CLOB
    ///
    /// When disabled, output text binds as VARCHAR2 sized to
    /// [`varchar_max_size`](Self::varchar_max_size).
    pub fn with_large_text_for_output(mut self, enabled: bool) -> Self {
        self.large_text_for_output = enabled;
        self
    }

    /// VARCHAR2 capacity in characters
    pub fn varchar_max_size(&self) -> usize {
        self.varchar_max_size
    }

    /// Whether OUT and IN OUT text binds as CLOB
    pub fn large_text_for_output(&self) -> bool {
        self.large_text_for_output
    }

    /// Check if a text of `len` characters must travel as CLOB
    pub fn exceeds_varchar(&self, len: usize) -> bool {
        len > self.varchar_max_size
    }
}

impl Default for MarshalConfig {
    fn default() -> Self {
        Self {
            varchar_max_size: VARCHAR_MAX_SIZE,
            large_text_for_output: true,
        }
    }
}
