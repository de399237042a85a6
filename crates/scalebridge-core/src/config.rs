//! Configuration types for the transcoder
//!
//! This module defines the conversion policy knobs and the state store
//! selection used by front ends.

use serde::{Deserialize, Serialize};

/// Largest supported decimal precision for float normalization.
///
/// Beyond 15 fractional digits an `f64` can no longer round-trip through a
/// decimal string, so rounding stops being idempotent.
pub const MAX_FLOAT_PRECISION: u32 = 15;

/// Main configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Conversion policy
    #[serde(default)]
    pub transcode: TranscodeConfig,

    /// State store configuration
    #[serde(default)]
    pub state_store: StateStoreConfig,
}

impl BridgeConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        self.transcode.validate()?;
        self.state_store.validate()?;
        Ok(())
    }
}

/// Conversion policy shared by the forward and reverse transcoders
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscodeConfig {
    /// Fractional digits kept when a Float is written into a domain float
    #[serde(default = "default_float_precision")]
    pub float_precision: u32,

    /// How an absent optional domain field is encoded
    #[serde(default)]
    pub absent: AbsentPolicy,

    /// How an Int64 that does not fit a narrower domain integer is handled
    #[serde(default)]
    pub narrowing: NarrowingPolicy,
}

impl TranscodeConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self {
            float_precision: default_float_precision(),
            absent: AbsentPolicy::default(),
            narrowing: NarrowingPolicy::default(),
        }
    }

    /// Set the float precision
    pub fn with_float_precision(mut self, digits: u32) -> Self {
        self.float_precision = digits;
        self
    }

    /// Set the absent-optional policy
    pub fn with_absent(mut self, absent: AbsentPolicy) -> Self {
        self.absent = absent;
        self
    }

    /// Set the integer narrowing policy
    pub fn with_narrowing(mut self, narrowing: NarrowingPolicy) -> Self {
        self.narrowing = narrowing;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.float_precision > MAX_FLOAT_PRECISION {
            return Err(crate::Error::config(format!(
                "float_precision must be at most {}, got {}",
                MAX_FLOAT_PRECISION, self.float_precision
            )));
        }
        Ok(())
    }
}

impl Default for TranscodeConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Encoding of a `None` optional domain field
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbsentPolicy {
    /// Emit tri-state `Null`
    #[default]
    Null,
    /// Emit the zero value of the destination attribute type
    Zero,
}

/// Handling of Int64 values that do not fit the destination integer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NarrowingPolicy {
    /// Fail with `RangeOverflow`
    #[default]
    Checked,
    /// Keep the low bits (two's complement truncation)
    Wrapping,
}

/// State store configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StateStoreConfig {
    /// File-based state store
    File {
        /// Path to the state file
        path: String,
    },

    /// In-memory state store (not persistent)
    #[default]
    Memory,
}

impl StateStoreConfig {
    /// Validate the state store configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            StateStoreConfig::File { path } if path.is_empty() => {
                Err(crate::Error::config("File state store path cannot be empty"))
            }
            _ => Ok(()),
        }
    }

    /// Get the store type name
    pub fn type_name(&self) -> &'static str {
        match self {
            StateStoreConfig::File { .. } => "file",
            StateStoreConfig::Memory => "memory",
        }
    }

    /// Open the configured state store
    pub async fn open(&self) -> Result<Box<dyn crate::StateStore>, crate::Error> {
        self.validate()?;
        match self {
            StateStoreConfig::File { path } => {
                Ok(Box::new(crate::state::FileStateStore::new(path).await?))
            }
            StateStoreConfig::Memory => Ok(Box::new(crate::state::MemoryStateStore::new())),
        }
    }
}

fn default_float_precision() -> u32 {
    4
}
