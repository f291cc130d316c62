//! Walk configuration types.

use derive_builder::Builder;
use serde::{Deserialize, Deserializer, Serialize, de};

/// Default capacity of the open-directory stack.
///
/// Storage trees are laid out as `/manta/<account>/<object>`, so ten levels
/// is far more than a walk of `/manta` ever needs.
pub const DEFAULT_MAX_OPEN_DIRS: usize = 10;

/// Configuration for a walk over one or more roots.
#[derive(Debug, Clone, PartialEq, Eq, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct WalkConfig {
    /// Maximum number of directory handles open at once.
    ///
    /// This is also the maximum nesting depth of directories below a root
    /// (the root counts as the first level). A deeper tree aborts its root.
    #[builder(default = "DEFAULT_MAX_OPEN_DIRS")]
    #[serde(
        default = "default_max_open_dirs",
        deserialize_with = "deserialize_max_open_dirs"
    )]
    pub max_open_dirs: usize,

    /// Stop processing the remaining roots once a root aborts.
    #[builder(default = "false")]
    #[serde(default)]
    pub stop_on_abort: bool,
}

const ZERO_CAPACITY: &str = "max_open_dirs must be at least 1";

fn default_max_open_dirs() -> usize {
    DEFAULT_MAX_OPEN_DIRS
}

fn deserialize_max_open_dirs<'de, D: Deserializer<'de>>(deserializer: D) -> Result<usize, D::Error> {
    match usize::deserialize(deserializer)? {
        0 => Err(de::Error::custom(ZERO_CAPACITY)),
        n => Ok(n),
    }
}

impl WalkConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if self.max_open_dirs == Some(0) {
            return Err(ZERO_CAPACITY.to_string());
        }
        Ok(())
    }
}

impl WalkConfig {
    /// Create a new walk config builder.
    pub fn builder() -> WalkConfigBuilder {
        WalkConfigBuilder::default()
    }
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self {
            max_open_dirs: DEFAULT_MAX_OPEN_DIRS,
            stop_on_abort: false,
        }
    }
}
