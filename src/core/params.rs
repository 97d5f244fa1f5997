use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{GridError, GridResult};

pub const DEFAULT_BINARIZE_THRESHOLD: u8 = 200;
pub const DEFAULT_ENTROPY_THRESHOLD: f64 = 0.01;

/// Sliding window used by one separator scan direction.
///
/// `length` is the shortest uniform run that counts as a separator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowParams {
    pub length: u32,
    pub stride: u32,
}

impl WindowParams {
    /// A window with the customary stride of one tenth of its length.
    pub fn with_length(length: u32) -> Self {
        Self {
            length,
            stride: (length / 10).max(1),
        }
    }
}

/// Tunables for binarization and separator detection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridParams {
    pub binarize_threshold: u8,
    pub horizontal: WindowParams,
    pub vertical: WindowParams,
    pub entropy_threshold: f64,
}

impl Default for GridParams {
    fn default() -> Self {
        Self {
            binarize_threshold: DEFAULT_BINARIZE_THRESHOLD,
            horizontal: WindowParams::with_length(100),
            vertical: WindowParams::with_length(50),
            entropy_threshold: DEFAULT_ENTROPY_THRESHOLD,
        }
    }
}

impl GridParams {
    pub fn validate(&self) -> GridResult<()> {
        for (axis, window) in [("horizontal", self.horizontal), ("vertical", self.vertical)] {
            if window.length == 0 {
                return Err(GridError::InvalidParams(format!(
                    "{axis} window length must be positive"
                )));
            }
            if window.stride == 0 {
                return Err(GridError::InvalidParams(format!(
                    "{axis} window stride must be positive"
                )));
            }
        }
        if !self.entropy_threshold.is_finite() || self.entropy_threshold < 0.0 {
            return Err(GridError::InvalidParams(format!(
                "entropy threshold must be a non-negative number, got {}",
                self.entropy_threshold
            )));
        }
        Ok(())
    }

    /// Load parameters from a JSON file. Missing fields keep their defaults.
    pub fn from_json_file(path: &Path) -> GridResult<Self> {
        let data = fs::read_to_string(path).map_err(|err| {
            GridError::InvalidParams(format!("cannot read {}: {err}", path.display()))
        })?;
        let params: Self = serde_json::from_str(&data).map_err(|err| {
            GridError::InvalidParams(format!("cannot parse {}: {err}", path.display()))
        })?;
        params.validate()?;
        Ok(params)
    }
}
