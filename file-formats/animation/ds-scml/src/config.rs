//! Conversion settings

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Settings passed explicitly into the indexer and the sampler
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertConfig {
    /// Output frames per second
    pub frame_rate: u32,
    /// Version written into the animation descriptor
    pub anim_version: u32,
    /// Version written into the build descriptor
    pub build_version: u32,
    /// Scale written into the build descriptor
    pub scale: f32,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            frame_rate: 30,
            anim_version: 4,
            build_version: 6,
            scale: 1.0,
        }
    }
}

impl ConvertConfig {
    /// Milliseconds between two output frames
    pub fn tick_duration(&self) -> u32 {
        1000 / self.frame_rate.max(1)
    }

    /// Reject settings the sampler cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.frame_rate == 0 || self.frame_rate > 1000 {
            return Err(Error::InvalidConfig(format!(
                "frame rate must be between 1 and 1000, got {}",
                self.frame_rate
            )));
        }
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "scale must be a positive number, got {}",
                self.scale
            )));
        }
        Ok(())
    }
}
