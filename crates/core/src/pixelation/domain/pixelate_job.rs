use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::pixelation::domain::region_schedule::RegionSchedule;
use crate::shared::constants::DEFAULT_BLOCK_SIZE;
use crate::shared::error::FrameError;

/// Static settings for one pixelation run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PixelateJob {
    #[serde(default)]
    pub input_path: Option<PathBuf>,
    #[serde(default)]
    pub output_path: Option<PathBuf>,
    #[serde(default = "default_block_size")]
    pub block_size: u32,
    #[serde(default)]
    pub debug: bool,
    pub schedule: RegionSchedule,
}

fn default_block_size() -> u32 {
    DEFAULT_BLOCK_SIZE
}

impl PixelateJob {
    pub fn new(schedule: RegionSchedule) -> Self {
        Self {
            input_path: None,
            output_path: None,
            block_size: DEFAULT_BLOCK_SIZE,
            debug: false,
            schedule,
        }
    }

    /// Parses either a full job object or a bare schedule array.
    pub fn from_json(json: &str) -> Result<Self, FrameError> {
        let malformed = |e: serde_json::Error| {
            FrameError::InvalidConfiguration(format!("malformed job file: {e}"))
        };
        if json.trim_start().starts_with('[') {
            let schedule: RegionSchedule = serde_json::from_str(json).map_err(malformed)?;
            Ok(PixelateJob::new(schedule))
        } else {
            serde_json::from_str(json).map_err(malformed)
        }
    }

    pub fn load(path: &Path) -> Result<Self, FrameError> {
        let json = fs::read_to_string(path).map_err(|e| FrameError::io(path, e))?;
        let job = Self::from_json(&json)?;
        log::debug!(
            "Loaded job from {} ({} schedule entries)",
            path.display(),
            job.schedule.entries().len()
        );
        Ok(job)
    }
}
