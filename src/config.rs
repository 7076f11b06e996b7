use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::Context as _;

use crate::dispatch::RenderParams;
use crate::foundation::error::{OrbitcamError, OrbitcamResult};
use crate::trajectory::TrajectoryConfig;

/// A complete orbit render run, as stored in a JSON run file.
///
/// Missing sections fall back to the reference scenario (scale 50, radius 20,
/// 1200x800 at anti-aliasing 2).
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    pub trajectory: TrajectoryConfig,
    pub render: RenderParams,
}

impl RunConfig {
    pub fn from_json_str(s: &str) -> OrbitcamResult<Self> {
        serde_json::from_str(s).map_err(|e| OrbitcamError::serde(e.to_string()))
    }

    pub fn from_json_path(path: &Path) -> OrbitcamResult<Self> {
        let f = File::open(path)
            .with_context(|| format!("open run config '{}'", path.display()))?;
        serde_json::from_reader(BufReader::new(f)).map_err(|e| {
            OrbitcamError::serde(format!("parse run config '{}': {e}", path.display()))
        })
    }

    pub fn to_json_pretty(&self) -> OrbitcamResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| OrbitcamError::serde(e.to_string()))
    }

    pub fn validate(&self) -> OrbitcamResult<()> {
        self.trajectory.validate()?;
        self.render.validate()
    }
}
