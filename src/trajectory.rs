use std::f64::consts::PI;
use std::ops::Range;

use crate::foundation::core::{CameraPose, SCENE_DEPTH_OFFSET};
use crate::foundation::error::{OrbitcamError, OrbitcamResult};
use crate::foundation::math::{require_positive, trunc_to_i64};

/// Orbit sampling parameters.
///
/// `scale` is the number of sweep steps per radian, `radius` the orbit radius
/// in scene units. The sweep runs about `2 * pi * scale` steps, so sampling
/// time grows linearly with `scale`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TrajectoryConfig {
    pub scale: f64,
    pub radius: f64,
}

impl Default for TrajectoryConfig {
    fn default() -> Self {
        Self {
            scale: 50.0,
            radius: 20.0,
        }
    }
}

impl TrajectoryConfig {
    pub fn new(scale: f64, radius: f64) -> Self {
        Self { scale, radius }
    }

    pub fn validate(&self) -> OrbitcamResult<()> {
        require_positive("trajectory scale", self.scale)?;
        require_positive("trajectory radius", self.radius)?;

        // The sweep bounds must be representable as integer steps.
        if self.scale * 1.5 * PI >= i64::MAX as f64 {
            return Err(OrbitcamError::invalid_configuration(format!(
                "trajectory scale {} exceeds the integer step range",
                self.scale
            )));
        }
        Ok(())
    }

    /// Half-open integer step range covering the angles `[-pi/2, 3pi/2)`.
    ///
    /// Both bounds are truncated toward zero, like the interior samples.
    pub fn sweep_range(&self) -> Range<i64> {
        let start = trunc_to_i64(self.scale * -0.5 * PI);
        let end = trunc_to_i64(self.scale * 1.5 * PI);
        start..end
    }

    /// Pose for sweep step `step` (angle `step / scale`).
    pub fn pose_at(&self, step: i64) -> CameraPose {
        let theta = step as f64 / self.scale;
        let x = trunc_to_i64(theta.cos() * self.radius);
        let z = trunc_to_i64(theta.sin() * self.radius) + SCENE_DEPTH_OFFSET;
        CameraPose::new(x, z)
    }
}

/// Ordered camera poses, one per rendered frame.
///
/// Always starts with [`CameraPose::seed`]. No two adjacent poses are equal;
/// a pose may recur later in the sequence.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(transparent)]
pub struct Trajectory {
    poses: Vec<CameraPose>,
}

impl Trajectory {
    const MAX_CAPACITY_HINT: usize = 1 << 16;

    fn seeded(steps: usize) -> Self {
        let mut poses = Vec::with_capacity(steps.min(Self::MAX_CAPACITY_HINT) + 1);
        poses.push(CameraPose::seed());
        Self { poses }
    }

    /// Append `pose` unless it equals the last appended pose.
    fn push_collapsed(&mut self, pose: CameraPose) -> bool {
        if self.poses.last() == Some(&pose) {
            return false;
        }
        self.poses.push(pose);
        true
    }

    pub fn poses(&self) -> &[CameraPose] {
        &self.poses
    }

    pub fn len(&self) -> usize {
        self.poses.len()
    }

    /// Always `false`: every trajectory holds at least the seed pose.
    pub fn is_empty(&self) -> bool {
        self.poses.is_empty()
    }

    pub fn first(&self) -> CameraPose {
        self.poses[0]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CameraPose> {
        self.poses.iter()
    }

    pub fn into_poses(self) -> Vec<CameraPose> {
        self.poses
    }
}

impl<'a> IntoIterator for &'a Trajectory {
    type Item = &'a CameraPose;
    type IntoIter = std::slice::Iter<'a, CameraPose>;

    fn into_iter(self) -> Self::IntoIter {
        self.poses.iter()
    }
}

/// Sample the circular orbit into a deduplicated pose sequence.
///
/// Steps sweep `config.sweep_range()`; each computed pose is kept only when it
/// differs from the pose right before it.
#[tracing::instrument]
pub fn sample(config: &TrajectoryConfig) -> OrbitcamResult<Trajectory> {
    config.validate()?;

    let range = config.sweep_range();
    let steps = usize::try_from(range.end.saturating_sub(range.start)).unwrap_or(0);
    let mut trajectory = Trajectory::seeded(steps);

    let mut collapsed = 0usize;
    for step in range.clone() {
        if !trajectory.push_collapsed(config.pose_at(step)) {
            collapsed += 1;
        }
    }

    tracing::debug!(
        start = range.start,
        end = range.end,
        poses = trajectory.len(),
        collapsed,
        "sampled orbit trajectory"
    );
    Ok(trajectory)
}
