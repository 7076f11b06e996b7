use std::path::PathBuf;

use crate::foundation::core::{CAMERA_HEIGHT, CameraPose, LOOK_AT_TARGET};
use crate::foundation::error::{OrbitcamError, OrbitcamResult};
use crate::foundation::math::require_nonzero;
use crate::renderer::{ProcessRenderer, RenderInvocation, Renderer, RendererCommand};
use crate::trajectory::Trajectory;

/// Everything the renderer needs besides the per-frame pose.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderParams {
    pub width: u32,
    pub height: u32,
    /// Supersampling factor passed as `-a<N>`.
    pub anti_aliasing: u32,
    pub camera_height: i64,
    pub look_at: [i64; 3],
    pub output_dir: PathBuf,
    /// Ask the renderer to add a version suffix instead of overwriting.
    pub versionize: bool,
    pub max_depth: Option<u32>,
    pub fov: Option<f32>,
    pub preset: Option<u32>,
    pub occlusion_offset: Option<f32>,
    pub renderer: RendererCommand,
}

impl Default for RenderParams {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 800,
            anti_aliasing: 2,
            camera_height: CAMERA_HEIGHT,
            look_at: LOOK_AT_TARGET,
            output_dir: PathBuf::from("out/gif2"),
            versionize: true,
            max_depth: None,
            fov: None,
            preset: None,
            occlusion_offset: None,
            renderer: RendererCommand::default(),
        }
    }
}

impl RenderParams {
    pub fn validate(&self) -> OrbitcamResult<()> {
        require_nonzero("render width", self.width)?;
        require_nonzero("render height", self.height)?;
        require_nonzero("anti-aliasing factor", self.anti_aliasing)?;

        if self.output_dir.as_os_str().is_empty() {
            return Err(OrbitcamError::invalid_configuration(
                "output directory must not be empty",
            ));
        }
        if let Some(preset) = self.preset
            && !(1..=3).contains(&preset)
        {
            return Err(OrbitcamError::invalid_configuration(format!(
                "preset must be in 1..=3, got {preset}"
            )));
        }
        if let Some(fov) = self.fov
            && !(fov.is_finite() && fov > 0.0)
        {
            return Err(OrbitcamError::invalid_configuration(format!(
                "fov must be positive and finite, got {fov}"
            )));
        }
        if let Some(offset) = self.occlusion_offset
            && !offset.is_finite()
        {
            return Err(OrbitcamError::invalid_configuration(format!(
                "occlusion offset must be finite, got {offset}"
            )));
        }
        self.renderer.validate()
    }
}

/// Comma-joined integers without spaces: `[3, 10, -25]` becomes `3,10,-25`.
pub fn format_coords(values: &[i64]) -> String {
    values
        .iter()
        .map(i64::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// Per-frame renderer arguments, one argv element per token.
pub fn render_args(params: &RenderParams, pose: CameraPose) -> Vec<String> {
    let mut args = vec![
        format!("--width={}", params.width),
        format!("--height={}", params.height),
        format!("-a{}", params.anti_aliasing),
        "--look-at".to_string(),
        "--camera-pos".to_string(),
        format_coords(&pose.with_height(params.camera_height)),
        "--look-at-pos".to_string(),
        format_coords(&params.look_at),
        "--output".to_string(),
        params.output_dir.to_string_lossy().into_owned(),
    ];
    if params.versionize {
        args.push("--versionize".to_string());
    }

    if let Some(depth) = params.max_depth {
        args.extend(["--max-depth".to_string(), depth.to_string()]);
    }
    if let Some(fov) = params.fov {
        args.extend(["--fov".to_string(), fov.to_string()]);
    }
    if let Some(preset) = params.preset {
        args.extend(["--preset".to_string(), preset.to_string()]);
    }
    if let Some(offset) = params.occlusion_offset {
        args.extend(["--occlusion-offset".to_string(), offset.to_string()]);
    }
    args
}

/// Outcome of rendering one trajectory frame.
#[derive(Debug)]
pub struct FrameResult {
    pub frame: usize,
    pub pose: CameraPose,
    pub outcome: OrbitcamResult<()>,
}

impl FrameResult {
    pub fn is_rendered(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn error(&self) -> Option<&OrbitcamError> {
        self.outcome.as_ref().err()
    }
}

/// Per-frame results in trajectory order.
#[derive(Debug, Default)]
pub struct DispatchReport {
    frames: Vec<FrameResult>,
}

impl DispatchReport {
    pub fn frames(&self) -> &[FrameResult] {
        &self.frames
    }

    pub fn failures(&self) -> impl Iterator<Item = &FrameResult> {
        self.frames.iter().filter(|f| !f.is_rendered())
    }

    pub fn rendered_count(&self) -> usize {
        self.frames.iter().filter(|f| f.is_rendered()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.frames.len() - self.rendered_count()
    }

    pub fn is_success(&self) -> bool {
        self.frames.iter().all(FrameResult::is_rendered)
    }

    pub fn into_frames(self) -> Vec<FrameResult> {
        self.frames
    }
}

/// Render every pose of `trajectory` in order, one blocking call per pose.
///
/// Invalid `params` fail before any frame is sent. A failed frame is recorded
/// in the report and the sweep moves on to the next pose.
#[tracing::instrument(skip_all, fields(frames = trajectory.len()))]
pub fn dispatch(
    trajectory: &Trajectory,
    params: &RenderParams,
    renderer: &mut dyn Renderer,
) -> OrbitcamResult<DispatchReport> {
    params.validate()?;

    let mut frames = Vec::with_capacity(trajectory.len());
    for (frame, &pose) in trajectory.iter().enumerate() {
        let invocation = RenderInvocation {
            frame,
            pose,
            args: render_args(params, pose),
        };

        let outcome = renderer.render(&invocation);
        match &outcome {
            Ok(()) => tracing::info!(frame, %pose, "frame rendered"),
            Err(e) => tracing::warn!(frame, %pose, error = %e, "frame failed"),
        }
        frames.push(FrameResult {
            frame,
            pose,
            outcome,
        });
    }

    let report = DispatchReport { frames };
    tracing::info!(
        rendered = report.rendered_count(),
        failed = report.failed_count(),
        "dispatch finished"
    );
    Ok(report)
}

/// [`dispatch`] through the process renderer configured in `params`.
pub fn render_trajectory(
    trajectory: &Trajectory,
    params: &RenderParams,
) -> OrbitcamResult<DispatchReport> {
    params.validate()?;
    let mut renderer = ProcessRenderer::new(params.renderer.clone())?;
    dispatch(trajectory, params, &mut renderer)
}
