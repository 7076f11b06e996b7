//! Inputs for an external one-image-per-call raytracer.
//!
//! - [`sample`] turns a circular orbit into a deduplicated list of integer
//!   camera poses, one per animation frame.
//! - [`dispatch()`] feeds those poses to the renderer, one blocking call per
//!   frame, and collects per-frame outcomes.
//! - [`build`] computes the supersampling offset grid, and [`plot_offsets`]
//!   draws it for inspection.
#![forbid(unsafe_code)]

pub mod aa_grid;
pub mod config;
pub mod dispatch;
mod foundation;
pub mod plot;
pub mod renderer;
pub mod trajectory;

pub use aa_grid::{AaConfig, OffsetGrid, SampleConvention, build, build_with};
pub use config::RunConfig;
pub use dispatch::{
    DispatchReport, FrameResult, RenderParams, dispatch, format_coords, render_args,
    render_trajectory,
};
pub use foundation::core::{CAMERA_HEIGHT, CameraPose, LOOK_AT_TARGET, Offset, SCENE_DEPTH_OFFSET};
pub use foundation::error::{OrbitcamError, OrbitcamResult};
pub use foundation::math::trunc_to_i64;
pub use plot::{PlotOpts, plot_offsets, save_plot_png};
pub use renderer::{
    ProcessRenderer, RecordingRenderer, RenderInvocation, Renderer, RendererCommand,
    shell_quote,
};
pub use trajectory::{Trajectory, TrajectoryConfig, sample};
