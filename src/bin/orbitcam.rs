use std::io::Write as _;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "orbitcam", version)]
struct Cli {
    /// Log level for diagnostics written to stderr.
    #[arg(long, global = true, default_value_t = tracing::Level::WARN)]
    log_level: tracing::Level,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the sampled camera poses.
    Trajectory(TrajectoryArgs),
    /// Render one image per camera pose with the external renderer.
    Render(RenderArgs),
    /// Print (and optionally plot) the anti-aliasing offset grid.
    AaGrid(AaGridArgs),
}

#[derive(Parser, Debug)]
struct OrbitArgs {
    /// JSON run file; flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Sweep steps per radian.
    #[arg(long)]
    scale: Option<f64>,

    /// Orbit radius.
    #[arg(long)]
    radius: Option<f64>,
}

#[derive(Parser, Debug)]
struct TrajectoryArgs {
    #[command(flatten)]
    orbit: OrbitArgs,

    /// Print JSON instead of one `x,z` line per pose.
    #[arg(long)]
    json: bool,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    #[command(flatten)]
    orbit: OrbitArgs,

    /// Output image width.
    #[arg(long)]
    width: Option<u32>,

    /// Output image height.
    #[arg(long)]
    height: Option<u32>,

    /// Anti-aliasing factor (N x N samples per pixel).
    #[arg(short = 'a', long = "anti-aliasing")]
    anti_aliasing: Option<u32>,

    /// Output directory for the frame sequence.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Let the renderer overwrite existing frames.
    #[arg(long)]
    no_versionize: bool,

    /// Renderer program (defaults to `cargo`).
    #[arg(long)]
    renderer: Option<String>,

    /// Argument placed before the per-frame arguments (repeatable).
    #[arg(long = "renderer-arg", allow_hyphen_values = true)]
    renderer_args: Vec<String>,

    /// Print the renderer command lines instead of running them.
    #[arg(long)]
    dry_run: bool,
}

#[derive(Parser, Debug)]
struct AaGridArgs {
    /// Supersampling factor N.
    #[arg(long, default_value_t = 2)]
    factor: u32,

    /// Numeric convention for the offsets.
    #[arg(long, value_enum, default_value_t = ConventionChoice::Exact)]
    convention: ConventionChoice,

    /// Print JSON instead of one `dx dy` line per offset.
    #[arg(long)]
    json: bool,

    /// Also draw the grid into this PNG file.
    #[arg(long)]
    plot: Option<PathBuf>,

    /// Plot edge length in pixels.
    #[arg(long, default_value_t = 512)]
    size: u32,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ConventionChoice {
    Exact,
    Renderer,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(cli.log_level)
        .with_writer(std::io::stderr)
        .init();

    match cli.cmd {
        Command::Trajectory(args) => cmd_trajectory(args),
        Command::Render(args) => cmd_render(args),
        Command::AaGrid(args) => cmd_aa_grid(args),
    }
}

fn load_run_config(orbit: &OrbitArgs) -> anyhow::Result<orbitcam::RunConfig> {
    let mut cfg = match orbit.config.as_deref() {
        Some(path) => read_run_config(path)?,
        None => orbitcam::RunConfig::default(),
    };
    if let Some(scale) = orbit.scale {
        cfg.trajectory.scale = scale;
    }
    if let Some(radius) = orbit.radius {
        cfg.trajectory.radius = radius;
    }
    Ok(cfg)
}

fn read_run_config(path: &Path) -> anyhow::Result<orbitcam::RunConfig> {
    orbitcam::RunConfig::from_json_path(path)
        .with_context(|| format!("load run config '{}'", path.display()))
}

fn cmd_trajectory(args: TrajectoryArgs) -> anyhow::Result<()> {
    let cfg = load_run_config(&args.orbit)?;
    let trajectory = orbitcam::sample(&cfg.trajectory)?;

    let mut out = std::io::stdout().lock();
    if args.json {
        serde_json::to_writer_pretty(&mut out, &trajectory).context("write trajectory JSON")?;
        writeln!(out)?;
    } else {
        for pose in &trajectory {
            writeln!(out, "{},{}", pose.x, pose.z)?;
        }
    }
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let mut cfg = load_run_config(&args.orbit)?;
    apply_render_overrides(&mut cfg.render, &args);
    cfg.validate()?;

    let trajectory = orbitcam::sample(&cfg.trajectory)?;

    if args.dry_run {
        let mut recorder = orbitcam::RecordingRenderer::new();
        orbitcam::dispatch(&trajectory, &cfg.render, &mut recorder)?;
        let mut out = std::io::stdout().lock();
        for invocation in recorder.invocations() {
            writeln!(out, "{}", cfg.render.renderer.shell_line(invocation))?;
        }
        return Ok(());
    }

    let report = orbitcam::render_trajectory(&trajectory, &cfg.render)?;
    for failed in report.failures() {
        if let Some(err) = failed.error() {
            eprintln!("frame {} at {}: {err}", failed.frame, failed.pose);
        }
    }
    eprintln!(
        "rendered {} of {} frames into {}",
        report.rendered_count(),
        report.frames().len(),
        cfg.render.output_dir.display()
    );

    if !report.is_success() {
        anyhow::bail!(
            "{} of {} frames failed to render",
            report.failed_count(),
            report.frames().len()
        );
    }
    Ok(())
}

fn apply_render_overrides(render: &mut orbitcam::RenderParams, args: &RenderArgs) {
    if let Some(width) = args.width {
        render.width = width;
    }
    if let Some(height) = args.height {
        render.height = height;
    }
    if let Some(aa) = args.anti_aliasing {
        render.anti_aliasing = aa;
    }
    if let Some(output) = &args.output {
        render.output_dir = output.clone();
    }
    if args.no_versionize {
        render.versionize = false;
    }
    match &args.renderer {
        Some(program) => {
            render.renderer =
                orbitcam::RendererCommand::new(program).with_args(args.renderer_args.clone());
        }
        None if !args.renderer_args.is_empty() => {
            render.renderer.args = args.renderer_args.clone();
        }
        None => {}
    }
}

fn cmd_aa_grid(args: AaGridArgs) -> anyhow::Result<()> {
    let convention = match args.convention {
        ConventionChoice::Exact => orbitcam::SampleConvention::Exact,
        ConventionChoice::Renderer => orbitcam::SampleConvention::Renderer,
    };
    let grid = orbitcam::build_with(&orbitcam::AaConfig::new(args.factor), convention)?;

    let mut out = std::io::stdout().lock();
    if args.json {
        serde_json::to_writer_pretty(&mut out, grid.offsets()).context("write offsets JSON")?;
        writeln!(out)?;
    } else {
        for offset in &grid {
            writeln!(out, "{} {}", offset.dx, offset.dy)?;
        }
    }

    if let Some(path) = &args.plot {
        let opts = orbitcam::PlotOpts {
            size: args.size,
            ..orbitcam::PlotOpts::default()
        };
        orbitcam::save_plot_png(&grid, &opts, path)?;
        eprintln!("wrote {}", path.display());
    }
    Ok(())
}
