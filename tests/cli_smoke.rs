use std::path::PathBuf;
use std::process::{Command, Output};

use orbitcam::{CameraPose, RunConfig, TrajectoryConfig};

fn exe() -> PathBuf {
    std::env::var_os("CARGO_BIN_EXE_orbitcam")
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            let mut p = PathBuf::from("target").join("debug");
            p.push(if cfg!(windows) {
                "orbitcam.exe"
            } else {
                "orbitcam"
            });
            p
        })
}

fn run(args: &[&str]) -> Output {
    Command::new(exe()).args(args).output().unwrap()
}

fn stdout_lines(out: &Output) -> Vec<String> {
    String::from_utf8_lossy(&out.stdout)
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn cli_trajectory_json_matches_library() {
    let out = run(&["trajectory", "--scale", "50", "--radius", "20", "--json"]);
    assert!(out.status.success());

    let poses: Vec<CameraPose> = serde_json::from_slice(&out.stdout).unwrap();
    let expected = orbitcam::sample(&TrajectoryConfig::new(50.0, 20.0)).unwrap();
    assert_eq!(poses, expected.poses());
    assert_eq!(poses[0], CameraPose::new(0, -20));
}

#[test]
fn cli_trajectory_rejects_non_positive_radius() {
    let out = run(&["trajectory", "--radius", "0"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("invalid configuration"));
}

#[test]
fn cli_aa_grid_prints_row_major_offsets() {
    let out = run(&["aa-grid", "--factor", "2", "--convention", "renderer"]);
    assert!(out.status.success());
    assert_eq!(
        stdout_lines(&out)
            .iter()
            .map(|l| {
                let (dx, dy) = l.split_once(' ').unwrap();
                (dx.parse::<f32>().unwrap(), dy.parse::<f32>().unwrap())
            })
            .collect::<Vec<_>>(),
        vec![(0.33, -0.33), (0.67, -0.33), (0.33, -0.67), (0.67, -0.67)]
    );
}

#[test]
fn cli_aa_grid_writes_plot() {
    let dir = PathBuf::from("target").join("cli_smoke");
    std::fs::create_dir_all(&dir).unwrap();
    let png = dir.join("aa_grid.png");
    let _ = std::fs::remove_file(&png);

    let png_arg = png.to_string_lossy().to_string();
    let out = run(&["aa-grid", "--factor", "4", "--size", "128", "--plot", &png_arg]);
    assert!(out.status.success());
    assert_eq!(stdout_lines(&out).len(), 16);
    assert!(png.exists());
}

#[test]
fn cli_render_dry_run_prints_one_command_per_pose() {
    let out = run(&["render", "--config", "tests/data/run.json", "--dry-run"]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let cfg = RunConfig::from_json_path(std::path::Path::new("tests/data/run.json")).unwrap();
    let trajectory = orbitcam::sample(&cfg.trajectory).unwrap();

    let lines = stdout_lines(&out);
    assert_eq!(lines.len(), trajectory.len());
    assert_eq!(
        lines[0],
        "raytracer --width=600 --height=400 -a3 --look-at --camera-pos 0,10,-20 \
         --look-at-pos 0,-4,-20 --output target/cli_smoke/frames --versionize"
    );
    for (line, pose) in lines.iter().zip(trajectory.iter()) {
        assert!(line.contains(&format!("--camera-pos {},10,{} ", pose.x, pose.z)));
    }
}

#[test]
fn cli_render_dry_run_quotes_paths_with_spaces() {
    let out = run(&[
        "render",
        "--scale",
        "1",
        "--renderer",
        "raytracer",
        "--output",
        "target/cli smoke/frames",
        "--dry-run",
    ]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let lines = stdout_lines(&out);
    assert_eq!(lines.len(), 6);
    for line in &lines {
        assert!(line.contains("--output 'target/cli smoke/frames' --versionize"), "{line}");
    }
}

#[cfg(unix)]
#[test]
fn cli_render_succeeds_when_every_frame_renders() {
    let out = run(&[
        "render", "--scale", "5", "--renderer", "true", "--output", "target/cli_smoke/ok",
    ]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
}

#[cfg(unix)]
#[test]
fn cli_render_reports_failed_frames_after_the_sweep() {
    let out = run(&[
        "render", "--scale", "5", "--renderer", "false", "--output", "target/cli_smoke/bad",
    ]);
    assert!(!out.status.success());

    let frames = orbitcam::sample(&TrajectoryConfig::new(5.0, 20.0)).unwrap().len();
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains(&format!("{frames} of {frames} frames failed")), "{stderr}");
    assert!(stderr.contains("frame 0 at (0, -20)"), "{stderr}");
}
