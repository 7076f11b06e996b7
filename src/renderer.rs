use std::borrow::Cow;
use std::collections::BTreeSet;
use std::process::{Command, Stdio};

use crate::foundation::core::CameraPose;
use crate::foundation::error::{OrbitcamError, OrbitcamResult};

/// How to launch the external renderer.
///
/// `args` are placed before the per-frame argument list, e.g. `run --bin main --`
/// when the renderer is started through cargo.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RendererCommand {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl Default for RendererCommand {
    fn default() -> Self {
        Self {
            program: "cargo".to_string(),
            args: ["run", "--bin", "main", "--"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

impl RendererCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn validate(&self) -> OrbitcamResult<()> {
        if self.program.trim().is_empty() {
            return Err(OrbitcamError::invalid_configuration(
                "renderer program must not be empty",
            ));
        }
        Ok(())
    }

    /// Full argv (program first) for one invocation.
    pub fn command_line(&self, invocation: &RenderInvocation) -> Vec<String> {
        let mut argv = Vec::with_capacity(1 + self.args.len() + invocation.args.len());
        argv.push(self.program.clone());
        argv.extend(self.args.iter().cloned());
        argv.extend(invocation.args.iter().cloned());
        argv
    }

    /// [`Self::command_line`] as one POSIX shell line, quoting where needed.
    pub fn shell_line(&self, invocation: &RenderInvocation) -> String {
        self.command_line(invocation)
            .iter()
            .map(|token| shell_quote(token))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Quote `token` for a POSIX shell when it is empty or contains anything
/// besides `[A-Za-z0-9_./,=:+-]`.
pub fn shell_quote(token: &str) -> Cow<'_, str> {
    let plain = !token.is_empty()
        && token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "_./,=:+-".contains(c));
    if plain {
        return Cow::Borrowed(token);
    }
    Cow::Owned(format!("'{}'", token.replace('\'', r"'\''")))
}

/// One renderer call: the frame's position in the trajectory and its arguments.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderInvocation {
    pub frame: usize,
    pub pose: CameraPose,
    pub args: Vec<String>,
}

/// Renders a single frame, blocking until it is done.
///
/// Calls arrive in trajectory order, one at a time.
pub trait Renderer {
    fn render(&mut self, invocation: &RenderInvocation) -> OrbitcamResult<()>;
}

/// Launches the renderer as a child process per frame and waits for it.
#[derive(Clone, Debug)]
pub struct ProcessRenderer {
    command: RendererCommand,
}

impl ProcessRenderer {
    const STDERR_TAIL_LINES: usize = 8;

    pub fn new(command: RendererCommand) -> OrbitcamResult<Self> {
        command.validate()?;
        Ok(Self { command })
    }

    pub fn command(&self) -> &RendererCommand {
        &self.command
    }
}

impl Renderer for ProcessRenderer {
    fn render(&mut self, invocation: &RenderInvocation) -> OrbitcamResult<()> {
        let output = Command::new(&self.command.program)
            .args(&self.command.args)
            .args(&invocation.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| {
                OrbitcamError::render_invocation_failed(format!(
                    "frame {}: failed to start '{}': {e}",
                    invocation.frame, self.command.program
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OrbitcamError::render_invocation_failed(format!(
                "frame {}: '{}' exited with {}: {}",
                invocation.frame,
                self.command.program,
                output.status,
                stderr_tail(&stderr, Self::STDERR_TAIL_LINES)
            )));
        }

        Ok(())
    }
}

fn stderr_tail(stderr: &str, max_lines: usize) -> String {
    let lines: Vec<&str> = stderr.trim().lines().collect();
    let skip = lines.len().saturating_sub(max_lines);
    lines[skip..].join("\n")
}

/// Records invocations instead of launching anything.
///
/// Used for dry runs and tests. Frames listed in `fail_frames` report a
/// render failure.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    invocations: Vec<RenderInvocation>,
    fail_frames: BTreeSet<usize>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(frames: impl IntoIterator<Item = usize>) -> Self {
        Self {
            invocations: Vec::new(),
            fail_frames: frames.into_iter().collect(),
        }
    }

    /// Invocations in the order they were received.
    pub fn invocations(&self) -> &[RenderInvocation] {
        &self.invocations
    }
}

impl Renderer for RecordingRenderer {
    fn render(&mut self, invocation: &RenderInvocation) -> OrbitcamResult<()> {
        self.invocations.push(invocation.clone());
        if self.fail_frames.contains(&invocation.frame) {
            return Err(OrbitcamError::render_invocation_failed(format!(
                "frame {}: simulated failure",
                invocation.frame
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invocation(frame: usize) -> RenderInvocation {
        RenderInvocation {
            frame,
            pose: CameraPose::new(1, -21),
            args: vec!["--camera-pos".to_string(), "1,10,-21".to_string()],
        }
    }

    #[test]
    fn default_command_runs_renderer_through_cargo() {
        let cmd = RendererCommand::default();
        assert_eq!(
            cmd.command_line(&invocation(0)),
            vec![
                "cargo",
                "run",
                "--bin",
                "main",
                "--",
                "--camera-pos",
                "1,10,-21"
            ]
        );
    }

    #[test]
    fn shell_quote_wraps_only_unsafe_tokens() {
        assert_eq!(shell_quote("--camera-pos"), "--camera-pos");
        assert_eq!(shell_quote("-5,10,-30"), "-5,10,-30");
        assert_eq!(shell_quote("out/my frames"), "'out/my frames'");
        assert_eq!(shell_quote(""), "''");
        assert_eq!(shell_quote("it's"), r"'it'\''s'");
    }

    #[test]
    fn shell_line_keeps_paths_with_spaces_together() {
        let inv = RenderInvocation {
            frame: 0,
            pose: CameraPose::seed(),
            args: vec!["--output".to_string(), "out/my frames".to_string()],
        };
        assert_eq!(
            RendererCommand::new("raytracer").shell_line(&inv),
            "raytracer --output 'out/my frames'"
        );
    }

    #[test]
    fn empty_program_is_rejected() {
        let err = ProcessRenderer::new(RendererCommand::new("  ")).unwrap_err();
        assert!(err.is_invalid_configuration());
    }

    #[test]
    fn stderr_tail_keeps_last_lines() {
        assert_eq!(stderr_tail("a\nb\nc\n", 2), "b\nc");
        assert_eq!(stderr_tail("", 2), "");
    }

    #[test]
    fn recording_renderer_keeps_order_and_injects_failures() {
        let mut r = RecordingRenderer::failing_on([1]);
        assert!(r.render(&invocation(0)).is_ok());
        let err = r.render(&invocation(1)).unwrap_err();
        assert!(err.is_render_invocation_failed());
        assert!(r.render(&invocation(2)).is_ok());
        let frames: Vec<usize> = r.invocations().iter().map(|i| i.frame).collect();
        assert_eq!(frames, vec![0, 1, 2]);
    }

    #[test]
    fn missing_program_reports_invocation_failure() {
        let mut r = ProcessRenderer::new(RendererCommand::new(
            "orbitcam-definitely-not-a-real-renderer",
        ))
        .unwrap();
        let err = r.render(&invocation(4)).unwrap_err();
        assert!(err.is_render_invocation_failed());
        assert!(err.to_string().contains("frame 4"));
    }

    #[cfg(unix)]
    #[test]
    fn process_exit_status_decides_outcome() {
        let mut ok = ProcessRenderer::new(RendererCommand::new("true")).unwrap();
        assert!(ok.render(&invocation(0)).is_ok());

        let mut failing = ProcessRenderer::new(RendererCommand::new("false")).unwrap();
        let err = failing.render(&invocation(0)).unwrap_err();
        assert!(err.is_render_invocation_failed());
    }

    #[cfg(unix)]
    #[test]
    fn process_failure_carries_stderr() {
        let mut r = ProcessRenderer::new(
            RendererCommand::new("sh").with_args(["-c", "echo no scene >&2; exit 3", "sh"]),
        )
        .unwrap();
        let err = r.render(&invocation(2)).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("no scene"), "{msg}");
        assert!(msg.contains("frame 2"), "{msg}");
    }
}
