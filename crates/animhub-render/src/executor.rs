//! External renderer invocation.
//!
//! Runs exactly one child process per dispatch, captures its output streams,
//! and enforces a hard wall-clock deadline. On unix the renderer leads its own
//! process group; the whole group is killed when the deadline passes or the
//! dispatch is dropped, so helpers it started (ffmpeg, wrapper shells) die
//! with it.

use std::ffi::OsString;
use std::path::Path;
use std::process::Stdio;
use std::time::{Duration, Instant};

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use animhub_core::config::render::RenderConfig;
use animhub_core::types::JobId;
use animhub_storage::naming;

use crate::error::RenderError;
use crate::models::RenderOutcome;

/// Time allowed for the output pipes to drain after the child exits.
const PIPE_DRAIN_GRACE: Duration = Duration::from_secs(5);

/// Captured output beyond this many bytes keeps only its tail.
const MAX_CAPTURE_BYTES: usize = 64 * 1024;

/// Builds and runs renderer command lines.
#[derive(Debug, Clone)]
pub struct RenderDispatcher {
    command: String,
    extra_args: Vec<String>,
    quality_flag: String,
    scene_name: String,
    video_extension: String,
}

impl RenderDispatcher {
    /// Create a dispatcher from the renderer configuration.
    pub fn new(config: &RenderConfig) -> Self {
        Self {
            command: config.command.clone(),
            extra_args: config.extra_args.clone(),
            quality_flag: config.quality_flag.clone(),
            scene_name: config.scene_name.clone(),
            video_extension: config.video_extension.clone(),
        }
    }

    /// Argument vector passed to the renderer for one job.
    pub fn build_args(&self, descriptor_path: &Path, id: &JobId, output_root: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = self.extra_args.iter().map(OsString::from).collect();
        if !self.quality_flag.is_empty() {
            args.push(self.quality_flag.clone().into());
        }
        args.push("--output_file".into());
        args.push(naming::artifact_file_name(id, &self.video_extension).into());
        args.push("--media_dir".into());
        args.push(output_root.as_os_str().to_owned());
        args.push(descriptor_path.as_os_str().to_owned());
        args.push(self.scene_name.clone().into());
        args
    }

    /// Run the renderer for `id` and wait at most `timeout`.
    ///
    /// Never retries. The caller must not look for an artifact unless the
    /// outcome is [`RenderOutcome::Success`].
    pub async fn dispatch(
        &self,
        descriptor_path: &Path,
        id: &JobId,
        output_root: &Path,
        timeout: Duration,
    ) -> Result<RenderOutcome, RenderError> {
        let args = self.build_args(descriptor_path, id, output_root);
        info!(
            job_id = %id,
            command = %self.command,
            args = ?args,
            timeout_secs = timeout.as_secs(),
            "Dispatching renderer"
        );

        let start = Instant::now();
        let mut command = Command::new(&self.command);
        command
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        #[cfg(unix)]
        command.process_group(0);

        let mut child = command.spawn().map_err(|source| RenderError::Spawn {
            command: self.command.clone(),
            source,
        })?;
        let mut group = ProcessGroup::new(child.id());

        let stdout_task = spawn_reader(child.stdout.take());
        let stderr_task = spawn_reader(child.stderr.take());

        let status = match tokio::time::timeout(timeout, child.wait()).await {
            Ok(Ok(status)) => status,
            Ok(Err(e)) => {
                stdout_task.abort();
                stderr_task.abort();
                group.kill();
                let _ = child.kill().await;
                error!(job_id = %id, error = %e, "Waiting on renderer failed");
                return Err(RenderError::Io(e));
            }
            Err(_) => {
                group.kill();
                if let Err(e) = child.kill().await {
                    warn!(job_id = %id, error = %e, "Failed to kill timed out renderer");
                }
                stdout_task.abort();
                stderr_task.abort();
                error!(
                    job_id = %id,
                    timeout_secs = timeout.as_secs(),
                    "Renderer timed out and was killed"
                );
                return Ok(RenderOutcome::TimedOut { elapsed: timeout });
            }
        };

        // Stragglers left behind by a finished renderer would hold its pipes open.
        group.kill();
        let stdout = drain(stdout_task).await;
        let stderr = drain(stderr_task).await;
        let duration_ms = start.elapsed().as_millis() as u64;

        debug!(job_id = %id, stdout = %stdout, stderr = %stderr, "Renderer output");

        if status.success() {
            info!(job_id = %id, duration_ms, "Renderer finished");
            Ok(RenderOutcome::Success {
                exit_code: 0,
                stdout,
                stderr,
            })
        } else {
            let exit_code = status.code();
            error!(
                job_id = %id,
                exit_code = ?exit_code,
                duration_ms,
                stderr = tail(&stderr, 500),
                "Renderer failed"
            );
            Ok(RenderOutcome::Failure {
                exit_code,
                stderr,
                stdout,
            })
        }
    }
}

/// The renderer's process group, killed at most once and always on drop.
#[derive(Debug)]
struct ProcessGroup {
    #[cfg(unix)]
    leader: Option<nix::unistd::Pid>,
}

impl ProcessGroup {
    #[cfg(unix)]
    fn new(leader: Option<u32>) -> Self {
        Self {
            leader: leader
                .and_then(|pid| i32::try_from(pid).ok())
                .map(nix::unistd::Pid::from_raw),
        }
    }

    #[cfg(not(unix))]
    fn new(_leader: Option<u32>) -> Self {
        Self {}
    }

    /// SIGKILL every process still in the group.
    #[cfg(unix)]
    fn kill(&mut self) {
        use nix::errno::Errno;
        use nix::sys::signal::{Signal, killpg};

        let Some(leader) = self.leader.take() else {
            return;
        };
        match killpg(leader, Signal::SIGKILL) {
            Ok(()) | Err(Errno::ESRCH) => {}
            Err(e) => warn!(pgid = leader.as_raw(), error = %e, "Failed to kill renderer process group"),
        }
    }

    #[cfg(not(unix))]
    fn kill(&mut self) {}
}

impl Drop for ProcessGroup {
    fn drop(&mut self) {
        self.kill();
    }
}

fn spawn_reader<R>(pipe: Option<R>) -> JoinHandle<std::io::Result<Vec<u8>>>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            pipe.read_to_end(&mut buf).await?;
        }
        Ok(buf)
    })
}

/// Collect a reader task, giving up after [`PIPE_DRAIN_GRACE`].
///
/// A grandchild that inherited the pipe can keep it open after the renderer
/// exits; whatever was read by then is lost rather than blocking the job.
async fn drain(mut task: JoinHandle<std::io::Result<Vec<u8>>>) -> String {
    match tokio::time::timeout(PIPE_DRAIN_GRACE, &mut task).await {
        Ok(Ok(Ok(bytes))) => capture_tail(&bytes),
        Ok(Ok(Err(e))) => {
            warn!(error = %e, "Failed to read renderer output");
            String::new()
        }
        Ok(Err(e)) => {
            warn!(error = %e, "Renderer output reader panicked");
            String::new()
        }
        Err(_) => {
            task.abort();
            warn!("Renderer output pipe still open after exit");
            String::new()
        }
    }
}

fn tail(text: &str, max_chars: usize) -> &str {
    match text.char_indices().rev().nth(max_chars.saturating_sub(1)) {
        Some((idx, _)) if max_chars > 0 => &text[idx..],
        _ => text,
    }
}

fn capture_tail(bytes: &[u8]) -> String {
    let start = bytes.len().saturating_sub(MAX_CAPTURE_BYTES);
    String::from_utf8_lossy(&bytes[start..]).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dispatcher(command: &str, extra_args: &[&str]) -> RenderDispatcher {
        RenderDispatcher::new(&RenderConfig {
            command: command.to_string(),
            extra_args: extra_args.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        })
    }

    #[test]
    fn argument_vector_names_exact_output() {
        let id = JobId::new();
        let args = dispatcher("manim", &[]).build_args(
            Path::new("/scripts/x.py"),
            &id,
            Path::new("/outputs"),
        );

        let expected: Vec<OsString> = [
            "-qh".to_string(),
            "--output_file".to_string(),
            format!("{id}_animation.mp4"),
            "--media_dir".to_string(),
            "/outputs".to_string(),
            "/scripts/x.py".to_string(),
            "logo_animation".to_string(),
        ]
        .into_iter()
        .map(OsString::from)
        .collect();
        assert_eq!(args, expected);
    }

    #[test]
    fn extra_args_come_first() {
        let args = dispatcher("python3", &["-m", "manim"]).build_args(
            Path::new("/s.py"),
            &JobId::new(),
            Path::new("/o"),
        );
        assert_eq!(args[0], "-m");
        assert_eq!(args[1], "manim");
        assert_eq!(args[2], "-qh");
    }

    #[test]
    fn capture_keeps_tail() {
        let mut data = vec![b'a'; MAX_CAPTURE_BYTES];
        data.extend_from_slice(b"END");
        let text = capture_tail(&data);
        assert_eq!(text.len(), MAX_CAPTURE_BYTES);
        assert!(text.ends_with("END"));
    }

    #[test]
    fn tail_is_char_safe() {
        assert_eq!(tail("héllo", 3), "llo");
        assert_eq!(tail("ab", 10), "ab");
    }

    #[tokio::test]
    async fn missing_binary_is_spawn_error() {
        let result = dispatcher("/nonexistent/renderer-binary", &[])
            .dispatch(
                Path::new("/s.py"),
                &JobId::new(),
                Path::new("/o"),
                Duration::from_secs(5),
            )
            .await;
        assert!(matches!(result, Err(RenderError::Spawn { .. })));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn non_zero_exit_is_failure_with_output() {
        let result = dispatcher("sh", &["-c", "echo out; echo err >&2; exit 3", "sh"])
            .dispatch(
                Path::new("/s.py"),
                &JobId::new(),
                Path::new("/o"),
                Duration::from_secs(10),
            )
            .await
            .expect("dispatch");

        assert_eq!(
            result,
            RenderOutcome::Failure {
                exit_code: Some(3),
                stderr: "err\n".to_string(),
                stdout: "out\n".to_string(),
            }
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn deadline_kills_child() {
        let start = Instant::now();
        let result = dispatcher("sh", &["-c", "exec sleep 30", "sh"])
            .dispatch(
                Path::new("/s.py"),
                &JobId::new(),
                Path::new("/o"),
                Duration::from_millis(300),
            )
            .await
            .expect("dispatch");

        assert_eq!(
            result,
            RenderOutcome::TimedOut {
                elapsed: Duration::from_millis(300)
            }
        );
        assert!(start.elapsed() < Duration::from_secs(5));
    }

    /// Backgrounds a `sleep` and records its pid under the media dir (`$5`).
    #[cfg(target_os = "linux")]
    const FORKING_RENDERER: &str = r#"sleep 30 & echo $! > "$5/grandchild.pid"; wait"#;

    /// Whether `pid` is still running; zombies count as gone.
    #[cfg(target_os = "linux")]
    fn process_alive(pid: i32) -> bool {
        std::fs::read_to_string(format!("/proc/{pid}/stat"))
            .ok()
            .and_then(|stat| {
                let (_, rest) = stat.rsplit_once(')')?;
                rest.trim_start().chars().next()
            })
            .is_some_and(|state| state != 'Z' && state != 'X')
    }

    #[cfg(target_os = "linux")]
    async fn assert_grandchild_gone(media_dir: &Path) {
        let pid: i32 = std::fs::read_to_string(media_dir.join("grandchild.pid"))
            .expect("pid file")
            .trim()
            .parse()
            .expect("pid");
        for _ in 0..40 {
            if !process_alive(pid) {
                return;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        panic!("renderer grandchild {pid} survived");
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn deadline_kills_whole_process_group() {
        let tmp = tempfile::tempdir().expect("tempdir");

        let result = dispatcher("sh", &["-c", FORKING_RENDERER, "sh"])
            .dispatch(
                Path::new("/s.py"),
                &JobId::new(),
                tmp.path(),
                Duration::from_millis(500),
            )
            .await
            .expect("dispatch");

        assert!(matches!(result, RenderOutcome::TimedOut { .. }));
        assert_grandchild_gone(tmp.path()).await;
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn dropped_dispatch_kills_whole_process_group() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let dispatcher = dispatcher("sh", &["-c", FORKING_RENDERER, "sh"]);
        let id = JobId::new();

        let pending = tokio::time::timeout(
            Duration::from_millis(500),
            dispatcher.dispatch(Path::new("/s.py"), &id, tmp.path(), Duration::from_secs(60)),
        )
        .await;

        assert!(pending.is_err());
        assert_grandchild_gone(tmp.path()).await;
    }
}
