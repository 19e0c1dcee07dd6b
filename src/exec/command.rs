// src/exec/command.rs

use std::collections::VecDeque;
use std::io::ErrorKind;
use std::process::Stdio;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::errors::{RebuildError, Result};
use crate::exec::backend::BuildStep;

/// Lines kept per stream for the failure report; earlier lines are dropped.
pub const MAX_CAPTURED_LINES: usize = 200;

/// Run one build step as a child process and wait for it.
///
/// The working directory is handed to the child; the current directory of
/// this process is never changed. stdout/stderr are logged at debug and the
/// tail of both is attached to [`RebuildError::BuildStepFailed`].
pub async fn run_step(step: &BuildStep) -> Result<()> {
    if !step.working_dir.is_dir() {
        return Err(RebuildError::ConfigError(format!(
            "build working directory {:?} does not exist",
            step.working_dir
        )));
    }

    info!(step = %step.kind, cmd = %step, dir = ?step.working_dir, "starting build step");

    let mut cmd = if cfg!(windows) {
        // Package managers ship as `.cmd` shims on Windows.
        let mut c = Command::new("cmd");
        c.arg("/C").arg(&step.program).args(&step.args);
        c
    } else {
        let mut c = Command::new(&step.program);
        c.args(&step.args);
        c
    };

    cmd.current_dir(&step.working_dir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = match cmd.spawn() {
        Ok(child) => child,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(RebuildError::ToolUnavailable {
                tool: step.program.clone(),
            });
        }
        Err(e) => {
            return Err(anyhow::Error::new(e)
                .context(format!("spawning '{}'", step))
                .into());
        }
    };

    let stdout = child.stdout.take();
    let stderr = child.stderr.take();

    let (out_lines, err_lines, status) = tokio::join!(
        capture_lines(stdout, step, "stdout"),
        capture_lines(stderr, step, "stderr"),
        child.wait(),
    );
    let status = status.with_context(|| format!("waiting for '{}'", step))?;

    info!(
        step = %step.kind,
        exit_code = status.code().unwrap_or(-1),
        success = status.success(),
        "build step exited"
    );

    if status.success() {
        return Ok(());
    }
    if cfg!(windows) && is_shell_not_found(status.code()) {
        return Err(RebuildError::ToolUnavailable {
            tool: step.program.clone(),
        });
    }

    Err(RebuildError::BuildStepFailed {
        step: step.kind,
        code: status.code(),
        output: format_output(&out_lines, &err_lines),
    })
}

/// Drain a child stream line by line, keeping the last
/// [`MAX_CAPTURED_LINES`] lines.
///
/// Lines are split on raw `\n` and decoded lossily, so non-UTF-8 output
/// never stops the read. The stream is always consumed to EOF: closing the
/// pipe early would make the child fail on its next write.
async fn capture_lines<R>(stream: Option<R>, step: &BuildStep, label: &str) -> VecDeque<String>
where
    R: AsyncRead + Unpin,
{
    let mut kept = VecDeque::new();
    let Some(stream) = stream else {
        return kept;
    };

    let mut reader = BufReader::new(stream);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf);
                let line = line.trim_end_matches(['\n', '\r']).to_string();
                debug!(step = %step.kind, "{label}: {line}");
                if kept.len() == MAX_CAPTURED_LINES {
                    kept.pop_front();
                }
                kept.push_back(line);
            }
            Err(e) => {
                warn!(step = %step.kind, error = %e, "cannot read {label}; discarding the rest");
                let _ = tokio::io::copy(&mut reader, &mut tokio::io::sink()).await;
                break;
            }
        }
    }
    kept
}

/// `cmd /C` always spawns, so a missing program only shows up as its
/// "is not recognized" exit status.
const CMD_NOT_FOUND: i32 = 9009;

fn is_shell_not_found(code: Option<i32>) -> bool {
    code == Some(CMD_NOT_FOUND)
}

fn format_output(stdout: &VecDeque<String>, stderr: &VecDeque<String>) -> String {
    let mut out = String::new();
    for (label, lines) in [("stdout", stdout), ("stderr", stderr)] {
        if lines.is_empty() {
            continue;
        }
        out.push_str("--- ");
        out.push_str(label);
        out.push_str(" ---\n");
        for line in lines {
            out.push_str(line);
            out.push('\n');
        }
    }
    out
}
