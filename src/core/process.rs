use crate::domain::ports::PasswordTransport;
use crate::utils::error::{CasError, Result};
use std::path::Path;
use std::process::Stdio;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::time::Instant;

/// One invocation of the external parser.
#[derive(Clone)]
pub struct ToolInvocation<'a> {
    pub command: &'a str,
    pub extra_args: &'a [String],
    pub input_path: &'a Path,
    pub output_path: &'a Path,
    pub password: &'a str,
    pub transport: &'a PasswordTransport,
    pub timeout: Duration,
}

impl ToolInvocation<'_> {
    /// `<extra_args...> <input> [-p <password>] -o <output>`
    pub fn args(&self) -> Vec<String> {
        let mut args: Vec<String> = self.extra_args.to_vec();
        args.push(self.input_path.display().to_string());
        if self.transport == &PasswordTransport::Argument {
            args.push("-p".to_string());
            args.push(self.password.to_string());
        }
        args.push("-o".to_string());
        args.push(self.output_path.display().to_string());
        args
    }

    fn build_command(&self) -> Command {
        let mut cmd = Command::new(self.command);
        cmd.args(self.args())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        if let PasswordTransport::Environment(var) = self.transport {
            cmd.env(var, self.password);
        }
        cmd
    }
}

/// 執行外部工具並等待結束；逾時會終止子程序
///
/// Resolves once the tool exits with code 0. Stderr is collected while the
/// tool runs and returned inside [`CasError::ProcessError`] on failure. Waiting
/// for the exit and draining stderr share one deadline, so a descendant that
/// keeps the pipe open cannot hold the request past `timeout`.
pub async fn run_tool(invocation: &ToolInvocation<'_>) -> Result<()> {
    tracing::info!(
        "Running {} on {}",
        invocation.command,
        invocation.input_path.display()
    );

    let deadline = Instant::now() + invocation.timeout;

    let mut child = invocation.build_command().spawn().map_err(|e| {
        tracing::error!("Failed to spawn {}: {}", invocation.command, e);
        CasError::IoError(e)
    })?;

    let collected = Arc::new(Mutex::new(String::new()));
    let mut stderr_task = child
        .stderr
        .take()
        .map(|stderr| tokio::spawn(collect_diagnostics(stderr, Arc::clone(&collected))));

    let status = match tokio::time::timeout_at(deadline, child.wait()).await {
        Ok(status) => status?,
        Err(_) => {
            tracing::warn!(
                "{} exceeded {:?}, terminating",
                invocation.command,
                invocation.timeout
            );
            if let Err(e) = child.kill().await {
                tracing::warn!("Failed to kill {}: {}", invocation.command, e);
            }
            if let Some(task) = stderr_task {
                task.abort();
            }
            return Err(CasError::TimeoutError {
                seconds: invocation.timeout.as_secs(),
            });
        }
    };

    if let Some(task) = stderr_task.as_mut() {
        if tokio::time::timeout_at(deadline, &mut *task).await.is_err() {
            tracing::warn!(
                "⚠️ stderr of {} still open at the deadline, keeping partial output",
                invocation.command
            );
            task.abort();
        }
    }

    let diagnostics = match collected.lock() {
        Ok(text) => text.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    };

    tracing::info!("{} exited with {:?}", invocation.command, status.code());

    if !status.success() {
        return Err(CasError::ProcessError {
            exit_code: status.code(),
            diagnostics,
        });
    }

    Ok(())
}

/// 逐段讀取 stderr，寫入共享緩衝區讓中途放棄時仍保有已讀內容
async fn collect_diagnostics<R>(mut stream: R, sink: Arc<Mutex<String>>)
where
    R: AsyncRead + Unpin,
{
    let mut buf = [0u8; 4096];

    loop {
        match stream.read(&mut buf).await {
            Ok(0) => break,
            Ok(n) => {
                let chunk = String::from_utf8_lossy(&buf[..n]);
                tracing::debug!("stderr: {}", chunk.trim_end());
                match sink.lock() {
                    Ok(mut text) => text.push_str(&chunk),
                    Err(poisoned) => poisoned.into_inner().push_str(&chunk),
                }
            }
            Err(e) => {
                tracing::warn!("Stopped reading tool stderr: {}", e);
                break;
            }
        }
    }
}
