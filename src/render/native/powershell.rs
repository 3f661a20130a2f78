//! Automation host backed by a long-lived PowerShell process driving
//! `PowerPoint.Application` over COM.
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use std::process::{Child, ChildStdin, Command, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::config::RenderConfig;
use crate::error::{Error, HandshakeError, Result};

use super::host::{AutomationHost, HostCommand};
use super::script::{Reply, batch_script, handshake_script, parse_reply, shutdown_script};

const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);
const POLL_INTERVAL: Duration = Duration::from_millis(50);

struct Session {
    child: Child,
    stdin: ChildStdin,
    replies: Receiver<String>,
}

enum WaitError {
    Timeout,
    Disconnected,
    Failed(String),
}

pub struct PowerShellHost {
    program: PathBuf,
    command_timeout: Duration,
    session: Option<Session>,
    seq: u64,
}

impl PowerShellHost {
    pub fn new(program: impl Into<PathBuf>, command_timeout: Duration) -> Self {
        Self {
            program: program.into(),
            command_timeout,
            session: None,
            seq: 0,
        }
    }

    pub fn from_config(render: &RenderConfig) -> Self {
        Self::new(&render.powershell, render.command_timeout())
    }

    fn next_seq(&mut self) -> u64 {
        self.seq += 1;
        self.seq
    }

    fn spawn(&self) -> std::result::Result<Session, HandshakeError> {
        let mut child = Command::new(&self.program)
            .args(["-NoLogo", "-NoProfile", "-NonInteractive", "-Command", "-"])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(HandshakeError::Spawn)?;

        let (Some(stdin), Some(stdout)) = (child.stdin.take(), child.stdout.take()) else {
            let _ = child.kill();
            return Err(HandshakeError::Disconnected);
        };

        let (tx, rx) = mpsc::channel();
        let reader = thread::Builder::new()
            .name("powershell-reader".to_string())
            .spawn(move || {
                for line in BufReader::new(stdout).lines() {
                    let Ok(line) = line else { break };
                    if tx.send(line).is_err() {
                        break;
                    }
                }
            });
        if let Err(e) = reader {
            let _ = child.kill();
            return Err(HandshakeError::Spawn(e));
        }

        Ok(Session {
            child,
            stdin,
            replies: rx,
        })
    }

    /// Send one script and wait for the reply carrying `seq`.
    fn round_trip(&mut self, script: &str, seq: u64, timeout: Duration) -> std::result::Result<(), WaitError> {
        let session = self.session.as_mut().ok_or(WaitError::Disconnected)?;
        session
            .stdin
            .write_all(script.as_bytes())
            .and_then(|_| session.stdin.flush())
            .map_err(|_| WaitError::Disconnected)?;

        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match session.replies.recv_timeout(remaining) {
                Ok(line) => match parse_reply(&line) {
                    Some(Reply::Ack(n)) if n == seq => return Ok(()),
                    Some(Reply::Failed(n, message)) if n == seq => return Err(WaitError::Failed(message)),
                    _ => debug!(line = %line, "ignoring host output"),
                },
                Err(RecvTimeoutError::Timeout) => return Err(WaitError::Timeout),
                Err(RecvTimeoutError::Disconnected) => return Err(WaitError::Disconnected),
            }
        }
    }
}

impl AutomationHost for PowerShellHost {
    fn name(&self) -> &str {
        "powershell"
    }

    fn handshake(&mut self, timeout: Duration) -> std::result::Result<(), HandshakeError> {
        if !cfg!(windows) {
            return Err(HandshakeError::UnsupportedPlatform(std::env::consts::OS));
        }
        if self.session.is_some() {
            return Ok(());
        }

        self.session = Some(self.spawn()?);
        let seq = self.next_seq();
        match self.round_trip(&handshake_script(seq), seq, timeout) {
            Ok(()) => {
                info!(program = %self.program.display(), "automation host ready");
                Ok(())
            },
            Err(e) => {
                self.shutdown();
                Err(match e {
                    WaitError::Timeout => HandshakeError::Timeout(timeout),
                    WaitError::Disconnected => HandshakeError::Disconnected,
                    WaitError::Failed(message) => HandshakeError::Denied(message),
                })
            },
        }
    }

    fn execute(&mut self, commands: &[HostCommand]) -> Result<()> {
        if commands.is_empty() {
            return Ok(());
        }
        let seq = self.next_seq();
        let script = batch_script(seq, commands)?;
        let timeout = self.command_timeout;
        self.round_trip(&script, seq, timeout)
            .map_err(|e| match e {
                WaitError::Timeout => {
                    Error::Render(format!("automation host did not finish batch {seq} within {timeout:?}"))
                },
                WaitError::Disconnected => Error::Render("automation host exited".to_string()),
                WaitError::Failed(message) => Error::Render(message),
            })
    }

    fn shutdown(&mut self) {
        let Some(Session {
            mut child,
            mut stdin,
            replies,
        }) = self.session.take()
        else {
            return;
        };
        let _ = stdin.write_all(shutdown_script().as_bytes());
        let _ = stdin.flush();
        drop(stdin);
        drop(replies);

        let deadline = Instant::now() + SHUTDOWN_GRACE;
        while Instant::now() < deadline {
            match child.try_wait() {
                Ok(Some(_)) => return,
                Ok(None) => thread::sleep(POLL_INTERVAL),
                Err(_) => break,
            }
        }
        warn!("automation host did not exit, killing it");
        let _ = child.kill();
        let _ = child.wait();
    }
}

impl Drop for PowerShellHost {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(not(windows))]
    #[test]
    fn test_handshake_unsupported_off_windows() {
        let mut host = PowerShellHost::from_config(&RenderConfig::default());
        let err = host.handshake(Duration::from_millis(10)).unwrap_err();
        assert!(matches!(err, HandshakeError::UnsupportedPlatform(_)));
    }

    #[test]
    fn test_execute_without_session_fails() {
        let mut host = PowerShellHost::new("powershell", Duration::from_millis(10));
        let err = host.execute(&[HostCommand::Close]).unwrap_err();
        assert!(matches!(err, Error::Render(_)));
        assert!(host.execute(&[]).is_ok());
    }

    #[test]
    fn test_shutdown_is_idempotent() {
        let mut host = PowerShellHost::new("powershell", Duration::from_millis(10));
        host.shutdown();
        host.shutdown();
        assert_eq!(host.name(), "powershell");
    }
}
