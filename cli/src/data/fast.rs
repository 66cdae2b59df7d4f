use std::ops::ControlFlow;
use std::process::Stdio;
use std::time::Duration;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::process::{Child, ChildStdout};
use tracing::{debug, info, trace, warn};
use wattch_platform::powermetrics;
use wattch_protocol::TelemetrySnapshot;

use super::{ProducerError, Result, SnapshotStore, SourceCommand};

const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

/// Receives a consistent copy of the snapshot at every sample boundary.
pub trait FrameSink {
    fn frame(&mut self, snapshot: &TelemetrySnapshot) -> std::io::Result<ControlFlow<()>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PumpEnd {
    /// The sampler's stdout reached EOF.
    StreamClosed,
    /// The sink asked to stop.
    SinkDone,
}

/// Feed sampler output into `store`, calling `sink` at every boundary line.
///
/// Each line is scanned before the lock is taken; lines with at least one
/// plausible value are committed in a single write.
pub async fn pump<R, S>(mut reader: R, store: &SnapshotStore, sink: &mut S) -> Result<PumpEnd>
where
    R: AsyncBufRead + Unpin,
    S: FrameSink + ?Sized,
{
    let fields = powermetrics::fields();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            return Ok(PumpEnd::StreamClosed);
        }
        let raw = String::from_utf8_lossy(&buf);
        let line = raw.trim_end_matches(&['\n', '\r'][..]);

        let readings = fields.scan(line);
        if !readings.is_empty() {
            let count = store.write(|snapshot| readings.apply(snapshot));
            trace!(count, line, "Applied sampler line");
        }

        if powermetrics::is_sample_delimiter(line) {
            let snapshot = store.read();
            if sink
                .frame(&snapshot)
                .map_err(ProducerError::Sink)?
                .is_break()
            {
                return Ok(PumpEnd::SinkDone);
            }
        }
    }
}

/// The running power sampler process.
pub struct Sampler {
    command: SourceCommand,
    child: Child,
}

impl Sampler {
    /// Spawn the sampler and hand back its stdout. Failing here is fatal for
    /// the caller; nothing is retried.
    pub fn launch(command: SourceCommand) -> Result<(Self, BufReader<ChildStdout>)> {
        let mut child = command
            .command()
            .stdin(Stdio::inherit())
            .stdout(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ProducerError::Spawn {
                program: command.program.clone(),
                source,
            })?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| ProducerError::MissingStdout(command.program.clone()))?;

        info!(command = %command.display(), pid = ?child.id(), "Power sampler started");
        Ok((Self { command, child }, BufReader::new(stdout)))
    }

    /// Reap the process after its stream closed.
    pub async fn finish(mut self) -> Result<()> {
        let status = self.child.wait().await?;
        info!(%status, "Power sampler exited");
        if status.success() {
            Ok(())
        } else {
            Err(ProducerError::Exited {
                program: self.command.program,
                status,
            })
        }
    }

    /// Stop the sampler, escalating to SIGKILL if it ignores SIGTERM.
    ///
    /// SIGTERM goes first because `sudo` relays it to the elevated child,
    /// which a SIGKILL to `sudo` itself would leave running.
    pub async fn terminate(mut self) {
        if let Some(pid) = self.child.id() {
            debug!(pid, "Sending SIGTERM to power sampler");
            unsafe {
                libc::kill(pid as libc::pid_t, libc::SIGTERM);
            }
        }

        match tokio::time::timeout(SHUTDOWN_GRACE, self.child.wait()).await {
            Ok(Ok(status)) => info!(%status, "Power sampler stopped"),
            Ok(Err(e)) => warn!(error = %e, "Failed waiting for power sampler"),
            Err(_) => {
                warn!("Power sampler ignored SIGTERM, killing");
                if let Err(e) = self.child.kill().await {
                    warn!(error = %e, "Failed to kill power sampler");
                }
            }
        }
    }
}
