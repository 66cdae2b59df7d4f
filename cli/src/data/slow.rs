use std::process::Stdio;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, trace};
use wattch_platform::ioreg;

use super::{ProducerError, Result, SnapshotStore, SourceCommand};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// The dump ran; this many fields were plausible and stored.
    Updated(usize),
    /// The command could not run or failed; nothing was touched.
    Skipped,
}

/// Polls the battery registry on a fixed interval.
pub struct SlowProducer {
    command: SourceCommand,
    interval: Duration,
    store: SnapshotStore,
}

impl SlowProducer {
    pub fn new(store: SnapshotStore) -> Self {
        Self::with_command(store, SourceCommand::ioreg(), ioreg::POLL_INTERVAL)
    }

    pub fn with_command(store: SnapshotStore, command: SourceCommand, interval: Duration) -> Self {
        Self {
            command,
            interval,
            store,
        }
    }

    /// Run forever on the current runtime. The first poll is immediate.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    async fn run(self) {
        let mut tick = tokio::time::interval(self.interval);
        tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tick.tick().await;
            self.poll_once().await;
        }
    }

    pub async fn poll_once(&self) -> PollOutcome {
        match dump(&self.command).await {
            Ok(text) => {
                let readings = ioreg::fields().scan(&text);
                let count = self.store.write(|snapshot| readings.apply(snapshot));
                trace!(count, "Applied registry dump");
                PollOutcome::Updated(count)
            }
            Err(e) => {
                debug!(error = %e, "Skipping registry poll");
                PollOutcome::Skipped
            }
        }
    }
}

/// Run `command` to completion and return its stdout.
pub async fn dump(command: &SourceCommand) -> Result<String> {
    let output = command
        .command()
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output()
        .await
        .map_err(|source| ProducerError::Spawn {
            program: command.program.clone(),
            source,
        })?;

    if !output.status.success() {
        return Err(ProducerError::Exited {
            program: command.program.clone(),
            status: output.status,
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
