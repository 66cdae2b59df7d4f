pub mod fast;
pub mod slow;
pub mod store;

use std::io;
use std::process::ExitStatus;

use tokio::process::Command;
use wattch_platform::{ioreg, powermetrics};

pub use fast::{FrameSink, PumpEnd, Sampler};
pub use slow::SlowProducer;
pub use store::SnapshotStore;

#[derive(Debug, thiserror::Error)]
pub enum ProducerError {
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("{0} has no stdout pipe")]
    MissingStdout(String),

    #[error("{program} exited with {status}")]
    Exited { program: String, status: ExitStatus },

    /// The frame sink could not write its output.
    #[error("failed to write output: {0}")]
    Sink(#[source] io::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, ProducerError>;

/// An external command line, kept separate from [`Command`] so it can be
/// inspected, logged and re-spawned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl SourceCommand {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// The streaming power sampler, prefixed with `sudo` when `elevate` is
    /// set and the process is not already running as root.
    pub fn powermetrics(elevate: bool) -> Self {
        let direct = Self::new(powermetrics::PROGRAM, powermetrics::ARGS);
        if elevate && !is_root() {
            direct.elevated()
        } else {
            direct
        }
    }

    pub fn ioreg() -> Self {
        Self::new(ioreg::PROGRAM, ioreg::ARGS)
    }

    fn elevated(self) -> Self {
        let mut args = Vec::with_capacity(self.args.len() + 1);
        args.push(self.program);
        args.extend(self.args);
        Self {
            program: "sudo".to_string(),
            args,
        }
    }

    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd
    }
}

fn is_root() -> bool {
    unsafe { libc::geteuid() == 0 }
}
