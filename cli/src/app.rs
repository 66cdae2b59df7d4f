use std::io;

use color_eyre::eyre::{Result, WrapErr};
use tokio::io::AsyncBufRead;
use tracing::{info, warn};

use crate::config::UserConfig;
use crate::data::{
    fast, FrameSink, ProducerError, PumpEnd, Sampler, SlowProducer, SnapshotStore, SourceCommand,
};
use crate::ui::Dashboard;

/// Run the live dashboard until the sampler stops or the user interrupts.
pub fn run_dashboard(config: &UserConfig) -> Result<()> {
    run(config, || Dashboard::new(io::stdout()))
}

/// Start both producers and feed every sample boundary to the sink built by
/// `attach`.
///
/// The sink is only built once the sampler is running, so a launch failure
/// leaves the terminal untouched.
pub fn run<S, F>(config: &UserConfig, attach: F) -> Result<()>
where
    S: FrameSink,
    F: FnOnce() -> io::Result<S>,
{
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        let command = SourceCommand::powermetrics(config.elevate);
        let (sampler, stdout) = Sampler::launch(command)
            .wrap_err("could not start the power sampler (it needs sudo)")?;

        let store = SnapshotStore::new();
        SlowProducer::new(store.clone()).spawn();

        let mut sink = attach()?;
        drive(sampler, stdout, &store, &mut sink).await
    })
}

async fn drive<R, S>(sampler: Sampler, reader: R, store: &SnapshotStore, sink: &mut S) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    S: FrameSink + ?Sized,
{
    // Ctrl+C reaches the sampler too, so its stream may close in the same
    // instant; the interrupt has to win.
    let end = tokio::select! {
        biased;

        signal = tokio::signal::ctrl_c() => {
            if let Err(e) = signal {
                warn!(error = %e, "Failed to listen for interrupt");
            }
            None
        }
        end = fast::pump(reader, store, sink) => Some(end),
    };

    match end {
        Some(Ok(PumpEnd::StreamClosed)) => {
            info!("Power sampler stream closed");
            sampler.finish().await.wrap_err("power sampler failed")?;
        }
        Some(Ok(PumpEnd::SinkDone)) => sampler.terminate().await,
        Some(Err(e @ ProducerError::Sink(_))) => {
            sampler.terminate().await;
            return Err(e.into());
        }
        Some(Err(e)) => {
            sampler.terminate().await;
            return Err(e).wrap_err("lost the power sampler stream");
        }
        None => {
            info!("Interrupted, shutting down");
            sampler.terminate().await;
        }
    }

    Ok(())
}
