use std::net::SocketAddr;

use anyhow::anyhow;
use clap::Parser;
use ream::{
    cli::{Cli, Commands, node::NodeConfig},
    clock::{create_slot_interval, slot_at, unix_now},
};
use ream_attestation_pool::{
    engine::OffChainAggregates,
    messages::{AttestationVerdict, VerdictOutcome},
    sender::AttestationPoolSender,
    service::AttestationPoolService,
    validator::StateAttestationValidator,
};
use ream_executor::ReamExecutor;
use tokio::sync::mpsc;
use tracing::{debug, error, info, trace};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Node(config) => {
            let env_filter = EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.verbosity.directive()));
            tracing_subscriber::fmt().with_env_filter(env_filter).init();

            if let Err(err) = run_node(config) {
                error!("Node exited with error: {err:?}");
                std::process::exit(1);
            }
        }
    }
}

fn run_node(config: NodeConfig) -> anyhow::Result<()> {
    let pool_config = config.attestation_pool_config()?;
    let genesis_time = match config.genesis_time {
        Some(genesis_time) => genesis_time,
        None => unix_now()?,
    };
    info!("Starting attestation pool node with genesis time {genesis_time}: {pool_config:?}");

    let _exporter = if config.enable_metrics {
        let address = SocketAddr::new(config.metrics_address, config.metrics_port);
        info!("Serving metrics on {address}");
        Some(
            prometheus_exporter::start(address)
                .map_err(|err| anyhow!("Failed to start metrics exporter: {err}"))?,
        )
    } else {
        None
    };

    let executor = ReamExecutor::new()?;

    let (pool_sender, pool_receiver) = mpsc::unbounded_channel();
    let (verdict_sender, verdict_receiver) = mpsc::unbounded_channel();
    let (aggregates_sender, aggregates_receiver) = mpsc::unbounded_channel();

    let service =
        AttestationPoolService::new(&pool_config, StateAttestationValidator, pool_receiver)?
            .with_verdict_sender(verdict_sender)
            .with_aggregates_sender(aggregates_sender);
    executor.spawn(async move {
        if let Err(err) = service.start().await {
            error!("Attestation pool service failed: {err:?}");
        }
    });

    let pool = AttestationPoolSender(pool_sender);
    if let Some(anchor) = config.anchor_checkpoint {
        info!("Anchoring pool at checkpoint epoch {}", anchor.epoch);
        pool.send_finalized_checkpoint(anchor);
        pool.send_justified_checkpoint(anchor);
    }
    if let Some(slot) = slot_at(genesis_time, unix_now()?) {
        pool.send_new_slot(slot);
    }

    executor.spawn(log_verdicts(verdict_receiver));
    executor.spawn(log_aggregates(aggregates_receiver));

    let ticker = pool.clone();
    executor.spawn_cancellable(move |mut shutdown| async move {
        let mut interval = match create_slot_interval(genesis_time) {
            Ok(interval) => interval,
            Err(err) => {
                error!("Failed to create slot interval: {err:?}");
                return;
            }
        };

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    match unix_now().map(|now| slot_at(genesis_time, now)) {
                        Ok(Some(slot)) => ticker.send_new_slot(slot),
                        Ok(None) => trace!("Waiting for genesis"),
                        Err(err) => error!("Failed to read system time: {err:?}"),
                    }
                }
                _ = shutdown.recv() => break,
            }
        }
    });

    executor.block_on(tokio::signal::ctrl_c())?;
    info!("Received Ctrl-C, shutting down");
    drop(pool);
    executor.shutdown();

    Ok(())
}

async fn log_verdicts(mut verdicts: mpsc::UnboundedReceiver<AttestationVerdict>) {
    while let Some(verdict) = verdicts.recv().await {
        match verdict.outcome {
            VerdictOutcome::Invalid(reason) => debug!(
                "Invalid attestation for slot {} from {:?}: {reason}",
                verdict.attestation.data.slot, verdict.origin
            ),
            VerdictOutcome::UnknownBlock => debug!(
                "Attestation for slot {} waits for unknown block {}",
                verdict.attestation.data.slot, verdict.attestation.data.beacon_block_root
            ),
            outcome => trace!(
                "Attestation for slot {} from {:?} is {}",
                verdict.attestation.data.slot,
                verdict.origin,
                outcome.label()
            ),
        }
    }
}

async fn log_aggregates(mut aggregates: mpsc::UnboundedReceiver<OffChainAggregates>) {
    while let Some(output) = aggregates.recv().await {
        info!(
            "Aggregates ready on block {} at slot {}: {} aggregates",
            output.block_root,
            output.slot,
            output.aggregates.len()
        );
    }
}
