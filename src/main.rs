use fleet_dispatch::adapters::inbound::StaticCandidatePool;
use fleet_dispatch::adapters::outbound::{
    init_buffered_logger, init_buffered_mission_log, init_logger, FileMissionLog,
    KinematicFlightController, TracingMissionLog,
};
use fleet_dispatch::application::FleetSimulation;
use fleet_dispatch::domains::mission::{CandidatePool, MissionLogSink};
use fleet_dispatch::{ApplicationResult, Config};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ApplicationResult<()> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());
    let config = Config::load(&config_path)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.logging.level.clone())),
        )
        .init();

    info!("Starting fleet dispatch with {}", config_path);

    let logger = init_buffered_logger(
        init_logger(config.logging.file.as_deref(), &config.logging.level),
        config.logging.buffer_capacity,
    );

    let pool = match config
        .candidates
        .file
        .clone()
        .map(std::path::PathBuf::from)
        .or_else(StaticCandidatePool::default_path)
    {
        Some(path) => StaticCandidatePool::from_file(&path)?,
        None => StaticCandidatePool::demo(),
    };
    info!(
        "Candidate pool: {} pickup pads, {} delivery points",
        pool.pickup_points().len(),
        pool.delivery_points().len()
    );

    let log_sink: Arc<dyn MissionLogSink> = match &config.logging.mission_log {
        Some(path) => init_buffered_mission_log(
            Arc::new(FileMissionLog::new(path, config.logging.mission_log_format)),
            config.logging.buffer_capacity,
            logger.clone(),
        ),
        None => Arc::new(TracingMissionLog),
    };

    let mut simulation = FleetSimulation::new(
        config.simulation_settings(),
        Some(Arc::new(pool) as Arc<dyn CandidatePool>),
        logger.clone(),
        log_sink,
    );
    for spawn in &config.simulation.agents {
        let controller = KinematicFlightController::new(spawn.home, config.agent.controller);
        let capabilities = spawn
            .capabilities
            .unwrap_or(config.coordinator.default_capabilities);
        if let Err(e) = simulation.add_agent(&spawn.name, Box::new(controller), capabilities) {
            warn!("Skipping agent {}: {}", spawn.name, e);
        }
    }

    let tick = Duration::from_secs_f64(config.simulation.tick_secs.max(0.001));
    let mut interval = tokio::time::interval(tick);
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        if config
            .simulation
            .max_ticks
            .map_or(false, |max| simulation.clock().ticks() >= max)
        {
            info!("Reached max ticks");
            break;
        }
        let pace = async {
            if config.simulation.realtime {
                interval.tick().await;
            } else {
                tokio::task::yield_now().await;
            }
        };
        tokio::select! {
            _ = pace => {}
            _ = &mut shutdown => {
                info!("Ctrl-C received");
                break;
            }
        }
        simulation.tick();
    }

    let overview = simulation.coordinator().overview();
    info!(
        "Stopped after {} ticks ({:.1} s simulated): {} missions tracked, {} archived",
        simulation.clock().ticks(),
        simulation.clock().elapsed_secs(),
        overview.mission_statuses.len(),
        overview.archived_missions
    );

    // let the buffered loggers flush
    tokio::time::sleep(Duration::from_millis(100)).await;
    Ok(())
}
