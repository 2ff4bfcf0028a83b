use crate::adapters::outbound::{KinematicSettings, MissionLogFormat};
use crate::application::{CoordinatorServiceSettings, SimulationSettings};
use crate::domains::agent::{AgentSettings, HandlingTimings};
use crate::domains::coordinator::{AgentCapabilities, CoordinatorSettings};
use crate::domains::flight_plan::PlanSettings;
use crate::domains::mission::{CadenceMode, GeneratorSettings, Location};
use crate::domains::motion::MotionProfiles;
use anyhow::Result;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub simulation: SimulationConfig,
    pub coordinator: CoordinatorConfig,
    pub generator: GeneratorConfig,
    pub agent: AgentConfig,
    pub motion: MotionProfiles,
    pub candidates: CandidatesConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub tick_secs: f64,
    /// Seeds mission generation and pickup choice.
    pub seed: Option<u64>,
    /// Stop after this many ticks. Runs until Ctrl-C when unset.
    pub max_ticks: Option<u64>,
    /// Pace ticks on the wall clock instead of running flat out.
    pub realtime: bool,
    pub agents: Vec<AgentSpawn>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSpawn {
    pub name: String,
    pub home: Location,
    #[serde(default)]
    pub capabilities: Option<AgentCapabilities>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CoordinatorConfig {
    pub id: String,
    pub mailbox_capacity: usize,
    pub assignment_debounce_ticks: u32,
    pub default_capabilities: AgentCapabilities,
    pub plan: PlanSettings,
    /// Drop Completed missions every tick so a long run keeps a bounded store.
    pub archive_completed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub enabled: bool,
    pub cadence: CadenceMode,
    pub min_package_weight: f64,
    pub max_package_weight: f64,
    pub priority_levels: i32,
    pub max_missions: Option<usize>,
    /// Open missions allowed per registered agent before generation pauses.
    pub max_open_per_agent: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub status_interval_secs: f64,
    pub handling: HandlingTimings,
    pub mailbox_capacity: usize,
    pub controller: KinematicSettings,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CandidatesConfig {
    /// JSON pool file. The built-in demo pool is used when unset.
    pub file: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// fast_log file for domain log lines. Console only when unset.
    pub file: Option<String>,
    /// Status-report log. Written through a buffered background task.
    pub mission_log: Option<String>,
    pub mission_log_format: MissionLogFormat,
    pub buffer_capacity: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_secs: 0.05,
            seed: None,
            max_ticks: None,
            realtime: true,
            agents: vec![AgentSpawn {
                name: "drone-1".to_string(),
                home: Location::default(),
                capabilities: None,
            }],
        }
    }
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        let settings = CoordinatorSettings::default();
        Self {
            id: "coordinator".to_string(),
            mailbox_capacity: 1000,
            assignment_debounce_ticks: settings.assignment_debounce_ticks,
            default_capabilities: settings.default_capabilities,
            plan: settings.plan,
            archive_completed: true,
        }
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        let settings = GeneratorSettings::default();
        Self {
            enabled: true,
            cadence: CadenceMode::default(),
            min_package_weight: settings.min_package_weight,
            max_package_weight: settings.max_package_weight,
            priority_levels: settings.priority_levels,
            max_missions: settings.max_missions,
            max_open_per_agent: Some(1),
        }
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        let settings = AgentSettings::default();
        Self {
            status_interval_secs: settings.status_interval_secs,
            handling: settings.handling,
            mailbox_capacity: 1000,
            controller: KinematicSettings::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
            mission_log: None,
            mission_log_format: MissionLogFormat::default(),
            buffer_capacity: 1024,
        }
    }
}

impl Config {
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = tokio::fs::read_to_string(path).await?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Defaults, then `path` if it exists, then `FLEET__SECTION__KEY` environment overrides.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = config::Config::builder()
            .add_source(config::Config::try_from(&Config::default())?)
            .add_source(config::File::from(path.as_ref()).required(false))
            .add_source(
                config::Environment::with_prefix("FLEET")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        Ok(config.try_deserialize()?)
    }

    pub fn simulation_settings(&self) -> SimulationSettings {
        SimulationSettings {
            tick_secs: self.simulation.tick_secs,
            start: Utc::now(),
            coordinator: CoordinatorServiceSettings {
                address: self.coordinator.id.clone(),
                mailbox_capacity: self.coordinator.mailbox_capacity,
                coordinator: CoordinatorSettings {
                    assignment_debounce_ticks: self.coordinator.assignment_debounce_ticks,
                    default_capabilities: self.coordinator.default_capabilities,
                    plan: self.coordinator.plan,
                },
                generation_enabled: self.generator.enabled,
                cadence: self.generator.cadence,
                generator: GeneratorSettings {
                    min_package_weight: self.generator.min_package_weight,
                    max_package_weight: self.generator.max_package_weight,
                    priority_levels: self.generator.priority_levels,
                    max_missions: self.generator.max_missions,
                },
                max_open_per_agent: self.generator.max_open_per_agent,
                archive_completed: self.coordinator.archive_completed,
                seed: self.simulation.seed,
            },
            agent: AgentSettings {
                status_interval_secs: self.agent.status_interval_secs,
                handling: self.agent.handling,
            },
            agent_mailbox_capacity: self.agent.mailbox_capacity,
            motion: self.motion,
        }
    }
}
