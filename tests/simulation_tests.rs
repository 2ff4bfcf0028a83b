use chrono::{DateTime, TimeZone, Utc};
use fleet_dispatch::adapters::inbound::StaticCandidatePool;
use fleet_dispatch::adapters::outbound::{
    init_noop_logger, InMemoryMissionLog, KinematicFlightController, KinematicSettings, LogLevel,
    MemoryLogger,
};
use fleet_dispatch::application::*;
use fleet_dispatch::domains::agent::AgentState;
use fleet_dispatch::domains::coordinator::AgentCapabilities;
use fleet_dispatch::domains::mission::{
    encode_new_mission, encode_status, CadenceMode, CandidatePoint, CandidatePool, GeneratorSettings,
    Location, MissionLogRecord, MissionStatus, NewMission, StatusMessage,
};
use std::sync::Arc;

const MAX_TICKS: usize = 20_000;

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
}

fn capabilities() -> AgentCapabilities {
    AgentCapabilities {
        max_altitude: 5.0,
        max_velocity: 10.0,
    }
}

fn pool() -> Arc<dyn CandidatePool> {
    Arc::new(StaticCandidatePool::new(
        vec![CandidatePoint::new("pad", Location::new(10.0, 0.0, 0.0, 0.0))],
        vec![CandidatePoint::new("house", Location::new(20.0, 0.0, 0.0, 0.0))],
    ))
}

fn manual_settings() -> SimulationSettings {
    SimulationSettings {
        tick_secs: 0.05,
        start: start(),
        coordinator: CoordinatorServiceSettings {
            generation_enabled: false,
            seed: Some(1),
            ..CoordinatorServiceSettings::default()
        },
        ..SimulationSettings::default()
    }
}

fn simulation() -> (FleetSimulation, Arc<InMemoryMissionLog>) {
    let log = Arc::new(InMemoryMissionLog::new());
    let sim = FleetSimulation::new(manual_settings(), Some(pool()), init_noop_logger(), log.clone());
    (sim, log)
}

fn add_drone(sim: &mut FleetSimulation, name: &str) {
    let controller = KinematicFlightController::new(Location::default(), KinematicSettings::default());
    sim.add_agent(name, Box::new(controller), capabilities()).unwrap();
}

fn submit(sim: &mut FleetSimulation, id: &str, priority: i32) {
    let payload = encode_new_mission(&NewMission {
        mission_id: id.to_string(),
        arrival_date_time: "2024-01-01_11-59-00".to_string(),
        delivery_location: Location::new(20.0, 0.0, 0.0, 0.0),
        package_weight: 1.234,
        priority,
    })
    .unwrap();
    sim.coordinator_mut().submit(payload);
}

fn stored_status(sim: &FleetSimulation, id: &str) -> Option<MissionStatus> {
    sim.coordinator().coordinator().mission(id).map(|m| m.status)
}

fn agent_status(sim: &FleetSimulation, agent: &str) -> Option<MissionStatus> {
    sim.agent(agent)?.agent().mission().map(|m| m.status)
}

#[test]
fn urgent_mission_is_flown_first_and_completes() {
    let (mut sim, log) = simulation();
    add_drone(&mut sim, "drone-1");
    submit(&mut sim, "later", 1);
    submit(&mut sim, "urgent", 0);

    let mut assignments = Vec::new();
    let mut agent_delivered_at = None;
    let mut stored_delivered_at = None;
    let mut agent_done_at = None;
    let mut stored_completed_at = None;
    let mut seen = vec![MissionStatus::Pending];

    for tick in 0..MAX_TICKS {
        let summary = sim.tick();
        assignments.extend(summary.assignments);

        let agent = agent_status(&sim, "drone-1");
        let stored = stored_status(&sim, "urgent");
        if let Some(status) = stored {
            if seen.last() != Some(&status) {
                seen.push(status);
            }
        }
        if agent == Some(MissionStatus::PackageDelivered) && agent_delivered_at.is_none() {
            agent_delivered_at = Some(tick);
        }
        if stored == Some(MissionStatus::PackageDelivered) && stored_delivered_at.is_none() {
            stored_delivered_at = Some(tick);
        }
        if agent_delivered_at.is_some() && agent.is_none() && agent_done_at.is_none() {
            agent_done_at = Some(tick);
        }
        if stored == Some(MissionStatus::Completed) {
            stored_completed_at = Some(tick);
            break;
        }
    }

    assert_eq!(
        assignments.first(),
        Some(&("urgent".to_string(), "drone-1".to_string()))
    );
    assert_eq!(
        seen,
        vec![
            MissionStatus::Pending,
            MissionStatus::InProgress,
            MissionStatus::PackageDelivered,
            MissionStatus::Completed
        ]
    );
    // the coordinator hears about each change on the following tick
    assert_eq!(stored_delivered_at, agent_delivered_at.map(|t| t + 1));
    assert_eq!(stored_completed_at, agent_done_at.map(|t| t + 1));
    assert_eq!(stored_status(&sim, "later"), Some(MissionStatus::Pending));

    let record = log
        .records()
        .into_iter()
        .find(|r| r.mission_id == "urgent")
        .expect("urgent mission logged");
    assert_eq!(record.priority, "0");
    assert_eq!(record.action, "PickAndDelivery");
    assert_eq!(record.package_weight, "1.23");
    assert_eq!(record.arrival_date_time, "2024-01-01_11-59-00");
}

#[test]
fn second_mission_follows_once_the_agent_is_free() {
    let (mut sim, _log) = simulation();
    add_drone(&mut sim, "drone-1");
    submit(&mut sim, "first", 0);
    submit(&mut sim, "second", 0);

    let mut assignments = Vec::new();
    for _ in 0..2 * MAX_TICKS {
        assignments.extend(sim.tick().assignments);
        if stored_status(&sim, "second") == Some(MissionStatus::Completed) {
            break;
        }
    }

    let order: Vec<&str> = assignments.iter().map(|(m, _)| m.as_str()).collect();
    assert_eq!(order, vec!["first", "second"]);
    assert_eq!(stored_status(&sim, "first"), Some(MissionStatus::Completed));
    assert_eq!(stored_status(&sim, "second"), Some(MissionStatus::Completed));

    let archived = sim.coordinator_mut().archive_completed().unwrap();
    assert_eq!(archived.len(), 2);
    assert_eq!(sim.coordinator().overview().archived_missions, 2);
    assert_eq!(sim.coordinator().coordinator().mission_count(), 0);
}

#[test]
fn assignment_waits_for_the_debounce_window() {
    let (mut sim, _log) = simulation();
    add_drone(&mut sim, "drone-1");
    submit(&mut sim, "m-1", 0);

    // tick 0 queues the mission and the agent's first report goes out;
    // tick 1 reads it and the counter passes the window on the seventh tick
    let summaries = sim.run_ticks(6);
    assert!(summaries.iter().all(|s| s.assignments.is_empty()));
    assert_eq!(summaries[0].queued, 1);
    assert_eq!(summaries[1].reports, 1);

    let summary = sim.tick();
    assert_eq!(summary.assignments, vec![("m-1".to_string(), "drone-1".to_string())]);
}

#[test]
fn removed_agent_leaves_its_mission_stalled() {
    let (mut sim, _log) = simulation();
    add_drone(&mut sim, "drone-1");
    submit(&mut sim, "stuck", 0);
    for _ in 0..MAX_TICKS {
        if !sim.tick().assignments.is_empty() {
            break;
        }
    }
    assert_eq!(stored_status(&sim, "stuck"), Some(MissionStatus::InProgress));

    sim.remove_agent("drone-1").unwrap();
    assert!(!sim.bus().is_registered("drone-1"));
    assert!(sim.remove_agent("drone-1").is_err());

    add_drone(&mut sim, "drone-2");
    submit(&mut sim, "fresh", 1);
    let mut assignments = Vec::new();
    for _ in 0..200 {
        assignments.extend(sim.tick().assignments);
    }

    // nothing times out or gets reassigned
    assert_eq!(stored_status(&sim, "stuck"), Some(MissionStatus::InProgress));
    assert_eq!(assignments, vec![("fresh".to_string(), "drone-2".to_string())]);
}

#[test]
fn stale_report_from_a_removed_agent_gets_no_mission() {
    let logger = Arc::new(MemoryLogger::capturing());
    let mut sim = FleetSimulation::new(
        manual_settings(),
        Some(pool()),
        logger.clone(),
        Arc::new(InMemoryMissionLog::new()),
    );
    add_drone(&mut sim, "drone-1");
    // the agent's first report is now waiting in the coordinator's mailbox
    sim.tick();
    sim.remove_agent("drone-1").unwrap();
    submit(&mut sim, "fresh", 0);

    let mut assignments = Vec::new();
    for _ in 0..200 {
        assignments.extend(sim.tick().assignments);
    }
    assert!(assignments.is_empty());
    assert!(sim.coordinator().coordinator().agent("drone-1").is_none());
    assert_eq!(stored_status(&sim, "fresh"), Some(MissionStatus::Pending));
    assert!(logger.contains(LogLevel::Warn, "deregistered agent drone-1"));

    add_drone(&mut sim, "drone-2");
    for _ in 0..50 {
        assignments.extend(sim.tick().assignments);
    }
    assert_eq!(assignments, vec![("fresh".to_string(), "drone-2".to_string())]);
}

#[test]
fn reporter_without_a_bus_handler_is_never_assigned() {
    let (mut sim, _log) = simulation();
    let report = StatusMessage {
        agent_name: "ghost".to_string(),
        timestamp: "2024-01-01_12-00-00".to_string(),
        position_orientation: Location::default(),
        battery_level: 90.0,
        current_state: AgentState::StandBy,
        mission_id: None,
        mission_status: None,
    };
    assert!(sim.bus().send("coordinator", encode_status(&report).unwrap()));
    submit(&mut sim, "m-1", 0);

    let mut assignments = Vec::new();
    for _ in 0..50 {
        assignments.extend(sim.tick().assignments);
    }
    assert!(sim.coordinator().coordinator().agent("ghost").is_some());
    assert!(assignments.is_empty());
    assert_eq!(stored_status(&sim, "m-1"), Some(MissionStatus::Pending));
}

#[test]
fn bad_and_duplicate_intake_is_dropped() {
    let logger = Arc::new(MemoryLogger::capturing());
    let mut sim = FleetSimulation::new(
        manual_settings(),
        Some(pool()),
        logger.clone(),
        Arc::new(InMemoryMissionLog::new()),
    );
    submit(&mut sim, "m-1", 0);
    submit(&mut sim, "m-1", 2);
    sim.coordinator_mut().submit("not a mission".to_string());
    sim.coordinator_mut().submit(String::new());

    let summary = sim.tick();
    assert_eq!(summary.queued, 1);
    assert_eq!(sim.coordinator().coordinator().mission("m-1").unwrap().priority, 0);
    assert_eq!(sim.coordinator().overview().count(MissionStatus::Pending), 1);
    assert!(logger.contains(LogLevel::Info, "Mission m-1 queued"));
    assert!(logger.contains(LogLevel::Warn, "Dropping mission m-1"));
    assert!(logger.contains(LogLevel::Warn, "payload is malformed"));
    assert!(logger.contains(LogLevel::Warn, "payload is empty"));
}

#[test]
fn unknown_reporter_is_registered_and_logged() {
    let (mut sim, log) = simulation();
    let report = StatusMessage {
        agent_name: "ghost".to_string(),
        timestamp: "2024-01-01_12-00-00".to_string(),
        position_orientation: Location::new(1.23456, 2.0, 0.0, 359.999),
        battery_level: 55.556,
        current_state: AgentState::StandBy,
        mission_id: None,
        mission_status: None,
    };
    assert!(sim.bus().send("coordinator", encode_status(&report).unwrap()));
    sim.tick();

    let agent = sim.coordinator().coordinator().agent("ghost").unwrap();
    assert_eq!(agent.capabilities, AgentCapabilities::default());
    assert!(sim.coordinator().overview().idle_agents.contains("ghost"));

    let records = log.records();
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.player_name, "ghost");
    assert_eq!(record.latitude, "1.23");
    assert_eq!(record.azimuth, "360");
    assert_eq!(record.battery, "55.56");
    assert_eq!(record.state, "StandBy");
    assert_eq!(record.mission_id, MissionLogRecord::MISSING);
    assert_eq!(record.mission_status, MissionLogRecord::MISSING);
    assert_eq!(record.priority, MissionLogRecord::MISSING);
}

#[test]
fn agents_tick_in_name_order() {
    let (mut sim, log) = simulation();
    add_drone(&mut sim, "drone-b");
    add_drone(&mut sim, "drone-a");
    assert_eq!(sim.agent_names(), vec!["drone-a", "drone-b"]);

    sim.run_ticks(2);
    let players: Vec<String> = log.records().into_iter().map(|r| r.player_name).collect();
    assert_eq!(players, vec!["drone-a", "drone-b"]);
}

fn generated_ids(seed: u64) -> Vec<String> {
    let settings = SimulationSettings {
        tick_secs: 0.05,
        start: start(),
        coordinator: CoordinatorServiceSettings {
            generation_enabled: true,
            cadence: CadenceMode::Fixed { interval_secs: 1.0 },
            generator: GeneratorSettings {
                max_missions: Some(3),
                ..GeneratorSettings::default()
            },
            seed: Some(seed),
            ..CoordinatorServiceSettings::default()
        },
        ..SimulationSettings::default()
    };
    let mut sim = FleetSimulation::new(
        settings,
        Some(Arc::new(StaticCandidatePool::demo())),
        init_noop_logger(),
        Arc::new(InMemoryMissionLog::new()),
    );
    let generated: usize = sim.run_ticks(200).iter().map(|s| s.generated).sum();
    assert_eq!(generated, 3);

    let coordinator = sim.coordinator().coordinator();
    for mission in coordinator.missions() {
        assert!((0..3).contains(&mission.priority));
        assert!(mission.package_weight >= 0.1 && mission.package_weight < 5.0);
        assert_eq!(mission.status, MissionStatus::Pending);
    }
    let mut ids: Vec<String> = coordinator.missions().map(|m| m.mission_id.clone()).collect();
    ids.sort();
    ids
}

#[test]
fn seeded_generation_is_reproducible_and_capped() {
    let first = generated_ids(42);
    let second = generated_ids(42);
    assert_eq!(first.len(), 3);
    assert_eq!(first, second);
}

#[test]
fn long_run_keeps_the_store_bounded() {
    let settings = SimulationSettings {
        coordinator: CoordinatorServiceSettings {
            generation_enabled: true,
            cadence: CadenceMode::Fixed { interval_secs: 1.0 },
            max_open_per_agent: Some(1),
            archive_completed: true,
            seed: Some(7),
            ..CoordinatorServiceSettings::default()
        },
        ..manual_settings()
    };
    let mut sim = FleetSimulation::new(
        settings,
        Some(pool()),
        init_noop_logger(),
        Arc::new(InMemoryMissionLog::new()),
    );
    add_drone(&mut sim, "drone-1");
    add_drone(&mut sim, "drone-2");

    let mut generated = 0;
    let mut archived = 0;
    for _ in 0..30_000 {
        let summary = sim.tick();
        generated += summary.generated;
        archived += summary.archived;
        let service = sim.coordinator();
        assert!(service.coordinator().mission_count() <= 2);
        assert!(service.overview().mission_statuses.len() <= 2);
        assert!(service.open_missions() <= 2);
    }

    assert!(archived >= 4, "only {} missions archived", archived);
    assert_eq!(sim.coordinator().overview().archived_missions, archived);
    assert!(generated >= archived);
    assert_eq!(sim.coordinator().overview().count(MissionStatus::Completed), 0);
}

#[test]
fn generation_without_a_pool_is_skipped() {
    let settings = SimulationSettings {
        coordinator: CoordinatorServiceSettings {
            cadence: CadenceMode::Fixed { interval_secs: 0.0 },
            ..CoordinatorServiceSettings::default()
        },
        ..manual_settings()
    };
    let mut sim = FleetSimulation::new(
        settings,
        None,
        init_noop_logger(),
        Arc::new(InMemoryMissionLog::new()),
    );
    let generated: usize = sim.run_ticks(20).iter().map(|s| s.generated).sum();
    assert_eq!(generated, 0);
    assert_eq!(sim.coordinator().coordinator().mission_count(), 0);
}
