use super::step::FlightStep;
use crate::common::{azimuth_degrees, DomainError, DomainResult, Vec3};
use crate::domains::agent::AgentState;
use crate::domains::mission::{FlightPreferences, Location, Mission, MissionAction};
use serde::{Deserialize, Serialize};

pub const CHECKPOINT_COUNT: usize = 9;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlanSettings {
    /// Velocity cap while handling a package on the ground.
    pub slow_velocity: f64,
    /// Height above the pad at which landing at pickup and delivery ends.
    pub landing_clearance: f64,
}

impl Default for PlanSettings {
    fn default() -> Self {
        Self {
            slow_velocity: 0.3,
            landing_clearance: 1.0,
        }
    }
}

/// Nine cruise-altitude checkpoints: out to the pickup, over to the delivery, back home.
pub fn flight_preferences(
    origin: &Location,
    pickup: &Location,
    delivery: &Location,
    max_velocity: f64,
    max_altitude: f64,
) -> FlightPreferences {
    let o = origin.position();
    let p = pickup.position();
    let d = delivery.position();

    let cp1 = o.with_altitude(max_altitude);
    let cp2 = o.midpoint(&p).with_altitude(max_altitude);
    let cp3 = p.with_altitude(max_altitude);
    let cp5 = p.midpoint(&d).with_altitude(max_altitude);
    let cp6 = d.with_altitude(max_altitude);
    let cp8 = d.midpoint(&o).with_altitude(max_altitude);
    let cp9 = cp1;

    let outbound = azimuth_degrees(&cp3, &cp1);
    let crossing = azimuth_degrees(&cp6, &cp3);
    let inbound = azimuth_degrees(&cp9, &cp6);

    let checkpoints: [(Vec3, f64); CHECKPOINT_COUNT] = [
        (cp1, outbound),
        (cp2, outbound),
        (cp3, outbound),
        (cp3, crossing),
        (cp5, crossing),
        (cp6, crossing),
        (cp6, inbound),
        (cp8, inbound),
        (cp9, inbound),
    ];

    FlightPreferences {
        max_velocity,
        max_altitude,
        initial_path: checkpoints
            .iter()
            .map(|(position, heading)| Location::from_position(*position, *heading))
            .collect(),
        avoid_zones: Vec::new(),
    }
}

/// The fifteen-step pickup-and-delivery template over the checkpoints in `preferences`.
pub fn pick_and_delivery_plan(
    origin: &Location,
    pickup: &Location,
    delivery: &Location,
    preferences: &FlightPreferences,
    settings: &PlanSettings,
) -> DomainResult<Vec<FlightStep>> {
    let path = &preferences.initial_path;
    if path.len() != CHECKPOINT_COUNT {
        return Err(DomainError::InvalidCommand {
            reason: format!(
                "initial path has {} checkpoints, expected {}",
                path.len(),
                CHECKPOINT_COUNT
            ),
        });
    }
    let vmax = preferences.max_velocity;
    let half = vmax / 2.0;
    let slow = settings.slow_velocity;
    let clearance = settings.landing_clearance;
    let cruise = |index: usize, state: AgentState, velocity: f64| {
        FlightStep::new(state, path[index].position(), path[index].azimuth, velocity)
    };
    let above = |pad: &Location| pad.position().with_altitude(pad.altitude + clearance);

    Ok(vec![
        cruise(0, AgentState::TakeOff, half),
        cruise(1, AgentState::MoveToCheckPoint, vmax),
        cruise(2, AgentState::MoveToPickupPackage, vmax),
        FlightStep::new(AgentState::Land, above(pickup), pickup.azimuth, vmax),
        FlightStep::new(AgentState::PickUpPackage, pickup.position(), pickup.azimuth, slow),
        cruise(3, AgentState::TakeOff, half),
        cruise(4, AgentState::MoveToCheckPoint, vmax),
        cruise(5, AgentState::MoveToDelivery, vmax),
        FlightStep::new(AgentState::Land, above(delivery), delivery.azimuth, vmax),
        FlightStep::new(AgentState::DeliverPackage, delivery.position(), delivery.azimuth, slow),
        cruise(6, AgentState::TakeOff, half),
        cruise(7, AgentState::MoveToCheckPoint, vmax),
        cruise(8, AgentState::ReturnToHub, vmax),
        FlightStep::new(AgentState::Land, origin.position(), origin.azimuth, vmax),
        FlightStep::new(AgentState::StandBy, origin.position(), origin.azimuth, 0.0),
    ])
}

/// Whether `synthesize` knows a plan for `action`.
pub fn has_template(action: MissionAction) -> bool {
    matches!(action, MissionAction::PickAndDelivery)
}

/// Fills in the mission's flight preferences and returns its plan. The mission must carry a pickup.
pub fn synthesize(
    mission: &mut Mission,
    origin: &Location,
    max_velocity: f64,
    max_altitude: f64,
    settings: &PlanSettings,
) -> DomainResult<Vec<FlightStep>> {
    match mission.action {
        MissionAction::PickAndDelivery => {
            let pickup = mission.pickup_location.ok_or_else(|| DomainError::InvalidCommand {
                reason: format!("mission {} has no pickup location", mission.mission_id),
            })?;
            let preferences = flight_preferences(
                origin,
                &pickup,
                &mission.delivery_location,
                max_velocity,
                max_altitude,
            );
            let plan = pick_and_delivery_plan(
                origin,
                &pickup,
                &mission.delivery_location,
                &preferences,
                settings,
            )?;
            mission.flight_preferences = Some(preferences);
            Ok(plan)
        }
        MissionAction::ReturnToHub => Err(DomainError::InvalidCommand {
            reason: format!(
                "mission {}: no plan template for {}",
                mission.mission_id, mission.action
            ),
        }),
    }
}
