use crate::common::{DomainError, DomainResult};
use crate::domains::mission::{CandidatePoint, CandidatePool, Location};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Fixed lists of pickup pads and delivery points.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaticCandidatePool {
    pub pickup_points: Vec<CandidatePoint>,
    pub delivery_points: Vec<CandidatePoint>,
}

impl StaticCandidatePool {
    pub fn new(pickup_points: Vec<CandidatePoint>, delivery_points: Vec<CandidatePoint>) -> Self {
        Self {
            pickup_points,
            delivery_points,
        }
    }

    /// A small neighbourhood around the hub, used when no pool file is configured.
    pub fn demo() -> Self {
        let pad = |name: &str, lat: f64, lon: f64| CandidatePoint::new(name, Location::new(lat, lon, 0.0, 0.0));
        Self::new(
            vec![
                pad("pickup-north", 40.0, 0.0),
                pad("pickup-east", 0.0, 40.0),
                pad("pickup-west", 0.0, -40.0),
            ],
            vec![
                pad("house-1", 120.0, 35.0),
                pad("house-2", 95.0, -60.0),
                pad("house-3", -80.0, 110.0),
                pad("house-4", -130.0, -25.0),
                pad("house-5", 60.0, 150.0),
                pad("house-6", -45.0, -140.0),
                pad("house-7", 150.0, -110.0),
                pad("house-8", -100.0, 70.0),
            ],
        )
    }

    /// Loads a pool from a JSON file holding `pickupPoints` and `deliveryPoints`.
    pub fn from_file<P: AsRef<Path>>(path: P) -> DomainResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| {
            DomainError::InfrastructureError(format!("{}: {}", path.display(), e))
        })?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Path from `FLEET_CANDIDATES_FILE`, else `resources/candidates.json` if it exists.
    pub fn default_path() -> Option<PathBuf> {
        if let Ok(v) = env::var("FLEET_CANDIDATES_FILE") {
            return Some(PathBuf::from(v));
        }
        let cwd_default = Path::new("resources/candidates.json");
        cwd_default.exists().then(|| cwd_default.to_path_buf())
    }
}

impl CandidatePool for StaticCandidatePool {
    fn delivery_points(&self) -> Vec<CandidatePoint> {
        self.delivery_points.clone()
    }

    fn pickup_points(&self) -> Vec<CandidatePoint> {
        self.pickup_points.clone()
    }
}
