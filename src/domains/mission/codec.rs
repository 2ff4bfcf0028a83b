//! JSON encoding for every record that crosses the bus.
//!
//! Decoding is all-or-nothing: blank or malformed input yields a [`DecodeError`].

use super::types::{Mission, MissionAssignment, NewMission, StatusMessage};
use crate::common::{DecodeError, DomainResult};
use serde::de::DeserializeOwned;
use serde::Serialize;

fn encode<T: Serialize>(record: &T) -> DomainResult<String> {
    Ok(serde_json::to_string(record)?)
}

fn decode<T: DeserializeOwned>(kind: &'static str, payload: &str) -> Result<T, DecodeError> {
    if payload.trim().is_empty() {
        return Err(DecodeError::Empty { kind });
    }
    serde_json::from_str(payload).map_err(|source| DecodeError::Malformed { kind, source })
}

pub fn encode_mission(mission: &Mission) -> DomainResult<String> {
    encode(mission)
}

pub fn decode_mission(payload: &str) -> Result<Mission, DecodeError> {
    decode("mission", payload)
}

pub fn encode_new_mission(new_mission: &NewMission) -> DomainResult<String> {
    encode(new_mission)
}

pub fn decode_new_mission(payload: &str) -> Result<NewMission, DecodeError> {
    decode("new mission", payload)
}

pub fn encode_assignment(assignment: &MissionAssignment) -> DomainResult<String> {
    encode(assignment)
}

pub fn decode_assignment(payload: &str) -> Result<MissionAssignment, DecodeError> {
    decode("assignment", payload)
}

pub fn encode_status(status: &StatusMessage) -> DomainResult<String> {
    encode(status)
}

pub fn decode_status(payload: &str) -> Result<StatusMessage, DecodeError> {
    decode("status", payload)
}

/// Serde adapter writing `None` as `""` and reading blank strings (or null) back as `None`.
pub(crate) mod blank_as_none {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};
    use std::fmt::Display;
    use std::str::FromStr;

    pub fn serialize<S, T>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        T: Display,
    {
        match value {
            Some(v) => serializer.collect_str(v),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: FromStr,
        T::Err: Display,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(text) => text.parse().map(Some).map_err(D::Error::custom),
        }
    }
}
