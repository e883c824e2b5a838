/// Typed city records
///
/// A `CandidateCity` only exists after a raw record passed every local rule;
/// see `RecordValidator::check` in the data import context.
use super::value_objects::{Climate, Government};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// New coordinates created together with the city
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCoordinates {
    pub x: f64,
    pub y: f64,
}

/// New governor created together with the city
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewGovernor {
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CoordinatesSource {
    Existing(i64),
    Inline(NewCoordinates),
}

#[derive(Debug, Clone, PartialEq)]
pub enum GovernorSource {
    Existing(i64),
    Inline(NewGovernor),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CandidateCity {
    pub name: String,
    pub area: i64,
    pub population: i64,
    pub capital: bool,
    pub meters_above_sea_level: i64,
    pub telephone_code: i64,
    pub climate: Climate,
    pub government: Option<Government>,
    pub establishment_date: Option<NaiveDate>,
    pub coordinates: CoordinatesSource,
    pub governor: Option<GovernorSource>,
}

impl CandidateCity {
    pub fn coordinates_id(&self) -> Option<i64> {
        match self.coordinates {
            CoordinatesSource::Existing(id) => Some(id),
            CoordinatesSource::Inline(_) => None,
        }
    }

    pub fn governor_id(&self) -> Option<i64> {
        match self.governor {
            Some(GovernorSource::Existing(id)) => Some(id),
            _ => None,
        }
    }
}

/// Stored coordinates as returned by the lookup endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoordinatesDetails {
    pub id: i64,
    pub x: f64,
    pub y: f64,
}

/// Stored person as returned by the lookup endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GovernorDetails {
    pub id: i64,
    pub height: f64,
}
