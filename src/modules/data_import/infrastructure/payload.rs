/// Wire shape of the batch sent to the import endpoint
use crate::modules::city::domain::{
    CandidateCity, Climate, CoordinatesSource, Government, GovernorSource, NewCoordinates,
    NewGovernor,
};
use crate::modules::data_import::domain::ValidatedBatch;
use crate::shared::errors::AppResult;
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CityPayload<'a> {
    name: &'a str,
    area: i64,
    population: i64,
    capital: bool,
    meters_above_sea_level: i64,
    telephone_code: i64,
    climate: Climate,
    #[serde(skip_serializing_if = "Option::is_none")]
    government: Option<Government>,
    #[serde(skip_serializing_if = "Option::is_none")]
    establishment_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    coordinates_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    coordinates: Option<&'a NewCoordinates>,
    #[serde(skip_serializing_if = "Option::is_none")]
    governor_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    governor: Option<&'a NewGovernor>,
}

impl<'a> From<&'a CandidateCity> for CityPayload<'a> {
    fn from(city: &'a CandidateCity) -> Self {
        let (coordinates_id, coordinates) = match &city.coordinates {
            CoordinatesSource::Existing(id) => (Some(*id), None),
            CoordinatesSource::Inline(inline) => (None, Some(inline)),
        };
        let (governor_id, governor) = match &city.governor {
            Some(GovernorSource::Existing(id)) => (Some(*id), None),
            Some(GovernorSource::Inline(inline)) => (None, Some(inline)),
            None => (None, None),
        };

        Self {
            name: &city.name,
            area: city.area,
            population: city.population,
            capital: city.capital,
            meters_above_sea_level: city.meters_above_sea_level,
            telephone_code: city.telephone_code,
            climate: city.climate,
            government: city.government,
            establishment_date: city.establishment_date,
            coordinates_id,
            coordinates,
            governor_id,
            governor,
        }
    }
}

/// JSON array body for a validated batch
pub fn batch_to_json(batch: &ValidatedBatch) -> AppResult<Vec<u8>> {
    let payload: Vec<CityPayload<'_>> = batch.records().iter().map(CityPayload::from).collect();
    Ok(serde_json::to_vec(&payload)?)
}
