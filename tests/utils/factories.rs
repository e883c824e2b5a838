/// Test data factories
///
/// Provides records and history rows with sensible defaults
use chrono::{NaiveDate, NaiveDateTime};
use serde_json::{json, Value};
use urbis_lib::modules::jobs::{ImportOperation, ImportStatus};

/// A record that satisfies every local rule
pub fn valid_city_json(name: &str) -> Value {
    json!({
        "name": name,
        "area": 250,
        "population": 120000,
        "capital": false,
        "metersAboveSeaLevel": 15,
        "telephoneCode": 495,
        "climate": "HUMIDSUBTROPICAL",
        "government": "DEMARCHY",
        "establishmentDate": "1147-04-04",
        "coordinates": {"x": 37.6, "y": 55.7},
        "governor": {"height": 178.0}
    })
}

/// Same record referencing stored entities instead of inline ones
pub fn city_with_references(name: &str, coordinates_id: i64, governor_id: i64) -> Value {
    let mut city = valid_city_json(name);
    let object = city.as_object_mut().expect("factory builds an object");
    object.remove("coordinates");
    object.remove("governor");
    object.insert("coordinatesId".to_string(), json!(coordinates_id));
    object.insert("governorId".to_string(), json!(governor_id));
    city
}

pub fn without(mut record: Value, field: &str) -> Value {
    if let Some(object) = record.as_object_mut() {
        object.remove(field);
    }
    record
}

pub fn with(mut record: Value, field: &str, value: Value) -> Value {
    record[field] = value;
    record
}

fn timestamp(minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 5, 1)
        .and_then(|d| d.and_hms_opt(10, minute % 60, 0))
        .expect("valid timestamp")
}

pub fn operation(id: i64, status: ImportStatus) -> ImportOperation {
    let finished = status == ImportStatus::Success || status == ImportStatus::Failed;
    ImportOperation {
        id,
        status,
        added_count: (status == ImportStatus::Success).then_some(3),
        started_at: timestamp(id as u32),
        finished_at: finished.then(|| timestamp(id as u32 + 1)),
        error_message: (status == ImportStatus::Failed).then(|| "constraint violated".to_string()),
    }
}

/// `count` finished operations, most recent first
pub fn finished_operations(count: i64) -> Vec<ImportOperation> {
    (1..=count)
        .rev()
        .map(|id| operation(id, ImportStatus::Success))
        .collect()
}
