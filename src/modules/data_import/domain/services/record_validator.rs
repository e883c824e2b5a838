/// Static validation of one candidate city record
///
/// Records arrive as untyped JSON. `RecordValidator::check` either proves the
/// record matches the city schema and returns a typed `CandidateCity`, or
/// returns every problem it found. Validation problems are data, never errors.
use crate::modules::city::domain::value_objects::joined_names;
use crate::modules::city::domain::{
    CandidateCity, Climate, CoordinatesSource, Government, GovernorSource, NewCoordinates,
    NewGovernor,
};
use crate::modules::data_import::domain::diagnostic::{Diagnostic, WHOLE_RECORD};
use crate::shared::utils::ValueChecks;
use chrono::NaiveDate;
use serde_json::{Map, Value};

pub const MAX_COORDINATE_X: f64 = 460.0;
pub const TELEPHONE_CODE_RANGE: std::ops::RangeInclusive<i64> = 1..=100_000;

/// A record after validation: either typed or explained
#[derive(Debug, Clone, PartialEq)]
pub enum CandidateRecord {
    Unvalidated {
        index: usize,
        diagnostics: Vec<Diagnostic>,
    },
    Valid(CandidateCity),
}

impl CandidateRecord {
    pub fn diagnostics(&self) -> &[Diagnostic] {
        match self {
            CandidateRecord::Unvalidated { diagnostics, .. } => diagnostics,
            CandidateRecord::Valid(_) => &[],
        }
    }

    pub fn into_valid(self) -> Option<CandidateCity> {
        match self {
            CandidateRecord::Valid(city) => Some(city),
            CandidateRecord::Unvalidated { .. } => None,
        }
    }
}

pub struct RecordValidator;

impl RecordValidator {
    pub fn validate(record: &Value, index: usize) -> Vec<Diagnostic> {
        match Self::check(record, index) {
            CandidateRecord::Unvalidated { diagnostics, .. } => diagnostics,
            CandidateRecord::Valid(_) => Vec::new(),
        }
    }

    pub fn check(record: &Value, index: usize) -> CandidateRecord {
        let object = match record {
            Value::Object(object) => object,
            Value::Null => return Self::whole_record(index, "record is null"),
            _ => return Self::whole_record(index, "expected an object"),
        };

        let mut rules = FieldRules::new(object, index);
        rules.server_assigned("id");
        rules.server_assigned("creationDate");
        let name = rules.name();
        let area = rules.positive_integer("area");
        let population = rules.population();
        let capital = rules.capital();
        let meters_above_sea_level = rules.integer("metersAboveSeaLevel");
        let telephone_code = rules.telephone_code();
        let climate = rules.climate();
        let government = rules.government();
        let establishment_date = rules.establishment_date();
        let coordinates = rules.coordinates();
        let governor = rules.governor();

        if !rules.diagnostics.is_empty() {
            return CandidateRecord::Unvalidated {
                index,
                diagnostics: rules.diagnostics,
            };
        }

        match (
            name,
            area,
            population,
            capital,
            meters_above_sea_level,
            telephone_code,
            climate,
            government,
            establishment_date,
            coordinates,
            governor,
        ) {
            (
                Some(name),
                Some(area),
                Some(population),
                Some(capital),
                Some(meters_above_sea_level),
                Some(telephone_code),
                Some(climate),
                Some(government),
                Some(establishment_date),
                Some(coordinates),
                Some(governor),
            ) => CandidateRecord::Valid(CandidateCity {
                name,
                area,
                population,
                capital,
                meters_above_sea_level,
                telephone_code,
                climate,
                government,
                establishment_date,
                coordinates,
                governor,
            }),
            // every rule returns a value exactly when it adds no diagnostic
            _ => Self::whole_record(index, "record could not be read"),
        }
    }

    fn whole_record(index: usize, message: &str) -> CandidateRecord {
        CandidateRecord::Unvalidated {
            index,
            diagnostics: vec![Diagnostic::new(index, WHOLE_RECORD, message)],
        }
    }
}

/// Evaluates field rules of one object, collecting diagnostics in rule order.
///
/// Each rule returns `Some` with the typed value (itself possibly `None` for
/// optional fields) when it passed and `None` after recording a diagnostic.
struct FieldRules<'a> {
    object: &'a Map<String, Value>,
    index: usize,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> FieldRules<'a> {
    fn new(object: &'a Map<String, Value>, index: usize) -> Self {
        Self {
            object,
            index,
            diagnostics: Vec::new(),
        }
    }

    fn get(&self, field: &str) -> Option<&'a Value> {
        self.object.get(field)
    }

    fn present(&self, field: &str) -> bool {
        !ValueChecks::is_absent(self.get(field))
    }

    fn fail<T>(&mut self, field: &str, message: impl Into<String>) -> Option<T> {
        self.diagnostics
            .push(Diagnostic::new(self.index, field, message));
        None
    }

    fn server_assigned(&mut self, field: &str) {
        if self.present(field) {
            self.fail::<()>(field, "must be omitted (assigned by the server)");
        }
    }

    fn name(&mut self) -> Option<String> {
        match self.get("name").and_then(ValueChecks::non_empty_str) {
            Some(name) => Some(name.to_string()),
            None => self.fail("name", "must be a non-empty string"),
        }
    }

    fn integer(&mut self, field: &str) -> Option<i64> {
        match self.get(field).and_then(ValueChecks::as_integer) {
            Some(value) => Some(value),
            None => self.fail(field, "must be an integer"),
        }
    }

    fn positive_integer(&mut self, field: &str) -> Option<i64> {
        match self.get(field).and_then(ValueChecks::as_integer) {
            Some(value) if value > 0 => Some(value),
            _ => self.fail(field, "must be an integer > 0"),
        }
    }

    fn population(&mut self) -> Option<i64> {
        if !self.present("population") {
            return self.fail("population", "must not be null");
        }
        self.positive_integer("population")
    }

    fn capital(&mut self) -> Option<bool> {
        match self.get("capital") {
            Some(Value::Bool(capital)) => Some(*capital),
            _ => self.fail("capital", "must be a boolean"),
        }
    }

    fn telephone_code(&mut self) -> Option<i64> {
        if !self.present("telephoneCode") {
            return self.fail("telephoneCode", "is required");
        }
        match self.get("telephoneCode").and_then(ValueChecks::as_integer) {
            Some(code) if TELEPHONE_CODE_RANGE.contains(&code) => Some(code),
            _ => self.fail(
                "telephoneCode",
                format!(
                    "must be an integer in range {}..{}",
                    TELEPHONE_CODE_RANGE.start(),
                    TELEPHONE_CODE_RANGE.end()
                ),
            ),
        }
    }

    fn climate(&mut self) -> Option<Climate> {
        match self
            .get("climate")
            .and_then(Value::as_str)
            .and_then(|s| s.trim().parse::<Climate>().ok())
        {
            Some(climate) => Some(climate),
            None => self.fail(
                "climate",
                format!("must be one of {}", joined_names(&Climate::ALL)),
            ),
        }
    }

    fn government(&mut self) -> Option<Option<Government>> {
        if !self.present("government") {
            return Some(None);
        }
        match self
            .get("government")
            .and_then(Value::as_str)
            .and_then(|s| s.trim().parse::<Government>().ok())
        {
            Some(government) => Some(Some(government)),
            None => self.fail(
                "government",
                format!("must be one of {} or null", joined_names(&Government::ALL)),
            ),
        }
    }

    fn establishment_date(&mut self) -> Option<Option<NaiveDate>> {
        if !self.present("establishmentDate") {
            return Some(None);
        }
        match self
            .get("establishmentDate")
            .and_then(ValueChecks::strict_iso_date)
        {
            Some(date) => Some(Some(date)),
            None => self.fail("establishmentDate", "must be a date in YYYY-MM-DD format"),
        }
    }

    fn coordinates(&mut self) -> Option<CoordinatesSource> {
        let by_id = self.present("coordinatesId");
        let inline = self.present("coordinates");

        match (by_id, inline) {
            (true, true) => self.fail(
                "coordinates",
                "specify either coordinatesId or coordinates, not both",
            ),
            (false, false) => self.fail(
                "coordinates",
                "either coordinatesId or coordinates is required",
            ),
            (true, false) => self
                .positive_integer("coordinatesId")
                .map(CoordinatesSource::Existing),
            (false, true) => self
                .inline_coordinates()
                .map(CoordinatesSource::Inline),
        }
    }

    fn inline_coordinates(&mut self) -> Option<NewCoordinates> {
        let nested = match self.get("coordinates") {
            Some(Value::Object(nested)) => nested,
            _ => return self.fail("coordinates", "must be an object"),
        };

        let before = self.diagnostics.len();
        if !ValueChecks::is_absent(nested.get("id")) {
            self.fail::<()>("coordinates.id", "must be omitted");
        }

        let x = match nested.get("x") {
            x if ValueChecks::is_absent(x) => self.fail("coordinates.x", "is required"),
            Some(x) => match ValueChecks::as_finite_number(x) {
                Some(x) if x <= MAX_COORDINATE_X => Some(x),
                _ => self.fail(
                    "coordinates.x",
                    format!("must be a number <= {}", MAX_COORDINATE_X),
                ),
            },
            None => None,
        };

        let y = match nested.get("y") {
            y if ValueChecks::is_absent(y) => self.fail("coordinates.y", "is required"),
            Some(y) => match ValueChecks::as_finite_number(y) {
                Some(y) => Some(y),
                None => self.fail("coordinates.y", "must be a number"),
            },
            None => None,
        };

        if self.diagnostics.len() != before {
            return None;
        }
        Some(NewCoordinates { x: x?, y: y? })
    }

    fn governor(&mut self) -> Option<Option<GovernorSource>> {
        let by_id = self.present("governorId");
        let inline = self.present("governor");

        match (by_id, inline) {
            (true, true) => self.fail(
                "governor",
                "specify either governorId or governor, not both",
            ),
            (false, false) => Some(None),
            (true, false) => self
                .positive_integer("governorId")
                .map(|id| Some(GovernorSource::Existing(id))),
            (false, true) => self
                .inline_governor()
                .map(|governor| Some(GovernorSource::Inline(governor))),
        }
    }

    fn inline_governor(&mut self) -> Option<NewGovernor> {
        let nested = match self.get("governor") {
            Some(Value::Object(nested)) => nested,
            _ => return self.fail("governor", "must be an object"),
        };

        let id_present = !ValueChecks::is_absent(nested.get("id"));
        if id_present {
            self.fail::<()>("governor.id", "must be omitted");
        }

        let height = match nested.get("height") {
            height if ValueChecks::is_absent(height) => {
                self.fail("governor.height", "is required")
            }
            Some(height) => match ValueChecks::as_finite_number(height) {
                Some(height) if height > 0.0 => Some(height),
                _ => self.fail("governor.height", "must be a number > 0"),
            },
            None => None,
        };

        if id_present {
            return None;
        }
        Some(NewGovernor { height: height? })
    }
}
