use std::path::Path;

use serde::Serialize;

use super::{read_csv, CsvRecord, DataError};

pub const REQUIRED_INCIDENT_COLUMNS: [&str; 6] =
    ["name", "armed", "race", "state", "latitude", "longitude"];

/// One police-shooting incident, geocoded to its city.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Incident {
    pub id: Option<String>,
    pub name: String,
    pub date: Option<String>,
    pub manner_of_death: Option<String>,
    pub armed: String,
    pub age: Option<f64>,
    pub gender: Option<String>,
    pub race: String,
    pub city: Option<String>,
    /// Two-letter state code.
    pub state: String,
    pub signs_of_mental_illness: Option<String>,
    pub threat_level: Option<String>,
    pub flee: Option<String>,
    pub body_camera: Option<String>,
    pub arms_category: Option<String>,
    /// Blank when geocoding found no location; such rows still count toward
    /// state totals but get no map marker.
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl Incident {
    pub fn location(&self) -> Option<(f64, f64)> {
        Some((self.latitude?, self.longitude?))
    }
}

#[derive(Debug, Clone)]
pub struct IncidentTable {
    /// Header columns in file order, including the leading index column.
    pub columns: Vec<String>,
    pub rows: Vec<Incident>,
}

impl IncidentTable {
    /// Column names shown in the data overview (the index column is dropped).
    pub fn feature_columns(&self) -> &[String] {
        self.columns.get(1..).unwrap_or(&[])
    }
}

struct Columns {
    id: Option<usize>,
    name: usize,
    date: Option<usize>,
    manner_of_death: Option<usize>,
    armed: usize,
    age: Option<usize>,
    gender: Option<usize>,
    race: usize,
    city: Option<usize>,
    state: usize,
    signs_of_mental_illness: Option<usize>,
    threat_level: Option<usize>,
    flee: Option<usize>,
    body_camera: Option<usize>,
    arms_category: Option<usize>,
    latitude: usize,
    longitude: usize,
}

pub fn load_incidents(path: &Path) -> Result<IncidentTable, DataError> {
    let (header, records) = read_csv(path)?;
    let cols = Columns {
        id: header.index_of("id"),
        name: header.require(path, "name")?,
        date: header.index_of("date"),
        manner_of_death: header.index_of("manner_of_death"),
        armed: header.require(path, "armed")?,
        age: header.index_of("age"),
        gender: header.index_of("gender"),
        race: header.require(path, "race")?,
        city: header.index_of("city"),
        state: header.require(path, "state")?,
        signs_of_mental_illness: header.index_of("signs_of_mental_illness"),
        threat_level: header.index_of("threat_level"),
        flee: header.index_of("flee"),
        body_camera: header.index_of("body_camera"),
        arms_category: header.index_of("arms_category"),
        latitude: header.require(path, "latitude")?,
        longitude: header.require(path, "longitude")?,
    };

    let rows = records
        .iter()
        .map(|rec| parse_incident(path, &cols, rec))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(IncidentTable {
        columns: header.columns,
        rows,
    })
}

fn parse_incident(path: &Path, cols: &Columns, rec: &CsvRecord) -> Result<Incident, DataError> {
    let malformed = |reason: String| DataError::MalformedRow {
        path: path.display().to_string(),
        line: rec.line,
        reason,
    };
    let required = |idx: usize, column: &str| {
        rec.get(idx)
            .map(str::to_string)
            .ok_or_else(|| malformed(format!("missing field `{}`", column)))
    };
    let coordinate = |idx: usize, column: &str| -> Result<Option<f64>, DataError> {
        match rec.non_empty(Some(idx)) {
            None => Ok(None),
            Some(raw) => raw
                .parse::<f64>()
                .map(Some)
                .map_err(|e| malformed(format!("bad {} {:?}: {}", column, raw, e))),
        }
    };

    Ok(Incident {
        id: rec.non_empty(cols.id),
        name: required(cols.name, "name")?,
        date: rec.non_empty(cols.date),
        manner_of_death: rec.non_empty(cols.manner_of_death),
        armed: required(cols.armed, "armed")?,
        // Ages are sometimes written as floats ("53.0"); blanks stay unknown.
        age: rec.non_empty(cols.age).and_then(|v| v.parse().ok()),
        gender: rec.non_empty(cols.gender),
        race: required(cols.race, "race")?,
        city: rec.non_empty(cols.city),
        state: required(cols.state, "state")?,
        signs_of_mental_illness: rec.non_empty(cols.signs_of_mental_illness),
        threat_level: rec.non_empty(cols.threat_level),
        flee: rec.non_empty(cols.flee),
        body_camera: rec.non_empty(cols.body_camera),
        arms_category: rec.non_empty(cols.arms_category),
        latitude: coordinate(cols.latitude, "latitude")?,
        longitude: coordinate(cols.longitude, "longitude")?,
    })
}
