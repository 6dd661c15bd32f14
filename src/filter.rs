//! Sidebar selections and the armed-type filter.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

use crate::data::Incident;

#[derive(Debug, Error, PartialEq)]
pub enum SelectionError {
    #[error("unknown race {0:?} (expected one of White, Black, Asian, Hispanic)")]
    UnknownRace(String),
    #[error("unknown armed type {0:?} (expected one of Armed, Unarmed, Unknown, Both)")]
    UnknownArmed(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum Race {
    #[default]
    White,
    Black,
    Asian,
    Hispanic,
}

impl Race {
    pub const ALL: [Race; 4] = [Race::White, Race::Black, Race::Asian, Race::Hispanic];

    /// Label as it appears in the incident `race` column and the
    /// demographics header.
    pub fn label(&self) -> &'static str {
        match self {
            Race::White => "White",
            Race::Black => "Black",
            Race::Asian => "Asian",
            Race::Hispanic => "Hispanic",
        }
    }
}

impl fmt::Display for Race {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Race {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Race::ALL
            .iter()
            .copied()
            .find(|r| r.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| SelectionError::UnknownRace(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum ArmedFilter {
    /// Anything not recorded as `unarmed`, including `unknown`.
    Armed,
    Unarmed,
    Unknown,
    #[default]
    Both,
}

impl ArmedFilter {
    pub const ALL: [ArmedFilter; 4] = [
        ArmedFilter::Armed,
        ArmedFilter::Unarmed,
        ArmedFilter::Unknown,
        ArmedFilter::Both,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ArmedFilter::Armed => "Armed",
            ArmedFilter::Unarmed => "Unarmed",
            ArmedFilter::Unknown => "Unknown",
            ArmedFilter::Both => "Both",
        }
    }

    pub fn matches(&self, armed: &str) -> bool {
        match self {
            ArmedFilter::Armed => armed != "unarmed",
            ArmedFilter::Unarmed => armed == "unarmed",
            ArmedFilter::Unknown => armed == "unknown",
            ArmedFilter::Both => true,
        }
    }
}

impl fmt::Display for ArmedFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ArmedFilter {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ArmedFilter::ALL
            .iter()
            .copied()
            .find(|a| a.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| SelectionError::UnknownArmed(s.to_string()))
    }
}

/// What the viewer asked to see.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub race: Race,
    pub armed: ArmedFilter,
}

impl Selection {
    /// Parse `race=..&armed=..` from a URL query string. Missing keys keep
    /// their defaults; unknown keys are ignored.
    pub fn from_query(query: &str) -> Result<Self, SelectionError> {
        let mut sel = Selection::default();
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "race" => sel.race = value.parse()?,
                "armed" => sel.armed = value.parse()?,
                _ => {}
            }
        }
        Ok(sel)
    }

    pub fn to_query(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .append_pair("race", self.race.label())
            .append_pair("armed", self.armed.label())
            .finish()
    }
}

pub fn apply_armed(rows: &[Incident], filter: ArmedFilter) -> Vec<&Incident> {
    rows.iter().filter(|r| filter.matches(&r.armed)).collect()
}
