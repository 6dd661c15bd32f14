use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;

use super::{read_csv, DataError};
use crate::filter::Race;

/// Population shares by race for one state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateDemographics {
    pub state: String,
    pub code: String,
    /// Race label (as in the header) to population share in `[0, 1]`.
    pub shares: BTreeMap<String, f64>,
}

impl StateDemographics {
    pub fn share(&self, race: &str) -> Option<f64> {
        self.shares.get(race).copied()
    }
}

/// Load `races.csv`: `State`, `State Code`, then one share column per race.
/// File row order is preserved.
///
/// Columns for the selectable races must hold numbers. Any other column is
/// kept only where its value parses; entries such as `<.01` or `N/A` are
/// left out.
pub fn load_demographics(path: &Path) -> Result<Vec<StateDemographics>, DataError> {
    let (header, records) = read_csv(path)?;
    let state_idx = header.require(path, "State")?;
    let code_idx = header.require(path, "State Code")?;
    let race_cols: Vec<(usize, &String)> = header
        .columns
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != state_idx && *i != code_idx)
        .collect();

    let mut out = Vec::with_capacity(records.len());
    for rec in &records {
        let malformed = |reason: String| DataError::MalformedRow {
            path: path.display().to_string(),
            line: rec.line,
            reason,
        };
        let state = rec
            .get(state_idx)
            .ok_or_else(|| malformed("missing field `State`".to_string()))?;
        let code = rec
            .get(code_idx)
            .ok_or_else(|| malformed("missing field `State Code`".to_string()))?;

        let mut shares = BTreeMap::new();
        for (idx, race) in &race_cols {
            let raw = rec.get(*idx).unwrap_or("");
            if raw.is_empty() {
                continue;
            }
            let strict = Race::ALL.iter().any(|r| r.label() == race.as_str());
            match raw.parse::<f64>() {
                Ok(share) => {
                    shares.insert((*race).clone(), share);
                }
                Err(e) if strict => {
                    return Err(malformed(format!("bad share for {} {:?}: {}", race, raw, e)));
                }
                Err(_) => {}
            }
        }

        out.push(StateDemographics {
            state: state.to_string(),
            code: code.to_string(),
            shares,
        });
    }
    Ok(out)
}
