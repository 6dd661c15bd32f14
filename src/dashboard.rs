//! One render pass: read the inputs, filter by the selection, compute the
//! bias table, build the figure and produce the page. Nothing is kept
//! between passes.

use std::collections::BTreeSet;

use anyhow::{Context, Result};
use serde_json::{json, Value};

use crate::bias::{compute_bias_table, StateBias};
use crate::config::DashboardConfig;
use crate::data::{
    load_boundaries, load_demographics, load_incidents, Boundaries, IncidentTable,
    StateDemographics,
};
use crate::figure::{bias_map, marker_rows, state_race_counts};
use crate::filter::{apply_armed, Selection};
use crate::logging::{self, log_file_loaded, log_selection, obj, v_str, Domain, ProfileScope};
use crate::page::{render_counts, render_dashboard, DashboardView, PageAssets};
use crate::states;

/// The three parsed input files.
#[derive(Debug, Clone)]
pub struct Inputs {
    pub incidents: IncidentTable,
    pub demographics: Vec<StateDemographics>,
    pub boundaries: Boundaries,
}

/// Warn about rows that cannot join: demographics whose name and code
/// disagree, and incidents with an unrecognised state code.
fn check_state_keys(incidents: &IncidentTable, demographics: &[StateDemographics]) {
    for demo in demographics {
        if states::code_for(&demo.state) != Some(demo.code.as_str()) {
            logging::warn(
                Domain::Data,
                "state_code_mismatch",
                obj(&[("state", v_str(&demo.state)), ("code", v_str(&demo.code))]),
            );
        }
    }

    let unknown: BTreeSet<&str> = incidents
        .rows
        .iter()
        .map(|r| r.state.as_str())
        .filter(|code| states::name_for(code).is_none())
        .collect();
    if !unknown.is_empty() {
        logging::warn(
            Domain::Data,
            "unknown_state_codes",
            obj(&[(
                "codes",
                Value::Array(unknown.iter().map(|c| v_str(c)).collect()),
            )]),
        );
    }
}

#[derive(Debug, Clone)]
pub struct RenderedPage {
    pub selection: Selection,
    pub html: String,
    pub markers: usize,
    pub table: Vec<StateBias>,
}

#[derive(Debug, Clone)]
pub struct Dashboard {
    config: DashboardConfig,
}

impl Dashboard {
    pub fn new(config: DashboardConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    fn assets(&self) -> PageAssets {
        PageAssets {
            plotly_js_url: self.config.plotly_js_url.clone(),
            mathjax_url: self.config.mathjax_url.clone(),
        }
    }

    fn read_incidents(&self) -> Result<IncidentTable> {
        let path = &self.config.shootings_csv;
        let table = load_incidents(path)
            .with_context(|| format!("loading incidents from {}", path.display()))?;
        log_file_loaded("incidents", &path.display().to_string(), table.rows.len());
        Ok(table)
    }

    pub fn load(&self) -> Result<Inputs> {
        let _scope = ProfileScope::new("load_inputs");
        let incidents = self.read_incidents()?;

        let path = &self.config.races_csv;
        let demographics = load_demographics(path)
            .with_context(|| format!("loading demographics from {}", path.display()))?;
        log_file_loaded("demographics", &path.display().to_string(), demographics.len());

        let path = &self.config.state_geojson;
        let boundaries = load_boundaries(path)
            .with_context(|| format!("loading state boundaries from {}", path.display()))?;
        log_file_loaded("boundaries", &path.display().to_string(), boundaries.names().len());

        check_state_keys(&incidents, &demographics);
        for demo in &demographics {
            if !boundaries.contains(&demo.state) {
                logging::warn(
                    Domain::Data,
                    "state_without_boundary",
                    obj(&[("state", v_str(&demo.state)), ("code", v_str(&demo.code))]),
                );
            }
        }

        Ok(Inputs {
            incidents,
            demographics,
            boundaries,
        })
    }

    pub fn bias_table(inputs: &Inputs, selection: Selection) -> Vec<StateBias> {
        let filtered = apply_armed(&inputs.incidents.rows, selection.armed);
        compute_bias_table(
            &inputs.incidents.rows,
            &filtered,
            &inputs.demographics,
            selection.race,
        )
    }

    pub fn render(&self, selection: Selection) -> Result<RenderedPage> {
        let _scope = ProfileScope::with_context(
            "render_dashboard",
            &[
                ("race", v_str(selection.race.label())),
                ("armed", v_str(selection.armed.label())),
            ],
        );
        let inputs = self.load()?;
        let rows = &inputs.incidents.rows;

        let filtered = apply_armed(rows, selection.armed);
        log_selection(
            selection.race.label(),
            selection.armed.label(),
            filtered.len(),
            rows.len(),
        );

        let table = Self::bias_table(&inputs, selection);
        let figure = bias_map(&table, &inputs.boundaries, &filtered, selection.race);
        let markers = marker_rows(&filtered, selection.race).len();

        let view = DashboardView {
            selection,
            feature_columns: inputs.incidents.feature_columns(),
            map: &figure,
        };
        let html = render_dashboard(&view, &self.assets());

        Ok(RenderedPage {
            selection,
            html,
            markers,
            table,
        })
    }

    /// Bias table for a selection as JSON.
    pub fn bias_json(&self, selection: Selection) -> Result<Value> {
        let inputs = self.load()?;
        let table = Self::bias_table(&inputs, selection);
        Ok(json!({
            "race": selection.race.label(),
            "armed": selection.armed.label(),
            "states": table,
        }))
    }

    pub fn counts_page(&self) -> Result<String> {
        let _scope = ProfileScope::new("render_counts");
        let incidents = self.read_incidents()?;
        let figure = state_race_counts(&incidents.rows);
        Ok(render_counts(&figure, &self.assets()))
    }
}
