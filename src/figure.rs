//! Plotly.js figure descriptions.
//!
//! Figures are plain `serde` structs; the page embeds their JSON and hands
//! it to `Plotly.newPlot`.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use serde_json::Value;

use crate::bias::StateBias;
use crate::data::{Boundaries, Incident};
use crate::filter::Race;

pub const MAP_CENTER: (f64, f64) = (37.0902, -95.7129);
pub const MAP_ZOOM: f64 = 3.0;
pub const MAP_WIDTH: u32 = 800;
pub const MAP_HEIGHT: u32 = 600;
pub const BIAS_RANGE: (f64, f64) = (0.0, 5.0);

/// CARTO "ag_Sunset" sequential scale, dark (low) to light (high).
pub const AGSUNSET: [&str; 7] = [
    "rgb(75, 41, 145)",
    "rgb(135, 44, 162)",
    "rgb(192, 54, 157)",
    "rgb(234, 79, 136)",
    "rgb(250, 120, 118)",
    "rgb(246, 169, 122)",
    "rgb(237, 217, 163)",
];

pub const BAR_PALETTE: [&str; 6] = [
    "#003f5c", "#444e86", "#955196", "#dd5182", "#ff6e54", "#ffa600",
];

/// Hover fields shown for each scatter marker, in display order.
pub const HOVER_FIELDS: [&str; 7] = [
    "state",
    "city",
    "armed",
    "age",
    "gender",
    "signs_of_mental_illness",
    "threat_level",
];

#[derive(Debug, Clone, Serialize)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: Layout,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Trace {
    Choroplethmapbox(ChoroplethTrace),
    Scattermapbox(ScatterTrace),
    Bar(BarTrace),
}

#[derive(Debug, Clone, Serialize)]
pub struct ChoroplethTrace {
    pub geojson: Value,
    pub locations: Vec<String>,
    pub z: Vec<Option<f64>>,
    pub zmin: f64,
    pub zmax: f64,
    pub colorscale: Vec<(f64, String)>,
    pub marker: ChoroplethMarker,
    pub colorbar: ColorBar,
    pub hovertemplate: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChoroplethMarker {
    pub opacity: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ColorBar {
    pub title: Title,
}

#[derive(Debug, Clone, Serialize)]
pub struct Title {
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScatterTrace {
    pub name: String,
    pub mode: String,
    pub lat: Vec<f64>,
    pub lon: Vec<f64>,
    pub hovertext: Vec<String>,
    pub customdata: Vec<Vec<Value>>,
    pub hovertemplate: String,
    pub marker: Marker,
    pub showlegend: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct Marker {
    pub color: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BarTrace {
    pub name: String,
    pub x: Vec<String>,
    pub y: Vec<usize>,
    pub marker: Marker,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Layout {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mapbox: Option<Mapbox>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin: Option<Margin>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barmode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xaxis: Option<Axis>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Mapbox {
    pub style: String,
    pub zoom: f64,
    pub center: LatLon,
}

#[derive(Debug, Clone, Serialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Margin {
    pub r: u32,
    pub t: u32,
    pub l: u32,
    pub b: u32,
}

impl Margin {
    pub fn zero() -> Self {
        Self { r: 0, t: 0, l: 0, b: 0 }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Axis {
    pub tickangle: i32,
}

impl Figure {
    pub fn to_json(&self) -> String {
        // Only plain data lives in these structs, so serialization cannot fail.
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

fn colorscale(colors: &[&str]) -> Vec<(f64, String)> {
    let steps = colors.len().saturating_sub(1).max(1) as f64;
    colors
        .iter()
        .enumerate()
        .map(|(i, c)| (i as f64 / steps, c.to_string()))
        .collect()
}

fn choropleth_layer(table: &[StateBias], boundaries: &Boundaries) -> ChoroplethTrace {
    ChoroplethTrace {
        geojson: boundaries.as_value().clone(),
        locations: table.iter().map(|s| s.state.clone()).collect(),
        z: table.iter().map(|s| s.ratio).collect(),
        zmin: BIAS_RANGE.0,
        zmax: BIAS_RANGE.1,
        colorscale: colorscale(&AGSUNSET),
        marker: ChoroplethMarker { opacity: 0.5 },
        colorbar: ColorBar {
            title: Title {
                text: "bias_ratio".to_string(),
            },
        },
        hovertemplate: "State=%{location}<br>bias_ratio=%{z}<extra></extra>".to_string(),
    }
}

fn hover_values(row: &Incident) -> Vec<Value> {
    let opt = |v: &Option<String>| v.clone().map(Value::String).unwrap_or(Value::Null);
    vec![
        Value::String(row.state.clone()),
        opt(&row.city),
        Value::String(row.armed.clone()),
        row.age.map(Value::from).unwrap_or(Value::Null),
        opt(&row.gender),
        opt(&row.signs_of_mental_illness),
        opt(&row.threat_level),
    ]
}

/// Incidents of `race` that have a location, in input order.
pub fn marker_rows<'a>(
    incidents: &[&'a Incident],
    race: Race,
) -> Vec<(&'a Incident, (f64, f64))> {
    incidents
        .iter()
        .filter(|r| r.race == race.label())
        .filter_map(|r| r.location().map(|loc| (*r, loc)))
        .collect()
}

fn scatter_layer(incidents: &[&Incident], race: Race) -> ScatterTrace {
    let rows = marker_rows(incidents, race);

    let mut hovertemplate = "<b>%{hovertext}</b><br>".to_string();
    for (i, field) in HOVER_FIELDS.iter().enumerate() {
        hovertemplate.push_str(&format!("<br>{}=%{{customdata[{}]}}", field, i));
    }
    hovertemplate.push_str("<extra></extra>");

    ScatterTrace {
        name: race.label().to_string(),
        mode: "markers".to_string(),
        lat: rows.iter().map(|(_, (lat, _))| *lat).collect(),
        lon: rows.iter().map(|(_, (_, lon))| *lon).collect(),
        hovertext: rows.iter().map(|(r, _)| r.name.clone()).collect(),
        customdata: rows.iter().map(|(r, _)| hover_values(r)).collect(),
        hovertemplate,
        marker: Marker {
            color: "red".to_string(),
        },
        showlegend: false,
    }
}

/// Choropleth of bias ratios with the filtered incidents of `race` drawn
/// as red points on top.
pub fn bias_map(
    table: &[StateBias],
    boundaries: &Boundaries,
    filtered: &[&Incident],
    race: Race,
) -> Figure {
    Figure {
        data: vec![
            Trace::Choroplethmapbox(choropleth_layer(table, boundaries)),
            Trace::Scattermapbox(scatter_layer(filtered, race)),
        ],
        layout: Layout {
            mapbox: Some(Mapbox {
                style: "carto-positron".to_string(),
                zoom: MAP_ZOOM,
                center: LatLon {
                    lat: MAP_CENTER.0,
                    lon: MAP_CENTER.1,
                },
            }),
            margin: Some(Margin::zero()),
            width: Some(MAP_WIDTH),
            height: Some(MAP_HEIGHT),
            ..Layout::default()
        },
    }
}

/// Grouped bars: incident counts per state (sorted by code), one trace per
/// race.
pub fn state_race_counts(incidents: &[Incident]) -> Figure {
    let mut counts: BTreeMap<&str, BTreeMap<&str, usize>> = BTreeMap::new();
    let mut races: BTreeSet<&str> = BTreeSet::new();
    for row in incidents {
        *counts
            .entry(row.state.as_str())
            .or_default()
            .entry(row.race.as_str())
            .or_default() += 1;
        races.insert(row.race.as_str());
    }
    let states: Vec<String> = counts.keys().map(|s| s.to_string()).collect();

    let data = races
        .iter()
        .zip(BAR_PALETTE.iter().cycle())
        .map(|(race, color)| {
            Trace::Bar(BarTrace {
                name: race.to_string(),
                x: states.clone(),
                y: counts
                    .values()
                    .map(|by_race| by_race.get(race).copied().unwrap_or(0))
                    .collect(),
                marker: Marker {
                    color: color.to_string(),
                },
            })
        })
        .collect();

    Figure {
        data,
        layout: Layout {
            barmode: Some("group".to_string()),
            xaxis: Some(Axis { tickangle: -45 }),
            ..Layout::default()
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colorscale_spans_unit_interval() {
        let scale = colorscale(&AGSUNSET);
        assert_eq!(scale.len(), AGSUNSET.len());
        assert_eq!(scale[0].0, 0.0);
        assert_eq!(scale[scale.len() - 1].0, 1.0);
    }

    #[test]
    fn test_trace_type_tags() {
        let trace = Trace::Bar(BarTrace {
            name: "White".to_string(),
            x: vec!["CA".to_string()],
            y: vec![3],
            marker: Marker {
                color: BAR_PALETTE[0].to_string(),
            },
        });
        let v = serde_json::to_value(&trace).unwrap();
        assert_eq!(v["type"], "bar");
        assert_eq!(v["y"][0], 3);
    }

    #[test]
    fn test_layout_skips_unset_fields() {
        let v = serde_json::to_value(Layout::default()).unwrap();
        assert_eq!(v, serde_json::json!({}));
    }
}
