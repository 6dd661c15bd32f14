//! End-to-end render passes over fixture files.

mod common;

use serde_json::Value;
use shootingbias::dashboard::Dashboard;
use shootingbias::filter::{ArmedFilter, Race, Selection};
use shootingbias::server::route;
use std::fs;
use tempfile::TempDir;

fn fixture() -> (TempDir, Dashboard) {
    let dir = TempDir::new().unwrap();
    let cfg = common::write_fixture(dir.path());
    (dir, Dashboard::new(cfg))
}

/// Pull the figure JSON back out of the inline `Plotly.newPlot` script.
fn embedded_figure(html: &str) -> Value {
    let start = html.find("var fig=").expect("figure script") + "var fig=".len();
    let end = start + html[start..].find(";Plotly.newPlot").expect("newPlot call");
    serde_json::from_str(&html[start..end].replace("<\\/", "</")).unwrap()
}

#[test]
fn page_has_both_layers_for_selection() {
    let (_dir, dashboard) = fixture();
    let page = dashboard
        .render(Selection {
            race: Race::Black,
            armed: ArmedFilter::Both,
        })
        .unwrap();

    assert_eq!(page.markers, 3);
    assert!(page.html.contains("Data Visualization of US Police Shooting"));
    assert!(page.html.contains("Notes for bias ratio"));
    assert!(page.html.contains("<td>latitude</td>"));

    let fig = embedded_figure(&page.html);
    assert_eq!(fig["data"][0]["type"], "choroplethmapbox");
    assert_eq!(fig["data"][1]["type"], "scattermapbox");
    assert_eq!(fig["data"][0]["locations"][1], "Pennsylvania");
    assert_eq!(fig["data"][0]["z"][2], 0.0);
    assert_eq!(fig["data"][0]["zmax"], 5.0);
    assert_eq!(fig["data"][0]["geojson"]["features"][0]["id"], "Georgia");
    assert_eq!(fig["data"][0]["colorbar"]["title"]["text"], "bias_ratio");
    assert_eq!(fig["data"][1]["marker"]["color"], "red");
    assert_eq!(fig["data"][1]["hovertext"][1], "Carter, Chris");
    assert_eq!(fig["data"][1]["customdata"][0][0], "GA");
    assert_eq!(fig["layout"]["mapbox"]["style"], "carto-positron");
    assert_eq!(fig["layout"]["margin"]["t"], 0);
}

#[test]
fn scatter_respects_armed_filter() {
    let (_dir, dashboard) = fixture();
    let page = dashboard
        .render(Selection {
            race: Race::Black,
            armed: ArmedFilter::Unarmed,
        })
        .unwrap();
    assert_eq!(page.markers, 2);
    let fig = embedded_figure(&page.html);
    let names: Vec<&str> = fig["data"][1]["hovertext"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(Value::as_str)
        .collect();
    assert_eq!(names, ["Ben Baker", "Finn Ford"]);
}

#[test]
fn every_request_rereads_inputs() {
    let (dir, dashboard) = fixture();
    let sel = Selection::default();
    assert_eq!(dashboard.render(sel).unwrap().markers, 2);

    common::write_shootings(dir.path(), &common::SHOOTINGS_ROWS[..1]);
    assert_eq!(dashboard.render(sel).unwrap().markers, 1);
}

#[test]
fn routes_answer_with_expected_status() {
    let (_dir, dashboard) = fixture();

    let resp = route(&dashboard, "GET", "/?race=Asian&armed=Armed");
    assert_eq!(resp.status, 200);
    assert!(resp.content_type.starts_with("text/html"));
    assert!(resp.body.contains("value=\"Asian\" onchange=\"this.form.submit()\" checked"));

    let resp = route(&dashboard, "GET", "/api/bias?race=Black");
    assert_eq!(resp.status, 200);
    let v: Value = serde_json::from_str(&resp.body).unwrap();
    assert_eq!(v["race"], "Black");
    assert_eq!(v["armed"], "Both");
    assert_eq!(v["states"][2]["ratio"], 0.0);

    assert_eq!(route(&dashboard, "GET", "/counts").status, 200);
    assert_eq!(route(&dashboard, "GET", "/api/health").status, 200);
    assert_eq!(route(&dashboard, "GET", "/?race=Martian").status, 400);
    assert_eq!(route(&dashboard, "GET", "/missing").status, 404);
    assert_eq!(route(&dashboard, "POST", "/").status, 405);
}

#[test]
fn broken_input_is_a_server_error() {
    let (dir, dashboard) = fixture();
    fs::remove_file(dir.path().join("races.csv")).unwrap();
    let resp = route(&dashboard, "GET", "/");
    assert_eq!(resp.status, 500);
    assert!(resp.body.contains("races.csv"), "{}", resp.body);
}

#[test]
fn counts_page_groups_by_race() {
    let (_dir, dashboard) = fixture();
    let html = dashboard.counts_page().unwrap();
    let fig = embedded_figure(&html);
    assert_eq!(fig["layout"]["barmode"], "group");
    assert_eq!(fig["layout"]["xaxis"]["tickangle"], -45);

    let traces = fig["data"].as_array().unwrap();
    let names: Vec<&str> = traces.iter().filter_map(|t| t["name"].as_str()).collect();
    assert_eq!(names, ["Black", "Hispanic", "White"]);
    // x is [GA, PA]; Black has 2 in GA, 1 in PA
    assert_eq!(traces[0]["x"][0], "GA");
    assert_eq!(traces[0]["y"][0], 2);
    assert_eq!(traces[0]["y"][1], 1);
}
