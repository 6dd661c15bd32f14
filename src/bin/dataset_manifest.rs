use shootingbias::config::DashboardConfig;
use shootingbias::data::{
    analyze_csv, default_manifest_path, file_sha256, load_boundaries, REQUIRED_INCIDENT_COLUMNS,
};
use shootingbias::logging::ts_epoch_secs;
use serde_json::json;
use std::fs;

const REQUIRED_RACE_COLUMNS: [&str; 6] =
    ["State", "State Code", "White", "Black", "Asian", "Hispanic"];

fn main() {
    let mut cfg = DashboardConfig::from_env();
    if let Some(dir) = std::env::args().nth(1) {
        cfg = cfg.with_data_dir(std::path::Path::new(&dir));
    }
    let now_ts = ts_epoch_secs();

    let shootings = match analyze_csv(&cfg.shootings_csv, &REQUIRED_INCIDENT_COLUMNS, now_ts) {
        Ok(m) => m,
        Err(err) => {
            eprintln!("incident analysis failed: {}", err);
            std::process::exit(1);
        }
    };
    let races = match analyze_csv(&cfg.races_csv, &REQUIRED_RACE_COLUMNS, now_ts) {
        Ok(m) => m,
        Err(err) => {
            eprintln!("demographics analysis failed: {}", err);
            std::process::exit(1);
        }
    };
    let boundaries = match load_boundaries(&cfg.state_geojson) {
        Ok(b) => b,
        Err(err) => {
            eprintln!("boundary check failed: {}", err);
            std::process::exit(1);
        }
    };
    let geo_hash = file_sha256(&cfg.state_geojson).unwrap_or_default();

    for manifest in [&shootings, &races] {
        if !manifest.missing_columns.is_empty() {
            eprintln!(
                "{}: missing columns {:?}",
                manifest.path, manifest.missing_columns
            );
            std::process::exit(2);
        }
    }

    let payload = json!({
        "shootings": shootings,
        "races": races,
        "boundaries": {
            "path": cfg.state_geojson.display().to_string(),
            "hash_sha256": geo_hash,
            "features": boundaries.names().len(),
        },
        "generated_at_epoch": now_ts,
    });
    let out_path = default_manifest_path(&cfg.shootings_csv);
    let body = match serde_json::to_string_pretty(&payload) {
        Ok(b) => b,
        Err(err) => {
            eprintln!("failed to encode manifest: {}", err);
            std::process::exit(4);
        }
    };
    if let Err(err) = fs::write(&out_path, body) {
        eprintln!("failed to write {}: {}", out_path.display(), err);
        std::process::exit(4);
    }
    println!("wrote manifest {}", out_path.display());
    if !shootings.ok() || !races.ok() {
        eprintln!("warning: malformed rows present, see manifest");
        std::process::exit(3);
    }
}
