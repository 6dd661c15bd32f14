use anyhow::Result;
use shootingbias::config::DashboardConfig;
use shootingbias::dashboard::Dashboard;
use shootingbias::logging::{self, obj, v_str, Domain};
use shootingbias::server;

#[tokio::main]
async fn main() -> Result<()> {
    let cfg = DashboardConfig::from_env();
    logging::info(
        Domain::System,
        "startup",
        obj(&[
            ("shootings_csv", v_str(&cfg.shootings_csv.display().to_string())),
            ("races_csv", v_str(&cfg.races_csv.display().to_string())),
            ("state_geojson", v_str(&cfg.state_geojson.display().to_string())),
        ]),
    );

    let dashboard = Dashboard::new(cfg);
    // Fail fast on unreadable inputs; every request still re-reads them.
    dashboard.load()?;

    server::serve(dashboard).await
}
