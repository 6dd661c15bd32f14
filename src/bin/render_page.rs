//! Render the dashboard for one selection to a static HTML file.
//!
//! Usage: render_page [race] [armed] [out.html]

use anyhow::{Context, Result};
use shootingbias::config::DashboardConfig;
use shootingbias::dashboard::Dashboard;
use shootingbias::filter::Selection;
use std::env;
use std::fs;

fn main() -> Result<()> {
    let mut args = env::args().skip(1);
    let race = args.next().unwrap_or_else(|| "White".to_string());
    let armed = args.next().unwrap_or_else(|| "Both".to_string());
    let out = args.next().unwrap_or_else(|| "dashboard.html".to_string());

    let selection = Selection {
        race: race.parse()?,
        armed: armed.parse()?,
    };
    let dashboard = Dashboard::new(DashboardConfig::from_env());
    let page = dashboard.render(selection)?;
    fs::write(&out, &page.html).with_context(|| format!("writing {}", out))?;

    let colored = page.table.iter().filter(|s| s.ratio.is_some()).count();
    println!(
        "wrote {} ({} states, {} with a ratio, {} markers)",
        out,
        page.table.len(),
        colored,
        page.markers
    );
    Ok(())
}
