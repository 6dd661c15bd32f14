use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_PLOTLY_JS_URL: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";
pub const DEFAULT_MATHJAX_URL: &str = "https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js";

#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub shootings_csv: PathBuf,
    pub races_csv: PathBuf,
    pub state_geojson: PathBuf,
    pub bind_addr: String,
    pub port: u16,
    pub plotly_js_url: String,
    pub mathjax_url: String,
    /// How long a connection may take to send its request line and headers.
    pub request_timeout: Duration,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            shootings_csv: PathBuf::from("shootings_with_geocode.csv"),
            races_csv: PathBuf::from("races.csv"),
            state_geojson: PathBuf::from("state_geodata.json"),
            bind_addr: "127.0.0.1".to_string(),
            port: 8501,
            plotly_js_url: DEFAULT_PLOTLY_JS_URL.to_string(),
            mathjax_url: DEFAULT_MATHJAX_URL.to_string(),
            request_timeout: Duration::from_millis(5_000),
        }
    }
}

impl DashboardConfig {
    pub fn from_env() -> Self {
        let d = Self::default();
        let path = |key: &str, fallback: PathBuf| {
            std::env::var(key).map(PathBuf::from).unwrap_or(fallback)
        };
        let number = |key: &str| std::env::var(key).ok().and_then(|v| v.parse::<u64>().ok());
        Self {
            shootings_csv: path("SHOOTINGS_CSV", d.shootings_csv),
            races_csv: path("RACES_CSV", d.races_csv),
            state_geojson: path("STATE_GEOJSON", d.state_geojson),
            bind_addr: std::env::var("BIND_ADDR").unwrap_or(d.bind_addr),
            port: std::env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(d.port),
            plotly_js_url: std::env::var("PLOTLY_JS_URL").unwrap_or(d.plotly_js_url),
            mathjax_url: std::env::var("MATHJAX_URL").unwrap_or(d.mathjax_url),
            request_timeout: number("REQUEST_TIMEOUT_MS")
                .filter(|ms| *ms > 0)
                .map(Duration::from_millis)
                .unwrap_or(d.request_timeout),
        }
    }

    /// Same settings with all three inputs read from `dir`.
    pub fn with_data_dir(mut self, dir: &std::path::Path) -> Self {
        self.shootings_csv = dir.join("shootings_with_geocode.csv");
        self.races_csv = dir.join("races.csv");
        self.state_geojson = dir.join("state_geodata.json");
        self
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}
