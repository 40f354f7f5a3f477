use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    /// Base URL of the repair backend (e.g., "http://localhost:8000").
    pub api_base_url: String,

    /// Poll period between status fetches, in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Directory the terminal report is written into.
    #[serde(default = "default_report_dir")]
    pub report_dir: String,
}

fn default_poll_interval_ms() -> u64 {
    2000
}

fn default_report_dir() -> String {
    ".".to_string()
}

impl AppConfig {
    pub fn from_env() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }
}
