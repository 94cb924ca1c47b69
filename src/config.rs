use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::data::filter::TopN;

/// Startup configuration. Every flag can also come from the environment.
#[derive(Debug, Clone, Parser)]
#[command(name = "ranking-dashboard", version, about = "Sales progress and ranking dashboard")]
pub struct Config {
    /// Source table (.xlsx, .xls, .ods, .csv, .json or .parquet)
    #[arg(long, env = "DASHBOARD_DATA", default_value = "avance.xlsx")]
    pub data: PathBuf,

    /// Seconds a loaded dataset is reused before the source is read again
    #[arg(long, env = "DASHBOARD_CACHE_TTL_SECS", default_value_t = 3600)]
    pub cache_ttl_secs: u64,

    /// Initial size of the ranking table (clamped to 1..=50)
    #[arg(long, env = "DASHBOARD_TOP_N", default_value_t = 10, allow_negative_numbers = true)]
    pub top_n: i64,

    /// Image shown next to the title
    #[arg(long, env = "DASHBOARD_LOGO")]
    pub logo: Option<PathBuf>,

    /// Image shown at the top of the filter panel
    #[arg(long, env = "DASHBOARD_SIDEBAR_IMAGE")]
    pub sidebar_image: Option<PathBuf>,
}

impl Config {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn top_n(&self) -> TopN {
        TopN::clamped(self.top_n)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data: PathBuf::from("avance.xlsx"),
            cache_ttl_secs: 3600,
            top_n: 10,
            logo: None,
            sidebar_image: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let config = Config::try_parse_from([
            "ranking-dashboard",
            "--data",
            "/tmp/avance.csv",
            "--cache-ttl-secs",
            "60",
            "--top-n",
            "25",
        ])
        .unwrap();
        assert_eq!(config.data, PathBuf::from("/tmp/avance.csv"));
        assert_eq!(config.cache_ttl(), Duration::from_secs(60));
        assert_eq!(config.top_n().get(), 25);
        assert!(config.logo.is_none());
    }

    #[test]
    fn out_of_range_top_n_is_clamped() {
        let config = Config::try_parse_from(["ranking-dashboard", "--top-n", "-4"]).unwrap();
        assert_eq!(config.top_n().get(), 1);

        let config = Config {
            top_n: 80,
            ..Config::default()
        };
        assert_eq!(config.top_n().get(), 50);
    }

    #[test]
    fn rejects_non_numeric_ttl() {
        assert!(Config::try_parse_from(["ranking-dashboard", "--cache-ttl-secs", "soon"]).is_err());
    }
}
