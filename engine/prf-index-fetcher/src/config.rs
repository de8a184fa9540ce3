//! Configuration for the index fetcher

use crate::error::{FetchError, Result};
use crate::models::{ExportFormat, GridId, YearRange};
use config::{Config, Environment, File};
use serde::de::{self, Deserializer, SeqAccess, Visitor};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable naming an optional TOML config file
pub const CONFIG_PATH_ENV: &str = "PRF_FETCHER_CONFIG";

/// Prefix for per-key environment overrides, e.g. `PRF_FETCHER__PACING__PAUSE_MS`
pub const ENV_PREFIX: &str = "PRF_FETCHER";

/// Configuration for the index fetcher
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetcherConfig {
    /// Export endpoint configuration
    pub export: ExportConfig,

    /// Grids to download, in order
    #[serde(deserialize_with = "deserialize_grids")]
    pub grids: Vec<GridId>,

    /// Where downloads are written
    pub output: OutputConfig,

    /// Throttling between requests
    pub pacing: PacingConfig,

    /// What to do when a request fails below the HTTP status level
    pub error_policy: ErrorPolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Export handler URL, without query string
    pub base_url: String,

    /// Requested export format
    pub format: ExportFormat,

    /// Default first year of the range
    pub start_year: i32,

    /// Default last year of the range
    pub end_year: i32,

    /// Optional request timeout; none means wait until the server answers
    pub request_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory for downloaded exports
    pub dir: PathBuf,

    /// Optional CSV of exports already saved; listed exports are skipped
    pub completed_log: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PacingConfig {
    /// Pause between consecutive requests in milliseconds
    pub pause_ms: u64,
}

/// Policy for transport errors (DNS, refused connection, dropped body)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Log the failure and move on to the next grid
    #[default]
    Continue,
    /// Stop the run at the first transport failure
    Halt,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            export: ExportConfig {
                base_url: "https://webapp.rma.usda.gov/apps/RIRS/PRFHistoricalIndexesHandler.ashx"
                    .to_string(),
                format: ExportFormat::Csv,
                start_year: YearRange::DEFAULT_START_YEAR,
                end_year: YearRange::DEFAULT_END_YEAR,
                request_timeout_secs: None,
            },
            grids: vec![12345, 12346, 12347],
            output: OutputConfig {
                dir: PathBuf::from("Historical_Index_Files"),
                completed_log: None,
            },
            pacing: PacingConfig { pause_ms: 1000 },
            error_policy: ErrorPolicy::Continue,
        }
    }
}

impl FetcherConfig {
    /// Load configuration from defaults, the file named by `PRF_FETCHER_CONFIG`
    /// and `PRF_FETCHER__*` environment variables, in that order
    pub fn load() -> Result<Self> {
        let path = std::env::var(CONFIG_PATH_ENV).ok().map(PathBuf::from);
        Self::load_from(path, None)
    }

    /// Load configuration from an explicit file and environment map.
    ///
    /// `env` of `None` reads the process environment.
    pub fn load_from(path: Option<PathBuf>, env: Option<HashMap<String, String>>) -> Result<Self> {
        let mut builder = Config::builder().add_source(Config::try_from(&Self::default())?);

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }

        let environment = Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .list_separator(",")
            .with_list_parse_key("grids")
            .try_parsing(true)
            .source(env);

        let config: Self = builder.add_source(environment).build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Default year range for a fetch
    pub fn year_range(&self) -> YearRange {
        YearRange::new(self.export.start_year, self.export.end_year)
    }

    /// Pause between consecutive requests
    pub fn pause(&self) -> Duration {
        Duration::from_millis(self.pacing.pause_ms)
    }

    /// Request timeout, if any
    pub fn request_timeout(&self) -> Option<Duration> {
        self.export.request_timeout_secs.map(Duration::from_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.export.base_url.trim().is_empty() {
            return Err(FetchError::config("export.base_url must not be empty"));
        }

        if self.output.dir.as_os_str().is_empty() {
            return Err(FetchError::config("output.dir must not be empty"));
        }

        Ok(())
    }
}

/// Accepts a sequence, a single id, or a comma-separated string.
///
/// Environment values arrive as whichever of these the `config` crate parsed
/// them into; a lone `PRF_FETCHER__GRIDS=111` becomes an integer.
fn deserialize_grids<'de, D>(deserializer: D) -> std::result::Result<Vec<GridId>, D::Error>
where
    D: Deserializer<'de>,
{
    struct GridsVisitor;

    impl<'de> Visitor<'de> for GridsVisitor {
        type Value = Vec<GridId>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a grid id, a comma-separated list of grid ids, or a sequence of grid ids")
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<Self::Value, E> {
            Ok(vec![v])
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Self::Value, E> {
            GridId::try_from(v)
                .map(|grid| vec![grid])
                .map_err(|_| E::custom(format!("grid id {v} out of range")))
        }

        fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Self::Value, E> {
            v.split(',')
                .map(str::trim)
                .filter(|part| !part.is_empty())
                .map(|part| {
                    part.parse::<GridId>()
                        .map_err(|_| E::custom(format!("invalid grid id '{part}'")))
                })
                .collect()
        }

        fn visit_seq<A>(self, mut seq: A) -> std::result::Result<Self::Value, A::Error>
        where
            A: SeqAccess<'de>,
        {
            let mut grids = Vec::with_capacity(seq.size_hint().unwrap_or(0));
            while let Some(grid) = seq.next_element::<GridId>()? {
                grids.push(grid);
            }
            Ok(grids)
        }
    }

    deserializer.deserialize_any(GridsVisitor)
}
