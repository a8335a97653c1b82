use clap::Parser;
use figment::Figment;
use std::path::PathBuf;

/// Register every series in a local TV directory with Sonarr.
///
/// Settings are read from built-in defaults, then a `tvsync.{toml,yaml,yml,json}`
/// configuration file, then `TVSYNC_*` environment variables, then these flags.
#[derive(Debug, Parser)]
#[command(name = "tvsync", version, about)]
pub struct Cli {
    /// Configuration file (default: search the working and user config directories)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
    /// Local directory holding one subdirectory per series
    #[arg(short, long, value_name = "DIR")]
    pub path: Option<PathBuf>,
    /// Sonarr API root, e.g. http://localhost:8989/api/v3
    #[arg(long = "sonarr-apiurl", value_name = "URL")]
    pub sonarr_api_url: Option<String>,
    #[arg(long = "sonarr-apikey", value_name = "KEY")]
    pub sonarr_api_key: Option<String>,
    /// Library root as seen by Sonarr
    #[arg(long = "sonarr-tvpath", value_name = "PATH")]
    pub sonarr_tv_path: Option<String>,
    /// Number of series processed at once
    #[arg(long, value_name = "N")]
    pub concurrency: Option<usize>,
    /// Log filter directive (RUST_LOG takes precedence)
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,
    #[arg(long, value_name = "FORMAT", value_parser = ["json", "text"])]
    pub log_format: Option<String>,
}

impl Cli {
    /// Layer the flags that were given on top of `figment`.
    pub fn merge_into(&self, mut figment: Figment) -> Figment {
        if let Some(path) = &self.path {
            figment = figment.merge(("app.path", path));
        }
        if let Some(url) = &self.sonarr_api_url {
            figment = figment.merge(("sonarr.api_url", url));
        }
        if let Some(key) = &self.sonarr_api_key {
            figment = figment.merge(("sonarr.api_key", key));
        }
        if let Some(tv_path) = &self.sonarr_tv_path {
            figment = figment.merge(("sonarr.tv_path", tv_path));
        }
        if let Some(concurrency) = self.concurrency {
            figment = figment.merge(("sync.concurrency", concurrency));
        }
        if let Some(level) = &self.log_level {
            figment = figment.merge(("log.level", level));
        }
        if let Some(format) = &self.log_format {
            figment = figment.merge(("log.format", format));
        }
        figment
    }
}
