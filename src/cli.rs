use std::path::PathBuf;

use clap::Parser;
use serde::Serialize;

use crate::config::{Config, Resolver};

#[derive(Parser, Serialize, Debug)]
pub(crate) struct CliArgs {
    /// Video page URL to capture from
    #[serde(skip_serializing)]
    pub(crate) source_url: String,

    /// Output image path; the extension picks the encoding (e.g. .jpg)
    #[serde(skip_serializing)]
    pub(crate) output: PathBuf,

    /// Config file path (default: "config.toml")
    #[arg(short, long, env = "FCAP_CONFIG")]
    #[serde(skip_serializing)]
    pub(crate) config: Option<String>,

    /// yt-dlp binary (default: "yt-dlp")
    #[arg(long, env = "FCAP_YTDLP")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) ytdlp: Option<String>,

    /// Highest vertical resolution to request (default: 720)
    #[arg(long, env = "FCAP_MAX_HEIGHT")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) max_height: Option<u32>,

    /// Resolution timeout in seconds (default: none)
    #[arg(long, env = "FCAP_TIMEOUT")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) timeout: Option<u64>,

    /// Let the resolver print its own diagnostics and warnings
    #[arg(long, env = "FCAP_RESOLVER_VERBOSE")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) resolver_verbose: Option<bool>,
}

impl CliArgs {
    pub(crate) fn as_config(self) -> Config {
        Config {
            resolver: Resolver {
                binary: self.ytdlp,
                max_height: self.max_height,
                quiet: self.resolver_verbose.map(|b| !b),
                no_warnings: self.resolver_verbose.map(|b| !b),
                timeout: self.timeout,
            },
        }
    }
}
