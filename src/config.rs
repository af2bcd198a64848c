use figment::{
    Figment,
    providers::{Format, Json, Serialized, Toml, Yaml},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::sync::OnceCell;

use crate::cli::CliArgs;

const DEFAULT_CONFIG_PATH: &str = "config.toml";
static CONFIG: OnceCell<Config> = OnceCell::const_new();

#[derive(Deserialize, Serialize, Debug)]
pub(crate) struct Config {
    pub(crate) resolver: Resolver,
}

#[derive(Deserialize, Serialize, Debug, Default)]
pub(crate) struct Resolver {
    /// yt-dlp binary to invoke
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) binary: Option<String>,

    /// Highest vertical resolution the resolved stream may have
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) max_height: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) quiet: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) no_warnings: Option<bool>,

    /// Resolution timeout in seconds; unset waits indefinitely, matching
    /// the original behavior
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) timeout: Option<u64>,
}

pub(crate) fn get_config() -> &'static Config {
    if !CONFIG.initialized() {
        let config = build_config(None, None);
        CONFIG.set(config).unwrap();
    }

    CONFIG.get().unwrap()
}

pub(crate) fn init_config(args: CliArgs) {
    let config_path = args.config.clone();
    let config = build_config(Some(args.as_config()), config_path);

    if CONFIG.set(config).is_err() {
        log::warn!("Config was already initialized");
    }
}

fn build_config(overrides: Option<Config>, config_path: Option<String>) -> Config {
    let defaults = json!({
        "resolver": {
            "binary": "yt-dlp",
            "max_height": 720,
            "quiet": true,
            "no_warnings": true,
        }
    });

    let mut figment = Figment::new().merge(Serialized::defaults(defaults));

    let config_path =
        std::path::PathBuf::from(config_path.unwrap_or(DEFAULT_CONFIG_PATH.to_string()));

    if config_path.exists() {
        log::info!("Config file found: {}", config_path.display());
        match config_path.extension() {
            Some(ext) => match ext.to_str() {
                Some("toml") => figment = figment.merge(Toml::file(&config_path)),
                Some("json") => figment = figment.merge(Json::file(&config_path)),
                Some("yaml") | Some("yml") => figment = figment.merge(Yaml::file(&config_path)),
                _ => {
                    log::error!("Cannot identify config file type. Must be .toml, .json or .yaml");
                    std::process::exit(1);
                }
            },
            None => {
                log::error!("Cannot identify config file type. Must be .toml, .json or .yaml");
                std::process::exit(1);
            }
        };
    } else if config_path.to_str() != Some(DEFAULT_CONFIG_PATH) {
        log::warn!("Config file not found: {}", config_path.display());
        std::process::exit(1);
    };

    if let Some(overrides) = overrides {
        figment = figment.merge(Serialized::defaults(overrides));
    }

    match figment.extract() {
        Ok(config) => config,
        Err(err) => {
            log::error!("{}", err);
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::time::{SystemTime, UNIX_EPOCH};

    use super::*;

    #[test]
    fn test_defaults() {
        let config = build_config(None, None);

        assert_eq!(config.resolver.binary.as_deref(), Some("yt-dlp"));
        assert_eq!(config.resolver.max_height, Some(720));
        assert_eq!(config.resolver.quiet, Some(true));
        assert_eq!(config.resolver.no_warnings, Some(true));
        assert_eq!(config.resolver.timeout, None);
    }

    #[test]
    fn test_overrides_beat_defaults() {
        let overrides = Config {
            resolver: Resolver {
                max_height: Some(480),
                timeout: Some(30),
                ..Default::default()
            },
        };

        let config = build_config(Some(overrides), None);

        assert_eq!(config.resolver.max_height, Some(480));
        assert_eq!(config.resolver.timeout, Some(30));
        // untouched keys keep their defaults
        assert_eq!(config.resolver.binary.as_deref(), Some("yt-dlp"));
        assert_eq!(config.resolver.quiet, Some(true));
    }

    #[test]
    fn test_config_file_merge() {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("Time went backwards")
            .as_nanos();
        let path = std::env::temp_dir().join(format!("fcap_config_{}.toml", nanos));

        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[resolver]").unwrap();
        writeln!(file, "binary = \"/opt/yt-dlp/yt-dlp\"").unwrap();
        writeln!(file, "quiet = false").unwrap();
        drop(file);

        let config = build_config(None, Some(path.to_str().unwrap().to_string()));

        assert_eq!(config.resolver.binary.as_deref(), Some("/opt/yt-dlp/yt-dlp"));
        assert_eq!(config.resolver.quiet, Some(false));
        assert_eq!(config.resolver.max_height, Some(720));

        std::fs::remove_file(&path).unwrap();
    }
}
