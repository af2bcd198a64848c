use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use tokio::process::Command;

use crate::config::get_config;
use crate::error::CaptureError;
use crate::resolver::{ResolvedStream, StreamResolver};

/// Resolver backed by the yt-dlp program. One subprocess call per page URL,
/// JSON metadata only, never the media itself.
#[derive(Clone, Debug)]
pub(crate) struct YtDlp {
    binary: String,
    max_height: u32,
    quiet: bool,
    no_warnings: bool,
    timeout: Option<Duration>,
}

impl YtDlp {
    pub(crate) fn new() -> Self {
        let resolver = &get_config().resolver;
        Self {
            binary: resolver.binary.clone().unwrap(),
            max_height: resolver.max_height.unwrap(),
            quiet: resolver.quiet.unwrap(),
            no_warnings: resolver.no_warnings.unwrap(),
            timeout: resolver.timeout.map(Duration::from_secs),
        }
    }

    fn format_selector(&self) -> String {
        format!("best[height<={}]", self.max_height)
    }

    fn build_args(&self, page_url: &str) -> Vec<String> {
        let mut args = vec![
            "-f".to_string(),
            self.format_selector(),
            "--dump-json".to_string(),
            "--no-download".to_string(),
        ];

        if self.quiet {
            args.push("--quiet".to_string());
        }
        if self.no_warnings {
            args.push("--no-warnings".to_string());
        }

        // '--' keeps the page URL from being read as an option
        args.push("--".to_string());
        args.push(page_url.to_string());

        args
    }
}

#[async_trait]
impl StreamResolver for YtDlp {
    fn name(&self) -> &'static str {
        "yt-dlp"
    }

    async fn resolve(&self, page_url: &str) -> Result<ResolvedStream> {
        log::info!("Resolving {} with {}", page_url, self.binary);

        let args = self.build_args(page_url);
        log::debug!("{} {}", self.binary, args.join(" "));

        let command = Command::new(&self.binary).args(&args).output();
        let result = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, command).await {
                Ok(result) => result,
                Err(_) => {
                    return Err(anyhow::anyhow!(CaptureError::Resolve(format!(
                        "{} timed out after {}s",
                        self.binary,
                        limit.as_secs()
                    ))));
                }
            },
            None => command.await,
        };

        let output = match result {
            Ok(output) => output,
            Err(e) => {
                log::error!("Failed to run {}: {}", self.binary, e);
                return Err(anyhow::anyhow!(CaptureError::Resolve(format!(
                    "Failed to run {}: {}",
                    self.binary, e
                ))));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let reason = error_line(&stderr);
            log::error!("{} failed for {}: {}", self.binary, page_url, reason);
            return Err(anyhow::anyhow!(CaptureError::Resolve(reason)));
        }

        let info: Value = match serde_json::from_slice(&output.stdout) {
            Ok(info) => info,
            Err(e) => {
                log::error!("Unparseable {} metadata: {}", self.binary, e);
                return Err(anyhow::anyhow!(CaptureError::Resolve(format!(
                    "Unparseable {} metadata: {}",
                    self.binary, e
                ))));
            }
        };

        Ok(extract_stream(&info))
    }
}

fn extract_stream(info: &Value) -> ResolvedStream {
    ResolvedStream {
        url: info
            .get("url")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        format: info
            .get("format")
            .and_then(Value::as_str)
            .map(str::to_string),
        width: info.get("width").and_then(Value::as_i64),
        height: info.get("height").and_then(Value::as_i64),
        title: info
            .get("title")
            .and_then(Value::as_str)
            .map(str::to_string),
    }
}

/// Last non-empty stderr line, without yt-dlp's own "ERROR:" tag. The status
/// line already carries that prefix.
fn error_line(stderr: &str) -> String {
    stderr
        .lines()
        .rev()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(|line| line.strip_prefix("ERROR:").map(str::trim).unwrap_or(line))
        .map(str::to_string)
        .unwrap_or_else(|| "resolver exited with an error".to_string())
}

/// Startup probe. Missing yt-dlp is only a warning here, the capture call
/// reports the real failure.
pub(crate) async fn check_binary(binary: &str) -> bool {
    Command::new(binary)
        .arg("--version")
        .output()
        .await
        .map(|output| output.status.success())
        .unwrap_or(false)
}
