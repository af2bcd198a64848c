use std::path::Path;

use anyhow::Result;

use crate::decode::{self, StreamDecoder};
use crate::error::CaptureError;
use crate::resolver::{StreamResolver, YtDlp};

/// Captures the first frame of the video behind `source_url` into
/// `output_path`. Prints exactly one status line, `SUCCESS` or
/// `ERROR: <reason>`, and never lets a collaborator error escape.
pub(crate) async fn capture_frame(source_url: &str, output_path: &Path) -> bool {
    let resolver = YtDlp::new();
    let result = run_capture(&resolver, &decode::OpenCv, source_url, output_path).await;

    if let Err(e) = &result {
        log::error!("Capture of {} failed: {}", source_url, e);
    }

    println!("{}", status_line(&result));
    result.is_ok()
}

async fn run_capture<R, D>(
    resolver: &R,
    decoder: &D,
    source_url: &str,
    output_path: &Path,
) -> Result<()>
where
    R: StreamResolver + Sync,
    D: StreamDecoder,
{
    let resolved = resolver.resolve(source_url).await?;
    log::info!(
        "Resolved {} via {}: {}",
        source_url,
        resolver.name(),
        resolved.describe()
    );
    log::debug!("Stream URL: {}", resolved.url);
    log::debug!(
        "Stream format: {}",
        resolved.format.as_deref().unwrap_or("unknown")
    );

    let mut stream = decoder.open(&resolved.url)?;

    // released exactly once, before the read result is even looked at
    let read = stream.read_frame();
    stream.release();

    let frame = match read? {
        Some(frame) => frame,
        None => return Err(anyhow::anyhow!(CaptureError::ReadFrame)),
    };

    log::info!("Captured a {}x{} frame", frame.width(), frame.height());
    decode::write_image(&frame, output_path)
}

fn status_line(result: &Result<()>) -> String {
    match result {
        Ok(()) => "SUCCESS".to_string(),
        Err(e) => format!("ERROR: {}", e),
    }
}
