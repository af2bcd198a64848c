use std::path::Path;

use anyhow::Result;
use opencv::core::{Mat, Vector};
use opencv::imgcodecs;
use opencv::prelude::*;

use crate::error::CaptureError;

pub(crate) mod cv;

pub(crate) use cv::OpenCv;

/// One decoded raster image, owned by the capture routine for the duration
/// of a single call.
pub(crate) struct Frame(Mat);

impl Frame {
    pub(crate) fn width(&self) -> i32 {
        self.0.cols()
    }

    pub(crate) fn height(&self) -> i32 {
        self.0.rows()
    }
}

pub(crate) trait StreamDecoder {
    type Stream: FrameStream;

    /// Opens a direct stream URL as a decodable video source.
    fn open(&self, stream_url: &str) -> Result<Self::Stream>;
}

pub(crate) trait FrameStream {
    /// Pulls the next decoded frame, `None` when the stream has nothing to
    /// give.
    fn read_frame(&mut self) -> Result<Option<Frame>>;

    /// Releases the underlying handle. Called exactly once on every exit
    /// path after a successful open.
    fn release(&mut self);
}

/// Encodes the frame to `path`, format picked from the file extension.
pub(crate) fn write_image(frame: &Frame, path: &Path) -> Result<()> {
    let str_path = match path.to_str() {
        Some(p) => p,
        None => {
            log::error!("Failed to get path");
            return Err(anyhow::anyhow!(CaptureError::Write(format!(
                "Invalid output path: {}",
                path.display()
            ))));
        }
    };

    match imgcodecs::imwrite(str_path, &frame.0, &Vector::new()) {
        Ok(true) => Ok(()),
        Ok(false) => {
            log::error!("No encoder accepted {}", str_path);
            Err(anyhow::anyhow!(CaptureError::Write(format!(
                "Failed to write image to {}",
                str_path
            ))))
        }
        Err(e) => {
            log::error!("Failed to write image {}: {}", str_path, e);
            Err(anyhow::anyhow!(CaptureError::Write(e.to_string())))
        }
    }
}

#[cfg(test)]
pub(crate) fn test_frame(width: i32, height: i32) -> Frame {
    let mat = Mat::new_rows_cols_with_default(
        height,
        width,
        opencv::core::CV_8UC3,
        opencv::core::Scalar::all(96.0),
    )
    .unwrap();
    Frame(mat)
}

#[cfg(test)]
mod tests {
    use std::time::{SystemTime, UNIX_EPOCH};

    use super::*;

    fn tmp_path(ext: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("Time went backwards")
            .as_nanos();
        std::env::temp_dir().join(format!("fcap_decode_{}.{}", nanos, ext))
    }

    #[test]
    fn test_write_image_jpeg() {
        let frame = test_frame(32, 24);
        let path = tmp_path("jpg");

        write_image(&frame, &path).unwrap();

        assert_eq!(image::image_dimensions(&path).unwrap(), (32, 24));
        assert!(std::fs::metadata(&path).unwrap().len() > 0);

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_write_image_unknown_extension() {
        let frame = test_frame(8, 8);
        let path = tmp_path("notanimage");

        let err = write_image(&frame, &path).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CaptureError>(),
            Some(CaptureError::Write(_))
        ));
        assert!(!path.exists());
    }

    #[test]
    fn test_frame_dimensions() {
        let frame = test_frame(64, 48);
        assert_eq!(frame.width(), 64);
        assert_eq!(frame.height(), 48);
    }
}
