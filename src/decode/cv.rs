use anyhow::Result;
use opencv::core::Mat;
use opencv::prelude::*;
use opencv::videoio;

use crate::decode::{Frame, FrameStream, StreamDecoder};
use crate::error::CaptureError;

/// Decoder backed by OpenCV's videoio, which handles local files and network
/// streams through the same API.
#[derive(Clone, Copy, Debug)]
pub(crate) struct OpenCv;

pub(crate) struct OpenCvStream {
    inner: videoio::VideoCapture,
    released: bool,
}

impl StreamDecoder for OpenCv {
    type Stream = OpenCvStream;

    fn open(&self, stream_url: &str) -> Result<OpenCvStream> {
        let video = match videoio::VideoCapture::from_file_def(stream_url) {
            Ok(video) => video,
            Err(e) => {
                log::error!("Failed to open video: {}", e);
                return Err(anyhow::anyhow!(CaptureError::OpenStream));
            }
        };

        match video.is_opened() {
            Ok(true) => Ok(OpenCvStream {
                inner: video,
                released: false,
            }),
            Ok(false) => {
                log::error!("No videoio backend opened the stream");
                Err(anyhow::anyhow!(CaptureError::OpenStream))
            }
            Err(e) => {
                log::error!("Failed to query stream state: {}", e);
                Err(anyhow::anyhow!(CaptureError::OpenStream))
            }
        }
    }
}

impl FrameStream for OpenCvStream {
    fn read_frame(&mut self) -> Result<Option<Frame>> {
        let mut frame = Mat::default();
        match self.inner.read(&mut frame) {
            Ok(true) => Ok(Some(Frame(frame))),
            Ok(false) => Ok(None),
            Err(e) => {
                // backend read errors surface the same way an exhausted
                // stream does
                log::error!("Failed to read frame: {}", e);
                Ok(None)
            }
        }
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;

        if let Err(e) = self.inner.release() {
            log::warn!("Failed to release stream handle: {}", e);
        }
    }
}

impl Drop for OpenCvStream {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_empty_url() {
        let err = OpenCv.open("").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CaptureError>(),
            Some(CaptureError::OpenStream)
        ));
    }

    #[test]
    fn test_open_missing_file() {
        let err = OpenCv.open("/definitely/not/a/video.mp4").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CaptureError>(),
            Some(CaptureError::OpenStream)
        ));
    }
}
