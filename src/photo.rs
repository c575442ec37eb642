// SPDX-License-Identifier: GPL-3.0-only

//! Still photo encoding
//!
//! A photo is the latest preview frame, which already carries the digital zoom
//! and software exposure. Only the preview mirroring is undone before encoding.

use crate::backends::camera::CameraFrame;
use crate::constants::files;
use crate::errors::CaptureError;
use image::{RgbImage, RgbaImage};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Encoding options taken from the user config
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhotoOptions {
    pub jpeg_quality: u8,
    /// The frame was mirrored for display and must be flipped back
    pub unmirror: bool,
}

/// File name for a new capture, unique to the millisecond
pub fn capture_file_name(prefix: &str, extension: &str) -> String {
    let timestamp = chrono::Local::now().format(files::TIMESTAMP_FORMAT);
    format!("{}_{}.{}", prefix, timestamp, extension)
}

/// Encode an RGBA frame to JPEG bytes
pub fn encode_jpeg(frame: &CameraFrame, options: PhotoOptions) -> Result<Vec<u8>, CaptureError> {
    let mut rgba = RgbaImage::from_raw(frame.width, frame.height, frame.data.to_vec())
        .ok_or_else(|| {
            CaptureError::EncodingFailed(format!(
                "Frame buffer does not match {}x{}",
                frame.width, frame.height
            ))
        })?;
    if options.unmirror {
        image::imageops::flip_horizontal_in_place(&mut rgba);
    }
    let rgb: RgbImage = image::DynamicImage::ImageRgba8(rgba).into_rgb8();

    let mut buf = Vec::new();
    let mut encoder =
        image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buf, options.jpeg_quality);
    encoder.encode_image(&rgb)?;
    debug!(
        width = frame.width,
        height = frame.height,
        bytes = buf.len(),
        "Encoded JPEG"
    );
    Ok(buf)
}

/// Encode a frame and write it into `dir` (blocking)
pub fn write_photo(
    frame: &CameraFrame,
    dir: &Path,
    options: PhotoOptions,
) -> Result<PathBuf, CaptureError> {
    let jpeg = encode_jpeg(frame, options)?;
    std::fs::create_dir_all(dir)?;
    let path = dir.join(capture_file_name(files::PHOTO_PREFIX, "jpg"));
    std::fs::write(&path, jpeg)?;
    info!(path = %path.display(), "Photo written");
    Ok(path)
}
