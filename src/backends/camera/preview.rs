// SPDX-License-Identifier: MPL-2.0

//! GStreamer preview pipeline
//!
//! Decodes the camera stream to RGBA and hands frames to the UI through a
//! bounded channel. Digital zoom, software exposure gain and mirroring are
//! applied in the appsink callback so that the preview and the captured photo
//! always show the same pixels.

use super::types::*;
use crate::constants::{pipeline, timing};
use gstreamer::prelude::*;
use gstreamer_app::AppSink;
use gstreamer_video::VideoInfo;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Per-frame adjustments shared between the UI and the GStreamer thread
#[derive(Debug)]
pub struct FrameAdjustments {
    digital_zoom: AtomicU32,
    software_ev: AtomicU32,
    mirror: AtomicBool,
}

impl Default for FrameAdjustments {
    fn default() -> Self {
        Self {
            digital_zoom: AtomicU32::new(1.0f32.to_bits()),
            software_ev: AtomicU32::new(0.0f32.to_bits()),
            mirror: AtomicBool::new(false),
        }
    }
}

impl FrameAdjustments {
    /// Crop factor; 1.0 disables cropping
    pub fn set_digital_zoom(&self, factor: f32) {
        self.digital_zoom
            .store(factor.max(1.0).to_bits(), Ordering::Relaxed);
    }

    /// Gain of `2^ev`; 0.0 disables it
    pub fn set_software_ev(&self, ev: f32) {
        self.software_ev.store(ev.to_bits(), Ordering::Relaxed);
    }

    pub fn set_mirror(&self, mirror: bool) {
        self.mirror.store(mirror, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> Adjustments {
        Adjustments {
            digital_zoom: f32::from_bits(self.digital_zoom.load(Ordering::Relaxed)),
            software_ev: f32::from_bits(self.software_ev.load(Ordering::Relaxed)),
            mirror: self.mirror.load(Ordering::Relaxed),
        }
    }
}

/// A consistent copy of [`FrameAdjustments`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Adjustments {
    pub digital_zoom: f32,
    pub software_ev: f32,
    pub mirror: bool,
}

impl Default for Adjustments {
    fn default() -> Self {
        Self {
            digital_zoom: 1.0,
            software_ev: 0.0,
            mirror: false,
        }
    }
}

/// Copy a (possibly padded) RGBA image, applying crop, gain and mirroring
///
/// Returns the packed pixels with their new width and height.
pub fn process_rgba(
    src: &[u8],
    width: u32,
    height: u32,
    stride: usize,
    adj: &Adjustments,
) -> (Vec<u8>, u32, u32) {
    if width == 0 || height == 0 {
        return (Vec::new(), 0, 0);
    }
    let zoom = if adj.digital_zoom.is_finite() {
        adj.digital_zoom.max(1.0)
    } else {
        1.0
    };
    let out_w = ((width as f32 / zoom).round() as u32).clamp(1, width);
    let out_h = ((height as f32 / zoom).round() as u32).clamp(1, height);
    let x0 = (width - out_w) / 2;
    let y0 = (height - out_h) / 2;

    let lut = gain_lut(adj.software_ev);
    let row_bytes = out_w as usize * 4;
    let mut out = Vec::with_capacity(row_bytes * out_h as usize);

    for y in 0..out_h as usize {
        let start = (y0 as usize + y) * stride + x0 as usize * 4;
        let Some(row) = src.get(start..start + row_bytes) else {
            break;
        };
        let row_start = out.len();
        match &lut {
            Some(lut) => out.extend(row.chunks_exact(4).flat_map(|px| {
                [
                    lut[px[0] as usize],
                    lut[px[1] as usize],
                    lut[px[2] as usize],
                    px[3],
                ]
            })),
            None => out.extend_from_slice(row),
        }
        if adj.mirror {
            let pixels = &mut out[row_start..];
            let n = pixels.len() / 4;
            for i in 0..n / 2 {
                for c in 0..4 {
                    pixels.swap(i * 4 + c, (n - 1 - i) * 4 + c);
                }
            }
        }
    }

    let rows = (out.len() / row_bytes.max(1)) as u32;
    (out, out_w, rows)
}

fn gain_lut(ev: f32) -> Option<[u8; 256]> {
    if !ev.is_finite() || ev.abs() < f32::EPSILON {
        return None;
    }
    let gain = 2f32.powf(ev);
    let mut lut = [0u8; 256];
    for (i, v) in lut.iter_mut().enumerate() {
        *v = (i as f32 * gain).round().clamp(0.0, 255.0) as u8;
    }
    Some(lut)
}

/// Build the launch string for a device
pub fn pipeline_description(device: &CameraDevice) -> String {
    let caps = match device.primary_format() {
        Some(fmt) => format!(
            "video/x-raw,format={},width={},height={}",
            pipeline::OUTPUT_FORMAT,
            fmt.photo_width,
            fmt.photo_height
        ),
        None => format!("video/x-raw,format={}", pipeline::OUTPUT_FORMAT),
    };
    format!(
        "{} ! decodebin ! videoconvert ! videoscale ! {} ! \
         appsink name=sink sync=false max-buffers={} drop=true",
        device.source.gst_source(),
        caps,
        pipeline::MAX_BUFFERS
    )
}

/// Live preview of one camera
///
/// The pipeline holds the device open for as long as this value lives.
pub struct PreviewPipeline {
    pipeline: gstreamer::Pipeline,
    appsink: AppSink,
}

impl PreviewPipeline {
    /// Create and start a pipeline for the device
    pub fn new(
        device: &CameraDevice,
        adjustments: Arc<FrameAdjustments>,
        frame_sender: FrameSender,
    ) -> BackendResult<Self> {
        gstreamer::init().map_err(|e| BackendError::InitializationFailed(e.to_string()))?;

        let description = pipeline_description(device);
        info!(device = %device.name, pipeline = %description, "Creating preview pipeline");

        let pipeline = gstreamer::parse::launch(&description)
            .map_err(|e| BackendError::InitializationFailed(e.to_string()))?
            .dynamic_cast::<gstreamer::Pipeline>()
            .map_err(|_| {
                BackendError::InitializationFailed("Launch result is not a pipeline".to_string())
            })?;

        let appsink = pipeline
            .by_name("sink")
            .ok_or_else(|| BackendError::InitializationFailed("Failed to get appsink".to_string()))?
            .dynamic_cast::<AppSink>()
            .map_err(|_| {
                BackendError::InitializationFailed("Failed to cast appsink".to_string())
            })?;
        appsink.set_property("enable-last-sample", false);

        let frame_counter = AtomicU64::new(0);
        appsink.set_callbacks(
            gstreamer_app::AppSinkCallbacks::builder()
                .new_sample(move |appsink| {
                    let frame_start = Instant::now();
                    let frame_num = frame_counter.fetch_add(1, Ordering::Relaxed);

                    let sample = appsink.pull_sample().map_err(|_| gstreamer::FlowError::Eos)?;
                    let buffer = sample.buffer().ok_or(gstreamer::FlowError::Error)?;
                    let caps = sample.caps().ok_or(gstreamer::FlowError::Error)?;
                    let video_info = VideoInfo::from_caps(caps).map_err(|e| {
                        error!(frame = frame_num, error = ?e, "Failed to get video info");
                        gstreamer::FlowError::Error
                    })?;
                    let map = buffer.map_readable().map_err(|e| {
                        error!(frame = frame_num, error = ?e, "Failed to map buffer");
                        gstreamer::FlowError::Error
                    })?;

                    let (pixels, width, height) = process_rgba(
                        map.as_slice(),
                        video_info.width(),
                        video_info.height(),
                        video_info.stride()[0] as usize,
                        &adjustments.snapshot(),
                    );
                    if pixels.is_empty() {
                        debug!(frame = frame_num, "Skipping empty frame");
                        return Ok(gstreamer::FlowSuccess::Ok);
                    }

                    let frame = CameraFrame {
                        width,
                        height,
                        data: Arc::from(pixels),
                        captured_at: frame_start,
                    };

                    let mut sender = frame_sender.clone();
                    match sender.try_send(frame) {
                        Ok(()) => {
                            if frame_num % timing::FRAME_LOG_INTERVAL == 0 {
                                debug!(
                                    frame = frame_num,
                                    width,
                                    height,
                                    process_us = frame_start.elapsed().as_micros(),
                                    "Preview frame"
                                );
                            }
                        }
                        Err(e) if e.is_disconnected() => return Err(gstreamer::FlowError::Eos),
                        Err(_) => {
                            if frame_num % timing::FRAME_LOG_INTERVAL == 0 {
                                debug!(frame = frame_num, "Frame dropped (channel full)");
                            }
                        }
                    }

                    Ok(gstreamer::FlowSuccess::Ok)
                })
                .build(),
        );

        pipeline.set_state(gstreamer::State::Playing).map_err(|e| {
            BackendError::InitializationFailed(format!("Failed to start pipeline: {}", e))
        })?;

        Ok(Self { pipeline, appsink })
    }

    /// Next error posted on the pipeline bus, if any
    pub fn poll_error(&self) -> Option<String> {
        let bus = self.pipeline.bus()?;
        while let Some(msg) = bus.pop() {
            if let gstreamer::MessageView::Error(err) = msg.view() {
                return Some(err.error().to_string());
            }
        }
        None
    }
}

impl Drop for PreviewPipeline {
    fn drop(&mut self) {
        self.appsink
            .set_callbacks(gstreamer_app::AppSinkCallbacks::builder().build());
        if let Err(e) = self.pipeline.set_state(gstreamer::State::Null) {
            warn!(error = %e, "Failed to stop preview pipeline");
        }
        let (result, state, _) = self.pipeline.state(gstreamer::ClockTime::from_seconds(
            timing::STOP_TIMEOUT_SECS,
        ));
        debug!(result = ?result, state = ?state, "Preview pipeline stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 4x2 image, pixel value = (x, y, 100, 255), with 4 bytes of row padding
    fn image() -> (Vec<u8>, usize) {
        let stride = 4 * 4 + 4;
        let mut data = vec![0u8; stride * 2];
        for y in 0..2 {
            for x in 0..4 {
                let i = y * stride + x * 4;
                data[i..i + 4].copy_from_slice(&[x as u8, y as u8, 100, 255]);
            }
        }
        (data, stride)
    }

    #[test]
    fn test_identity_strips_padding() {
        let (data, stride) = image();
        let (out, w, h) = process_rgba(&data, 4, 2, stride, &Adjustments::default());
        assert_eq!((w, h), (4, 2));
        assert_eq!(out.len(), 4 * 4 * 2);
        assert_eq!(&out[16..20], &[0, 1, 100, 255]);
    }

    #[test]
    fn test_empty_frame_yields_empty_image() {
        let adj = Adjustments {
            digital_zoom: 2.0,
            mirror: true,
            ..Default::default()
        };
        assert_eq!(process_rgba(&[], 0, 480, 0, &adj), (Vec::new(), 0, 0));
        assert_eq!(process_rgba(&[0; 16], 4, 0, 16, &adj), (Vec::new(), 0, 0));
    }

    #[test]
    fn test_digital_zoom_crops_center() {
        let (data, stride) = image();
        let adj = Adjustments {
            digital_zoom: 2.0,
            ..Default::default()
        };
        let (out, w, h) = process_rgba(&data, 4, 2, stride, &adj);
        assert_eq!((w, h), (2, 1));
        assert_eq!(&out[0..4], &[1, 0, 100, 255]);
        assert_eq!(&out[4..8], &[2, 0, 100, 255]);
    }

    #[test]
    fn test_gain_and_mirror() {
        let (data, stride) = image();
        let adj = Adjustments {
            software_ev: 1.0,
            mirror: true,
            ..Default::default()
        };
        let (out, _, _) = process_rgba(&data, 4, 2, stride, &adj);
        // First output pixel is the last input pixel, doubled; alpha untouched
        assert_eq!(&out[0..4], &[6, 0, 200, 255]);
    }

    #[test]
    fn test_gain_saturates() {
        let lut = gain_lut(2.0).unwrap();
        assert_eq!(lut[100], 255);
        assert!(gain_lut(0.0).is_none());
    }

    #[test]
    fn test_pipeline_description_uses_source_and_format() {
        let device = crate::backends::camera::test_support::device("video0", Facing::Back);
        let desc = pipeline_description(&device);
        assert!(desc.starts_with("v4l2src device=/dev/video0 ! decodebin"));
        assert!(desc.contains("width=1920,height=1080"));
        assert!(desc.contains("appsink name=sink"));
    }
}
