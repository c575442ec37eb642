// SPDX-License-Identifier: GPL-3.0-only

//! V4L2 device node helpers
//!
//! Used when PipeWire is not running: capture nodes are found by scanning
//! `/dev/video*` and asking each one for its capabilities.

use std::os::unix::io::{AsRawFd, RawFd};
use std::path::{Path, PathBuf};
use tracing::debug;

const VIDIOC_QUERYCAP: libc::c_ulong = 0x80685600;

const V4L2_CAP_VIDEO_CAPTURE: u32 = 0x0000_0001;
const V4L2_CAP_DEVICE_CAPS: u32 = 0x8000_0000;

#[repr(C)]
struct V4l2Capability {
    driver: [u8; 16],
    card: [u8; 32],
    bus_info: [u8; 32],
    version: u32,
    capabilities: u32,
    device_caps: u32,
    reserved: [u32; 3],
}

fn query_v4l2_cap(fd: RawFd) -> Option<V4l2Capability> {
    let mut cap: V4l2Capability = unsafe { std::mem::zeroed() };
    let result = unsafe { libc::ioctl(fd, VIDIOC_QUERYCAP as _, &mut cap as *mut V4l2Capability) };
    if result < 0 { None } else { Some(cap) }
}

fn c_string(bytes: &[u8]) -> String {
    let len = bytes.iter().position(|&c| c == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..len]).trim().to_string()
}

/// A V4L2 node able to capture video
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureNode {
    pub path: String,
    pub card: String,
    pub driver: String,
}

/// Query a device node; `None` unless it is a video capture node
pub fn probe_capture_node(device_path: &str) -> Option<CaptureNode> {
    let file = std::fs::File::open(device_path).ok()?;
    let cap = query_v4l2_cap(file.as_raw_fd())?;

    // Metadata nodes share the physical device but lack VIDEO_CAPTURE in device_caps
    let caps = if cap.capabilities & V4L2_CAP_DEVICE_CAPS != 0 {
        cap.device_caps
    } else {
        cap.capabilities
    };
    if caps & V4L2_CAP_VIDEO_CAPTURE == 0 {
        debug!(device_path, "Not a video capture node");
        return None;
    }

    Some(CaptureNode {
        path: device_path.to_string(),
        card: c_string(&cap.card),
        driver: c_string(&cap.driver),
    })
}

/// All `/dev/videoN` paths, sorted by N
pub fn video_device_paths() -> Vec<PathBuf> {
    video_device_paths_in(Path::new("/dev"))
}

/// All `videoN` entries of a directory, sorted by N
pub fn video_device_paths_in(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut numbered: Vec<(u32, PathBuf)> = entries
        .flatten()
        .filter_map(|entry| {
            let name = entry.file_name();
            let index = name.to_str()?.strip_prefix("video")?.parse::<u32>().ok()?;
            Some((index, entry.path()))
        })
        .collect();
    numbered.sort_by_key(|(index, _)| *index);
    numbered.into_iter().map(|(_, path)| path).collect()
}

/// Scan `/dev` for capture nodes
pub fn enumerate_capture_nodes() -> Vec<CaptureNode> {
    video_device_paths()
        .iter()
        .filter_map(|p| probe_capture_node(&p.to_string_lossy()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_video_paths_sorted_numerically() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["video10", "video2", "video0", "vbi0", "videoX"] {
            std::fs::write(dir.path().join(name), b"").unwrap();
        }
        let names: Vec<_> = video_device_paths_in(dir.path())
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["video0", "video2", "video10"]);
    }

    #[test]
    fn test_c_string_stops_at_nul() {
        assert_eq!(c_string(b"uvcvideo\0\0\0"), "uvcvideo");
        assert_eq!(c_string(b"abc"), "abc");
    }

    #[test]
    fn test_regular_file_is_not_capture_node() {
        let file = tempfile::NamedTempFile::new().unwrap();
        assert!(probe_capture_node(&file.path().to_string_lossy()).is_none());
    }
}
