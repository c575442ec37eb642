// SPDX-License-Identifier: GPL-3.0-only

//! PipeWire node discovery
//!
//! Cameras and microphones are both PipeWire nodes; they differ only in their
//! `media.class`. Discovery shells out to `pw-cli` and parses its property dump,
//! which works both natively and inside the Flatpak sandbox.

use super::types::DeviceFormat;
use std::collections::HashMap;
use std::process::Command;
use tracing::debug;

/// A PipeWire node with the properties we care about
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PwNode {
    pub id: String,
    pub serial: Option<String>,
    pub description: Option<String>,
    pub nick: Option<String>,
    /// e.g. `v4l2:/dev/video0`
    pub object_path: Option<String>,
    pub media_class: Option<String>,
}

impl PwNode {
    /// Display name, preferring the human-readable description
    pub fn display_name(&self) -> String {
        self.description
            .clone()
            .or_else(|| self.nick.clone())
            .unwrap_or_else(|| format!("Node {}", self.id))
    }

    /// V4L2 device node backing this PipeWire node, if any
    pub fn v4l2_path(&self) -> Option<&str> {
        self.object_path.as_deref()?.strip_prefix("v4l2:")
    }
}

/// List nodes of a media class (e.g. `Video/Source`, `Audio/Source`)
///
/// Returns `None` when `pw-cli` cannot be run, which callers treat as
/// "PipeWire unavailable" rather than "no devices".
pub fn list_nodes(media_class: &str) -> Option<Vec<PwNode>> {
    let output = Command::new("pw-cli").args(["ls", "Node"]).output().ok()?;

    if !output.status.success() {
        debug!(media_class, "pw-cli ls Node failed");
        return None;
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let nodes = parse_nodes(&stdout, media_class);
    debug!(media_class, count = nodes.len(), "Listed PipeWire nodes");
    Some(nodes)
}

/// Parse `pw-cli ls Node` output, keeping nodes of the given media class
pub fn parse_nodes(stdout: &str, media_class: &str) -> Vec<PwNode> {
    let mut nodes = Vec::new();
    let mut current: Option<PwNode> = None;

    for line in stdout.lines() {
        let trimmed = line.trim();

        // "id 76, type PipeWire:Interface:Node/3"
        if trimmed.starts_with("id ") && trimmed.contains("type PipeWire:Interface:Node") {
            nodes.extend(current.take());
            if let Some(id) = trimmed
                .strip_prefix("id ")
                .and_then(|rest| rest.split(',').next())
            {
                current = Some(PwNode {
                    id: id.trim().to_string(),
                    ..Default::default()
                });
            }
            continue;
        }

        let Some(node) = current.as_mut() else {
            continue;
        };
        let Some((key, value)) = split_property(trimmed) else {
            continue;
        };

        match key {
            "object.serial" => node.serial = Some(value),
            "node.description" => node.description = Some(value),
            "node.nick" => node.nick = Some(value),
            "object.path" => node.object_path = Some(value),
            "media.class" => node.media_class = Some(value),
            _ => {}
        }
    }
    nodes.extend(current);

    nodes.retain(|n| n.media_class.as_deref() == Some(media_class));
    nodes
}

/// Read the full property set of a node (`pw-cli info <id>`)
///
/// `pw-cli ls` omits libcamera properties such as `api.libcamera.location`.
pub fn node_properties(node_id: &str) -> HashMap<String, String> {
    match Command::new("pw-cli").args(["info", node_id]).output() {
        Ok(output) if output.status.success() => {
            parse_properties(&String::from_utf8_lossy(&output.stdout))
        }
        _ => {
            debug!(node_id, "Failed to query node info");
            HashMap::new()
        }
    }
}

/// Parse `key = "value"` lines into a map
pub fn parse_properties(stdout: &str) -> HashMap<String, String> {
    stdout
        .lines()
        .filter_map(|line| split_property(line.trim()))
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

/// Split `key = "value"` (pw-cli may prefix changed props with `*`)
fn split_property(line: &str) -> Option<(&str, String)> {
    let (key, rest) = line.split_once('=')?;
    let key = key.trim().trim_start_matches('*').trim();
    Some((key, extract_quoted_value(rest)?))
}

/// Extract quoted value from a property line (e.g., 'property = "value"' -> "value")
fn extract_quoted_value(line: &str) -> Option<String> {
    let start = line.find('"')?;
    let end = line[start + 1..].find('"')?;
    Some(line[start + 1..start + 1 + end].to_string())
}

/// Enumerate formats of a camera node (`pw-cli enum-params <id> EnumFormat`)
pub fn node_formats(node_id: &str) -> Option<Vec<DeviceFormat>> {
    let output = Command::new("pw-cli")
        .args(["enum-params", node_id, "EnumFormat"])
        .output()
        .ok()?;

    if !output.status.success() {
        debug!(node_id, "pw-cli enum-params failed");
        return None;
    }

    let formats = parse_enum_formats(&String::from_utf8_lossy(&output.stdout));
    (!formats.is_empty()).then_some(formats)
}

/// Parse EnumFormat objects into one entry per resolution with its best framerate
///
/// libcamera nodes list no framerates; those resolutions get `default_fps`.
pub fn parse_enum_formats(stdout: &str) -> Vec<DeviceFormat> {
    const DEFAULT_FPS: u32 = 30;

    let mut by_size: Vec<DeviceFormat> = Vec::new();
    let mut size: Option<(u32, u32)> = None;
    let mut best_fps: Option<u32> = None;

    let mut flush = |size: &mut Option<(u32, u32)>, best_fps: &mut Option<u32>| {
        if let Some((w, h)) = size.take() {
            let fps = best_fps.take().unwrap_or(DEFAULT_FPS);
            match by_size
                .iter_mut()
                .find(|f| f.photo_width == w && f.photo_height == h)
            {
                Some(existing) => existing.max_fps = existing.max_fps.max(fps),
                None => by_size.push(DeviceFormat {
                    photo_width: w,
                    photo_height: h,
                    max_fps: fps,
                }),
            }
        }
        *best_fps = None;
    };

    for line in stdout.lines() {
        let trimmed = line.trim();

        if trimmed.starts_with("Object:") {
            flush(&mut size, &mut best_fps);
            continue;
        }

        // "Rectangle 1920x1080"
        if let Some(res) = trimmed.strip_prefix("Rectangle ")
            && let Some((w, h)) = res.split_once('x')
            && let (Ok(w), Ok(h)) = (w.trim().parse::<u32>(), h.trim().parse::<u32>())
        {
            // The first rectangle of a range object is the default; keep the largest
            size = match size {
                Some((cw, ch)) if cw * ch >= w * h => Some((cw, ch)),
                _ => Some((w, h)),
            };
            continue;
        }

        // "Fraction 60/1" or "Fraction 60000/1001"
        if let Some(frac) = trimmed.strip_prefix("Fraction ")
            && let Some((num, denom)) = frac.split_once('/')
            && let (Ok(num), Ok(denom)) = (num.trim().parse::<u32>(), denom.trim().parse::<u32>())
            && denom > 0
        {
            let fps = (num as f64 / denom as f64).round() as u32;
            best_fps = Some(best_fps.map_or(fps, |b| b.max(fps)));
        }
    }
    flush(&mut size, &mut best_fps);

    by_size
}

#[cfg(test)]
mod tests {
    use super::*;

    const LS_NODE: &str = r#"
	id 31, type PipeWire:Interface:Node/3
 		object.serial = "31"
 		factory.id = "10"
 		node.description = "Dummy-Driver"
 		node.name = "Dummy-Driver"
 		priority.driver = "20000"
	id 54, type PipeWire:Interface:Node/3
 		object.serial = "2146"
 		object.path = "v4l2:/dev/video0"
 		node.description = "Integrated Camera (V4L2)"
 		node.nick = "Integrated Camera"
 		media.class = "Video/Source"
	id 60, type PipeWire:Interface:Node/3
 		object.serial = "2160"
 		node.description = "Built-in Audio Analog Stereo"
 		media.class = "Audio/Source"
"#;

    #[test]
    fn test_parse_video_sources() {
        let nodes = parse_nodes(LS_NODE, "Video/Source");
        assert_eq!(nodes.len(), 1);
        let cam = &nodes[0];
        assert_eq!(cam.id, "54");
        assert_eq!(cam.serial.as_deref(), Some("2146"));
        assert_eq!(cam.display_name(), "Integrated Camera (V4L2)");
        assert_eq!(cam.v4l2_path(), Some("/dev/video0"));
    }

    #[test]
    fn test_parse_audio_sources() {
        let nodes = parse_nodes(LS_NODE, "Audio/Source");
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].id, "60");
        assert!(parse_nodes("", "Audio/Source").is_empty());
    }

    #[test]
    fn test_parse_properties_handles_changed_marker() {
        let props = parse_properties(
            "  * api.libcamera.location = \"front\"\n    api.libcamera.rotation = \"270\"\n",
        );
        assert_eq!(props.get("api.libcamera.location").map(String::as_str), Some("front"));
        assert_eq!(props.get("api.libcamera.rotation").map(String::as_str), Some("270"));
    }

    #[test]
    fn test_parse_enum_formats_keeps_best_fps() {
        let dump = "\
  Object: size 1, type Spa:Pod:Object:Param:Format
    Prop: key Spa:Pod:Object:Param:Format:Video:size
      Rectangle 1280x720
    Prop: key Spa:Pod:Object:Param:Format:Video:framerate
      Fraction 30/1
      Fraction 10/1
  Object: size 1, type Spa:Pod:Object:Param:Format
      Rectangle 1280x720
      Fraction 60000/1001
  Object: size 1, type Spa:Pod:Object:Param:Format
      Rectangle 3264x2448
";
        let formats = parse_enum_formats(dump);
        assert_eq!(formats.len(), 2);
        assert_eq!(
            formats[0],
            DeviceFormat { photo_width: 1280, photo_height: 720, max_fps: 60 }
        );
        assert_eq!(formats[1].max_fps, 30);
    }
}
