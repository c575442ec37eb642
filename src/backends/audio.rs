// SPDX-License-Identifier: MPL-2.0

//! Microphone discovery through PipeWire
//!
//! The app never records audio; microphones are only enumerated so the
//! permission gate can report whether one is reachable.

use crate::constants::pipeline;
use serde::Deserialize;
use std::collections::HashMap;
use std::process::Command;
use tracing::{debug, warn};

/// An audio input device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioDevice {
    pub name: String,
    pub node_name: String,
    pub is_default: bool,
}

#[derive(Debug, Deserialize)]
struct DumpObject {
    #[serde(rename = "type", default)]
    object_type: String,
    #[serde(default)]
    info: Option<DumpInfo>,
    #[serde(default)]
    props: HashMap<String, serde_json::Value>,
    #[serde(default)]
    metadata: Vec<MetadataEntry>,
}

#[derive(Debug, Deserialize)]
struct DumpInfo {
    #[serde(default)]
    props: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct MetadataEntry {
    key: String,
    #[serde(default)]
    value: serde_json::Value,
}

/// Enumerate audio sources with `pw-dump`
///
/// `None` means PipeWire could not be queried at all.
pub fn enumerate_microphones() -> Option<Vec<AudioDevice>> {
    let output = match Command::new("pw-dump").output() {
        Ok(output) => output,
        Err(e) => {
            warn!(error = %e, "Failed to run pw-dump");
            return None;
        }
    };

    if !output.status.success() {
        warn!("pw-dump command failed");
        return None;
    }

    match parse_pw_dump(&String::from_utf8_lossy(&output.stdout)) {
        Ok(devices) => Some(devices),
        Err(e) => {
            warn!(error = %e, "Failed to parse pw-dump output");
            None
        }
    }
}

/// Extract audio sources from `pw-dump` JSON, default source first
pub fn parse_pw_dump(json: &str) -> Result<Vec<AudioDevice>, serde_json::Error> {
    let objects: Vec<DumpObject> = serde_json::from_str(json)?;

    let default_source = objects
        .iter()
        .filter(|o| o.object_type == "PipeWire:Interface:Metadata")
        .filter(|o| o.props.get("metadata.name").and_then(|v| v.as_str()) == Some("default"))
        .flat_map(|o| o.metadata.iter())
        .find(|e| e.key == "default.audio.source" || e.key == "default.configured.audio.source")
        .and_then(|e| e.value.get("name").and_then(|n| n.as_str()))
        .map(str::to_string);

    let prop = |props: &HashMap<String, serde_json::Value>, key: &str| {
        props.get(key).and_then(|v| v.as_str()).map(str::to_string)
    };

    let mut devices: Vec<AudioDevice> = objects
        .iter()
        .filter_map(|o| o.info.as_ref())
        .filter(|info| {
            prop(&info.props, "media.class").as_deref() == Some(pipeline::AUDIO_SOURCE_CLASS)
        })
        .map(|info| {
            let node_name = prop(&info.props, "node.name").unwrap_or_default();
            let name = prop(&info.props, "node.nick")
                .or_else(|| prop(&info.props, "node.description"))
                .unwrap_or_else(|| node_name.clone());
            AudioDevice {
                is_default: default_source.as_deref() == Some(node_name.as_str()),
                name,
                node_name,
            }
        })
        .collect();

    devices.sort_by(|a, b| b.is_default.cmp(&a.is_default).then_with(|| a.name.cmp(&b.name)));
    debug!(count = devices.len(), default = ?default_source, "Found audio sources");
    Ok(devices)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DUMP: &str = r#"[
      { "id": 0, "type": "PipeWire:Interface:Core", "info": { "props": {} } },
      { "id": 40, "type": "PipeWire:Interface:Metadata",
        "props": { "metadata.name": "default" },
        "metadata": [
          { "subject": 0, "key": "default.audio.source", "type": "Spa:String:JSON",
            "value": { "name": "alsa_input.usb-mic" } }
        ] },
      { "id": 55, "type": "PipeWire:Interface:Node",
        "info": { "props": { "media.class": "Audio/Source",
                             "node.name": "alsa_input.pci-analog",
                             "node.description": "Built-in Audio" } } },
      { "id": 56, "type": "PipeWire:Interface:Node",
        "info": { "props": { "media.class": "Audio/Source",
                             "node.name": "alsa_input.usb-mic",
                             "node.nick": "USB Mic" } } },
      { "id": 57, "type": "PipeWire:Interface:Node",
        "info": { "props": { "media.class": "Audio/Sink", "node.name": "speakers" } } }
    ]"#;

    #[test]
    fn test_parse_sources_default_first() {
        let devices = parse_pw_dump(DUMP).unwrap();
        assert_eq!(devices.len(), 2);
        assert_eq!(devices[0].name, "USB Mic");
        assert!(devices[0].is_default);
        assert_eq!(devices[1].name, "Built-in Audio");
    }

    #[test]
    fn test_parse_empty_dump() {
        assert!(parse_pw_dump("[]").unwrap().is_empty());
        assert!(parse_pw_dump("not json").is_err());
    }
}
