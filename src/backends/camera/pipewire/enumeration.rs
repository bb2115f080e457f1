// SPDX-License-Identifier: GPL-3.0-only

//! PipeWire camera discovery
//!
//! Cameras are listed with `pw-cli ls Node`. The libcamera location property
//! is not part of that listing, so it is read per node with `pw-cli info`.

use super::super::types::CameraDevice;
use tracing::{debug, info, warn};

/// Enumerate cameras using PipeWire
///
/// Returns `None` when PipeWire is unusable (GStreamer missing, no
/// `pipewiresrc`). When PipeWire works but nothing can be listed, a single
/// auto-select device is returned so PipeWire picks its default camera.
pub fn enumerate_pipewire_cameras() -> Option<Vec<CameraDevice>> {
    if !is_pipewire_available() {
        return None;
    }

    match list_video_nodes() {
        Some(mut cameras) if !cameras.is_empty() => {
            for camera in &mut cameras {
                if let Some(node_id) = camera.node_id.as_deref() {
                    camera.location = query_node_location(node_id);
                }
            }
            debug!(count = cameras.len(), "Enumerated cameras via pw-cli");
            Some(cameras)
        }
        _ => {
            info!("Using PipeWire auto-selection (default camera)");
            Some(vec![CameraDevice::auto_select()])
        }
    }
}

/// Whether GStreamer initializes and provides `pipewiresrc`
pub fn is_pipewire_available() -> bool {
    if let Err(e) = gstreamer::init() {
        warn!(error = %e, "GStreamer init failed");
        return false;
    }

    let available = gstreamer::ElementFactory::find("pipewiresrc").is_some();
    if !available {
        debug!("pipewiresrc not available");
    }
    available
}

fn list_video_nodes() -> Option<Vec<CameraDevice>> {
    let output = std::process::Command::new("pw-cli")
        .args(["ls", "Node"])
        .output()
        .map_err(|e| debug!(error = %e, "pw-cli not runnable"))
        .ok()?;

    if !output.status.success() {
        debug!(status = %output.status, "pw-cli ls failed");
        return None;
    }

    Some(parse_pw_cli_nodes(&String::from_utf8_lossy(&output.stdout)))
}

/// Node properties collected while scanning one `id N, type ...Node` block
#[derive(Default)]
struct NodeBlock {
    id: String,
    serial: Option<String>,
    description: Option<String>,
    video_source: bool,
}

impl NodeBlock {
    fn into_device(self) -> Option<CameraDevice> {
        if !self.video_source {
            return None;
        }
        let name = self.description?;

        // object.serial is what pipewiresrc target-object expects; the node id is a fallback
        let path = match &self.serial {
            Some(serial) => format!("pipewire-serial-{}", serial),
            None => format!("pipewire-{}", self.id),
        };

        Some(CameraDevice {
            name,
            path,
            node_id: Some(self.id),
            location: None,
        })
    }
}

/// Parse `pw-cli ls Node` output into video source devices
///
/// Blocks start with `id N, type PipeWire:Interface:Node/3` and carry
/// `key = "value"` property lines. Only `media.class = "Video/Source"` nodes
/// with a `node.description` are kept.
pub fn parse_pw_cli_nodes(listing: &str) -> Vec<CameraDevice> {
    let mut cameras = Vec::new();
    let mut current: Option<NodeBlock> = None;

    for line in listing.lines().map(str::trim) {
        if let Some(rest) = line.strip_prefix("id ")
            && line.contains("type PipeWire:Interface:Node")
        {
            if let Some(device) = current.take().and_then(NodeBlock::into_device) {
                cameras.push(device);
            }
            let id = rest.split(',').next().unwrap_or_default().trim();
            current = Some(NodeBlock {
                id: id.to_string(),
                ..Default::default()
            });
            continue;
        }

        let Some(block) = current.as_mut() else {
            continue;
        };
        let Some((key, value)) = property(line) else {
            continue;
        };

        match key {
            "media.class" => block.video_source = value == "Video/Source",
            "object.serial" => block.serial = Some(value.to_string()),
            "node.description" => block.description = Some(value.to_string()),
            _ => {}
        }
    }

    if let Some(device) = current.and_then(NodeBlock::into_device) {
        cameras.push(device);
    }

    cameras
}

/// Split a `key = "value"` line; pw-cli marks changed properties with a leading `*`
fn property(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once('=')?;
    let key = key.trim().trim_start_matches('*').trim();
    let value = value.trim().strip_prefix('"')?.strip_suffix('"')?;
    Some((key, value))
}

/// Read `api.libcamera.location` for a node (front, back, external)
fn query_node_location(node_id: &str) -> Option<String> {
    let output = match std::process::Command::new("pw-cli")
        .args(["info", node_id])
        .output()
    {
        Ok(output) if output.status.success() => output,
        _ => {
            debug!(node_id, "Failed to query node info for location");
            return None;
        }
    };

    let location = parse_location(&String::from_utf8_lossy(&output.stdout));
    debug!(node_id, ?location, "Queried camera location");
    location
}

fn parse_location(info: &str) -> Option<String> {
    info.lines()
        .filter_map(|line| property(line.trim()))
        .find(|(key, _)| *key == "api.libcamera.location")
        .map(|(_, value)| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = r#"
	id 31, type PipeWire:Interface:Node/3
 		object.serial = "31"
 		factory.id = "10"
 		node.description = "Built-in Audio Analog Stereo"
 		media.class = "Audio/Sink"
	id 58, type PipeWire:Interface:Node/3
 		object.serial = "2146"
 		node.description = "Front Camera"
 		media.class = "Video/Source"
	id 59, type PipeWire:Interface:Node/3
 		node.description = "Rear Camera"
 		media.class = "Video/Source"
	id 60, type PipeWire:Interface:Node/3
 		object.serial = "2150"
 		media.class = "Video/Source"
"#;

    #[test]
    fn test_parse_keeps_named_video_sources() {
        let cameras = parse_pw_cli_nodes(LISTING);
        assert_eq!(cameras.len(), 2);

        assert_eq!(cameras[0].name, "Front Camera");
        assert_eq!(cameras[0].path, "pipewire-serial-2146");
        assert_eq!(cameras[0].node_id.as_deref(), Some("58"));

        // No serial: fall back to the node id
        assert_eq!(cameras[1].name, "Rear Camera");
        assert_eq!(cameras[1].path, "pipewire-59");
    }

    #[test]
    fn test_parse_empty_listing() {
        assert!(parse_pw_cli_nodes("").is_empty());
    }

    #[test]
    fn test_parse_location_from_info() {
        let info = r#"
	id: 58
	*	properties:
 		api.libcamera.rotation = "270"
 		api.libcamera.location = "front"
"#;
        assert_eq!(parse_location(info).as_deref(), Some("front"));
        assert_eq!(parse_location("id: 3"), None);
    }

    #[test]
    fn test_property_strips_change_marker() {
        assert_eq!(
            property(r#"*  media.class = "Video/Source""#),
            Some(("media.class", "Video/Source"))
        );
        assert_eq!(property("no equals here"), None);
    }
}
