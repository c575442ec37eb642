// SPDX-License-Identifier: GPL-3.0-only

//! XDG Camera portal over D-Bus
//!
//! Sandboxed apps cannot see `/dev/video*`; they ask
//! `org.freedesktop.portal.Camera` for access and get a PipeWire remote in return.

use super::PermissionStatus;
use crate::errors::PermissionError;
use futures::StreamExt;
use std::collections::HashMap;
use tracing::{debug, info, warn};
use zbus::zvariant::{OwnedObjectPath, OwnedValue, Value};

const PORTAL_BUS_NAME: &str = "org.freedesktop.portal.Desktop";
const PORTAL_OBJECT_PATH: &str = "/org/freedesktop/portal/desktop";
const CAMERA_INTERFACE: &str = "org.freedesktop.portal.Camera";
const REQUEST_INTERFACE: &str = "org.freedesktop.portal.Request";

/// Map a `Request.Response` code to a status
///
/// 0 = success, 1 = cancelled by the user, 2 = other failure.
pub fn status_from_response(code: u32) -> PermissionStatus {
    match code {
        0 => PermissionStatus::Granted,
        _ => PermissionStatus::Denied,
    }
}

/// Object path of the request the portal will create for `token`
///
/// The caller's unique name `:1.42` becomes `1_42`.
pub fn request_path(unique_name: &str, token: &str) -> String {
    let sender = unique_name.trim_start_matches(':').replace('.', "_");
    format!("{}/request/{}/{}", PORTAL_OBJECT_PATH, sender, token)
}

/// Ask the portal for camera access and wait for the user's answer
pub async fn access_camera() -> Result<PermissionStatus, PermissionError> {
    let connection = zbus::Connection::session().await?;

    let camera = zbus::Proxy::new(
        &connection,
        PORTAL_BUS_NAME,
        PORTAL_OBJECT_PATH,
        CAMERA_INTERFACE,
    )
    .await?;

    let present: bool = camera.get_property("IsCameraPresent").await.unwrap_or(true);
    if !present {
        warn!("Camera portal reports no camera present");
        return Ok(PermissionStatus::Denied);
    }

    let unique_name = connection
        .unique_name()
        .ok_or_else(|| PermissionError::PortalUnavailable("No unique bus name".to_string()))?
        .to_string();
    let token = format!("visioncam_{}", uuid::Uuid::new_v4().simple());
    let path = request_path(&unique_name, &token);

    // Subscribe before calling so the response cannot be missed
    let request = zbus::Proxy::new(&connection, PORTAL_BUS_NAME, path.as_str(), REQUEST_INTERFACE)
        .await?;
    let mut responses = request.receive_signal("Response").await?;

    let mut options: HashMap<&str, Value> = HashMap::new();
    options.insert("handle_token", Value::new(token.as_str()));
    let handle: OwnedObjectPath = camera.call("AccessCamera", &(options,)).await?;
    debug!(handle = %handle, expected = %path, "Camera access requested");

    let message = responses.next().await.ok_or_else(|| {
        PermissionError::InvalidResponse("Response signal stream ended".to_string())
    })?;
    let (code, _results): (u32, HashMap<String, OwnedValue>) = message
        .body()
        .deserialize()
        .map_err(|e| PermissionError::InvalidResponse(e.to_string()))?;

    let status = status_from_response(code);
    info!(code, %status, "Camera portal answered");
    Ok(status)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_path_from_unique_name() {
        assert_eq!(
            request_path(":1.42", "visioncam_abc"),
            "/org/freedesktop/portal/desktop/request/1_42/visioncam_abc"
        );
    }

    #[test]
    fn test_response_codes() {
        assert_eq!(status_from_response(0), PermissionStatus::Granted);
        assert_eq!(status_from_response(1), PermissionStatus::Denied);
        assert_eq!(status_from_response(2), PermissionStatus::Denied);
    }
}
