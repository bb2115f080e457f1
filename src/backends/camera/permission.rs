// SPDX-License-Identifier: GPL-3.0-only

//! Camera access through xdg-desktop-portal
//!
//! Sandboxed apps must ask `org.freedesktop.portal.Camera` before PipeWire
//! exposes camera nodes to them. Outside a sandbox there is usually no
//! Camera portal at all and host device permissions apply.

use super::types::{BackendError, BackendResult, PermissionVerdict};
use futures::StreamExt;
use std::collections::HashMap;
use tracing::{info, warn};
use zbus::zvariant::{OwnedObjectPath, OwnedValue, Value};

const PORTAL_DESTINATION: &str = "org.freedesktop.portal.Desktop";
const PORTAL_PATH: &str = "/org/freedesktop/portal/desktop";
const CAMERA_INTERFACE: &str = "org.freedesktop.portal.Camera";
const REQUEST_INTERFACE: &str = "org.freedesktop.portal.Request";

/// Portal response code for a granted request
const RESPONSE_SUCCESS: u32 = 0;

/// Request camera access
///
/// - session bus or Camera portal unreachable → granted (no portal mediation)
/// - portal reports no camera → denied
/// - portal response 0 → granted, any other response → denied
///
/// Errors are only returned for failures after the portal was reached.
pub async fn request_camera_access() -> BackendResult<PermissionVerdict> {
    let connection = match zbus::Connection::session().await {
        Ok(connection) => connection,
        Err(e) => {
            info!(error = %e, "No session bus - using host camera permissions");
            return Ok(PermissionVerdict::Granted);
        }
    };

    let camera = match zbus::Proxy::new(
        &connection,
        PORTAL_DESTINATION,
        PORTAL_PATH,
        CAMERA_INTERFACE,
    )
    .await
    {
        Ok(proxy) => proxy,
        Err(e) => {
            info!(error = %e, "Camera portal unavailable - using host camera permissions");
            return Ok(PermissionVerdict::Granted);
        }
    };

    match camera.get_property::<bool>("IsCameraPresent").await {
        Ok(true) => {}
        Ok(false) => {
            warn!("Camera portal reports no camera present");
            return Ok(PermissionVerdict::Denied);
        }
        Err(e) => {
            // Older portals and hosts without the Camera backend land here
            info!(error = %e, "Camera portal not implemented - using host camera permissions");
            return Ok(PermissionVerdict::Granted);
        }
    }

    let token = handle_token();
    let sender = connection
        .unique_name()
        .ok_or_else(|| BackendError::Portal("connection has no unique name".to_string()))?;
    let request_path = request_object_path(sender.as_str(), &token);

    // Subscribe before calling so the Response signal cannot be missed
    let request = zbus::Proxy::new(
        &connection,
        PORTAL_DESTINATION,
        request_path.clone(),
        REQUEST_INTERFACE,
    )
    .await?;
    let mut responses = request.receive_signal("Response").await?;

    let mut options: HashMap<&str, Value> = HashMap::new();
    options.insert("handle_token", Value::new(token.as_str()));

    info!(request = %request_path, "Requesting camera access from portal");
    let handle: OwnedObjectPath = camera.call("AccessCamera", &(options,)).await?;
    if request_handle_moved(&request_path, handle.as_str()) {
        // Portals older than 0.9 ignore handle_token and pick their own path
        warn!(expected = %request_path, actual = %handle.as_str(), "Portal returned a different request handle");
        let moved = zbus::Proxy::new(
            &connection,
            PORTAL_DESTINATION,
            handle.as_str().to_string(),
            REQUEST_INTERFACE,
        )
        .await?;
        responses = moved.receive_signal("Response").await?;
    }

    let message = responses
        .next()
        .await
        .ok_or_else(|| BackendError::Portal("response stream ended".to_string()))?;
    let (response, _results): (u32, HashMap<String, OwnedValue>) = message
        .body()
        .deserialize()
        .map_err(|e| BackendError::Portal(format!("malformed response: {}", e)))?;

    let verdict = verdict_from_response(response);
    info!(response, ?verdict, "Camera portal responded");
    Ok(verdict)
}

/// Whether the portal answered on a different request path than the one subscribed to
pub fn request_handle_moved(expected: &str, actual: &str) -> bool {
    expected != actual
}

/// Map a portal response code to a verdict
///
/// 0 = success, 1 = cancelled by the user, 2 = ended some other way.
pub fn verdict_from_response(response: u32) -> PermissionVerdict {
    if response == RESPONSE_SUCCESS {
        PermissionVerdict::Granted
    } else {
        PermissionVerdict::Denied
    }
}

/// Object path the portal will use for a request made with `token`
///
/// `/org/freedesktop/portal/desktop/request/SENDER/TOKEN`, where SENDER is the
/// caller's unique bus name without the leading ':' and with '.' replaced by '_'.
pub fn request_object_path(unique_name: &str, token: &str) -> String {
    let sender = unique_name.trim_start_matches(':').replace('.', "_");
    format!("{}/request/{}/{}", PORTAL_PATH, sender, token)
}

/// Unique token for one portal request (must be a valid object path element)
fn handle_token() -> String {
    format!("quickshot_{}", uuid::Uuid::new_v4().simple())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_path_from_unique_name() {
        assert_eq!(
            request_object_path(":1.42", "quickshot_abc"),
            "/org/freedesktop/portal/desktop/request/1_42/quickshot_abc"
        );
    }

    #[test]
    fn test_handle_token_is_path_safe() {
        let token = handle_token();
        assert!(token.starts_with("quickshot_"));
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'));
        assert_ne!(token, handle_token());
    }

    #[test]
    fn test_request_handle_moved() {
        let expected = request_object_path(":1.42", "quickshot_abc");
        assert!(!request_handle_moved(&expected, &expected));
        assert!(request_handle_moved(
            &expected,
            "/org/freedesktop/portal/desktop/request/1_42/t7"
        ));
    }

    #[test]
    fn test_response_codes() {
        assert_eq!(verdict_from_response(0), PermissionVerdict::Granted);
        assert_eq!(verdict_from_response(1), PermissionVerdict::Denied);
        assert_eq!(verdict_from_response(2), PermissionVerdict::Denied);
    }
}
