// SPDX-License-Identifier: GPL-3.0-only

//! XDG camera portal integration
//!
//! Inside a Flatpak sandbox the camera is only reachable after the user
//! grants access through `org.freedesktop.portal.Camera`. The portal answers
//! asynchronously with a `Response` signal on a request object whose path is
//! derived from our unique bus name and a handle token.

use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info, warn};
use zbus::zvariant::{OwnedObjectPath, OwnedValue, Value};

const PORTAL_DESTINATION: &str = "org.freedesktop.portal.Desktop";
const PORTAL_PATH: &str = "/org/freedesktop/portal/desktop";
const CAMERA_INTERFACE: &str = "org.freedesktop.portal.Camera";
const REQUEST_INTERFACE: &str = "org.freedesktop.portal.Request";

/// Whether we run inside a Flatpak sandbox
pub fn is_sandboxed() -> bool {
    Path::new("/.flatpak-info").exists()
}

/// Object path the portal will use for a request with `token`.
///
/// The unique name `:1.42` becomes `1_42`.
pub fn request_path(unique_name: &str, token: &str) -> String {
    let sender = unique_name.trim_start_matches(':').replace('.', "_");
    format!("{}/request/{}/{}", PORTAL_PATH, sender, token)
}

/// Ask the portal for camera access.
///
/// Returns `Ok(true)` when the user granted access, `Ok(false)` when access
/// was refused or no camera is present.
pub async fn access_camera() -> Result<bool, String> {
    let connection = zbus::Connection::session()
        .await
        .map_err(|e| format!("Failed to connect to session D-Bus: {}", e))?;

    let camera = zbus::Proxy::new(&connection, PORTAL_DESTINATION, PORTAL_PATH, CAMERA_INTERFACE)
        .await
        .map_err(|e| format!("Failed to create camera portal proxy: {}", e))?;

    let present: bool = camera
        .get_property("IsCameraPresent")
        .await
        .map_err(|e| format!("Failed to query IsCameraPresent: {}", e))?;
    if !present {
        info!("Camera portal reports no camera");
        return Ok(false);
    }

    let unique_name = connection
        .unique_name()
        .map(|name| name.to_string())
        .ok_or_else(|| "D-Bus connection has no unique name".to_string())?;
    let token = format!("snapcam_{}", uuid::Uuid::new_v4().simple());
    let path = request_path(&unique_name, &token);

    // Subscribe before calling so the Response cannot be missed
    let request = zbus::Proxy::new(
        &connection,
        PORTAL_DESTINATION,
        path.as_str(),
        REQUEST_INTERFACE,
    )
    .await
    .map_err(|e| format!("Failed to create request proxy: {}", e))?;
    let mut responses = request
        .receive_signal("Response")
        .await
        .map_err(|e| format!("Failed to subscribe to portal response: {}", e))?;

    let mut options: HashMap<&str, Value> = HashMap::new();
    options.insert("handle_token", Value::new(token.as_str()));

    let handle: OwnedObjectPath = camera
        .call("AccessCamera", &(options,))
        .await
        .map_err(|e| format!("AccessCamera failed: {}", e))?;
    debug!(handle = %handle, expected = %path, "Camera access requested");

    use futures::StreamExt;
    let Some(message) = responses.next().await else {
        warn!("Portal closed the request without answering");
        return Ok(false);
    };

    let (response, _results): (u32, HashMap<String, OwnedValue>) = message
        .body()
        .deserialize()
        .map_err(|e| format!("Malformed portal response: {}", e))?;

    // 0 = success, 1 = cancelled by user, 2 = other
    info!(response, "Camera portal answered");
    Ok(response == 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_path_from_unique_name() {
        assert_eq!(
            request_path(":1.42", "snapcam_abc"),
            "/org/freedesktop/portal/desktop/request/1_42/snapcam_abc"
        );
    }
}
