// SPDX-License-Identifier: GPL-3.0-only

//! CLI commands
//!
//! - Listing available cameras
//! - Showing (or requesting) permission status

use cosmic::cosmic_config::{self, CosmicConfigEntry};
use visioncam::backends::camera::{CameraBackend, SystemCameraBackend};
use visioncam::config::Config;
use visioncam::constants::APP_ID;
use visioncam::permissions::{PermissionBackend, PermissionKind, SystemPermissions};
use visioncam::storage::LibraryFolders;

/// List all available cameras
pub fn list_cameras() -> Result<(), Box<dyn std::error::Error>> {
    let cameras = SystemCameraBackend::new().enumerate_cameras();

    if cameras.is_empty() {
        println!("No cameras found.");
        return Ok(());
    }

    println!("Available cameras:");
    println!();
    for (index, camera) in cameras.iter().enumerate() {
        println!("  [{}] {} ({})", index, camera.name, camera.facing);
        println!("      Source: {}", camera.source);

        let formats: Vec<String> = camera.formats.iter().take(3).map(|f| f.to_string()).collect();
        if !formats.is_empty() {
            println!("      Formats: {}", formats.join(", "));
        }

        let zoom_kind = if camera.zoom.is_hardware() {
            "hardware"
        } else {
            "digital"
        };
        println!(
            "      Zoom: x{:.1} - x{:.1} ({})",
            camera.zoom.min, camera.zoom.max, zoom_kind
        );

        let exposure = camera.exposure_range();
        let exposure_kind = if exposure.hardware {
            "hardware"
        } else {
            "software"
        };
        println!(
            "      Exposure: {:+.1} - {:+.1} EV ({})",
            exposure.min, exposure.max, exposure_kind
        );
        println!();
    }

    Ok(())
}

/// Print the status of every permission the gate checks
pub fn show_permissions(request: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = cosmic_config::Config::new(APP_ID, Config::VERSION)
        .ok()
        .map(|handler| Config::get_entry(&handler).unwrap_or_else(|(_, config)| config))
        .unwrap_or_default();
    let folders = LibraryFolders::for_user(&config.effective_folder_name());
    let backend = SystemPermissions::new(folders.photos.clone());

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        for kind in PermissionKind::ALL {
            let status = if request {
                backend.request(kind).await
            } else {
                backend.query(kind).await
            };
            println!("{:<14} {}", format!("{}:", kind), status);
        }
    });
    println!();
    println!("Photos are saved to {}", folders.photos.display());

    Ok(())
}
