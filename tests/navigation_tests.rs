// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for routing, the permission gate and the review screen

use visioncam::permissions::{PermissionKind, PermissionState, PermissionStatus};
use visioncam::screens::{GateDecision, NoticeKind, Notices, PermissionGate, ReviewScreen, SaveTracker};
use visioncam::storage::MediaKind;
use std::path::{Path, PathBuf};
use visioncam::{Route, Router};

fn gate_with(
    camera: PermissionStatus,
    microphone: PermissionStatus,
    library: bool,
) -> PermissionGate {
    let mut gate = PermissionGate::default();
    gate.apply_query(PermissionState {
        camera,
        microphone,
        media_library: library,
    });
    gate
}

#[test]
fn test_capture_after_shutter_and_back() {
    let mut router = Router::default();
    router.push(Route::media("/tmp/img.jpg", "photo"));
    assert_eq!(router.depth(), 2);

    let href = router.current().href();
    assert_eq!(Route::parse(&href).unwrap(), *router.current());

    router.back();
    assert_eq!(*router.current(), Route::Capture);
    assert!(!router.can_go_back());
}

#[test]
fn test_discard_navigates_to_existing_capture() {
    let mut router = Router::default();
    router.push(Route::media("/tmp/img.jpg", "photo"));
    router.navigate(Route::Capture);

    assert_eq!(*router.current(), Route::Capture);
    assert_eq!(router.depth(), 1);
}

#[test]
fn test_unknown_route_is_an_error() {
    assert!(Route::parse("/settings").is_err());
    assert_eq!(Route::parse("/permissions/").unwrap(), Route::Permissions);
    assert_eq!(Route::parse("").unwrap(), Route::Capture);
}

#[test]
fn test_gate_redirects_for_every_status_combination() {
    for camera in PermissionStatus::ALL {
        for microphone in PermissionStatus::ALL {
            for library in [true, false] {
                let gate = gate_with(camera, microphone, library);
                let expected = camera != PermissionStatus::Granted
                    || microphone == PermissionStatus::NotDetermined;
                assert_eq!(
                    gate.needs_permission_screen(),
                    expected,
                    "camera={camera} microphone={microphone} library={library}"
                );
            }
        }
    }
}

#[test]
fn test_gate_continue_after_granting_everything() {
    let mut gate = gate_with(
        PermissionStatus::NotDetermined,
        PermissionStatus::NotDetermined,
        false,
    );
    assert_eq!(gate.continue_decision(), GateDecision::Blocked);

    for kind in PermissionKind::ALL {
        assert!(gate.begin_request(kind));
        assert!(!gate.begin_request(kind), "second request must be ignored");
        gate.complete_request(kind, PermissionStatus::Granted);
    }

    assert!(!gate.needs_permission_screen());
    assert_eq!(gate.continue_decision(), GateDecision::Proceed);
}

#[test]
fn test_review_from_capture_route() {
    let route = Route::media("/tmp/img.jpg", "photo");
    let Some(ReviewScreen::Ready(media)) = ReviewScreen::from_route(&route) else {
        panic!("expected a ready review screen");
    };
    assert_eq!(media.uri, "file:///tmp/img.jpg");
    assert_eq!(media.media.kind, MediaKind::Photo);
}

#[test]
fn test_review_without_media_is_invalid() {
    for kind in [Some("photo"), Some("video"), Some("gif"), None] {
        let route = Route::Media {
            media: None,
            kind: kind.map(str::to_string),
        };
        assert!(matches!(
            ReviewScreen::from_route(&route),
            Some(ReviewScreen::Invalid)
        ));
    }
    assert!(ReviewScreen::from_route(&Route::Capture).is_none());
}

#[test]
fn test_gate_redirect_after_returning_to_capture() {
    let gate = gate_with(
        PermissionStatus::Granted,
        PermissionStatus::NotDetermined,
        true,
    );
    let mut router = Router::default();
    router.push(Route::media("/tmp/img.jpg", "photo"));
    assert!(!gate.redirect(&mut router));

    router.back();
    assert!(gate.redirect(&mut router));
    assert_eq!(*router.current(), Route::Permissions);
    assert!(!router.can_go_back());
}

#[test]
fn test_shutter_save_and_back_to_capture() {
    let capture_dir = Path::new("/var/cache/visioncam/captures");
    let mut router = Router::default();
    let mut notices = Notices::default();
    let mut saves = SaveTracker::default();

    router.push(Route::media("/var/cache/visioncam/captures/IMG_1.jpg", "photo"));
    let mut review = ReviewScreen::from_route(router.current());
    let route = router.current().clone();
    let (path, kind) = saves
        .begin(review.as_mut(), &route, capture_dir)
        .expect("save should start");
    assert_eq!(path, PathBuf::from("/var/cache/visioncam/captures/IMG_1.jpg"));
    assert_eq!(kind, MediaKind::Photo);
    assert!(saves.is_pending());

    let follow_up = saves.settle(
        review.as_mut(),
        Ok(PathBuf::from("/home/u/Pictures/VisionCam/IMG_1.jpg")),
        &mut router,
        &mut notices,
    );
    assert!(follow_up.navigated);
    assert_eq!(*router.current(), Route::Capture);
    assert_eq!(notices.items().len(), 1);
    assert_eq!(notices.items()[0].kind, NoticeKind::Info);
    assert_eq!(follow_up.notice, Some(notices.items()[0].id));
}
