// SPDX-License-Identifier: GPL-3.0-only

//! Review screen controller

use crate::fl;
use crate::navigation::{Route, Router};
use crate::screens::notices::{NoticeKind, Notices};
use crate::storage::{self, CapturedMedia, MediaKind};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const FILE_SCHEME: &str = "file://";

/// URI the viewer binds to: the path, with `file://` added when missing
pub fn media_uri(media: &str) -> String {
    if media.starts_with(FILE_SCHEME) {
        media.to_string()
    } else {
        format!("{}{}", FILE_SCHEME, media)
    }
}

/// Filesystem path for a `media` parameter (plain path or file URL)
pub fn media_path(media: &str) -> PathBuf {
    if media.starts_with(FILE_SCHEME) {
        if let Some(path) = url::Url::parse(media)
            .ok()
            .and_then(|u| u.to_file_path().ok())
        {
            return path;
        }
        return PathBuf::from(&media[FILE_SCHEME.len()..]);
    }
    PathBuf::from(media)
}

/// How a save attempt ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Notify once and navigate back
    Saved(PathBuf),
    /// Notify and stay; the user may retry
    Failed(String),
    /// No save was in flight
    Ignored,
}

impl SaveOutcome {
    fn settled(result: Result<PathBuf, String>) -> Self {
        match result {
            Ok(path) => {
                info!(path = %path.display(), "Media saved");
                SaveOutcome::Saved(path)
            }
            Err(err) => {
                warn!(error = %err, "Saving media failed");
                SaveOutcome::Failed(err)
            }
        }
    }
}

/// Media shown by the review screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewMedia {
    pub media: CapturedMedia,
    pub uri: String,
    saving: bool,
    saved: bool,
}

impl ReviewMedia {
    pub fn is_saving(&self) -> bool {
        self.saving
    }

    /// Start a save; `None` while one is in flight or after it succeeded
    pub fn begin_save(&mut self) -> Option<(PathBuf, MediaKind)> {
        if self.saving || self.saved {
            debug!("Save already in progress, ignoring");
            return None;
        }
        self.saving = true;
        Some((self.media.path.clone(), self.media.kind))
    }

    pub fn finish_save(&mut self, result: Result<PathBuf, String>) -> SaveOutcome {
        if !self.saving {
            return SaveOutcome::Ignored;
        }
        self.saving = false;
        let outcome = SaveOutcome::settled(result);
        self.saved = matches!(outcome, SaveOutcome::Saved(_));
        outcome
    }

    /// The file to delete on discard: only temporary captures qualify
    pub fn discard_target(&self, capture_dir: &Path) -> Option<PathBuf> {
        storage::is_inside(&self.media.path, capture_dir).then(|| self.media.path.clone())
    }
}

/// State of the `/media` route
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewScreen {
    /// Missing or unrecognised parameters
    Invalid,
    Ready(ReviewMedia),
}

impl ReviewScreen {
    pub fn from_params(media: Option<&str>, kind: Option<&str>) -> Self {
        let (Some(media), Some(kind)) = (media.filter(|m| !m.is_empty()), kind) else {
            debug!(?media, ?kind, "Review opened without media parameters");
            return ReviewScreen::Invalid;
        };
        let Some(kind) = MediaKind::parse(kind) else {
            debug!(kind, "Review opened with unknown media type");
            return ReviewScreen::Invalid;
        };
        ReviewScreen::Ready(ReviewMedia {
            media: CapturedMedia {
                path: media_path(media),
                kind,
            },
            uri: media_uri(media),
            saving: false,
            saved: false,
        })
    }

    /// Review state for a route; `None` for other screens
    pub fn from_route(route: &Route) -> Option<Self> {
        match route {
            Route::Media { media, kind } => {
                Some(Self::from_params(media.as_deref(), kind.as_deref()))
            }
            _ => None,
        }
    }

    pub fn media(&self) -> Option<&ReviewMedia> {
        match self {
            ReviewScreen::Ready(media) => Some(media),
            ReviewScreen::Invalid => None,
        }
    }

    pub fn media_mut(&mut self) -> Option<&mut ReviewMedia> {
        match self {
            ReviewScreen::Ready(media) => Some(media),
            ReviewScreen::Invalid => None,
        }
    }
}

/// A library save that has not answered yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSave {
    /// Review route that started the save
    pub route: Route,
    /// Temporary capture to delete once the file is in the library
    pub temporary: Option<PathBuf>,
}

/// What the shell still has to do once a save has answered
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveFollowUp {
    /// Notice pushed for the result, to dismiss later
    pub notice: Option<u64>,
    /// Temporary capture to delete
    pub cleanup: Option<PathBuf>,
    /// The router moved; the new route must be mounted
    pub navigated: bool,
}

/// Tracks the save in flight independently of the review screen
///
/// Leaving `/media` drops the screen state, but the answer still has to
/// produce its single notice and remove the temporary capture.
#[derive(Debug, Clone, Default)]
pub struct SaveTracker {
    pending: Option<PendingSave>,
}

impl SaveTracker {
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Start saving the media shown at `route`
    ///
    /// `None` while another save is in flight or when the screen has nothing
    /// to save.
    pub fn begin(
        &mut self,
        review: Option<&mut ReviewScreen>,
        route: &Route,
        capture_dir: &Path,
    ) -> Option<(PathBuf, MediaKind)> {
        if self.pending.is_some() {
            debug!("A save is already in flight, ignoring");
            return None;
        }
        let media = review.and_then(ReviewScreen::media_mut)?;
        let temporary = media.discard_target(capture_dir);
        let started = media.begin_save()?;
        self.pending = Some(PendingSave {
            route: route.clone(),
            temporary,
        });
        Some(started)
    }

    /// Apply a save answer: one notice, and back to the previous screen on
    /// success when the review that started it is still shown
    pub fn settle(
        &mut self,
        review: Option<&mut ReviewScreen>,
        result: Result<PathBuf, String>,
        router: &mut Router,
        notices: &mut Notices,
    ) -> SaveFollowUp {
        let Some(save) = self.pending.take() else {
            debug!("No save in flight, ignoring result");
            return SaveFollowUp::default();
        };
        let on_screen = *router.current() == save.route;

        let outcome = match review.and_then(ReviewScreen::media_mut) {
            Some(media) if on_screen && media.is_saving() => media.finish_save(result),
            _ => SaveOutcome::settled(result),
        };

        match outcome {
            SaveOutcome::Saved(_) => {
                let notice = notices.push(NoticeKind::Info, fl!("review-saved"));
                if on_screen {
                    router.back();
                } else {
                    debug!(route = %save.route, "Review left while saving, staying put");
                }
                SaveFollowUp {
                    notice: Some(notice),
                    cleanup: save.temporary,
                    navigated: on_screen,
                }
            }
            SaveOutcome::Failed(error) => SaveFollowUp {
                notice: Some(notices.push(
                    NoticeKind::Error,
                    fl!("review-save-failed", error = error),
                )),
                ..SaveFollowUp::default()
            },
            SaveOutcome::Ignored => SaveFollowUp::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ready(path: &str) -> ReviewMedia {
        match ReviewScreen::from_params(Some(path), Some("photo")) {
            ReviewScreen::Ready(media) => media,
            ReviewScreen::Invalid => panic!("expected media"),
        }
    }

    #[test]
    fn test_photo_binds_file_uri() {
        let media = ready("/tmp/img.jpg");
        assert_eq!(media.uri, "file:///tmp/img.jpg");
        assert_eq!(media.media.path, PathBuf::from("/tmp/img.jpg"));
        assert_eq!(media.media.kind, MediaKind::Photo);
    }

    #[test]
    fn test_existing_scheme_is_kept() {
        let media = ready("file:///tmp/my%20img.jpg");
        assert_eq!(media.uri, "file:///tmp/my%20img.jpg");
        assert_eq!(media.media.path, PathBuf::from("/tmp/my img.jpg"));
    }

    #[test]
    fn test_missing_media_is_invalid_for_any_kind() {
        for kind in [Some("photo"), Some("video"), Some("gif"), None] {
            assert_eq!(ReviewScreen::from_params(None, kind), ReviewScreen::Invalid);
            assert_eq!(ReviewScreen::from_params(Some(""), kind), ReviewScreen::Invalid);
        }
        assert_eq!(
            ReviewScreen::from_params(Some("/tmp/a.jpg"), None),
            ReviewScreen::Invalid
        );
        assert_eq!(
            ReviewScreen::from_params(Some("/tmp/a.jpg"), Some("gif")),
            ReviewScreen::Invalid
        );
    }

    #[test]
    fn test_route_mapping() {
        assert_eq!(ReviewScreen::from_route(&Route::Capture), None);
        let screen = ReviewScreen::from_route(&Route::media("/tmp/v.mp4", "video")).unwrap();
        assert_eq!(screen.media().unwrap().media.kind, MediaKind::Video);
    }

    #[test]
    fn test_save_guard_and_single_success() {
        let mut media = ready("/tmp/img.jpg");
        assert!(media.begin_save().is_some());
        assert!(media.begin_save().is_none());

        let saved = PathBuf::from("/home/u/Pictures/VisionCam/IMG_1.jpg");
        assert_eq!(
            media.finish_save(Ok(saved.clone())),
            SaveOutcome::Saved(saved.clone())
        );
        assert_eq!(media.finish_save(Ok(saved)), SaveOutcome::Ignored);
        assert!(media.begin_save().is_none());
    }

    #[test]
    fn test_failed_save_allows_retry() {
        let mut media = ready("/tmp/img.jpg");
        media.begin_save();
        assert_eq!(
            media.finish_save(Err("disk full".into())),
            SaveOutcome::Failed("disk full".into())
        );
        assert!(!media.is_saving());
        assert!(media.begin_save().is_some());
    }

    #[test]
    fn test_discard_only_targets_capture_dir() {
        let capture_dir = Path::new("/var/cache/visioncam/captures");
        let temp = ready("/var/cache/visioncam/captures/IMG_1.jpg");
        assert_eq!(
            temp.discard_target(capture_dir),
            Some(PathBuf::from("/var/cache/visioncam/captures/IMG_1.jpg"))
        );
        let library = ready("/home/u/Pictures/IMG_1.jpg");
        assert_eq!(library.discard_target(capture_dir), None);
    }

    struct Flow {
        router: Router,
        notices: Notices,
        review: Option<ReviewScreen>,
        saves: SaveTracker,
    }

    const CAPTURE_DIR: &str = "/var/cache/visioncam/captures";
    const TEMP: &str = "/var/cache/visioncam/captures/IMG_1.jpg";

    fn reviewing() -> Flow {
        let mut router = Router::default();
        router.push(Route::media(TEMP, "photo"));
        let review = ReviewScreen::from_route(router.current());
        Flow {
            router,
            notices: Notices::default(),
            review,
            saves: SaveTracker::default(),
        }
    }

    impl Flow {
        fn begin(&mut self) -> Option<(PathBuf, MediaKind)> {
            let route = self.router.current().clone();
            self.saves
                .begin(self.review.as_mut(), &route, Path::new(CAPTURE_DIR))
        }

        fn settle(&mut self, result: Result<PathBuf, String>) -> SaveFollowUp {
            self.saves.settle(
                self.review.as_mut(),
                result,
                &mut self.router,
                &mut self.notices,
            )
        }

        fn kinds(&self) -> Vec<NoticeKind> {
            self.notices.items().iter().map(|n| n.kind).collect()
        }
    }

    #[test]
    fn test_saved_goes_back_with_one_notice() {
        let mut flow = reviewing();
        assert!(flow.begin().is_some());
        assert!(flow.begin().is_none());

        let follow_up = flow.settle(Ok(PathBuf::from("/home/u/Pictures/IMG_1.jpg")));
        assert!(follow_up.navigated);
        assert_eq!(follow_up.cleanup, Some(PathBuf::from(TEMP)));
        assert_eq!(*flow.router.current(), Route::Capture);
        assert_eq!(flow.kinds(), vec![NoticeKind::Info]);

        let repeated = flow.settle(Ok(PathBuf::from("/home/u/Pictures/IMG_1.jpg")));
        assert_eq!(repeated, SaveFollowUp::default());
        assert_eq!(flow.notices.items().len(), 1);
    }

    #[test]
    fn test_failed_save_stays_with_error_notice() {
        let mut flow = reviewing();
        flow.begin();
        let route = flow.router.current().clone();

        let follow_up = flow.settle(Err("disk full".into()));
        assert!(!follow_up.navigated);
        assert_eq!(follow_up.cleanup, None);
        assert_eq!(*flow.router.current(), route);
        assert_eq!(flow.kinds(), vec![NoticeKind::Error]);
        assert!(!flow.saves.is_pending());
        assert!(flow.begin().is_some());
    }

    #[test]
    fn test_save_answer_after_leaving_review_still_notifies() {
        let mut flow = reviewing();
        flow.begin();
        flow.router.back();
        flow.review = None;

        let follow_up = flow.settle(Ok(PathBuf::from("/home/u/Pictures/IMG_1.jpg")));
        assert!(!follow_up.navigated);
        assert_eq!(follow_up.cleanup, Some(PathBuf::from(TEMP)));
        assert_eq!(*flow.router.current(), Route::Capture);
        assert_eq!(flow.kinds(), vec![NoticeKind::Info]);
    }

    #[test]
    fn test_invalid_review_has_nothing_to_save() {
        let mut flow = reviewing();
        flow.review = Some(ReviewScreen::Invalid);
        assert!(flow.begin().is_none());
        assert!(!flow.saves.is_pending());
        assert_eq!(flow.settle(Ok(PathBuf::from("/x.jpg"))), SaveFollowUp::default());
        assert!(flow.notices.items().is_empty());
    }
}
