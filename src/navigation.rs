// SPDX-License-Identifier: GPL-3.0-only

//! Stack router with named routes
//!
//! Routes have string forms (`/`, `/permissions`, `/media?media=..&type=..`) so a
//! captured file can be handed to the review screen exactly as a link would.

use crate::errors::AppError;
use std::fmt;
use tracing::debug;
use url::form_urlencoded;

/// A screen and its parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/`
    Capture,
    /// `/permissions`
    Permissions,
    /// `/media`, parameters are kept raw and validated by the review screen
    Media {
        media: Option<String>,
        kind: Option<String>,
    },
}

impl Route {
    /// Review route for a captured file
    pub fn media(path: impl Into<String>, kind: impl Into<String>) -> Self {
        Route::Media {
            media: Some(path.into()),
            kind: Some(kind.into()),
        }
    }

    /// Path without parameters
    pub fn path(&self) -> &'static str {
        match self {
            Route::Capture => "/",
            Route::Permissions => "/permissions",
            Route::Media { .. } => "/media",
        }
    }

    /// Full link, parameters percent-encoded
    pub fn href(&self) -> String {
        match self {
            Route::Media { media, kind } => {
                let mut query = form_urlencoded::Serializer::new(String::new());
                if let Some(media) = media {
                    query.append_pair("media", media);
                }
                if let Some(kind) = kind {
                    query.append_pair("type", kind);
                }
                let query = query.finish();
                if query.is_empty() {
                    self.path().to_string()
                } else {
                    format!("{}?{}", self.path(), query)
                }
            }
            _ => self.path().to_string(),
        }
    }

    /// Parse a link produced by [`Route::href`] (or typed by hand)
    pub fn parse(href: &str) -> Result<Self, AppError> {
        let (path, query) = href.split_once('?').unwrap_or((href, ""));
        let path = match path.trim_end_matches('/') {
            "" => "/",
            p => p,
        };

        match path {
            "/" => Ok(Route::Capture),
            "/permissions" => Ok(Route::Permissions),
            "/media" => {
                let mut media = None;
                let mut kind = None;
                for (key, value) in form_urlencoded::parse(query.as_bytes()) {
                    match key.as_ref() {
                        "media" => media = Some(value.into_owned()),
                        "type" => kind = Some(value.into_owned()),
                        _ => {}
                    }
                }
                Ok(Route::Media { media, kind })
            }
            other => Err(AppError::Navigation(format!("Unknown route: {}", other))),
        }
    }

    /// Same screen, ignoring parameters
    pub fn same_screen(&self, other: &Route) -> bool {
        self.path() == other.path()
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.href())
    }
}

/// Navigation stack; never empty
#[derive(Debug, Clone)]
pub struct Router {
    stack: Vec<Route>,
}

impl Default for Router {
    fn default() -> Self {
        Self::new(Route::Capture)
    }
}

impl Router {
    pub fn new(initial: Route) -> Self {
        Self {
            stack: vec![initial],
        }
    }

    pub fn current(&self) -> &Route {
        // The stack is never empty: every removal path leaves one route
        &self.stack[self.stack.len() - 1]
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn can_go_back(&self) -> bool {
        self.stack.len() > 1
    }

    /// Open a screen on top of the current one
    pub fn push(&mut self, route: Route) {
        debug!(from = %self.current(), to = %route, "push");
        self.stack.push(route);
    }

    /// Swap the current screen without growing history
    pub fn replace(&mut self, route: Route) {
        debug!(from = %self.current(), to = %route, "replace");
        let last = self.stack.len() - 1;
        self.stack[last] = route;
    }

    /// Pop one screen; from the root, go to the capture screen
    pub fn back(&mut self) {
        if self.can_go_back() {
            self.stack.pop();
        } else if *self.current() != Route::Capture {
            self.replace(Route::Capture);
        }
        debug!(to = %self.current(), "back");
    }

    /// Unwind to an existing screen, or push it when it is not in history
    pub fn navigate(&mut self, route: Route) {
        match self.stack.iter().rposition(|r| r.same_screen(&route)) {
            Some(index) => {
                self.stack.truncate(index + 1);
                self.replace(route);
            }
            None => self.push(route),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_href_round_trip() {
        let route = Route::media("/tmp/my photo&1.jpg", "photo");
        let href = route.href();
        assert!(href.starts_with("/media?media="));
        assert!(!href.contains(' '));
        assert_eq!(Route::parse(&href).unwrap(), route);
    }

    #[test]
    fn test_parse_simple_routes() {
        assert_eq!(Route::parse("/").unwrap(), Route::Capture);
        assert_eq!(Route::parse("").unwrap(), Route::Capture);
        assert_eq!(Route::parse("/permissions/").unwrap(), Route::Permissions);
        assert!(Route::parse("/settings").is_err());
    }

    #[test]
    fn test_parse_media_with_missing_params() {
        assert_eq!(
            Route::parse("/media?type=video").unwrap(),
            Route::Media {
                media: None,
                kind: Some("video".to_string())
            }
        );
        assert_eq!(
            Route::parse("/media").unwrap(),
            Route::Media {
                media: None,
                kind: None
            }
        );
    }

    #[test]
    fn test_back_from_root_lands_on_capture() {
        let mut router = Router::new(Route::Permissions);
        router.back();
        assert_eq!(router.current(), &Route::Capture);
        assert_eq!(router.depth(), 1);
    }

    #[test]
    fn test_push_back_and_replace() {
        let mut router = Router::default();
        router.push(Route::media("/tmp/a.jpg", "photo"));
        assert_eq!(router.depth(), 2);
        router.back();
        assert_eq!(router.current(), &Route::Capture);

        router.replace(Route::Permissions);
        assert_eq!(router.depth(), 1);
        assert_eq!(router.current(), &Route::Permissions);
    }

    #[test]
    fn test_navigate_unwinds_to_existing_screen() {
        let mut router = Router::default();
        router.push(Route::Permissions);
        router.push(Route::media("/tmp/a.jpg", "photo"));
        router.navigate(Route::Capture);
        assert_eq!(router.depth(), 1);
        assert_eq!(router.current(), &Route::Capture);
    }
}
