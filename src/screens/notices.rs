// SPDX-License-Identifier: GPL-3.0-only

//! Transient notices (toasts) shown over every screen

/// Tone of a transient notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

/// A toast shown over the current screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub id: u64,
    pub kind: NoticeKind,
    pub text: String,
}

/// Visible notices, oldest first
#[derive(Debug, Default)]
pub struct Notices {
    items: Vec<Notice>,
    next_id: u64,
}

impl Notices {
    /// Add a notice and return its id (used to dismiss it later)
    pub fn push(&mut self, kind: NoticeKind, text: impl Into<String>) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.items.push(Notice {
            id,
            kind,
            text: text.into(),
        });
        id
    }

    pub fn dismiss(&mut self, id: u64) {
        self.items.retain(|n| n.id != id);
    }

    pub fn items(&self) -> &[Notice] {
        &self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notices_keep_order_and_dismiss_by_id() {
        let mut notices = Notices::default();
        let first = notices.push(NoticeKind::Info, "Saved to gallery");
        let second = notices.push(NoticeKind::Error, "Could not save");
        assert_ne!(first, second);
        assert_eq!(notices.items().len(), 2);

        notices.dismiss(first);
        assert_eq!(notices.items().len(), 1);
        assert_eq!(notices.items()[0].id, second);

        notices.dismiss(first);
        assert_eq!(notices.items().len(), 1);
    }
}
