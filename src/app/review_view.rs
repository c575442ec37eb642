// SPDX-License-Identifier: GPL-3.0-only

//! Review screen view

use crate::app::state::{AppModel, Message};
use crate::fl;
use crate::navigation::Route;
use crate::screens::{ReviewMedia, ReviewScreen};
use crate::storage::MediaKind;
use cosmic::Element;
use cosmic::iced::{Alignment, ContentFit, Length};
use cosmic::widget::{self, icon};

impl AppModel {
    pub fn build_review_view(&self) -> Element<'_, Message> {
        match self.review.as_ref() {
            Some(ReviewScreen::Ready(media)) => self.build_review_media(media),
            Some(ReviewScreen::Invalid) | None => Self::build_review_invalid(),
        }
    }

    /// Recovery state for a missing or unrecognised media link
    fn build_review_invalid() -> Element<'static, Message> {
        let spacing = cosmic::theme::spacing();

        let column = widget::column::with_capacity(4)
            .push(icon::from_name("image-missing-symbolic").size(64).icon())
            .push(widget::text::title3(fl!("review-invalid")))
            .push(widget::text::body(fl!("review-invalid-body")))
            .push(
                widget::button::link(fl!("review-back-to-camera"))
                    .on_press(Message::Navigate(Route::Capture)),
            )
            .spacing(spacing.space_s)
            .align_x(Alignment::Center);

        widget::container(column)
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .into()
    }

    fn build_review_media<'a>(&'a self, media: &'a ReviewMedia) -> Element<'a, Message> {
        let spacing = cosmic::theme::spacing();

        let content: Element<'a, Message> = match (media.media.kind, &self.review_image) {
            (MediaKind::Photo, Some(handle)) => widget::image(handle.clone())
                .content_fit(ContentFit::Contain)
                .width(Length::Fill)
                .height(Length::Fill)
                .into(),
            _ => Self::build_video_card(media),
        };

        let save_button = if media.is_saving() {
            widget::button::suggested(fl!("review-saving"))
        } else {
            widget::button::suggested(fl!("review-save")).on_press(Message::SaveToLibrary)
        };

        let discard_button = widget::button::destructive(fl!("review-discard"))
            .on_press_maybe((!media.is_saving()).then_some(Message::DiscardAndBack));

        let actions = widget::row::with_capacity(3)
            .push(discard_button)
            .push(widget::horizontal_space())
            .push(save_button)
            .align_y(Alignment::Center)
            .padding(spacing.space_s);

        widget::column::with_capacity(2)
            .push(widget::container(content).width(Length::Fill).height(Length::Fill))
            .push(actions)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    /// Card that hands the file to the system player
    fn build_video_card(media: &ReviewMedia) -> Element<'_, Message> {
        let spacing = cosmic::theme::spacing();
        let name = media
            .media
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| media.uri.clone());

        let card = widget::column::with_capacity(3)
            .push(icon::from_name("video-x-generic-symbolic").size(64).icon())
            .push(widget::text::body(fl!("review-video-file", name = name)))
            .push(
                widget::button::standard(fl!("review-open-video"))
                    .leading_icon(icon::from_name("media-playback-start-symbolic").handle())
                    .on_press(Message::OpenVideo),
            )
            .spacing(spacing.space_s)
            .align_x(Alignment::Center);

        widget::container(
            widget::container(card)
                .padding(spacing.space_m)
                .class(cosmic::theme::Container::Card),
        )
        .width(Length::Fill)
        .height(Length::Fill)
        .center_x(Length::Fill)
        .center_y(Length::Fill)
        .into()
    }
}
