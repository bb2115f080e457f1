// SPDX-License-Identifier: GPL-3.0-only

//! Full-screen review of the last capture

use crate::app::state::{AppModel, Message};
use crate::constants::ui;
use crate::fl;
use cosmic::Element;
use cosmic::iced::{Alignment, Background, Color, ContentFit, Length};
use cosmic::widget;

impl AppModel {
    /// Modal overlay with the captured still and a close button
    pub fn build_review_overlay(&self) -> Element<'_, Message> {
        let spacing = cosmic::theme::spacing();

        let photo: Element<'_, Message> = match &self.review_image {
            Some(handle) => widget::image(handle.clone())
                .content_fit(ContentFit::Contain)
                .width(Length::Fill)
                .height(Length::Fill)
                .into(),
            None => widget::Space::new(Length::Fill, Length::Fill).into(),
        };

        let close_button = widget::button::icon(
            widget::icon::from_name("window-close-symbolic").size(ui::CLOSE_ICON_SIZE),
        )
        .on_press(Message::DismissReview);
        let close_button = widget::tooltip(
            close_button,
            widget::text(fl!("close-review")),
            widget::tooltip::Position::Bottom,
        );

        let top_row = widget::row()
            .push(widget::Space::new(Length::Fill, Length::Shrink))
            .push(close_button)
            .align_y(Alignment::Center)
            .padding(spacing.space_s);

        let content = widget::column()
            .push(top_row)
            .push(
                widget::container(photo)
                    .width(Length::Fill)
                    .height(Length::Fill)
                    .padding([0, spacing.space_s, spacing.space_s, spacing.space_s]),
            )
            .width(Length::Fill)
            .height(Length::Fill);

        widget::container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .style(|_theme| widget::container::Style {
                background: Some(Background::Color(Color::from_rgba(
                    0.0,
                    0.0,
                    0.0,
                    ui::REVIEW_BACKDROP_ALPHA,
                ))),
                text_color: Some(Color::WHITE),
                ..Default::default()
            })
            .into()
    }
}
