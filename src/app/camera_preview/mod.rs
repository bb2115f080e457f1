// SPDX-License-Identifier: MPL-2.0

//! Camera preview display
//!
//! The latest RGBA frame is uploaded as an image handle and scaled to cover
//! the window. Until the first frame of a feed arrives the area stays black.

use crate::app::state::{AppModel, Message};
use cosmic::Element;
use cosmic::iced::{Background, Color, ContentFit, Length};
use cosmic::widget;

impl AppModel {
    pub fn build_camera_preview(&self) -> Element<'_, Message> {
        let content: Element<'_, Message> = match &self.preview {
            Some(handle) => widget::image(handle.clone())
                .content_fit(ContentFit::Cover)
                .width(Length::Fill)
                .height(Length::Fill)
                .into(),
            None => widget::Space::new(Length::Fill, Length::Fill).into(),
        };

        widget::container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .style(|_theme| widget::container::Style {
                background: Some(Background::Color(Color::BLACK)),
                ..Default::default()
            })
            .into()
    }
}
