// SPDX-License-Identifier: MPL-2.0

//! Capture surface controls (shutter, flip)

mod capture_button;
mod flip_button;

use crate::app::state::{AppModel, Message};
use crate::constants::ui;
use cosmic::Element;
use cosmic::iced::{Alignment, Background, Border, Color, Length};
use cosmic::widget;

/// Translucent rounded backdrop for buttons drawn over the preview
pub fn overlay_container_style(_theme: &cosmic::Theme) -> widget::container::Style {
    widget::container::Style {
        background: Some(Background::Color(Color::from_rgba(
            0.0,
            0.0,
            0.0,
            ui::OVERLAY_BACKGROUND_ALPHA,
        ))),
        text_color: Some(Color::WHITE),
        border: Border {
            radius: (ui::FLIP_BUTTON_SIZE / 2.0).into(),
            ..Default::default()
        },
        ..Default::default()
    }
}

impl AppModel {
    /// Bottom control row: flip on the left, shutter centered
    ///
    /// A spacer as wide as the flip button keeps the shutter centered.
    pub fn build_controls(&self) -> Element<'_, Message> {
        let row = widget::row()
            .push(self.build_flip_button())
            .push(widget::Space::new(Length::Fill, Length::Shrink))
            .push(self.build_capture_button())
            .push(widget::Space::new(Length::Fill, Length::Shrink))
            .push(widget::Space::new(
                Length::Fixed(ui::FLIP_BUTTON_SIZE),
                Length::Shrink,
            ))
            .align_y(Alignment::Center)
            .width(Length::Fill);

        widget::container(row)
            .width(Length::Fill)
            .height(Length::Fill)
            .align_bottom(Length::Fill)
            .padding([
                0,
                ui::CONTROLS_SIDE_PADDING,
                ui::CONTROLS_BOTTOM_PADDING,
                ui::CONTROLS_SIDE_PADDING,
            ])
            .into()
    }
}
