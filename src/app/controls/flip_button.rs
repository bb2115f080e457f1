// SPDX-License-Identifier: GPL-3.0-only

//! Flip (front/back) button

use crate::app::state::{AppModel, Message};
use crate::constants::ui;
use crate::fl;
use cosmic::Element;
use cosmic::iced::Length;
use cosmic::widget;

/// Camera with circular arrows
const FLIP_ICON: &[u8] = include_bytes!("../../../resources/button_icons/flip-camera.svg");

impl AppModel {
    pub fn build_flip_button(&self) -> Element<'_, Message> {
        let icon = widget::icon(widget::icon::from_svg_bytes(FLIP_ICON).symbolic(true))
            .size(ui::FLIP_ICON_SIZE);

        let content = widget::container(icon)
            .width(Length::Fixed(ui::FLIP_BUTTON_SIZE))
            .height(Length::Fixed(ui::FLIP_BUTTON_SIZE))
            .center(Length::Fixed(ui::FLIP_BUTTON_SIZE));

        let button = widget::button::custom(content)
            .on_press(Message::FlipCamera)
            .padding(0)
            .class(cosmic::theme::Button::Text);

        widget::tooltip(
            widget::container(button).style(super::overlay_container_style),
            widget::text(fl!("flip-camera")),
            widget::tooltip::Position::Top,
        )
        .into()
    }
}
