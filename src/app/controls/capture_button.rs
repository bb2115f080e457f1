// SPDX-License-Identifier: MPL-2.0

//! Shutter button

use crate::app::state::{AppModel, Message};
use crate::constants::ui;
use crate::fl;
use cosmic::Element;
use cosmic::iced::{Background, Border, Color, Length};
use cosmic::widget;

impl AppModel {
    /// Build the shutter button
    ///
    /// White disc when ready; smaller and gray while a capture is pending.
    /// The button always emits `Shutter` - whether a capture actually starts
    /// is decided by the screen state (attached feed, nothing in flight).
    pub fn build_capture_button(&self) -> Element<'_, Message> {
        let busy = self.screen.capture_in_flight();

        let (color, scale) = if busy {
            (Color::from_rgb(0.7, 0.7, 0.7), ui::CAPTURE_BUTTON_BUSY_SCALE)
        } else {
            (Color::WHITE, 1.0)
        };
        let inner_size = ui::CAPTURE_BUTTON_INNER * scale;
        let outer_size = ui::CAPTURE_BUTTON_OUTER * scale;

        let disc = widget::container(widget::Space::new(
            Length::Fixed(inner_size),
            Length::Fixed(inner_size),
        ))
        .style(move |_theme| widget::container::Style {
            background: Some(Background::Color(color)),
            border: Border {
                radius: (ui::CAPTURE_BUTTON_RADIUS * scale).into(),
                ..Default::default()
            },
            ..Default::default()
        });

        // Ring around the disc
        let ring = widget::container(disc)
            .width(Length::Fixed(outer_size))
            .height(Length::Fixed(outer_size))
            .center_x(Length::Fixed(outer_size))
            .center_y(Length::Fixed(outer_size))
            .style(move |_theme| widget::container::Style {
                border: Border {
                    color: Color::WHITE,
                    width: 3.0,
                    radius: (outer_size / 2.0).into(),
                },
                ..Default::default()
            });

        let button = widget::button::custom(ring)
            .on_press(Message::Shutter)
            .padding(0)
            .class(cosmic::theme::Button::Text);

        // Fixed-size wrapper so the row does not shift while the button shrinks
        let wrapper = widget::container(button)
            .width(Length::Fixed(ui::CAPTURE_BUTTON_OUTER))
            .height(Length::Fixed(ui::CAPTURE_BUTTON_OUTER))
            .center_x(Length::Fixed(ui::CAPTURE_BUTTON_OUTER))
            .center_y(Length::Fixed(ui::CAPTURE_BUTTON_OUTER));

        widget::tooltip(
            wrapper,
            widget::text(fl!("take-photo")),
            widget::tooltip::Position::Top,
        )
        .into()
    }
}
