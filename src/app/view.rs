// SPDX-License-Identifier: GPL-3.0-only

//! Main application view
//!
//! One screen, rendered by phase:
//! - Loading: empty placeholder while the permission request is pending
//! - Denied: static message, no controls
//! - Capturing: live preview with flip and shutter
//! - Reviewing: preview underneath, review overlay on top (controls not rendered)

use crate::app::screen::Phase;
use crate::app::state::{AppModel, Message};
use crate::app::controls::overlay_container_style;
use crate::fl;
use cosmic::Element;
use cosmic::iced::Length;
use cosmic::widget;

impl AppModel {
    pub fn view(&self) -> Element<'_, Message> {
        match self.screen.phase() {
            Phase::Loading => widget::container(widget::Space::new(Length::Fill, Length::Fill))
                .width(Length::Fill)
                .height(Length::Fill)
                .into(),
            Phase::Denied => widget::container(widget::text::title4(fl!("permission-denied")))
                .width(Length::Fill)
                .height(Length::Fill)
                .center(Length::Fill)
                .into(),
            Phase::Capturing => {
                let mut layers = cosmic::iced::widget::stack![
                    self.build_camera_preview(),
                    self.build_controls()
                ];
                if let Some(notice) = self.build_notice() {
                    layers = layers.push(notice);
                }
                layers.width(Length::Fill).height(Length::Fill).into()
            }
            Phase::Reviewing => cosmic::iced::widget::stack![
                self.build_camera_preview(),
                self.build_review_overlay()
            ]
            .width(Length::Fill)
            .height(Length::Fill)
            .into(),
        }
    }

    /// Capture failure notice, pinned to the top of the preview
    fn build_notice(&self) -> Option<Element<'_, Message>> {
        let spacing = cosmic::theme::spacing();
        let notice = self.notice.current()?;

        let label = widget::container(widget::text::body(notice.text.as_str()))
            .padding([spacing.space_xxs, spacing.space_s])
            .style(overlay_container_style);

        Some(
            widget::container(label)
                .width(Length::Fill)
                .center_x(Length::Fill)
                .padding(spacing.space_m)
                .into(),
        )
    }
}
