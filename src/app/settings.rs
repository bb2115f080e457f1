// SPDX-License-Identifier: MPL-2.0

//! Settings drawer view

use crate::app::state::{AppModel, ContextPage, Message};
use crate::fl;
use cosmic::Element;
use cosmic::app::context_drawer;
use cosmic::widget;

impl AppModel {
    /// Create the settings view for the context drawer
    ///
    /// Theme and JPEG quality. Both are written to cosmic-config on change.
    pub fn settings_view(&self) -> context_drawer::ContextDrawer<'_, Message> {
        let spacing = cosmic::theme::spacing();

        let theme_dropdown = widget::dropdown(
            &self.theme_options,
            Some(self.theme_index()),
            Message::SelectAppTheme,
        );

        let quality_dropdown = widget::dropdown(
            &self.quality_options,
            Some(self.quality_index()),
            Message::SelectQualityPreset,
        );

        let settings_column: Element<'_, Message> = widget::column()
            .push(
                widget::text(fl!("appearance"))
                    .size(16)
                    .font(cosmic::font::bold()),
            )
            .push(widget::vertical_space().height(spacing.space_xxs))
            .push(widget::text::caption(fl!("theme")))
            .push(theme_dropdown)
            .push(widget::vertical_space().height(spacing.space_l))
            .push(widget::divider::horizontal::default())
            .push(widget::vertical_space().height(spacing.space_s))
            .push(
                widget::text(fl!("photo-quality"))
                    .size(16)
                    .font(cosmic::font::bold()),
            )
            .push(widget::vertical_space().height(spacing.space_xxs))
            .push(quality_dropdown)
            .push(widget::vertical_space().height(spacing.space_l))
            .push(widget::divider::horizontal::default())
            .push(widget::vertical_space().height(spacing.space_s))
            .push(
                widget::text(fl!("version", version = env!("GIT_VERSION")))
                    .size(12)
                    .class(cosmic::theme::Text::Accent),
            )
            .spacing(0)
            .into();

        context_drawer::context_drawer(
            settings_column,
            Message::ToggleContextPage(ContextPage::Settings),
        )
        .title(fl!("settings"))
    }
}
