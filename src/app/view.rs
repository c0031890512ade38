// SPDX-License-Identifier: GPL-3.0-only

//! Main application view
//!
//! One surface is shown at a time:
//! - Permission prompt while unauthorized
//! - Live preview with lens, flash and capture controls
//! - Captured image with retake and save controls
//!
//! Notices float above whichever surface is active.

use crate::app::controls::{IconId, icon_button};
use crate::app::screen::{Action, Notice, ScreenState};
use crate::app::state::{AppModel, Message};
use crate::backends::camera::LensFacing;
use crate::constants::ui;
use crate::fl;
use cosmic::Element;
use cosmic::iced::alignment::{Horizontal, Vertical};
use cosmic::iced::{Alignment, Background, Color, ContentFit, Length};
use cosmic::widget::{self, icon};

/// Dark translucent backdrop for controls drawn over the picture
fn overlay_style(_theme: &cosmic::Theme) -> widget::container::Style {
    widget::container::Style {
        background: Some(Background::Color(Color::from_rgba(
            0.0,
            0.0,
            0.0,
            ui::OVERLAY_BACKGROUND_ALPHA,
        ))),
        border: cosmic::iced::Border {
            radius: [ui::PREVIEW_RADIUS; 4].into(),
            ..Default::default()
        },
        ..Default::default()
    }
}

impl AppModel {
    /// Message for `action` if the screen currently accepts it
    fn action_message(&self, action: Action) -> Option<Message> {
        self.screen
            .is_available(action)
            .then_some(Message::Action(action))
    }

    /// Build the main application view
    pub fn view(&self) -> Element<'_, Message> {
        let surface = if !self.screen.permission_granted() {
            self.build_permission_prompt()
        } else if self.screen.shows_image_preview() {
            self.build_image_preview()
        } else {
            self.build_live_preview()
        };

        let mut layers = cosmic::iced::widget::stack![surface]
            .width(Length::Fill)
            .height(Length::Fill);

        if let Some(notice) = self.screen.notice() {
            layers = layers.push(self.build_notice(notice));
        }

        widget::container(layers)
            .width(Length::Fill)
            .height(Length::Fill)
            .style(|_theme| widget::container::Style {
                background: Some(Background::Color(Color::BLACK)),
                ..Default::default()
            })
            .into()
    }

    fn build_permission_prompt(&self) -> Element<'_, Message> {
        let requesting = !self.screen.is_available(Action::RequestPermission);
        let status = if requesting {
            fl!("permission-requesting")
        } else {
            fl!("permission-required")
        };

        let column = widget::column()
            .push(icon::from_name("camera-disabled-symbolic").size(64))
            .push(widget::text(status).size(20))
            .push(
                icon_button(IconId::Camera)
                    .label(fl!("grant-permission"))
                    .on_activate_maybe(self.action_message(Action::RequestPermission)),
            )
            .spacing(cosmic::theme::spacing().space_m)
            .align_x(Horizontal::Center);

        widget::container(column)
            .width(Length::Fill)
            .height(Length::Fill)
            .align_x(Horizontal::Center)
            .align_y(Vertical::Center)
            .style(|theme| widget::container::Style {
                background: Some(Background::Color(theme.cosmic().bg_color().into())),
                text_color: Some(theme.cosmic().on_bg_color().into()),
                ..Default::default()
            })
            .into()
    }

    fn build_live_preview(&self) -> Element<'_, Message> {
        let preview: Element<'_, Message> = match &self.preview_handle {
            Some(handle) => widget::image::Image::new(handle.clone())
                .content_fit(ContentFit::Contain)
                .width(Length::Fill)
                .height(Length::Fill)
                .into(),
            None => widget::container(
                widget::text(fl!("no-preview"))
                    .size(16)
                    .class(cosmic::theme::style::Text::Color(Color::WHITE)),
            )
            .width(Length::Fill)
            .height(Length::Fill)
            .align_x(Horizontal::Center)
            .align_y(Vertical::Center)
            .into(),
        };

        let lens_label = match self.screen.lens_facing() {
            LensFacing::Back => fl!("lens-back"),
            LensFacing::Front => fl!("lens-front"),
        };
        let (flash_icon, flash_label) = if self.screen.flash_mode().is_on() {
            (IconId::FlashOn, fl!("flash-on"))
        } else {
            (IconId::FlashOff, fl!("flash-off"))
        };

        let top_bar = widget::row()
            .push(
                icon_button(IconId::SwitchLens)
                    .label(format!("{} · {}", fl!("switch-lens"), lens_label))
                    .on_activate_maybe(self.action_message(Action::ToggleLensFacing)),
            )
            .push(widget::Space::new(Length::Fill, Length::Shrink))
            .push(
                icon_button(flash_icon)
                    .label(flash_label)
                    .on_activate_maybe(self.action_message(Action::ToggleFlash)),
            )
            .align_y(Alignment::Center);

        let top_overlay = widget::container(
            widget::container(top_bar)
                .padding([ui::BAR_PADDING_V, ui::BAR_PADDING_V])
                .style(overlay_style),
        )
        .width(Length::Fill)
        .height(Length::Fill)
        .padding([ui::OVERLAY_PADDING_TOP, ui::CONTROL_PADDING_H])
        .align_y(Vertical::Top);

        let capture_button = icon_button(IconId::Camera)
            .label(fl!("take-picture"))
            .on_activate_maybe(self.action_message(Action::Capture));

        let bottom_overlay = self.build_bottom_bar(vec![capture_button.into()]);

        let mut layers = cosmic::iced::widget::stack![preview, top_overlay, bottom_overlay]
            .width(Length::Fill)
            .height(Length::Fill);

        // Screen flash while a lit capture is running
        if *self.screen.state() == ScreenState::Capturing && self.screen.flash_mode().is_on() {
            layers = layers.push(
                widget::container(widget::Space::new(Length::Fill, Length::Fill))
                    .width(Length::Fill)
                    .height(Length::Fill)
                    .style(|_theme| widget::container::Style {
                        background: Some(Background::Color(Color::WHITE)),
                        ..Default::default()
                    }),
            );
        }

        layers.into()
    }

    fn build_image_preview(&self) -> Element<'_, Message> {
        let image: Element<'_, Message> = match &self.captured_handle {
            Some(handle) => widget::image::Image::new(handle.clone())
                .content_fit(ContentFit::Contain)
                .width(Length::Fill)
                .height(Length::Fill)
                .into(),
            None => widget::Space::new(Length::Fill, Length::Fill).into(),
        };

        let retake = icon_button(IconId::Retake)
            .label(fl!("retake-picture"))
            .on_activate_maybe(self.action_message(Action::Retake));
        let save = icon_button(IconId::Save)
            .label(fl!("save"))
            .on_activate_maybe(self.action_message(Action::Save));

        let bottom_overlay = self.build_bottom_bar(vec![
            retake.into(),
            widget::Space::new(Length::Fill, Length::Shrink).into(),
            save.into(),
        ]);

        cosmic::iced::widget::stack![image, bottom_overlay]
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    /// Controls pinned to the bottom edge, centered when there is one
    fn build_bottom_bar<'a>(&self, controls: Vec<Element<'a, Message>>) -> Element<'a, Message> {
        let row = widget::row::with_children(controls).align_y(Alignment::Center);

        widget::container(
            widget::container(row)
                .padding([ui::BAR_PADDING_V, ui::BAR_PADDING_V])
                .style(overlay_style),
        )
        .width(Length::Fill)
        .height(Length::Fill)
        .padding([ui::OVERLAY_PADDING_TOP, ui::CONTROL_PADDING_H])
        .align_x(Horizontal::Center)
        .align_y(Vertical::Bottom)
        .into()
    }

    fn build_notice(&self, notice: &Notice) -> Element<'_, Message> {
        let text = match notice {
            Notice::Saved(path) => fl!("image-saved", path = path.display().to_string()),
            Notice::CaptureFailed => fl!("capture-failed"),
            Notice::SaveFailed => fl!("save-failed"),
        };

        let banner = widget::row()
            .push(widget::text(text).size(ui::LABEL_TEXT_SIZE))
            .push(
                widget::button::text(fl!("dismiss"))
                    .on_press(Message::DismissNotice(self.screen.notice_serial())),
            )
            .spacing(ui::LABEL_SPACING)
            .align_y(Alignment::Center);

        widget::container(
            widget::container(banner)
                .padding([ui::BAR_PADDING_V, ui::BAR_PADDING_V])
                .style(|theme| widget::container::Style {
                    background: Some(Background::Color(theme.cosmic().bg_color().into())),
                    text_color: Some(theme.cosmic().on_bg_color().into()),
                    border: cosmic::iced::Border {
                        radius: [ui::PREVIEW_RADIUS; 4].into(),
                        ..Default::default()
                    },
                    ..Default::default()
                }),
        )
        .width(Length::Fill)
        .height(Length::Fill)
        .padding([ui::OVERLAY_PADDING_TOP, ui::CONTROL_PADDING_H])
        .align_x(Horizontal::Center)
        .align_y(Vertical::Center)
        .into()
    }
}
