// SPDX-License-Identifier: MPL-2.0

//! Icon button widget implementation
//!
//! A stateless pressable control: an icon optionally followed by a bold
//! label. The caller supplies the message to emit; without one the control
//! renders disabled.

use crate::constants::ui;
use cosmic::Element;
use cosmic::iced::{Alignment, Color, Length};
use cosmic::widget::{self, icon};

/// Camera switch icon SVG (camera with circular arrows)
const CAMERA_SWITCH_ICON: &[u8] =
    include_bytes!("../../../resources/button_icons/camera-switch.svg");
/// Flash icon SVG (lightning bolt)
const FLASH_ICON: &[u8] = include_bytes!("../../../resources/button_icons/flash.svg");
/// Flash off icon SVG (lightning bolt with strike-through)
const FLASH_OFF_ICON: &[u8] = include_bytes!("../../../resources/button_icons/flash-off.svg");

/// Icons the capture screen uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconId {
    Camera,
    SwitchLens,
    FlashOn,
    FlashOff,
    Retake,
    Save,
}

impl IconId {
    fn handle(self) -> icon::Handle {
        match self {
            IconId::Camera => icon::from_name("camera-photo-symbolic").handle(),
            IconId::SwitchLens => icon::from_svg_bytes(CAMERA_SWITCH_ICON).symbolic(true),
            IconId::FlashOn => icon::from_svg_bytes(FLASH_ICON).symbolic(true),
            IconId::FlashOff => icon::from_svg_bytes(FLASH_OFF_ICON).symbolic(true),
            IconId::Retake => icon::from_name("edit-undo-symbolic").handle(),
            IconId::Save => icon::from_name("document-save-symbolic").handle(),
        }
    }
}

/// Builder for an icon with an optional label
#[derive(Debug, Clone)]
pub struct IconButton<Message> {
    icon: IconId,
    label: Option<String>,
    tint: Option<Color>,
    on_activate: Option<Message>,
}

/// Icon button showing `icon`
pub fn icon_button<Message>(icon: IconId) -> IconButton<Message> {
    IconButton::new(icon)
}

impl<Message> IconButton<Message> {
    pub fn new(icon: IconId) -> Self {
        Self {
            icon,
            label: None,
            tint: None,
            on_activate: None,
        }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn tint(mut self, tint: Color) -> Self {
        self.tint = Some(tint);
        self
    }

    pub fn on_activate(mut self, message: Message) -> Self {
        self.on_activate = Some(message);
        self
    }

    /// Set the message, or disable the button with `None`
    pub fn on_activate_maybe(mut self, message: Option<Message>) -> Self {
        self.on_activate = message;
        self
    }

    pub fn icon(&self) -> IconId {
        self.icon
    }

    pub fn is_enabled(&self) -> bool {
        self.on_activate.is_some()
    }

    /// Color of icon and label, faded when disabled
    pub fn foreground(&self) -> Color {
        let (r, g, b) = ui::DEFAULT_TINT;
        let color = self.tint.unwrap_or(Color::from_rgb(r, g, b));
        if self.is_enabled() {
            color
        } else {
            Color {
                a: color.a * ui::DISABLED_ALPHA,
                ..color
            }
        }
    }
}

impl<'a, Message: Clone + 'static> From<IconButton<Message>> for Element<'a, Message> {
    fn from(button: IconButton<Message>) -> Self {
        let foreground = button.foreground();

        let mut row = widget::row()
            .push(widget::icon(button.icon.handle()).size(ui::ICON_SIZE))
            .spacing(ui::LABEL_SPACING)
            .align_y(Alignment::Center);

        if let Some(label) = button.label {
            row = row.push(
                widget::text(label)
                    .size(ui::LABEL_TEXT_SIZE)
                    .font(cosmic::font::bold()),
            );
        }

        // Symbolic icons and text take the container's text color
        let content = widget::container(row)
            .height(Length::Fixed(ui::BUTTON_HEIGHT))
            .align_y(cosmic::iced::alignment::Vertical::Center)
            .style(move |_theme| widget::container::Style {
                text_color: Some(foreground),
                ..Default::default()
            });

        widget::button::custom(content)
            .padding([0, 8])
            .class(cosmic::theme::Button::Text)
            .on_press_maybe(button.on_activate)
            .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_without_message() {
        let button: IconButton<()> = icon_button(IconId::Camera).label("Take a picture");
        assert!(!button.is_enabled());
        assert!(button.foreground().a < 1.0);

        let button = button.on_activate(());
        assert!(button.is_enabled());
        assert_eq!(button.foreground().a, 1.0);
    }

    #[test]
    fn test_default_tint_is_light() {
        let button = icon_button(IconId::Save).on_activate(());
        let color = button.foreground();
        assert!((color.r - 0.945).abs() < 1e-6);
        assert_eq!(color.r, color.g);
        assert_eq!(color.g, color.b);
    }

    #[test]
    fn test_custom_tint() {
        let button = icon_button(IconId::FlashOn)
            .tint(Color::from_rgb(1.0, 0.8, 0.0))
            .on_activate_maybe(Some(()));
        assert_eq!(button.foreground(), Color::from_rgb(1.0, 0.8, 0.0));
        assert_eq!(button.icon(), IconId::FlashOn);
    }
}
