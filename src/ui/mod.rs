/// User interface
///
/// - Home screen: the form (home.rs)
/// - Result screen: the generated image (result.rs)
/// - Loading and notice overlays (overlay.rs)

pub mod home;
pub mod overlay;
pub mod result;

use iced::widget::{button, container};
use iced::{Background, Border, Color, Theme};

/// Orange used for every action button
pub const ACCENT: Color = Color::from_rgb(1.0, 0.271, 0.0);
/// Window background
pub const BACKGROUND: Color = Color::from_rgb(0.827, 0.859, 0.878);
/// Inputs, picker and preview frame
pub const PANEL: Color = Color::from_rgb(0.878, 0.902, 0.929);

pub fn accent_button(theme: &Theme, status: button::Status) -> button::Style {
    let base = button::primary(theme, status);
    let background = match status {
        button::Status::Disabled => Color { a: 0.4, ..ACCENT },
        button::Status::Hovered | button::Status::Pressed => Color { a: 0.85, ..ACCENT },
        button::Status::Active => ACCENT,
    };
    button::Style {
        background: Some(Background::Color(background)),
        text_color: Color::WHITE,
        border: Border {
            radius: 5.0.into(),
            ..Border::default()
        },
        ..base
    }
}

pub fn background(_theme: &Theme) -> container::Style {
    container::Style {
        background: Some(Background::Color(BACKGROUND)),
        ..container::Style::default()
    }
}

pub fn panel(_theme: &Theme) -> container::Style {
    container::Style {
        background: Some(Background::Color(PANEL)),
        border: Border {
            radius: 5.0.into(),
            ..Border::default()
        },
        ..container::Style::default()
    }
}
