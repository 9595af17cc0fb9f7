/// Overlays drawn above the current screen: the loading dimmer and blocking notices
use iced::widget::{button, center, column, container, opaque, stack, text};
use iced::{Alignment, Background, Color, Element, Length, Theme};

use super::{accent_button, BACKGROUND};
use crate::Message;

/// Put `content` centered on a dimmed backdrop above `base`.
/// The backdrop swallows all input so nothing underneath can be clicked.
pub fn modal<'a>(
    base: impl Into<Element<'a, Message>>,
    content: impl Into<Element<'a, Message>>,
) -> Element<'a, Message> {
    stack![
        base.into(),
        opaque(center(content).style(|_theme: &Theme| container::Style {
            background: Some(Background::Color(Color {
                a: 0.7,
                ..Color::BLACK
            })),
            ..container::Style::default()
        }))
    ]
    .into()
}

/// Shown for the whole upload + fetch sequence
pub fn loading<'a>() -> Element<'a, Message> {
    text("Generating image...")
        .size(18)
        .color(Color::WHITE)
        .into()
}

/// Blocking message with a single OK button
pub fn notice(message: &str) -> Element<'_, Message> {
    let ok = button(text("OK").center().width(Length::Fill))
        .on_press(Message::DismissNotice)
        .padding(8)
        .width(Length::Fixed(120.0))
        .style(accent_button);

    container(
        column![text(message).size(16), ok]
            .spacing(16)
            .align_x(Alignment::Center),
    )
    .padding(24)
    .max_width(380.0)
    .style(|_theme: &Theme| container::Style {
        background: Some(Background::Color(BACKGROUND)),
        border: iced::Border {
            radius: 8.0.into(),
            ..iced::Border::default()
        },
        ..container::Style::default()
    })
    .into()
}
