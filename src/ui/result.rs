/// Result screen: the generated image with save and back buttons
use iced::advanced::image::Bytes;
use iced::widget::{button, column, container, image, text, Space};
use iced::{Alignment, ContentFit, Element, Length};

use super::{accent_button, panel};
use crate::state::ImageRef;
use crate::Message;

const RESULT_SIZE: f32 = 360.0;

/// The generated image as far as the view is concerned
#[derive(Debug, Clone, Default)]
pub enum ResultImage {
    /// Reference known, bytes still downloading
    #[default]
    Loading,
    /// `handle` and `bytes` share one buffer
    Ready {
        handle: image::Handle,
        bytes: Bytes,
    },
    Failed(String),
}

impl ResultImage {
    pub fn ready(bytes: impl Into<Bytes>) -> Self {
        let bytes = bytes.into();
        Self::Ready {
            handle: image::Handle::from_bytes(bytes.clone()),
            bytes,
        }
    }

    /// Bytes to write when the user saves the image
    pub fn bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Ready { bytes, .. } => Some(bytes.as_ref()),
            _ => None,
        }
    }
}

pub fn view<'a>(result: &'a ResultImage, reference: Option<&ImageRef>) -> Element<'a, Message> {
    let picture: Element<'_, Message> = match result {
        ResultImage::Loading => text("Loading image...").into(),
        ResultImage::Ready { handle, .. } => image(handle.clone())
            .content_fit(ContentFit::Contain)
            .width(Length::Fill)
            .height(Length::Fill)
            .into(),
        ResultImage::Failed(reason) => {
            let what = reference.map_or_else(|| "the image".to_string(), ImageRef::to_string);
            text(format!("Could not load {}: {}", what, reason))
                .size(14)
                .into()
        }
    };

    let frame = container(picture)
        .center_x(RESULT_SIZE)
        .center_y(RESULT_SIZE)
        .style(panel);

    let save = button(text("Save image").center().width(Length::Fill))
        .on_press_maybe(result.bytes().map(|_| Message::SaveImage))
        .padding(10)
        .width(Length::Fill)
        .style(accent_button);

    let back = button(text("Back to home").center().width(Length::Fill))
        .on_press(Message::BackToHome)
        .padding(10)
        .width(Length::Fill)
        .style(accent_button);

    column![frame, save, Space::with_height(Length::Fixed(4.0)), back]
        .spacing(16)
        .max_width(RESULT_SIZE)
        .align_x(Alignment::Center)
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_ready_images_can_be_saved() {
        assert!(ResultImage::Loading.bytes().is_none());
        assert!(ResultImage::Failed("404".into()).bytes().is_none());
        assert_eq!(ResultImage::ready(vec![1, 2, 3]).bytes(), Some(&[1u8, 2, 3][..]));
    }

    #[test]
    fn test_ready_shares_one_buffer() {
        let result = ResultImage::ready(vec![7u8; 64]);
        let ResultImage::Ready { handle, bytes } = &result else {
            panic!("expected a ready image");
        };
        match handle {
            image::Handle::Bytes(_, shown) => assert_eq!(shown.as_ptr(), bytes.as_ptr()),
            other => panic!("unexpected handle {:?}", other),
        }
    }
}
