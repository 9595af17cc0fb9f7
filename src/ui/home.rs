/// Home screen: style picker, image chooser with preview, prompts, generate button
use iced::widget::{button, column, container, image, pick_list, text, text_input};
use iced::{Alignment, ContentFit, Element, Length};

use super::{accent_button, panel};
use crate::gallery::PickOptions;
use crate::state::{Phase, Session};
use crate::Message;

/// Width of the selected-image preview; height follows the picker aspect
const PREVIEW_WIDTH: f32 = 320.0;

pub fn view<'a>(
    session: &'a Session,
    styles: &'a [String],
    preview: Option<&'a image::Handle>,
) -> Element<'a, Message> {
    let title = text("Prompt Remix").size(40);

    let style_picker = pick_list(
        styles,
        session.style().map(str::to_string),
        Message::StyleSelected,
    )
    .placeholder("Select a style")
    .padding(10)
    .width(Length::Fill);

    let select_image = button(text("Select your image").center().width(Length::Fill))
        .on_press(Message::SelectImage)
        .padding(10)
        .width(Length::Fill)
        .style(accent_button);

    let positive = text_input("Positive prompt", session.positive_prompt())
        .on_input(Message::PositivePromptChanged)
        .padding(14)
        .size(16);

    let negative = text_input("Negative prompt", session.negative_prompt())
        .on_input(Message::NegativePromptChanged)
        .on_submit_maybe(generate_action(session))
        .padding(14)
        .size(16);

    let generate = button(text("Generate image").center().width(Length::Fill))
        .on_press_maybe(generate_action(session))
        .padding(10)
        .width(Length::Fill)
        .style(accent_button);

    column![
        title,
        style_picker,
        select_image,
        preview_frame(preview),
        positive,
        negative,
        generate,
    ]
    .spacing(20)
    .max_width(420.0)
    .align_x(Alignment::Center)
    .into()
}

/// Generate is only wired up while the form is editable; Enter in a prompt
/// field counts as clicking the button.
fn generate_action(session: &Session) -> Option<Message> {
    (session.phase() == Phase::Idle).then_some(Message::Generate)
}

fn preview_frame(preview: Option<&image::Handle>) -> Element<'_, Message> {
    let (aspect_w, aspect_h) = PickOptions::default().aspect;
    let height = PREVIEW_WIDTH * aspect_h as f32 / aspect_w as f32;

    let content: Element<'_, Message> = match preview {
        Some(handle) => image(handle.clone())
            .content_fit(ContentFit::Contain)
            .width(Length::Fill)
            .height(Length::Fill)
            .into(),
        None => text("No image selected").size(14).into(),
    };

    container(content)
        .center_x(PREVIEW_WIDTH)
        .center_y(height)
        .style(panel)
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gallery::PickOutcome;
    use crate::state::{Controller, ImageRef};

    #[test]
    fn test_generate_disabled_while_submitting() {
        let mut controller = Controller::new();
        assert!(matches!(
            generate_action(controller.session()),
            Some(Message::Generate)
        ));

        controller
            .apply_pick(PickOutcome::Picked(ImageRef::new("/photos/dog.jpg")))
            .unwrap();
        controller.set_positive_prompt("a red car");
        controller.set_negative_prompt("blurry");
        controller.begin_submit().unwrap();

        // Covers both the button and Enter in the prompt fields
        assert!(generate_action(controller.session()).is_none());
    }
}
