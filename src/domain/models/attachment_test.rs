use std::path::Path;

use super::image_media_type;
use super::Attachment;
use super::AttachmentKind;
use crate::domain::models::ChatError;
use crate::domain::models::ContentPart;
use crate::domain::models::MessageContent;
use crate::domain::models::Role;

#[test]
fn it_resolves_supported_extensions() {
    assert_eq!(
        AttachmentKind::from_path(Path::new("report.pdf")).unwrap(),
        AttachmentKind::Pdf
    );
    assert_eq!(
        AttachmentKind::from_path(Path::new("photo.PNG")).unwrap(),
        AttachmentKind::Image
    );
    assert_eq!(
        AttachmentKind::from_path(Path::new("/tmp/photo.jpg")).unwrap(),
        AttachmentKind::Image
    );
    assert_eq!(
        AttachmentKind::from_path(Path::new("photo.JPEG")).unwrap(),
        AttachmentKind::Image
    );
}

#[test]
fn it_rejects_unsupported_extensions() {
    let res = AttachmentKind::from_path(Path::new("notes.txt"));
    match res {
        Err(ChatError::UnsupportedFileType(name)) => assert_eq!(name, "notes.txt"),
        _ => panic!("expected UnsupportedFileType"),
    }

    assert!(AttachmentKind::from_path(Path::new("Makefile")).is_err());
}

#[test]
fn it_picks_media_types() {
    assert_eq!(image_media_type(Path::new("a.png")), "image/png");
    assert_eq!(image_media_type(Path::new("a.jpg")), "image/jpeg");
    assert_eq!(image_media_type(Path::new("a.jpeg")), "image/jpeg");
}

#[test]
fn it_renders_pdf_as_inline_text() {
    let attachment = Attachment::Pdf {
        file_name: "report.pdf".to_string(),
        text: "Quarterly numbers".to_string(),
    };

    let msg = attachment.to_prompt_message();
    assert_eq!(attachment.kind(), AttachmentKind::Pdf);
    assert_eq!(attachment.file_name(), "report.pdf");
    assert_eq!(msg.role, Role::User);
    insta::assert_snapshot!(msg.content.as_text(), @r###"
    Here's the content of the attached PDF:
    Quarterly numbers
    "###);
}

#[test]
fn it_renders_image_as_caption_and_data_url() {
    let attachment = Attachment::Image {
        file_name: "photo.png".to_string(),
        media_type: "image/png".to_string(),
        data: "aGVsbG8=".to_string(),
    };

    let msg = attachment.to_prompt_message();
    assert_eq!(attachment.kind(), AttachmentKind::Image);
    assert_eq!(msg.role, Role::User);

    match msg.content {
        MessageContent::Parts(parts) => {
            assert_eq!(parts.len(), 2);
            assert_eq!(
                parts[0],
                ContentPart::Text {
                    text: "Here's an attached image:".to_string()
                }
            );
            match &parts[1] {
                ContentPart::ImageUrl { image_url } => {
                    assert_eq!(image_url.url, "data:image/png;base64,aGVsbG8=");
                }
                _ => panic!("expected an image part"),
            }
        }
        MessageContent::Text(_) => panic!("expected parts"),
    }
}
