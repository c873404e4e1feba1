use anyhow::Result;

use super::Markdown;
use crate::domain::models::Document;
use crate::domain::models::ExportFormat;
use crate::domain::models::Exporter;
use crate::domain::models::Paragraph;
use crate::domain::models::ParagraphStyle;

#[test]
fn it_renders_quotes_and_paragraphs() -> Result<()> {
    let document = Document {
        title: "Chat Session: abc".to_string(),
        paragraphs: vec![
            Paragraph {
                style: ParagraphStyle::Quote,
                text: "User: Hello\n\nsecond line".to_string(),
            },
            Paragraph {
                style: ParagraphStyle::Normal,
                text: "Assistant: Hi there!".to_string(),
            },
        ],
    };

    let exporter = Markdown::default();
    assert_eq!(exporter.format(), ExportFormat::Markdown);

    let text = String::from_utf8(exporter.render(&document)?)?;
    insta::assert_snapshot!(text, @r###"
    # Chat Session: abc

    > User: Hello
    >
    > second line

    Assistant: Hi there!
    "###);

    return Ok(());
}
