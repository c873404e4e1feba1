#[cfg(test)]
#[path = "markdown_test.rs"]
mod tests;

use anyhow::Result;

use crate::domain::models::Document;
use crate::domain::models::ExportFormat;
use crate::domain::models::Exporter;
use crate::domain::models::ParagraphStyle;

#[derive(Default)]
pub struct Markdown {}

impl Exporter for Markdown {
    fn format(&self) -> ExportFormat {
        return ExportFormat::Markdown;
    }

    fn render(&self, document: &Document) -> Result<Vec<u8>> {
        let mut blocks = vec![format!("# {}", document.title)];

        for paragraph in &document.paragraphs {
            let block = match paragraph.style {
                ParagraphStyle::Quote => paragraph
                    .text
                    .split('\n')
                    .map(|line| {
                        if line.is_empty() {
                            return ">".to_string();
                        }
                        return format!("> {line}");
                    })
                    .collect::<Vec<String>>()
                    .join("\n"),
                ParagraphStyle::Normal => paragraph.text.to_string(),
            };
            blocks.push(block);
        }

        let mut text = blocks.join("\n\n");
        text.push('\n');

        return Ok(text.into_bytes());
    }
}
