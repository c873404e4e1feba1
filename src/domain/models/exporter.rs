use anyhow::Result;
use strum::EnumIter;
use strum::EnumVariantNames;
use strum::IntoEnumIterator;

use super::Document;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, EnumIter, EnumVariantNames, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Docx,
    Markdown,
}

impl ExportFormat {
    pub fn parse(text: &str) -> Option<ExportFormat> {
        return ExportFormat::iter().find(|e| return e.to_string() == text.trim());
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Docx => return "docx",
            ExportFormat::Markdown => return "md",
        }
    }
}

pub trait Exporter {
    fn format(&self) -> ExportFormat;

    /// Renders the document to the bytes of a complete file.
    fn render(&self, document: &Document) -> Result<Vec<u8>>;
}
