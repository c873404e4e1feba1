pub mod docx;
pub mod markdown;

use crate::domain::models::ExportFormat;
use crate::domain::models::Exporter;

pub type ExporterBox = Box<dyn Exporter + Send + Sync>;

pub struct ExporterManager {}

impl ExporterManager {
    pub fn get(format: ExportFormat) -> ExporterBox {
        match format {
            ExportFormat::Docx => return Box::<docx::Docx>::default(),
            ExportFormat::Markdown => return Box::<markdown::Markdown>::default(),
        }
    }
}
