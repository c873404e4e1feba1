#[cfg(test)]
#[path = "docx_test.rs"]
mod tests;

use std::io::Cursor;
use std::io::Write;

use anyhow::Result;
use zip::write::FileOptions;
use zip::CompressionMethod;
use zip::ZipWriter;

use crate::domain::models::Document;
use crate::domain::models::ExportFormat;
use crate::domain::models::Exporter;
use crate::domain::models::ParagraphStyle;

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/><Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/></Types>"#;

const PACKAGE_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

const DOCUMENT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/></Relationships>"#;

const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/><w:pPr><w:spacing w:after="160"/></w:pPr><w:rPr><w:sz w:val="22"/></w:rPr></w:style><w:style w:type="paragraph" w:styleId="Title"><w:name w:val="Title"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:pPr><w:spacing w:after="240"/></w:pPr><w:rPr><w:b/><w:sz w:val="48"/></w:rPr></w:style><w:style w:type="paragraph" w:styleId="IntenseQuote"><w:name w:val="Intense Quote"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:pPr><w:pBdr><w:top w:val="single" w:sz="4" w:space="10" w:color="4F81BD"/><w:bottom w:val="single" w:sz="4" w:space="10" w:color="4F81BD"/></w:pBdr><w:ind w:left="864" w:right="864"/></w:pPr><w:rPr><w:i/><w:color w:val="4F81BD"/></w:rPr></w:style></w:styles>"#;

fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            // Control characters other than tab and newline are invalid in XML 1.0.
            c if c.is_control() && c != '\t' && c != '\n' => {}
            c => escaped.push(c),
        }
    }

    return escaped;
}

fn paragraph_xml(style: Option<&str>, text: &str) -> String {
    let properties = style
        .map(|name| return format!(r#"<w:pPr><w:pStyle w:val="{name}"/></w:pPr>"#))
        .unwrap_or_default();

    let runs = text
        .split('\n')
        .map(|line| return format!(r#"<w:t xml:space="preserve">{}</w:t>"#, escape_xml(line)))
        .collect::<Vec<String>>()
        .join("<w:br/>");

    return format!("<w:p>{properties}<w:r>{runs}</w:r></w:p>");
}

fn document_xml(document: &Document) -> String {
    let mut body = paragraph_xml(Some("Title"), &document.title);
    for paragraph in &document.paragraphs {
        let style = match paragraph.style {
            ParagraphStyle::Quote => Some("IntenseQuote"),
            ParagraphStyle::Normal => None,
        };
        body += &paragraph_xml(style, &paragraph.text);
    }

    return format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}<w:sectPr><w:pgSz w:w="11906" w:h="16838"/><w:pgMar w:top="1440" w:right="1440" w:bottom="1440" w:left="1440" w:header="708" w:footer="708" w:gutter="0"/></w:sectPr></w:body></w:document>"#
    );
}

/// Word document export, written as a minimal WordprocessingML package.
#[derive(Default)]
pub struct Docx {}

impl Exporter for Docx {
    fn format(&self) -> ExportFormat {
        return ExportFormat::Docx;
    }

    fn render(&self, document: &Document) -> Result<Vec<u8>> {
        let parts = [
            ("[Content_Types].xml", CONTENT_TYPES.to_string()),
            ("_rels/.rels", PACKAGE_RELS.to_string()),
            ("word/_rels/document.xml.rels", DOCUMENT_RELS.to_string()),
            ("word/styles.xml", STYLES.to_string()),
            ("word/document.xml", document_xml(document)),
        ];

        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
        for (name, body) in parts {
            zip.start_file(name, options)?;
            zip.write_all(body.as_bytes())?;
        }

        let cursor = zip.finish()?;
        return Ok(cursor.into_inner());
    }
}
