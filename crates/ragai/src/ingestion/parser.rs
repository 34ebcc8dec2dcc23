//! Extension-driven text extraction

use crate::error::{Error, Result};
use crate::types::FileType;

/// PDFs yielding fewer characters than this are treated as image-only
const MIN_PDF_TEXT_CHARS: usize = 10;

/// Text extracted from an uploaded file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedText {
    /// Detected file type
    pub file_type: FileType,
    /// Extracted text content
    pub content: String,
}

impl ExtractedText {
    /// Whether extraction produced nothing worth indexing
    pub fn is_blank(&self) -> bool {
        self.content.trim().is_empty()
    }
}

/// Multi-format file parser
pub struct FileParser;

impl FileParser {
    /// Extract text from a file based on its extension
    ///
    /// Unknown extensions are decoded as UTF-8 text. This is blocking work and
    /// should run on the blocking pool.
    pub fn extract(filename: &str, data: &[u8]) -> Result<ExtractedText> {
        let file_type = FileType::from_filename(filename);

        let content = match file_type {
            FileType::Pdf => Self::parse_pdf(data),
            FileType::Docx => Self::parse_docx(data),
            FileType::Json => Ok(Self::parse_json(data)),
            FileType::Txt | FileType::Markdown | FileType::Csv | FileType::Unknown => {
                Ok(decode_utf8(data))
            }
        }
        .map_err(|e| match e {
            Error::Extraction { .. } => e,
            other => Error::extraction(file_type.display_name(), other.to_string()),
        })?;

        tracing::debug!(
            "Extracted {} chars from '{}' ({})",
            content.chars().count(),
            filename,
            file_type.display_name()
        );

        Ok(ExtractedText { file_type, content })
    }

    /// Parse PDF document
    ///
    /// Whitespace runs are collapsed to single spaces.
    fn parse_pdf(data: &[u8]) -> Result<String> {
        let raw = match pdf_extract::extract_text_from_mem(data) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("pdf-extract failed: {}, trying lopdf fallback", e);
                Self::extract_pdf_text_fallback(data)?
            }
        };

        let content = raw
            .replace('\0', "")
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");

        if content.chars().count() < MIN_PDF_TEXT_CHARS {
            return Err(Error::extraction("pdf", "PDF contains no extractable text"));
        }

        Ok(content)
    }

    /// Fallback PDF text extraction using lopdf directly
    fn extract_pdf_text_fallback(data: &[u8]) -> Result<String> {
        let doc = lopdf::Document::load_mem(data)
            .map_err(|e| Error::extraction("pdf", format!("Failed to load PDF: {}", e)))?;

        let page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();
        doc.extract_text(&page_numbers)
            .map_err(|e| Error::extraction("pdf", e.to_string()))
    }

    /// Parse DOCX document
    ///
    /// Paragraphs, including those inside table cells, are separated by a
    /// blank line.
    fn parse_docx(data: &[u8]) -> Result<String> {
        let doc = docx_rs::read_docx(data)
            .map_err(|e| Error::extraction("docx", format!("Failed to parse DOCX: {}", e)))?;

        let mut paragraphs = Vec::new();
        for child in &doc.document.children {
            match child {
                docx_rs::DocumentChild::Paragraph(p) => paragraphs.push(paragraph_text(p)),
                docx_rs::DocumentChild::Table(t) => table_paragraphs(t, &mut paragraphs),
                _ => {}
            }
        }

        Ok(paragraphs.join("\n\n"))
    }

    /// Pretty-print valid JSON with two-space indentation, else keep it verbatim
    fn parse_json(data: &[u8]) -> String {
        let text = decode_utf8(data);
        match serde_json::from_str::<serde_json::Value>(&text) {
            Ok(value) => serde_json::to_string_pretty(&value).unwrap_or(text),
            Err(e) => {
                tracing::debug!("JSON upload is not valid JSON ({}), indexing raw text", e);
                text
            }
        }
    }
}

/// Lossy UTF-8 decode with a leading byte-order mark removed
fn decode_utf8(data: &[u8]) -> String {
    let data = data.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(data);
    String::from_utf8_lossy(data).into_owned()
}

fn paragraph_text(paragraph: &docx_rs::Paragraph) -> String {
    let mut text = String::new();
    for child in &paragraph.children {
        push_paragraph_child(child, &mut text);
    }
    text
}

fn push_paragraph_child(child: &docx_rs::ParagraphChild, text: &mut String) {
    match child {
        docx_rs::ParagraphChild::Run(run) => {
            for child in &run.children {
                match child {
                    docx_rs::RunChild::Text(t) => text.push_str(&t.text),
                    docx_rs::RunChild::Tab(_) => text.push('\t'),
                    docx_rs::RunChild::Break(_) => text.push('\n'),
                    _ => {}
                }
            }
        }
        docx_rs::ParagraphChild::Hyperlink(link) => {
            for child in &link.children {
                push_paragraph_child(child, text);
            }
        }
        _ => {}
    }
}

fn table_paragraphs(table: &docx_rs::Table, paragraphs: &mut Vec<String>) {
    for row in &table.rows {
        #[allow(irrefutable_let_patterns)]
        let docx_rs::TableChild::TableRow(row) = row else {
            continue;
        };
        for cell in &row.cells {
            #[allow(irrefutable_let_patterns)]
            let docx_rs::TableRowChild::TableCell(cell) = cell else {
                continue;
            };
            for content in &cell.children {
                match content {
                    docx_rs::TableCellContent::Paragraph(p) => paragraphs.push(paragraph_text(p)),
                    docx_rs::TableCellContent::Table(t) => table_paragraphs(t, paragraphs),
                    _ => {}
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docx_bytes(docx: docx_rs::Docx) -> Vec<u8> {
        let mut cursor = std::io::Cursor::new(Vec::new());
        docx.build().pack(&mut cursor).unwrap();
        cursor.into_inner()
    }

    #[test]
    fn test_plain_text_strips_bom() {
        let extracted = FileParser::extract("notes.txt", b"\xEF\xBB\xBFhello").unwrap();
        assert_eq!(extracted.file_type, FileType::Txt);
        assert_eq!(extracted.content, "hello");
    }

    #[test]
    fn test_csv_and_markdown_are_verbatim() {
        let csv = "name,qty\nbolt,4\n";
        assert_eq!(FileParser::extract("parts.csv", csv.as_bytes()).unwrap().content, csv);

        let md = "# Title\n\n- item";
        assert_eq!(FileParser::extract("README.md", md.as_bytes()).unwrap().content, md);
    }

    #[test]
    fn test_unknown_extension_decodes_utf8() {
        let extracted = FileParser::extract("config.yaml", "key: välue".as_bytes()).unwrap();
        assert_eq!(extracted.file_type, FileType::Unknown);
        assert_eq!(extracted.content, "key: välue");
    }

    #[test]
    fn test_json_is_pretty_printed_in_key_order() {
        let extracted = FileParser::extract("data.json", br#"{"b":1,"a":[true,null]}"#).unwrap();
        assert_eq!(
            extracted.content,
            "{\n  \"b\": 1,\n  \"a\": [\n    true,\n    null\n  ]\n}"
        );
    }

    #[test]
    fn test_invalid_json_passes_through() {
        let extracted = FileParser::extract("broken.json", b"{not json").unwrap();
        assert_eq!(extracted.content, "{not json");
    }

    #[test]
    fn test_blank_text() {
        assert!(FileParser::extract("empty.txt", b"  \n ").unwrap().is_blank());
    }

    #[test]
    fn test_invalid_pdf_is_extraction_error() {
        let err = FileParser::extract("scan.pdf", b"definitely not a pdf").unwrap_err();
        assert!(matches!(err, Error::Extraction { ref format, .. } if format == "PDF"));
        assert!(err.to_string().starts_with("Failed to extract text from PDF"));
    }

    #[test]
    fn test_invalid_docx_is_extraction_error() {
        let err = FileParser::extract("letter.docx", b"PK not really").unwrap_err();
        assert!(matches!(err, Error::Extraction { ref format, .. } if format == "DOCX"));
    }

    #[test]
    fn test_docx_paragraphs_and_tables() {
        use docx_rs::{Docx, Paragraph, Run, Table, TableCell, TableRow};

        let docx = Docx::new()
            .add_paragraph(Paragraph::new().add_run(Run::new().add_text("First paragraph")))
            .add_paragraph(
                Paragraph::new()
                    .add_run(Run::new().add_text("Second"))
                    .add_run(Run::new().add_text("Run")),
            )
            .add_table(Table::new(vec![TableRow::new(vec![
                TableCell::new().add_paragraph(Paragraph::new().add_run(Run::new().add_text("cell"))),
            ])]));

        let extracted = FileParser::extract("letter.docx", &docx_bytes(docx)).unwrap();
        assert_eq!(extracted.file_type, FileType::Docx);
        assert!(extracted.content.starts_with("First paragraph\n\nSecondRun"));
        assert!(extracted.content.contains("cell"));
    }
}
