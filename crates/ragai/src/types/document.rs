//! Document and chunk types

use serde::{Deserialize, Serialize};

/// Upload formats, inferred from the file extension
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    /// PDF document
    Pdf,
    /// Microsoft Word document (.docx)
    Docx,
    /// Plain text file
    Txt,
    /// Markdown file
    Markdown,
    /// JSON file (pretty-printed when valid)
    Json,
    /// CSV file (indexed verbatim)
    Csv,
    /// Anything else, decoded as UTF-8 text
    Unknown,
}

impl FileType {
    /// Detect file type from extension
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "pdf" => Self::Pdf,
            "docx" => Self::Docx,
            "txt" => Self::Txt,
            "md" => Self::Markdown,
            "json" => Self::Json,
            "csv" => Self::Csv,
            _ => Self::Unknown,
        }
    }

    /// Detect file type from the text after the last `.` of a file name
    pub fn from_filename(filename: &str) -> Self {
        Self::from_extension(extension_of(filename))
    }

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Pdf => "PDF",
            Self::Docx => "DOCX",
            Self::Txt => "TXT",
            Self::Markdown => "MD",
            Self::Json => "JSON",
            Self::Csv => "CSV",
            Self::Unknown => "FILE",
        }
    }
}

/// Extension of a file name: the text after the last `.`, or the whole name
fn extension_of(filename: &str) -> &str {
    filename.rsplit('.').next().unwrap_or("")
}

/// Metadata stored next to every chunk in the vector store
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChunkMetadata {
    /// Name of the uploaded file
    pub file_name: String,
    /// Position of the chunk in the left-to-right scan
    pub chunk_index: usize,
    /// Number of chunks the file produced
    pub total_chunks: usize,
}

/// A chunk of a document's extracted text
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Chunk {
    /// Store key derived from file name and index
    pub id: String,
    /// Trimmed chunk text
    pub text: String,
    /// Source information
    pub metadata: ChunkMetadata,
}

/// Column-oriented batch handed to the vector store in one `add` call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexBatch {
    pub ids: Vec<String>,
    pub documents: Vec<String>,
    pub metadatas: Vec<ChunkMetadata>,
}

impl IndexBatch {
    /// Number of chunks in the batch
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Check if the batch has no chunks
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Iterate the batch row by row
    pub fn chunks(&self) -> impl Iterator<Item = Chunk> + '_ {
        self.ids
            .iter()
            .zip(&self.documents)
            .zip(&self.metadatas)
            .map(|((id, text), metadata)| Chunk {
                id: id.clone(),
                text: text.clone(),
                metadata: metadata.clone(),
            })
    }
}

impl FromIterator<Chunk> for IndexBatch {
    fn from_iter<I: IntoIterator<Item = Chunk>>(iter: I) -> Self {
        let mut batch = IndexBatch::default();
        for chunk in iter {
            batch.ids.push(chunk.id);
            batch.documents.push(chunk.text);
            batch.metadatas.push(chunk.metadata);
        }
        batch
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_type_from_filename() {
        assert_eq!(FileType::from_filename("report.PDF"), FileType::Pdf);
        assert_eq!(FileType::from_filename("notes.final.md"), FileType::Markdown);
        assert_eq!(FileType::from_filename("data.json"), FileType::Json);
        assert_eq!(FileType::from_filename("table.csv"), FileType::Csv);
        assert_eq!(FileType::from_filename("letter.docx"), FileType::Docx);
        assert_eq!(FileType::from_filename("README"), FileType::Unknown);
        assert_eq!(FileType::from_filename("archive.tar.gz"), FileType::Unknown);
    }

    #[test]
    fn test_metadata_uses_camel_case_keys() {
        let metadata = ChunkMetadata {
            file_name: "a.txt".to_string(),
            chunk_index: 2,
            total_chunks: 4,
        };
        let value = serde_json::to_value(&metadata).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"fileName": "a.txt", "chunkIndex": 2, "totalChunks": 4})
        );
    }

    #[test]
    fn test_batch_collects_columns() {
        let batch: IndexBatch = (0..2)
            .map(|i| Chunk {
                id: format!("a_txt_chunk_{}", i),
                text: format!("text {}", i),
                metadata: ChunkMetadata {
                    file_name: "a.txt".to_string(),
                    chunk_index: i,
                    total_chunks: 2,
                },
            })
            .collect();

        assert_eq!(batch.len(), 2);
        assert_eq!(batch.ids, vec!["a_txt_chunk_0", "a_txt_chunk_1"]);
        assert_eq!(batch.documents[1], "text 1");
        assert_eq!(batch.chunks().nth(1).unwrap().metadata.chunk_index, 1);
    }
}
