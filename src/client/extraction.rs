// src/client/extraction.rs
//! CV text extraction: native PDF/TXT reading with an OCR fallback

use super::api::{ClientError, HrApiClient};
use crate::types::OcrResponse;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

pub const MAX_FILE_SIZE: u64 = 5 * 1024 * 1024;
pub const MIN_TEXT_CHARS: usize = 50;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Please upload a PDF, TXT, or Word document")]
    UnsupportedFormat(String),

    #[error("File size must be under 5MB")]
    TooLarge(u64),

    #[error("Word documents require manual text paste. Copy your CV content and paste it instead.")]
    WordDocument,

    #[error("Could not extract enough text from the file. Please paste your CV manually.")]
    InsufficientText,

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to extract text from PDF: {0}")]
    Pdf(String),

    #[error(transparent)]
    Ocr(#[from] ClientError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Text,
    Word,
}

impl DocumentKind {
    pub fn detect(path: &Path) -> Result<Self, ExtractionError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "pdf" => Ok(DocumentKind::Pdf),
            "txt" => Ok(DocumentKind::Text),
            "doc" | "docx" => Ok(DocumentKind::Word),
            _ => Err(ExtractionError::UnsupportedFormat(extension)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionMethod {
    Native,
    Ocr,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedText {
    pub text: String,
    pub method: ExtractionMethod,
    pub character_count: usize,
}

impl ExtractedText {
    fn new(text: String, method: ExtractionMethod) -> Self {
        let character_count = text.chars().count();
        Self {
            text,
            method,
            character_count,
        }
    }
}

/// OCR over pre-rendered page images
#[rocket::async_trait]
pub trait PageOcr: Send + Sync {
    async fn ocr(&self, pages: Vec<String>, filename: Option<&str>) -> Result<OcrResponse, ClientError>;
}

#[rocket::async_trait]
impl PageOcr for HrApiClient {
    async fn ocr(&self, pages: Vec<String>, filename: Option<&str>) -> Result<OcrResponse, ClientError> {
        self.ocr_pages(pages, filename).await
    }
}

fn has_enough_text(text: &str) -> bool {
    text.trim().chars().count() >= MIN_TEXT_CHARS
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> ExtractionError + '_ {
    move |source| ExtractionError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn image_mime(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
        .as_deref()
    {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        _ => "image/png",
    }
}

/// Read a page image as a `data:` URL
pub async fn encode_page_image(path: &Path) -> Result<String, ExtractionError> {
    let bytes = tokio::fs::read(path).await.map_err(io_error(path))?;
    Ok(format!("data:{};base64,{}", image_mime(path), STANDARD.encode(bytes)))
}

async fn extract_pdf_text(path: &Path) -> Result<String, ExtractionError> {
    let bytes = tokio::fs::read(path).await.map_err(io_error(path))?;

    // pdf-extract is synchronous and may panic on malformed files
    let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
        .await
        .map_err(|e| ExtractionError::Pdf(e.to_string()))?
        .map_err(|e| ExtractionError::Pdf(e.to_string()))?;

    Ok(text.trim().to_string())
}

/// Text readable without any remote call
pub async fn extract_native(path: &Path, kind: DocumentKind) -> Result<String, ExtractionError> {
    match kind {
        DocumentKind::Pdf => extract_pdf_text(path).await,
        DocumentKind::Text => {
            let bytes = tokio::fs::read(path).await.map_err(io_error(path))?;
            Ok(String::from_utf8_lossy(&bytes).into_owned())
        }
        DocumentKind::Word => Err(ExtractionError::WordDocument),
    }
}

/// Extract CV text from `path`. When a PDF yields too little text (typically
/// a scan) and page images plus an OCR backend are available, the pages are
/// sent for OCR instead.
pub async fn extract_document_text(
    path: &Path,
    page_images: &[PathBuf],
    ocr: Option<&dyn PageOcr>,
) -> Result<ExtractedText, ExtractionError> {
    let kind = DocumentKind::detect(path)?;

    let size = tokio::fs::metadata(path).await.map_err(io_error(path))?.len();
    if size > MAX_FILE_SIZE {
        return Err(ExtractionError::TooLarge(size));
    }

    let native = extract_native(path, kind).await;
    match &native {
        Ok(text) if has_enough_text(text) => {
            info!("Extracted {} characters from {}", text.len(), path.display());
            return Ok(ExtractedText::new(text.clone(), ExtractionMethod::Native));
        }
        Ok(_) => warn!("Too little embedded text in {}", path.display()),
        Err(ExtractionError::WordDocument) => return Err(ExtractionError::WordDocument),
        Err(e) => warn!("Native extraction failed for {}: {}", path.display(), e),
    }

    let ocr = match ocr {
        Some(ocr) if kind == DocumentKind::Pdf && !page_images.is_empty() => ocr,
        _ => {
            return match native {
                Err(e) => Err(e),
                Ok(_) => Err(ExtractionError::InsufficientText),
            }
        }
    };

    info!("Falling back to OCR for {} page images", page_images.len());
    let mut pages = Vec::with_capacity(page_images.len());
    for image in page_images {
        pages.push(encode_page_image(image).await?);
    }

    let filename = path.file_name().and_then(|name| name.to_str());
    let response = ocr.ocr(pages, filename).await?;

    if !has_enough_text(&response.text) {
        return Err(ExtractionError::InsufficientText);
    }
    Ok(ExtractedText::new(response.text, ExtractionMethod::Ocr))
}
