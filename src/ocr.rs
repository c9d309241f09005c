// src/ocr.rs
//! Page-by-page OCR through the gateway's vision model

use crate::gateway::prompts::{ocr_page_instruction, OCR_SYSTEM_PROMPT};
use crate::gateway::{
    ChatGateway, ChatMessage, ChatRequest, ContentPart, GatewayError, ImageUrl,
};
use crate::types::{OcrRequest, OcrResponse};
use thiserror::Error;
use tracing::{info, info_span, warn, Instrument};

pub const PAGE_SEPARATOR: &str = "\n\n--- Page Break ---\n\n";
const OCR_TEMPERATURE: f32 = 0.1;
const OCR_MAX_TOKENS: u32 = 4000;
const MIN_COMBINED_CHARS: usize = 20;

#[derive(Debug, Error)]
pub enum OcrError {
    #[error("Page images are required")]
    NoPages,

    #[error("No text could be extracted from the PDF")]
    NoText,

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// Pages arrive either as bare base64 PNG data or as complete `data:` URLs
pub fn page_image_url(page: &str) -> String {
    if page.starts_with("data:") {
        page.to_string()
    } else {
        format!("data:image/png;base64,{}", page)
    }
}

pub struct PageReader<'a> {
    gateway: &'a dyn ChatGateway,
    model: &'a str,
}

impl<'a> PageReader<'a> {
    pub fn new(gateway: &'a dyn ChatGateway, model: &'a str) -> Self {
        Self { gateway, model }
    }

    fn page_request(&self, page_number: usize, page: &str) -> ChatRequest {
        ChatRequest {
            model: self.model.to_string(),
            messages: vec![
                ChatMessage::system(OCR_SYSTEM_PROMPT),
                ChatMessage::user_parts(vec![
                    ContentPart::Text {
                        text: ocr_page_instruction(page_number),
                    },
                    ContentPart::ImageUrl {
                        image_url: ImageUrl {
                            url: page_image_url(page),
                        },
                    },
                ]),
            ],
            temperature: OCR_TEMPERATURE,
            max_tokens: Some(OCR_MAX_TOKENS),
            response_format: None,
        }
    }

    /// Read one page. Rate and usage limits abort the document, any other
    /// gateway refusal leaves a placeholder for the page.
    async fn read_page(&self, page_number: usize, page: &str) -> Result<String, OcrError> {
        match self.gateway.complete(&self.page_request(page_number, page)).await {
            Ok(text) => {
                info!("Page {}: extracted {} characters", page_number, text.len());
                Ok(text.trim().to_string())
            }
            Err(GatewayError::EmptyContent) => {
                Ok(format!("[Page {}: No text extracted]", page_number))
            }
            Err(GatewayError::Upstream { status, body }) => {
                warn!("OCR failed on page {} ({}): {}", page_number, status, body);
                Ok(format!("[Page {}: OCR failed]", page_number))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn extract(&self, request: &OcrRequest) -> Result<OcrResponse, OcrError> {
        if request.pages.is_empty() {
            return Err(OcrError::NoPages);
        }

        let page_count = request.pages.len();
        info!(
            "Processing {} pages from {}",
            page_count,
            request.filename.as_deref().unwrap_or("PDF")
        );

        let mut page_texts = Vec::with_capacity(page_count);
        for (index, page) in request.pages.iter().enumerate() {
            let page_number = index + 1;
            let span = info_span!("ocr_page", page = page_number, of = page_count);
            page_texts.push(self.read_page(page_number, page).instrument(span).await?);
        }

        let text = page_texts.join(PAGE_SEPARATOR);
        let character_count = text.chars().count();
        if character_count < MIN_COMBINED_CHARS {
            return Err(OcrError::NoText);
        }

        info!(
            "OCR completed: {} characters from {} pages",
            character_count, page_count
        );

        Ok(OcrResponse {
            success: true,
            text,
            character_count,
            page_count,
        })
    }
}
