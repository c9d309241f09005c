// src/types/ocr.rs
use serde::{Deserialize, Serialize};

/// Body of `POST /pdf-ocr`: one base64 image (or `data:` URL) per page
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OcrRequest {
    #[serde(default)]
    pub pages: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OcrResponse {
    pub success: bool,
    pub text: String,
    pub character_count: usize,
    pub page_count: usize,
}
