// src/types/mod.rs
pub mod analysis;
pub mod ocr;
pub mod records;

pub use analysis::*;
pub use ocr::*;
pub use records::*;
