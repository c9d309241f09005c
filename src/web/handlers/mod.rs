pub mod analyze_handlers;
pub mod ocr_handlers;
pub mod system_handlers;

pub use analyze_handlers::*;
pub use ocr_handlers::*;
pub use system_handlers::*;
