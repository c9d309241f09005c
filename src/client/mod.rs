pub mod api;
pub mod extraction;
pub mod screening;

pub use api::*;
pub use extraction::*;
pub use screening::*;
