pub mod entities;
pub mod errors;
pub mod ports;
pub mod segmenter;

pub use entities::*;
pub use errors::{DomainError, Result};
