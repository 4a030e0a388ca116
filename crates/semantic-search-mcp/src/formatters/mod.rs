//! Response post-processing and output formatting.

mod json;
mod sanitize;

pub use json::{pretty, with_metadata};
pub use sanitize::{DISCLAIMER_FIELD, OPEN_ACCESS_PDF_FIELD, strip_disclaimers};
