//! Output rendering for extraction results.
//!
//! # Example
//!
//! ```no_run
//! use xmlsheet::render::{to_json, JsonFormat};
//!
//! let result = xmlsheet::extract("book.xlsx", 1, 300);
//! println!("{}", to_json(&result, JsonFormat::Pretty)?);
//! # Ok::<(), xmlsheet::Error>(())
//! ```

mod json;

pub use json::{to_json, to_json_default, JsonFormat};
