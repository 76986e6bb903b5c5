//! Parsers that turn external inputs into core values.
//!
//! This module provides parsers for:
//!
//! - **Pantry files**: JSON arrays, TSV/CSV tables, or one name per line
//! - **Provider payloads**: loosely-typed JSON from the inventory and
//!   recommendation collaborators (inventory rows, missing-item strings,
//!   preference vectors, cooking history)
//!
//! Parsing is the only layer that can fail. Everything it returns is
//! already valid input for the matching engine.
//!
//! ## Example
//!
//! ```rust,no_run
//! use pantry_match::parsing::pantry::{parse_pantry_file, parse_pantry_text, PantryFormat};
//! use std::path::Path;
//!
//! let entries = parse_pantry_file(Path::new("pantry.tsv")).unwrap();
//!
//! let entries = parse_pantry_text("玉ねぎ\nにんじん\n", PantryFormat::Lines).unwrap();
//! ```
//!
//! ## Pantry table columns
//!
//! | Column | Description | Required |
//! |--------|-------------|----------|
//! | name   | Item name as written | Yes |
//! | quantity | Remaining amount | No |
//! | unit   | Unit of `quantity` | No |
//! | expiration_date | ISO date (YYYY-MM-DD) | No |

pub mod pantry;
pub mod payload;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Too many entries: {0} exceeds maximum allowed ({1})")]
    TooManyEntries(usize, usize),
}
