use std::path::Path;

use crate::core::pantry::PantryEntry;
use crate::parsing::payload::{parse_inventory_value, parse_iso_date};
use crate::parsing::ParseError;
use crate::utils::validation::{check_pantry_limit, MAX_PANTRY_ENTRIES};

/// Pantry file layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum PantryFormat {
    /// Inventory rows as JSON (array, or object with `inventory`/`items`)
    Json,
    /// Tab-separated: name, [quantity], [unit], [expiration_date]
    Tsv,
    /// Comma-separated, same columns as TSV
    Csv,
    /// One item name per line
    Lines,
}

impl PantryFormat {
    /// Pick a format from a file extension; unknown extensions read as lines
    pub fn from_path(path: &Path) -> Self {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase);

        match extension.as_deref() {
            Some("json") => Self::Json,
            Some("tsv" | "tab") => Self::Tsv,
            Some("csv") => Self::Csv,
            _ => Self::Lines,
        }
    }
}

/// Parse a pantry file, choosing the format from its extension
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, or other parse errors
/// if the content is invalid.
pub fn parse_pantry_file(path: &Path) -> Result<Vec<PantryEntry>, ParseError> {
    let content = std::fs::read_to_string(path)?;
    let format = PantryFormat::from_path(path);
    tracing::debug!("reading pantry {} as {:?}", path.display(), format);
    parse_pantry_text(&content, format)
}

/// Parse pantry text in the given format
///
/// # Errors
///
/// Returns `ParseError::Json` for malformed JSON, `ParseError::InvalidFormat`
/// for bad table cells, or `ParseError::TooManyEntries` past the limit.
pub fn parse_pantry_text(text: &str, format: PantryFormat) -> Result<Vec<PantryEntry>, ParseError> {
    match format {
        PantryFormat::Json => {
            let value: serde_json::Value = serde_json::from_str(text)?;
            parse_inventory_value(&value)
        }
        PantryFormat::Tsv => parse_table_text(text, '\t'),
        PantryFormat::Csv => parse_table_text(text, ','),
        PantryFormat::Lines => parse_lines_text(text),
    }
}

/// Parse a delimited table with columns: name, [quantity], [unit], [expiration_date]
///
/// # Errors
///
/// Returns `ParseError::InvalidFormat` for an unreadable quantity or date, or
/// `ParseError::TooManyEntries` if the limit is exceeded.
pub fn parse_table_text(text: &str, delimiter: char) -> Result<Vec<PantryEntry>, ParseError> {
    let mut entries = Vec::new();
    let mut first_data_line = true;

    for (i, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = line.split(delimiter).map(str::trim).collect();

        // Check if first non-empty/non-comment line is a header
        if first_data_line {
            first_data_line = false;
            let first = fields.first().map(|s| s.to_lowercase()).unwrap_or_default();
            if matches!(first.as_str(), "name" | "item" | "food_name" | "ingredient" | "食材") {
                continue;
            }
        }

        // Line numbers in errors are 1-based for user friendliness
        let line_num = i + 1;

        let name = fields[0];
        if name.is_empty() {
            tracing::warn!("pantry line {line_num} has an empty name; skipped");
            continue;
        }

        let mut entry = PantryEntry::new(name);

        if let Some(quantity) = fields.get(1).filter(|s| !s.is_empty()) {
            entry.quantity = quantity.parse().map_err(|_| {
                ParseError::InvalidFormat(format!(
                    "Invalid quantity on line {line_num}: '{quantity}'"
                ))
            })?;
        }
        if let Some(unit) = fields.get(2) {
            entry.unit = (*unit).to_string();
        }
        if let Some(date) = fields.get(3).filter(|s| !s.is_empty()) {
            entry.expiration_date = Some(parse_iso_date(date).ok_or_else(|| {
                ParseError::InvalidFormat(format!(
                    "Invalid expiration date on line {line_num}: '{date}' (expected YYYY-MM-DD)"
                ))
            })?);
        }

        if check_pantry_limit(entries.len()).is_some() {
            return Err(ParseError::TooManyEntries(entries.len() + 1, MAX_PANTRY_ENTRIES));
        }

        entries.push(entry);
    }

    Ok(entries)
}

/// Parse one item name per line. `#` starts a comment line; list bullets
/// (`-`, `*`, `・`) are dropped.
///
/// # Errors
///
/// Returns `ParseError::TooManyEntries` if the limit is exceeded.
pub fn parse_lines_text(text: &str) -> Result<Vec<PantryEntry>, ParseError> {
    let mut entries = Vec::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let name = line.trim_start_matches(['-', '*', '・']).trim();
        if name.is_empty() {
            continue;
        }

        if check_pantry_limit(entries.len()).is_some() {
            return Err(ParseError::TooManyEntries(entries.len() + 1, MAX_PANTRY_ENTRIES));
        }
        entries.push(PantryEntry::new(name));
    }

    Ok(entries)
}
