//! # Response Parsers
//!
//! Listing entry points answer with pipe-delimited text, count entry points
//! with a short numeric string.

use std::collections::BTreeMap;

use crate::ffi::error::{BoletoError, BoletoResult};

pub const LIST_SEPARATOR: char = '|';
pub const CODE_SEPARATOR: char = '-';

/// Split a pipe-delimited answer, keeping order.
///
/// An empty answer yields one empty item, not an empty list.
pub fn split_list(text: &str) -> Vec<String> {
    text.split(LIST_SEPARATOR).map(str::to_string).collect()
}

/// Parse `code-description` items into a map from code to description.
///
/// The description is the second `-` separated segment only, so anything
/// after a further `-` is dropped (`"03-Ocorrência-Extra"` gives
/// `"Ocorrência"`). An item without `-` maps to an empty description and a
/// repeated code keeps the last description.
pub fn parse_code_descriptions(text: &str) -> BTreeMap<String, String> {
    text.split(LIST_SEPARATOR)
        .map(|item| {
            let mut segments = item.split(CODE_SEPARATOR);
            let code = segments.next().unwrap_or_default().to_string();
            let description = segments.next().unwrap_or_default().to_string();
            (code, description)
        })
        .collect()
}

/// Parse a numeric answer such as `"5"` or `"000123"`.
pub fn parse_count(operation: &str, text: &str) -> BoletoResult<i64> {
    let trimmed = text.trim_matches(|c: char| c.is_whitespace() || c == '\0');
    trimmed
        .parse::<i64>()
        .map_err(|_| BoletoError::InvalidResponse {
            operation: operation.to_string(),
            text: text.to_string(),
        })
}
