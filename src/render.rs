//! Text output of produced values. Only used for display.
use serde::Serialize;

use crate::error::Result;

pub const SEPARATOR_WIDTH: usize = 100;

pub fn to_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Indented JSON for each value, preceded by a 1-based `Index: n` line when
/// there is more than one.
pub fn render_all<T: Serialize>(values: &[T]) -> Result<String> {
    let mut out = String::new();
    for (i, value) in values.iter().enumerate() {
        if values.len() > 1 {
            out += &format!("Index: {}\n", i + 1);
        }
        out += &to_json(value)?;
        out.push('\n');
    }
    Ok(out)
}

pub fn separator() -> String {
    "-".repeat(SEPARATOR_WIDTH)
}
