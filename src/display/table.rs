use crate::error::DisplayError;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table, presets};
use serde_json::{Map, Value};

const MAX_CELL_CHARS: usize = 100;

/// Renders opaque JSON payloads as terminal tables
pub struct TableDisplay {
    use_colors: bool,
}

impl Default for TableDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl TableDisplay {
    pub fn new() -> Self {
        Self { use_colors: true }
    }

    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    /// Arrays of objects become one row per element, objects become
    /// field/value rows, scalars are printed as-is.
    pub fn render_value(&self, value: &Value) -> Result<String, DisplayError> {
        match value {
            Value::Array(items) if items.is_empty() => Ok("No records.".to_string()),
            Value::Array(items) if items.iter().all(Value::is_object) => {
                self.render_records(items)
            }
            Value::Array(items) => {
                let mut table = self.new_table(vec!["Value"]);
                for item in items {
                    table.add_row(vec![self.value_cell(item)]);
                }
                Ok(table.to_string())
            }
            Value::Object(fields) => Ok(self.render_fields(fields)),
            Value::Null => Ok("(empty response)".to_string()),
            scalar => Ok(self.format_cell_value(scalar)),
        }
    }

    fn render_records(&self, items: &[Value]) -> Result<String, DisplayError> {
        let mut columns: Vec<&str> = Vec::new();
        for item in items {
            let fields = item
                .as_object()
                .ok_or_else(|| DisplayError::TableFormat("expected an object row".to_string()))?;
            for key in fields.keys() {
                if !columns.contains(&key.as_str()) {
                    columns.push(key);
                }
            }
        }

        let mut table = self.new_table(columns.clone());
        for item in items {
            let row: Vec<Cell> = columns
                .iter()
                .map(|column| match item.get(*column) {
                    Some(value) => self.value_cell(value),
                    None => self.value_cell(&Value::Null),
                })
                .collect();
            table.add_row(row);
        }

        let mut output = table.to_string();
        output.push_str(&format!("\n{} record(s)", items.len()));
        Ok(output)
    }

    fn render_fields(&self, fields: &Map<String, Value>) -> String {
        if fields.is_empty() {
            return "{}".to_string();
        }

        let mut table = self.new_table(vec!["Field", "Value"]);
        for (key, value) in fields {
            table.add_row(vec![Cell::new(key), self.value_cell(value)]);
        }
        table.to_string()
    }

    fn new_table(&self, headers: Vec<&str>) -> Table {
        let mut table = Table::new();
        table.load_preset(presets::UTF8_FULL);
        table.set_content_arrangement(ContentArrangement::Dynamic);

        let headers: Vec<Cell> = headers
            .into_iter()
            .map(|header| {
                let cell = Cell::new(header).add_attribute(Attribute::Bold);
                if self.use_colors {
                    cell.fg(Color::Green)
                } else {
                    cell
                }
            })
            .collect();
        table.set_header(headers);
        table
    }

    fn value_cell(&self, value: &Value) -> Cell {
        let cell = Cell::new(self.format_cell_value(value));
        if self.use_colors && value.is_null() {
            cell.fg(Color::DarkGrey).add_attribute(Attribute::Italic)
        } else {
            cell
        }
    }

    pub fn format_cell_value(&self, value: &Value) -> String {
        match value {
            Value::Null => "-".to_string(),
            Value::String(s) => truncate_chars(s, MAX_CELL_CHARS),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            // Nested values stay as compact JSON so nothing is hidden.
            nested => truncate_chars(&nested.to_string(), MAX_CELL_CHARS),
        }
    }
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let truncated: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{}...", truncated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn display() -> TableDisplay {
        TableDisplay::new().with_colors(false)
    }

    #[test]
    fn test_render_records_collects_all_columns() {
        let value = json!([
            { "id": 1, "name": "alpha" },
            { "id": 2, "enabled": true }
        ]);
        let output = display().render_value(&value).expect("render");

        assert!(output.contains("id"));
        assert!(output.contains("name"));
        assert!(output.contains("enabled"));
        assert!(output.contains("alpha"));
        assert!(output.contains("2 record(s)"));
    }

    #[test]
    fn test_render_object_as_fields() {
        let value = json!({ "prefix": "!", "owners": ["a", "b"] });
        let output = display().render_value(&value).expect("render");

        assert!(output.contains("Field"));
        assert!(output.contains("prefix"));
        assert!(output.contains("[\"a\",\"b\"]"));
    }

    #[test]
    fn test_render_empty_and_scalars() {
        assert_eq!(display().render_value(&json!([])).unwrap(), "No records.");
        assert_eq!(display().render_value(&Value::Null).unwrap(), "(empty response)");
        assert_eq!(display().render_value(&json!("ok")).unwrap(), "ok");
        assert_eq!(display().render_value(&json!({})).unwrap(), "{}");
    }

    #[test]
    fn test_format_cell_value() {
        let display = display();
        assert_eq!(display.format_cell_value(&Value::Null), "-");
        assert_eq!(display.format_cell_value(&json!(3.5)), "3.5");
        assert_eq!(display.format_cell_value(&json!(false)), "false");

        let long = "é".repeat(150);
        let formatted = display.format_cell_value(&json!(long));
        assert_eq!(formatted.chars().count(), MAX_CELL_CHARS);
        assert!(formatted.ends_with("..."));
    }
}
