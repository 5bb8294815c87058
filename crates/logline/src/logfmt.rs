//! Logfmt line formatting: flatten, reorder, stringify.
//!
//! # Design
//! - Records are insertion-ordered JSON maps; the caller's field order is kept.
//! - Each record is consumed once and turned into exactly one line with no raw newlines.
//! - Arrays are atomic values; only nested objects are flattened.

use serde::Deserialize;
use serde_json::{Map, Value};

/// One structured log record in caller field order.
pub type Record = Map<String, Value>;

/// Fields placed first in every line, in this order, when present.
pub const PRIORITY_FIELDS: [&str; 4] = ["time", "level", "name", "msg"];

/// Joiner used between parent and child keys when flattening.
pub const DEFAULT_FLATTEN_SEPARATOR: &str = "_";

/// Construction options for [`LogfmtFormatter`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LogfmtOptions {
    /// Flatten nested objects into `parent<sep>child` keys before formatting.
    pub flatten_nested_objects: bool,
    /// Separator between flattened key segments.
    pub flatten_separator: String,
}

impl Default for LogfmtOptions {
    fn default() -> Self {
        Self {
            flatten_nested_objects: false,
            flatten_separator: DEFAULT_FLATTEN_SEPARATOR.to_string(),
        }
    }
}

/// Formats records into logfmt lines.
#[derive(Debug, Clone, Default)]
pub struct LogfmtFormatter {
    options: LogfmtOptions,
}

impl LogfmtFormatter {
    /// Construct a formatter with fixed options.
    #[must_use]
    pub const fn new(options: LogfmtOptions) -> Self {
        Self { options }
    }

    /// Options the formatter was built with.
    #[must_use]
    pub const fn options(&self) -> &LogfmtOptions {
        &self.options
    }

    /// Format one record into a line without the trailing newline.
    #[must_use]
    pub fn format_record(&self, record: Record) -> String {
        let record = if self.options.flatten_nested_objects {
            flatten(record, &self.options.flatten_separator)
        } else {
            record
        };
        stringify(&reorder(record))
    }
}

/// Replace every nested object with `parent<separator>child` entries, recursively.
///
/// Arrays, nulls and scalars stay at their current path. Colliding paths keep the
/// last value written, at the position of the first.
#[must_use]
pub fn flatten(record: Record, separator: &str) -> Record {
    let mut output = Record::new();
    flatten_into(record, separator, None, &mut output);
    output
}

fn flatten_into(source: Record, separator: &str, prefix: Option<&str>, output: &mut Record) {
    for (key, value) in source {
        let path = match prefix {
            Some(prefix) => format!("{prefix}{separator}{key}"),
            None => key,
        };
        match value {
            Value::Object(nested) => flatten_into(nested, separator, Some(path.as_str()), output),
            other => {
                output.insert(path, other);
            }
        }
    }
}

/// Move the priority fields to the front; everything else keeps its relative order.
#[must_use]
pub fn reorder(record: Record) -> Record {
    let mut priority: [Option<Value>; PRIORITY_FIELDS.len()] = Default::default();
    let mut rest = Record::new();

    for (key, value) in record {
        match PRIORITY_FIELDS.iter().position(|field| *field == key) {
            Some(slot) => priority[slot] = Some(value),
            None => {
                rest.insert(key, value);
            }
        }
    }

    let mut ordered = Record::new();
    for (field, value) in PRIORITY_FIELDS.iter().zip(priority) {
        if let Some(value) = value {
            ordered.insert((*field).to_string(), value);
        }
    }
    ordered.extend(rest);
    ordered
}

/// Render a record as space-separated `key=value` pairs.
#[must_use]
pub fn stringify(record: &Record) -> String {
    let mut line = String::new();
    for (key, value) in record {
        line.push_str(key);
        line.push('=');
        line.push_str(&render_value(value));
        line.push(' ');
    }
    line.truncate(line.trim_end().len());
    line
}

fn render_value(raw: &Value) -> String {
    let text = match raw {
        Value::Null => return String::new(),
        Value::String(text) => text.clone(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => number.to_string(),
        nested @ (Value::Array(_) | Value::Object(_)) => nested.to_string(),
    };
    if text.is_empty() {
        return "\"\"".to_string();
    }

    let has_newlines = text.contains(['\n', '\r']);
    let needs_quoting = text.contains([' ', '=']);
    let needs_escaping = text.contains(['"', '\\']);

    let mut value = if needs_escaping {
        escape_quotes_and_backslashes(&text)
    } else {
        text
    };
    if has_newlines {
        value = value
            .replace("\r\n", "\\n")
            .replace('\n', "\\n")
            .replace('\r', "\\r");
    }
    if needs_quoting || needs_escaping || has_newlines {
        format!("\"{value}\"")
    } else {
        value
    }
}

fn escape_quotes_and_backslashes(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len() + 2);
    for ch in value.chars() {
        if matches!(ch, '"' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}
