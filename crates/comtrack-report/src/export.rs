//! # CSV Export
//!
//! Serializes a sequence of uniform records to CSV text.
//!
//! - The header row is the first record's field names, in declaration
//!   order. Later records are written against that header; fields they
//!   lack render empty and extra fields are ignored.
//! - Strings are written as-is, `null` as an empty field, booleans as
//!   `true`/`false`. Integral floats drop the fractional part (`900.0`
//!   renders `900`). Arrays and objects are written as compact JSON.
//! - A field containing a comma, a quote, CR, or LF is quoted, with
//!   embedded quotes doubled.
//! - Rows are separated by `\n` with no trailing newline. No records
//!   means an empty body.

use serde::Serialize;
use serde_json::{Map, Number, Value};

use crate::error::ReportError;
use crate::permissions::can_export_csv;

/// Largest magnitude at which an integral float is printed without a
/// fractional part.
const MAX_PLAIN_INTEGER: f64 = 1e15;

/// Serialize `records` to CSV text.
///
/// # Errors
///
/// Returns [`ReportError::NotARecord`] when a record does not serialize to
/// a key/value object, or a serialization error from serde.
pub fn to_csv<T: Serialize>(records: &[T]) -> Result<String, ReportError> {
    let rows = records
        .iter()
        .enumerate()
        .map(|(index, record)| -> Result<Map<String, Value>, ReportError> {
            match serde_json::to_value(record)? {
                Value::Object(map) => Ok(map),
                _ => Err(ReportError::NotARecord { index }),
            }
        })
        .collect::<Result<Vec<_>, _>>()?;

    let Some(first) = rows.first() else {
        return Ok(String::new());
    };
    let header: Vec<&str> = first.keys().map(String::as_str).collect();

    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(Vec::new());
    writer.write_record(&header)?;
    for row in &rows {
        writer.write_record(header.iter().map(|key| render_field(row.get(*key))))?;
    }

    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    let mut body = String::from_utf8(bytes)?;
    if body.ends_with('\n') {
        body.pop();
    }
    Ok(body)
}

/// Serialize `records` to CSV on behalf of `role`.
///
/// # Errors
///
/// Returns [`ReportError::ExportDenied`] when the role may not export,
/// otherwise the errors of [`to_csv`].
pub fn export_csv_as<T: Serialize>(role: &str, records: &[T]) -> Result<String, ReportError> {
    if !can_export_csv(role) {
        tracing::warn!(role, "csv export denied");
        return Err(ReportError::ExportDenied {
            role: role.to_string(),
        });
    }
    let body = to_csv(records)?;
    tracing::info!(role, records = records.len(), "csv export produced");
    Ok(body)
}

fn render_field(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => render_number(n),
        Some(Value::String(s)) => s.clone(),
        Some(nested @ (Value::Array(_) | Value::Object(_))) => nested.to_string(),
    }
}

fn render_number(n: &Number) -> String {
    if n.is_i64() || n.is_u64() {
        return n.to_string();
    }
    match n.as_f64() {
        Some(f) if f.fract() == 0.0 && f.abs() < MAX_PLAIN_INTEGER => format!("{}", f as i64),
        Some(f) => f.to_string(),
        None => n.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn quotes_field_with_comma() {
        let csv = to_csv(&[json!({"a": 1, "b": "x,y"})]).unwrap();
        assert_eq!(csv, "a,b\n1,\"x,y\"");
    }

    #[test]
    fn doubles_embedded_quotes_and_quotes_newlines() {
        let csv = to_csv(&[json!({"note": "say \"hi\"", "memo": "line1\nline2"})]).unwrap();
        assert_eq!(csv, "note,memo\n\"say \"\"hi\"\"\",\"line1\nline2\"");
    }

    #[test]
    fn nested_values_are_json() {
        let csv = to_csv(&[json!({"id": "p1", "tags": ["a"], "meta": {"k": 2}})]).unwrap();
        assert_eq!(csv, "id,tags,meta\np1,\"[\"\"a\"\"]\",\"{\"\"k\"\":2}\"");
    }

    #[test]
    fn header_comes_from_first_record() {
        let csv = to_csv(&[
            json!({"a": 1, "b": 2}),
            json!({"b": 3, "c": 4}),
        ])
        .unwrap();
        assert_eq!(csv, "a,b\n1,2\n,3");
    }

    #[test]
    fn scalars_render_plainly() {
        let csv = to_csv(&[json!({"f": 900.0, "g": 0.25, "t": true, "n": null})]).unwrap();
        assert_eq!(csv, "f,g,t,n\n900,0.25,true,");
    }

    #[test]
    fn struct_fields_keep_declaration_order() {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Row {
            month: &'static str,
            total_commission: f64,
            count: usize,
        }
        let csv = to_csv(&[Row { month: "2025-09", total_commission: 1440.5, count: 2 }]).unwrap();
        assert_eq!(csv, "month,totalCommission,count\n2025-09,1440.5,2");
    }

    #[test]
    fn empty_input_is_empty_body() {
        let records: Vec<Value> = Vec::new();
        assert_eq!(to_csv(&records).unwrap(), "");
    }

    #[test]
    fn non_record_is_rejected() {
        let err = to_csv(&[json!({"a": 1}), json!(5)]).unwrap_err();
        assert!(matches!(err, ReportError::NotARecord { index: 1 }));
    }

    #[test]
    fn export_checks_role() {
        let rows = [json!({"a": 1})];
        assert_eq!(export_csv_as("Manager", &rows).unwrap(), "a\n1");
        let err = export_csv_as("viewer", &rows).unwrap_err();
        assert!(matches!(err, ReportError::ExportDenied { .. }));
    }
}
