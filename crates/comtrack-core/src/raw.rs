//! # Boundary Adapter for Loosely-Shaped Payments
//!
//! Payment records arrive from several sources that disagree on shape:
//!
//! | Concept  | Accepted keys                    |
//! |----------|----------------------------------|
//! | date     | `date`, `paymentDate`            |
//! | receipts | `receipts`, `actualReceipts`     |
//!
//! Numbers may be JSON numbers or numeric strings. A persisted commission
//! may be a bare amount or a full commission result object, in which case
//! its `poolAmount` is used. Dates may be plain `YYYY-MM-DD` or a timestamp
//! starting with one.
//!
//! [`RawPayment`] accepts all of that and [`RawPayment::normalize`] turns it
//! into the canonical [`Payment`]. Every field is held as a JSON value, so
//! a field of the wrong type never fails deserialization. Unusable values
//! degrade to defaults (zero amounts, no date, `Pending`, empty text)
//! rather than failing the record; a payment without a date is later
//! dropped by the rollup.

use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;

use crate::identity::{PaymentId, ProductId};
use crate::payment::{Payment, PaymentStatus};

/// A payment record as received from an upstream source.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPayment {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub product_id: Option<Value>,
    #[serde(default)]
    pub provider: Option<Value>,
    #[serde(default)]
    pub policy_number: Option<Value>,
    #[serde(default)]
    pub client_id: Option<Value>,
    #[serde(default)]
    pub advisor_id: Option<Value>,
    #[serde(default)]
    pub advisor_email: Option<Value>,
    #[serde(default)]
    pub ape: Option<Value>,
    #[serde(default)]
    pub receipts: Option<Value>,
    #[serde(default)]
    pub actual_receipts: Option<Value>,
    #[serde(default)]
    pub date: Option<Value>,
    #[serde(default)]
    pub payment_date: Option<Value>,
    #[serde(default)]
    pub status: Option<Value>,
    #[serde(default)]
    pub commission: Option<Value>,
}

impl RawPayment {
    /// Convert into the canonical payment shape.
    pub fn normalize(self) -> Payment {
        let id = self.id.as_ref().and_then(value_to_string).unwrap_or_default();

        let date_value = self.date.or(self.payment_date);
        let date = date_value.as_ref().and_then(|value| {
            let parsed = value.as_str().and_then(parse_payment_date);
            if parsed.is_none() && !value.is_null() {
                tracing::warn!(payment_id = %id, date = %value, "unparseable payment date; record will be excluded from rollups");
            }
            parsed
        });

        let status = match self.status.as_ref().filter(|v| !v.is_null()) {
            None => PaymentStatus::default(),
            Some(value) => value
                .as_str()
                .and_then(|text| text.parse::<PaymentStatus>().ok())
                .unwrap_or_else(|| {
                    tracing::warn!(payment_id = %id, status = %value, "unknown payment status; treating as Pending");
                    PaymentStatus::default()
                }),
        };

        let receipts = self.receipts.or(self.actual_receipts);

        Payment {
            product_id: ProductId(self.product_id.as_ref().and_then(value_to_string).unwrap_or_default()),
            provider: text_field(&id, "provider", self.provider.as_ref()).unwrap_or_default(),
            policy_number: text_field(&id, "policyNumber", self.policy_number.as_ref()).unwrap_or_default(),
            client_id: self.client_id.as_ref().and_then(value_to_string).unwrap_or_default(),
            advisor_id: self.advisor_id.as_ref().and_then(value_to_u64),
            advisor_email: text_field(&id, "advisorEmail", self.advisor_email.as_ref()),
            ape: self.ape.as_ref().and_then(value_to_f64).unwrap_or(0.0),
            receipts: receipts.as_ref().and_then(value_to_f64).unwrap_or(0.0),
            date,
            status,
            commission: self.commission.as_ref().and_then(commission_amount),
            id: PaymentId(id),
        }
    }
}

impl From<RawPayment> for Payment {
    fn from(raw: RawPayment) -> Self {
        raw.normalize()
    }
}

/// Parse a payment date given as `YYYY-MM-DD`, optionally followed by a
/// time part introduced by `T` or a space.
pub fn parse_payment_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    let day = text.get(..10)?;
    match text.as_bytes().get(10) {
        None | Some(b'T') | Some(b' ') => {}
        Some(_) => return None,
    }
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

fn value_to_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}

/// A text field. Anything but a string or null is dropped with a warning.
fn text_field(payment_id: &str, field: &'static str, value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => {
            tracing::warn!(payment_id, field, value = %other, "non-text value ignored");
            None
        }
    }
}

fn value_to_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn commission_amount(value: &Value) -> Option<f64> {
    match value {
        Value::Object(map) => map.get("poolAmount").and_then(value_to_f64),
        other => value_to_f64(other),
    }
}
