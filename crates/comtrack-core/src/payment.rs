//! # Canonical Payments
//!
//! [`Payment`] is the single shape the calculator and the rollup engine
//! accept. Loosely-shaped upstream records are converted into it by
//! [`crate::raw::RawPayment`] before they reach either.

use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ComtrackError;
use crate::identity::{PaymentId, ProductId};
use crate::month::MonthKey;

/// Prefix of the advisor identity synthesized from a numeric advisor id
/// when a payment carries no advisor email.
pub const SYNTHETIC_ADVISOR_PREFIX: &str = "advisor-";

/// Lifecycle state of a payment. The engine reads it, never changes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PaymentStatus {
    /// Money received and reconciled.
    Paid,
    /// Recorded, awaiting money.
    #[default]
    Pending,
    /// Money in flight.
    Processing,
}

impl PaymentStatus {
    /// Wire name of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Paid => "Paid",
            Self::Pending => "Pending",
            Self::Processing => "Processing",
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = ComtrackError;

    /// Case-insensitive parse of the wire name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "paid" => Ok(Self::Paid),
            "pending" => Ok(Self::Pending),
            "processing" => Ok(Self::Processing),
            _ => Err(ComtrackError::UnknownStatus(s.to_string())),
        }
    }
}

/// A premium payment against a product policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    /// Payment identifier.
    pub id: PaymentId,
    /// Product whose policy prices this payment.
    pub product_id: ProductId,
    /// Insurance provider name.
    #[serde(default)]
    pub provider: String,
    /// Provider's policy number.
    #[serde(default)]
    pub policy_number: String,
    /// Client the policy belongs to.
    #[serde(default)]
    pub client_id: String,
    /// Numeric id of the advisor, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advisor_id: Option<u64>,
    /// Email of the advisor, when known. Preferred over `advisor_id`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advisor_email: Option<String>,
    /// Annualized premium equivalent.
    pub ape: f64,
    /// Premium actually received.
    pub receipts: f64,
    /// Payment date. `None` when the source had no usable date.
    #[serde(default)]
    pub date: Option<NaiveDate>,
    /// Lifecycle state.
    #[serde(default)]
    pub status: PaymentStatus,
    /// Commission pool amount attached when the payment was priced.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commission: Option<f64>,
}

impl Payment {
    /// Create a pending payment with no date, advisor, or commission.
    pub fn new(id: impl Into<String>, product_id: impl Into<String>, ape: f64, receipts: f64) -> Self {
        Self {
            id: PaymentId::new(id),
            product_id: ProductId::new(product_id),
            provider: String::new(),
            policy_number: String::new(),
            client_id: String::new(),
            advisor_id: None,
            advisor_email: None,
            ape,
            receipts,
            date: None,
            status: PaymentStatus::Pending,
            commission: None,
        }
    }

    /// Builder: set the payment date.
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    /// Builder: set the advisor email.
    pub fn with_advisor_email(mut self, email: impl Into<String>) -> Self {
        self.advisor_email = Some(email.into());
        self
    }

    /// Builder: set the numeric advisor id.
    pub fn with_advisor_id(mut self, advisor_id: u64) -> Self {
        self.advisor_id = Some(advisor_id);
        self
    }

    /// Builder: attach a precomputed commission amount.
    pub fn with_commission(mut self, amount: f64) -> Self {
        self.commission = Some(amount);
        self
    }

    /// Builder: set the lifecycle status.
    pub fn with_status(mut self, status: PaymentStatus) -> Self {
        self.status = status;
        self
    }

    /// Builder: set provider, policy number, and client.
    pub fn with_policy_ref(
        mut self,
        provider: impl Into<String>,
        policy_number: impl Into<String>,
        client_id: impl Into<String>,
    ) -> Self {
        self.provider = provider.into();
        self.policy_number = policy_number.into();
        self.client_id = client_id.into();
        self
    }

    /// The month bucket this payment falls into, if it has a usable date.
    pub fn month(&self) -> Option<MonthKey> {
        self.date.and_then(MonthKey::from_date)
    }

    /// The identity used to match this payment against an advisor filter.
    ///
    /// A non-blank email wins. Otherwise the identity is synthesized from
    /// the numeric advisor id as `advisor-{id}`. Payments with neither have
    /// no identity and never match a non-empty filter.
    pub fn advisor_identity(&self) -> Option<String> {
        match self.advisor_email.as_deref().map(str::trim) {
            Some(email) if !email.is_empty() => Some(email.to_string()),
            _ => self
                .advisor_id
                .map(|id| format!("{SYNTHETIC_ADVISOR_PREFIX}{id}")),
        }
    }
}
