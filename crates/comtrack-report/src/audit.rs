//! # Commission Audit Trail
//!
//! Records who did what to which entity. Entries for priced payments carry
//! the full commission result so a reviewer can see the method, base, pool,
//! and shares that were in effect.
//!
//! Storage sits behind [`AuditRepository`]. [`AuditTrail`] is the in-memory
//! implementation: append-only with a capacity, trimming the oldest 10%
//! once the capacity is exceeded. Entries should be persisted elsewhere
//! before they are trimmed.

use chrono::{DateTime, Utc};
use comtrack_core::Payment;
use comtrack_engine::CommissionResult;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Action recorded when a payment is priced.
pub const ACTION_COMMISSION_COMPUTED: &str = "commission_computed";

/// Entity type recorded for payment entries.
pub const ENTITY_PAYMENT: &str = "payment";

// ---------------------------------------------------------------------------
// AuditEntry
// ---------------------------------------------------------------------------

/// A single audit record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    /// Entry identifier.
    pub id: Uuid,
    /// Who performed the action.
    pub actor: String,
    /// snake_case action token, e.g. `payment_created`.
    pub action: String,
    /// Kind of entity acted on, e.g. `payment`.
    pub entity_type: String,
    /// Identifier of the entity acted on.
    pub entity_id: String,
    /// When the action happened.
    pub timestamp: DateTime<Utc>,
    /// Action-specific payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl AuditEntry {
    /// Create an entry stamped with the current UTC time.
    pub fn new(
        actor: impl Into<String>,
        action: impl Into<String>,
        entity_type: impl Into<String>,
        entity_id: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            actor: actor.into(),
            action: action.into(),
            entity_type: entity_type.into(),
            entity_id: entity_id.into(),
            timestamp: Utc::now(),
            details: None,
        }
    }

    /// Builder: attach a payload.
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Builder: override the timestamp.
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Entry recording that `actor` priced `payment` as `result`.
    pub fn commission_computed(
        actor: impl Into<String>,
        payment: &Payment,
        result: &CommissionResult,
    ) -> Self {
        let details = serde_json::json!({
            "productId": payment.product_id,
            "ape": payment.ape,
            "receipts": payment.receipts,
            "commission": result,
        });
        Self::new(
            actor,
            ACTION_COMMISSION_COMPUTED,
            ENTITY_PAYMENT,
            payment.id.as_str(),
        )
        .with_details(details)
    }

    /// The action as Title Case words for display.
    pub fn display_action(&self) -> String {
        normalize_action(&self.action)
    }
}

/// Turn a snake_case action token into Title Case words.
///
/// `payment_created` becomes `Payment Created`. Only the first character
/// of each word is changed. Empty segments from repeated, leading, or
/// trailing underscores are dropped.
pub fn normalize_action(action: &str) -> String {
    action
        .split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

// ---------------------------------------------------------------------------
// Repository
// ---------------------------------------------------------------------------

/// Storage for audit entries.
pub trait AuditRepository {
    /// Record an entry.
    fn append(&mut self, entry: AuditEntry);

    /// Entries recorded for `actor`, oldest first.
    fn query_by_actor(&self, actor: &str) -> Vec<AuditEntry>;

    /// Entries recorded against one entity, oldest first.
    fn query_by_entity(&self, entity_type: &str, entity_id: &str) -> Vec<AuditEntry>;
}

/// In-memory append-only audit trail with a capacity.
///
/// Not `Sync`-guarded; share behind a lock if needed.
pub struct AuditTrail {
    entries: Vec<AuditEntry>,
    max_entries: usize,
}

impl AuditTrail {
    /// Create a trail holding at most `max_entries` before trimming.
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: Vec::new(),
            max_entries,
        }
    }

    /// All retained entries, oldest first.
    pub fn entries(&self) -> &[AuditEntry] {
        &self.entries
    }

    /// Number of retained entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the trail is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The last `n` entries, or all of them if fewer exist.
    pub fn last_n(&self, n: usize) -> &[AuditEntry] {
        let start = self.entries.len().saturating_sub(n);
        &self.entries[start..]
    }
}

impl AuditRepository for AuditTrail {
    fn append(&mut self, entry: AuditEntry) {
        self.entries.push(entry);
        if self.entries.len() > self.max_entries {
            let trim_count = (self.max_entries / 10).max(1);
            let trim_count = trim_count.min(self.entries.len());
            self.entries.drain(..trim_count);
            tracing::debug!(trim_count, "audit trail over capacity; oldest entries trimmed");
        }
    }

    fn query_by_actor(&self, actor: &str) -> Vec<AuditEntry> {
        self.entries
            .iter()
            .filter(|e| e.actor == actor)
            .cloned()
            .collect()
    }

    fn query_by_entity(&self, entity_type: &str, entity_id: &str) -> Vec<AuditEntry> {
        self.entries
            .iter()
            .filter(|e| e.entity_type == entity_type && e.entity_id == entity_id)
            .cloned()
            .collect()
    }
}

impl Default for AuditTrail {
    fn default() -> Self {
        Self::new(10_000)
    }
}

impl std::fmt::Debug for AuditTrail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditTrail")
            .field("entries", &self.entries.len())
            .field("max_entries", &self.max_entries)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use comtrack_core::{Policy, ProductId, Split};
    use comtrack_engine::compute_commission;

    #[test]
    fn normalize_action_title_cases_words() {
        assert_eq!(normalize_action("payment_created"), "Payment Created");
        assert_eq!(normalize_action("login"), "Login");
        assert_eq!(normalize_action("export_csv_report"), "Export Csv Report");
    }

    #[test]
    fn normalize_action_edge_cases() {
        assert_eq!(normalize_action(""), "");
        assert_eq!(normalize_action("__policy__updated_"), "Policy Updated");
        assert_eq!(normalize_action("csv_EXPORT"), "Csv EXPORT");
    }

    #[test]
    fn commission_entry_carries_result_shape() {
        let policy = Policy {
            product_id: ProductId::new("LIFE-01"),
            product_rate_pct: 20.0,
            margin_pct: 10.0,
            threshold_multiplier: 0.6,
            split: Split::new(0.5, 0.1, 0.2, 0.2),
        };
        let payment = Payment::new("pay-1", "LIFE-01", 10_000.0, 8_000.0);
        let result = compute_commission(&payment, &policy);

        let entry = AuditEntry::commission_computed("ana@example.com", &payment, &result);
        assert_eq!(entry.entity_type, "payment");
        assert_eq!(entry.entity_id, "pay-1");
        assert_eq!(entry.display_action(), "Commission Computed");

        let details = entry.details.as_ref().unwrap();
        assert_eq!(details["productId"], "LIFE-01");
        assert_eq!(details["commission"]["methodUsed"], "Receipts");
        assert!(details["commission"]["split"].get("Advisor").is_some());
    }

    #[test]
    fn queries_filter_by_actor_and_entity() {
        let mut trail = AuditTrail::new(100);
        trail.append(AuditEntry::new("ana", "payment_created", "payment", "p1"));
        trail.append(AuditEntry::new("ana", "payment_updated", "payment", "p2"));
        trail.append(AuditEntry::new("ben", "payment_updated", "payment", "p1"));
        trail.append(AuditEntry::new("ben", "policy_updated", "policy", "p1"));

        assert_eq!(trail.query_by_actor("ana").len(), 2);
        assert_eq!(trail.query_by_actor("nobody").len(), 0);

        let p1 = trail.query_by_entity("payment", "p1");
        assert_eq!(p1.len(), 2);
        assert_eq!(p1[0].actor, "ana");
        assert_eq!(p1[1].actor, "ben");
    }

    #[test]
    fn trail_trims_oldest_over_capacity() {
        let mut trail = AuditTrail::new(10);
        for i in 0..15 {
            trail.append(AuditEntry::new("ana", "login", "session", format!("s{i}")));
        }
        assert!(trail.len() <= 10);
        assert_eq!(trail.last_n(1)[0].entity_id, "s14");
        assert!(trail.query_by_entity("session", "s0").is_empty());
    }

    #[test]
    fn entry_wire_format() {
        let entry = AuditEntry::new("ana", "login", "session", "s1");
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["entityType"], "session");
        assert!(value.get("details").is_none());
        let back: AuditEntry = serde_json::from_value(value).unwrap();
        assert_eq!(back, entry);
    }
}
