//! # Product Policies
//!
//! A [`Policy`] holds the commission terms for one product: the rate applied
//! to the chosen base, the house margin, the threshold multiplier deciding
//! between APE and receipts, and the four-way split of the resulting pool.
//!
//! Policies are lookup data. They are loaded once and shared read-only
//! across every payment priced under the product.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::identity::ProductId;

/// A party that receives a share of the commission pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SplitRole {
    /// The advisor who wrote the business.
    Advisor,
    /// The introducer who referred the client.
    Introducer,
    /// The advisor's manager.
    Manager,
    /// The executive sales manager.
    ExecSalesManager,
}

impl SplitRole {
    /// All roles in wire order.
    pub fn all() -> &'static [SplitRole] {
        &[
            Self::Advisor,
            Self::Introducer,
            Self::Manager,
            Self::ExecSalesManager,
        ]
    }

    /// The wire name of this role, as used for split keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Advisor => "Advisor",
            Self::Introducer => "Introducer",
            Self::Manager => "Manager",
            Self::ExecSalesManager => "ExecSalesManager",
        }
    }
}

impl std::fmt::Display for SplitRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One value per [`SplitRole`].
///
/// On a [`Policy`] the values are fractions of the pool. On a commission
/// result they are the monetary shares. Fractions are expected to sum to
/// 1.0 but nothing here enforces it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Split {
    pub advisor: f64,
    pub introducer: f64,
    pub manager: f64,
    pub exec_sales_manager: f64,
}

impl Split {
    /// Build a split from its four components in wire order.
    pub fn new(advisor: f64, introducer: f64, manager: f64, exec_sales_manager: f64) -> Self {
        Self {
            advisor,
            introducer,
            manager,
            exec_sales_manager,
        }
    }

    /// The value assigned to `role`.
    pub fn get(&self, role: SplitRole) -> f64 {
        match role {
            SplitRole::Advisor => self.advisor,
            SplitRole::Introducer => self.introducer,
            SplitRole::Manager => self.manager,
            SplitRole::ExecSalesManager => self.exec_sales_manager,
        }
    }

    /// Apply `f` to every component independently.
    pub fn map(&self, mut f: impl FnMut(f64) -> f64) -> Self {
        Self {
            advisor: f(self.advisor),
            introducer: f(self.introducer),
            manager: f(self.manager),
            exec_sales_manager: f(self.exec_sales_manager),
        }
    }

    /// Sum of the four components, added in wire order.
    pub fn total(&self) -> f64 {
        self.advisor + self.introducer + self.manager + self.exec_sales_manager
    }
}

/// Commission terms for a single product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Policy {
    /// The product these terms apply to.
    pub product_id: ProductId,
    /// Rate applied to the commission base, as a percentage.
    pub product_rate_pct: f64,
    /// House margin retained before the pool is split, as a percentage.
    pub margin_pct: f64,
    /// Receipts above `ape * threshold_multiplier` switch the base to receipts.
    pub threshold_multiplier: f64,
    /// Fractions of the pool per role.
    pub split: Split,
}

/// Policies indexed by product.
///
/// Later insertions for the same product replace earlier ones.
#[derive(Debug, Clone, Default)]
pub struct PolicyBook {
    policies: BTreeMap<ProductId, Policy>,
}

impl PolicyBook {
    /// An empty book.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the policy for its product.
    pub fn insert(&mut self, policy: Policy) {
        self.policies.insert(policy.product_id.clone(), policy);
    }

    /// The policy for `product_id`, if loaded.
    pub fn get(&self, product_id: &ProductId) -> Option<&Policy> {
        self.policies.get(product_id)
    }

    /// Number of products with a policy.
    pub fn len(&self) -> usize {
        self.policies.len()
    }

    /// Whether the book holds no policies.
    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }

    /// Policies in product-id order.
    pub fn iter(&self) -> impl Iterator<Item = &Policy> {
        self.policies.values()
    }
}

impl FromIterator<Policy> for PolicyBook {
    fn from_iter<I: IntoIterator<Item = Policy>>(iter: I) -> Self {
        let mut book = Self::new();
        for policy in iter {
            book.insert(policy);
        }
        book
    }
}
