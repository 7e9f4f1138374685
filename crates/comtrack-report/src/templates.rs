//! # Report Templates
//!
//! A template is a saved reporting selection: a named period plus an
//! optional advisor filter. Applied at an anchor month it yields the rollup
//! options and the dense month axis for a chart.

use chrono::{DateTime, Utc};
use comtrack_core::{MonthKey, Payment};
use comtrack_engine::{
    date_range_at, fill_month_gaps, months_in_range, rollup_monthly, Period, RollupOptions,
    TimeSeriesData,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A saved report selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportTemplate {
    pub id: Uuid,
    pub name: String,
    pub period: Period,
    #[serde(default)]
    pub advisor_filter: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl ReportTemplate {
    /// A template covering `period` for every advisor.
    pub fn new(name: impl Into<String>, period: Period) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            period,
            advisor_filter: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Builder: restrict to an advisor identity.
    pub fn with_advisor(mut self, identity: impl Into<String>) -> Self {
        self.advisor_filter.push(identity.into());
        self
    }

    /// Rollup options for this template at `anchor`.
    pub fn options_at(&self, anchor: MonthKey) -> RollupOptions {
        RollupOptions {
            advisor_filter: self.advisor_filter.clone(),
            ..RollupOptions::default()
        }
        .within(date_range_at(self.period, anchor))
    }

    /// Every month the template covers at `anchor`, oldest first.
    pub fn months_at(&self, anchor: MonthKey) -> Vec<MonthKey> {
        months_in_range(date_range_at(self.period, anchor))
    }

    /// The dense monthly series for `payments` at `anchor`.
    pub fn render_at(&self, payments: &[Payment], anchor: MonthKey) -> Vec<TimeSeriesData> {
        let sparse = rollup_monthly(payments, &self.options_at(anchor));
        fill_month_gaps(&sparse, &self.months_at(anchor))
    }
}

/// Storage for report templates.
pub trait TemplateRepository {
    /// Insert or replace a template by id. Returns the replaced template.
    fn save(&mut self, template: ReportTemplate) -> Option<ReportTemplate>;

    /// The template with `id`.
    fn get(&self, id: Uuid) -> Option<ReportTemplate>;

    /// All templates in insertion order.
    fn list(&self) -> Vec<ReportTemplate>;

    /// Delete and return the template with `id`.
    fn remove(&mut self, id: Uuid) -> Option<ReportTemplate>;
}

/// In-memory template store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTemplates {
    templates: Vec<ReportTemplate>,
}

impl InMemoryTemplates {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl TemplateRepository for InMemoryTemplates {
    fn save(&mut self, template: ReportTemplate) -> Option<ReportTemplate> {
        match self.templates.iter_mut().find(|t| t.id == template.id) {
            Some(existing) => Some(std::mem::replace(existing, template)),
            None => {
                self.templates.push(template);
                None
            }
        }
    }

    fn get(&self, id: Uuid) -> Option<ReportTemplate> {
        self.templates.iter().find(|t| t.id == id).cloned()
    }

    fn list(&self) -> Vec<ReportTemplate> {
        self.templates.clone()
    }

    fn remove(&mut self, id: Uuid) -> Option<ReportTemplate> {
        let index = self.templates.iter().position(|t| t.id == id)?;
        Some(self.templates.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn key(s: &str) -> MonthKey {
        s.parse().unwrap()
    }

    #[test]
    fn options_follow_period_and_advisors() {
        let template = ReportTemplate::new("Q", Period::Last3Months).with_advisor("ana@example.com");
        let options = template.options_at(key("2025-02"));
        assert_eq!(options.from, Some(key("2024-12")));
        assert_eq!(options.to, Some(key("2025-02")));
        assert_eq!(options.advisor_filter, vec!["ana@example.com".to_string()]);
    }

    #[test]
    fn render_is_dense_over_period() {
        let payments = vec![
            Payment::new("a", "LIFE", 1_000.0, 0.0)
                .with_date(NaiveDate::from_ymd_opt(2025, 1, 10).unwrap())
                .with_commission(50.0),
            Payment::new("b", "LIFE", 1_000.0, 0.0)
                .with_date(NaiveDate::from_ymd_opt(2024, 6, 10).unwrap()),
        ];
        let series = ReportTemplate::new("YTD", Period::Ytd).render_at(&payments, key("2025-03"));
        let months: Vec<String> = series.iter().map(|r| r.month.to_string()).collect();
        assert_eq!(months, vec!["2025-01", "2025-02", "2025-03"]);
        assert_eq!(series[0].count, 1);
        assert_eq!(series[0].total_commission, 50.0);
        assert_eq!(series[1].count, 0);
        assert_eq!(series[2].count, 0);
    }

    #[test]
    fn repository_save_get_list_remove() {
        let mut repo = InMemoryTemplates::new();
        let first = ReportTemplate::new("Monthly", Period::ThisMonth);
        let second = ReportTemplate::new("Half year", Period::Last6Months);
        assert!(repo.save(first.clone()).is_none());
        assert!(repo.save(second.clone()).is_none());

        let mut renamed = first.clone();
        renamed.name = "This month".into();
        assert_eq!(repo.save(renamed.clone()), Some(first.clone()));

        let names: Vec<String> = repo.list().into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["This month", "Half year"]);
        assert_eq!(repo.get(second.id), Some(second.clone()));

        assert_eq!(repo.remove(second.id), Some(second.clone()));
        assert!(repo.get(second.id).is_none());
        assert!(repo.remove(second.id).is_none());
    }
}
