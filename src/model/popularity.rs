//! Popularity filter trio
//!
//! Min count, top N and coverage percent describe the same cut-off from three
//! angles. Only one of them (the driver) is under user control at a time; the
//! other two are read-only and refreshed from the server's derived values.

use super::api::PopularitySummary;
use super::filters::NamesFilterParams;
use regex::Regex;
use std::sync::LazyLock;

static INTEGER_INPUT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{0,12}$").unwrap());

static PERCENT_INPUT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{0,3}(\.\d{0,2})?$").unwrap());

/// One of the three popularity fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PopularityField {
    MinCount,
    TopN,
    CoveragePercent,
}

impl PopularityField {
    pub fn all() -> [PopularityField; 3] {
        [
            PopularityField::MinCount,
            PopularityField::TopN,
            PopularityField::CoveragePercent,
        ]
    }

    /// Wire name, as used in query strings and `active_driver`
    pub fn as_str(&self) -> &'static str {
        match self {
            PopularityField::MinCount => "min_count",
            PopularityField::TopN => "top_n",
            PopularityField::CoveragePercent => "coverage_percent",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PopularityField::MinCount => "Min count",
            PopularityField::TopN => "Top N",
            PopularityField::CoveragePercent => "Coverage %",
        }
    }

    pub fn parse(value: &str) -> Option<PopularityField> {
        Self::all().into_iter().find(|f| f.as_str() == value)
    }

    /// Whether `text` could still become a valid value for this field
    pub fn accepts_partial(&self, text: &str) -> bool {
        match self {
            PopularityField::CoveragePercent => PERCENT_INPUT.is_match(text),
            _ => INTEGER_INPUT.is_match(text),
        }
    }
}

/// Result of an edit attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// The value was stored and the field is (still) the driver
    Applied,
    /// The value was cleared and no field drives any more
    Released,
    /// Another field is driving; nothing changed
    ReadOnly,
    /// The text is not a valid value for the field; nothing changed
    Invalid,
}

/// State of the three mutually exclusive popularity filters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PopularityFilter {
    min_count: Option<u64>,
    top_n: Option<u64>,
    coverage_percent: Option<f64>,
    driver: Option<PopularityField>,
}

impl PopularityFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn driver(&self) -> Option<PopularityField> {
        self.driver
    }

    /// A field is editable when nothing drives, or when it is the driver
    pub fn is_editable(&self, field: PopularityField) -> bool {
        match self.driver {
            None => true,
            Some(driver) => driver == field,
        }
    }

    pub fn edit_min_count(&mut self, value: Option<u64>) -> EditOutcome {
        self.edit(PopularityField::MinCount, value.map(|v| v as f64))
    }

    pub fn edit_top_n(&mut self, value: Option<u64>) -> EditOutcome {
        if value == Some(0) {
            return EditOutcome::Invalid;
        }
        self.edit(PopularityField::TopN, value.map(|v| v as f64))
    }

    pub fn edit_coverage_percent(&mut self, value: Option<f64>) -> EditOutcome {
        if let Some(v) = value {
            if !(0.0..=100.0).contains(&v) {
                return EditOutcome::Invalid;
            }
        }
        self.edit(PopularityField::CoveragePercent, value)
    }

    /// Edit a field from raw text input; an empty string clears it
    pub fn edit_text(&mut self, field: PopularityField, text: &str) -> EditOutcome {
        let text = text.trim();
        if !self.is_editable(field) {
            return EditOutcome::ReadOnly;
        }
        if text.is_empty() {
            return self.edit(field, None);
        }
        match field {
            PopularityField::MinCount => match text.parse::<u64>() {
                Ok(v) => self.edit_min_count(Some(v)),
                Err(_) => EditOutcome::Invalid,
            },
            PopularityField::TopN => match text.parse::<u64>() {
                Ok(v) => self.edit_top_n(Some(v)),
                Err(_) => EditOutcome::Invalid,
            },
            PopularityField::CoveragePercent => match text.trim_end_matches('.').parse::<f64>() {
                Ok(v) => self.edit_coverage_percent(Some(v)),
                Err(_) => EditOutcome::Invalid,
            },
        }
    }

    fn edit(&mut self, field: PopularityField, value: Option<f64>) -> EditOutcome {
        if !self.is_editable(field) {
            return EditOutcome::ReadOnly;
        }

        match value {
            Some(v) => {
                self.driver = Some(field);
                match field {
                    PopularityField::MinCount => self.min_count = Some(v as u64),
                    PopularityField::TopN => self.top_n = Some(v as u64),
                    PopularityField::CoveragePercent => self.coverage_percent = Some(v),
                }
                EditOutcome::Applied
            }
            None => {
                self.clear();
                EditOutcome::Released
            }
        }
    }

    /// Drop the driver and all three values
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Refresh the non-driver fields from a server response
    ///
    /// The driver's own value is never overwritten. Without a driver
    /// nothing changes.
    pub fn apply_summary(&mut self, summary: &PopularitySummary) {
        let Some(driver) = self.driver else {
            return;
        };
        if driver != PopularityField::MinCount {
            self.min_count = Some(summary.derived_min_count);
        }
        if driver != PopularityField::TopN {
            self.top_n = Some(summary.derived_top_n);
        }
        if driver != PopularityField::CoveragePercent {
            self.coverage_percent = Some(summary.derived_coverage_percent);
        }
    }

    /// Write the driver's value into request params; non-driver values are never sent
    pub fn apply_to(&self, params: &mut NamesFilterParams) {
        params.min_count = None;
        params.top_n = None;
        params.coverage_percent = None;
        match self.driver {
            Some(PopularityField::MinCount) => params.min_count = self.min_count,
            Some(PopularityField::TopN) => params.top_n = self.top_n,
            Some(PopularityField::CoveragePercent) => params.coverage_percent = self.coverage_percent,
            None => {}
        }
    }

    /// Display text for a field
    pub fn display_value(&self, field: PopularityField) -> String {
        match field {
            PopularityField::MinCount => self.min_count.map(|v| v.to_string()),
            PopularityField::TopN => self.top_n.map(|v| v.to_string()),
            PopularityField::CoveragePercent => self.coverage_percent.map(|v| format!("{:.1}", v)),
        }
        .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary() -> PopularitySummary {
        PopularitySummary {
            population_total: 1_000_000,
            active_driver: Some("top_n".to_string()),
            active_value: Some(100.0),
            derived_min_count: 1234,
            derived_top_n: 100,
            derived_coverage_percent: 87.5,
        }
    }

    fn editable_count(filter: &PopularityFilter) -> usize {
        PopularityField::all()
            .iter()
            .filter(|f| filter.is_editable(**f))
            .count()
    }

    #[test]
    fn test_all_editable_without_driver() {
        let filter = PopularityFilter::new();
        assert_eq!(filter.driver(), None);
        assert_eq!(editable_count(&filter), 3);
    }

    #[test]
    fn test_editing_sets_driver_and_locks_others() {
        for field in PopularityField::all() {
            let mut filter = PopularityFilter::new();
            assert_eq!(filter.edit_text(field, "50"), EditOutcome::Applied);
            assert_eq!(filter.driver(), Some(field));
            assert_eq!(editable_count(&filter), 1);
            assert!(filter.is_editable(field));
        }
    }

    #[test]
    fn test_non_driver_edit_is_rejected() {
        let mut filter = PopularityFilter::new();
        filter.edit_min_count(Some(500));

        assert_eq!(filter.edit_top_n(Some(10)), EditOutcome::ReadOnly);
        assert_eq!(filter.edit_text(PopularityField::CoveragePercent, "20"), EditOutcome::ReadOnly);
        assert_eq!(filter.driver(), Some(PopularityField::MinCount));
        assert_eq!(filter.top_n, None);
    }

    #[test]
    fn test_clearing_driver_releases_all() {
        let mut filter = PopularityFilter::new();
        filter.edit_top_n(Some(100));
        filter.apply_summary(&summary());
        assert_eq!(filter.min_count, Some(1234));

        assert_eq!(filter.edit_text(PopularityField::TopN, ""), EditOutcome::Released);
        assert_eq!(filter.driver(), None);
        assert_eq!(filter.min_count, None);
        assert_eq!(filter.coverage_percent, None);
        assert_eq!(editable_count(&filter), 3);
    }

    #[test]
    fn test_summary_fills_only_derived_fields() {
        let mut filter = PopularityFilter::new();
        filter.edit_top_n(Some(50));
        filter.apply_summary(&summary());

        assert_eq!(filter.top_n, Some(50));
        assert_eq!(filter.min_count, Some(1234));
        assert_eq!(filter.coverage_percent, Some(87.5));
    }

    #[test]
    fn test_summary_ignored_without_driver() {
        let mut filter = PopularityFilter::new();
        filter.apply_summary(&summary());
        assert_eq!(filter, PopularityFilter::new());
    }

    #[test]
    fn test_only_driver_is_sent() {
        let mut filter = PopularityFilter::new();
        filter.edit_coverage_percent(Some(90.0));
        filter.apply_summary(&summary());

        let mut params = NamesFilterParams {
            min_count: Some(1),
            top_n: Some(2),
            ..Default::default()
        };
        filter.apply_to(&mut params);

        assert_eq!(params.coverage_percent, Some(90.0));
        assert_eq!(params.min_count, None);
        assert_eq!(params.top_n, None);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut filter = PopularityFilter::new();
        assert_eq!(filter.edit_top_n(Some(0)), EditOutcome::Invalid);
        assert_eq!(filter.edit_coverage_percent(Some(120.0)), EditOutcome::Invalid);
        assert_eq!(filter.edit_text(PopularityField::MinCount, "abc"), EditOutcome::Invalid);
        assert_eq!(filter.driver(), None);
    }

    #[test]
    fn test_partial_input_validation() {
        assert!(PopularityField::MinCount.accepts_partial("120"));
        assert!(!PopularityField::MinCount.accepts_partial("1.5"));
        assert!(PopularityField::CoveragePercent.accepts_partial("12."));
        assert!(PopularityField::CoveragePercent.accepts_partial("12.5"));
        assert!(!PopularityField::CoveragePercent.accepts_partial("12.555"));
        assert!(!PopularityField::TopN.accepts_partial("-1"));
    }

    #[test]
    fn test_parse_wire_names() {
        assert_eq!(PopularityField::parse("top_n"), Some(PopularityField::TopN));
        assert_eq!(PopularityField::parse("other"), None);
    }
}
