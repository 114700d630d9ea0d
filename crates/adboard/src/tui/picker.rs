//! Query builder overlay.
//!
//! One list at a time: group-by dimensions, metrics, or the values of a
//! categorical filter field as reported for the current date range. Values
//! still selected but no longer reported stay listed so they can be cleared.

use adboard_report::{Dimension, FilterField, FilterOptions, Metric, ReportQuery};

/// What the open list edits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerKind {
    Dimensions,
    Metrics,
    Filter(FilterField),
}

/// A row of the open list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerItem {
    pub label: String,
    pub checked: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Picker {
    kind: PickerKind,
    selected: usize,
}

impl Picker {
    pub fn new(kind: PickerKind) -> Self {
        Self { kind, selected: 0 }
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn title(&self) -> String {
        match self.kind {
            PickerKind::Dimensions => " Group by ".to_string(),
            PickerKind::Metrics => " Metrics ".to_string(),
            PickerKind::Filter(field) => format!(" Filter: {}  (Tab next field) ", field.label()),
        }
    }

    pub fn items(&self, query: &ReportQuery, options: &FilterOptions) -> Vec<PickerItem> {
        match self.kind {
            PickerKind::Dimensions => Dimension::ALL
                .iter()
                .map(|d| PickerItem {
                    label: d.label().to_string(),
                    checked: query.dimensions.contains(d),
                })
                .collect(),
            PickerKind::Metrics => Metric::ALL
                .iter()
                .map(|m| PickerItem {
                    label: m.label().to_string(),
                    checked: query.metrics.contains(m),
                })
                .collect(),
            PickerKind::Filter(field) => filter_values(field, query, options)
                .into_iter()
                .map(|v| PickerItem {
                    checked: query.filters.get(field).contains(&v),
                    label: v,
                })
                .collect(),
        }
    }

    pub fn up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn down(&mut self, len: usize) {
        if self.selected + 1 < len {
            self.selected += 1;
        }
    }

    /// Move a filter list to the next (or previous) field
    pub fn cycle_field(&mut self, forward: bool) {
        let PickerKind::Filter(field) = self.kind else {
            return;
        };
        let n = FilterField::ALL.len();
        let i = FilterField::ALL.iter().position(|f| *f == field).unwrap_or(0);
        let next = if forward { (i + 1) % n } else { (i + n - 1) % n };
        self.kind = PickerKind::Filter(FilterField::ALL[next]);
        self.selected = 0;
    }

    /// Flip the highlighted entry in `query`
    ///
    /// Returns false when the list is empty and nothing changed.
    pub fn toggle(&self, query: &mut ReportQuery, options: &FilterOptions) -> bool {
        match self.kind {
            PickerKind::Dimensions => match Dimension::ALL.get(self.selected) {
                Some(d) => {
                    query.toggle_dimension(*d);
                    true
                }
                None => false,
            },
            PickerKind::Metrics => match Metric::ALL.get(self.selected) {
                Some(m) => {
                    query.toggle_metric(*m);
                    true
                }
                None => false,
            },
            PickerKind::Filter(field) => {
                match filter_values(field, query, options).get(self.selected) {
                    Some(value) => {
                        query.toggle_filter_value(field, value);
                        true
                    }
                    None => false,
                }
            }
        }
    }

    /// Empty the selection this list edits; false if it was already empty
    pub fn clear(&self, query: &mut ReportQuery) -> bool {
        let changed = match self.kind {
            PickerKind::Dimensions => !query.dimensions.is_empty(),
            PickerKind::Metrics => !query.metrics.is_empty(),
            PickerKind::Filter(field) => !query.filters.get(field).is_empty(),
        };
        match self.kind {
            PickerKind::Dimensions => query.dimensions.clear(),
            PickerKind::Metrics => query.metrics.clear(),
            PickerKind::Filter(field) => query.filters.get_mut(field).clear(),
        }
        changed
    }
}

/// Reported values for `field`, then selected values the report no longer has
fn filter_values(field: FilterField, query: &ReportQuery, options: &FilterOptions) -> Vec<String> {
    let mut values = options.get(field).to_vec();
    for v in query.filters.get(field) {
        if !values.contains(v) {
            values.push(v.clone());
        }
    }
    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use adboard_report::daterange::today;

    fn options() -> FilterOptions {
        let mut options = FilterOptions::default();
        options.set(FilterField::Domains, vec!["a.com".into(), "b.com".into()]);
        options
    }

    #[test]
    fn test_dimension_list_marks_selection() {
        let query = ReportQuery::default_for(today()).with_dimension(Dimension::Domain);
        let items = Picker::new(PickerKind::Dimensions).items(&query, &options());
        assert_eq!(items.len(), Dimension::ALL.len());
        assert_eq!(
            items.iter().filter(|i| i.checked).map(|i| i.label.as_str()).collect::<Vec<_>>(),
            vec!["Domain"]
        );
    }

    #[test]
    fn test_stale_filter_value_stays_listed() {
        let query = ReportQuery::default_for(today())
            .with_filter(FilterField::Domains, vec!["gone.com".into()]);
        let picker = Picker::new(PickerKind::Filter(FilterField::Domains));
        let labels: Vec<_> = picker
            .items(&query, &options())
            .into_iter()
            .map(|i| (i.label, i.checked))
            .collect();
        assert_eq!(
            labels,
            vec![
                ("a.com".to_string(), false),
                ("b.com".to_string(), false),
                ("gone.com".to_string(), true),
            ]
        );
    }

    #[test]
    fn test_toggle_and_navigation() {
        let mut query = ReportQuery::default_for(today());
        let mut picker = Picker::new(PickerKind::Filter(FilterField::Domains));
        picker.up();
        picker.down(2);
        picker.down(2);
        assert_eq!(picker.selected(), 1);

        assert!(picker.toggle(&mut query, &options()));
        assert_eq!(query.filters.get(FilterField::Domains), ["b.com".to_string()]);

        assert!(picker.clear(&mut query));
        assert!(!picker.clear(&mut query));
        assert!(query.filters.is_empty());
    }

    #[test]
    fn test_empty_field_toggles_nothing() {
        let mut query = ReportQuery::default_for(today());
        let picker = Picker::new(PickerKind::Filter(FilterField::OsVersions));
        assert!(!picker.toggle(&mut query, &options()));
        assert_eq!(query, ReportQuery::default_for(today()));
    }

    #[test]
    fn test_cycle_field_wraps() {
        let mut picker = Picker::new(PickerKind::Filter(FilterField::OsVersions));
        picker.cycle_field(true);
        assert_eq!(picker.kind, PickerKind::Filter(FilterField::AppIds));
        picker.cycle_field(false);
        assert_eq!(picker.kind, PickerKind::Filter(FilterField::OsVersions));

        let mut dims = Picker::new(PickerKind::Dimensions);
        dims.cycle_field(true);
        assert_eq!(dims.kind, PickerKind::Dimensions);
    }
}
