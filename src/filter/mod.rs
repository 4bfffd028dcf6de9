use std::fmt;

use itertools::Itertools;
use serde::Serialize;
use thiserror::Error;

use crate::store::{TowerRecord, TowerStatus, TowerType};

/// Sentinel accepted by every selector meaning "no constraint on this dimension".
pub const ALL: &str = "all";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Selector<T> {
    All,
    Only(T),
}

impl<T> Default for Selector<T> {
    fn default() -> Self {
        Selector::All
    }
}

impl<T: PartialEq> Selector<T> {
    pub fn admits(&self, value: &T) -> bool {
        match self {
            Selector::All => true,
            Selector::Only(wanted) => wanted == value,
        }
    }
}

impl<T: fmt::Display> fmt::Display for Selector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::All => f.write_str(ALL),
            Selector::Only(v) => write!(f, "{v}"),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectorError {
    #[error("unknown tower type '{value}', expected one of: all, {expected}")]
    UnknownType { value: String, expected: String },

    #[error("unknown status '{value}', expected one of: all, {expected}")]
    UnknownStatus { value: String, expected: String },
}

pub fn parse_region(value: &str) -> Selector<String> {
    if value == ALL {
        Selector::All
    } else {
        Selector::Only(value.to_string())
    }
}

pub fn parse_tower_type(value: &str) -> Result<Selector<TowerType>, SelectorError> {
    if value == ALL {
        return Ok(Selector::All);
    }
    TowerType::from_label(value)
        .map(Selector::Only)
        .ok_or_else(|| SelectorError::UnknownType {
            value: value.to_string(),
            expected: TowerType::ALL.iter().map(|t| t.label()).join(", "),
        })
}

pub fn parse_status(value: &str) -> Result<Selector<TowerStatus>, SelectorError> {
    if value == ALL {
        return Ok(Selector::All);
    }
    TowerStatus::from_label(value)
        .map(Selector::Only)
        .ok_or_else(|| SelectorError::UnknownStatus {
            value: value.to_string(),
            expected: TowerStatus::ALL.iter().map(|s| s.label()).join(", "),
        })
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct FilterCriteria {
    pub region: Selector<String>,
    pub tower_type: Selector<TowerType>,
    pub status: Selector<TowerStatus>,
}

impl FilterCriteria {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn matches(&self, record: &TowerRecord) -> bool {
        self.region.admits(&record.city)
            && self.tower_type.admits(&record.tower_type)
            && self.status.admits(&record.status)
    }
}

impl fmt::Display for FilterCriteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "region={} type={} status={}",
            self.region, self.tower_type, self.status
        )
    }
}

/// Records matching one `FilterCriteria`, in store order. Holds shared borrows only.
#[derive(Clone, Debug, Default)]
pub struct FilteredView<'a> {
    records: Vec<&'a TowerRecord>,
}

impl<'a> FilteredView<'a> {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a TowerRecord> + '_ {
        self.records.iter().copied()
    }
}

impl<'v, 'a> IntoIterator for &'v FilteredView<'a> {
    type Item = &'a TowerRecord;
    type IntoIter = std::iter::Copied<std::slice::Iter<'v, &'a TowerRecord>>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter().copied()
    }
}

/// Keeps every record that satisfies all three selectors. Accepts a whole store slice or
/// an existing view, so re-filtering a view is the same operation.
pub fn evaluate<'a, I>(records: I, criteria: &FilterCriteria) -> FilteredView<'a>
where
    I: IntoIterator<Item = &'a TowerRecord>,
{
    FilteredView {
        records: records
            .into_iter()
            .filter(|r| criteria.matches(r))
            .collect(),
    }
}

/// Values offered by the three filter controls, each led by the "all" sentinel.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    pub regions: Vec<String>,
    pub tower_types: Vec<String>,
    pub statuses: Vec<String>,
}

impl FilterOptions {
    pub fn from_records(records: &[TowerRecord]) -> Self {
        let lead = || std::iter::once(ALL.to_string());
        Self {
            regions: lead()
                .chain(records.iter().map(|r| r.city.clone()).unique())
                .collect(),
            tower_types: lead()
                .chain(
                    records
                        .iter()
                        .map(|r| r.tower_type)
                        .unique()
                        .map(|t| t.label().to_string()),
                )
                .collect(),
            statuses: lead()
                .chain(
                    records
                        .iter()
                        .map(|r| r.status)
                        .unique()
                        .map(|s| s.label().to_string()),
                )
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::TowerStore;

    fn ids(view: &FilteredView<'_>) -> Vec<String> {
        view.iter().map(|r| r.id.clone()).collect()
    }

    #[test]
    fn all_selectors_return_full_store_in_order() {
        let store = TowerStore::sample();
        let view = evaluate(store.records(), &FilterCriteria::all());
        let expected: Vec<String> = store.records().iter().map(|r| r.id.clone()).collect();
        assert_eq!(ids(&view), expected);
    }

    #[test]
    fn region_match_is_case_sensitive() {
        let store = TowerStore::sample();
        let criteria = FilterCriteria {
            region: parse_region("delhi"),
            ..FilterCriteria::all()
        };
        assert!(evaluate(store.records(), &criteria).is_empty());
    }

    #[test]
    fn selectors_combine_with_and() {
        let store = TowerStore::sample();
        let criteria = FilterCriteria {
            region: Selector::All,
            tower_type: Selector::Only(TowerType::Sst),
            status: Selector::Only(TowerStatus::Active),
        };
        let view = evaluate(store.records(), &criteria);
        assert_eq!(ids(&view), vec!["I-KA-MGDI-ENB-0018".to_string()]);
    }

    #[test]
    fn filter_is_sound_and_complete_for_every_option_combination() {
        let store = TowerStore::sample();
        let options = FilterOptions::from_records(store.records());
        for region in options.regions.iter() {
            for tower_type in options.tower_types.iter() {
                for status in options.statuses.iter() {
                    let criteria = FilterCriteria {
                        region: parse_region(region),
                        tower_type: parse_tower_type(tower_type).unwrap(),
                        status: parse_status(status).unwrap(),
                    };
                    let view = evaluate(store.records(), &criteria);
                    assert!(view.iter().all(|r| criteria.matches(r)));
                    let expected = store.records().iter().filter(|r| criteria.matches(r)).count();
                    assert_eq!(view.len(), expected);
                }
            }
        }
    }

    #[test]
    fn refiltering_a_view_is_idempotent() {
        let store = TowerStore::sample();
        let criteria = FilterCriteria {
            tower_type: Selector::Only(TowerType::Sst),
            ..FilterCriteria::all()
        };
        let once = evaluate(store.records(), &criteria);
        let twice = evaluate(&once, &criteria);
        assert_eq!(ids(&once), ids(&twice));
    }

    #[test]
    fn unknown_labels_are_rejected() {
        assert!(matches!(
            parse_tower_type("sst"),
            Err(SelectorError::UnknownType { .. })
        ));
        assert!(matches!(
            parse_status("Broken"),
            Err(SelectorError::UnknownStatus { .. })
        ));
        assert_eq!(parse_status("all"), Ok(Selector::All));
    }

    #[test]
    fn options_list_distinct_values_in_store_order() {
        let store = TowerStore::sample();
        let options = FilterOptions::from_records(store.records());
        assert_eq!(
            options.regions,
            vec!["all", "Mumbai", "Delhi", "Bangalore", "Chennai"]
        );
        assert_eq!(options.tower_types, vec!["all", "SST", "Monopole", "TPL"]);
        assert_eq!(
            options.statuses,
            vec!["all", "Active", "Under Maintenance", "Non-functional"]
        );
    }
}
