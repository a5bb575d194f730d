use super::model::Row;
use super::phone::{extract_digits_str, is_valid, local_digits, to_local_ten_digits};
use super::text::normalize;

// ---------------------------------------------------------------------------
// Filter criteria
// ---------------------------------------------------------------------------

/// Which tab is active: every row, or only rows whose phone is invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterMode {
    #[default]
    All,
    InvalidOnly,
}

/// The user's current filter selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCriteria {
    pub mode: FilterMode,
    /// Ignored while `mode` is [`FilterMode::InvalidOnly`].
    pub only_valid_phones: bool,
    pub name_query: String,
    pub phone_query: String,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            mode: FilterMode::All,
            only_valid_phones: true,
            name_query: String::new(),
            phone_query: String::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Row predicates
// ---------------------------------------------------------------------------

/// Query text folded once per pass instead of once per row.
struct PreparedQuery<'a> {
    criteria: &'a FilterCriteria,
    name: Option<String>,
    phone: Option<String>,
    phone_column: &'a str,
    name_column: &'a str,
}

impl<'a> PreparedQuery<'a> {
    fn new(
        criteria: &'a FilterCriteria,
        phone_column: Option<&'a str>,
        name_column: Option<&'a str>,
    ) -> Self {
        let name = (!criteria.name_query.is_empty()).then(|| normalize(&criteria.name_query));
        let phone = (!criteria.phone_query.is_empty())
            .then(|| to_local_ten_digits(&extract_digits_str(&criteria.phone_query)));
        Self {
            criteria,
            name,
            phone,
            // An uninferred column looks up the empty key, which no row has.
            phone_column: phone_column.unwrap_or(""),
            name_column: name_column.unwrap_or(""),
        }
    }

    fn phone_mode_pass(&self, row: &Row) -> bool {
        let valid = || is_valid(row.get(self.phone_column));
        match self.criteria.mode {
            FilterMode::InvalidOnly => !valid(),
            FilterMode::All if self.criteria.only_valid_phones => valid(),
            FilterMode::All => true,
        }
    }

    fn name_pass(&self, row: &Row) -> bool {
        match &self.name {
            Some(query) => normalize(&row.text(self.name_column)).contains(query.as_str()),
            None => true,
        }
    }

    fn phone_search_pass(&self, row: &Row) -> bool {
        match &self.phone {
            Some(query) => local_digits(row.get(self.phone_column)).contains(query.as_str()),
            None => true,
        }
    }

    fn matches(&self, row: &Row) -> bool {
        self.phone_mode_pass(row) && self.name_pass(row) && self.phone_search_pass(row)
    }
}

/// Return indices of rows passing all criteria, in input order.
///
/// A row passes when:
/// * the phone-mode check holds (invalid tab → phone invalid; otherwise the
///   valid-only toggle → phone valid)
/// * the folded name cell contains the folded name query, if any
/// * the local digits of the phone cell contain those of the phone query,
///   if any
pub fn filtered_indices(
    rows: &[Row],
    criteria: &FilterCriteria,
    phone_column: Option<&str>,
    name_column: Option<&str>,
) -> Vec<usize> {
    let query = PreparedQuery::new(criteria, phone_column, name_column);
    rows.iter()
        .enumerate()
        .filter(|(_, row)| query.matches(row))
        .map(|(i, _)| i)
        .collect()
}

/// Same as [`filtered_indices`] but yielding the rows themselves.
pub fn filter_rows<'r>(
    rows: &'r [Row],
    criteria: &FilterCriteria,
    phone_column: Option<&str>,
    name_column: Option<&str>,
) -> Vec<&'r Row> {
    let query = PreparedQuery::new(criteria, phone_column, name_column);
    rows.iter().filter(|row| query.matches(row)).collect()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::data::model::{CellValue, Provenance};

    fn row(name: &str, phone: &str) -> Row {
        let mut cells = BTreeMap::new();
        cells.insert("Name".to_string(), CellValue::from(name));
        cells.insert("Phone".to_string(), CellValue::from(phone));
        Row::new(cells, Provenance::default())
    }

    fn sample() -> Vec<Row> {
        vec![row("Nguyễn Văn A", "+84901234567"), row("Trần B", "0123456789")]
    }

    fn criteria(only_valid: bool) -> FilterCriteria {
        FilterCriteria {
            only_valid_phones: only_valid,
            ..FilterCriteria::default()
        }
    }

    const PHONE: Option<&str> = Some("Phone");
    const NAME: Option<&str> = Some("Name");

    #[test]
    fn valid_only_keeps_allowlisted_numbers() {
        let rows = sample();
        assert_eq!(filtered_indices(&rows, &criteria(true), PHONE, NAME), vec![0]);
    }

    #[test]
    fn no_constraints_keeps_everything() {
        let rows = sample();
        assert_eq!(filtered_indices(&rows, &criteria(false), PHONE, NAME), vec![0, 1]);
    }

    #[test]
    fn invalid_mode_overrides_valid_toggle() {
        let rows = sample();
        let c = FilterCriteria {
            mode: FilterMode::InvalidOnly,
            only_valid_phones: true,
            ..FilterCriteria::default()
        };
        assert_eq!(filtered_indices(&rows, &c, PHONE, NAME), vec![1]);
    }

    #[test]
    fn phone_search_matches_local_digits() {
        let rows = sample();
        let c = FilterCriteria {
            phone_query: "901234".to_string(),
            ..criteria(false)
        };
        assert_eq!(filtered_indices(&rows, &c, PHONE, NAME), vec![0]);

        let c = FilterCriteria {
            phone_query: "+84 901 234 567".to_string(),
            ..criteria(false)
        };
        assert_eq!(filtered_indices(&rows, &c, PHONE, NAME), vec![0]);
    }

    #[test]
    fn phone_search_ignores_validity_when_toggle_off() {
        let rows = sample();
        let c = FilterCriteria {
            phone_query: "6789".to_string(),
            ..criteria(false)
        };
        assert_eq!(filtered_indices(&rows, &c, PHONE, NAME), vec![1]);
    }

    #[test]
    fn name_search_is_accent_and_case_insensitive() {
        let rows = sample();
        let c = FilterCriteria {
            name_query: "  NGUYEN van".to_string(),
            ..criteria(false)
        };
        assert_eq!(filtered_indices(&rows, &c, PHONE, NAME), vec![0]);

        let c = FilterCriteria {
            name_query: "trần".to_string(),
            ..criteria(false)
        };
        assert_eq!(filtered_indices(&rows, &c, PHONE, NAME), vec![1]);
    }

    #[test]
    fn punctuation_only_phone_query_matches_everything() {
        let rows = sample();
        let c = FilterCriteria {
            phone_query: "--".to_string(),
            ..criteria(false)
        };
        assert_eq!(filtered_indices(&rows, &c, PHONE, NAME), vec![0, 1]);
    }

    #[test]
    fn missing_columns_degrade_gracefully() {
        let rows = sample();
        assert!(filtered_indices(&rows, &criteria(true), None, None).is_empty());
        assert_eq!(filtered_indices(&rows, &criteria(false), None, None), vec![0, 1]);

        let c = FilterCriteria {
            mode: FilterMode::InvalidOnly,
            ..criteria(false)
        };
        assert_eq!(filtered_indices(&rows, &c, None, None), vec![0, 1]);

        // Searching an uninferred name column compares against "".
        let c = FilterCriteria {
            name_query: "a".to_string(),
            ..criteria(false)
        };
        assert!(filtered_indices(&rows, &c, PHONE, None).is_empty());
    }

    #[test]
    fn filtering_is_stable_and_deterministic() {
        let rows = vec![
            row("A", "0901111111"),
            row("B", "bad"),
            row("C", "0912222222"),
            row("D", "84981234567"),
        ];
        let c = criteria(true);
        let first = filter_rows(&rows, &c, PHONE, NAME);
        let second = filter_rows(&rows, &c, PHONE, NAME);
        assert_eq!(first, second);
        let names: Vec<String> = first.iter().map(|r| r.text("Name")).collect();
        assert_eq!(names, vec!["A", "C", "D"]);
    }

    #[test]
    fn empty_input_gives_empty_output() {
        assert!(filtered_indices(&[], &criteria(true), PHONE, NAME).is_empty());
    }
}
