use serde::{Deserialize, Serialize};

use super::text::normalize;

/// The semantic roles a header can be inferred for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRole {
    Name,
    Phone,
}

/// Candidate phrases per role, most specific first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnHints {
    pub name: Vec<String>,
    pub phone: Vec<String>,
}

impl Default for ColumnHints {
    fn default() -> Self {
        let owned = |list: &[&str]| list.iter().map(|s| s.to_string()).collect();
        Self {
            name: owned(&["ho va ten", "ten", "ho ten", "name"]),
            phone: owned(&["so dien thoai", "sdt", "dien thoai", "phone"]),
        }
    }
}

impl ColumnHints {
    pub fn candidates(&self, role: ColumnRole) -> &[String] {
        match role {
            ColumnRole::Name => &self.name,
            ColumnRole::Phone => &self.phone,
        }
    }
}

/// Headers picked for each role; `None` when nothing matched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InferredColumns {
    pub name: Option<String>,
    pub phone: Option<String>,
}

impl InferredColumns {
    pub fn get(&self, role: ColumnRole) -> Option<&str> {
        match role {
            ColumnRole::Name => self.name.as_deref(),
            ColumnRole::Phone => self.phone.as_deref(),
        }
    }
}

/// Pick the header matching the highest-priority candidate.
///
/// Candidates are tried in order; for each one the first header (in header
/// order) whose normalized text contains the normalized candidate wins. A
/// later candidate is never consulted once an earlier one matched, even if it
/// would match an earlier header.
pub fn guess_column<S: AsRef<str>>(headers: &[String], candidates: &[S]) -> Option<String> {
    let normalized: Vec<String> = headers.iter().map(|h| normalize(h)).collect();
    candidates.iter().find_map(|candidate| {
        let needle = normalize(candidate.as_ref());
        normalized
            .iter()
            .position(|h| h.contains(&needle))
            .map(|idx| headers[idx].clone())
    })
}

/// Run the inference for both roles independently.
pub fn infer_columns(headers: &[String], hints: &ColumnHints) -> InferredColumns {
    InferredColumns {
        name: guess_column(headers, hints.candidates(ColumnRole::Name)),
        phone: guess_column(headers, hints.candidates(ColumnRole::Phone)),
    }
}
