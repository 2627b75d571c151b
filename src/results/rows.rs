use serde_json::{Map, Value as JsonValue};

use super::result_set::ResultSet;
use crate::types::FetchMode;

/// A row fetched in [`FetchMode::Assoc`].
pub type AssocRow = Map<String, JsonValue>;

/// Caller-facing rows, shaped according to the connection's fetch mode.
#[derive(Debug, Clone)]
pub enum Rows {
    Structured(ResultSet),
    Assoc(Vec<AssocRow>),
}

impl Rows {
    /// An empty result in the requested shape.
    #[must_use]
    pub fn empty(mode: FetchMode) -> Self {
        match mode {
            FetchMode::Structured => Rows::Structured(ResultSet::default()),
            FetchMode::Assoc => Rows::Assoc(Vec::new()),
        }
    }

    /// Convert a raw result set into the requested shape.
    #[must_use]
    pub fn from_result_set(result_set: ResultSet, mode: FetchMode) -> Self {
        match mode {
            FetchMode::Structured => Rows::Structured(result_set),
            FetchMode::Assoc => Rows::Assoc(
                result_set
                    .iter()
                    .map(|row| {
                        row.iter()
                            .map(|(name, value)| (name.to_string(), value.to_json()))
                            .collect()
                    })
                    .collect(),
            ),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Rows::Structured(rs) => rs.len(),
            Rows::Assoc(rows) => rows.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Keep at most `len` rows.
    pub fn truncate(&mut self, len: usize) {
        match self {
            Rows::Structured(rs) => rs.results.truncate(len),
            Rows::Assoc(rows) => rows.truncate(len),
        }
    }

    #[must_use]
    pub fn fetch_mode(&self) -> FetchMode {
        match self {
            Rows::Structured(_) => FetchMode::Structured,
            Rows::Assoc(_) => FetchMode::Assoc,
        }
    }

    #[must_use]
    pub fn as_result_set(&self) -> Option<&ResultSet> {
        match self {
            Rows::Structured(rs) => Some(rs),
            Rows::Assoc(_) => None,
        }
    }

    #[must_use]
    pub fn into_result_set(self) -> Option<ResultSet> {
        match self {
            Rows::Structured(rs) => Some(rs),
            Rows::Assoc(_) => None,
        }
    }

    #[must_use]
    pub fn as_assoc(&self) -> Option<&[AssocRow]> {
        match self {
            Rows::Structured(_) => None,
            Rows::Assoc(rows) => Some(rows),
        }
    }
}
