//! Extra row predicates for planned statements.

use crate::catalog::{Params, Scalar};

/// Conjunction of fixed SQL predicates plus the parameters they reference.
///
/// Clauses are `&'static str` so that no runtime value can end up spliced
/// into a statement; values go through [`RowFilter::bind`].
///
/// ```
/// use eddata::planner::RowFilter;
///
/// let filter = RowFilter::new()
///     .and("population >= @minPopulation")
///     .bind("minPopulation", 1_000_000i64);
/// assert_eq!(filter.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowFilter {
    clauses: Vec<&'static str>,
    params: Params,
}

impl RowFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn and(mut self, clause: &'static str) -> Self {
        self.clauses.push(clause);
        self
    }

    /// Adds `clause` only when `condition` holds.
    pub fn and_if(self, condition: bool, clause: &'static str) -> Self {
        if condition {
            self.and(clause)
        } else {
            self
        }
    }

    pub fn bind(mut self, name: &str, value: impl Into<Scalar>) -> Self {
        self.params.insert(name, value);
        self
    }

    pub fn clauses(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.clauses.iter().copied()
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }
}
