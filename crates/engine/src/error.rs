//! The module contains the errors the engine can throw.
//!
//! The errors are:
//!
//! - [`KeyNotFound`] thrown when a record with the given id does not exist.
//! - [`ExistingKey`] thrown when a unique name is already taken.
//! - [`CategoryInUse`] / [`CategoryHasBudgets`] thrown when a category is
//!   still referenced and cannot be deleted.
//! - [`Validation`] thrown when the input is malformed, listing every
//!   offending field.
//!
//!  [`KeyNotFound`]: EngineError::KeyNotFound
//!  [`ExistingKey`]: EngineError::ExistingKey
//!  [`CategoryInUse`]: EngineError::CategoryInUse
//!  [`CategoryHasBudgets`]: EngineError::CategoryHasBudgets
//!  [`Validation`]: EngineError::Validation
use std::fmt;

use sea_orm::DbErr;
use serde::Serialize;
use thiserror::Error;

/// A single rejected input field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FieldIssue {
    pub field: String,
    pub message: String,
}

impl FieldIssue {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn join_issues(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("{entity} with id {id} not found")]
    KeyNotFound { entity: &'static str, id: i64 },
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    #[error("cannot delete category {category_id}: {transactions} transaction(s) still reference it")]
    CategoryInUse { category_id: i64, transactions: u64 },
    #[error("cannot delete category {category_id}: {budgets} budget(s) still reference it")]
    CategoryHasBudgets { category_id: i64, budgets: u64 },
    #[error("invalid input: {}", join_issues(.0))]
    Validation(Vec<FieldIssue>),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl EngineError {
    /// Shorthand for a validation failure on one field.
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation(vec![FieldIssue::new(field, message)])
    }

    /// Fields rejected by a validation failure (empty for other errors).
    pub fn fields(&self) -> &[FieldIssue] {
        match self {
            Self::Validation(issues) => issues,
            _ => &[],
        }
    }
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                Self::KeyNotFound { entity: a, id: x },
                Self::KeyNotFound { entity: b, id: y },
            ) => a == b && x == y,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (
                Self::CategoryInUse {
                    category_id: a,
                    transactions: x,
                },
                Self::CategoryInUse {
                    category_id: b,
                    transactions: y,
                },
            ) => a == b && x == y,
            (
                Self::CategoryHasBudgets {
                    category_id: a,
                    budgets: x,
                },
                Self::CategoryHasBudgets {
                    category_id: b,
                    budgets: y,
                },
            ) => a == b && x == y,
            (Self::Validation(a), Self::Validation(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}

/// Collects field issues so one request reports every bad field at once.
#[derive(Debug, Default)]
pub(crate) struct Issues(Vec<FieldIssue>);

impl Issues {
    pub(crate) fn push(&mut self, field: &str, message: impl Into<String>) {
        self.0.push(FieldIssue::new(field, message));
    }

    /// Records the error of `result` (if any) and returns its value, or a
    /// placeholder that [`Issues::finish`] guarantees is never used.
    pub(crate) fn take<T: Default>(&mut self, result: Result<T, EngineError>) -> T {
        match result {
            Ok(value) => value,
            Err(EngineError::Validation(issues)) => {
                self.0.extend(issues);
                T::default()
            }
            Err(other) => {
                self.0.push(FieldIssue::new("input", other.to_string()));
                T::default()
            }
        }
    }

    pub(crate) fn finish(self) -> Result<(), EngineError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(EngineError::Validation(self.0))
        }
    }
}
