//! Input structs for engine write operations.
//!
//! `*New` types carry every field a record needs at creation; `*Patch` types
//! carry only the fields a caller wants to change.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};

use crate::{Money, TransactionKind};

/// One field of a partial update.
///
/// Missing fields deserialize as [`Patch::Absent`] (when the field is marked
/// `#[serde(default)]`), an explicit `null` as [`Patch::Null`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Patch<T> {
    #[default]
    Absent,
    Null,
    Value(T),
}

impl<T> Patch<T> {
    #[must_use]
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Resolves the patch against the stored value.
    #[must_use]
    pub fn apply(self, existing: Option<T>) -> Option<T> {
        match self {
            Self::Absent => existing,
            Self::Null => None,
            Self::Value(value) => Some(value),
        }
    }
}

impl<T> From<Option<T>> for Patch<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Self::Value(value),
            None => Self::Null,
        }
    }
}

impl<'de, T> Deserialize<'de> for Patch<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<T>::deserialize(deserializer).map(Patch::from)
    }
}

/// Create a category.
#[derive(Clone, Debug)]
pub struct CategoryNew {
    pub name: String,
    pub description: Option<String>,
}

/// Partially update a category.
#[derive(Clone, Debug, Default)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub description: Patch<String>,
}

/// Create an income or expense transaction.
#[derive(Clone, Debug)]
pub struct TransactionNew {
    pub amount: Money,
    pub kind: TransactionKind,
    pub description: Option<String>,
    pub date: NaiveDate,
    pub category_id: i64,
}

/// Partially update a transaction.
#[derive(Clone, Debug, Default)]
pub struct TransactionPatch {
    pub amount: Option<Money>,
    pub kind: Option<TransactionKind>,
    pub description: Patch<String>,
    pub date: Option<NaiveDate>,
    pub category_id: Option<i64>,
}

/// Create a budget. `category_id: None` applies it to every category.
#[derive(Clone, Debug)]
pub struct BudgetNew {
    pub name: String,
    pub amount: Money,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub category_id: Option<i64>,
}

/// Partially update a budget.
#[derive(Clone, Debug, Default)]
pub struct BudgetPatch {
    pub name: Option<String>,
    pub amount: Option<Money>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub category_id: Patch<i64>,
}
