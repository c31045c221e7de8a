//! Structured list query understood by the company query engine.
//!
//! The wire names follow the list query contract: camelCase keys, lower-case
//! operators and sort orders, and an absent filter value for inactive filters.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Resource name of the company list.
pub const COMPANIES_RESOURCE: &str = "companies";

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum CrudOperator {
    Eq,
    Ne,
    Contains,
    Ncontains,
    Startswith,
}

impl CrudOperator {
    pub const fn as_str(self) -> &'static str {
        match self {
            CrudOperator::Eq => "eq",
            CrudOperator::Ne => "ne",
            CrudOperator::Contains => "contains",
            CrudOperator::Ncontains => "ncontains",
            CrudOperator::Startswith => "startswith",
        }
    }
}

impl Display for CrudOperator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CrudOperator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "eq" => Ok(CrudOperator::Eq),
            "ne" => Ok(CrudOperator::Ne),
            "contains" => Ok(CrudOperator::Contains),
            "ncontains" => Ok(CrudOperator::Ncontains),
            "startswith" => Ok(CrudOperator::Startswith),
            other => Err(format!("unknown operator: {other}")),
        }
    }
}

/// Single `{field, operator, value}` filter. A `None` value is inactive.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct CrudFilter {
    pub field: String,
    pub operator: CrudOperator,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl CrudFilter {
    pub fn new(field: impl Into<String>, operator: CrudOperator, value: Option<String>) -> Self {
        Self {
            field: field.into(),
            operator,
            value,
        }
    }

    /// Whether the filter constrains the result set.
    pub fn is_active(&self) -> bool {
        self.value.is_some()
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub const fn as_str(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" | "ascending" | "ascend" => Ok(SortOrder::Asc),
            "desc" | "descending" | "descend" => Ok(SortOrder::Desc),
            other => Err(format!("unknown sort order: {other}")),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct CrudSort {
    pub field: String,
    pub order: SortOrder,
}

impl CrudSort {
    pub fn new(field: impl Into<String>, order: SortOrder) -> Self {
        Self {
            field: field.into(),
            order,
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct PaginationSpec {
    /// 1-based page index.
    pub current: usize,
    pub page_size: usize,
}

impl PaginationSpec {
    /// Number of rows to skip before the requested page.
    ///
    /// `None` when the page lies beyond what an SQL `OFFSET` can address.
    pub fn offset(&self) -> Option<i64> {
        let skipped = self.current.saturating_sub(1).checked_mul(self.page_size)?;
        i64::try_from(skipped).ok()
    }
}

/// Requested record shape.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(untagged)]
pub enum FieldSelection {
    Field(String),
    Nested {
        name: String,
        fields: Vec<FieldSelection>,
    },
}

impl FieldSelection {
    pub fn field(name: &str) -> Self {
        FieldSelection::Field(name.to_string())
    }

    pub fn nested(name: &str, fields: Vec<FieldSelection>) -> Self {
        FieldSelection::Nested {
            name: name.to_string(),
            fields,
        }
    }
}

/// Field shape of a company list row: scalar fields plus the deal sum.
pub fn company_list_shape() -> Vec<FieldSelection> {
    vec![
        FieldSelection::field("id"),
        FieldSelection::field("name"),
        FieldSelection::field("avatarUrl"),
        FieldSelection::field("createdAt"),
        FieldSelection::nested(
            "dealsAggregate",
            vec![FieldSelection::nested(
                "sum",
                vec![FieldSelection::field("value")],
            )],
        ),
    ]
}

/// Fully resolved list request handed to the query engine.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct QueryDescriptor {
    pub resource: String,
    pub filters: Vec<CrudFilter>,
    pub sorters: Vec<CrudSort>,
    pub pagination: PaginationSpec,
    pub shape: Vec<FieldSelection>,
}

impl QueryDescriptor {
    /// Filters that carry a value.
    pub fn active_filters(&self) -> impl Iterator<Item = &CrudFilter> {
        self.filters.iter().filter(|f| f.is_active())
    }
}
