use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::types::{AvatarUrl, CompanyId, CompanyName, DealValue};

/// Company record as returned by the list query.
///
/// This is a read-only view model: the aggregate is produced by the query
/// engine and may be missing at any nesting level.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: CompanyId,
    pub name: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    /// Aggregate buckets over the company deals. Only the first one is used.
    #[serde(default, deserialize_with = "nullable_buckets")]
    pub deals_aggregate: Option<Vec<DealsAggregate>>,
}

/// One aggregation bucket over a company's deals.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct DealsAggregate {
    #[serde(default)]
    pub sum: Option<AggregateSum>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct AggregateSum {
    #[serde(default)]
    pub value: Option<f64>,
}

impl DealsAggregate {
    /// Bucket carrying a summed deal value.
    pub fn with_sum(value: f64) -> Self {
        Self {
            sum: Some(AggregateSum { value: Some(value) }),
        }
    }
}

/// Accepts `null` elements inside the bucket list, treating them as empty buckets.
fn nullable_buckets<'de, D>(deserializer: D) -> Result<Option<Vec<DealsAggregate>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<Option<DealsAggregate>>>::deserialize(deserializer)?;
    Ok(raw.map(|buckets| buckets.into_iter().map(Option::unwrap_or_default).collect()))
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewCompany {
    pub name: CompanyName,
    pub avatar_url: Option<AvatarUrl>,
}

impl NewCompany {
    #[must_use]
    pub fn new(name: CompanyName, avatar_url: Option<AvatarUrl>) -> Self {
        Self { name, avatar_url }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct UpdateCompany {
    pub name: CompanyName,
    /// `None` clears the stored avatar.
    pub avatar_url: Option<AvatarUrl>,
}

impl UpdateCompany {
    #[must_use]
    pub fn new(name: CompanyName, avatar_url: Option<AvatarUrl>) -> Self {
        Self { name, avatar_url }
    }
}

/// Deal attached to a company; only its value feeds the list aggregate.
#[derive(Clone, Debug, PartialEq)]
pub struct NewDeal {
    pub company_id: CompanyId,
    pub title: String,
    pub value: DealValue,
}
