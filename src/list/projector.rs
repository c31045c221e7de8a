//! Maps raw company records into render-safe rows.

use serde::Serialize;

use crate::domain::company::Company;
use crate::domain::types::CompanyId;

/// Display-ready company row.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct CompanyRow {
    pub id: CompanyId,
    pub name: String,
    pub avatar_url: Option<String>,
    /// Avatar fallback when `avatar_url` is absent.
    pub initials: String,
    pub total_revenue: f64,
}

/// Sum of the first deals aggregate bucket, if every level of it is present.
pub fn aggregate_sum(company: &Company) -> Option<f64> {
    company
        .deals_aggregate
        .as_deref()?
        .first()?
        .sum
        .as_ref()?
        .value
}

/// Revenue shown for a company. Missing or unusable aggregates count as zero.
pub fn total_revenue(company: &Company) -> f64 {
    aggregate_sum(company)
        .filter(|value| value.is_finite() && *value >= 0.0)
        .unwrap_or(0.0)
}

/// Up to two upper-case initials taken from the first words of `name`.
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .take(2)
        .flat_map(char::to_uppercase)
        .collect()
}

pub fn project(company: &Company) -> CompanyRow {
    CompanyRow {
        id: company.id,
        name: company.name.clone(),
        avatar_url: company.avatar_url.clone(),
        initials: initials(&company.name),
        total_revenue: total_revenue(company),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::company::{AggregateSum, DealsAggregate};

    fn company(deals_aggregate: Option<Vec<DealsAggregate>>) -> Company {
        Company {
            id: CompanyId::new(1).unwrap(),
            name: "Acme".to_string(),
            avatar_url: None,
            created_at: None,
            deals_aggregate,
        }
    }

    #[test]
    fn missing_aggregate_levels_degrade_to_zero() {
        let cases = [
            None,
            Some(vec![]),
            Some(vec![DealsAggregate { sum: None }]),
            Some(vec![DealsAggregate {
                sum: Some(AggregateSum { value: None }),
            }]),
        ];

        for aggregate in cases {
            assert_eq!(project(&company(aggregate)).total_revenue, 0.0);
        }
    }

    #[test]
    fn first_bucket_value_is_used() {
        let row = project(&company(Some(vec![
            DealsAggregate::with_sum(4200.0),
            DealsAggregate::with_sum(99.0),
        ])));
        assert_eq!(row.total_revenue, 4200.0);
    }

    #[test]
    fn negative_or_nan_sums_are_clamped_to_zero() {
        assert_eq!(
            total_revenue(&company(Some(vec![DealsAggregate::with_sum(-5.0)]))),
            0.0
        );
        assert_eq!(
            total_revenue(&company(Some(vec![DealsAggregate::with_sum(f64::NAN)]))),
            0.0
        );
    }

    #[test]
    fn copies_identity_fields() {
        let mut record = company(None);
        record.avatar_url = Some("https://cdn.example.com/a.png".to_string());
        let row = project(&record);

        assert_eq!(row.id.get(), 1);
        assert_eq!(row.name, "Acme");
        assert_eq!(row.avatar_url.as_deref(), Some("https://cdn.example.com/a.png"));
    }

    #[test]
    fn initials_use_first_two_words() {
        assert_eq!(initials("acme widgets inc"), "AW");
        assert_eq!(initials("Beta"), "B");
        assert_eq!(initials("   "), "");
    }
}
