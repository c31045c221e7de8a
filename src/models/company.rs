use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::company::{
    Company as DomainCompany, DealsAggregate, NewCompany as DomainNewCompany,
    UpdateCompany as DomainUpdateCompany,
};
use crate::domain::types::{CompanyId, TypeConstraintError};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::companies)]
/// Diesel model for [`crate::domain::company::Company`].
pub struct Company {
    pub id: i32,
    pub name: String,
    pub avatar_url: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::companies)]
/// Insertable form of [`Company`].
pub struct NewCompany<'a> {
    pub name: &'a str,
    pub avatar_url: Option<&'a str>,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::companies)]
#[diesel(treat_none_as_null = true)]
/// Data used when updating a [`Company`] record.
pub struct UpdateCompany<'a> {
    pub name: &'a str,
    pub avatar_url: Option<&'a str>,
    pub updated_at: NaiveDateTime,
}

impl Company {
    /// Converts into the domain record with the given aggregate buckets.
    pub fn into_domain(
        self,
        deals_aggregate: Vec<DealsAggregate>,
    ) -> Result<DomainCompany, TypeConstraintError> {
        Ok(DomainCompany {
            id: CompanyId::new(self.id)?,
            name: self.name,
            avatar_url: self.avatar_url,
            created_at: Some(self.created_at),
            deals_aggregate: Some(deals_aggregate),
        })
    }
}

impl<'a> From<&'a DomainNewCompany> for NewCompany<'a> {
    fn from(company: &'a DomainNewCompany) -> Self {
        Self {
            name: company.name.as_str(),
            avatar_url: company.avatar_url.as_ref().map(|url| url.as_str()),
        }
    }
}

impl<'a> UpdateCompany<'a> {
    pub fn new(company: &'a DomainUpdateCompany, updated_at: NaiveDateTime) -> Self {
        Self {
            name: company.name.as_str(),
            avatar_url: company.avatar_url.as_ref().map(|url| url.as_str()),
            updated_at,
        }
    }
}
