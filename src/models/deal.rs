use diesel::prelude::*;

use crate::domain::company::NewDeal as DomainNewDeal;

#[derive(Insertable)]
#[diesel(table_name = crate::schema::deals)]
/// Insertable form of a deal row.
pub struct NewDeal<'a> {
    pub company_id: i32,
    pub title: &'a str,
    pub value: f64,
}

impl<'a> From<&'a DomainNewDeal> for NewDeal<'a> {
    fn from(deal: &'a DomainNewDeal) -> Self {
        Self {
            company_id: deal.company_id.get(),
            title: deal.title.as_str(),
            value: deal.value.get(),
        }
    }
}
