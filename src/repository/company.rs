//! Repository implementation for companies and their deal aggregates.

use std::collections::HashMap;

use chrono::Utc;
use diesel::dsl::sum;
use diesel::prelude::*;
use diesel::sqlite::Sqlite;

use crate::{
    db::DbConnection,
    domain::{
        company::{AggregateSum, Company, DealsAggregate, NewCompany, NewDeal, UpdateCompany},
        query::{CrudFilter, CrudOperator, CrudSort, QueryDescriptor, SortOrder},
        types::CompanyId,
    },
    models::{
        company::{
            Company as DbCompany, NewCompany as DbNewCompany, UpdateCompany as DbUpdateCompany,
        },
        deal::NewDeal as DbNewDeal,
    },
    repository::{
        CompanyReader, CompanyWriter, DieselRepository,
        errors::{RepositoryError, RepositoryResult},
    },
    schema::{companies, deals},
};

type CompanyQuery = companies::BoxedQuery<'static, Sqlite>;

/// Escapes `LIKE` wildcards so user input matches literally.
fn like_literal(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

fn parse_id(value: &str) -> RepositoryResult<i32> {
    value
        .trim()
        .parse::<i32>()
        .map_err(|_| RepositoryError::ValidationError(format!("invalid id filter: {value}")))
}

fn apply_filter(items: CompanyQuery, filter: &CrudFilter) -> RepositoryResult<CompanyQuery> {
    let Some(value) = filter.value.as_deref() else {
        return Ok(items);
    };

    let items = match (filter.field.as_str(), filter.operator) {
        ("name", CrudOperator::Eq) => items.filter(companies::name.eq(value.to_string())),
        ("name", CrudOperator::Ne) => items.filter(companies::name.ne(value.to_string())),
        ("name", CrudOperator::Contains) => items.filter(
            companies::name
                .like(format!("%{}%", like_literal(value)))
                .escape('\\'),
        ),
        ("name", CrudOperator::Ncontains) => items.filter(
            companies::name
                .not_like(format!("%{}%", like_literal(value)))
                .escape('\\'),
        ),
        ("name", CrudOperator::Startswith) => items.filter(
            companies::name
                .like(format!("{}%", like_literal(value)))
                .escape('\\'),
        ),
        ("id", CrudOperator::Eq) => items.filter(companies::id.eq(parse_id(value)?)),
        ("id", CrudOperator::Ne) => items.filter(companies::id.ne(parse_id(value)?)),
        (field, operator) => {
            return Err(RepositoryError::ValidationError(format!(
                "unsupported filter: {field} {operator}"
            )));
        }
    };

    Ok(items)
}

fn apply_sort(items: CompanyQuery, sort: &CrudSort) -> RepositoryResult<CompanyQuery> {
    let items = match (sort.field.as_str(), sort.order) {
        ("id", SortOrder::Asc) => items.then_order_by(companies::id.asc()),
        ("id", SortOrder::Desc) => items.then_order_by(companies::id.desc()),
        ("name", SortOrder::Asc) => items.then_order_by(companies::name.asc()),
        ("name", SortOrder::Desc) => items.then_order_by(companies::name.desc()),
        ("createdAt", SortOrder::Asc) => items.then_order_by(companies::created_at.asc()),
        ("createdAt", SortOrder::Desc) => items.then_order_by(companies::created_at.desc()),
        (field, _) => {
            return Err(RepositoryError::ValidationError(format!(
                "unsupported sort field: {field}"
            )));
        }
    };

    Ok(items)
}

/// Loads the deal sums for `rows` and converts them into domain records.
///
/// A company without deals gets an empty bucket list.
fn with_deals_aggregate(
    conn: &mut DbConnection,
    rows: Vec<DbCompany>,
) -> RepositoryResult<Vec<Company>> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<i32> = rows.iter().map(|c| c.id).collect();
    let sums: HashMap<i32, Option<f64>> = deals::table
        .filter(deals::company_id.eq_any(ids))
        .group_by(deals::company_id)
        .select((deals::company_id, sum(deals::value)))
        .load::<(i32, Option<f64>)>(conn)?
        .into_iter()
        .collect();

    rows.into_iter()
        .map(|row| {
            let buckets = match sums.get(&row.id) {
                Some(value) => vec![DealsAggregate {
                    sum: Some(AggregateSum { value: *value }),
                }],
                None => Vec::new(),
            };
            row.into_domain(buckets).map_err(RepositoryError::from)
        })
        .collect()
}

impl CompanyReader for DieselRepository {
    fn list_companies(&self, query: &QueryDescriptor) -> RepositoryResult<(usize, Vec<Company>)> {
        let pagination = query.pagination;
        let offset = pagination.offset().ok_or_else(|| {
            RepositoryError::ValidationError(format!("page {} is out of range", pagination.current))
        })?;
        let limit = i64::try_from(pagination.page_size).map_err(|_| {
            RepositoryError::ValidationError(format!(
                "page size {} is out of range",
                pagination.page_size
            ))
        })?;

        let mut conn = self.conn()?;

        let query_builder = || -> RepositoryResult<CompanyQuery> {
            let mut items = companies::table.into_boxed::<Sqlite>();
            for filter in query.active_filters() {
                items = apply_filter(items, filter)?;
            }
            Ok(items)
        };

        // Get the total count before applying pagination
        let total = query_builder()?.count().get_result::<i64>(&mut conn)? as usize;

        let mut items = query_builder()?;
        for sort in &query.sorters {
            items = apply_sort(items, sort)?;
        }
        // Keep page boundaries deterministic on ties.
        items = items.then_order_by(companies::id.asc());

        let rows = items
            .limit(limit)
            .offset(offset)
            .load::<DbCompany>(&mut conn)?;

        let companies = with_deals_aggregate(&mut conn, rows)?;
        Ok((total, companies))
    }

    fn get_company_by_id(&self, id: CompanyId) -> RepositoryResult<Option<Company>> {
        let mut conn = self.conn()?;

        let row = companies::table
            .find(id.get())
            .first::<DbCompany>(&mut conn)
            .optional()?;

        match row {
            Some(row) => Ok(with_deals_aggregate(&mut conn, vec![row])?.pop()),
            None => Ok(None),
        }
    }
}

impl CompanyWriter for DieselRepository {
    fn create_company(&self, new_company: &NewCompany) -> RepositoryResult<Company> {
        let mut conn = self.conn()?;

        let insertable: DbNewCompany = new_company.into();
        let row = diesel::insert_into(companies::table)
            .values(&insertable)
            .get_result::<DbCompany>(&mut conn)?;

        row.into_domain(Vec::new()).map_err(RepositoryError::from)
    }

    fn update_company(
        &self,
        id: CompanyId,
        updates: &UpdateCompany,
    ) -> RepositoryResult<Company> {
        let mut conn = self.conn()?;

        let changeset = DbUpdateCompany::new(updates, Utc::now().naive_utc());
        let row = diesel::update(companies::table.find(id.get()))
            .set(&changeset)
            .get_result::<DbCompany>(&mut conn)?;

        with_deals_aggregate(&mut conn, vec![row])?
            .pop()
            .ok_or(RepositoryError::NotFound)
    }

    fn delete_company(&self, id: CompanyId) -> RepositoryResult<()> {
        let mut conn = self.conn()?;

        let deleted = conn.transaction::<usize, diesel::result::Error, _>(|conn| {
            diesel::delete(deals::table.filter(deals::company_id.eq(id.get()))).execute(conn)?;
            diesel::delete(companies::table.find(id.get())).execute(conn)
        })?;

        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    fn create_deals(&self, new_deals: &[NewDeal]) -> RepositoryResult<usize> {
        let mut conn = self.conn()?;

        let insertables: Vec<DbNewDeal> = new_deals.iter().map(Into::into).collect();
        let affected = diesel::insert_into(deals::table)
            .values(&insertables)
            .execute(&mut conn)?;

        Ok(affected)
    }
}
