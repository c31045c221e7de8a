use crate::{
    db::{DbConnection, DbPool},
    domain::{
        company::{Company, NewCompany, NewDeal, UpdateCompany},
        query::QueryDescriptor,
        types::CompanyId,
    },
    repository::errors::RepositoryResult,
};

pub mod company;
pub mod errors;
#[cfg(feature = "test-mocks")]
pub mod mock;

/// Diesel-backed implementation of every repository trait.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool,
}

impl DieselRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Query engine of the company list.
pub trait CompanyReader {
    /// Executes a list descriptor, returning the unpaginated total and the page.
    fn list_companies(&self, query: &QueryDescriptor) -> RepositoryResult<(usize, Vec<Company>)>;
    fn get_company_by_id(&self, id: CompanyId) -> RepositoryResult<Option<Company>>;
}

pub trait CompanyWriter {
    fn create_company(&self, new_company: &NewCompany) -> RepositoryResult<Company>;
    fn update_company(&self, id: CompanyId, updates: &UpdateCompany)
    -> RepositoryResult<Company>;
    /// Removes the company together with its deals.
    fn delete_company(&self, id: CompanyId) -> RepositoryResult<()>;
    fn create_deals(&self, deals: &[NewDeal]) -> RepositoryResult<usize>;
}
