//! Mock repository implementations for isolating services in tests.

use mockall::mock;

use crate::domain::company::{Company, NewCompany, NewDeal, UpdateCompany};
use crate::domain::query::QueryDescriptor;
use crate::domain::types::CompanyId;
use crate::repository::errors::RepositoryResult;
use crate::repository::{CompanyReader, CompanyWriter};

mock! {
    pub Repository {}

    impl CompanyReader for Repository {
        fn list_companies(&self, query: &QueryDescriptor) -> RepositoryResult<(usize, Vec<Company>)>;
        fn get_company_by_id(&self, id: CompanyId) -> RepositoryResult<Option<Company>>;
    }

    impl CompanyWriter for Repository {
        fn create_company(&self, new_company: &NewCompany) -> RepositoryResult<Company>;
        fn update_company(
            &self,
            id: CompanyId,
            updates: &UpdateCompany,
        ) -> RepositoryResult<Company>;
        fn delete_company(&self, id: CompanyId) -> RepositoryResult<()>;
        fn create_deals(&self, deals: &[NewDeal]) -> RepositoryResult<usize>;
    }
}
