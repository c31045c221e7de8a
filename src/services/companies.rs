use std::cell::RefCell;

use crate::domain::query::SortOrder;
use crate::domain::types::CompanyId;
use crate::dto::companies::{
    ColumnHeader, CompaniesResponse, CompanyFormData, CompanyListPageData, NavigationTarget,
    RenderedRow,
};
use crate::forms::companies::{CompanyForm, DealForm};
use crate::list::actions::{ActionDispatcher, DeleteAction, NavigationIntent, Navigator};
use crate::list::columns::{CurrencyFormatter, company_columns, render_row};
use crate::list::projector::project;
use crate::list::state::{ListSettings, QueryState};
use crate::list::view::CompanyListView;
use crate::pagination::page_links;
use crate::repository::errors::RepositoryError;
use crate::repository::{CompanyReader, CompanyWriter};
use crate::services::{ServiceError, ServiceResult};

const LIST_PATH: &str = "/companies";

/// `/companies` with the given encoded state.
pub fn list_location(query: &str) -> String {
    let query = query.trim_start_matches('?');
    if query.is_empty() {
        LIST_PATH.to_string()
    } else {
        format!("{LIST_PATH}?{query}")
    }
}

fn parse_company_id(raw: i32) -> ServiceResult<CompanyId> {
    CompanyId::new(raw).map_err(|_| ServiceError::NotFound)
}

/// Header for each column, with a link toggling its sort direction.
fn column_headers(state: &QueryState) -> Vec<ColumnHeader> {
    let current = state.sorters().first();

    company_columns()
        .into_iter()
        .map(|column| {
            let sorted = current
                .filter(|sort| Some(sort.field.as_str()) == column.sort_field)
                .map(|sort| sort.order);

            let sort_href = column.sort_field.map(|field| {
                let next = match sorted {
                    Some(SortOrder::Asc) => SortOrder::Desc,
                    _ => SortOrder::Asc,
                };
                let mut toggled = state.clone();
                toggled.on_sort_change(field, next);
                list_location(&toggled.to_query_string())
            });

            ColumnHeader {
                key: column.key,
                title: column.title,
                sort_href,
                sorted,
                fixed_right: column.fixed_right,
            }
        })
        .collect()
}

/// Loads one page of the company list for the given query string.
///
/// A failed query still produces a page: the table is empty and `error` is set.
pub fn load_company_list<R>(
    repo: &R,
    settings: &ListSettings,
    raw_query: &str,
    formatter: &dyn CurrencyFormatter,
) -> CompanyListPageData
where
    R: CompanyReader + ?Sized,
{
    let state = QueryState::from_query_string(settings, raw_query);
    let mut view = CompanyListView::with_state(state);
    view.refresh(repo);

    let columns = company_columns();
    let rows = view
        .rows()
        .iter()
        .map(|row| RenderedRow {
            cells: render_row(row, &columns, formatter),
            row: row.clone(),
        })
        .collect();

    let state = view.state();
    let pages = page_links(view.total_pages(), state.current_page(), |page| {
        let mut paged = state.clone();
        paged.on_page_change(page as i64);
        list_location(&paged.to_query_string())
    });

    let search_prefix = state.encoded_search_prefix();
    let search_hidden_fields = state
        .to_query_pairs()
        .into_iter()
        .filter(|(key, value)| {
            *key != "current" && !(*key == "filter" && value.starts_with(&search_prefix))
        })
        .map(|(key, value)| (key.to_string(), value))
        .collect();

    CompanyListPageData {
        columns: column_headers(state),
        rows,
        pages,
        total: view.total(),
        current_page: state.current_page(),
        query_string: state.to_query_string(),
        search_value: state.search_value().map(str::to_string),
        search_hidden_fields,
        error: view.last_error().map(|err| err.to_string()),
    }
}

/// JSON variant of the list; failures are reported instead of emptied.
pub fn list_companies<R>(
    repo: &R,
    settings: &ListSettings,
    raw_query: &str,
) -> ServiceResult<CompaniesResponse>
where
    R: CompanyReader + ?Sized,
{
    let mut view =
        CompanyListView::with_state(QueryState::from_query_string(settings, raw_query));
    view.refresh(repo);

    if let Some(err) = view.take_error() {
        return Err(ServiceError::from(err));
    }

    Ok(CompaniesResponse {
        total: view.total(),
        page: view.state().current_page(),
        page_size: view.state().page_size(),
        rows: view.rows().to_vec(),
    })
}

/// Navigator resolving intents against the list query of the current request.
pub struct RedirectNavigator {
    query: String,
    target: RefCell<Option<NavigationTarget>>,
}

impl RedirectNavigator {
    pub fn new(query: &str) -> Self {
        Self {
            query: query.to_string(),
            target: RefCell::new(None),
        }
    }

    pub fn into_target(self) -> Option<NavigationTarget> {
        self.target.into_inner()
    }
}

impl Navigator for RedirectNavigator {
    fn go(&self, intent: NavigationIntent) {
        self.target.replace(Some(NavigationTarget {
            location: intent.location(&self.query),
            mode: intent.navigation_mode,
        }));
    }
}

/// Deletes through the repository and keeps the outcome for user feedback.
pub struct RepositoryDeleter<'a, R: ?Sized> {
    repo: &'a R,
    outcome: RefCell<Option<Result<(), RepositoryError>>>,
}

impl<'a, R> RepositoryDeleter<'a, R>
where
    R: CompanyWriter + ?Sized,
{
    pub fn new(repo: &'a R) -> Self {
        Self {
            repo,
            outcome: RefCell::new(None),
        }
    }

    pub fn into_outcome(self) -> Option<Result<(), RepositoryError>> {
        self.outcome.into_inner()
    }
}

impl<R> DeleteAction for RepositoryDeleter<'_, R>
where
    R: CompanyWriter + ?Sized,
{
    fn request_delete(&self, id: CompanyId) {
        let result = self.repo.delete_company(id);
        if let Err(err) = &result {
            log::error!("Failed to delete company {id}: {err}");
        }
        self.outcome.replace(Some(result));
    }
}

/// Delete collaborator for navigation-only dispatches; logs and ignores requests.
struct NoDelete;

impl DeleteAction for NoDelete {
    fn request_delete(&self, id: CompanyId) {
        log::warn!("Unexpected delete request for company {id}");
    }
}

/// Resolves the create button of the list with the given query string.
pub fn create_click(raw_query: &str) -> ServiceResult<NavigationTarget> {
    let navigator = RedirectNavigator::new(raw_query);
    ActionDispatcher::new(&navigator, &NoDelete).on_create_click();
    navigator
        .into_target()
        .ok_or_else(|| ServiceError::Internal("create navigation not issued".to_string()))
}

/// Resolves the edit icon of a row.
pub fn edit_click(company_id: i32, raw_query: &str) -> ServiceResult<NavigationTarget> {
    let id = parse_company_id(company_id)?;
    let navigator = RedirectNavigator::new(raw_query);
    ActionDispatcher::new(&navigator, &NoDelete).on_edit_click(id);
    navigator
        .into_target()
        .ok_or_else(|| ServiceError::Internal("edit navigation not issued".to_string()))
}

/// Dispatches the delete icon of a row.
pub fn delete_company<R>(repo: &R, company_id: i32) -> ServiceResult<()>
where
    R: CompanyWriter + ?Sized,
{
    let id = parse_company_id(company_id)?;
    let navigator = RedirectNavigator::new("");
    let deleter = RepositoryDeleter::new(repo);
    ActionDispatcher::new(&navigator, &deleter).on_delete_click(id);

    match deleter.into_outcome() {
        Some(result) => result.map_err(ServiceError::from),
        None => Err(ServiceError::Internal("delete not dispatched".to_string())),
    }
}

/// Prefills the edit form of an existing company.
pub fn load_company_form<R>(
    repo: &R,
    company_id: i32,
    formatter: &dyn CurrencyFormatter,
) -> ServiceResult<CompanyFormData>
where
    R: CompanyReader + ?Sized,
{
    let id = parse_company_id(company_id)?;
    let company = repo
        .get_company_by_id(id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)?;
    let row = project(&company);

    Ok(CompanyFormData {
        id: Some(id.get()),
        name: company.name,
        avatar_url: company.avatar_url.unwrap_or_default(),
        total_revenue: Some(formatter.format(row.total_revenue)),
    })
}

pub fn create_company<R>(repo: &R, form: &CompanyForm) -> ServiceResult<CompanyId>
where
    R: CompanyWriter + ?Sized,
{
    let new_company = form.to_new_company().map_err(|err| {
        log::error!("Failed to validate form: {err}");
        ServiceError::Form("Please provide a company name and a valid logo URL.".to_string())
    })?;

    let company = repo.create_company(&new_company).map_err(|err| {
        log::error!("Failed to create company: {err}");
        ServiceError::from(err)
    })?;

    Ok(company.id)
}

pub fn update_company<R>(repo: &R, company_id: i32, form: &CompanyForm) -> ServiceResult<()>
where
    R: CompanyWriter + ?Sized,
{
    let id = parse_company_id(company_id)?;
    let updates = form.to_update_company().map_err(|err| {
        log::error!("Failed to validate form: {err}");
        ServiceError::Form("Please provide a company name and a valid logo URL.".to_string())
    })?;

    repo.update_company(id, &updates).map_err(|err| {
        log::error!("Failed to update company {id}: {err}");
        ServiceError::from(err)
    })?;

    Ok(())
}

/// Attaches a deal to a company; it counts towards the list aggregate.
pub fn add_deal<R>(repo: &R, company_id: i32, form: &DealForm) -> ServiceResult<()>
where
    R: CompanyWriter + ?Sized,
{
    let id = parse_company_id(company_id)?;
    let deal = form.to_new_deal(id).map_err(|err| {
        log::error!("Failed to validate deal form: {err}");
        ServiceError::Form("Please provide a deal title and a non-negative amount.".to_string())
    })?;

    repo.create_deals(&[deal]).map_err(|err| {
        log::error!("Failed to add deal to company {id}: {err}");
        ServiceError::from(err)
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::list::actions::NavigationMode;

    #[test]
    fn create_click_keeps_query_and_replaces() {
        let target = create_click("current=3&sort=name&order=asc").unwrap();
        assert_eq!(
            target.location,
            "/companies/create?current=3&sort=name&order=asc"
        );
        assert_eq!(target.mode, NavigationMode::Replace);
    }

    #[test]
    fn edit_click_rejects_invalid_id() {
        assert!(matches!(edit_click(0, ""), Err(ServiceError::NotFound)));

        let target = edit_click(5, "current=2").unwrap();
        assert_eq!(target.location, "/companies/5/edit?current=2");
        assert_eq!(target.mode, NavigationMode::Push);
    }

    #[test]
    fn list_location_omits_empty_query() {
        assert_eq!(list_location(""), "/companies");
        assert_eq!(list_location("?current=2"), "/companies?current=2");
    }
}
