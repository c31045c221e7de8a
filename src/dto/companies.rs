//! DTOs shaped for the company list, form pages and API.

use serde::Serialize;

use crate::domain::query::SortOrder;
use crate::list::actions::NavigationMode;
use crate::list::columns::Cell;
use crate::list::projector::CompanyRow;
use crate::pagination::PageLink;

/// Table header of one list column.
#[derive(Debug, Clone, Serialize)]
pub struct ColumnHeader {
    pub key: &'static str,
    pub title: &'static str,
    /// Link toggling the sort on this column, if sortable.
    pub sort_href: Option<String>,
    /// Order this column is currently sorted by.
    pub sorted: Option<SortOrder>,
    pub fixed_right: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct RenderedRow {
    pub row: CompanyRow,
    pub cells: Vec<Cell>,
}

/// Data required to render the company list template.
#[derive(Debug, Serialize)]
pub struct CompanyListPageData {
    pub columns: Vec<ColumnHeader>,
    pub rows: Vec<RenderedRow>,
    pub pages: Vec<PageLink>,
    pub total: usize,
    pub current_page: usize,
    /// Encoded list state, appended to action links to keep the query.
    pub query_string: String,
    /// Value shown in the search box.
    pub search_value: Option<String>,
    /// State that the search form must carry besides the search term.
    pub search_hidden_fields: Vec<(String, String)>,
    /// Set when the list query failed; the table is then empty.
    pub error: Option<String>,
}

/// Result payload of the JSON list endpoint.
#[derive(Debug, Serialize)]
pub struct CompaniesResponse {
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
    pub rows: Vec<CompanyRow>,
}

/// Where a dispatched navigation intent leads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationTarget {
    pub location: String,
    pub mode: NavigationMode,
}

/// Values pre-filled into the create/edit form.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CompanyFormData {
    pub id: Option<i32>,
    pub name: String,
    pub avatar_url: String,
    pub total_revenue: Option<String>,
}
