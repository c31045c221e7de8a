//! Loading/ready lifecycle of the company list.
//!
//! Every state change issues a [`QueryTicket`]. Results are applied only for
//! the most recently issued ticket, so a slow response to an older query can
//! never overwrite the rows of a newer one.

use crate::domain::company::Company;
use crate::domain::query::{CrudFilter, QueryDescriptor, SortOrder};
use crate::list::projector::{CompanyRow, project};
use crate::list::state::{ListSettings, QueryState};
use crate::repository::CompanyReader;
use crate::repository::errors::{RepositoryError, RepositoryResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewStatus {
    /// A query is in flight.
    Loading,
    /// Rows reflect the last completed query.
    Ready,
}

/// Handle for one issued query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryTicket {
    sequence: u64,
    descriptor: QueryDescriptor,
}

impl QueryTicket {
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn descriptor(&self) -> &QueryDescriptor {
        &self.descriptor
    }
}

#[derive(Debug)]
pub struct CompanyListView {
    state: QueryState,
    status: ViewStatus,
    rows: Vec<CompanyRow>,
    total: usize,
    issued: u64,
    last_error: Option<RepositoryError>,
}

impl CompanyListView {
    pub fn new(settings: &ListSettings) -> Self {
        Self::with_state(QueryState::new(settings))
    }

    /// View starting from a restored query state, e.g. one carried in the URL.
    pub fn with_state(state: QueryState) -> Self {
        Self {
            state,
            status: ViewStatus::Ready,
            rows: Vec::new(),
            total: 0,
            issued: 0,
            last_error: None,
        }
    }

    pub fn state(&self) -> &QueryState {
        &self.state
    }

    pub fn status(&self) -> ViewStatus {
        self.status
    }

    pub fn rows(&self) -> &[CompanyRow] {
        &self.rows
    }

    /// Total number of matching companies across all pages.
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn total_pages(&self) -> usize {
        self.total.div_ceil(self.state.page_size())
    }

    /// Error of the last applied query, if it failed.
    pub fn last_error(&self) -> Option<&RepositoryError> {
        self.last_error.as_ref()
    }

    pub fn take_error(&mut self) -> Option<RepositoryError> {
        self.last_error.take()
    }

    /// Issues a query for the current state.
    pub fn load(&mut self) -> QueryTicket {
        self.issued += 1;
        self.status = ViewStatus::Loading;
        QueryTicket {
            sequence: self.issued,
            descriptor: self.state.build_query_descriptor(),
        }
    }

    pub fn search(&mut self, term: &str) -> QueryTicket {
        self.state.on_search(term);
        self.load()
    }

    /// Returns `None` when the sort field is rejected; no query is issued then.
    pub fn sort(&mut self, field: &str, order: SortOrder) -> Option<QueryTicket> {
        self.state
            .on_sort_change(field, order)
            .then(|| self.load())
    }

    pub fn filter<I>(&mut self, filters: I) -> QueryTicket
    where
        I: IntoIterator<Item = CrudFilter>,
    {
        self.state.on_filter_change(filters);
        self.load()
    }

    /// Returns `None` when the page is rejected; no query is issued then.
    pub fn page(&mut self, page: i64) -> Option<QueryTicket> {
        self.state.on_page_change(page).then(|| self.load())
    }

    /// Applies a query result. Returns `false` for superseded tickets.
    ///
    /// A failed query clears the rows instead of keeping partial data.
    pub fn complete(
        &mut self,
        ticket: QueryTicket,
        result: RepositoryResult<(usize, Vec<Company>)>,
    ) -> bool {
        if ticket.sequence != self.issued {
            log::debug!(
                "Dropping stale company list result #{} (latest #{})",
                ticket.sequence,
                self.issued
            );
            return false;
        }

        match result {
            Ok((total, records)) => {
                self.rows = records.iter().map(project).collect();
                self.total = total;
                self.last_error = None;
            }
            Err(err) => {
                log::error!("Failed to list companies: {err}");
                self.rows.clear();
                self.total = 0;
                self.last_error = Some(err);
            }
        }
        self.status = ViewStatus::Ready;
        true
    }

    /// Runs one query for the current state against `repo`.
    pub fn refresh<R>(&mut self, repo: &R) -> bool
    where
        R: CompanyReader + ?Sized,
    {
        let ticket = self.load();
        let result = repo.list_companies(ticket.descriptor());
        self.complete(ticket, result)
    }
}
