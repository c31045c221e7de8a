//! Canonical filter, sort and pagination state of the company list.

use serde::Deserialize;

use crate::domain::query::{
    COMPANIES_RESOURCE, CrudFilter, CrudOperator, CrudSort, PaginationSpec, QueryDescriptor,
    SortOrder, company_list_shape,
};

/// Rows per page of the company list.
pub const PAGE_SIZE: usize = 12;

/// Fields the query engine can order by.
pub const SORTABLE_FIELDS: &[&str] = &["id", "name", "createdAt"];

/// Fields the query engine can filter on.
pub const FILTERABLE_FIELDS: &[&str] = &["id", "name"];

/// Tunables of the list view loaded from configuration.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct ListSettings {
    /// Field targeted by the free-text search box. Also the key used to read
    /// the current search value back out of the filter state.
    #[serde(default = "default_search_field")]
    pub search_field: String,
}

fn default_search_field() -> String {
    "name".to_string()
}

impl Default for ListSettings {
    fn default() -> Self {
        Self {
            search_field: default_search_field(),
        }
    }
}

/// Query parameters carried between list navigations.
#[derive(Debug, Default, Deserialize)]
struct ListQueryParams {
    #[serde(default)]
    current: Option<String>,
    #[serde(default)]
    sort: Option<String>,
    #[serde(default)]
    order: Option<String>,
    #[serde(default)]
    filter: Vec<String>,
    #[serde(default)]
    q: Option<String>,
}

/// Transient list state owned by one list view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryState {
    search_field: String,
    filters: Vec<CrudFilter>,
    sorters: Vec<CrudSort>,
    current_page: usize,
}

impl QueryState {
    /// Initial state: inactive search filter, newest companies first, page 1.
    pub fn new(settings: &ListSettings) -> Self {
        let search_field = if FILTERABLE_FIELDS.contains(&settings.search_field.as_str()) {
            settings.search_field.clone()
        } else {
            log::warn!(
                "Search field `{}` is not filterable, falling back to `name`",
                settings.search_field
            );
            default_search_field()
        };

        Self {
            filters: vec![CrudFilter::new(
                search_field.clone(),
                CrudOperator::Contains,
                None,
            )],
            search_field,
            sorters: vec![CrudSort::new("createdAt", SortOrder::Desc)],
            current_page: 1,
        }
    }

    pub fn filters(&self) -> &[CrudFilter] {
        &self.filters
    }

    pub fn sorters(&self) -> &[CrudSort] {
        &self.sorters
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn page_size(&self) -> usize {
        PAGE_SIZE
    }

    pub fn search_field(&self) -> &str {
        &self.search_field
    }

    /// Replaces the value of the search filter and resets to the first page.
    ///
    /// Blank input keeps the filter entry but makes it inactive.
    pub fn on_search(&mut self, term: &str) {
        let value = normalize_value(term);
        let search_field = self.search_field.clone();

        match self
            .filters
            .iter_mut()
            .find(|f| f.field == search_field && f.operator == CrudOperator::Contains)
        {
            Some(filter) => filter.value = value,
            None => self
                .filters
                .push(CrudFilter::new(search_field, CrudOperator::Contains, value)),
        }

        self.current_page = 1;
    }

    /// Replaces the whole sort list with a single criterion.
    ///
    /// Returns `false` and keeps the prior sort when the field is unknown.
    pub fn on_sort_change(&mut self, field: &str, order: SortOrder) -> bool {
        if !SORTABLE_FIELDS.contains(&field) {
            log::warn!("Ignoring sort on unsupported field `{field}`");
            return false;
        }
        self.sorters = vec![CrudSort::new(field, order)];
        true
    }

    /// Merges filters by field; fields not mentioned keep their prior state.
    pub fn on_filter_change<I>(&mut self, filters: I)
    where
        I: IntoIterator<Item = CrudFilter>,
    {
        let mut applied = false;
        for mut incoming in filters {
            if !FILTERABLE_FIELDS.contains(&incoming.field.as_str()) {
                log::warn!("Ignoring filter on unsupported field `{}`", incoming.field);
                continue;
            }
            incoming.value = incoming.value.as_deref().and_then(normalize_value);

            match self.filters.iter_mut().find(|f| f.field == incoming.field) {
                Some(existing) => *existing = incoming,
                None => self.filters.push(incoming),
            }
            applied = true;
        }
        if applied {
            self.current_page = 1;
        }
    }

    /// Moves to another page. Non-positive pages and pages whose offset
    /// cannot be addressed are rejected.
    pub fn on_page_change(&mut self, page: i64) -> bool {
        match usize::try_from(page) {
            Ok(page) if page > 0 && Self::pagination_for(page).offset().is_some() => {
                self.current_page = page;
                true
            }
            _ => {
                log::warn!("Ignoring invalid page number {page}");
                false
            }
        }
    }

    /// Value of the first filter on `field` with the given operator.
    pub fn default_filter_value(&self, field: &str, operator: CrudOperator) -> Option<&str> {
        self.filters
            .iter()
            .find(|f| f.field == field && f.operator == operator)
            .and_then(|f| f.value.as_deref())
    }

    /// Current search box value.
    pub fn search_value(&self) -> Option<&str> {
        self.default_filter_value(&self.search_field, CrudOperator::Contains)
    }

    fn pagination_for(current: usize) -> PaginationSpec {
        PaginationSpec {
            current,
            page_size: PAGE_SIZE,
        }
    }

    pub fn build_query_descriptor(&self) -> QueryDescriptor {
        QueryDescriptor {
            resource: COMPANIES_RESOURCE.to_string(),
            filters: self.filters.clone(),
            sorters: self.sorters.clone(),
            pagination: Self::pagination_for(self.current_page),
            shape: company_list_shape(),
        }
    }

    /// Encodes filters, sort and page so a later request can restore them.
    pub fn to_query_string(&self) -> String {
        serde_html_form::to_string(self.to_query_pairs()).unwrap_or_else(|err| {
            log::error!("Failed to encode list query: {err}");
            String::new()
        })
    }

    /// Key/value pairs behind [`QueryState::to_query_string`].
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs: Vec<(&'static str, String)> = Vec::new();
        pairs.push(("current", self.current_page.to_string()));
        if let Some(sort) = self.sorters.first() {
            pairs.push(("sort", sort.field.clone()));
            pairs.push(("order", sort.order.as_str().to_string()));
        }
        for filter in &self.filters {
            if let Some(value) = &filter.value {
                pairs.push((
                    "filter",
                    format!("{}:{}:{}", filter.field, filter.operator, value),
                ));
            }
        }
        pairs
    }

    /// Encoded form of the search filter inside the query pairs.
    pub fn encoded_search_prefix(&self) -> String {
        format!("{}:{}:", self.search_field, CrudOperator::Contains)
    }

    /// Restores state from a query string, ignoring anything malformed.
    pub fn from_query_string(settings: &ListSettings, raw: &str) -> Self {
        let mut state = Self::new(settings);

        let params: ListQueryParams = match serde_html_form::from_str(raw) {
            Ok(params) => params,
            Err(err) => {
                log::warn!("Ignoring malformed list query `{raw}`: {err}");
                return state;
            }
        };

        if let Some(field) = params.sort.as_deref() {
            let order = match params.order.as_deref().map(str::parse::<SortOrder>) {
                Some(Ok(order)) => order,
                Some(Err(err)) => {
                    log::warn!("{err}");
                    SortOrder::Asc
                }
                None => SortOrder::Asc,
            };
            state.on_sort_change(field, order);
        }

        let filters = params
            .filter
            .iter()
            .filter_map(|encoded| parse_filter(encoded))
            .collect::<Vec<_>>();
        if !filters.is_empty() {
            state.on_filter_change(filters);
        }

        if let Some(term) = params.q.as_deref() {
            state.on_search(term);
        }

        if let Some(current) = params.current.as_deref() {
            match current.trim().parse::<i64>() {
                Ok(page) => {
                    state.on_page_change(page);
                }
                Err(_) => log::warn!("Ignoring non-numeric page `{current}`"),
            }
        }

        state
    }
}

fn normalize_value(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Parses `field:operator:value`; the value may itself contain colons.
fn parse_filter(encoded: &str) -> Option<CrudFilter> {
    let mut parts = encoded.splitn(3, ':');
    let field = parts.next()?.trim();
    let operator = match parts.next()?.trim().parse::<CrudOperator>() {
        Ok(operator) => operator,
        Err(err) => {
            log::warn!("Ignoring filter `{encoded}`: {err}");
            return None;
        }
    };
    let value = parts.next().and_then(normalize_value);

    if field.is_empty() {
        return None;
    }
    Some(CrudFilter::new(field, operator, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> QueryState {
        QueryState::new(&ListSettings::default())
    }

    #[test]
    fn initial_descriptor_matches_defaults() {
        let descriptor = state().build_query_descriptor();

        assert_eq!(descriptor.resource, "companies");
        assert_eq!(
            descriptor.filters,
            vec![CrudFilter::new("name", CrudOperator::Contains, None)]
        );
        assert_eq!(
            descriptor.sorters,
            vec![CrudSort::new("createdAt", SortOrder::Desc)]
        );
        assert_eq!(
            descriptor.pagination,
            PaginationSpec {
                current: 1,
                page_size: 12
            }
        );
    }

    #[test]
    fn descriptor_is_stable_across_calls() {
        let mut state = state();
        state.on_search("acme");
        state.on_sort_change("name", SortOrder::Asc);
        state.on_page_change(3);

        let first = serde_json::to_string(&state.build_query_descriptor()).unwrap();
        let second = serde_json::to_string(&state.build_query_descriptor()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn search_replaces_value_and_resets_page() {
        let mut state = state();
        state.on_page_change(4);
        state.on_search("acme");
        state.on_search("beta");

        assert_eq!(state.current_page(), 1);
        assert_eq!(state.filters().len(), 1);
        assert_eq!(state.search_value(), Some("beta"));
    }

    #[test]
    fn clearing_search_keeps_inactive_filter_entry() {
        let mut state = state();
        state.on_search("acme");
        state.on_search("");

        assert_eq!(
            state.filters(),
            &[CrudFilter::new("name", CrudOperator::Contains, None)]
        );
    }

    #[test]
    fn non_positive_pages_are_rejected() {
        let mut state = state();
        state.on_page_change(2);

        assert!(!state.on_page_change(0));
        assert!(!state.on_page_change(-1));
        assert_eq!(state.current_page(), 2);
    }

    #[test]
    fn unaddressable_pages_are_rejected() {
        let mut state = state();
        state.on_page_change(2);

        assert!(!state.on_page_change(i64::MAX));
        assert_eq!(state.current_page(), 2);
        assert!(state.build_query_descriptor().pagination.offset().is_some());
    }

    #[test]
    fn huge_page_in_query_string_keeps_first_page() {
        let state =
            QueryState::from_query_string(&ListSettings::default(), "current=9223372036854775807");

        assert_eq!(state.current_page(), 1);
        assert_eq!(state.build_query_descriptor().pagination.offset(), Some(0));
    }

    #[test]
    fn rejected_filters_keep_current_page() {
        let mut state = state();
        state.on_page_change(3);

        state.on_filter_change(Vec::new());
        assert_eq!(state.current_page(), 3);

        state.on_filter_change(vec![CrudFilter::new(
            "owner",
            CrudOperator::Eq,
            Some("x".to_string()),
        )]);
        assert_eq!(state.current_page(), 3);

        state.on_filter_change(vec![CrudFilter::new(
            "id",
            CrudOperator::Eq,
            Some("7".to_string()),
        )]);
        assert_eq!(state.current_page(), 1);
    }

    #[test]
    fn sort_change_replaces_default_sort() {
        let mut state = state();
        assert!(state.on_sort_change("name", SortOrder::Asc));

        assert_eq!(state.sorters(), &[CrudSort::new("name", SortOrder::Asc)]);
    }

    #[test]
    fn unknown_sort_field_keeps_prior_sort() {
        let mut state = state();
        assert!(!state.on_sort_change("revenue", SortOrder::Asc));

        assert_eq!(
            state.sorters(),
            &[CrudSort::new("createdAt", SortOrder::Desc)]
        );
    }

    #[test]
    fn filter_change_merges_by_field() {
        let mut state = state();
        state.on_search("acme");
        state.on_filter_change(vec![
            CrudFilter::new("id", CrudOperator::Eq, Some("7".to_string())),
            CrudFilter::new("owner", CrudOperator::Eq, Some("x".to_string())),
        ]);

        assert_eq!(state.search_value(), Some("acme"));
        assert_eq!(state.filters().len(), 2);
        assert_eq!(
            state.default_filter_value("id", CrudOperator::Eq),
            Some("7")
        );
    }

    #[test]
    fn search_value_is_looked_up_by_search_field() {
        let mut state = state();
        state.on_search("acme");

        assert_eq!(
            state.default_filter_value("name", CrudOperator::Contains),
            Some("acme")
        );
        assert_eq!(state.default_filter_value("id", CrudOperator::Contains), None);
    }

    #[test]
    fn unknown_search_field_falls_back_to_name() {
        let settings = ListSettings {
            search_field: "avatarUrl".to_string(),
        };
        assert_eq!(QueryState::new(&settings).search_field(), "name");
    }

    #[test]
    fn query_string_round_trip_restores_state() {
        let settings = ListSettings::default();
        let mut state = QueryState::new(&settings);
        state.on_search("a:b c");
        state.on_sort_change("name", SortOrder::Asc);
        state.on_page_change(3);

        let encoded = state.to_query_string();
        let restored = QueryState::from_query_string(&settings, &encoded);

        assert_eq!(restored, state);
    }

    #[test]
    fn malformed_query_string_parts_are_ignored() {
        let settings = ListSettings::default();
        let state = QueryState::from_query_string(
            &settings,
            "current=-2&sort=revenue&order=desc&filter=name:like:x&filter=bogus",
        );

        assert_eq!(state, QueryState::new(&settings));
    }

    #[test]
    fn free_text_query_goes_through_search() {
        let settings = ListSettings::default();
        let state = QueryState::from_query_string(&settings, "q=%20acme%20");

        assert_eq!(state.search_value(), Some("acme"));
        assert_eq!(state.current_page(), 1);
    }
}
