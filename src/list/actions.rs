//! Row and header actions of the company list.
//!
//! The dispatcher only builds intents; performing the navigation or the
//! deletion is up to the injected collaborators.

use serde::Serialize;

use crate::domain::query::COMPANIES_RESOURCE;
use crate::domain::types::CompanyId;

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NavigationAction {
    Create,
    Edit,
}

/// How the navigation affects browser history.
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NavigationMode {
    Push,
    Replace,
}

#[derive(Clone, Copy, Debug, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NavigationOptions {
    /// Carry the current list query string to the target page.
    pub keep_query: bool,
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NavigationIntent {
    pub resource: String,
    pub action: NavigationAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<CompanyId>,
    pub options: NavigationOptions,
    pub navigation_mode: NavigationMode,
}

impl NavigationIntent {
    /// Target URL, with `current_query` appended when the intent keeps it.
    pub fn location(&self, current_query: &str) -> String {
        let path = match (self.action, self.id) {
            (NavigationAction::Create, _) => format!("/{}/create", self.resource),
            (NavigationAction::Edit, Some(id)) => format!("/{}/{id}/edit", self.resource),
            (NavigationAction::Edit, None) => format!("/{}", self.resource),
        };

        let query = current_query.trim_start_matches('?');
        if self.options.keep_query && !query.is_empty() {
            format!("{path}?{query}")
        } else {
            path
        }
    }
}

/// Performs navigation transitions.
pub trait Navigator {
    fn go(&self, intent: NavigationIntent);
}

/// Performs confirmed deletions.
pub trait DeleteAction {
    fn request_delete(&self, id: CompanyId);
}

pub struct ActionDispatcher<'a, N, D>
where
    N: Navigator + ?Sized,
    D: DeleteAction + ?Sized,
{
    navigator: &'a N,
    deleter: &'a D,
}

impl<'a, N, D> ActionDispatcher<'a, N, D>
where
    N: Navigator + ?Sized,
    D: DeleteAction + ?Sized,
{
    pub fn new(navigator: &'a N, deleter: &'a D) -> Self {
        Self { navigator, deleter }
    }

    /// Opens the create page, replacing the list entry and keeping its query.
    pub fn on_create_click(&self) {
        self.navigator.go(NavigationIntent {
            resource: COMPANIES_RESOURCE.to_string(),
            action: NavigationAction::Create,
            id: None,
            options: NavigationOptions { keep_query: true },
            navigation_mode: NavigationMode::Replace,
        });
    }

    pub fn on_edit_click(&self, id: CompanyId) {
        self.navigator.go(NavigationIntent {
            resource: COMPANIES_RESOURCE.to_string(),
            action: NavigationAction::Edit,
            id: Some(id),
            options: NavigationOptions { keep_query: true },
            navigation_mode: NavigationMode::Push,
        });
    }

    pub fn on_delete_click(&self, id: CompanyId) {
        self.deleter.request_delete(id);
    }
}
