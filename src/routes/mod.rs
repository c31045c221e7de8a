//! HTTP handlers and the rendering helpers they share.

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use actix_web::http::header;
use actix_web_flash_messages::{IncomingFlashMessages, Level};
use tera::{Context, Tera};

use crate::dto::companies::NavigationTarget;
use crate::list::actions::NavigationMode;

pub mod api;
pub mod companies;

/// Maps a flash message level to the matching Bootstrap alert class.
pub fn alert_level_to_str(level: &Level) -> &'static str {
    match level {
        Level::Error => "danger",
        Level::Warning => "warning",
        Level::Success => "success",
        _ => "info",
    }
}

/// Template context with the alerts every page shows.
pub fn base_context(flash_messages: &IncomingFlashMessages, current_page: &str) -> Context {
    let alerts = flash_messages
        .iter()
        .map(|f| (f.content(), alert_level_to_str(&f.level())))
        .collect::<Vec<_>>();

    let mut context = Context::new();
    context.insert("alerts", &alerts);
    context.insert("current_page", current_page);
    context
}

pub fn render_template(tera: &Tera, template: &str, context: &Context) -> HttpResponse {
    match tera.render(template, context) {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(body),
        Err(err) => {
            log::error!("Failed to render template '{template}': {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Turns a dispatched navigation into a redirect.
///
/// `replace` answers with 303 See Other and `push` with 302 Found.
pub fn navigate(target: &NavigationTarget) -> HttpResponse {
    let status = match target.mode {
        NavigationMode::Replace => StatusCode::SEE_OTHER,
        NavigationMode::Push => StatusCode::FOUND,
    };
    HttpResponse::build(status)
        .insert_header((header::LOCATION, target.location.as_str()))
        .finish()
}
