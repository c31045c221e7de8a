use actix_web::{HttpRequest, HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::dto::companies::CompanyFormData;
use crate::forms::companies::{CompanyForm, DealForm};
use crate::list::columns::UsdFormatter;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{base_context, navigate, redirect, render_template};
use crate::services::ServiceError;
use crate::services::companies as company_service;
use crate::services::companies::list_location;

fn with_query(path: &str, query: &str) -> String {
    if query.is_empty() {
        path.to_string()
    } else {
        format!("{path}?{query}")
    }
}

#[get("/")]
pub async fn index(req: HttpRequest) -> impl Responder {
    redirect(&list_location(req.query_string()))
}

#[get("/companies")]
pub async fn show_companies(
    req: HttpRequest,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let data = company_service::load_company_list(
        repo.get_ref(),
        &server_config.list,
        req.query_string(),
        &UsdFormatter,
    );

    let mut context = base_context(&flash_messages, "companies");
    context.insert("list", &data);

    render_template(&tera, "companies/index.html", &context)
}

#[get("/companies/go/create")]
pub async fn create_click(req: HttpRequest) -> impl Responder {
    match company_service::create_click(req.query_string()) {
        Ok(target) => navigate(&target),
        Err(err) => {
            log::error!("Failed to resolve create navigation: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/companies/go/{company_id}/edit")]
pub async fn edit_click(company_id: web::Path<i32>, req: HttpRequest) -> impl Responder {
    match company_service::edit_click(company_id.into_inner(), req.query_string()) {
        Ok(target) => navigate(&target),
        Err(_) => {
            FlashMessage::error("Company not found.").send();
            redirect(&list_location(req.query_string()))
        }
    }
}

#[post("/companies/{company_id}/delete")]
pub async fn delete_company(
    company_id: web::Path<i32>,
    req: HttpRequest,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match company_service::delete_company(repo.get_ref(), company_id.into_inner()) {
        Ok(()) => FlashMessage::success("Company deleted.").send(),
        Err(ServiceError::NotFound) => FlashMessage::error("Company not found.").send(),
        Err(_) => FlashMessage::error("Failed to delete the company.").send(),
    }
    redirect(&list_location(req.query_string()))
}

#[get("/companies/create")]
pub async fn new_company(
    req: HttpRequest,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let mut context = base_context(&flash_messages, "companies");
    context.insert("company", &CompanyFormData::default());
    context.insert("query_string", req.query_string());

    render_template(&tera, "companies/form.html", &context)
}

#[post("/companies/create")]
pub async fn create_company(
    req: HttpRequest,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<CompanyForm>,
) -> impl Responder {
    let query = req.query_string();
    match company_service::create_company(repo.get_ref(), &form) {
        Ok(_) => {
            FlashMessage::success("Company created.").send();
            redirect(&list_location(query))
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect(&with_query("/companies/create", query))
        }
        Err(_) => {
            FlashMessage::error("Failed to create the company.").send();
            redirect(&with_query("/companies/create", query))
        }
    }
}

#[get("/companies/{company_id}/edit")]
pub async fn edit_company(
    company_id: web::Path<i32>,
    req: HttpRequest,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let company = match company_service::load_company_form(
        repo.get_ref(),
        company_id.into_inner(),
        &UsdFormatter,
    ) {
        Ok(company) => company,
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Company not found.").send();
            return redirect(&list_location(req.query_string()));
        }
        Err(err) => {
            log::error!("Failed to load company: {err}");
            return HttpResponse::InternalServerError().finish();
        }
    };

    let mut context = base_context(&flash_messages, "companies");
    context.insert("company", &company);
    context.insert("query_string", req.query_string());

    render_template(&tera, "companies/form.html", &context)
}

#[post("/companies/{company_id}/edit")]
pub async fn save_company(
    company_id: web::Path<i32>,
    req: HttpRequest,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<CompanyForm>,
) -> impl Responder {
    let company_id = company_id.into_inner();
    let query = req.query_string();
    let edit_location = with_query(&format!("/companies/{company_id}/edit"), query);

    match company_service::update_company(repo.get_ref(), company_id, &form) {
        Ok(()) => {
            FlashMessage::success("Company updated.").send();
            redirect(&list_location(query))
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Company not found.").send();
            redirect(&list_location(query))
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect(&edit_location)
        }
        Err(_) => {
            FlashMessage::error("Failed to update the company.").send();
            redirect(&edit_location)
        }
    }
}

#[post("/companies/{company_id}/deals")]
pub async fn add_deal(
    company_id: web::Path<i32>,
    req: HttpRequest,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<DealForm>,
) -> impl Responder {
    let company_id = company_id.into_inner();
    let edit_location = with_query(&format!("/companies/{company_id}/edit"), req.query_string());

    match company_service::add_deal(repo.get_ref(), company_id, &form) {
        Ok(()) => FlashMessage::success("Deal added.").send(),
        Err(ServiceError::Form(message)) => FlashMessage::error(message).send(),
        Err(_) => FlashMessage::error("Failed to add the deal.").send(),
    }

    redirect(&edit_location)
}
