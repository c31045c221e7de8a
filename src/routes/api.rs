use actix_web::{HttpRequest, HttpResponse, Responder, get, web};

use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::services::companies::list_companies;

#[get("/v1/companies")]
pub async fn api_v1_companies(
    req: HttpRequest,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    match list_companies(repo.get_ref(), &server_config.list, req.query_string()) {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => {
            log::error!("Failed to list companies: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
