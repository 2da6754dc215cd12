use crate::models::*;
use crate::services::SpendingService;
use actix_web::{HttpResponse, ResponseError, Result, web};

#[utoipa::path(
    get,
    path = "/spendings",
    tag = "spendings",
    responses(
        (status = 200, description = "Spendings, newest first", body = [SpendingResponse])
    )
)]
pub async fn list_spendings(service: web::Data<SpendingService>) -> Result<HttpResponse> {
    match service.list_spendings().await {
        Ok(rows) => Ok(HttpResponse::Ok().json(ApiResponse::success(rows))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/spendings",
    tag = "spendings",
    request_body = CreateSpendingRequest,
    responses(
        (status = 200, description = "Spending saved", body = SpendingResponse),
        (status = 400, description = "Invalid input, nothing saved")
    )
)]
pub async fn add_spending(
    service: web::Data<SpendingService>,
    request: web::Json<CreateSpendingRequest>,
) -> Result<HttpResponse> {
    match service.add_spending(request.into_inner()).await {
        Ok(spending) => Ok(HttpResponse::Ok().json(ApiResponse::success(spending))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/spendings/{id}",
    tag = "spendings",
    params(("id" = i32, Path, description = "Spending id")),
    responses(
        (status = 200, description = "Spending deleted"),
        (status = 404, description = "No such spending")
    )
)]
pub async fn delete_spending(
    service: web::Data<SpendingService>,
    path: web::Path<i32>,
) -> Result<HttpResponse> {
    match service.delete_spending(path.into_inner()).await {
        Ok(()) => {
            Ok(HttpResponse::Ok().json(ApiResponse::<()>::message("Spending deleted")))
        }
        Err(e) => Ok(e.error_response()),
    }
}

pub fn spending_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/spendings")
            .route("", web::get().to(list_spendings))
            .route("", web::post().to(add_spending))
            .route("/{id}", web::delete().to(delete_spending)),
    );
}
