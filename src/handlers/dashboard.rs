use crate::models::*;
use crate::services::DashboardService;
use actix_web::{HttpResponse, ResponseError, Result, web};

#[utoipa::path(
    get,
    path = "/dashboard",
    tag = "dashboard",
    responses(
        (status = 200, description = "Spending and subscription overview", body = DashboardResponse)
    )
)]
pub async fn get_dashboard(service: web::Data<DashboardService>) -> Result<HttpResponse> {
    match service.overview().await {
        Ok(overview) => Ok(HttpResponse::Ok().json(ApiResponse::success(overview))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn dashboard_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/dashboard", web::get().to(get_dashboard));
}
