use crate::models::*;
use crate::services::{AlertService, MaintenanceService};
use actix_web::{HttpResponse, ResponseError, Result, web};

#[utoipa::path(
    post,
    path = "/admin/maintenance/run",
    tag = "admin",
    responses(
        (status = 200, description = "Maintenance pass finished", body = MaintenanceSummary),
        (status = 500, description = "Store error")
    )
)]
pub async fn run_maintenance(service: web::Data<MaintenanceService>) -> Result<HttpResponse> {
    match service.run().await {
        Ok(summary) => Ok(HttpResponse::Ok().json(ApiResponse::success(summary))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/alerts/run",
    tag = "admin",
    params(AlertRunQuery),
    responses(
        (status = 200, description = "Alert run finished, or skipped outside the alert hour", body = AlertRunSummary),
        (status = 500, description = "Store error")
    )
)]
pub async fn run_alerts(
    service: web::Data<AlertService>,
    query: web::Query<AlertRunQuery>,
) -> Result<HttpResponse> {
    let result = if query.force {
        service.run_due_alerts().await.map(Some)
    } else {
        service.run_in_window().await
    };
    match result {
        Ok(Some(summary)) => Ok(HttpResponse::Ok().json(ApiResponse::success(summary))),
        Ok(None) => Ok(HttpResponse::Ok().json(ApiResponse::<()>::message(
            "Outside the alert window; nothing evaluated",
        ))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn admin_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .route("/maintenance/run", web::post().to(run_maintenance))
            .route("/alerts/run", web::post().to(run_alerts)),
    );
}
