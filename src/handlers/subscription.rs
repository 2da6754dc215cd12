use crate::models::*;
use crate::services::SubscriptionService;
use actix_web::{HttpResponse, ResponseError, Result, web};

#[utoipa::path(
    get,
    path = "/subscriptions",
    tag = "subscriptions",
    params(SubscriptionQuery),
    responses(
        (status = 200, description = "Subscriptions after maintenance", body = [SubscriptionResponse])
    )
)]
pub async fn list_subscriptions(
    service: web::Data<SubscriptionService>,
    query: web::Query<SubscriptionQuery>,
) -> Result<HttpResponse> {
    match service.list_subscriptions(query.into_inner()).await {
        Ok(rows) => Ok(HttpResponse::Ok().json(ApiResponse::success(rows))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/subscriptions",
    tag = "subscriptions",
    request_body = CreateSubscriptionRequest,
    responses(
        (status = 200, description = "Subscription created", body = SubscriptionResponse),
        (status = 400, description = "Invalid input, nothing saved")
    )
)]
pub async fn create_subscription(
    service: web::Data<SubscriptionService>,
    request: web::Json<CreateSubscriptionRequest>,
) -> Result<HttpResponse> {
    match service.create_subscription(request.into_inner()).await {
        Ok(sub) => Ok(HttpResponse::Ok().json(ApiResponse::success(sub))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/subscriptions/{id}",
    tag = "subscriptions",
    params(("id" = i32, Path, description = "Subscription id")),
    responses(
        (status = 200, description = "Subscription", body = SubscriptionResponse),
        (status = 404, description = "No such subscription")
    )
)]
pub async fn get_subscription(
    service: web::Data<SubscriptionService>,
    path: web::Path<i32>,
) -> Result<HttpResponse> {
    match service.get_subscription(path.into_inner()).await {
        Ok(sub) => Ok(HttpResponse::Ok().json(ApiResponse::success(sub))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/subscriptions/{id}",
    tag = "subscriptions",
    params(("id" = i32, Path, description = "Subscription id")),
    request_body = UpdateSubscriptionRequest,
    responses(
        (status = 200, description = "Subscription updated", body = SubscriptionResponse),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "No such subscription")
    )
)]
pub async fn update_subscription(
    service: web::Data<SubscriptionService>,
    path: web::Path<i32>,
    request: web::Json<UpdateSubscriptionRequest>,
) -> Result<HttpResponse> {
    match service
        .update_subscription(path.into_inner(), request.into_inner())
        .await
    {
        Ok(sub) => Ok(HttpResponse::Ok().json(ApiResponse::success(sub))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/subscriptions/{id}",
    tag = "subscriptions",
    params(("id" = i32, Path, description = "Subscription id")),
    responses(
        (status = 200, description = "Subscription and its alert history deleted"),
        (status = 404, description = "No such subscription")
    )
)]
pub async fn delete_subscription(
    service: web::Data<SubscriptionService>,
    path: web::Path<i32>,
) -> Result<HttpResponse> {
    match service.delete_subscription(path.into_inner()).await {
        Ok(()) => {
            Ok(HttpResponse::Ok().json(ApiResponse::<()>::message("Subscription deleted")))
        }
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/subscriptions/{id}/alerts",
    tag = "subscriptions",
    params(("id" = i32, Path, description = "Subscription id")),
    responses(
        (status = 200, description = "Renewal alerts sent, latest period first", body = [SubscriptionAlertResponse]),
        (status = 404, description = "No such subscription")
    )
)]
pub async fn list_alerts(
    service: web::Data<SubscriptionService>,
    path: web::Path<i32>,
) -> Result<HttpResponse> {
    match service.list_alerts(path.into_inner()).await {
        Ok(rows) => Ok(HttpResponse::Ok().json(ApiResponse::success(rows))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn subscription_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/subscriptions")
            .route("", web::get().to(list_subscriptions))
            .route("", web::post().to(create_subscription))
            .route("/{id}", web::get().to(get_subscription))
            .route("/{id}", web::put().to(update_subscription))
            .route("/{id}", web::delete().to(delete_subscription))
            .route("/{id}/alerts", web::get().to(list_alerts)),
    );
}
