use crate::models::*;
use crate::services::BankAccountService;
use actix_web::{HttpResponse, ResponseError, Result, web};

#[utoipa::path(
    get,
    path = "/bank-accounts",
    tag = "bank_accounts",
    responses(
        (status = 200, description = "All bank accounts", body = [BankAccountResponse])
    )
)]
pub async fn list_accounts(service: web::Data<BankAccountService>) -> Result<HttpResponse> {
    match service.list_accounts().await {
        Ok(accounts) => Ok(HttpResponse::Ok().json(ApiResponse::success(accounts))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/bank-accounts",
    tag = "bank_accounts",
    request_body = BankAccountRequest,
    responses(
        (status = 200, description = "Bank account created", body = BankAccountResponse),
        (status = 400, description = "Blank or duplicate title")
    )
)]
pub async fn create_account(
    service: web::Data<BankAccountService>,
    request: web::Json<BankAccountRequest>,
) -> Result<HttpResponse> {
    match service.create_account(request.into_inner()).await {
        Ok(account) => Ok(HttpResponse::Ok().json(ApiResponse::success(account))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/bank-accounts/{id}",
    tag = "bank_accounts",
    params(("id" = i32, Path, description = "Bank account id")),
    request_body = BankAccountRequest,
    responses(
        (status = 200, description = "Bank account updated", body = BankAccountResponse),
        (status = 400, description = "Blank or duplicate title"),
        (status = 404, description = "No such account")
    )
)]
pub async fn update_account(
    service: web::Data<BankAccountService>,
    path: web::Path<i32>,
    request: web::Json<BankAccountRequest>,
) -> Result<HttpResponse> {
    match service
        .update_account(path.into_inner(), request.into_inner())
        .await
    {
        Ok(account) => Ok(HttpResponse::Ok().json(ApiResponse::success(account))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/bank-accounts/{id}",
    tag = "bank_accounts",
    params(("id" = i32, Path, description = "Bank account id")),
    responses(
        (status = 200, description = "Deleted; linked records keep no bank"),
        (status = 404, description = "No such account")
    )
)]
pub async fn delete_account(
    service: web::Data<BankAccountService>,
    path: web::Path<i32>,
) -> Result<HttpResponse> {
    match service.delete_account(path.into_inner()).await {
        Ok(()) => {
            Ok(HttpResponse::Ok().json(ApiResponse::<()>::message("Bank account deleted")))
        }
        Err(e) => Ok(e.error_response()),
    }
}

pub fn bank_account_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/bank-accounts")
            .route("", web::get().to(list_accounts))
            .route("", web::post().to(create_account))
            .route("/{id}", web::put().to(update_account))
            .route("/{id}", web::delete().to(delete_account)),
    );
}
