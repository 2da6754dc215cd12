use actix_web::web;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::entities::{BankAccountType, PaymentMethod, SubscriptionType};
use crate::handlers;
use crate::models::*;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::bank_account::list_accounts,
        handlers::bank_account::create_account,
        handlers::bank_account::update_account,
        handlers::bank_account::delete_account,
        handlers::spending::list_spendings,
        handlers::spending::add_spending,
        handlers::spending::delete_spending,
        handlers::subscription::list_subscriptions,
        handlers::subscription::create_subscription,
        handlers::subscription::get_subscription,
        handlers::subscription::update_subscription,
        handlers::subscription::delete_subscription,
        handlers::subscription::list_alerts,
        handlers::dashboard::get_dashboard,
        handlers::admin::run_maintenance,
        handlers::admin::run_alerts,
    ),
    components(
        schemas(
            BankAccountType,
            PaymentMethod,
            SubscriptionType,
            BankAccountRequest,
            BankAccountResponse,
            CreateSpendingRequest,
            SpendingResponse,
            CreateSubscriptionRequest,
            UpdateSubscriptionRequest,
            SubscriptionSort,
            SubscriptionResponse,
            SubscriptionAlertResponse,
            MaintenanceSummary,
            AlertRunSummary,
            SpendingKpis,
            CategoryTotal,
            DailyTotal,
            SubscriptionKpis,
            DashboardResponse,
            ApiError,
        )
    ),
    tags(
        (name = "bank_accounts", description = "Bank account directory"),
        (name = "spendings", description = "Spending journal"),
        (name = "subscriptions", description = "Subscriptions and their renewal alerts"),
        (name = "dashboard", description = "Spending and subscription overview"),
        (name = "admin", description = "Manual maintenance and alert runs"),
    ),
    info(
        title = "Finance Tracker API",
        version = "1.0.0",
        description = "Personal finance tracker REST API documentation"
    ),
    servers(
        (url = "/api/v1", description = "Local server")
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_routes() {
        let doc = ApiDoc::openapi();
        for path in [
            "/bank-accounts/{id}",
            "/subscriptions/{id}/alerts",
            "/admin/alerts/run",
            "/dashboard",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
