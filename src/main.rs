use actix_web::{App, HttpServer, ResponseError, error::InternalError, middleware::Logger, web};
use chrono::Local; // timestamp in log lines
use env_logger::{Env, Target};
use std::io::Write; // for env_logger custom formatter
use std::sync::Arc;

use finance_tracker::{
    AppError,
    config::Config,
    database::{create_pool, run_migrations},
    external::{Mailer, ResendMailer},
    handlers,
    middlewares::create_cors,
    services::*,
    swagger::swagger_config,
    tasks,
    utils::{Clock, SystemClock},
};

fn startup_error(context: &str, e: impl std::fmt::Display) -> std::io::Error {
    log::error!("{context}: {e}");
    std::io::Error::other(format!("{context}: {e}"))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let ts = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z");
            let level = record.level().as_str().to_ascii_lowercase();
            let msg_json = serde_json::to_string(&format!("{}", record.args()))
                .unwrap_or_else(|_| "\"<invalid utf8>\"".to_string());
            writeln!(
                buf,
                "{{\"timestamp\":\"{}\",\"level\":\"{}\",\"message\":{},\"target\":\"{}\"}}",
                ts,
                level,
                msg_json,
                record.target(),
            )
        })
        .target(Target::Stdout)
        .init();

    let config =
        Config::from_toml().map_err(|e| startup_error("Failed to load configuration", e))?;

    let pool = create_pool(&config.database)
        .await
        .map_err(|e| startup_error("Failed to create database connection pool", e))?;

    run_migrations(&pool)
        .await
        .map_err(|e| startup_error("Failed to run database migrations", e))?;

    let offset = config
        .alerts
        .offset()
        .ok_or_else(|| {
            startup_error("Invalid timezone offset", config.alerts.utc_offset_minutes)
        })?;
    let clock: Arc<dyn Clock> = Arc::new(SystemClock::new(offset));

    if !config.mail.is_configured() || config.alerts.recipient.trim().is_empty() {
        log::warn!("Mail is not fully configured; renewal alerts will fail and be retried");
    }
    let mailer: Arc<dyn Mailer> = Arc::new(ResendMailer::new(config.mail.clone()));

    let bank_account_service = BankAccountService::new(pool.clone());
    let spending_service = SpendingService::new(pool.clone());
    let subscription_service = SubscriptionService::new(pool.clone(), clock.clone());
    let dashboard_service = DashboardService::new(pool.clone(), clock.clone());
    let maintenance_service = MaintenanceService::new(pool.clone(), clock.clone());
    let alert_service =
        AlertService::new(pool.clone(), mailer, clock.clone(), config.alerts.clone())
            .map_err(|e| startup_error("Failed to create alert service", e))?;

    tasks::spawn_all(
        maintenance_service.clone(),
        alert_service.clone(),
        clock,
        config.alerts.clone(),
    );

    log::info!(
        "Starting HTTP server at {}:{}",
        config.server.host,
        config.server.port
    );

    HttpServer::new(move || {
        let json_config = web::JsonConfig::default().error_handler(|err, _req| {
            let message = err.to_string();
            InternalError::from_response(err, AppError::ValidationError(message).error_response())
                .into()
        });
        let query_config = web::QueryConfig::default().error_handler(|err, _req| {
            let message = err.to_string();
            InternalError::from_response(err, AppError::ValidationError(message).error_response())
                .into()
        });

        App::new()
            .wrap(Logger::default())
            .wrap(create_cors())
            .app_data(json_config)
            .app_data(query_config)
            .app_data(web::Data::new(bank_account_service.clone()))
            .app_data(web::Data::new(spending_service.clone()))
            .app_data(web::Data::new(subscription_service.clone()))
            .app_data(web::Data::new(dashboard_service.clone()))
            .app_data(web::Data::new(maintenance_service.clone()))
            .app_data(web::Data::new(alert_service.clone()))
            .configure(swagger_config)
            .service(
                web::scope("/api/v1")
                    .configure(handlers::bank_account_config)
                    .configure(handlers::spending_config)
                    .configure(handlers::subscription_config)
                    .configure(handlers::dashboard_config)
                    .configure(handlers::admin_config),
            )
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await
}
