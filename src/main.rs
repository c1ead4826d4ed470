use actix_web::{App, HttpServer, middleware::Logger, web};
use chrono::Local; // timestamp in log lines
use env_logger::{Env, Target};
use std::io::Write; // for env_logger custom formatter

use gomealsaver_backend::{
    config::Config,
    database::{create_pool, run_migrations},
    external::{MidtransService, OpenCageService},
    handlers,
    middlewares::{AuthMiddleware, create_cors},
    services::*,
    swagger::swagger_config,
    tasks,
    utils::JwtService,
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

    let config = Config::from_toml()
        .map_err(|e| startup_error("Failed to load configuration", format!("{e:#}")))?;

    let pool = create_pool(&config.database)
        .await
        .map_err(|e| startup_error("Failed to create database connection pool", e))?;

    run_migrations(&pool)
        .await
        .map_err(|e| startup_error("Failed to run database migrations", e))?;

    let jwt_service = JwtService::new(
        &config.jwt.secret,
        config.jwt.access_token_expires_in,
        config.jwt.refresh_token_expires_in,
    );

    let midtrans_service = MidtransService::new(config.midtrans.clone());
    let opencage_service = OpenCageService::new(config.opencage.clone());
    if !midtrans_service.is_enabled() {
        log::warn!("Midtrans server key not configured; only cash on delivery is available");
    }
    if !opencage_service.is_enabled() {
        log::warn!("OpenCage API key not configured; geocoding is disabled");
    }

    let auth_service = AuthService::new(pool.clone(), jwt_service.clone());
    let user_service = UserService::new(pool.clone(), opencage_service.clone());
    let meal_service = MealService::new(pool.clone());
    let bookmark_service = BookmarkService::new(pool.clone());
    let order_service = OrderService::new(
        pool.clone(),
        midtrans_service.clone(),
        config.orders.unpaid_expiry_minutes,
    );
    let payment_service = PaymentService::new(
        pool.clone(),
        midtrans_service.clone(),
        order_service.clone(),
    );
    let review_service = ReviewService::new(pool.clone());
    let message_service = MessageService::new(pool.clone());
    let analytics_service = AnalyticsService::new(pool.clone());

    tasks::spawn_all(order_service.clone(), config.orders.clone());

    log::info!(
        "Starting HTTP server at {}:{}",
        config.server.host,
        config.server.port
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(create_cors())
            .wrap(AuthMiddleware::new(jwt_service.clone()))
            .app_data(web::Data::new(auth_service.clone()))
            .app_data(web::Data::new(user_service.clone()))
            .app_data(web::Data::new(meal_service.clone()))
            .app_data(web::Data::new(bookmark_service.clone()))
            .app_data(web::Data::new(order_service.clone()))
            .app_data(web::Data::new(payment_service.clone()))
            .app_data(web::Data::new(review_service.clone()))
            .app_data(web::Data::new(message_service.clone()))
            .app_data(web::Data::new(analytics_service.clone()))
            .app_data(web::Data::new(opencage_service.clone()))
            .configure(swagger_config)
            .service(
                web::scope("/api")
                    .configure(handlers::auth_config)
                    .configure(handlers::user_config)
                    .configure(handlers::meal_config)
                    .configure(handlers::bookmark_config)
                    .configure(handlers::order_config)
                    .configure(handlers::transaction_config)
                    .configure(handlers::payment_config)
                    .configure(handlers::review_config)
                    .configure(handlers::message_config)
                    .configure(handlers::geocode_config)
                    .configure(handlers::analytics_config),
            )
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await
}
