//! services/api/src/bin/api.rs

use api_lib::{
    adapters::db::DbAdapter,
    config::Config,
    error::ApiError,
    web::{
        admin,
        auth::{self, ensure_admin},
        get_complaint_handler, get_task_handler, get_user_handler, intern, me_handler,
        middleware::{admin_only, intern_only, supervisor_only},
        require_auth,
        rest::ApiDoc,
        state::AppState,
        supervisor,
    },
};
use axum::http::{
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    HeaderValue, Method,
};
use axum::{
    middleware as axum_middleware,
    routing::{delete, get, post},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");
    if config.office.is_configured() {
        info!(
            "Office geofence at ({}, {}) with radius {} m",
            config.office.lat, config.office.lng, config.office.radius_m
        );
    } else {
        warn!("OFFICE_LAT/OFFICE_LNG not set; in-office claims will not be validated");
    }

    // --- 2. Connect to Database & Run Migrations ---
    info!("Connecting to database...");
    let db_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;
    let db_adapter = Arc::new(DbAdapter::new(db_pool));
    info!("Running database migrations...");
    db_adapter.run_migrations().await?;
    info!("Database migrations complete.");

    // --- 3. Ensure the Bootstrap Admin ---
    if let Some(admin) = &config.bootstrap_admin {
        ensure_admin(db_adapter.as_ref(), admin).await?;
    }

    // --- 4. Build the Shared AppState ---
    let app_state = Arc::new(AppState::new(db_adapter, config.clone()));

    let origin = config.frontend_origin.parse::<HeaderValue>().map_err(|e| {
        ApiError::Internal(format!(
            "FRONTEND_ORIGIN '{}' is not a valid header value: {}",
            config.frontend_origin, e
        ))
    })?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT]);

    // --- 5. Create the Web Router ---
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/auth/signup", post(auth::signup_handler))
        .route("/auth/verify-email", post(auth::verify_email_handler))
        .route("/auth/login", post(auth::login_handler))
        .route("/auth/logout", post(auth::logout_handler));

    let admin_routes = Router::new()
        .route("/admin/users", get(admin::list_users_handler))
        .route("/admin/users/{user_id}", delete(admin::delete_user_handler))
        .route("/admin/assign", post(admin::assign_handler))
        .route("/admin/unassign", post(admin::unassign_handler))
        .route("/admin/analytics", get(admin::analytics_handler))
        .route("/admin/activity", get(admin::activity_handler))
        .route("/admin/attendance", get(admin::attendance_handler))
        .route("/admin/complaints", get(admin::complaints_handler))
        .route("/admin/progress", get(admin::progress_handler))
        .route("/admin/reports/monthly", get(admin::monthly_report_handler))
        .route("/admin/reports/monthly/csv", get(admin::monthly_report_csv_handler))
        .route_layer(axum_middleware::from_fn(admin_only));

    let supervisor_routes = Router::new()
        .route("/supervisor/interns", get(supervisor::interns_handler))
        .route(
            "/supervisor/interns/{intern_id}/attendance",
            get(supervisor::intern_attendance_handler),
        )
        .route(
            "/supervisor/tasks",
            get(supervisor::tasks_handler).post(supervisor::create_task_handler),
        )
        .route("/supervisor/tasks/{task_id}/rate", post(supervisor::rate_task_handler))
        .route("/supervisor/attendance", get(supervisor::attendance_handler))
        .route("/supervisor/reports", get(supervisor::reports_handler))
        .route("/supervisor/complaints", get(supervisor::complaints_handler))
        .route(
            "/supervisor/complaints/{complaint_id}/status",
            post(supervisor::complaint_status_handler),
        )
        .route_layer(axum_middleware::from_fn(supervisor_only));

    let intern_routes = Router::new()
        .route("/intern/supervisor", get(intern::supervisor_handler))
        .route("/intern/tasks", get(intern::tasks_handler))
        .route("/intern/tasks/{task_id}/status", post(intern::task_status_handler))
        .route("/intern/tasks/{task_id}/report", post(intern::task_report_handler))
        .route(
            "/intern/attendance",
            get(intern::attendance_handler).post(intern::mark_attendance_handler),
        )
        .route(
            "/intern/complaints",
            get(intern::complaints_handler).post(intern::file_complaint_handler),
        )
        .route_layer(axum_middleware::from_fn(intern_only));

    // Protected routes (auth required)
    let protected_routes = Router::new()
        .route("/me", get(me_handler))
        .route("/tasks/{task_id}", get(get_task_handler))
        .route("/users/{user_id}", get(get_user_handler))
        .route("/complaints/{complaint_id}", get(get_complaint_handler))
        .merge(admin_routes)
        .merge(supervisor_routes)
        .merge(intern_routes)
        .route_layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            require_auth,
        ));

    // Combine API routes
    let api_router = Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(cors)
        .with_state(app_state);

    // Merge the API router with the Swagger UI router for a complete application.
    let app = Router::new()
        .merge(api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // --- 6. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
