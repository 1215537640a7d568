pub mod auth;
pub mod db;
pub mod pets;
pub mod validation;

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::Json,
    routing::{delete, get, patch, post},
    Router,
};
use serde_json::{json, Value};
use sqlx::PgPool;
use std::sync::Arc;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use auth::{
    handlers::{login_handler, me_handler, register_org_handler},
    repository::OrgRepository,
    service::AuthService,
    token::TokenService,
};
use pets::{
    handlers::{
        adopt_pet_handler, create_pet_handler, delete_pet_handler, get_pet_handler,
        list_org_pets_handler, list_pets_handler, update_pet_handler,
    },
    repository::PetsRepository,
    service::PetService,
};

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        auth::handlers::register_org_handler,
        auth::handlers::login_handler,
        auth::handlers::me_handler,
        pets::handlers::create_pet_handler,
        pets::handlers::list_pets_handler,
        pets::handlers::get_pet_handler,
        pets::handlers::update_pet_handler,
        pets::handlers::adopt_pet_handler,
        pets::handlers::delete_pet_handler,
        pets::handlers::list_org_pets_handler,
    ),
    components(
        schemas(
            auth::models::RegisterOrgRequest,
            auth::models::LoginRequest,
            auth::models::OrgProfile,
            auth::models::OrgSummary,
            auth::models::RegisterOrgResponse,
            auth::models::SessionResponse,
            pets::models::CreatePetRequest,
            pets::models::UpdatePetRequest,
            pets::models::AdoptPetRequest,
            pets::models::PetResponse,
            pets::models::PetOrgSummary,
            pets::models::PetPage,
            pets::models::DeletePetResponse,
            pets::models::Species,
            pets::models::PetSize,
            pets::models::Level,
            pets::models::Environment,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "orgs", description = "Organization registration and sessions"),
        (name = "pets", description = "Pet listing, search, and adoption endpoints")
    ),
    info(
        title = "PetMatch API",
        version = "1.0.0",
        description = "RESTful API connecting adoption organizations with adopters",
    )
)]
struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_token",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub auth_service: Arc<AuthService>,
    pub pet_service: PetService,
    pub token_service: Arc<TokenService>,
}

impl FromRef<AppState> for Arc<TokenService> {
    fn from_ref(state: &AppState) -> Self {
        state.token_service.clone()
    }
}

/// Wires services onto a pool. The pool is the only shared resource;
/// everything else is constructed from it plus the JWT secret.
pub fn build_state(db: PgPool, jwt_secret: &str) -> AppState {
    let token_service = Arc::new(TokenService::new(jwt_secret.to_string()));
    let auth_service = Arc::new(AuthService::new(
        OrgRepository::new(db.clone()),
        token_service.clone(),
    ));
    let pet_service = PetService::new(PetsRepository::new(db.clone()));

    AppState {
        db,
        auth_service,
        pet_service,
        token_service,
    }
}

/// Handler for GET /health
/// Process liveness; does not touch the database
async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Handler for GET /ready
/// Readiness; verifies a database round trip
async fn ready_handler(State(state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    sqlx::query("SELECT 1")
        .execute(&state.db)
        .await
        .map_err(|e| {
            tracing::warn!("Readiness check failed: {}", e);
            StatusCode::SERVICE_UNAVAILABLE
        })?;

    Ok(Json(json!({ "status": "ready" })))
}

/// Creates and configures the application router
/// Maps all API endpoints to their handlers and adds CORS middleware
pub fn create_router(state: AppState) -> Router {
    use tower_http::cors::{Any, CorsLayer};

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Org routes
        .route("/orgs", post(register_org_handler))
        .route("/sessions", post(login_handler))
        .route("/orgs/me", get(me_handler))
        .route("/orgs/:org_id/pets", get(list_org_pets_handler))
        // Pet routes
        .route("/pets", post(create_pet_handler))
        .route("/pets", get(list_pets_handler))
        .route("/pets/:pet_id", get(get_pet_handler))
        .route("/pets/:pet_id", patch(update_pet_handler))
        .route("/pets/:pet_id", delete(delete_pet_handler))
        .route("/pets/:pet_id/adopt", patch(adopt_pet_handler))
        // Probes
        .route("/health", get(health_handler))
        .route("/ready", get(ready_handler))
        .layer(cors)
        .with_state(state)
}

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    tracing::info!("PetMatch API - Starting...");

    // Get configuration from environment variables
    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");
    let jwt_secret = std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in environment");
    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = std::env::var("PORT").unwrap_or_else(|_| "3333".to_string());

    // Create database connection pool
    tracing::info!("Connecting to database...");
    let db_pool = db::create_pool(&database_url)
        .await
        .expect("Failed to create database pool");

    // Run SQLx migrations on startup
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Migrations completed successfully");

    let state = build_state(db_pool.clone(), &jwt_secret);
    let app = create_router(state);

    // Start the Axum server
    let addr = format!("{}:{}", host, port);
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("PetMatch API is running on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Shutting down, closing database pool");
    db_pool.close().await;
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
