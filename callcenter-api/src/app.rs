/// Application state and router builder
///
/// # Example
///
/// ```no_run
/// use callcenter_api::{app::{build_router, AppState}, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let app = build_router(AppState::new(pool, config));
///
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:5000").await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```

use crate::{
    config::Config,
    middleware::{security::security_headers, timeout::timeout_as_json},
};
use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    routing::{get, post, put},
    Router,
};
use callcenter_shared::services::auth::PasswordChangeMode;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    /// Gets JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }

    /// Whether cookies get the `Secure` attribute
    pub fn secure_cookies(&self) -> bool {
        self.config.api.production
    }

    pub fn password_change_mode(&self) -> PasswordChangeMode {
        self.config.security.password_change_mode
    }
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600))
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Routes
///
/// ```text
/// /
/// ├── GET  /health
/// ├── /auth/
/// │   ├── POST /login
/// │   ├── POST /logout
/// │   ├── PUT  /update-password        # reset, no current password
/// │   └── POST /update-password        # change, current password required
/// ├── /customers
/// │   ├── GET    /                     # ?page&limit
/// │   ├── POST   /
/// │   ├── PUT    /                     # status transition
/// │   ├── PUT    /:id                  # full update
/// │   └── DELETE /:id
/// ├── /employees
/// │   ├── GET  /                       # ?page&limit
/// │   ├── POST /
/// │   └── PUT  /                       # force password change
/// ├── GET /statistical                 # ?role_note
/// └── /teams
///     ├── GET  /                       # ?page&limit, all teams without them
///     ├── POST /
///     └── PUT  /:id
/// ```
///
/// # Middleware Stack
///
/// Outermost first: request id, tracing, request id propagation, CORS,
/// security headers, JSON timeout body, timeout.
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let auth_routes = Router::new()
        .route("/login", post(routes::auth::login))
        .route("/logout", post(routes::auth::logout))
        .route(
            "/update-password",
            put(routes::auth::reset_password).post(routes::auth::change_password),
        );

    let customer_routes = Router::new()
        .route(
            "/",
            get(routes::customers::list_customers)
                .post(routes::customers::create_customer)
                .put(routes::customers::update_status),
        )
        .route(
            "/:id",
            put(routes::customers::update_customer).delete(routes::customers::delete_customer),
        );

    let employee_routes = Router::new().route(
        "/",
        get(routes::employees::list_employees)
            .post(routes::employees::create_employee)
            .put(routes::employees::reset_employee_password),
    );

    let team_routes = Router::new()
        .route(
            "/",
            get(routes::teams::list_teams).post(routes::teams::create_team),
        )
        .route("/:id", put(routes::teams::update_team));

    let request_id_header = HeaderName::from_static("x-request-id");
    let timeout = Duration::from_secs(state.config.api.request_timeout_secs);
    let cors = cors_layer(&state.config.api.cors_origins);
    let production = state.config.api.production;

    Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/statistical", get(routes::statistics::call_statistics))
        .nest("/auth", auth_routes)
        .nest("/customers", customer_routes)
        .nest("/employees", employee_routes)
        .nest("/teams", team_routes)
        .layer(TimeoutLayer::new(timeout))
        .layer(axum::middleware::map_response(timeout_as_json))
        .layer(axum::middleware::from_fn_with_state(
            production,
            security_headers,
        ))
        .layer(cors)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(
                    request_id_header.clone(),
                    MakeRequestUuid,
                ))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                        .on_response(DefaultOnResponse::new().level(Level::INFO)),
                )
                .layer(PropagateRequestIdLayer::new(request_id_header)),
        )
        .with_state(state)
}

