//! devfolio backend - library for app logic and testing

pub mod content;
pub mod db;
pub mod geo;
pub mod logging;
pub mod routes;
pub mod storage;

use axum::{
    http::{HeaderValue, Method},
    middleware,
    routing::{get, post, put},
    Router,
};
use std::net::SocketAddr;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer,
};

/// Configure CORS from environment variables.
/// Uses ALLOWED_ORIGINS (comma-separated) or FRONTEND_ORIGIN.
/// Falls back to allowing local dev origins.
pub fn configure_cors() -> CorsLayer {
    let allowed_origins = std::env::var("ALLOWED_ORIGINS")
        .ok()
        .and_then(|s| {
            let origins: Vec<HeaderValue> = s
                .split(',')
                .filter_map(|origin| origin.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                None
            } else {
                Some(origins)
            }
        })
        .or_else(|| {
            std::env::var("FRONTEND_ORIGIN")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(|origin| vec![origin])
        })
        .unwrap_or_else(|| {
            vec![
                "http://localhost:3000".parse().unwrap(),
                "http://127.0.0.1:3000".parse().unwrap(),
            ]
        });

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::AUTHORIZATION,
        ])
        .allow_credentials(true)
}

/// Create and configure the application router.
pub fn create_app() -> Router {
    let cors = configure_cors();
    tracing::info!("CORS configured");

    Router::new()
        // Admin session
        .route("/api/auth/login", post(routes::auth::login))
        .route("/api/auth/verify", post(routes::auth::verify_token))
        .route("/api/auth/logout", post(routes::auth::logout))
        // Profile
        .route(
            "/api/profile",
            get(routes::profile::get_profile).put(routes::profile::update_profile),
        )
        .route("/api/profile/avatar", put(routes::profile::replace_avatar))
        .route("/api/profile/cover", put(routes::profile::replace_cover))
        // Social links
        .route(
            "/api/social",
            get(routes::profile::list_social_links).post(routes::profile::create_social_link),
        )
        .route("/api/social/all", get(routes::profile::list_all_social_links))
        .route(
            "/api/social/{id}",
            axum::routing::patch(routes::profile::update_social_link)
                .delete(routes::profile::delete_social_link),
        )
        // Uses items
        .route(
            "/api/uses",
            get(routes::profile::list_uses).post(routes::profile::create_uses_item),
        )
        .route(
            "/api/uses/{id}",
            axum::routing::patch(routes::profile::update_uses_item)
                .delete(routes::profile::delete_uses_item),
        )
        .route(
            "/api/uses/{id}/image",
            put(routes::profile::replace_uses_image),
        )
        // Taxonomy
        .route(
            "/api/categories",
            get(routes::taxonomy::list_categories).post(routes::taxonomy::create_category),
        )
        .route(
            "/api/categories/{id}",
            axum::routing::patch(routes::taxonomy::update_category)
                .delete(routes::taxonomy::delete_category),
        )
        .route(
            "/api/technologies",
            get(routes::taxonomy::list_technologies).post(routes::taxonomy::create_technology),
        )
        .route(
            "/api/technologies/grouped",
            get(routes::taxonomy::grouped_technologies),
        )
        .route(
            "/api/technologies/{id}",
            axum::routing::patch(routes::taxonomy::update_technology)
                .delete(routes::taxonomy::delete_technology),
        )
        .route(
            "/api/skills",
            get(routes::taxonomy::list_skills).post(routes::taxonomy::create_skill),
        )
        .route(
            "/api/skills/{id}",
            axum::routing::patch(routes::taxonomy::update_skill)
                .delete(routes::taxonomy::delete_skill),
        )
        // Current tech stack
        .route("/api/stack", get(routes::stack::stack_section))
        .route(
            "/api/stack/entries",
            get(routes::stack::list_entries).post(routes::stack::create_entry),
        )
        .route(
            "/api/stack/entries/{id}",
            axum::routing::patch(routes::stack::update_entry)
                .delete(routes::stack::delete_entry),
        )
        // Experience and education
        .route(
            "/api/experience",
            get(routes::experience::list_experience).post(routes::experience::create_experience),
        )
        .route(
            "/api/experience/{id}",
            get(routes::experience::get_experience)
                .patch(routes::experience::update_experience)
                .delete(routes::experience::delete_experience),
        )
        .route(
            "/api/accomplishments",
            post(routes::experience::create_accomplishment),
        )
        .route(
            "/api/accomplishments/{id}",
            axum::routing::patch(routes::experience::update_accomplishment)
                .delete(routes::experience::delete_accomplishment),
        )
        .route(
            "/api/education",
            get(routes::experience::list_education).post(routes::experience::create_education),
        )
        .route(
            "/api/education/{id}",
            axum::routing::patch(routes::experience::update_education)
                .delete(routes::experience::delete_education),
        )
        // Projects
        .route(
            "/api/projects",
            get(routes::projects::list_projects).post(routes::projects::create_project),
        )
        .route(
            "/api/projects/{id}",
            get(routes::projects::get_project)
                .patch(routes::projects::update_project)
                .delete(routes::projects::delete_project),
        )
        .route(
            "/api/projects/{id}/image",
            put(routes::projects::replace_project_image),
        )
        // Blog
        .route(
            "/api/blog",
            get(routes::blog::list_posts).post(routes::blog::create_post),
        )
        .route("/api/blog/{slug}", get(routes::blog::get_post))
        .route(
            "/api/blog/{slug}/navigation",
            get(routes::blog::get_post_navigation),
        )
        .route("/api/blog/{slug}/like", post(routes::blog::like_post))
        .route(
            "/api/blog/id/{id}",
            axum::routing::patch(routes::blog::update_post).delete(routes::blog::delete_post),
        )
        .route(
            "/api/blog/id/{id}/cover",
            put(routes::blog::replace_post_cover),
        )
        // Series
        .route(
            "/api/series",
            get(routes::blog::list_series).post(routes::blog::create_series),
        )
        .route("/api/series/{slug}", get(routes::blog::get_series))
        .route(
            "/api/series/id/{id}",
            axum::routing::patch(routes::blog::update_series)
                .delete(routes::blog::delete_series),
        )
        .route(
            "/api/series/id/{id}/image",
            put(routes::blog::replace_series_image),
        )
        // Comments
        .route(
            "/api/comments",
            get(routes::blog::list_comments).post(routes::blog::create_comment),
        )
        .route("/api/comments/{id}/like", post(routes::blog::like_comment))
        .route(
            "/api/comments/{id}",
            axum::routing::delete(routes::blog::delete_comment),
        )
        // Media
        .route(
            "/api/media",
            get(routes::media::list_media).post(routes::media::upload_media),
        )
        .route(
            "/api/media/{object_id}",
            axum::routing::delete(routes::media::delete_media),
        )
        // Contact, guest book, visitors, settings
        .route(
            "/api/contact",
            get(routes::site::list_contact_submissions).post(routes::site::submit_contact),
        )
        .route(
            "/api/contact/{id}/read",
            axum::routing::patch(routes::site::mark_contact_read),
        )
        .route(
            "/api/contact/{id}",
            axum::routing::delete(routes::site::delete_contact_submission),
        )
        .route(
            "/api/guestbook",
            get(routes::site::list_guestbook).post(routes::site::sign_guestbook),
        )
        .route(
            "/api/guestbook/{id}",
            axum::routing::delete(routes::site::delete_guestbook_message),
        )
        .route(
            "/api/visitors",
            get(routes::site::list_visitors).post(routes::site::record_visit),
        )
        .route(
            "/api/settings",
            get(routes::site::list_settings).put(routes::site::put_setting),
        )
        .route(
            "/api/settings/{key}",
            axum::routing::delete(routes::site::delete_setting),
        )
        // Feed and health
        .route("/rss.xml", get(routes::rss::rss_feed))
        .route("/health", get(routes::health::health_ping))
        .route("/health/detailed", get(routes::health::health_detailed))
        .route("/health/ready", get(routes::health::health_ready))
        .layer(logging::middleware::propagate_request_id_layer())
        .layer(middleware::from_fn(logging::middleware::log_request))
        .layer(logging::middleware::request_id_layer())
        .layer(TraceLayer::new_for_http())
        // Compress responses with gzip/br/zstd automatically
        .layer(CompressionLayer::new())
        // Global 10 MB request body cap covers the 5 MB upload limit plus
        // multipart overhead
        .layer(RequestBodyLimitLayer::new(10 * 1024 * 1024))
        .layer(cors)
}

/// Run the server (used by main).
pub async fn run() {
    dotenvy::dotenv().ok();

    // Guards MUST be held for the programme's lifetime; dropping them early
    // shuts down background log-writer threads and loses buffered log lines.
    let _log_guards = logging::init();

    routes::health::init_start_time();

    // Refuse to start in production with the insecure default JWT secret.
    let environment = std::env::var("ENVIRONMENT").unwrap_or_default();
    if environment == "production" {
        let secret = std::env::var("JWT_SECRET").unwrap_or_default();
        if secret.is_empty() || secret == "default-jwt-secret-change-in-production" {
            panic!(
                "FATAL: JWT_SECRET must be set to a secure, unique value in production. \
                 Refusing to start with the default secret."
            );
        }

        // Warn (don't panic) about default admin credentials in production.
        let admin_email = std::env::var("ADMIN_EMAIL").unwrap_or_default();
        let admin_password_set =
            std::env::var("ADMIN_HASH_PASSWORD").is_ok() || std::env::var("ADMIN_PASSWORD").is_ok();

        if admin_email.is_empty() || admin_email == "admin@example.com" {
            tracing::warn!(
                "SECURITY: ADMIN_EMAIL is using an insecure default. \
                 Set ADMIN_EMAIL env var to a real address before going live."
            );
        }
        if !admin_password_set {
            tracing::warn!(
                "SECURITY: Neither ADMIN_HASH_PASSWORD nor ADMIN_PASSWORD is set. \
                 The fallback default password 'admin123' is insecure. \
                 Set ADMIN_HASH_PASSWORD to a bcrypt hash of a strong password."
            );
        }
    }

    if std::env::var("DATABASE_URL").is_ok() {
        match db::init_pool(None).await {
            Ok(pool) => {
                if let Err(e) = db::run_migrations(&pool).await {
                    tracing::error!("Failed to run database migrations: {}", e);
                }
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to initialize database pool: {}. Continuing without database.",
                    e
                );
            }
        }
    } else {
        tracing::info!("DATABASE_URL not set. Running without database connection.");
    }

    let app = create_app();

    // Bind address is configurable via HOST / PORT env vars, defaulting to
    // 127.0.0.1:3001 so existing dev setups keep working unchanged.
    let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(3001);
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .expect("Invalid HOST/PORT configuration");
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .expect("Server error");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_app_returns_router() {
        let _app = create_app();
        // Just test that it compiles and doesn't panic
    }
}
