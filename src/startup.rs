use axum::{
    body::Body,
    extract::DefaultBodyLimit,
    http::{header, header::InvalidHeaderValue, HeaderValue, Method, Request},
    middleware,
    routing::{get, patch, post},
    Json, Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use crate::{handlers, middleware as mw, openapi::ApiDoc, AppState};

pub fn build_router(state: Arc<AppState>) -> Result<Router, InvalidHeaderValue> {
    let cors = CorsLayer::new()
        .allow_origin(state.config.frontend_origin.parse::<HeaderValue>()?)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .allow_credentials(true);

    let auth_routes = Router::new()
        .route("/signin/{provider}", get(handlers::auth_handler::sign_in))
        .route("/callback/{provider}", get(handlers::auth_handler::oauth_callback))
        .route("/session", get(handlers::auth_handler::get_session))
        .route("/signout", post(handlers::auth_handler::sign_out))
        .route(
            "/role",
            get(handlers::auth_handler::get_role).post(handlers::auth_handler::switch_role),
        );

    let ooo_routes = Router::new()
        .route(
            "/",
            get(handlers::ooo_handler::list_ooo).post(handlers::ooo_handler::upsert_ooo),
        )
        .route("/summary", get(handlers::ooo_handler::ooo_summary))
        .route(
            "/me",
            get(handlers::ooo_handler::get_my_ooo).delete(handlers::ooo_handler::delete_my_ooo),
        );

    let reimbursement_routes = Router::new()
        .route(
            "/",
            get(handlers::reimbursements_handler::list_reimbursements)
                .post(handlers::reimbursements_handler::create_reimbursement),
        )
        .route(
            "/{id}",
            patch(handlers::reimbursements_handler::update_reimbursement_status),
        )
        .layer(DefaultBodyLimit::max(state.config.max_upload_bytes));

    let user_routes = Router::new()
        .route("/sync", post(handlers::users_handler::sync_user))
        .route(
            "/me",
            get(handlers::users_handler::get_me).put(handlers::users_handler::update_me),
        );

    let github_routes = Router::new()
        .route("/org-members", get(handlers::github_handler::org_members))
        .route("/member-stats", get(handlers::github_handler::member_stats));

    let reference_routes = Router::new()
        .route("/ooo-reasons", get(handlers::references_handler::get_ooo_reasons))
        .route(
            "/reimbursement-categories",
            get(handlers::references_handler::get_reimbursement_categories),
        );

    let calendar_routes = Router::new()
        .route("/", get(handlers::calendar_handler::get_month))
        .route("/events", get(handlers::calendar_handler::list_events));

    // Page paths, guarded by the session gate
    let dashboard_routes = Router::new()
        .route("/", get(handlers::dashboard_handler::dashboard))
        .route("/admin", get(handlers::dashboard_handler::dashboard))
        .route("/admin/{*section}", get(handlers::dashboard_handler::dashboard))
        .route("/employee", get(handlers::dashboard_handler::dashboard))
        .route("/employee/{*section}", get(handlers::dashboard_handler::dashboard));

    let debug_routes = Router::new()
        .route("/debug", get(handlers::debug_handler))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            mw::require_debug_key,
        ));

    let router = Router::new()
        .merge(dashboard_routes)
        .merge(debug_routes)
        .route("/health", get(handlers::health_check))
        .route("/metrics", get(handlers::metrics_handler))
        .nest("/api/auth", auth_routes)
        .nest("/api/ooo", ooo_routes)
        .nest("/api/reimbursements", reimbursement_routes)
        .nest("/api/users", user_routes)
        .nest("/api/github", github_routes)
        .nest("/api/references", reference_routes)
        .nest("/api/calendar", calendar_routes)
        .route("/api/news", get(handlers::news_handler::get_news))
        .route("/api/payments/quote", post(handlers::payments_handler::quote_payment))
        .route("/api-docs/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .merge(Scalar::with_url("/docs", ApiDoc::openapi()))
        .layer(middleware::from_fn_with_state(state.clone(), mw::session_gate))
        .layer(middleware::from_fn(mw::metrics_middleware))
        .layer(middleware::from_fn(mw::request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                )
            }),
        )
        .layer(cors)
        .with_state(state);

    Ok(router)
}
