use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware::from_fn_with_state,
    routing::get,
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::database::models::{Aluno, Curso, Matricula};
use crate::handlers::{health, matriculas, resource};
use crate::middleware::basic_auth_middleware;
use crate::state::AppState;

/// Full application router: public health probe plus the guarded resources
pub fn app(state: AppState) -> Router {
    let config = state.config.clone();

    let resources = resource_routes().route_layer(from_fn_with_state(
        state.clone(),
        basic_auth_middleware,
    ));
    let resources = if config.api.prefix.is_empty() {
        resources
    } else {
        Router::new().nest(&config.api.prefix, resources)
    };

    let mut router = Router::new()
        .route("/health", get(health::health))
        .merge(resources)
        .fallback(health::not_found)
        .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes))
        .with_state(state);

    if config.security.enable_cors {
        router = router.layer(cors_layer(&config.security.cors_origins));
    }
    if config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    router
}

fn resource_routes() -> Router<AppState> {
    Router::new()
        // Students
        .route(
            "/alunos/",
            get(resource::list::<Aluno>).post(resource::create::<Aluno>),
        )
        .route(
            "/alunos/:id/",
            get(resource::retrieve::<Aluno>)
                .put(resource::update::<Aluno>)
                .patch(resource::partial_update::<Aluno>)
                .delete(resource::destroy::<Aluno>),
        )
        .route("/alunos/:id/matriculas/", get(matriculas::by_aluno))
        // Courses
        .route(
            "/cursos/",
            get(resource::list::<Curso>).post(resource::create::<Curso>),
        )
        .route(
            "/cursos/:id/",
            get(resource::retrieve::<Curso>)
                .put(resource::update::<Curso>)
                .patch(resource::partial_update::<Curso>)
                .delete(resource::destroy::<Curso>),
        )
        .route("/cursos/:id/alunos/", get(matriculas::by_curso))
        // Enrollments
        .route(
            "/matriculas/",
            get(resource::list::<Matricula>).post(resource::create::<Matricula>),
        )
        .route(
            "/matriculas/:id/",
            get(resource::retrieve::<Matricula>)
                .put(resource::update::<Matricula>)
                .patch(resource::partial_update::<Matricula>)
                .delete(resource::destroy::<Matricula>),
        )
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any)
}
