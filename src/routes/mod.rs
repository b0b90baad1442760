use axum::Router;

pub mod classify;
pub mod system;

pub fn handler() -> Router {
    Router::new()
        .merge(system::handler())
        .merge(classify::handler())
}
