pub mod reports;

use axum::Router;

use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/reports", reports::router())
        .with_state(state)
}
