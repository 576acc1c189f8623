//! Admin page routes. Every route sits behind the admin bearer-token gate.

use crate::extractors::require_admin;
use crate::handlers::resource::{
    bulk_delete, create_page, destroy, edit_page, list, navigation, patch, replace, store, view,
};
use crate::state::AppState;
use axum::{middleware, routing::get, routing::post, Router};

pub fn admin_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(navigation))
        .route("/:slug", get(list).post(store))
        .route("/:slug/create", get(create_page))
        .route("/:slug/bulk-delete", post(bulk_delete))
        .route(
            "/:slug/:record",
            get(view).put(replace).patch(patch).delete(destroy),
        )
        .route("/:slug/:record/edit", get(edit_page))
        .layer(middleware::from_fn_with_state(state.clone(), require_admin))
        .with_state(state)
}
