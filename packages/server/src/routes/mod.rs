use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::handlers;
use crate::state::AppState;

pub fn api_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .nest("/auth", auth_routes())
        .nest("/cheaters", cheater_routes())
}

fn auth_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::auth::login))
        .routes(routes!(handlers::auth::change_credentials))
}

fn cheater_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::cheater::list_cheaters,
            handlers::cheater::create_cheater
        ))
        .routes(routes!(
            handlers::cheater::get_cheater,
            handlers::cheater::update_cheater,
            handlers::cheater::delete_cheater
        ))
}
