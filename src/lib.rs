pub mod api;
pub mod bootstrap;
pub mod common;
pub mod config;
pub mod conversion;

use crate::api::handlers::convert::generate_convert_routes;

/// Assemble the Rocket instance. Kept separate from `main` so the local
/// test client can mount the same routes.
pub fn build_rocket() -> rocket::Rocket<rocket::Build> {
    let figment = rocket::Config::figment()
        .merge(("limits.file", "32MiB"))
        .merge(("limits.data-form", "256MiB"));

    rocket::custom(figment).mount("/", generate_convert_routes())
}
