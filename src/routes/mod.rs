pub mod health;
pub mod tasks;
pub mod users;

use actix_web::{guard, web};
use std::sync::Arc;

use crate::auth::{AdminOnly, AuthMiddleware, TokenService};

/// Registers the API routes.
///
/// Reads need a valid token; writes and promotion additionally need the admin
/// role. Resources sharing a path are told apart by method guards so each can
/// carry its own gates.
pub fn config(tokens: Arc<TokenService>) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        let authenticated = || AuthMiddleware::new(tokens.clone());

        cfg.route("/register", web::post().to(users::register))
            .route("/login", web::post().to(users::login))
            .service(
                web::resource("/tasks")
                    .guard(guard::Get())
                    .wrap(authenticated())
                    .to(tasks::get_tasks),
            )
            .service(
                web::resource("/tasks")
                    .guard(guard::Post())
                    .wrap(AdminOnly)
                    .wrap(authenticated())
                    .to(tasks::create_task),
            )
            .service(
                web::resource("/tasks/{id}")
                    .guard(guard::Get())
                    .wrap(authenticated())
                    .to(tasks::get_task),
            )
            .service(
                web::resource("/tasks/{id}")
                    .guard(guard::Put())
                    .wrap(AdminOnly)
                    .wrap(authenticated())
                    .to(tasks::update_task),
            )
            .service(
                web::resource("/tasks/{id}")
                    .guard(guard::Delete())
                    .wrap(AdminOnly)
                    .wrap(authenticated())
                    .to(tasks::delete_task),
            )
            .service(
                web::resource("/promote/{id}")
                    .guard(guard::Put())
                    .wrap(AdminOnly)
                    .wrap(authenticated())
                    .to(users::promote_to_admin),
            );
    }
}
