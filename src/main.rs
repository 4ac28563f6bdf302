use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use log::{info, warn};
use sqlx::PgPool;
use std::io;
use std::sync::Arc;

use taskgate::auth::{BcryptHasher, TokenService};
use taskgate::config::Config;
use taskgate::repository::postgres::run_migrations;
use taskgate::repository::{
    InMemoryTaskRepository, InMemoryUserRepository, PgTaskRepository, PgUserRepository,
    TaskRepository, UserRepository,
};
use taskgate::routes::{self, health};
use taskgate::usecases::{TaskUseCase, UserUseCase};

fn startup_error(err: impl std::fmt::Display) -> io::Error {
    io::Error::new(io::ErrorKind::Other, err.to_string())
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let config = Config::from_env().map_err(startup_error)?;
    let tokens = Arc::new(TokenService::new(&config.jwt_secret).map_err(startup_error)?);
    let hasher = Arc::new(BcryptHasher::new(config.bcrypt_cost));

    let (user_store, task_store): (Arc<dyn UserRepository>, Arc<dyn TaskRepository>) =
        match &config.database_url {
            Some(database_url) => {
                let pool = PgPool::connect(database_url).await.map_err(startup_error)?;
                run_migrations(&pool).await.map_err(startup_error)?;
                info!("Using Postgres store");
                (
                    Arc::new(PgUserRepository::new(pool.clone())),
                    Arc::new(PgTaskRepository::new(pool)),
                )
            }
            None => {
                warn!("DATABASE_URL not set, data will be kept in memory only");
                (
                    Arc::new(InMemoryUserRepository::new()),
                    Arc::new(InMemoryTaskRepository::new()),
                )
            }
        };

    let users = web::Data::new(UserUseCase::new(user_store, hasher, tokens.clone()));
    let tasks = web::Data::new(TaskUseCase::new(task_store));

    info!("Starting taskgate server at {}", config.server_url());
    HttpServer::new(move || {
        App::new()
            .app_data(users.clone())
            .app_data(tasks.clone())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .service(health::health)
            .service(web::scope("/api").configure(routes::config(tokens.clone())))
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}
