#![allow(dead_code)]

use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::{header, StatusCode};
use actix_web::middleware::Logger;
use actix_web::{test, web, App};
use serde_json::{json, Value};
use std::sync::Arc;

use taskgate::auth::{BcryptHasher, TokenService};
use taskgate::repository::{InMemoryTaskRepository, InMemoryUserRepository};
use taskgate::routes::{self, health};
use taskgate::usecases::{TaskUseCase, UserUseCase};

pub const JWT_SECRET: &str = "integration-test-secret";
pub const PASSWORD: &str = "Password123!";

/// Fresh in-memory stores and services for one test.
pub struct TestContext {
    pub users: web::Data<UserUseCase>,
    pub tasks: web::Data<TaskUseCase>,
    pub tokens: Arc<TokenService>,
}

impl TestContext {
    pub fn new() -> Self {
        let tokens = Arc::new(TokenService::new(JWT_SECRET).expect("secret is set"));
        let users = UserUseCase::new(
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(BcryptHasher::new(4 /* bcrypt minimum cost */)),
            tokens.clone(),
        );
        let tasks = TaskUseCase::new(Arc::new(InMemoryTaskRepository::new()));

        Self {
            users: web::Data::new(users),
            tasks: web::Data::new(tasks),
            tokens,
        }
    }

    pub async fn app(
        &self,
    ) -> impl Service<
        actix_http::Request,
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
    > {
        test::init_service(
            App::new()
                .app_data(self.users.clone())
                .app_data(self.tasks.clone())
                .wrap(Logger::default())
                .service(health::health)
                .service(web::scope("/api").configure(routes::config(self.tokens.clone()))),
        )
        .await
    }
}

/// Sends a request and returns the status with the parsed JSON body (`Null` if empty).
pub async fn send<S, B>(
    app: &S,
    req: test::TestRequest,
    token: Option<&str>,
) -> (StatusCode, Value)
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = match token {
        Some(token) => req.insert_header((header::AUTHORIZATION, format!("Bearer {}", token))),
        None => req,
    };
    let resp = test::call_service(app, req.to_request()).await;
    let status = resp.status();
    let bytes = test::read_body(resp).await;
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

pub async fn register<S, B>(app: &S, username: &str, password: &str) -> (StatusCode, Value)
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/api/register")
        .set_json(json!({ "username": username, "password": password }));
    send(app, req, None).await
}

pub async fn login<S, B>(app: &S, username: &str, password: &str) -> (StatusCode, Value)
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/api/login")
        .set_json(json!({ "username": username, "password": password }));
    send(app, req, None).await
}

/// Registers `username` and returns a token for it.
pub async fn register_and_login<S, B>(app: &S, username: &str) -> String
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let (status, body) = register(app, username, PASSWORD).await;
    assert_eq!(status, StatusCode::CREATED, "register {}: {}", username, body);

    let (status, body) = login(app, username, PASSWORD).await;
    assert_eq!(status, StatusCode::OK, "login {}: {}", username, body);
    body["token"].as_str().expect("token in login response").to_string()
}
