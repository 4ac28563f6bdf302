#![doc = "The `taskgate` library crate."]
#![doc = ""]
#![doc = "Business rules for users and tasks, password hashing, JWT issuance and"]
#![doc = "verification, the authentication and admin request gates, the store"]
#![doc = "abstractions with their Postgres and in-memory implementations, and the"]
#![doc = "actix-web routes. `main.rs` wires these together into the server."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod routes;
pub mod usecases;

pub use crate::error::{AppError, DomainError, ErrorKind};
