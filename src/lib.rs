//! Chirpy: a small message board backend.
//!
//! The whole state lives in one JSON document on disk ([`db::Store`]). Every
//! operation in [`repository::Repository`] loads it, computes the new document and
//! commits it atomically. Identity comes from HS256 tokens issued by
//! [`auth::TokenService`]; [`routes::router`] exposes all of it over HTTP.

pub mod auth;
pub mod config;
pub mod db;
pub mod dto;
pub mod errors;
pub mod models;
pub mod repository;
pub mod routes;
pub mod states;

pub use states::AppState;
