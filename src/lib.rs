// src/lib.rs
//! Backend of the boilerplate: a health endpoint, an embedded email and
//! password auth engine mounted under `/api/v1/auth`, and the PostgreSQL
//! plumbing both rely on.

pub mod app;
pub mod auth;
pub mod common;
pub mod config;
pub mod cors;
pub mod db;
pub mod health;
pub mod logging_middleware;
