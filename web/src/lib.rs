//! Server-rendered frontend of the boilerplate
//!
//! Renders the landing page, checks the backend's health endpoint and relays
//! sign-in, sign-up and sign-out to the backend's auth routes.

pub mod auth_client;
pub mod components;
pub mod config;
pub mod health;
pub mod server;
pub mod shutdown;
pub mod sign_in_form;
