pub mod agenda;
pub mod app_state;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod keycloak;
pub mod models;
pub mod motion;
pub mod projector;
