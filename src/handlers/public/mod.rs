// handlers/public/mod.rs - Endpoints that need no token
pub mod auth;
pub mod health;
