// handlers/mod.rs - Handlers grouped by security tier
//
// Public (no auth) → Protected (bearer JWT, caller identity in request extensions)
pub mod protected;
pub mod public;
