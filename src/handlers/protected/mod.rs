// handlers/protected/mod.rs - Endpoints behind the JWT middleware
//
// Handlers receive the authenticated caller as `Extension<CallerIdentity>`.
pub mod cities;
pub mod points_of_interest;
