pub mod authenticate;

pub use authenticate::authenticate_post;
