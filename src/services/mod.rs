pub mod factory;
pub mod introspection;
pub mod policy;

pub use factory::{build_introspection_client, build_policy};
