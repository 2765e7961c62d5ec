pub mod claims;
pub mod client;

pub use claims::Claims;
pub use client::{ClientCredentials, IntrospectionClient, IntrospectionError, TokenIntrospector};
