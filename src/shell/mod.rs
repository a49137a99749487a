// Composition root: configuration, authentication, state wiring and the
// HTTP and GraphQL surfaces.

pub mod auth;
pub mod config;
pub mod graphql;
pub mod http;
pub mod seed;
pub mod state;
