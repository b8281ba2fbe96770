//! HTTP server: storefront, widget admin and JSON API

pub mod extractors;
mod layout;
pub mod middleware;
pub mod openapi;
pub mod routes;
mod server;
pub mod types;

pub use server::{ApiServer, build_router};
