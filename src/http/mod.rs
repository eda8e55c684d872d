//! HTTP surface of the front-end bridge

pub mod routes;

pub use routes::build_router;
