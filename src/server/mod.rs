pub mod app;
pub mod deserializers;
pub mod envelope;
pub mod error;
pub mod extract;
pub mod routes;
