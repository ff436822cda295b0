//! Contact management web backend.
//!
//! A small HTTP/JSON service storing contact records in SQLite, with a
//! single static page as its front end.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod store;

pub use config::ServerConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use store::{Contact, ContactFields, ContactStore, SqliteContactStore, StoreError};
