//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (request ID, JSON body extraction)
//!     → handlers.rs (one store operation per endpoint)
//!     → response.rs (error → status code + JSON body)
//!     → Send to client
//! ```

pub mod handlers;
pub mod page;
pub mod request;
pub mod response;
pub mod server;

pub use request::{JsonBody, MakeRequestUuid, X_REQUEST_ID};
pub use response::{ApiError, StoreOp};
pub use server::{AppState, HttpServer};
