//! # PersonaBar Service Facade
//!
//! Panels reach the server through one generic call shape,
//! `{module_root}/{controller}/{action}`, with reads carrying their
//! parameters in the query string and writes in a JSON body. The
//! [`ServiceClient`] holds no state; [`Store`] and [`dispatch_call`] turn
//! responses into typed actions for a panel's reducer.
pub mod client;
pub mod error;
pub mod request;
pub mod response;
pub mod store;
pub mod transport;
pub mod validation;

pub use client::ServiceClient;
pub use error::{FieldError, ServiceError};
pub use request::{Method, ServiceCall};
pub use response::ApiResponse;
pub use store::{Store, dispatch_call, dispatch_call_or};
pub use transport::{HttpTransport, ServiceTransport};
pub use validation::FormValidator;

#[cfg(test)]
mod tests;
