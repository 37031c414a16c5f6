//! # Tessera Core
//!
//! Types shared by the Tessera crates:
//!
//! - [`PathVars`] - path variables captured by a router for one request
//! - [`ApiError`] - the JSON error envelope returned to clients

#![doc(html_root_url = "https://docs.rs/tessera-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod api_error;
mod path_vars;

pub use api_error::ApiError;
pub use path_vars::PathVars;
