//! Client library for the [CARMIN](https://github.com/CARMIN-org/CARMIN-API) REST API
//! exposed by the VIP (Virtual Imaging Platform).
//!
//! Every operation on [CarminClient] performs a single blocking HTTP request.
//! Server-side failures are reported by VIP as a JSON error envelope
//! (see [errors::detect_error]) which is turned into [CarminError::Vip],
//! except for the path-mutating operations which collapse it into `false`.

mod client;
pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod types;

pub use client::{CarminClient, TlsVerification};
pub use config::ClientConfig;
pub use errors::{CarminError, ErrorEnvelope};
