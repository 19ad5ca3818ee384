//! Typed DynamoDB client.
//!
//! [`Dyno`] turns native values and [`Condition`] trees into signed JSON
//! requests, sends them through a [`Transport`] and decodes the responses
//! into [`DynoResult`]s that carry the consumed capacity alongside the items.
//!
//! ```no_run
//! use dyno_client::{CredentialSource, Dyno, DynoOptions, Scan};
//! use dyno_expression::{Comparator, Condition};
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Dinosaur {
//!     name: String,
//!     teeth: u32,
//! }
//!
//! # async fn run() -> dyno_client::Result<()> {
//! let dyno = Dyno::new(None, &CredentialSource::default(), DynoOptions::from_env())?;
//! let scan = Scan::new("Dinosaurs").filter(Condition::compare("teeth", Comparator::Ge, 40));
//! for dinosaur in dyno.scan::<Dinosaur>(&scan).await? {
//!     println!("{} has {} teeth", dinosaur.name, dinosaur.teeth);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! [`Condition`]: dyno_expression::Condition

pub mod client;
pub mod config;
pub mod connection;
pub mod envelope;
pub mod error;
pub mod region;
pub mod request;
pub mod result;
pub mod transport;

pub use client::{Dyno, ScanPage, total_capacity};
pub use config::{DEFAULT_PAGE_SIZE, DynoOptions};
pub use connection::Connection;
pub use dyno_auth::{CredentialSource, Credentials};
pub use envelope::{Billing, Delete, Get, Put, Scan, TableSpec};
pub use error::{DynoError, Result};
pub use region::{DEFAULT_REGION, resolve_region};
pub use request::Endpoint;
pub use result::DynoResult;
pub use transport::{ReqwestTransport, Transport, TransportFuture};
