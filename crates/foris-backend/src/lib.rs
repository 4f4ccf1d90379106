//! # Foris Backend
//!
//! Contract between the Foris web interface and the router configuration
//! backend.
//!
//! The backend itself (UCI over an RPC bus) is an external service. This crate
//! defines what the interface consumes from it:
//!
//! - [`Backend`]: read a configuration value, apply a batch of changes, and
//!   call named RPC actions
//! - [`UciPath`] / [`UciChange`]: addressing and mutation of UCI options
//! - [`Configurator`]: queues changes produced while saving a form and flushes
//!   them in a single [`Backend::mutate`] call
//! - [`BackendExt`]: typed wrappers over the RPC actions the pages and the
//!   wizard use
//! - [`MemoryBackend`]: an in-process backend for development and tests
//!
//! ## Example
//!
//! ```
//! use foris_backend::{Backend, Configurator, MemoryBackend, UciChange};
//! use serde_json::json;
//!
//! let backend = MemoryBackend::new().with_value("network.lan.ipaddr", json!("192.168.1.1"));
//!
//! let mut configurator = Configurator::new(&backend);
//! configurator.queue(UciChange::set("network.lan.ipaddr", "10.0.0.1").unwrap());
//! assert_eq!(configurator.commit().unwrap(), 1);
//!
//! assert_eq!(
//! 	backend.fetch(&"network.lan.ipaddr".parse().unwrap()).unwrap(),
//! 	Some(json!("10.0.0.1"))
//! );
//! ```

pub mod client;
pub mod configurator;
pub mod error;
pub mod memory;
pub mod uci;

pub use client::{
	Backend, BackendExt, ConnectivityReport, RadioBand, RemoteSettings, RemoteToken, RestoreOutcome,
	UpdaterStatus, WifiRadio,
};
pub use configurator::Configurator;
pub use error::{BackendError, BackendResult};
pub use memory::{MemoryBackend, RpcCall};
pub use uci::{UciChange, UciOp, UciPath, parse_uci_bool, uci_bool};
