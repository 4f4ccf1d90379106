//! In-memory backend
//!
//! Stores UCI values in a map and answers RPC actions from programmed
//! responses. Used for development and by the test suites of the other crates.
//!
//! ## Features
//!
//! - **Programmable RPC**: [`MemoryBackend::respond`] registers the reply of an action
//! - **Outage simulation**: [`MemoryBackend::set_available`] makes every call fail
//! - **Inspection**: fetch counter, mutation log and recorded RPC calls

use crate::client::Backend;
use crate::error::{BackendError, BackendResult};
use crate::uci::{UciChange, UciOp, UciPath};
use parking_lot::{Mutex, RwLock};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// An RPC call recorded by [`MemoryBackend`]
#[derive(Debug, Clone, PartialEq)]
pub struct RpcCall {
	pub module: String,
	pub action: String,
	pub payload: Value,
}

/// Backend keeping configuration in process memory
///
/// Clones share the same storage.
///
/// ## Example
///
/// ```
/// use foris_backend::{Backend, MemoryBackend};
/// use serde_json::json;
///
/// let backend = MemoryBackend::new()
/// 	.with_value("network.wan.proto", json!("dhcp"))
/// 	.respond("updater", "run", json!({"result": true}));
///
/// let path = "network.wan.proto".parse().unwrap();
/// assert_eq!(backend.fetch(&path).unwrap(), Some(json!("dhcp")));
/// assert_eq!(backend.fetch_count(), 1);
///
/// let reply = backend.perform("updater", "run", json!({})).unwrap();
/// assert_eq!(reply, json!({"result": true}));
/// ```
#[derive(Clone, Default)]
pub struct MemoryBackend {
	values: Arc<RwLock<HashMap<String, Value>>>,
	responses: Arc<RwLock<HashMap<(String, String), Value>>>,
	calls: Arc<Mutex<Vec<RpcCall>>>,
	mutations: Arc<Mutex<Vec<Vec<UciChange>>>>,
	fetches: Arc<AtomicUsize>,
	unavailable: Arc<AtomicBool>,
}

impl MemoryBackend {
	pub fn new() -> Self {
		Self::default()
	}

	/// Stores `value` at `path`, builder style
	pub fn with_value(self, path: &str, value: Value) -> Self {
		self.set_value(path, value);
		self
	}

	/// Registers the reply of an RPC action, builder style
	pub fn respond(self, module: &str, action: &str, reply: Value) -> Self {
		self.set_response(module, action, reply);
		self
	}

	pub fn set_value(&self, path: &str, value: Value) {
		self.values.write().insert(path.to_string(), value);
	}

	/// Current value at `path` without counting as a fetch
	pub fn value(&self, path: &str) -> Option<Value> {
		self.values.read().get(path).cloned()
	}

	pub fn set_response(&self, module: &str, action: &str, reply: Value) {
		self.responses
			.write()
			.insert((module.to_string(), action.to_string()), reply);
	}

	/// Simulates the backend going away (`false`) or coming back (`true`)
	pub fn set_available(&self, available: bool) {
		self.unavailable.store(!available, Ordering::SeqCst);
	}

	/// Number of [`Backend::fetch`] calls served so far
	pub fn fetch_count(&self) -> usize {
		self.fetches.load(Ordering::SeqCst)
	}

	/// Every successful [`Backend::mutate`] batch, oldest first
	pub fn mutation_log(&self) -> Vec<Vec<UciChange>> {
		self.mutations.lock().clone()
	}

	pub fn rpc_calls(&self) -> Vec<RpcCall> {
		self.calls.lock().clone()
	}

	fn ensure_available(&self) -> BackendResult<()> {
		if self.unavailable.load(Ordering::SeqCst) {
			Err(BackendError::Unavailable("memory backend switched off".to_string()))
		} else {
			Ok(())
		}
	}
}

fn apply(values: &mut HashMap<String, Value>, change: &UciChange) {
	let key = change.path.to_string();
	match &change.op {
		UciOp::Set(value) => {
			values.insert(key, value.clone());
		}
		UciOp::Delete => {
			let prefix = format!("{}.", key);
			values.retain(|k, _| k != &key && !k.starts_with(&prefix));
		}
		UciOp::AddList(item) => {
			let entry = values.entry(key).or_insert_with(|| Value::Array(Vec::new()));
			match entry {
				Value::Array(items) => items.push(Value::String(item.clone())),
				other => {
					let previous = other.take();
					*other = Value::Array(vec![previous, Value::String(item.clone())]);
				}
			}
		}
		UciOp::DelList(item) => {
			if let Some(Value::Array(items)) = values.get_mut(&key) {
				items.retain(|v| v.as_str() != Some(item.as_str()));
			}
		}
	}
}

impl Backend for MemoryBackend {
	fn fetch(&self, path: &UciPath) -> BackendResult<Option<Value>> {
		self.ensure_available()?;
		self.fetches.fetch_add(1, Ordering::SeqCst);
		Ok(self.values.read().get(&path.to_string()).cloned())
	}

	fn mutate(&self, changes: &[UciChange]) -> BackendResult<()> {
		self.ensure_available()?;
		let mut values = self.values.write();
		for change in changes {
			apply(&mut values, change);
		}
		self.mutations.lock().push(changes.to_vec());
		Ok(())
	}

	fn perform(&self, module: &str, action: &str, payload: Value) -> BackendResult<Value> {
		self.ensure_available()?;
		self.calls.lock().push(RpcCall {
			module: module.to_string(),
			action: action.to_string(),
			payload,
		});
		self.responses
			.read()
			.get(&(module.to_string(), action.to_string()))
			.cloned()
			.ok_or_else(|| BackendError::Rpc {
				module: module.to_string(),
				action: action.to_string(),
				message: "no such action".to_string(),
			})
	}
}
