//! Batched configuration writes
//!
//! Saving a form may produce changes from several callbacks. They are queued
//! here and reach the backend in one [`Backend::mutate`] call, so either all of
//! them are applied or none is.

use crate::client::Backend;
use crate::error::BackendResult;
use crate::uci::UciChange;

/// Queue of pending configuration changes bound to a backend
///
/// # Examples
///
/// ```
/// use foris_backend::{Configurator, MemoryBackend, UciChange};
///
/// let backend = MemoryBackend::new();
/// let mut configurator = Configurator::new(&backend);
///
/// configurator.queue(UciChange::set("foris.wizard.allowed_step_max", "2").unwrap());
/// configurator.queue(UciChange::set_bool("foris.wizard.finished", false).unwrap());
/// assert_eq!(configurator.pending().len(), 2);
///
/// assert_eq!(configurator.commit().unwrap(), 2);
/// assert_eq!(backend.mutation_log().len(), 1);
/// ```
pub struct Configurator<'a> {
	backend: &'a dyn Backend,
	queue: Vec<UciChange>,
}

impl<'a> Configurator<'a> {
	pub fn new(backend: &'a dyn Backend) -> Self {
		Self {
			backend,
			queue: Vec::new(),
		}
	}

	pub fn queue(&mut self, change: UciChange) {
		self.queue.push(change);
	}

	pub fn extend(&mut self, changes: impl IntoIterator<Item = UciChange>) {
		self.queue.extend(changes);
	}

	pub fn pending(&self) -> &[UciChange] {
		&self.queue
	}

	pub fn is_empty(&self) -> bool {
		self.queue.is_empty()
	}

	/// Flushes the queue, returning the number of applied changes
	///
	/// An empty queue does not reach the backend.
	pub fn commit(self) -> BackendResult<usize> {
		if self.queue.is_empty() {
			return Ok(0);
		}
		let count = self.queue.len();
		tracing::debug!(changes = count, "Committing configuration changes");
		self.backend.mutate(&self.queue).inspect_err(|e| {
			tracing::warn!(error = %e, changes = count, "Configuration commit failed");
		})?;
		Ok(count)
	}
}
