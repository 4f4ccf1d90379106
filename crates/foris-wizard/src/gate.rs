//! Step gate
//!
//! A router may show any step up to its allowed maximum `M`. Completing step
//! `k == M` opens step `k + 1`; the new maximum is committed to the backend
//! and mirrored in the session. The maximum only grows, except that skipping
//! jumps straight to the last step and marks the wizard finished.

use crate::error::WizardResult;
use crate::step::StepId;
use foris_backend::Configurator;
use foris_core::{Location, NUM_WIZARD_STEPS, RequestContext, WizardProgress, record_progress, wizard_progress};
use foris_forms::{Callback, CallbackOutcome};

/// Redirect for a step the progress does not allow yet
pub fn check_step(progress: WizardProgress, step: StepId) -> Option<Location> {
	if progress.allows(step.number()) {
		None
	} else {
		let target = progress.allowed_step_max.min(NUM_WIZARD_STEPS);
		tracing::debug!(step = step.number(), allowed = target, "Wizard step not allowed yet");
		Some(Location::WizardStep(target))
	}
}

/// Progress after opening step `next`, `None` when nothing changes
///
/// # Examples
///
/// ```
/// use foris_core::WizardProgress;
/// use foris_wizard::gate::advanced;
///
/// let progress = WizardProgress::new(3, false);
/// assert_eq!(advanced(progress, 4, false), Some(WizardProgress::new(4, false)));
/// assert_eq!(advanced(progress, 3, false), None);
/// ```
pub fn advanced(progress: WizardProgress, next: u8, finish: bool) -> Option<WizardProgress> {
	let updated = WizardProgress::new(
		progress.allowed_step_max.max(next),
		progress.finished || finish,
	);
	(updated != progress).then_some(updated)
}

/// Progress after completing `step`
pub fn completed(progress: WizardProgress, step: StepId) -> Option<WizardProgress> {
	advanced(progress, step.next_number(), step.is_final())
}

/// Save callback storing `updated` together with the changes of the form
pub fn progress_callback(updated: Option<WizardProgress>) -> Callback {
	Box::new(move |_data| {
		Ok(match updated {
			Some(progress) => CallbackOutcome::EditConfig(progress.changes()?),
			None => CallbackOutcome::None,
		})
	})
}

/// Opens step `next` right away, outside of a form save
///
/// Returns whether the progress changed; calling it again is a no-op.
pub fn open_step(ctx: &mut RequestContext<'_>, next: u8, finish: bool) -> WizardResult<bool> {
	let progress = wizard_progress(ctx)?;
	let Some(updated) = advanced(progress, next, finish) else {
		return Ok(false);
	};
	commit(ctx, updated)?;
	Ok(true)
}

/// Opens the step following `step`
pub fn complete_step(ctx: &mut RequestContext<'_>, step: StepId) -> WizardResult<bool> {
	open_step(ctx, step.next_number(), step.is_final())
}

/// Whether the rest of the wizard may be skipped
pub fn may_skip(progress: WizardProgress) -> bool {
	let current = progress.allowed_step_max.min(NUM_WIZARD_STEPS);
	let can_skip = StepId::try_from(current).is_ok_and(StepId::can_skip);
	can_skip || progress.allowed_step_max >= NUM_WIZARD_STEPS || progress.finished
}

/// Writes `progress` to the backend in one commit, then to the session
pub(crate) fn commit(ctx: &mut RequestContext<'_>, progress: WizardProgress) -> WizardResult<()> {
	let mut configurator = Configurator::new(ctx.backend());
	configurator.extend(progress.changes()?);
	configurator.commit()?;
	record_progress(ctx.session_mut(), progress);
	tracing::info!(
		allowed_step_max = progress.allowed_step_max,
		finished = progress.finished,
		"Wizard progress stored"
	);
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case(3, StepId::Wan, None)]
	#[case(3, StepId::Connectivity, None)]
	#[case(3, StepId::Region, Some(Location::WizardStep(3)))]
	#[case(11, StepId::Registration, None)]
	fn test_check_step(#[case] max: u8, #[case] step: StepId, #[case] expected: Option<Location>) {
		// Act & Assert
		assert_eq!(check_step(WizardProgress::new(max, false), step), expected);
	}

	#[rstest]
	#[case(4, StepId::Region, Some(WizardProgress::new(5, false)))]
	#[case(5, StepId::Region, None)]
	#[case(9, StepId::Wifi, Some(WizardProgress::new(10, true)))]
	fn test_completed(
		#[case] max: u8,
		#[case] step: StepId,
		#[case] expected: Option<WizardProgress>,
	) {
		// Act & Assert
		assert_eq!(completed(WizardProgress::new(max, false), step), expected);
	}

	#[rstest]
	fn test_final_step_marks_finished_when_redone() {
		// Arrange
		let progress = WizardProgress::new(10, false);

		// Act
		let updated = completed(progress, StepId::Wifi);

		// Assert
		assert_eq!(updated, Some(WizardProgress::new(10, true)));
	}

	#[rstest]
	#[case(WizardProgress::new(1, false), false)]
	#[case(WizardProgress::new(4, false), true)]
	#[case(WizardProgress::new(10, false), true)]
	#[case(WizardProgress::new(1, true), true)]
	fn test_may_skip(#[case] progress: WizardProgress, #[case] expected: bool) {
		// Act & Assert
		assert_eq!(may_skip(progress), expected);
	}
}
