//! Login and logout

use crate::error::ConfigResult;
use foris_backend::BackendExt;
use foris_core::progress::PASSWORD_PATH;
use foris_core::{Location, MessageFilter, PageView, RequestContext, Response, wizard_progress};
use foris_sessions::{Argon2Hasher, PasswordHasher, check_password};

pub const WRONG_PASSWORD_MESSAGE: &str = "The password you entered was not valid.";

/// Renders the login page, or sends an authenticated user onwards
pub fn login_page(ctx: &mut RequestContext<'_>, next: Option<&str>) -> ConfigResult<Response> {
	if ctx.is_authenticated() {
		return landing(ctx, next);
	}
	let csrf_token = ctx.csrf_token();
	let title = ctx.gettext("Log in");
	let mut view = PageView::new("index", title).with("csrf_token", csrf_token);
	if let Some(next) = next.filter(|next| ctx.is_safe_redirect(next)) {
		view = view.with("next", next);
	}
	let messages = ctx.take_messages(MessageFilter::All);
	Ok(Response::render(view.with_messages(messages)))
}

/// Logs in with the stored argon2 password hash
pub fn login(
	ctx: &mut RequestContext<'_>,
	password: &str,
	next: Option<&str>,
) -> ConfigResult<Response> {
	login_with(ctx, &Argon2Hasher::new(), password, next)
}

/// Logs in, verifying the password with `hasher`
///
/// An unset password lets anyone in, the wizard has not run yet then.
pub fn login_with(
	ctx: &mut RequestContext<'_>,
	hasher: &dyn PasswordHasher,
	password: &str,
	next: Option<&str>,
) -> ConfigResult<Response> {
	let stored = ctx.backend().fetch_str(PASSWORD_PATH)?;
	if !check_password(hasher, password, stored.as_deref())? {
		tracing::warn!("Login refused, wrong password");
		ctx.error(WRONG_PASSWORD_MESSAGE);
		return Ok(Response::redirect(Location::Login));
	}
	ctx.authenticate()?;
	landing(ctx, next)
}

fn landing(ctx: &mut RequestContext<'_>, next: Option<&str>) -> ConfigResult<Response> {
	if let Some(next) = next.filter(|next| !next.is_empty()) {
		if ctx.is_safe_redirect(next) {
			return Ok(Response::redirect(Location::Url(next.to_string())));
		}
		tracing::warn!(%next, "Ignoring unsafe redirect target");
	}
	Ok(Response::redirect(wizard_progress(ctx)?.landing()))
}

/// Drops the authentication and returns to the login page
pub fn logout(ctx: &mut RequestContext<'_>) -> ConfigResult<Response> {
	ctx.logout()?;
	tracing::info!("User logged out");
	Ok(Response::redirect(Location::Login))
}

/// Redirect to the login page for an unauthenticated request of `path`
pub fn require_login(ctx: &RequestContext<'_>, path: &str) -> Option<Response> {
	if ctx.is_authenticated() {
		None
	} else {
		tracing::debug!(%path, "Authentication required");
		Some(Response::redirect(Location::LoginNext(path.to_string())))
	}
}
