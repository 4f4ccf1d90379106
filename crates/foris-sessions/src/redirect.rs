//! Validation of user supplied redirect targets

use url::{ParseError, Url};

/// Whether `target` may be redirected to after login
///
/// Relative paths are safe. Absolute URLs must use HTTP(S) and, when `host`
/// is given, point to it. CR and LF are rejected outright.
///
/// # Examples
///
/// ```
/// use foris_sessions::is_safe_redirect;
///
/// assert!(is_safe_redirect("/config/wan/", Some("192.168.1.1")));
/// assert!(is_safe_redirect("http://192.168.1.1/config/", Some("192.168.1.1")));
/// assert!(!is_safe_redirect("https://evil.example/", Some("192.168.1.1")));
/// assert!(!is_safe_redirect("javascript:alert(1)", None));
/// ```
pub fn is_safe_redirect(target: &str, host: Option<&str>) -> bool {
	if target.contains(['\r', '\n']) {
		tracing::warn!(target, "Possible CRLF injection in redirect target");
		return false;
	}
	if target.starts_with("/\\") || target.starts_with("\\") {
		return false;
	}

	let url = match Url::parse(target) {
		Ok(url) => url,
		Err(ParseError::RelativeUrlWithoutBase) if target.starts_with("//") => {
			match Url::parse(&format!("http:{target}")) {
				Ok(url) => url,
				Err(_) => return false,
			}
		}
		Err(ParseError::RelativeUrlWithoutBase) => return true,
		Err(_) => return false,
	};

	if !matches!(url.scheme(), "http" | "https") {
		return false;
	}
	match (host, url.host_str()) {
		(None, _) => true,
		(Some(expected), Some(actual)) => netloc(actual, url.port()) == expected,
		(Some(_), None) => false,
	}
}

fn netloc(host: &str, port: Option<u16>) -> String {
	match port {
		Some(port) => format!("{host}:{port}"),
		None => host.to_string(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("/", true)]
	#[case("config/", true)]
	#[case("//evil.example/", false)]
	#[case("//router.lan/config/", true)]
	#[case("http://router.lan:8080/", false)]
	#[case("ftp://router.lan/", false)]
	#[case("/\\evil.example", false)]
	#[case("/config/\r\nSet-Cookie: x=y", false)]
	fn test_is_safe_redirect(#[case] target: &str, #[case] expected: bool) {
		// Act & Assert
		assert_eq!(is_safe_redirect(target, Some("router.lan")), expected);
	}

	#[rstest]
	fn test_any_http_host_without_expected_host() {
		// Act & Assert
		assert!(is_safe_redirect("https://elsewhere.example/", None));
	}
}
