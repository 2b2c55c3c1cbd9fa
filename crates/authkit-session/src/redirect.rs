//! Sign-in redirect targets.

/// Query parameter carrying the originally requested location.
pub const REDIRECT_PARAM: &str = "redirectTo";

/// Build the sign-in location that returns the user to `requested` afterwards.
///
/// `requested` is the path and query of the original request; it is
/// percent-encoded into a single `redirectTo` parameter.
#[must_use]
pub fn sign_in_redirect(sign_in_path: &str, requested: &str) -> String {
    format!(
        "{sign_in_path}?{REDIRECT_PARAM}={}",
        urlencoding::encode(requested)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_path() {
        assert_eq!(
            sign_in_redirect("/sign-in", "/dashboard"),
            "/sign-in?redirectTo=%2Fdashboard"
        );
    }

    #[test]
    fn encodes_query() {
        assert_eq!(
            sign_in_redirect("/sign-in", "/orders?page=2&sort=desc"),
            "/sign-in?redirectTo=%2Forders%3Fpage%3D2%26sort%3Ddesc"
        );
    }

    #[test]
    fn root_path() {
        assert_eq!(sign_in_redirect("/login", "/"), "/login?redirectTo=%2F");
    }
}
