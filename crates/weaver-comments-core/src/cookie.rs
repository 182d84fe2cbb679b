//! Cookie lookup for the anti-forgery token.
//!
//! Requests that don't originate from a form (like, delete) have no token in
//! their payload and read it from `document.cookie` instead.

/// Find the value of cookie `name` in a `document.cookie` style string.
///
/// Pairs are separated by `;` with optional surrounding whitespace. The
/// value is everything after the first `=`, so values containing `=` are
/// returned whole. An empty value is `Some("")`, distinct from a missing
/// cookie.
pub fn cookie_value<'a>(cookies: &'a str, name: &str) -> Option<&'a str> {
    if name.is_empty() {
        return None;
    }
    cookies
        .split(';')
        .map(str::trim)
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| key.trim_end() == name)
        .map(|(_, value)| value.trim_start())
}

#[cfg(test)]
mod tests {
    use super::cookie_value;

    #[test]
    fn test_single_cookie() {
        assert_eq!(cookie_value("csrftoken=abc", "csrftoken"), Some("abc"));
    }

    #[test]
    fn test_target_between_other_cookies() {
        let jar = "sessionid=xyz; csrftoken=abc123; theme=dark";
        assert_eq!(cookie_value(jar, "csrftoken"), Some("abc123"));
        assert_eq!(cookie_value(jar, "sessionid"), Some("xyz"));
        assert_eq!(cookie_value(jar, "theme"), Some("dark"));
    }

    #[test]
    fn test_empty_value_is_present() {
        assert_eq!(cookie_value("a=1; csrftoken=; b=2", "csrftoken"), Some(""));
    }

    #[test]
    fn test_missing_cookie() {
        assert_eq!(cookie_value("a=1; b=2", "csrftoken"), None);
        assert_eq!(cookie_value("", "csrftoken"), None);
    }

    #[test]
    fn test_prefix_name_does_not_match() {
        assert_eq!(cookie_value("csrftokenx=1; csrftoken=2", "csrftoken"), Some("2"));
        assert_eq!(cookie_value("xcsrftoken=1", "csrftoken"), None);
    }

    #[test]
    fn test_value_with_equals_sign() {
        assert_eq!(cookie_value("token=a=b==", "token"), Some("a=b=="));
    }

    #[test]
    fn test_tolerates_missing_space_after_separator() {
        assert_eq!(cookie_value("a=1;csrftoken=abc", "csrftoken"), Some("abc"));
    }
}
