//! Remote path arithmetic.
//!
//! Remote paths always use `/`, whatever the local platform.

/// Normalize a remote path: unify separators, resolve `.` and `..`, drop
/// repeated and trailing separators.
pub fn normalize(path: &str) -> String {
    let unified = path.replace('\\', "/");
    let absolute = unified.starts_with('/');

    let mut parts: Vec<&str> = Vec::new();
    for part in unified.split('/') {
        match part {
            "" | "." => {}
            ".." => match parts.last() {
                Some(&last) if last != ".." => {
                    parts.pop();
                }
                // `..` above `/` stays at `/`
                _ if absolute => {}
                _ => parts.push(".."),
            },
            name => parts.push(name),
        }
    }

    let joined = parts.join("/");
    match (absolute, joined.is_empty()) {
        (true, _) => format!("/{}", joined),
        (false, true) => ".".to_string(),
        (false, false) => joined,
    }
}

/// Append local path segments to a remote base path.
pub fn join<S: AsRef<str>>(base: &str, segments: &[S]) -> String {
    let mut joined = base.to_string();
    for segment in segments {
        joined.push('/');
        joined.push_str(segment.as_ref());
    }
    normalize(&joined)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_absolute() {
        assert_eq!(normalize("/home/"), "/home");
        assert_eq!(normalize("/home//user/./site"), "/home/user/site");
        assert_eq!(normalize("/home/user/../other"), "/home/other");
        assert_eq!(normalize("/../x"), "/x");
        assert_eq!(normalize("/"), "/");
    }

    #[test]
    fn test_normalize_backslashes() {
        assert_eq!(normalize("\\srv\\www"), "/srv/www");
    }

    #[test]
    fn test_normalize_relative() {
        assert_eq!(normalize("a/../.."), "..");
        assert_eq!(normalize("./"), ".");
    }

    #[test]
    fn test_join() {
        assert_eq!(join("/home", &["a", "b"]), "/home/a/b");
        assert_eq!(join("/home/", &["a"]), "/home/a");
        assert_eq!(join::<&str>("/r", &[]), "/r");
        assert_eq!(join("/", &["z"]), "/z");
    }
}
