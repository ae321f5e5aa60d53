//! Request path resolution module
//!
//! Turns an untrusted URL path into an absolute filesystem path confined to
//! the served root, or rejects it. Pure string/path work, no filesystem I/O:
//! a `PUT` target that does not exist yet must still resolve.

use std::path::{Component, Path, PathBuf};

/// Rejection reasons, mapped to 400 and 403 by the router
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveError {
    /// Malformed percent-encoding in the request path
    BadRequest,
    /// Resolved path would escape the served root
    Forbidden,
}

/// Resolve a raw URL path against the served root.
///
/// Steps: strip the query string, substitute the default document for `/`,
/// percent-decode, join onto the root as a relative path while resolving
/// `.`/`..` lexically, then verify the result is still under the root.
///
/// The confinement check is segment-wise (`Path::starts_with`), so a root of
/// `/srv/app` does not accept `/srv/app-evil`. Symlinks under the root are
/// not resolved further; a link pointing outside the root is served as-is,
/// which is a documented limitation of the prefix check.
pub fn resolve(root: &Path, raw: &str, index: &str) -> Result<PathBuf, ResolveError> {
    let path = raw.split('?').next().unwrap_or("").trim();
    let path = if path.is_empty() || path == "/" {
        format!("/{index}")
    } else {
        path.to_string()
    };

    let decoded = percent_decode(&path)?;

    // Strip leading slashes so the request path can never be taken as
    // filesystem-absolute, then normalize lexically from the root.
    let mut resolved = root.to_path_buf();
    for component in Path::new(decoded.trim_start_matches('/')).components() {
        match component {
            Component::Normal(segment) => resolved.push(segment),
            Component::ParentDir => {
                resolved.pop();
            }
            Component::CurDir => {}
            // Unreachable after the slash strip; fail closed anyway
            Component::RootDir | Component::Prefix(_) => return Err(ResolveError::Forbidden),
        }
    }

    if !resolved.starts_with(root) {
        return Err(ResolveError::Forbidden);
    }

    Ok(resolved)
}

/// Strict percent-decoding: every `%` must be followed by two hex digits,
/// and the decoded bytes must form valid UTF-8.
fn percent_decode(input: &str) -> Result<String, ResolveError> {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%' {
            if i + 2 >= bytes.len() {
                return Err(ResolveError::BadRequest);
            }
            let hi = hex_value(bytes[i + 1]).ok_or(ResolveError::BadRequest)?;
            let lo = hex_value(bytes[i + 2]).ok_or(ResolveError::BadRequest)?;
            out.push((hi << 4) | lo);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }

    String::from_utf8(out).map_err(|_| ResolveError::BadRequest)
}

const fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INDEX: &str = "index.html";

    fn root() -> PathBuf {
        PathBuf::from("/srv/app")
    }

    #[test]
    fn plain_path_resolves_under_root() {
        assert_eq!(
            resolve(&root(), "/foo/bar.txt", INDEX),
            Ok(PathBuf::from("/srv/app/foo/bar.txt"))
        );
    }

    #[test]
    fn slash_substitutes_default_document() {
        assert_eq!(
            resolve(&root(), "/", INDEX),
            resolve(&root(), "/index.html", INDEX)
        );
        assert_eq!(
            resolve(&root(), "/", INDEX),
            Ok(PathBuf::from("/srv/app/index.html"))
        );
    }

    #[test]
    fn empty_path_treated_as_slash() {
        assert_eq!(resolve(&root(), "", INDEX), resolve(&root(), "/", INDEX));
        assert_eq!(resolve(&root(), "  ", INDEX), resolve(&root(), "/", INDEX));
    }

    #[test]
    fn query_string_is_stripped() {
        assert_eq!(
            resolve(&root(), "/foo.txt?version=2", INDEX),
            Ok(PathBuf::from("/srv/app/foo.txt"))
        );
        assert_eq!(resolve(&root(), "/?a=b", INDEX), resolve(&root(), "/", INDEX));
    }

    #[test]
    fn traversal_is_forbidden() {
        assert_eq!(
            resolve(&root(), "/../../etc/passwd", INDEX),
            Err(ResolveError::Forbidden)
        );
        assert_eq!(
            resolve(&root(), "/../../../../../../etc/passwd", INDEX),
            Err(ResolveError::Forbidden)
        );
    }

    #[test]
    fn encoded_traversal_is_forbidden() {
        assert_eq!(
            resolve(&root(), "/%2e%2e/%2e%2e/etc/passwd", INDEX),
            Err(ResolveError::Forbidden)
        );
    }

    #[test]
    fn traversal_that_stays_inside_is_allowed() {
        assert_eq!(
            resolve(&root(), "/a/../b.txt", INDEX),
            Ok(PathBuf::from("/srv/app/b.txt"))
        );
    }

    #[test]
    fn never_escapes_root_regardless_of_dotdot_count() {
        for n in 0..8 {
            let raw = format!("/{}etc/passwd", "../".repeat(n));
            match resolve(&root(), &raw, INDEX) {
                Ok(path) => assert!(path.starts_with(root())),
                Err(err) => assert_eq!(err, ResolveError::Forbidden),
            }
        }
    }

    #[test]
    fn sibling_prefix_root_is_not_accepted() {
        // `/srv/app-evil` shares a string prefix with `/srv/app` but is a
        // different directory; the segment-wise check must reject it.
        assert_eq!(
            resolve(&root(), "/../app-evil/secret.txt", INDEX),
            Err(ResolveError::Forbidden)
        );
    }

    #[test]
    fn malformed_escapes_are_bad_requests() {
        assert_eq!(resolve(&root(), "/%zz", INDEX), Err(ResolveError::BadRequest));
        assert_eq!(resolve(&root(), "/%2", INDEX), Err(ResolveError::BadRequest));
        assert_eq!(resolve(&root(), "/foo%", INDEX), Err(ResolveError::BadRequest));
        assert_eq!(resolve(&root(), "/%g1", INDEX), Err(ResolveError::BadRequest));
    }

    #[test]
    fn invalid_utf8_after_decode_is_bad_request() {
        assert_eq!(resolve(&root(), "/%ff%fe", INDEX), Err(ResolveError::BadRequest));
    }

    #[test]
    fn percent_escapes_decode() {
        assert_eq!(
            resolve(&root(), "/hello%20world.txt", INDEX),
            Ok(PathBuf::from("/srv/app/hello world.txt"))
        );
    }

    #[test]
    fn repeated_slashes_collapse() {
        assert_eq!(
            resolve(&root(), "//foo///bar.txt", INDEX),
            Ok(PathBuf::from("/srv/app/foo/bar.txt"))
        );
    }

    #[test]
    fn current_dir_segments_are_ignored() {
        assert_eq!(
            resolve(&root(), "/./foo/./bar.txt", INDEX),
            Ok(PathBuf::from("/srv/app/foo/bar.txt"))
        );
    }
}
