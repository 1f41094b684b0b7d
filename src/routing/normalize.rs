//! Request path normalization.
//!
//! # Responsibilities
//! - Strip the mount prefix (where the application is served from)
//! - Split the remaining path into segments
//! - Drop empty segments (leading, trailing and doubled slashes)
//!
//! # Design Decisions
//! - Prefix stripping is positional: index `i` of the path is dropped when it
//!   equals index `i` of the mount prefix, for every `i` the prefix covers
//! - Never fails; an unrelated prefix simply leaves the path untouched
//! - Segments borrow from the request path (no allocation per segment)

/// Split `path` into its non-empty segments after removing `mount_prefix`.
///
/// ```
/// use rule_router::routing::normalize;
///
/// assert_eq!(normalize("/app/user/42", "/app"), vec!["user", "42"]);
/// assert_eq!(normalize("/user//42/", ""), vec!["user", "42"]);
/// ```
pub fn normalize<'p>(path: &'p str, mount_prefix: &str) -> Vec<&'p str> {
    let mut prefix = mount_prefix.split('/');

    path.split('/')
        .filter(|segment| match prefix.next() {
            Some(mounted) => *segment != mounted,
            None => true,
        })
        .filter(|segment| !segment.is_empty())
        .collect()
}
