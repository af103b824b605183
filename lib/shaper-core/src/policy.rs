//! Empty-response policy.
//!
//! Decides whether an absent or zero-length body is a normal outcome for a
//! completed exchange. By default, `204 No Content`, `205 Reset Content` and
//! any `HEAD` request may come back empty.

use std::collections::HashSet;

use http::{Method, StatusCode};

/// Status codes for which an empty body is allowed by default.
pub const DEFAULT_EMPTY_RESPONSE_CODES: [u16; 2] = [204, 205];

/// Request methods for which an empty body is allowed by default.
pub const DEFAULT_EMPTY_REQUEST_METHODS: [Method; 1] = [Method::HEAD];

/// Returns `true` if the method is in `methods` or the status is in `codes`.
///
/// An absent method or status never matches.
///
/// # Example
///
/// ```
/// use std::collections::HashSet;
/// use http::Method;
/// use shaper_core::is_empty_allowed;
///
/// let codes = HashSet::from([204, 205]);
/// let methods = HashSet::from([Method::HEAD]);
///
/// assert!(is_empty_allowed(Some(&Method::HEAD), Some(200), &codes, &methods));
/// assert!(is_empty_allowed(Some(&Method::GET), Some(204), &codes, &methods));
/// assert!(!is_empty_allowed(Some(&Method::GET), Some(200), &codes, &methods));
/// ```
#[must_use]
pub fn is_empty_allowed<S: std::hash::BuildHasher>(
    method: Option<&Method>,
    status: Option<u16>,
    codes: &HashSet<u16, S>,
    methods: &HashSet<Method, S>,
) -> bool {
    method.is_some_and(|method| methods.contains(method))
        || status.is_some_and(|status| codes.contains(&status))
}

/// The sets of status codes and request methods for which an empty body is
/// allowed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyResponsePolicy {
    codes: HashSet<u16>,
    methods: HashSet<Method>,
}

impl Default for EmptyResponsePolicy {
    fn default() -> Self {
        Self::new(DEFAULT_EMPTY_RESPONSE_CODES, DEFAULT_EMPTY_REQUEST_METHODS)
    }
}

impl EmptyResponsePolicy {
    /// Creates a policy from explicit sets.
    #[must_use]
    pub fn new(
        codes: impl IntoIterator<Item = u16>,
        methods: impl IntoIterator<Item = Method>,
    ) -> Self {
        Self {
            codes: codes.into_iter().collect(),
            methods: methods.into_iter().collect(),
        }
    }

    /// A policy that never allows an empty body.
    #[must_use]
    pub fn strict() -> Self {
        Self::new([], [])
    }

    /// Status codes allowed to come back empty.
    #[must_use]
    pub const fn codes(&self) -> &HashSet<u16> {
        &self.codes
    }

    /// Request methods allowed to come back empty.
    #[must_use]
    pub const fn methods(&self) -> &HashSet<Method> {
        &self.methods
    }

    /// Returns `true` if an exchange with this method and status may have an
    /// empty body.
    #[must_use]
    pub fn allows(&self, method: Option<&Method>, status: Option<StatusCode>) -> bool {
        is_empty_allowed(
            method,
            status.map(|status| status.as_u16()),
            &self.codes,
            &self.methods,
        )
    }
}

#[cfg(test)]
mod tests {
    use assert2::check;

    use super::*;

    #[test]
    fn allowed_by_method() {
        let policy = EmptyResponsePolicy::default();
        check!(policy.allows(Some(&Method::HEAD), Some(StatusCode::OK)));
    }

    #[test]
    fn allowed_by_status() {
        let policy = EmptyResponsePolicy::default();
        check!(policy.allows(Some(&Method::GET), Some(StatusCode::NO_CONTENT)));
        check!(policy.allows(Some(&Method::POST), Some(StatusCode::RESET_CONTENT)));
    }

    #[test]
    fn not_allowed() {
        let policy = EmptyResponsePolicy::default();
        check!(!policy.allows(Some(&Method::GET), Some(StatusCode::OK)));
        check!(!policy.allows(Some(&Method::DELETE), Some(StatusCode::ACCEPTED)));
    }

    #[test]
    fn absent_parts_never_match() {
        let policy = EmptyResponsePolicy::default();
        check!(!policy.allows(None, None));
        check!(policy.allows(None, Some(StatusCode::NO_CONTENT)));
        check!(policy.allows(Some(&Method::HEAD), None));
    }

    #[test]
    fn custom_sets() {
        let policy = EmptyResponsePolicy::new([200], [Method::DELETE]);
        check!(policy.allows(Some(&Method::GET), Some(StatusCode::OK)));
        check!(policy.allows(Some(&Method::DELETE), Some(StatusCode::ACCEPTED)));
        check!(!policy.allows(Some(&Method::HEAD), Some(StatusCode::NO_CONTENT)));
    }

    #[test]
    fn strict_policy() {
        let policy = EmptyResponsePolicy::strict();
        check!(policy.codes().is_empty());
        check!(policy.methods().is_empty());
        check!(!policy.allows(Some(&Method::HEAD), Some(StatusCode::NO_CONTENT)));
    }

    #[test]
    fn default_sets() {
        let policy = EmptyResponsePolicy::default();
        check!(policy.codes() == &HashSet::from([204, 205]));
        check!(policy.methods() == &HashSet::from([Method::HEAD]));
    }
}
