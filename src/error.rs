//! Error types for member injection.

use crate::Key;
use thiserror::Error;

/// Facility name used in structural-ineligibility diagnostics.
pub(crate) const FACILITY: &str = "member-inject";

/// Errors that can occur during plan building, graph construction, or
/// injection.
///
/// All three variants indicate a misconfigured object graph, not a transient
/// condition; they are surfaced to the top-level caller and never retried or
/// swallowed internally.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InjectError {
    /// A member requesting injection is structurally ineligible (static,
    /// private, or abstract). Surfaced at plan-build time, never at inject
    /// time. The message names the fully-qualified declaring type and member.
    #[error("{message}")]
    InvalidInjectionTarget { message: String },

    /// A required key has no registered binding. Surfaced during `inject`;
    /// execution stops at the failing action without rollback.
    #[error("No binding registered for {key}")]
    UnsatisfiedDependency { key: Key },

    /// A graph builder received two bindings for the same key.
    #[error("Duplicate binding registered for {key}")]
    DuplicateBinding { key: Key },
}

impl InjectError {
    /// Create an UnsatisfiedDependency error for a key.
    #[inline]
    pub fn unsatisfied(key: Key) -> Self {
        Self::UnsatisfiedDependency { key }
    }

    /// Create a DuplicateBinding error for a key.
    #[inline]
    pub fn duplicate(key: Key) -> Self {
        Self::DuplicateBinding { key }
    }

    /// Static field requested injection.
    #[inline]
    pub(crate) fn static_field(declaring_type: &str, member: &str) -> Self {
        Self::InvalidInjectionTarget {
            message: format!(
                "{FACILITY} does not support injection into static fields: {declaring_type}.{member}"
            ),
        }
    }

    /// Static method requested injection.
    #[inline]
    pub(crate) fn static_method(declaring_type: &str, member: &str) -> Self {
        Self::InvalidInjectionTarget {
            message: format!(
                "{FACILITY} does not support injection into static methods: {declaring_type}.{member}()"
            ),
        }
    }

    /// Private field requested injection.
    #[inline]
    pub(crate) fn private_field(declaring_type: &str, member: &str) -> Self {
        Self::InvalidInjectionTarget {
            message: format!(
                "{FACILITY} does not support injection into private fields: {declaring_type}.{member}"
            ),
        }
    }

    /// Private method requested injection.
    #[inline]
    pub(crate) fn private_method(declaring_type: &str, member: &str) -> Self {
        Self::InvalidInjectionTarget {
            message: format!(
                "{FACILITY} does not support injection into private methods: {declaring_type}.{member}()"
            ),
        }
    }

    /// Abstract method requested injection. The wording is shared whether the
    /// declaring descriptor models a concrete type or an interface-like type.
    #[inline]
    pub(crate) fn abstract_method(declaring_type: &str, member: &str) -> Self {
        Self::InvalidInjectionTarget {
            message: format!(
                "Methods with @Inject may not be abstract: {declaring_type}.{member}()"
            ),
        }
    }
}

/// Result type alias for injection operations.
pub type Result<T> = std::result::Result<T, InjectError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_member() {
        let err = InjectError::static_field("demo::Widget", "count");
        assert_eq!(
            err.to_string(),
            "member-inject does not support injection into static fields: demo::Widget.count"
        );

        let err = InjectError::private_method("demo::Widget", "attach");
        assert_eq!(
            err.to_string(),
            "member-inject does not support injection into private methods: demo::Widget.attach()"
        );

        let err = InjectError::abstract_method("demo::Widget", "attach");
        assert_eq!(
            err.to_string(),
            "Methods with @Inject may not be abstract: demo::Widget.attach()"
        );
    }

    #[test]
    fn unsatisfied_names_the_key() {
        let err = InjectError::unsatisfied(Key::of::<String>());
        assert!(err.to_string().contains("String"));
    }
}
