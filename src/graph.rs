//! The binding graph: an immutable `Key -> Binding` lookup table.
//!
//! Built additively through [`BindingGraphBuilder`], then frozen. The
//! finished graph is read-only and safe for unsynchronized concurrent reads;
//! the builder is not, and must be confined to a single constructing thread.

use crate::binding::{Binding, InstanceBinding, Resolved};
use crate::{InjectError, Key, Qualifier, Result};
use ahash::RandomState;
use std::collections::HashMap;
use std::sync::Arc;

#[cfg(feature = "logging")]
use tracing::debug;

/// Immutable mapping from [`Key`] to [`Binding`].
///
/// One graph is built per object-graph configuration and shared read-only
/// thereafter. Lookups answer "what value satisfies this key" during plan
/// execution.
///
/// # Examples
///
/// ```rust
/// use member_inject::{named, BindingGraph, Key};
///
/// let graph = BindingGraph::builder()
///     .instance("one".to_string())
///     .unwrap()
///     .qualified_instance(named("tres"), 3i64)
///     .unwrap()
///     .build();
///
/// let one = graph.resolve(&Key::of::<String>()).unwrap();
/// assert_eq!(one.downcast_ref::<String>().unwrap(), "one");
/// assert!(graph.resolve(&Key::of::<bool>()).is_err());
/// ```
pub struct BindingGraph {
    bindings: HashMap<Key, Arc<dyn Binding>, RandomState>,
}

impl BindingGraph {
    /// Start building a graph.
    #[inline]
    pub fn builder() -> BindingGraphBuilder {
        BindingGraphBuilder {
            bindings: HashMap::with_hasher(RandomState::new()),
        }
    }

    /// Resolve a key by invoking its binding.
    ///
    /// Fails with [`InjectError::UnsatisfiedDependency`] if no binding is
    /// registered for the key.
    #[inline]
    pub fn resolve(&self, key: &Key) -> Result<Resolved> {
        match self.bindings.get(key) {
            Some(binding) => Ok(binding.get(self)),
            None => {
                #[cfg(feature = "logging")]
                debug!(
                    target: "member_inject",
                    key = %key,
                    "No binding registered for requested key"
                );
                Err(InjectError::unsatisfied(key.clone()))
            }
        }
    }

    /// Check whether a binding is registered for a key.
    #[inline]
    pub fn contains(&self, key: &Key) -> bool {
        self.bindings.contains_key(key)
    }

    /// Number of registered bindings.
    #[inline]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Check if the graph has no bindings.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl std::fmt::Debug for BindingGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BindingGraph")
            .field("bindings", &self.len())
            .finish()
    }
}

/// Additive builder for a [`BindingGraph`].
///
/// Registration is fail-fast: at most one binding per key, and a second
/// registration for the same key fails with
/// [`InjectError::DuplicateBinding`] immediately at `add` time.
pub struct BindingGraphBuilder {
    bindings: HashMap<Key, Arc<dyn Binding>, RandomState>,
}

impl std::fmt::Debug for BindingGraphBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BindingGraphBuilder")
            .field("bindings", &self.bindings.len())
            .finish()
    }
}

impl BindingGraphBuilder {
    /// Register a binding for a key.
    pub fn add(mut self, key: Key, binding: impl Binding + 'static) -> Result<Self> {
        if self.bindings.contains_key(&key) {
            return Err(InjectError::duplicate(key));
        }
        self.bindings.insert(key, Arc::new(binding));
        Ok(self)
    }

    /// Register an instance binding keyed by the value's own type.
    #[inline]
    pub fn instance<T: Send + Sync + 'static>(self, value: T) -> Result<Self> {
        self.add(Key::of::<T>(), InstanceBinding::new(value))
    }

    /// Register an instance binding under a qualified key.
    #[inline]
    pub fn qualified_instance<T: Send + Sync + 'static>(
        self,
        qualifier: Qualifier,
        value: T,
    ) -> Result<Self> {
        self.add(Key::qualified::<T>(qualifier), InstanceBinding::new(value))
    }

    /// Finalize into an immutable graph.
    pub fn build(self) -> BindingGraph {
        #[cfg(feature = "logging")]
        debug!(
            target: "member_inject",
            bindings = self.bindings.len(),
            "Binding graph finalized"
        );

        BindingGraph {
            bindings: self.bindings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::named;

    #[test]
    fn resolve_round_trips_bound_instance() {
        let graph = BindingGraph::builder()
            .add(Key::of::<String>(), InstanceBinding::new("one".to_string()))
            .unwrap()
            .build();

        let value = graph.resolve(&Key::of::<String>()).unwrap();
        assert_eq!(value.downcast_ref::<String>().unwrap(), "one");
    }

    #[test]
    fn absent_key_is_unsatisfied() {
        let graph = BindingGraph::builder().build();
        let err = graph.resolve(&Key::of::<String>()).unwrap_err();
        assert!(matches!(err, InjectError::UnsatisfiedDependency { .. }));
    }

    #[test]
    fn duplicate_key_fails_at_add() {
        let err = BindingGraph::builder()
            .instance(1i64)
            .unwrap()
            .instance(2i64)
            .unwrap_err();
        assert_eq!(err, InjectError::duplicate(Key::of::<i64>()));
    }

    #[test]
    fn qualified_and_unqualified_keys_coexist() {
        let graph = BindingGraph::builder()
            .instance(2i64)
            .unwrap()
            .qualified_instance(named("tres"), 3i64)
            .unwrap()
            .build();

        let plain = graph.resolve(&Key::of::<i64>()).unwrap();
        let tres = graph
            .resolve(&Key::qualified::<i64>(named("tres")))
            .unwrap();
        assert_eq!(*plain.downcast_ref::<i64>().unwrap(), 2);
        assert_eq!(*tres.downcast_ref::<i64>().unwrap(), 3);
    }

    #[test]
    fn contains_and_len_report_registrations() {
        let graph = BindingGraph::builder().instance(true).unwrap().build();
        assert!(graph.contains(&Key::of::<bool>()));
        assert!(!graph.contains(&Key::of::<String>()));
        assert_eq!(graph.len(), 1);
        assert!(!graph.is_empty());
    }
}
