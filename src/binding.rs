//! Binding types: resolvable sources of values for a [`Key`](crate::Key).
//!
//! A binding encapsulates the capability "produce a value for a resolution
//! request". The only kind this crate ships is [`InstanceBinding`], which
//! returns one precomputed value unchanged on every resolution; the
//! [`Binding`] trait leaves room for computed or scoped kinds.

use crate::graph::BindingGraph;
use std::any::Any;
use std::sync::Arc;

/// A resolved value, type-erased for storage and transport.
pub type Resolved = Arc<dyn Any + Send + Sync>;

/// A resolvable source of a value for a key.
///
/// The graph passed to [`get`](Binding::get) is the resolution context: a
/// binding that depends on other keys may resolve them through it. Instance
/// bindings ignore it.
pub trait Binding: Send + Sync {
    /// Produce the value for this binding.
    fn get(&self, graph: &BindingGraph) -> Resolved;
}

/// A binding wrapping one precomputed value.
///
/// Resolution always returns the same instance (the same `Arc`), never a
/// copy.
///
/// # Examples
///
/// ```rust
/// use member_inject::{BindingGraph, InstanceBinding, Key};
///
/// let graph = BindingGraph::builder()
///     .add(Key::of::<String>(), InstanceBinding::new("one".to_string()))
///     .unwrap()
///     .build();
///
/// let value = graph.resolve(&Key::of::<String>()).unwrap();
/// assert_eq!(value.downcast_ref::<String>().unwrap(), "one");
/// ```
pub struct InstanceBinding {
    /// Pre-erased instance, cloned as an `Arc` on every resolution.
    instance: Resolved,
}

impl InstanceBinding {
    /// Create from a value.
    #[inline]
    pub fn new<T: Send + Sync + 'static>(instance: T) -> Self {
        Self {
            instance: Arc::new(instance) as Resolved,
        }
    }

    /// Create from an existing `Arc`.
    #[inline]
    pub fn from_arc<T: Send + Sync + 'static>(instance: Arc<T>) -> Self {
        Self {
            instance: instance as Resolved,
        }
    }
}

impl Binding for InstanceBinding {
    #[inline]
    fn get(&self, _graph: &BindingGraph) -> Resolved {
        Arc::clone(&self.instance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instance_binding_returns_same_arc() {
        let graph = BindingGraph::builder().build();
        let binding = InstanceBinding::new(42i64);

        let a = binding.get(&graph);
        let b = binding.get(&graph);

        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(*a.downcast_ref::<i64>().unwrap(), 42);
    }

    #[test]
    fn binding_trait_admits_other_kinds() {
        // A computed binding, defined externally against the trait alone.
        struct Computed;
        impl Binding for Computed {
            fn get(&self, _graph: &BindingGraph) -> Resolved {
                Arc::new("computed".to_string())
            }
        }

        let graph = BindingGraph::builder().build();
        let value = Computed.get(&graph);
        assert_eq!(value.downcast_ref::<String>().unwrap(), "computed");
    }
}
