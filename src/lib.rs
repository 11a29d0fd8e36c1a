//! # member-inject - Runtime Member Injection for Rust
//!
//! A reflective member injection engine for dependency-injection frameworks
//! whose object graph is assembled dynamically rather than through generated
//! factory code.
//!
//! Given a target type and a binding graph, the engine discovers the type's
//! injectable fields and methods across its full ancestor chain, validates
//! that each is structurally eligible, resolves each dependency from the
//! graph, and applies the values to a concrete instance.
//!
//! ## Features
//!
//! - 🔑 **Qualifier-aware keys** - distinguish same-typed dependencies with
//!   annotation-like markers
//! - 🧬 **Hierarchy-aware ordering** - base-level members inject before
//!   derived-level members; fields before methods at every level
//! - 🛂 **Strict validation** - static, private, and abstract injection
//!   targets are rejected at plan-build time with precise diagnostics
//! - ♻️ **Cached plans** - one validated plan per type for the process
//!   lifetime, shared lock-free across threads
//! - 📊 **Observable** - optional tracing integration with JSON or pretty
//!   output
//!
//! ## Quick Start
//!
//! ```rust
//! use member_inject::{
//!     create_injector, BindingGraph, FieldDescriptor, MethodDescriptor,
//!     Reflect, TypeDescriptor,
//! };
//!
//! #[derive(Default)]
//! struct UserService {
//!     db_url: String,
//!     ready: bool,
//! }
//!
//! // Describe which members request injection.
//! impl Reflect for UserService {
//!     fn descriptor() -> TypeDescriptor {
//!         TypeDescriptor::new::<UserService>()
//!             .field(FieldDescriptor::new("db_url", |s: &mut UserService, v: String| {
//!                 s.db_url = v;
//!             }))
//!             .method(MethodDescriptor::unary("connect", |s: &mut UserService, _url: String| {
//!                 s.ready = true;
//!             }))
//!     }
//! }
//!
//! // Build the graph once per configuration.
//! let graph = BindingGraph::builder()
//!     .instance("postgres://localhost".to_string())
//!     .unwrap()
//!     .build();
//!
//! // Inject as many instances as needed.
//! let injector = create_injector::<UserService>().unwrap();
//! let mut service = UserService::default();
//! injector.inject(&mut service, &graph).unwrap();
//!
//! assert_eq!(service.db_url, "postgres://localhost");
//! assert!(service.ready);
//! ```
//!
//! ## Qualifiers
//!
//! ```rust
//! use member_inject::{named, BindingGraph, Key};
//!
//! let graph = BindingGraph::builder()
//!     .instance("replica".to_string())
//!     .unwrap()
//!     .qualified_instance(named("primary"), "primary".to_string())
//!     .unwrap()
//!     .build();
//!
//! let primary = graph
//!     .resolve(&Key::qualified::<String>(named("primary")))
//!     .unwrap();
//! assert_eq!(primary.downcast_ref::<String>().unwrap(), "primary");
//! ```
//!
//! ## Semantics at a glance
//!
//! - Plan order is fixed per type: ancestors root-to-leaf, fields before
//!   methods at each level, declaration order within each category.
//! - `create_injector` is the only place validation failures surface;
//!   `inject` can only fail with a missing binding.
//! - Injection is non-transactional: a missing binding stops execution at
//!   the failing action and keeps what was already applied.
//! - Plans and graphs are immutable and safe for concurrent reads;
//!   concurrent injection of the *same* instance is the caller's to
//!   serialize.

mod binding;
mod descriptor;
mod error;
mod graph;
mod injector;
mod key;
#[cfg(feature = "logging")]
pub mod logging;
mod plan;

pub use binding::{Binding, InstanceBinding, Resolved};
pub use descriptor::{
    arg, FieldDescriptor, InvokeFn, MethodDescriptor, ProjectFn, Reflect, SetFn, Supertype,
    TypeDescriptor, Visibility,
};
pub use error::{InjectError, Result};
pub use graph::{BindingGraph, BindingGraphBuilder};
pub use injector::{cached_plan_count, create_injector, Injector};
pub use key::{named, Key, Qualifier};

// Re-export tracing macros for convenience when logging is enabled
#[cfg(feature = "logging")]
pub use tracing::{debug, error, info, trace, warn};

// Re-export for convenience
pub use std::sync::Arc;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        create_injector, named, Binding, BindingGraph, FieldDescriptor, InjectError,
        InstanceBinding, Injector, Key, MethodDescriptor, Qualifier, Reflect, Result,
        TypeDescriptor, Visibility,
    };
    pub use std::sync::Arc;
}

#[cfg(test)]
mod tests {
    use super::*;

    // An assembler-style end-to-end pass: one graph configuration feeding
    // several target types.

    #[derive(Default)]
    struct Telemetry {
        sink: String,
    }

    impl Reflect for Telemetry {
        fn descriptor() -> TypeDescriptor {
            TypeDescriptor::new::<Telemetry>().field(FieldDescriptor::new(
                "sink",
                |t: &mut Telemetry, v: String| t.sink = v,
            ))
        }
    }

    #[derive(Default)]
    struct Worker {
        telemetry_sink: String,
        batch_size: i64,
        started: bool,
    }

    impl Reflect for Worker {
        fn descriptor() -> TypeDescriptor {
            TypeDescriptor::new::<Worker>()
                .field(FieldDescriptor::new(
                    "telemetry_sink",
                    |w: &mut Worker, v: String| w.telemetry_sink = v,
                ))
                .field(
                    FieldDescriptor::new("batch_size", |w: &mut Worker, v: i64| w.batch_size = v)
                        .qualified(named("batch")),
                )
                .method(MethodDescriptor::unary("start", |w: &mut Worker, _v: i64| {
                    w.started = true;
                })
                .parameter_qualifier(0, named("batch")))
        }
    }

    #[test]
    fn one_graph_serves_many_target_types() {
        let graph = BindingGraph::builder()
            .instance("stdout".to_string())
            .unwrap()
            .qualified_instance(named("batch"), 64i64)
            .unwrap()
            .build();

        let mut telemetry = Telemetry::default();
        create_injector::<Telemetry>()
            .unwrap()
            .inject(&mut telemetry, &graph)
            .unwrap();
        assert_eq!(telemetry.sink, "stdout");

        let mut worker = Worker::default();
        create_injector::<Worker>()
            .unwrap()
            .inject(&mut worker, &graph)
            .unwrap();
        assert_eq!(worker.telemetry_sink, "stdout");
        assert_eq!(worker.batch_size, 64);
        assert!(worker.started);
    }

    #[test]
    fn same_instance_can_be_injected_from_two_graphs() {
        let staging = BindingGraph::builder()
            .instance("staging".to_string())
            .unwrap()
            .build();
        let production = BindingGraph::builder()
            .instance("production".to_string())
            .unwrap()
            .build();

        let injector = create_injector::<Telemetry>().unwrap();
        let mut telemetry = Telemetry::default();

        injector.inject(&mut telemetry, &staging).unwrap();
        assert_eq!(telemetry.sink, "staging");

        // The graph is supplied per call; re-injection re-executes the plan.
        injector.inject(&mut telemetry, &production).unwrap();
        assert_eq!(telemetry.sink, "production");
    }

    #[test]
    fn validation_failures_never_reach_inject() {
        struct Invalid;
        impl Reflect for Invalid {
            fn descriptor() -> TypeDescriptor {
                TypeDescriptor::new::<Invalid>().field(
                    FieldDescriptor::new("hidden", |_: &mut Invalid, _: String| {})
                        .with_visibility(Visibility::Private),
                )
            }
        }

        // The error surfaces at creation; there is no injector to call.
        let err = create_injector::<Invalid>().unwrap_err();
        assert!(matches!(err, InjectError::InvalidInjectionTarget { .. }));
    }
}
