//! Injection plans: ordered, validated, type-scoped action sequences.
//!
//! A plan is built once per target type by walking the type's descriptor
//! chain, and is immutable afterwards: the action order is fixed at build
//! time and never varies per instance, so one plan is safe to reuse across
//! many instances and to read from many threads.
//!
//! Ordering: ancestors are processed from the most-base type down to the
//! most-derived type; within one type level all eligible fields come before
//! all eligible methods, in declaration order. A derived type's methods may
//! depend on state that base-level field injection has already populated.

use crate::binding::Resolved;
use crate::descriptor::{InvokeFn, ProjectFn, Reflect, SetFn, TypeDescriptor};
use crate::graph::BindingGraph;
use crate::{InjectError, Key, Result};
use std::any::Any;
use std::sync::Arc;

#[cfg(feature = "logging")]
use tracing::{debug, trace};

/// Projections from the concrete leaf instance down to the level that
/// declared a member, applied in sequence. Shared by all actions of one
/// hierarchy level.
type ProjectionPath = Arc<[Arc<ProjectFn>]>;

/// One field-set or method-invoke step.
///
/// Carries the member identity (declaring type, member name) and the
/// capability to perform the mutation without re-introspecting.
pub(crate) enum InjectionAction {
    SetField {
        declared_by: &'static str,
        name: &'static str,
        key: Key,
        path: ProjectionPath,
        set: Arc<SetFn>,
    },
    InvokeMethod {
        declared_by: &'static str,
        name: &'static str,
        keys: Vec<Key>,
        path: ProjectionPath,
        invoke: Arc<InvokeFn>,
    },
}

impl InjectionAction {
    /// `Type.member` for fields, `Type.member()` for methods.
    fn identity(&self) -> String {
        match self {
            Self::SetField {
                declared_by, name, ..
            } => format!("{declared_by}.{name}"),
            Self::InvokeMethod {
                declared_by, name, ..
            } => format!("{declared_by}.{name}()"),
        }
    }
}

/// The validated, ordered action sequence for one concrete type.
pub(crate) struct InjectionPlan {
    type_name: &'static str,
    actions: Vec<InjectionAction>,
}

impl InjectionPlan {
    /// Build and validate the plan for `T`.
    ///
    /// Any structurally ineligible member fails the entire build with
    /// [`InjectError::InvalidInjectionTarget`]; a type with no registered
    /// members yields a valid empty plan.
    pub(crate) fn build<T: Reflect>() -> Result<Self> {
        // Collect the ancestor chain leaf-first, composing the projection
        // path level by level, then reverse to process root-to-leaf.
        let mut chain: Vec<(TypeDescriptor, ProjectionPath)> = Vec::new();
        let mut descriptor = T::descriptor();
        let mut path: Vec<Arc<ProjectFn>> = Vec::new();
        loop {
            let supertype = descriptor.supertype().cloned();
            chain.push((descriptor, Arc::from(path.as_slice())));
            match supertype {
                Some(link) => {
                    path.push(Arc::clone(&link.project));
                    descriptor = (link.descriptor)();
                }
                None => break,
            }
        }
        let type_name = chain[0].0.type_name();
        chain.reverse();

        let mut actions = Vec::new();
        for (level, path) in &chain {
            let declared_by = level.type_name();

            for field in level.fields() {
                if field.is_static() {
                    return Err(InjectError::static_field(declared_by, field.name()));
                }
                if field.visibility().is_private() {
                    return Err(InjectError::private_field(declared_by, field.name()));
                }
                actions.push(InjectionAction::SetField {
                    declared_by,
                    name: field.name(),
                    key: field.key().clone(),
                    path: Arc::clone(path),
                    set: field.setter(),
                });
            }

            for method in level.methods() {
                if method.is_static() {
                    return Err(InjectError::static_method(declared_by, method.name()));
                }
                if method.visibility().is_private() {
                    return Err(InjectError::private_method(declared_by, method.name()));
                }
                let Some(invoke) = method.invoker() else {
                    return Err(InjectError::abstract_method(declared_by, method.name()));
                };
                actions.push(InjectionAction::InvokeMethod {
                    declared_by,
                    name: method.name(),
                    keys: method.parameter_keys().to_vec(),
                    path: Arc::clone(path),
                    invoke,
                });
            }
        }

        #[cfg(feature = "logging")]
        debug!(
            target: "member_inject",
            target_type = type_name,
            levels = chain.len(),
            actions = actions.len(),
            "Injection plan built"
        );

        Ok(Self { type_name, actions })
    }

    /// Apply every action in plan order to one instance.
    ///
    /// Each action resolves its key(s) against the graph, then performs the
    /// mutation or call. A missing binding stops execution at the failing
    /// action; actions already applied are not rolled back.
    pub(crate) fn apply(&self, instance: &mut dyn Any, graph: &BindingGraph) -> Result<()> {
        for action in &self.actions {
            match action {
                InjectionAction::SetField { key, path, set, .. } => {
                    let value = graph.resolve(key)?;

                    #[cfg(feature = "logging")]
                    trace!(
                        target: "member_inject",
                        target_type = self.type_name,
                        member = %action.identity(),
                        "Setting injected field"
                    );

                    let target = descend(path, &mut *instance);
                    (**set)(target, &value);
                }
                InjectionAction::InvokeMethod {
                    keys, path, invoke, ..
                } => {
                    // Every parameter resolves before the call.
                    let mut args: Vec<Resolved> = Vec::with_capacity(keys.len());
                    for key in keys {
                        args.push(graph.resolve(key)?);
                    }

                    #[cfg(feature = "logging")]
                    trace!(
                        target: "member_inject",
                        target_type = self.type_name,
                        member = %action.identity(),
                        "Invoking injected method"
                    );

                    let target = descend(path, &mut *instance);
                    (**invoke)(target, &args);
                }
            }
        }
        Ok(())
    }

    /// Number of actions in the plan.
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.actions.len()
    }

    /// Check if the plan has no actions.
    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// The concrete type the plan was built for.
    #[inline]
    pub(crate) fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Member identities in action order, for diagnostics and tests.
    pub(crate) fn member_identities(&self) -> Vec<String> {
        self.actions.iter().map(InjectionAction::identity).collect()
    }
}

impl std::fmt::Debug for InjectionPlan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InjectionPlan")
            .field("type_name", &self.type_name)
            .field("actions", &self.len())
            .finish()
    }
}

/// Follow a projection path from the leaf instance to the declaring level.
fn descend<'a>(path: &ProjectionPath, mut target: &'a mut dyn Any) -> &'a mut dyn Any {
    for project in path.iter() {
        target = (**project)(target);
    }
    target
}
