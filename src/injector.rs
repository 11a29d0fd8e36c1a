//! Injector creation, the process-scoped plan cache, and plan execution.
//!
//! [`create_injector`] is the sole construction entry point and the only
//! place [`InvalidInjectionTarget`](crate::InjectError::InvalidInjectionTarget)
//! can surface; [`Injector::inject`] is the sole runtime entry point.
//!
//! Plans are cached per target type in a process-scoped, lazily populated,
//! read-through cache that is never evicted. The cache is the only global
//! mutable state in the crate.

use crate::descriptor::Reflect;
use crate::graph::BindingGraph;
use crate::plan::InjectionPlan;
use crate::Result;
use ahash::RandomState;
use dashmap::DashMap;
use once_cell::sync::Lazy;
use std::any::{Any, TypeId};
use std::marker::PhantomData;
use std::sync::Arc;

#[cfg(feature = "logging")]
use tracing::{debug, trace};

/// Process-scoped plan cache, keyed by target type identity.
///
/// Populated on first `create_injector::<T>()`, never evicted. Failed builds
/// are not cached; a later call re-validates.
static PLAN_CACHE: Lazy<DashMap<TypeId, Arc<InjectionPlan>, RandomState>> =
    Lazy::new(|| DashMap::with_hasher(RandomState::new()));

/// Build (or reuse) the validated injection plan for `T` and wrap it in an
/// [`Injector`].
///
/// Fails with [`InjectError::InvalidInjectionTarget`](crate::InjectError)
/// if any member requesting injection is static, private, or abstract —
/// always here, never at inject time.
///
/// # Examples
///
/// ```rust
/// use member_inject::{
///     create_injector, BindingGraph, FieldDescriptor, Reflect, TypeDescriptor,
/// };
///
/// #[derive(Default)]
/// struct Service {
///     endpoint: String,
/// }
///
/// impl Reflect for Service {
///     fn descriptor() -> TypeDescriptor {
///         TypeDescriptor::new::<Service>().field(FieldDescriptor::new(
///             "endpoint",
///             |s: &mut Service, v: String| s.endpoint = v,
///         ))
///     }
/// }
///
/// let graph = BindingGraph::builder()
///     .instance("https://localhost".to_string())
///     .unwrap()
///     .build();
///
/// let injector = create_injector::<Service>().unwrap();
/// let mut service = Service::default();
/// injector.inject(&mut service, &graph).unwrap();
/// assert_eq!(service.endpoint, "https://localhost");
/// ```
pub fn create_injector<T: Reflect>() -> Result<Injector<T>> {
    let type_id = TypeId::of::<T>();

    if let Some(plan) = PLAN_CACHE.get(&type_id) {
        #[cfg(feature = "logging")]
        trace!(
            target: "member_inject",
            target_type = std::any::type_name::<T>(),
            "Injection plan resolved from cache"
        );
        return Ok(Injector::with_plan(Arc::clone(&plan)));
    }

    let plan = Arc::new(InjectionPlan::build::<T>()?);

    // Two threads may race to build the same plan; the first insert wins
    // and every caller shares the cached copy.
    let plan = Arc::clone(&PLAN_CACHE.entry(type_id).or_insert(plan));

    #[cfg(feature = "logging")]
    debug!(
        target: "member_inject",
        target_type = std::any::type_name::<T>(),
        actions = plan.len(),
        cached_plans = PLAN_CACHE.len(),
        "Injection plan cached"
    );

    Ok(Injector::with_plan(plan))
}

/// Number of injection plans currently cached.
#[inline]
pub fn cached_plan_count() -> usize {
    PLAN_CACHE.len()
}

/// Executable form of an injection plan, applied to instances of `T`.
///
/// Cheap to clone; clones share the cached plan. Safe to use from multiple
/// threads against *different* instances; injecting the *same* instance
/// concurrently is the caller's to serialize.
pub struct Injector<T: Reflect> {
    pub(crate) plan: Arc<InjectionPlan>,
    _target: PhantomData<fn(T)>,
}

impl<T: Reflect> Injector<T> {
    #[inline]
    fn with_plan(plan: Arc<InjectionPlan>) -> Self {
        Self {
            plan,
            _target: PhantomData,
        }
    }

    /// Apply the plan to one instance, resolving every dependency key
    /// against the supplied graph, in plan order.
    ///
    /// Fields are assigned directly; methods have every parameter resolved
    /// in order before the call, and their return values are discarded. A
    /// missing binding fails with
    /// [`InjectError::UnsatisfiedDependency`](crate::InjectError): injection
    /// already performed is kept, later actions never run. Injecting the
    /// same instance again re-executes every action.
    #[inline]
    pub fn inject(&self, instance: &mut T, graph: &BindingGraph) -> Result<()> {
        self.plan.apply(instance as &mut dyn Any, graph)
    }

    /// Number of actions the plan will perform per instance.
    #[inline]
    pub fn action_count(&self) -> usize {
        self.plan.len()
    }
}

impl<T: Reflect> Clone for Injector<T> {
    fn clone(&self) -> Self {
        Self::with_plan(Arc::clone(&self.plan))
    }
}

impl<T: Reflect> std::fmt::Debug for Injector<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Injector")
            .field("target_type", &self.plan.type_name())
            .field("actions", &self.plan.len())
            .finish()
    }
}
