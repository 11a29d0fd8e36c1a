//! Member descriptors: the introspection surface of the engine.
//!
//! Rust has no runtime reflection, so types opt into member injection by
//! registering a descriptor table: a [`TypeDescriptor`] listing the fields and
//! methods that request injection, with enough identity and capability
//! (setter / invoker closures over type-erased instances) to perform the
//! mutation later without re-introspecting. The plan builder and injector
//! depend only on this surface, never on a specific introspection mechanism.
//!
//! Hierarchy is modeled by struct embedding: a derived type names its
//! supertype and supplies a projection from the derived instance to the
//! embedded base value.
//!
//! # Examples
//!
//! ```rust
//! use member_inject::{FieldDescriptor, MethodDescriptor, Reflect, TypeDescriptor};
//!
//! #[derive(Default)]
//! struct Greeter {
//!     greeting: String,
//!     shouted: bool,
//! }
//!
//! impl Reflect for Greeter {
//!     fn descriptor() -> TypeDescriptor {
//!         TypeDescriptor::new::<Greeter>()
//!             .field(FieldDescriptor::new("greeting", |g: &mut Greeter, v: String| {
//!                 g.greeting = v;
//!             }))
//!             .method(MethodDescriptor::unary("shout", |g: &mut Greeter, _v: String| {
//!                 g.shouted = true;
//!             }))
//!     }
//! }
//! ```

use crate::binding::Resolved;
use crate::{Key, Qualifier};
use std::any::{Any, TypeId, type_name};
use std::sync::Arc;

/// Assigns a resolved value into a field of a type-erased instance.
pub type SetFn = dyn Fn(&mut dyn Any, &Resolved) + Send + Sync;

/// Invokes a method on a type-erased instance with resolved arguments.
pub type InvokeFn = dyn Fn(&mut dyn Any, &[Resolved]) + Send + Sync;

/// Projects a type-erased derived instance to its embedded supertype value.
pub type ProjectFn = dyn for<'a> Fn(&'a mut dyn Any) -> &'a mut (dyn Any) + Send + Sync;

/// Visibility of a member as seen from the injection mechanism's access
/// point.
///
/// Private members are rejected at plan-build time; everything else is
/// eligible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Visibility {
    /// Not visible to the injection mechanism.
    Private,
    /// Package/module visible.
    Package,
    /// Visible to subtypes.
    Protected,
    /// Visible everywhere.
    #[default]
    Public,
}

impl Visibility {
    /// Whether this visibility blocks injection.
    #[inline]
    pub fn is_private(self) -> bool {
        matches!(self, Visibility::Private)
    }
}

/// Unpack one resolved method argument.
///
/// # Panics
///
/// Panics if the index is out of range or the resolved value is not a `V`.
/// Either indicates a descriptor whose parameter keys disagree with its
/// invoker, which is a registration bug.
#[inline]
pub fn arg<V: Clone + 'static>(args: &[Resolved], index: usize) -> V {
    args.get(index)
        .unwrap_or_else(|| panic!("method argument {index} out of range"))
        .downcast_ref::<V>()
        .unwrap_or_else(|| {
            panic!(
                "method argument {index} does not hold a {}",
                type_name::<V>()
            )
        })
        .clone()
}

// =============================================================================
// Field Descriptors
// =============================================================================

/// Describes one field that requests injection.
///
/// Carries the member identity (name, modifiers) and the dependency key
/// derived from the field's declared type plus any qualifier attached to it.
#[derive(Clone)]
pub struct FieldDescriptor {
    name: &'static str,
    key: Key,
    is_static: bool,
    visibility: Visibility,
    set: Arc<SetFn>,
}

impl FieldDescriptor {
    /// Describe a field of declared type `V` on type `T`.
    ///
    /// The assignment function writes the resolved value directly into the
    /// field, bypassing any setter semantics. Defaults: public, non-static,
    /// unqualified.
    pub fn new<T, V>(name: &'static str, assign: fn(&mut T, V)) -> Self
    where
        T: Any,
        V: Clone + Send + Sync + 'static,
    {
        Self {
            name,
            key: Key::of::<V>(),
            is_static: false,
            visibility: Visibility::Public,
            set: Arc::new(move |instance, value| {
                let instance = instance.downcast_mut::<T>().unwrap_or_else(|| {
                    panic!(
                        "field descriptor for {} applied to a foreign instance",
                        type_name::<T>()
                    )
                });
                let value = value
                    .downcast_ref::<V>()
                    .unwrap_or_else(|| {
                        panic!("resolved value does not hold a {}", type_name::<V>())
                    })
                    .clone();
                assign(instance, value);
            }),
        }
    }

    /// Attach a qualifier marker to the field's dependency key.
    #[inline]
    pub fn qualified(mut self, qualifier: Qualifier) -> Self {
        self.key = self.key.with_qualifier(qualifier);
        self
    }

    /// Declare the field's visibility.
    #[inline]
    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    /// Mark the field as statically declared.
    #[inline]
    pub fn declared_static(mut self) -> Self {
        self.is_static = true;
        self
    }

    /// The member name.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The dependency key this field resolves against.
    #[inline]
    pub fn key(&self) -> &Key {
        &self.key
    }

    /// Whether the field is statically declared.
    #[inline]
    pub fn is_static(&self) -> bool {
        self.is_static
    }

    /// The field's declared visibility.
    #[inline]
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    #[inline]
    pub(crate) fn setter(&self) -> Arc<SetFn> {
        Arc::clone(&self.set)
    }
}

impl std::fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("key", &self.key)
            .field("is_static", &self.is_static)
            .field("visibility", &self.visibility)
            .finish()
    }
}

// =============================================================================
// Method Descriptors
// =============================================================================

/// Describes one method that requests injection.
///
/// The key list holds exactly one entry per formal parameter, in parameter
/// order, each derived from the parameter's declared type plus that
/// parameter's own qualifier, independent of the others'. Abstract methods
/// carry no invoker.
#[derive(Clone)]
pub struct MethodDescriptor {
    name: &'static str,
    parameter_keys: Vec<Key>,
    is_static: bool,
    visibility: Visibility,
    invoke: Option<Arc<InvokeFn>>,
}

impl MethodDescriptor {
    /// Describe a method on type `T` with explicit parameter keys.
    ///
    /// The body receives the typed instance and the resolved arguments in
    /// parameter order; use [`arg`] to unpack them. Any value the underlying
    /// method returns is the body's to discard. Defaults: public, non-static.
    pub fn new<T, F>(name: &'static str, parameter_keys: Vec<Key>, body: F) -> Self
    where
        T: Any,
        F: Fn(&mut T, &[Resolved]) + Send + Sync + 'static,
    {
        Self {
            name,
            parameter_keys,
            is_static: false,
            visibility: Visibility::Public,
            invoke: Some(Arc::new(move |instance, args| {
                let instance = instance.downcast_mut::<T>().unwrap_or_else(|| {
                    panic!(
                        "method descriptor for {} applied to a foreign instance",
                        type_name::<T>()
                    )
                });
                body(instance, args);
            })),
        }
    }

    /// Describe a single-parameter method, deriving the key from `A`.
    pub fn unary<T, A>(name: &'static str, call: fn(&mut T, A)) -> Self
    where
        T: Any,
        A: Clone + Send + Sync + 'static,
    {
        Self::new::<T, _>(name, vec![Key::of::<A>()], move |instance, args| {
            call(instance, arg::<A>(args, 0));
        })
    }

    /// Describe an abstract method: declared, but with no body to invoke.
    ///
    /// Abstract methods are never executable; a plan build that encounters
    /// one fails.
    pub fn abstract_method(name: &'static str, parameter_keys: Vec<Key>) -> Self {
        Self {
            name,
            parameter_keys,
            is_static: false,
            visibility: Visibility::Public,
            invoke: None,
        }
    }

    /// Attach a qualifier to the parameter at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range for the declared parameters.
    pub fn parameter_qualifier(mut self, index: usize, qualifier: Qualifier) -> Self {
        assert!(
            index < self.parameter_keys.len(),
            "parameter index {index} out of range for {}()",
            self.name
        );
        let key = self.parameter_keys[index].clone().with_qualifier(qualifier);
        self.parameter_keys[index] = key;
        self
    }

    /// Declare the method's visibility.
    #[inline]
    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    /// Mark the method as statically declared.
    #[inline]
    pub fn declared_static(mut self) -> Self {
        self.is_static = true;
        self
    }

    /// The member name.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The dependency keys, one per formal parameter, in order.
    #[inline]
    pub fn parameter_keys(&self) -> &[Key] {
        &self.parameter_keys
    }

    /// Whether the method is statically declared.
    #[inline]
    pub fn is_static(&self) -> bool {
        self.is_static
    }

    /// The method's declared visibility.
    #[inline]
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// Whether the method is abstract (declared without a body).
    #[inline]
    pub fn is_abstract(&self) -> bool {
        self.invoke.is_none()
    }

    #[inline]
    pub(crate) fn invoker(&self) -> Option<Arc<InvokeFn>> {
        self.invoke.as_ref().map(Arc::clone)
    }
}

impl std::fmt::Debug for MethodDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MethodDescriptor")
            .field("name", &self.name)
            .field("parameters", &self.parameter_keys.len())
            .field("is_static", &self.is_static)
            .field("visibility", &self.visibility)
            .field("is_abstract", &self.is_abstract())
            .finish()
    }
}

// =============================================================================
// Type Descriptors
// =============================================================================

/// Link from a type descriptor to its supertype.
///
/// The projection maps a type-erased derived instance to the embedded
/// supertype value, so that the supertype's own setters and invokers can run
/// against it.
#[derive(Clone)]
pub struct Supertype {
    pub(crate) descriptor: fn() -> TypeDescriptor,
    pub(crate) project: Arc<ProjectFn>,
}

/// The declared members of one type level, plus its supertype link.
///
/// Declaration order of fields and methods is the registration order and is
/// stable for a given type.
#[derive(Clone)]
pub struct TypeDescriptor {
    type_id: TypeId,
    type_name: &'static str,
    supertype: Option<Supertype>,
    fields: Vec<FieldDescriptor>,
    methods: Vec<MethodDescriptor>,
}

impl TypeDescriptor {
    /// Start describing type `T`.
    pub fn new<T: Any>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
            supertype: None,
            fields: Vec::new(),
            methods: Vec::new(),
        }
    }

    /// Declare `S` as the supertype of `T`, reachable through `project`.
    pub fn extends<T: Any, S: Reflect>(mut self, project: fn(&mut T) -> &mut S) -> Self {
        debug_assert_eq!(
            self.type_id,
            TypeId::of::<T>(),
            "supertype projection declared for a different type"
        );
        self.supertype = Some(Supertype {
            descriptor: S::descriptor,
            project: Arc::new(move |instance: &mut dyn Any| {
                let instance = instance.downcast_mut::<T>().unwrap_or_else(|| {
                    panic!(
                        "supertype projection for {} applied to a foreign instance",
                        type_name::<T>()
                    )
                });
                project(instance) as &mut dyn Any
            }),
        });
        self
    }

    /// Register a field that requests injection.
    #[inline]
    pub fn field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    /// Register a method that requests injection.
    #[inline]
    pub fn method(mut self, method: MethodDescriptor) -> Self {
        self.methods.push(method);
        self
    }

    /// The described type's [`TypeId`].
    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// The described type's canonical name.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// The supertype link, if any.
    #[inline]
    pub fn supertype(&self) -> Option<&Supertype> {
        self.supertype.as_ref()
    }

    /// Fields declared at this level, in declaration order.
    #[inline]
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Methods declared at this level, in declaration order.
    #[inline]
    pub fn methods(&self) -> &[MethodDescriptor] {
        &self.methods
    }
}

impl std::fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("type_name", &self.type_name)
            .field("fields", &self.fields.len())
            .field("methods", &self.methods.len())
            .field("has_supertype", &self.supertype.is_some())
            .finish()
    }
}

/// Types that describe their injectable members.
///
/// Implementing `Reflect` is how a type opts into member injection. The
/// descriptor must be stable: repeated calls describe the same members in the
/// same order.
pub trait Reflect: Any {
    /// The descriptor table for this type.
    fn descriptor() -> TypeDescriptor
    where
        Self: Sized;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::named;

    #[derive(Default)]
    struct Widget {
        label: String,
        attached: bool,
    }

    #[test]
    fn field_defaults_are_public_instance_members() {
        let field = FieldDescriptor::new("label", |w: &mut Widget, v: String| w.label = v);
        assert_eq!(field.name(), "label");
        assert!(!field.is_static());
        assert_eq!(field.visibility(), Visibility::Public);
        assert_eq!(field.key(), &Key::of::<String>());
    }

    #[test]
    fn qualified_field_key_carries_the_marker() {
        let field = FieldDescriptor::new("label", |w: &mut Widget, v: String| w.label = v)
            .qualified(named("display"));
        assert_eq!(field.key(), &Key::qualified::<String>(named("display")));
    }

    #[test]
    fn setter_applies_through_erased_instance() {
        let field = FieldDescriptor::new("label", |w: &mut Widget, v: String| w.label = v);
        let mut widget = Widget::default();
        let value: Resolved = std::sync::Arc::new("hello".to_string());

        (field.setter().as_ref())(&mut widget as &mut dyn Any, &value);
        assert_eq!(widget.label, "hello");
    }

    #[test]
    fn unary_method_derives_parameter_key() {
        let method = MethodDescriptor::unary("attach", |w: &mut Widget, _v: i64| {
            w.attached = true;
        });
        assert_eq!(method.parameter_keys(), &[Key::of::<i64>()]);
        assert!(!method.is_abstract());
    }

    #[test]
    fn parameter_qualifier_is_independent_per_parameter() {
        let method = MethodDescriptor::new::<Widget, _>(
            "configure",
            vec![Key::of::<String>(), Key::of::<i64>()],
            |_, _| {},
        )
        .parameter_qualifier(1, named("limit"));

        assert_eq!(method.parameter_keys()[0], Key::of::<String>());
        assert_eq!(
            method.parameter_keys()[1],
            Key::qualified::<i64>(named("limit"))
        );
    }

    #[test]
    fn abstract_method_has_no_invoker() {
        let method = MethodDescriptor::abstract_method("attach", vec![Key::of::<String>()]);
        assert!(method.is_abstract());
        assert!(method.invoker().is_none());
    }

    #[test]
    fn descriptor_records_declaration_order() {
        let descriptor = TypeDescriptor::new::<Widget>()
            .field(FieldDescriptor::new("label", |w: &mut Widget, v: String| {
                w.label = v;
            }))
            .method(MethodDescriptor::unary("attach", |w: &mut Widget, _v: i64| {
                w.attached = true;
            }));

        assert_eq!(descriptor.fields().len(), 1);
        assert_eq!(descriptor.methods().len(), 1);
        assert!(descriptor.type_name().contains("Widget"));
        assert!(descriptor.supertype().is_none());
    }
}
