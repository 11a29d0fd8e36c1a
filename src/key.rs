//! Dependency identification keys.
//!
//! A [`Key`] is the identity of a requested dependency: the required type plus
//! an optional [`Qualifier`] marker. Two keys are equal iff both the type and
//! the qualifier match; the absence of a qualifier is itself a distinct, valid
//! key state.

use std::any::{TypeId, type_name};
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

/// An annotation-like marker distinguishing otherwise-identical-typed
/// dependencies.
///
/// A qualifier is a small value object: a marker name plus an optional
/// attribute map, compared structurally. No runtime annotation system is
/// involved; qualifiers are constructed freely by callers.
///
/// # Examples
///
/// ```rust
/// use member_inject::{named, Qualifier};
///
/// let a = Qualifier::new("Named").with_attribute("value", "primary");
/// let b = named("primary");
/// assert_eq!(a, b);
/// assert_ne!(a, named("replica"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Qualifier {
    name: String,
    attributes: BTreeMap<String, String>,
}

impl Qualifier {
    /// Create a qualifier marker with no attributes.
    #[inline]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: BTreeMap::new(),
        }
    }

    /// Attach an attribute to the marker.
    #[inline]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// The marker name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Look up an attribute by name.
    #[inline]
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }
}

impl fmt::Display for Qualifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.name)?;
        if !self.attributes.is_empty() {
            write!(f, "(")?;
            for (i, (k, v)) in self.attributes.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{k}={v:?}")?;
            }
            write!(f, ")")?;
        }
        Ok(())
    }
}

/// The common name-qualifier: a `Named` marker with a single `value` attribute.
///
/// # Examples
///
/// ```rust
/// use member_inject::named;
///
/// assert_eq!(named("tres").attribute("value"), Some("tres"));
/// ```
#[inline]
pub fn named(value: impl Into<String>) -> Qualifier {
    Qualifier::new("Named").with_attribute("value", value)
}

/// Uniquely identifies a dependency during resolution.
///
/// Combines the [`TypeId`] of the required type with an optional [`Qualifier`].
/// The human-readable type name is carried along for diagnostics only and does
/// not participate in equality or hashing.
///
/// # Examples
///
/// ```rust
/// use member_inject::{named, Key};
///
/// let plain = Key::of::<String>();
/// let qualified = Key::qualified::<String>(named("primary"));
/// assert_ne!(plain, qualified);
/// assert_eq!(plain, Key::of::<String>());
/// ```
#[derive(Debug, Clone)]
pub struct Key {
    type_id: TypeId,
    type_name: &'static str,
    qualifier: Option<Qualifier>,
}

impl Key {
    /// Create an unqualified key for type `T`.
    #[inline]
    pub fn of<T: 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
            qualifier: None,
        }
    }

    /// Create a qualified key for type `T`.
    #[inline]
    pub fn qualified<T: 'static>(qualifier: Qualifier) -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
            qualifier: Some(qualifier),
        }
    }

    /// Replace this key's qualifier, keeping the required type.
    #[inline]
    pub fn with_qualifier(mut self, qualifier: Qualifier) -> Self {
        self.qualifier = Some(qualifier);
        self
    }

    /// The [`TypeId`] of the required type.
    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// The human-readable name of the required type.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// The qualifier marker, if any.
    #[inline]
    pub fn qualifier(&self) -> Option<&Qualifier> {
        self.qualifier.as_ref()
    }
}

impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id && self.qualifier == other.qualifier
    }
}

impl Eq for Key {}

impl Hash for Key {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
        self.qualifier.hash(state);
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.qualifier {
            Some(q) => write!(f, "{q} {}", self.type_name),
            None => write!(f, "{}", self.type_name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct Marker;

    #[test]
    fn unqualified_keys_equal_per_type() {
        assert_eq!(Key::of::<String>(), Key::of::<String>());
        assert_ne!(Key::of::<String>(), Key::of::<i64>());
    }

    #[test]
    fn qualifier_distinguishes_keys() {
        let plain = Key::of::<String>();
        let uno = Key::qualified::<String>(named("uno"));
        let dos = Key::qualified::<String>(named("dos"));

        assert_ne!(plain, uno);
        assert_ne!(uno, dos);
        assert_eq!(uno, Key::qualified::<String>(named("uno")));
    }

    #[test]
    fn qualifier_attributes_are_structural() {
        let a = Qualifier::new("Env")
            .with_attribute("tier", "prod")
            .with_attribute("region", "eu");
        let b = Qualifier::new("Env")
            .with_attribute("region", "eu")
            .with_attribute("tier", "prod");
        assert_eq!(a, b);

        let c = Qualifier::new("Env").with_attribute("tier", "dev");
        assert_ne!(a, c);
    }

    #[test]
    fn key_usable_as_map_key() {
        let mut map = HashMap::new();
        map.insert(Key::of::<Marker>(), 1);
        map.insert(Key::qualified::<Marker>(named("alt")), 2);

        assert_eq!(map.get(&Key::of::<Marker>()), Some(&1));
        assert_eq!(map.get(&Key::qualified::<Marker>(named("alt"))), Some(&2));
        assert_eq!(map.get(&Key::of::<String>()), None);
    }

    #[test]
    fn display_names_type_and_qualifier() {
        let key = Key::qualified::<String>(named("tres"));
        let shown = key.to_string();
        assert!(shown.contains("String"));
        assert!(shown.contains("Named"));
        assert!(shown.contains("tres"));
    }
}
