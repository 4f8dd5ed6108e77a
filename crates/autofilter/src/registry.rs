//! Field registry: case-insensitive lookup of a record's fields by name.
//!
//! A [`FieldRegistry`] is built from [`Record::fields`] once per shape and
//! shared afterwards. Lookups never mutate it, so one registry serves any
//! number of concurrent callers.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use once_cell::sync::Lazy;

use crate::error::{AutoFilterError, Result};
use crate::traits::Record;
use crate::value::{FieldKind, FieldType, Value};

/// Accessor returning the value of one field of a record.
pub type Accessor<T> = for<'a> fn(&'a T) -> Value<'a>;

/// Descriptor of one filterable field: its name, declared type and accessor.
///
/// A `Field` returned by [`FieldRegistry::resolve`] is the resolved field
/// used to build predicates and ordering steps.
pub struct Field<T> {
    name: &'static str,
    ty: FieldType,
    get: Accessor<T>,
}

impl<T> Field<T> {
    /// Creates a field descriptor.
    pub fn new(name: &'static str, ty: FieldType, get: Accessor<T>) -> Self {
        Field { name, ty, get }
    }

    /// Returns the declared field name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the declared type, including nullability.
    pub fn field_type(&self) -> FieldType {
        self.ty
    }

    /// Returns the underlying kind, with any nullable wrapper removed.
    pub fn kind(&self) -> FieldKind {
        self.ty.kind()
    }

    /// Returns `true` if the field may hold a null value.
    pub fn is_nullable(&self) -> bool {
        self.ty.is_nullable()
    }

    /// Reads the field from a record.
    pub fn get<'a>(&self, record: &'a T) -> Value<'a> {
        (self.get)(record)
    }
}

impl<T> Clone for Field<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Field<T> {}

impl<T> fmt::Debug for Field<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("ty", &self.ty)
            .finish()
    }
}

/// Case-insensitive lookup table from field name to [`Field`].
pub struct FieldRegistry<T> {
    shape: &'static str,
    fields: Vec<Field<T>>,
    by_name: HashMap<String, usize>,
}

static SHARED: Lazy<DashMap<TypeId, Arc<dyn Any + Send + Sync>>> = Lazy::new(DashMap::new);

impl<T: Record> FieldRegistry<T> {
    /// Builds a registry from the shape's [`Record::fields`].
    pub fn new() -> Self {
        Self::from_fields(T::fields())
    }

    /// Builds a registry from an explicit field list.
    ///
    /// When two names collide case-insensitively, the first one wins.
    pub fn from_fields(fields: Vec<Field<T>>) -> Self {
        let shape = short_type_name::<T>();
        let mut by_name = HashMap::with_capacity(fields.len());

        for (index, field) in fields.iter().enumerate() {
            let key = field.name.to_lowercase();
            if by_name.contains_key(&key) {
                tracing::warn!(
                    shape,
                    field = field.name,
                    "field name collides case-insensitively with an earlier field, ignoring it"
                );
                continue;
            }
            by_name.insert(key, index);
        }

        tracing::trace!(shape, fields = by_name.len(), "built field registry");

        FieldRegistry {
            shape,
            fields,
            by_name,
        }
    }

    /// Returns the registry for `T`, building it on first use.
    ///
    /// The registry is built at most once per shape per process and read-only
    /// afterwards.
    pub fn shared() -> Arc<Self> {
        let entry = SHARED
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Arc::new(Self::new()) as Arc<dyn Any + Send + Sync>)
            .clone();

        entry
            .downcast::<Self>()
            .unwrap_or_else(|_| Arc::new(Self::new()))
    }

    /// Resolves a field name.
    ///
    /// Matching is case-insensitive but otherwise exact: names with leading
    /// or trailing whitespace never match. An empty or whitespace-only name
    /// fails with [`AutoFilterError::EmptyField`].
    pub fn resolve(&self, name: &str) -> Result<Field<T>> {
        if name.trim().is_empty() {
            return Err(AutoFilterError::EmptyField);
        }

        self.by_name
            .get(&name.to_lowercase())
            .map(|&index| self.fields[index])
            .ok_or_else(|| AutoFilterError::UnknownField {
                field: name.to_string(),
                shape: self.shape,
            })
    }
}

impl<T: Record> Default for FieldRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FieldRegistry<T> {
    /// Returns the short type name of the shape, for messages.
    pub fn shape(&self) -> &'static str {
        self.shape
    }

    /// Returns the fields in declaration order.
    pub fn fields(&self) -> &[Field<T>] {
        &self.fields
    }

    /// Returns the number of resolvable names.
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// Returns `true` if the shape has no filterable field.
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

impl<T> fmt::Debug for FieldRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldRegistry")
            .field("shape", &self.shape)
            .field("fields", &self.fields)
            .finish()
    }
}

/// Returns the last path segment of a type name (`app::model::Invoice` -> `Invoice`).
pub(crate) fn short_type_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}
