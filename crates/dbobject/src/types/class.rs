// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Host-visible classes for object types.
//!
//! The host keeps one class per `schema.name` for each connection. The
//! registry attaches the populated [`ObjectTypeDescriptor`] and the
//! attribute metadata to the class once, so later lookups of the same type
//! need no further introspection.

use crate::error::Result;
use crate::types::{DataTypeInfo, ObjectTypeDescriptor, OracleType, TypeShape};
use dashmap::DashMap;
use std::sync::{Arc, OnceLock};

/// Type of an attribute or collection element, as shown to host code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeMetadata {
    /// Numeric type tag.
    pub type_number: u32,
    /// Database type name, or the nested type's fully-qualified name.
    pub type_name: String,
    /// Fully-qualified name of the nested class, for object slots.
    pub type_class: Option<String>,
}

impl TypeMetadata {
    fn describe(info: &DataTypeInfo) -> Self {
        let type_class = match info.oracle_type() {
            OracleType::Object => info.nested().map(|n| n.fqn().to_string()),
            _ => None,
        };
        Self {
            type_number: info.oracle_type().number(),
            type_name: info.type_name().to_string(),
            type_class,
        }
    }
}

/// Attribute entry of a structured class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeMetadata {
    pub name: String,
    pub ty: TypeMetadata,
}

/// Metadata written onto a host class after population.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassMetadata {
    pub fqn: String,
    pub is_collection: bool,
    /// Attributes in declaration order (empty for collections).
    pub attributes: Vec<AttributeMetadata>,
    /// Element type (collections only).
    pub element_type: Option<TypeMetadata>,
}

impl ClassMetadata {
    /// Describe a populated descriptor.
    pub fn describe(descriptor: &ObjectTypeDescriptor) -> Self {
        let (attributes, element_type) = match descriptor.shape() {
            TypeShape::Structure(attrs) => (
                attrs
                    .iter()
                    .map(|a| AttributeMetadata {
                        name: a.name().to_string(),
                        ty: TypeMetadata::describe(a.type_info()),
                    })
                    .collect(),
                None,
            ),
            TypeShape::Collection(element) => (Vec::new(), Some(TypeMetadata::describe(element))),
        };
        Self {
            fqn: descriptor.fqn().to_string(),
            is_collection: descriptor.is_collection(),
            attributes,
            element_type,
        }
    }

    /// Attribute entry by name.
    pub fn attribute(&self, name: &str) -> Option<&AttributeMetadata> {
        self.attributes.iter().find(|a| a.name == name)
    }
}

/// Host class for one object type.
#[derive(Debug)]
pub struct HostClass {
    schema: String,
    name: String,
    fqn: String,
    descriptor: OnceLock<Arc<ObjectTypeDescriptor>>,
    metadata: OnceLock<ClassMetadata>,
}

impl HostClass {
    pub fn new(schema: impl Into<String>, name: impl Into<String>) -> Self {
        let schema = schema.into();
        let name = name.into();
        let fqn = format!("{}.{}", schema, name);
        Self {
            schema,
            name,
            fqn,
            descriptor: OnceLock::new(),
            metadata: OnceLock::new(),
        }
    }

    pub fn schema(&self) -> &str {
        &self.schema
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fqn(&self) -> &str {
        &self.fqn
    }

    /// Populated descriptor, if the registry has attached one.
    pub fn descriptor(&self) -> Option<&Arc<ObjectTypeDescriptor>> {
        self.descriptor.get()
    }

    pub fn metadata(&self) -> Option<&ClassMetadata> {
        self.metadata.get()
    }

    pub fn is_populated(&self) -> bool {
        self.descriptor.get().is_some()
    }

    /// Attach a populated descriptor. The first attachment wins; the
    /// descriptor that is returned is the one the class keeps.
    pub(crate) fn attach(&self, descriptor: Arc<ObjectTypeDescriptor>) -> Arc<ObjectTypeDescriptor> {
        let kept = self.descriptor.get_or_init(|| descriptor).clone();
        let _ = self.metadata.get_or_init(|| ClassMetadata::describe(&kept));
        kept
    }
}

/// Host-side class lookup.
///
/// Idempotent: the same `schema.name` always yields the same class, which
/// may already carry a populated descriptor.
pub trait ClassCache: Send + Sync {
    fn lookup_or_create(&self, schema: &str, name: &str) -> Result<Arc<HostClass>>;
}

/// Per-connection class cache keyed by fully-qualified name.
#[derive(Debug, Default)]
pub struct ConnectionClassCache {
    classes: DashMap<String, Arc<HostClass>>,
}

impl ConnectionClassCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Class by fully-qualified name, if it was ever looked up.
    pub fn get(&self, fqn: &str) -> Option<Arc<HostClass>> {
        self.classes.get(fqn).map(|c| c.value().clone())
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl ClassCache for ConnectionClassCache {
    fn lookup_or_create(&self, schema: &str, name: &str) -> Result<Arc<HostClass>> {
        let fqn = format!("{}.{}", schema, name);
        let class = self
            .classes
            .entry(fqn)
            .or_insert_with(|| Arc::new(HostClass::new(schema, name)))
            .value()
            .clone();
        Ok(class)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_is_idempotent() {
        let cache = ConnectionClassCache::new();
        let a = cache.lookup_or_create("HR", "POINT").expect("lookup");
        let b = cache.lookup_or_create("HR", "POINT").expect("lookup");
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 1);
        assert_eq!(a.fqn(), "HR.POINT");
        assert!(!a.is_populated());
    }

    #[test]
    fn test_distinct_schemas() {
        let cache = ConnectionClassCache::new();
        let a = cache.lookup_or_create("HR", "POINT").expect("lookup");
        let b = cache.lookup_or_create("SALES", "POINT").expect("lookup");
        assert!(!Arc::ptr_eq(&a, &b));
        assert!(cache.get("SALES.POINT").is_some());
        assert!(cache.get("OE.POINT").is_none());
    }
}
