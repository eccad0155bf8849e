// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Object type registry.
//!
//! Resolves native type handles to populated [`ObjectTypeDescriptor`]s and
//! their host classes. A type is introspected at most once per registry:
//! descriptors are cached by fully-qualified name and attached to the host
//! class, and a descriptor only enters the cache after its whole population
//! succeeded.
//!
//! # Nested and recursive types
//!
//! Slots holding objects reference their type through a [`NestedType`]
//! (name plus type handle) rather than the descriptor itself. Population
//! keeps a stack of the types currently being introspected on this call
//! path; a nested type found on that stack is referenced by name without
//! recursing, which is what makes mutually nesting types terminate.
//!
//! # Concurrency
//!
//! First population is single-flight: it runs under a reentrant lock so
//! the populating thread may recurse into nested types while other threads
//! wait, and the cache is checked again once the lock is held.

use crate::error::{Error, Result};
use crate::native::{Native, NativeTypeInfo, ObjectTypeHandle, ObjectTypeInfo};
use crate::types::{
    AttributeDescriptor, ClassCache, DataTypeInfo, HostClass, NestedType, ObjectTypeDescriptor,
    OracleType, TypeShape,
};
use dashmap::DashMap;
use parking_lot::ReentrantMutex;
use std::fmt;
use std::sync::Arc;

/// Descriptor of a resolved type together with its host class.
#[derive(Debug, Clone)]
pub struct ResolvedType {
    pub descriptor: Arc<ObjectTypeDescriptor>,
    pub class: Arc<HostClass>,
}

/// Per-connection cache of object type descriptors.
pub struct ObjectTypeRegistry {
    native: Native,
    classes: Arc<dyn ClassCache>,
    descriptors: DashMap<String, Arc<ObjectTypeDescriptor>>,
    populate_lock: ReentrantMutex<()>,
}

impl fmt::Debug for ObjectTypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectTypeRegistry")
            .field("descriptors", &self.descriptors.len())
            .finish_non_exhaustive()
    }
}

/// Names arrive as byte-length bounded strings.
fn decode_name(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

impl ObjectTypeRegistry {
    pub fn new(native: Native, classes: Arc<dyn ClassCache>) -> Self {
        Self {
            native,
            classes,
            descriptors: DashMap::new(),
            populate_lock: ReentrantMutex::new(()),
        }
    }

    pub fn native(&self) -> &Native {
        &self.native
    }

    pub fn classes(&self) -> &Arc<dyn ClassCache> {
        &self.classes
    }

    /// Cached descriptor by fully-qualified name.
    pub fn lookup(&self, fqn: &str) -> Option<Arc<ObjectTypeDescriptor>> {
        self.descriptors.get(fqn).map(|d| d.value().clone())
    }

    /// Number of populated descriptors.
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Resolve a native type handle (borrowed) to its descriptor and class,
    /// introspecting the type on first encounter.
    pub fn resolve(&self, object_type: ObjectTypeHandle) -> Result<ResolvedType> {
        let info = self.native.object_type_info(object_type)?;
        let schema = decode_name(&info.schema);
        let name = decode_name(&info.name);
        let class = self.classes.lookup_or_create(&schema, &name)?;

        if let Some(descriptor) = class.descriptor() {
            log::trace!("[ObjectTypeRegistry::resolve] class hit {}", class.fqn());
            return Ok(ResolvedType {
                descriptor: descriptor.clone(),
                class,
            });
        }

        let descriptor = match self.lookup(class.fqn()) {
            Some(descriptor) => descriptor,
            None => self.populate(object_type, &info, &mut Vec::new())?,
        };
        let descriptor = class.attach(descriptor);
        Ok(ResolvedType { descriptor, class })
    }

    /// Resolve the type a slot refers to. Cached types need no native call.
    pub fn resolve_nested(&self, nested: &NestedType) -> Result<ResolvedType> {
        if let Some(descriptor) = self.lookup(nested.fqn()) {
            let class = self
                .classes
                .lookup_or_create(nested.schema(), nested.name())?;
            let descriptor = class.attach(descriptor);
            return Ok(ResolvedType { descriptor, class });
        }
        self.resolve(nested.handle())
    }

    /// Introspect a type and cache its descriptor.
    ///
    /// `in_progress` holds the fully-qualified names being populated on
    /// this call path, outermost first.
    fn populate(
        &self,
        object_type: ObjectTypeHandle,
        info: &ObjectTypeInfo,
        in_progress: &mut Vec<String>,
    ) -> Result<Arc<ObjectTypeDescriptor>> {
        let schema = decode_name(&info.schema);
        let name = decode_name(&info.name);
        let fqn = format!("{}.{}", schema, name);

        let _guard = self.populate_lock.lock();
        if let Some(descriptor) = self.lookup(&fqn) {
            return Ok(descriptor);
        }

        log::debug!(
            "[ObjectTypeRegistry::populate] {} (collection={}, attributes={})",
            fqn,
            info.is_collection,
            info.num_attributes
        );

        in_progress.push(fqn.clone());
        let built = self.build(object_type, info, schema, name, in_progress);
        in_progress.pop();

        let descriptor = match built {
            Ok(descriptor) => Arc::new(descriptor),
            Err(err) => {
                log::debug!("[ObjectTypeRegistry::populate] {} failed: {}", fqn, err);
                return Err(err);
            }
        };

        self.descriptors.insert(fqn.clone(), descriptor.clone());
        let class = self
            .classes
            .lookup_or_create(descriptor.schema(), descriptor.name())?;
        let descriptor = class.attach(descriptor);
        log::debug!("[ObjectTypeRegistry::populate] {} cached", fqn);
        Ok(descriptor)
    }

    fn build(
        &self,
        object_type: ObjectTypeHandle,
        info: &ObjectTypeInfo,
        schema: String,
        name: String,
        in_progress: &mut Vec<String>,
    ) -> Result<ObjectTypeDescriptor> {
        let handle = self.native.add_ref(object_type)?;

        let shape = if info.is_collection {
            let element = info.element_type.ok_or_else(|| Error::NotACollection {
                type_name: format!("{}.{}", schema, name),
            })?;
            TypeShape::Collection(self.type_info(element, in_progress)?)
        } else {
            let handles = self
                .native
                .object_type_attributes(object_type, info.num_attributes)?;
            let mut attributes = Vec::new();
            attributes
                .try_reserve_exact(handles.len())
                .map_err(|_| Error::out_of_memory(format!("attribute table of {}.{}", schema, name)))?;
            for attr in handles {
                let attr_info = self.native.object_attr_info(attr.handle())?;
                let type_info = self.type_info(attr_info.type_info, in_progress)?;
                attributes.push(AttributeDescriptor::new(
                    decode_name(&attr_info.name),
                    type_info,
                    attr,
                ));
            }
            TypeShape::Structure(attributes)
        };

        Ok(ObjectTypeDescriptor::new(schema, name, shape, handle))
    }

    fn type_info(
        &self,
        info: NativeTypeInfo,
        in_progress: &mut Vec<String>,
    ) -> Result<DataTypeInfo> {
        let nested = match info.object_type {
            Some(nested) if info.oracle_type == OracleType::Object => {
                Some(self.nested_type(nested, in_progress)?)
            }
            _ => None,
        };
        Ok(DataTypeInfo::new(
            info.oracle_type,
            info.default_representation,
            nested,
        ))
    }

    fn nested_type(
        &self,
        object_type: ObjectTypeHandle,
        in_progress: &mut Vec<String>,
    ) -> Result<NestedType> {
        let handle = self.native.add_ref(object_type)?;
        let info = self.native.object_type_info(object_type)?;
        let schema = decode_name(&info.schema);
        let name = decode_name(&info.name);
        let fqn = format!("{}.{}", schema, name);

        if in_progress.contains(&fqn) {
            log::debug!(
                "[ObjectTypeRegistry::nested_type] {} is being populated, referencing by name",
                fqn
            );
        } else if self.lookup(&fqn).is_none() {
            self.populate(object_type, &info, in_progress)?;
        }
        Ok(NestedType::new(schema, name, handle))
    }
}
