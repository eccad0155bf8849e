// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Object and collection instances.
//!
//! A [`DbObject`] is the host-side value. It is bound to at most one
//! [`DbObjectInstance`], which owns the native handle. Binding is lazy: an
//! object constructed on the host side gets its native instance the first
//! time an operation needs it, while objects read from the database or
//! produced by [`DbObject::copy`] are bound from the start.
//!
//! A proxy object delegates every operation to its target; the binding
//! always lives on the target.

mod cursor;
mod methods;

pub use cursor::{CollectionCursor, Indices};
pub use methods::ObjectMethod;

use crate::context::SessionContext;
use crate::error::{Error, Result};
use crate::marshal::Slot;
use crate::native::{ObjectHandle, ObjectRef};
use crate::types::{AttributeDescriptor, HostClass, ObjectTypeDescriptor, ResolvedType};
use crate::value::HostValue;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

/// Live native instance of an object type.
///
/// Dropping the instance releases its native handle exactly once.
#[derive(Debug)]
pub struct DbObjectInstance {
    descriptor: Arc<ObjectTypeDescriptor>,
    handle: ObjectRef,
}

impl DbObjectInstance {
    pub fn descriptor(&self) -> &Arc<ObjectTypeDescriptor> {
        &self.descriptor
    }

    pub fn handle(&self) -> ObjectHandle {
        self.handle.handle()
    }
}

struct Inner {
    class: Arc<HostClass>,
    target: Option<DbObject>,
    binding: OnceLock<Arc<DbObjectInstance>>,
}

/// Host value of a structured or collection type.
///
/// Clones share the same binding.
#[derive(Clone)]
pub struct DbObject(Arc<Inner>);

impl fmt::Debug for DbObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbObject")
            .field("class", &self.0.class.fqn())
            .field("bound", &self.is_bound())
            .field("proxy", &self.is_proxy())
            .finish()
    }
}

impl DbObject {
    /// Host-side object of `class`, not yet bound to a native instance.
    pub fn new(class: Arc<HostClass>) -> Self {
        Self(Arc::new(Inner {
            class,
            target: None,
            binding: OnceLock::new(),
        }))
    }

    /// Delegating view of `target`.
    pub fn proxy(target: DbObject) -> Self {
        Self(Arc::new(Inner {
            class: target.0.class.clone(),
            target: Some(target),
            binding: OnceLock::new(),
        }))
    }

    /// Object bound to a handle read from the database.
    pub(crate) fn from_native(resolved: ResolvedType, handle: ObjectRef) -> Self {
        Self::bound(resolved.class, resolved.descriptor, handle)
    }

    fn bound(
        class: Arc<HostClass>,
        descriptor: Arc<ObjectTypeDescriptor>,
        handle: ObjectRef,
    ) -> Self {
        let binding = OnceLock::new();
        let _ = binding.set(Arc::new(DbObjectInstance { descriptor, handle }));
        Self(Arc::new(Inner {
            class,
            target: None,
            binding,
        }))
    }

    /// New object of `class` initialized from a host value: a map sets
    /// attributes by name, an array appends elements in order.
    pub fn construct(
        ctx: &SessionContext,
        class: Arc<HostClass>,
        initial: &HostValue,
    ) -> Result<Self> {
        let object = Self::new(class);
        match initial {
            HostValue::Null | HostValue::Undefined => {}
            HostValue::Map(entries) => {
                for (name, value) in entries {
                    object.set_attr(ctx, name, value)?;
                }
            }
            HostValue::Array(items) => {
                for item in items {
                    object.append(ctx, item)?;
                }
            }
            other => {
                return Err(Error::InvalidArgument {
                    position: 1,
                    reason: format!("cannot initialize an object from a {}", other.kind_name()),
                })
            }
        }
        Ok(object)
    }

    pub fn class(&self) -> &Arc<HostClass> {
        &self.0.class
    }

    pub fn is_proxy(&self) -> bool {
        self.0.target.is_some()
    }

    /// The object operations act on: the proxy target, or `self`.
    pub fn resolve(&self) -> &DbObject {
        match &self.0.target {
            Some(target) => target.resolve(),
            None => self,
        }
    }

    pub fn is_bound(&self) -> bool {
        self.resolve().0.binding.get().is_some()
    }

    /// Identity comparison, looking through proxies.
    pub fn ptr_eq(&self, other: &DbObject) -> bool {
        Arc::ptr_eq(&self.resolve().0, &other.resolve().0)
    }

    /// Descriptor of the object's type, once known.
    pub fn type_descriptor(&self) -> Option<Arc<ObjectTypeDescriptor>> {
        let target = self.resolve();
        match target.0.binding.get() {
            Some(instance) => Some(instance.descriptor.clone()),
            None => target.0.class.descriptor().cloned(),
        }
    }

    /// Bound instance, creating the native instance on first use.
    pub fn instance(&self, ctx: &SessionContext) -> Result<Arc<DbObjectInstance>> {
        if let Some(instance) = self.0.binding.get() {
            return Ok(instance.clone());
        }
        if let Some(target) = &self.0.target {
            return target.instance(ctx);
        }

        let descriptor = self
            .0
            .class
            .descriptor()
            .cloned()
            .ok_or_else(|| Error::UnresolvedType {
                type_name: self.0.class.fqn().to_string(),
            })?;
        let handle = ctx.native().create_object(descriptor.handle())?;
        log::trace!("[DbObject::instance] created {}", descriptor.fqn());
        let created = Arc::new(DbObjectInstance { descriptor, handle });
        Ok(self.0.binding.get_or_init(|| created).clone())
    }

    /// Independent object with a deep copy of the native instance.
    pub fn copy(&self, ctx: &SessionContext) -> Result<DbObject> {
        let instance = self.instance(ctx)?;
        let handle = ctx.native().copy_object(instance.handle())?;
        Ok(Self::bound(
            self.0.class.clone(),
            instance.descriptor.clone(),
            handle,
        ))
    }

    /// Descriptor of the object's type, without binding a native instance.
    fn known_descriptor(&self) -> Result<Arc<ObjectTypeDescriptor>> {
        self.type_descriptor().ok_or_else(|| Error::UnresolvedType {
            type_name: self.0.class.fqn().to_string(),
        })
    }

    fn lookup_attr<'d>(
        owner: &'d ObjectTypeDescriptor,
        name: &str,
    ) -> Result<&'d AttributeDescriptor> {
        owner
            .attribute(name)
            .ok_or_else(|| Error::UnknownAttribute {
                name: name.to_string(),
                type_name: owner.fqn().to_string(),
            })
    }

    pub fn get_attr(&self, ctx: &SessionContext, name: &str) -> Result<HostValue> {
        let descriptor = self.known_descriptor()?;
        let owner = descriptor.as_ref();
        let attr = Self::lookup_attr(owner, name)?;
        let instance = self.instance(ctx)?;
        let value = ctx.native().get_attribute_value(
            instance.handle(),
            attr.handle(),
            attr.type_info().representation(),
        )?;
        ctx.marshaller()
            .from_native(&Slot::Attribute { attr, owner }, value)
    }

    pub fn set_attr(&self, ctx: &SessionContext, name: &str, value: &HostValue) -> Result<()> {
        let descriptor = self.known_descriptor()?;
        let owner = descriptor.as_ref();
        let attr = Self::lookup_attr(owner, name)?;
        let instance = self.instance(ctx)?;
        let converted = ctx
            .marshaller()
            .to_native(&Slot::Attribute { attr, owner }, value)?;
        ctx.native().set_attribute_value(
            instance.handle(),
            attr.handle(),
            converted.representation,
            &converted.data,
        )?;
        Ok(())
    }

    /// Bound instance of a collection. Fails before any native call when
    /// the type is known not to be a collection.
    fn collection(&self, ctx: &SessionContext) -> Result<Arc<DbObjectInstance>> {
        if let Some(descriptor) = self.type_descriptor() {
            if !descriptor.is_collection() {
                return Err(Error::NotACollection {
                    type_name: descriptor.fqn().to_string(),
                });
            }
        }
        let instance = self.instance(ctx)?;
        if !instance.descriptor.is_collection() {
            return Err(Error::NotACollection {
                type_name: instance.descriptor.fqn().to_string(),
            });
        }
        Ok(instance)
    }

    fn element_slot(instance: &DbObjectInstance) -> Result<Slot<'_>> {
        let owner = instance.descriptor.as_ref();
        let element = owner.element_type().ok_or_else(|| Error::NotACollection {
            type_name: owner.fqn().to_string(),
        })?;
        Ok(Slot::Element { element, owner })
    }

    fn read_element(
        ctx: &SessionContext,
        instance: &DbObjectInstance,
        index: i32,
    ) -> Result<HostValue> {
        let slot = Self::element_slot(instance)?;
        let value = ctx.native().get_element_value(
            instance.handle(),
            index,
            slot.type_info().representation(),
        )?;
        ctx.marshaller().from_native(&slot, value)
    }

    pub fn append(&self, ctx: &SessionContext, value: &HostValue) -> Result<()> {
        let instance = self.collection(ctx)?;
        let slot = Self::element_slot(&instance)?;
        let converted = ctx.marshaller().to_native(&slot, value)?;
        ctx.native()
            .append_element(instance.handle(), converted.representation, &converted.data)?;
        Ok(())
    }

    pub fn get_element(&self, ctx: &SessionContext, index: i32) -> Result<HostValue> {
        let instance = self.collection(ctx)?;
        Self::read_element(ctx, &instance, index)
    }

    pub fn set_element(&self, ctx: &SessionContext, index: i32, value: &HostValue) -> Result<()> {
        let instance = self.collection(ctx)?;
        let slot = Self::element_slot(&instance)?;
        let converted = ctx.marshaller().to_native(&slot, value)?;
        ctx.native().set_element_value(
            instance.handle(),
            index,
            converted.representation,
            &converted.data,
        )?;
        Ok(())
    }

    pub fn delete_element(&self, ctx: &SessionContext, index: i32) -> Result<()> {
        let instance = self.collection(ctx)?;
        ctx.native().delete_element(instance.handle(), index)?;
        Ok(())
    }

    pub fn has_element(&self, ctx: &SessionContext, index: i32) -> Result<bool> {
        let instance = self.collection(ctx)?;
        Ok(ctx.native().element_exists(instance.handle(), index)?)
    }

    /// Remove `count` elements from the end.
    pub fn trim(&self, ctx: &SessionContext, count: u32) -> Result<()> {
        let instance = self.collection(ctx)?;
        ctx.native().trim(instance.handle(), count)?;
        Ok(())
    }

    /// Number of elements.
    pub fn length(&self, ctx: &SessionContext) -> Result<i32> {
        let instance = self.collection(ctx)?;
        CollectionCursor::new(ctx.native(), instance.handle()).size()
    }

    pub fn first_index(&self, ctx: &SessionContext) -> Result<Option<i32>> {
        let instance = self.collection(ctx)?;
        CollectionCursor::new(ctx.native(), instance.handle()).first()
    }

    pub fn last_index(&self, ctx: &SessionContext) -> Result<Option<i32>> {
        let instance = self.collection(ctx)?;
        CollectionCursor::new(ctx.native(), instance.handle()).last()
    }

    pub fn next_index(&self, ctx: &SessionContext, index: i32) -> Result<Option<i32>> {
        let instance = self.collection(ctx)?;
        CollectionCursor::new(ctx.native(), instance.handle()).next(index)
    }

    pub fn prev_index(&self, ctx: &SessionContext, index: i32) -> Result<Option<i32>> {
        let instance = self.collection(ctx)?;
        CollectionCursor::new(ctx.native(), instance.handle()).prev(index)
    }

    /// Indices in ascending order.
    pub fn keys(&self, ctx: &SessionContext) -> Result<Vec<i32>> {
        let instance = self.collection(ctx)?;
        CollectionCursor::new(ctx.native(), instance.handle()).keys(ctx.config().max_presize)
    }

    /// Element values in ascending index order.
    pub fn values(&self, ctx: &SessionContext) -> Result<Vec<HostValue>> {
        let instance = self.collection(ctx)?;
        CollectionCursor::new(ctx.native(), instance.handle())
            .values(ctx.config().max_presize, |index| {
                Self::read_element(ctx, &instance, index)
            })
    }

    /// Plain host form: a map of attribute values for a structured type, an
    /// array of element values for a collection. Nested objects are
    /// converted too, down to the configured depth; deeper ones are left
    /// as objects.
    pub fn to_plain(&self, ctx: &SessionContext) -> Result<HostValue> {
        self.to_plain_depth(ctx, ctx.config().plain_depth_limit)
    }

    fn to_plain_depth(&self, ctx: &SessionContext, depth: usize) -> Result<HostValue> {
        let flatten = |value: HostValue| match value {
            HostValue::Object(nested) if depth > 1 => nested.to_plain_depth(ctx, depth - 1),
            other => Ok(other),
        };

        let instance = self.instance(ctx)?;
        if instance.descriptor.is_collection() {
            let items = self
                .values(ctx)?
                .into_iter()
                .map(flatten)
                .collect::<Result<Vec<_>>>()?;
            return Ok(HostValue::Array(items));
        }

        let mut entries = BTreeMap::new();
        for attr in instance.descriptor.attributes() {
            let value = self.get_attr(ctx, attr.name())?;
            entries.insert(attr.name().to_string(), flatten(value)?);
        }
        Ok(HostValue::Map(entries))
    }
}
