// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Object type descriptors.

use crate::native::{ObjectAttrHandle, ObjectAttrRef, ObjectTypeHandle, ObjectTypeRef};
use crate::types::DataTypeInfo;

/// One attribute of a structured type.
#[derive(Debug)]
pub struct AttributeDescriptor {
    name: String,
    type_info: DataTypeInfo,
    handle: ObjectAttrRef,
}

impl AttributeDescriptor {
    pub(crate) fn new(name: String, type_info: DataTypeInfo, handle: ObjectAttrRef) -> Self {
        Self {
            name,
            type_info,
            handle,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_info(&self) -> &DataTypeInfo {
        &self.type_info
    }

    pub fn handle(&self) -> ObjectAttrHandle {
        self.handle.handle()
    }
}

/// Structured type or collection.
#[derive(Debug)]
pub enum TypeShape {
    /// Attributes in native declaration order.
    Structure(Vec<AttributeDescriptor>),
    /// Element type of a collection.
    Collection(DataTypeInfo),
}

/// Immutable description of a named object type.
///
/// Holds one reference to the native type and one per attribute; all are
/// released when the descriptor is dropped.
#[derive(Debug)]
pub struct ObjectTypeDescriptor {
    schema: String,
    name: String,
    fqn: String,
    shape: TypeShape,
    handle: ObjectTypeRef,
}

impl ObjectTypeDescriptor {
    pub(crate) fn new(schema: String, name: String, shape: TypeShape, handle: ObjectTypeRef) -> Self {
        let fqn = format!("{}.{}", schema, name);
        Self {
            schema,
            name,
            fqn,
            shape,
            handle,
        }
    }

    pub fn schema(&self) -> &str {
        &self.schema
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `schema.name`, used verbatim in diagnostics.
    pub fn fqn(&self) -> &str {
        &self.fqn
    }

    pub fn shape(&self) -> &TypeShape {
        &self.shape
    }

    pub fn is_collection(&self) -> bool {
        matches!(self.shape, TypeShape::Collection(_))
    }

    /// Attributes in declaration order (empty for collections).
    pub fn attributes(&self) -> &[AttributeDescriptor] {
        match &self.shape {
            TypeShape::Structure(attributes) => attributes,
            TypeShape::Collection(_) => &[],
        }
    }

    /// Attribute by name.
    pub fn attribute(&self, name: &str) -> Option<&AttributeDescriptor> {
        self.attributes().iter().find(|a| a.name == name)
    }

    /// Element type if this is a collection.
    pub fn element_type(&self) -> Option<&DataTypeInfo> {
        match &self.shape {
            TypeShape::Collection(element) => Some(element),
            TypeShape::Structure(_) => None,
        }
    }

    pub fn handle(&self) -> ObjectTypeHandle {
        self.handle.handle()
    }
}
