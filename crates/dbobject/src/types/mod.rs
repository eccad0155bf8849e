// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Object type introspection.
//!
//! - [`DataTypeInfo`]: native tag, representation and nested type of one slot
//! - [`ObjectTypeDescriptor`]: attributes or element type of a named type
//! - [`HostClass`] / [`ClassCache`]: host-visible class per type
//! - [`ObjectTypeRegistry`]: resolves and caches descriptors

mod class;
mod data_type;
mod descriptor;
mod registry;

pub use class::{
    AttributeMetadata, ClassCache, ClassMetadata, ConnectionClassCache, HostClass, TypeMetadata,
};
pub use data_type::{DataTypeInfo, NestedType, OracleType, Representation};
pub use descriptor::{AttributeDescriptor, ObjectTypeDescriptor, TypeShape};
pub use registry::{ObjectTypeRegistry, ResolvedType};
