// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Database Object Binding
//!
//! Value marshalling and type introspection for user-defined database object
//! types: structured types, nested objects and sparse collections.
//!
//! # Features
//!
//! - **Type Introspection**: Discover attributes or element types once per
//!   type and cache the descriptor per connection
//! - **Value Marshalling**: Convert between host values and native values,
//!   nulls, temporal values, buffers, LOBs and nested objects included
//! - **Sparse Collections**: Enumerate associative collections by
//!   first/next index without assuming contiguous indices
//! - **Reference Counting**: Every native handle is owned by a guard that
//!   releases it exactly once
//!
//! # Quick Start
//!
//! The in-process backend used below needs the `memory-backend` feature.
//!
//! ```
//! use dbobject::native::memory::MemoryNative;
//! use dbobject::native::NativeTypeInfo;
//! use dbobject::{BindingConfig, DbObject, HostValue, OracleType, SessionContext};
//! use std::sync::Arc;
//!
//! let backend = Arc::new(MemoryNative::new());
//! let ty = backend.define_type("HR", "ORDER_LINE");
//! backend
//!     .add_attribute(ty, "AMOUNT", NativeTypeInfo::scalar(OracleType::NativeDouble))
//!     .unwrap();
//!
//! let ctx = SessionContext::new(backend, BindingConfig::default()).unwrap();
//! let line = DbObject::new(ctx.object_class(ty).unwrap());
//! line.set_attr(&ctx, "AMOUNT", &HostValue::Number(12.5)).unwrap();
//! assert_eq!(line.get_attr(&ctx, "AMOUNT").unwrap(), HostValue::Number(12.5));
//! ```
//!
//! # Configuration File
//!
//! ```toml
//! lob_auto_close = true
//! plain_depth_limit = 64
//! max_presize = 65536
//! ```

pub mod config;
pub mod context;
pub mod error;
pub mod marshal;
pub mod native;
pub mod object;
pub mod types;
pub mod value;

pub use config::{BindingConfig, ConfigError};
pub use context::SessionContext;
pub use error::{ConversionTarget, Direction, Error, ErrorKind, NativeError, Result};
pub use marshal::{Converted, Slot, ValueMarshaller};
pub use native::{Native, NativeApi, NativeData, NativeValue};
pub use object::{CollectionCursor, DbObject, DbObjectInstance, ObjectMethod};
pub use types::{
    AttributeDescriptor, ClassCache, ClassMetadata, ConnectionClassCache, DataTypeInfo, HostClass,
    ObjectTypeDescriptor, ObjectTypeRegistry, OracleType, Representation, ResolvedType,
};
pub use value::{HostLob, HostValue, Timestamp};
