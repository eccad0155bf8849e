// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Boundary with the native client library.
//!
//! The native library is reached only through the [`NativeApi`] trait. Every
//! handle it hands out is reference counted; the crate never stores a raw
//! handle beyond the call that produced it. It wraps it in an [`Owned`]
//! guard that releases exactly one reference on drop.
//!
//! # Reference contract
//!
//! - Handles returned by `create_object`, `copy_object` and
//!   `object_type_attributes` carry one reference owned by the caller.
//! - `Object` and `Lob` handles inside a [`NativeData`] returned by a read
//!   call carry one reference owned by the caller.
//! - Handles inside a [`NativeData`] passed to a write call are borrowed;
//!   the native side adds its own reference if it keeps them.
//! - `NativeTypeInfo::object_type` is borrowed from the attribute or type
//!   it was read from.

mod handle;
#[cfg(any(test, feature = "memory-backend"))]
pub mod memory;

pub use handle::{LobRef, ObjectAttrRef, ObjectRef, ObjectTypeRef, Owned};

use crate::error::NativeResult;
use crate::types::{OracleType, Representation};
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// Kinds of reference-counted native handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleKind {
    ObjectType,
    ObjectAttr,
    Object,
    Lob,
}

/// Typed identifier of a native handle.
pub trait NativeHandle: Copy + Eq + fmt::Debug + Send + Sync + 'static {
    const KIND: HandleKind;

    fn from_raw(raw: u64) -> Self;

    fn raw(self) -> u64;
}

macro_rules! native_handle {
    ($(#[$meta:meta])* $name:ident => $kind:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name(u64);

        impl NativeHandle for $name {
            const KIND: HandleKind = HandleKind::$kind;

            fn from_raw(raw: u64) -> Self {
                Self(raw)
            }

            fn raw(self) -> u64 {
                self.0
            }
        }
    };
}

native_handle!(
    /// Native object type (structured or collection).
    ObjectTypeHandle => ObjectType
);
native_handle!(
    /// Native attribute of a structured type.
    ObjectAttrHandle => ObjectAttr
);
native_handle!(
    /// Native object or collection instance.
    ObjectHandle => Object
);
native_handle!(
    /// Native large-object locator.
    LobHandle => Lob
);

/// Answer of a collection index query.
///
/// Indices are neither dense nor zero-based; `exists == false` is a valid
/// outcome meaning "no such index".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexPosition {
    pub index: i32,
    pub exists: bool,
}

impl IndexPosition {
    /// No index in the requested direction.
    pub const NONE: IndexPosition = IndexPosition {
        index: 0,
        exists: false,
    };

    pub fn found(index: i32) -> Self {
        Self {
            index,
            exists: true,
        }
    }

    /// The index, if it exists.
    pub fn get(self) -> Option<i32> {
        self.exists.then_some(self.index)
    }
}

/// Type information of an attribute or collection element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NativeTypeInfo {
    pub oracle_type: OracleType,
    pub default_representation: Representation,
    /// Nested object type (borrowed) when `oracle_type` is `Object`.
    pub object_type: Option<ObjectTypeHandle>,
}

impl NativeTypeInfo {
    /// Scalar slot using the engine's default representation for its tag.
    pub fn scalar(oracle_type: OracleType) -> Self {
        Self {
            oracle_type,
            default_representation: oracle_type.default_representation(),
            object_type: None,
        }
    }

    /// Scalar slot with an explicit default representation.
    pub fn with_representation(oracle_type: OracleType, representation: Representation) -> Self {
        Self {
            oracle_type,
            default_representation: representation,
            object_type: None,
        }
    }

    /// Slot holding instances of a nested object type.
    pub fn object(object_type: ObjectTypeHandle) -> Self {
        Self {
            oracle_type: OracleType::Object,
            default_representation: Representation::Object,
            object_type: Some(object_type),
        }
    }
}

/// Description of an object type. Names are byte-length bounded and not
/// null-terminated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectTypeInfo {
    pub schema: Vec<u8>,
    pub name: Vec<u8>,
    pub is_collection: bool,
    pub num_attributes: u16,
    /// Element type, present for collections only.
    pub element_type: Option<NativeTypeInfo>,
}

/// Description of one attribute of a structured type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectAttrInfo {
    pub name: Vec<u8>,
    pub type_info: NativeTypeInfo,
}

/// Value carrier exchanged with native read and write calls.
#[derive(Debug, Clone, PartialEq)]
pub enum NativeData<'a> {
    Null,
    Bytes(Cow<'a, [u8]>),
    Int64(i64),
    Double(f64),
    Float(f32),
    Boolean(bool),
    Object(ObjectHandle),
    Lob(LobHandle),
}

impl NativeData<'_> {
    pub fn is_null(&self) -> bool {
        matches!(self, NativeData::Null)
    }
}

/// Value produced by a native read, with every handle it carries owned.
#[derive(Debug)]
pub enum NativeValue {
    Null,
    Bytes(Vec<u8>),
    Int64(i64),
    Double(f64),
    Float(f32),
    Boolean(bool),
    Object(ObjectRef),
    Lob(LobRef),
}

impl NativeValue {
    pub fn is_null(&self) -> bool {
        matches!(self, NativeValue::Null)
    }
}

/// Entry points of the native client library used by the object binding.
///
/// Implementations must be callable from any thread. No call suspends.
pub trait NativeApi: Send + Sync {
    /// Add one reference to a handle.
    fn add_ref(&self, kind: HandleKind, raw: u64) -> NativeResult<()>;

    /// Release one reference to a handle.
    fn release(&self, kind: HandleKind, raw: u64);

    fn object_type_info(&self, object_type: ObjectTypeHandle) -> NativeResult<ObjectTypeInfo>;

    /// Attribute handles in declaration order, one owned reference each.
    fn object_type_attributes(
        &self,
        object_type: ObjectTypeHandle,
        count: u16,
    ) -> NativeResult<Vec<ObjectAttrHandle>>;

    fn object_attr_info(&self, attr: ObjectAttrHandle) -> NativeResult<ObjectAttrInfo>;

    /// New, empty instance of the type (one owned reference).
    fn create_object(&self, object_type: ObjectTypeHandle) -> NativeResult<ObjectHandle>;

    /// Deep copy of an instance (one owned reference).
    fn copy_object(&self, object: ObjectHandle) -> NativeResult<ObjectHandle>;

    fn get_attribute_value(
        &self,
        object: ObjectHandle,
        attr: ObjectAttrHandle,
        representation: Representation,
    ) -> NativeResult<NativeData<'static>>;

    fn set_attribute_value(
        &self,
        object: ObjectHandle,
        attr: ObjectAttrHandle,
        representation: Representation,
        data: &NativeData<'_>,
    ) -> NativeResult<()>;

    fn append_element(
        &self,
        object: ObjectHandle,
        representation: Representation,
        data: &NativeData<'_>,
    ) -> NativeResult<()>;

    fn delete_element(&self, object: ObjectHandle, index: i32) -> NativeResult<()>;

    fn get_element_value(
        &self,
        object: ObjectHandle,
        index: i32,
        representation: Representation,
    ) -> NativeResult<NativeData<'static>>;

    fn set_element_value(
        &self,
        object: ObjectHandle,
        index: i32,
        representation: Representation,
        data: &NativeData<'_>,
    ) -> NativeResult<()>;

    fn element_exists(&self, object: ObjectHandle, index: i32) -> NativeResult<bool>;

    fn size(&self, object: ObjectHandle) -> NativeResult<i32>;

    fn first_index(&self, object: ObjectHandle) -> NativeResult<IndexPosition>;

    fn last_index(&self, object: ObjectHandle) -> NativeResult<IndexPosition>;

    fn next_index(&self, object: ObjectHandle, index: i32) -> NativeResult<IndexPosition>;

    fn prev_index(&self, object: ObjectHandle, index: i32) -> NativeResult<IndexPosition>;

    /// Remove `count` elements from the end of a collection.
    fn trim(&self, object: ObjectHandle, count: u32) -> NativeResult<()>;

    fn lob_chunk_size(&self, lob: LobHandle) -> NativeResult<u32>;

    fn lob_size(&self, lob: LobHandle) -> NativeResult<u64>;
}

/// Shared, cloneable access to a [`NativeApi`] that wraps returned handles
/// in [`Owned`] guards.
#[derive(Clone)]
pub struct Native {
    api: Arc<dyn NativeApi>,
}

impl fmt::Debug for Native {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Native").finish_non_exhaustive()
    }
}

impl Native {
    pub fn new(api: Arc<dyn NativeApi>) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &dyn NativeApi {
        self.api.as_ref()
    }

    /// Take ownership of a reference the caller already holds.
    pub fn adopt<H: NativeHandle>(&self, handle: H) -> Owned<H> {
        Owned::adopt(self.clone(), handle)
    }

    /// Add a reference to a borrowed handle and own it.
    pub fn add_ref<H: NativeHandle>(&self, handle: H) -> NativeResult<Owned<H>> {
        self.api.add_ref(H::KIND, handle.raw())?;
        Ok(self.adopt(handle))
    }

    pub(crate) fn release_raw(&self, kind: HandleKind, raw: u64) {
        self.api.release(kind, raw);
    }

    /// Wrap the handles of a read result.
    pub fn adopt_value(&self, data: NativeData<'static>) -> NativeValue {
        match data {
            NativeData::Null => NativeValue::Null,
            NativeData::Bytes(bytes) => NativeValue::Bytes(bytes.into_owned()),
            NativeData::Int64(v) => NativeValue::Int64(v),
            NativeData::Double(v) => NativeValue::Double(v),
            NativeData::Float(v) => NativeValue::Float(v),
            NativeData::Boolean(v) => NativeValue::Boolean(v),
            NativeData::Object(handle) => NativeValue::Object(self.adopt(handle)),
            NativeData::Lob(handle) => NativeValue::Lob(self.adopt(handle)),
        }
    }

    pub fn object_type_info(&self, object_type: ObjectTypeHandle) -> NativeResult<ObjectTypeInfo> {
        self.api.object_type_info(object_type)
    }

    pub fn object_type_attributes(
        &self,
        object_type: ObjectTypeHandle,
        count: u16,
    ) -> NativeResult<Vec<ObjectAttrRef>> {
        let handles = self.api.object_type_attributes(object_type, count)?;
        Ok(handles.into_iter().map(|h| self.adopt(h)).collect())
    }

    pub fn object_attr_info(&self, attr: ObjectAttrHandle) -> NativeResult<ObjectAttrInfo> {
        self.api.object_attr_info(attr)
    }

    pub fn create_object(&self, object_type: ObjectTypeHandle) -> NativeResult<ObjectRef> {
        let handle = self.api.create_object(object_type)?;
        Ok(self.adopt(handle))
    }

    pub fn copy_object(&self, object: ObjectHandle) -> NativeResult<ObjectRef> {
        let handle = self.api.copy_object(object)?;
        Ok(self.adopt(handle))
    }

    pub fn get_attribute_value(
        &self,
        object: ObjectHandle,
        attr: ObjectAttrHandle,
        representation: Representation,
    ) -> NativeResult<NativeValue> {
        let data = self.api.get_attribute_value(object, attr, representation)?;
        Ok(self.adopt_value(data))
    }

    pub fn set_attribute_value(
        &self,
        object: ObjectHandle,
        attr: ObjectAttrHandle,
        representation: Representation,
        data: &NativeData<'_>,
    ) -> NativeResult<()> {
        self.api.set_attribute_value(object, attr, representation, data)
    }

    pub fn append_element(
        &self,
        object: ObjectHandle,
        representation: Representation,
        data: &NativeData<'_>,
    ) -> NativeResult<()> {
        self.api.append_element(object, representation, data)
    }

    pub fn delete_element(&self, object: ObjectHandle, index: i32) -> NativeResult<()> {
        self.api.delete_element(object, index)
    }

    pub fn get_element_value(
        &self,
        object: ObjectHandle,
        index: i32,
        representation: Representation,
    ) -> NativeResult<NativeValue> {
        let data = self.api.get_element_value(object, index, representation)?;
        Ok(self.adopt_value(data))
    }

    pub fn set_element_value(
        &self,
        object: ObjectHandle,
        index: i32,
        representation: Representation,
        data: &NativeData<'_>,
    ) -> NativeResult<()> {
        self.api.set_element_value(object, index, representation, data)
    }

    pub fn element_exists(&self, object: ObjectHandle, index: i32) -> NativeResult<bool> {
        self.api.element_exists(object, index)
    }

    pub fn size(&self, object: ObjectHandle) -> NativeResult<i32> {
        self.api.size(object)
    }

    pub fn first_index(&self, object: ObjectHandle) -> NativeResult<IndexPosition> {
        self.api.first_index(object)
    }

    pub fn last_index(&self, object: ObjectHandle) -> NativeResult<IndexPosition> {
        self.api.last_index(object)
    }

    pub fn next_index(&self, object: ObjectHandle, index: i32) -> NativeResult<IndexPosition> {
        self.api.next_index(object, index)
    }

    pub fn prev_index(&self, object: ObjectHandle, index: i32) -> NativeResult<IndexPosition> {
        self.api.prev_index(object, index)
    }

    pub fn trim(&self, object: ObjectHandle, count: u32) -> NativeResult<()> {
        self.api.trim(object, count)
    }

    pub fn lob_chunk_size(&self, lob: LobHandle) -> NativeResult<u32> {
        self.api.lob_chunk_size(lob)
    }

    pub fn lob_size(&self, lob: LobHandle) -> NativeResult<u64> {
        self.api.lob_size(lob)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_position() {
        assert_eq!(IndexPosition::found(9).get(), Some(9));
        assert_eq!(IndexPosition::NONE.get(), None);
        assert_eq!(
            IndexPosition {
                index: 3,
                exists: false
            }
            .get(),
            None
        );
    }

    #[test]
    fn test_handle_kinds() {
        assert_eq!(ObjectTypeHandle::KIND, HandleKind::ObjectType);
        assert_eq!(ObjectAttrHandle::KIND, HandleKind::ObjectAttr);
        assert_eq!(ObjectHandle::KIND, HandleKind::Object);
        assert_eq!(LobHandle::KIND, HandleKind::Lob);
        assert_eq!(ObjectHandle::from_raw(42).raw(), 42);
    }

    #[test]
    fn test_scalar_type_info_uses_default_representation() {
        let info = NativeTypeInfo::scalar(OracleType::NativeInt);
        assert_eq!(info.default_representation, Representation::Int64);
        assert!(info.object_type.is_none());

        let nested = NativeTypeInfo::object(ObjectTypeHandle::from_raw(7));
        assert_eq!(nested.oracle_type, OracleType::Object);
        assert_eq!(nested.object_type, Some(ObjectTypeHandle::from_raw(7)));
    }
}
