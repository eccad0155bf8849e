// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! In-process native backend.
//!
//! `MemoryNative` implements [`NativeApi`] over a table of reference-counted
//! entries. Object types and attributes are registered in a catalog that
//! holds one permanent reference to each; objects and LOB locators are
//! freed when their last reference is released.
//!
//! Values follow the engine's semantics: an object written into an
//! attribute or element is embedded by deep copy, while reading an object
//! slot returns a new reference to the embedded instance. LOB locators are
//! shared.
//!
//! Every trait call is counted per function name, and a failure can be
//! injected for the next call of any function.

use super::{
    HandleKind, IndexPosition, LobHandle, NativeApi, NativeData, NativeHandle, NativeTypeInfo,
    ObjectAttrHandle, ObjectAttrInfo, ObjectHandle, ObjectTypeHandle, ObjectTypeInfo,
};
use crate::error::{NativeError, NativeResult};
use crate::types::{OracleType, Representation};
use parking_lot::Mutex;
use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::ops::Bound;

/// Chunk size reported for every LOB locator.
pub const LOB_CHUNK_SIZE: u32 = 8132;

#[derive(Debug, Clone, PartialEq)]
enum Stored {
    Null,
    Bytes(Vec<u8>),
    Int64(i64),
    Double(f64),
    Float(f32),
    Boolean(bool),
    Object(u64),
    Lob(u64),
}

#[derive(Debug)]
struct TypeDef {
    schema: String,
    name: String,
    attributes: Vec<u64>,
    element: Option<NativeTypeInfo>,
}

#[derive(Debug)]
struct AttrDef {
    name: String,
    type_info: NativeTypeInfo,
}

#[derive(Debug, Clone)]
struct ObjectData {
    ty: u64,
    attributes: HashMap<u64, Stored>,
    elements: BTreeMap<i32, Stored>,
}

#[derive(Debug)]
struct LobData {
    oracle_type: OracleType,
    data: Vec<u8>,
}

#[derive(Debug)]
enum Body {
    Type(TypeDef),
    Attr(AttrDef),
    Object(ObjectData),
    Lob(LobData),
}

#[derive(Debug)]
struct Entry {
    kind: HandleKind,
    refs: usize,
    body: Body,
}

#[derive(Debug, Default)]
struct State {
    next_raw: u64,
    entries: HashMap<u64, Entry>,
    calls: HashMap<&'static str, usize>,
    failures: HashMap<&'static str, String>,
}

fn handle_name(kind: HandleKind) -> &'static str {
    match kind {
        HandleKind::ObjectType => "dpiObjectType",
        HandleKind::ObjectAttr => "dpiObjectAttr",
        HandleKind::Object => "dpiObject",
        HandleKind::Lob => "dpiLob",
    }
}

fn invalid_handle(function: &'static str, kind: HandleKind) -> NativeError {
    NativeError::new(
        function,
        format!("DPI-1002: invalid {} handle", handle_name(kind)),
    )
}

fn missing_element(function: &'static str, index: i32) -> NativeError {
    NativeError::new(
        function,
        format!("ORA-22160: element at index [{}] does not exist", index),
    )
}

fn not_implemented(
    function: &'static str,
    oracle_type: OracleType,
    representation: Representation,
) -> NativeError {
    NativeError::new(
        function,
        format!(
            "DPI-1014: conversion between Oracle type {} and native type {:?} is not implemented",
            oracle_type.number(),
            representation
        ),
    )
}

impl State {
    fn enter(&mut self, function: &'static str) -> NativeResult<()> {
        *self.calls.entry(function).or_insert(0) += 1;
        match self.failures.remove(function) {
            Some(message) => Err(NativeError::new(function, message)),
            None => Ok(()),
        }
    }

    fn insert(&mut self, kind: HandleKind, body: Body) -> u64 {
        self.next_raw += 1;
        let raw = self.next_raw;
        self.entries.insert(
            raw,
            Entry {
                kind,
                refs: 1,
                body,
            },
        );
        raw
    }

    fn check(&self, function: &'static str, kind: HandleKind, raw: u64) -> NativeResult<&Entry> {
        match self.entries.get(&raw) {
            Some(entry) if entry.kind == kind => Ok(entry),
            _ => Err(invalid_handle(function, kind)),
        }
    }

    fn type_def(&self, function: &'static str, raw: u64) -> NativeResult<&TypeDef> {
        match &self.check(function, HandleKind::ObjectType, raw)?.body {
            Body::Type(def) => Ok(def),
            _ => Err(invalid_handle(function, HandleKind::ObjectType)),
        }
    }

    fn type_def_mut(&mut self, function: &'static str, raw: u64) -> NativeResult<&mut TypeDef> {
        match self.entries.get_mut(&raw).map(|e| &mut e.body) {
            Some(Body::Type(def)) => Ok(def),
            _ => Err(invalid_handle(function, HandleKind::ObjectType)),
        }
    }

    fn attr_def(&self, function: &'static str, raw: u64) -> NativeResult<&AttrDef> {
        match &self.check(function, HandleKind::ObjectAttr, raw)?.body {
            Body::Attr(def) => Ok(def),
            _ => Err(invalid_handle(function, HandleKind::ObjectAttr)),
        }
    }

    fn object(&self, function: &'static str, raw: u64) -> NativeResult<&ObjectData> {
        match &self.check(function, HandleKind::Object, raw)?.body {
            Body::Object(data) => Ok(data),
            _ => Err(invalid_handle(function, HandleKind::Object)),
        }
    }

    fn object_mut(&mut self, function: &'static str, raw: u64) -> NativeResult<&mut ObjectData> {
        match self.entries.get_mut(&raw).map(|e| &mut e.body) {
            Some(Body::Object(data)) => Ok(data),
            _ => Err(invalid_handle(function, HandleKind::Object)),
        }
    }

    fn lob(&self, function: &'static str, raw: u64) -> NativeResult<&LobData> {
        match &self.check(function, HandleKind::Lob, raw)?.body {
            Body::Lob(data) => Ok(data),
            _ => Err(invalid_handle(function, HandleKind::Lob)),
        }
    }

    /// Element type of the collection `raw` is an instance of.
    fn element_type(&self, function: &'static str, raw: u64) -> NativeResult<NativeTypeInfo> {
        let ty = self.object(function, raw)?.ty;
        let def = self.type_def(function, ty)?;
        def.element.ok_or_else(|| {
            NativeError::new(
                function,
                format!("DPI-1023: object {}.{} is not a collection", def.schema, def.name),
            )
        })
    }

    /// Type of `attr` after checking that it belongs to the type of `object`.
    fn attribute_type(
        &self,
        function: &'static str,
        object: u64,
        attr: u64,
    ) -> NativeResult<NativeTypeInfo> {
        let ty = self.object(function, object)?.ty;
        let def = self.type_def(function, ty)?;
        let attr_def = self.attr_def(function, attr)?;
        if !def.attributes.contains(&attr) {
            return Err(NativeError::new(
                function,
                format!(
                    "DPI-1022: attribute {} is not part of object type {}.{}",
                    attr_def.name, def.schema, def.name
                ),
            ));
        }
        Ok(attr_def.type_info)
    }

    fn retain(&mut self, raw: u64) {
        if let Some(entry) = self.entries.get_mut(&raw) {
            entry.refs += 1;
        }
    }

    /// Release one reference and free everything that drops to zero.
    fn release(&mut self, raw: u64) {
        let mut pending = vec![raw];
        while let Some(raw) = pending.pop() {
            let Some(entry) = self.entries.get_mut(&raw) else {
                continue;
            };
            entry.refs = entry.refs.saturating_sub(1);
            if entry.refs > 0 {
                continue;
            }
            if let Some(Entry {
                body: Body::Object(data),
                ..
            }) = self.entries.remove(&raw)
            {
                pending.push(data.ty);
                for stored in data.attributes.values().chain(data.elements.values()) {
                    match stored {
                        Stored::Object(child) | Stored::Lob(child) => pending.push(*child),
                        _ => {}
                    }
                }
            }
        }
    }

    fn new_object(&mut self, ty: u64) -> u64 {
        self.retain(ty);
        self.insert(
            HandleKind::Object,
            Body::Object(ObjectData {
                ty,
                attributes: HashMap::new(),
                elements: BTreeMap::new(),
            }),
        )
    }

    /// Deep copy of an object; LOB locators are shared.
    fn deep_copy(&mut self, function: &'static str, raw: u64) -> NativeResult<u64> {
        let mut data = self.object(function, raw)?.clone();
        for stored in data.attributes.values_mut().chain(data.elements.values_mut()) {
            match stored {
                Stored::Object(child) => *child = self.deep_copy(function, *child)?,
                Stored::Lob(lob) => self.retain(*lob),
                _ => {}
            }
        }
        self.retain(data.ty);
        Ok(self.insert(HandleKind::Object, Body::Object(data)))
    }

    /// Convert written data to its stored form, checking it against the slot.
    fn store(
        &mut self,
        function: &'static str,
        slot: NativeTypeInfo,
        representation: Representation,
        data: &NativeData<'_>,
    ) -> NativeResult<Stored> {
        let tag = slot.oracle_type;
        let numeric = matches!(
            tag,
            OracleType::Number
                | OracleType::NativeInt
                | OracleType::NativeFloat
                | OracleType::NativeDouble
        );
        let stored = match data {
            NativeData::Null => Stored::Null,
            NativeData::Bytes(bytes) if tag.default_representation() == Representation::Bytes => {
                Stored::Bytes(bytes.to_vec())
            }
            NativeData::Int64(v) if numeric => Stored::Int64(*v),
            NativeData::Double(v) if numeric || tag.is_temporal() => Stored::Double(*v),
            NativeData::Float(v) if numeric => Stored::Float(*v),
            NativeData::Boolean(v) if tag == OracleType::Boolean => Stored::Boolean(*v),
            NativeData::Lob(lob) if tag.is_lob() => {
                self.lob(function, lob.raw())?;
                self.retain(lob.raw());
                Stored::Lob(lob.raw())
            }
            NativeData::Object(object) if tag == OracleType::Object => {
                let source = self.object(function, object.raw())?;
                if Some(source.ty) != slot.object_type.map(NativeHandle::raw) {
                    return Err(NativeError::new(
                        function,
                        "DPI-1056: object type does not match the expected type",
                    ));
                }
                Stored::Object(self.deep_copy(function, object.raw())?)
            }
            _ => return Err(not_implemented(function, tag, representation)),
        };
        Ok(stored)
    }

    /// Produce read data in the requested representation.
    fn load(
        &mut self,
        function: &'static str,
        slot: NativeTypeInfo,
        stored: &Stored,
        representation: Representation,
    ) -> NativeResult<NativeData<'static>> {
        use Representation as R;
        let data = match (stored, representation) {
            (Stored::Null, _) => NativeData::Null,
            (Stored::Bytes(bytes), R::Bytes) => NativeData::Bytes(Cow::Owned(bytes.clone())),
            (Stored::Int64(v), R::Int64) => NativeData::Int64(*v),
            (Stored::Int64(v), R::Double | R::Timestamp) => NativeData::Double(*v as f64),
            (Stored::Int64(v), R::Float) => NativeData::Float(*v as f32),
            (Stored::Double(v), R::Int64) => NativeData::Int64(*v as i64),
            (Stored::Double(v), R::Double | R::Timestamp) => NativeData::Double(*v),
            (Stored::Double(v), R::Float) => NativeData::Float(*v as f32),
            (Stored::Float(v), R::Int64) => NativeData::Int64(*v as i64),
            (Stored::Float(v), R::Double | R::Timestamp) => NativeData::Double(f64::from(*v)),
            (Stored::Float(v), R::Float) => NativeData::Float(*v),
            (Stored::Boolean(v), R::Boolean) => NativeData::Boolean(*v),
            (Stored::Object(raw), R::Object) => {
                self.retain(*raw);
                NativeData::Object(ObjectHandle::from_raw(*raw))
            }
            (Stored::Lob(raw), R::Lob) => {
                self.retain(*raw);
                NativeData::Lob(LobHandle::from_raw(*raw))
            }
            _ => return Err(not_implemented(function, slot.oracle_type, representation)),
        };
        Ok(data)
    }
}

/// In-process implementation of [`NativeApi`].
#[derive(Debug, Default)]
pub struct MemoryNative {
    state: Mutex<State>,
}

impl MemoryNative {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new object type. The catalog keeps the returned handle
    /// alive; callers that store it must add their own reference.
    pub fn define_type(&self, schema: &str, name: &str) -> ObjectTypeHandle {
        let mut state = self.state.lock();
        let raw = state.insert(
            HandleKind::ObjectType,
            Body::Type(TypeDef {
                schema: schema.to_string(),
                name: name.to_string(),
                attributes: Vec::new(),
                element: None,
            }),
        );
        ObjectTypeHandle::from_raw(raw)
    }

    /// Append an attribute to a structured type.
    pub fn add_attribute(
        &self,
        object_type: ObjectTypeHandle,
        name: &str,
        type_info: NativeTypeInfo,
    ) -> NativeResult<ObjectAttrHandle> {
        let mut state = self.state.lock();
        if let Some(nested) = type_info.object_type {
            state.type_def("add_attribute", nested.raw())?;
        }
        if state.type_def("add_attribute", object_type.raw())?.element.is_some() {
            return Err(NativeError::new(
                "add_attribute",
                "DPI-1023: collections have no attributes",
            ));
        }
        let raw = state.insert(
            HandleKind::ObjectAttr,
            Body::Attr(AttrDef {
                name: name.to_string(),
                type_info,
            }),
        );
        state
            .type_def_mut("add_attribute", object_type.raw())?
            .attributes
            .push(raw);
        Ok(ObjectAttrHandle::from_raw(raw))
    }

    /// Turn a type into a collection of `element`.
    pub fn set_element_type(
        &self,
        object_type: ObjectTypeHandle,
        element: NativeTypeInfo,
    ) -> NativeResult<()> {
        let mut state = self.state.lock();
        if let Some(nested) = element.object_type {
            state.type_def("set_element_type", nested.raw())?;
        }
        let def = state.type_def_mut("set_element_type", object_type.raw())?;
        if !def.attributes.is_empty() {
            return Err(NativeError::new(
                "set_element_type",
                "DPI-1023: structured types cannot be collections",
            ));
        }
        def.element = Some(element);
        Ok(())
    }

    /// New LOB locator holding `data`. The caller owns one reference.
    pub fn create_lob(&self, oracle_type: OracleType, data: &[u8]) -> LobHandle {
        let mut state = self.state.lock();
        let raw = state.insert(
            HandleKind::Lob,
            Body::Lob(LobData {
                oracle_type,
                data: data.to_vec(),
            }),
        );
        LobHandle::from_raw(raw)
    }

    /// Number of times a trait function has been called.
    pub fn calls(&self, function: &str) -> usize {
        self.state.lock().calls.get(function).copied().unwrap_or(0)
    }

    /// Total number of trait calls.
    pub fn total_calls(&self) -> usize {
        self.state.lock().calls.values().sum()
    }

    pub fn reset_calls(&self) {
        self.state.lock().calls.clear();
    }

    /// Make the next call of `function` fail with `message`.
    pub fn fail_next(&self, function: &'static str, message: impl Into<String>) {
        self.state.lock().failures.insert(function, message.into());
    }

    /// Current reference count of a handle; 0 once it has been freed.
    pub fn ref_count(&self, raw: u64) -> usize {
        self.state.lock().entries.get(&raw).map_or(0, |e| e.refs)
    }

    /// Number of object instances not yet freed, embedded ones included.
    pub fn live_objects(&self) -> usize {
        self.live(HandleKind::Object)
    }

    /// Number of LOB locators not yet freed.
    pub fn live_lobs(&self) -> usize {
        self.live(HandleKind::Lob)
    }

    fn live(&self, kind: HandleKind) -> usize {
        self.state
            .lock()
            .entries
            .values()
            .filter(|e| e.kind == kind)
            .count()
    }
}

impl NativeApi for MemoryNative {
    fn add_ref(&self, kind: HandleKind, raw: u64) -> NativeResult<()> {
        let mut state = self.state.lock();
        state.enter("add_ref")?;
        state.check("add_ref", kind, raw)?;
        state.retain(raw);
        Ok(())
    }

    fn release(&self, kind: HandleKind, raw: u64) {
        let mut state = self.state.lock();
        *state.calls.entry("release").or_insert(0) += 1;
        if state.check("release", kind, raw).is_err() {
            log::trace!("[MemoryNative::release] stale {:?} handle {}", kind, raw);
            return;
        }
        state.release(raw);
    }

    fn object_type_info(&self, object_type: ObjectTypeHandle) -> NativeResult<ObjectTypeInfo> {
        let mut state = self.state.lock();
        state.enter("object_type_info")?;
        let def = state.type_def("object_type_info", object_type.raw())?;
        Ok(ObjectTypeInfo {
            schema: def.schema.as_bytes().to_vec(),
            name: def.name.as_bytes().to_vec(),
            is_collection: def.element.is_some(),
            num_attributes: def.attributes.len() as u16,
            element_type: def.element,
        })
    }

    fn object_type_attributes(
        &self,
        object_type: ObjectTypeHandle,
        count: u16,
    ) -> NativeResult<Vec<ObjectAttrHandle>> {
        let mut state = self.state.lock();
        state.enter("object_type_attributes")?;
        let attributes = state
            .type_def("object_type_attributes", object_type.raw())?
            .attributes
            .clone();
        if usize::from(count) < attributes.len() {
            return Err(NativeError::new(
                "object_type_attributes",
                format!("DPI-1018: array size of {} is too small", count),
            ));
        }
        for raw in &attributes {
            state.retain(*raw);
        }
        Ok(attributes
            .into_iter()
            .map(ObjectAttrHandle::from_raw)
            .collect())
    }

    fn object_attr_info(&self, attr: ObjectAttrHandle) -> NativeResult<ObjectAttrInfo> {
        let mut state = self.state.lock();
        state.enter("object_attr_info")?;
        let def = state.attr_def("object_attr_info", attr.raw())?;
        Ok(ObjectAttrInfo {
            name: def.name.as_bytes().to_vec(),
            type_info: def.type_info,
        })
    }

    fn create_object(&self, object_type: ObjectTypeHandle) -> NativeResult<ObjectHandle> {
        let mut state = self.state.lock();
        state.enter("create_object")?;
        state.type_def("create_object", object_type.raw())?;
        Ok(ObjectHandle::from_raw(state.new_object(object_type.raw())))
    }

    fn copy_object(&self, object: ObjectHandle) -> NativeResult<ObjectHandle> {
        let mut state = self.state.lock();
        state.enter("copy_object")?;
        let raw = state.deep_copy("copy_object", object.raw())?;
        Ok(ObjectHandle::from_raw(raw))
    }

    fn get_attribute_value(
        &self,
        object: ObjectHandle,
        attr: ObjectAttrHandle,
        representation: Representation,
    ) -> NativeResult<NativeData<'static>> {
        const F: &str = "get_attribute_value";
        let mut state = self.state.lock();
        state.enter(F)?;
        let slot = state.attribute_type(F, object.raw(), attr.raw())?;
        let stored = state
            .object(F, object.raw())?
            .attributes
            .get(&attr.raw())
            .cloned()
            .unwrap_or(Stored::Null);
        state.load(F, slot, &stored, representation)
    }

    fn set_attribute_value(
        &self,
        object: ObjectHandle,
        attr: ObjectAttrHandle,
        representation: Representation,
        data: &NativeData<'_>,
    ) -> NativeResult<()> {
        const F: &str = "set_attribute_value";
        let mut state = self.state.lock();
        state.enter(F)?;
        let slot = state.attribute_type(F, object.raw(), attr.raw())?;
        let stored = state.store(F, slot, representation, data)?;
        let previous = state
            .object_mut(F, object.raw())?
            .attributes
            .insert(attr.raw(), stored);
        if let Some(Stored::Object(raw) | Stored::Lob(raw)) = previous {
            state.release(raw);
        }
        Ok(())
    }

    fn append_element(
        &self,
        object: ObjectHandle,
        representation: Representation,
        data: &NativeData<'_>,
    ) -> NativeResult<()> {
        const F: &str = "append_element";
        let mut state = self.state.lock();
        state.enter(F)?;
        let slot = state.element_type(F, object.raw())?;
        let index = match state.object(F, object.raw())?.elements.keys().next_back() {
            Some(last) => last.checked_add(1).ok_or_else(|| {
                NativeError::new(F, "ORA-22165: given index is out of range")
            })?,
            None => 0,
        };
        let stored = state.store(F, slot, representation, data)?;
        state
            .object_mut(F, object.raw())?
            .elements
            .insert(index, stored);
        Ok(())
    }

    fn delete_element(&self, object: ObjectHandle, index: i32) -> NativeResult<()> {
        const F: &str = "delete_element";
        let mut state = self.state.lock();
        state.enter(F)?;
        state.element_type(F, object.raw())?;
        let removed = state.object_mut(F, object.raw())?.elements.remove(&index);
        match removed {
            Some(Stored::Object(raw) | Stored::Lob(raw)) => {
                state.release(raw);
                Ok(())
            }
            Some(_) => Ok(()),
            None => Err(missing_element(F, index)),
        }
    }

    fn get_element_value(
        &self,
        object: ObjectHandle,
        index: i32,
        representation: Representation,
    ) -> NativeResult<NativeData<'static>> {
        const F: &str = "get_element_value";
        let mut state = self.state.lock();
        state.enter(F)?;
        let slot = state.element_type(F, object.raw())?;
        let stored = state
            .object(F, object.raw())?
            .elements
            .get(&index)
            .cloned()
            .ok_or_else(|| missing_element(F, index))?;
        state.load(F, slot, &stored, representation)
    }

    fn set_element_value(
        &self,
        object: ObjectHandle,
        index: i32,
        representation: Representation,
        data: &NativeData<'_>,
    ) -> NativeResult<()> {
        const F: &str = "set_element_value";
        let mut state = self.state.lock();
        state.enter(F)?;
        let slot = state.element_type(F, object.raw())?;
        let stored = state.store(F, slot, representation, data)?;
        let previous = state
            .object_mut(F, object.raw())?
            .elements
            .insert(index, stored);
        if let Some(Stored::Object(raw) | Stored::Lob(raw)) = previous {
            state.release(raw);
        }
        Ok(())
    }

    fn element_exists(&self, object: ObjectHandle, index: i32) -> NativeResult<bool> {
        const F: &str = "element_exists";
        let mut state = self.state.lock();
        state.enter(F)?;
        state.element_type(F, object.raw())?;
        Ok(state.object(F, object.raw())?.elements.contains_key(&index))
    }

    fn size(&self, object: ObjectHandle) -> NativeResult<i32> {
        const F: &str = "size";
        let mut state = self.state.lock();
        state.enter(F)?;
        state.element_type(F, object.raw())?;
        Ok(state.object(F, object.raw())?.elements.len() as i32)
    }

    fn first_index(&self, object: ObjectHandle) -> NativeResult<IndexPosition> {
        const F: &str = "first_index";
        let mut state = self.state.lock();
        state.enter(F)?;
        state.element_type(F, object.raw())?;
        let elements = &state.object(F, object.raw())?.elements;
        Ok(elements
            .keys()
            .next()
            .map_or(IndexPosition::NONE, |i| IndexPosition::found(*i)))
    }

    fn last_index(&self, object: ObjectHandle) -> NativeResult<IndexPosition> {
        const F: &str = "last_index";
        let mut state = self.state.lock();
        state.enter(F)?;
        state.element_type(F, object.raw())?;
        let elements = &state.object(F, object.raw())?.elements;
        Ok(elements
            .keys()
            .next_back()
            .map_or(IndexPosition::NONE, |i| IndexPosition::found(*i)))
    }

    fn next_index(&self, object: ObjectHandle, index: i32) -> NativeResult<IndexPosition> {
        const F: &str = "next_index";
        let mut state = self.state.lock();
        state.enter(F)?;
        state.element_type(F, object.raw())?;
        let elements = &state.object(F, object.raw())?.elements;
        Ok(elements
            .range((Bound::Excluded(index), Bound::Unbounded))
            .next()
            .map_or(IndexPosition::NONE, |(i, _)| IndexPosition::found(*i)))
    }

    fn prev_index(&self, object: ObjectHandle, index: i32) -> NativeResult<IndexPosition> {
        const F: &str = "prev_index";
        let mut state = self.state.lock();
        state.enter(F)?;
        state.element_type(F, object.raw())?;
        let elements = &state.object(F, object.raw())?.elements;
        Ok(elements
            .range(..index)
            .next_back()
            .map_or(IndexPosition::NONE, |(i, _)| IndexPosition::found(*i)))
    }

    fn trim(&self, object: ObjectHandle, count: u32) -> NativeResult<()> {
        const F: &str = "trim";
        let mut state = self.state.lock();
        state.enter(F)?;
        state.element_type(F, object.raw())?;
        let elements = &mut state.object_mut(F, object.raw())?.elements;
        if count as usize > elements.len() {
            return Err(NativeError::new(
                F,
                format!(
                    "ORA-22167: given trim size [{}] must be less than or equal to [{}]",
                    count,
                    elements.len()
                ),
            ));
        }
        let mut freed = Vec::new();
        for _ in 0..count {
            if let Some((_, Stored::Object(raw) | Stored::Lob(raw))) = elements.pop_last() {
                freed.push(raw);
            }
        }
        for raw in freed {
            state.release(raw);
        }
        Ok(())
    }

    fn lob_chunk_size(&self, lob: LobHandle) -> NativeResult<u32> {
        let mut state = self.state.lock();
        state.enter("lob_chunk_size")?;
        state.lob("lob_chunk_size", lob.raw())?;
        Ok(LOB_CHUNK_SIZE)
    }

    fn lob_size(&self, lob: LobHandle) -> NativeResult<u64> {
        let mut state = self.state.lock();
        state.enter("lob_size")?;
        let lob = state.lob("lob_size", lob.raw())?;
        let size = match lob.oracle_type {
            OracleType::Clob | OracleType::NClob => {
                String::from_utf8_lossy(&lob.data).chars().count()
            }
            _ => lob.data.len(),
        };
        Ok(size as u64)
    }
}
