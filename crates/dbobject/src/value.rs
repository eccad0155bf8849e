// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Host values.

use crate::native::{LobHandle, LobRef};
use crate::object::DbObject;
use crate::types::OracleType;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Host temporal value: milliseconds since the Unix epoch, UTC.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Timestamp(f64);

impl Timestamp {
    pub fn from_epoch_millis(millis: f64) -> Self {
        Self(millis)
    }

    pub fn epoch_millis(self) -> f64 {
        self.0
    }

    pub fn from_datetime(datetime: DateTime<Utc>) -> Self {
        let millis = datetime.timestamp() as f64 * 1000.0
            + f64::from(datetime.timestamp_subsec_nanos()) / 1_000_000.0;
        Self(millis)
    }

    /// `None` when the value is outside the range chrono represents.
    pub fn to_datetime(self) -> Option<DateTime<Utc>> {
        if !self.0.is_finite() {
            return None;
        }
        let secs = (self.0 / 1000.0).floor();
        let nanos = ((self.0 - secs * 1000.0) * 1_000_000.0).round() as u32;
        DateTime::from_timestamp(secs as i64, nanos.min(999_999_999))
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(datetime: DateTime<Utc>) -> Self {
        Self::from_datetime(datetime)
    }
}

struct LobInner {
    handle: LobRef,
    oracle_type: OracleType,
    chunk_size: u32,
    length: u64,
    auto_close: bool,
}

/// Host wrapper around a LOB locator.
///
/// Reading and writing the LOB's bytes is the business of the streaming
/// layer built on top of this handle.
#[derive(Clone)]
pub struct HostLob {
    inner: Arc<LobInner>,
}

impl HostLob {
    pub fn new(
        handle: LobRef,
        oracle_type: OracleType,
        chunk_size: u32,
        length: u64,
        auto_close: bool,
    ) -> Self {
        Self {
            inner: Arc::new(LobInner {
                handle,
                oracle_type,
                chunk_size,
                length,
                auto_close,
            }),
        }
    }

    pub fn handle(&self) -> LobHandle {
        self.inner.handle.handle()
    }

    pub fn oracle_type(&self) -> OracleType {
        self.inner.oracle_type
    }

    pub fn chunk_size(&self) -> u32 {
        self.inner.chunk_size
    }

    /// Length in characters (CLOB/NCLOB) or bytes (BLOB).
    pub fn length(&self) -> u64 {
        self.inner.length
    }

    pub fn auto_close(&self) -> bool {
        self.inner.auto_close
    }

    pub fn ptr_eq(&self, other: &HostLob) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for HostLob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostLob")
            .field("handle", &self.inner.handle)
            .field("oracle_type", &self.inner.oracle_type)
            .field("chunk_size", &self.inner.chunk_size)
            .field("length", &self.inner.length)
            .field("auto_close", &self.inner.auto_close)
            .finish()
    }
}

/// A value on the host side of the binding.
#[derive(Debug, Clone)]
pub enum HostValue {
    /// Absent value (missing argument, no such index).
    Undefined,
    Null,
    Boolean(bool),
    Number(f64),
    Integer(i64),
    Text(String),
    Date(Timestamp),
    Buffer(Vec<u8>),
    Lob(HostLob),
    Object(DbObject),
    Array(Vec<HostValue>),
    Map(BTreeMap<String, HostValue>),
    /// Host function, identified by name.
    Function(String),
    Symbol(String),
}

impl HostValue {
    /// Null or undefined.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null | Self::Undefined)
    }

    /// Short name of the value's kind, for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Undefined => "undefined",
            Self::Null => "null",
            Self::Boolean(_) => "boolean",
            Self::Number(_) | Self::Integer(_) => "number",
            Self::Text(_) => "string",
            Self::Date(_) => "date",
            Self::Buffer(_) => "buffer",
            Self::Lob(_) => "lob",
            Self::Object(_) => "object",
            Self::Array(_) => "array",
            Self::Map(_) => "map",
            Self::Function(_) => "function",
            Self::Symbol(_) => "symbol",
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(v) => Some(*v),
            _ => None,
        }
    }

    /// Numeric value as a double.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(v) => Some(*v),
            Self::Integer(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// Numeric value without a fractional part.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(v) => Some(*v),
            Self::Number(v) if v.fract() == 0.0 && v.abs() < 9.0e15 => Some(*v as i64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Buffer(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<Timestamp> {
        match self {
            Self::Date(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&DbObject> {
        match self {
            Self::Object(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_lob(&self) -> Option<&HostLob> {
        match self {
            Self::Lob(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[HostValue]> {
        match self {
            Self::Array(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, HostValue>> {
        match self {
            Self::Map(v) => Some(v),
            _ => None,
        }
    }

    /// Entry of a map value.
    pub fn get_field(&self, name: &str) -> Option<&HostValue> {
        self.as_map().and_then(|m| m.get(name))
    }
}

/// Objects and LOBs compare by identity, everything else by value.
impl PartialEq for HostValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Undefined, Self::Undefined) | (Self::Null, Self::Null) => true,
            (Self::Boolean(a), Self::Boolean(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::Integer(a), Self::Integer(b)) => a == b,
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::Date(a), Self::Date(b)) => a == b,
            (Self::Buffer(a), Self::Buffer(b)) => a == b,
            (Self::Lob(a), Self::Lob(b)) => a.ptr_eq(b),
            (Self::Object(a), Self::Object(b)) => a.ptr_eq(b),
            (Self::Array(a), Self::Array(b)) => a == b,
            (Self::Map(a), Self::Map(b)) => a == b,
            (Self::Function(a), Self::Function(b)) => a == b,
            (Self::Symbol(a), Self::Symbol(b)) => a == b,
            _ => false,
        }
    }
}

impl From<bool> for HostValue {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl From<i32> for HostValue {
    fn from(v: i32) -> Self {
        Self::Integer(i64::from(v))
    }
}

impl From<i64> for HostValue {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<f64> for HostValue {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<&str> for HostValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for HostValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<&[u8]> for HostValue {
    fn from(v: &[u8]) -> Self {
        Self::Buffer(v.to_vec())
    }
}

impl From<Timestamp> for HostValue {
    fn from(v: Timestamp) -> Self {
        Self::Date(v)
    }
}

impl From<DbObject> for HostValue {
    fn from(v: DbObject) -> Self {
        Self::Object(v)
    }
}

impl From<Vec<HostValue>> for HostValue {
    fn from(v: Vec<HostValue>) -> Self {
        Self::Array(v)
    }
}

impl From<BTreeMap<String, HostValue>> for HostValue {
    fn from(v: BTreeMap<String, HostValue>) -> Self {
        Self::Map(v)
    }
}

impl<T: Into<HostValue>> From<Option<T>> for HostValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}
