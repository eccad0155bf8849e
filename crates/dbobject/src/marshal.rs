// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Conversion between host values and native values.
//!
//! ## Reading (`from_native`)
//!
//! | native tag | host value |
//! |---|---|
//! | character types (national included) | `Text` |
//! | `RAW` | `Buffer` |
//! | `NUMBER` | `Integer` when carried as int64, else `Number` |
//! | native int / float / double | `Integer` / `Number` / `Number` |
//! | date and timestamp variants | `Date` |
//! | `CLOB` / `NCLOB` / `BLOB` | `Lob` |
//! | object | `Object` |
//! | `BOOLEAN` | `Boolean` |
//!
//! A null value is host `Null` whatever the tag.
//!
//! ## Writing (`to_native`)
//!
//! Dispatch is on the host value's kind; the slot's representation is only
//! a hint. Maps and arrays written into a slot that holds objects are
//! turned into a new instance of the nested type first.

use crate::context::SessionContext;
use crate::error::{ConversionTarget, Direction, Error, Result};
use crate::native::{LobRef, NativeData, NativeValue};
use crate::object::DbObject;
use crate::types::{
    AttributeDescriptor, DataTypeInfo, ObjectTypeDescriptor, OracleType, Representation,
};
use crate::value::{HostLob, HostValue, Timestamp};
use std::borrow::Cow;

/// Slot a value is read from or written to.
#[derive(Debug, Clone, Copy)]
pub enum Slot<'a> {
    Attribute {
        attr: &'a AttributeDescriptor,
        owner: &'a ObjectTypeDescriptor,
    },
    Element {
        element: &'a DataTypeInfo,
        owner: &'a ObjectTypeDescriptor,
    },
}

impl<'a> Slot<'a> {
    pub fn type_info(&self) -> &'a DataTypeInfo {
        match self {
            Slot::Attribute { attr, .. } => attr.type_info(),
            Slot::Element { element, .. } => element,
        }
    }

    pub fn owner(&self) -> &'a ObjectTypeDescriptor {
        match self {
            Slot::Attribute { owner, .. } | Slot::Element { owner, .. } => owner,
        }
    }

    /// Diagnostic context of the slot.
    pub fn target(&self) -> ConversionTarget {
        match self {
            Slot::Attribute { attr, owner } => ConversionTarget::Attribute {
                name: attr.name().to_string(),
                type_name: owner.fqn().to_string(),
            },
            Slot::Element { owner, .. } => ConversionTarget::Element {
                type_name: owner.fqn().to_string(),
            },
        }
    }
}

/// Native form of a host value, ready for a write call.
///
/// `data` may borrow from the host value. An object constructed on the way
/// is kept in `anchor` so its handle stays valid until the write returns.
#[derive(Debug)]
pub struct Converted<'v> {
    pub data: NativeData<'v>,
    pub representation: Representation,
    anchor: Option<DbObject>,
}

impl<'v> Converted<'v> {
    fn new(data: NativeData<'v>, representation: Representation) -> Self {
        Self {
            data,
            representation,
            anchor: None,
        }
    }

    fn anchored(data: NativeData<'v>, object: DbObject) -> Self {
        Self {
            data,
            representation: Representation::Object,
            anchor: Some(object),
        }
    }

    /// Object the written handle belongs to, if any.
    pub fn anchor(&self) -> Option<&DbObject> {
        self.anchor.as_ref()
    }
}

/// Value conversions for one session.
#[derive(Debug, Clone, Copy)]
pub struct ValueMarshaller<'c> {
    ctx: &'c SessionContext,
}

impl<'c> ValueMarshaller<'c> {
    pub fn new(ctx: &'c SessionContext) -> Self {
        Self { ctx }
    }

    /// Convert a value read from `slot` to a host value.
    pub fn from_native(&self, slot: &Slot<'_>, value: NativeValue) -> Result<HostValue> {
        if value.is_null() {
            return Ok(HostValue::Null);
        }
        let info = slot.type_info();
        let unsupported = || Error::unsupported(Direction::FromNative, slot.target());

        let host = match (info.oracle_type(), value) {
            (tag, NativeValue::Bytes(bytes)) if tag.is_character() => {
                HostValue::Text(String::from_utf8_lossy(&bytes).into_owned())
            }
            (OracleType::Raw, NativeValue::Bytes(bytes)) => HostValue::Buffer(bytes),
            (OracleType::Number | OracleType::NativeInt, NativeValue::Int64(v)) => {
                HostValue::Integer(v)
            }
            (OracleType::Number | OracleType::NativeDouble, NativeValue::Double(v)) => {
                HostValue::Number(v)
            }
            (OracleType::NativeFloat, NativeValue::Float(v)) => HostValue::Number(f64::from(v)),
            (OracleType::NativeFloat, NativeValue::Double(v)) => HostValue::Number(v),
            (tag, NativeValue::Double(v)) if tag.is_temporal() => {
                HostValue::Date(Timestamp::from_epoch_millis(v))
            }
            (tag, NativeValue::Lob(lob)) if tag.is_lob() => HostValue::Lob(self.wrap_lob(tag, lob)?),
            (OracleType::Object, NativeValue::Object(handle)) => {
                let nested = info.nested().ok_or_else(unsupported)?;
                let resolved = self.ctx.registry().resolve_nested(nested)?;
                // The read handed over one reference; the new object keeps it.
                HostValue::Object(DbObject::from_native(resolved, handle))
            }
            (OracleType::Boolean, NativeValue::Boolean(v)) => HostValue::Boolean(v),
            _ => return Err(unsupported()),
        };
        Ok(host)
    }

    /// Convert a host value for a write into `slot`.
    pub fn to_native<'v>(&self, slot: &Slot<'_>, value: &'v HostValue) -> Result<Converted<'v>> {
        let hint = slot.type_info().representation();
        let unsupported = || Error::unsupported(Direction::ToNative, slot.target());

        let converted = match value {
            HostValue::Null | HostValue::Undefined => Converted::new(NativeData::Null, hint),
            HostValue::Text(text) => Converted::new(
                NativeData::Bytes(Cow::Owned(text.as_bytes().to_vec())),
                Representation::Bytes,
            ),
            HostValue::Number(v) => Self::number(*v, hint),
            // Integers keep full 64-bit precision in slots reported as int64.
            HostValue::Integer(v) if hint == Representation::Int64 => {
                Converted::new(NativeData::Int64(*v), Representation::Int64)
            }
            HostValue::Integer(v) => Self::number(*v as f64, hint),
            HostValue::Boolean(v) => Converted::new(NativeData::Boolean(*v), Representation::Boolean),
            HostValue::Date(ts) => Self::number(ts.epoch_millis(), hint),
            HostValue::Buffer(bytes) => Converted::new(
                NativeData::Bytes(Cow::Borrowed(bytes.as_slice())),
                Representation::Bytes,
            ),
            HostValue::Object(object) => {
                let instance = object.instance(self.ctx)?;
                Converted::anchored(NativeData::Object(instance.handle()), object.clone())
            }
            HostValue::Array(_) | HostValue::Map(_) => {
                let nested = slot.type_info().nested().ok_or_else(unsupported)?;
                let resolved = self.ctx.registry().resolve_nested(nested)?;
                log::debug!(
                    "[ValueMarshaller::to_native] constructing {} from {} for {}",
                    resolved.descriptor.fqn(),
                    value.kind_name(),
                    slot.target()
                );
                let object = DbObject::construct(self.ctx, resolved.class, value)?;
                let instance = object.instance(self.ctx)?;
                Converted::anchored(NativeData::Object(instance.handle()), object)
            }
            HostValue::Lob(_) | HostValue::Function(_) | HostValue::Symbol(_) => {
                return Err(unsupported())
            }
        };
        Ok(converted)
    }

    /// Numbers travel as doubles unless the slot already uses the
    /// timestamp-as-double convention.
    fn number<'v>(value: f64, hint: Representation) -> Converted<'v> {
        let representation = match hint {
            Representation::Timestamp => Representation::Timestamp,
            _ => Representation::Double,
        };
        Converted::new(NativeData::Double(value), representation)
    }

    fn wrap_lob(&self, oracle_type: OracleType, lob: LobRef) -> Result<HostLob> {
        let native = self.ctx.native();
        let chunk_size = native.lob_chunk_size(lob.handle())?;
        let length = native.lob_size(lob.handle())?;
        Ok(HostLob::new(
            lob,
            oracle_type,
            chunk_size,
            length,
            self.ctx.config().lob_auto_close,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BindingConfig;
    use crate::error::ErrorKind;
    use crate::native::memory::MemoryNative;
    use crate::native::NativeTypeInfo;
    use std::sync::Arc;

    fn session() -> (Arc<MemoryNative>, SessionContext, Arc<ObjectTypeDescriptor>) {
        let backend = Arc::new(MemoryNative::new());
        let ty = backend.define_type("HR", "SAMPLE");
        for (name, info) in [
            ("NAME", NativeTypeInfo::scalar(OracleType::NVarchar)),
            ("DUE", NativeTypeInfo::scalar(OracleType::TimestampLtz)),
            ("SPAN", NativeTypeInfo::scalar(OracleType::IntervalDs)),
            ("COUNT", NativeTypeInfo::scalar(OracleType::NativeInt)),
        ] {
            backend.add_attribute(ty, name, info).expect("attribute");
        }
        let ctx = SessionContext::new(backend.clone(), BindingConfig::default()).expect("ctx");
        let descriptor = ctx.registry().resolve(ty).expect("resolve").descriptor;
        (backend, ctx, descriptor)
    }

    fn slot<'a>(descriptor: &'a ObjectTypeDescriptor, name: &str) -> Slot<'a> {
        Slot::Attribute {
            attr: descriptor.attribute(name).expect("attribute"),
            owner: descriptor,
        }
    }

    #[test]
    fn test_null_ignores_tag() {
        let (_backend, ctx, descriptor) = session();
        let marshaller = ctx.marshaller();
        for name in ["NAME", "DUE", "SPAN", "COUNT"] {
            let host = marshaller
                .from_native(&slot(&descriptor, name), NativeValue::Null)
                .expect("from_native");
            assert_eq!(host, HostValue::Null);

            let converted = marshaller
                .to_native(&slot(&descriptor, name), &HostValue::Undefined)
                .expect("to_native");
            assert!(converted.data.is_null());
        }
    }

    #[test]
    fn test_text_is_owned_buffer_borrowed() {
        let (_backend, ctx, descriptor) = session();
        let marshaller = ctx.marshaller();
        let text = HostValue::from("Zoë");
        let converted = marshaller
            .to_native(&slot(&descriptor, "NAME"), &text)
            .expect("text");
        assert!(matches!(converted.data, NativeData::Bytes(Cow::Owned(_))));

        let buffer = HostValue::Buffer(vec![1, 2, 3]);
        let converted = marshaller
            .to_native(&slot(&descriptor, "NAME"), &buffer)
            .expect("buffer");
        assert!(matches!(converted.data, NativeData::Bytes(Cow::Borrowed(_))));
        assert_eq!(converted.representation, Representation::Bytes);
    }

    #[test]
    fn test_date_written_as_double() {
        let (_backend, ctx, descriptor) = session();
        let value = HostValue::Date(Timestamp::from_epoch_millis(86_400_000.0));
        let converted = ctx
            .marshaller()
            .to_native(&slot(&descriptor, "DUE"), &value)
            .expect("date");
        assert_eq!(converted.data, NativeData::Double(86_400_000.0));
        assert_eq!(converted.representation, Representation::Double);
    }

    #[test]
    fn test_unsupported_tag_names_attribute() {
        let (_backend, ctx, descriptor) = session();
        let err = ctx
            .marshaller()
            .from_native(
                &slot(&descriptor, "SPAN"),
                NativeValue::Bytes(b"+01 00:00:00".to_vec()),
            )
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedConversion);
        let msg = err.to_string();
        assert!(msg.contains("\"SPAN\""), "{}", msg);
        assert!(msg.contains("\"HR.SAMPLE\""), "{}", msg);
    }

    #[test]
    fn test_function_value_rejected() {
        let (backend, ctx, descriptor) = session();
        backend.reset_calls();
        let err = ctx
            .marshaller()
            .to_native(
                &slot(&descriptor, "COUNT"),
                &HostValue::Function("callback".into()),
            )
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedConversion);
        assert!(err.to_string().contains("\"COUNT\""));
        assert_eq!(backend.total_calls(), 0);
    }

    #[test]
    fn test_map_without_nested_type_rejected() {
        let (_backend, ctx, descriptor) = session();
        let err = ctx
            .marshaller()
            .to_native(
                &slot(&descriptor, "COUNT"),
                &HostValue::Map(Default::default()),
            )
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedConversion);
    }
}
