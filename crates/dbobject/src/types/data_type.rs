// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Native type tags and per-slot type information.

use crate::native::{ObjectTypeHandle, ObjectTypeRef};

/// Logical type of a slot as reported by the engine.
///
/// Discriminants are the numeric tags exposed to host code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum OracleType {
    Varchar = 2001,
    NVarchar = 2002,
    Char = 2003,
    NChar = 2004,
    Rowid = 2005,
    Raw = 2006,
    NativeFloat = 2007,
    NativeDouble = 2008,
    NativeInt = 2009,
    Number = 2010,
    Date = 2011,
    Timestamp = 2012,
    TimestampTz = 2013,
    TimestampLtz = 2014,
    IntervalDs = 2015,
    IntervalYm = 2016,
    Clob = 2017,
    NClob = 2018,
    Blob = 2019,
    Bfile = 2020,
    Stmt = 2021,
    Boolean = 2022,
    Object = 2023,
    LongVarchar = 2024,
    LongRaw = 2025,
    Json = 2027,
}

impl OracleType {
    /// Every tag.
    pub const ALL: [OracleType; 26] = [
        OracleType::Varchar,
        OracleType::NVarchar,
        OracleType::Char,
        OracleType::NChar,
        OracleType::Rowid,
        OracleType::Raw,
        OracleType::NativeFloat,
        OracleType::NativeDouble,
        OracleType::NativeInt,
        OracleType::Number,
        OracleType::Date,
        OracleType::Timestamp,
        OracleType::TimestampTz,
        OracleType::TimestampLtz,
        OracleType::IntervalDs,
        OracleType::IntervalYm,
        OracleType::Clob,
        OracleType::NClob,
        OracleType::Blob,
        OracleType::Bfile,
        OracleType::Stmt,
        OracleType::Boolean,
        OracleType::Object,
        OracleType::LongVarchar,
        OracleType::LongRaw,
        OracleType::Json,
    ];

    /// Numeric tag exposed to host code.
    pub fn number(self) -> u32 {
        self as u32
    }

    /// Tag for a numeric value exposed to host code.
    pub fn from_number(number: u32) -> Option<Self> {
        OracleType::ALL.iter().copied().find(|t| t.number() == number)
    }

    /// Database type name shown in class metadata.
    // @audit-ok: Simple pattern matching - type name dispatch table
    pub fn display_name(self) -> &'static str {
        match self {
            OracleType::Varchar => "VARCHAR2",
            OracleType::NVarchar => "NVARCHAR2",
            OracleType::Char => "CHAR",
            OracleType::NChar => "NCHAR",
            OracleType::Rowid => "ROWID",
            OracleType::Raw => "RAW",
            OracleType::NativeFloat => "BINARY_FLOAT",
            OracleType::NativeDouble => "BINARY_DOUBLE",
            OracleType::NativeInt => "BINARY_INTEGER",
            OracleType::Number => "NUMBER",
            OracleType::Date => "DATE",
            OracleType::Timestamp => "TIMESTAMP",
            OracleType::TimestampTz => "TIMESTAMP WITH TIME ZONE",
            OracleType::TimestampLtz => "TIMESTAMP WITH LOCAL TIME ZONE",
            OracleType::IntervalDs => "INTERVAL DAY TO SECOND",
            OracleType::IntervalYm => "INTERVAL YEAR TO MONTH",
            OracleType::Clob => "CLOB",
            OracleType::NClob => "NCLOB",
            OracleType::Blob => "BLOB",
            OracleType::Bfile => "BFILE",
            OracleType::Stmt => "CURSOR",
            OracleType::Boolean => "BOOLEAN",
            OracleType::Object => "OBJECT",
            OracleType::LongVarchar => "LONG",
            OracleType::LongRaw => "LONG RAW",
            OracleType::Json => "JSON",
        }
    }

    /// Representation the engine reports by default for this tag.
    pub fn default_representation(self) -> Representation {
        match self {
            OracleType::Varchar
            | OracleType::NVarchar
            | OracleType::Char
            | OracleType::NChar
            | OracleType::Rowid
            | OracleType::Raw
            | OracleType::LongVarchar
            | OracleType::LongRaw
            | OracleType::Json => Representation::Bytes,
            OracleType::NativeFloat => Representation::Float,
            OracleType::NativeDouble | OracleType::Number => Representation::Double,
            OracleType::NativeInt => Representation::Int64,
            OracleType::Date
            | OracleType::Timestamp
            | OracleType::TimestampTz
            | OracleType::TimestampLtz => Representation::Timestamp,
            OracleType::IntervalDs | OracleType::IntervalYm => Representation::Bytes,
            OracleType::Clob | OracleType::NClob | OracleType::Blob | OracleType::Bfile => {
                Representation::Lob
            }
            OracleType::Stmt => Representation::Bytes,
            OracleType::Boolean => Representation::Boolean,
            OracleType::Object => Representation::Object,
        }
    }

    /// Date and timestamp variants.
    pub fn is_temporal(self) -> bool {
        matches!(
            self,
            OracleType::Date
                | OracleType::Timestamp
                | OracleType::TimestampTz
                | OracleType::TimestampLtz
        )
    }

    /// Fixed and varying character types, national or not.
    pub fn is_character(self) -> bool {
        matches!(
            self,
            OracleType::Varchar | OracleType::NVarchar | OracleType::Char | OracleType::NChar
        )
    }

    /// Character and binary large objects.
    pub fn is_lob(self) -> bool {
        matches!(self, OracleType::Clob | OracleType::NClob | OracleType::Blob)
    }
}

/// Carrier used for a value crossing the native boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Representation {
    Bytes,
    Int64,
    Double,
    Float,
    Boolean,
    Object,
    Lob,
    /// Temporal value carried as a double epoch.
    Timestamp,
}

/// Reference from a slot to the object type of the values it holds.
///
/// The reference is by fully-qualified name plus a counted handle to the
/// native type, so that mutually nesting types never own each other.
#[derive(Debug)]
pub struct NestedType {
    schema: String,
    name: String,
    fqn: String,
    handle: ObjectTypeRef,
}

impl NestedType {
    pub(crate) fn new(schema: String, name: String, handle: ObjectTypeRef) -> Self {
        let fqn = format!("{}.{}", schema, name);
        Self {
            schema,
            name,
            fqn,
            handle,
        }
    }

    pub fn schema(&self) -> &str {
        &self.schema
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `schema.name` of the nested type.
    pub fn fqn(&self) -> &str {
        &self.fqn
    }

    pub fn handle(&self) -> ObjectTypeHandle {
        self.handle.handle()
    }
}

/// Type information for one attribute or collection element.
#[derive(Debug)]
pub struct DataTypeInfo {
    oracle_type: OracleType,
    representation: Representation,
    nested: Option<NestedType>,
}

impl DataTypeInfo {
    /// Build type information from what introspection reported.
    ///
    /// Every temporal tag is forced to the double representation so all
    /// date and timestamp variants share one conversion path.
    pub fn new(
        oracle_type: OracleType,
        default_representation: Representation,
        nested: Option<NestedType>,
    ) -> Self {
        let representation = if oracle_type.is_temporal() {
            Representation::Double
        } else {
            default_representation
        };
        Self {
            oracle_type,
            representation,
            nested,
        }
    }

    pub fn oracle_type(&self) -> OracleType {
        self.oracle_type
    }

    /// Preferred representation for reads and the hint for writes.
    pub fn representation(&self) -> Representation {
        self.representation
    }

    /// Nested object type, when the slot holds objects.
    pub fn nested(&self) -> Option<&NestedType> {
        self.nested.as_ref()
    }

    /// Display name: the nested type's fully-qualified name for objects,
    /// otherwise the database type name.
    pub fn type_name(&self) -> &str {
        match &self.nested {
            Some(nested) if self.oracle_type == OracleType::Object => nested.fqn(),
            _ => self.oracle_type.display_name(),
        }
    }
}
