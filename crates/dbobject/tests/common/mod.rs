// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Shared schema for integration tests.

#![allow(dead_code)]

use dbobject::native::memory::MemoryNative;
use dbobject::native::{NativeTypeInfo, ObjectTypeHandle};
use dbobject::{BindingConfig, DbObject, HostClass, OracleType, Representation, SessionContext};
use std::sync::Arc;

/// In-memory HR schema:
///
/// - `HR.ORDER_LINE`: one attribute per supported scalar kind
/// - `HR.NUMBER_LIST`: collection of NUMBER carried as int64
/// - `HR.LINE_LIST`: collection of `HR.ORDER_LINE`
/// - `HR.ORDER`: nests one line and a line list
/// - `HR.NODE` / `HR.EDGE`: mutually nesting types
pub struct Fixture {
    pub backend: Arc<MemoryNative>,
    pub ctx: SessionContext,
    pub order_line: ObjectTypeHandle,
    pub number_list: ObjectTypeHandle,
    pub line_list: ObjectTypeHandle,
    pub order: ObjectTypeHandle,
    pub node: ObjectTypeHandle,
    pub edge: ObjectTypeHandle,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_config(BindingConfig::default())
    }

    pub fn with_config(config: BindingConfig) -> Self {
        let backend = Arc::new(MemoryNative::new());

        let order_line = backend.define_type("HR", "ORDER_LINE");
        for (name, info) in [
            ("AMOUNT", NativeTypeInfo::scalar(OracleType::NativeDouble)),
            ("LABEL", NativeTypeInfo::scalar(OracleType::Varchar)),
            (
                "QTY",
                NativeTypeInfo::with_representation(OracleType::Number, Representation::Int64),
            ),
            ("PRICE", NativeTypeInfo::scalar(OracleType::Number)),
            ("SHIPPED", NativeTypeInfo::scalar(OracleType::Date)),
            ("FLAG", NativeTypeInfo::scalar(OracleType::Boolean)),
            ("PHOTO", NativeTypeInfo::scalar(OracleType::Raw)),
            ("NOTES", NativeTypeInfo::scalar(OracleType::Clob)),
            ("SPAN", NativeTypeInfo::scalar(OracleType::IntervalYm)),
        ] {
            backend
                .add_attribute(order_line, name, info)
                .expect("ORDER_LINE attribute");
        }

        let number_list = backend.define_type("HR", "NUMBER_LIST");
        backend
            .set_element_type(
                number_list,
                NativeTypeInfo::with_representation(OracleType::Number, Representation::Int64),
            )
            .expect("NUMBER_LIST element");

        let line_list = backend.define_type("HR", "LINE_LIST");
        backend
            .set_element_type(line_list, NativeTypeInfo::object(order_line))
            .expect("LINE_LIST element");

        let order = backend.define_type("HR", "ORDER");
        backend
            .add_attribute(order, "ID", NativeTypeInfo::scalar(OracleType::NativeInt))
            .expect("ORDER.ID");
        backend
            .add_attribute(order, "HEAD", NativeTypeInfo::object(order_line))
            .expect("ORDER.HEAD");
        backend
            .add_attribute(order, "LINES", NativeTypeInfo::object(line_list))
            .expect("ORDER.LINES");

        let node = backend.define_type("HR", "NODE");
        let edge = backend.define_type("HR", "EDGE");
        backend
            .add_attribute(node, "NAME", NativeTypeInfo::scalar(OracleType::Varchar))
            .expect("NODE.NAME");
        backend
            .add_attribute(node, "OUT", NativeTypeInfo::object(edge))
            .expect("NODE.OUT");
        backend
            .add_attribute(edge, "WEIGHT", NativeTypeInfo::scalar(OracleType::NativeDouble))
            .expect("EDGE.WEIGHT");
        backend
            .add_attribute(edge, "TARGET", NativeTypeInfo::object(node))
            .expect("EDGE.TARGET");

        let ctx = SessionContext::new(backend.clone(), config).expect("session");
        Self {
            backend,
            ctx,
            order_line,
            number_list,
            line_list,
            order,
            node,
            edge,
        }
    }

    pub fn class(&self, ty: ObjectTypeHandle) -> Arc<HostClass> {
        self.ctx.object_class(ty).expect("class")
    }

    /// Unbound host-side object of `ty`.
    pub fn object(&self, ty: ObjectTypeHandle) -> DbObject {
        DbObject::new(self.class(ty))
    }
}
