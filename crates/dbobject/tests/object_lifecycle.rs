// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![allow(clippy::float_cmp)] // Exact values written and read back

//! Object binding, copying, implicit construction and handle lifetimes.

mod common;

use common::Fixture;
use dbobject::native::NativeHandle;
use dbobject::{BindingConfig, DbObject, Error, ErrorKind, HostValue, ObjectMethod};
use std::collections::BTreeMap;

fn map(entries: &[(&str, HostValue)]) -> HostValue {
    HostValue::Map(
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect::<BTreeMap<_, _>>(),
    )
}

#[test]
fn test_amount_scenario() {
    let fx = Fixture::new();
    let line = fx.object(fx.order_line);
    let ctx = &fx.ctx;

    line.set_attr_value(ctx, "AMOUNT", &[HostValue::Number(12.5)])
        .expect("set");
    assert_eq!(
        line.get_attr_value(ctx, "AMOUNT", &[]).expect("get"),
        HostValue::Number(12.5)
    );

    line.set_attr_value(ctx, "AMOUNT", &[HostValue::Null])
        .expect("set null");
    assert_eq!(
        line.get_attr_value(ctx, "AMOUNT", &[]).expect("get"),
        HostValue::Null
    );
}

#[test]
fn test_attribute_accessor_arity() {
    let fx = Fixture::new();
    let line = fx.object(fx.order_line);
    fx.backend.reset_calls();

    let err = line
        .get_attr_value(&fx.ctx, "AMOUNT", &[HostValue::Integer(1)])
        .unwrap_err();
    assert!(matches!(
        err,
        Error::InvalidArgumentCount {
            expected: 0,
            actual: 1
        }
    ));
    let err = line.set_attr_value(&fx.ctx, "AMOUNT", &[]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(fx.backend.total_calls(), 0);
    assert!(!line.is_bound());
}

#[test]
fn test_unknown_attribute_rejected_without_native_calls() {
    let fx = Fixture::new();
    let line = fx.object(fx.order_line);
    fx.backend.reset_calls();

    let err = line.get_attr(&fx.ctx, "NO_SUCH").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    let err = line
        .set_attr_value(&fx.ctx, "NO_SUCH", &[HostValue::Integer(1)])
        .unwrap_err();
    assert!(matches!(err, Error::UnknownAttribute { .. }));

    assert_eq!(fx.backend.calls("create_object"), 0);
    assert_eq!(fx.backend.total_calls(), 0);
    assert!(!line.is_bound());
}

#[test]
fn test_copy_is_independent() {
    let fx = Fixture::new();
    let ctx = &fx.ctx;
    let original = fx.object(fx.order_line);
    original
        .set_attr(ctx, "LABEL", &HostValue::from("first"))
        .expect("set");

    let copy = match original.invoke(ctx, ObjectMethod::Copy, &[]).expect("copy") {
        HostValue::Object(copy) => copy,
        other => panic!("copy returned {:?}", other),
    };
    assert!(!copy.ptr_eq(&original));

    original
        .set_attr(ctx, "LABEL", &HostValue::from("second"))
        .expect("mutate");
    assert_eq!(
        copy.get_attr(ctx, "LABEL").expect("copy label"),
        HostValue::from("first")
    );
    assert_eq!(
        original.get_attr(ctx, "LABEL").expect("original label"),
        HostValue::from("second")
    );

    let original_raw = original.instance(ctx).expect("instance").handle().raw();
    let copy_raw = copy.instance(ctx).expect("instance").handle().raw();
    assert_ne!(original_raw, copy_raw);
    drop(original);
    assert_eq!(fx.backend.ref_count(original_raw), 0);
    assert_eq!(fx.backend.ref_count(copy_raw), 1);
    drop(copy);
    assert_eq!(fx.backend.live_objects(), 0);
}

#[test]
fn test_copy_of_collection() {
    let fx = Fixture::new();
    let ctx = &fx.ctx;
    let list = fx.object(fx.number_list);
    list.append(ctx, &HostValue::Integer(1)).expect("append");

    let copy = list.copy(ctx).expect("copy");
    list.append(ctx, &HostValue::Integer(2)).expect("append");
    assert_eq!(copy.values(ctx).expect("values"), vec![HostValue::Integer(1)]);
    assert_eq!(list.length(ctx).expect("length"), 2);
}

#[test]
fn test_implicit_construction_of_nested_values() {
    let fx = Fixture::new();
    let ctx = &fx.ctx;
    let order = fx.object(fx.order);

    order.set_attr(ctx, "ID", &HostValue::Integer(77)).expect("ID");
    order
        .set_attr(
            ctx,
            "HEAD",
            &map(&[
                ("AMOUNT", HostValue::Number(3.0)),
                ("LABEL", HostValue::from("head")),
            ]),
        )
        .expect("HEAD");
    order
        .set_attr(
            ctx,
            "LINES",
            &HostValue::Array(vec![
                map(&[("QTY", HostValue::Integer(1))]),
                map(&[("QTY", HostValue::Integer(2))]),
            ]),
        )
        .expect("LINES");

    let head = order.get_attr(ctx, "HEAD").expect("HEAD");
    let head = head.as_object().expect("object");
    assert_eq!(head.class().fqn(), "HR.ORDER_LINE");
    assert_eq!(head.get_attr(ctx, "AMOUNT").expect("AMOUNT"), HostValue::Number(3.0));

    let lines = order.get_attr(ctx, "LINES").expect("LINES");
    let lines = lines.as_object().expect("object");
    let quantities: Vec<_> = lines
        .values(ctx)
        .expect("values")
        .iter()
        .map(|line| {
            line.as_object()
                .expect("line")
                .get_attr(ctx, "QTY")
                .expect("QTY")
        })
        .collect();
    assert_eq!(
        quantities,
        vec![HostValue::Integer(1), HostValue::Integer(2)]
    );
}

#[test]
fn test_implicit_construction_into_collection_elements() {
    let fx = Fixture::new();
    let ctx = &fx.ctx;
    let lines = fx.object(fx.line_list);

    lines
        .append(ctx, &map(&[("LABEL", HostValue::from("x"))]))
        .expect("append map");
    let line = lines.get_element(ctx, 0).expect("element");
    assert_eq!(
        line.as_object()
            .expect("object")
            .get_attr(ctx, "LABEL")
            .expect("LABEL"),
        HostValue::from("x")
    );

    // Explicit instances are used as they are.
    let explicit = fx.object(fx.order_line);
    explicit
        .set_attr(ctx, "LABEL", &HostValue::from("y"))
        .expect("label");
    lines
        .set_element(ctx, 5, &HostValue::Object(explicit))
        .expect("set explicit");
    assert_eq!(lines.keys(ctx).expect("keys"), vec![0, 5]);
}

#[test]
fn test_nested_read_is_live_view() {
    let fx = Fixture::new();
    let ctx = &fx.ctx;
    let order = fx.object(fx.order);
    order
        .set_attr(ctx, "HEAD", &map(&[("AMOUNT", HostValue::Number(1.0))]))
        .expect("HEAD");

    let head = order.get_attr(ctx, "HEAD").expect("HEAD");
    head.as_object()
        .expect("object")
        .set_attr(ctx, "AMOUNT", &HostValue::Number(9.0))
        .expect("mutate");

    let again = order.get_attr(ctx, "HEAD").expect("HEAD");
    assert_eq!(
        again
            .as_object()
            .expect("object")
            .get_attr(ctx, "AMOUNT")
            .expect("AMOUNT"),
        HostValue::Number(9.0)
    );
}

#[test]
fn test_all_handles_released() {
    let fx = Fixture::new();
    {
        let ctx = &fx.ctx;
        let order = fx.object(fx.order);
        order
            .set_attr(ctx, "HEAD", &map(&[("LABEL", HostValue::from("h"))]))
            .expect("HEAD");
        order
            .set_attr(ctx, "LINES", &HostValue::Array(vec![map(&[]), map(&[])]))
            .expect("LINES");
        let _head = order.get_attr(ctx, "HEAD").expect("HEAD");
        let _copy = order.copy(ctx).expect("copy");
        let _plain = order.to_plain(ctx).expect("plain");
        assert!(fx.backend.live_objects() > 0);
    }
    assert_eq!(fx.backend.live_objects(), 0);
}

#[test]
fn test_construct_with_initial_values() {
    let fx = Fixture::new();
    let ctx = &fx.ctx;

    let line = ctx
        .new_object(
            fx.class(fx.order_line),
            &map(&[("QTY", HostValue::Integer(4)), ("FLAG", HostValue::Boolean(true))]),
        )
        .expect("construct");
    assert!(line.is_bound());
    assert_eq!(line.get_attr(ctx, "QTY").expect("QTY"), HostValue::Integer(4));

    let list = ctx
        .new_object(
            fx.class(fx.number_list),
            &HostValue::Array(vec![HostValue::Integer(3), HostValue::Integer(1)]),
        )
        .expect("construct");
    assert_eq!(
        list.values(ctx).expect("values"),
        vec![HostValue::Integer(3), HostValue::Integer(1)]
    );

    let err = ctx
        .new_object(
            fx.class(fx.order_line),
            &map(&[("MISSING", HostValue::Integer(1))]),
        )
        .unwrap_err();
    assert!(matches!(err, Error::UnknownAttribute { .. }));
}

#[test]
fn test_to_plain() {
    let fx = Fixture::new();
    let ctx = &fx.ctx;
    let order = ctx
        .new_object(
            fx.class(fx.order),
            &map(&[
                ("ID", HostValue::Integer(5)),
                ("HEAD", map(&[("LABEL", HostValue::from("h"))])),
                (
                    "LINES",
                    HostValue::Array(vec![map(&[("QTY", HostValue::Integer(8))])]),
                ),
            ]),
        )
        .expect("order");

    let plain = order.to_plain(ctx).expect("plain");
    assert_eq!(plain.get_field("ID"), Some(&HostValue::Integer(5)));
    let head = plain.get_field("HEAD").expect("HEAD");
    assert_eq!(head.get_field("LABEL"), Some(&HostValue::from("h")));
    assert_eq!(head.get_field("AMOUNT"), Some(&HostValue::Null));
    let lines = plain
        .get_field("LINES")
        .and_then(HostValue::as_array)
        .expect("LINES");
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].get_field("QTY"), Some(&HostValue::Integer(8)));
}

#[test]
fn test_to_plain_depth_limit() {
    let fx = Fixture::with_config(BindingConfig {
        plain_depth_limit: 1,
        ..BindingConfig::default()
    });
    let ctx = &fx.ctx;
    let order = fx.object(fx.order);
    order
        .set_attr(ctx, "HEAD", &map(&[("LABEL", HostValue::from("h"))]))
        .expect("HEAD");

    let plain = order.to_plain(ctx).expect("plain");
    assert!(plain
        .get_field("HEAD")
        .and_then(HostValue::as_object)
        .is_some());
}

#[test]
fn test_wrap_object_from_execution() {
    let fx = Fixture::new();
    let handle = fx
        .ctx
        .native()
        .create_object(fx.order_line)
        .expect("native object");
    let raw = handle.handle().raw();

    let object = fx.ctx.wrap_object(fx.order_line, handle).expect("wrap");
    assert!(object.is_bound());
    object
        .set_attr(&fx.ctx, "LABEL", &HostValue::from("wrapped"))
        .expect("set");
    assert_eq!(fx.backend.calls("create_object"), 1);
    assert_eq!(fx.backend.ref_count(raw), 1);
    drop(object);
    assert_eq!(fx.backend.ref_count(raw), 0);
}

#[test]
fn test_proxy_operations_reach_target() {
    let fx = Fixture::new();
    let ctx = &fx.ctx;
    let list = fx.object(fx.number_list);
    let view = DbObject::proxy(list.clone());

    view.invoke(ctx, ObjectMethod::Append, &[HostValue::Integer(10)])
        .expect("append through proxy");
    assert!(view.is_proxy());
    assert_eq!(list.values(ctx).expect("values"), vec![HostValue::Integer(10)]);
    assert_eq!(
        view.invoke(ctx, ObjectMethod::Length, &[]).expect("length"),
        HostValue::Integer(1)
    );
    assert_eq!(view.type_descriptor().expect("descriptor").fqn(), "HR.NUMBER_LIST");
}
