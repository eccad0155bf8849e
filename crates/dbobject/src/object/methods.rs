// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Name-addressed method surface of object values.
//!
//! Host code calls methods with a list of loosely typed arguments. Arity
//! and argument kinds are checked here, before any native call.

use super::DbObject;
use crate::context::SessionContext;
use crate::error::{Error, Result};
use crate::value::HostValue;

/// Methods exposed on every object value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectMethod {
    Append,
    Copy,
    DeleteElement,
    GetElement,
    GetFirstIndex,
    GetKeys,
    GetLastIndex,
    GetNextIndex,
    GetPrevIndex,
    GetValues,
    HasElement,
    SetElement,
    Trim,
    Length,
}

impl ObjectMethod {
    pub const ALL: [ObjectMethod; 14] = [
        ObjectMethod::Append,
        ObjectMethod::Copy,
        ObjectMethod::DeleteElement,
        ObjectMethod::GetElement,
        ObjectMethod::GetFirstIndex,
        ObjectMethod::GetKeys,
        ObjectMethod::GetLastIndex,
        ObjectMethod::GetNextIndex,
        ObjectMethod::GetPrevIndex,
        ObjectMethod::GetValues,
        ObjectMethod::HasElement,
        ObjectMethod::SetElement,
        ObjectMethod::Trim,
        ObjectMethod::Length,
    ];

    /// Host-visible name.
    pub fn name(self) -> &'static str {
        match self {
            ObjectMethod::Append => "append",
            ObjectMethod::Copy => "copy",
            ObjectMethod::DeleteElement => "deleteElement",
            ObjectMethod::GetElement => "getElement",
            ObjectMethod::GetFirstIndex => "getFirstIndex",
            ObjectMethod::GetKeys => "getKeys",
            ObjectMethod::GetLastIndex => "getLastIndex",
            ObjectMethod::GetNextIndex => "getNextIndex",
            ObjectMethod::GetPrevIndex => "getPrevIndex",
            ObjectMethod::GetValues => "getValues",
            ObjectMethod::HasElement => "hasElement",
            ObjectMethod::SetElement => "setElement",
            ObjectMethod::Trim => "trim",
            ObjectMethod::Length => "length",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        ObjectMethod::ALL.iter().copied().find(|m| m.name() == name)
    }

    /// Number of arguments the method takes.
    pub fn arity(self) -> usize {
        match self {
            ObjectMethod::Copy
            | ObjectMethod::GetFirstIndex
            | ObjectMethod::GetKeys
            | ObjectMethod::GetLastIndex
            | ObjectMethod::GetValues
            | ObjectMethod::Length => 0,
            ObjectMethod::Append
            | ObjectMethod::DeleteElement
            | ObjectMethod::GetElement
            | ObjectMethod::GetNextIndex
            | ObjectMethod::GetPrevIndex
            | ObjectMethod::HasElement
            | ObjectMethod::Trim => 1,
            ObjectMethod::SetElement => 2,
        }
    }
}

fn check_arity(expected: usize, args: &[HostValue]) -> Result<()> {
    if args.len() != expected {
        return Err(Error::InvalidArgumentCount {
            expected,
            actual: args.len(),
        });
    }
    Ok(())
}

/// Integral number in the `i32` range at `args[pos]`.
fn int_arg(args: &[HostValue], pos: usize) -> Result<i32> {
    args[pos]
        .as_i64()
        .and_then(|v| i32::try_from(v).ok())
        .ok_or_else(|| Error::InvalidArgument {
            position: pos + 1,
            reason: format!("expected a 32-bit integer, got {}", args[pos].kind_name()),
        })
}

/// Non-negative integral number in the `u32` range at `args[pos]`.
fn uint_arg(args: &[HostValue], pos: usize) -> Result<u32> {
    args[pos]
        .as_i64()
        .and_then(|v| u32::try_from(v).ok())
        .ok_or_else(|| Error::InvalidArgument {
            position: pos + 1,
            reason: format!(
                "expected a non-negative 32-bit integer, got {}",
                args[pos].kind_name()
            ),
        })
}

fn index_value(index: Option<i32>) -> HostValue {
    index.map_or(HostValue::Undefined, |i| HostValue::Integer(i64::from(i)))
}

impl DbObject {
    /// Call a method with host arguments.
    pub fn invoke(
        &self,
        ctx: &SessionContext,
        method: ObjectMethod,
        args: &[HostValue],
    ) -> Result<HostValue> {
        check_arity(method.arity(), args)?;
        let target = self.resolve();

        let result = match method {
            ObjectMethod::Append => {
                target.append(ctx, &args[0])?;
                HostValue::Undefined
            }
            ObjectMethod::Copy => HostValue::Object(target.copy(ctx)?),
            ObjectMethod::DeleteElement => {
                let index = int_arg(args, 0)?;
                target.delete_element(ctx, index)?;
                HostValue::Undefined
            }
            ObjectMethod::GetElement => {
                let index = int_arg(args, 0)?;
                target.get_element(ctx, index)?
            }
            ObjectMethod::GetFirstIndex => index_value(target.first_index(ctx)?),
            ObjectMethod::GetKeys => HostValue::Array(
                target
                    .keys(ctx)?
                    .into_iter()
                    .map(|i| HostValue::Integer(i64::from(i)))
                    .collect(),
            ),
            ObjectMethod::GetLastIndex => index_value(target.last_index(ctx)?),
            ObjectMethod::GetNextIndex => {
                let index = int_arg(args, 0)?;
                index_value(target.next_index(ctx, index)?)
            }
            ObjectMethod::GetPrevIndex => {
                let index = int_arg(args, 0)?;
                index_value(target.prev_index(ctx, index)?)
            }
            ObjectMethod::GetValues => HostValue::Array(target.values(ctx)?),
            ObjectMethod::HasElement => {
                let index = int_arg(args, 0)?;
                HostValue::Boolean(target.has_element(ctx, index)?)
            }
            ObjectMethod::SetElement => {
                let index = int_arg(args, 0)?;
                target.set_element(ctx, index, &args[1])?;
                HostValue::Undefined
            }
            ObjectMethod::Trim => {
                let count = uint_arg(args, 0)?;
                target.trim(ctx, count)?;
                HostValue::Undefined
            }
            ObjectMethod::Length => HostValue::Integer(i64::from(target.length(ctx)?)),
        };
        Ok(result)
    }

    /// Attribute getter: no arguments.
    pub fn get_attr_value(
        &self,
        ctx: &SessionContext,
        name: &str,
        args: &[HostValue],
    ) -> Result<HostValue> {
        check_arity(0, args)?;
        self.resolve().get_attr(ctx, name)
    }

    /// Attribute setter: exactly one argument, the new value.
    pub fn set_attr_value(
        &self,
        ctx: &SessionContext,
        name: &str,
        args: &[HostValue],
    ) -> Result<()> {
        check_arity(1, args)?;
        self.resolve().set_attr(ctx, name, &args[0])
    }
}
