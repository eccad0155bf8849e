// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Sparse collection enumeration.
//!
//! Collection indices are associative: they need not start at zero nor be
//! contiguous. Enumeration therefore never counts; it starts from the first
//! index the native side reports and follows `next_index` until the native
//! side answers that no further index exists.

use crate::error::{Error, Result};
use crate::native::{Native, ObjectHandle};

/// Cursor over the indices of one collection instance.
#[derive(Debug, Clone, Copy)]
pub struct CollectionCursor<'a> {
    native: &'a Native,
    handle: ObjectHandle,
}

impl<'a> CollectionCursor<'a> {
    pub fn new(native: &'a Native, handle: ObjectHandle) -> Self {
        Self { native, handle }
    }

    /// Number of elements.
    pub fn size(&self) -> Result<i32> {
        Ok(self.native.size(self.handle)?)
    }

    pub fn first(&self) -> Result<Option<i32>> {
        Ok(self.native.first_index(self.handle)?.get())
    }

    pub fn last(&self) -> Result<Option<i32>> {
        Ok(self.native.last_index(self.handle)?.get())
    }

    /// Index following `index`, which need not itself exist.
    pub fn next(&self, index: i32) -> Result<Option<i32>> {
        Ok(self.native.next_index(self.handle, index)?.get())
    }

    /// Index preceding `index`, which need not itself exist.
    pub fn prev(&self, index: i32) -> Result<Option<i32>> {
        Ok(self.native.prev_index(self.handle, index)?.get())
    }

    /// Indices in ascending native order.
    pub fn indices(&self) -> Indices<'a> {
        Indices {
            cursor: *self,
            state: IndexState::Start,
        }
    }

    /// Every index, in ascending order.
    pub fn keys(&self, max_presize: usize) -> Result<Vec<i32>> {
        let mut keys = self.presized(max_presize)?;
        for index in self.indices() {
            keys.push(index?);
        }
        Ok(keys)
    }

    /// Every element, read through `read`, in ascending index order.
    pub fn values<T, F>(&self, max_presize: usize, mut read: F) -> Result<Vec<T>>
    where
        F: FnMut(i32) -> Result<T>,
    {
        let mut values = self.presized(max_presize)?;
        for index in self.indices() {
            values.push(read(index?)?);
        }
        Ok(values)
    }

    /// Output sequence sized from the native element count.
    fn presized<T>(&self, max_presize: usize) -> Result<Vec<T>> {
        let size = usize::try_from(self.size()?).unwrap_or(0);
        let mut out = Vec::new();
        out.try_reserve_exact(size.min(max_presize))
            .map_err(|_| Error::out_of_memory(format!("{} collection entries", size)))?;
        Ok(out)
    }
}

#[derive(Debug, Clone, Copy)]
enum IndexState {
    Start,
    At(i32),
    Done,
}

/// Iterator over collection indices. Stops after the first error.
#[derive(Debug)]
pub struct Indices<'a> {
    cursor: CollectionCursor<'a>,
    state: IndexState,
}

impl Iterator for Indices<'_> {
    type Item = Result<i32>;

    fn next(&mut self) -> Option<Self::Item> {
        let step = match self.state {
            IndexState::Start => self.cursor.first(),
            IndexState::At(index) => self.cursor.next(index),
            IndexState::Done => return None,
        };
        match step {
            Ok(Some(index)) => {
                self.state = IndexState::At(index);
                Some(Ok(index))
            }
            Ok(None) => {
                self.state = IndexState::Done;
                None
            }
            Err(err) => {
                self.state = IndexState::Done;
                Some(Err(err))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::native::memory::MemoryNative;
    use crate::native::{NativeApi, NativeData, NativeTypeInfo};
    use crate::types::{OracleType, Representation};
    use std::sync::Arc;

    fn sparse(indices: &[i32]) -> (Arc<MemoryNative>, Native, ObjectHandle) {
        let backend = Arc::new(MemoryNative::new());
        let ty = backend.define_type("HR", "SPARSE");
        backend
            .set_element_type(ty, NativeTypeInfo::scalar(OracleType::NativeInt))
            .expect("element");
        let native = Native::new(backend.clone());
        let obj = native.create_object(ty).expect("create").into_raw();
        for index in indices {
            backend
                .set_element_value(obj, *index, Representation::Int64, &NativeData::Int64(1))
                .expect("set");
        }
        (backend, native, obj)
    }

    #[test]
    fn test_sparse_walk_stops_exactly() {
        let (backend, native, obj) = sparse(&[2, 9, 100]);
        let cursor = CollectionCursor::new(&native, obj);

        assert_eq!(cursor.keys(16).expect("keys"), vec![2, 9, 100]);
        assert_eq!(cursor.first().expect("first"), Some(2));
        assert_eq!(cursor.last().expect("last"), Some(100));
        assert_eq!(cursor.next(100).expect("next"), None);
        assert_eq!(cursor.prev(2).expect("prev"), None);
        assert_eq!(cursor.next(50).expect("next"), Some(100));

        backend.reset_calls();
        let _ = cursor.keys(16).expect("keys");
        // one size, one first, one next per element
        assert_eq!(backend.calls("next_index"), 3);
        assert_eq!(backend.calls("first_index"), 1);
        drop(native.adopt(obj));
    }

    #[test]
    fn test_empty_collection() {
        let (_backend, native, obj) = sparse(&[]);
        let cursor = CollectionCursor::new(&native, obj);
        assert_eq!(cursor.first().expect("first"), None);
        assert!(cursor.keys(16).expect("keys").is_empty());
        drop(native.adopt(obj));
    }

    #[test]
    fn test_values_error_stops_enumeration() {
        let (backend, native, obj) = sparse(&[-5, 0, 5]);
        let cursor = CollectionCursor::new(&native, obj);
        backend.fail_next("next_index", "ORA-03113: end-of-file on communication channel");

        let mut seen = Vec::new();
        let err = cursor
            .values(16, |index| {
                seen.push(index);
                Ok(index)
            })
            .unwrap_err();
        assert_eq!(seen, vec![-5]);
        assert!(err.to_string().starts_with("ORA-03113"));
        drop(native.adopt(obj));
    }
}
