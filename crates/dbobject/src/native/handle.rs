// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Owned native handles.

use super::{
    LobHandle, Native, NativeHandle, ObjectAttrHandle, ObjectHandle, ObjectTypeHandle,
};
use crate::error::NativeResult;
use std::fmt;

/// One reference to a native handle.
///
/// Dropping the guard releases exactly that reference. The guard is
/// move-only; sharing requires [`Owned::try_clone`], which adds a reference
/// first.
pub struct Owned<H: NativeHandle> {
    native: Native,
    handle: H,
}

/// Owned object type handle.
pub type ObjectTypeRef = Owned<ObjectTypeHandle>;
/// Owned attribute handle.
pub type ObjectAttrRef = Owned<ObjectAttrHandle>;
/// Owned object instance handle.
pub type ObjectRef = Owned<ObjectHandle>;
/// Owned LOB locator.
pub type LobRef = Owned<LobHandle>;

impl<H: NativeHandle> Owned<H> {
    pub(super) fn adopt(native: Native, handle: H) -> Self {
        Self { native, handle }
    }

    /// Raw handle, valid while this guard is alive.
    pub fn handle(&self) -> H {
        self.handle
    }

    /// Add a reference and return a second guard for it.
    pub fn try_clone(&self) -> NativeResult<Self> {
        self.native.add_ref(self.handle)
    }

    /// Give up the reference without releasing it.
    pub fn into_raw(self) -> H {
        let handle = self.handle;
        std::mem::forget(self);
        handle
    }
}

impl<H: NativeHandle> Drop for Owned<H> {
    fn drop(&mut self) {
        self.native.release_raw(H::KIND, self.handle.raw());
    }
}

impl<H: NativeHandle> fmt::Debug for Owned<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Owned").field(&self.handle).finish()
    }
}
