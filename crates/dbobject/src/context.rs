// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Per-connection session context.

use crate::config::BindingConfig;
use crate::error::Result;
use crate::marshal::ValueMarshaller;
use crate::native::{Native, NativeApi, ObjectRef, ObjectTypeHandle};
use crate::object::DbObject;
use crate::types::{ClassCache, ConnectionClassCache, HostClass, ObjectTypeRegistry};
use crate::value::HostValue;
use std::sync::Arc;

/// Everything object operations need for one connection: the native
/// library, the type registry, the host class cache and the configuration.
///
/// Dropping the context drops every cached descriptor, releasing the type
/// and attribute handles they hold.
#[derive(Debug)]
pub struct SessionContext {
    native: Native,
    registry: ObjectTypeRegistry,
    config: BindingConfig,
}

impl SessionContext {
    /// Context with the default per-connection class cache.
    pub fn new(api: Arc<dyn NativeApi>, config: BindingConfig) -> Result<Self> {
        Self::with_class_cache(api, Arc::new(ConnectionClassCache::new()), config)
    }

    /// Context using a host-provided class cache.
    pub fn with_class_cache(
        api: Arc<dyn NativeApi>,
        classes: Arc<dyn ClassCache>,
        config: BindingConfig,
    ) -> Result<Self> {
        config.validate()?;
        let native = Native::new(api);
        let registry = ObjectTypeRegistry::new(native.clone(), classes);
        log::debug!(
            "[SessionContext::new] lob_auto_close={} plain_depth_limit={} max_presize={}",
            config.lob_auto_close,
            config.plain_depth_limit,
            config.max_presize
        );
        Ok(Self {
            native,
            registry,
            config,
        })
    }

    pub fn native(&self) -> &Native {
        &self.native
    }

    pub fn registry(&self) -> &ObjectTypeRegistry {
        &self.registry
    }

    pub fn config(&self) -> &BindingConfig {
        &self.config
    }

    pub fn marshaller(&self) -> ValueMarshaller<'_> {
        ValueMarshaller::new(self)
    }

    /// Host class of a native type, populated on first use.
    pub fn object_class(&self, object_type: ObjectTypeHandle) -> Result<Arc<HostClass>> {
        Ok(self.registry.resolve(object_type)?.class)
    }

    /// New object of `class`, initialized from a map or array value.
    pub fn new_object(&self, class: Arc<HostClass>, initial: &HostValue) -> Result<DbObject> {
        DbObject::construct(self, class, initial)
    }

    /// Wrap an object handle produced by statement execution.
    pub fn wrap_object(&self, object_type: ObjectTypeHandle, handle: ObjectRef) -> Result<DbObject> {
        let resolved = self.registry.resolve(object_type)?;
        Ok(DbObject::from_native(resolved, handle))
    }
}
