//! Startup registration table of resource types, keyed by canonical name.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{Result, RouteMeterError};
use crate::resource::{ResourceInfo, ResourceType};

#[derive(Debug, Clone, Default)]
pub struct ResourceCatalog {
    types: HashMap<String, Arc<ResourceType>>,
}

impl ResourceCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a type, replacing any previous entry with the same name.
    pub fn insert(&mut self, ty: ResourceType) -> Arc<ResourceType> {
        let ty = Arc::new(ty);
        self.types.insert(ty.canonical_name().to_string(), Arc::clone(&ty));
        ty
    }

    /// Existing entry for `ty`'s name, or `ty` itself once inserted.
    pub fn get_or_insert(&mut self, ty: ResourceType) -> Arc<ResourceType> {
        match self.types.get(ty.canonical_name()) {
            Some(existing) => Arc::clone(existing),
            None => self.insert(ty),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Result<Arc<ResourceType>> {
        self.types
            .get(name)
            .cloned()
            .ok_or_else(|| RouteMeterError::UnknownResource(name.to_string()))
    }

    /// Binding descriptor for `method(params)` on the named type.
    pub fn info<I, S>(&self, type_name: &str, method: &str, params: I) -> Result<ResourceInfo>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Ok(ResourceInfo::new(self.get(type_name)?, method, params))
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::resource::MethodDecl;

    #[test]
    fn unknown_type_is_a_binding_error() {
        let catalog = ResourceCatalog::new();
        let err = catalog.info("com.example.Missing", "get", ["u64"]).unwrap_err();
        assert!(err.is_fatal_binding());
    }

    #[test]
    fn get_or_insert_keeps_the_first_entry() {
        let mut catalog = ResourceCatalog::new();
        catalog.insert(ResourceType::new("a.Orders").method(MethodDecl::new("list")));
        let kept = catalog.get_or_insert(ResourceType::new("a.Orders"));
        assert_eq!(kept.methods().len(), 1);
        assert_eq!(catalog.len(), 1);
    }
}
