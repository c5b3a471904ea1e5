//! Type-keyed resource storage.
//!
//! Game-wide singletons (the GPU context, the 2D backend, the physics world,
//! gameplay state) live in one [`Resources`] map keyed by type. Systems reach
//! them through [`Context::resources`](crate::context::Context::resources).
//!
//! Borrowing two resources mutably at once is not possible through the map.
//! Remove one with [`resource_remove`](Resources::resource_remove), work with
//! both, then insert it back.

use std::any::{Any, TypeId};
use std::collections::HashMap;

#[derive(Default)]
pub struct Resources {
    map: HashMap<TypeId, Box<dyn Any>>,
}

impl std::fmt::Debug for Resources {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resources")
            .field("count", &self.map.len())
            .finish()
    }
}

impl Resources {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a resource, replacing any previous value of the same type.
    pub fn insert_resource<T: 'static + Send + Sync>(&mut self, value: T) {
        self.map.insert(TypeId::of::<T>(), Box::new(value));
    }

    /// Get a resource. Panics if it is missing.
    pub fn resource<T: 'static + Send + Sync>(&self) -> &T {
        self.get_resource::<T>()
            .unwrap_or_else(|| panic!("resource {} missing", std::any::type_name::<T>()))
    }

    /// Get a resource mutably. Panics if it is missing.
    pub fn resource_mut<T: 'static + Send + Sync>(&mut self) -> &mut T {
        self.get_resource_mut::<T>()
            .unwrap_or_else(|| panic!("resource {} missing", std::any::type_name::<T>()))
    }

    pub fn get_resource<T: 'static + Send + Sync>(&self) -> Option<&T> {
        self.map
            .get(&TypeId::of::<T>())
            .and_then(|b| b.downcast_ref::<T>())
    }

    pub fn get_resource_mut<T: 'static + Send + Sync>(&mut self) -> Option<&mut T> {
        self.map
            .get_mut(&TypeId::of::<T>())
            .and_then(|b| b.downcast_mut::<T>())
    }

    pub fn has_resource<T: 'static + Send + Sync>(&self) -> bool {
        self.map.contains_key(&TypeId::of::<T>())
    }

    /// Remove and return a resource.
    pub fn resource_remove<T: 'static + Send + Sync>(&mut self) -> Option<T> {
        self.map
            .remove(&TypeId::of::<T>())
            .and_then(|b| b.downcast::<T>().ok())
            .map(|b| *b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Score(u32);

    #[test]
    fn insert_get_and_remove() {
        let mut res = Resources::new();
        assert!(!res.has_resource::<Score>());
        res.insert_resource(Score(3));
        res.resource_mut::<Score>().0 += 1;
        assert_eq!(res.resource::<Score>(), &Score(4));
        assert_eq!(res.resource_remove::<Score>(), Some(Score(4)));
        assert!(res.get_resource::<Score>().is_none());
    }

    #[test]
    fn insert_replaces_same_type() {
        let mut res = Resources::new();
        res.insert_resource(Score(1));
        res.insert_resource(Score(2));
        assert_eq!(res.resource::<Score>().0, 2);
    }
}
