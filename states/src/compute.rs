use std::any::{Any, TypeId, type_name};

use crate::{Dep, State, Updater};

/// Declared inputs of a [`Compute`].
///
/// `states` and `computes` are the types whose changes make the compute dirty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComputeDeps {
    pub states: Vec<TypeId>,
    pub computes: Vec<TypeId>,
}

impl ComputeDeps {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state<T: State>(mut self) -> Self {
        let id = TypeId::of::<T>();
        if !self.states.contains(&id) {
            self.states.push(id);
        }
        self
    }

    pub fn compute<T: Compute>(mut self) -> Self {
        let id = TypeId::of::<T>();
        if !self.computes.contains(&id) {
            self.computes.push(id);
        }
        self
    }

    pub fn all(&self) -> impl Iterator<Item = TypeId> + '_ {
        self.states.iter().chain(self.computes.iter()).copied()
    }
}

/// Derived value cached in [`StateCtx`](crate::StateCtx).
///
/// `compute` reads its dependencies through [`Dep`] and publishes the new
/// value with `updater.set(...)`. It runs synchronously inside
/// `StateCtx::sync_computes`, so it must stay free of side effects.
pub trait Compute: Any {
    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn deps(&self) -> ComputeDeps;

    fn compute(&self, deps: Dep<'_>, updater: Updater);

    fn assign_box(&mut self, new_self: Box<dyn Any + Send>);
}

/// Shared `assign_box` body for computes.
pub fn assign_impl<T: Compute>(target: &mut T, new_self: Box<dyn Any + Send>) {
    match new_self.downcast::<T>() {
        Ok(value) => *target = *value,
        Err(_) => log::warn!(
            "assign_impl: ignored value of wrong type for {}",
            type_name::<T>()
        ),
    }
}
