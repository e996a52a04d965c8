use std::{
    any::{TypeId, type_name},
    collections::BTreeMap,
};

use crate::{Compute, State};

pub(crate) type StateMap = BTreeMap<TypeId, Box<dyn State>>;
pub(crate) type ComputeMap = BTreeMap<TypeId, Box<dyn Compute>>;

/// Read-only view over the registered states and computes.
///
/// Handed to `Compute::compute` and `Command::run`.
#[derive(Clone, Copy)]
pub struct Dep<'a> {
    states: &'a StateMap,
    computes: &'a ComputeMap,
}

impl<'a> Dep<'a> {
    pub(crate) fn new(states: &'a StateMap, computes: &'a ComputeMap) -> Self {
        Self { states, computes }
    }

    pub fn try_state_ref<T: State>(&self) -> Option<&'a T> {
        self.states
            .get(&TypeId::of::<T>())
            .and_then(|state| state.as_any().downcast_ref::<T>())
    }

    /// # Panics
    /// Panics if the state type is not registered.
    pub fn get_state_ref<T: State>(&self) -> &'a T {
        self.try_state_ref::<T>()
            .unwrap_or_else(|| panic!("State {} is not registered", type_name::<T>()))
    }

    pub fn try_compute_ref<T: Compute>(&self) -> Option<&'a T> {
        self.computes
            .get(&TypeId::of::<T>())
            .and_then(|compute| compute.as_any().downcast_ref::<T>())
    }

    /// # Panics
    /// Panics if the compute type is not registered.
    pub fn get_compute_ref<T: Compute>(&self) -> &'a T {
        self.try_compute_ref::<T>()
            .unwrap_or_else(|| panic!("Compute {} is not registered", type_name::<T>()))
    }
}

impl std::fmt::Debug for Dep<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dep")
            .field("states", &self.states.len())
            .field("computes", &self.computes.len())
            .finish()
    }
}
