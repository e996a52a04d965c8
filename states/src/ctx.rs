use std::{
    any::{TypeId, type_name},
    collections::{BTreeMap, VecDeque},
};

use crate::{
    Command, Compute, Dep, Error, Graph, State, StateSyncStatus, TopologyError, Updater,
    dep::{ComputeMap, StateMap},
    runtime::{StateRuntime, Update},
};

/// Upper bound on apply/recompute rounds in one `sync_computes` call.
const MAX_SYNC_ROUNDS: usize = 16;

/// Owner of every state, compute and command of the application.
///
/// The UI loop is:
/// 1. mutate states (`update`, `state_mut`) or `dispatch` commands,
/// 2. call `sync_computes` once per frame,
/// 3. read derived values with `cached`.
pub struct StateCtx {
    runtime: StateRuntime,

    states: StateMap,
    computes: ComputeMap,
    commands: BTreeMap<TypeId, Box<dyn Command>>,

    status: BTreeMap<TypeId, StateSyncStatus>,
    names: BTreeMap<TypeId, &'static str>,

    graph: Graph<TypeId>,
    order: Option<Vec<TypeId>>,

    queued_commands: VecDeque<TypeId>,
}

impl Default for StateCtx {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for StateCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names = |ids: Vec<&TypeId>| -> Vec<&str> {
            ids.into_iter()
                .map(|id| self.names.get(id).copied().unwrap_or("?"))
                .collect()
        };
        f.debug_struct("StateCtx")
            .field("states", &names(self.states.keys().collect()))
            .field("computes", &names(self.computes.keys().collect()))
            .field("commands", &names(self.commands.keys().collect()))
            .field("queued_commands", &self.queued_commands.len())
            .finish()
    }
}

impl StateCtx {
    pub fn new() -> Self {
        Self {
            runtime: StateRuntime::new(),
            states: BTreeMap::new(),
            computes: BTreeMap::new(),
            commands: BTreeMap::new(),
            status: BTreeMap::new(),
            names: BTreeMap::new(),
            graph: Graph::new(),
            order: None,
            queued_commands: VecDeque::new(),
        }
    }

    pub fn add_state<T: State>(&mut self, state: T) {
        let id = TypeId::of::<T>();
        self.names.insert(id, type_name::<T>());
        if self.states.insert(id, Box::new(state)).is_some() {
            log::debug!("add_state: replaced {}", type_name::<T>());
        }
        self.mark_dependents_dirty(id);
    }

    pub fn record_compute<T: Compute>(&mut self, compute: T) {
        let id = TypeId::of::<T>();
        self.names.insert(id, type_name::<T>());
        for dep in compute.deps().all() {
            self.graph.route_to(dep, id);
        }
        self.computes.insert(id, Box::new(compute));
        self.status.insert(id, StateSyncStatus::Init);
        self.order = None;
    }

    pub fn record_command<T: Command>(&mut self, command: T) {
        let id = TypeId::of::<T>();
        self.names.insert(id, type_name::<T>());
        self.commands.insert(id, Box::new(command));
    }

    /// Check the compute dependency graph for cycles and duplicate edges.
    pub fn verify_deps(&self) -> Result<(), TopologyError<TypeId>> {
        self.graph.topology_sort().map(|_| ())
    }

    pub fn updater(&self) -> Updater {
        self.runtime.updater()
    }

    pub fn dep(&self) -> Dep<'_> {
        Dep::new(&self.states, &self.computes)
    }

    pub fn try_state<T: State>(&self) -> Result<&T, Error> {
        self.states
            .get(&TypeId::of::<T>())
            .and_then(|state| state.as_any().downcast_ref::<T>())
            .ok_or_else(|| Error::state_not_found(type_name::<T>(), "StateCtx::state"))
    }

    /// # Panics
    /// Panics if the state type is not registered.
    pub fn state<T: State>(&self) -> &T {
        self.try_state::<T>().unwrap_or_else(|err| panic!("{err}"))
    }

    /// Mutable access; dependents are marked dirty up front.
    ///
    /// # Panics
    /// Panics if the state type is not registered.
    pub fn state_mut<T: State>(&mut self) -> &mut T {
        let id = TypeId::of::<T>();
        self.mark_dependents_dirty(id);
        self.states
            .get_mut(&id)
            .and_then(|state| state.as_any_mut().downcast_mut::<T>())
            .unwrap_or_else(|| panic!("State {} is not registered", type_name::<T>()))
    }

    /// Mutate a state in place. Unknown states are logged and ignored.
    pub fn update<T: State>(&mut self, f: impl FnOnce(&mut T)) {
        let id = TypeId::of::<T>();
        let Some(state) = self
            .states
            .get_mut(&id)
            .and_then(|state| state.as_any_mut().downcast_mut::<T>())
        else {
            log::warn!("update: state {} is not registered", type_name::<T>());
            return;
        };
        f(state);
        self.mark_dependents_dirty(id);
    }

    /// Latest value of a compute. `None` if it was never recorded.
    pub fn cached<T: Compute>(&self) -> Option<&T> {
        self.computes
            .get(&TypeId::of::<T>())
            .and_then(|compute| compute.as_any().downcast_ref::<T>())
    }

    pub fn try_dispatch<T: Command>(&mut self) -> Result<(), Error> {
        self.run_command(TypeId::of::<T>())?;
        self.sync_computes();
        Ok(())
    }

    /// Run a registered command now and sync the computes it invalidated.
    pub fn dispatch<T: Command>(&mut self) {
        if let Err(err) = self.try_dispatch::<T>() {
            log::error!("dispatch failed: {err}");
        }
    }

    /// Queue a command to run at the next `flush_commands`.
    ///
    /// Widgets enqueue while they hold borrows into the context; the app loop
    /// flushes at the end of the frame.
    pub fn enqueue_command<T: Command>(&mut self) {
        self.queued_commands.push_back(TypeId::of::<T>());
    }

    pub fn flush_commands(&mut self) {
        while let Some(id) = self.queued_commands.pop_front() {
            if let Err(err) = self.run_command(id) {
                log::error!("flush_commands: {err}");
            }
        }
        self.sync_computes();
    }

    fn run_command(&mut self, id: TypeId) -> Result<(), Error> {
        let command = self.commands.get(&id).ok_or(Error::CommandNotFound {
            name: self.names.get(&id).copied().unwrap_or("<unregistered>"),
        })?;
        command.run(Dep::new(&self.states, &self.computes), self.runtime.updater());
        self.apply_updates();
        Ok(())
    }

    /// Apply queued writes and recompute every dirty compute in dependency order.
    pub fn sync_computes(&mut self) {
        self.apply_updates();

        let order = match self.compute_order() {
            Ok(order) => order,
            Err(err) => {
                log::error!("sync_computes: {err}");
                return;
            }
        };

        for _ in 0..MAX_SYNC_ROUNDS {
            let mut ran = false;
            for id in &order {
                let needs = self
                    .status
                    .get(id)
                    .is_some_and(|status| status.needs_compute());
                if !needs {
                    continue;
                }
                if let Some(compute) = self.computes.get(id) {
                    compute.compute(
                        Dep::new(&self.states, &self.computes),
                        self.runtime.updater(),
                    );
                }
                self.status.insert(*id, StateSyncStatus::Clean);
                ran = true;
                self.apply_updates();
            }
            if !ran {
                return;
            }
        }
        log::warn!("sync_computes: still dirty after {MAX_SYNC_ROUNDS} rounds");
    }

    pub fn status_of<T: Compute>(&self) -> StateSyncStatus {
        self.status
            .get(&TypeId::of::<T>())
            .copied()
            .unwrap_or_default()
    }

    fn compute_order(&mut self) -> Result<Vec<TypeId>, TopologyError<TypeId>> {
        if let Some(order) = &self.order {
            return Ok(order.clone());
        }
        let mut order: Vec<TypeId> = self
            .graph
            .topology_sort()?
            .into_iter()
            .filter(|id| self.computes.contains_key(id))
            .collect();
        for id in self.computes.keys() {
            if !order.contains(id) {
                order.push(*id);
            }
        }
        self.order = Some(order.clone());
        Ok(order)
    }

    fn apply_updates(&mut self) {
        for (id, update) in self.runtime.drain() {
            let name = self.names.get(&id).copied().unwrap_or("<unregistered>");
            if let Some(state) = self.states.get_mut(&id) {
                match update {
                    Update::Replace(value) => state.assign_box(value),
                    Update::Mutate(f) => f(state.as_any_mut()),
                }
            } else if let Some(compute) = self.computes.get_mut(&id) {
                match update {
                    Update::Replace(value) => compute.assign_box(value),
                    Update::Mutate(f) => f(compute.as_any_mut()),
                }
            } else {
                log::warn!("apply_updates: dropping {update:?} for unregistered {name}");
                continue;
            }
            self.mark_dependents_dirty(id);
        }
    }

    fn mark_dependents_dirty(&mut self, id: TypeId) {
        let dependents: Vec<TypeId> = self.graph.connected(id).iter().copied().collect();
        for dependent in dependents {
            if let Some(status) = self.status.get_mut(&dependent) {
                *status = StateSyncStatus::Dirty;
            }
        }
    }
}
