//! Reactive state store for the data grid.
//!
//! - [`State`]: plain data owned by the [`StateCtx`]
//! - [`Compute`]: derived data, recomputed when its dependencies change
//! - [`Command`]: manual actions that write through an [`Updater`]
//! - [`Time`], [`Delay`], [`Debounce`]: frame clock and the timers polled against it

mod command;
mod compute;
mod ctx;
mod dep;
mod error;
mod graph;
mod runtime;
mod state;
mod state_sync_status;
mod time;
mod timer;

pub use command::Command;
pub use compute::{Compute, ComputeDeps, assign_impl};
pub use ctx::StateCtx;
pub use dep::Dep;
pub use error::Error;
pub use graph::{DepRoute, Graph, TopologyError};
pub use runtime::Updater;
pub use state::{State, state_assign_impl};
pub use state_sync_status::StateSyncStatus;
pub use time::Time;
pub use timer::{Debounce, Delay};

pub use tokio_util::sync::CancellationToken;

#[cfg(test)]
mod state_ctx_tests {
    use std::any::Any;

    use super::*;

    #[derive(Debug, Default, Clone)]
    struct Numbers {
        values: Vec<i32>,
    }

    impl State for Numbers {
        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }

        fn assign_box(&mut self, new_self: Box<dyn Any + Send>) {
            state_assign_impl(self, new_self);
        }
    }

    #[derive(Debug, Default, Clone)]
    struct Sum {
        total: i32,
    }

    impl Compute for Sum {
        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }

        fn deps(&self) -> ComputeDeps {
            ComputeDeps::new().state::<Numbers>()
        }

        fn compute(&self, deps: Dep<'_>, updater: Updater) {
            let numbers = deps.get_state_ref::<Numbers>();
            updater.set(Sum {
                total: numbers.values.iter().sum(),
            });
        }

        fn assign_box(&mut self, new_self: Box<dyn Any + Send>) {
            assign_impl(self, new_self);
        }
    }

    #[derive(Debug, Default, Clone)]
    struct DoubledSum {
        total: i32,
    }

    impl Compute for DoubledSum {
        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }

        fn deps(&self) -> ComputeDeps {
            ComputeDeps::new().compute::<Sum>()
        }

        fn compute(&self, deps: Dep<'_>, updater: Updater) {
            let sum = deps.get_compute_ref::<Sum>();
            updater.set(DoubledSum {
                total: sum.total * 2,
            });
        }

        fn assign_box(&mut self, new_self: Box<dyn Any + Send>) {
            assign_impl(self, new_self);
        }
    }

    #[derive(Debug, Default)]
    struct PushSevenCommand;

    impl Command for PushSevenCommand {
        fn run(&self, _deps: Dep<'_>, updater: Updater) {
            updater.mutate::<Numbers>(|numbers| numbers.values.push(7));
        }
    }

    fn setup_ctx() -> StateCtx {
        let mut ctx = StateCtx::new();
        ctx.add_state(Numbers {
            values: vec![1, 2, 3],
        });
        // Recorded out of dependency order on purpose
        ctx.record_compute(DoubledSum::default());
        ctx.record_compute(Sum::default());
        ctx.record_command(PushSevenCommand);
        ctx
    }

    #[test]
    fn computes_run_in_dependency_order() {
        let mut ctx = setup_ctx();
        ctx.sync_computes();

        assert_eq!(ctx.cached::<Sum>().map(|s| s.total), Some(6));
        assert_eq!(ctx.cached::<DoubledSum>().map(|s| s.total), Some(12));
        assert_eq!(ctx.status_of::<DoubledSum>(), StateSyncStatus::Clean);
    }

    #[test]
    fn update_marks_dependents_dirty() {
        let mut ctx = setup_ctx();
        ctx.sync_computes();

        ctx.update::<Numbers>(|numbers| numbers.values.push(4));
        assert_eq!(ctx.status_of::<Sum>(), StateSyncStatus::Dirty);
        assert_eq!(ctx.status_of::<DoubledSum>(), StateSyncStatus::Dirty);

        ctx.sync_computes();
        assert_eq!(ctx.cached::<DoubledSum>().map(|s| s.total), Some(20));
    }

    #[test]
    fn dispatch_applies_command_writes() {
        let mut ctx = setup_ctx();
        ctx.dispatch::<PushSevenCommand>();

        assert_eq!(ctx.state::<Numbers>().values, vec![1, 2, 3, 7]);
        assert_eq!(ctx.cached::<Sum>().map(|s| s.total), Some(13));
    }

    #[test]
    fn enqueued_commands_run_on_flush() {
        let mut ctx = setup_ctx();
        ctx.enqueue_command::<PushSevenCommand>();
        ctx.enqueue_command::<PushSevenCommand>();
        assert_eq!(ctx.state::<Numbers>().values.len(), 3);

        ctx.flush_commands();
        assert_eq!(ctx.state::<Numbers>().values, vec![1, 2, 3, 7, 7]);
    }

    #[test]
    fn unregistered_command_is_an_error() {
        let mut ctx = StateCtx::new();
        let err = ctx
            .try_dispatch::<PushSevenCommand>()
            .expect_err("command was never recorded");
        assert!(err.to_string().contains("Command not found"));
    }

    #[test]
    fn missing_state_is_reported() {
        let ctx = StateCtx::new();
        assert!(ctx.try_state::<Numbers>().is_err());
        assert!(ctx.cached::<Sum>().is_none());
    }

    #[test]
    fn verify_deps_accepts_acyclic_graph() {
        let ctx = setup_ctx();
        assert!(ctx.verify_deps().is_ok());
    }
}
