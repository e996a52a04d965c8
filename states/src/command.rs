use std::any::Any;

use crate::{Dep, Updater};

/// A manual-only action dispatched through `StateCtx::dispatch`.
///
/// Commands read what they need from [`Dep`] and write back through the
/// [`Updater`], either by replacing a value (`set`) or mutating it in place
/// (`mutate`). Writes are applied right after `run` returns.
pub trait Command: Any {
    fn run(&self, deps: Dep<'_>, updater: Updater);
}
