use std::any::{Any, TypeId, type_name};

use flume::{Receiver, Sender};

type Mutation = Box<dyn FnOnce(&mut dyn Any) + Send>;

/// A pending write produced by a compute or a command.
pub(crate) enum Update {
    Replace(Box<dyn Any + Send>),
    Mutate(Mutation),
}

/// Write handle passed to computes and commands.
///
/// Writes are queued on a channel owned by the [`StateCtx`](crate::StateCtx)
/// and applied when the context syncs.
#[derive(Clone)]
pub struct Updater {
    send: Sender<(TypeId, Update)>,
}

impl Updater {
    /// Replace the stored value of type `T`.
    pub fn set<T: Any + Send>(&self, value: T) {
        self.push(TypeId::of::<T>(), Update::Replace(Box::new(value)), type_name::<T>());
    }

    /// Mutate the stored value of type `T` in place.
    pub fn mutate<T: Any>(&self, f: impl FnOnce(&mut T) + Send + 'static) {
        let mutation: Mutation = Box::new(move |any: &mut dyn Any| {
            if let Some(target) = any.downcast_mut::<T>() {
                f(target);
            }
        });
        self.push(TypeId::of::<T>(), Update::Mutate(mutation), type_name::<T>());
    }

    fn push(&self, id: TypeId, update: Update, name: &str) {
        if self.send.send((id, update)).is_err() {
            log::warn!("Updater: context dropped, discarding update for {name}");
        }
    }
}

impl std::fmt::Debug for Updater {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Updater")
            .field("pending", &self.send.len())
            .finish()
    }
}

/// Channel pair behind every [`Updater`] handed out by one context.
#[derive(Debug)]
pub(crate) struct StateRuntime {
    send: Sender<(TypeId, Update)>,
    recv: Receiver<(TypeId, Update)>,
}

impl Default for StateRuntime {
    fn default() -> Self {
        Self::new()
    }
}

impl StateRuntime {
    pub fn new() -> Self {
        let (send, recv) = flume::unbounded();
        Self { send, recv }
    }

    pub fn updater(&self) -> Updater {
        Updater {
            send: self.send.clone(),
        }
    }

    pub fn drain(&self) -> Vec<(TypeId, Update)> {
        self.recv.try_iter().collect()
    }
}

impl std::fmt::Debug for Update {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Update::Replace(_) => f.write_str("Replace"),
            Update::Mutate(_) => f.write_str("Mutate"),
        }
    }
}
