use std::any::{Any, type_name};

/// A piece of application state stored in [`StateCtx`](crate::StateCtx).
///
/// States are plain data. They are mutated either directly through
/// `StateCtx::update` or by commands through an [`Updater`](crate::Updater).
/// Every mutation marks the computes depending on the state as dirty.
pub trait State: Any {
    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Replace `self` with a boxed value of the same type.
    fn assign_box(&mut self, new_self: Box<dyn Any + Send>);
}

/// Shared `assign_box` body for states.
pub fn state_assign_impl<T: State>(target: &mut T, new_self: Box<dyn Any + Send>) {
    match new_self.downcast::<T>() {
        Ok(value) => *target = *value,
        Err(_) => log::warn!(
            "state_assign_impl: ignored value of wrong type for {}",
            type_name::<T>()
        ),
    }
}
