//! The node trait.

use crate::Status;

/// A node evaluated against a blackboard `C`.
///
/// Nodes may read and write the blackboard, e.g. a target-finding condition
/// stores the target for the action that follows it.
pub trait Behavior<C>: Send + Sync {
    fn tick(&self, ctx: &mut C) -> Status;
}

/// Boxed node living at most as long as `'a`, so blackboards that borrow
/// state can still be stored behind trait objects.
pub type Node<'a, C> = Box<dyn Behavior<C> + 'a>;

/// Leaf nodes are usually plain functions over the blackboard.
impl<C, F> Behavior<C> for F
where
    F: Fn(&mut C) -> Status + Send + Sync,
{
    #[inline]
    fn tick(&self, ctx: &mut C) -> Status {
        self(ctx)
    }
}
