//! Composite nodes: [`Sequence`] (short-circuit AND) and [`Selector`]
//! (short-circuit OR).

use crate::{Behavior, Node, Status};

/// Ticks children left to right and fails at the first failure.
pub struct Sequence<'a, C> {
    children: Vec<Node<'a, C>>,
}

impl<'a, C> Sequence<'a, C> {
    /// # Panics
    ///
    /// Panics if `children` is empty.
    pub fn new(children: Vec<Node<'a, C>>) -> Self {
        assert!(
            !children.is_empty(),
            "Sequence must have at least one child"
        );
        Self { children }
    }
}

impl<C> Behavior<C> for Sequence<'_, C> {
    fn tick(&self, ctx: &mut C) -> Status {
        for child in &self.children {
            if child.tick(ctx).is_failure() {
                return Status::Failure;
            }
        }
        Status::Success
    }
}

/// Ticks children left to right and succeeds at the first success.
pub struct Selector<'a, C> {
    children: Vec<Node<'a, C>>,
}

impl<'a, C> Selector<'a, C> {
    /// # Panics
    ///
    /// Panics if `children` is empty.
    pub fn new(children: Vec<Node<'a, C>>) -> Self {
        assert!(
            !children.is_empty(),
            "Selector must have at least one child"
        );
        Self { children }
    }
}

impl<C> Behavior<C> for Selector<'_, C> {
    fn tick(&self, ctx: &mut C) -> Status {
        for child in &self.children {
            if child.tick(ctx).is_success() {
                return Status::Success;
            }
        }
        Status::Failure
    }
}
