//! Decorator nodes.

use crate::{Behavior, Node, Status};

/// Re-ticks its child until the child fails or `limit` ticks have run.
///
/// Succeeds if at least one tick succeeded, so an AI turn in which the
/// actor could do nothing at all reads as a failure.
pub struct Repeat<'a, C> {
    child: Node<'a, C>,
    limit: u32,
}

impl<'a, C> Repeat<'a, C> {
    pub fn new(child: Node<'a, C>, limit: u32) -> Self {
        Self { child, limit }
    }
}

impl<C> Behavior<C> for Repeat<'_, C> {
    fn tick(&self, ctx: &mut C) -> Status {
        let mut acted = false;
        for _ in 0..self.limit {
            if self.child.tick(ctx).is_failure() {
                break;
            }
            acted = true;
        }
        Status::from(acted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(ctx: &mut u32) -> Status {
        if *ctx == 0 {
            return Status::Failure;
        }
        *ctx -= 1;
        Status::Success
    }

    #[test]
    fn repeats_until_the_child_fails() {
        let repeat: Repeat<'_, u32> = Repeat::new(Box::new(step), 10);
        let mut ap = 3;
        assert_eq!(repeat.tick(&mut ap), Status::Success);
        assert_eq!(ap, 0);
    }

    #[test]
    fn stops_at_the_limit() {
        let repeat: Repeat<'_, u32> = Repeat::new(Box::new(step), 2);
        let mut ap = 5;
        assert_eq!(repeat.tick(&mut ap), Status::Success);
        assert_eq!(ap, 3);
    }

    #[test]
    fn fails_when_nothing_could_be_done() {
        let exhausted: Repeat<'_, u32> = Repeat::new(Box::new(step), 4);
        assert_eq!(exhausted.tick(&mut 0), Status::Failure);
        let idle: Repeat<'_, u32> = Repeat::new(Box::new(step), 0);
        let mut ap = 9;
        assert_eq!(idle.tick(&mut ap), Status::Failure);
        assert_eq!(ap, 9);
    }
}
