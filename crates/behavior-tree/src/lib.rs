//! Behavior trees for turn-based AI.
//!
//! Every tick resolves immediately: a node either succeeds or fails, and
//! there is no running state to resume on a later frame. Trees are generic
//! over the blackboard type `C`, which may borrow game state for the
//! duration of one turn.
//!
//! - [`Behavior`]: the node trait, also implemented by plain functions
//! - [`Sequence`] and [`Selector`]: AND and OR composites
//! - [`Repeat`]: re-ticks a child until it fails or a step budget runs out

pub mod behavior;
pub mod composite;
pub mod decorator;
pub mod status;

pub use behavior::{Behavior, Node};
pub use composite::{Selector, Sequence};
pub use decorator::Repeat;
pub use status::Status;
