//! Result of ticking a node.

/// Outcome of one tick. Conditions report whether they hold, actions
/// whether they could be carried out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Success,
    Failure,
}

impl Status {
    #[inline]
    pub fn is_success(self) -> bool {
        matches!(self, Status::Success)
    }

    #[inline]
    pub fn is_failure(self) -> bool {
        matches!(self, Status::Failure)
    }
}

impl From<bool> for Status {
    #[inline]
    fn from(holds: bool) -> Self {
        if holds { Status::Success } else { Status::Failure }
    }
}
