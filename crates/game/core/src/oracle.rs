//! Map knowledge the combat rules borrow from the host.

/// Answers whether a cell is inside the room and walkable.
///
/// Occupancy by other combatants is checked by the rules themselves against
/// the roster; the oracle only knows geometry.
pub trait PositionOracle {
    fn is_valid_position(&self, x: i32, y: i32) -> bool;
}

impl<F> PositionOracle for F
where
    F: Fn(i32, i32) -> bool,
{
    fn is_valid_position(&self, x: i32, y: i32) -> bool {
        self(x, y)
    }
}

/// Unbounded open ground: every cell is valid.
#[derive(Clone, Copy, Debug, Default)]
pub struct OpenField;

impl PositionOracle for OpenField {
    fn is_valid_position(&self, _x: i32, _y: i32) -> bool {
        true
    }
}

/// Rectangular room `[0, width) × [0, height)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoomBounds {
    pub width: i32,
    pub height: i32,
}

impl PositionOracle for RoomBounds {
    fn is_valid_position(&self, x: i32, y: i32) -> bool {
        (0..self.width).contains(&x) && (0..self.height).contains(&y)
    }
}
