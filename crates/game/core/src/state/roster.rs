use super::{Entity, EntityId, Position, Side};

/// Owned collection of the entities taking part in an encounter.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Roster {
    entities: Vec<Entity>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entity. Panics if the id is already present.
    pub fn insert(&mut self, entity: Entity) {
        assert!(
            self.get(entity.id).is_none(),
            "entity {} is already in the roster",
            entity.id
        );
        self.entities.push(entity);
    }

    pub fn remove(&mut self, id: EntityId) -> Option<Entity> {
        let index = self.entities.iter().position(|e| e.id == id)?;
        Some(self.entities.remove(index))
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    /// Mutable access to two distinct entities at once (actor and target).
    ///
    /// Returns `None` if either id is missing or both ids are equal.
    pub fn pair_mut(&mut self, a: EntityId, b: EntityId) -> Option<(&mut Entity, &mut Entity)> {
        if a == b {
            return None;
        }
        let ia = self.entities.iter().position(|e| e.id == a)?;
        let ib = self.entities.iter().position(|e| e.id == b)?;
        if ia < ib {
            let (left, right) = self.entities.split_at_mut(ib);
            Some((&mut left[ia], &mut right[0]))
        } else {
            let (left, right) = self.entities.split_at_mut(ia);
            Some((&mut right[0], &mut left[ib]))
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.entities.iter_mut()
    }

    pub fn living(&self, side: Side) -> impl Iterator<Item = &Entity> {
        self.entities
            .iter()
            .filter(move |e| e.alive && e.side == side)
    }

    pub fn living_count(&self, side: Side) -> usize {
        self.living(side).count()
    }

    /// True if a living entity other than `except` stands on `position`.
    pub fn is_occupied(&self, position: Position, except: Option<EntityId>) -> bool {
        self.entities
            .iter()
            .any(|e| e.alive && e.position == position && Some(e.id) != except)
    }

    /// Removes every entity on `side`, returning them in insertion order.
    pub fn drain_side(&mut self, side: Side) -> Vec<Entity> {
        let (taken, kept): (Vec<Entity>, Vec<Entity>) =
            std::mem::take(&mut self.entities)
                .into_iter()
                .partition(|e| e.side == side);
        self.entities = kept;
        taken
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{EnemyProfile, EnemyRole};

    fn roster() -> Roster {
        let mut roster = Roster::new();
        roster.insert(Entity::player(EntityId(1), "hero"));
        roster.insert(Entity::enemy(
            EntityId(2),
            "goblin",
            EnemyProfile {
                tier: 1,
                role: EnemyRole::Skirmisher,
            },
        ));
        roster
    }

    #[test]
    fn pair_mut_returns_requested_order() {
        let mut roster = roster();
        let (a, b) = roster.pair_mut(EntityId(2), EntityId(1)).unwrap();
        assert_eq!(a.id, EntityId(2));
        assert_eq!(b.id, EntityId(1));
        assert!(roster.pair_mut(EntityId(1), EntityId(1)).is_none());
        assert!(roster.pair_mut(EntityId(1), EntityId(9)).is_none());
    }

    #[test]
    fn drain_side_keeps_the_other_side() {
        let mut roster = roster();
        let enemies = roster.drain_side(Side::Enemy);
        assert_eq!(enemies.len(), 1);
        assert_eq!(roster.len(), 1);
        assert_eq!(roster.living_count(Side::Player), 1);
    }

    #[test]
    #[should_panic(expected = "already in the roster")]
    fn duplicate_ids_are_rejected() {
        let mut roster = roster();
        roster.insert(Entity::player(EntityId(1), "clone"));
    }
}
