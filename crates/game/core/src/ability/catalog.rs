//! Registry of ability definitions.
//!
//! Constructed once at startup (usually by the content loader), read-only
//! afterwards, and passed explicitly to the slot manager, resolution engine
//! and scheduler.

use std::collections::BTreeMap;
use std::str::FromStr;

use super::definition::{
    AbilityDefinition, AbilityDraft, AbilityScaling, AbilityTags, AbilityType, EffectKind,
    EffectSpec,
};
use super::error::RegistrationError;
use crate::scaling::ScalingMode;
use crate::state::{AbilityKey, Entity};

/// An ability the entity can unlock, annotated with its effective numbers.
#[derive(Clone, Debug, PartialEq)]
pub struct UnlockedAbility<'a> {
    pub definition: &'a AbilityDefinition,
    pub success_rate: f64,
    pub ap_cost: u32,
    pub range: u32,
}

#[derive(Clone, Debug, Default)]
pub struct AbilityCatalog {
    /// Registration order; ties in content-driven ordering keep it.
    abilities: Vec<AbilityDefinition>,
    index: BTreeMap<AbilityKey, usize>,
}

impl AbilityCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates `draft` and stores it under `key`.
    ///
    /// Required: name, description, type, category, base success rate.
    /// Every optional field gets its default (cost/range/cooldown 0, no
    /// target, empty lists).
    pub fn register(
        &mut self,
        key: impl Into<AbilityKey>,
        draft: AbilityDraft,
    ) -> Result<&AbilityDefinition, RegistrationError> {
        let key = key.into();
        if self.index.contains_key(&key) {
            return Err(RegistrationError::Duplicate(key));
        }
        let definition = validate(key, draft)?;
        let position = self.abilities.len();
        self.index.insert(definition.key.clone(), position);
        self.abilities.push(definition);
        Ok(&self.abilities[position])
    }

    pub fn get(&self, key: &str) -> Option<&AbilityDefinition> {
        self.index.get(key).map(|&i| &self.abilities[i])
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Position in registration order.
    pub fn order_of(&self, key: &str) -> Option<usize> {
        self.index.get(key).copied()
    }

    pub fn meets_skill_requirements(&self, entity: &Entity, key: &str) -> bool {
        self.get(key)
            .is_some_and(|def| def.meets_skill_requirements(entity))
    }

    /// Prerequisites are satisfied only by the entity's recorded set of
    /// previously unlocked abilities.
    pub fn meets_prerequisites(&self, entity: &Entity, key: &str) -> bool {
        self.get(key).is_some_and(|def| def.meets_prerequisites(entity))
    }

    pub fn is_unlockable(&self, entity: &Entity, key: &str) -> bool {
        self.meets_skill_requirements(entity, key) && self.meets_prerequisites(entity, key)
    }

    pub fn calculate_success_rate(&self, entity: &Entity, key: &str) -> Option<f64> {
        self.get(key).map(|def| def.success_rate_for(entity))
    }

    pub fn calculate_ap_cost(&self, entity: &Entity, key: &str) -> Option<u32> {
        self.get(key).map(|def| def.ap_cost_for(entity))
    }

    pub fn calculate_range(&self, entity: &Entity, key: &str) -> Option<u32> {
        self.get(key).map(|def| def.range_for(entity))
    }

    /// Every entry whose skill requirements and prerequisites `entity` meets,
    /// in registration order.
    pub fn unlocked_abilities(&self, entity: &Entity) -> Vec<UnlockedAbility<'_>> {
        self.abilities
            .iter()
            .filter(|def| def.meets_skill_requirements(entity) && def.meets_prerequisites(entity))
            .map(|def| UnlockedAbility {
                definition: def,
                success_rate: def.success_rate_for(entity),
                ap_cost: def.ap_cost_for(entity),
                range: def.range_for(entity),
            })
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AbilityDefinition> {
        self.abilities.iter()
    }

    pub fn len(&self) -> usize {
        self.abilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.abilities.is_empty()
    }
}

fn validate(key: AbilityKey, draft: AbilityDraft) -> Result<AbilityDefinition, RegistrationError> {
    let missing = |field| RegistrationError::MissingField {
        key: key.clone(),
        field,
    };

    let name = draft.name.ok_or_else(|| missing("name"))?;
    let description = draft.description.ok_or_else(|| missing("description"))?;
    let raw_type = draft.ability_type.ok_or_else(|| missing("type"))?;
    let category = draft.category.ok_or_else(|| missing("category"))?;
    let base_success_rate = draft
        .base_success_rate
        .ok_or_else(|| missing("base_success_rate"))?;

    let ability_type =
        AbilityType::from_str(&raw_type).map_err(|_| RegistrationError::InvalidType {
            key: key.clone(),
            value: raw_type.clone(),
        })?;

    let mut effects = BTreeMap::new();
    for (effect_name, effect) in draft.effects.unwrap_or_default() {
        let kind =
            EffectKind::from_str(&effect_name).map_err(|_| RegistrationError::UnknownEffect {
                key: key.clone(),
                effect: effect_name.clone(),
            })?;
        let scaling = match effect.scaling.as_deref() {
            None => ScalingMode::None,
            Some(raw) => {
                ScalingMode::from_str(raw).map_err(|_| RegistrationError::UnknownScaling {
                    key: key.clone(),
                    effect: effect_name.clone(),
                    scaling: raw.to_owned(),
                })?
            }
        };
        effects.insert(kind, EffectSpec::new(effect.base, scaling));
    }

    let scaling = draft.scaling.unwrap_or_else(AbilityScaling::default);
    if let Some(step) = scaling
        .ap_reduction
        .iter()
        .chain(scaling.range_increase.iter())
        .find(|s| s.levels_per == 0)
    {
        return Err(RegistrationError::ZeroStep {
            key,
            skill: step.skill.clone(),
        });
    }

    let mut tags = AbilityTags::empty();
    for tag in draft.tags.unwrap_or_default() {
        let flag = AbilityTags::parse_tag(&tag).ok_or_else(|| RegistrationError::UnknownTag {
            key: key.clone(),
            tag: tag.clone(),
        })?;
        tags |= flag;
    }

    Ok(AbilityDefinition {
        key,
        name,
        description,
        ability_type,
        category,
        ap_cost: draft.ap_cost.unwrap_or(0),
        range: draft.range.unwrap_or(0),
        cooldown: draft.cooldown.unwrap_or(0),
        requires_target: draft.requires_target.unwrap_or(false),
        requirements: draft.requirements.unwrap_or_default(),
        prerequisites: draft.prerequisites.unwrap_or_default(),
        base_success_rate,
        effects,
        scaling,
        inflicts: draft.inflicts.unwrap_or_default(),
        tags,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GameError;
    use crate::progression::SkillProgressionTracker;
    use crate::state::EntityId;

    fn catalog() -> AbilityCatalog {
        let mut catalog = AbilityCatalog::new();
        catalog
            .register(
                "lunge",
                AbilityDraft::new("Lunge", AbilityType::Active, "combat", -10.0)
                    .ap_cost(2)
                    .range(1)
                    .requirement("one_handed", 3)
                    .effectiveness("one_handed", 3.0)
                    .ap_reduction("one_handed", 10, 1)
                    .range_increase("one_handed", 5, 1)
                    .effect("damage", 2.0, ScalingMode::Weapon),
            )
            .unwrap();
        catalog
            .register(
                "riposte",
                AbilityDraft::new("Riposte", AbilityType::Active, "combat", 50.0)
                    .ap_cost(1)
                    .prerequisite("lunge"),
            )
            .unwrap();
        catalog
    }

    fn fighter(one_handed: u32) -> Entity {
        let tracker = SkillProgressionTracker::new(["one_handed", "toughness"]);
        let mut entity = Entity::player(EntityId(1), "fighter");
        tracker.initialize(&mut entity);
        tracker
            .bulk_advance(&mut entity, "one_handed", one_handed)
            .unwrap();
        entity
    }

    #[test]
    fn defaults_fill_optional_fields() {
        let mut catalog = AbilityCatalog::new();
        let def = catalog
            .register(
                "ponder",
                AbilityDraft::new("Ponder", AbilityType::Passive, "utility", 100.0),
            )
            .unwrap();
        assert_eq!(def.ap_cost, 0);
        assert_eq!(def.range, 0);
        assert_eq!(def.cooldown, 0);
        assert!(!def.requires_target);
        assert!(def.requirements.is_empty());
        assert!(def.prerequisites.is_empty());
        assert!(def.effects.is_empty());
        assert_eq!(def.scaling, AbilityScaling::default());
        assert!(def.inflicts.is_empty());
        assert!(def.tags.is_empty());
    }

    #[test]
    fn missing_required_field_is_rejected() {
        let mut catalog = AbilityCatalog::new();
        let mut draft = AbilityDraft::new("Nameless", AbilityType::Active, "combat", 50.0);
        draft.description = None;
        let err = catalog.register("nameless", draft).unwrap_err();
        assert_eq!(
            err,
            RegistrationError::MissingField {
                key: "nameless".into(),
                field: "description"
            }
        );
        assert_eq!(err.error_code(), "ABILITY_MISSING_FIELD");
        assert!(catalog.is_empty());
    }

    #[test]
    fn invalid_type_and_effect_names_are_rejected() {
        let mut catalog = AbilityCatalog::new();
        let mut draft = AbilityDraft::new("Odd", AbilityType::Active, "combat", 50.0);
        draft.ability_type = Some("reactive".into());
        assert!(matches!(
            catalog.register("odd", draft),
            Err(RegistrationError::InvalidType { .. })
        ));

        let typo = AbilityDraft::new("Typo", AbilityType::Active, "combat", 50.0).effect(
            "damge",
            1.0,
            ScalingMode::None,
        );
        assert!(matches!(
            catalog.register("typo", typo),
            Err(RegistrationError::UnknownEffect { .. })
        ));

        let mut bad_scaling = AbilityDraft::new("Bad", AbilityType::Active, "combat", 50.0);
        bad_scaling.effects = Some(BTreeMap::from([(
            "damage".to_owned(),
            crate::ability::EffectDraft {
                base: 1.0,
                scaling: Some("weapn".into()),
            },
        )]));
        assert!(matches!(
            catalog.register("bad", bad_scaling),
            Err(RegistrationError::UnknownScaling { .. })
        ));
    }

    #[test]
    fn duplicate_keys_are_rejected() {
        let mut catalog = catalog();
        let err = catalog
            .register(
                "lunge",
                AbilityDraft::new("Lunge", AbilityType::Active, "combat", 0.0),
            )
            .unwrap_err();
        assert_eq!(err, RegistrationError::Duplicate("lunge".into()));
    }

    #[test]
    fn success_rate_is_clamped_at_both_ends() {
        let catalog = catalog();
        // -10 + 5 × 3 = 5
        assert_eq!(catalog.calculate_success_rate(&fighter(5), "lunge"), Some(5.0));
        // -10 + 0 clamps to the floor
        assert_eq!(catalog.calculate_success_rate(&fighter(0), "lunge"), Some(5.0));
        // -10 + 100 × 3 clamps to the ceiling
        assert_eq!(catalog.calculate_success_rate(&fighter(100), "lunge"), Some(95.0));
        // -10 + 20 × 3 = 50
        assert_eq!(catalog.calculate_success_rate(&fighter(20), "lunge"), Some(50.0));
    }

    #[test]
    fn ap_cost_and_range_follow_step_tables() {
        let catalog = catalog();
        assert_eq!(catalog.calculate_ap_cost(&fighter(9), "lunge"), Some(2));
        assert_eq!(catalog.calculate_ap_cost(&fighter(10), "lunge"), Some(1));
        // Floored at 1 for abilities that cost anything
        assert_eq!(catalog.calculate_ap_cost(&fighter(40), "lunge"), Some(1));
        assert_eq!(catalog.calculate_range(&fighter(4), "lunge"), Some(1));
        assert_eq!(catalog.calculate_range(&fighter(12), "lunge"), Some(3));
    }

    #[test]
    fn oversized_step_tables_saturate() {
        let mut catalog = AbilityCatalog::new();
        catalog
            .register(
                "blink",
                AbilityDraft::new("Blink", AbilityType::Active, "mobility", 100.0)
                    .ap_cost(3)
                    .range(u32::MAX - 1)
                    .ap_reduction("one_handed", 1, u32::MAX)
                    .ap_reduction("toughness", 1, 1)
                    .range_increase("one_handed", 1, u32::MAX)
                    .range_increase("one_handed", 2, u32::MAX),
            )
            .unwrap();
        let veteran = fighter(50);
        assert_eq!(catalog.calculate_range(&veteran, "blink"), Some(u32::MAX));
        assert_eq!(catalog.calculate_ap_cost(&veteran, "blink"), Some(1));
    }

    #[test]
    fn unlocks_need_requirements_and_prerequisites() {
        let catalog = catalog();
        let mut novice = fighter(2);
        assert!(catalog.unlocked_abilities(&novice).is_empty());

        let adept = fighter(3);
        let unlocked = catalog.unlocked_abilities(&adept);
        assert_eq!(unlocked.len(), 1);
        assert_eq!(unlocked[0].definition.key, "lunge");
        assert_eq!(unlocked[0].ap_cost, 2);

        novice.unlocked_abilities.insert("lunge".into());
        assert!(catalog.meets_prerequisites(&novice, "riposte"));
        assert!(!catalog.meets_skill_requirements(&novice, "lunge"));
    }
}
