#![allow(missing_docs)]

//! Catalog of operators, weapons, skins and categories.
//!
//! The three feeds land independently, so every part of the catalog may still
//! be empty while the user is already interacting with the wizard.

/// Feed record shaping.
pub mod index;
/// Per-category price table and rounding.
pub mod pricing;

use chrono::{DateTime, Utc};
use rand::Rng;

use crate::models::{Category, CategoryId, Operator, Skin, Team, Weapon};

pub use index::{normalize_operators, RawOperator, RawRef, RawSkin, SkinIndex};
pub use pricing::{price_range, round_to_nearest_multiple, PriceRange};

/// Everything loaded from the remote feeds.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    operators: Vec<Operator>,
    skins: SkinIndex,
    names: Vec<String>,
    operators_loaded_at: Option<DateTime<Utc>>,
    skins_loaded_at: Option<DateTime<Utc>>,
    names_loaded_at: Option<DateTime<Utc>>,
}

impl Catalog {
    /// Build a complete catalog from already-fetched records.
    pub fn build<R: Rng + ?Sized>(
        operators: Vec<RawOperator>,
        skins: Vec<RawSkin>,
        excluded_prefixes: &[String],
        rng: &mut R,
    ) -> Self {
        let mut catalog = Catalog::default();
        catalog.set_operators(normalize_operators(operators));
        catalog.set_skin_index(SkinIndex::build(skins, excluded_prefixes, rng));
        catalog
    }

    /// Replace the operator list.
    pub fn set_operators(&mut self, operators: Vec<Operator>) {
        self.operators = operators;
        self.operators_loaded_at = Some(Utc::now());
    }

    /// Replace the weapon/skin index.
    pub fn set_skin_index(&mut self, skins: SkinIndex) {
        self.skins = skins;
        self.skins_loaded_at = Some(Utc::now());
    }

    /// Replace the teammate name pool.
    pub fn set_names(&mut self, names: Vec<String>) {
        self.names = names;
        self.names_loaded_at = Some(Utc::now());
    }

    pub fn operators(&self) -> &[Operator] {
        &self.operators
    }

    /// Operators playing for `team`, in feed order.
    pub fn operators_for(&self, team: Team) -> Vec<&Operator> {
        self.operators.iter().filter(|op| op.team == team).collect()
    }

    pub fn operator(&self, id: &str) -> Option<&Operator> {
        self.operators.iter().find(|op| op.id == id)
    }

    pub fn weapon(&self, id: &str) -> Option<&Weapon> {
        self.skins.weapons.get(id)
    }

    pub fn skin(&self, id: &str) -> Option<&Skin> {
        self.skins.skins.get(id)
    }

    pub fn category(&self, id: &str) -> Option<&Category> {
        self.skins.categories.get(id)
    }

    /// Categories in first-seen order.
    pub fn categories(&self) -> impl Iterator<Item = &Category> + '_ {
        self.skins
            .category_order
            .iter()
            .filter_map(|id| self.skins.categories.get(id))
    }

    pub fn category_ids(&self) -> &[CategoryId] {
        &self.skins.category_order
    }

    /// Weapons of a category in first-seen order.
    pub fn weapons_in(&self, category_id: &str) -> Vec<&Weapon> {
        self.skins
            .weapons_by_category
            .get(category_id)
            .map(|ids| ids.iter().filter_map(|id| self.weapon(id)).collect())
            .unwrap_or_default()
    }

    /// Weapons of a category usable by `team`; all of them when no team is set.
    pub fn visible_weapons(&self, category_id: &str, team: Option<Team>) -> Vec<&Weapon> {
        self.weapons_in(category_id)
            .into_iter()
            .filter(|weapon| weapon.team.admits(team))
            .collect()
    }

    /// Skins of a weapon in feed order.
    pub fn skins_of(&self, weapon_id: &str) -> Vec<&Skin> {
        self.weapon(weapon_id)
            .map(|weapon| weapon.skins.iter().filter_map(|id| self.skin(id)).collect())
            .unwrap_or_default()
    }

    /// Price of the weapon owning `skin_id`.
    pub fn skin_price(&self, skin_id: &str) -> Option<u32> {
        let skin = self.skin(skin_id)?;
        self.weapon(&skin.weapon_id).map(|weapon| weapon.price)
    }

    /// Category of the weapon owning `skin_id`.
    pub fn skin_category(&self, skin_id: &str) -> Option<&CategoryId> {
        let skin = self.skin(skin_id)?;
        self.weapon(&skin.weapon_id)
            .map(|weapon| &weapon.category_id)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn has_operators(&self) -> bool {
        self.operators_loaded_at.is_some()
    }

    pub fn has_skins(&self) -> bool {
        self.skins_loaded_at.is_some()
    }

    pub fn has_names(&self) -> bool {
        self.names_loaded_at.is_some()
    }

    /// Most recent load timestamp of any feed.
    pub fn last_loaded_at(&self) -> Option<DateTime<Utc>> {
        [
            self.operators_loaded_at,
            self.skins_loaded_at,
            self.names_loaded_at,
        ]
        .into_iter()
        .flatten()
        .max()
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::{self, KNIVES, PISTOLS};
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn visible_weapons_follow_team() {
        let catalog = fixtures::catalog();
        let ids = |team| {
            catalog
                .visible_weapons(PISTOLS, team)
                .into_iter()
                .map(|weapon| weapon.id.clone())
                .collect::<Vec<_>>()
        };
        assert_eq!(ids(None), vec!["glock", "usp", "p250"]);
        assert_eq!(ids(Some(Team::Terrorist)), vec!["glock", "p250"]);
        assert_eq!(ids(Some(Team::CounterTerrorist)), vec!["usp", "p250"]);
    }

    #[test]
    fn skin_lookups_resolve_weapon_data() {
        let catalog = fixtures::catalog();
        assert_eq!(catalog.skin_price("glock-dragon"), Some(650));
        assert_eq!(
            catalog.skin_category("bayonet-fade").map(String::as_str),
            Some(KNIVES)
        );
        assert_eq!(catalog.skin_price("missing"), None);
        assert_eq!(catalog.skins_of("ak47").len(), 2);
        assert_eq!(catalog.operators_for(Team::Terrorist).len(), 2);
    }

    #[test]
    fn empty_catalog_reports_nothing_loaded() {
        let catalog = Catalog::default();
        assert!(!catalog.has_operators());
        assert!(!catalog.has_skins());
        assert!(catalog.last_loaded_at().is_none());
        assert!(catalog.weapons_in(PISTOLS).is_empty());
    }

    #[test]
    fn builds_from_raw_records() {
        let operators = vec![RawOperator {
            id: "agent".to_string(),
            name: "Agent | Squad".to_string(),
            image: None,
            team: Some(RawRef {
                id: Some("counter-terrorists".to_string()),
                name: None,
            }),
        }];
        let skins = vec![RawSkin {
            id: "skin".to_string(),
            name: "Deagle | Blaze".to_string(),
            image: None,
            weapon: Some(RawRef {
                id: Some("weapon_deagle".to_string()),
                name: Some("Desert Eagle".to_string()),
            }),
            category: Some(RawRef {
                id: Some("csgo_inventory_weapon_category_pistols".to_string()),
                name: Some("Pistols".to_string()),
            }),
            team: Some(RawRef {
                id: Some("both".to_string()),
                name: None,
            }),
        }];
        let mut rng = StdRng::seed_from_u64(5);
        let catalog = Catalog::build(operators, skins, &[], &mut rng);
        assert_eq!(catalog.operators()[0].name, "Agent");
        assert_eq!(catalog.skin("skin").map(|s| s.name.as_str()), Some("Blaze"));
        assert!(catalog.has_operators() && catalog.has_skins());
        assert!(!catalog.has_names());
    }
}
