//! Shaping raw feed records into the catalog index.

use std::collections::{HashMap, HashSet};

use rand::Rng;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::models::{
    Category, CategoryId, Operator, Skin, SkinId, Team, TeamAffiliation, Weapon, WeaponId,
};

use super::pricing::{generate_price, price_range};

/// `{ "id": ..., "name": ... }` reference used throughout the feeds.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRef {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Agent record as served by the operators feed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawOperator {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub team: Option<RawRef>,
}

/// Skin record as served by the skins feed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSkin {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub weapon: Option<RawRef>,
    #[serde(default)]
    pub category: Option<RawRef>,
    #[serde(default)]
    pub team: Option<RawRef>,
}

/// Weapons, skins and categories derived from the skins feed.
#[derive(Debug, Clone, Default)]
pub struct SkinIndex {
    pub weapons: HashMap<WeaponId, Weapon>,
    pub skins: HashMap<SkinId, Skin>,
    pub categories: HashMap<CategoryId, Category>,
    /// Category ids in first-seen order.
    pub category_order: Vec<CategoryId>,
    /// Weapon ids per category in first-seen order, without duplicates.
    pub weapons_by_category: HashMap<CategoryId, Vec<WeaponId>>,
}

impl SkinIndex {
    /// Index the skins feed.
    ///
    /// Records without a category id, or whose weapon id starts with one of
    /// `excluded_prefixes`, are dropped. Prices are drawn once per weapon.
    pub fn build<R: Rng + ?Sized>(
        records: Vec<RawSkin>,
        excluded_prefixes: &[String],
        rng: &mut R,
    ) -> Self {
        let mut index = SkinIndex::default();
        let mut seen_in_category: HashMap<CategoryId, HashSet<WeaponId>> = HashMap::new();
        let mut dropped = 0usize;

        for raw in records {
            let Some(category_id) = raw
                .category
                .as_ref()
                .and_then(|category| category.id.clone())
                .filter(|id| !id.is_empty())
            else {
                dropped += 1;
                continue;
            };
            let Some(weapon_ref) = raw.weapon.as_ref() else {
                warn!(skin = %raw.id, "Skipping skin without weapon reference");
                continue;
            };
            let Some(weapon_id) = weapon_ref.id.clone().filter(|id| !id.is_empty()) else {
                warn!(skin = %raw.id, "Skipping skin without weapon id");
                continue;
            };
            if excluded_prefixes
                .iter()
                .any(|prefix| weapon_id.starts_with(prefix.as_str()))
            {
                dropped += 1;
                continue;
            }

            let weapon = index.weapons.entry(weapon_id.clone()).or_insert_with(|| {
                let team = TeamAffiliation::from_source_id(
                    raw.team.as_ref().and_then(|team| team.id.as_deref()),
                );
                Weapon {
                    id: weapon_id.clone(),
                    name: weapon_ref.name.clone().unwrap_or_else(|| weapon_id.clone()),
                    category_id: category_id.clone(),
                    team,
                    price: generate_price(price_range(&category_id), &mut *rng),
                    skins: Vec::new(),
                }
            });
            // A weapon keeps the category it was first seen with.
            let category_id = weapon.category_id.clone();

            if !index.categories.contains_key(&category_id) {
                let name = raw
                    .category
                    .as_ref()
                    .and_then(|category| category.name.clone())
                    .unwrap_or_else(|| category_id.clone());
                index.categories.insert(
                    category_id.clone(),
                    Category {
                        id: category_id.clone(),
                        name,
                    },
                );
                index.category_order.push(category_id.clone());
            }

            if seen_in_category
                .entry(category_id.clone())
                .or_default()
                .insert(weapon_id.clone())
            {
                index
                    .weapons_by_category
                    .entry(category_id)
                    .or_default()
                    .push(weapon_id.clone());
            }

            if index.skins.contains_key(&raw.id) {
                continue;
            }
            weapon.skins.push(raw.id.clone());
            index.skins.insert(
                raw.id.clone(),
                Skin {
                    id: raw.id,
                    name: skin_display_name(&raw.name),
                    image: raw.image,
                    weapon_id,
                },
            );
        }

        debug!(
            weapons = index.weapons.len(),
            skins = index.skins.len(),
            categories = index.categories.len(),
            dropped,
            "Indexed skins feed"
        );
        index
    }
}

/// Normalize agent records into operators. Records without a side are skipped.
pub fn normalize_operators(records: Vec<RawOperator>) -> Vec<Operator> {
    records
        .into_iter()
        .filter_map(|raw| {
            let team = raw
                .team
                .as_ref()
                .and_then(|team| team.id.as_deref())
                .and_then(Team::from_source_id);
            let Some(team) = team else {
                warn!(operator = %raw.id, "Skipping operator without a recognised team");
                return None;
            };
            Some(Operator {
                name: operator_display_name(&raw.name),
                id: raw.id,
                image: raw.image,
                team,
            })
        })
        .collect()
}

/// `"AK-47 | Redline"` becomes `"Redline"`; names without `|` are kept whole.
pub fn skin_display_name(raw: &str) -> String {
    match raw.split_once('|') {
        Some((_, name)) => name.trim().to_string(),
        None => raw.to_string(),
    }
}

/// `"Sir Bloody Darryl | The Professionals"` becomes `"Sir Bloody Darryl"`.
pub fn operator_display_name(raw: &str) -> String {
    raw.split('|').next().unwrap_or(raw).trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    const SKINS_JSON: &str = r#"[
        {"id": "skin-1", "name": "Glock-18 | Fade", "image": "glock.png",
         "weapon": {"id": "weapon_glock", "name": "Glock-18"},
         "category": {"id": "csgo_inventory_weapon_category_pistols", "name": "Pistols"},
         "team": {"id": "terrorists", "name": "Terrorist"}},
        {"id": "skin-2", "name": "AK-47 | Redline",
         "weapon": {"id": "weapon_ak47", "name": "AK-47"},
         "category": {"id": "csgo_inventory_weapon_category_rifles", "name": "Rifles"},
         "team": {"id": "terrorists"}},
        {"id": "skin-3", "name": "Glock-18 | Water Elemental",
         "weapon": {"id": "weapon_glock", "name": "Glock-18"},
         "category": {"id": "csgo_inventory_weapon_category_pistols", "name": "Pistols"},
         "team": {"id": "terrorists"}},
        {"id": "skin-4", "name": "Zeus x27 | Olympus",
         "weapon": {"id": "weapon_taser", "name": "Zeus x27"},
         "category": {"id": null, "name": null},
         "team": {"id": "both"}},
        {"id": "skin-5", "name": "Golden Knife",
         "weapon": {"id": "weapon_knifegg", "name": "Golden Knife"},
         "category": {"id": "sfui_invpanel_filter_melee", "name": "Knives"},
         "team": {"id": "both"}},
        {"id": "skin-6", "name": "P250 | Sand Dune",
         "weapon": {"id": "weapon_p250", "name": "P250"},
         "category": {"id": "csgo_inventory_weapon_category_pistols", "name": "Pistols"},
         "team": {"id": "both"}},
        {"id": "skin-7", "name": "Bayonet",
         "weapon": {"id": "weapon_bayonet", "name": "Bayonet"},
         "category": {"id": "sfui_invpanel_filter_melee", "name": "Knives"},
         "team": {"id": "spectators"}}
    ]"#;

    fn build_fixture() -> SkinIndex {
        let records: Vec<RawSkin> = serde_json::from_str(SKINS_JSON).expect("fixture parses");
        let mut rng = StdRng::seed_from_u64(1);
        SkinIndex::build(records, &["weapon_knifegg".to_string()], &mut rng)
    }

    #[test]
    fn indexes_weapons_categories_and_skins() {
        let index = build_fixture();

        assert_eq!(
            index.category_order,
            vec![
                "csgo_inventory_weapon_category_pistols".to_string(),
                "csgo_inventory_weapon_category_rifles".to_string(),
                "sfui_invpanel_filter_melee".to_string(),
            ]
        );
        assert_eq!(
            index.weapons_by_category["csgo_inventory_weapon_category_pistols"],
            vec!["weapon_glock".to_string(), "weapon_p250".to_string()]
        );
        let glock = &index.weapons["weapon_glock"];
        assert_eq!(glock.skins, vec!["skin-1".to_string(), "skin-3".to_string()]);
        assert_eq!(glock.team, TeamAffiliation::T);
        assert_eq!(index.skins["skin-3"].name, "Water Elemental");
        assert_eq!(index.skins["skin-7"].name, "Bayonet");
        assert_eq!(index.weapons["weapon_bayonet"].team, TeamAffiliation::Both);
    }

    #[test]
    fn drops_categoryless_and_reserved_variants() {
        let index = build_fixture();
        assert!(!index.weapons.contains_key("weapon_taser"));
        assert!(!index.weapons.contains_key("weapon_knifegg"));
        assert!(!index.skins.contains_key("skin-4"));
        assert!(!index.skins.contains_key("skin-5"));
        for weapon in index.weapons.values() {
            assert!(index.categories.contains_key(&weapon.category_id));
        }
    }

    #[test]
    fn prices_follow_category_table() {
        let index = build_fixture();
        for weapon in index.weapons.values() {
            let range = price_range(&weapon.category_id);
            assert_eq!(weapon.price % 50, 0);
            assert!(range.contains(weapon.price), "{} priced {}", weapon.id, weapon.price);
        }
    }

    #[test]
    fn normalizes_operator_records() {
        let records: Vec<RawOperator> = serde_json::from_str(
            r#"[
                {"id": "agent-1", "name": "Sir Bloody Darryl | The Professionals",
                 "image": "darryl.png", "team": {"id": "terrorists"}},
                {"id": "agent-2", "name": "Cmdr. Mae 'Dead Cold' Jamison | SWAT",
                 "team": {"id": "counter-terrorists"}},
                {"id": "agent-3", "name": "Nobody", "team": {"id": "both"}}
            ]"#,
        )
        .expect("fixture parses");
        let operators = normalize_operators(records);
        assert_eq!(operators.len(), 2);
        assert_eq!(operators[0].name, "Sir Bloody Darryl");
        assert_eq!(operators[0].team, Team::Terrorist);
        assert_eq!(operators[1].name, "Cmdr. Mae 'Dead Cold' Jamison");
        assert_eq!(operators[1].team, Team::CounterTerrorist);
    }

    #[test]
    fn display_name_helpers() {
        assert_eq!(skin_display_name("M4A4 | Howl "), "Howl");
        assert_eq!(skin_display_name("Karambit"), "Karambit");
        assert_eq!(operator_display_name("  Solo "), "Solo");
    }
}
