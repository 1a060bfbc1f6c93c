#![allow(missing_docs)]

//! Shared domain models.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Identifier of an operator in the agents feed.
pub type OperatorId = String;
/// Identifier of a weapon (e.g. `weapon_ak47`).
pub type WeaponId = String;
/// Identifier of a single skin.
pub type SkinId = String;
/// Identifier of a weapon category.
pub type CategoryId = String;

/// One of the two playable sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    /// Counter-terrorists (`ct`).
    #[serde(rename = "ct")]
    CounterTerrorist,
    /// Terrorists (`t`).
    #[serde(rename = "t")]
    Terrorist,
}

impl Team {
    /// Short code used by the wizard (`ct` / `t`).
    pub fn code(self) -> &'static str {
        match self {
            Team::CounterTerrorist => "ct",
            Team::Terrorist => "t",
        }
    }

    /// Human-readable side name.
    pub fn label(self) -> &'static str {
        match self {
            Team::CounterTerrorist => "Counter-Terrorists",
            Team::Terrorist => "Terrorists",
        }
    }

    /// Map a feed team id (`counter-terrorists`, `terrorists`, `ct`, `t`).
    pub fn from_source_id(id: &str) -> Option<Self> {
        match id.trim().to_ascii_lowercase().as_str() {
            "counter-terrorists" | "ct" => Some(Team::CounterTerrorist),
            "terrorists" | "t" => Some(Team::Terrorist),
            _ => None,
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// What the user picked on the team page; `Auto` resolves to a side at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeamChoice {
    /// Play as a specific side.
    Side(Team),
    /// Let the wizard pick a side at random.
    Auto,
}

impl TeamChoice {
    /// Resolve the choice into a concrete side.
    pub fn resolve<R: Rng + ?Sized>(self, rng: &mut R) -> Team {
        match self {
            TeamChoice::Side(team) => team,
            TeamChoice::Auto => {
                if rng.gen_bool(0.5) {
                    Team::CounterTerrorist
                } else {
                    Team::Terrorist
                }
            }
        }
    }
}

/// Which sides may buy a weapon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TeamAffiliation {
    /// Counter-terrorists only.
    Ct,
    /// Terrorists only.
    T,
    /// Available to either side.
    Both,
}

impl TeamAffiliation {
    /// Resolve a feed team id, falling back to `Both` when unrecognized.
    pub fn from_source_id(id: Option<&str>) -> Self {
        match id.and_then(Team::from_source_id) {
            Some(Team::CounterTerrorist) => TeamAffiliation::Ct,
            Some(Team::Terrorist) => TeamAffiliation::T,
            None => TeamAffiliation::Both,
        }
    }

    /// Whether a player on `team` may use this item. An unset team sees everything.
    pub fn admits(self, team: Option<Team>) -> bool {
        match (self, team) {
            (TeamAffiliation::Both, _) | (_, None) => true,
            (TeamAffiliation::Ct, Some(team)) => team == Team::CounterTerrorist,
            (TeamAffiliation::T, Some(team)) => team == Team::Terrorist,
        }
    }
}

/// A selectable playable character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operator {
    pub id: OperatorId,
    pub name: String,
    pub image: Option<String>,
    pub team: Team,
}

/// A purchasable weapon owning a list of skins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Weapon {
    pub id: WeaponId,
    pub name: String,
    pub category_id: CategoryId,
    pub team: TeamAffiliation,
    /// Price in dollars, a multiple of 50.
    pub price: u32,
    /// Skin ids in feed order.
    pub skins: Vec<SkinId>,
}

/// A cosmetic variant of exactly one weapon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skin {
    pub id: SkinId,
    pub name: String,
    pub image: Option<String>,
    pub weapon_id: WeaponId,
}

/// A grouping of weapons (pistols, rifles, knives, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

/// A generated non-player squad member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Teammate {
    pub operator: Operator,
    pub name: String,
    /// One skin per category.
    pub loadout: Vec<SkinId>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn maps_source_team_ids() {
        assert_eq!(
            Team::from_source_id("counter-terrorists"),
            Some(Team::CounterTerrorist)
        );
        assert_eq!(Team::from_source_id("terrorists"), Some(Team::Terrorist));
        assert_eq!(Team::from_source_id("both"), None);
        assert_eq!(
            TeamAffiliation::from_source_id(Some("spectators")),
            TeamAffiliation::Both
        );
        assert_eq!(TeamAffiliation::from_source_id(None), TeamAffiliation::Both);
    }

    #[test]
    fn affiliation_filters_by_team() {
        assert!(TeamAffiliation::Both.admits(Some(Team::Terrorist)));
        assert!(TeamAffiliation::Ct.admits(None));
        assert!(TeamAffiliation::Ct.admits(Some(Team::CounterTerrorist)));
        assert!(!TeamAffiliation::Ct.admits(Some(Team::Terrorist)));
        assert!(!TeamAffiliation::T.admits(Some(Team::CounterTerrorist)));
    }

    #[test]
    fn auto_choice_resolves_to_a_side() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut seen = Vec::new();
        for _ in 0..64 {
            let team = TeamChoice::Auto.resolve(&mut rng);
            if !seen.contains(&team) {
                seen.push(team);
            }
        }
        assert_eq!(seen.len(), 2);
        assert_eq!(
            TeamChoice::Side(Team::Terrorist).resolve(&mut rng),
            Team::Terrorist
        );
    }
}
