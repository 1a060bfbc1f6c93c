#![allow(missing_docs)]

//! Domain error taxonomy.
//!
//! Load failures never reach these types; the loaders report them through
//! `anyhow` and the load event channel. What remains is split into user-facing
//! validation failures and invariant violations caused by bad data or
//! programming errors.

use thiserror::Error;

use crate::models::{CategoryId, OperatorId, SkinId, Team, WeaponId};

/// The user tried to advance past a page without satisfying its rules.
///
/// The display text is the message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Pick a team before continuing.")]
    TeamMissing,
    #[error("Pick an operator before continuing.")]
    OperatorMissing,
    #[error("Enter a player name.")]
    PlayerNameEmpty,
    #[error("Player name must be at most {max} characters.")]
    PlayerNameTooLong { max: usize },
    #[error("Player name must be a single word.")]
    PlayerNameMultipleWords,
    #[error("The weapon catalog has not finished loading yet.")]
    CatalogNotLoaded,
    #[error("Pick a skin in every category (missing: {}).", .missing.join(", "))]
    MissingCategories { missing: Vec<String> },
    #[error("Your loadout is ${over} over budget.")]
    OverBudget { over: i64 },
    #[error("Enter a team name.")]
    TeamNameEmpty,
    #[error("Team name must start with a letter.")]
    TeamNameInvalidStart,
}

/// A selection request that contradicts the catalog or the current state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("unknown operator {0}")]
    UnknownOperator(OperatorId),
    #[error("operator {operator} does not play for {team}")]
    OperatorTeamMismatch { operator: OperatorId, team: Team },
    #[error("operator selected before a team was chosen")]
    TeamNotSet,
    #[error("unknown category {0}")]
    UnknownCategory(CategoryId),
    #[error("unknown weapon {0}")]
    UnknownWeapon(WeaponId),
    #[error("weapon {weapon} is not available to {team}")]
    WeaponTeamMismatch { weapon: WeaponId, team: Team },
    #[error("unknown skin {0}")]
    UnknownSkin(SkinId),
}

/// Teammate generation could not produce a valid squad from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    #[error("no operators available for team {0}")]
    NoOperators(Team),
    #[error("category {category} has no weapons with skins for team {team}")]
    NoWeapons { category: CategoryId, team: Team },
    #[error("cheapest loadout costs ${cheapest}, above the ${cap} cap")]
    BudgetUnreachable { cheapest: u64, cap: u64 },
    #[error("no loadout under ${cap} found after {attempts} attempts")]
    AttemptsExhausted { attempts: usize, cap: u64 },
}
