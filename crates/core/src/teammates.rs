//! Random teammate generation.
//!
//! Candidate pools are filtered by team before sampling, so an empty pool is
//! reported as a [`GenerationError`] instead of spinning forever.

use rand::{seq::SliceRandom, Rng};
use tracing::debug;

use crate::{
    catalog::Catalog,
    error::GenerationError,
    ledger::MAX_FUNDS,
    models::{Operator, Skin, Team, Teammate, Weapon},
};

/// Number of generated squad members next to the player.
pub const SQUAD_SIZE: usize = 3;

/// Upper bound on whole-loadout redraws once the cap is known to be reachable.
pub const MAX_LOADOUT_ATTEMPTS: usize = 10_000;

/// Draw [`SQUAD_SIZE`] operators playing for `team`, with replacement.
pub fn generate_operators<R: Rng + ?Sized>(
    team: Team,
    pool: &[Operator],
    rng: &mut R,
) -> Result<Vec<Operator>, GenerationError> {
    let candidates: Vec<&Operator> = pool.iter().filter(|op| op.team == team).collect();
    if candidates.is_empty() {
        return Err(GenerationError::NoOperators(team));
    }
    let mut picked = Vec::with_capacity(SQUAD_SIZE);
    for _ in 0..SQUAD_SIZE {
        if let Some(op) = candidates.choose(rng) {
            picked.push((*op).clone());
        }
    }
    Ok(picked)
}

/// Draw one skin per category for `team`, keeping the total under [`MAX_FUNDS`].
///
/// Each attempt picks a weapon per category and a skin of that weapon; an
/// attempt over the cap is discarded as a whole.
pub fn generate_loadout<'a, R: Rng + ?Sized>(
    team: Team,
    catalog: &'a Catalog,
    rng: &mut R,
) -> Result<Vec<&'a Skin>, GenerationError> {
    let cap = MAX_FUNDS as u64;
    let mut pools: Vec<Vec<&Weapon>> = Vec::new();
    for category in catalog.category_ids() {
        let eligible: Vec<&Weapon> = catalog
            .visible_weapons(category, Some(team))
            .into_iter()
            .filter(|weapon| !weapon.skins.is_empty())
            .collect();
        if eligible.is_empty() {
            return Err(GenerationError::NoWeapons {
                category: category.clone(),
                team,
            });
        }
        pools.push(eligible);
    }

    let cheapest: u64 = pools
        .iter()
        .filter_map(|pool| pool.iter().map(|weapon| u64::from(weapon.price)).min())
        .sum();
    if cheapest > cap {
        return Err(GenerationError::BudgetUnreachable { cheapest, cap });
    }

    for attempt in 1..=MAX_LOADOUT_ATTEMPTS {
        let mut total = 0u64;
        let mut loadout = Vec::with_capacity(pools.len());
        for pool in &pools {
            let Some(weapon) = pool.choose(rng) else {
                continue;
            };
            let Some(skin) = weapon
                .skins
                .choose(rng)
                .and_then(|skin_id| catalog.skin(skin_id))
            else {
                continue;
            };
            total += u64::from(weapon.price);
            loadout.push(skin);
        }
        if loadout.len() == pools.len() && total <= cap {
            debug!(attempt, total, "Generated teammate loadout");
            return Ok(loadout);
        }
    }

    Err(GenerationError::AttemptsExhausted {
        attempts: MAX_LOADOUT_ATTEMPTS,
        cap,
    })
}

/// Build the full squad: operators first, then a name and loadout for each.
///
/// Names come from the loaded name pool in order; missing names fall back to
/// `Bot 1`, `Bot 2`, ...
pub fn generate_squad<R: Rng + ?Sized>(
    team: Team,
    catalog: &Catalog,
    rng: &mut R,
) -> Result<Vec<Teammate>, GenerationError> {
    let operators = generate_operators(team, catalog.operators(), rng)?;
    let mut squad = Vec::with_capacity(operators.len());
    for (slot, operator) in operators.into_iter().enumerate() {
        let loadout = generate_loadout(team, catalog, rng)?
            .into_iter()
            .map(|skin| skin.id.clone())
            .collect();
        let name = catalog
            .names()
            .get(slot)
            .cloned()
            .unwrap_or_else(|| format!("Bot {}", slot + 1));
        squad.push(Teammate {
            operator,
            name,
            loadout,
        });
    }
    Ok(squad)
}
