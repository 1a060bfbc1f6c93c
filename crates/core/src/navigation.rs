#![allow(missing_docs)]

//! Wizard page sequence and the validation gate guarding it.

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::{catalog::Catalog, error::ValidationError, selection::SelectionState};

/// Longest accepted player name, in characters.
pub const MAX_PLAYER_NAME_LEN: usize = 20;

static TEAM_NAME_START: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z]").expect("invalid team name regex"));

/// Wizard pages in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Page {
    Start,
    TeamSelect,
    OperatorSelect,
    WeaponSelect,
    CharacterSummary,
    TeamSummary,
}

impl Page {
    /// Every page, first to last.
    pub const ALL: [Page; 6] = [
        Page::Start,
        Page::TeamSelect,
        Page::OperatorSelect,
        Page::WeaponSelect,
        Page::CharacterSummary,
        Page::TeamSummary,
    ];

    /// Zero-based position in the sequence.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Page at `index`, if any.
    pub fn from_index(index: usize) -> Option<Page> {
        Page::ALL.get(index).copied()
    }

    pub fn next(self) -> Option<Page> {
        Page::from_index(self.index() + 1)
    }

    pub fn previous(self) -> Option<Page> {
        self.index().checked_sub(1).and_then(Page::from_index)
    }

    /// Breadcrumb label.
    pub fn title(self) -> &'static str {
        match self {
            Page::Start => "Start",
            Page::TeamSelect => "Team",
            Page::OperatorSelect => "Operator",
            Page::WeaponSelect => "Weapons",
            Page::CharacterSummary => "Summary",
            Page::TeamSummary => "Squad",
        }
    }
}

/// Result of a navigation request that passed the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// Already on the requested page.
    Stayed,
    /// Moved to the page.
    Moved(Page),
}

/// Check whether the player may move on from `from`.
pub fn can_advance(
    from: Page,
    state: &SelectionState,
    catalog: &Catalog,
) -> Result<(), ValidationError> {
    match from {
        Page::Start | Page::TeamSummary => Ok(()),
        Page::TeamSelect => state
            .team()
            .map(|_| ())
            .ok_or(ValidationError::TeamMissing),
        Page::OperatorSelect => {
            if state.operator().is_none() {
                return Err(ValidationError::OperatorMissing);
            }
            validate_player_name(state.player_name())
        }
        Page::WeaponSelect => validate_loadout(state, catalog),
        Page::CharacterSummary => validate_team_name(state.team_name()),
    }
}

/// A player name is one word of at most [`MAX_PLAYER_NAME_LEN`] characters.
pub fn validate_player_name(name: &str) -> Result<(), ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::PlayerNameEmpty);
    }
    if trimmed.chars().count() > MAX_PLAYER_NAME_LEN {
        return Err(ValidationError::PlayerNameTooLong {
            max: MAX_PLAYER_NAME_LEN,
        });
    }
    if trimmed.split_whitespace().count() > 1 {
        return Err(ValidationError::PlayerNameMultipleWords);
    }
    Ok(())
}

/// A team name must be present and begin with an ASCII letter.
///
/// Only the first character is checked; `"A-Team 42!"` is accepted.
pub fn validate_team_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::TeamNameEmpty);
    }
    if !TEAM_NAME_START.is_match(name) {
        return Err(ValidationError::TeamNameInvalidStart);
    }
    Ok(())
}

/// Every category needs a selected skin and the funds may not be negative.
pub fn validate_loadout(state: &SelectionState, catalog: &Catalog) -> Result<(), ValidationError> {
    if catalog.category_ids().is_empty() {
        return Err(ValidationError::CatalogNotLoaded);
    }
    let covered = state.categories_with_selection(catalog);
    let missing: Vec<String> = catalog
        .categories()
        .filter(|category| !covered.contains(&category.id))
        .map(|category| category.name.clone())
        .collect();
    if !missing.is_empty() {
        return Err(ValidationError::MissingCategories { missing });
    }
    if state.ledger().is_over_budget() {
        return Err(ValidationError::OverBudget {
            over: -state.funds(),
        });
    }
    Ok(())
}

/// Current page plus the pages the player has reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigator {
    current: Page,
    visited: BTreeSet<Page>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self {
            current: Page::Start,
            visited: BTreeSet::from([Page::Start]),
        }
    }
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Page {
        self.current
    }

    pub fn is_visited(&self, page: Page) -> bool {
        self.visited.contains(&page)
    }

    pub fn visited(&self) -> impl Iterator<Item = Page> + '_ {
        self.visited.iter().copied()
    }

    /// Move to `target`.
    ///
    /// Going back never validates. Going forward validates every page from the
    /// current one up to (not including) `target`; on failure nothing changes.
    pub fn go_to(
        &mut self,
        target: Page,
        state: &SelectionState,
        catalog: &Catalog,
    ) -> Result<Navigation, ValidationError> {
        if target == self.current {
            return Ok(Navigation::Stayed);
        }
        if target > self.current {
            for page in Page::ALL
                .iter()
                .copied()
                .filter(|page| *page >= self.current && *page < target)
            {
                can_advance(page, state, catalog)?;
            }
        }
        debug!(from = ?self.current, to = ?target, "Navigating");
        self.current = target;
        self.visited.insert(target);
        Ok(Navigation::Moved(target))
    }

    /// Advance one page; staying put on the last page.
    pub fn next(
        &mut self,
        state: &SelectionState,
        catalog: &Catalog,
    ) -> Result<Navigation, ValidationError> {
        match self.current.next() {
            Some(page) => self.go_to(page, state, catalog),
            None => Ok(Navigation::Stayed),
        }
    }

    /// Step back one page.
    pub fn back(&mut self) -> Navigation {
        match self.current.previous() {
            Some(page) => {
                self.current = page;
                Navigation::Moved(page)
            }
            None => Navigation::Stayed,
        }
    }

    /// Forget every page past team selection; used when the team changes.
    pub fn reset_to_team_select(&mut self) {
        self.visited.retain(|page| *page <= Page::TeamSelect);
        self.visited.insert(Page::TeamSelect);
        if self.current > Page::TeamSelect {
            self.current = Page::TeamSelect;
        }
    }

    /// Back to the start page with nothing visited.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
