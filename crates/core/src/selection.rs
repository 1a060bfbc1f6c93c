#![allow(missing_docs)]

//! The player's in-progress choices and the rules keeping them consistent.
//!
//! Every mutating operation first updates the state and then queues
//! [`SelectionEvent`]s; the frontend drains them with
//! [`SelectionState::take_events`] once the operation has returned, so no
//! rendering happens while the state is half-updated.

use std::collections::{BTreeMap, BTreeSet};

use rand::Rng;
use tracing::{debug, info};

use crate::{
    catalog::Catalog,
    error::{GenerationError, SelectionError},
    ledger::FundsLedger,
    models::{CategoryId, Operator, OperatorId, SkinId, Team, Teammate, Weapon, WeaponId},
    teammates,
};

/// State change notifications for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionEvent {
    /// The side changed (or was cleared).
    TeamChanged(Option<Team>),
    OperatorSelected(OperatorId),
    OperatorDeselected(OperatorId),
    CategoryActivated(CategoryId),
    CategoryDeactivated(CategoryId),
    /// A category tab gained or lost its last selected skin.
    CategorySelectionChanged {
        category: CategoryId,
        has_selection: bool,
    },
    WeaponShown(WeaponId),
    WeaponHidden(WeaponId),
    WeaponActivated(WeaponId),
    WeaponDeactivated(WeaponId),
    SkinShown(SkinId),
    SkinHidden(SkinId),
    SkinSelected(SkinId),
    SkinDeselected(SkinId),
    /// New balance after a selection change.
    FundsChanged(i64),
    TeammatesRegenerated,
}

/// Whether a weapon's price fits in the remaining funds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Affordability {
    Affordable,
    OverBudget,
}

/// Everything the player has chosen so far.
#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    team: Option<Team>,
    team_name: String,
    player_name: String,
    operator: Option<Operator>,
    active_category: Option<CategoryId>,
    active_weapon: Option<WeaponId>,
    /// Selected skin per weapon; at most one skin per weapon by construction.
    selected_skins: BTreeMap<WeaponId, SkinId>,
    ledger: FundsLedger,
    teammates: Vec<Teammate>,
    events: Vec<SelectionEvent>,
}

impl SelectionState {
    /// Empty selection with the full budget.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn team(&self) -> Option<Team> {
        self.team
    }

    pub fn team_name(&self) -> &str {
        &self.team_name
    }

    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    pub fn operator(&self) -> Option<&Operator> {
        self.operator.as_ref()
    }

    pub fn active_category(&self) -> Option<&CategoryId> {
        self.active_category.as_ref()
    }

    pub fn active_weapon(&self) -> Option<&WeaponId> {
        self.active_weapon.as_ref()
    }

    pub fn ledger(&self) -> &FundsLedger {
        &self.ledger
    }

    /// Remaining funds.
    pub fn funds(&self) -> i64 {
        self.ledger.funds()
    }

    pub fn teammates(&self) -> &[Teammate] {
        &self.teammates
    }

    /// Selected skin ids ordered by weapon id.
    pub fn selected_skins(&self) -> impl Iterator<Item = &SkinId> + '_ {
        self.selected_skins.values()
    }

    pub fn selected_count(&self) -> usize {
        self.selected_skins.len()
    }

    pub fn is_skin_selected(&self, skin_id: &str) -> bool {
        self.selected_skins.values().any(|id| id == skin_id)
    }

    /// The skin currently chosen for `weapon_id`, if any.
    pub fn selected_skin_for(&self, weapon_id: &str) -> Option<&SkinId> {
        self.selected_skins.get(weapon_id)
    }

    /// Categories holding at least one selected skin.
    pub fn categories_with_selection(&self, catalog: &Catalog) -> BTreeSet<CategoryId> {
        self.selected_skins
            .keys()
            .filter_map(|weapon_id| catalog.weapon(weapon_id))
            .map(|weapon| weapon.category_id.clone())
            .collect()
    }

    /// Whether the tab for `category_id` should show the has-selection marker.
    pub fn category_has_selection(&self, catalog: &Catalog, category_id: &str) -> bool {
        self.selected_skins
            .keys()
            .filter_map(|weapon_id| catalog.weapon(weapon_id))
            .any(|weapon| weapon.category_id == category_id)
    }

    /// Price colouring signal for a weapon.
    pub fn affordability(&self, weapon: &Weapon) -> Affordability {
        if self.ledger.can_afford(weapon.price) {
            Affordability::Affordable
        } else {
            Affordability::OverBudget
        }
    }

    /// Drain queued state change events.
    pub fn take_events(&mut self) -> Vec<SelectionEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn set_player_name(&mut self, name: impl Into<String>) {
        self.player_name = name.into();
    }

    pub fn set_team_name(&mut self, name: impl Into<String>) {
        self.team_name = name.into();
    }

    /// Switch sides.
    ///
    /// Changing the team drops the operator, every selected skin, the active
    /// category and weapon and both names, then regenerates the teammates.
    /// Returns `Ok(false)` when `team` is already the current team. A
    /// generation failure leaves the rest of the change applied.
    pub fn set_team<R: Rng + ?Sized>(
        &mut self,
        team: Option<Team>,
        catalog: &Catalog,
        rng: &mut R,
    ) -> Result<bool, GenerationError> {
        if self.team == team {
            return Ok(false);
        }

        self.deselect_operator();
        self.clear_skins(catalog);
        self.deactivate_category(catalog);
        self.player_name.clear();
        self.team_name.clear();
        self.team = team;
        self.events.push(SelectionEvent::TeamChanged(team));
        info!(team = team.map(Team::code).unwrap_or("none"), "Team changed");

        self.regenerate_teammates(catalog, rng)?;
        Ok(true)
    }

    /// Drop every choice, including the team, and refill the funds.
    pub fn reset(&mut self, catalog: &Catalog) {
        self.deselect_operator();
        self.clear_skins(catalog);
        self.deactivate_category(catalog);
        self.player_name.clear();
        self.team_name.clear();
        self.teammates.clear();
        if self.team.take().is_some() {
            self.events.push(SelectionEvent::TeamChanged(None));
        }
        info!("Selection reset");
    }

    /// Regenerate the three teammates for the current team.
    ///
    /// Does nothing beyond clearing them while no team is set or while the
    /// operator or skin feeds have not landed yet.
    pub fn regenerate_teammates<R: Rng + ?Sized>(
        &mut self,
        catalog: &Catalog,
        rng: &mut R,
    ) -> Result<(), GenerationError> {
        self.teammates.clear();
        let Some(team) = self.team else {
            return Ok(());
        };
        if !catalog.has_operators() || !catalog.has_skins() {
            debug!("Teammate generation deferred until the catalog is loaded");
            return Ok(());
        }
        self.teammates = teammates::generate_squad(team, catalog, rng)?;
        self.events.push(SelectionEvent::TeammatesRegenerated);
        Ok(())
    }

    /// Give the teammates names from a freshly loaded pool, slot by slot.
    pub fn rename_teammates(&mut self, names: &[String]) {
        for (teammate, name) in self.teammates.iter_mut().zip(names) {
            teammate.name = name.clone();
        }
    }

    /// Select `operator_id`, or clear the operator with `None`.
    pub fn set_operator(
        &mut self,
        catalog: &Catalog,
        operator_id: Option<&str>,
    ) -> Result<(), SelectionError> {
        let Some(operator_id) = operator_id else {
            self.deselect_operator();
            return Ok(());
        };
        if self.operator.as_ref().map(|op| op.id.as_str()) == Some(operator_id) {
            return Ok(());
        }

        let operator = catalog
            .operator(operator_id)
            .ok_or_else(|| SelectionError::UnknownOperator(operator_id.to_string()))?;
        let team = self.team.ok_or(SelectionError::TeamNotSet)?;
        if operator.team != team {
            return Err(SelectionError::OperatorTeamMismatch {
                operator: operator.id.clone(),
                team,
            });
        }

        self.deselect_operator();
        self.operator = Some(operator.clone());
        self.events
            .push(SelectionEvent::OperatorSelected(operator.id.clone()));
        Ok(())
    }

    fn deselect_operator(&mut self) {
        if let Some(previous) = self.operator.take() {
            self.events
                .push(SelectionEvent::OperatorDeselected(previous.id));
        }
    }

    /// Show the weapons of `category_id` and activate the first visible one.
    ///
    /// `None` hides the current category without activating anything.
    pub fn set_active_category(
        &mut self,
        catalog: &Catalog,
        category_id: Option<&str>,
    ) -> Result<(), SelectionError> {
        if self.active_category.as_deref() == category_id {
            return Ok(());
        }
        if let Some(id) = category_id {
            if catalog.category(id).is_none() {
                return Err(SelectionError::UnknownCategory(id.to_string()));
            }
        }

        self.deactivate_category(catalog);
        let Some(category_id) = category_id else {
            return Ok(());
        };

        self.active_category = Some(category_id.to_string());
        self.events
            .push(SelectionEvent::CategoryActivated(category_id.to_string()));
        let visible = catalog.visible_weapons(category_id, self.team);
        for weapon in &visible {
            self.events.push(SelectionEvent::WeaponShown(weapon.id.clone()));
        }
        if let Some(first) = visible.first() {
            let first = first.id.clone();
            self.set_active_weapon(catalog, Some(&first))?;
        }
        Ok(())
    }

    fn deactivate_category(&mut self, catalog: &Catalog) {
        self.deactivate_weapon(catalog);
        if let Some(previous) = self.active_category.take() {
            for weapon in catalog.visible_weapons(&previous, self.team) {
                self.events.push(SelectionEvent::WeaponHidden(weapon.id.clone()));
            }
            self.events
                .push(SelectionEvent::CategoryDeactivated(previous));
        }
    }

    /// Show the skins of `weapon_id`, hiding the previous weapon's skins.
    pub fn set_active_weapon(
        &mut self,
        catalog: &Catalog,
        weapon_id: Option<&str>,
    ) -> Result<(), SelectionError> {
        if self.active_weapon.as_deref() == weapon_id {
            return Ok(());
        }
        let weapon = match weapon_id {
            Some(id) => Some(
                catalog
                    .weapon(id)
                    .ok_or_else(|| SelectionError::UnknownWeapon(id.to_string()))?,
            ),
            None => None,
        };

        self.deactivate_weapon(catalog);
        if let Some(weapon) = weapon {
            self.active_weapon = Some(weapon.id.clone());
            self.events
                .push(SelectionEvent::WeaponActivated(weapon.id.clone()));
            for skin in &weapon.skins {
                self.events.push(SelectionEvent::SkinShown(skin.clone()));
            }
        }
        Ok(())
    }

    fn deactivate_weapon(&mut self, catalog: &Catalog) {
        if let Some(previous) = self.active_weapon.take() {
            if let Some(weapon) = catalog.weapon(&previous) {
                for skin in &weapon.skins {
                    self.events.push(SelectionEvent::SkinHidden(skin.clone()));
                }
            }
            self.events
                .push(SelectionEvent::WeaponDeactivated(previous));
        }
    }

    /// Select or deselect a skin; `None` clears every selection and refills
    /// the funds.
    ///
    /// Selecting a skin of a weapon that already has one swaps them without
    /// touching the funds, since both belong to the same weapon price. Skins of
    /// weapons the current team cannot buy are rejected.
    pub fn toggle_skin(
        &mut self,
        catalog: &Catalog,
        skin_id: Option<&str>,
    ) -> Result<(), SelectionError> {
        let Some(skin_id) = skin_id else {
            self.clear_skins(catalog);
            return Ok(());
        };

        let skin = catalog
            .skin(skin_id)
            .ok_or_else(|| SelectionError::UnknownSkin(skin_id.to_string()))?;
        let weapon = catalog
            .weapon(&skin.weapon_id)
            .ok_or_else(|| SelectionError::UnknownWeapon(skin.weapon_id.clone()))?;
        if let Some(team) = self.team {
            if !weapon.team.admits(Some(team)) {
                return Err(SelectionError::WeaponTeamMismatch {
                    weapon: weapon.id.clone(),
                    team,
                });
            }
        }
        let had_selection = self.category_has_selection(catalog, &weapon.category_id);
        let funds_before = self.ledger.funds();

        if self.selected_skin_for(&weapon.id).map(String::as_str) == Some(skin_id) {
            self.selected_skins.remove(&weapon.id);
            self.ledger.refund(weapon.price);
            self.events
                .push(SelectionEvent::SkinDeselected(skin.id.clone()));
        } else {
            match self
                .selected_skins
                .insert(weapon.id.clone(), skin.id.clone())
            {
                Some(replaced) => {
                    self.events.push(SelectionEvent::SkinDeselected(replaced));
                }
                None => self.ledger.charge(weapon.price),
            }
            self.events
                .push(SelectionEvent::SkinSelected(skin.id.clone()));
        }

        let has_selection = self.category_has_selection(catalog, &weapon.category_id);
        if has_selection != had_selection {
            self.events.push(SelectionEvent::CategorySelectionChanged {
                category: weapon.category_id.clone(),
                has_selection,
            });
        }
        if self.ledger.funds() != funds_before {
            self.events
                .push(SelectionEvent::FundsChanged(self.ledger.funds()));
        }
        Ok(())
    }

    fn clear_skins(&mut self, catalog: &Catalog) {
        let categories = self.categories_with_selection(catalog);
        for (_, skin) in std::mem::take(&mut self.selected_skins) {
            self.events.push(SelectionEvent::SkinDeselected(skin));
        }
        for category in categories {
            self.events.push(SelectionEvent::CategorySelectionChanged {
                category,
                has_selection: false,
            });
        }
        if self.ledger.funds() != FundsLedger::default().funds() {
            self.ledger.reset();
            self.events
                .push(SelectionEvent::FundsChanged(self.ledger.funds()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fixtures::{self, KNIVES, PISTOLS, RIFLES};
    use crate::ledger::MAX_FUNDS;
    use rand::{rngs::StdRng, SeedableRng};

    fn terrorist_state(catalog: &Catalog) -> SelectionState {
        let mut state = SelectionState::new();
        let mut rng = StdRng::seed_from_u64(1);
        state
            .set_team(Some(Team::Terrorist), catalog, &mut rng)
            .unwrap();
        state.take_events();
        state
    }

    #[test]
    fn select_and_deselect_adjust_funds() {
        let catalog = fixtures::catalog();
        let mut state = terrorist_state(&catalog);

        state.toggle_skin(&catalog, Some("glock-fade")).unwrap();
        state.toggle_skin(&catalog, Some("ak-redline")).unwrap();
        assert_eq!(state.funds(), MAX_FUNDS - 650 - 3200);
        assert_eq!(state.funds(), 5150);

        state.toggle_skin(&catalog, Some("ak-redline")).unwrap();
        assert_eq!(state.funds(), 8350);
        assert!(!state.is_skin_selected("ak-redline"));
        assert!(state.is_skin_selected("glock-fade"));
    }

    #[test]
    fn swapping_skins_of_one_weapon_is_budget_neutral() {
        let catalog = fixtures::catalog();
        let mut state = terrorist_state(&catalog);

        state.toggle_skin(&catalog, Some("glock-fade")).unwrap();
        state.take_events();
        let funds = state.funds();
        for skin in ["glock-dragon", "glock-fade", "glock-dragon"] {
            state.toggle_skin(&catalog, Some(skin)).unwrap();
            assert_eq!(state.funds(), funds);
            assert_eq!(state.selected_count(), 1);
        }
        assert_eq!(
            state.selected_skin_for("glock").map(String::as_str),
            Some("glock-dragon")
        );

        let events = state.take_events();
        assert!(events.contains(&SelectionEvent::SkinDeselected("glock-fade".to_string())));
        assert!(!events
            .iter()
            .any(|event| matches!(event, SelectionEvent::FundsChanged(_))));
    }

    #[test]
    fn clearing_skins_is_idempotent() {
        let catalog = fixtures::catalog();
        let mut state = terrorist_state(&catalog);
        state.toggle_skin(&catalog, Some("glock-fade")).unwrap();
        state.toggle_skin(&catalog, Some("bayonet-fade")).unwrap();

        state.toggle_skin(&catalog, None).unwrap();
        assert_eq!(state.selected_count(), 0);
        assert_eq!(state.funds(), MAX_FUNDS);
        state.take_events();

        state.toggle_skin(&catalog, None).unwrap();
        assert_eq!(state.selected_count(), 0);
        assert_eq!(state.funds(), MAX_FUNDS);
        assert!(state.take_events().is_empty());
    }

    #[test]
    fn setting_the_same_team_is_a_no_op() {
        let catalog = fixtures::catalog();
        let mut rng = StdRng::seed_from_u64(2);
        let mut state = SelectionState::new();
        assert!(state
            .set_team(Some(Team::CounterTerrorist), &catalog, &mut rng)
            .unwrap());
        let teammates = state.teammates().to_vec();
        assert_eq!(teammates.len(), 3);
        state.take_events();

        assert!(!state
            .set_team(Some(Team::CounterTerrorist), &catalog, &mut rng)
            .unwrap());
        assert_eq!(state.teammates(), teammates.as_slice());
        assert_eq!(state.funds(), MAX_FUNDS);
        assert!(state.take_events().is_empty());
    }

    #[test]
    fn changing_team_resets_dependent_choices() {
        let catalog = fixtures::catalog();
        let mut rng = StdRng::seed_from_u64(3);
        let mut state = terrorist_state(&catalog);
        state.set_operator(&catalog, Some("t-1")).unwrap();
        state.set_player_name("Bob");
        state.set_team_name("Alpha");
        state.set_active_category(&catalog, Some(PISTOLS)).unwrap();
        state.toggle_skin(&catalog, Some("glock-fade")).unwrap();

        state
            .set_team(Some(Team::CounterTerrorist), &catalog, &mut rng)
            .unwrap();
        assert!(state.operator().is_none());
        assert!(state.player_name().is_empty());
        assert!(state.team_name().is_empty());
        assert!(state.active_category().is_none());
        assert!(state.active_weapon().is_none());
        assert_eq!(state.selected_count(), 0);
        assert_eq!(state.funds(), MAX_FUNDS);
        assert!(state
            .teammates()
            .iter()
            .all(|mate| mate.operator.team == Team::CounterTerrorist));
    }

    #[test]
    fn reset_drops_team_and_choices() {
        let catalog = fixtures::catalog();
        let mut state = terrorist_state(&catalog);
        state.set_operator(&catalog, Some("t-2")).unwrap();
        state.set_player_name("Bob");
        state.toggle_skin(&catalog, Some("ak-vulcan")).unwrap();
        state.take_events();

        state.reset(&catalog);
        assert_eq!(state.team(), None);
        assert!(state.operator().is_none());
        assert!(state.player_name().is_empty());
        assert!(state.teammates().is_empty());
        assert_eq!(state.funds(), MAX_FUNDS);
        let events = state.take_events();
        assert!(events.contains(&SelectionEvent::OperatorDeselected("t-2".to_string())));
        assert_eq!(events.last(), Some(&SelectionEvent::TeamChanged(None)));
    }

    #[test]
    fn teammates_wait_for_the_catalog() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut state = SelectionState::new();
        state
            .set_team(Some(Team::Terrorist), &Catalog::default(), &mut rng)
            .unwrap();
        assert!(state.teammates().is_empty());

        let catalog = fixtures::catalog();
        state.regenerate_teammates(&catalog, &mut rng).unwrap();
        assert_eq!(state.teammates().len(), 3);
        state.rename_teammates(&["x".to_string()]);
        assert_eq!(state.teammates()[0].name, "x");
    }

    #[test]
    fn operator_must_match_team() {
        let catalog = fixtures::catalog();
        let mut state = SelectionState::new();
        assert_eq!(
            state.set_operator(&catalog, Some("t-1")),
            Err(SelectionError::TeamNotSet)
        );

        let mut state = terrorist_state(&catalog);
        assert_eq!(
            state.set_operator(&catalog, Some("ct-1")),
            Err(SelectionError::OperatorTeamMismatch {
                operator: "ct-1".to_string(),
                team: Team::Terrorist
            })
        );
        assert_eq!(
            state.set_operator(&catalog, Some("ghost")),
            Err(SelectionError::UnknownOperator("ghost".to_string()))
        );
    }

    #[test]
    fn skins_of_other_side_weapons_are_rejected() {
        let catalog = fixtures::catalog();
        let mut state = terrorist_state(&catalog);
        assert_eq!(
            state.toggle_skin(&catalog, Some("m4-howl")),
            Err(SelectionError::WeaponTeamMismatch {
                weapon: "m4a4".to_string(),
                team: Team::Terrorist
            })
        );
        assert!(!state.is_skin_selected("m4-howl"));
        assert_eq!(state.funds(), MAX_FUNDS);
        assert!(state.take_events().is_empty());

        state.toggle_skin(&catalog, Some("p250-sand")).unwrap();
        assert!(state.is_skin_selected("p250-sand"));

        let mut unset = SelectionState::new();
        unset.toggle_skin(&catalog, Some("m4-howl")).unwrap();
        assert!(unset.is_skin_selected("m4-howl"));
    }

    #[test]
    fn switching_operator_deselects_previous() {
        let catalog = fixtures::catalog();
        let mut state = terrorist_state(&catalog);
        state.set_operator(&catalog, Some("t-1")).unwrap();
        state.set_operator(&catalog, Some("t-1")).unwrap();
        state.set_operator(&catalog, Some("t-2")).unwrap();
        assert_eq!(
            state.take_events(),
            vec![
                SelectionEvent::OperatorSelected("t-1".to_string()),
                SelectionEvent::OperatorDeselected("t-1".to_string()),
                SelectionEvent::OperatorSelected("t-2".to_string()),
            ]
        );
        state.set_operator(&catalog, None).unwrap();
        assert!(state.operator().is_none());
    }

    #[test]
    fn category_activation_filters_and_auto_selects() {
        let catalog = fixtures::catalog();
        let mut state = terrorist_state(&catalog);

        state.set_active_category(&catalog, Some(PISTOLS)).unwrap();
        assert_eq!(state.active_weapon().map(String::as_str), Some("glock"));
        let events = state.take_events();
        assert!(events.contains(&SelectionEvent::WeaponShown("glock".to_string())));
        assert!(events.contains(&SelectionEvent::WeaponShown("p250".to_string())));
        assert!(!events.contains(&SelectionEvent::WeaponShown("usp".to_string())));
        assert!(events.contains(&SelectionEvent::SkinShown("glock-dragon".to_string())));

        state.set_active_category(&catalog, Some(PISTOLS)).unwrap();
        assert!(state.take_events().is_empty());

        state.set_active_category(&catalog, Some(RIFLES)).unwrap();
        assert_eq!(state.active_weapon().map(String::as_str), Some("ak47"));
        let events = state.take_events();
        assert!(events.contains(&SelectionEvent::WeaponHidden("glock".to_string())));
        assert!(events.contains(&SelectionEvent::SkinHidden("glock-fade".to_string())));
        assert!(events.contains(&SelectionEvent::CategoryDeactivated(PISTOLS.to_string())));

        state.set_active_category(&catalog, None).unwrap();
        assert!(state.active_category().is_none());
        assert!(state.active_weapon().is_none());
    }

    #[test]
    fn weapon_activation_swaps_visible_skins() {
        let catalog = fixtures::catalog();
        let mut state = terrorist_state(&catalog);
        state.set_active_category(&catalog, Some(PISTOLS)).unwrap();
        state.take_events();

        state.set_active_weapon(&catalog, Some("p250")).unwrap();
        assert_eq!(
            state.take_events(),
            vec![
                SelectionEvent::SkinHidden("glock-fade".to_string()),
                SelectionEvent::SkinHidden("glock-dragon".to_string()),
                SelectionEvent::WeaponDeactivated("glock".to_string()),
                SelectionEvent::WeaponActivated("p250".to_string()),
                SelectionEvent::SkinShown("p250-sand".to_string()),
            ]
        );
        state.set_active_weapon(&catalog, Some("p250")).unwrap();
        assert!(state.take_events().is_empty());
        assert_eq!(
            state.set_active_weapon(&catalog, Some("railgun")),
            Err(SelectionError::UnknownWeapon("railgun".to_string()))
        );
    }

    #[test]
    fn category_tabs_track_selection() {
        let catalog = fixtures::catalog();
        let mut state = terrorist_state(&catalog);
        state.toggle_skin(&catalog, Some("glock-fade")).unwrap();
        state.toggle_skin(&catalog, Some("p250-sand")).unwrap();
        assert!(state.category_has_selection(&catalog, PISTOLS));
        assert!(!state.category_has_selection(&catalog, KNIVES));

        state.take_events();
        state.toggle_skin(&catalog, Some("glock-fade")).unwrap();
        assert!(state.category_has_selection(&catalog, PISTOLS));
        state.toggle_skin(&catalog, Some("p250-sand")).unwrap();
        assert!(state
            .take_events()
            .contains(&SelectionEvent::CategorySelectionChanged {
                category: PISTOLS.to_string(),
                has_selection: false,
            }));
    }

    #[test]
    fn affordability_follows_funds() {
        let catalog = fixtures::catalog();
        let mut state = terrorist_state(&catalog);
        let ak = catalog.weapon("ak47").unwrap().clone();
        assert_eq!(state.affordability(&ak), Affordability::Affordable);

        state.ledger.apply(-(MAX_FUNDS - 3100));
        assert_eq!(state.affordability(&ak), Affordability::OverBudget);
        let m4 = catalog.weapon("m4a4").unwrap();
        assert_eq!(state.affordability(m4), Affordability::Affordable);
    }
}
