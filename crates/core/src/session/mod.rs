#![allow(missing_docs)]

//! One wizard run: catalog, selection, page navigation and the session RNG.

use rand::{rngs::StdRng, SeedableRng};
use tracing::{error, info, warn};

use crate::{
    catalog::Catalog,
    error::{GenerationError, SelectionError, ValidationError},
    models::{Team, TeamChoice},
    navigation::{Navigation, Navigator, Page},
    resource::LoadEvent,
    selection::{SelectionEvent, SelectionState},
};

/// Owns all mutable state of a wizard run.
///
/// Frontends call the operations below and then drain
/// [`LoadoutSession::take_events`] to update their views.
#[derive(Debug)]
pub struct LoadoutSession {
    catalog: Catalog,
    selection: SelectionState,
    navigator: Navigator,
    rng: StdRng,
}

impl LoadoutSession {
    /// Empty session; a `seed` makes every random draw reproducible.
    pub fn new(seed: Option<u64>) -> Self {
        Self::with_catalog(Catalog::default(), seed)
    }

    /// Session over an already-built catalog.
    pub fn with_catalog(catalog: Catalog, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            catalog,
            selection: SelectionState::new(),
            navigator: Navigator::new(),
            rng,
        }
    }

    /// Loaded catalog data.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The player's choices.
    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    /// Page position and history.
    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    /// Page currently shown.
    pub fn page(&self) -> Page {
        self.navigator.current()
    }

    /// Drain queued selection events.
    pub fn take_events(&mut self) -> Vec<SelectionEvent> {
        self.selection.take_events()
    }

    /// Merge a finished feed load into the catalog.
    ///
    /// Returns an error only when teammates had to be generated and that
    /// failed; feed failures are logged and leave their catalog part empty.
    pub fn apply_load(&mut self, event: LoadEvent) -> Result<(), GenerationError> {
        match event {
            LoadEvent::Operators(Ok(operators)) => {
                self.catalog.set_operators(operators);
                self.fill_missing_teammates()
            }
            LoadEvent::Skins(Ok(index)) => {
                self.catalog.set_skin_index(index);
                self.fill_missing_teammates()
            }
            LoadEvent::Names(Ok(names)) => {
                self.selection.rename_teammates(&names);
                self.catalog.set_names(names);
                Ok(())
            }
            LoadEvent::Operators(Err(err))
            | LoadEvent::Skins(Err(err))
            | LoadEvent::Names(Err(err)) => {
                warn!("Feed unavailable, continuing without it: {err:#}");
                Ok(())
            }
        }
    }

    fn fill_missing_teammates(&mut self) -> Result<(), GenerationError> {
        if self.selection.team().is_none() || !self.selection.teammates().is_empty() {
            return Ok(());
        }
        if let Err(err) = self
            .selection
            .regenerate_teammates(&self.catalog, &mut self.rng)
        {
            error!("Teammate generation failed: {err}");
            return Err(err);
        }
        Ok(())
    }

    /// Pick a side; `Auto` picks one at random.
    ///
    /// A real change forgets every page after team selection.
    pub fn choose_team(&mut self, choice: TeamChoice) -> Result<Team, GenerationError> {
        let team = choice.resolve(&mut self.rng);
        let result = self
            .selection
            .set_team(Some(team), &self.catalog, &mut self.rng);
        if !matches!(result, Ok(false)) {
            self.navigator.reset_to_team_select();
        }
        match result {
            Ok(_) => Ok(team),
            Err(err) => {
                error!("Teammate generation failed: {err}");
                Err(err)
            }
        }
    }

    pub fn select_operator(&mut self, operator_id: Option<&str>) -> Result<(), SelectionError> {
        self.selection.set_operator(&self.catalog, operator_id)
    }

    pub fn set_player_name(&mut self, name: impl Into<String>) {
        self.selection.set_player_name(name);
    }

    pub fn set_team_name(&mut self, name: impl Into<String>) {
        self.selection.set_team_name(name);
    }

    pub fn set_active_category(&mut self, category_id: Option<&str>) -> Result<(), SelectionError> {
        self.selection.set_active_category(&self.catalog, category_id)
    }

    pub fn set_active_weapon(&mut self, weapon_id: Option<&str>) -> Result<(), SelectionError> {
        self.selection.set_active_weapon(&self.catalog, weapon_id)
    }

    pub fn toggle_skin(&mut self, skin_id: Option<&str>) -> Result<(), SelectionError> {
        self.selection.toggle_skin(&self.catalog, skin_id)
    }

    /// Jump to `page`, validating every page passed on the way forward.
    pub fn go_to(&mut self, page: Page) -> Result<Navigation, ValidationError> {
        self.navigator.go_to(page, &self.selection, &self.catalog)
    }

    pub fn next_page(&mut self) -> Result<Navigation, ValidationError> {
        self.navigator.next(&self.selection, &self.catalog)
    }

    pub fn previous_page(&mut self) -> Navigation {
        self.navigator.back()
    }

    /// Start over: no team, no choices, back on the start page.
    pub fn reset(&mut self) {
        self.selection.reset(&self.catalog);
        self.navigator.reset();
        info!("Session reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{fixtures, SkinIndex};
    use crate::ledger::MAX_FUNDS;

    fn fixture_session() -> LoadoutSession {
        LoadoutSession::with_catalog(fixtures::catalog(), Some(99))
    }

    fn complete_loadout(session: &mut LoadoutSession) {
        session.choose_team(TeamChoice::Side(Team::Terrorist)).unwrap();
        session.go_to(Page::OperatorSelect).unwrap();
        session.select_operator(Some("t-1")).unwrap();
        session.set_player_name("Bob");
        session.go_to(Page::WeaponSelect).unwrap();
        for skin in ["glock-fade", "ak-redline", "bayonet-fade"] {
            session.toggle_skin(Some(skin)).unwrap();
        }
    }

    #[test]
    fn full_walkthrough_reaches_team_summary() {
        let mut session = fixture_session();
        assert_eq!(session.next_page(), Ok(Navigation::Moved(Page::TeamSelect)));
        complete_loadout(&mut session);
        assert_eq!(session.selection().funds(), MAX_FUNDS - 650 - 3200 - 800);

        assert_eq!(
            session.next_page(),
            Ok(Navigation::Moved(Page::CharacterSummary))
        );
        assert_eq!(session.next_page(), Err(ValidationError::TeamNameEmpty));
        session.set_team_name("Alpha");
        assert_eq!(session.next_page(), Ok(Navigation::Moved(Page::TeamSummary)));
        assert_eq!(session.next_page(), Ok(Navigation::Stayed));
        assert_eq!(session.selection().teammates().len(), 3);
    }

    #[test]
    fn changing_team_resets_visited_pages() {
        let mut session = fixture_session();
        complete_loadout(&mut session);
        assert!(session.navigator().is_visited(Page::WeaponSelect));

        session.previous_page();
        session.previous_page();
        assert_eq!(session.page(), Page::TeamSelect);
        session
            .choose_team(TeamChoice::Side(Team::Terrorist))
            .unwrap();
        assert!(session.navigator().is_visited(Page::WeaponSelect));

        session
            .choose_team(TeamChoice::Side(Team::CounterTerrorist))
            .unwrap();
        assert_eq!(
            session.navigator().visited().collect::<Vec<_>>(),
            vec![Page::Start, Page::TeamSelect]
        );
        assert_eq!(session.selection().funds(), MAX_FUNDS);
        assert!(session.selection().operator().is_none());
    }

    #[test]
    fn auto_team_resolves_to_a_side() {
        let mut session = fixture_session();
        let team = session.choose_team(TeamChoice::Auto).unwrap();
        assert_eq!(session.selection().team(), Some(team));
        assert!(session
            .selection()
            .teammates()
            .iter()
            .all(|mate| mate.operator.team == team));
    }

    #[test]
    fn reset_returns_to_start() {
        let mut session = fixture_session();
        complete_loadout(&mut session);
        session.reset();
        assert_eq!(session.page(), Page::Start);
        assert_eq!(session.navigator().visited().collect::<Vec<_>>(), vec![Page::Start]);
        assert_eq!(session.selection().team(), None);
        assert_eq!(session.selection().selected_count(), 0);
        assert!(session.selection().teammates().is_empty());
    }

    #[test]
    fn late_loads_fill_in_teammates() {
        let full = fixtures::catalog();
        let mut session = LoadoutSession::new(Some(5));
        session
            .choose_team(TeamChoice::Side(Team::CounterTerrorist))
            .unwrap();
        assert!(session.selection().teammates().is_empty());

        session
            .apply_load(LoadEvent::Names(Err(anyhow::anyhow!("offline"))))
            .unwrap();
        session
            .apply_load(LoadEvent::Operators(Ok(full.operators().to_vec())))
            .unwrap();
        assert!(session.selection().teammates().is_empty());

        let mut index = SkinIndex::default();
        for category in full.categories() {
            index.category_order.push(category.id.clone());
            index.categories.insert(category.id.clone(), category.clone());
            for weapon in full.weapons_in(&category.id) {
                index
                    .weapons_by_category
                    .entry(category.id.clone())
                    .or_default()
                    .push(weapon.id.clone());
                index.weapons.insert(weapon.id.clone(), weapon.clone());
                for skin in full.skins_of(&weapon.id) {
                    index.skins.insert(skin.id.clone(), skin.clone());
                }
            }
        }
        session.apply_load(LoadEvent::Skins(Ok(index))).unwrap();
        let names: Vec<_> = session
            .selection()
            .teammates()
            .iter()
            .map(|mate| mate.name.clone())
            .collect();
        assert_eq!(names, vec!["Bot 1", "Bot 2", "Bot 3"]);

        session
            .apply_load(LoadEvent::Names(Ok(vec!["ace".to_string(), "kilo".to_string()])))
            .unwrap();
        let names: Vec<_> = session
            .selection()
            .teammates()
            .iter()
            .map(|mate| mate.name.clone())
            .collect();
        assert_eq!(names, vec!["ace", "kilo", "Bot 3"]);
    }
}
