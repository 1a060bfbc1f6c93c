use std::{cmp, io, thread, time::Duration};

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Tabs, Wrap},
    Frame, Terminal,
};
use loadout_core::{
    catalog::Catalog,
    error::{SelectionError, ValidationError},
    ledger::MAX_FUNDS,
    models::{Team, TeamChoice},
    navigation::{Navigation, Page},
    resource::LoadEvent,
    selection::{Affordability, SelectionEvent},
    session::LoadoutSession,
};
use tokio::sync::mpsc;
use tracing::{debug, error, info};

const TICK_RATE: Duration = Duration::from_millis(250);
const MAX_NAME_INPUT_LEN: usize = 32;
const FEED_COUNT: usize = 3;
const TEAM_CHOICES: [(TeamChoice, &str); 3] = [
    (TeamChoice::Side(Team::CounterTerrorist), "Counter-Terrorists"),
    (TeamChoice::Side(Team::Terrorist), "Terrorists"),
    (TeamChoice::Auto, "Auto (random side)"),
];
const TITLE: [&str; 5] = [
    "█    ███  ███  ████   ███  █  █ █████",
    "█   █   █ █  █ █   █ █   █ █  █   █  ",
    "█   █   █ ████ █   █ █   █ █  █   █  ",
    "█   █   █ █  █ █   █ █   █ █  █   █  ",
    "████ ███  █  █ ████   ███   ██    █  ",
];

#[derive(Debug, Clone)]
struct Theme {
    primary_fg: Color,
    accent: Color,
    muted: Color,
    selection_bg: Color,
    success: Color,
    warning: Color,
    danger: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary_fg: Color::White,
            accent: Color::Cyan,
            muted: Color::DarkGray,
            selection_bg: Color::DarkGray,
            success: Color::Green,
            warning: Color::Yellow,
            danger: Color::Red,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PromptTarget {
    PlayerName,
    TeamName,
}

impl PromptTarget {
    fn title(self) -> &'static str {
        match self {
            PromptTarget::PlayerName => "Player Name",
            PromptTarget::TeamName => "Team Name",
        }
    }
}

#[derive(Debug, Clone)]
struct TextPrompt {
    input: String,
    cursor: usize,
    target: PromptTarget,
}

impl TextPrompt {
    fn new(target: PromptTarget, current: &str) -> Self {
        let input: String = current
            .chars()
            .filter(|ch| ch.is_ascii() && !ch.is_ascii_control())
            .take(MAX_NAME_INPUT_LEN)
            .collect();
        Self {
            cursor: input.len(),
            input,
            target,
        }
    }

    fn move_cursor(&mut self, delta: isize) {
        let len = self.input.len() as isize;
        self.cursor = (self.cursor as isize + delta).clamp(0, len) as usize;
    }

    fn move_home(&mut self) {
        self.cursor = 0;
    }

    fn move_end(&mut self) {
        self.cursor = self.input.len();
    }

    fn insert(&mut self, ch: char) {
        if self.input.len() >= MAX_NAME_INPUT_LEN {
            return;
        }
        if ch.is_ascii() && !ch.is_ascii_control() {
            self.input.insert(self.cursor, ch);
            self.cursor += 1;
        }
    }

    fn backspace(&mut self) {
        if self.cursor > 0 && self.cursor <= self.input.len() {
            self.cursor -= 1;
            self.input.remove(self.cursor);
        }
    }

    fn delete(&mut self) {
        if self.cursor < self.input.len() {
            self.input.remove(self.cursor);
        }
    }
}

#[derive(Debug, Clone)]
struct Alert {
    title: String,
    message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WeaponFocus {
    Weapons,
    Skins,
}

enum AppEvent {
    Input(Event),
    Tick,
}

struct UiState {
    status: String,
    should_quit: bool,
    ticks: usize,
    team_cursor: usize,
    operator_cursor: usize,
    category_cursor: usize,
    weapon_cursor: usize,
    skin_cursor: usize,
    weapon_focus: WeaponFocus,
    shown_weapons: Vec<String>,
    shown_skins: Vec<String>,
    loads_pending: usize,
    failed_feeds: Vec<&'static str>,
    last_loaded: Option<DateTime<Local>>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            status: "Loading catalog...".to_string(),
            should_quit: false,
            ticks: 0,
            team_cursor: 0,
            operator_cursor: 0,
            category_cursor: 0,
            weapon_cursor: 0,
            skin_cursor: 0,
            weapon_focus: WeaponFocus::Weapons,
            shown_weapons: Vec::new(),
            shown_skins: Vec::new(),
            loads_pending: FEED_COUNT,
            failed_feeds: Vec::new(),
            last_loaded: None,
        }
    }
}

impl UiState {
    fn set_status(&mut self, message: impl Into<String>) {
        self.status = message.into();
    }

    fn reset_cursors(&mut self) {
        self.operator_cursor = 0;
        self.category_cursor = 0;
        self.weapon_cursor = 0;
        self.skin_cursor = 0;
        self.weapon_focus = WeaponFocus::Weapons;
    }
}

/// Terminal front end of the loadout wizard.
pub struct LoadoutApp {
    session: LoadoutSession,
    state: UiState,
    theme: Theme,
    prompt: Option<TextPrompt>,
    alert: Option<Alert>,
    load_rx: Option<mpsc::Receiver<LoadEvent>>,
}

impl LoadoutApp {
    pub fn new(session: LoadoutSession) -> Self {
        Self {
            session,
            state: UiState::default(),
            theme: Theme::default(),
            prompt: None,
            alert: None,
            load_rx: None,
        }
    }

    pub fn attach_loads(&mut self, receiver: mpsc::Receiver<LoadEvent>) {
        self.load_rx = Some(receiver);
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut stdout = io::stdout();
        enable_raw_mode().context("failed to enter raw mode")?;
        execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).context("failed to create terminal")?;
        terminal.hide_cursor()?;
        terminal.clear()?;

        let (event_tx, mut event_rx) = mpsc::channel::<AppEvent>(128);
        spawn_input_thread(event_tx);

        let mut load_rx = self.load_rx.take();

        loop {
            terminal.draw(|frame| self.draw(frame))?;
            if self.state.should_quit {
                break;
            }

            if let Some(rx) = load_rx.as_mut() {
                let mut loads_closed = false;
                tokio::select! {
                    maybe_event = event_rx.recv() => {
                        if !self.process_app_event(maybe_event) {
                            break;
                        }
                    }
                    maybe_load = rx.recv() => {
                        match maybe_load {
                            Some(event) => self.handle_load_event(event),
                            None => loads_closed = true,
                        }
                    }
                }
                if loads_closed {
                    load_rx = None;
                }
            } else {
                let maybe_event = event_rx.recv().await;
                if !self.process_app_event(maybe_event) {
                    break;
                }
            }
        }

        restore_terminal(&mut terminal)?;
        Ok(())
    }

    fn handle_load_event(&mut self, event: LoadEvent) {
        let feed = event.feed();
        let failed = event.is_err();
        self.state.loads_pending = self.state.loads_pending.saturating_sub(1);
        if failed {
            self.state.failed_feeds.push(feed);
            self.state
                .set_status(format!("Could not load {feed}; see logs/loadout.log"));
        }
        if let Err(err) = self.session.apply_load(event) {
            self.state.set_status(format!("Squad generation failed: {err}"));
        } else if !failed {
            if self.session.page() == Page::WeaponSelect {
                self.ensure_active_category();
            }
            info!(feed, "Feed merged");
            if self.state.loads_pending == 0 && self.state.failed_feeds.is_empty() {
                self.state.set_status("Catalog ready");
            } else {
                self.state.set_status(format!("Loaded {feed}"));
            }
        }
        self.state.last_loaded = self
            .session
            .catalog()
            .last_loaded_at()
            .map(|at| at.with_timezone(&Local));
        self.drain_selection_events();
        self.clamp_cursors();
    }

    fn process_app_event(&mut self, maybe_event: Option<AppEvent>) -> bool {
        match maybe_event {
            Some(AppEvent::Input(Event::Key(key))) => {
                if key.kind != KeyEventKind::Press {
                    return true;
                }
                if self.alert.is_some() {
                    self.handle_alert_key(key);
                } else if self.prompt.is_some() {
                    self.handle_prompt_key(key);
                } else {
                    self.handle_key(key);
                }
                self.drain_selection_events();
                true
            }
            Some(AppEvent::Input(_)) => true,
            Some(AppEvent::Tick) => {
                self.state.ticks = self.state.ticks.wrapping_add(1);
                true
            }
            None => false,
        }
    }

    fn drain_selection_events(&mut self) {
        for event in self.session.take_events() {
            debug!(?event, "Selection event");
            match event {
                SelectionEvent::TeamChanged(_) => self.state.reset_cursors(),
                SelectionEvent::CategoryActivated(category) => {
                    if let Some(index) = self
                        .session
                        .catalog()
                        .category_ids()
                        .iter()
                        .position(|id| *id == category)
                    {
                        self.state.category_cursor = index;
                    }
                    self.state.weapon_cursor = 0;
                }
                SelectionEvent::WeaponShown(weapon) => {
                    if !self.state.shown_weapons.contains(&weapon) {
                        self.state.shown_weapons.push(weapon);
                    }
                }
                SelectionEvent::WeaponHidden(weapon) => {
                    self.state.shown_weapons.retain(|id| *id != weapon);
                }
                SelectionEvent::SkinShown(skin) => {
                    if !self.state.shown_skins.contains(&skin) {
                        self.state.shown_skins.push(skin);
                    }
                }
                SelectionEvent::SkinHidden(skin) => self.state.shown_skins.retain(|id| *id != skin),
                SelectionEvent::WeaponActivated(weapon) => {
                    if let Some(index) = self.state.shown_weapons.iter().position(|id| *id == weapon) {
                        self.state.weapon_cursor = index;
                    }
                    self.state.skin_cursor = 0;
                }
                SelectionEvent::SkinSelected(skin) => {
                    if let Some(index) = self.state.shown_skins.iter().position(|id| *id == skin) {
                        self.state.skin_cursor = index;
                    }
                    if let Some(found) = self.session.catalog().skin(&skin) {
                        let message = format!("Picked {}", found.name);
                        self.state.set_status(message);
                    }
                }
                SelectionEvent::CategorySelectionChanged {
                    category,
                    has_selection: false,
                } => {
                    if let Some(found) = self.session.catalog().category(&category) {
                        let message = format!("{} needs a skin", found.name);
                        self.state.set_status(message);
                    }
                }
                SelectionEvent::FundsChanged(funds) if funds < 0 => {
                    self.state
                        .set_status(format!("Over budget by {}", format_currency(-funds)));
                }
                SelectionEvent::TeammatesRegenerated => {
                    self.state.set_status("Squad generated");
                }
                _ => {}
            }
        }
    }

    fn clamp_cursors(&mut self) {
        self.state.operator_cursor = clamp_cursor(self.state.operator_cursor, self.operator_ids().len());
        self.state.category_cursor = clamp_cursor(
            self.state.category_cursor,
            self.session.catalog().category_ids().len(),
        );
        self.state.weapon_cursor = clamp_cursor(self.state.weapon_cursor, self.weapon_ids().len());
        self.state.skin_cursor = clamp_cursor(self.state.skin_cursor, self.skin_ids().len());
    }

    fn operator_ids(&self) -> Vec<String> {
        match self.session.selection().team() {
            Some(team) => self
                .session
                .catalog()
                .operators_for(team)
                .into_iter()
                .map(|op| op.id.clone())
                .collect(),
            None => Vec::new(),
        }
    }

    fn weapon_ids(&self) -> Vec<String> {
        self.state.shown_weapons.clone()
    }

    fn skin_ids(&self) -> Vec<String> {
        self.state.shown_skins.clone()
    }

    fn handle_alert_key(&mut self, key: KeyEvent) {
        if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
            self.alert = None;
        }
    }

    fn handle_prompt_key(&mut self, key: KeyEvent) {
        let mut submit = None;
        let mut cancel = false;
        if let Some(prompt) = self.prompt.as_mut() {
            match key.code {
                KeyCode::Esc => cancel = true,
                KeyCode::Enter => submit = Some((prompt.target, prompt.input.clone())),
                KeyCode::Left => prompt.move_cursor(-1),
                KeyCode::Right => prompt.move_cursor(1),
                KeyCode::Home => prompt.move_home(),
                KeyCode::End => prompt.move_end(),
                KeyCode::Backspace => prompt.backspace(),
                KeyCode::Delete => prompt.delete(),
                KeyCode::Char(ch) => {
                    if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT {
                        prompt.insert(ch);
                    }
                }
                _ => {}
            }
        }

        if cancel {
            self.prompt = None;
            self.state.set_status("Edit cancelled");
            return;
        }
        if let Some((target, value)) = submit {
            self.prompt = None;
            match target {
                PromptTarget::PlayerName => self.session.set_player_name(value),
                PromptTarget::TeamName => self.session.set_team_name(value),
            }
            self.state.set_status(format!("{} updated", target.title()));
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if self.handle_global_shortcut(&key) {
            return;
        }
        match self.session.page() {
            Page::Start => {
                if key.code == KeyCode::Enter {
                    self.navigate(Page::TeamSelect);
                }
            }
            Page::TeamSelect => self.handle_team_key(key),
            Page::OperatorSelect => self.handle_operator_key(key),
            Page::WeaponSelect => self.handle_weapon_key(key),
            Page::CharacterSummary => {
                if key.code == KeyCode::Char('e') {
                    self.prompt = Some(TextPrompt::new(
                        PromptTarget::TeamName,
                        self.session.selection().team_name(),
                    ));
                }
            }
            Page::TeamSummary => {}
        }
    }

    fn handle_global_shortcut(&mut self, key: &KeyEvent) -> bool {
        if key.modifiers == KeyModifiers::CONTROL {
            match key.code {
                KeyCode::Char('r') => {
                    self.session.reset();
                    self.state.reset_cursors();
                    self.state.team_cursor = 0;
                    self.state.set_status("Started over");
                    return true;
                }
                KeyCode::Char('c') => {
                    self.state.should_quit = true;
                    return true;
                }
                _ => return false,
            }
        }
        if !key.modifiers.is_empty() && key.modifiers != KeyModifiers::SHIFT {
            return false;
        }
        match key.code {
            KeyCode::Char('q') => self.state.should_quit = true,
            KeyCode::Char('n') => {
                let result = self.session.next_page();
                self.after_navigation(result);
            }
            KeyCode::Char('p') => {
                let result = self.session.previous_page();
                self.after_navigation(Ok(result));
            }
            KeyCode::Char(ch @ '1'..='6') => {
                let index = ch as usize - '1' as usize;
                if let Some(page) = Page::from_index(index) {
                    self.navigate(page);
                }
            }
            _ => return false,
        }
        true
    }

    fn navigate(&mut self, page: Page) {
        let result = self.session.go_to(page);
        self.after_navigation(result);
    }

    fn after_navigation(&mut self, result: Result<Navigation, ValidationError>) {
        match result {
            Ok(Navigation::Moved(page)) => {
                self.state.set_status(format!("{} page", page.title()));
                if page == Page::WeaponSelect {
                    self.ensure_active_category();
                }
            }
            Ok(Navigation::Stayed) => {}
            Err(err) => {
                debug!(page = ?self.session.page(), %err, "Navigation blocked");
                self.alert = Some(Alert {
                    title: format!("Cannot leave {}", self.session.page().title()),
                    message: err.to_string(),
                });
            }
        }
    }

    fn ensure_active_category(&mut self) {
        if self.session.selection().active_category().is_some() {
            return;
        }
        let first = self.session.catalog().category_ids().first().cloned();
        if let Some(category) = first {
            let result = self.session.set_active_category(Some(category.as_str()));
            self.report(result);
        }
    }

    fn report(&mut self, result: Result<(), SelectionError>) {
        if let Err(err) = result {
            error!("Selection rejected: {err}");
            self.state.set_status(format!("Error: {err}"));
        }
    }

    fn handle_team_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.state.team_cursor = move_cursor(self.state.team_cursor, -1, TEAM_CHOICES.len());
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.state.team_cursor = move_cursor(self.state.team_cursor, 1, TEAM_CHOICES.len());
            }
            KeyCode::Enter => {
                let (choice, _) = TEAM_CHOICES[self.state.team_cursor];
                match self.session.choose_team(choice) {
                    Ok(team) => self.state.set_status(format!("Playing as {}", team.label())),
                    Err(err) => self.state.set_status(format!("Squad generation failed: {err}")),
                }
            }
            _ => {}
        }
    }

    fn handle_operator_key(&mut self, key: KeyEvent) {
        let operators = self.operator_ids();
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.state.operator_cursor = move_cursor(self.state.operator_cursor, -1, operators.len());
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.state.operator_cursor = move_cursor(self.state.operator_cursor, 1, operators.len());
            }
            KeyCode::Enter => {
                let Some(id) = operators.get(self.state.operator_cursor) else {
                    return;
                };
                let selected = self
                    .session
                    .selection()
                    .operator()
                    .is_some_and(|op| op.id == *id);
                let result = if selected {
                    self.session.select_operator(None)
                } else {
                    self.session.select_operator(Some(id.as_str()))
                };
                self.report(result);
            }
            KeyCode::Char('e') => {
                self.prompt = Some(TextPrompt::new(
                    PromptTarget::PlayerName,
                    self.session.selection().player_name(),
                ));
            }
            _ => {}
        }
    }

    fn handle_weapon_key(&mut self, key: KeyEvent) {
        let categories = self.session.catalog().category_ids().to_vec();
        match key.code {
            KeyCode::Left | KeyCode::Char('h') | KeyCode::Right | KeyCode::Char('l') => {
                if categories.is_empty() {
                    return;
                }
                self.state.weapon_focus = WeaponFocus::Weapons;
                if self.session.selection().active_category().is_none() {
                    let index = clamp_cursor(self.state.category_cursor, categories.len());
                    let result = self
                        .session
                        .set_active_category(Some(categories[index].as_str()));
                    self.report(result);
                    return;
                }
                let delta = if matches!(key.code, KeyCode::Left | KeyCode::Char('h')) {
                    -1
                } else {
                    1
                };
                let index = wrap_cursor(self.state.category_cursor, delta, categories.len());
                let result = self
                    .session
                    .set_active_category(Some(categories[index].as_str()));
                self.report(result);
            }
            KeyCode::Tab => {
                self.state.weapon_focus = match self.state.weapon_focus {
                    WeaponFocus::Weapons => WeaponFocus::Skins,
                    WeaponFocus::Skins => WeaponFocus::Weapons,
                };
            }
            KeyCode::Up | KeyCode::Char('k') => self.move_weapon_focus(-1),
            KeyCode::Down | KeyCode::Char('j') => self.move_weapon_focus(1),
            KeyCode::Enter | KeyCode::Char(' ') => match self.state.weapon_focus {
                WeaponFocus::Weapons => self.state.weapon_focus = WeaponFocus::Skins,
                WeaponFocus::Skins => {
                    if let Some(skin) = self.skin_ids().get(self.state.skin_cursor).cloned() {
                        let result = self.session.toggle_skin(Some(skin.as_str()));
                        self.report(result);
                    }
                }
            },
            KeyCode::Char('x') => {
                let result = self.session.toggle_skin(None);
                self.report(result);
                self.state.set_status("Cleared every skin");
            }
            _ => {}
        }
    }

    fn move_weapon_focus(&mut self, delta: isize) {
        match self.state.weapon_focus {
            WeaponFocus::Weapons => {
                let weapons = self.weapon_ids();
                self.state.weapon_cursor = move_cursor(self.state.weapon_cursor, delta, weapons.len());
                if let Some(weapon) = weapons.get(self.state.weapon_cursor) {
                    let result = self.session.set_active_weapon(Some(weapon.as_str()));
                    self.report(result);
                }
            }
            WeaponFocus::Skins => {
                self.state.skin_cursor =
                    move_cursor(self.state.skin_cursor, delta, self.skin_ids().len());
            }
        }
    }

    fn draw(&mut self, frame: &mut Frame) {
        let area = frame.size();
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(5),
                Constraint::Length(5),
            ])
            .split(area);

        self.render_breadcrumb(frame, layout[0]);
        match self.session.page() {
            Page::Start => self.draw_start(frame, layout[1]),
            Page::TeamSelect => self.draw_team_select(frame, layout[1]),
            Page::OperatorSelect => self.draw_operator_select(frame, layout[1]),
            Page::WeaponSelect => self.draw_weapon_select(frame, layout[1]),
            Page::CharacterSummary => self.draw_character_summary(frame, layout[1]),
            Page::TeamSummary => self.draw_team_summary(frame, layout[1]),
        }
        self.render_status(frame, layout[2]);

        if let Some(prompt) = &self.prompt {
            self.render_prompt(frame, prompt);
        }
        if let Some(alert) = &self.alert {
            self.render_alert(frame, alert);
        }
    }

    fn render_breadcrumb(&self, frame: &mut Frame, area: Rect) {
        let navigator = self.session.navigator();
        let mut spans = Vec::new();
        for (idx, page) in Page::ALL.iter().enumerate() {
            if idx > 0 {
                spans.push(Span::styled(" › ", Style::default().fg(self.theme.muted)));
            }
            let style = if *page == navigator.current() {
                Style::default()
                    .fg(self.theme.accent)
                    .add_modifier(Modifier::BOLD)
            } else if navigator.is_visited(*page) {
                Style::default().fg(self.theme.primary_fg)
            } else {
                Style::default().fg(self.theme.muted)
            };
            spans.push(Span::styled(format!("{} {}", idx + 1, page.title()), style));
        }

        let funds = self.session.selection().funds();
        let funds_style = if funds < 0 {
            Style::default().fg(self.theme.danger).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.theme.success)
        };
        spans.push(Span::raw("   "));
        spans.push(Span::styled(format!("Funds {}", format_currency(funds)), funds_style));

        let paragraph = Paragraph::new(Line::from(spans))
            .block(Block::default().borders(Borders::ALL).title("Loadout"));
        frame.render_widget(paragraph, area);
    }

    fn draw_start(&self, frame: &mut Frame, area: Rect) {
        let mut lines: Vec<Line> = TITLE
            .iter()
            .map(|line| {
                Line::from(Span::styled(
                    *line,
                    Style::default()
                        .fg(self.theme.accent)
                        .add_modifier(Modifier::BOLD),
                ))
            })
            .collect();
        lines.push(Line::from(""));
        lines.push(Line::from(
            "Pick a side, an operator and a skin for every weapon category.",
        ));
        lines.push(Line::from(format!(
            "You have {} to spend. Three teammates are drafted for you.",
            format_currency(MAX_FUNDS)
        )));
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Press Enter to begin",
            Style::default().fg(self.theme.warning),
        )));

        let height = (lines.len() as u16 + 2).min(area.height);
        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, centered_rect(area.width, height, area));
    }

    fn draw_team_select(&self, frame: &mut Frame, area: Rect) {
        let current = self.session.selection().team();
        let lines: Vec<Line> = TEAM_CHOICES
            .iter()
            .enumerate()
            .map(|(idx, (choice, label))| {
                let chosen = matches!(choice, TeamChoice::Side(team) if Some(*team) == current);
                let suffix = if chosen { "  (current)" } else { "" };
                if idx == self.state.team_cursor {
                    Line::from(Span::styled(
                        format!("▶ {label}{suffix}"),
                        Style::default()
                            .fg(self.theme.accent)
                            .add_modifier(Modifier::BOLD),
                    ))
                } else {
                    Line::from(Span::styled(
                        format!("  {label}{suffix}"),
                        Style::default().fg(self.theme.primary_fg),
                    ))
                }
            })
            .collect();

        let height = (TEAM_CHOICES.len() as u16 * 2 + 2).min(area.height);
        let width = 40_u16.min(area.width.max(1));
        let menu = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("Choose a Side"))
            .alignment(Alignment::Left);
        frame.render_widget(menu, centered_rect(width, height, area));
    }

    fn draw_operator_select(&self, frame: &mut Frame, area: Rect) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(area);

        let selection = self.session.selection();
        let operators = selection
            .team()
            .map(|team| self.session.catalog().operators_for(team))
            .unwrap_or_default();
        let items: Vec<ListItem> = operators
            .iter()
            .map(|op| {
                let chosen = selection.operator().is_some_and(|current| current.id == op.id);
                let marker = if chosen {
                    Span::styled("● ", Style::default().fg(self.theme.success))
                } else {
                    Span::raw("  ")
                };
                ListItem::new(Line::from(vec![
                    marker,
                    Span::styled(op.name.clone(), Style::default().fg(self.theme.primary_fg)),
                ]))
            })
            .collect();
        let title = if self.session.catalog().has_operators() {
            format!("Operators ({})", operators.len())
        } else {
            format!("Operators (loading{})", spinner(self.state.ticks))
        };
        let mut list_state = ListState::default();
        if !operators.is_empty() {
            list_state.select(Some(self.state.operator_cursor.min(operators.len() - 1)));
        }
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(title))
            .highlight_style(Style::default().bg(self.theme.selection_bg));
        frame.render_stateful_widget(list, columns[0], &mut list_state);

        let player = if selection.player_name().is_empty() {
            Span::styled("(not set)", Style::default().fg(self.theme.muted))
        } else {
            Span::raw(selection.player_name().to_string())
        };
        let operator = selection
            .operator()
            .map(|op| Span::raw(op.name.clone()))
            .unwrap_or_else(|| Span::styled("(none)", Style::default().fg(self.theme.muted)));
        let details = Paragraph::new(vec![
            Line::from(vec![Span::raw("Side:     "), Span::raw(team_label(selection.team()))]),
            Line::from(vec![Span::raw("Operator: "), operator]),
            Line::from(vec![Span::raw("Player:   "), player]),
            Line::from(""),
            Line::from(Span::styled(
                "One word, at most 20 characters.",
                Style::default().fg(self.theme.muted),
            )),
        ])
        .block(Block::default().borders(Borders::ALL).title("Character"))
        .wrap(Wrap { trim: true });
        frame.render_widget(details, columns[1]);
    }

    fn draw_weapon_select(&self, frame: &mut Frame, area: Rect) {
        let catalog = self.session.catalog();
        let selection = self.session.selection();
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(3)])
            .split(area);

        let titles: Vec<Line> = catalog
            .categories()
            .map(|category| {
                if selection.category_has_selection(catalog, &category.id) {
                    Line::from(Span::styled(
                        format!("{} ✓", category.name),
                        Style::default().fg(self.theme.success),
                    ))
                } else {
                    Line::from(category.name.clone())
                }
            })
            .collect();
        let tabs_title = if catalog.has_skins() {
            "Categories".to_string()
        } else {
            format!("Categories (loading{})", spinner(self.state.ticks))
        };
        let active_index = selection
            .active_category()
            .and_then(|active| catalog.category_ids().iter().position(|id| id == active))
            .unwrap_or(0);
        let tabs = Tabs::new(titles)
            .block(Block::default().borders(Borders::ALL).title(tabs_title))
            .select(active_index)
            .highlight_style(
                Style::default()
                    .fg(self.theme.accent)
                    .add_modifier(Modifier::BOLD),
            );
        frame.render_widget(tabs, rows[0]);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(40),
                Constraint::Percentage(40),
                Constraint::Percentage(20),
            ])
            .split(rows[1]);

        let weapons: Vec<_> = self
            .state
            .shown_weapons
            .iter()
            .filter_map(|id| catalog.weapon(id))
            .collect();
        let weapon_items: Vec<ListItem> = weapons
            .iter()
            .map(|weapon| {
                let price_color = match selection.affordability(weapon) {
                    Affordability::Affordable => self.theme.success,
                    Affordability::OverBudget => self.theme.danger,
                };
                let active = selection.active_weapon() == Some(&weapon.id);
                let owned = selection.selected_skin_for(&weapon.id).is_some();
                let marker = match (active, owned) {
                    (true, _) => Span::styled("▶ ", Style::default().fg(self.theme.accent)),
                    (false, true) => Span::styled("● ", Style::default().fg(self.theme.success)),
                    (false, false) => Span::raw("  "),
                };
                ListItem::new(Line::from(vec![
                    marker,
                    Span::raw(format!("{:<18}", weapon.name)),
                    Span::styled(
                        format_currency(i64::from(weapon.price)),
                        Style::default().fg(price_color),
                    ),
                ]))
            })
            .collect();
        let mut weapon_state = ListState::default();
        if !weapons.is_empty() && self.state.weapon_focus == WeaponFocus::Weapons {
            weapon_state.select(Some(self.state.weapon_cursor.min(weapons.len() - 1)));
        }
        let weapon_list = List::new(weapon_items)
            .block(self.focus_block("Weapons", self.state.weapon_focus == WeaponFocus::Weapons))
            .highlight_style(Style::default().bg(self.theme.selection_bg));
        frame.render_stateful_widget(weapon_list, columns[0], &mut weapon_state);

        let skins: Vec<_> = self
            .state
            .shown_skins
            .iter()
            .filter_map(|id| catalog.skin(id))
            .collect();
        let skin_items: Vec<ListItem> = skins
            .iter()
            .map(|skin| {
                let (mark, style) = if selection.is_skin_selected(&skin.id) {
                    ("[x] ", Style::default().fg(self.theme.success))
                } else {
                    ("[ ] ", Style::default().fg(self.theme.primary_fg))
                };
                ListItem::new(Line::from(Span::styled(format!("{mark}{}", skin.name), style)))
            })
            .collect();
        let mut skin_state = ListState::default();
        if !skins.is_empty() && self.state.weapon_focus == WeaponFocus::Skins {
            skin_state.select(Some(self.state.skin_cursor.min(skins.len() - 1)));
        }
        let skin_list = List::new(skin_items)
            .block(self.focus_block("Skins", self.state.weapon_focus == WeaponFocus::Skins))
            .highlight_style(Style::default().bg(self.theme.selection_bg));
        frame.render_stateful_widget(skin_list, columns[1], &mut skin_state);

        let funds = selection.funds();
        let funds_color = if selection.ledger().is_over_budget() {
            self.theme.danger
        } else {
            self.theme.success
        };
        let budget = Paragraph::new(vec![
            Line::from("Remaining"),
            Line::from(Span::styled(
                format_currency(funds),
                Style::default().fg(funds_color).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(format!("Spent {}", format_currency(selection.ledger().spent()))),
            Line::from(format!("Skins {}", selection.selected_count())),
        ])
        .block(Block::default().borders(Borders::ALL).title("Budget"));
        frame.render_widget(budget, columns[2]);
    }

    fn focus_block(&self, title: &'static str, focused: bool) -> Block<'static> {
        let style = if focused {
            Style::default().fg(self.theme.accent)
        } else {
            Style::default().fg(self.theme.muted)
        };
        Block::default()
            .borders(Borders::ALL)
            .border_style(style)
            .title(title)
    }

    fn draw_character_summary(&self, frame: &mut Frame, area: Rect) {
        let catalog = self.session.catalog();
        let selection = self.session.selection();
        let team_name = if selection.team_name().is_empty() {
            Span::styled("(press e to name your team)", Style::default().fg(self.theme.muted))
        } else {
            Span::styled(
                selection.team_name().to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            )
        };

        let mut lines = vec![
            Line::from(vec![Span::raw("Team name: "), team_name]),
            Line::from(format!("Side:      {}", team_label(selection.team()))),
            Line::from(format!(
                "Operator:  {}",
                selection.operator().map(|op| op.name.as_str()).unwrap_or("-")
            )),
            Line::from(format!("Player:    {}", selection.player_name())),
            Line::from(""),
            Line::from(Span::styled(
                "Loadout",
                Style::default()
                    .fg(self.theme.accent)
                    .add_modifier(Modifier::BOLD),
            )),
        ];
        lines.extend(
            loadout_lines(catalog, selection.selected_skins())
                .into_iter()
                .map(Line::from),
        );
        lines.push(Line::from(""));
        lines.push(Line::from(format!(
            "Spent {}   Remaining {}",
            format_currency(selection.ledger().spent()),
            format_currency(selection.funds())
        )));

        let paragraph = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("Your Character"))
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, area);
    }

    fn draw_team_summary(&self, frame: &mut Frame, area: Rect) {
        let catalog = self.session.catalog();
        let selection = self.session.selection();
        let mates = selection.teammates();
        let constraints: Vec<Constraint> = (0..=mates.len())
            .map(|_| Constraint::Ratio(1, mates.len() as u32 + 1))
            .collect();
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(constraints)
            .split(area);

        let mut player_lines = vec![Line::from(Span::styled(
            selection.operator().map(|op| op.name.clone()).unwrap_or_default(),
            Style::default().fg(self.theme.muted),
        ))];
        player_lines.extend(
            loadout_lines(catalog, selection.selected_skins())
                .into_iter()
                .map(Line::from),
        );
        player_lines.push(Line::from(format!(
            "Cost {}",
            format_currency(selection.ledger().spent())
        )));
        let title = format!("{} (you)", selection.player_name());
        frame.render_widget(
            Paragraph::new(player_lines)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(self.theme.accent))
                        .title(title),
                )
                .wrap(Wrap { trim: true }),
            columns[0],
        );

        for (mate, column) in mates.iter().zip(columns.iter().skip(1)) {
            let mut lines = vec![Line::from(Span::styled(
                mate.operator.name.clone(),
                Style::default().fg(self.theme.muted),
            ))];
            lines.extend(loadout_lines(catalog, mate.loadout.iter()).into_iter().map(Line::from));
            lines.push(Line::from(format!(
                "Cost {}",
                format_currency(loadout_cost(catalog, mate.loadout.iter()) as i64)
            )));
            frame.render_widget(
                Paragraph::new(lines)
                    .block(Block::default().borders(Borders::ALL).title(mate.name.clone()))
                    .wrap(Wrap { trim: true }),
                *column,
            );
        }
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let feeds = if self.state.loads_pending > 0 {
            format!(
                "Feeds: {} of {FEED_COUNT} pending{}",
                self.state.loads_pending,
                spinner(self.state.ticks)
            )
        } else if self.state.failed_feeds.is_empty() {
            "Feeds: all loaded".to_string()
        } else {
            format!("Feeds: failed {}", self.state.failed_feeds.join(", "))
        };
        let updated = self
            .state
            .last_loaded
            .map(|at| format!("  Last update {}", at.format("%H:%M:%S")))
            .unwrap_or_default();
        let help = Line::from(Span::styled(
            page_help(self.session.page()),
            Style::default().fg(self.theme.muted),
        ));
        let paragraph = Paragraph::new(vec![
            Line::from(self.state.status.clone()),
            Line::from(format!("{feeds}{updated}")),
            help,
        ])
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn render_prompt(&self, frame: &mut Frame, prompt: &TextPrompt) {
        let frame_area = frame.size();
        let width = cmp::max(cmp::min(50_u16, frame_area.width.saturating_sub(4)), 24_u16);
        let height = 6_u16.min(frame_area.height.saturating_sub(2)).max(5_u16);
        let area = centered_rect(width, height, frame_area);

        frame.render_widget(Clear, area);

        let input_line = Line::from(vec![
            Span::styled("> ", Style::default().fg(self.theme.accent)),
            Span::raw(prompt.input.clone()),
        ]);
        let helper = Line::from(vec![
            Span::styled("Enter", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" save  "),
            Span::styled("Esc", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" cancel"),
        ]);
        let paragraph = Paragraph::new(vec![input_line, Line::from(""), helper])
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(prompt.target.title()),
            )
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);

        let cursor_x =
            (area.x + 3 + prompt.cursor as u16).min(area.x + area.width.saturating_sub(2));
        frame.set_cursor(cursor_x, area.y + 1);
    }

    fn render_alert(&self, frame: &mut Frame, alert: &Alert) {
        let frame_area = frame.size();
        let width = cmp::min(60_u16, frame_area.width.saturating_sub(4)).max(24);
        let area = centered_rect(width, 7, frame_area);
        frame.render_widget(Clear, area);

        let paragraph = Paragraph::new(vec![
            Line::from(Span::styled(
                alert.message.clone(),
                Style::default().fg(self.theme.warning),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Press Enter to continue",
                Style::default().fg(self.theme.muted),
            )),
        ])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(self.theme.danger))
                .title(alert.title.clone()),
        )
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor()?;
    Ok(())
}

fn spawn_input_thread(sender: mpsc::Sender<AppEvent>) {
    thread::spawn(move || loop {
        match event::poll(TICK_RATE) {
            Ok(true) => match event::read() {
                Ok(evt) => {
                    if sender.blocking_send(AppEvent::Input(evt)).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            },
            Ok(false) => {
                if sender.blocking_send(AppEvent::Tick).is_err() {
                    break;
                }
            }
            Err(_) => break,
        }
    });
}

fn page_help(page: Page) -> &'static str {
    match page {
        Page::Start => "Enter begin · 1-6 jump · n/p next/prev · Ctrl+R reset · q quit",
        Page::TeamSelect => "↑/↓ move · Enter choose · n next · p back · q quit",
        Page::OperatorSelect => "↑/↓ move · Enter select · e edit name · n next · p back",
        Page::WeaponSelect => "←/→ category · Tab focus · ↑/↓ move · Enter pick · x clear · n next",
        Page::CharacterSummary => "e edit team name · n next · p back",
        Page::TeamSummary => "p back · Ctrl+R start over · q quit",
    }
}

fn team_label(team: Option<Team>) -> &'static str {
    team.map(Team::label).unwrap_or("-")
}

fn spinner(ticks: usize) -> &'static str {
    match ticks % 4 {
        0 => "",
        1 => ".",
        2 => "..",
        _ => "...",
    }
}

/// `"Category  Weapon | Skin  $price"` per skin, in catalog category order.
fn loadout_lines<'a>(catalog: &Catalog, skins: impl Iterator<Item = &'a String>) -> Vec<String> {
    let mut rows: Vec<(usize, String)> = skins
        .filter_map(|skin_id| {
            let skin = catalog.skin(skin_id)?;
            let weapon = catalog.weapon(&skin.weapon_id)?;
            let category = catalog.category(&weapon.category_id)?;
            let order = catalog
                .category_ids()
                .iter()
                .position(|id| *id == category.id)
                .unwrap_or(usize::MAX);
            Some((
                order,
                format!(
                    "{:<10} {} | {}  {}",
                    category.name,
                    weapon.name,
                    skin.name,
                    format_currency(i64::from(weapon.price))
                ),
            ))
        })
        .collect();
    rows.sort_by_key(|(order, _)| *order);
    if rows.is_empty() {
        return vec!["(no skins selected)".to_string()];
    }
    rows.into_iter().map(|(_, line)| line).collect()
}

fn loadout_cost<'a>(catalog: &Catalog, skins: impl Iterator<Item = &'a String>) -> u64 {
    skins
        .filter_map(|skin_id| catalog.skin_price(skin_id))
        .map(u64::from)
        .sum()
}

fn clamp_cursor(cursor: usize, len: usize) -> usize {
    cursor.min(len.saturating_sub(1))
}

fn move_cursor(cursor: usize, delta: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    (cursor as isize + delta).clamp(0, len as isize - 1) as usize
}

fn wrap_cursor(cursor: usize, delta: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    (cursor as isize + delta).rem_euclid(len as isize) as usize
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

fn format_currency(value: i64) -> String {
    if value < 0 {
        format!("-${}", -value)
    } else {
        format!("${value}")
    }
}
