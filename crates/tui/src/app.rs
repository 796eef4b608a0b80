use std::{io, thread, time::Duration};

use anyhow::{Context, Result};
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
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame, Terminal,
};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};
use vqtui_core::{
    config::AppConfig,
    dataset::{DatasetLoader, DatasetStore, LoadError},
    featured::FeaturedEvent,
    filter::{FilterOptions, FilterRules},
    models::{Entry, Mode},
    prefs::{Preferences, ThemeChoice},
    view::{build_area_view, AreaView, FoeView},
};

const TICK_RATE: Duration = Duration::from_millis(200);
const MAX_FEATURED_ATTEMPTS: u32 = 25;
const FOE_SCROLL_STEP: usize = 8;

#[derive(Debug, Clone)]
struct Theme {
    primary_fg: Color,
    accent: Color,
    muted: Color,
    selection_bg: Color,
    selection_fg: Color,
    danger: Color,
}

impl Theme {
    fn dark() -> Self {
        Self {
            primary_fg: Color::White,
            accent: Color::Cyan,
            muted: Color::DarkGray,
            selection_bg: Color::DarkGray,
            selection_fg: Color::White,
            danger: Color::Red,
        }
    }

    fn light() -> Self {
        Self {
            primary_fg: Color::Black,
            accent: Color::Blue,
            muted: Color::Gray,
            selection_bg: Color::Gray,
            selection_fg: Color::Black,
            danger: Color::Red,
        }
    }

    fn for_choice(choice: ThemeChoice) -> Self {
        match choice {
            ThemeChoice::Dark => Self::dark(),
            ThemeChoice::Light => Self::light(),
        }
    }
}

fn parse_hex_color(input: &str) -> Option<Color> {
    let trimmed = input.trim();
    let hex = trimmed.strip_prefix('#').unwrap_or(trimmed);
    match hex.len() {
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some(Color::Rgb(r, g, b))
        }
        3 => {
            let r = u8::from_str_radix(&hex[0..1].repeat(2), 16).ok()?;
            let g = u8::from_str_radix(&hex[1..2].repeat(2), 16).ok()?;
            let b = u8::from_str_radix(&hex[2..3].repeat(2), 16).ok()?;
            Some(Color::Rgb(r, g, b))
        }
        _ => None,
    }
}

fn contrast_color(color: &Color, fallback: Color) -> Color {
    match color {
        Color::Rgb(r, g, b) => {
            let luminance = 0.299 * f64::from(*r) + 0.587 * f64::from(*g) + 0.114 * f64::from(*b);
            if luminance > 186.0 {
                Color::Black
            } else {
                Color::White
            }
        }
        _ => fallback,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Campaigns,
    Areas,
}

#[derive(Debug)]
enum AppEvent {
    Input(Event),
    Tick,
    DatasetLoaded(Result<Vec<Entry>, LoadError>),
}

/// Terminal application state for the vanquish companion.
pub struct VqApp {
    store: DatasetStore,
    loader: DatasetLoader,
    rules: FilterRules,
    prefs: Preferences,
    state: UiState,
    theme: Theme,
    current: Option<Entry>,
    view: Option<AreaView>,
    load_finished: bool,
    load_failed: Option<String>,
    pending_featured: Option<String>,
    featured_attempts: u32,
    featured_applied: bool,
    featured_rx: Option<mpsc::Receiver<FeaturedEvent>>,
}

impl VqApp {
    pub fn new(
        store: DatasetStore,
        loader: DatasetLoader,
        config: AppConfig,
        prefs: Preferences,
    ) -> Self {
        let theme = Theme::for_choice(prefs.theme);
        let state = UiState {
            notice_open: !prefs.notice_acknowledged,
            ..UiState::default()
        };
        Self {
            store,
            loader,
            rules: config.filter_rules(),
            prefs,
            state,
            theme,
            current: None,
            view: None,
            load_finished: false,
            load_failed: None,
            pending_featured: None,
            featured_attempts: 0,
            featured_applied: false,
            featured_rx: None,
        }
    }

    /// Attach the channel carrying the featured-vanquish outcome.
    pub fn attach_featured(&mut self, receiver: mpsc::Receiver<FeaturedEvent>) {
        self.featured_rx = Some(receiver);
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
        spawn_input_thread(event_tx.clone());

        let loader = self.loader.clone();
        tokio::spawn(async move {
            let result = loader.load().await;
            let _ = event_tx.send(AppEvent::DatasetLoaded(result)).await;
        });
        self.state.set_status("Loading dataset…".to_string());

        let mut featured_rx = self.featured_rx.take();

        loop {
            terminal.draw(|frame| self.draw(frame))?;
            if self.state.should_quit {
                break;
            }

            if featured_rx.is_some() {
                let mut featured_closed = false;
                let rx = featured_rx.as_mut().unwrap();
                tokio::select! {
                    maybe_event = event_rx.recv() => {
                        if !self.process_app_event(maybe_event) {
                            break;
                        }
                    }
                    maybe_featured = rx.recv() => {
                        match maybe_featured {
                            Some(event) => self.handle_featured_event(event),
                            None => featured_closed = true,
                        }
                    }
                }
                if featured_closed {
                    featured_rx = None;
                }
            } else {
                let maybe_event = event_rx.recv().await;
                if !self.process_app_event(maybe_event) {
                    break;
                }
            }

            if self.state.should_quit {
                break;
            }
        }

        restore_terminal(&mut terminal)?;
        Ok(())
    }

    fn process_app_event(&mut self, maybe_event: Option<AppEvent>) -> bool {
        match maybe_event {
            Some(AppEvent::Input(event)) => {
                self.handle_input(event);
                true
            }
            Some(AppEvent::Tick) => {
                self.handle_tick();
                true
            }
            Some(AppEvent::DatasetLoaded(result)) => {
                self.handle_dataset_loaded(result);
                true
            }
            None => false,
        }
    }

    fn handle_dataset_loaded(&mut self, result: Result<Vec<Entry>, LoadError>) {
        self.load_finished = true;
        match result {
            Ok(entries) => {
                self.store.install(entries);
                self.state.campaigns = self.store.campaigns();
                self.state.campaign_cursor = 0;
                self.refresh_areas();
                info!(
                    records = self.store.len(),
                    campaigns = self.state.campaigns.len(),
                    "dataset ready"
                );
                self.state.set_status(format!(
                    "Loaded {} areas across {} campaigns",
                    self.store.len(),
                    self.state.campaigns.len()
                ));
                // The featured name may have arrived before the data did.
                self.try_apply_featured();
            }
            Err(err) => {
                error!(%err, "dataset load failed");
                self.load_failed = Some(err.to_string());
                self.state.set_status("Could not load foe data".to_string());
            }
        }
    }

    fn handle_featured_event(&mut self, event: FeaturedEvent) {
        match event {
            FeaturedEvent::Resolved(name) => {
                info!(area = %name, "featured vanquish received");
                self.pending_featured = Some(name);
                self.featured_attempts = 0;
                self.try_apply_featured();
            }
            FeaturedEvent::Unresolved => {
                debug!("featured lookup ended unresolved; default selection stands");
            }
        }
    }

    fn handle_tick(&mut self) {
        if self.pending_featured.is_some() {
            self.try_apply_featured();
        }
    }

    /// Apply the featured selection once both the name and the dataset are
    /// available. The override fires at most once; afterwards manual
    /// selection always wins.
    fn try_apply_featured(&mut self) {
        let Some(name) = self.pending_featured.clone() else {
            return;
        };
        if self.featured_applied {
            self.pending_featured = None;
            return;
        }
        if !self.store.is_loaded() {
            // Wait as long as the load task is still in flight; attempts
            // are only counted once the load has finished without
            // producing a usable dataset.
            if !self.load_finished {
                return;
            }
            self.featured_attempts += 1;
            if self.featured_attempts >= MAX_FEATURED_ATTEMPTS {
                warn!(area = %name, "dataset never became usable; dropping featured selection");
                self.pending_featured = None;
            }
            return;
        }

        match self.store.find_by_name(&name) {
            Some(entry) => {
                let campaign = entry.campaign.clone();
                let area = entry.name.clone();
                self.select_entry(&campaign, &area);
                self.featured_applied = true;
                self.pending_featured = None;
                info!(%campaign, %area, "featured selection applied");
                self.state
                    .set_status(format!("Today's vanquish: {area} ({campaign})"));
            }
            None => {
                debug!(area = %name, "featured area not present in dataset");
                self.pending_featured = None;
            }
        }
    }

    fn select_entry(&mut self, campaign: &str, area: &str) {
        if let Some(pos) = self
            .state
            .campaigns
            .iter()
            .position(|c| c.eq_ignore_ascii_case(campaign))
        {
            self.state.campaign_cursor = pos;
        }
        self.refresh_areas();
        if let Some(pos) = self.state.areas.iter().position(|a| a == area) {
            self.state.area_cursor = pos;
        }
        self.recompute_view();
    }

    fn refresh_areas(&mut self) {
        self.state.areas = match self.state.selected_campaign() {
            Some(campaign) => self.store.areas_in(&campaign),
            None => Vec::new(),
        };
        self.state.area_cursor = 0;
        self.state.foe_scroll = 0;
        self.recompute_view();
    }

    fn recompute_view(&mut self) {
        self.current = None;
        self.view = None;
        let (Some(campaign), Some(area)) =
            (self.state.selected_campaign(), self.state.selected_area())
        else {
            return;
        };
        if let Some(entry) = self.store.find(&campaign, &area) {
            if !entry.has_modes() {
                self.state.mode = Mode::Normal;
            }
            self.view = Some(build_area_view(
                &entry,
                self.state.mode,
                self.state.filters,
                &self.rules,
            ));
            self.current = Some(entry);
        }
    }

    fn handle_input(&mut self, event: Event) {
        let Event::Key(key) = event else {
            return;
        };
        if key.kind != KeyEventKind::Press {
            return;
        }
        if self.state.notice_open {
            self.handle_notice_key(key);
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.state.should_quit = true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.state.should_quit = true;
            }
            KeyCode::Tab | KeyCode::BackTab => self.state.toggle_focus(),
            KeyCode::Left | KeyCode::Char('h') => self.state.focus = Focus::Campaigns,
            KeyCode::Right | KeyCode::Char('l') => self.state.focus = Focus::Areas,
            KeyCode::Up | KeyCode::Char('k') => self.move_cursor(-1),
            KeyCode::Down | KeyCode::Char('j') => self.move_cursor(1),
            KeyCode::PageUp | KeyCode::Char('K') => self.scroll_foes(-(FOE_SCROLL_STEP as isize)),
            KeyCode::PageDown | KeyCode::Char('J') => self.scroll_foes(FOE_SCROLL_STEP as isize),
            KeyCode::Char('e') => self.toggle_require_effect(),
            KeyCode::Char('x') => self.toggle_hide_elite_only(),
            KeyCode::Char('m') => self.toggle_mode(),
            KeyCode::Char('t') => self.toggle_theme(),
            _ => {}
        }
    }

    fn handle_notice_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter | KeyCode::Char('a') => {
                self.state.notice_open = false;
                self.prefs.notice_acknowledged = true;
                self.prefs.save();
            }
            KeyCode::Char('q') => self.state.should_quit = true,
            _ => {}
        }
    }

    fn move_cursor(&mut self, delta: isize) {
        match self.state.focus {
            Focus::Campaigns => {
                if self.state.move_list_cursor(delta, Focus::Campaigns) {
                    self.refresh_areas();
                }
            }
            Focus::Areas => {
                if self.state.move_list_cursor(delta, Focus::Areas) {
                    self.state.foe_scroll = 0;
                    self.recompute_view();
                }
            }
        }
    }

    fn scroll_foes(&mut self, delta: isize) {
        let next = self.state.foe_scroll as isize + delta;
        self.state.foe_scroll = next.max(0) as usize;
    }

    fn toggle_require_effect(&mut self) {
        self.state.filters.require_effect = !self.state.filters.require_effect;
        self.recompute_view();
        self.state.set_status(format!(
            "Effects-only filter {}",
            on_off(self.state.filters.require_effect)
        ));
    }

    fn toggle_hide_elite_only(&mut self) {
        self.state.filters.hide_elite_only = !self.state.filters.hide_elite_only;
        self.recompute_view();
        self.state.set_status(format!(
            "Hide plain elites {}",
            on_off(self.state.filters.hide_elite_only)
        ));
    }

    fn toggle_mode(&mut self) {
        let has_modes = self.current.as_ref().map(Entry::has_modes).unwrap_or(false);
        if !has_modes {
            self.state
                .set_status("This area has no Hard Mode roster".to_string());
            return;
        }
        self.state.mode = self.state.mode.toggled();
        self.state.foe_scroll = 0;
        self.recompute_view();
        self.state.set_status(self.state.mode.label().to_string());
    }

    fn toggle_theme(&mut self) {
        self.prefs.theme = self.prefs.theme.toggled();
        self.theme = Theme::for_choice(self.prefs.theme);
        self.prefs.save();
        let label = match self.prefs.theme {
            ThemeChoice::Dark => "Dark theme",
            ThemeChoice::Light => "Light theme",
        };
        self.state.set_status(label.to_string());
    }

    fn draw(&mut self, frame: &mut Frame) {
        let size = frame.size();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(1),
                Constraint::Min(5),
                Constraint::Length(3),
            ])
            .split(size);

        self.render_header(frame, chunks[0]);
        self.render_legend(frame, chunks[1]);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(22),
                Constraint::Percentage(28),
                Constraint::Percentage(50),
            ])
            .split(chunks[2]);

        self.render_campaign_list(frame, body[0]);
        self.render_area_list(frame, body[1]);
        self.render_foes(frame, body[2]);
        self.render_status(frame, chunks[3]);

        if self.state.notice_open {
            self.render_notice(frame);
        }
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let mut selection = Vec::new();
        selection.push(Span::styled(
            "Vanquish Companion",
            Style::default()
                .fg(self.theme.accent)
                .add_modifier(Modifier::BOLD),
        ));
        if let Some(view) = &self.view {
            selection.push(Span::raw("  "));
            selection.push(Span::styled(
                format!("{} ▸ {}", view.campaign, view.title),
                Style::default().fg(self.theme.primary_fg),
            ));
            if let Some(mode) = view.mode {
                selection.push(Span::styled(
                    format!("  [{}]", mode.label()),
                    Style::default().fg(self.theme.accent),
                ));
            }
            selection.push(Span::styled(
                format!("  {} foes", view.foe_count),
                Style::default().fg(self.theme.muted),
            ));
        }

        let filters = Line::from(vec![
            checkbox_span(
                "effects only (e)",
                self.state.filters.require_effect,
                &self.theme,
            ),
            Span::raw("   "),
            checkbox_span(
                "hide plain elites (x)",
                self.state.filters.hide_elite_only,
                &self.theme,
            ),
            Span::raw("   "),
            Span::styled(
                "mode (m)  theme (t)  quit (q)",
                Style::default().fg(self.theme.muted),
            ),
        ]);

        let header = Paragraph::new(vec![Line::from(selection), filters]);
        frame.render_widget(header, area);
    }

    fn render_legend(&self, frame: &mut Frame, area: Rect) {
        let Some(view) = &self.view else {
            frame.render_widget(Paragraph::new(""), area);
            return;
        };

        let mut spans = Vec::new();
        for entry in &view.legend {
            let span = match (entry.active, entry.color.and_then(parse_hex_color)) {
                (true, Some(bg)) => Span::styled(
                    format!(" {} ", entry.label),
                    Style::default()
                        .bg(bg)
                        .fg(contrast_color(&bg, Color::Black))
                        .add_modifier(Modifier::BOLD),
                ),
                (true, None) => Span::styled(
                    format!(" {} ", entry.label),
                    Style::default()
                        .fg(self.theme.primary_fg)
                        .add_modifier(Modifier::BOLD),
                ),
                (false, _) => Span::styled(
                    format!(" {} ", entry.label),
                    Style::default().fg(self.theme.muted),
                ),
            };
            spans.push(span);
            spans.push(Span::raw(" "));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_campaign_list(&self, frame: &mut Frame, area: Rect) {
        let items = self
            .state
            .campaigns
            .iter()
            .map(|name| ListItem::new(Line::from(name.clone())))
            .collect::<Vec<_>>();
        self.render_selector(frame, area, "Campaigns", items, Focus::Campaigns);
    }

    fn render_area_list(&self, frame: &mut Frame, area: Rect) {
        let items = self
            .state
            .areas
            .iter()
            .map(|name| ListItem::new(Line::from(name.clone())))
            .collect::<Vec<_>>();
        self.render_selector(frame, area, "Areas", items, Focus::Areas);
    }

    fn render_selector(
        &self,
        frame: &mut Frame,
        area: Rect,
        title: &str,
        items: Vec<ListItem>,
        focus: Focus,
    ) {
        let focused = self.state.focus == focus;
        let border_style = if focused {
            Style::default().fg(self.theme.accent)
        } else {
            Style::default().fg(self.theme.muted)
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(title);

        let cursor = match focus {
            Focus::Campaigns => self.state.campaign_cursor,
            Focus::Areas => self.state.area_cursor,
        };
        let mut list_state = ListState::default();
        if !items.is_empty() {
            list_state.select(Some(cursor.min(items.len() - 1)));
        }

        let list = List::new(items)
            .block(block)
            .highlight_style(
                Style::default()
                    .bg(self.theme.selection_bg)
                    .fg(self.theme.selection_fg)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▶ ");
        frame.render_stateful_widget(list, area, &mut list_state);
    }

    fn render_foes(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title("Foes");

        let lines = if let Some(message) = &self.load_failed {
            vec![
                Line::from(Span::styled(
                    "Could not load foe data.",
                    Style::default()
                        .fg(self.theme.danger)
                        .add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    message.clone(),
                    Style::default().fg(self.theme.muted),
                )),
            ]
        } else if let Some(view) = &self.view {
            if view.foes.is_empty() {
                vec![Line::from(Span::styled(
                    "No skills match the current filters.",
                    Style::default().fg(self.theme.muted),
                ))]
            } else {
                foe_lines(&view.foes, &self.theme)
            }
        } else if self.store.is_loaded() {
            vec![Line::from(Span::styled(
                "Select an area to see its foes.",
                Style::default().fg(self.theme.muted),
            ))]
        } else {
            vec![Line::from(Span::styled(
                "Loading dataset…",
                Style::default().fg(self.theme.muted),
            ))]
        };

        let max_scroll = lines.len().saturating_sub(1);
        if self.state.foe_scroll > max_scroll {
            self.state.foe_scroll = max_scroll;
        }

        let paragraph = Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((self.state.foe_scroll as u16, 0));
        frame.render_widget(paragraph, area);
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let status = Paragraph::new(Line::from(Span::styled(
            self.state.status.clone(),
            Style::default().fg(self.theme.primary_fg),
        )))
        .block(Block::default().borders(Borders::ALL).title("Status"));
        frame.render_widget(status, area);
    }

    fn render_notice(&self, frame: &mut Frame) {
        let area = centered_rect(60, 9, frame.size());
        frame.render_widget(Clear, area);
        let lines = vec![
            Line::from(Span::styled(
                "Heads up",
                Style::default()
                    .fg(self.theme.accent)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from("Foe and skill data is fan-maintained and scraped from the"),
            Line::from("official wiki; rosters may lag behind game updates."),
            Line::from(""),
            Line::from(Span::styled(
                "Press Enter or 'a' to continue.",
                Style::default().fg(self.theme.muted),
            )),
        ];
        let notice = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title("Notice"));
        frame.render_widget(notice, area);
    }
}

fn foe_lines(foes: &[FoeView], theme: &Theme) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for foe in foes {
        let mut header = Vec::new();
        if foe.is_boss {
            header.push(Span::styled(
                " BOSS ",
                Style::default()
                    .bg(theme.danger)
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ));
            header.push(Span::raw(" "));
        }
        header.push(Span::styled(
            foe.name.clone(),
            Style::default()
                .fg(theme.primary_fg)
                .add_modifier(Modifier::BOLD),
        ));
        if let Some(profession) = &foe.profession {
            header.push(Span::styled(
                format!("  ({profession})"),
                Style::default().fg(theme.muted),
            ));
        }
        if foe.variant {
            header.push(Span::styled(
                "  build varies",
                Style::default().fg(parse_hex_color("#ff6666").unwrap_or(theme.danger)),
            ));
        }
        lines.push(Line::from(header));

        for skill in &foe.skills {
            let mut spans = vec![
                Span::raw("  • "),
                Span::styled(skill.name.clone(), Style::default().fg(theme.primary_fg)),
            ];
            if !skill.badges.is_empty() {
                spans.push(Span::raw("  "));
            }
            for badge in &skill.badges {
                match badge.color.and_then(parse_hex_color) {
                    Some(bg) => spans.push(Span::styled(
                        format!(" {} ", badge.label),
                        Style::default().bg(bg).fg(contrast_color(&bg, Color::Black)),
                    )),
                    None => spans.push(Span::styled(
                        format!("[{}]", badge.label),
                        Style::default().fg(theme.muted),
                    )),
                }
                spans.push(Span::raw(" "));
            }
            lines.push(Line::from(spans));
        }
        lines.push(Line::from(""));
    }
    lines
}

fn checkbox_span(label: &str, checked: bool, theme: &Theme) -> Span<'static> {
    let marker = if checked { "[x]" } else { "[ ]" };
    let style = if checked {
        Style::default().fg(theme.accent)
    } else {
        Style::default().fg(theme.muted)
    };
    Span::styled(format!("{marker} {label}"), style)
}

fn on_off(flag: bool) -> &'static str {
    if flag {
        "on"
    } else {
        "off"
    }
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
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

struct UiState {
    campaigns: Vec<String>,
    areas: Vec<String>,
    campaign_cursor: usize,
    area_cursor: usize,
    foe_scroll: usize,
    focus: Focus,
    filters: FilterOptions,
    mode: Mode,
    status: String,
    should_quit: bool,
    notice_open: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            campaigns: Vec::new(),
            areas: Vec::new(),
            campaign_cursor: 0,
            area_cursor: 0,
            foe_scroll: 0,
            focus: Focus::Areas,
            filters: FilterOptions::default(),
            mode: Mode::Normal,
            status: "Ready".to_string(),
            should_quit: false,
            notice_open: false,
        }
    }
}

impl UiState {
    fn selected_campaign(&self) -> Option<String> {
        self.campaigns.get(self.campaign_cursor).cloned()
    }

    fn selected_area(&self) -> Option<String> {
        self.areas.get(self.area_cursor).cloned()
    }

    fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Campaigns => Focus::Areas,
            Focus::Areas => Focus::Campaigns,
        };
    }

    /// Move the cursor of the given list, clamped to its bounds. Returns
    /// whether the cursor actually changed.
    fn move_list_cursor(&mut self, delta: isize, list: Focus) -> bool {
        let (cursor, len) = match list {
            Focus::Campaigns => (self.campaign_cursor, self.campaigns.len()),
            Focus::Areas => (self.area_cursor, self.areas.len()),
        };
        if len == 0 {
            return false;
        }
        let next = (cursor as isize + delta).clamp(0, len as isize - 1) as usize;
        if next == cursor {
            return false;
        }
        match list {
            Focus::Campaigns => self.campaign_cursor = next,
            Focus::Areas => self.area_cursor = next,
        }
        true
    }

    fn set_status(&mut self, message: String) {
        self.status = message;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vqtui_core::models::Roster;

    fn entry(campaign: &str, name: &str) -> Entry {
        Entry {
            campaign: campaign.to_string(),
            name: name.to_string(),
            wiki_url: None,
            roster: Roster::Flat { foes: Vec::new() },
            avg_foes: None,
            min_foes: None,
            max_foes: None,
        }
    }

    fn app_with_entries(entries: Vec<Entry>) -> VqApp {
        let store = DatasetStore::new();
        let loader = DatasetLoader::from_path("unused.json");
        let mut app = VqApp::new(store, loader, AppConfig::default(), Preferences::default());
        app.state.notice_open = false;
        app.handle_dataset_loaded(Ok(entries));
        app
    }

    #[test]
    fn dataset_load_selects_first_campaign_and_area() {
        let app = app_with_entries(vec![
            entry("Factions", "Raisu Palace"),
            entry("Nightfall", "Jokanur Diggings"),
        ]);
        assert_eq!(app.state.selected_campaign().as_deref(), Some("Factions"));
        assert_eq!(app.state.selected_area().as_deref(), Some("Raisu Palace"));
        assert!(app.view.is_some());
    }

    #[test]
    fn featured_event_overrides_selection_once() {
        let mut app = app_with_entries(vec![
            entry("Factions", "Raisu Palace"),
            entry("Nightfall", "Jokanur Diggings"),
        ]);
        app.handle_featured_event(FeaturedEvent::Resolved("Jokanur Diggings".to_string()));
        assert!(app.featured_applied);
        assert_eq!(app.state.selected_campaign().as_deref(), Some("Nightfall"));
        assert_eq!(
            app.state.selected_area().as_deref(),
            Some("Jokanur Diggings")
        );
    }

    #[test]
    fn unresolved_featured_keeps_default_selection() {
        let mut app = app_with_entries(vec![
            entry("Factions", "Raisu Palace"),
            entry("Nightfall", "Jokanur Diggings"),
        ]);
        app.handle_featured_event(FeaturedEvent::Unresolved);
        assert!(!app.featured_applied);
        assert_eq!(app.state.selected_campaign().as_deref(), Some("Factions"));
        assert_eq!(app.state.selected_area().as_deref(), Some("Raisu Palace"));
    }

    #[test]
    fn featured_name_missing_from_dataset_is_dropped() {
        let mut app = app_with_entries(vec![entry("Factions", "Raisu Palace")]);
        app.handle_featured_event(FeaturedEvent::Resolved("Ascalon".to_string()));
        assert!(!app.featured_applied);
        assert!(app.pending_featured.is_none());
        assert_eq!(app.state.selected_area().as_deref(), Some("Raisu Palace"));
    }

    #[test]
    fn featured_outlives_a_slow_dataset_load() {
        let store = DatasetStore::new();
        let loader = DatasetLoader::from_path("unused.json");
        let mut app = VqApp::new(store, loader, AppConfig::default(), Preferences::default());
        app.handle_featured_event(FeaturedEvent::Resolved("Raisu Palace".to_string()));

        // Ticks while the load task is still in flight never count against
        // the give-up bound, no matter how long the load takes.
        for _ in 0..MAX_FEATURED_ATTEMPTS * 4 {
            app.handle_tick();
        }
        assert!(app.pending_featured.is_some());
        assert!(!app.featured_applied);

        app.handle_dataset_loaded(Ok(vec![entry("Factions", "Raisu Palace")]));
        assert!(app.featured_applied);
        assert_eq!(app.state.selected_area().as_deref(), Some("Raisu Palace"));
    }

    #[test]
    fn featured_gives_up_after_an_unusable_load() {
        let store = DatasetStore::new();
        let loader = DatasetLoader::from_path("unused.json");
        let mut app = VqApp::new(store, loader, AppConfig::default(), Preferences::default());
        app.handle_featured_event(FeaturedEvent::Resolved("Raisu Palace".to_string()));

        // An empty dataset finishes the load but never becomes usable; the
        // pending name is now subject to the bounded polling.
        app.handle_dataset_loaded(Ok(Vec::new()));
        for _ in 0..MAX_FEATURED_ATTEMPTS {
            app.handle_tick();
        }
        assert!(app.pending_featured.is_none());
        assert!(!app.featured_applied);
    }

    #[test]
    fn featured_applies_when_dataset_arrives_during_polling() {
        let store = DatasetStore::new();
        let loader = DatasetLoader::from_path("unused.json");
        let mut app = VqApp::new(store, loader, AppConfig::default(), Preferences::default());
        app.handle_featured_event(FeaturedEvent::Resolved("Jokanur Diggings".to_string()));
        app.handle_tick();
        app.handle_dataset_loaded(Ok(vec![
            entry("Factions", "Raisu Palace"),
            entry("Nightfall", "Jokanur Diggings"),
        ]));
        assert!(app.featured_applied);
        assert_eq!(app.state.selected_campaign().as_deref(), Some("Nightfall"));
    }

    #[test]
    fn campaign_cursor_move_repopulates_areas() {
        let mut app = app_with_entries(vec![
            entry("Factions", "Raisu Palace"),
            entry("Nightfall", "Jokanur Diggings"),
        ]);
        app.state.focus = Focus::Campaigns;
        app.move_cursor(1);
        assert_eq!(app.state.selected_campaign().as_deref(), Some("Nightfall"));
        assert_eq!(
            app.state.selected_area().as_deref(),
            Some("Jokanur Diggings")
        );
    }

    #[test]
    fn cursor_is_clamped_at_list_edges() {
        let mut state = UiState {
            areas: vec!["A".to_string(), "B".to_string()],
            ..UiState::default()
        };
        assert!(!state.move_list_cursor(-1, Focus::Areas));
        assert!(state.move_list_cursor(5, Focus::Areas));
        assert_eq!(state.area_cursor, 1);
    }
}
