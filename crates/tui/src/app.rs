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
use tokio::{spawn, sync::mpsc, task::JoinHandle};
use tracing::{debug, info, warn};

use pokedex_core::{
    controller::{Command, DetailRequest, DetailState, PageRequest, PageState},
    display::{self, DetailView},
    AuthController, AuthError, CatalogApi, CatalogClient, CatalogError, CatalogItemDetail,
    DetailController, NavigateTo, Page, PageController, SessionStore,
};

const TICK_RATE: Duration = Duration::from_millis(250);
const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];
const STAT_BAR_WIDTH: usize = 30;

#[derive(Debug, Clone)]
struct Theme {
    primary_fg: Color,
    accent: Color,
    muted: Color,
    selection_bg: Color,
    success: Color,
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
            danger: Color::Red,
        }
    }
}

/// Parse `#RRGGBB` or the short `#RGB` form.
fn parse_hex_color(input: &str) -> Option<Color> {
    let trimmed = input.trim();
    let hex = trimmed.strip_prefix('#').unwrap_or(trimmed);
    match hex.len() {
        6 => {
            let r = u8::from_str_radix(hex.get(0..2)?, 16).ok()?;
            let g = u8::from_str_radix(hex.get(2..4)?, 16).ok()?;
            let b = u8::from_str_radix(hex.get(4..6)?, 16).ok()?;
            Some(Color::Rgb(r, g, b))
        }
        3 => {
            let r = u8::from_str_radix(&hex.get(0..1)?.repeat(2), 16).ok()?;
            let g = u8::from_str_radix(&hex.get(1..2)?.repeat(2), 16).ok()?;
            let b = u8::from_str_radix(&hex.get(2..3)?.repeat(2), 16).ok()?;
            Some(Color::Rgb(r, g, b))
        }
        _ => None,
    }
}

fn contrast_color(color: &Color, fallback: Color) -> Color {
    match color {
        Color::Rgb(r, g, b) => {
            let luminance =
                0.299 * f64::from(*r) + 0.587 * f64::from(*g) + 0.114 * f64::from(*b);
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
enum Screen {
    Login,
    List,
    Detail,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Browse,
    Search,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum LoginField {
    #[default]
    Username,
    Password,
}

#[derive(Debug, Default)]
struct LoginForm {
    username: String,
    password: String,
    focus: LoginField,
    submitting: bool,
    error: Option<String>,
}

impl LoginForm {
    fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            LoginField::Username => LoginField::Password,
            LoginField::Password => LoginField::Username,
        };
    }

    fn field_mut(&mut self) -> &mut String {
        match self.focus {
            LoginField::Username => &mut self.username,
            LoginField::Password => &mut self.password,
        }
    }

    fn masked_password(&self) -> String {
        "*".repeat(self.password.chars().count())
    }

    // Keeps the username so a retry only needs the password.
    fn reset(&mut self) {
        self.password.clear();
        self.focus = if self.username.is_empty() {
            LoginField::Username
        } else {
            LoginField::Password
        };
        self.submitting = false;
    }
}

enum AppEvent {
    Input(Event),
    Tick,
    LoggedIn(Result<NavigateTo, AuthError>),
    PageLoaded(PageRequest, Result<Page, CatalogError>),
    DetailLoaded(DetailRequest, Result<CatalogItemDetail, CatalogError>),
}

/// Terminal frontend over the catalog controllers.
pub struct PokedexApp {
    session: SessionStore,
    auth: AuthController<CatalogClient>,
    pages: PageController<CatalogClient>,
    detail: Option<DetailController<CatalogClient>>,
    screen: Screen,
    mode: Mode,
    login: LoginForm,
    cursor: usize,
    status: String,
    spinner: usize,
    should_quit: bool,
    theme: Theme,
    event_tx: Option<mpsc::Sender<AppEvent>>,
    login_task: Option<JoinHandle<()>>,
    page_task: Option<JoinHandle<()>>,
    detail_task: Option<JoinHandle<()>>,
}

impl PokedexApp {
    pub fn new(client: CatalogClient, session: SessionStore, page_limit: u32) -> Self {
        Self {
            auth: AuthController::new(client.clone(), session.clone()),
            pages: PageController::new(client, session.clone(), page_limit),
            session,
            detail: None,
            screen: Screen::Login,
            mode: Mode::Browse,
            login: LoginForm::default(),
            cursor: 0,
            status: String::new(),
            spinner: 0,
            should_quit: false,
            theme: Theme::default(),
            event_tx: None,
            login_task: None,
            page_task: None,
            detail_task: None,
        }
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
        self.event_tx = Some(event_tx);

        let start = self.auth.check();
        self.navigate(start);

        loop {
            terminal.draw(|frame| self.draw(frame))?;
            if self.should_quit {
                break;
            }
            let maybe_event = event_rx.recv().await;
            if !self.process_app_event(maybe_event) {
                break;
            }
        }

        self.abort_tasks();
        restore_terminal(&mut terminal)?;
        self.event_tx = None;
        Ok(())
    }

    fn process_app_event(&mut self, maybe_event: Option<AppEvent>) -> bool {
        match maybe_event {
            Some(AppEvent::Input(Event::Key(key))) => {
                if key.kind == KeyEventKind::Press {
                    self.handle_key(key);
                }
                true
            }
            Some(AppEvent::Input(_)) => true,
            Some(AppEvent::Tick) => {
                self.spinner = self.spinner.wrapping_add(1);
                true
            }
            Some(AppEvent::LoggedIn(result)) => {
                self.login_task = None;
                self.login.submitting = false;
                match result {
                    Ok(target) => {
                        self.login.error = None;
                        let name = self.session.display_name().unwrap_or_default();
                        self.set_status(format!("Logged in as {name}"));
                        self.navigate(target);
                    }
                    Err(err) => {
                        warn!("login failed: {err}");
                        self.login.password.clear();
                        self.login.error = Some(err.to_string());
                    }
                }
                true
            }
            Some(AppEvent::PageLoaded(request, result)) => {
                if let Some(target) = self.pages.complete(request, result) {
                    self.set_status("Session expired, please log in again");
                    self.navigate(target);
                } else {
                    self.clamp_cursor();
                    if let PageState::Error(message) = self.pages.state() {
                        let message = format!("{message} (press r to retry)");
                        self.set_status(message);
                    }
                }
                true
            }
            Some(AppEvent::DetailLoaded(request, result)) => {
                let navigation = match self.detail.as_mut() {
                    Some(detail) => detail.complete(&request, result),
                    None => {
                        debug!(
                            id_or_name = %request.id_or_name,
                            "detail reply after leaving screen"
                        );
                        result.as_ref().err().and_then(CatalogError::navigation)
                    }
                };
                if let Some(target) = navigation {
                    self.set_status("Session expired, please log in again");
                    self.navigate(target);
                }
                true
            }
            None => false,
        }
    }

    fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    fn navigate(&mut self, target: NavigateTo) {
        debug!(?target, "navigate");
        match target {
            NavigateTo::Login => {
                self.abort_tasks();
                self.detail = None;
                self.mode = Mode::Browse;
                self.login.reset();
                self.screen = Screen::Login;
            }
            NavigateTo::List => {
                self.screen = Screen::List;
                self.cursor = 0;
                let command = self.pages.enter();
                self.dispatch_page(command);
            }
            NavigateTo::Detail(id_or_name) => {
                let detail = DetailController::new(
                    self.pages.client().clone(),
                    self.session.clone(),
                    id_or_name,
                );
                self.detail = Some(detail);
                self.screen = Screen::Detail;
                self.load_detail();
            }
        }
    }

    fn dispatch_page(&mut self, command: Command<PageRequest>) {
        match command {
            Command::Navigate(target) => self.navigate(target),
            Command::Fetch(request) => self.spawn_page_fetch(request),
        }
    }

    fn spawn_page_fetch(&mut self, request: PageRequest) {
        let Some(sender) = self.event_tx.clone() else {
            return;
        };
        if let Some(task) = self.page_task.take() {
            task.abort();
        }
        let client = self.pages.client().clone();
        self.page_task = Some(spawn(async move {
            let result = client.fetch_page(request.offset, request.limit).await;
            let _ = sender.send(AppEvent::PageLoaded(request, result)).await;
        }));
    }

    fn load_detail(&mut self) {
        let Some(detail) = self.detail.as_mut() else {
            return;
        };
        match detail.enter() {
            Some(Command::Navigate(target)) => self.navigate(target),
            Some(Command::Fetch(request)) => {
                let Some(sender) = self.event_tx.clone() else {
                    return;
                };
                if let Some(task) = self.detail_task.take() {
                    task.abort();
                }
                let client = detail.client().clone();
                self.detail_task = Some(spawn(async move {
                    let result = client.fetch_detail(&request.id_or_name).await;
                    let _ = sender.send(AppEvent::DetailLoaded(request, result)).await;
                }));
            }
            None => {}
        }
    }

    fn submit_login(&mut self) {
        if self.login.submitting {
            return;
        }
        let Some(sender) = self.event_tx.clone() else {
            return;
        };
        self.login.submitting = true;
        self.login.error = None;
        let auth = self.auth.clone();
        let username = self.login.username.clone();
        let password = self.login.password.clone();
        self.login_task = Some(spawn(async move {
            let result = auth.login(&username, &password).await;
            let _ = sender.send(AppEvent::LoggedIn(result)).await;
        }));
    }

    fn logout(&mut self) {
        self.pages.set_query("");
        let target = self.auth.logout();
        self.set_status("Logged out");
        self.navigate(target);
    }

    fn abort_tasks(&mut self) {
        for task in [
            self.login_task.take(),
            self.page_task.take(),
            self.detail_task.take(),
        ]
        .into_iter()
        .flatten()
        {
            task.abort();
        }
    }

    fn visible_len(&self) -> usize {
        self.pages.view().items.len()
    }

    fn clamp_cursor(&mut self) {
        let len = self.visible_len();
        self.cursor = self.cursor.min(len.saturating_sub(1));
    }

    fn move_cursor(&mut self, delta: isize) {
        let len = self.visible_len();
        if len == 0 {
            self.cursor = 0;
            return;
        }
        let next = self.cursor as isize + delta;
        self.cursor = next.clamp(0, len as isize - 1) as usize;
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }
        match self.screen {
            Screen::Login => self.handle_login_key(key),
            Screen::List => match self.mode {
                Mode::Search => self.handle_search_key(key),
                Mode::Browse => self.handle_browse_key(key),
            },
            Screen::Detail => self.handle_detail_key(key),
        }
    }

    fn handle_login_key(&mut self, key: KeyEvent) {
        if self.login.submitting {
            return;
        }
        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                self.login.toggle_focus()
            }
            KeyCode::Enter => match self.login.focus {
                LoginField::Username => self.login.toggle_focus(),
                LoginField::Password => self.submit_login(),
            },
            KeyCode::Backspace => {
                self.login.field_mut().pop();
            }
            KeyCode::Char(c) => {
                if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT {
                    self.login.field_mut().push(c);
                }
            }
            _ => {}
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.mode = Mode::Browse;
                self.pages.set_query("");
                self.set_status("Search cleared");
            }
            KeyCode::Enter => {
                self.mode = Mode::Browse;
                self.set_status(format!("Search: {}", self.pages.query()));
            }
            KeyCode::Backspace => {
                let mut query = self.pages.query().to_string();
                query.pop();
                self.pages.set_query(query);
            }
            KeyCode::Char(c) => {
                if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT {
                    let mut query = self.pages.query().to_string();
                    query.push(c);
                    self.pages.set_query(query);
                }
            }
            _ => {}
        }
        self.cursor = 0;
    }

    fn handle_browse_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('j') | KeyCode::Down => self.move_cursor(1),
            KeyCode::Char('k') | KeyCode::Up => self.move_cursor(-1),
            KeyCode::Home | KeyCode::Char('g') => self.cursor = 0,
            KeyCode::End | KeyCode::Char('G') => self.move_cursor(isize::MAX / 2),
            KeyCode::Char('/') => {
                self.mode = Mode::Search;
                self.set_status("Type to search, Enter to keep, Esc to clear");
            }
            KeyCode::Char('s') => {
                let order = self.pages.order().next();
                self.pages.set_order(order);
                self.cursor = 0;
                self.set_status(format!("Sorted by {}", order.label()));
            }
            KeyCode::Char('n') | KeyCode::Right => {
                if !self.pages.view().show_pagination {
                    return;
                }
                if let Some(command) = self.pages.next_page() {
                    self.cursor = 0;
                    self.dispatch_page(command);
                }
            }
            KeyCode::Char('p') | KeyCode::Left => {
                if !self.pages.view().show_pagination {
                    return;
                }
                if let Some(command) = self.pages.previous_page() {
                    self.cursor = 0;
                    self.dispatch_page(command);
                }
            }
            KeyCode::Char('r') => {
                let command = self.pages.enter();
                self.dispatch_page(command);
            }
            KeyCode::Char('L') => self.logout(),
            KeyCode::Enter => {
                let target = self.pages.view().items.get(self.cursor).map(|item| {
                    item.id()
                        .map(|id| id.to_string())
                        .unwrap_or_else(|| item.name.clone())
                });
                if let Some(id_or_name) = target {
                    info!(%id_or_name, "opening detail");
                    self.navigate(NavigateTo::Detail(id_or_name));
                }
            }
            _ => {}
        }
    }

    fn handle_detail_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('b') => {
                if let Some(task) = self.detail_task.take() {
                    task.abort();
                }
                self.detail = None;
                self.screen = Screen::List;
                if !matches!(self.pages.state(), PageState::Ready(_)) {
                    let command = self.pages.enter();
                    self.dispatch_page(command);
                }
            }
            KeyCode::Char('r') => self.load_detail(),
            KeyCode::Char('L') => self.logout(),
            KeyCode::Char('q') => self.should_quit = true,
            _ => {}
        }
    }

    fn draw(&self, frame: &mut Frame) {
        let area = frame.size();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(5), Constraint::Length(4)])
            .split(area);
        match self.screen {
            Screen::Login => self.draw_login(frame, chunks[0]),
            Screen::List => self.draw_list(frame, chunks[0]),
            Screen::Detail => self.draw_detail(frame, chunks[0]),
        }
        self.render_status(frame, chunks[1]);
    }

    fn draw_login(&self, frame: &mut Frame, area: Rect) {
        let form_area = centered_rect(48, 10, area);
        let label_style = |field: LoginField| {
            if self.login.focus == field {
                Style::default()
                    .fg(self.theme.accent)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(self.theme.primary_fg)
            }
        };
        let marker = |field: LoginField| if self.login.focus == field { "▶ " } else { "  " };

        let mut lines = vec![
            Line::from(""),
            Line::from(vec![
                Span::styled(marker(LoginField::Username), label_style(LoginField::Username)),
                Span::styled("Username: ", label_style(LoginField::Username)),
                Span::raw(self.login.username.clone()),
            ]),
            Line::from(vec![
                Span::styled(marker(LoginField::Password), label_style(LoginField::Password)),
                Span::styled("Password: ", label_style(LoginField::Password)),
                Span::raw(self.login.masked_password()),
            ]),
            Line::from(""),
        ];
        if self.login.submitting {
            lines.push(Line::from(Span::styled(
                format!("{} Logging in...", SPINNER[self.spinner % SPINNER.len()]),
                Style::default().fg(self.theme.muted),
            )));
        } else if let Some(error) = &self.login.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(self.theme.danger),
            )));
        }

        let form = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("Pokédex Login"))
            .wrap(Wrap { trim: true });
        frame.render_widget(Clear, form_area);
        frame.render_widget(form, form_area);
    }

    fn draw_list(&self, frame: &mut Frame, area: Rect) {
        let view = self.pages.view();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(3)])
            .split(area);

        let search_style = if self.mode == Mode::Search {
            Style::default().fg(self.theme.accent)
        } else {
            Style::default().fg(self.theme.muted)
        };
        let header = Paragraph::new(Line::from(vec![
            Span::styled("Search: ", search_style),
            Span::raw(view.query.to_string()),
            Span::styled(
                if self.mode == Mode::Search { "_" } else { "" },
                search_style,
            ),
            Span::raw("   "),
            Span::styled("Sort: ", Style::default().fg(self.theme.muted)),
            Span::raw(view.order.label()),
        ]))
        .block(Block::default().borders(Borders::ALL).title("Pokédex"));
        frame.render_widget(header, chunks[0]);

        let title = if view.show_pagination {
            format!(
                "Page {} of {} ({} total)",
                view.current_page,
                view.total_pages.max(1),
                view.total_count
            )
        } else {
            format!("Search results ({})", view.items.len())
        };
        let block = Block::default().borders(Borders::ALL).title(title);

        let placeholder = match view.state {
            PageState::Loading => Some(Line::from(Span::styled(
                format!("{} Loading...", SPINNER[self.spinner % SPINNER.len()]),
                Style::default().fg(self.theme.muted),
            ))),
            PageState::Error(message) => Some(Line::from(Span::styled(
                message.clone(),
                Style::default().fg(self.theme.danger),
            ))),
            PageState::Unauthenticated => Some(Line::from("Not logged in")),
            PageState::Ready(_) if view.items.is_empty() => Some(Line::from(Span::styled(
                "No Pokemon match your search",
                Style::default().fg(self.theme.muted),
            ))),
            PageState::Ready(_) => None,
        };
        if let Some(line) = placeholder {
            let paragraph = Paragraph::new(line)
                .block(block)
                .alignment(Alignment::Center);
            frame.render_widget(paragraph, chunks[1]);
            return;
        }

        let items: Vec<ListItem> = view
            .items
            .iter()
            .map(|item| {
                let number = item
                    .id()
                    .map(display::format_number)
                    .unwrap_or_else(|| "#???".to_string());
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{number:<7}"), Style::default().fg(self.theme.muted)),
                    Span::styled(
                        display::format_name(&item.name),
                        Style::default().fg(self.theme.primary_fg),
                    ),
                ]))
            })
            .collect();

        let mut list_state = ListState::default();
        list_state.select(Some(self.cursor.min(items.len().saturating_sub(1))));
        let list = List::new(items)
            .block(block)
            .highlight_style(
                Style::default()
                    .bg(self.theme.selection_bg)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▶ ");
        frame.render_stateful_widget(list, chunks[1], &mut list_state);
    }

    fn draw_detail(&self, frame: &mut Frame, area: Rect) {
        let Some(detail) = self.detail.as_ref() else {
            return;
        };
        let placeholder = match detail.state() {
            DetailState::Loading => Some(Line::from(Span::styled(
                format!(
                    "{} Loading {}...",
                    SPINNER[self.spinner % SPINNER.len()],
                    detail.id_or_name()
                ),
                Style::default().fg(self.theme.muted),
            ))),
            DetailState::Error(message) => Some(Line::from(Span::styled(
                message.clone(),
                Style::default().fg(self.theme.danger),
            ))),
            DetailState::Unauthenticated => Some(Line::from("Not logged in")),
            DetailState::Ready(_) => None,
        };
        if let Some(line) = placeholder {
            let paragraph = Paragraph::new(line)
                .block(Block::default().borders(Borders::ALL).title("Pokemon"))
                .alignment(Alignment::Center);
            frame.render_widget(paragraph, area);
            return;
        }
        if let Some(view) = detail.view() {
            self.render_detail_view(frame, area, &view);
        }
    }

    fn render_detail_view(&self, frame: &mut Frame, area: Rect, view: &DetailView) {
        let accent = parse_hex_color(view.accent).unwrap_or(self.theme.accent);
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(area);

        let mut type_spans = vec![Span::raw("Types: ")];
        for badge in &view.types {
            let color = parse_hex_color(badge.color).unwrap_or(self.theme.muted);
            type_spans.push(Span::styled(
                format!(" {} ", badge.name),
                Style::default()
                    .bg(color)
                    .fg(contrast_color(&color, Color::Black)),
            ));
            type_spans.push(Span::raw(" "));
        }

        let mut info = vec![
            Line::from(vec![
                Span::styled(
                    view.title.clone(),
                    Style::default().fg(accent).add_modifier(Modifier::BOLD),
                ),
                Span::raw("  "),
                Span::styled(view.number.clone(), Style::default().fg(self.theme.muted)),
            ]),
            Line::from(""),
            Line::from(type_spans),
            Line::from(format!("Height: {:.1} m", view.height_m)),
            Line::from(format!("Weight: {:.1} kg", view.weight_kg)),
            Line::from(format!(
                "Base experience: {}",
                view.base_experience
                    .map(|xp| xp.to_string())
                    .unwrap_or_else(|| "-".to_string())
            )),
            Line::from(format!("Abilities: {}", view.abilities.join(", "))),
            Line::from(format!("Moves: {}", view.move_count)),
        ];
        if !view.forms.is_empty() {
            info.push(Line::from(format!("Forms: {}", view.forms.join(", "))));
        }
        if let Some(url) = &view.sprite_url {
            info.push(Line::from(""));
            info.push(Line::from(Span::styled(
                url.clone(),
                Style::default().fg(self.theme.muted),
            )));
        }
        let info_panel = Paragraph::new(info)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(accent))
                    .title(view.primary_type.clone()),
            )
            .wrap(Wrap { trim: false });
        frame.render_widget(info_panel, chunks[0]);

        let stat_lines: Vec<Line> = view
            .stats
            .iter()
            .map(|stat| {
                let filled = (stat.fill * STAT_BAR_WIDTH as f64).round() as usize;
                Line::from(vec![
                    Span::styled(
                        format!("{:<5}{:>4} ", stat.label, stat.value),
                        Style::default().fg(self.theme.primary_fg),
                    ),
                    Span::styled("█".repeat(filled), Style::default().fg(accent)),
                    Span::styled(
                        "░".repeat(STAT_BAR_WIDTH.saturating_sub(filled)),
                        Style::default().fg(self.theme.muted),
                    ),
                ])
            })
            .collect();
        let stats_panel = Paragraph::new(stat_lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(accent))
                .title("Base stats"),
        );
        frame.render_widget(stats_panel, chunks[1]);
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title("Status");
        let user = self
            .session
            .display_name()
            .map(|name| format!("[{name}] "))
            .unwrap_or_default();
        let primary = Line::from(vec![
            Span::styled(user, Style::default().fg(self.theme.success)),
            Span::raw(self.status.clone()),
        ]);
        let hints = match (self.screen, self.mode) {
            (Screen::Login, _) => "Tab switch field • Enter submit • Esc quit",
            (Screen::List, Mode::Search) => "Type to filter • Enter keep • Esc clear",
            (Screen::List, Mode::Browse) => {
                "↑/↓ move • Enter open • / search • s sort • n/p page • r reload • L logout • q quit"
            }
            (Screen::Detail, _) => "Esc back • r reload • L logout • q quit",
        };
        let secondary = Line::from(Span::styled(hints, Style::default().fg(self.theme.muted)));
        let paragraph = Paragraph::new(vec![primary, secondary])
            .block(block)
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

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}
