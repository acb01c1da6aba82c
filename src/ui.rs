use std::io::{stdout, Stdout};

use chrono::{Datelike, Local};
use color_eyre::Result;
use crossterm::{
    event::{KeyCode, KeyEvent, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{
        Bar, BarChart, BarGroup, Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap,
    },
    Frame, Terminal,
};
use unicode_width::UnicodeWidthStr;

use crate::app_state::{
    Action, AnalysisStatus, AppState, BaseScreen, Notice, NoticeKind, Overlay,
};
use crate::journal_entry::JournalEntry;
use crate::mood::Mood;
use crate::photo::{describe_data_uri, format_size};
use crate::stats::{month_grid, month_moods};
use crate::text_input::TextInput;

/// What a key press asks of the event loop.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    Dispatch(Action),
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    Mood,
    Text,
    Tags,
    Photo,
}

impl DraftField {
    fn next(self) -> Self {
        match self {
            DraftField::Mood => DraftField::Text,
            DraftField::Text => DraftField::Tags,
            DraftField::Tags => DraftField::Photo,
            DraftField::Photo => DraftField::Mood,
        }
    }

    fn prev(self) -> Self {
        match self {
            DraftField::Mood => DraftField::Photo,
            DraftField::Text => DraftField::Mood,
            DraftField::Tags => DraftField::Text,
            DraftField::Photo => DraftField::Tags,
        }
    }
}

/// Transient input echo: focus, cursors and selection. Never persisted.
#[derive(Debug, Clone)]
pub struct ViewState {
    pub feed_selected: usize,
    pub searching: bool,
    pub expanded: bool,
    pub draft_focus: DraftField,
    pub mood_cursor: usize,
    search: TextInput,
    text: TextInput,
    tag: TextInput,
    photo: TextInput,
    secret: TextInput,
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState {
            feed_selected: 0,
            searching: false,
            expanded: false,
            draft_focus: DraftField::Mood,
            mood_cursor: 0,
            search: TextInput::single_line(),
            text: TextInput::multi_line(),
            tag: TextInput::single_line(),
            photo: TextInput::single_line(),
            secret: TextInput::single_line(),
        }
    }
}

impl ViewState {
    pub fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Option<Intent> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Some(Intent::Quit);
        }

        let action = match state.screen.overlay() {
            Some(Overlay::Locked { attempt, .. }) => match key.code {
                KeyCode::Enter => Some(Action::SubmitUnlock),
                _ => self.secret.handle(attempt, key).map(Action::SetUnlockAttempt),
            },
            Some(Overlay::PasswordSetup { input }) => match key.code {
                KeyCode::Enter => Some(Action::SavePassword),
                KeyCode::Esc => Some(Action::CancelPasswordSetup),
                _ => self.secret.handle(input, key).map(Action::SetPasswordInput),
            },
            None => return self.handle_base_key(key, state),
        };
        action.map(Intent::Dispatch)
    }

    fn handle_base_key(&mut self, key: KeyEvent, state: &AppState) -> Option<Intent> {
        match state.screen.base() {
            BaseScreen::NewEntry => return self.handle_composer_key(key, state).map(Intent::Dispatch),
            BaseScreen::Feed if self.searching => {
                return match key.code {
                    KeyCode::Esc | KeyCode::Enter => {
                        self.searching = false;
                        None
                    }
                    _ => {
                        let query = self.search.handle(&state.search_query, key)?;
                        self.feed_selected = 0;
                        Some(Intent::Dispatch(Action::SetSearchQuery(query)))
                    }
                };
            }
            BaseScreen::Feed if self.expanded => {
                self.expanded = false;
                return None;
            }
            BaseScreen::Feed => match key.code {
                KeyCode::Char('/') => {
                    self.searching = true;
                    self.search.move_to_end(&state.search_query);
                    return None;
                }
                KeyCode::Up | KeyCode::Char('k') => {
                    self.feed_selected = self.feed_selected.saturating_sub(1);
                    return None;
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    let visible = state.filtered_entries().len();
                    if self.feed_selected + 1 < visible {
                        self.feed_selected += 1;
                    }
                    return None;
                }
                KeyCode::Enter => {
                    self.expanded = !state.filtered_entries().is_empty();
                    return None;
                }
                _ => {}
            },
            BaseScreen::Stats if key.code == KeyCode::Char('g') => {
                return Some(Intent::Dispatch(Action::RequestInsight));
            }
            BaseScreen::Calendar | BaseScreen::Stats => {}
        }

        let action = match key.code {
            KeyCode::Char('q') => return Some(Intent::Quit),
            KeyCode::Char('1') => Action::Navigate(BaseScreen::Feed),
            KeyCode::Char('2') => Action::Navigate(BaseScreen::Calendar),
            KeyCode::Char('3') => Action::Navigate(BaseScreen::Stats),
            KeyCode::Char('n') | KeyCode::Char('a') => {
                self.draft_focus = DraftField::Mood;
                Action::Navigate(BaseScreen::NewEntry)
            }
            KeyCode::Char('l') => Action::ToggleLock,
            KeyCode::Char('p') => Action::OpenPasswordSetup,
            KeyCode::Esc => Action::Back,
            _ => return None,
        };
        Some(Intent::Dispatch(action))
    }

    fn handle_composer_key(&mut self, key: KeyEvent, state: &AppState) -> Option<Action> {
        let draft = &state.draft;
        match key.code {
            KeyCode::Esc => return Some(Action::Back),
            KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Some(Action::SaveEntry);
            }
            KeyCode::Tab => {
                self.draft_focus = self.draft_focus.next();
                return None;
            }
            KeyCode::BackTab => {
                self.draft_focus = self.draft_focus.prev();
                return None;
            }
            _ => {}
        }

        match self.draft_focus {
            DraftField::Mood => {
                let index = match key.code {
                    KeyCode::Left | KeyCode::Char('h') => self.mood_cursor.saturating_sub(1),
                    KeyCode::Right | KeyCode::Char('l') => {
                        (self.mood_cursor + 1).min(Mood::ALL.len() - 1)
                    }
                    KeyCode::Char(c @ '1'..='5') => (c as usize) - ('1' as usize),
                    KeyCode::Enter | KeyCode::Char(' ') => self.mood_cursor,
                    _ => return None,
                };
                self.mood_cursor = index;
                Some(Action::SelectMood(Mood::ALL[index]))
            }
            DraftField::Text => self.text.handle(&draft.text, key).map(Action::SetDraftText),
            DraftField::Tags => match key.code {
                KeyCode::Enter => Some(Action::AddTag),
                KeyCode::Backspace if draft.tag_input.is_empty() => {
                    draft.tags.last().cloned().map(Action::RemoveTag)
                }
                _ => self.tag.handle(&draft.tag_input, key).map(Action::SetTagInput),
            },
            DraftField::Photo => match key.code {
                KeyCode::Enter => Some(Action::AttachPhoto),
                KeyCode::Delete if draft.photo_input.is_empty() => Some(Action::RemovePhoto),
                _ => self.photo.handle(&draft.photo_input, key).map(Action::SetPhotoInput),
            },
        }
    }
}

pub struct UI {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    view: ViewState,
}

impl UI {
    pub fn new() -> Result<Self> {
        enable_raw_mode()?;
        stdout().execute(EnterAlternateScreen)?;

        let backend = CrosstermBackend::new(stdout());
        let terminal = Terminal::new(backend)?;

        Ok(UI {
            terminal,
            view: ViewState::default(),
        })
    }

    pub fn display(&mut self, state: &AppState) -> Result<()> {
        let view = &self.view;
        self.terminal.draw(|f| draw(f, state, view))?;
        Ok(())
    }

    pub fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Option<Intent> {
        self.view.handle_key(key, state)
    }
}

impl Drop for UI {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = stdout().execute(LeaveAlternateScreen);
    }
}

/// Renders the whole screen from state. Overlays hide everything else.
pub fn draw(f: &mut Frame, state: &AppState, view: &ViewState) {
    match state.screen.overlay() {
        Some(Overlay::PasswordSetup { input }) => {
            render_password_setup(f, input, state.notice.as_ref(), view);
            return;
        }
        Some(Overlay::Locked { attempt, .. }) => {
            render_unlock(f, attempt, state.unlock_error(), view);
            return;
        }
        None => {}
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(f.area());

    match state.screen.base() {
        BaseScreen::Feed => render_feed(f, chunks[0], state, view),
        BaseScreen::Calendar => render_calendar(f, chunks[0], state),
        BaseScreen::Stats => render_stats(f, chunks[0], state),
        BaseScreen::NewEntry => render_new_entry(f, chunks[0], state, view),
    }

    if let Some(notice) = &state.notice {
        f.render_widget(notice_line(notice), chunks[1]);
    }
    render_nav(f, chunks[2], state.screen.base());
}

fn title(text: &str) -> Paragraph<'_> {
    Paragraph::new(text)
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
}

fn hint(text: &str) -> Paragraph<'_> {
    Paragraph::new(text)
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center)
}

fn field_block(label: &str, focused: bool) -> Block<'_> {
    let style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(style)
        .title(label)
}

fn notice_line(notice: &Notice) -> Paragraph<'_> {
    let color = match notice.kind {
        NoticeKind::Info => Color::Green,
        NoticeKind::Error => Color::Red,
    };
    Paragraph::new(notice.text.as_str())
        .style(Style::default().fg(color))
        .alignment(Alignment::Center)
}

fn render_nav(f: &mut Frame, area: Rect, current: BaseScreen) {
    let tab = |key: &'static str, label: &'static str, screen: Option<BaseScreen>| {
        let style = if screen == Some(current) {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED)
        } else {
            Style::default().fg(Color::Gray)
        };
        vec![
            Span::styled(format!("[{key}]"), Style::default().fg(Color::Yellow)),
            Span::styled(format!("{label} "), style),
        ]
    };

    let spans: Vec<Span> = [
        tab("1", "Feed", Some(BaseScreen::Feed)),
        tab("2", "Calendar", Some(BaseScreen::Calendar)),
        tab("3", "Stats", Some(BaseScreen::Stats)),
        tab("n", "New", Some(BaseScreen::NewEntry)),
        tab("l", "Lock", None),
        tab("p", "Password", None),
        tab("q", "Quit", None),
    ]
    .into_iter()
    .flatten()
    .collect();

    f.render_widget(
        Paragraph::new(Line::from(spans)).alignment(Alignment::Center),
        area,
    );
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn masked(secret: &str) -> String {
    "•".repeat(secret.chars().count())
}

fn render_password_setup(f: &mut Frame, input: &str, notice: Option<&Notice>, view: &ViewState) {
    let area = centered_rect(60, 14, f.area());
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(2),
            Constraint::Length(2),
        ])
        .split(area);

    f.render_widget(title("Secure Your Journal"), chunks[0]);
    f.render_widget(
        Paragraph::new(
            "Create a password to keep your memories private. \
             It is stored on this device as plain text.",
        )
        .style(Style::default().fg(Color::Gray))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true }),
        chunks[1],
    );

    let input_area = chunks[2];
    f.render_widget(
        Paragraph::new(masked(input))
            .alignment(Alignment::Left)
            .block(field_block("Enter at least 4 characters", true)),
        input_area,
    );
    let (x, _) = view.secret.screen_position(&masked(input));
    f.set_cursor_position((input_area.x + 1 + x, input_area.y + 1));

    f.render_widget(hint("Enter: Set Password   Esc: Cancel"), chunks[3]);
    if let Some(notice) = notice {
        f.render_widget(notice_line(notice), chunks[4]);
    }
}

fn render_unlock(f: &mut Frame, attempt: &str, error: bool, view: &ViewState) {
    let area = centered_rect(44, 12, f.area());
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(2),
            Constraint::Length(3),
            Constraint::Length(2),
            Constraint::Length(2),
        ])
        .split(area);

    f.render_widget(title("Locked Journal"), chunks[0]);
    f.render_widget(
        Paragraph::new("Enter your password to continue")
            .style(Style::default().fg(Color::Gray))
            .alignment(Alignment::Center),
        chunks[1],
    );

    let border = if error { Color::Red } else { Color::Cyan };
    let input_area = chunks[2];
    f.render_widget(
        Paragraph::new(masked(attempt)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border))
                .title("Password"),
        ),
        input_area,
    );
    let (x, _) = view.secret.screen_position(&masked(attempt));
    f.set_cursor_position((input_area.x + 1 + x, input_area.y + 1));

    f.render_widget(hint("Enter: Unlock   Ctrl+C: Quit"), chunks[3]);
    if error {
        f.render_widget(
            Paragraph::new("Incorrect Password")
                .style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
                .alignment(Alignment::Center),
            chunks[4],
        );
    }
}

fn ordinal(day: u32) -> String {
    let suffix = match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{day}{suffix}")
}

fn entry_heading(entry: &JournalEntry) -> Line<'static> {
    let mood = entry.mood.config();
    let date = entry.local_date();
    Line::from(vec![
        Span::styled(mood.emoji, Style::default().bg(mood.bg_color)),
        Span::raw(" "),
        Span::styled(
            format!("{} day", mood.label),
            Style::default().fg(mood.color).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  {}, {}", date.format("%A, %B"), ordinal(date.day())),
            Style::default().fg(Color::DarkGray),
        ),
    ])
}

fn photo_line(photo: &str) -> Line<'static> {
    let label = match describe_data_uri(photo) {
        Some((mime, size)) => format!("📷 {mime} · {}", format_size(size)),
        None => "📷 photo".to_string(),
    };
    Line::from(Span::styled(label, Style::default().fg(Color::Magenta)))
}

fn tags_line(tags: &[String]) -> Line<'static> {
    Line::from(
        tags.iter()
            .map(|t| Span::styled(format!("#{t} "), Style::default().fg(Color::Blue)))
            .collect::<Vec<_>>(),
    )
}

fn entry_card(entry: &JournalEntry) -> ListItem<'static> {
    let mut lines = vec![entry_heading(entry)];
    lines.extend(
        entry
            .text
            .lines()
            .take(3)
            .map(|l| Line::from(format!("  {l}"))),
    );
    if let Some(photo) = &entry.photo {
        lines.push(photo_line(photo));
    }
    if !entry.tags.is_empty() {
        lines.push(tags_line(&entry.tags));
    }
    lines.push(Line::from(""));
    ListItem::new(lines)
}

fn render_feed(f: &mut Frame, area: Rect, state: &AppState, view: &ViewState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(area);

    let lock = if state.has_password() {
        Span::styled("🔒 lockable", Style::default().fg(Color::Cyan))
    } else {
        Span::styled("🛡 no password", Style::default().fg(Color::DarkGray))
    };
    let header = Text::from(vec![
        Line::from(vec![
            Span::styled("Hello,  ", Style::default().add_modifier(Modifier::BOLD)),
            lock,
        ]),
        Line::from(Span::styled(
            Local::now().format("%B %-d, %Y").to_string(),
            Style::default().fg(Color::DarkGray),
        )),
    ]);
    f.render_widget(Paragraph::new(header), chunks[0]);

    let search_area = chunks[1];
    f.render_widget(
        Paragraph::new(state.search_query.as_str())
            .block(field_block("Search memories (/)", view.searching)),
        search_area,
    );
    if view.searching {
        let (x, _) = view.search.screen_position(&state.search_query);
        f.set_cursor_position((search_area.x + 1 + x, search_area.y + 1));
    }

    let entries = state.filtered_entries();
    if entries.is_empty() {
        let message = if state.entries().is_empty() {
            "Your journal is waiting.\n\nPress n to write your first entry."
        } else {
            "No memories match your search."
        };
        f.render_widget(
            Paragraph::new(message)
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL).title("Entries")),
            chunks[2],
        );
        return;
    }

    let selected = view.feed_selected.min(entries.len() - 1);
    let items: Vec<ListItem> = entries.iter().map(|e| entry_card(e)).collect();
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(format!(
            "Entries ({})  Up/Down: Navigate, Enter: Read",
            entries.len()
        )))
        .highlight_style(Style::default().add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");
    f.render_stateful_widget(
        list,
        chunks[2],
        &mut ListState::default().with_selected(Some(selected)),
    );

    if view.expanded {
        render_full_entry(f, chunks[2], entries[selected]);
    }
}

fn render_full_entry(f: &mut Frame, area: Rect, entry: &JournalEntry) {
    let popup = centered_rect(area.width.saturating_sub(4), area.height.saturating_sub(2), area);
    let mut lines = vec![entry_heading(entry), Line::from("")];
    lines.extend(entry.text.lines().map(|l| Line::from(l.to_string())));
    if let Some(photo) = &entry.photo {
        lines.push(Line::from(""));
        lines.push(photo_line(photo));
    }
    if !entry.tags.is_empty() {
        lines.push(tags_line(&entry.tags));
    }

    f.render_widget(Clear, popup);
    f.render_widget(
        Paragraph::new(Text::from(lines))
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(entry.mood.config().color))
                    .title("Any key: Back"),
            ),
        popup,
    );
}

fn render_calendar(f: &mut Frame, area: Rect, state: &AppState) {
    let today = Local::now().date_naive();
    let (year, month) = (today.year(), today.month());
    let moods = month_moods(state.entries(), year, month);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    f.render_widget(title(&today.format("%B %Y").to_string()), chunks[0]);

    let mut lines = vec![Line::from(Span::styled(
        " Mo    Tu    We    Th    Fr    Sa    Su",
        Style::default().fg(Color::DarkGray),
    ))];
    for row in month_grid(year, month) {
        let mut spans = Vec::with_capacity(7);
        for day in row {
            let cell = match day {
                None => Span::raw("      "),
                Some(day) => {
                    let mut style = Style::default();
                    if day == today.day() {
                        style = style.add_modifier(Modifier::REVERSED);
                    }
                    match moods.get(&day) {
                        Some(mood) => Span::styled(
                            format!("{day:>3}{} ", mood.config().emoji),
                            style.fg(mood.config().color),
                        ),
                        None => Span::styled(format!("{day:>3}   "), style),
                    }
                }
            };
            spans.push(cell);
        }
        lines.push(Line::from(spans));
        lines.push(Line::from(""));
    }

    f.render_widget(
        Paragraph::new(Text::from(lines))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title("Calendar")),
        chunks[1],
    );
    f.render_widget(hint("Esc: Go Back"), chunks[2]);
}

fn insight_text(state: &AppState) -> Text<'static> {
    if let Some(insight) = &state.insight {
        let mut lines = vec![
            Line::from(Span::styled(
                format!("\"{}\"", insight.summary),
                Style::default().add_modifier(Modifier::ITALIC),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("Dominant mood: ", Style::default().fg(Color::DarkGray)),
                Span::raw(insight.dominant_mood.clone()),
            ]),
        ];
        lines.extend(
            insight
                .recommendations
                .iter()
                .map(|r| Line::from(format!("  • {r}"))),
        );
        lines.push(Line::from(vec![
            Span::styled("Focus: ", Style::default().fg(Color::DarkGray)),
            Span::raw(insight.growth_focus.clone()),
        ]));
        return Text::from(lines);
    }

    let prompt = match state.analysis {
        AnalysisStatus::InFlight { .. } => "Analyzing...",
        AnalysisStatus::Failed => "No insight this time. Press g to try again.",
        AnalysisStatus::Idle => "Press g to generate a Zen insight.",
    };
    Text::from(Line::from(Span::styled(
        prompt,
        Style::default().fg(Color::Yellow),
    )))
}

fn render_stats(f: &mut Frame, area: Rect, state: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(8),
            Constraint::Length(12),
        ])
        .split(area);

    f.render_widget(title("Your Insights"), chunks[0]);

    f.render_widget(
        Paragraph::new(insight_text(state))
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Magenta))
                    .title("✨ AI Emotional Analysis"),
            ),
        chunks[1],
    );

    let bars: Vec<Bar> = state
        .mood_counts()
        .into_iter()
        .map(|(mood, count)| {
            let config = mood.config();
            Bar::default()
                .value(count as u64)
                .label(Line::from(format!("{} {}", config.emoji, config.label)))
                .style(Style::default().fg(config.color))
        })
        .collect();

    f.render_widget(
        BarChart::default()
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!("Moods ({} entries)", state.entries().len())),
            )
            .bar_width(8)
            .bar_gap(3)
            .data(BarGroup::default().bars(&bars)),
        chunks[2],
    );
}

/// Display width of the `#tag ` chips drawn before the tag input.
fn tag_prefix_width(tags: &[String]) -> u16 {
    let width: usize = tags.iter().map(|t| t.width() + 2).sum();
    u16::try_from(width).unwrap_or(u16::MAX)
}

fn render_new_entry(f: &mut Frame, area: Rect, state: &AppState, view: &ViewState) {
    let draft = &state.draft;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(3),
            Constraint::Min(6),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(area);

    f.render_widget(title("Write Today"), chunks[0]);

    let mood_focused = view.draft_focus == DraftField::Mood;
    let mut mood_spans = Vec::new();
    for (i, mood) in Mood::ALL.iter().enumerate() {
        let config = mood.config();
        let mut style = Style::default().fg(config.color);
        if draft.mood == Some(*mood) {
            style = style.add_modifier(Modifier::BOLD | Modifier::REVERSED);
        } else {
            style = style.add_modifier(Modifier::DIM);
        }
        if mood_focused && i == view.mood_cursor {
            style = style.add_modifier(Modifier::UNDERLINED);
        }
        mood_spans.push(Span::styled(format!(" {} {} ", config.emoji, config.label), style));
        mood_spans.push(Span::raw("  "));
    }
    f.render_widget(
        Paragraph::new(Line::from(mood_spans))
            .alignment(Alignment::Center)
            .block(field_block("How are you feeling? (1-5)", mood_focused)),
        chunks[1],
    );

    let text_area = chunks[2];
    let text_focused = view.draft_focus == DraftField::Text;
    let (cx, cy) = view.text.screen_position(&draft.text);
    let visible_rows = text_area.height.saturating_sub(2);
    let scroll = cy.saturating_sub(visible_rows.saturating_sub(1));
    f.render_widget(
        Paragraph::new(draft.text.as_str())
            .scroll((scroll, 0))
            .block(field_block("What's on your mind? Don't hold back...", text_focused)),
        text_area,
    );

    let tags_area = chunks[3];
    let tags_focused = view.draft_focus == DraftField::Tags;
    let mut tag_spans: Vec<Span> = draft
        .tags
        .iter()
        .map(|t| Span::styled(format!("#{t} "), Style::default().fg(Color::Blue)))
        .collect();
    let tag_prefix = tag_prefix_width(&draft.tags);
    tag_spans.push(Span::raw(draft.tag_input.as_str()));
    f.render_widget(
        Paragraph::new(Line::from(tag_spans)).block(field_block(
            "Tags (Enter: add, Backspace on empty: remove last)",
            tags_focused,
        )),
        tags_area,
    );

    let photo_area = chunks[4];
    let photo_focused = view.draft_focus == DraftField::Photo;
    let photo_title = match &draft.photo {
        Some(photo) => match describe_data_uri(photo) {
            Some((mime, size)) => format!(
                "Photo attached: {mime} · {} (Del: remove, Enter: replace)",
                format_size(size)
            ),
            None => "Photo attached (Del: remove)".to_string(),
        },
        None => "Add Photo: image path, Enter to attach".to_string(),
    };
    f.render_widget(
        Paragraph::new(draft.photo_input.as_str()).block(field_block(&photo_title, photo_focused)),
        photo_area,
    );

    let save_style = if draft.can_save() {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    f.render_widget(
        Paragraph::new("Ctrl+S: Keep this Memory   Tab: Next field   Esc: Back")
            .style(save_style)
            .alignment(Alignment::Center),
        chunks[5],
    );

    match view.draft_focus {
        DraftField::Mood => {}
        DraftField::Text => {
            f.set_cursor_position((text_area.x + 1 + cx, text_area.y + 1 + cy - scroll));
        }
        DraftField::Tags => {
            let (x, _) = view.tag.screen_position(&draft.tag_input);
            f.set_cursor_position((tags_area.x + 1 + tag_prefix + x, tags_area.y + 1));
        }
        DraftField::Photo => {
            let (x, _) = view.photo.screen_position(&draft.photo_input);
            f.set_cursor_position((photo_area.x + 1 + x, photo_area.y + 1));
        }
    }
}
