use super::theme::Theme;
use crate::application::{DashboardApp, Preset};
use crate::domain::{
    ApplyOutcome, DAY_NAMES, DISPLAY_ORDER, EditOutcome, EditorAction, FilterIssue, GroupState,
    Outcome, RangeSlot, ViewModel, WEEKENDS, WeekdayGroup, parse_date_input, range_issue,
    render_date, time_range_label,
};
use crossterm::ExecutableCommand;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers, poll};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use crossterm::tty::IsTty;
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use std::io::{self, Stdout, stdout};

pub const NO_DAYS_ADVISORY: &str =
    "Please select at least one day of week overlapping with the date range.";

/// Date being typed into the editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextEntry {
    Start(String),
    End(String),
}

impl TextEntry {
    fn buffer_mut(&mut self) -> &mut String {
        match self {
            TextEntry::Start(buffer) | TextEntry::End(buffer) => buffer,
        }
    }
}

/// Keyboard state of the panel, kept apart from the terminal so it can be
/// driven without one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelState {
    focus: RangeSlot,
    /// Position in [`DISPLAY_ORDER`].
    day_cursor: usize,
    entry: Option<TextEntry>,
    status: Option<String>,
    show_help: bool,
    should_exit: bool,
}

impl Default for PanelState {
    fn default() -> Self {
        Self::new()
    }
}

impl PanelState {
    pub fn new() -> Self {
        Self {
            focus: RangeSlot::FirstDateRange,
            day_cursor: 0,
            entry: None,
            status: None,
            show_help: false,
            should_exit: false,
        }
    }

    pub fn focus(&self) -> RangeSlot {
        self.focus
    }

    pub fn entry(&self) -> Option<&TextEntry> {
        self.entry.as_ref()
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn should_exit(&self) -> bool {
        self.should_exit
    }

    pub fn handle_key_event(&mut self, key: KeyEvent, app: &mut DashboardApp) {
        if let (KeyCode::Char('c') | KeyCode::Char('d'), KeyModifiers::CONTROL) =
            (key.code, key.modifiers)
        {
            self.should_exit = true;
            return;
        }

        if self.entry.is_some() {
            self.handle_entry_key(key, app);
        } else if app.controller(self.focus).is_open() {
            self.handle_editor_key(key, app);
        } else {
            self.handle_summary_key(key, app);
        }
    }

    fn handle_summary_key(&mut self, key: KeyEvent, app: &mut DashboardApp) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_exit = true,
            KeyCode::Tab | KeyCode::BackTab => self.focus = self.focus.other(),
            KeyCode::Enter => {
                self.day_cursor = 0;
                self.dispatch(app, EditorAction::Open);
            }
            KeyCode::Char('r') => self.dispatch(app, EditorAction::Reset),
            KeyCode::Char('t') => {
                app.cycle_time_range();
                self.status = Some(format!(
                    "Time range: {}",
                    time_range_label(app.params().time_range.as_ref())
                ));
            }
            KeyCode::Char('[') => {
                if !app.back() {
                    self.status = Some("Nothing to go back to".to_string());
                }
            }
            KeyCode::Char(']') => {
                if !app.forward() {
                    self.status = Some("Nothing to go forward to".to_string());
                }
            }
            KeyCode::Char('?') => self.show_help = !self.show_help,
            _ => {}
        }
    }

    fn handle_editor_key(&mut self, key: KeyEvent, app: &mut DashboardApp) {
        match key.code {
            KeyCode::Enter => self.dispatch(app, EditorAction::Apply),
            KeyCode::Esc => self.dispatch(app, EditorAction::Cancel),
            KeyCode::Char('c') => self.dispatch(app, EditorAction::Dismiss),
            KeyCode::Tab | KeyCode::BackTab => {
                // focus leaving the editor counts as a click-away
                self.dispatch(app, EditorAction::Dismiss);
                self.focus = self.focus.other();
            }
            KeyCode::Char('s') | KeyCode::Char('e') => {
                let Some(draft) = app.view_model(self.focus).draft else {
                    return;
                };
                self.entry = Some(if key.code == KeyCode::Char('s') {
                    TextEntry::Start(draft.start_date.format("%Y-%m-%d").to_string())
                } else {
                    TextEntry::End(draft.end_date.format("%Y-%m-%d").to_string())
                });
            }
            KeyCode::Char(c @ '1'..='9') => {
                let index = c as usize - '1' as usize;
                if let Some(preset) = app.config().presets.get(index) {
                    let lookback_days = preset.lookback_days;
                    self.dispatch(app, EditorAction::ApplyPreset(lookback_days));
                }
            }
            KeyCode::Left | KeyCode::Char('h') => {
                self.day_cursor = (self.day_cursor + DISPLAY_ORDER.len() - 1) % DISPLAY_ORDER.len();
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.day_cursor = (self.day_cursor + 1) % DISPLAY_ORDER.len();
            }
            KeyCode::Char(' ') | KeyCode::Char('x') => {
                let day = DISPLAY_ORDER[self.day_cursor];
                self.dispatch(app, EditorAction::ToggleDay(day));
            }
            KeyCode::Char('w') => {
                self.dispatch(app, EditorAction::ToggleGroup(WeekdayGroup::Weekdays))
            }
            KeyCode::Char('W') => {
                self.dispatch(app, EditorAction::ToggleGroup(WeekdayGroup::Weekends))
            }
            KeyCode::Char('r') => self.dispatch(app, EditorAction::Reset),
            KeyCode::Char('?') => self.show_help = !self.show_help,
            _ => {}
        }
    }

    fn handle_entry_key(&mut self, key: KeyEvent, app: &mut DashboardApp) {
        let Some(entry) = self.entry.as_mut() else {
            return;
        };

        match key.code {
            KeyCode::Char(c) if c.is_ascii_digit() || c == '-' => entry.buffer_mut().push(c),
            KeyCode::Backspace => {
                entry.buffer_mut().pop();
            }
            KeyCode::Esc => self.entry = None,
            KeyCode::Enter => {
                let action = match self.entry.take() {
                    Some(TextEntry::Start(input)) => EditorAction::SetStartDate(input),
                    Some(TextEntry::End(input)) => EditorAction::SetEndDate(input),
                    None => return,
                };
                self.dispatch(app, action);
            }
            _ => {}
        }
    }

    fn dispatch(&mut self, app: &mut DashboardApp, action: EditorAction) {
        let outcome = app.dispatch(self.focus, action);
        self.status = status_message(outcome);
    }
}

/// One-line feedback for the status bar.
pub fn status_message(outcome: Outcome) -> Option<String> {
    let message = match outcome {
        Outcome::Edited(EditOutcome::Clamped(_)) => "Dates adjusted to fit the allowed range",
        Outcome::Edited(EditOutcome::Ignored(FilterIssue::EmptyDateInput)) => {
            "Enter a date as YYYY-MM-DD"
        }
        Outcome::Apply(ApplyOutcome::Rejected(FilterIssue::NoUsableDay)) => NO_DAYS_ADVISORY,
        Outcome::Apply(ApplyOutcome::Committed) => "Applied",
        Outcome::Reset => "Reset to default",
        Outcome::Discarded => "Changes discarded",
        _ => return None,
    };
    Some(message.to_string())
}

pub struct FilterPanel<'a> {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    theme: Theme,
    state: PanelState,
    app: &'a mut DashboardApp,
}

impl<'a> FilterPanel<'a> {
    pub fn new(app: &'a mut DashboardApp, theme: Theme) -> io::Result<Self> {
        if !IsTty::is_tty(&std::io::stdout()) {
            return Err(io::Error::new(
                io::ErrorKind::Unsupported,
                "Not running in a TTY, cannot initialize terminal interface",
            ));
        }

        enable_raw_mode()
            .map_err(|e| io::Error::other(format!("Failed to enable raw mode: {}", e)))?;

        stdout().execute(EnterAlternateScreen).map_err(|e| {
            let _ = disable_raw_mode();
            io::Error::other(format!("Failed to enter alternate screen: {}", e))
        })?;

        let backend = CrosstermBackend::new(stdout());
        let terminal = Terminal::new(backend).map_err(|e| {
            let _ = disable_raw_mode();
            let _ = stdout().execute(LeaveAlternateScreen);
            io::Error::other(format!("Failed to create terminal: {}", e))
        })?;

        Ok(Self {
            terminal,
            theme,
            state: PanelState::new(),
            app,
        })
    }

    fn centered_area(available: Rect, needed_width: u16, needed_height: u16) -> Rect {
        let width = available.width.min(needed_width);
        let height = available.height.min(needed_height);

        Rect {
            x: available.x + (available.width - width) / 2,
            y: available.y + (available.height - height) / 2,
            width,
            height,
        }
    }

    fn group_mark(state: GroupState) -> &'static str {
        match state {
            GroupState::Checked => "[x]",
            GroupState::Indeterminate => "[-]",
            GroupState::Unchecked => "[ ]",
        }
    }

    fn summary_lines(app: &DashboardApp, state: &PanelState, theme: &Theme) -> Vec<Line<'static>> {
        let colors = &theme.colors;
        let mut lines = Vec::new();

        for slot in RangeSlot::ALL {
            let view = app.view_model(slot);
            let focused = slot == state.focus;
            let marker = if focused { "> " } else { "  " };
            let title_style = if focused {
                colors.accent.to_ratatui_with_modifier(Modifier::BOLD)
            } else {
                colors.header.to_ratatui()
            };

            let mut spans = vec![
                Span::styled(marker.to_string(), colors.accent.to_ratatui()),
                Span::styled(format!("{:<11}", slot.title()), title_style),
                Span::styled(view.main_label.clone(), colors.normal_text.to_ratatui()),
            ];
            if !view.secondary_label.is_empty() {
                spans.push(Span::styled(
                    format!("  {}", view.secondary_label),
                    colors.dimmed.to_ratatui(),
                ));
            }
            if view.is_dirty {
                spans.push(Span::styled(" *", colors.dirty_marker.to_ratatui()));
            }
            lines.push(Line::from(spans));
        }

        let time_label = app
            .time_range_index()
            .and_then(|index| app.time_ranges().get(index))
            .map(|named| match &named.range {
                Some(range) => format!("{} ({})", named.label, range),
                None => named.label.clone(),
            })
            .unwrap_or_else(|| time_range_label(app.params().time_range.as_ref()));
        lines.push(Line::from(vec![
            Span::styled("  ".to_string(), colors.normal_text.to_ratatui()),
            Span::styled(format!("{:<11}", "Time"), colors.header.to_ratatui()),
            Span::styled(time_label, colors.normal_text.to_ratatui()),
        ]));

        let history = format!(
            "  {} back  {} forward",
            if app.can_go_back() { "[" } else { " " },
            if app.can_go_forward() { "]" } else { " " },
        );
        lines.push(Line::from(Span::styled(history, colors.dimmed.to_ratatui())));

        lines
    }

    /// Warns while typing when the entered date will be clamped on submit.
    fn entry_hint(view: &ViewModel, entry: &TextEntry, max_date_range: u32) -> Option<String> {
        let draft = view.draft.as_ref()?;
        let (start, end) = match entry {
            TextEntry::Start(buffer) => (parse_date_input(buffer)?, draft.end_date),
            TextEntry::End(buffer) => (draft.start_date, parse_date_input(buffer)?),
        };
        range_issue(start, end, view.max_end_date, max_date_range).map(|_| {
            format!(
                "Will be adjusted: ranges end by {} and span at most {} days",
                render_date(view.max_end_date),
                max_date_range
            )
        })
    }

    fn editor_lines(
        view: &ViewModel,
        state: &PanelState,
        presets: &[Preset],
        max_date_range: u32,
        theme: &Theme,
    ) -> Vec<Line<'static>> {
        let colors = &theme.colors;
        let Some(draft) = view.draft.as_ref() else {
            return Vec::new();
        };

        let date_line = |label: &str, value: String, editing: bool| {
            let style = if editing {
                colors.selected.to_ratatui_with_modifier(Modifier::BOLD)
            } else {
                colors.normal_text.to_ratatui()
            };
            let value = if editing { format!("{}_", value) } else { value };
            Line::from(vec![
                Span::styled(format!("{:<7}", label), colors.header.to_ratatui()),
                Span::styled(value, style),
            ])
        };

        let start = match &state.entry {
            Some(TextEntry::Start(buffer)) => date_line("Start", buffer.clone(), true),
            _ => date_line("Start", render_date(draft.start_date), false),
        };
        let end = match &state.entry {
            Some(TextEntry::End(buffer)) => date_line("End", buffer.clone(), true),
            _ => date_line("End", render_date(draft.end_date), false),
        };

        let mut lines = vec![start, end];
        match state
            .entry
            .as_ref()
            .and_then(|entry| Self::entry_hint(view, entry, max_date_range))
        {
            Some(hint) => lines.push(Line::from(Span::styled(
                hint,
                colors.warning_text.to_ratatui(),
            ))),
            None => lines.push(Line::from(Span::styled(
                match view.min_start_date {
                    Some(min_start) => format!(
                        "Earliest start {}, latest end {}",
                        render_date(min_start),
                        render_date(view.max_end_date)
                    ),
                    None => String::new(),
                },
                colors.dimmed.to_ratatui(),
            ))),
        }

        let mut preset_spans = Vec::new();
        for (index, preset) in presets.iter().take(9).enumerate() {
            let active = draft.lookback_days == Some(preset.lookback_days);
            let style = if active {
                colors.accent.to_ratatui_with_modifier(Modifier::BOLD)
            } else {
                colors.normal_text.to_ratatui()
            };
            preset_spans.push(Span::styled(format!("{} {}  ", index + 1, preset.label), style));
        }
        lines.push(Line::from(preset_spans));
        lines.push(Line::from(""));

        let days = draft.days_of_the_week;
        let day_spans: Vec<Span<'static>> = DISPLAY_ORDER
            .iter()
            .enumerate()
            .map(|(position, &day)| {
                let mark = if days.is_included(day) { "x" } else { " " };
                let style = if position == state.day_cursor {
                    colors.selected.to_ratatui_with_modifier(Modifier::BOLD)
                } else if !view.live_weekdays.contains(&day) {
                    colors.dimmed.to_ratatui()
                } else if WEEKENDS.contains(&day) {
                    colors.weekend.to_ratatui()
                } else {
                    colors.normal_text.to_ratatui()
                };
                Span::styled(format!("[{}] {} ", mark, DAY_NAMES[day]), style)
            })
            .collect();
        lines.push(Line::from(day_spans));

        lines.push(Line::from(vec![
            Span::styled(
                format!("{} Weekdays  ", Self::group_mark(view.weekdays)),
                colors.normal_text.to_ratatui(),
            ),
            Span::styled(
                format!("{} Weekends", Self::group_mark(view.weekends)),
                colors.weekend.to_ratatui(),
            ),
        ]));

        if view.show_no_days_warning() {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                NO_DAYS_ADVISORY.to_string(),
                colors.warning_text.to_ratatui_with_modifier(Modifier::BOLD),
            )));
        }

        lines
    }

    fn help_text(state: &PanelState, editing: bool, theme: &Theme) -> Paragraph<'static> {
        let keys = if state.entry.is_some() {
            "Type YYYY-MM-DD • Enter=Set • Esc=Back"
        } else if editing {
            "Enter=Apply • Esc=Cancel • c=Close • s/e=Start/End • 1-9=Preset • ←→ Space=Day • w/W=Groups • r=Reset"
        } else {
            "Tab=Slot • Enter=Edit • r=Reset • t=Time • [/]=Back/Forward • ?=Help • q=Quit"
        };

        let mut lines = vec![Line::from(Span::styled(
            keys.to_string(),
            theme.colors.help_text.to_ratatui(),
        ))];
        if let Some(status) = &state.status {
            lines.push(Line::from(Span::styled(
                status.clone(),
                theme.colors.normal_text.to_ratatui(),
            )));
        }

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
    }

    /// Run the panel loop until the user quits.
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            if self.state.should_exit {
                break;
            }

            let app: &DashboardApp = self.app;
            let state = &self.state;
            let theme = &self.theme;
            let view = app.view_model(state.focus);
            let editing = view.draft.is_some();

            self.terminal.draw(|frame| {
                const SUMMARY_HEIGHT: u16 = 6;
                const EDITOR_HEIGHT: u16 = 14;
                const HELP_HEIGHT: u16 = 4;
                const PANEL_WIDTH: u16 = 96;

                let total_height = SUMMARY_HEIGHT + EDITOR_HEIGHT + HELP_HEIGHT;
                let area = Self::centered_area(frame.area(), PANEL_WIDTH, total_height);

                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([
                        Constraint::Length(SUMMARY_HEIGHT),
                        Constraint::Length(EDITOR_HEIGHT),
                        Constraint::Length(HELP_HEIGHT),
                    ])
                    .split(area);

                let summary = Paragraph::new(Self::summary_lines(app, state, theme)).block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(theme.colors.border.to_ratatui())
                        .title(format!(" Filters - today {} ", render_date(app.today())))
                        .title_alignment(Alignment::Center),
                );
                frame.render_widget(summary, chunks[0]);

                if editing {
                    let editor = Paragraph::new(Self::editor_lines(
                        &view,
                        state,
                        &app.config().presets,
                        app.config().max_date_range,
                        theme,
                    ))
                    .block(
                        Block::default()
                            .borders(Borders::ALL)
                            .border_style(theme.colors.accent.to_ratatui())
                            .title(format!(" {} ", state.focus.title())),
                    );
                    frame.render_widget(Clear, chunks[1]);
                    frame.render_widget(editor, chunks[1]);
                }

                if state.show_help || editing || state.status.is_some() {
                    frame.render_widget(Self::help_text(state, editing, theme), chunks[2]);
                }
            })?;

            if poll(std::time::Duration::from_millis(100))? {
                match event::read()? {
                    Event::Key(key) => self.state.handle_key_event(key, self.app),
                    _ => continue,
                }
            }
        }

        self.cleanup()
    }

    fn cleanup(&mut self) -> io::Result<()> {
        disable_raw_mode()?;
        self.terminal.backend_mut().execute(LeaveAlternateScreen)?;
        Ok(())
    }
}

impl Drop for FilterPanel<'_> {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::Config;
    use crate::domain::{DaysOfWeek, EditorPhase};
    use crate::infrastructure::test_utils::{FixedClock, date};
    use std::path::PathBuf;
    use std::rc::Rc;

    fn test_app() -> DashboardApp {
        let config = Config::with_state_dir(PathBuf::from("."));
        DashboardApp::new(config, Rc::new(FixedClock(date(2023, 5, 15))), None)
    }

    fn press(state: &mut PanelState, app: &mut DashboardApp, code: KeyCode) {
        state.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE), app);
    }

    fn type_text(state: &mut PanelState, app: &mut DashboardApp, text: &str) {
        for c in text.chars() {
            press(state, app, KeyCode::Char(c));
        }
    }

    #[test]
    fn test_preset_and_apply() {
        let mut app = test_app();
        let mut state = PanelState::new();

        press(&mut state, &mut app, KeyCode::Enter);
        assert_eq!(app.view_model(RangeSlot::FirstDateRange).phase, EditorPhase::OpenClean);
        press(&mut state, &mut app, KeyCode::Char('2'));
        press(&mut state, &mut app, KeyCode::Enter);

        assert!(!app.controller(RangeSlot::FirstDateRange).is_open());
        assert_eq!(state.status(), Some("Applied"));
        assert!(app.current_query().contains("startDate=2023-05-09&date=2023-05-15&daysBack=7"));
    }

    #[test]
    fn test_typed_start_date_then_cancel() {
        let mut app = test_app();
        let mut state = PanelState::new();
        let before = app.current_query();

        press(&mut state, &mut app, KeyCode::Enter);
        press(&mut state, &mut app, KeyCode::Char('s'));
        assert_eq!(state.entry(), Some(&TextEntry::Start("2023-05-15".to_string())));

        for _ in 0..10 {
            press(&mut state, &mut app, KeyCode::Backspace);
        }
        type_text(&mut state, &mut app, "2023-05-01");
        press(&mut state, &mut app, KeyCode::Enter);

        assert_eq!(state.entry(), None);
        let view = app.view_model(RangeSlot::FirstDateRange);
        assert_eq!(view.draft.map(|draft| draft.start_date), Some(date(2023, 5, 1)));
        assert!(view.is_dirty);

        press(&mut state, &mut app, KeyCode::Esc);
        assert_eq!(state.status(), Some("Changes discarded"));
        assert_eq!(app.current_query(), before);
    }

    #[test]
    fn test_empty_entry_is_ignored() {
        let mut app = test_app();
        let mut state = PanelState::new();

        press(&mut state, &mut app, KeyCode::Enter);
        press(&mut state, &mut app, KeyCode::Char('e'));
        for _ in 0..10 {
            press(&mut state, &mut app, KeyCode::Backspace);
        }
        press(&mut state, &mut app, KeyCode::Enter);

        assert_eq!(state.status(), Some("Enter a date as YYYY-MM-DD"));
        assert_eq!(app.view_model(RangeSlot::FirstDateRange).phase, EditorPhase::OpenClean);
    }

    #[test]
    fn test_no_usable_day_blocks_apply() {
        let mut app = test_app();
        let mut state = PanelState::new();

        press(&mut state, &mut app, KeyCode::Enter);
        press(&mut state, &mut app, KeyCode::Char('2'));
        press(&mut state, &mut app, KeyCode::Char('w'));
        press(&mut state, &mut app, KeyCode::Char('W'));
        press(&mut state, &mut app, KeyCode::Enter);

        let view = app.view_model(RangeSlot::FirstDateRange);
        assert_eq!(state.status(), Some(NO_DAYS_ADVISORY));
        assert!(view.show_no_days_warning());
        assert_eq!(view.draft.map(|draft| draft.days_of_the_week), Some(DaysOfWeek::none()));
        assert!(app.controller(RangeSlot::FirstDateRange).is_open());
    }

    #[test]
    fn test_day_cursor_toggles_day() {
        let mut app = test_app();
        let mut state = PanelState::new();

        press(&mut state, &mut app, KeyCode::Enter);
        press(&mut state, &mut app, KeyCode::Char('2'));
        press(&mut state, &mut app, KeyCode::Right);
        press(&mut state, &mut app, KeyCode::Char(' '));

        let days = app
            .view_model(RangeSlot::FirstDateRange)
            .draft
            .map(|draft| draft.days_of_the_week);
        // cursor moved from Mon to Tue
        assert_eq!(days, Some(DaysOfWeek::all().set_day(2, false)));

        press(&mut state, &mut app, KeyCode::Left);
        press(&mut state, &mut app, KeyCode::Left);
        press(&mut state, &mut app, KeyCode::Char('x'));
        let days = app
            .view_model(RangeSlot::FirstDateRange)
            .draft
            .map(|draft| draft.days_of_the_week);
        // wrapped around to Sun
        assert_eq!(days, Some(DaysOfWeek::all().set_day(2, false).set_day(0, false)));
    }

    #[test]
    fn test_tab_dismisses_and_second_slot_reset_clears() {
        let mut app = test_app();
        let mut state = PanelState::new();

        press(&mut state, &mut app, KeyCode::Tab);
        assert_eq!(state.focus(), RangeSlot::SecondDateRange);

        press(&mut state, &mut app, KeyCode::Enter);
        press(&mut state, &mut app, KeyCode::Char('c'));
        assert!(app.current_query().contains("secondStartDate=2023-05-15"));

        press(&mut state, &mut app, KeyCode::Char('r'));
        assert_eq!(state.status(), Some("Reset to default"));
        assert!(!app.current_query().contains("second"));

        press(&mut state, &mut app, KeyCode::Enter);
        press(&mut state, &mut app, KeyCode::Char('3'));
        press(&mut state, &mut app, KeyCode::Tab);
        assert_eq!(state.focus(), RangeSlot::FirstDateRange);
        assert!(app.current_query().contains("secondDaysBack=14"));
    }

    #[test]
    fn test_time_range_and_history_keys() {
        let mut app = test_app();
        let mut state = PanelState::new();
        let before = app.current_query();

        press(&mut state, &mut app, KeyCode::Char('t'));
        assert_eq!(state.status(), Some("Time range: 03:00-07:00"));
        press(&mut state, &mut app, KeyCode::Char('['));
        assert_eq!(app.current_query(), before);
        press(&mut state, &mut app, KeyCode::Char('['));
        assert_eq!(state.status(), Some("Nothing to go back to"));
        press(&mut state, &mut app, KeyCode::Char(']'));
        assert!(app.current_query().contains("startTime"));
    }

    #[test]
    fn test_entry_hint_flags_out_of_range_dates() {
        let mut app = test_app();
        let mut state = PanelState::new();
        press(&mut state, &mut app, KeyCode::Enter);

        let view = app.view_model(RangeSlot::FirstDateRange);
        let hint = |input: &str| {
            FilterPanel::entry_hint(&view, &TextEntry::Start(input.to_string()), 90)
        };

        assert_eq!(hint("2023-05-01"), None);
        assert_eq!(hint("2023-05-"), None);
        assert!(hint("2022-01-01").is_some());
        assert!(FilterPanel::entry_hint(&view, &TextEntry::End("2023-06-01".to_string()), 90).is_some());
    }

    #[test]
    fn test_quit_keys() {
        let mut app = test_app();
        let mut state = PanelState::new();

        press(&mut state, &mut app, KeyCode::Enter);
        press(&mut state, &mut app, KeyCode::Char('q'));
        assert!(!state.should_exit());

        state.handle_key_event(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL), &mut app);
        assert!(state.should_exit());

        let mut app = test_app();
        let mut state = PanelState::new();
        press(&mut state, &mut app, KeyCode::Char('q'));
        assert!(state.should_exit());
    }
}
