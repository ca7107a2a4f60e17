use anyhow::{Context, Result};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    cursor::Show,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame, Terminal,
};
use std::io;
use std::time::Duration;
use tokio::runtime::Handle;

use crate::config::Config;
use crate::dialog::{
    AddTaskDialog, DialogOutcome, SettingsDialog, ADD_TASK_LABEL, ADD_TASK_TITLE, SETTINGS_BODY,
    SETTINGS_TITLE,
};
use crate::models::PopupMode;
use crate::store::TaskStore;
use crate::theme;
use crate::timer::Timer;

const POLL_INTERVAL: Duration = Duration::from_millis(200);

pub struct App {
    pub store: TaskStore,
    pub timer: Timer,
    pub task_list_state: ListState,
    pub should_quit: bool,
    // Dialogs
    pub add_task: AddTaskDialog,
    pub settings: SettingsDialog,
    // Last rendered task list area, for mouse hit-testing
    list_area: Rect,
}

impl App {
    pub fn new(store: TaskStore, timer: Timer) -> Self {
        let mut app = App {
            store,
            timer,
            task_list_state: ListState::default(),
            should_quit: false,
            add_task: AddTaskDialog::default(),
            settings: SettingsDialog::default(),
            list_area: Rect::default(),
        };
        if !app.store.is_empty() {
            app.task_list_state.select(Some(0));
        }
        app
    }

    pub fn popup_mode(&self) -> PopupMode {
        if self.add_task.visible {
            PopupMode::AddTask
        } else if self.settings.visible {
            PopupMode::Settings
        } else {
            PopupMode::None
        }
    }

    /// Everything that changes what is on screen without an input event.
    fn snapshot(&self) -> (u64, u64, bool) {
        (
            self.store.revision(),
            self.timer.elapsed_seconds(),
            self.timer.is_running(),
        )
    }

    pub fn next_item(&mut self) {
        if self.store.is_empty() {
            return;
        }
        let i = match self.task_list_state.selected() {
            Some(i) if i + 1 < self.store.len() => i + 1,
            _ => 0,
        };
        self.task_list_state.select(Some(i));
    }

    pub fn previous_item(&mut self) {
        if self.store.is_empty() {
            return;
        }
        let i = match self.task_list_state.selected() {
            Some(0) | None => self.store.len() - 1,
            Some(i) => i - 1,
        };
        self.task_list_state.select(Some(i));
    }

    pub fn toggle_selected(&mut self) {
        let selected = self
            .task_list_state
            .selected()
            .and_then(|i| self.store.tasks().get(i))
            .map(|task| task.id);
        if let Some(id) = selected {
            self.store.toggle_task_completion(id);
        }
    }

    pub fn open_add_task(&mut self) {
        self.settings.close();
        self.add_task.open();
    }

    pub fn open_settings(&mut self) {
        self.add_task.close();
        self.settings.open();
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match self.popup_mode() {
            PopupMode::AddTask => {
                let before = self.store.len();
                if self.add_task.handle_key(key, &mut self.store) == DialogOutcome::Closed
                    && self.store.len() > before
                {
                    self.task_list_state.select(Some(self.store.len() - 1));
                }
            }
            PopupMode::Settings => {
                self.settings.handle_key(key);
            }
            PopupMode::None => match key.code {
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.should_quit = true;
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    self.next_item();
                }
                KeyCode::Up | KeyCode::Char('k') => {
                    self.previous_item();
                }
                KeyCode::Char(' ') | KeyCode::Enter => {
                    self.toggle_selected();
                }
                KeyCode::Char('a') | KeyCode::Char('+') => {
                    self.open_add_task();
                }
                KeyCode::Char('s') => {
                    self.open_settings();
                }
                KeyCode::Char('t') => {
                    self.timer.toggle();
                }
                _ => {}
            },
        }
    }

    /// Tap-to-toggle: a left click on a task row toggles that task.
    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        if self.popup_mode() != PopupMode::None {
            return;
        }
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return;
        }

        let area = self.list_area;
        let inside = mouse.column > area.x
            && mouse.column < area.x + area.width.saturating_sub(1)
            && mouse.row > area.y
            && mouse.row < area.y + area.height.saturating_sub(1);
        if !inside {
            return;
        }

        let index = (mouse.row - area.y - 1) as usize + self.task_list_state.offset();
        if let Some(id) = self.store.tasks().get(index).map(|task| task.id) {
            self.task_list_state.select(Some(index));
            self.store.toggle_task_completion(id);
        }
    }
}

/// Raw mode plus alternate screen. Dropping the guard restores the terminal,
/// so an early `?` during set-up never leaves the shell in raw mode.
struct TerminalGuard {
    active: bool,
}

impl TerminalGuard {
    fn enter() -> Result<Self> {
        enable_raw_mode().context("enable raw mode")?;
        let guard = TerminalGuard { active: true };
        execute!(io::stdout(), EnterAlternateScreen, EnableMouseCapture)
            .context("enter alternate screen")?;
        Ok(guard)
    }

    fn restore(&mut self) -> Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;

        // Attempt every step even if an earlier one fails.
        let raw = disable_raw_mode().context("disable raw mode");
        let screen = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture, Show)
            .context("leave alternate screen");
        raw.and(screen)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(err) = self.restore() {
            log::warn!("terminal restore failed: {err:#}");
        }
    }
}

/// The loop's error wins over a restore error.
fn session_result(run: Result<()>, restore: Result<()>) -> Result<()> {
    run.and(restore)
}

pub fn run_tui(config: &Config, runtime: Handle) -> Result<()> {
    let mut store = TaskStore::new();
    for title in &config.seed_tasks {
        store.add_task(title);
    }
    let timer = Timer::new(runtime, config.tick_interval);
    let mut app = App::new(store, timer);

    let mut guard = TerminalGuard::enter()?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let res = run_app(&mut terminal, &mut app);
    let restored = guard.restore();

    log::info!(
        "session ended with {} tasks, timer at {}",
        app.store.len(),
        crate::timer::format_elapsed(app.timer.elapsed_seconds())
    );
    session_result(res, restored)
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    let mut drawn = None;
    let mut dirty = true;

    loop {
        let snapshot = app.snapshot();
        if dirty || drawn != Some(snapshot) {
            terminal.draw(|f| ui(f, app)).context("draw frame")?;
            drawn = Some(snapshot);
            dirty = false;
        }

        if event::poll(POLL_INTERVAL).context("poll event")? {
            match event::read().context("read event")? {
                Event::Key(key) => app.handle_key(key),
                Event::Mouse(mouse) => app.handle_mouse(mouse),
                _ => {}
            }
            dirty = true;
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

fn ui(f: &mut Frame, app: &mut App) {
    f.render_widget(Block::default().style(Style::default().bg(theme::BACKGROUND)), f.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Min(3),
                Constraint::Length(4),
                Constraint::Length(1),
            ]
            .as_ref(),
        )
        .split(f.area());

    render_header(f, app, chunks[0]);
    render_tasks(f, app, chunks[1]);
    render_timer(f, app, chunks[2]);

    let help = Paragraph::new("↑/↓ select • Space toggle • a add • t timer • s settings • q quit")
        .style(Style::default().fg(theme::MUTED));
    f.render_widget(help, chunks[3]);

    match app.popup_mode() {
        PopupMode::AddTask => render_add_task(f, &app.add_task),
        PopupMode::Settings => render_settings(f),
        PopupMode::None => {}
    }
}

// Popup area: `percent_x` by `percent_y` of `r`, centered.
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let mut spans = theme::gradient_line("NeonPulse").spans;
    spans.push(Span::raw("   "));
    spans.push(Span::styled(
        format!("{}/{} done", app.store.completed_count(), app.store.len()),
        Style::default().fg(theme::MUTED),
    ));
    spans.push(Span::raw("   "));
    spans.push(Span::styled("⚙ s: Settings", Style::default().fg(theme::CYAN)));

    let header = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::VIOLET)),
    );
    f.render_widget(header, area);
}

fn render_tasks(f: &mut Frame, app: &mut App, area: Rect) {
    app.list_area = area;

    let tasks: Vec<ListItem> = app
        .store
        .tasks()
        .iter()
        .map(|task| {
            let (checkbox, title_color) = if task.completed {
                ("[x] ", theme::MUTED)
            } else {
                ("[ ] ", Color::White)
            };
            ListItem::new(Line::from(vec![
                Span::styled(checkbox, Style::default().fg(theme::CYAN)),
                Span::styled(task.title.clone(), Style::default().fg(title_color)),
            ]))
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::CYAN))
        .title("Tasks");

    if tasks.is_empty() {
        let empty = Paragraph::new("No tasks yet. Press a to add one.")
            .block(block)
            .style(Style::default().fg(theme::MUTED));
        f.render_widget(empty, area);
        return;
    }

    let tasks_list = List::new(tasks)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(theme::SURFACE)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol(">> ");

    f.render_stateful_widget(tasks_list, area, &mut app.task_list_state);
}

fn render_timer(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)].as_ref())
        .split(area);

    let timer = Paragraph::new(vec![
        Line::from(Span::styled(
            app.timer.display(),
            Style::default().fg(theme::CYAN).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!(" {} (t) ", app.timer.button_label()),
            Style::default().bg(theme::VIOLET).fg(Color::White),
        )),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::VIOLET))
            .style(Style::default().bg(theme::SURFACE)),
    );
    f.render_widget(timer, chunks[0]);

    let fab = Paragraph::new(Line::from(Span::styled(
        " + Add Task ",
        Style::default().bg(theme::PINK).fg(Color::Black).add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::PINK)),
    );
    f.render_widget(fab, chunks[1]);
}

fn render_add_task(f: &mut Frame, dialog: &AddTaskDialog) {
    let popup_area = centered_rect(60, 40, f.area());
    f.render_widget(Clear, popup_area);

    let (before, current, after) = dialog.input.split_at_cursor();
    let field = Style::default().fg(Color::White).bg(theme::SURFACE);
    let input_line = Line::from(vec![
        Span::styled(before.to_string(), field),
        Span::styled(
            current.map_or(" ".to_string(), |c| c.to_string()),
            Style::default().bg(theme::CYAN).fg(Color::Black),
        ),
        Span::styled(after.to_string(), field),
    ]);

    let mut lines = vec![
        Line::from(Span::styled(ADD_TASK_LABEL, Style::default().fg(theme::MUTED))),
        input_line,
    ];
    if let Some(hint) = dialog.hint {
        lines.push(Line::from(Span::styled(hint, Style::default().fg(theme::PINK))));
    }
    lines.push(Line::default());
    lines.push(Line::from(vec![
        Span::styled("Enter: Add", Style::default().fg(theme::PINK)),
        Span::raw("   "),
        Span::styled("Esc: Cancel", Style::default().fg(theme::MUTED)),
    ]));

    let block = Block::default()
        .title(Span::styled(ADD_TASK_TITLE, Style::default().fg(theme::CYAN)))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::CYAN))
        .style(theme::dialog_style());
    f.render_widget(Paragraph::new(lines).block(block), popup_area);
}

fn render_settings(f: &mut Frame) {
    let popup_area = centered_rect(60, 30, f.area());
    f.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(Span::styled(SETTINGS_TITLE, Style::default().fg(theme::CYAN)))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::CYAN))
        .style(theme::dialog_style());
    let content = Paragraph::new(vec![
        Line::from(SETTINGS_BODY),
        Line::default(),
        Line::from(Span::styled("Enter: Save", Style::default().fg(theme::PINK))),
    ])
    .block(block)
    .alignment(Alignment::Center);

    f.render_widget(content, popup_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Task;
    use crate::timer::DEFAULT_TICK_MS;
    use ratatui::backend::TestBackend;

    fn test_app() -> App {
        App::new(TaskStore::new(), Timer::new(Handle::current(), Duration::from_millis(DEFAULT_TICK_MS)))
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_text(app: &mut App, text: &str) {
        text.chars().for_each(|c| press(app, KeyCode::Char(c)));
    }

    fn add_via_dialog(app: &mut App, title: &str) {
        press(app, KeyCode::Char('a'));
        type_text(app, title);
        press(app, KeyCode::Enter);
    }

    fn render_to_string(app: &mut App, width: u16, height: u16) -> String {
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| ui(f, app)).unwrap();

        let buf = terminal.backend().buffer();
        buf.content
            .chunks(buf.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn loop_error_is_kept_when_restore_also_fails() {
        let err = session_result(
            Err(anyhow::anyhow!("draw frame")),
            Err(anyhow::anyhow!("disable raw mode")),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "draw frame");

        let err = session_result(Ok(()), Err(anyhow::anyhow!("disable raw mode"))).unwrap_err();
        assert_eq!(err.to_string(), "disable raw mode");
        assert!(session_result(Ok(()), Ok(())).is_ok());
    }

    #[test]
    fn restored_guard_does_not_touch_the_terminal_again() {
        let mut guard = TerminalGuard { active: false };
        assert!(guard.restore().is_ok());
        assert!(!guard.active);
    }

    #[tokio::test]
    async fn add_two_tasks_and_toggle_the_first() {
        let mut app = test_app();
        add_via_dialog(&mut app, "Buy milk");
        add_via_dialog(&mut app, "Walk dog");
        assert_eq!(app.task_list_state.selected(), Some(1));

        press(&mut app, KeyCode::Up);
        press(&mut app, KeyCode::Char(' '));

        assert_eq!(
            app.store.tasks(),
            &[
                Task { id: 1, title: "Buy milk".to_string(), completed: true },
                Task { id: 2, title: "Walk dog".to_string(), completed: false },
            ]
        );
    }

    #[tokio::test]
    async fn dialog_swallows_navigation_keys() {
        let mut app = test_app();
        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.popup_mode(), PopupMode::AddTask);

        type_text(&mut app, "qst");
        assert!(!app.should_quit);
        assert!(!app.timer.is_running());
        assert_eq!(app.add_task.input.value(), "qst");

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.popup_mode(), PopupMode::None);
        assert!(app.store.is_empty());
        assert!(!app.should_quit);
    }

    #[tokio::test]
    async fn blank_title_keeps_dialog_open() {
        let mut app = test_app();
        add_via_dialog(&mut app, "  ");
        assert_eq!(app.popup_mode(), PopupMode::AddTask);
        assert!(app.store.is_empty());
    }

    #[tokio::test]
    async fn navigation_on_empty_list_is_harmless() {
        let mut app = test_app();
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Up);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.task_list_state.selected(), None);
        assert_eq!(app.store.revision(), 0);
    }

    #[tokio::test]
    async fn selection_wraps_around() {
        let mut app = test_app();
        add_via_dialog(&mut app, "one");
        add_via_dialog(&mut app, "two");
        press(&mut app, KeyCode::Down);
        assert_eq!(app.task_list_state.selected(), Some(0));
        press(&mut app, KeyCode::Up);
        assert_eq!(app.task_list_state.selected(), Some(1));
    }

    #[tokio::test]
    async fn settings_opens_and_dismisses() {
        let mut app = test_app();
        press(&mut app, KeyCode::Char('s'));
        assert_eq!(app.popup_mode(), PopupMode::Settings);
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.should_quit);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.popup_mode(), PopupMode::None);
    }

    #[tokio::test]
    async fn quit_keys() {
        let mut app = test_app();
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);

        let mut app = test_app();
        press(&mut app, KeyCode::Char('a'));
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
    }

    #[tokio::test(start_paused = true)]
    async fn t_starts_and_pauses_the_timer() {
        let mut app = test_app();
        press(&mut app, KeyCode::Char('t'));
        assert!(app.timer.is_running());

        tokio::time::sleep(Duration::from_millis(1_500)).await;
        press(&mut app, KeyCode::Char('t'));
        assert!(!app.timer.is_running());
        assert!(app.timer.elapsed_seconds() >= 1);
    }

    #[tokio::test]
    async fn renders_tasks_timer_and_title() {
        let mut app = test_app();
        add_via_dialog(&mut app, "Buy milk");
        add_via_dialog(&mut app, "Walk dog");
        app.store.toggle_task_completion(1);

        let screen = render_to_string(&mut app, 80, 24);
        assert!(screen.contains("NeonPulse"));
        assert!(screen.contains("1/2 done"));
        assert!(screen.contains("[x] Buy milk"));
        assert!(screen.contains("[ ] Walk dog"));
        assert!(screen.contains("Timer: 0:00"));
        assert!(screen.contains("Start"));
        assert!(screen.contains("+ Add Task"));
    }

    #[tokio::test]
    async fn renders_dialogs() {
        let mut app = test_app();
        press(&mut app, KeyCode::Char('a'));
        type_text(&mut app, "Water plants");
        let screen = render_to_string(&mut app, 80, 24);
        assert!(screen.contains(ADD_TASK_TITLE));
        assert!(screen.contains(ADD_TASK_LABEL));
        assert!(screen.contains("Water plants"));

        press(&mut app, KeyCode::Esc);
        press(&mut app, KeyCode::Char('s'));
        let screen = render_to_string(&mut app, 80, 24);
        assert!(screen.contains(SETTINGS_BODY));
        assert!(screen.contains("Save"));
    }

    #[tokio::test]
    async fn click_on_row_toggles_task() {
        let mut app = test_app();
        add_via_dialog(&mut app, "Buy milk");
        add_via_dialog(&mut app, "Walk dog");
        render_to_string(&mut app, 80, 24);

        let area = app.list_area;
        app.handle_mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: area.x + 5,
            row: area.y + 2,
            modifiers: KeyModifiers::NONE,
        });
        assert!(app.store.tasks()[1].completed);
        assert!(!app.store.tasks()[0].completed);

        // Border and empty space below the rows are ignored.
        let revision = app.store.revision();
        for row in [area.y, area.y + 10] {
            app.handle_mouse(MouseEvent {
                kind: MouseEventKind::Down(MouseButton::Left),
                column: area.x + 5,
                row,
                modifiers: KeyModifiers::NONE,
            });
        }
        assert_eq!(app.store.revision(), revision);
    }
}
