use std::time::Duration;

use anyhow::Result;
use crossterm::{event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind}, execute, terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen}};
use ratatui::{backend::CrosstermBackend, Terminal, widgets::{Block, Borders, List, ListItem, Paragraph, ListState}, layout::{Layout, Constraint, Direction}, style::{Style, Modifier, Color}};

use taskboard::{
    application::{item_list::ItemListManager, shell::{ShellContext, Theme}, store_adapter::StoreAdapter},
    config::Config,
    domain::{item::ItemId, store::KeyValueStore},
    infrastructure::sqlite_store::SqliteStore,
};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;
    let store = SqliteStore::open(&config.database_url).await?;
    let manager = ItemListManager::initialize_with_key(StoreAdapter::new(store), config.storage_key.clone()).await;

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, manager, ShellContext::default(), &config.database_url).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    res
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mode { View, Create }

struct App<S: KeyValueStore> {
    manager: ItemListManager<S>,
    shell: ShellContext,
    selected: usize,
    mode: Mode,
    list_state: ListState,
}

impl<S: KeyValueStore> App<S> {
    fn visible_ids(&self) -> Vec<ItemId> { self.manager.visible_items().map(|i| i.id).collect() }

    fn selected_id(&self) -> Option<ItemId> { self.visible_ids().get(self.selected).copied() }

    // Keep selection within the filtered list after it shrinks.
    fn clamp_selection(&mut self) {
        let len = self.visible_ids().len();
        if len == 0 { self.selected = 0; self.list_state.select(None); }
        else { if self.selected >= len { self.selected = len - 1; } self.list_state.select(Some(self.selected)); }
    }
}

fn palette(theme: Theme) -> (Style, Color) {
    match theme {
        Theme::Light => (Style::default().fg(Color::Black).bg(Color::White), Color::Blue),
        Theme::Dark => (Style::default().fg(Color::Gray).bg(Color::Black), Color::Cyan),
    }
}

async fn run_app<S: KeyValueStore>(terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>, manager: ItemListManager<S>, shell: ShellContext, database_url: &str) -> Result<()> {
    let tick_rate = Duration::from_millis(200);
    let mut app = App { manager, shell, selected: 0, mode: Mode::View, list_state: ListState::default() };
    app.clamp_selection();

    loop {
        terminal.draw(|f| {
            let (base, accent) = palette(app.shell.theme());
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(3), Constraint::Min(1), Constraint::Length(3)])
                .split(f.size());

            let header = Paragraph::new("Enter/space: toggle  n: new  d: delete  c: clear completed  f: filter  t: theme  q: quit")
                .style(base)
                .block(Block::default().borders(Borders::ALL).title("taskboard"));
            f.render_widget(header, chunks[0]);

            let filter = app.manager.filter();
            let list_items: Vec<ListItem> = app.manager.visible_items().map(|item| {
                let mark = if item.completed { "[x]" } else { "[ ]" };
                ListItem::new(format!("{} {}  ({})", mark, item.text, item.created_at.format("%Y-%m-%d %H:%M")))
            }).collect();
            let title = if list_items.is_empty() { format!("tasks [{}] {}", filter.as_str(), filter.empty_message()) } else { format!("tasks [{}]", filter.as_str()) };
            let list = List::new(list_items)
                .style(base)
                .block(Block::default().borders(Borders::ALL).title(title))
                .highlight_style(Style::default().fg(accent).add_modifier(Modifier::BOLD | Modifier::REVERSED))
                .highlight_symbol(">> ");
            f.render_stateful_widget(list, chunks[1], &mut app.list_state);

            let stats = app.manager.stats();
            let footer_text = match app.mode {
                Mode::View => format!("All ({})  Active ({})  Completed ({})  |  {}", stats.total, stats.active, stats.completed, database_url),
                Mode::Create => format!("What needs to be done? {}_  |  Enter to add, Esc to cancel", app.manager.draft()),
            };
            let footer = Paragraph::new(footer_text)
                .style(base)
                .block(Block::default().borders(Borders::ALL).title(match app.mode { Mode::View => "stats", Mode::Create => "new task" }));
            f.render_widget(footer, chunks[2]);
        })?;

        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                // Only act on key presses; ignore repeats and releases to prevent duplicate input
                if key.kind != KeyEventKind::Press { continue; }
                match app.mode {
                    Mode::View => match key.code {
                        KeyCode::Char('q') => break,
                        KeyCode::Up => { if app.selected > 0 { app.selected -= 1; } }
                        KeyCode::Down => { if app.selected + 1 < app.visible_ids().len() { app.selected += 1; } }
                        KeyCode::Enter | KeyCode::Char(' ') => {
                            if let Some(id) = app.selected_id() { app.manager.toggle_item(id).await; }
                        }
                        KeyCode::Char('n') => { app.mode = Mode::Create; app.manager.set_draft(""); }
                        KeyCode::Char('d') => {
                            if let Some(id) = app.selected_id() { app.manager.delete_item(id).await; }
                        }
                        KeyCode::Char('c') => {
                            if app.manager.can_clear_completed() { app.manager.clear_completed().await; }
                        }
                        KeyCode::Char('f') => { let next = app.manager.filter().cycle(); app.manager.set_filter(next); }
                        KeyCode::Char('t') => { app.shell.toggle_theme(); }
                        _ => {}
                    },
                    Mode::Create => match key.code {
                        KeyCode::Esc => { app.mode = Mode::View; app.manager.set_draft(""); }
                        KeyCode::Enter => {
                            if app.manager.submit_draft().await.is_some() { app.mode = Mode::View; }
                        }
                        KeyCode::Backspace => { let mut draft = app.manager.draft().to_string(); draft.pop(); app.manager.set_draft(draft); }
                        KeyCode::Char(c) => { let mut draft = app.manager.draft().to_string(); draft.push(c); app.manager.set_draft(draft); }
                        _ => {}
                    },
                }
                app.clamp_selection();
            }
        }
    }
    Ok(())
}
