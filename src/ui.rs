use crate::report::{Report, ReportEntry};
use crate::scoring::Tier;
use crate::weekday::Weekday;
use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use std::io;

const PAGE_STEP: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Standings,
    Removal,
}

impl Page {
    pub fn next(&self) -> Self {
        match self {
            Page::Standings => Page::Removal,
            Page::Removal => Page::Standings,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Page::Standings => "Standings",
            Page::Removal => "Removal Candidates",
        }
    }
}

pub struct App {
    pub report: Report,
    /// Rows shown on the current page
    pub visible: Vec<ReportEntry>,
    pub state: TableState,
    pub current_page: Page,
    pub show_detail: bool,
}

impl App {
    pub fn new(report: Report) -> Self {
        let mut app = Self {
            visible: Vec::new(),
            report,
            state: TableState::default(),
            current_page: Page::Standings,
            show_detail: false,
        };
        app.refresh_rows();
        app
    }

    fn refresh_rows(&mut self) {
        self.visible = match self.current_page {
            Page::Standings => self.report.people.clone(),
            Page::Removal => self.report.removed().cloned().collect(),
        };

        if self.visible.is_empty() {
            self.state.select(None);
        } else {
            self.state.select(Some(0));
        }
    }

    pub fn switch_page(&mut self) {
        self.current_page = self.current_page.next();
        self.refresh_rows();
    }

    pub fn toggle_detail(&mut self) {
        self.show_detail = !self.show_detail;
    }

    pub fn selected_entry(&self) -> Option<&ReportEntry> {
        self.state.selected().and_then(|i| self.visible.get(i))
    }

    pub fn next(&mut self) {
        let len = self.visible.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.visible.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }

    pub fn page_down(&mut self) {
        let len = self.visible.len();
        if len == 0 {
            return;
        }
        let i = self
            .state
            .selected()
            .map_or(0, |i| (i + PAGE_STEP).min(len - 1));
        self.state.select(Some(i));
    }

    pub fn page_up(&mut self) {
        if self.visible.is_empty() {
            return;
        }
        let i = self
            .state
            .selected()
            .map_or(0, |i| i.saturating_sub(PAGE_STEP));
        self.state.select(Some(i));
    }

    pub fn last(&mut self) {
        if !self.visible.is_empty() {
            self.state.select(Some(self.visible.len() - 1));
        }
    }

    pub fn stats(&self) -> TierStats {
        let mut stats = TierStats::default();
        for entry in &self.report.people {
            match entry.grade {
                Tier::Gold => stats.gold += 1,
                Tier::Silver => stats.silver += 1,
                Tier::Normal => stats.normal += 1,
            }
            if entry.removal_eligible {
                stats.removable += 1;
            }
        }
        stats
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct TierStats {
    pub gold: usize,
    pub silver: usize,
    pub normal: usize,
    pub removable: usize,
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!("viewer error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    return Ok(())
                }
                KeyCode::Enter => app.toggle_detail(),
                KeyCode::Tab | KeyCode::BackTab => app.switch_page(),
                KeyCode::Down | KeyCode::Char('j') => app.next(),
                KeyCode::Up | KeyCode::Char('k') => app.previous(),
                KeyCode::PageDown => app.page_down(),
                KeyCode::PageUp => app.page_up(),
                KeyCode::Home => app.state.select(Some(0)),
                KeyCode::End => app.last(),
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with navigation
            Constraint::Min(0),    // Content area
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    if app.show_detail {
        let content_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(chunks[1]);

        render_table(f, content_chunks[0], app);
        render_detail_panel(f, content_chunks[1], app);
    } else {
        render_table(f, chunks[1], app);
    }

    render_status_bar(f, chunks[2], app);
}

fn tier_color(tier: Tier) -> Color {
    match tier {
        Tier::Gold => Color::Yellow,
        Tier::Silver => Color::Gray,
        Tier::Normal => Color::White,
    }
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let stats = app.stats();

    let mut spans = vec![];
    for (i, page) in [Page::Standings, Page::Removal].iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" │ "));
        }
        let style = if *page == app.current_page {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(page.title().to_string(), style));
    }

    spans.push(Span::raw("   "));
    spans.push(Span::styled(
        format!("GOLD {}", stats.gold),
        Style::default().fg(tier_color(Tier::Gold)),
    ));
    spans.push(Span::raw("  "));
    spans.push(Span::styled(
        format!("SILVER {}", stats.silver),
        Style::default().fg(tier_color(Tier::Silver)),
    ));
    spans.push(Span::raw("  "));
    spans.push(Span::raw(format!("NORMAL {}", stats.normal)));
    spans.push(Span::raw("  "));
    spans.push(Span::styled(
        format!("Removable {}", stats.removable),
        Style::default().fg(Color::Red),
    ));

    let header = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Attendance Tiers "),
    );
    f.render_widget(header, area);
}

fn render_table(f: &mut Frame, area: Rect, app: &mut App) {
    let header_cells = ["#", "Name", "Points", "Grade", "Wed", "Weekend"]
        .iter()
        .map(|h| {
            Cell::from(*h).style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
        });

    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let rows = app.visible.iter().enumerate().map(|(i, entry)| {
        let color = tier_color(entry.grade);
        let cells = vec![
            Cell::from(format!("{}", i + 1)),
            Cell::from(truncate(&entry.name, 28)),
            Cell::from(format!("{}", entry.points)),
            Cell::from(entry.grade.label()).style(Style::default().fg(color)),
            Cell::from(format!("{}", entry.wednesday)),
            Cell::from(format!("{}", entry.weekend)),
        ];
        Row::new(cells).height(1)
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(6),
            Constraint::Length(30),
            Constraint::Length(8),
            Constraint::Length(8),
            Constraint::Length(6),
            Constraint::Length(8),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(format!(" {} ", app.current_page.title())),
    )
    .highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn render_detail_panel(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Detail ");

    let Some(entry) = app.selected_entry() else {
        f.render_widget(Paragraph::new("No person selected").block(block), area);
        return;
    };

    let label = Style::default().fg(Color::Yellow);
    let mut lines = vec![
        Line::from(vec![Span::styled("Name:   ", label), Span::raw(entry.name.clone())]),
        Line::from(vec![
            Span::styled("Grade:  ", label),
            Span::styled(entry.grade.label(), Style::default().fg(tier_color(entry.grade))),
        ]),
        Line::from(vec![
            Span::styled("Points: ", label),
            Span::raw(format!(
                "{} ({} base + {} bonus)",
                entry.points, entry.base_points, entry.bonus_points
            )),
        ]),
        Line::from(""),
        Line::from(Span::styled("Visits by day", label)),
    ];

    for day in Weekday::ALL {
        lines.push(Line::from(format!(
            "  {:<10} {:>4}  (x{})",
            day.label(),
            entry.daily_counts[day.slot()],
            day.weight()
        )));
    }

    lines.push(Line::from(""));
    let bonuses = if entry.bonuses.is_empty() {
        "none".to_string()
    } else {
        entry.bonuses.join(", ")
    };
    lines.push(Line::from(vec![Span::styled("Bonuses: ", label), Span::raw(bonuses)]));
    if entry.removal_eligible {
        lines.push(Line::from(Span::styled(
            "Eligible for removal",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )));
    }

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let selected = app.state.selected().map(|i| i + 1).unwrap_or(0);
    let total = app.visible.len();

    let mut status_spans = vec![Span::styled(
        format!(" Row: {}/{} ", selected, total),
        Style::default().fg(Color::Cyan),
    )];

    if app.report.stats.unrecognized_day > 0 || app.report.stats.malformed > 0 {
        status_spans.push(Span::raw(" | "));
        status_spans.push(Span::styled(
            format!(
                "Skipped: {} malformed, {} unknown day",
                app.report.stats.malformed, app.report.stats.unrecognized_day
            ),
            Style::default().fg(Color::Red),
        ));
    }

    status_spans.push(Span::raw(" | "));
    status_spans.push(Span::styled("Enter", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Details | "));
    status_spans.push(Span::styled("Tab", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Page | "));
    status_spans.push(Span::styled("↑/↓", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Nav | "));
    status_spans.push(Span::styled("q", Style::default().fg(Color::Red)));
    status_spans.push(Span::raw(" Quit"));

    let status_bar = Paragraph::new(Line::from(status_spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len - 3).collect();
        format!("{}...", kept)
    }
}
