use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Points},
        Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap,
    },
    Frame, Terminal,
};
use std::io;
use umkm_map::{
    Dashboard, FilterCriteria, MapProjection, MapView, Record, RenderModel, APP_TITLE,
    EMPTY_MAP_NOTICE,
};

const MARKER_COLOR: Color = Color::Rgb(0, 100, 255);
const PAGE_STEP: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Map,
    Table,
}

impl Page {
    pub fn next(&self) -> Self {
        match self {
            Page::Map => Page::Table,
            Page::Table => Page::Map,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Page::Map => "Peta Lokasi UMKM",
            Page::Table => "Data UMKM",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    EditingKeyword,
}

pub struct App {
    dashboard: Dashboard,
    regency_options: Vec<String>,
    category_options: Vec<String>,
    regency_idx: usize,
    category_idx: usize,
    keyword: String,
    pub model: RenderModel,
    pub state: TableState,
    pub current_page: Page,
    pub show_detail: bool,
    pub input_mode: InputMode,
}

impl App {
    pub fn new(dashboard: Dashboard) -> Self {
        let regency_options = dashboard.regency_options();
        let category_options = dashboard.category_options();
        let model = dashboard.on_filter_changed(&FilterCriteria::new());

        let mut app = Self {
            dashboard,
            regency_options,
            category_options,
            regency_idx: 0,
            category_idx: 0,
            keyword: String::new(),
            model,
            state: TableState::default(),
            current_page: Page::Map,
            show_detail: false,
            input_mode: InputMode::Normal,
        };
        app.reset_selection();
        app
    }

    pub fn selected_regency(&self) -> &str {
        &self.regency_options[self.regency_idx]
    }

    pub fn selected_category(&self) -> &str {
        &self.category_options[self.category_idx]
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria::from_selection(
            Some(self.selected_regency()),
            Some(self.selected_category()),
            Some(&self.keyword),
        )
    }

    /// Re-run the pipeline for the current selection.
    fn refresh(&mut self) {
        self.model = self.dashboard.on_filter_changed(&self.criteria());
        self.reset_selection();
    }

    fn reset_selection(&mut self) {
        if self.model.table_rows.is_empty() {
            self.state.select(None);
        } else {
            self.state.select(Some(0));
        }
    }

    pub fn next_regency(&mut self) {
        self.regency_idx = cycle_forward(self.regency_idx, self.regency_options.len());
        self.refresh();
    }

    pub fn previous_regency(&mut self) {
        self.regency_idx = cycle_back(self.regency_idx, self.regency_options.len());
        self.refresh();
    }

    pub fn next_category(&mut self) {
        self.category_idx = cycle_forward(self.category_idx, self.category_options.len());
        self.refresh();
    }

    pub fn previous_category(&mut self) {
        self.category_idx = cycle_back(self.category_idx, self.category_options.len());
        self.refresh();
    }

    pub fn push_keyword(&mut self, c: char) {
        self.keyword.push(c);
        self.refresh();
    }

    pub fn pop_keyword(&mut self) {
        if self.keyword.pop().is_some() {
            self.refresh();
        }
    }

    pub fn clear_filters(&mut self) {
        self.regency_idx = 0;
        self.category_idx = 0;
        self.keyword.clear();
        self.refresh();
    }

    pub fn toggle_detail(&mut self) {
        self.show_detail = !self.show_detail;
    }

    pub fn next_page(&mut self) {
        self.current_page = self.current_page.next();
    }

    pub fn selected_record(&self) -> Option<&Record> {
        self.state.selected().and_then(|i| self.model.table_rows.get(i))
    }

    pub fn next(&mut self) {
        let len = self.model.table_rows.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) if i >= len - 1 => 0,
            Some(i) => i + 1,
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.model.table_rows.len();
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
        let len = self.model.table_rows.len();
        if len == 0 {
            return;
        }
        let i = self.state.selected().map_or(0, |i| (i + PAGE_STEP).min(len - 1));
        self.state.select(Some(i));
    }

    pub fn page_up(&mut self) {
        if self.model.table_rows.is_empty() {
            return;
        }
        let i = self.state.selected().map_or(0, |i| i.saturating_sub(PAGE_STEP));
        self.state.select(Some(i));
    }

    pub fn first(&mut self) {
        if !self.model.table_rows.is_empty() {
            self.state.select(Some(0));
        }
    }

    pub fn last(&mut self) {
        if !self.model.table_rows.is_empty() {
            self.state.select(Some(self.model.table_rows.len() - 1));
        }
    }
}

fn cycle_forward(i: usize, len: usize) -> usize {
    if len == 0 {
        0
    } else {
        (i + 1) % len
    }
}

fn cycle_back(i: usize, len: usize) -> usize {
    if len == 0 {
        0
    } else if i == 0 {
        len - 1
    } else {
        i - 1
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = %err, "terminal UI stopped with an error");
        println!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        let key = match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => key,
            _ => continue,
        };

        if app.input_mode == InputMode::EditingKeyword {
            match key.code {
                KeyCode::Enter | KeyCode::Esc => app.input_mode = InputMode::Normal,
                KeyCode::Backspace => app.pop_keyword(),
                KeyCode::Char(c) => app.push_keyword(c),
                _ => {}
            }
            continue;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
            KeyCode::Enter => app.toggle_detail(),
            KeyCode::Tab | KeyCode::BackTab => app.next_page(),
            KeyCode::Char('/') => app.input_mode = InputMode::EditingKeyword,
            KeyCode::Char('r') => app.next_regency(),
            KeyCode::Char('R') => app.previous_regency(),
            KeyCode::Char('c') => app.next_category(),
            KeyCode::Char('C') => app.previous_category(),
            KeyCode::Char('x') => app.clear_filters(),
            KeyCode::Down | KeyCode::Char('j') => app.next(),
            KeyCode::Up | KeyCode::Char('k') => app.previous(),
            KeyCode::PageDown => app.page_down(),
            KeyCode::PageUp => app.page_up(),
            KeyCode::Home => app.first(),
            KeyCode::End => app.last(),
            _ => {}
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with metrics
            Constraint::Min(0),    // Sidebar + content
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(32), Constraint::Min(0)])
        .split(chunks[1]);

    render_sidebar(f, body[0], app);

    if app.show_detail {
        let content_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(body[1]);

        render_page(f, content_chunks[0], app);
        render_detail_panel(f, content_chunks[1], app);
    } else {
        render_page(f, body[1], app);
    }

    render_status_bar(f, chunks[2], app);
}

fn render_page(f: &mut Frame, area: Rect, app: &mut App) {
    match app.current_page {
        Page::Map => render_map(f, area, app),
        Page::Table => render_table(f, area, app),
    }
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![Span::styled(
        format!("🗺️  {}", APP_TITLE),
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    )];

    for page in [Page::Map, Page::Table] {
        spans.push(Span::raw(" │ "));
        let style = if page == app.current_page {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(page.title().to_string(), style));
    }

    for (label, value) in app.model.metrics.labelled() {
        spans.push(Span::raw("  |  "));
        spans.push(Span::styled(format!("{}: ", label), Style::default().fg(Color::DarkGray)));
        spans.push(Span::styled(
            value.to_string(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ));
    }

    let header = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    f.render_widget(header, area);
}

fn render_sidebar(f: &mut Frame, area: Rect, app: &App) {
    let label = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let key = Style::default().fg(Color::Yellow);

    let keyword_style = if app.input_mode == InputMode::EditingKeyword {
        Style::default().fg(Color::Black).bg(Color::Yellow)
    } else {
        Style::default().fg(Color::White)
    };
    let keyword_text = if app.keyword().is_empty() && app.input_mode == InputMode::Normal {
        "-".to_string()
    } else {
        format!("{}_", app.keyword())
    };

    let content = vec![
        Line::from(""),
        Line::from(vec![Span::styled(" Pilih Kabupaten ", label), Span::styled("(r/R)", key)]),
        Line::from(format!("   {}", app.selected_regency())),
        Line::from(""),
        Line::from(vec![Span::styled(" Pilih Kategori ", label), Span::styled("(c/C)", key)]),
        Line::from(format!("   {}", app.selected_category())),
        Line::from(""),
        Line::from(vec![Span::styled(" Cari Nama UMKM ", label), Span::styled("(/)", key)]),
        Line::from(vec![Span::raw("   "), Span::styled(keyword_text, keyword_style)]),
        Line::from(""),
        Line::from(vec![
            Span::styled(" x", key),
            Span::styled(" reset filter", Style::default().fg(Color::DarkGray)),
        ]),
    ];

    let sidebar = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" 🔍 Filter UMKM "),
    );

    f.render_widget(sidebar, area);
}

fn render_map(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White))
        .title(format!(" 📍 {} ", Page::Map.title()));

    let view = match &app.model.map {
        MapProjection::Ready(view) => view,
        MapProjection::Empty => {
            let notice = Paragraph::new(Line::from(Span::styled(
                format!("⚠️  {}", EMPTY_MAP_NOTICE),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )))
            .block(block);
            f.render_widget(notice, area);
            return;
        }
    };

    let (x_bounds, y_bounds) = canvas_bounds(view);
    let selected = app.state.selected();
    let coords: Vec<(f64, f64)> = view
        .markers
        .iter()
        .enumerate()
        .filter(|(i, _)| Some(*i) != selected)
        .map(|(_, m)| (m.position[0], m.position[1]))
        .collect();
    let highlighted: Vec<(f64, f64)> = selected
        .and_then(|i| view.markers.get(i))
        .map(|m| vec![(m.position[0], m.position[1])])
        .unwrap_or_default();

    let canvas = Canvas::default()
        .block(block)
        .marker(Marker::Braille)
        .x_bounds(x_bounds)
        .y_bounds(y_bounds)
        .paint(|ctx| {
            ctx.draw(&Points {
                coords: &coords,
                color: MARKER_COLOR,
            });
            ctx.draw(&Points {
                coords: &highlighted,
                color: Color::Yellow,
            });
            ctx.layer();
            for marker in &view.markers {
                ctx.print(
                    marker.position[0],
                    marker.position[1],
                    Span::styled(format!("● {}", marker.label), Style::default().fg(Color::White)),
                );
            }
        });

    f.render_widget(canvas, area);
}

/// Visible (longitude, latitude) window around the view centre.
///
/// One 256px web-mercator tile spans `360 / 2^zoom` degrees; the window
/// shows one tile either side of the centre, widened when a marker would
/// otherwise fall outside it.
fn canvas_bounds(view: &MapView) -> ([f64; 2], [f64; 2]) {
    let center = &view.view_state;
    let tile_span = 360.0 / 2f64.powi(center.zoom as i32);

    let (lon_span, lat_span) = view.markers.iter().fold((tile_span, tile_span), |(lon, lat), m| {
        (
            lon.max((m.position[0] - center.longitude).abs() * 1.1),
            lat.max((m.position[1] - center.latitude).abs() * 1.1),
        )
    });

    (
        [center.longitude - lon_span, center.longitude + lon_span],
        [center.latitude - lat_span, center.latitude + lat_span],
    )
}

fn render_table(f: &mut Frame, area: Rect, app: &mut App) {
    let header_cells = ["#", "Nama", "Kategori", "Kabupaten", "Alamat", "Lat", "Lon"]
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

    let rows = app.model.table_rows.iter().enumerate().map(|(i, record)| {
        let cells = vec![
            Cell::from(i.to_string()),
            Cell::from(truncate(&record.name, 30)),
            Cell::from(truncate(&record.category, 22)),
            Cell::from(record.regency.clone()),
            Cell::from(truncate(&record.address, 20)),
            Cell::from(format!("{:.4}", record.latitude)),
            Cell::from(format!("{:.4}", record.longitude)),
        ];

        Row::new(cells).height(1)
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(3),
            Constraint::Length(31),
            Constraint::Length(23),
            Constraint::Length(16),
            Constraint::Length(21),
            Constraint::Length(9),
            Constraint::Length(9),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(format!(" 📄 {} ", Page::Table.title())),
    )
    .highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let selected = app.state.selected().map(|i| i + 1).unwrap_or(0);
    let total = app.model.table_rows.len();

    let mut status_spans = vec![Span::styled(
        format!(" Row: {}/{} ", selected, total),
        Style::default().fg(Color::Cyan),
    )];

    if !app.criteria().is_unfiltered() {
        status_spans.push(Span::raw(" | "));
        status_spans.push(Span::styled("Filter aktif", Style::default().fg(Color::Green)));
    }

    let keys: &[(&str, &str)] = if app.input_mode == InputMode::EditingKeyword {
        &[("Enter/Esc", " Done"), ("Backspace", " Delete")]
    } else {
        &[
            ("Enter", " Details"),
            ("Tab", " Page"),
            ("↑/↓", " Nav"),
            ("/", " Search"),
            ("q", " Quit"),
        ]
    };

    for (key, action) in keys {
        status_spans.push(Span::raw(" | "));
        let color = if *key == "q" { Color::Red } else { Color::Yellow };
        status_spans.push(Span::styled(*key, Style::default().fg(color)));
        status_spans.push(Span::raw(*action));
    }

    let status_bar = Paragraph::new(Line::from(status_spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

fn render_detail_panel(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" Detail UMKM ");

    let record = match app.selected_record() {
        Some(r) => r,
        None => {
            f.render_widget(Paragraph::new("Tidak ada UMKM dipilih").block(block), area);
            return;
        }
    };

    let label = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let field = |name: &'static str, value: String| {
        Line::from(vec![Span::styled(format!("  {}: ", name), label), Span::raw(value)])
    };

    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("  {}", record.name),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        field("Kategori", record.category.clone()),
        field("Kabupaten", record.regency.clone()),
        field("Alamat", record.address.clone()),
        Line::from(""),
        field("Latitude", format!("{:.4}", record.latitude)),
        field("Longitude", format!("{:.4}", record.longitude)),
        Line::from(""),
        Line::from(Span::styled(
            "  Press Enter to close",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )),
    ];

    let panel = Paragraph::new(content).block(block).wrap(Wrap { trim: false });

    f.render_widget(panel, area);
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use umkm_map::ALL_OPTION;

    fn app() -> App {
        App::new(Dashboard::default())
    }

    #[test]
    fn test_starts_unfiltered() {
        let app = app();

        assert_eq!(app.selected_regency(), ALL_OPTION);
        assert_eq!(app.selected_category(), ALL_OPTION);
        assert_eq!(app.model.table_rows.len(), 10);
        assert_eq!(app.state.selected(), Some(0));
        assert!(app.criteria().is_unfiltered());
    }

    #[test]
    fn test_cycle_regency() {
        let mut app = app();

        app.next_regency();
        assert_eq!(app.selected_regency(), "Majene");
        assert_eq!(app.model.metrics.filtered_count, 2);

        app.previous_regency();
        app.previous_regency();
        assert_eq!(app.selected_regency(), "Polewali Mandar");
        assert_eq!(app.model.metrics.filtered_count, 2);
    }

    #[test]
    fn test_category_and_keyword() {
        let mut app = app();

        app.next_category();
        assert_eq!(app.selected_category(), "Kerajinan");
        assert_eq!(app.model.table_rows.len(), 2);

        for c in "TENUN".chars() {
            app.push_keyword(c);
        }
        assert_eq!(app.model.table_rows.len(), 1);
        assert_eq!(app.selected_record().unwrap().name, "UMKM Tenun Tradisional");
    }

    #[test]
    fn test_empty_result_clears_selection() {
        let mut app = app();

        for c in "zzz".chars() {
            app.push_keyword(c);
        }
        assert!(app.model.map.is_empty());
        assert_eq!(app.state.selected(), None);

        app.next();
        assert_eq!(app.state.selected(), None);

        app.pop_keyword();
        app.pop_keyword();
        app.pop_keyword();
        assert_eq!(app.model.table_rows.len(), 10);
    }

    #[test]
    fn test_clear_filters() {
        let mut app = app();
        app.next_regency();
        app.next_category();
        app.push_keyword('k');

        app.clear_filters();

        assert!(app.criteria().is_unfiltered());
        assert_eq!(app.keyword(), "");
        assert_eq!(app.model.metrics.filtered_count, 10);
    }

    #[test]
    fn test_navigation_wraps() {
        let mut app = app();

        app.previous();
        assert_eq!(app.state.selected(), Some(9));
        app.next();
        assert_eq!(app.state.selected(), Some(0));
        app.page_down();
        assert_eq!(app.state.selected(), Some(PAGE_STEP));
        app.last();
        app.page_down();
        assert_eq!(app.state.selected(), Some(9));
        app.first();
        app.page_up();
        assert_eq!(app.state.selected(), Some(0));
    }

    #[test]
    fn test_canvas_bounds_centered() {
        let model = Dashboard::default().on_filter_changed(&FilterCriteria::new());
        let view = model.map.view().unwrap();
        let (x, y) = canvas_bounds(view);

        assert!(((x[0] + x[1]) / 2.0 - view.view_state.longitude).abs() < 1e-9);
        assert!(((y[0] + y[1]) / 2.0 - view.view_state.latitude).abs() < 1e-9);
        for marker in &view.markers {
            assert!(marker.position[0] >= x[0] && marker.position[0] <= x[1]);
            assert!(marker.position[1] >= y[0] && marker.position[1] <= y[1]);
        }
    }

    #[test]
    fn test_truncate_multibyte() {
        assert_eq!(truncate("Oleh-oleh", 20), "Oleh-oleh");
        assert_eq!(truncate("Pertanian & Perikanan", 10), "Pertani...");
        assert_eq!(truncate("ééééé", 4), "é...");
    }
}
