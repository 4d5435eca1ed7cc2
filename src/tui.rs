use std::io::{self, stdout};
use std::time::{Duration, Instant};

use chrono::Utc;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Gauge, Paragraph},
};

use crate::cart::money;
use crate::catalog::Product;
use crate::config::Settings;
use crate::embed;
use crate::output::OutputMode;
use crate::preview::{PreviewConfig, PreviewSession, Role};
use crate::template::Template;
use crate::wizard::{FormData, FormField, Step, WizardState};

const IDLE_POLL: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, Copy, PartialEq)]
enum Mode {
    Normal,
    Input,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Row {
    Field(FormField),
    Template(Template),
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Action {
    Continue,
    Quit,
    Deploy(OutputMode),
}

/// What the user chose to do with the finished chatbot.
#[derive(Debug, Clone)]
pub struct Deployment {
    pub snippet: String,
    pub mode: OutputMode,
    pub form: FormData,
}

pub struct App {
    settings: Settings,
    wizard: WizardState,
    form: FormData,
    mode: Mode,
    input_buffer: String,
    row_index: usize,
    preview: Option<PreviewSession>,
    cart_index: usize,
    issued_at_ms: i64,
    status: Option<String>,
}

impl App {
    pub fn new(settings: Settings) -> Self {
        let form = FormData::from_defaults(&settings.defaults);
        Self {
            settings,
            wizard: WizardState::new(),
            form,
            mode: Mode::Normal,
            input_buffer: String::new(),
            row_index: 0,
            preview: None,
            cart_index: 0,
            issued_at_ms: Utc::now().timestamp_millis(),
            status: None,
        }
    }

    fn rows(&self) -> Vec<Row> {
        let step = self.wizard.current();
        let mut rows: Vec<Row> = FormField::for_step(step)
            .iter()
            .copied()
            .map(Row::Field)
            .collect();
        if step == Step::Basic {
            rows.extend(Template::ALL.into_iter().map(Row::Template));
        }
        rows
    }

    fn selected_row(&self) -> Option<Row> {
        self.rows().get(self.row_index).copied()
    }

    fn move_up(&mut self) {
        self.row_index = self.row_index.saturating_sub(1);
    }

    fn move_down(&mut self) {
        if self.row_index + 1 < self.rows().len() {
            self.row_index += 1;
        }
    }

    fn activate_row(&mut self) {
        match self.selected_row() {
            Some(Row::Field(field)) if field.is_toggle() => self.form.toggle(field),
            Some(Row::Field(field)) => {
                self.mode = Mode::Input;
                self.input_buffer = self.form.text(field);
            }
            Some(Row::Template(template)) => self.form.templates.toggle(template),
            None => {}
        }
    }

    fn handle_input_key(&mut self, key: KeyCode) {
        let field = match self.selected_row() {
            Some(Row::Field(field)) => field,
            _ => {
                self.mode = Mode::Normal;
                return;
            }
        };
        match key {
            KeyCode::Enter | KeyCode::Esc => {
                let value = std::mem::take(&mut self.input_buffer);
                self.form.set_text(field, value);
                self.mode = Mode::Normal;
            }
            KeyCode::Char(c) => {
                if field != FormField::DelayTime || c.is_ascii_digit() {
                    self.input_buffer.push(c);
                }
            }
            KeyCode::Backspace => {
                self.input_buffer.pop();
            }
            _ => {}
        }
    }

    fn try_advance(&mut self) {
        let from = self.wizard.current();
        if !self.form.can_continue(from) {
            self.status = Some("Enter a chatbot name and choose at least one capability".into());
            return;
        }
        self.wizard.advance();
        self.on_step_changed(from);
    }

    fn retreat(&mut self) {
        let from = self.wizard.current();
        self.wizard.retreat();
        self.on_step_changed(from);
    }

    fn go_to(&mut self, step: Step) {
        let from = self.wizard.current();
        self.wizard.go_to(step);
        self.on_step_changed(from);
    }

    fn on_step_changed(&mut self, from: Step) {
        let to = self.wizard.current();
        if from == to {
            return;
        }
        self.row_index = 0;
        if to == Step::Preview {
            self.open_preview();
        } else if let Some(mut preview) = self.preview.take() {
            preview.shutdown();
        }
    }

    fn open_preview(&mut self) {
        let config = PreviewConfig::from_form(&self.form);
        self.preview = Some(PreviewSession::new(config, &self.settings));
        self.issued_at_ms = Utc::now().timestamp_millis();
        self.cart_index = 0;
    }

    fn snippet(&self) -> String {
        embed::snippet(&self.form.name, self.issued_at_ms)
    }

    fn deployment(&self, mode: OutputMode) -> Deployment {
        Deployment {
            snippet: self.snippet(),
            mode,
            form: self.form.clone(),
        }
    }

    fn overlay_open(&self) -> bool {
        self.preview
            .as_ref()
            .map(|p| p.is_cart_open() || p.details().is_some())
            .unwrap_or(false)
    }

    fn tick(&mut self, now: Instant) {
        if let Some(preview) = self.preview.as_mut() {
            if preview.tick(now) > 0 {
                let len = preview.cart().len();
                self.cart_index = self.cart_index.min(len.saturating_sub(1));
            }
        }
    }

    fn poll_timeout(&self, now: Instant) -> Duration {
        self.preview
            .as_ref()
            .and_then(PreviewSession::next_deadline)
            .map(|deadline| deadline.saturating_duration_since(now).min(IDLE_POLL))
            .unwrap_or(IDLE_POLL)
    }

    fn handle_key(&mut self, key: KeyEvent, now: Instant) -> Action {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        if ctrl && key.code == KeyCode::Char('q') {
            return Action::Quit;
        }
        if self.mode == Mode::Input {
            self.handle_input_key(key.code);
            return Action::Continue;
        }

        self.status = None;
        match key.code {
            KeyCode::Tab => {
                self.try_advance();
                return Action::Continue;
            }
            KeyCode::BackTab => {
                self.retreat();
                return Action::Continue;
            }
            KeyCode::F(n) if (1..=4).contains(&n) => {
                self.go_to(Step::ALL[usize::from(n - 1)]);
                return Action::Continue;
            }
            _ => {}
        }

        if self.wizard.current() == Step::Preview {
            self.handle_preview_key(key, now)
        } else {
            self.handle_form_key(key)
        }
    }

    fn handle_form_key(&mut self, key: KeyEvent) -> Action {
        let on_basic = self.wizard.current() == Step::Basic;
        match key.code {
            KeyCode::Char('q') => return Action::Quit,
            KeyCode::Esc if !self.wizard.is_first() => self.retreat(),
            KeyCode::Up | KeyCode::Char('k') => self.move_up(),
            KeyCode::Down | KeyCode::Char('j') => self.move_down(),
            KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('e') => self.activate_row(),
            KeyCode::Char('a') if on_basic => self.form.templates.select_all(),
            KeyCode::Char('c') if on_basic => self.form.templates.clear(),
            _ => {}
        }
        Action::Continue
    }

    fn handle_preview_key(&mut self, key: KeyEvent, now: Instant) -> Action {
        if key.code == KeyCode::Esc && !self.overlay_open() {
            self.retreat();
            return Action::Continue;
        }
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('y') if ctrl => return Action::Deploy(OutputMode::Clipboard),
            KeyCode::Char('p') if ctrl => return Action::Deploy(OutputMode::Print),
            _ => {}
        }

        let Some(preview) = self.preview.as_mut() else {
            return Action::Continue;
        };

        if let Some(id) = preview.details().map(|p| p.id) {
            match key.code {
                KeyCode::Esc => preview.close_details(),
                KeyCode::Char('a') => {
                    if !preview.add_to_cart(id, now) {
                        self.status = Some("This item is currently out of stock".into());
                    }
                }
                _ => {}
            }
            return Action::Continue;
        }

        if preview.is_cart_open() {
            let len = preview.cart().len();
            let selected = preview
                .cart()
                .items()
                .get(self.cart_index)
                .map(|item| (item.id, item.quantity));
            match (key.code, selected) {
                (KeyCode::Esc, _) => preview.close_cart(),
                (KeyCode::Up | KeyCode::Char('k'), _) => {
                    self.cart_index = self.cart_index.saturating_sub(1);
                }
                (KeyCode::Down | KeyCode::Char('j'), _) => {
                    if self.cart_index + 1 < len {
                        self.cart_index += 1;
                    }
                }
                (KeyCode::Char('+') | KeyCode::Char('='), Some((id, quantity))) => {
                    preview.update_quantity(id, quantity + 1);
                }
                (KeyCode::Char('-'), Some((id, quantity))) => {
                    preview.update_quantity(id, quantity.saturating_sub(1));
                }
                (KeyCode::Char('d') | KeyCode::Delete, Some((id, _))) => preview.remove_item(id),
                (KeyCode::Enter, _) => {
                    if !preview.checkout(now) && preview.cart().is_empty() {
                        self.status = Some("Your cart is empty".into());
                    }
                }
                _ => {}
            }
            self.cart_index = self.cart_index.min(preview.cart().len().saturating_sub(1));
            return Action::Continue;
        }

        match key.code {
            KeyCode::Char('a') if ctrl => match preview.last_offered().map(|p| (p.id, p.in_stock)) {
                Some((id, true)) => {
                    preview.add_to_cart(id, now);
                }
                Some((_, false)) => {
                    self.status = Some("This item is currently out of stock".into());
                }
                None => self.status = Some("No product has been offered yet".into()),
            },
            KeyCode::Char('d') if ctrl => match preview.last_offered().map(|p| p.id) {
                Some(id) => preview.show_details(id),
                None => self.status = Some("No product has been offered yet".into()),
            },
            KeyCode::Char('o') if ctrl => {
                if !preview.open_cart() {
                    self.status = Some("The cart is part of the Sales Assistant template".into());
                }
            }
            KeyCode::Char(c) if !ctrl => preview.input.push(c),
            KeyCode::Backspace => {
                preview.input.pop();
            }
            KeyCode::Enter => {
                preview.submit(now);
            }
            _ => {}
        }
        Action::Continue
    }
}

pub fn run(settings: Settings) -> io::Result<Option<Deployment>> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;

    let mut app = App::new(settings);
    let result = Terminal::new(CrosstermBackend::new(stdout()))
        .and_then(|mut terminal| event_loop(&mut terminal, &mut app));

    if let Some(mut preview) = app.preview.take() {
        preview.shutdown();
    }
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
}

fn event_loop<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<Option<Deployment>> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if event::poll(app.poll_timeout(Instant::now()))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match app.handle_key(key, Instant::now()) {
                        Action::Continue => {}
                        Action::Quit => return Ok(None),
                        Action::Deploy(mode) => return Ok(Some(app.deployment(mode))),
                    }
                }
            }
        }

        app.tick(Instant::now());
    }
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

fn parse_hex(value: &str) -> Option<Color> {
    let hex = value.trim().strip_prefix('#')?;
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let rgb = u32::from_str_radix(hex, 16).ok()?;
    Some(Color::Rgb((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8))
}

/// Greedy word wrap; words longer than `width` get a line of their own.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let len = current.chars().count();
        if len > 0 && len + 1 + word.chars().count() > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

fn dim() -> Style {
    Style::default().fg(Color::DarkGray)
}

fn ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Min(8),
            Constraint::Length(3),
        ])
        .split(f.area());

    render_header(f, chunks[0], app);
    match app.wizard.current() {
        Step::Preview => render_preview(f, chunks[1], app),
        _ => render_form(f, chunks[1], app),
    }
    render_help(f, chunks[2], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Create New Chatbot ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner);

    let current = app.wizard.current();
    let mut tabs: Vec<Span> = Vec::new();
    for (i, step) in Step::ALL.iter().enumerate() {
        if i > 0 {
            tabs.push(Span::styled("  ›  ", dim()));
        }
        let done = app.wizard.is_completed(*step);
        let style = if *step == current {
            Style::default().fg(Color::Cyan).bold()
        } else if done {
            Style::default().fg(Color::Green)
        } else {
            dim()
        };
        let check = if done { "✓ " } else { "" };
        tabs.push(Span::styled(
            format!("F{} {} {}{}", i + 1, step.icon(), check, step.title()),
            style,
        ));
    }
    f.render_widget(Paragraph::new(Line::from(tabs)), rows[0]);

    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::Cyan).bg(Color::Black))
        .ratio(app.wizard.progress())
        .label(format!(
            "Step {} of {} · {}% complete",
            app.wizard.index() + 1,
            Step::ALL.len(),
            app.wizard.progress_percent()
        ));
    f.render_widget(gauge, rows[1]);

    f.render_widget(
        Paragraph::new(Span::styled(current.description(), dim())),
        rows[2],
    );
}

fn step_heading(step: Step) -> &'static str {
    match step {
        Step::Basic => "Basic Information",
        Step::Appearance => "Appearance & Branding",
        Step::Behavior => "Behavior Settings",
        Step::Preview => "Preview & Deploy",
    }
}

fn render_form(f: &mut Frame, area: Rect, app: &App) {
    let step = app.wizard.current();
    let mut lines: Vec<Line> = Vec::new();
    let mut cursor_line = 0;

    for (i, row) in app.rows().iter().enumerate() {
        let is_cursor = i == app.row_index;
        let marker = if is_cursor { "▸ " } else { "  " };
        let label_style = if is_cursor {
            Style::default().fg(Color::Cyan).bold()
        } else {
            Style::default().bold()
        };

        match row {
            Row::Field(field) => {
                if is_cursor {
                    cursor_line = lines.len();
                }
                if field.is_toggle() {
                    let on = app.form.text(*field) == "Yes";
                    let (yes, no) = if on {
                        (Style::default().fg(Color::Green).bold(), dim())
                    } else {
                        (dim(), Style::default().fg(Color::Red).bold())
                    };
                    lines.push(Line::from(vec![
                        Span::styled(format!("{}{}", marker, field.label()), label_style),
                        Span::raw("   "),
                        Span::styled(if on { "● Yes" } else { "○ Yes" }, yes),
                        Span::raw("  "),
                        Span::styled(if on { "○ No" } else { "● No" }, no),
                    ]));
                } else {
                    lines.push(Line::from(Span::styled(
                        format!("{}{}", marker, field.label()),
                        label_style,
                    )));
                    let value = if is_cursor && app.mode == Mode::Input {
                        Span::raw(format!("{}█", app.input_buffer))
                    } else {
                        let text = app.form.text(*field);
                        if text.is_empty() {
                            Span::styled(field.placeholder(), dim())
                        } else {
                            Span::raw(text)
                        }
                    };
                    let mut value_line = vec![Span::raw("    "), value];
                    if matches!(field, FormField::PrimaryColor | FormField::SecondaryColor) {
                        if let Some(color) = parse_hex(&app.form.text(*field)) {
                            value_line.push(Span::raw("  "));
                            value_line.push(Span::styled("████", Style::default().fg(color)));
                        }
                    }
                    lines.push(Line::from(value_line));
                }
                if let Some(hint) = field.hint() {
                    lines.push(Line::from(Span::styled(format!("    {}", hint), dim())));
                }
                lines.push(Line::from(""));
            }
            Row::Template(template) => {
                if *template == Template::ALL[0] {
                    lines.push(Line::from(Span::styled(
                        "Choose Capabilities",
                        Style::default().bold(),
                    )));
                    lines.push(Line::from(Span::styled(
                        "Select multiple templates to create a versatile AI agent  (a: select all, c: clear all)",
                        dim(),
                    )));
                }
                if is_cursor {
                    cursor_line = lines.len();
                }
                let selected = app.form.templates.contains(*template);
                let checkbox = if selected { "[x]" } else { "[ ]" };
                let badge = app
                    .form
                    .templates
                    .position(*template)
                    .map(|n| format!(" #{}", n))
                    .unwrap_or_default();
                let style = if is_cursor {
                    Style::default().fg(Color::Cyan).bold()
                } else if selected {
                    Style::default().fg(Color::Green)
                } else {
                    Style::default()
                };
                lines.push(Line::from(vec![
                    Span::styled(
                        format!("{}{} {}{}", marker, checkbox, template.name(), badge),
                        style,
                    ),
                    Span::styled(format!("  {}", template.description()), dim()),
                ]));
                lines.push(Line::from(Span::styled(
                    format!("      {}", template.features().join(" · ")),
                    dim(),
                )));
                if selected || is_cursor {
                    for capability in template.capabilities() {
                        lines.push(Line::from(format!("      • {}", capability)));
                    }
                }
            }
        }
    }

    if step == Step::Basic {
        if let Some(summary) = app.form.templates.summary() {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                format!("Selected Capabilities ({}/{})", app.form.templates.len(), Template::ALL.len()),
                Style::default().fg(Color::Blue).bold(),
            )));
            lines.push(Line::from(summary));
        }
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} {} ", step.icon(), step_heading(step)));
    let visible = block.inner(area).height as usize;
    let scroll = cursor_line.saturating_sub(visible.saturating_sub(6));
    let paragraph = Paragraph::new(lines)
        .block(block)
        .scroll((scroll as u16, 0));
    f.render_widget(paragraph, area);
}

fn render_preview(f: &mut Frame, area: Rect, app: &App) {
    let Some(preview) = &app.preview else {
        return;
    };

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    render_chat(f, cols[0], preview);
    render_deploy(f, cols[1], app, preview);

    if preview.is_cart_open() {
        render_cart(f, area, preview, app.cart_index);
    }
    if let Some(product) = preview.details() {
        render_details(f, area, product);
    }
}

fn product_card(product: &Product) -> Vec<Line<'static>> {
    let mut price = vec![
        Span::raw("    ▸ "),
        Span::styled(product.name, Style::default().bold()),
        Span::raw(format!("  {}", money(product.price))),
    ];
    if let Some(original) = product.original_price {
        price.push(Span::styled(format!("  was {}", money(original)), dim()));
    }
    if let Some(pct) = product.discount_percent() {
        price.push(Span::styled(format!(" (-{}%)", pct), Style::default().fg(Color::Red)));
    }
    let stock = if product.in_stock {
        Span::styled("In Stock", Style::default().fg(Color::Green))
    } else {
        Span::styled("Out of Stock", Style::default().fg(Color::Red))
    };
    vec![
        Line::from(price),
        Line::from(vec![
            Span::raw(format!("      ★ {:.1}  ", product.rating)),
            stock,
            Span::styled("   ^A add to cart  ^D details", dim()),
        ]),
    ]
}

fn render_chat(f: &mut Frame, area: Rect, preview: &PreviewSession) {
    let config = preview.config();
    let accent = parse_hex(&config.primary_color).unwrap_or(Color::Blue);

    let mut title = vec![
        Span::styled(format!(" {} ", config.name), Style::default().fg(accent).bold()),
        Span::styled("● Online ", Style::default().fg(Color::Green)),
    ];
    if config.has_storefront() {
        let count = preview.cart().total_items();
        let badge = if count > 0 {
            format!("🛒 {} ", count)
        } else {
            "🛒 ".to_string()
        };
        title.push(Span::styled(badge, Style::default().fg(accent)));
    }
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(accent))
        .title(Line::from(title));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(3)])
        .split(inner);

    let width = parts[0].width.saturating_sub(4) as usize;
    let mut lines: Vec<Line> = Vec::new();
    for message in preview.messages() {
        let (who, style) = match message.role {
            Role::User => ("You", Style::default().fg(accent).bold()),
            Role::Bot => (config.name.as_str(), Style::default().fg(Color::Gray).bold()),
        };
        lines.push(Line::from(vec![
            Span::styled(who.to_string(), style),
            Span::styled(format!("  {}", message.timestamp.format("%H:%M")), dim()),
        ]));
        for text in wrap(&message.content, width) {
            lines.push(Line::from(format!("  {}", text)));
        }
        if let Some(product) = message.product.and_then(|id| preview.catalog().get(id)) {
            lines.extend(product_card(product));
        }
        lines.push(Line::from(""));
    }
    if preview.is_typing() {
        lines.push(Line::from(Span::styled(
            format!("  {} is typing…", config.name),
            dim().italic(),
        )));
    }
    if let Some(product) = preview.animating() {
        lines.push(Line::from(Span::styled(
            format!("  🛒 Adding {} to cart…", product.name),
            Style::default().fg(accent),
        )));
    }

    let scroll = lines.len().saturating_sub(parts[0].height as usize);
    f.render_widget(Paragraph::new(lines).scroll((scroll as u16, 0)), parts[0]);

    let input = if preview.input.is_empty() {
        Line::from(vec![
            Span::styled("Type your message...", dim()),
            Span::raw("█"),
        ])
    } else {
        Line::from(format!("{}█", preview.input))
    };
    let input_block = Block::default().borders(Borders::ALL).title(" Message ");
    f.render_widget(Paragraph::new(input).block(input_block), parts[1]);
}

fn render_deploy(f: &mut Frame, area: Rect, app: &App, preview: &PreviewSession) {
    let form = &app.form;
    let yes_no = |b: bool| if b { "Yes" } else { "No" };

    let mut lines: Vec<Line> = vec![
        Line::from(Span::styled("Ready to Deploy?", Style::default().bold())),
        Line::from(Span::styled(
            "Add this code snippet to your website to embed the chatbot:",
            dim(),
        )),
        Line::from(""),
    ];
    for line in app.snippet().lines() {
        lines.push(Line::from(Span::styled(
            line.to_string(),
            Style::default().fg(Color::Green),
        )));
    }
    lines.push(Line::from(""));

    let templates: Vec<&str> = preview.config().templates.iter().map(Template::name).collect();
    let auto_show = if form.auto_show {
        format!("Yes, after {}s", form.delay_time)
    } else {
        "No".to_string()
    };
    for (label, value) in [
        ("Capabilities", templates.join(", ")),
        ("Auto-show", auto_show),
        ("Collect email", yes_no(form.collect_email).to_string()),
        ("Contact fallback", yes_no(form.fallback_contact).to_string()),
    ] {
        lines.push(Line::from(vec![
            Span::styled(format!("{:<17}", label), dim()),
            Span::raw(value),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Try asking:", dim())));
    for template in preview.config().templates.iter() {
        let example = match template {
            Template::SalesAssistant => "\"show me headphones\", \"fitness watch\"",
            Template::CustomerSupport => "\"I need help\", \"where is my order\"",
            Template::LeadGeneration => "\"book a demo\", \"what does it cost\"",
            Template::GeneralAssistant => "\"hello\"",
        };
        lines.push(Line::from(format!("  {}", example)));
    }
    if preview.config().has_storefront() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("Sample catalog:", dim())));
        for product in preview.catalog().products() {
            lines.push(Line::from(format!("  {}  {}", product.name, money(product.price))));
        }
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} {} ", Step::Preview.icon(), step_heading(Step::Preview)));
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_cart(f: &mut Frame, area: Rect, preview: &PreviewSession, cart_index: usize) {
    let popup = centered_rect(66, 20, area);
    f.render_widget(Clear, popup);

    let cart = preview.cart();
    let mut lines: Vec<Line> = Vec::new();

    if cart.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("Your cart is empty", Style::default().bold())));
        lines.push(Line::from(Span::styled(
            "Ask the assistant about products to add them here.",
            dim(),
        )));
    } else {
        for (i, item) in cart.items().iter().enumerate() {
            let style = if i == cart_index {
                Style::default().fg(Color::Cyan).bold()
            } else {
                Style::default()
            };
            let marker = if i == cart_index { "▸ " } else { "  " };
            let stock = if item.in_stock { "In Stock" } else { "Out of Stock" };
            lines.push(Line::from(vec![
                Span::styled(format!("{}{:<32}", marker, item.name), style),
                Span::raw(format!("[- {} +]", item.quantity)),
                Span::raw(format!("  {:>10}", money(item.line_total()))),
            ]));
            lines.push(Line::from(Span::styled(
                format!("    {} each · {}", money(item.price), stock),
                dim(),
            )));
        }

        let totals = preview.totals();
        let pricing = preview.pricing();
        let shipping = if totals.shipping.is_zero() {
            "Free".to_string()
        } else {
            money(totals.shipping)
        };
        lines.push(Line::from(""));
        for (label, value) in [
            ("Subtotal", money(totals.subtotal)),
            ("Shipping", shipping),
            ("Tax", money(totals.tax)),
        ] {
            lines.push(Line::from(format!("  {:<12}{:>14}", label, value)));
        }
        lines.push(Line::from(Span::styled(
            format!("  {:<12}{:>14}", "Total", money(totals.total)),
            Style::default().bold(),
        )));
        if !totals.shipping.is_zero() {
            lines.push(Line::from(Span::styled(
                format!(
                    "  Free shipping on orders over {}",
                    money(pricing.free_shipping_threshold)
                ),
                dim(),
            )));
        }
        lines.push(Line::from(""));
        if preview.is_checking_out() {
            lines.push(Line::from(Span::styled(
                "  Processing checkout…",
                Style::default().fg(Color::Yellow),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "  Enter: Secure Checkout",
                Style::default().fg(Color::Green),
            )));
        }
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" 🛒 Shopping Cart ({} items) ", cart.len()));
    f.render_widget(Paragraph::new(lines).block(block), popup);
}

fn render_details(f: &mut Frame, area: Rect, product: &Product) {
    let popup = centered_rect(72, 24, area);
    f.render_widget(Clear, popup);

    let mut lines: Vec<Line> = product_card(product).into_iter().take(1).collect();
    lines.push(Line::from(format!("      ★ {:.1} · {} reviews", product.rating, product.reviews.len())));
    lines.push(Line::from(""));
    for text in wrap(product.description, popup.width.saturating_sub(6) as usize) {
        lines.push(Line::from(format!("  {}", text)));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("  Features", Style::default().bold())));
    lines.push(Line::from(format!("    {}", product.features.join(" · "))));

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("  Specifications", Style::default().bold())));
    for (key, value) in &product.specifications {
        lines.push(Line::from(vec![
            Span::styled(format!("    {:<20}", key), dim()),
            Span::raw(*value),
        ]));
    }

    if !product.reviews.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("  Reviews", Style::default().bold())));
        for review in &product.reviews {
            let stars = "★".repeat(review.rating as usize);
            lines.push(Line::from(vec![
                Span::styled(format!("    {:<5} ", stars), Style::default().fg(Color::Yellow)),
                Span::styled(format!("{} ({})", review.user, review.date), dim()),
            ]));
            lines.push(Line::from(format!("      {}", review.comment)));
        }
    }

    let title = if product.in_stock {
        " Product Details · a: add to cart "
    } else {
        " Product Details · out of stock "
    };
    let block = Block::default().borders(Borders::ALL).title(title);
    f.render_widget(Paragraph::new(lines).block(block), popup);
}

fn render_help(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default().borders(Borders::ALL);

    if let Some(status) = &app.status {
        let paragraph = Paragraph::new(status.as_str())
            .style(Style::default().fg(Color::Yellow))
            .block(block.title("Notice"));
        f.render_widget(paragraph, area);
        return;
    }

    let help = match (app.mode, app.wizard.current()) {
        (Mode::Input, _) => "Type to edit  Enter/Esc confirm",
        (_, Step::Basic) => {
            "↑↓ select  Enter/Space edit·toggle  a all  c clear  Tab continue  F1-F4 jump  q quit"
        }
        _ if !app.wizard.is_last() => {
            "↑↓ select  Enter/Space edit·toggle  Tab continue  Shift+Tab back  F1-F4 jump  q quit"
        }
        _ => match &app.preview {
            Some(p) if p.details().is_some() => "a add to cart  Esc close",
            Some(p) if p.is_cart_open() => "↑↓ select  +/- quantity  d remove  Enter checkout  Esc close",
            _ => "Enter send  ^A add  ^D details  ^O cart  ^Y copy snippet  ^P print snippet  Esc back  ^Q quit",
        },
    };
    let paragraph = Paragraph::new(help).style(dim()).block(block.title("Help"));
    f.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::HEADPHONES;

    fn press(app: &mut App, code: KeyCode) -> Action {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE), Instant::now())
    }

    fn ctrl(app: &mut App, c: char) -> Action {
        app.handle_key(
            KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL),
            Instant::now(),
        )
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn test_basic_step_blocks_until_filled() {
        let mut app = App::new(Settings::default());
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.wizard.current(), Step::Basic);
        assert!(app.status.is_some());

        // edit the name field
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.mode, Mode::Input);
        type_text(&mut app, "Shop Bot");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.form.name, "Shop Bot");

        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.form.templates.len(), 4);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.wizard.current(), Step::Appearance);
        assert!(app.wizard.is_completed(Step::Basic));
    }

    #[test]
    fn test_delay_field_accepts_digits_only() {
        let mut app = App::new(Settings::default());
        press(&mut app, KeyCode::F(3));
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        for _ in 0..3 {
            press(&mut app, KeyCode::Backspace);
        }
        type_text(&mut app, "1x5");
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.form.delay_time, 15);

        press(&mut app, KeyCode::Up);
        press(&mut app, KeyCode::Char(' '));
        assert!(app.form.auto_show);
    }

    #[test]
    fn test_preview_session_lifecycle() {
        let mut app = App::new(Settings::default());
        press(&mut app, KeyCode::F(4));
        assert!(app.preview.is_some());

        type_text(&mut app, "hello");
        press(&mut app, KeyCode::Enter);
        assert!(app.preview.as_ref().unwrap().is_typing());

        // leaving the step drops the session and its pending reply
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.wizard.current(), Step::Behavior);
        assert!(app.preview.is_none());
    }

    #[test]
    fn test_storefront_flow() {
        let settings = Settings::default();
        let mut app = App::new(settings);
        app.form.name = "Shop Bot".into();
        app.form.templates.toggle(Template::SalesAssistant);
        press(&mut app, KeyCode::F(4));

        type_text(&mut app, "headphones please");
        press(&mut app, KeyCode::Enter);
        let later = Instant::now() + Duration::from_secs(2);
        app.tick(later);
        assert_eq!(
            app.preview.as_ref().unwrap().last_offered().unwrap().id,
            HEADPHONES
        );

        ctrl(&mut app, 'a');
        app.tick(Instant::now() + Duration::from_secs(2));
        assert_eq!(app.preview.as_ref().unwrap().cart().total_items(), 1);

        ctrl(&mut app, 'o');
        assert!(app.preview.as_ref().unwrap().is_cart_open());
        press(&mut app, KeyCode::Char('+'));
        assert_eq!(app.preview.as_ref().unwrap().cart().total_items(), 2);
        press(&mut app, KeyCode::Char('d'));
        assert!(app.preview.as_ref().unwrap().cart().is_empty());
        press(&mut app, KeyCode::Esc);
        assert!(!app.preview.as_ref().unwrap().is_cart_open());
        assert_eq!(app.wizard.current(), Step::Preview);
    }

    #[test]
    fn test_deploy_actions() {
        let mut app = App::new(Settings::default());
        app.form.name = "Shop Bot".into();
        press(&mut app, KeyCode::F(4));
        assert_eq!(ctrl(&mut app, 'p'), Action::Deploy(OutputMode::Print));
        assert_eq!(ctrl(&mut app, 'y'), Action::Deploy(OutputMode::Clipboard));
        assert_eq!(ctrl(&mut app, 'q'), Action::Quit);

        let deployment = app.deployment(OutputMode::Print);
        assert!(deployment.snippet.contains("'data-chatbot-id','shop-bot-"));
        assert_eq!(deployment.form.name, "Shop Bot");
    }

    #[test]
    fn test_poll_timeout_tracks_next_timer() {
        let mut app = App::new(Settings::default());
        let now = Instant::now();
        assert_eq!(app.poll_timeout(now), IDLE_POLL);

        press(&mut app, KeyCode::F(4));
        type_text(&mut app, "hi");
        press(&mut app, KeyCode::Enter);
        let deadline = app.preview.as_ref().unwrap().next_deadline().unwrap();
        assert_eq!(app.poll_timeout(deadline), Duration::ZERO);
    }

    #[test]
    fn test_wrap() {
        assert_eq!(wrap("a bb ccc", 4), vec!["a bb", "ccc"]);
        assert_eq!(wrap("", 10), vec![""]);
        assert_eq!(wrap("supercalifragilistic x", 5), vec!["supercalifragilistic", "x"]);
    }

    #[test]
    fn test_parse_hex() {
        assert_eq!(parse_hex("#0070f3"), Some(Color::Rgb(0x00, 0x70, 0xf3)));
        assert_eq!(parse_hex("0070f3"), None);
        assert_eq!(parse_hex("#zzzzzz"), None);
    }
}
