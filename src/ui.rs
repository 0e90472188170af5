use ratatui::layout::{Alignment, Constraint, Direction, Layout, Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, BorderType, Borders, Cell, Clear, List, ListItem, ListState, Paragraph, Row, Table, Wrap,
};
use ratatui::Frame;

use crate::app::App;
use crate::locale::{Piece, StringKey};
use crate::overlay::{Overlay, PickerKind};

pub fn draw(frame: &mut Frame, app: &mut App) {
    let size = frame.area();
    let theme = theme_from(app.prefers_dark());
    let faded = app.fade_active();

    draw_background(frame, size, &theme);

    if app.minimalist {
        let card = centered_rect(80, 50, size);
        draw_quote_card(frame, app, card, &theme, faded, false);
    } else {
        let content = size.inner(Margin {
            vertical: 1,
            horizontal: 2,
        });
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Min(0),
                Constraint::Length(2),
            ])
            .split(content);

        let header = Paragraph::new(header_line(app, &theme))
            .alignment(Alignment::Left)
            .block(
                Block::default()
                    .borders(Borders::BOTTOM)
                    .border_style(theme.border_style()),
            );
        frame.render_widget(header, chunks[0]);

        let dense = app.view.is_long_text && app.is_narrow();
        let card = if dense {
            centered_rect(94, 86, chunks[1])
        } else {
            centered_rect(70, 60, chunks[1])
        };
        draw_quote_card(frame, app, card, &theme, faded, true);

        let footer = Paragraph::new(footer_lines(app, &theme))
            .alignment(Alignment::Left)
            .block(
                Block::default()
                    .borders(Borders::TOP)
                    .border_style(theme.border_style()),
            );
        frame.render_widget(footer, chunks[2]);
    }

    match &app.overlay {
        Overlay::Closed => {}
        Overlay::LanguageMenu { selected, .. } => {
            let options = app.picker_options(PickerKind::Language);
            let labels: Vec<String> = options.into_iter().map(|opt| opt.label).collect();
            draw_menu(
                frame,
                size,
                app.tr(StringKey::LanguagePicker),
                &labels,
                *selected,
                &theme,
            );
        }
        Overlay::ThemeMenu { selected, .. } => {
            let options = app.picker_options(PickerKind::Theme);
            let labels: Vec<String> = options.into_iter().map(|opt| opt.label).collect();
            draw_menu(
                frame,
                size,
                app.tr(StringKey::ThemePicker),
                &labels,
                *selected,
                &theme,
            );
        }
        Overlay::Drawer {
            title,
            options,
            selected,
            ..
        } => {
            let labels: Vec<String> = options.iter().map(|opt| opt.label.clone()).collect();
            draw_drawer(frame, size, title.clone(), &labels, *selected, &theme);
        }
    }

    if !app.overlay.is_open() && !app.show_help {
        if let Some(toast) = app.active_toast() {
            draw_toast(frame, size, &toast.message, toast.is_error, &theme);
        }
    }

    if app.show_help {
        draw_help(frame, app, size, &theme);
    }
}

fn draw_quote_card(
    frame: &mut Frame,
    app: &App,
    area: Rect,
    theme: &Theme,
    faded: bool,
    with_date: bool,
) {
    // Cross-fade: while the window is open the swapped-in content stays
    // dimmed, then reveals on the next tick after it elapses.
    let quote_style = if faded {
        theme.muted_style().add_modifier(Modifier::ITALIC)
    } else {
        Style::default()
            .fg(theme.text)
            .add_modifier(Modifier::ITALIC)
    };

    let mut lines = vec![
        Line::from(Span::styled(
            format!("“{}”", app.view.quote_text),
            quote_style,
        )),
        Line::from(""),
        source_line(&app.view.source_line, theme, faded),
    ];
    if with_date {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            app.view.formatted_date.clone(),
            theme.muted_style(),
        )));
    }

    let card = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(card, area);
}

fn source_line(pieces: &[Piece], theme: &Theme, faded: bool) -> Line<'static> {
    let link_style = if faded {
        theme.muted_style().add_modifier(Modifier::UNDERLINED)
    } else {
        Style::default()
            .fg(theme.accent)
            .add_modifier(Modifier::UNDERLINED)
    };
    let spans = pieces
        .iter()
        .map(|piece| match piece {
            Piece::Plain(text) => Span::styled(text.clone(), theme.muted_style()),
            Piece::Link(fragment) => Span::styled(fragment.text.clone(), link_style),
        })
        .collect::<Vec<_>>();
    Line::from(spans)
}

fn header_line(app: &App, theme: &Theme) -> Line<'static> {
    let focus_style = Style::default()
        .fg(theme.highlight)
        .add_modifier(Modifier::BOLD);
    let control_style = Style::default().fg(theme.text);

    let language_style = match app.focus {
        Some(crate::overlay::Opener::LanguageControl) => focus_style,
        _ => control_style,
    };
    let theme_style = match app.focus {
        Some(crate::overlay::Opener::ThemeControl) => focus_style,
        _ => control_style,
    };

    Line::from(vec![
        Span::styled("Quotetab", theme.title_style()),
        Span::raw("  "),
        Span::styled(app.tr(StringKey::QuoteOfTheDay), theme.muted_style()),
        Span::raw("   "),
        Span::styled(format!("{}: ", app.tr(StringKey::LanguagePicker)), theme.muted_style()),
        Span::styled(app.language.native_name().to_string(), language_style),
        Span::raw("  "),
        Span::styled(format!("{}: ", app.tr(StringKey::ThemePicker)), theme.muted_style()),
        Span::styled(app.theme_label(app.theme).to_string(), theme_style),
    ])
}

fn footer_lines(app: &App, theme: &Theme) -> Vec<Line<'static>> {
    let mut hints = vec![
        Span::styled(format!("←→ {}", app.tr(StringKey::NextDay)), theme.muted_style()),
        Span::raw(" · "),
        Span::styled(format!("t {}", app.tr(StringKey::Today)), theme.muted_style()),
        Span::raw(" · "),
        Span::styled(format!("l {}", app.tr(StringKey::LanguagePicker)), theme.muted_style()),
        Span::raw(" · "),
        Span::styled(format!("s {}", app.tr(StringKey::ThemePicker)), theme.muted_style()),
        Span::raw(" · "),
        Span::styled(format!("m {}", app.tr(StringKey::Minimalist)), theme.muted_style()),
        Span::raw(" · "),
        Span::styled(format!("e {}", app.tr(StringKey::Export)), theme.muted_style()),
        Span::raw(" · "),
        Span::styled(format!("h {}", app.tr(StringKey::Help)), theme.muted_style()),
        Span::raw(" · "),
        Span::styled(format!("q {}", app.tr(StringKey::Quit)), theme.muted_style()),
    ];
    if let Some(announcement) = &app.announcement {
        hints.push(Span::raw("   |   "));
        hints.push(Span::styled(announcement.clone(), Style::default().fg(theme.text)));
    }

    let mut lines = vec![Line::from(hints)];
    if app.debug_panel {
        lines.push(Line::from(Span::styled(
            format!(
                "day {} · index {} · {} quotes · offset {:+}",
                app.view.day_of_year,
                app.view.day_index,
                app.corpus_len(),
                app.current_date_offset
            ),
            theme.muted_style(),
        )));
    }
    lines
}

fn draw_menu(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    labels: &[String],
    selected: usize,
    theme: &Theme,
) {
    // Too small to host the dropdown: leave the frame untouched.
    if area.width < 10 || area.height < 6 {
        return;
    }
    let height = (labels.len() as u16 + 2).min(area.height.saturating_sub(2));
    let width = 28.min(area.width);
    let x = area.x + area.width.saturating_sub(width + 2);
    let rect = Rect::new(x, area.y + 2, width, height);

    frame.render_widget(Clear, rect);
    let items: Vec<ListItem> = labels
        .iter()
        .map(|label| ListItem::new(Line::from(label.clone())).style(theme.panel_style()))
        .collect();
    let list = List::new(items)
        .block(panel_block(title, theme))
        .highlight_style(
            Style::default()
                .bg(theme.accent)
                .fg(theme.accent_fg)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▍ ");

    let mut state = ListState::default();
    state.select(Some(selected));
    frame.render_stateful_widget(list, rect, &mut state);
}

fn draw_drawer(
    frame: &mut Frame,
    area: Rect,
    title: String,
    labels: &[String],
    selected: usize,
    theme: &Theme,
) {
    if area.width < 10 || area.height < 6 {
        return;
    }
    let height = (labels.len() as u16 + 3).min(area.height);
    let rect = Rect::new(
        area.x + 1,
        area.y + area.height.saturating_sub(height),
        area.width.saturating_sub(2),
        height,
    );

    frame.render_widget(Clear, rect);
    let items: Vec<ListItem> = labels
        .iter()
        .map(|label| ListItem::new(Line::from(label.clone())).style(theme.panel_style()))
        .collect();
    let list = List::new(items)
        .block(
            panel_block(&title, theme).title_bottom(Line::from(Span::styled(
                " Tab ⇄ · Enter ✓ · Esc ✕ ",
                theme.muted_style(),
            ))),
        )
        .highlight_style(
            Style::default()
                .bg(theme.accent)
                .fg(theme.accent_fg)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▍ ");

    let mut state = ListState::default();
    state.select(Some(selected));
    frame.render_stateful_widget(list, rect, &mut state);
}

fn draw_toast(frame: &mut Frame, area: Rect, message: &str, is_error: bool, theme: &Theme) {
    if area.width < 8 || area.height < 7 {
        return;
    }
    let width = (message.chars().count() as u16 + 6).min(area.width.saturating_sub(2));
    let height = 3;
    let x = area.x + area.width.saturating_sub(width + 1);
    let y = area.y + area.height.saturating_sub(height + 3);
    let rect = Rect::new(x, y, width, height);

    frame.render_widget(Clear, rect);
    let style = if is_error {
        Style::default().fg(theme.error).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
            .fg(theme.success)
            .add_modifier(Modifier::BOLD)
    };
    let paragraph = Paragraph::new(Line::from(Span::styled(message.to_string(), style)))
        .alignment(Alignment::Center)
        .block(panel_block("", theme));
    frame.render_widget(paragraph, rect);
}

fn draw_help(frame: &mut Frame, app: &App, area: Rect, theme: &Theme) {
    let block = centered_rect(60, 60, area);
    frame.render_widget(Clear, block);

    let header_style = Style::default()
        .add_modifier(Modifier::BOLD)
        .fg(theme.accent);
    let key_style = Style::default().fg(theme.highlight);

    let rows = vec![
        Row::new(vec![
            Cell::from(Span::styled("←  /  →", key_style)),
            Cell::from(format!(
                "{} / {}",
                app.tr(StringKey::PrevDay),
                app.tr(StringKey::NextDay)
            )),
        ]),
        Row::new(vec![
            Cell::from(Span::styled("t", key_style)),
            Cell::from(app.tr(StringKey::Today)),
        ]),
        Row::new(vec![Cell::from(""), Cell::from("")]),
        Row::new(vec![
            Cell::from(Span::styled("l", key_style)),
            Cell::from(app.tr(StringKey::LanguagePicker)),
        ]),
        Row::new(vec![
            Cell::from(Span::styled("s", key_style)),
            Cell::from(app.tr(StringKey::ThemePicker)),
        ]),
        Row::new(vec![
            Cell::from(Span::styled("Tab / Shift+Tab", key_style)),
            Cell::from("⇅"),
        ]),
        Row::new(vec![
            Cell::from(Span::styled("Enter / Space", key_style)),
            Cell::from("✓"),
        ]),
        Row::new(vec![
            Cell::from(Span::styled("Esc", key_style)),
            Cell::from("✕"),
        ]),
        Row::new(vec![Cell::from(""), Cell::from("")]),
        Row::new(vec![
            Cell::from(Span::styled("m", key_style)),
            Cell::from(app.tr(StringKey::Minimalist)),
        ]),
        Row::new(vec![
            Cell::from(Span::styled("e", key_style)),
            Cell::from(app.tr(StringKey::Export)),
        ]),
        Row::new(vec![
            Cell::from(Span::styled("q", key_style)),
            Cell::from(app.tr(StringKey::Quit)),
        ]),
    ];

    let table = Table::new(rows, [Constraint::Length(18), Constraint::Min(10)])
        .block(panel_block(app.tr(StringKey::Help), theme))
        .header(Row::new(vec![
            Cell::from(Span::styled("Quotetab", header_style)),
            Cell::from(""),
        ]))
        .column_spacing(2);

    frame.render_widget(table, block);
}

fn draw_background(frame: &mut Frame, area: Rect, theme: &Theme) {
    let block = Block::default().style(Style::default().bg(theme.bg).fg(theme.text));
    frame.render_widget(block, area);
}

fn panel_block(title: &str, theme: &Theme) -> Block<'static> {
    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme.border_style())
        .style(theme.panel_style());
    if !title.is_empty() {
        block = block.title(Line::from(Span::styled(
            format!(" {} ", title),
            theme.title_style(),
        )));
    }
    block
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);
    let vertical = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1]);
    vertical[1]
}

struct Theme {
    bg: Color,
    panel: Color,
    border: Color,
    text: Color,
    muted: Color,
    accent: Color,
    accent_fg: Color,
    highlight: Color,
    success: Color,
    error: Color,
}

impl Theme {
    fn panel_style(&self) -> Style {
        Style::default().bg(self.panel).fg(self.text)
    }

    fn border_style(&self) -> Style {
        Style::default().fg(self.border)
    }

    fn title_style(&self) -> Style {
        Style::default().fg(self.accent).add_modifier(Modifier::BOLD)
    }

    fn muted_style(&self) -> Style {
        Style::default().fg(self.muted)
    }
}

fn theme_from(prefers_dark: bool) -> Theme {
    if prefers_dark {
        Theme {
            bg: Color::Rgb(24, 20, 18),
            panel: Color::Rgb(33, 28, 25),
            border: Color::Rgb(72, 62, 52),
            text: Color::Rgb(232, 224, 213),
            muted: Color::Rgb(152, 140, 126),
            accent: Color::Rgb(214, 158, 73),
            accent_fg: Color::Rgb(24, 20, 18),
            highlight: Color::Rgb(122, 186, 210),
            success: Color::Rgb(126, 198, 143),
            error: Color::Rgb(233, 110, 100),
        }
    } else {
        Theme {
            bg: Color::Rgb(250, 247, 240),
            panel: Color::Rgb(255, 253, 248),
            border: Color::Rgb(221, 211, 196),
            text: Color::Rgb(43, 37, 32),
            muted: Color::Rgb(122, 112, 100),
            accent: Color::Rgb(166, 110, 29),
            accent_fg: Color::Rgb(255, 253, 248),
            highlight: Color::Rgb(42, 118, 160),
            success: Color::Rgb(46, 140, 90),
            error: Color::Rgb(200, 70, 60),
        }
    }
}
