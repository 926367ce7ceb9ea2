use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame,
};

use portalgate_core::utils::{mask, truncate_start, truncate_string};
use portalgate_core::SessionState;

use crate::app::{App, AppState, ErrorDialog, LoginFocus};

use super::styles;

const LOGO: [&str; 3] = [
    "   ╔═╗╔═╗╦═╗╔╦╗╔═╗╦  ╔═╗╔═╗╔╦╗╔═╗",
    "   ╠═╝║ ║╠╦╝ ║ ╠═╣║  ║ ╦╠═╣ ║ ║╣ ",
    "   ╩  ╚═╝╩╚═ ╩ ╩ ╩╩═╝╚═╝╩ ╩ ╩ ╚═╝",
];

/// Visible width of the login form's input fields
const FIELD_WIDTH: usize = 24;

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Min(10),   // Main content
            Constraint::Length(2), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);
    render_status_bar(frame, app, chunks[2]);

    if app.is_browsing() {
        render_browsing(frame, app, chunks[1]);
    } else {
        render_login_overlay(frame, app);
    }

    // Render overlays
    if matches!(app.state, AppState::EnteringAddress) {
        render_address_overlay(frame, app);
    }

    if matches!(app.state, AppState::ConfirmingQuit) {
        render_quit_overlay(frame);
    }

    if let Some(ref dialog) = app.error_dialog {
        render_error_overlay(frame, dialog);
    }
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title = "  Portalgate";
    let state_hint = format!("[{}]", app.session().state.label());
    let title_len = title.len();

    let title_line = Line::from(vec![
        Span::styled(title, styles::title_style()),
        Span::raw(" ".repeat(
            area.width
                .saturating_sub(title_len as u16 + state_hint.chars().count() as u16 + 4)
                as usize,
        )),
        Span::styled(state_hint, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    let paragraph = Paragraph::new(title_line).block(block);
    frame.render_widget(paragraph, area);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let shortcuts = if app.is_browsing() {
        "[g]o | [r]eload | [L]ogout | [q]uit"
    } else {
        "[Tab] next field | [Esc] quit"
    };

    let left_text = if let Some(ref msg) = app.status_message {
        format!(" {} ", msg)
    } else {
        format!(" {} ", app.config.api_base_url)
    };

    let right_text = format!(" {} ", shortcuts);

    let width = area.width as usize;
    let left_text = truncate_string(&left_text, width.saturating_sub(right_text.len()));
    let padding_len = width
        .saturating_sub(left_text.chars().count())
        .saturating_sub(right_text.len());

    let status_line = Line::from(vec![
        Span::styled(left_text, styles::muted_style()),
        Span::raw(" ".repeat(padding_len)),
        Span::styled(right_text, styles::muted_style()),
    ]);
    let paragraph = Paragraph::new(status_line).style(styles::status_bar_style());
    frame.render_widget(paragraph, area);
}

fn render_browsing(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(6), Constraint::Min(4)])
        .split(area);

    let snapshot = app.session();
    let location = snapshot
        .location
        .as_ref()
        .map(|l| l.as_str().trim().to_string())
        .unwrap_or_default();
    let inner_width = chunks[0].width.saturating_sub(14) as usize;

    let status = match (app.page.loading, app.page.status) {
        (true, _) => Span::styled("loading...", styles::highlight_style()),
        (false, Some(code)) if (200..300).contains(&code) => {
            Span::styled(code.to_string(), styles::success_style())
        }
        (false, Some(code)) => Span::styled(code.to_string(), styles::error_style()),
        (false, None) => Span::styled("-", styles::muted_style()),
    };

    let lines = vec![
        Line::from(vec![
            Span::styled(" Location: ", styles::muted_style()),
            Span::styled(truncate_start(&location, inner_width), styles::highlight_style()),
        ]),
        Line::from(vec![
            Span::styled(" Title:    ", styles::muted_style()),
            Span::styled(
                truncate_string(app.page.title.as_deref().unwrap_or("-"), inner_width),
                styles::list_item_style(),
            ),
        ]),
        Line::from(vec![Span::styled(" Status:   ", styles::muted_style()), status]),
    ];

    let block = Block::default()
        .title(" Portal ")
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));
    frame.render_widget(Paragraph::new(lines).block(block), chunks[0]);

    let history_width = chunks[1].width.saturating_sub(14) as usize;
    let items: Vec<ListItem> = app
        .history
        .iter()
        .rev()
        .map(|entry| {
            ListItem::new(Line::from(vec![
                Span::styled(format!(" {} ", entry.at.format("%H:%M:%S")), styles::muted_style()),
                Span::styled(
                    truncate_start(entry.location.as_str().trim(), history_width),
                    styles::list_item_style(),
                ),
            ]))
        })
        .collect();

    let block = Block::default()
        .title(" History ")
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));
    frame.render_widget(List::new(items).block(block), chunks[1]);
}

fn render_login_overlay(frame: &mut Frame, app: &App) {
    let snapshot = app.session();
    let stranded = snapshot.state == SessionState::Authenticated;

    // Fixed size dialog - compact
    let height = if stranded { 14 } else { 12 };
    let area = centered_rect_fixed(46, height, frame.area());

    // Clear the area
    frame.render_widget(Clear, area);

    let mut lines: Vec<Line> = LOGO
        .iter()
        .map(|row| Line::from(Span::styled(*row, styles::title_style())))
        .collect();
    lines.push(Line::from(""));

    // Email field
    let email_focused = app.login_focus == LoginFocus::Email;
    let email_style = if email_focused {
        styles::selected_style()
    } else {
        styles::list_item_style()
    };
    let email_display = format!(
        "{:<width$}",
        truncate_start(&app.login_email, FIELD_WIDTH),
        width = FIELD_WIDTH
    );
    let cursor = if email_focused { "▌" } else { "" };
    lines.push(Line::from(vec![
        Span::raw("  "),
        Span::styled("Email:    [", styles::muted_style()),
        Span::styled(format!("{}{}", email_display, cursor), email_style),
        Span::styled("]", styles::muted_style()),
    ]));

    // Password field
    let password_focused = app.login_focus == LoginFocus::Password;
    let password_style = if password_focused {
        styles::selected_style()
    } else {
        styles::list_item_style()
    };
    let password_display = format!(
        "{:<width$}",
        mask(&app.login_password, FIELD_WIDTH),
        width = FIELD_WIDTH
    );
    let cursor = if password_focused { "▌" } else { "" };
    lines.push(Line::from(vec![
        Span::raw("  "),
        Span::styled("Password: [", styles::muted_style()),
        Span::styled(format!("{}{}", password_display, cursor), password_style),
        Span::styled("]", styles::muted_style()),
    ]));

    // Login button, disabled while a sign-in is loading
    lines.push(Line::from(""));
    if app.is_loading() {
        lines.push(Line::from(vec![
            Span::raw("             ["),
            Span::styled(" Signing in... ", styles::disabled_style()),
            Span::raw("]"),
        ]));
    } else {
        let button_focused = app.login_focus == LoginFocus::Button;
        let (label, style) = if stranded {
            ("     Login     ", styles::disabled_style())
        } else if button_focused {
            ("   ▶ Login ◀   ", styles::selected_style())
        } else {
            ("     Login     ", styles::list_item_style())
        };
        lines.push(Line::from(vec![
            Span::raw("             ["),
            Span::styled(label, style),
            Span::raw("]"),
        ]));
    }

    if stranded {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            " Signed in, but no portal was found.",
            styles::error_style(),
        )));
        lines.push(Line::from(Span::styled(
            " Press Ctrl+L to log out and try again.",
            styles::muted_style(),
        )));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    let paragraph = Paragraph::new(lines).block(block);

    frame.render_widget(paragraph, area);
}

fn render_address_overlay(frame: &mut Frame, app: &App) {
    let area = centered_rect_fixed(70, 5, frame.area());
    frame.render_widget(Clear, area);

    let field_width = area.width.saturating_sub(6) as usize;
    let lines = vec![
        Line::from(vec![
            Span::styled(" > ", styles::search_style()),
            Span::styled(
                format!("{}▌", truncate_start(&app.address_input, field_width)),
                styles::list_item_style(),
            ),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled(" [Enter]", styles::help_key_style()),
            Span::styled(" go  ", styles::help_desc_style()),
            Span::styled("[Esc]", styles::help_key_style()),
            Span::styled(" cancel", styles::help_desc_style()),
        ]),
    ];

    let block = Block::default()
        .title(" Go to address ")
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_error_overlay(frame: &mut Frame, dialog: &ErrorDialog) {
    let area = centered_rect_fixed(54, 9, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(format!(" {}", dialog.message), styles::error_style())),
        Line::from(""),
        Line::from(vec![
            Span::styled(" Press ", styles::muted_style()),
            Span::styled("[Enter]", styles::help_key_style()),
            Span::styled(" to dismiss", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .title(format!(" {} ", dialog.category.title()))
        .borders(Borders::ALL)
        .border_style(styles::error_style());

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

/// Create a centered rectangle with fixed dimensions
fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}

fn render_quit_overlay(frame: &mut Frame) {
    // Fixed size dialog matching login screen
    let area = centered_rect_fixed(46, 10, frame.area());

    // Clear the area
    frame.render_widget(Clear, area);

    let mut lines: Vec<Line> = LOGO
        .iter()
        .map(|row| Line::from(Span::styled(*row, styles::title_style())))
        .collect();
    lines.extend([
        Line::from(""),
        Line::from(Span::styled(
            "   Are you sure you want to quit?",
            styles::highlight_style(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("   Press ", styles::muted_style()),
            Span::styled("[Y]", styles::help_key_style()),
            Span::styled(" to quit, ", styles::muted_style()),
            Span::styled("[N]", styles::help_key_style()),
            Span::styled(" to cancel", styles::muted_style()),
        ]),
    ]);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    let paragraph = Paragraph::new(lines).block(block);

    frame.render_widget(paragraph, area);
}
