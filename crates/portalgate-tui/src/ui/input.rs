//! Keyboard input handling for the TUI.
//!
//! This module handles all keyboard events and translates them into
//! application state changes.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{
    can_add_address_char, can_add_email_char, can_add_password_char, App, AppState, LoginFocus,
};

/// Handle keyboard input. Returns true if the app should quit.
pub fn handle_input(app: &mut App, key: KeyEvent) -> bool {
    // Error dialogs block everything until dismissed
    if app.error_dialog.is_some() {
        if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
            app.dismiss_error();
        }
        return false;
    }

    // Handle quit confirmation
    if matches!(app.state, AppState::ConfirmingQuit) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                app.state = AppState::Quitting;
                return true;
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.state = AppState::Normal;
            }
            _ => {}
        }
        return false;
    }

    if !app.is_browsing() {
        return handle_login_input(app, key);
    }

    if matches!(app.state, AppState::EnteringAddress) {
        handle_address_input(app, key);
        return false;
    }

    handle_browsing_input(app, key);
    false
}

fn handle_login_input(app: &mut App, key: KeyEvent) -> bool {
    // Ctrl+L logs out of a session that never reached the portal
    if key.code == KeyCode::Char('l') && key.modifiers.contains(KeyModifiers::CONTROL) {
        if app.session().has_token {
            app.logout();
        }
        return false;
    }

    match key.code {
        KeyCode::Esc => {
            // Quit if on login screen
            app.state = AppState::Quitting;
            return true;
        }
        KeyCode::Down | KeyCode::Tab => {
            // Move to next field
            app.login_focus = match app.login_focus {
                LoginFocus::Email => LoginFocus::Password,
                LoginFocus::Password => LoginFocus::Button,
                LoginFocus::Button => LoginFocus::Email,
            };
        }
        KeyCode::Up | KeyCode::BackTab => {
            // Move to previous field
            app.login_focus = match app.login_focus {
                LoginFocus::Email => LoginFocus::Button,
                LoginFocus::Password => LoginFocus::Email,
                LoginFocus::Button => LoginFocus::Password,
            };
        }
        KeyCode::Enter => match app.login_focus {
            LoginFocus::Email => {
                app.login_focus = LoginFocus::Password;
            }
            LoginFocus::Password | LoginFocus::Button => {
                // Disabled while loading or once a token is held
                if !app.is_loading() && !app.session().has_token {
                    app.attempt_login();
                }
            }
        },
        KeyCode::Backspace => match app.login_focus {
            LoginFocus::Email => {
                app.login_email.pop();
            }
            LoginFocus::Password => {
                app.login_password.pop();
            }
            LoginFocus::Button => {}
        },
        KeyCode::Char(c) => match app.login_focus {
            LoginFocus::Email => {
                if can_add_email_char(app.login_email.chars().count(), c) {
                    app.login_email.push(c);
                }
            }
            LoginFocus::Password => {
                if can_add_password_char(app.login_password.chars().count(), c) {
                    app.login_password.push(c);
                }
            }
            LoginFocus::Button => {
                // Ignore character input on button
            }
        },
        _ => {}
    }
    false
}

fn handle_browsing_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => {
            app.state = AppState::ConfirmingQuit;
        }
        KeyCode::Char('g') => {
            app.address_input = app
                .session()
                .location
                .map(|l| l.as_str().trim().to_string())
                .unwrap_or_default();
            app.state = AppState::EnteringAddress;
        }
        KeyCode::Char('r') => {
            app.reload();
        }
        KeyCode::Char('L') => {
            app.logout();
        }
        _ => {}
    }
}

fn handle_address_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.address_input.clear();
            app.state = AppState::Normal;
        }
        KeyCode::Enter => {
            app.submit_address();
        }
        KeyCode::Backspace => {
            app.address_input.pop();
        }
        KeyCode::Char(c) => {
            if can_add_address_char(app.address_input.chars().count(), c) {
                app.address_input.push(c);
            }
        }
        _ => {}
    }
}
