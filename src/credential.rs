use std::fmt;
use std::io::{self, BufRead, IsTerminal, Write};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};

use crate::error::ReportError;

/// Store API key. Never printed, logged, or written to disk.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(value: String) -> Self {
        Self(value)
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// Uses the key passed on the command line (or environment) if there is one,
/// otherwise asks for it once.
pub fn resolve_api_key(provided: Option<String>) -> Result<ApiKey, ReportError> {
    if let Some(value) = provided.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
        return Ok(ApiKey::new(value));
    }
    prompt_api_key("STEAM API KEY")
}

pub fn prompt_api_key(caption: &str) -> Result<ApiKey, ReportError> {
    let mut stderr = io::stderr();
    write!(stderr, "{caption}: ").map_err(|err| ReportError::Credential(err.to_string()))?;
    stderr
        .flush()
        .map_err(|err| ReportError::Credential(err.to_string()))?;

    let value = if io::stdin().is_terminal() {
        let result = read_hidden();
        let _ = disable_raw_mode();
        writeln!(stderr).map_err(|err| ReportError::Credential(err.to_string()))?;
        result?
    } else {
        let mut line = String::new();
        io::stdin()
            .lock()
            .read_line(&mut line)
            .map_err(|err| ReportError::Credential(err.to_string()))?;
        line
    };

    let value = value.trim().to_string();
    if value.is_empty() {
        return Err(ReportError::Credential("no API key entered".to_string()));
    }
    Ok(ApiKey::new(value))
}

fn read_hidden() -> Result<String, ReportError> {
    enable_raw_mode().map_err(|err| ReportError::Credential(err.to_string()))?;
    let mut value = String::new();
    loop {
        let event = event::read().map_err(|err| ReportError::Credential(err.to_string()))?;
        let Event::Key(KeyEvent {
            code,
            modifiers,
            kind,
            ..
        }) = event
        else {
            continue;
        };
        if kind == KeyEventKind::Release {
            continue;
        }
        match code {
            KeyCode::Enter => return Ok(value),
            KeyCode::Backspace => {
                value.pop();
            }
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                return Err(ReportError::Credential("interrupted".to_string()));
            }
            KeyCode::Char(ch) => value.push(ch),
            KeyCode::Esc => {
                return Err(ReportError::Credential("cancelled".to_string()));
            }
            _ => {}
        }
    }
}
