//! # Editor Script Parser
//!
//! A small line-based format for driving the core module from the host.
//!
//! ## Format
//!
//! One command per line:
//! - `reset "text"` or `reset "text" readonly`
//! - `clear`
//! - `text` (reads the document back)
//! - `insert "text" FROM TO`
//! - `replace "text" GRANULARITY` (`line`, `selection`, `wholeDocument`, or any other tag)
//! - `enter X Y` / `exit X Y` (pointer hover notifications)
//! - `sleep 100ms` / `sleep 1s`
//! - Comments: `# This is a comment`
//!
//! Quoted strings accept `\n`, `\t`, `\"` and `\\` escapes.
//!
//! ## Example
//!
//! ```text
//! # Type two lines, then blank the second one
//! reset ""
//! insert "hello\nworld" 0 0
//! replace "" line
//! text
//! ```

use std::collections::VecDeque;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Script error types
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScriptError {
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Parse error at line {line}: {message}")]
    ParseError { line: usize, message: String },

    #[error("Empty script")]
    EmptyScript,

    #[error("Invalid delay format: {0}")]
    InvalidDelay(String),
}

/// One scripted editor command
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptCommand {
    Reset { text: String, read_only: bool },
    Clear,
    Text,
    Insert { text: String, from: i32, to: i32 },
    Replace { text: String, granularity: String },
    Enter { x: f64, y: f64 },
    Exit { x: f64, y: f64 },
    Sleep(Duration),
}

impl fmt::Display for ScriptCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptCommand::Reset { text, read_only } => {
                write!(f, "reset {:?}", text)?;
                if *read_only {
                    write!(f, " readonly")?;
                }
                Ok(())
            }
            ScriptCommand::Clear => write!(f, "clear"),
            ScriptCommand::Text => write!(f, "text"),
            ScriptCommand::Insert { text, from, to } => {
                write!(f, "insert {:?} {} {}", text, from, to)
            }
            ScriptCommand::Replace { text, granularity } => {
                write!(f, "replace {:?} {}", text, granularity)
            }
            ScriptCommand::Enter { x, y } => write!(f, "enter {} {}", x, y),
            ScriptCommand::Exit { x, y } => write!(f, "exit {} {}", x, y),
            ScriptCommand::Sleep(duration) => write!(f, "sleep {}ms", duration.as_millis()),
        }
    }
}

/// A command with the script line it came from
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptStep {
    pub line: usize,
    pub command: ScriptCommand,
}

/// Parsed editor script
#[derive(Debug, Clone, Default)]
pub struct EditorScript {
    steps: VecDeque<ScriptStep>,
}

impl EditorScript {
    /// Parses a script from text
    pub fn from_text(text: &str) -> Result<Self, ScriptError> {
        let mut steps = VecDeque::new();

        for (line_num, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let command = Self::parse_line(line, line_num + 1)?;
            steps.push_back(ScriptStep {
                line: line_num + 1,
                command,
            });
        }

        if steps.is_empty() {
            return Err(ScriptError::EmptyScript);
        }

        Ok(Self { steps })
    }

    fn parse_line(line: &str, line_num: usize) -> Result<ScriptCommand, ScriptError> {
        let parse_error = |message: String| ScriptError::ParseError {
            line: line_num,
            message,
        };

        let tokens = tokenize(line).map_err(parse_error)?;
        let Some((name, args)) = tokens.split_first() else {
            return Err(parse_error("empty command".to_string()));
        };

        let arity = |expected: &[usize]| {
            if expected.contains(&args.len()) {
                Ok(())
            } else {
                Err(parse_error(format!(
                    "`{}` takes {:?} arguments, got {}",
                    name,
                    expected,
                    args.len()
                )))
            }
        };

        match name.as_str() {
            "reset" => {
                arity(&[1, 2])?;
                let read_only = match args.get(1).map(String::as_str) {
                    None => false,
                    Some("readonly") => true,
                    Some(other) => {
                        return Err(parse_error(format!("expected `readonly`, got `{}`", other)))
                    }
                };
                Ok(ScriptCommand::Reset {
                    text: args[0].clone(),
                    read_only,
                })
            }
            "clear" => {
                arity(&[0])?;
                Ok(ScriptCommand::Clear)
            }
            "text" => {
                arity(&[0])?;
                Ok(ScriptCommand::Text)
            }
            "insert" => {
                arity(&[3])?;
                Ok(ScriptCommand::Insert {
                    text: args[0].clone(),
                    from: parse_number(&args[1]).map_err(parse_error)?,
                    to: parse_number(&args[2]).map_err(parse_error)?,
                })
            }
            "replace" => {
                arity(&[2])?;
                Ok(ScriptCommand::Replace {
                    text: args[0].clone(),
                    granularity: args[1].clone(),
                })
            }
            "enter" | "exit" => {
                arity(&[2])?;
                let x = parse_number(&args[0]).map_err(parse_error)?;
                let y = parse_number(&args[1]).map_err(parse_error)?;
                Ok(if name == "enter" {
                    ScriptCommand::Enter { x, y }
                } else {
                    ScriptCommand::Exit { x, y }
                })
            }
            "sleep" => {
                arity(&[1])?;
                let duration = parse_duration(&args[0]).map_err(|e| parse_error(e.to_string()))?;
                Ok(ScriptCommand::Sleep(duration))
            }
            other => Err(ScriptError::UnknownCommand(other.to_string())),
        }
    }

    /// Returns the next step, if any
    pub fn next_step(&mut self) -> Option<ScriptStep> {
        self.steps.pop_front()
    }

    pub fn has_more(&self) -> bool {
        !self.steps.is_empty()
    }

    pub fn remaining(&self) -> usize {
        self.steps.len()
    }
}

/// Splits a line into words and quoted strings
fn tokenize(line: &str) -> Result<Vec<String>, String> {
    let mut tokens = Vec::new();
    let mut chars = line.chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }

        if c == '"' {
            chars.next();
            let mut text = String::new();
            loop {
                match chars.next() {
                    Some('"') => break,
                    Some('\\') => match chars.next() {
                        Some('n') => text.push('\n'),
                        Some('t') => text.push('\t'),
                        Some('"') => text.push('"'),
                        Some('\\') => text.push('\\'),
                        Some(other) => return Err(format!("unknown escape `\\{}`", other)),
                        None => return Err("unterminated escape".to_string()),
                    },
                    Some(other) => text.push(other),
                    None => return Err("unterminated string".to_string()),
                }
            }
            tokens.push(text);
            continue;
        }

        let mut word = String::new();
        while let Some(&c) = chars.peek() {
            if c.is_whitespace() {
                break;
            }
            word.push(c);
            chars.next();
        }
        tokens.push(word);
    }

    Ok(tokens)
}

fn parse_number<T: std::str::FromStr>(s: &str) -> Result<T, String> {
    s.parse().map_err(|_| format!("invalid number `{}`", s))
}

/// Parses a duration string (e.g., "100ms", "1s")
fn parse_duration(s: &str) -> Result<Duration, ScriptError> {
    let s = s.trim().to_lowercase();

    if let Some(ms_str) = s.strip_suffix("ms") {
        ms_str
            .trim()
            .parse::<u64>()
            .map(Duration::from_millis)
            .map_err(|_| ScriptError::InvalidDelay(s.to_string()))
    } else if let Some(s_str) = s.strip_suffix('s') {
        s_str
            .trim()
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|_| ScriptError::InvalidDelay(s.to_string()))
    } else {
        Err(ScriptError::InvalidDelay(s.to_string()))
    }
}
