use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

use crate::reminder::ReminderFireTime;

/// Time-of-day keywords with their default clock time, in matching priority.
const KEYWORD_ANCHORS: [(&str, &str); 3] = [
    ("irden", "07:00"),
    ("gunortan", "12:00"),
    ("agsham", "18:00"),
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimeParseError {
    #[error("time expression is not recognized")]
    NotRecognized,

    #[error("\"{0}\" is not a valid clock time")]
    OutOfRange(String),
}

fn clock_pattern() -> &'static Regex {
    static CLOCK_PATTERN: OnceLock<Regex> = OnceLock::new();
    CLOCK_PATTERN.get_or_init(|| Regex::new(r"[0-9]{1,2}:?[0-9]{0,2}").expect("Pattern is valid."))
}

/// Turns fuzzy time expressions like `agsham` or `irden 8:30` into a reminder fire time.
///
/// A keyword must be present somewhere in the input. The first numeric clock
/// pattern anywhere in the input then replaces the keyword default. In lenient
/// mode the numeric override is passed through verbatim, in strict mode it must
/// name a real clock time and is normalized to `HH:MM`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeExpressionParser {
    strict: bool,
}

impl TimeExpressionParser {
    pub fn lenient() -> Self {
        Self { strict: false }
    }

    pub fn strict() -> Self {
        Self { strict: true }
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    pub fn parse(&self, input: &str) -> Result<ReminderFireTime, TimeParseError> {
        let input = input.trim().to_lowercase();

        let (_, default_time) = KEYWORD_ANCHORS
            .iter()
            .find(|(keyword, _)| input.contains(keyword))
            .ok_or(TimeParseError::NotRecognized)?;

        let Some(numeric) = clock_pattern().find(&input) else {
            return Ok(ReminderFireTime::new(*default_time));
        };

        let fire_at = ReminderFireTime::new(numeric.as_str());
        if !self.strict {
            return Ok(fire_at);
        }

        fire_at
            .clock_time()
            .map(ReminderFireTime::from_time)
            .ok_or_else(|| TimeParseError::OutOfRange(fire_at.into_string()))
    }
}
