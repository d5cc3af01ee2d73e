//! Date range clauses and the date formatting they rely on.
//!
//! Input patterns use moment-style tokens (`YYYY-MM-DD HH:mm:ss`), the form the
//! calling front ends already speak. Parsing is forgiving: separators in the
//! value do not have to match the pattern, and trailing components that are
//! missing default to zero.

use chrono::format::{Fixed, Item, Numeric, Pad, StrftimeItems};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};

use crate::clause::is_valid;

/// Open range bound.
pub const WILDCARD: &str = "*";

/// Pattern Solr expects before the trailing `Z`.
pub const SOLR_DATE_PATTERN: &str = "YYYY-MM-DDTHH:mm:ss";

pub const SIMPLE_ISO: &str = "YYYY-MM-DD HH:mm:ss";
pub const ORDINAL_DATE: &str = "YYYY-DDD";
pub const MILLIS: &str = "x";
pub const ISO: &str = "YYYY-MM-DDTHH:mm:ss.sssZ";
pub const CALENDAR_DATE: &str = "YYYY-MM-DD";

/// `[<start>Z TO *]`
pub fn date_range(start: &str, input_format: &str) -> String {
    date_range_to(start, input_format, WILDCARD)
}

/// `[<start>Z TO <end>]`; `end` may be [`WILDCARD`].
pub fn date_range_to(start: &str, input_format: &str, end: &str) -> String {
    date_range_with(&MomentFormatter, start, input_format, end)
}

pub fn date_range_with<F: DateFormatter + ?Sized>(
    formatter: &F,
    start: &str,
    input_format: &str,
    end: &str,
) -> String {
    if !is_valid(start) && !is_valid(end) {
        return String::new();
    }

    let options = FormatOptions::new(input_format, SOLR_DATE_PATTERN);
    let start = formatter.format(start, &options);
    format!("[{}Z TO {}]", start, format_bound(formatter, end, &options))
}

/// `[NOW/DAY TO *]`
pub fn date_from_now() -> String {
    date_from_now_to(WILDCARD, ISO)
}

/// `[NOW/DAY TO <end>]`
pub fn date_from_now_to(end: &str, input_format: &str) -> String {
    date_from_now_with(&MomentFormatter, end, input_format)
}

pub fn date_from_now_with<F: DateFormatter + ?Sized>(
    formatter: &F,
    end: &str,
    input_format: &str,
) -> String {
    if !is_valid(end) {
        return String::new();
    }

    let options = FormatOptions::new(input_format, SOLR_DATE_PATTERN);
    format!("[NOW/DAY TO {}]", format_bound(formatter, end, &options))
}

fn format_bound<F: DateFormatter + ?Sized>(formatter: &F, bound: &str, options: &FormatOptions) -> String {
    if bound == WILDCARD {
        bound.to_string()
    } else {
        formatter.format(bound, options)
    }
}

/// Input/output patterns plus the offset the result is rendered in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatOptions {
    pub input_pattern: String,
    pub output_pattern: String,
    /// `None` keeps wall-clock values as given and renders explicit offsets in UTC.
    pub offset: Option<FixedOffset>,
}

impl FormatOptions {
    pub fn new(input_pattern: impl Into<String>, output_pattern: impl Into<String>) -> Self {
        Self {
            input_pattern: input_pattern.into(),
            output_pattern: output_pattern.into(),
            offset: None,
        }
    }

    pub fn with_offset(mut self, offset: FixedOffset) -> Self {
        self.offset = Some(offset);
        self
    }
}

/// Date parsing and rendering used by the range composers.
pub trait DateFormatter {
    fn parse(
        &self,
        value: &str,
        input_pattern: &str,
        offset: Option<FixedOffset>,
    ) -> Option<DateTime<FixedOffset>>;

    fn render(&self, value: &DateTime<FixedOffset>, output_pattern: &str) -> String;

    /// Reformats `value`, returning it untouched when it cannot be parsed.
    fn format(&self, value: &str, options: &FormatOptions) -> String {
        match self.parse(value, &options.input_pattern, options.offset) {
            Some(parsed) => self.render(&parsed, &options.output_pattern),
            None => value.to_string(),
        }
    }
}

/// Default [`DateFormatter`] understanding moment-style tokens.
#[derive(Debug, Clone, Copy, Default)]
pub struct MomentFormatter;

impl DateFormatter for MomentFormatter {
    fn parse(
        &self,
        value: &str,
        input_pattern: &str,
        offset: Option<FixedOffset>,
    ) -> Option<DateTime<FixedOffset>> {
        let tokens = tokenize(input_pattern);
        let fields = Scanner::new(value).scan(&tokens)?;
        fields.into_datetime(offset)
    }

    fn render(&self, value: &DateTime<FixedOffset>, output_pattern: &str) -> String {
        let tokens = tokenize(output_pattern);
        let mut scratch = Vec::new();
        let items = render_items(&tokens, value, &mut scratch);
        value.format_with_items(items.iter()).to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Year,
    ShortYear,
    Month { padded: bool },
    Day { padded: bool },
    DayOfYear { padded: bool },
    Hour24 { padded: bool },
    Hour12 { padded: bool },
    Minute { padded: bool },
    Second { padded: bool },
    Fraction(usize),
    Meridiem { upper: bool },
    Offset { colon: bool },
    EpochMillis,
    EpochSeconds,
    Literal(String),
}

fn tokenize(pattern: &str) -> Vec<Token> {
    let chars: Vec<char> = pattern.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if c == '[' {
            let close = chars[i + 1..].iter().position(|&ch| ch == ']');
            if let Some(len) = close {
                let literal: String = chars[i + 1..i + 1 + len].iter().collect();
                tokens.push(Token::Literal(literal));
                i += len + 2;
                continue;
            }
        }

        let mut run = 1;
        while i + run < chars.len() && chars[i + run] == c {
            run += 1;
        }

        let token = match (c, run) {
            ('Y', 2) => Some(Token::ShortYear),
            ('Y', _) => Some(Token::Year),
            ('M', 1) => Some(Token::Month { padded: false }),
            ('M', 2) => Some(Token::Month { padded: true }),
            ('D', 1) => Some(Token::Day { padded: false }),
            ('D', 2) => Some(Token::Day { padded: true }),
            ('D', 3) => Some(Token::DayOfYear { padded: false }),
            ('D', 4) => Some(Token::DayOfYear { padded: true }),
            ('H', 1) => Some(Token::Hour24 { padded: false }),
            ('H', 2) => Some(Token::Hour24 { padded: true }),
            ('h', 1) => Some(Token::Hour12 { padded: false }),
            ('h', 2) => Some(Token::Hour12 { padded: true }),
            ('m', 1) => Some(Token::Minute { padded: false }),
            ('m', 2) => Some(Token::Minute { padded: true }),
            ('s', 1) => Some(Token::Second { padded: false }),
            ('s', 2) => Some(Token::Second { padded: true }),
            ('s', n) | ('S', n) => Some(Token::Fraction(n)),
            ('A', 1) => Some(Token::Meridiem { upper: true }),
            ('a', 1) => Some(Token::Meridiem { upper: false }),
            ('Z', 1) => Some(Token::Offset { colon: true }),
            ('Z', 2) => Some(Token::Offset { colon: false }),
            ('x', 1) => Some(Token::EpochMillis),
            ('X', 1) => Some(Token::EpochSeconds),
            _ => None,
        };

        match token {
            Some(token) => {
                tokens.push(token);
                i += run;
            }
            None => {
                match tokens.last_mut() {
                    Some(Token::Literal(lit)) => lit.push(c),
                    _ => tokens.push(Token::Literal(c.to_string())),
                }
                i += 1;
            }
        }
    }

    tokens
}

/// Chrono items for an output pattern.
///
/// Epoch millis and odd fraction widths have no chrono item, so their text is
/// computed up front and borrowed as literals.
fn render_items<'a>(
    tokens: &'a [Token],
    dt: &DateTime<FixedOffset>,
    scratch: &'a mut Vec<String>,
) -> Vec<Item<'a>> {
    for token in tokens {
        match token {
            Token::EpochMillis => scratch.push(dt.timestamp_millis().to_string()),
            Token::Fraction(digits) if !matches!(*digits, 3 | 6 | 9) => {
                let nanos = dt.format("%9f").to_string();
                scratch.push(nanos[..(*digits).min(9)].to_string());
            }
            _ => {}
        }
    }

    let scratch: &'a Vec<String> = scratch;
    let mut computed = scratch.iter();
    let mut items = Vec::with_capacity(tokens.len());
    for token in tokens {
        let pad = |padded: bool| if padded { Pad::Zero } else { Pad::None };
        match token {
            Token::Year => items.push(Item::Numeric(Numeric::Year, Pad::Zero)),
            Token::ShortYear => items.push(Item::Numeric(Numeric::YearMod100, Pad::Zero)),
            Token::Month { padded } => items.push(Item::Numeric(Numeric::Month, pad(*padded))),
            Token::Day { padded } => items.push(Item::Numeric(Numeric::Day, pad(*padded))),
            Token::DayOfYear { padded } => items.push(Item::Numeric(Numeric::Ordinal, pad(*padded))),
            Token::Hour24 { padded } => items.push(Item::Numeric(Numeric::Hour, pad(*padded))),
            Token::Hour12 { padded } => items.push(Item::Numeric(Numeric::Hour12, pad(*padded))),
            Token::Minute { padded } => items.push(Item::Numeric(Numeric::Minute, pad(*padded))),
            Token::Second { padded } => items.push(Item::Numeric(Numeric::Second, pad(*padded))),
            Token::Fraction(3) => items.extend(StrftimeItems::new("%3f")),
            Token::Fraction(6) => items.extend(StrftimeItems::new("%6f")),
            Token::Fraction(9) => items.extend(StrftimeItems::new("%9f")),
            Token::Meridiem { upper: true } => items.push(Item::Fixed(Fixed::UpperAmPm)),
            Token::Meridiem { upper: false } => items.push(Item::Fixed(Fixed::LowerAmPm)),
            Token::Offset { colon: true } => items.push(Item::Fixed(Fixed::TimezoneOffsetColon)),
            Token::Offset { colon: false } => items.push(Item::Fixed(Fixed::TimezoneOffset)),
            Token::EpochSeconds => items.push(Item::Numeric(Numeric::Timestamp, Pad::None)),
            Token::Literal(lit) => items.push(Item::Literal(lit)),
            Token::EpochMillis | Token::Fraction(_) => {
                if let Some(text) = computed.next() {
                    items.push(Item::Literal(text));
                }
            }
        }
    }
    items
}

#[derive(Debug, Default)]
struct ParsedFields {
    year: Option<i32>,
    month: Option<u32>,
    day: Option<u32>,
    day_of_year: Option<u32>,
    hour: Option<u32>,
    hour_is_12h: bool,
    pm: Option<bool>,
    minute: Option<u32>,
    second: Option<u32>,
    nanos: Option<u32>,
    offset: Option<FixedOffset>,
    epoch_millis: Option<i64>,
}

impl ParsedFields {
    fn into_datetime(self, target: Option<FixedOffset>) -> Option<DateTime<FixedOffset>> {
        let utc = FixedOffset::east_opt(0)?;

        if let Some(millis) = self.epoch_millis {
            let dt = DateTime::from_timestamp_millis(millis)?;
            return Some(dt.with_timezone(&target.unwrap_or(utc)));
        }

        let year = self.year?;
        let date = match self.day_of_year {
            Some(ordinal) => NaiveDate::from_yo_opt(year, ordinal)?,
            None => NaiveDate::from_ymd_opt(year, self.month.unwrap_or(1), self.day.unwrap_or(1))?,
        };

        let mut hour = self.hour.unwrap_or(0);
        if self.hour_is_12h {
            if hour == 0 || hour > 12 {
                return None;
            }
            hour %= 12;
        }
        if self.pm == Some(true) && hour < 12 {
            hour += 12;
        }

        let time = NaiveTime::from_hms_nano_opt(
            hour,
            self.minute.unwrap_or(0),
            self.second.unwrap_or(0),
            self.nanos.unwrap_or(0),
        )?;
        let local = NaiveDateTime::new(date, time);

        match (self.offset, target) {
            (Some(source), target) => {
                let dt = source.from_local_datetime(&local).single()?;
                Some(dt.with_timezone(&target.unwrap_or(utc)))
            }
            (None, Some(target)) => target.from_local_datetime(&local).single(),
            (None, None) => utc.from_local_datetime(&local).single(),
        }
    }
}

struct Scanner {
    chars: Vec<char>,
    pos: usize,
}

impl Scanner {
    fn new(source: &str) -> Self {
        Self {
            chars: source.trim().chars().collect(),
            pos: 0,
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn skip_to_digit(&mut self) {
        while !self.at_end() && !self.chars[self.pos].is_ascii_digit() {
            self.pos += 1;
        }
    }

    fn skip_whitespace(&mut self) {
        while !self.at_end() && self.chars[self.pos].is_whitespace() {
            self.pos += 1;
        }
    }

    fn digits(&mut self, max: usize) -> Option<(u64, usize)> {
        self.skip_to_digit();
        let start = self.pos;
        let mut value: u64 = 0;
        while !self.at_end() && self.pos - start < max && self.chars[self.pos].is_ascii_digit() {
            value = value.checked_mul(10)?.checked_add(self.chars[self.pos].to_digit(10)? as u64)?;
            self.pos += 1;
        }
        let len = self.pos - start;
        (len > 0).then_some((value, len))
    }

    /// Fractional seconds never skip ahead, so a following `-05:00` stays an offset.
    fn fraction(&mut self) -> Option<(u64, usize)> {
        if matches!(self.chars.get(self.pos), Some('.') | Some(',')) {
            self.pos += 1;
        }
        if !self.chars.get(self.pos).is_some_and(|c| c.is_ascii_digit()) {
            return None;
        }
        self.digits(9)
    }

    fn number(&mut self, max: usize) -> Option<u32> {
        self.digits(max).and_then(|(v, _)| u32::try_from(v).ok())
    }

    fn literal(&mut self, lit: &str) {
        let lit: Vec<char> = lit.chars().collect();
        if self.chars[self.pos..].starts_with(&lit) {
            self.pos += lit.len();
        }
    }

    fn meridiem(&mut self) -> Option<bool> {
        self.skip_whitespace();
        let rest: String = self.chars[self.pos..].iter().take(2).collect();
        match rest.to_ascii_lowercase().as_str() {
            "am" => {
                self.pos += 2;
                Some(false)
            }
            "pm" => {
                self.pos += 2;
                Some(true)
            }
            _ => None,
        }
    }

    fn offset(&mut self) -> Option<FixedOffset> {
        self.skip_whitespace();
        let sign = match self.chars.get(self.pos) {
            Some('Z') | Some('z') => {
                self.pos += 1;
                return FixedOffset::east_opt(0);
            }
            Some('+') => 1,
            Some('-') => -1,
            _ => return None,
        };
        self.pos += 1;
        let hours = self.digits(2)?.0 as i32;
        if self.chars.get(self.pos) == Some(&':') {
            self.pos += 1;
        }
        let minutes = self.digits(2).map(|(m, _)| m as i32).unwrap_or(0);
        FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
    }

    /// Walks the pattern, stopping quietly when the value runs out.
    fn scan(mut self, tokens: &[Token]) -> Option<ParsedFields> {
        let mut fields = ParsedFields::default();
        let mut matched = false;

        for token in tokens {
            if self.at_end() {
                break;
            }
            let hit = match token {
                Token::Literal(lit) => {
                    self.literal(lit);
                    continue;
                }
                Token::Year => self.number(4).map(|y| fields.year = Some(y as i32)),
                Token::ShortYear => self.number(2).map(|y| {
                    // Moment's pivot: 68 and below land in the 2000s.
                    let y = y as i32;
                    fields.year = Some(if y > 68 { 1900 + y } else { 2000 + y });
                }),
                Token::Month { .. } => self.number(2).map(|m| fields.month = Some(m)),
                Token::Day { .. } => self.number(2).map(|d| fields.day = Some(d)),
                Token::DayOfYear { .. } => self.number(3).map(|d| fields.day_of_year = Some(d)),
                Token::Hour24 { .. } => self.number(2).map(|h| fields.hour = Some(h)),
                Token::Hour12 { .. } => self.number(2).map(|h| {
                    fields.hour = Some(h);
                    fields.hour_is_12h = true;
                }),
                Token::Minute { .. } => self.number(2).map(|m| fields.minute = Some(m)),
                Token::Second { .. } => self.number(2).map(|s| fields.second = Some(s)),
                Token::Fraction(_) => self.fraction().map(|(value, len)| {
                    let scale = 10u64.pow((9 - len) as u32);
                    fields.nanos = u32::try_from(value * scale).ok();
                }),
                Token::Meridiem { .. } => self.meridiem().map(|pm| fields.pm = Some(pm)),
                Token::Offset { .. } => self.offset().map(|o| fields.offset = Some(o)),
                Token::EpochMillis => self
                    .digits(19)
                    .and_then(|(v, _)| i64::try_from(v).ok())
                    .map(|v| fields.epoch_millis = Some(v)),
                Token::EpochSeconds => self
                    .digits(19)
                    .and_then(|(v, _)| i64::try_from(v).ok())
                    .and_then(|v| v.checked_mul(1000))
                    .map(|v| fields.epoch_millis = Some(v)),
            };
            matched |= hit.is_some();
        }

        matched.then_some(fields)
    }
}
