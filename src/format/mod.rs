//! Date/time pattern formatting for `%{+pattern}` directives.
//!
//! Patterns use Joda-style letters (`yyyy-MM-dd'T'HH:mm:ss.SSSZ`) and are
//! always rendered in UTC.
//!
//! | Letter | Field                         | Letter | Field                        |
//! |--------|-------------------------------|--------|------------------------------|
//! | `G`    | era (`AD`/`BC`)               | `a`    | half day (`AM`/`PM`)         |
//! | `C`    | century of era                | `K`    | hour of half day (0-11)      |
//! | `Y`    | year of era                   | `h`    | clock hour of half day (1-12)|
//! | `y`    | year                          | `H`    | hour of day (0-23)           |
//! | `x`    | week year                     | `k`    | clock hour of day (1-24)     |
//! | `w`    | week of week year             | `m`    | minute                       |
//! | `e`    | day of week number (Mon = 1)  | `s`    | second                       |
//! | `E`    | day of week text              | `S`    | fraction of second           |
//! | `D`    | day of year                   | `z`    | zone name                    |
//! | `M`    | month of year                 | `Z`    | zone offset                  |
//! | `d`    | day of month                  |        |                              |
//!
//! Text between single quotes is literal; `''` is a single quote.

use chrono::{Datelike, Timelike};
use smallvec::SmallVec;

use crate::event::Timestamp;

/// Render `timestamp` using `pattern` in UTC.
pub fn format_timestamp(timestamp: &Timestamp, pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() + 8);
    Pattern::compile(pattern).write(timestamp, &mut out);
    out
}

/// A compiled date/time pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    tokens: SmallVec<[Token; 8]>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Literal(String),
    Field { letter: char, count: usize },
}

impl Pattern {
    /// Split a pattern into literal text and letter runs.
    ///
    /// Compilation never fails: an unterminated quote runs to the end of the
    /// pattern and unknown letters are kept as literal text.
    pub fn compile(pattern: &str) -> Self {
        let mut tokens: SmallVec<[Token; 8]> = SmallVec::new();
        let mut chars = pattern.chars().peekable();

        while let Some(c) = chars.next() {
            if c == '\'' {
                let mut text = String::new();
                if chars.peek() == Some(&'\'') {
                    chars.next();
                    text.push('\'');
                } else {
                    while let Some(q) = chars.next() {
                        if q == '\'' {
                            if chars.peek() == Some(&'\'') {
                                chars.next();
                                text.push('\'');
                            } else {
                                break;
                            }
                        } else {
                            text.push(q);
                        }
                    }
                }
                push_literal(&mut tokens, &text);
            } else if c.is_ascii_alphabetic() {
                let mut count = 1;
                while chars.peek() == Some(&c) {
                    chars.next();
                    count += 1;
                }
                if is_known_letter(c) {
                    tokens.push(Token::Field { letter: c, count });
                } else {
                    tracing::debug!(letter = %c, pattern, "Unknown pattern letter, emitting literally");
                    push_literal(&mut tokens, &c.to_string().repeat(count));
                }
            } else {
                let mut buf = [0u8; 4];
                push_literal(&mut tokens, c.encode_utf8(&mut buf));
            }
        }

        Self { tokens }
    }

    /// Append the rendering of `timestamp` to `out`.
    pub fn write(&self, timestamp: &Timestamp, out: &mut String) {
        let dt = timestamp.as_datetime();
        for token in &self.tokens {
            match token {
                Token::Literal(text) => out.push_str(text),
                Token::Field { letter, count } => {
                    let count = *count;
                    match *letter {
                        'G' => out.push_str(if dt.year() > 0 { "AD" } else { "BC" }),
                        'C' => pad(out, i64::from(year_of_era(dt.year()) / 100), count),
                        'Y' => year(out, i64::from(year_of_era(dt.year())), count),
                        'y' => year(out, i64::from(dt.year()), count),
                        'x' => year(out, i64::from(dt.iso_week().year()), count),
                        'w' => pad(out, i64::from(dt.iso_week().week()), count),
                        'e' => pad(out, i64::from(dt.weekday().number_from_monday()), count),
                        'E' => {
                            let text = if count >= 4 { "%A" } else { "%a" };
                            out.push_str(&dt.format(text).to_string());
                        }
                        'D' => pad(out, i64::from(dt.ordinal()), count),
                        'M' => match count {
                            1 | 2 => pad(out, i64::from(dt.month()), count),
                            3 => out.push_str(&dt.format("%b").to_string()),
                            _ => out.push_str(&dt.format("%B").to_string()),
                        },
                        'd' => pad(out, i64::from(dt.day()), count),
                        'a' => out.push_str(if dt.hour() < 12 { "AM" } else { "PM" }),
                        'K' => pad(out, i64::from(dt.hour() % 12), count),
                        'h' => pad(out, i64::from(dt.hour12().1), count),
                        'H' => pad(out, i64::from(dt.hour()), count),
                        'k' => pad(out, i64::from(if dt.hour() == 0 { 24 } else { dt.hour() }), count),
                        'm' => pad(out, i64::from(dt.minute()), count),
                        's' => pad(out, i64::from(dt.second()), count),
                        'S' => fraction(out, dt.nanosecond() % 1_000_000_000, count),
                        'z' => out.push_str(if count >= 4 { "Coordinated Universal Time" } else { "UTC" }),
                        'Z' => out.push_str(match count {
                            1 => "+0000",
                            2 => "+00:00",
                            _ => "UTC",
                        }),
                        _ => {}
                    }
                }
            }
        }
    }
}

fn is_known_letter(c: char) -> bool {
    matches!(
        c,
        'G' | 'C' | 'Y' | 'y' | 'x' | 'w' | 'e' | 'E' | 'D' | 'M' | 'd' | 'a' | 'K' | 'h' | 'H'
            | 'k' | 'm' | 's' | 'S' | 'z' | 'Z'
    )
}

fn push_literal(tokens: &mut SmallVec<[Token; 8]>, text: &str) {
    if let Some(Token::Literal(last)) = tokens.last_mut() {
        last.push_str(text);
    } else {
        tokens.push(Token::Literal(text.to_string()));
    }
}

fn year_of_era(year: i32) -> i32 {
    if year > 0 {
        year
    } else {
        1 - year
    }
}

fn pad(out: &mut String, value: i64, width: usize) {
    if value < 0 {
        out.push('-');
    }
    out.push_str(&format!("{:0width$}", value.unsigned_abs()));
}

// Two letters print the last two digits; anything else is padded to width.
fn year(out: &mut String, value: i64, count: usize) {
    if count == 2 {
        pad(out, value.rem_euclid(100), 2);
    } else {
        pad(out, value, count);
    }
}

fn fraction(out: &mut String, nanos: u32, count: usize) {
    let digits = format!("{nanos:09}");
    if count <= digits.len() {
        out.push_str(&digits[..count]);
    } else {
        out.push_str(&digits);
        out.push_str(&"0".repeat(count - digits.len()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn ts(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32, millis: u32) -> Timestamp {
        let dt = Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
            + chrono::Duration::milliseconds(i64::from(millis));
        Timestamp::new(dt)
    }

    #[test]
    fn test_year_only() {
        assert_eq!(format_timestamp(&ts(2024, 3, 9, 0, 0, 0, 0), "YYYY"), "2024");
        assert_eq!(format_timestamp(&ts(2024, 3, 9, 0, 0, 0, 0), "yy"), "24");
    }

    #[test]
    fn test_iso_like_pattern() {
        let t = ts(2024, 3, 9, 4, 5, 6, 78);
        assert_eq!(
            format_timestamp(&t, "yyyy-MM-dd'T'HH:mm:ss.SSSZ"),
            "2024-03-09T04:05:06.078+0000"
        );
        assert_eq!(
            format_timestamp(&t, "yyyy.MM.dd HH:mm:ss ZZ"),
            "2024.03.09 04:05:06 +00:00"
        );
    }

    #[test]
    fn test_text_fields() {
        let t = ts(2024, 3, 9, 15, 0, 0, 0);
        assert_eq!(format_timestamp(&t, "EEE, d MMM yyyy"), "Sat, 9 Mar 2024");
        assert_eq!(format_timestamp(&t, "EEEE MMMM"), "Saturday March");
        assert_eq!(format_timestamp(&t, "h a"), "3 PM");
        assert_eq!(format_timestamp(&t, "G z ZZZ"), "AD UTC UTC");
    }

    #[test]
    fn test_every_month_and_weekday_name() {
        let months: Vec<_> = (1..=12)
            .map(|m| format_timestamp(&ts(2023, m, 1, 0, 0, 0, 0), "MMM/MMMM"))
            .collect();
        assert_eq!(months[0], "Jan/January");
        assert_eq!(months[8], "Sep/September");
        assert_eq!(months[11], "Dec/December");

        // 2024-01-01 is a Monday
        let days: Vec<_> = (1..=7)
            .map(|d| format_timestamp(&ts(2024, 1, d, 0, 0, 0, 0), "E EEEE"))
            .collect();
        assert_eq!(days[0], "Mon Monday");
        assert_eq!(days[2], "Wed Wednesday");
        assert_eq!(days[6], "Sun Sunday");
    }

    #[test]
    fn test_hour_variants_at_midnight() {
        let t = ts(2024, 1, 1, 0, 30, 0, 0);
        assert_eq!(format_timestamp(&t, "H K h k"), "0 0 12 24");
    }

    #[test]
    fn test_week_fields() {
        // 2021-01-01 belongs to ISO week 53 of 2020
        let t = ts(2021, 1, 1, 0, 0, 0, 0);
        assert_eq!(format_timestamp(&t, "xxxx-'W'ww-e"), "2020-W53-5");
        assert_eq!(format_timestamp(&t, "DDD"), "001");
    }

    #[test]
    fn test_fraction_width() {
        let t = ts(2024, 1, 1, 0, 0, 0, 123);
        assert_eq!(format_timestamp(&t, "S"), "1");
        assert_eq!(format_timestamp(&t, "SSSSSS"), "123000");
        assert_eq!(format_timestamp(&t, "SSSSSSSSSSS"), "12300000000");
    }

    #[test]
    fn test_quotes() {
        let t = ts(2024, 1, 1, 0, 0, 0, 0);
        assert_eq!(format_timestamp(&t, "'year' yyyy"), "year 2024");
        assert_eq!(format_timestamp(&t, "yyyy''MM"), "2024'01");
        assert_eq!(format_timestamp(&t, "'it''s' yyyy"), "it's 2024");
        assert_eq!(format_timestamp(&t, "'open"), "open");
    }

    #[test]
    fn test_unknown_letters_are_literal() {
        let t = ts(2024, 1, 1, 0, 0, 0, 0);
        assert_eq!(format_timestamp(&t, "yyyy-qq"), "2024-qq");
    }

    #[test]
    fn test_empty_pattern() {
        assert_eq!(format_timestamp(&ts(2024, 1, 1, 0, 0, 0, 0), ""), "");
    }

    #[test]
    fn test_compile_merges_adjacent_literals() {
        let pattern = Pattern::compile("'a'-b");
        assert_eq!(pattern.tokens.len(), 1);
        assert_eq!(pattern.tokens[0], Token::Literal("a-b".to_string()));
    }

    #[test]
    fn test_century() {
        assert_eq!(format_timestamp(&ts(2024, 1, 1, 0, 0, 0, 0), "CC"), "20");
    }
}
