//! Name normalisation, duration grammar and publish-time parsing.

use chrono::DateTime;

/// Longest name [`normalize_name`] will produce.
pub const MAX_NAME_LEN: usize = 200;

/// Turn a title into a filesystem-safe name.
///
/// Lowercases, maps `/`, `:` and spaces to `-`, drops parentheses, replaces
/// every non-ASCII character with `--x<hex code point>` and truncates to
/// [`MAX_NAME_LEN`] characters.
pub fn normalize_name(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    for ch in title.to_lowercase().chars() {
        match ch {
            '/' | ':' | ' ' => out.push('-'),
            '(' | ')' => {}
            c if (c as u32) > 127 => out.push_str(&format!("--x{:x}", c as u32)),
            c => out.push(c),
        }
    }
    // Everything left is ASCII, so byte length equals character count.
    out.truncate(MAX_NAME_LEN);
    out
}

/// Parse an ISO-8601 style `PT#H#M#S` duration into seconds.
///
/// Only hours, minutes and seconds are understood, each with one or two
/// digits. Anything else yields 0.
pub fn parse_duration(text: &str) -> u64 {
    parse_hms(text).unwrap_or(0)
}

/// `PT` followed by optional `<N>H`, `<N>M`, `<N>S` in that order.
fn parse_hms(text: &str) -> Option<u64> {
    let mut rest = text.strip_prefix("PT")?;
    let mut total = 0;
    for (unit, scale) in [('H', 3600), ('M', 60), ('S', 1)] {
        let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
        if digits == 0 || !rest[digits..].starts_with(unit) {
            continue;
        }
        if digits > 2 {
            return None;
        }
        total += rest[..digits].parse::<u64>().ok()? * scale;
        rest = &rest[digits + 1..];
    }
    rest.is_empty().then_some(total)
}

/// Seconds since the Unix epoch for a source publish time such as
/// `2009-02-13T23:31:30.000Z`.
pub fn parse_published(text: &str) -> Option<i64> {
    DateTime::parse_from_rfc3339(text)
        .ok()
        .map(|dt| dt.timestamp())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unicode_is_hex_escaped_per_character() {
        assert_eq!(normalize_name("おね"), "--x304a--x306d");
    }

    #[test]
    fn slashes_and_spaces() {
        assert_eq!(normalize_name("cat and/or dog"), "cat-and-or-dog");
    }

    #[test]
    fn capitalization() {
        assert_eq!(normalize_name("Awesome Movie"), "awesome-movie");
    }

    #[test]
    fn parentheses_removed() {
        assert_eq!(normalize_name("Video (something)"), "video-something");
    }

    #[test]
    fn truncated_to_max_len() {
        let long = "a".repeat(500);
        assert_eq!(normalize_name(&long).len(), MAX_NAME_LEN);

        let escaped = "é".repeat(100);
        let name = normalize_name(&escaped);
        assert_eq!(name.len(), MAX_NAME_LEN);
        assert!(name.starts_with("--xe9--xe9"));
    }

    #[test]
    fn duration_forms() {
        assert_eq!(parse_duration("PT1H45M29S"), 6329);
        assert_eq!(parse_duration("PT3M17S"), 197);
        assert_eq!(parse_duration("PT20S"), 20);
        assert_eq!(parse_duration("PT4M"), 240);
        assert_eq!(parse_duration("PT2H"), 7200);
    }

    #[test]
    fn malformed_duration_is_zero() {
        assert_eq!(parse_duration(""), 0);
        assert_eq!(parse_duration("garbage"), 0);
        assert_eq!(parse_duration("P1DT2H"), 0);
        assert_eq!(parse_duration("PT1.5S"), 0);
        assert_eq!(parse_duration("PT100S"), 0);
        assert_eq!(parse_duration("PT4S3M"), 0);
    }

    #[test]
    fn published_with_and_without_millis() {
        assert_eq!(parse_published("2009-02-13T23:31:30.000Z"), Some(1_234_567_890));
        assert_eq!(parse_published("2009-02-13T23:31:30Z"), Some(1_234_567_890));
        assert_eq!(parse_published("not a date"), None);
    }
}
