//! Field normalizers: pure, total functions over possibly-absent raw
//! scalars. Each returns a canonical string, with "" meaning "no value".
//! Unparseable input degrades to "" instead of failing the record; the
//! mapper reports a warning for every value lost this way.

use chrono::{Duration, NaiveDate};
use regex::Regex;
use serde_json::Value;

/// Lebanon country calling code, without the leading `+`.
const COUNTRY_CODE: &str = "961";
/// Local trunk prefix replaced by the country code.
const TRUNK_PREFIX: char = '0';
/// Longest bare subscriber number that still gets the country code prepended.
const MAX_SUBSCRIBER_DIGITS: usize = 8;

fn raw_scalar(raw: &Value) -> Option<String> {
    match raw {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Strip a phone number down to digits and `+`, then attach the country
/// code: `961…` gets a `+`, a trunk-prefixed number swaps the prefix for
/// the code, a bare subscriber number gets the code prepended. The result
/// is formatted `+961 <subscriber>` for display. Idempotent; unparseable
/// input yields the best-effort partial cleaning rather than an error.
pub fn clean_phone(raw: &Value) -> String {
    let Some(s) = raw_scalar(raw) else {
        return String::new();
    };

    let mut cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect();

    if !cleaned.is_empty() && !cleaned.starts_with('+') {
        if cleaned.starts_with(COUNTRY_CODE) {
            cleaned.insert(0, '+');
        } else if cleaned.starts_with(TRUNK_PREFIX) {
            cleaned = format!("+{}{}", COUNTRY_CODE, &cleaned[1..]);
        } else if cleaned.len() <= MAX_SUBSCRIBER_DIGITS {
            cleaned = format!("+{}{}", COUNTRY_CODE, cleaned);
        }
    }

    let prefix = format!("+{}", COUNTRY_CODE);
    if cleaned.starts_with(&prefix) && cleaned.len() > prefix.len() {
        return format!("{} {}", prefix, &cleaned[prefix.len()..]);
    }

    cleaned
}

/// Normalize a date to `YYYY-MM-DD`. Numeric input is an Excel serial day
/// count from the 1899-12-30 epoch; textual input matches one of four
/// patterns. Two-digit years >= 50 land in the 1900s, < 50 in the 2000s.
/// When the parsed month exceeds 12 but the day does not, the two are
/// swapped (recovers MM/DD/YYYY sheets read as DD/MM/YYYY). Anything else
/// yields "".
pub fn clean_date(raw: &Value) -> String {
    if let Value::Number(n) = raw {
        if let Some(serial) = n.as_f64() {
            return excel_serial_to_iso(serial);
        }
    }

    let Some(s) = raw_scalar(raw) else {
        return String::new();
    };

    let iso = Regex::new(r"^(\d{4})-(\d{2})-(\d{2})$").unwrap();
    if iso.is_match(&s) {
        return s;
    }

    // Day-first patterns: DD/MM/YYYY, DD-MM-YYYY, D/M/YY.
    let patterns = [
        r"^(\d{2})/(\d{2})/(\d{4})$",
        r"^(\d{2})-(\d{2})-(\d{4})$",
        r"^(\d{1,2})/(\d{1,2})/(\d{2})$",
    ];

    for pattern in patterns {
        let re = Regex::new(pattern).unwrap();
        let Some(caps) = re.captures(&s) else {
            continue;
        };

        let mut day: u32 = caps[1].parse().unwrap_or(0);
        let mut month: u32 = caps[2].parse().unwrap_or(0);
        let year_raw = &caps[3];

        let year: i32 = if year_raw.len() == 2 {
            let short: i32 = year_raw.parse().unwrap_or(0);
            if short >= 50 {
                1900 + short
            } else {
                2000 + short
            }
        } else {
            year_raw.parse().unwrap_or(0)
        };

        if month > 12 && day <= 12 {
            std::mem::swap(&mut day, &mut month);
        }

        return format!("{:04}-{:02}-{:02}", year, month, day);
    }

    String::new()
}

fn excel_serial_to_iso(serial: f64) -> String {
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    let millis = (serial * 86_400_000.0) as i64;
    match epoch.checked_add_signed(Duration::milliseconds(millis)) {
        Some(datetime) => datetime.date().format("%Y-%m-%d").to_string(),
        None => String::new(),
    }
}

const MALE_SYNONYMS: &[&str] = &["male", "m", "man", "boy"];
const FEMALE_SYNONYMS: &[&str] = &["female", "f", "woman", "girl"];

pub fn clean_gender(raw: &Value) -> String {
    let Some(s) = raw_scalar(raw) else {
        return String::new();
    };
    let normalized = s.to_lowercase();
    let normalized = normalized.trim();

    if MALE_SYNONYMS.contains(&normalized) {
        return "male".to_string();
    }
    if FEMALE_SYNONYMS.contains(&normalized) {
        return "female".to_string();
    }
    String::new()
}

/// Canonicalize a delimited list to a JSON array string. Input that is
/// already a JSON array passes through verbatim; otherwise the value is
/// split on `,`/`;`/`|`, trimmed, and re-encoded.
pub fn clean_list(raw: &Value) -> String {
    let Some(s) = raw_scalar(raw) else {
        return String::new();
    };

    if s.starts_with('[') {
        if let Ok(Value::Array(_)) = serde_json::from_str::<Value>(&s) {
            return s;
        }
    }

    let items: Vec<&str> = s
        .split(|c| matches!(c, ',' | ';' | '|'))
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .collect();

    if items.is_empty() {
        String::new()
    } else {
        serde_json::to_string(&items).unwrap_or_default()
    }
}

const YES_SYNONYMS: &[&str] = &["yes", "y", "true", "1", "oui"];
const NO_SYNONYMS: &[&str] = &["no", "n", "false", "0", "non"];

/// Ternary yes/no/unknown, not a boolean: anything outside the synonym
/// sets (including absent input) yields "".
pub fn clean_yes_no(raw: &Value) -> String {
    let Some(s) = raw_scalar(raw) else {
        return String::new();
    };
    let normalized = s.to_lowercase();
    let normalized = normalized.trim();

    if YES_SYNONYMS.contains(&normalized) {
        return "yes".to_string();
    }
    if NO_SYNONYMS.contains(&normalized) {
        return "no".to_string();
    }
    String::new()
}

/// Keep digits and at most one decimal point; drops units and stray marks
/// from height/weight/body measurements.
pub fn clean_measurement(raw: &Value) -> String {
    let Some(s) = raw_scalar(raw) else {
        return String::new();
    };

    let mut out = String::new();
    let mut seen_point = false;
    for c in s.chars() {
        if c.is_ascii_digit() {
            out.push(c);
        } else if c == '.' && !seen_point {
            out.push(c);
            seen_point = true;
        }
    }
    out
}

pub fn clean_text(raw: &Value) -> String {
    raw_scalar(raw)
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

/// Title Case helper for CRM enumeration values: "dark brown" -> "Dark Brown".
pub fn capitalize_words(s: &str) -> String {
    s.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn phone_adds_country_code_to_trunk_prefixed_numbers() {
        assert_eq!(clean_phone(&json!("03 123 456")), "+961 3123456");
        assert_eq!(clean_phone(&json!("071-234-567")), "+961 71234567");
    }

    #[test]
    fn phone_adds_country_code_to_bare_subscriber_numbers() {
        assert_eq!(clean_phone(&json!("71234567")), "+961 71234567");
        assert_eq!(clean_phone(&json!(71234567)), "+961 71234567");
    }

    #[test]
    fn phone_plusses_numbers_already_carrying_the_country_code() {
        assert_eq!(clean_phone(&json!("96171234567")), "+961 71234567");
    }

    #[test]
    fn phone_cleaning_is_idempotent() {
        let once = clean_phone(&json!("+961 71234567"));
        assert_eq!(once, "+961 71234567");
        assert_eq!(clean_phone(&json!(once.clone())), once);
    }

    #[test]
    fn phone_leaves_long_foreign_numbers_alone() {
        assert_eq!(clean_phone(&json!("4915112345678")), "4915112345678");
        assert_eq!(clean_phone(&json!("+33 6 12 34 56 78")), "+33612345678");
    }

    #[test]
    fn phone_fails_open_on_garbage() {
        assert_eq!(clean_phone(&json!("call me")), "");
        assert_eq!(clean_phone(&Value::Null), "");
    }

    #[test]
    fn date_converts_excel_serial_numbers() {
        assert_eq!(clean_date(&json!(1)), "1899-12-31");
        assert_eq!(clean_date(&json!(36526)), "2000-01-01");
    }

    #[test]
    fn date_passes_iso_through() {
        assert_eq!(clean_date(&json!("2020-12-31")), "2020-12-31");
    }

    #[test]
    fn date_parses_day_first_formats() {
        assert_eq!(clean_date(&json!("31/12/2020")), "2020-12-31");
        assert_eq!(clean_date(&json!("31-12-2020")), "2020-12-31");
        assert_eq!(clean_date(&json!("13/05/99")), "1999-05-13");
    }

    #[test]
    fn date_two_digit_year_boundary() {
        assert_eq!(clean_date(&json!("01/01/50")), "1950-01-01");
        assert_eq!(clean_date(&json!("01/01/49")), "2049-01-01");
    }

    #[test]
    fn date_swaps_day_and_month_when_month_is_impossible() {
        // MM/DD/YYYY sheet read with day-first expectations.
        assert_eq!(clean_date(&json!("05/25/2020")), "2020-05-25");
    }

    #[test]
    fn date_rejects_unknown_formats() {
        assert_eq!(clean_date(&json!("December 31, 2020")), "");
        assert_eq!(clean_date(&json!("2020/12/31")), "");
        assert_eq!(clean_date(&Value::Null), "");
    }

    #[test]
    fn gender_matches_synonyms_case_insensitively() {
        assert_eq!(clean_gender(&json!("F")), "female");
        assert_eq!(clean_gender(&json!("Woman")), "female");
        assert_eq!(clean_gender(&json!("M")), "male");
        assert_eq!(clean_gender(&json!("BOY")), "male");
        assert_eq!(clean_gender(&json!("unknown")), "");
    }

    #[test]
    fn list_splits_on_common_delimiters() {
        assert_eq!(
            clean_list(&json!("English, French; Arabic")),
            r#"["English","French","Arabic"]"#
        );
        assert_eq!(clean_list(&json!("Singing|Dancing")), r#"["Singing","Dancing"]"#);
    }

    #[test]
    fn list_passes_json_arrays_through_verbatim() {
        assert_eq!(clean_list(&json!(r#"["A","B"]"#)), r#"["A","B"]"#);
    }

    #[test]
    fn list_reencodes_bracketed_non_json() {
        // Looks like JSON but is not; falls back to delimiter splitting.
        assert_eq!(clean_list(&json!("[broken, list")), r#"["[broken","list"]"#);
    }

    #[test]
    fn list_drops_empty_tokens() {
        assert_eq!(clean_list(&json!(" , ; ")), "");
        assert_eq!(clean_list(&json!("")), "");
    }

    #[test]
    fn yes_no_is_ternary() {
        assert_eq!(clean_yes_no(&json!("Y")), "yes");
        assert_eq!(clean_yes_no(&json!("Oui")), "yes");
        assert_eq!(clean_yes_no(&json!(1)), "yes");
        assert_eq!(clean_yes_no(&json!("N")), "no");
        assert_eq!(clean_yes_no(&json!(0)), "no");
        assert_eq!(clean_yes_no(&json!("")), "");
        assert_eq!(clean_yes_no(&json!("maybe")), "");
        assert_eq!(clean_yes_no(&Value::Null), "");
    }

    #[test]
    fn measurement_keeps_digits_and_one_point() {
        assert_eq!(clean_measurement(&json!("175 cm")), "175");
        assert_eq!(clean_measurement(&json!("62.5kg")), "62.5");
        assert_eq!(clean_measurement(&json!("1.2.3")), "1.23");
    }

    #[test]
    fn capitalize_words_title_cases_each_word() {
        assert_eq!(capitalize_words("mother"), "Mother");
        assert_eq!(capitalize_words("dark brown"), "Dark Brown");
        assert_eq!(capitalize_words("VERY LONG"), "Very Long");
    }
}
