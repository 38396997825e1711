//! Raw date expressions from the `date` attribute and from pubstmt text.
//!
//! The catalogue collapses year ranges typographically (`1923-4`, `1856-78`,
//! `1920-1923`); the parser reconstructs the full end year by borrowing
//! leading digits from the start year. Anything it does not recognize yields
//! an empty list, never an error.

/// Parse a raw date expression into CSL `date-parts`: one part for a single
/// year, two for a range, empty when unparseable. Total; never panics.
pub fn parse_date(raw: &str) -> Vec<Vec<i32>> {
    let cleaned: String = raw
        .trim()
        .replace('–', "-")
        .chars()
        .filter(|c| *c != '[' && *c != ']')
        .collect();
    let cleaned = cleaned.trim();

    if let Some(year) = exact_year(cleaned) {
        return vec![vec![year]];
    }
    if cleaned.contains(',') {
        return comma_list(cleaned);
    }
    if let Some((start, end)) = hyphen_range(cleaned) {
        return vec![vec![start], vec![end]];
    }
    Vec::new()
}

/// Whether a `date` attribute value is worth handing to [`parse_date`].
/// Values with letters, `=`, `?`, `+`, runs of five or more digits, or fewer
/// than four characters are legacy irregularities the caller warns about.
pub fn date_attr_usable(raw: &str) -> bool {
    let raw = raw.trim();
    if raw.len() < 4 {
        return false;
    }
    if raw
        .chars()
        .any(|c| c.is_alphabetic() || matches!(c, '=' | '?' | '+'))
    {
        return false;
    }
    let mut digit_run = 0;
    for c in raw.chars() {
        if c.is_ascii_digit() {
            digit_run += 1;
            if digit_run >= 5 {
                return false;
            }
        } else {
            digit_run = 0;
        }
    }
    true
}

fn exact_year(s: &str) -> Option<i32> {
    if s.len() == 4 && s.chars().all(|c| c.is_ascii_digit()) {
        s.parse().ok()
    } else {
        None
    }
}

/// Exactly three digit-width shapes are recognized after the hyphen: 1, 2,
/// or 4 digits. The end year borrows the missing leading digits from the
/// start year.
fn hyphen_range(s: &str) -> Option<(i32, i32)> {
    let (left, right) = s.split_once('-')?;
    let start = exact_year(left)?;
    if right.is_empty() || !right.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let end = match right.len() {
        1 | 2 => format!("{}{}", &left[..4 - right.len()], right).parse().ok()?,
        4 => right.parse().ok()?,
        _ => return None,
    };
    Some((start, end))
}

/// A comma-separated list of years keeps only its extremes, as a range.
fn comma_list(s: &str) -> Vec<Vec<i32>> {
    let mut years = Vec::new();
    for piece in s.split(',') {
        match exact_year(piece.trim()) {
            Some(year) => years.push(year),
            None => return Vec::new(),
        }
    }
    years.sort_unstable();
    match (years.first(), years.last()) {
        (Some(&first), Some(&last)) => vec![vec![first], vec![last]],
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn four_digit_year() {
        assert_eq!(parse_date("1923"), vec![vec![1923]]);
        assert_eq!(parse_date(" [1923] "), vec![vec![1923]]);
    }

    #[test]
    fn one_digit_range_borrows_three_digits() {
        assert_eq!(parse_date("1920-3"), vec![vec![1920], vec![1923]]);
    }

    #[test]
    fn two_digit_range_borrows_two_digits() {
        assert_eq!(parse_date("1856-78"), vec![vec![1856], vec![1878]]);
    }

    #[test]
    fn four_digit_range_is_taken_whole() {
        assert_eq!(parse_date("1920-1923"), vec![vec![1920], vec![1923]]);
    }

    #[test]
    fn en_dash_is_treated_as_hyphen() {
        assert_eq!(parse_date("1920–23"), vec![vec![1920], vec![1923]]);
    }

    #[test]
    fn three_digit_remainder_is_unparseable() {
        assert_eq!(parse_date("1920-923"), Vec::<Vec<i32>>::new());
    }

    #[test]
    fn comma_list_keeps_sorted_extremes() {
        assert_eq!(parse_date("1931, 1923, 1940"), vec![vec![1923], vec![1940]]);
    }

    #[test]
    fn comma_list_with_junk_is_unparseable() {
        assert_eq!(parse_date("1931, ca. 1923"), Vec::<Vec<i32>>::new());
    }

    #[test]
    fn garbage_yields_empty() {
        assert_eq!(parse_date(""), Vec::<Vec<i32>>::new());
        assert_eq!(parse_date("192"), Vec::<Vec<i32>>::new());
        assert_eq!(parse_date("12345"), Vec::<Vec<i32>>::new());
    }

    #[test]
    fn attr_guard_rejects_legacy_irregularities() {
        assert!(date_attr_usable("1923"));
        assert!(date_attr_usable("1920-3"));
        assert!(date_attr_usable("[1923]"));
        assert!(!date_attr_usable("c1500"));
        assert!(!date_attr_usable("1923?"));
        assert!(!date_attr_usable("1923=1924"));
        assert!(!date_attr_usable("1923+"));
        assert!(!date_attr_usable("19234"));
        assert!(!date_attr_usable("192"));
    }
}
