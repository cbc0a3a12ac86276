use crate::error::{AppError, AppResult};

/// A director or actor name split into its parts.
///
/// The first whitespace-separated token is the first name and everything after
/// it is the last name, so "Guillermo del Toro" keeps its full surname.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PersonName {
    pub first: String,
    pub last: String,
    pub full: String,
}

impl PersonName {
    pub fn parse(raw: &str) -> AppResult<Self> {
        let mut tokens = raw.split_whitespace();
        let (Some(first), Some(rest)) = (tokens.next(), tokens.next()) else {
            return Err(AppError::MalformedName { name: raw.trim().to_string() });
        };

        let last = std::iter::once(rest).chain(tokens).collect::<Vec<_>>().join(" ");
        let full = format!("{first} {last}");

        Ok(Self { first: first.to_string(), last, full })
    }
}

/// Splits a comma separated field such as "Jane Doe, John Smith" into names.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',').map(str::trim).filter(|s| !s.is_empty()).map(str::to_string).collect()
}

/// Parses every name up front so a malformed entry fails before any write.
pub fn parse_all(names: &[String]) -> AppResult<Vec<PersonName>> {
    names.iter().map(|n| PersonName::parse(n)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_comma_separated_names() {
        assert_eq!(split_list("Jane Doe, John Smith"), vec!["Jane Doe", "John Smith"]);
        assert_eq!(split_list("Jane Doe,John Smith , "), vec!["Jane Doe", "John Smith"]);
        assert!(split_list("").is_empty());
    }

    #[test]
    fn parses_first_and_last_name() {
        let name = PersonName::parse("  Jane   Doe ").unwrap();
        assert_eq!(name.first, "Jane");
        assert_eq!(name.last, "Doe");
        assert_eq!(name.full, "Jane Doe");
    }

    #[test]
    fn keeps_multi_word_surnames() {
        let name = PersonName::parse("Guillermo del Toro").unwrap();
        assert_eq!(name.first, "Guillermo");
        assert_eq!(name.last, "del Toro");
        assert_eq!(name.full, "Guillermo del Toro");
    }

    #[test]
    fn single_token_is_malformed() {
        let err = PersonName::parse("Madonna").unwrap_err();
        assert!(matches!(err, AppError::MalformedName { ref name } if name == "Madonna"));

        assert!(matches!(PersonName::parse("   "), Err(AppError::MalformedName { .. })));
    }

    #[test]
    fn parse_all_stops_at_first_malformed_name() {
        let names = vec!["Jane Doe".to_string(), "Cher".to_string()];
        assert!(matches!(parse_all(&names), Err(AppError::MalformedName { .. })));
    }
}
