/// Extract the trailing integer id from a resource reference.
///
/// `https://swapi.info/api/people/1/` and `.../people/1` both yield `1`.
/// Anything without a `/`-prefixed trailing digit run yields `None`.
pub fn extract_id(reference: Option<&str>) -> Option<i64> {
    let reference = reference?;
    let trimmed = reference.strip_suffix('/').unwrap_or(reference);

    // Byte scan: the digit run is ASCII, so its start is always a char boundary
    let bytes = trimmed.as_bytes();
    let digits_start = bytes.iter().rposition(|b| !b.is_ascii_digit())? + 1;
    let digits = &trimmed[digits_start..];

    if digits.is_empty() || bytes[digits_start - 1] != b'/' {
        return None;
    }

    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash() {
        assert_eq!(extract_id(Some("https://swapi.info/api/people/1/")), Some(1));
        assert_eq!(extract_id(Some("https://swapi.info/api/planets/61/")), Some(61));
    }

    #[test]
    fn test_no_trailing_slash() {
        assert_eq!(extract_id(Some("https://swapi.info/api/films/6")), Some(6));
        assert_eq!(extract_id(Some("/42")), Some(42));
    }

    #[test]
    fn test_unresolvable() {
        assert_eq!(extract_id(None), None);
        assert_eq!(extract_id(Some("")), None);
        assert_eq!(extract_id(Some("/")), None);
        assert_eq!(extract_id(Some("unknown")), None);
        assert_eq!(extract_id(Some("https://swapi.info/api/people/")), None);
        assert_eq!(extract_id(Some("https://swapi.info/api/people/1//")), None);
        assert_eq!(extract_id(Some("https://swapi.info/api/r2d2")), None);
        assert_eq!(extract_id(Some("12")), None);
        assert_eq!(extract_id(Some("https://swapi.info/api/é1")), None);
        assert_eq!(extract_id(Some("https://swapi.info/api/people/é")), None);
    }

    #[test]
    fn test_multibyte_before_slash() {
        assert_eq!(extract_id(Some("https://swapi.info/api/pérsonnes/7/")), Some(7));
    }

    #[test]
    fn test_overflow_is_none() {
        assert_eq!(extract_id(Some("/people/99999999999999999999999/")), None);
    }

    #[test]
    fn test_deterministic() {
        let url = "https://swapi.info/api/starships/9/";
        assert_eq!(extract_id(Some(url)), extract_id(Some(url)));
    }
}
