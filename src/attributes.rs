use serde::Serialize;

/// Colors recognized in captions, in match-priority order.
const COLORS: [&str; 10] = [
    "red", "blue", "green", "black", "white", "yellow", "pink", "orange", "brown", "gray",
];

/// Clothing terms recognized in captions, in match-priority order.
const CLOTHING_TYPES: [&str; 9] = [
    "dress", "shirt", "jacket", "jeans", "pants", "skirt", "hoodie", "coat", "shoes",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Attributes {
    pub color: Option<&'static str>,
    #[serde(rename = "type")]
    pub clothing: Option<&'static str>,
}

/// Scan a caption for the first matching color and clothing term.
///
/// Matching is a case-insensitive substring test, so "a Red sundress" yields
/// both `red` and `dress`. Captions mentioning none of the vocabulary map to
/// `None` on both fields.
#[must_use]
pub fn extract(caption: &str) -> Attributes {
    let caption = caption.to_lowercase();

    Attributes {
        color: COLORS.iter().find(|color| caption.contains(*color)).copied(),
        clothing: CLOTHING_TYPES
            .iter()
            .find(|kind| caption.contains(*kind))
            .copied(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_color_and_clothing() {
        let attributes = extract("A woman wearing a red dress");

        assert_eq!(attributes.color, Some("red"));
        assert_eq!(attributes.clothing, Some("dress"));
    }

    #[test]
    fn test_no_match_yields_none() {
        let attributes = extract("A photo of a building");

        assert_eq!(attributes.color, None);
        assert_eq!(attributes.clothing, None);
    }

    #[test]
    fn test_first_listed_term_wins() {
        // "blue" precedes "black" in the vocabulary even though "black"
        // appears first in the caption.
        let attributes = extract("a black jacket over blue jeans");

        assert_eq!(attributes.color, Some("blue"));
        assert_eq!(attributes.clothing, Some("jacket"));
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let attributes = extract("A PINK HOODIE");

        assert_eq!(attributes.color, Some("pink"));
        assert_eq!(attributes.clothing, Some("hoodie"));
    }

    #[test]
    fn test_matches_inside_words() {
        // Substring semantics: "sundress" still counts as a dress.
        assert_eq!(extract("a grayish sundress").clothing, Some("dress"));
    }

    #[test]
    fn test_serializes_with_type_key() {
        let json = serde_json::to_value(extract("red shoes")).unwrap();

        assert_eq!(json["color"], "red");
        assert_eq!(json["type"], "shoes");
    }
}
