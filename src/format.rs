use std::borrow::Borrow;
use std::sync::LazyLock;

use regex::Regex;

pub const DEFAULT_DELIMITER: char = '.';

// Store markup flagging languages that ship with full audio, and the footnote
// explaining the flag.
static AUDIO_MARKERS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<strong>\*</strong>|<br>languages with full audio support").unwrap()
});

/// Joins a multi-valued field with `delimiter`, without a trailing delimiter.
pub fn join_list<S: Borrow<str>>(items: &[S], delimiter: char) -> String {
    items.join(&*delimiter.encode_utf8(&mut [0; 4]))
}

/// Flattens the store's supported-languages HTML fragment into a single
/// delimiter-separated token list.
///
/// A trailing comma in the raw fragment becomes a trailing delimiter; it is not
/// trimmed.
pub fn normalize_supported_languages(raw: &str, delimiter: char) -> String {
    AUDIO_MARKERS
        .replace_all(raw, "")
        .chars()
        .map(|ch| if ch == ',' { delimiter } else { ch })
        .filter(|ch| *ch != ' ')
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_genres_without_trailing_delimiter() {
        let genres = vec!["Action".to_string(), "Indie".to_string()];
        assert_eq!(join_list(&genres, '.'), "Action.Indie");
    }

    #[test]
    fn join_empty_list() {
        let genres: Vec<String> = Vec::new();
        assert_eq!(join_list(&genres, '.'), "");
    }

    #[test]
    fn join_single_item() {
        assert_eq!(join_list(&["Valve"], '|'), "Valve");
    }

    #[test]
    fn normalize_audio_markers() {
        let raw = "English<strong>*</strong>, Japanese<strong>*</strong>,<br>languages with full audio support";
        assert_eq!(normalize_supported_languages(raw, '.'), "English.Japanese.");
    }

    #[test]
    fn normalize_plain_list_with_custom_delimiter() {
        let raw = "English, French, Simplified Chinese";
        assert_eq!(
            normalize_supported_languages(raw, '/'),
            "English/French/SimplifiedChinese"
        );
    }

    #[test]
    fn normalize_strips_spaces_after_mapping_commas() {
        let normalized = normalize_supported_languages("English, Japanese", ' ');
        assert_eq!(normalized, "EnglishJapanese");
        assert!(!normalized.contains(' '));
    }

    #[test]
    fn join_multibyte_delimiter() {
        assert_eq!(join_list(&["Action", "Indie"], '・'), "Action・Indie");
    }

    #[test]
    fn normalize_empty() {
        assert_eq!(normalize_supported_languages("", '.'), "");
    }
}
