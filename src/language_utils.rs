use anyhow::{Result, anyhow};
use isolang::Language;
use std::ops::RangeInclusive;

/// Language utilities for the fixed translation target
///
/// Every run translates into a single language. The script heuristic below is
/// how already-translated text is recognised without a round trip to the backend.
/// ISO 639-1 code of the translation target
pub const TARGET_LANGUAGE: &str = "ko";

/// Number of leading characters inspected by the script heuristic
pub const SCRIPT_PROBE_CHARS: usize = 20;

/// Hangul Syllables
const HANGUL_SYLLABLES: RangeInclusive<char> = '\u{AC00}'..='\u{D7AF}';

/// Conjoining Hangul Jamo
const HANGUL_JAMO: RangeInclusive<char> = '\u{1100}'..='\u{11FF}';

/// Hangul Compatibility Jamo, e.g. the lone consonants in "ㅋㅋㅋ"
const HANGUL_COMPATIBILITY_JAMO: RangeInclusive<char> = '\u{3130}'..='\u{318F}';

/// Whether a character belongs to one of the target language's script blocks
pub fn is_target_script_char(c: char) -> bool {
    HANGUL_SYLLABLES.contains(&c) || HANGUL_JAMO.contains(&c) || HANGUL_COMPATIBILITY_JAMO.contains(&c)
}

/// Whether any of the first `SCRIPT_PROBE_CHARS` characters is in the target script
pub fn looks_like_target_script(text: &str) -> bool {
    text.chars()
        .take(SCRIPT_PROBE_CHARS)
        .any(is_target_script_char)
}

/// Validate if a language code is a valid ISO 639-1 or ISO 639-3 code
pub fn validate_language_code(code: &str) -> Result<Language> {
    let normalized_code = code.trim().to_lowercase();

    let language = match normalized_code.len() {
        2 => Language::from_639_1(&normalized_code),
        3 => Language::from_639_3(&normalized_code),
        _ => None,
    };

    language.ok_or_else(|| anyhow!("Invalid language code: {}", code))
}

/// Get the English name of a language from its code
pub fn get_language_name(code: &str) -> Result<String> {
    let language = validate_language_code(code)?;
    Ok(language.to_name().to_string())
}

/// English name of the target language, used in log lines
pub fn target_language_name() -> String {
    get_language_name(TARGET_LANGUAGE).unwrap_or_else(|_| TARGET_LANGUAGE.to_string())
}
