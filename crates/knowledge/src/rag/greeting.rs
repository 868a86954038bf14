//! Greeting detection.

use regex::Regex;
use std::sync::LazyLock;

static GREETING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:hi|hello|hey|good morning|good afternoon|good evening|how are you|what['’]s up|greetings|hallo|guten morgen|guten tag|guten abend|servus|moin|grüß gott)",
    )
    .expect("greeting pattern is valid")
});

/// Whether the text opens with a greeting, in English or German.
///
/// Case-insensitive and tolerant of surrounding whitespace; anything may
/// follow the greeting itself.
pub fn is_greeting(text: &str) -> bool {
    GREETING.is_match(&text.trim().to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_greetings() {
        for text in [
            "Hello there",
            "hi",
            "  HEY, anyone home?",
            "Good morning!",
            "what's up",
            "Guten Tag zusammen",
            "Moin moin",
            "Grüß Gott",
            "Moinsen!",
            "Hiya",
            "Hellooo everyone",
        ] {
            assert!(is_greeting(text), "expected greeting: {:?}", text);
        }
    }

    #[test]
    fn test_not_greetings() {
        for text in [
            "What is in document X?",
            "Who is the CEO of Apple?",
            "Say hello to the team",
            "",
            "   ",
        ] {
            assert!(!is_greeting(text), "expected no greeting: {:?}", text);
        }
    }
}
