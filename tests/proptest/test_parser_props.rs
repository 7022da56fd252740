//! Property-based tests for the parser

use proptest::prelude::*;
use smash::models::Command;
use smash::parser::{has_background_marker, strip_background_marker, tokenize};

proptest! {
    #[test]
    fn test_strip_is_idempotent(line in "[a-z &|>\t]{0,40}") {
        let once = strip_background_marker(&line);
        let twice = strip_background_marker(&once);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn test_stripped_line_has_no_marker(line in "[a-z0-9 &]{0,40}") {
        prop_assert!(!has_background_marker(&strip_background_marker(&line)));
    }

    #[test]
    fn test_whitespace_only_builds_nothing(line in "[ \t\n\r]{0,20}") {
        prop_assert!(tokenize(&line).is_empty());
        prop_assert_eq!(Command::parse(&line, 20).unwrap(), None);
    }

    #[test]
    fn test_tokens_never_contain_whitespace(line in "\\PC{0,60}") {
        for token in tokenize(&line) {
            prop_assert!(!token.is_empty());
            prop_assert!(!token.contains([' ', '\t', '\n', '\r']));
        }
    }

    #[test]
    fn test_parse_never_panics(line in "\\PC{0,80}") {
        let _ = Command::parse(&line, 20);
    }

    #[test]
    fn test_background_flag_matches_marker(
        words in prop::collection::vec("[a-z]{1,8}", 1..6),
        background in any::<bool>(),
    ) {
        let mut line = words.join(" ");
        if background {
            line.push_str(" &");
        }
        let command = Command::parse(&line, 20).unwrap().unwrap();
        prop_assert_eq!(command.is_background(), background);
        prop_assert_eq!(command.args(), words.as_slice());
    }
}
