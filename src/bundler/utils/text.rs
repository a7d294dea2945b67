//! String normalization for values read from configuration and tool output.
//!
//! Each helper strips one character class from both ends of a string.
//! Empty input, or input made only of stripped characters, yields `""`.

const SPACE: &[char] = &[' '];
const QUOTE: &[char] = &['\'', '"'];
const NEWLINE: &[char] = &['\n'];
const NEWLINE_SPACE: &[char] = &['\n', ' '];
const QUOTE_SPACE: &[char] = &['\'', '"', ' '];

fn strip_class<'a>(line: &'a str, class: &[char]) -> &'a str {
    line.trim_matches(|c: char| class.contains(&c))
}

/// Strips spaces.
pub fn clean_space(line: &str) -> String {
    strip_class(line, SPACE).to_string()
}

/// Strips single and double quotes.
pub fn clean_quote(line: &str) -> String {
    strip_class(line, QUOTE).to_string()
}

/// Strips `\n`.
pub fn clean_newline(line: &str) -> String {
    strip_class(line, NEWLINE).to_string()
}

/// Strips `\n` and spaces.
pub fn clean_newline_space(line: &str) -> String {
    strip_class(line, NEWLINE_SPACE).to_string()
}

/// Strips quotes and spaces.
pub fn clean_quote_space(line: &str) -> String {
    strip_class(line, QUOTE_SPACE).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_space_keeps_inner_spaces() {
        assert_eq!(clean_space("  a b  "), "a b");
        assert_eq!(clean_space("\ta "), "\ta");
    }

    #[test]
    fn test_clean_quote_mixed() {
        assert_eq!(clean_quote("'\"value\"'"), "value");
        assert_eq!(clean_quote("\"it's\""), "it's");
    }

    #[test]
    fn test_clean_newline() {
        assert_eq!(clean_newline("\n\n2023.1.2\n"), "2023.1.2");
        assert_eq!(clean_newline(" x\n"), " x");
    }

    #[test]
    fn test_combined_classes() {
        assert_eq!(clean_newline_space(" \n2023.1 \n"), "2023.1");
        assert_eq!(clean_quote_space(" '600' "), "600");
    }

    #[test]
    fn test_empty_and_all_matching_input() {
        assert_eq!(clean_space(""), "");
        assert_eq!(clean_space("    "), "");
        assert_eq!(clean_quote("''\"\""), "");
        assert_eq!(clean_newline_space("\n \n"), "");
    }
}
