//! Legacy key codes, as used in key maps. Letters and digits map to their
//! uppercase ASCII value; punctuation uses the US-layout OEM codes.

pub const SPACE: u32 = 32;
pub const SEMICOLON: u32 = 186;
pub const EQUALS: u32 = 187;
pub const COMMA: u32 = 188;
pub const MINUS: u32 = 189;
pub const PERIOD: u32 = 190;
pub const SLASH: u32 = 191;
pub const BACKTICK: u32 = 192;
pub const OPEN_BRACKET: u32 = 219;
pub const BACKSLASH: u32 = 220;
pub const CLOSE_BRACKET: u32 = 221;
pub const QUOTE: u32 = 222;

/// Key code of the key that types `c` on a US layout, ignoring shift.
pub fn from_char(c: char) -> Option<u32> {
    match c {
        'a'..='z' => Some(c.to_ascii_uppercase() as u32),
        'A'..='Z' | '0'..='9' => Some(c as u32),
        ' ' => Some(SPACE),
        ';' | ':' => Some(SEMICOLON),
        '=' | '+' => Some(EQUALS),
        ',' | '<' => Some(COMMA),
        '-' | '_' => Some(MINUS),
        '.' | '>' => Some(PERIOD),
        '/' | '?' => Some(SLASH),
        '`' | '~' => Some(BACKTICK),
        '[' | '{' => Some(OPEN_BRACKET),
        '\\' | '|' => Some(BACKSLASH),
        ']' | '}' => Some(CLOSE_BRACKET),
        '\'' | '"' => Some(QUOTE),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::KeyboardConfig;

    #[test]
    fn reference_key_map_matches_typed_characters() {
        for key in KeyboardConfig::default().keys {
            let c = key.display_char.chars().next().unwrap();
            assert_eq!(from_char(c), Some(key.physical_code), "{c}");
        }
    }

    #[test]
    fn shift_does_not_change_the_code() {
        assert_eq!(from_char('A'), from_char('a'));
        assert_eq!(from_char(':'), from_char(';'));
        assert_eq!(from_char('"'), from_char('\''));
    }

    #[test]
    fn unknown_characters_have_no_code() {
        assert_eq!(from_char('é'), None);
        assert_eq!(from_char('\n'), None);
    }
}
