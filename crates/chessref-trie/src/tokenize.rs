//! Splitting stored move text into tokens.

/// Split a move list such as `"d4 d5 c4 c6"` or `"1. e4 e5 2. Nf3 1-0"` into
/// moves. Move numbers (`1.`, `12...`) and game results are dropped.
pub fn tokenize(moves: &str) -> Vec<&str> {
    moves
        .split_whitespace()
        .filter(|t| !is_move_number(t) && !is_result(t))
        .collect()
}

fn is_move_number(token: &str) -> bool {
    let digits = token.trim_end_matches('.');
    digits.len() < token.len() && !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

fn is_result(token: &str) -> bool {
    matches!(token, "1-0" | "0-1" | "1/2-1/2" | "*")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_move_lists_split_on_whitespace() {
        assert_eq!(tokenize("d4 d5  c4\tc6"), vec!["d4", "d5", "c4", "c6"]);
        assert!(tokenize("   ").is_empty());
    }

    #[test]
    fn numbered_notation_is_cleaned() {
        assert_eq!(
            tokenize("1. e4 e5 2. Nf3 Nc6 3... a6 1-0"),
            vec!["e4", "e5", "Nf3", "Nc6", "a6"]
        );
    }
}
