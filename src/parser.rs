// parser.rs

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct CommandLine {
    pub command: String,
    pub args: Vec<String>,
}

pub fn split_words(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut cur = String::new();
    for ch in line.chars() {
        if ch.is_whitespace() {
            if !cur.is_empty() {
                tokens.push(std::mem::take(&mut cur));
            }
        } else {
            cur.push(ch);
        }
    }
    if !cur.is_empty() {
        tokens.push(cur);
    }
    tokens
}

/// Splits an input line into a lower-cased command and its arguments.
/// Blank lines yield `None`.
pub fn parse_line(line: &str) -> Option<CommandLine> {
    let mut tokens = split_words(line).into_iter();
    let command = tokens.next()?.to_lowercase();
    Some(CommandLine { command, args: tokens.collect() })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_line_is_nothing() {
        assert_eq!(parse_line(""), None);
        assert_eq!(parse_line("   \t "), None);
    }

    #[test]
    fn command_is_lowercased_args_are_kept() {
        let parsed = parse_line("  ADD 2   -3.5 ").unwrap();
        assert_eq!(parsed.command, "add");
        assert_eq!(parsed.args, vec!["2", "-3.5"]);
    }

    #[test]
    fn bare_command_has_no_args() {
        assert_eq!(
            parse_line("undo"),
            Some(CommandLine { command: "undo".into(), args: vec![] })
        );
    }
}
