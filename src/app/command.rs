//! Command parsing for the command line

/// Parsed command from the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Quit the application: :q or :quit
    Quit,
    /// Show help: :help or :h
    Help,
    /// Search content: /pattern
    Search(String),
    /// Jump to a chapter, section or topic: :goto <id>
    Goto(String),
    /// Next chapter: :next
    NextChapter,
    /// Previous chapter: :prev
    PrevChapter,
    /// Toggle light/dark mode: :theme
    ToggleTheme,
    /// Show or hide the sidebar: :sidebar
    ToggleSidebar,
    /// Remove search highlights: :nohl
    ClearSearch,
    /// Clear message: (empty command)
    Nop,
}

/// Result of parsing a command
#[derive(Debug)]
pub enum ParseResult {
    /// Successfully parsed command
    Ok(Command),
    /// Unknown command
    UnknownCommand(String),
    /// Command needs an argument
    MissingArgument(String),
}

/// Parse a command string (without the leading :)
pub fn parse_command(input: &str) -> ParseResult {
    let input = input.trim();
    let (name, args) = match input.split_once(char::is_whitespace) {
        Some((name, args)) => (name, args.trim()),
        None => (input, ""),
    };

    let command = match name.to_lowercase().as_str() {
        "" => Command::Nop,
        "quit" | "q" => Command::Quit,
        "help" | "h" | "?" => Command::Help,
        "goto" | "g" if args.is_empty() => {
            return ParseResult::MissingArgument("goto".to_string());
        }
        "goto" | "g" => Command::Goto(args.to_string()),
        "next" | "n" => Command::NextChapter,
        "prev" | "p" => Command::PrevChapter,
        "theme" | "dark" | "light" => Command::ToggleTheme,
        "sidebar" | "sb" => Command::ToggleSidebar,
        "nohl" | "noh" | "clear" => Command::ClearSearch,
        _ => return ParseResult::UnknownCommand(name.to_string()),
    };
    ParseResult::Ok(command)
}

/// Parse a search query (without the leading /)
pub fn parse_search(input: &str) -> Command {
    Command::Search(input.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_quit_command() {
        assert!(matches!(parse_command("q"), ParseResult::Ok(Command::Quit)));
        assert!(matches!(parse_command("quit"), ParseResult::Ok(Command::Quit)));
        assert!(matches!(parse_command("Q"), ParseResult::Ok(Command::Quit)));
    }

    #[test]
    fn parse_help_command() {
        assert!(matches!(parse_command("help"), ParseResult::Ok(Command::Help)));
        assert!(matches!(parse_command("?"), ParseResult::Ok(Command::Help)));
    }

    #[test]
    fn parse_goto_command() {
        match parse_command("goto  #ch2-intro ") {
            ParseResult::Ok(Command::Goto(id)) => assert_eq!(id, "#ch2-intro"),
            other => panic!("Expected Goto command, got {:?}", other),
        }
    }

    #[test]
    fn parse_goto_missing_arg() {
        assert!(matches!(parse_command("goto"), ParseResult::MissingArgument(_)));
    }

    #[test]
    fn parse_chapter_commands() {
        assert!(matches!(parse_command("next"), ParseResult::Ok(Command::NextChapter)));
        assert!(matches!(parse_command("prev"), ParseResult::Ok(Command::PrevChapter)));
    }

    #[test]
    fn parse_toggles() {
        assert!(matches!(parse_command("theme"), ParseResult::Ok(Command::ToggleTheme)));
        assert!(matches!(parse_command("sb"), ParseResult::Ok(Command::ToggleSidebar)));
        assert!(matches!(parse_command("nohl"), ParseResult::Ok(Command::ClearSearch)));
    }

    #[test]
    fn parse_empty_is_nop() {
        assert!(matches!(parse_command("   "), ParseResult::Ok(Command::Nop)));
    }

    #[test]
    fn parse_unknown_command() {
        match parse_command("frobnicate now") {
            ParseResult::UnknownCommand(cmd) => assert_eq!(cmd, "frobnicate"),
            other => panic!("Expected UnknownCommand, got {:?}", other),
        }
    }

    #[test]
    fn parse_search_keeps_raw_term() {
        assert_eq!(parse_search(" foo "), Command::Search(" foo ".to_string()));
    }
}
