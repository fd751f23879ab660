pub mod logging;
pub mod simulate;

use clap::{
    ColorChoice, Command,
    builder::styling::{AnsiColor, Effects, Styles},
};

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let command = Command::new("session-gate")
        .about("Session-aware access gate for protected regions")
        .version(env!("CARGO_PKG_VERSION"))
        .color(ColorChoice::Auto)
        .styles(styles)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(simulate::command());

    logging::with_args(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let command = new();

        assert_eq!(command.get_name(), "session-gate");
        assert_eq!(
            command.get_about().map(ToString::to_string),
            Some("Session-aware access gate for protected regions".to_string())
        );
        assert_eq!(
            command.get_version().map(ToString::to_string),
            Some(env!("CARGO_PKG_VERSION").to_string())
        );
    }

    #[test]
    fn test_debug_assertions() {
        new().debug_assert();
    }

    #[test]
    fn test_subcommand_required() {
        let result = new().try_get_matches_from(vec!["session-gate"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_verbosity_after_subcommand() {
        temp_env::with_vars([("SESSION_GATE_LOG_LEVEL", None::<String>)], || {
            let matches = new().get_matches_from(vec!["session-gate", "simulate", "-vv", "unknown"]);
            assert_eq!(
                matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                Some(2)
            );
        });
    }
}
