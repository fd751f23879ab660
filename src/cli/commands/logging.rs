use clap::{Arg, Command, builder::ValueParser};

pub const ARG_VERBOSITY: &str = "verbosity";
pub const ARG_LOG_FORMAT: &str = "log-format";

#[must_use]
pub fn validator_log_level() -> ValueParser {
    ValueParser::from(move |level: &str| -> std::result::Result<u8, String> {
        if let Ok(parsed) = level.parse::<u8>() {
            // Successfully parsed as a number
            if parsed <= 5 {
                return Ok(parsed);
            }
        }

        match level.to_lowercase().as_str() {
            "error" => Ok(0),
            "warn" => Ok(1),
            "info" => Ok(2),
            "debug" => Ok(3),
            "trace" => Ok(4),
            _ => Err("invalid log level".to_string()),
        }
    })
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_VERBOSITY)
                .short('v')
                .long("verbose")
                .help("Verbosity level: ERROR, WARN, INFO, DEBUG, TRACE (default: ERROR)")
                .env("SESSION_GATE_LOG_LEVEL")
                .global(true)
                .action(clap::ArgAction::Count)
                .value_parser(validator_log_level()),
        )
        .arg(
            Arg::new(ARG_LOG_FORMAT)
                .long("log-format")
                .help("Log output format, written to stderr")
                .env("SESSION_GATE_LOG_FORMAT")
                .global(true)
                .default_value("pretty")
                .value_parser(["pretty", "json"]),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command() -> Command {
        with_args(Command::new("session-gate"))
    }

    #[test]
    fn test_check_log_level_env() {
        // loop cover all possible value_parse
        let levels = ["error", "warn", "info", "debug", "trace"];
        for (index, &level) in levels.iter().enumerate() {
            temp_env::with_vars([("SESSION_GATE_LOG_LEVEL", Some(level))], || {
                let matches = command().get_matches_from(vec!["session-gate"]);
                assert_eq!(
                    matches.get_one::<u8>(ARG_VERBOSITY).copied(),
                    u8::try_from(index).ok()
                );
            });
        }
    }

    #[test]
    fn test_check_log_level_verbosity() {
        for count in 0..5_u8 {
            temp_env::with_vars([("SESSION_GATE_LOG_LEVEL", None::<String>)], || {
                let mut args = vec!["session-gate".to_string()];
                if count > 0 {
                    args.push(format!("-{}", "v".repeat(usize::from(count))));
                }

                let matches = command().get_matches_from(args);

                assert_eq!(matches.get_one::<u8>(ARG_VERBOSITY).copied(), Some(count));
            });
        }
    }

    #[test]
    fn test_log_format_env() {
        temp_env::with_vars([("SESSION_GATE_LOG_FORMAT", Some("json"))], || {
            let matches = command().get_matches_from(vec!["session-gate"]);
            assert_eq!(
                matches.get_one::<String>(ARG_LOG_FORMAT).map(String::as_str),
                Some("json")
            );
        });
    }

    #[test]
    fn test_log_format_rejects_unknown() {
        temp_env::with_vars([("SESSION_GATE_LOG_FORMAT", None::<String>)], || {
            let result =
                command().try_get_matches_from(vec!["session-gate", "--log-format", "xml"]);
            assert!(result.is_err());
        });
    }
}
