use clap::{Arg, Command};

pub const CMD_SIMULATE: &str = "simulate";
pub const ARG_REDIRECT_TARGET: &str = "redirect-target";
pub const ARG_PROTECTED_ROUTE: &str = "protected-route";
pub const ARG_STEPS: &str = "steps";

#[must_use]
pub fn command() -> Command {
    Command::new(CMD_SIMULATE)
        .about("Replay session changes through a gated region and print each outcome")
        .arg(
            Arg::new(ARG_REDIRECT_TARGET)
                .short('r')
                .long("redirect-target")
                .help("Where unauthenticated sessions are sent (in-app path)")
                .env("SESSION_GATE_REDIRECT_TARGET"),
        )
        .arg(
            Arg::new(ARG_PROTECTED_ROUTE)
                .long("protected-route")
                .help("Route the protected region is mounted on")
                .default_value("/dashboard"),
        )
        .arg(
            Arg::new(ARG_STEPS)
                .help("Session steps: unknown | unauthenticated | authenticated:<id>[:key=value;...] | fail[:reason] | expire")
                .long_help(
                    "Session steps applied in order after mounting. `unknown` invalidates the \
                     session, `authenticated:<id>` signs a subject in (attributes are `;`-separated \
                     `key=value` pairs, values parsed as JSON when possible), `unauthenticated` \
                     signs out, `fail` and `expire` settle a failed resolution.",
                )
                .num_args(1..)
                .required(true),
        )
}
