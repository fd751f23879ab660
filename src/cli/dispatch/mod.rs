//! Command-line argument dispatch.
//!
//! Maps validated CLI matches to an [`Action`], resolving the redirect target
//! through [`GateSettings`] so the CLI and embedding apps share one default.

use crate::cli::actions::{Action, simulate};
use crate::cli::commands::simulate::{
    ARG_PROTECTED_ROUTE, ARG_REDIRECT_TARGET, ARG_STEPS, CMD_SIMULATE,
};
use crate::config::{GateSettings, SettingsOverrides};
use crate::gate::RoutePath;
use anyhow::{Context, Result, anyhow};

/// Map validated CLI matches to an action.
///
/// # Errors
/// Returns an error if a subcommand is missing or its arguments are invalid.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    match matches.subcommand() {
        Some((CMD_SIMULATE, sub_m)) => simulate_args(sub_m).map(Action::Simulate),
        _ => Err(anyhow!("missing subcommand")),
    }
}

fn simulate_args(matches: &clap::ArgMatches) -> Result<simulate::Args> {
    let settings = GateSettings::load(SettingsOverrides {
        redirect_target: matches.get_one::<String>(ARG_REDIRECT_TARGET).cloned(),
    });
    let config = settings
        .gate_config()
        .context("invalid --redirect-target")?;

    let protected_route = matches
        .get_one::<String>(ARG_PROTECTED_ROUTE)
        .context("missing required argument: --protected-route")?;
    let protected_route =
        RoutePath::parse(protected_route.as_str()).context("invalid --protected-route")?;

    let steps = matches
        .get_many::<String>(ARG_STEPS)
        .context("missing session steps")?
        .map(|raw| raw.parse::<simulate::Step>())
        .collect::<Result<Vec<_>>>()?;

    Ok(simulate::Args {
        config,
        protected_route,
        steps,
    })
}
