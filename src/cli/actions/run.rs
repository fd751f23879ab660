use crate::cli::actions::{Action, simulate};
use anyhow::Result;

/// Execute the provided action.
// Single dispatch point for all CLI actions.
/// # Errors
/// Returns an error if the action fails.
pub async fn execute(action: Action) -> Result<()> {
    match action {
        Action::Simulate(args) => simulate::execute(args).await,
    }
}
