//! Replays session steps through a provider and a gated region backed by an
//! in-memory history, printing one JSON line per gate transition followed by
//! the final history.

use crate::error::SessionError;
use crate::gate::{AccessGate, GateConfig, GateTransition, ProtectedRegion, RegionView, RoutePath};
use crate::navigation::MemoryHistory;
use crate::session::{SessionProvider, Subject};
use anyhow::{Context, Result, anyhow};
use serde_json::{Value, json};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;
use tracing::{debug, instrument};

#[derive(Debug)]
pub struct Args {
    pub config: GateConfig,
    pub protected_route: RoutePath,
    pub steps: Vec<Step>,
}

/// One change applied to the session provider.
#[derive(Clone, Debug, PartialEq)]
pub enum Step {
    Invalidate,
    SignOut,
    Authenticate(Subject),
    Fail(String),
    Expire,
}

impl FromStr for Step {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> Result<Self> {
        let (kind, rest) = match raw.split_once(':') {
            Some((kind, rest)) => (kind, Some(rest)),
            None => (raw, None),
        };

        match (kind.trim().to_ascii_lowercase().as_str(), rest) {
            ("unknown" | "invalidate", None) => Ok(Self::Invalidate),
            ("unauthenticated" | "sign-out", None) => Ok(Self::SignOut),
            ("expire", None) => Ok(Self::Expire),
            ("fail", reason) => Ok(Self::Fail(
                reason.map_or_else(|| "resolution failed".to_string(), str::to_string),
            )),
            ("authenticated", Some(rest)) => parse_subject(rest).map(Self::Authenticate),
            ("authenticated", None) => Err(anyhow!("step {raw:?} is missing a subject id")),
            _ => Err(anyhow!("unknown step {raw:?}")),
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Invalidate => f.write_str("unknown"),
            Self::SignOut => f.write_str("unauthenticated"),
            Self::Authenticate(subject) => write!(f, "authenticated:{}", subject.subject_id),
            Self::Fail(reason) => write!(f, "fail:{reason}"),
            Self::Expire => f.write_str("expire"),
        }
    }
}

fn parse_subject(raw: &str) -> Result<Subject> {
    let (id, attributes) = match raw.split_once(':') {
        Some((id, attributes)) => (id, Some(attributes)),
        None => (raw, None),
    };
    let id = id.trim();
    if id.is_empty() {
        return Err(anyhow!("subject id must not be empty"));
    }

    let mut subject = Subject::new(id);
    for pair in attributes
        .into_iter()
        .flat_map(|list| list.split(';'))
        .filter(|pair| !pair.trim().is_empty())
    {
        let (key, value) = pair
            .split_once('=')
            .with_context(|| format!("attribute {pair:?} is not key=value"))?;
        let value = serde_json::from_str::<Value>(value.trim())
            .unwrap_or_else(|_| Value::String(value.trim().to_string()));
        subject = subject.with_attribute(key.trim(), value);
    }

    Ok(subject)
}

/// Records what the region rendered; the simulation has no real UI.
#[derive(Default)]
struct RecordingView {
    frames: Vec<String>,
}

impl RegionView for RecordingView {
    fn show_loading(&mut self) {
        self.frames.push("loading".to_string());
    }

    fn render_protected(&mut self, subject: &Subject) {
        self.frames.push(format!("content:{}", subject.subject_id));
    }
}

/// Runs the simulation and returns the lines it prints.
///
/// # Errors
/// Returns an error if an output line cannot be serialized.
#[instrument(skip_all, fields(steps = args.steps.len()))]
pub async fn simulate(args: Args) -> Result<Vec<String>> {
    let provider = SessionProvider::new();
    let transitions: Rc<RefCell<Vec<GateTransition>>> = Rc::default();

    let sink = Rc::clone(&transitions);
    let gate = AccessGate::new(args.config)
        .with_transition_hook(move |event| sink.borrow_mut().push(event.clone()));

    let mut history = MemoryHistory::new(RoutePath::parse("/")?);
    history.push(args.protected_route);
    let region =
        ProtectedRegion::mount_with_gate(&provider, gate, history, RecordingView::default());

    for step in &args.steps {
        debug!(%step, "applying step");
        match step {
            Step::Invalidate => provider.invalidate(),
            Step::SignOut => provider.sign_out(),
            Step::Authenticate(subject) => provider.authenticate(subject.clone()),
            Step::Fail(reason) => {
                let reason = reason.clone();
                provider
                    .resolve(async move { Err(SessionError::Rejected(reason)) })
                    .await;
            }
            Step::Expire => {
                provider.resolve(async { Err(SessionError::Expired) }).await;
            }
        }
    }

    let mut lines = Vec::new();
    for transition in transitions.borrow().iter() {
        lines.push(serde_json::to_string(transition)?);
    }

    let history = region.navigator();
    lines.push(serde_json::to_string(&json!({
        "history": history.entries(),
        "current": history.current(),
        "frames": region.view().frames,
    }))?);

    Ok(lines)
}

/// Execute the simulate action.
/// # Errors
/// Returns an error if the simulation fails.
pub async fn execute(args: Args) -> Result<()> {
    for line in simulate(args).await? {
        println!("{line}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(steps: &[&str]) -> Result<Args> {
        Ok(Args {
            config: GateConfig::redirect_to("/auth")?,
            protected_route: RoutePath::parse("/dashboard")?,
            steps: steps
                .iter()
                .map(|step| step.parse())
                .collect::<Result<Vec<Step>>>()?,
        })
    }

    fn outcomes(lines: &[String]) -> Result<Vec<Value>> {
        let mut outcomes = Vec::new();
        for line in &lines[..lines.len() - 1] {
            let value: Value = serde_json::from_str(line)?;
            outcomes.push(value["outcome"].clone());
        }
        Ok(outcomes)
    }

    #[test]
    fn parses_steps() -> Result<()> {
        assert_eq!("unknown".parse::<Step>()?, Step::Invalidate);
        assert_eq!("Unauthenticated".parse::<Step>()?, Step::SignOut);
        assert_eq!("expire".parse::<Step>()?, Step::Expire);
        assert_eq!("fail".parse::<Step>()?, Step::Fail("resolution failed".into()));
        assert_eq!("fail:revoked".parse::<Step>()?, Step::Fail("revoked".into()));
        assert_eq!(
            "authenticated:u1:role=admin;org=7".parse::<Step>()?,
            Step::Authenticate(
                Subject::new("u1")
                    .with_attribute("role", "admin")
                    .with_attribute("org", 7)
            )
        );
        Ok(())
    }

    #[test]
    fn rejects_malformed_steps() {
        for raw in ["", "authenticated", "authenticated:", "authenticated:u1:role", "sideways"] {
            assert!(raw.parse::<Step>().is_err(), "{raw:?} should not parse");
        }
    }

    #[test]
    fn step_display_round_trips_kind() -> Result<()> {
        let step: Step = "authenticated:u1".parse()?;
        assert_eq!(step.to_string(), "authenticated:u1");
        Ok(())
    }

    #[tokio::test]
    async fn unknown_then_authenticated() -> Result<()> {
        let lines = simulate(args(&["authenticated:u1"])?).await?;
        assert_eq!(
            outcomes(&lines)?,
            vec![
                json!({"outcome": "show_loading_indicator"}),
                json!({"outcome": "render_protected_content"}),
            ]
        );
        Ok(())
    }

    #[tokio::test]
    async fn expiry_replaces_history() -> Result<()> {
        let lines = simulate(args(&["authenticated:u1", "unauthenticated"])?).await?;
        let summary: Value = serde_json::from_str(&lines[lines.len() - 1])?;
        assert_eq!(summary["history"], json!(["/", "/auth"]));
        assert_eq!(summary["current"], json!("/auth"));
        assert_eq!(summary["frames"], json!(["loading", "content:u1"]));
        Ok(())
    }

    #[tokio::test]
    async fn failed_resolution_redirects() -> Result<()> {
        let lines = simulate(args(&["fail:revoked"])?).await?;
        assert_eq!(
            outcomes(&lines)?,
            vec![
                json!({"outcome": "show_loading_indicator"}),
                json!({"outcome": "redirect", "target": "/auth"}),
            ]
        );
        Ok(())
    }
}
