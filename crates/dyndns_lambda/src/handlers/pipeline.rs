use thiserror::Error;

use crate::adapters::log::{LogRecord, LogSink};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StepError {
    #[error("received an invalid EC2 instance state-change notification")]
    InvalidEvent,
    #[error("instance {0} is not configured for dynamic DNS updates")]
    NotConfigured(String),
    #[error("instance metadata query failed")]
    QueryFailed,
    #[error("DNS zone data update failed")]
    UpdateFailed,
    #[error("step requires {0}, which no earlier step provided")]
    MissingContext(&'static str),
}

/// Surfaced to the invoking platform. The underlying cause is visible only
/// in the logs.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PipelineError {
    #[error("invalid pipeline step '{0}'")]
    InvalidStep(String),
    #[error("pipeline step '{0}' returned an error")]
    StepFailed(String),
}

pub type Step<C> = fn(&mut C) -> Result<(), StepError>;

/// Runs the named steps strictly in order over a shared context, stopping at
/// the first failure. Every name is resolved before anything executes, so a
/// malformed step list fails the pipeline without running any step.
pub fn run_pipeline<C>(
    ctx: &mut C,
    log: &dyn LogSink,
    step_names: &[&str],
    resolve: impl Fn(&str) -> Option<Step<C>>,
) -> Result<(), PipelineError> {
    let mut steps: Vec<(&str, Step<C>)> = Vec::with_capacity(step_names.len());
    for &name in step_names {
        match resolve(name) {
            Some(step) => steps.push((name, step)),
            None => {
                log.emit(LogRecord::error(format!(
                    "pipeline step list contains an unknown step '{name}'"
                )));
                return Err(PipelineError::InvalidStep(name.to_string()));
            }
        }
    }

    for (name, step) in steps {
        if let Err(error) = step(ctx) {
            log.emit(
                LogRecord::error(format!("step '{name}' returned an error: {error}"))
                    .with_error(error.to_string()),
            );
            return Err(PipelineError::StepFailed(name.to_string()));
        }
    }

    log.emit(LogRecord::info(
        "dynamic DNS update pipeline finished successfully",
    ));
    Ok(())
}
