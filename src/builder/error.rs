//! Configuration errors surfaced when a machine is built.

use thiserror::Error;

/// A mistake in how a machine was declared.
///
/// Build errors are raised by `build()`, before anything runs; a template
/// that builds cleanly cannot stall on one of these at run time.
#[derive(Debug, Error)]
pub enum BuildError {
    /// The machine has no starting state.
    #[error("Starting state not set. Call .starting_state(state) before .build()")]
    MissingStartingState,

    /// A declared state is matched by no handler.
    #[error("State {0} has no matching handler. Register .on_run or a .when matcher covering it")]
    UnhandledState(String),

    /// An `elif`/`else_run` arm has no `run_if` to attach to.
    #[error("Branch arm declared without a preceding run_if. Open the branch with .run_if(..)")]
    DanglingBranch,
}
