//! Failures of an `rdk` invocation and the exit code each one maps to.
//!
//! | code | cause                                                    |
//! |------|----------------------------------------------------------|
//! | 0    | success                                                  |
//! | 2    | bad arguments (reported by clap before `run` starts)     |
//! | 10   | trial configuration rejected by the engine               |
//! | 11   | file could not be read or written (config, spec, PNG)    |
//! | 12   | input was not usable (malformed JSON, unknown log level) |
//! | 13   | a report or run spec could not be serialized             |

use rdk_core::RdkError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("invalid trial: {0}")]
    Trial(RdkError),
    #[error("{0}")]
    Io(String),
    #[error("{0}")]
    Input(String),
    #[error("cannot serialize output: {0}")]
    Output(#[from] serde_json::Error),
}

impl CliError {
    /// Process exit code, see the module table.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Trial(_) => 10,
            CliError::Io(_) => 11,
            CliError::Input(_) => 12,
            CliError::Output(_) => 13,
        }
    }
}

// PNG export failures come back from the engine as `RdkError::Io`; they are
// file problems, not trial problems.
impl From<RdkError> for CliError {
    fn from(e: RdkError) -> Self {
        match e {
            RdkError::Io(msg) => CliError::Io(msg),
            other => CliError::Trial(other),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e.to_string())
    }
}
