/// Adapters for the `operator-sdk` validator and scorecard suites
mod scorecard;
mod validator;

pub use scorecard::{OperatorSdkScorecard, DEFAULT_WAIT_TIME_SECS};
pub use validator::OperatorSdkValidator;

/// Program name of the operator-sdk CLI
pub const OPERATOR_SDK: &str = "operator-sdk";
