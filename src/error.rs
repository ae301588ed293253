use thiserror::Error;

/// Errors raised while building or parsing an expression.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ExprError {
    #[error("Invalid name: [{name}]")]
    InvalidName { name: String },

    #[error("{message} (at byte {position})")]
    MalformedExpression {
        position: usize,
        message: &'static str,
    },
}
