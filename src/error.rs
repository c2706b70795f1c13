use thiserror::Error;

/// Everything the engine can complain about.
///
/// `MalformedSymbol` and `InvalidPrice` are caller errors and surface through
/// `Result`. `UnknownCurrency` is only ever logged: a stray symbol on the
/// feed must not take the engine down. `InternalInconsistency` means the
/// predecessor bookkeeping broke, which is a bug, not an input problem.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("malformed symbol {0:?}: expected BASE-QUOTE")]
    MalformedSymbol(String),

    #[error("unknown currency {0:?}")]
    UnknownCurrency(String),

    #[error("invalid price {0}: must be positive and finite")]
    InvalidPrice(f64),

    #[error("internal inconsistency: {0}")]
    InternalInconsistency(String),
}
