use quorum_store::StoreError;
use quorum_types::TypesError;
use thiserror::Error;

/// Failures that abort an authorization check.
///
/// A missing or malformed group is not an error here: it simply does not
/// authorize. Everything in this enum must abort the enclosing transaction.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("gas budget exceeded during {descriptor}: consumed {consumed} of {limit}")]
    BudgetExceeded {
        descriptor: &'static str,
        consumed: u64,
        limit: u64,
    },

    #[error("group {group} nested deeper than the limit of {max_depth}")]
    DepthExceeded { group: String, max_depth: u32 },

    #[error("accumulated weight overflowed while evaluating group {0}")]
    WeightOverflow(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Error)]
pub enum GroupError {
    #[error("group {0} not found")]
    NotFound(String),

    #[error("invalid group identifier: {0}")]
    InvalidIdentifier(String),

    #[error("account {0} already exists: group allocator is out of sync with the account registry")]
    AlreadyExists(String),

    #[error("operation not permitted: {0}")]
    NotPermitted(String),

    #[error("group id counter exhausted")]
    CounterOverflow,

    #[error("member graph cycle: {0}")]
    CycleDetected(String),

    #[error("invalid group: {0}")]
    InvalidGroup(String),

    #[error("signers do not satisfy group {0}")]
    Unauthorized(String),

    #[error("genesis already applied: {0} group ids allocated")]
    AlreadyInitialized(u64),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<TypesError> for GroupError {
    fn from(e: TypesError) -> Self {
        match e {
            TypesError::InvalidIdentifier(msg) => GroupError::InvalidIdentifier(msg),
            TypesError::InvalidHex(msg) => GroupError::InvalidIdentifier(msg),
            TypesError::NotPermitted(msg) => GroupError::NotPermitted(msg),
        }
    }
}
