use thiserror::Error;

/// A fatal derivation failure. There is no partial output: any of these
/// aborts the whole generation run before rendering begins.
#[derive(Debug, Error)]
pub enum DeriveError {
    #[error("specification does not declare `StateFields`")]
    MissingStateFields,
    #[error("cannot derive a target type for a `{kind}` node")]
    UnderivableNode { kind: &'static str },
    #[error("declaration `{name}` of kind `{kind}` cannot be derived")]
    UnderivableDeclaration { name: String, kind: String },
    #[error("no typedef defines the record with structural id {id}")]
    UnknownRecordId { id: u64 },
    #[error("cannot resolve referenced type `{0}`")]
    UnresolvedReference(String),
    #[error("synthetic struct `{0}` collides with an existing type")]
    SyntheticNameCollision(String),
    #[error("resolution stalled with unresolved types: {}", .pending.join(", "))]
    StalledResolution { pending: Vec<String> },
}
