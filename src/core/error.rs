use thiserror::Error;

/// Errors that abort the translation pass for a whole tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatchError {
    /// A template names a positional argument the call does not supply.
    ///
    /// This points at a broken catalog entry rather than at the source file,
    /// so the tree is abandoned instead of the single call.
    #[error("invalid positional value {marker} in \"{template}\" ({available} argument(s) given)")]
    PlaceholderReference {
        template: String,
        marker: String,
        available: usize,
    },
}
