/// Synchronous yes/no gate in front of irreversible actions.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Always answers yes, for `--yes` style flags.
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

pub const RESET_DATABASE_PROMPT: &str =
    "This deletes every node and relationship in the database. This cannot be undone. Continue?";
pub const CLEAR_CONTRACTS_PROMPT: &str =
    "This removes all contract data from the knowledge graph. This cannot be undone. Continue?";
