use std::sync::OnceLock;

/// Environment variable a test binary reads to pick its policy.
pub const TXN_POLICY_ENV: &str = "VETO_TXN_POLICY";

/// What `with_txn` does with a transaction whose closure returned `Ok`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxnPolicy {
    /// Commit (the service default)
    CommitOnOk,
    /// Roll back, so test binaries can run writes without persisting them
    RollbackOnOk,
}

impl TxnPolicy {
    /// `rollback` (any case) selects `RollbackOnOk`; anything else commits.
    pub fn parse(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("rollback") {
            TxnPolicy::RollbackOnOk
        } else {
            TxnPolicy::CommitOnOk
        }
    }

    pub fn from_env() -> Self {
        std::env::var(TXN_POLICY_ENV)
            .map(|raw| Self::parse(&raw))
            .unwrap_or(TxnPolicy::CommitOnOk)
    }
}

static POLICY: OnceLock<TxnPolicy> = OnceLock::new();

/// Current policy; `CommitOnOk` until something sets it.
pub fn current() -> TxnPolicy {
    POLICY.get().copied().unwrap_or(TxnPolicy::CommitOnOk)
}

/// Set the policy for the process. Only the first call has any effect.
pub fn set_txn_policy(policy: TxnPolicy) {
    let _ = POLICY.set(policy);
}
