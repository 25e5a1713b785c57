#![allow(dead_code)]

// Logging is auto-installed for every test binary
#[ctor::ctor]
fn init_logging() {
    backend_test_support::logging::init();
}

// Policy defaults to rollback but can be flipped per-binary via `SIM_TXN_POLICY=commit`.
#[ctor::ctor]
fn init_txn_policy() {
    use simulation_backend::db::txn_policy::{set_txn_policy, TxnPolicy};

    let policy = match std::env::var("SIM_TXN_POLICY")
        .unwrap_or_default()
        .to_lowercase()
        .as_str()
    {
        "commit" => TxnPolicy::CommitOnOk,
        _ => TxnPolicy::RollbackOnOk,
    };
    set_txn_policy(policy);
}
