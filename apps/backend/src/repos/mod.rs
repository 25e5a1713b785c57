//! Repository functions: storage access in domain terms.

pub mod executions;
pub mod games;
pub mod period_steps;
