//! Core business logic - framework-agnostic fund-flow operations.
//!
//! Functions here take a database connection (or transaction), validate,
//! persist, and enqueue notifications; they know nothing about HTTP. The
//! interface layer stays thin.

/// Agency registry operations
pub mod agency;
/// Allocation ledger - ministry-to-state tranches and balance aggregation
pub mod allocation;
/// Proposal lifecycle state machine
pub mod proposal;
/// Fund position reports and currency formatting
pub mod report;
/// Release coordinator - validated fund movement at every hop
pub mod release;
/// Utilization certificate submission and verification
pub mod uc;
