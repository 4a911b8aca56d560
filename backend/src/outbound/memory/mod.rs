//! In-process repositories.
//!
//! Used by the test suites and when the service starts without a database
//! URL. State lives for the lifetime of the process.

mod lead_repository;
mod user_repository;

pub use lead_repository::InMemoryLeadRepository;
pub use user_repository::InMemoryUserRepository;
