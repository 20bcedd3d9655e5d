//! In-memory repositories.

pub mod session;

pub use session::InMemorySessionRepository;
