// Candidate-to-job matching: typed inputs, sub-scorers, the weighted engine,
// ranking, and the HTTP/persistence plumbing around them.
// The engine is pure; only `store` and `handlers` touch I/O.

pub mod engine;
pub mod experience;
pub mod handlers;
pub mod location;
pub mod models;
pub mod ranking;
pub mod salary;
pub mod skills;
pub mod store;
pub mod weights;
