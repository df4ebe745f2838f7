//! Evaluators turn platform facts into verdicts.
//!
//! Neither evaluator returns an error: every failure degrades into a
//! fallback result carrying [`crate::heuristic::confidence::FALLBACK`].

mod fleet;
mod subject;

pub use fleet::FleetEvaluator;
pub use subject::SubjectEvaluator;
