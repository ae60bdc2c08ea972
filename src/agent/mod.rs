mod deductions;
mod inference;
mod sentence;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use deductions::Deductions;
pub use inference::Agent;
pub use sentence::Sentence;
