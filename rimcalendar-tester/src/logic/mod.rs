pub mod reports;
pub mod sim;
pub mod tester;

pub use tester::*;
