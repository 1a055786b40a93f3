pub mod scenario;

pub use scenario::{Expectation, Scenario};
