mod person;
mod stats;

pub use person::Person;
pub use stats::Stats;
