mod interaction;

pub use interaction::*;

#[cfg(test)]
mod interaction_tests;
