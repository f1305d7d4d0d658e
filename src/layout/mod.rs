mod aligned;
mod body_set;

pub use aligned::*;
pub use body_set::*;

#[cfg(test)]
mod layout_tests;
