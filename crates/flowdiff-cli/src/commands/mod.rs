pub mod diff;
pub mod rules;
