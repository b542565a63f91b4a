pub mod category;
pub mod cue;
pub mod dataset;
pub mod router;
pub mod rules;
pub mod selector;
pub mod session;
pub mod timer;
