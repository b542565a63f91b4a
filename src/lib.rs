// The binary entry point is main.rs; this file re-declares the module tree so
// that the integration tests under tests/ can drive `App` directly.
// Some helpers are only exercised through one of the two targets.
#![allow(dead_code)]

pub mod app;
#[cfg(feature = "audio")]
pub mod audio;
pub mod config;
pub mod event;
pub mod forms;
pub mod keys;
pub mod nav;
pub mod show;
pub mod ui;
