//! elf-booth library crate.
//!
//! A photo booth that turns a captured picture into a Lapland elf portrait.
//! The flow controller in [`flow`] is independent of any presentation; the
//! [`console`] module is the text front end shipped with the binary.

pub mod audio;
pub mod booth;
pub mod camera;
pub mod cli;
pub mod config;
pub mod console;
pub mod credentials;
pub mod export;
pub mod flow;
pub mod generation;
pub mod i18n;
pub mod media;
