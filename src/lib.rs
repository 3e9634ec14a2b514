//! Prepare application source for upload to a Cloud Foundry style platform,
//! sending only the files the platform does not already hold.

pub mod api;
pub mod cli;
pub mod command;
pub mod config;
pub mod domain;
pub mod error;
pub mod push;
