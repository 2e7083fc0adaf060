//! aft: AWS Control Tower Account Factory for Terraform CLI
//!
//! This crate holds the command-line entry point and the layered
//! configuration bootstrap every AFT command runs on top of.

pub mod bootstrap;
pub mod cli;
pub mod config;
pub mod domain;
