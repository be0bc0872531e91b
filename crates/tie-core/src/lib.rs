//! Core evaluation and feedback pipeline for TIE (Technical Interview
//! Exercises).
//!
//! A learner submits source text against a multi-task [`question::Question`].
//! The pipeline checks prerequisites, preprocesses the code into a single
//! harness program, runs it through a [`runner::CodeRunner`], classifies the
//! results per task, and selects exactly one piece of feedback to surface,
//! recording every submission in an append-only session transcript.

pub mod config;
pub mod error;
pub mod evaluation;
pub mod feedback;
pub mod logging;
pub mod prereq;
pub mod question;
pub mod runner;
pub mod runtime;
pub mod session;

pub use error::{Result, TieError};
