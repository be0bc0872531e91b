//! Command implementations for the tie CLI

pub mod dispatch;

mod show;
mod submit;
mod validate;
