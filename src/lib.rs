//! Arbol - lazy call-tree viewer for instrumented timing traces
//!
//! Trace files hold one nested call record per root call. This library parses
//! those records, filters calls by duration, classifies them into severity
//! buckets, and materializes the tree one expansion at a time through an
//! asynchronous data provider.

pub mod cli;
pub mod config;
pub mod context;
pub mod controller;
pub mod duration;
pub mod error;
pub mod filter;
pub mod html_output;
pub mod json_output;
pub mod node;
pub mod parser;
pub mod percentage;
pub mod provider;
pub mod record;
pub mod session;
pub mod severity;
pub mod text_output;
pub mod view;
