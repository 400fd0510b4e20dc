//! Collect, classify and report on short social-media posts.
//!
//! The pipeline is three file-to-file stages (collector, classifier,
//! aggregator/reporter) plus a fixed-time scheduler loop; CSV files on disk
//! are the only handoff between stages.

pub mod ai;
pub mod classify;
pub mod collect;
pub mod commands;
pub mod dataset;
pub mod report;
pub mod scheduler;
pub mod search;
