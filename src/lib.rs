#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! MySK: an offline school directory client.
//!
//! The reusable pieces are the [`form`] controller and the [`list_detail`]
//! selection controller; [`tui`] hosts them over a JSONL [`backend`].

pub mod backend;
pub mod config;
pub mod form;
pub mod list_detail;
pub mod logging;
pub mod model;
pub mod tui;
