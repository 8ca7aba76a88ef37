//! Dotfiles bundling engine.
//!
//! Packages a dotfiles repository into self-contained, gzip-compressed
//! tar archives. Each bundle is declared in `bundles/<name>/bundle.toml`
//! and may extend a parent bundle; files are selected from the `links/`
//! and `links-in-depth/` source trees by glob patterns, per-bundle
//! overrides are merged in, and the result is written deterministically
//! so rebuilding an unchanged repository yields byte-identical archives.
//!
//! The public API is organised into layers:
//!
//! - **[`config`]** — parse bundle declarations and resolve inheritance
//! - **[`resolve`]** — select source files by include/exclude patterns
//! - **[`overrides`]** — per-bundle file replacement and structured merging
//! - **[`archive`]** — assemble the final tar.gz with generated metadata
//! - **[`commands`]** — top-level subcommand orchestration (`build`, `list`)
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod archive;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod matcher;
pub mod merge;
pub mod overrides;
pub mod repo;
pub mod resolve;
