//! Logfix - rewrite structured logging calls into printf-style calls
//!
//! Logfix is a CLI tool and library that finds `WithFields` logging calls in
//! Go sources, such as `pkg.InfoWithFields(map[string]interface{}{...}, "msg")`
//! or `s.logger.WithFields(logrus.Fields{...}).Error("msg")`, and replaces each
//! with a single formatted call like `pkg.Infof("msg: user=%s", userID)`.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer (user-facing commands and actions)
//! - `config`: Configuration file loading and parsing
//! - `core`: Rewrite engine (matching, field parsing, call synthesis)

pub mod cli;
pub mod config;
pub mod core;
