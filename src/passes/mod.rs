//! Analyses that run over a parsed [`crate::ast::Program`].

pub mod check_semantics;
