//! One module per SQL statement/clause family (spec.md's per-construct
//! [MODULE] blocks), grounded on the one-file-per-construct layout of
//! `apollo-parser/src/parser/grammar/*.rs` (`document.rs`, `directive.rs`,
//! `selection.rs`, ...).

pub mod ddl;
pub mod delete;
pub mod from_join;
pub mod insert;
pub mod select;
pub mod transaction;
pub mod update;
