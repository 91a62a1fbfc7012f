//! Readers that produce whole `Table`s.

pub mod csv;
