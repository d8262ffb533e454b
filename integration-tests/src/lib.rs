//! Cross-contract lifecycle tests for the escrow workspace live under
//! `tests/`. This crate carries no code of its own.
