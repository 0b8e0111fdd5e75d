//! Property-based tests for the outcome algebra.
