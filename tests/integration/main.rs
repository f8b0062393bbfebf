//! Integration tests

mod monitor_test;
mod source_test;
