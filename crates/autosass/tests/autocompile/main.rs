//! Integration tests for save handling and "compile all"
//!
//! These run the real grass compiler against fixture projects in temporary
//! directories.


mod save;
