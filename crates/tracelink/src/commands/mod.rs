//! Command implementations that touch the filesystem.

pub mod init;
