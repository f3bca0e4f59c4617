pub mod idioms;
pub mod init;
pub mod rewrite;
