pub mod aggregate;
pub mod init;
pub mod summary;
