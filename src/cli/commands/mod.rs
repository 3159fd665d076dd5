pub mod expand;
pub mod init;
pub mod seed;
pub mod serve;
