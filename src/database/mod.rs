pub mod init;
pub mod migrations;
pub mod pool;
pub mod statement;
