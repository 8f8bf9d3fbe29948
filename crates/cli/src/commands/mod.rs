pub mod ask;
pub mod config_cmd;
pub mod doctor;
pub mod init;
