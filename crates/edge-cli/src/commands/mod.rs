pub mod init;
pub mod pack;
pub mod synth;
