pub mod cli;
pub mod dispatch;
pub mod ports;
pub mod sweep;
pub mod worker;
