pub mod formatter;
pub mod logs;
pub mod poller;
pub mod report;
pub mod scoring;
pub mod stage;
pub mod transport;
