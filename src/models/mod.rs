pub mod fix;
pub mod job;
pub mod timeline;
