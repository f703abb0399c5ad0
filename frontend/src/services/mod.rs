pub mod api;
pub mod logging;
pub mod realtime;
pub mod storage;
