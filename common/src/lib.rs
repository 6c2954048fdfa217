pub mod jobs;
pub mod poller;
pub mod requests;
