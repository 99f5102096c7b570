pub mod config;
pub mod context;
pub mod humanize;
pub mod observability;
pub mod pipeline;
pub mod status;
pub mod storage;
pub mod validator;
pub mod worker;
pub mod worklist;
