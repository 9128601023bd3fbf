pub mod actuators;
pub mod config;
pub mod denylist;
pub mod infer;
pub mod interaction_log;
pub mod ocr;
pub mod service;
