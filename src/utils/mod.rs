//! 工具函数

pub mod logging;

pub use logging::{init_logging, log_startup, print_final_stats};
