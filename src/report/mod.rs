//! 报告输出：筛选、CSV、邮件

pub mod csv_sink;
pub mod filter;
pub mod mail;

pub use csv_sink::{output_file_name, render_csv, write_csv};
pub use filter::{apply_threshold, drop_ignored};
pub use mail::{compose_body, compose_subject, Mailer, OutgoingMail};
