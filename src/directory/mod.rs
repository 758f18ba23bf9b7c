//! 员工名册与通知对象展开

pub mod escalation;
pub mod members;

pub use escalation::{expand_recipients, DirectoryLookupMiss, EscalationDepth, RecipientSet};
pub use members::{Directory, DirectoryEntry};
