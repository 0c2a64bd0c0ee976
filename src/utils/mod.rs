pub mod aggregation;
pub mod format;

pub use aggregation::{count_by, group_by, max_present};
pub use format::format_percent;
