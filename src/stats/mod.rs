//! 统计模块 - 统一管理哈希表操作计数

pub mod recorder;
pub mod operation;

pub use recorder::{DefaultStatsRecorder, DisabledStatsRecorder, StatsRecorder};
pub use operation::{AtomicOperationStats, OperationRecorder, OperationStatsSnapshot};
