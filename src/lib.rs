//! Rust扩展Cuckoo哈希表库
//!
//! 以64位整数为键的内存集合。两个可独立增长的扩展哈希目录分别由两个哈希函数寻址，
//! 新键放入当前槽位更少的目录，桶满时分裂桶 (必要时目录翻倍)，或在两个目录间踢出键。
//!
//! ## 主要特性
//! - 多键桶，桶容量可配置
//! - 目录按需翻倍，桶只在溢出时分裂，从不合并
//! - 两种溢出策略：先分裂 / 先踢出 (带循环检测)
//! - 可注入的哈希函数和统计记录器，支持Prometheus导出
//!
//! ## 快速开始
//!
//! ```rust
//! use extendible_cuckoo::*;
//!
//! fn main() -> Result<(), CuckooError> {
//!     // 创建桶容量为2的哈希表
//!     let mut table = ExtendibleCuckooTable::new(2)?;
//!
//!     assert!(table.try_insert(5)?);
//!     assert!(!table.try_insert(5)?);
//!     assert!(table.insert(9));
//!
//!     assert!(table.lookup(5));
//!     assert!(!table.lookup(7));
//!
//!     // 打印表结构和统计信息
//!     println!("{}", table);
//!     println!("{}", table.stats());
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]
#[cfg(feature = "logging")]
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        log::debug!($($arg)*)
    };
}

#[cfg(feature = "logging")]
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        log::info!($($arg)*)
    };
}

#[cfg(feature = "logging")]
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        log::warn!($($arg)*)
    };
}

#[cfg(feature = "logging")]
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        log::error!($($arg)*)
    };
}

#[cfg(not(feature = "logging"))]
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "logging"))]
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "logging"))]
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "logging"))]
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {};
}
// 核心模块导出
pub mod error;
pub mod types;
pub mod map;
pub mod hash;
pub mod stats;

// 公共接口导出
pub use crate::{
    map::{
        Bucket,
        Directory,
        ExtendibleCuckooConfig,
        ExtendibleCuckooTable,
        OverflowPolicy,
        TableStats,
        DEFAULT_BUCKET_SIZE,
        DEFAULT_CONFIG,
        MAX_DISPLACEMENTS,
        MAX_TABLE_SIZE,
    },
    hash::{
        HashAlgorithm,
        HashStrategy,
        HasherFunction,
        DoubleHashStrategy,
    },
    stats::{
        StatsRecorder,
        DefaultStatsRecorder,
        DisabledStatsRecorder,
        OperationStatsSnapshot,
    },
    error::CuckooError,
    types::{DirectoryId, Key, OperationType},
};

// 便捷功能函数

/// 批量插入，返回新插入的键数
///
/// 遇到容量耗尽时停止并返回错误，此前插入的键保留在表中。
pub fn batch_insert(
    table: &mut ExtendibleCuckooTable,
    keys: impl IntoIterator<Item = Key>,
) -> Result<usize, CuckooError> {
    let mut count = 0;
    for key in keys {
        if table.try_insert(key)? {
            count += 1;
        }
    }
    Ok(count)
}

/// 批量查询
pub fn batch_lookup(
    table: &ExtendibleCuckooTable,
    keys: impl IntoIterator<Item = Key>,
) -> Vec<bool> {
    keys.into_iter().map(|key| table.lookup(key)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_helpers() {
        let mut table = ExtendibleCuckooTable::new(2).unwrap();
        assert_eq!(batch_insert(&mut table, [3, 1, 4, 1, 5]).unwrap(), 4);
        assert_eq!(batch_lookup(&table, [1, 2, 3]), vec![true, false, true]);
    }

    #[test]
    fn test_batch_insert_stops_on_error() {
        let config = ExtendibleCuckooConfig {
            bucket_capacity: 1,
            max_directory_size: 1,
            ..ExtendibleCuckooConfig::default()
        };
        let mut table =
            ExtendibleCuckooTable::with_hashers(config, |_key: Key| 7, |_key: Key| 7).unwrap();
        let result = batch_insert(&mut table, [10, 20, 30]);
        assert!(matches!(result, Err(CuckooError::CapacityExhausted { .. })));
        assert!(table.lookup(10));
        assert!(!table.lookup(30));
    }
}
