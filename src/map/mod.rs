//! 哈希表核心模块 - 实现扩展Cuckoo哈希表及其组件

pub mod bucket;
pub mod directory;
pub mod extendible_cuckoo;
mod printer;

pub use bucket::{Bucket, BucketHandle};
pub use directory::{Directory, SplitOutcome};
pub use extendible_cuckoo::{
    ExtendibleCuckooConfig, ExtendibleCuckooTable, OverflowPolicy, TableStats,
};

use once_cell::sync::Lazy;

/// 全局默认配置
pub static DEFAULT_CONFIG: Lazy<ExtendibleCuckooConfig> = Lazy::new(ExtendibleCuckooConfig::default);

// 预定义常量
pub const DEFAULT_BUCKET_SIZE: usize = 4;
/// 每个目录的默认槽位上限
pub const MAX_TABLE_SIZE: usize = 1 << 24;
pub const MAX_DISPLACEMENTS: usize = 100;
