//! 扩展Cuckoo哈希表核心实现
//!
//! 两个可独立增长的扩展哈希目录，分别由 h1 / h2 寻址。新键放入槽位更少的目录；
//! 桶溢出时按 [`OverflowPolicy`] 分裂桶或在两个目录间踢出键。

use crate::{
    error::CuckooError,
    hash::{DoubleHashStrategy, HashAlgorithm, HashStrategy, HasherFunction},
    map::{directory::Directory, DEFAULT_BUCKET_SIZE, DEFAULT_CONFIG, MAX_DISPLACEMENTS, MAX_TABLE_SIZE},
    stats::{DefaultStatsRecorder, OperationStatsSnapshot, StatsRecorder},
    types::{DirectoryId, Key, OperationType},
};
use std::{
    fmt,
    sync::Arc,
    time::{Duration, Instant},
};

/// 桶满时的处理方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverflowPolicy {
    /// 先分裂桶直到有空位再插入
    #[default]
    SplitFirst,
    /// 先在两个目录间踢出最早的键，出现循环或踢出次数达到上限时强制分裂
    DisplaceFirst,
}

/// 哈希表配置
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtendibleCuckooConfig {
    /// 每个桶最多容纳的键数
    pub bucket_capacity: usize,
    /// 每个目录的槽位上限，必须是2的幂
    pub max_directory_size: usize,
    /// 单次插入的最大踢出次数 (仅 `DisplaceFirst`)
    pub max_displacements: usize,
    pub overflow_policy: OverflowPolicy,
    pub hash_algorithm: HashAlgorithm,
}

impl Default for ExtendibleCuckooConfig {
    fn default() -> Self {
        Self {
            bucket_capacity: DEFAULT_BUCKET_SIZE,
            max_directory_size: MAX_TABLE_SIZE,
            max_displacements: MAX_DISPLACEMENTS,
            overflow_policy: OverflowPolicy::SplitFirst,
            hash_algorithm: HashAlgorithm::XxHash,
        }
    }
}

impl ExtendibleCuckooConfig {
    /// 指定桶容量，其余取默认值
    pub fn with_bucket_capacity(bucket_capacity: usize) -> Self {
        Self {
            bucket_capacity,
            ..Self::default()
        }
    }

    /// 校验配置
    pub fn validate(&self) -> Result<(), CuckooError> {
        if self.bucket_capacity == 0 {
            return Err(CuckooError::InvalidConfig {
                reason: "bucket_capacity must be at least 1".to_string(),
            });
        }
        if !self.max_directory_size.is_power_of_two() {
            return Err(CuckooError::InvalidConfig {
                reason: format!(
                    "max_directory_size must be a non-zero power of two, got {}",
                    self.max_directory_size
                ),
            });
        }
        Ok(())
    }
}

/// 表状态统计
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TableStats {
    pub directory1_size: usize,
    pub directory2_size: usize,
    pub total_keys: usize,
    pub total_buckets: usize,
    /// 记录器累计的操作耗时
    pub total_time: Duration,
}

/// 一次插入中正在放置的键及其起点
struct Placement {
    key: Key,
    directory: DirectoryId,
    hops: usize,
    origin: (DirectoryId, Key),
    /// 已完成的踢出 (目录, 放入的键, 被踢出的键)，按发生顺序
    displaced: Vec<(DirectoryId, Key, Key)>,
}

impl Placement {
    fn new(key: Key, directory: DirectoryId) -> Self {
        Self {
            key,
            directory,
            hops: 0,
            origin: (directory, key),
            displaced: Vec::new(),
        }
    }

    /// 踢出链回到了起点
    ///
    /// 同一目录中键的地址由当前深度唯一确定，分裂后地址变长也仍然可比，
    /// 所以只比较目录和键。
    fn returned_to_origin(&self) -> bool {
        self.hops > 0 && (self.directory, self.key) == self.origin
    }
}

/// 扩展Cuckoo哈希表
pub struct ExtendibleCuckooTable {
    first: Directory,
    second: Directory,
    config: ExtendibleCuckooConfig,
    stats_recorder: Arc<dyn StatsRecorder>,
}

impl Default for ExtendibleCuckooTable {
    fn default() -> Self {
        let config = DEFAULT_CONFIG.clone();
        let strategy = DoubleHashStrategy::new(config.hash_algorithm);
        Self::build(config, &strategy, Arc::new(DefaultStatsRecorder::new()))
    }
}

impl fmt::Debug for ExtendibleCuckooTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stats = self.stats();
        f.debug_struct("ExtendibleCuckooTable")
            .field("directory1_size", &stats.directory1_size)
            .field("directory2_size", &stats.directory2_size)
            .field("total_keys", &stats.total_keys)
            .field("total_buckets", &stats.total_buckets)
            .field("overflow_policy", &self.config.overflow_policy)
            .finish()
    }
}

impl ExtendibleCuckooTable {
    /// 创建指定桶容量的空表
    pub fn new(bucket_capacity: usize) -> Result<Self, CuckooError> {
        Self::with_config(ExtendibleCuckooConfig::with_bucket_capacity(bucket_capacity))
    }

    pub fn with_config(config: ExtendibleCuckooConfig) -> Result<Self, CuckooError> {
        Self::with_recorder(config, Arc::new(DefaultStatsRecorder::new()))
    }

    /// 使用自定义统计记录器
    pub fn with_recorder(
        config: ExtendibleCuckooConfig,
        stats_recorder: Arc<dyn StatsRecorder>,
    ) -> Result<Self, CuckooError> {
        let strategy = DoubleHashStrategy::new(config.hash_algorithm);
        Self::with_components(config, &strategy, stats_recorder)
    }

    /// 使用自定义的 h1 / h2，配置中的 `hash_algorithm` 被忽略
    pub fn with_hashers<F1, F2>(
        config: ExtendibleCuckooConfig,
        h1: F1,
        h2: F2,
    ) -> Result<Self, CuckooError>
    where
        F1: HasherFunction + 'static,
        F2: HasherFunction + 'static,
    {
        let strategy = DoubleHashStrategy::from_functions(h1, h2);
        Self::with_components(config, &strategy, Arc::new(DefaultStatsRecorder::new()))
    }

    /// 完全自定义构造
    pub fn with_components(
        config: ExtendibleCuckooConfig,
        strategy: &dyn HashStrategy,
        stats_recorder: Arc<dyn StatsRecorder>,
    ) -> Result<Self, CuckooError> {
        config.validate()?;
        Ok(Self::build(config, strategy, stats_recorder))
    }

    fn build(
        config: ExtendibleCuckooConfig,
        strategy: &dyn HashStrategy,
        stats_recorder: Arc<dyn StatsRecorder>,
    ) -> Self {
        let directory = |id: DirectoryId| {
            Directory::new(
                id,
                strategy.hasher(id),
                config.bucket_capacity,
                config.max_directory_size,
            )
        };
        Self {
            first: directory(DirectoryId::First),
            second: directory(DirectoryId::Second),
            config,
            stats_recorder,
        }
    }

    pub fn config(&self) -> &ExtendibleCuckooConfig {
        &self.config
    }

    #[inline]
    pub fn bucket_capacity(&self) -> usize {
        self.config.bucket_capacity
    }

    pub fn directory(&self, id: DirectoryId) -> &Directory {
        match id {
            DirectoryId::First => &self.first,
            DirectoryId::Second => &self.second,
        }
    }

    fn directory_mut(&mut self, id: DirectoryId) -> &mut Directory {
        match id {
            DirectoryId::First => &mut self.first,
            DirectoryId::Second => &mut self.second,
        }
    }

    /// 新键的首选目录：槽位更少的那个，相等时取第一个
    pub fn preferred_directory(&self) -> DirectoryId {
        if self.first.size() <= self.second.size() {
            DirectoryId::First
        } else {
            DirectoryId::Second
        }
    }

    /// 键总数
    #[inline]
    pub fn len(&self) -> usize {
        self.first.key_count() + self.second.key_count()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 所有键，各出现一次，先第一个目录后第二个目录
    pub fn keys(&self) -> impl Iterator<Item = Key> + '_ {
        self.first.keys().chain(self.second.keys())
    }

    fn contains_key(&self, key: Key) -> bool {
        self.first.lookup_local(key) || self.second.lookup_local(key)
    }

    /// 查询键是否存在
    pub fn lookup(&self, key: Key) -> bool {
        let start = Instant::now();
        let found = self.contains_key(key);
        self.stats_recorder
            .record_operation(OperationType::Lookup, start.elapsed(), found);
        found
    }

    #[inline]
    pub fn contains(&self, key: Key) -> bool {
        self.lookup(key)
    }

    /// 插入键
    ///
    /// 已存在返回 `Ok(false)`，新插入返回 `Ok(true)`。
    ///
    /// # Errors
    ///
    /// 某个目录需要超过 `max_directory_size` 的槽位时返回
    /// [`CuckooError::CapacityExhausted`]。此时 `key` 不在表中，已有的键全部保留；
    /// 失败前完成的分裂不会撤销。
    pub fn try_insert(&mut self, key: Key) -> Result<bool, CuckooError> {
        let start = Instant::now();
        if self.contains_key(key) {
            self.stats_recorder
                .record_operation(OperationType::Insert, start.elapsed(), false);
            return Ok(false);
        }

        let result = self.place(key, self.preferred_directory());
        self.stats_recorder
            .record_operation(OperationType::Insert, start.elapsed(), result.is_ok());
        result.map(|()| true)
    }

    /// 插入键，已存在时返回 `false`
    ///
    /// # Panics
    ///
    /// 目录容量耗尽时 panic，见 [`try_insert`](Self::try_insert)。
    pub fn insert(&mut self, key: Key) -> bool {
        match self.try_insert(key) {
            Ok(inserted) => inserted,
            Err(err) => panic!("{}", err),
        }
    }

    /// 删除键，不存在时返回 `false`
    ///
    /// 不合并桶，不收缩目录。
    pub fn remove(&mut self, key: Key) -> bool {
        let start = Instant::now();
        let removed = self.first.remove_local(key) || self.second.remove_local(key);
        self.stats_recorder
            .record_operation(OperationType::Remove, start.elapsed(), removed);
        removed
    }

    /// 放置一个不在表中的键
    ///
    /// 失败时撤销本次的所有踢出，表中的键集合与调用前相同。
    fn place(&mut self, key: Key, home: DirectoryId) -> Result<(), CuckooError> {
        let mut placement = Placement::new(key, home);
        let result = self.run_placement(&mut placement);
        if result.is_err() {
            self.rollback(&placement);
        }
        result
    }

    fn run_placement(&mut self, placement: &mut Placement) -> Result<(), CuckooError> {
        loop {
            if self.directory_mut(placement.directory).insert_local(placement.key) {
                return Ok(());
            }

            let address = self.directory(placement.directory).address_of(placement.key);
            match self.config.overflow_policy {
                OverflowPolicy::SplitFirst => self.split(placement.directory, address)?,
                OverflowPolicy::DisplaceFirst => {
                    let cycled = placement.returned_to_origin();
                    if cycled || placement.hops >= self.config.max_displacements {
                        if cycled {
                            log_info!(
                                "displacement cycle after {} hops: splitting {} address {}",
                                placement.hops,
                                placement.directory,
                                address
                            );
                        } else {
                            log_warn!(
                                "displacement limit {} reached: splitting {} address {}",
                                self.config.max_displacements,
                                placement.directory,
                                address
                            );
                        }
                        self.stats_recorder
                            .record_operation_count(OperationType::CycleBreak);
                        self.split(placement.directory, address)?;
                        continue;
                    }

                    let evicted = self
                        .directory_mut(placement.directory)
                        .displace_at(address, placement.key);
                    if let Some(evicted) = evicted {
                        self.stats_recorder.record_operation_count(OperationType::Kick);
                        placement
                            .displaced
                            .push((placement.directory, placement.key, evicted));
                        placement.key = evicted;
                        placement.directory = placement.directory.other();
                        placement.hops += 1;
                    }
                }
            }
        }
    }

    /// 逆序撤销踢出，把每个被踢出的键换回原目录
    ///
    /// 之后的分裂只会把桶里的键分散到更多桶中，换回时一定有空位。
    fn rollback(&mut self, placement: &Placement) {
        for &(directory, placed, evicted) in placement.displaced.iter().rev() {
            let dir = self.directory_mut(directory);
            let removed = dir.remove_local(placed);
            let restored = dir.insert_local(evicted);
            debug_assert!(removed && restored, "rollback of {} -> {} failed", placed, evicted);
        }
        if !placement.displaced.is_empty() {
            log_debug!(
                "rolled back {} displacements for key {}",
                placement.displaced.len(),
                placement.origin.1
            );
        }
    }

    fn split(&mut self, directory: DirectoryId, address: usize) -> Result<(), CuckooError> {
        let outcome = self.directory_mut(directory).split(address)?;
        self.stats_recorder.record_operation_count(OperationType::Split);
        if outcome.doubled {
            self.stats_recorder.record_operation_count(OperationType::Resize);
        }
        Ok(())
    }

    /// 表状态统计
    pub fn stats(&self) -> TableStats {
        TableStats {
            directory1_size: self.first.size(),
            directory2_size: self.second.size(),
            total_keys: self.len(),
            total_buckets: self.first.bucket_count() + self.second.bucket_count(),
            total_time: self.stats_recorder.operation_stats_snapshot().total_time(),
        }
    }

    pub fn stats_recorder(&self) -> &Arc<dyn StatsRecorder> {
        &self.stats_recorder
    }

    /// 操作计数快照
    pub fn operation_stats(&self) -> OperationStatsSnapshot {
        self.stats_recorder.operation_stats_snapshot()
    }

    pub fn export_prometheus(&self) -> String {
        self.stats_recorder.export_prometheus()
    }

    /// 重置操作计数，不影响表内容
    pub fn reset_stats(&self) {
        self.stats_recorder.reset();
    }

    /// 渲染表结构，格式见 `Display` 实现
    pub fn print(&self) -> String {
        self.to_string()
    }

    /// 校验两个目录的不变量，并确认没有键同时出现在两个目录中
    pub fn check_invariants(&self) -> Result<(), String> {
        self.first.check_invariants()?;
        self.second.check_invariants()?;
        if let Some(key) = self.first.keys().find(|&key| self.second.lookup_local(key)) {
            return Err(format!("key {} stored in both directories", key));
        }
        Ok(())
    }
}
