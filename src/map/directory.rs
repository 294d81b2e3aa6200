// src/map/directory.rs
//! 可扩展哈希目录 - 桶引用数组、全局深度以及分裂/翻倍算法
//!
//! 多个目录槽位可以指向同一个桶。桶保存在目录独占的内存池中，
//! 槽位只保存 [`BucketHandle`]；桶只会在分裂时新增，从不单独释放，
//! 目录销毁时每个桶恰好释放一次。

use crate::{
    error::CuckooError,
    hash::{rightmost_bits, HasherFunction},
    map::bucket::{Bucket, BucketHandle},
    types::{DirectoryId, Key},
};
use std::{fmt, sync::Arc};

/// 一次分裂的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitOutcome {
    /// 分裂前是否先把目录翻倍
    pub doubled: bool,
    /// 新兄弟桶的 id
    pub sibling_id: usize,
}

pub struct Directory {
    id: DirectoryId,
    hasher: Arc<dyn HasherFunction>,
    /// 桶内存池 (拥有所有桶)
    buckets: Vec<Bucket>,
    /// 地址 -> 桶句柄，长度恒为 2^depth
    slots: Vec<BucketHandle>,
    depth: u32,
    bucket_capacity: usize,
    max_size: usize,
    key_count: usize,
}

impl fmt::Debug for Directory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Directory")
            .field("id", &self.id)
            .field("depth", &self.depth)
            .field("size", &self.slots.len())
            .field("buckets", &self.buckets.len())
            .field("keys", &self.key_count)
            .finish()
    }
}

impl Directory {
    /// 创建只有一个深度为0的桶的目录
    pub fn new(
        id: DirectoryId,
        hasher: Arc<dyn HasherFunction>,
        bucket_capacity: usize,
        max_size: usize,
    ) -> Self {
        Self {
            id,
            hasher,
            buckets: vec![Bucket::new(0, 0, bucket_capacity)],
            slots: vec![BucketHandle(0)],
            depth: 0,
            bucket_capacity,
            max_size,
            key_count: 0,
        }
    }

    #[inline]
    pub fn id(&self) -> DirectoryId {
        self.id
    }

    /// 全局深度
    #[inline]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// 槽位数量 (2^depth)
    #[inline]
    pub fn size(&self) -> usize {
        self.slots.len()
    }

    /// 不同桶的数量
    #[inline]
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    #[inline]
    pub fn key_count(&self) -> usize {
        self.key_count
    }

    #[inline]
    pub fn bucket_capacity(&self) -> usize {
        self.bucket_capacity
    }

    /// 目录槽位数上限
    #[inline]
    pub fn max_size(&self) -> usize {
        self.max_size
    }

    #[inline]
    pub fn digest(&self, key: Key) -> u64 {
        self.hasher.hash_key(key)
    }

    /// 摘要的低 `depth` 位，即该摘要当前所在的槽位
    #[inline]
    pub fn address(&self, digest: u64) -> usize {
        rightmost_bits(digest, self.depth)
    }

    #[inline]
    pub fn address_of(&self, key: Key) -> usize {
        self.address(self.digest(key))
    }

    #[inline]
    pub fn handle_at(&self, address: usize) -> BucketHandle {
        self.slots[address]
    }

    #[inline]
    pub fn bucket(&self, handle: BucketHandle) -> &Bucket {
        &self.buckets[handle.0]
    }

    /// 地址上驻留的桶
    #[inline]
    pub fn bucket_at(&self, address: usize) -> &Bucket {
        self.bucket(self.slots[address])
    }

    /// 按地址顺序遍历 (地址, 桶)，别名槽位会重复出现同一个桶
    pub fn slots(&self) -> impl Iterator<Item = (usize, &Bucket)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .map(move |(address, handle)| (address, &self.buckets[handle.0]))
    }

    /// 每个不同的桶恰好一次，按其最小地址排序
    pub fn buckets(&self) -> impl Iterator<Item = &Bucket> + '_ {
        self.slots()
            .filter(|(address, bucket)| bucket.id() == *address)
            .map(|(_, bucket)| bucket)
    }

    /// 目录中的所有键
    pub fn keys(&self) -> impl Iterator<Item = Key> + '_ {
        self.buckets.iter().flat_map(|bucket| bucket.keys().iter().copied())
    }

    pub fn lookup_local(&self, key: Key) -> bool {
        self.bucket_at(self.address_of(key)).contains(key)
    }

    /// 把键追加到所在桶，桶满时返回 `false` 且不修改状态
    ///
    /// 不检查重复，由调用方保证。
    #[must_use]
    pub fn insert_local(&mut self, key: Key) -> bool {
        let handle = self.slots[self.address_of(key)];
        if self.buckets[handle.0].push(key) {
            self.key_count += 1;
            true
        } else {
            false
        }
    }

    pub fn remove_local(&mut self, key: Key) -> bool {
        let handle = self.slots[self.address_of(key)];
        if self.buckets[handle.0].remove(key) {
            self.key_count -= 1;
            true
        } else {
            false
        }
    }

    /// 用 `key` 替换地址上桶里最早的键，返回被踢出的键
    ///
    /// `key` 必须寻址到 `address`。
    pub fn displace_at(&mut self, address: usize, key: Key) -> Option<Key> {
        debug_assert_eq!(self.address_of(key), address);
        let handle = self.slots[address];
        self.buckets[handle.0].displace(key)
    }

    /// 目录翻倍：后半部分复制前半部分的句柄 (别名而非克隆)
    fn grow(&mut self) -> Result<(), CuckooError> {
        let size = self.slots.len() * 2;
        if size > self.max_size {
            log_error!(
                "{} cannot grow to {} slots (limit {})",
                self.id, size, self.max_size
            );
            return Err(CuckooError::CapacityExhausted {
                directory: self.id,
                size,
                limit: self.max_size,
            });
        }

        self.slots.extend_from_within(..);
        self.depth += 1;
        log_debug!("{} doubled to {} slots, depth {}", self.id, size, self.depth);
        Ok(())
    }

    /// 分裂地址上的桶，必要时先翻倍目录
    ///
    /// 原桶的键按新增的判别位重新分配到原桶和兄弟桶，
    /// 每个键最多落入原先所在的两个桶之一，所以重新插入不会溢出。
    pub fn split(&mut self, address: usize) -> Result<SplitOutcome, CuckooError> {
        let handle = self.slots[address];

        // 该桶只剩最后一个指针时需要翻倍
        let doubled = self.buckets[handle.0].depth() == self.depth;
        if doubled {
            self.grow()?;
        }

        let bucket = &mut self.buckets[handle.0];
        let sibling_id = bucket.deepen();
        let new_depth = bucket.depth();
        let keys = bucket.take_keys();

        let sibling = BucketHandle(self.buckets.len());
        self.buckets
            .push(Bucket::new(sibling_id, new_depth, self.bucket_capacity));

        // 地址 = 前缀 (目录深度与新桶深度之差的全部位串) + 后缀 (兄弟桶 id)
        for prefix in 0..(1usize << (self.depth - new_depth)) {
            self.slots[(prefix << new_depth) | sibling_id] = sibling;
        }

        for key in keys {
            let target = self.slots[self.address_of(key)];
            let placed = self.buckets[target.0].push(key);
            debug_assert!(placed, "key {} overflowed while splitting", key);
        }

        log_debug!(
            "{} split bucket {} at depth {} -> sibling {}",
            self.id,
            self.buckets[handle.0].id(),
            new_depth,
            sibling_id
        );

        Ok(SplitOutcome { doubled, sibling_id })
    }

    /// 校验目录不变量，返回第一个违反项的描述
    pub fn check_invariants(&self) -> Result<(), String> {
        if self.slots.len() != 1usize << self.depth {
            return Err(format!(
                "{}: size {} != 2^{}",
                self.id,
                self.slots.len(),
                self.depth
            ));
        }

        let mut references = vec![0usize; self.buckets.len()];
        for (address, handle) in self.slots.iter().enumerate() {
            references[handle.0] += 1;
            let bucket = &self.buckets[handle.0];
            if bucket.depth() > self.depth {
                return Err(format!(
                    "{}: bucket {} depth {} exceeds directory depth {}",
                    self.id,
                    bucket.id(),
                    bucket.depth(),
                    self.depth
                ));
            }
            let bits = bucket.depth();
            if rightmost_bits(address as u64, bits) != rightmost_bits(bucket.id() as u64, bits) {
                return Err(format!(
                    "{}: address {} does not share {} low bits with bucket {}",
                    self.id,
                    address,
                    bits,
                    bucket.id()
                ));
            }
        }

        let mut total = 0;
        for (handle, bucket) in self.buckets.iter().enumerate() {
            let expected = 1usize << (self.depth - bucket.depth());
            if references[handle] != expected {
                return Err(format!(
                    "{}: bucket {} referenced {} times, expected {}",
                    self.id,
                    bucket.id(),
                    references[handle],
                    expected
                ));
            }
            if bucket.len() > self.bucket_capacity {
                return Err(format!("{}: bucket {} over capacity", self.id, bucket.id()));
            }
            for &key in bucket.keys() {
                if self.slots[self.address_of(key)].0 != handle {
                    return Err(format!(
                        "{}: key {} stored outside its addressed bucket",
                        self.id, key
                    ));
                }
            }
            total += bucket.len();
        }

        if total != self.key_count {
            return Err(format!(
                "{}: key count {} != stored keys {}",
                self.id, self.key_count, total
            ));
        }
        Ok(())
    }
}
