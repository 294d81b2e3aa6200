// src/map/bucket.rs
//! 桶实现 - 固定容量的键序列和寻址元数据

use crate::types::Key;
use std::fmt;

/// 桶在目录内存池中的句柄
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BucketHandle(pub(crate) usize);

impl BucketHandle {
    /// 内存池下标
    pub fn index(self) -> usize {
        self.0
    }
}

/// 桶
///
/// `id` 是第一个 (最小的) 指向该桶的目录地址，`depth` 是决定桶成员的
/// 哈希低位位数。键按插入顺序保存，最多 `capacity` 个且互不相同。
#[derive(Clone, PartialEq, Eq)]
pub struct Bucket {
    id: usize,
    depth: u32,
    capacity: usize,
    keys: Vec<Key>,
}

impl fmt::Debug for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Bucket(id: {}, depth: {}, keys: {:?}/{})",
            self.id, self.depth, self.keys, self.capacity
        )
    }
}

impl Bucket {
    pub fn new(id: usize, depth: u32, capacity: usize) -> Self {
        Self {
            id,
            depth,
            capacity,
            keys: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn id(&self) -> usize {
        self.id
    }

    #[inline]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// 返回桶中所有键
    #[inline]
    pub fn keys(&self) -> &[Key] {
        &self.keys
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.keys.len() >= self.capacity
    }

    pub fn contains(&self, key: Key) -> bool {
        self.keys.contains(&key)
    }

    /// 追加键，桶已满时返回 `false` 且不修改桶
    #[must_use]
    pub fn push(&mut self, key: Key) -> bool {
        if self.is_full() {
            return false;
        }
        self.keys.push(key);
        true
    }

    /// 按值删除键，保持其余键的顺序
    pub fn remove(&mut self, key: Key) -> bool {
        match self.keys.iter().position(|&k| k == key) {
            Some(pos) => {
                self.keys.remove(pos);
                true
            }
            None => false,
        }
    }

    /// 踢出最早进入的键，把 `key` 追加到末尾
    ///
    /// 桶为空时不做修改并返回 `None`。
    pub fn displace(&mut self, key: Key) -> Option<Key> {
        if self.keys.is_empty() {
            return None;
        }
        let evicted = self.keys.remove(0);
        self.keys.push(key);
        Some(evicted)
    }

    /// 深度加一，返回分裂出的兄弟桶的 id
    ///
    /// 兄弟桶 id 为原 id 在新增的那一位上置 1。
    pub(crate) fn deepen(&mut self) -> usize {
        let sibling_id = self.id | (1usize << self.depth);
        self.depth += 1;
        sibling_id
    }

    /// 取出全部键，桶变为空
    pub(crate) fn take_keys(&mut self) -> Vec<Key> {
        std::mem::replace(&mut self.keys, Vec::with_capacity(self.capacity))
    }
}
