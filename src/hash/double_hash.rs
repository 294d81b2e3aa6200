//! 双哈希策略 - 使用两个独立哈希函数分别寻址两个目录

use crate::{
    hash::strategy::{HashAlgorithm, HashStrategy, HasherFunction},
    types::{DirectoryId, Key},
};
use ahash::RandomState;
use std::{
    fmt,
    hash::{BuildHasher, Hasher},
    sync::Arc,
};

const PRIMARY_SEED: u64 = 42;
const SECONDARY_SEED: u64 = 123;

/// 双哈希策略
#[derive(Clone)]
pub struct DoubleHashStrategy {
    primary_hasher: Arc<dyn HasherFunction>,
    secondary_hasher: Arc<dyn HasherFunction>,
    algorithm: Option<HashAlgorithm>,
}

impl DoubleHashStrategy {
    /// 创建新双哈希策略
    pub fn new(algorithm: HashAlgorithm) -> Self {
        // 使用不同种子创建两个哈希函数
        Self {
            primary_hasher: Self::build_hasher_function(algorithm, PRIMARY_SEED),
            secondary_hasher: Self::build_hasher_function(algorithm, SECONDARY_SEED),
            algorithm: Some(algorithm),
        }
    }

    /// 使用自定义哈希函数创建
    pub fn from_functions<F1, F2>(h1: F1, h2: F2) -> Self
    where
        F1: HasherFunction + 'static,
        F2: HasherFunction + 'static,
    {
        Self {
            primary_hasher: Arc::new(h1),
            secondary_hasher: Arc::new(h2),
            algorithm: None,
        }
    }

    /// 使用的哈希算法，自定义函数时为 `None`
    pub fn algorithm(&self) -> Option<HashAlgorithm> {
        self.algorithm
    }

    /// 构建哈希函数
    fn build_hasher_function(algorithm: HashAlgorithm, seed: u64) -> Arc<dyn HasherFunction> {
        match algorithm {
            HashAlgorithm::AHash => {
                let state = RandomState::with_seed(seed as usize);
                Arc::new(move |key: Key| {
                    let mut hasher = state.build_hasher();
                    hasher.write_u64(key);
                    hasher.finish()
                })
            }
            HashAlgorithm::XxHash => Arc::new(move |key: Key| {
                let mut hasher = twox_hash::XxHash64::with_seed(seed);
                hasher.write_u64(key);
                hasher.finish()
            }),
            HashAlgorithm::Default => Arc::new(move |key: Key| {
                // DefaultHasher::new 的密钥固定，用种子区分两个函数
                let mut hasher = std::collections::hash_map::DefaultHasher::new();
                hasher.write_u64(seed);
                hasher.write_u64(key);
                hasher.finish()
            }),
        }
    }
}

impl Default for DoubleHashStrategy {
    fn default() -> Self {
        Self::new(HashAlgorithm::default())
    }
}

impl fmt::Debug for DoubleHashStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DoubleHashStrategy")
            .field("algorithm", &self.algorithm)
            .finish()
    }
}

impl HashStrategy for DoubleHashStrategy {
    fn hasher(&self, directory: DirectoryId) -> Arc<dyn HasherFunction> {
        match directory {
            DirectoryId::First => Arc::clone(&self.primary_hasher),
            DirectoryId::Second => Arc::clone(&self.secondary_hasher),
        }
    }

    fn digest(&self, directory: DirectoryId, key: Key) -> u64 {
        match directory {
            DirectoryId::First => self.primary_hasher.hash_key(key),
            DirectoryId::Second => self.secondary_hasher.hash_key(key),
        }
    }
}

// 单元测试
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_double_hash_ahash() {
        test_double_hash_algorithm(HashAlgorithm::AHash);
    }

    #[test]
    fn test_double_hash_xxhash() {
        test_double_hash_algorithm(HashAlgorithm::XxHash);
    }

    #[test]
    fn test_double_hash_default() {
        test_double_hash_algorithm(HashAlgorithm::Default);
    }

    fn test_double_hash_algorithm(algorithm: HashAlgorithm) {
        let strategy = DoubleHashStrategy::new(algorithm);

        // 两个哈希函数应当独立：大量键中至少有一个摘要不同
        let differing = (0..64u64)
            .filter(|&key| {
                let (h1, h2) = strategy.digests(key);
                h1 != h2
            })
            .count();
        assert!(differing > 60, "h1 与 h2 应相互独立 ({:?})", algorithm);
        assert_eq!(strategy.algorithm(), Some(algorithm));
    }

    #[test]
    fn test_same_key_same_digest() {
        let strategy = DoubleHashStrategy::default();
        let again = DoubleHashStrategy::default();

        for key in [0u64, 1, 42, u64::MAX] {
            assert_eq!(strategy.digests(key), strategy.digests(key), "同一策略下摘要应稳定");
            assert_eq!(strategy.digests(key), again.digests(key), "固定种子下不同实例摘要应一致");
        }
    }

    #[test]
    fn test_low_bits_spread() {
        let strategy = DoubleHashStrategy::default();
        // 低位用于目录寻址，低4位应覆盖全部16个取值
        let mut seen = [false; 16];
        for key in 0..512u64 {
            seen[(strategy.digest(DirectoryId::First, key) & 0xF) as usize] = true;
        }
        assert!(seen.iter().all(|&s| s), "低位分布过于集中");
    }

    #[test]
    fn test_custom_functions() {
        let strategy = DoubleHashStrategy::from_functions(|key: Key| key, |key: Key| key >> 1);
        assert_eq!(strategy.digests(6), (6, 3));
        assert_eq!(strategy.algorithm(), None);
        assert_eq!(strategy.hasher(DirectoryId::Second).hash_key(10), 5);
    }
}
