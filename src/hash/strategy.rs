//! 哈希策略模块 - 定义两个目录使用的哈希函数

use crate::types::{DirectoryId, Key};
use std::sync::Arc;

/// 哈希算法选择
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HashAlgorithm {
    AHash,
    #[default]
    XxHash,
    Default,
}

/// 哈希函数特征 - 把64位键映射为64位摘要
///
/// 必须是确定性的纯函数：同一个键在表的整个生命周期内摘要不变。
pub trait HasherFunction: Send + Sync {
    fn hash_key(&self, key: Key) -> u64;
}

impl<T> HasherFunction for T
where
    T: Fn(Key) -> u64 + Send + Sync,
{
    fn hash_key(&self, key: Key) -> u64 {
        self(key)
    }
}

/// 哈希策略特征
pub trait HashStrategy: Send + Sync {
    /// 获取指定目录使用的哈希函数
    fn hasher(&self, directory: DirectoryId) -> Arc<dyn HasherFunction>;

    /// 计算键在指定目录下的摘要
    fn digest(&self, directory: DirectoryId, key: Key) -> u64 {
        self.hasher(directory).hash_key(key)
    }

    /// 同时计算 (h1, h2)
    fn digests(&self, key: Key) -> (u64, u64) {
        (
            self.digest(DirectoryId::First, key),
            self.digest(DirectoryId::Second, key),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedStrategy;

    impl HashStrategy for FixedStrategy {
        fn hasher(&self, directory: DirectoryId) -> Arc<dyn HasherFunction> {
            match directory {
                DirectoryId::First => Arc::new(|key: Key| key),
                DirectoryId::Second => Arc::new(|key: Key| !key),
            }
        }
    }

    #[test]
    fn test_closure_as_hasher() {
        let double = |key: Key| key.wrapping_mul(2);
        assert_eq!(double.hash_key(21), 42);
    }

    #[test]
    fn test_default_digests() {
        let strategy = FixedStrategy;
        assert_eq!(strategy.digests(5), (5, !5));
        assert_eq!(strategy.digest(DirectoryId::Second, 0), u64::MAX);
    }

    #[test]
    fn test_default_algorithm() {
        assert_eq!(HashAlgorithm::default(), HashAlgorithm::XxHash);
    }
}
