//! 哈希模块 - 统一管理哈希相关功能

pub mod strategy;
pub mod double_hash;

pub use strategy::{HashAlgorithm, HashStrategy, HasherFunction};
pub use double_hash::DoubleHashStrategy;

/// 取摘要最右侧 `depth` 位作为目录地址
#[inline]
pub fn rightmost_bits(digest: u64, depth: u32) -> usize {
    if depth == 0 {
        0
    } else if depth >= u64::BITS {
        digest as usize
    } else {
        (digest & ((1u64 << depth) - 1)) as usize
    }
}

// 单元测试
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rightmost_bits() {
        assert_eq!(rightmost_bits(0b1011_0110, 0), 0);
        assert_eq!(rightmost_bits(0b1011_0110, 1), 0);
        assert_eq!(rightmost_bits(0b1011_0110, 3), 0b110);
        assert_eq!(rightmost_bits(0b1011_0110, 5), 0b10110);
        assert_eq!(rightmost_bits(u64::MAX, 64), u64::MAX as usize);
    }
}
