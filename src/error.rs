//! 统一错误处理 - 扩展Cuckoo哈希表的错误类型和恢复建议
//!
//! 重复键、键不存在都不是错误，分别由 `insert` / `remove` 返回 `false` 表示；
//! 桶满、踢出循环属于放置算法内部状态，不会暴露给调用方。

use crate::types::DirectoryId;

/// 扩展Cuckoo哈希表可能发生的错误
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CuckooError {
    /// 目录翻倍后会超过上限，说明桶容量过小或哈希函数存在严重冲突
    #[error("{directory} 目录容量耗尽 (翻倍后大小: {size}, 上限: {limit})")]
    CapacityExhausted {
        directory: DirectoryId,
        size: usize,
        limit: usize,
    },

    #[error("无效配置: {reason}")]
    InvalidConfig {
        reason: String,
    },
}

impl CuckooError {
    /// 获取错误恢复建议
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            Self::CapacityExhausted { .. } => Some("增大桶容量或更换哈希函数"),
            Self::InvalidConfig { .. } => Some("检查配置参数"),
        }
    }

    /// 判断错误是否可恢复
    ///
    /// 容量耗尽是配置错误而非瞬时故障，出错后表中可能有一个键未能放置。
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::CapacityExhausted { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CuckooError::CapacityExhausted {
            directory: DirectoryId::Second,
            size: 64,
            limit: 32,
        };
        let text = err.to_string();
        assert!(text.contains("64"), "错误信息应包含翻倍后大小: {}", text);
        assert!(text.contains("32"), "错误信息应包含上限: {}", text);
        assert!(text.contains("table 2"), "错误信息应包含目录编号: {}", text);
    }

    #[test]
    fn test_recoverability() {
        let fatal = CuckooError::CapacityExhausted {
            directory: DirectoryId::First,
            size: 2,
            limit: 1,
        };
        assert!(!fatal.is_recoverable());
        assert!(fatal.recovery_suggestion().is_some());

        let config = CuckooError::InvalidConfig { reason: "bucket_capacity 为 0".into() };
        assert!(config.is_recoverable());
    }
}
