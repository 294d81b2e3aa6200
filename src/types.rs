//! 核心类型定义 - 共享类型和接口

use std::fmt;

/// 键类型 - 64位无符号整数
pub type Key = u64;

/// 两个目录的编号
///
/// `First` 由 h1 寻址，`Second` 由 h2 寻址。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DirectoryId {
    First,
    Second,
}

impl DirectoryId {
    /// 另一个目录
    pub fn other(self) -> Self {
        match self {
            DirectoryId::First => DirectoryId::Second,
            DirectoryId::Second => DirectoryId::First,
        }
    }

    /// 目录序号 (1 或 2)
    pub fn number(self) -> usize {
        match self {
            DirectoryId::First => 1,
            DirectoryId::Second => 2,
        }
    }
}

impl fmt::Display for DirectoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "table {}", self.number())
    }
}

/// 操作类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationType {
    /// 插入操作
    Insert,
    /// 查询操作
    Lookup,
    /// 删除操作
    Remove,
    /// 桶分裂
    Split,
    /// 目录翻倍
    Resize,
    /// 踢出操作
    Kick,
    /// 为打破踢出循环而强制分裂
    CycleBreak,
}

impl OperationType {
    /// 所有操作类型，按导出顺序排列
    pub const ALL: [OperationType; 7] = [
        OperationType::Insert,
        OperationType::Lookup,
        OperationType::Remove,
        OperationType::Split,
        OperationType::Resize,
        OperationType::Kick,
        OperationType::CycleBreak,
    ];

    /// 转换为字符串表示
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationType::Insert => "insert",
            OperationType::Lookup => "lookup",
            OperationType::Remove => "remove",
            OperationType::Split => "split",
            OperationType::Resize => "resize",
            OperationType::Kick => "kick",
            OperationType::CycleBreak => "cycle_break",
        }
    }
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
