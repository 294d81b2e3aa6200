// src/stats/operation.rs
//! 操作统计 - 跟踪哈希表操作次数和耗时

use crate::types::OperationType;
use std::{
    fmt::Write,
    sync::atomic::{AtomicU64, Ordering},
    time::Duration,
};

/// 操作统计接口
pub trait OperationRecorder: Send + Sync {
    /// 记录带耗时的操作
    fn record(&self, op_type: OperationType, duration: Duration, success: bool);
    /// 只记录操作次数 (内部事件：分裂、翻倍、踢出)
    fn record_count(&self, op_type: OperationType);
    /// 获取操作统计快照
    fn snapshot(&self) -> OperationStatsSnapshot;

    /// 重置统计
    fn reset(&self);

    /// 导出Prometheus格式指标
    fn export_prometheus(&self) -> String;
}

/// 操作统计快照
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct OperationStatsSnapshot {
    pub insert_count: u64,
    pub lookup_count: u64,
    pub remove_count: u64,
    pub split_count: u64,
    pub resize_count: u64,
    pub kick_count: u64,
    pub cycle_break_count: u64,
    /// 返回 `false` 的插入、查询、删除次数
    pub failed_count: u64,
    pub total_duration: u64, // 纳秒
}

impl OperationStatsSnapshot {
    /// 按操作类型取计数
    pub fn count(&self, op_type: OperationType) -> u64 {
        match op_type {
            OperationType::Insert => self.insert_count,
            OperationType::Lookup => self.lookup_count,
            OperationType::Remove => self.remove_count,
            OperationType::Split => self.split_count,
            OperationType::Resize => self.resize_count,
            OperationType::Kick => self.kick_count,
            OperationType::CycleBreak => self.cycle_break_count,
        }
    }

    /// 累计耗时
    pub fn total_time(&self) -> Duration {
        Duration::from_nanos(self.total_duration)
    }
}

/// 原子操作统计
///
/// 查询只持有表的共享引用，所以计数器用原子类型。
#[derive(Debug, Default)]
pub struct AtomicOperationStats {
    insert_count: AtomicU64,
    lookup_count: AtomicU64,
    remove_count: AtomicU64,
    split_count: AtomicU64,
    resize_count: AtomicU64,
    kick_count: AtomicU64,
    cycle_break_count: AtomicU64,
    failed_count: AtomicU64,
    total_duration: AtomicU64, // 纳秒
}

impl AtomicOperationStats {
    /// 创建新统计
    pub fn new() -> Self {
        Self::default()
    }

    fn counter(&self, op_type: OperationType) -> &AtomicU64 {
        match op_type {
            OperationType::Insert => &self.insert_count,
            OperationType::Lookup => &self.lookup_count,
            OperationType::Remove => &self.remove_count,
            OperationType::Split => &self.split_count,
            OperationType::Resize => &self.resize_count,
            OperationType::Kick => &self.kick_count,
            OperationType::CycleBreak => &self.cycle_break_count,
        }
    }
}

impl OperationRecorder for AtomicOperationStats {
    fn record(&self, op_type: OperationType, duration: Duration, success: bool) {
        let nanos = u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX);

        self.counter(op_type).fetch_add(1, Ordering::Relaxed);
        self.total_duration.fetch_add(nanos, Ordering::Relaxed);

        if !success {
            self.failed_count.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn record_count(&self, op_type: OperationType) {
        self.counter(op_type).fetch_add(1, Ordering::Relaxed);
    }

    fn snapshot(&self) -> OperationStatsSnapshot {
        OperationStatsSnapshot {
            insert_count: self.insert_count.load(Ordering::Relaxed),
            lookup_count: self.lookup_count.load(Ordering::Relaxed),
            remove_count: self.remove_count.load(Ordering::Relaxed),
            split_count: self.split_count.load(Ordering::Relaxed),
            resize_count: self.resize_count.load(Ordering::Relaxed),
            kick_count: self.kick_count.load(Ordering::Relaxed),
            cycle_break_count: self.cycle_break_count.load(Ordering::Relaxed),
            failed_count: self.failed_count.load(Ordering::Relaxed),
            total_duration: self.total_duration.load(Ordering::Relaxed),
        }
    }

    fn reset(&self) {
        for op in OperationType::ALL {
            self.counter(op).store(0, Ordering::Relaxed);
        }
        self.failed_count.store(0, Ordering::Relaxed);
        self.total_duration.store(0, Ordering::Relaxed);
    }

    fn export_prometheus(&self) -> String {
        let snapshot = self.snapshot();
        let mut output = String::new();

        for op in OperationType::ALL {
            let _ = writeln!(
                output,
                "# HELP xuckoo_operation_{}_count Total {} operations",
                op.as_str(),
                op.as_str()
            );
            let _ = writeln!(output, "# TYPE xuckoo_operation_{}_count counter", op.as_str());
            let _ = writeln!(output, "xuckoo_operation_{}_count {}", op.as_str(), snapshot.count(op));
        }

        // 添加总持续时间和失败计数
        output.push_str("# HELP xuckoo_operation_total_duration Total operation duration (ns)\n");
        output.push_str("# TYPE xuckoo_operation_total_duration counter\n");
        let _ = writeln!(output, "xuckoo_operation_total_duration {}", snapshot.total_duration);

        output.push_str("# HELP xuckoo_operation_failed_count Operations that returned false\n");
        output.push_str("# TYPE xuckoo_operation_failed_count counter\n");
        let _ = writeln!(output, "xuckoo_operation_failed_count {}", snapshot.failed_count);

        output
    }
}

/// 禁用操作统计实现
#[derive(Debug, Default)]
pub struct DisabledOperationRecorder;

impl OperationRecorder for DisabledOperationRecorder {
    fn record(&self, _op_type: OperationType, _duration: Duration, _success: bool) {}
    fn record_count(&self, _op_type: OperationType) {}
    fn snapshot(&self) -> OperationStatsSnapshot { OperationStatsSnapshot::default() }
    fn reset(&self) {}
    fn export_prometheus(&self) -> String { String::new() }
}
