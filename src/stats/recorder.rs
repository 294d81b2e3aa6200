// src/stats/recorder.rs
//! 统计记录器接口 - 定义统一统计API

use std::time::Duration;

use crate::{
    stats::operation::{
        AtomicOperationStats, DisabledOperationRecorder, OperationRecorder, OperationStatsSnapshot,
    },
    types::OperationType,
};

/// 统计记录器特征
///
/// 由调用方注入哈希表，表本身不依赖任何全局状态。
pub trait StatsRecorder: Send + Sync {
    /// 记录操作
    fn record_operation(&self, op_type: OperationType, duration: Duration, success: bool);
    /// 记录操作计数
    fn record_operation_count(&self, op_type: OperationType);
    /// 获取操作统计接口
    fn operation_stats(&self) -> &dyn OperationRecorder;

    /// 重置所有统计
    fn reset(&self);

    /// 导出Prometheus格式指标
    fn export_prometheus(&self) -> String;

    /// 获取操作统计快照
    fn operation_stats_snapshot(&self) -> OperationStatsSnapshot {
        self.operation_stats().snapshot()
    }
}

/// 默认统计记录器实现
#[derive(Debug, Default)]
pub struct DefaultStatsRecorder {
    operation: AtomicOperationStats,
}

impl DefaultStatsRecorder {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StatsRecorder for DefaultStatsRecorder {
    fn record_operation(&self, op_type: OperationType, duration: Duration, success: bool) {
        self.operation.record(op_type, duration, success);
    }

    fn record_operation_count(&self, op_type: OperationType) {
        self.operation.record_count(op_type);
    }

    fn operation_stats(&self) -> &dyn OperationRecorder {
        &self.operation
    }

    fn reset(&self) {
        self.operation.reset();
    }

    fn export_prometheus(&self) -> String {
        self.operation.export_prometheus()
    }
}

/// 禁用的统计记录器，所有调用均为空操作
#[derive(Debug, Default)]
pub struct DisabledStatsRecorder {
    operation: DisabledOperationRecorder,
}

impl StatsRecorder for DisabledStatsRecorder {
    fn record_operation(&self, _op_type: OperationType, _duration: Duration, _success: bool) {}

    fn record_operation_count(&self, _op_type: OperationType) {}

    fn operation_stats(&self) -> &dyn OperationRecorder {
        &self.operation
    }

    fn reset(&self) {}

    fn export_prometheus(&self) -> String {
        String::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_recorder() {
        let recorder = DefaultStatsRecorder::new();
        recorder.record_operation(OperationType::Lookup, Duration::from_nanos(7), false);
        recorder.record_operation_count(OperationType::Resize);

        let snapshot = recorder.operation_stats_snapshot();
        assert_eq!(snapshot.lookup_count, 1);
        assert_eq!(snapshot.resize_count, 1);
        assert_eq!(snapshot.failed_count, 1);
        assert!(recorder.export_prometheus().contains("xuckoo_operation_lookup_count 1"));

        recorder.reset();
        assert_eq!(recorder.operation_stats_snapshot(), OperationStatsSnapshot::default());
    }

    #[test]
    fn test_disabled_recorder() {
        let recorder = DisabledStatsRecorder::default();
        recorder.record_operation(OperationType::Insert, Duration::from_nanos(3), true);
        recorder.record_operation_count(OperationType::Split);
        assert_eq!(recorder.operation_stats_snapshot(), OperationStatsSnapshot::default());
        assert!(recorder.export_prometheus().is_empty());
    }
}
