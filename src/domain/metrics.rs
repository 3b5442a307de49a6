// ==========================================
// 销售数据 ETL 系统 - 运行指标模型
// ==========================================
// 职责: 转换统计（TransformStats）/ 运行报告（RunMetrics）
// ==========================================

use crate::domain::types::{RunStatus, Stage};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::time::Duration;

// ==========================================
// StatDelta - 单个清洗规则的统计增量
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatDelta {
    StringsNormalized(usize),
    DatesInvalidated(i64), // 可为负数（重新解析后缺失减少）
    NegativesCorrected(usize),
    NullsFilled(usize),
}

// ==========================================
// TransformStats - 转换阶段统计
// ==========================================
// 红线: 只累加，管道完成后只读
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformStats {
    pub original_count: usize,
    pub strings_normalized: usize,
    pub dates_invalidated: i64,
    pub negatives_corrected: usize,
    pub nulls_filled: usize,
    pub duplicates_removed: usize,
    pub accepted_count: usize,
    pub rejected_count: usize,
}

impl TransformStats {
    pub fn new(original_count: usize) -> Self {
        Self {
            original_count,
            ..Default::default()
        }
    }

    /// 合并清洗规则增量
    pub fn absorb(&mut self, delta: StatDelta) {
        match delta {
            StatDelta::StringsNormalized(n) => self.strings_normalized += n,
            StatDelta::DatesInvalidated(n) => self.dates_invalidated += n,
            StatDelta::NegativesCorrected(n) => self.negatives_corrected += n,
            StatDelta::NullsFilled(n) => self.nulls_filled += n,
        }
    }

    /// 拒绝率（百分比）
    pub fn rejection_rate(&self) -> f64 {
        if self.original_count == 0 {
            return 0.0;
        }
        self.rejected_count as f64 / self.original_count as f64 * 100.0
    }
}

// ==========================================
// StageMetrics - 单阶段指标
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageMetrics {
    pub stage: Stage,
    pub records_in: usize,
    pub records_out: usize,
    pub rejected: usize,
    pub duration_ms: u64,
}

impl StageMetrics {
    pub fn new(stage: Stage, records_in: usize, records_out: usize, duration: Duration) -> Self {
        Self {
            stage,
            records_in,
            records_out,
            rejected: 0,
            duration_ms: duration.as_millis() as u64,
        }
    }

    pub fn with_rejected(mut self, rejected: usize) -> Self {
        self.rejected = rejected;
        self
    }

    pub fn duration_seconds(&self) -> f64 {
        self.duration_ms as f64 / 1000.0
    }
}

// ==========================================
// RunMetrics - 单次运行报告
// ==========================================
// 生命周期: 运行开始创建 → 各阶段写入 → 结束时定稿
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunMetrics {
    pub execution_id: String,
    pub status: RunStatus,
    pub started_at: DateTime<Local>,
    pub finished_at: Option<DateTime<Local>>,
    pub duration_seconds: Option<f64>,
    pub stages: Vec<StageMetrics>,
    pub transform_stats: Option<TransformStats>,
    pub error: Option<String>,
}

impl RunMetrics {
    pub fn start(execution_id: String) -> Self {
        Self {
            execution_id,
            status: RunStatus::Started,
            started_at: Local::now(),
            finished_at: None,
            duration_seconds: None,
            stages: Vec::new(),
            transform_stats: None,
            error: None,
        }
    }

    pub fn record_stage(&mut self, stage: StageMetrics) {
        self.stages.push(stage);
    }

    pub fn stage(&self, stage: Stage) -> Option<&StageMetrics> {
        self.stages.iter().find(|s| s.stage == stage)
    }

    pub fn mark_completed(&mut self) {
        self.status = RunStatus::Completed;
    }

    pub fn mark_failed(&mut self, error: String) {
        self.status = RunStatus::Failed;
        self.error = Some(error);
    }

    /// 定稿：写入结束时间与总耗时
    pub fn finalize(&mut self) {
        let finished_at = Local::now();
        let elapsed = finished_at
            .signed_duration_since(self.started_at)
            .num_milliseconds()
            .max(0);
        self.finished_at = Some(finished_at);
        self.duration_seconds = Some(elapsed as f64 / 1000.0);
    }

    pub fn is_finalized(&self) -> bool {
        self.finished_at.is_some()
    }
}
