use crate::workflow::{Outcome, SkipReason};
use std::collections::BTreeMap;

/// 单次命令运行的累计计数
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunResult {
    /// 已遍历的记录数
    pub seen: usize,
    /// 已写回远程的记录数
    pub sent: usize,
    /// 试运行中构建但未写回的记录数
    pub tested: usize,
    /// 远程拒绝写入的记录数
    pub failed: usize,
    /// 按原因统计的跳过数
    pub skipped: BTreeMap<SkipReason, usize>,
}

impl RunResult {
    /// 每条完成的记录恰好调用一次
    pub fn record(&mut self, outcome: &Outcome) {
        self.seen += 1;
        match outcome {
            Outcome::Sent => self.sent += 1,
            Outcome::Tested => self.tested += 1,
            Outcome::Rejected(_) => self.failed += 1,
            Outcome::Skipped(reason) => *self.skipped.entry(*reason).or_insert(0) += 1,
        }
    }

    pub fn processed(&self) -> usize {
        self.sent + self.tested
    }

    pub fn skipped_total(&self) -> usize {
        self.skipped.values().sum()
    }

    pub fn skipped_for(&self, reason: SkipReason) -> usize {
        self.skipped.get(&reason).copied().unwrap_or(0)
    }

    pub fn merge(&mut self, other: RunResult) {
        self.seen += other.seen;
        self.sent += other.sent;
        self.tested += other.tested;
        self.failed += other.failed;
        for (reason, count) in other.skipped {
            *self.skipped.entry(reason).or_insert(0) += count;
        }
    }
}
