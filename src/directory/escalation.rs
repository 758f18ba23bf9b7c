//! 通知对象展开
//!
//! 本人邮箱进入 `to`，沿上级链逐层向上的邮箱进入 `cc`。
//! 用显式的待处理队列与已访问表遍历，名册中存在环或悬空的上级编号时也能结束。

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::fmt;

use tracing::{debug, warn};

use super::Directory;
use crate::error::ConfigError;
use crate::models::normalize_employee_id;

/// 升级层数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscalationDepth {
    /// 一直到最上层
    Unbounded,
    /// 最多向上 N 层，0 表示不抄送
    Levels(u32),
}

impl EscalationDepth {
    fn allows(self, level: u32) -> bool {
        match self {
            EscalationDepth::Unbounded => true,
            EscalationDepth::Levels(max) => level <= max,
        }
    }
}

impl TryFrom<i64> for EscalationDepth {
    type Error = ConfigError;

    fn try_from(level: i64) -> Result<Self, Self::Error> {
        match level {
            -1 => Ok(EscalationDepth::Unbounded),
            n if n >= 0 => u32::try_from(n)
                .map(EscalationDepth::Levels)
                .map_err(|_| ConfigError::InvalidEscalationLevel(n)),
            n => Err(ConfigError::InvalidEscalationLevel(n)),
        }
    }
}

impl fmt::Display for EscalationDepth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EscalationDepth::Unbounded => write!(f, "无限"),
            EscalationDepth::Levels(n) => write!(f, "{} 层", n),
        }
    }
}

/// 名册中找不到的员工编号
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryLookupMiss {
    /// 检查结果中的员工
    Employee(String),
    /// 某人的上级
    Boss { employee_id: String, boss_id: String },
}

/// 收件人
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipientSet {
    pub to: BTreeSet<String>,
    pub cc: BTreeSet<String>,
    pub misses: Vec<DirectoryLookupMiss>,
}

impl RecipientSet {
    pub fn is_empty(&self) -> bool {
        self.to.is_empty() && self.cc.is_empty()
    }

    /// 所有收件地址（去重）
    pub fn all_addresses(&self) -> BTreeSet<&str> {
        self.to
            .iter()
            .chain(self.cc.iter())
            .map(String::as_str)
            .collect()
    }
}

/// 展开收件人
pub fn expand_recipients<I, S>(
    employee_ids: I,
    directory: &Directory,
    depth: EscalationDepth,
) -> RecipientSet
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut recipients = RecipientSet::default();
    // 已展开过的员工及其所在层数；以更低的层数再次到达时需要重新展开
    let mut expanded: BTreeMap<String, u32> = BTreeMap::new();
    let mut frontier: VecDeque<(String, u32)> = VecDeque::new();

    for raw_id in employee_ids {
        let id = normalize_employee_id(raw_id.as_ref());
        match directory.get(&id) {
            Some(entry) => {
                recipients.to.insert(entry.mail.clone());
                frontier.push_back((id, 0));
            }
            None => {
                warn!("[员工 {}] 名册中不存在，不发送通知", id);
                recipients.misses.push(DirectoryLookupMiss::Employee(id));
            }
        }
    }

    while let Some((id, level)) = frontier.pop_front() {
        if expanded.get(&id).is_some_and(|&seen| seen <= level) {
            continue;
        }
        expanded.insert(id.clone(), level);

        let next_level = level + 1;
        if !depth.allows(next_level) {
            continue;
        }
        let Some(entry) = directory.get(&id) else {
            continue;
        };
        for boss_id in &entry.boss_ids {
            match directory.get(boss_id) {
                Some(boss) => {
                    if recipients.cc.insert(boss.mail.clone()) {
                        debug!("[员工 {}] 抄送第 {} 层上级 {}", id, next_level, boss_id);
                    }
                    frontier.push_back((boss_id.clone(), next_level));
                }
                None => {
                    warn!("[员工 {}] 上级 {} 在名册中不存在", id, boss_id);
                    let miss = DirectoryLookupMiss::Boss {
                        employee_id: id.clone(),
                        boss_id: boss_id.clone(),
                    };
                    if !recipients.misses.contains(&miss) {
                        recipients.misses.push(miss);
                    }
                }
            }
        }
    }

    recipients
}
