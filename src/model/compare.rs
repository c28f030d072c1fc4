//! 对比面板：朴素的按行号对齐的行级差异
//!
//! 这是位置启发式而非编辑距离对齐：插入一行会让后续所有行号错位，
//! 它们都会被标记为 modified。

use std::collections::BTreeMap;

/// 单行的差异分类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineDiff {
    /// 仅右侧存在该行号
    Added,
    /// 仅左侧存在该行号
    Removed,
    /// 两侧都有该行号但文本不同（精确字符串比较）
    Modified,
}

impl LineDiff {
    /// UI 用的类名形式
    pub fn as_str(&self) -> &'static str {
        match self {
            LineDiff::Added => "added",
            LineDiff::Removed => "removed",
            LineDiff::Modified => "modified",
        }
    }
}

/// 行号（0 起）到分类的映射；未出现的行号表示两侧相同。
///
/// 每个行号只做一次判定：两侧都存在的行号只可能是 modified，
/// 绝不会被 added 覆盖。任一输入为空时不做对比，返回空映射。
pub fn diff_lines(left: &str, right: &str) -> BTreeMap<usize, LineDiff> {
    let mut diff = BTreeMap::new();
    if left.is_empty() || right.is_empty() {
        return diff;
    }

    let l: Vec<&str> = left.split('\n').collect();
    let r: Vec<&str> = right.split('\n').collect();

    for i in 0..l.len().max(r.len()) {
        match (l.get(i), r.get(i)) {
            (Some(_), None) => {
                diff.insert(i, LineDiff::Removed);
            }
            (None, Some(_)) => {
                diff.insert(i, LineDiff::Added);
            }
            (Some(a), Some(b)) if a != b => {
                diff.insert(i, LineDiff::Modified);
            }
            _ => {}
        }
    }
    diff
}

/// 对比面板状态
#[derive(Debug, Default)]
pub struct CompareState {
    pub left: String,
    pub right: String,
    /// 每次任一输入变化都整体重算，不做增量更新
    pub diff: BTreeMap<usize, LineDiff>,
}

impl CompareState {
    pub fn set_left(&mut self, text: String) {
        self.left = text;
        self.recompute();
    }

    pub fn set_right(&mut self, text: String) {
        self.right = text;
        self.recompute();
    }

    pub fn recompute(&mut self) {
        self.diff = diff_lines(&self.left, &self.right);
    }
}
