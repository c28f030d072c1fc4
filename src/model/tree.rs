//! 树视图面板：扁平节点序列（arena）与折叠状态
//!
//! 节点在解析时按深度优先顺序获得稳定的整数编号，折叠标志直接存放在
//! 节点上，避免用结构路径字符串做查找键（重复键名也不会混淆）。

use serde_json::Value;

/// JSON 节点类型（与 UI 展示解耦）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Object,
    Array,
    String,
    Number,
    Bool,
    Null,
}

#[derive(Debug, Clone)]
pub struct TreeNode {
    /// 深度优先顺序分配的稳定编号（等于它在 arena 中的下标）
    pub id: usize,
    /// 父级中的键名或索引的字符串形式，根节点为 "$"
    pub name: String,
    /// 节点类型
    pub kind: NodeKind,
    /// 子元素数量（对象字段数 / 数组长度）；为 0 的容器不提供折叠开关
    pub children: u32,
    /// 展示文本：标量为字面量，容器为 "Object {n}" / "Array [n]"
    pub preview: String,
    /// 嵌套深度（用于缩进）
    pub depth: u32,
    /// 是否展开
    pub expanded: bool,
    /// 是否可见（所有祖先均展开时可见）
    pub visible: bool,
}

impl TreeNode {
    /// 有子元素的容器才有折叠开关
    pub fn can_toggle(&self) -> bool {
        matches!(self.kind, NodeKind::Object | NodeKind::Array) && self.children > 0
    }
}

fn kind_of(v: &Value) -> NodeKind {
    match v {
        Value::Object(_) => NodeKind::Object,
        Value::Array(_) => NodeKind::Array,
        Value::String(_) => NodeKind::String,
        Value::Number(_) => NodeKind::Number,
        Value::Bool(_) => NodeKind::Bool,
        Value::Null => NodeKind::Null,
    }
}

/// 标量按字面量展示（字符串带引号），容器展示类型与规模
fn preview_of(v: &Value) -> String {
    match v {
        Value::String(s) => {
            if s.chars().count() > 48 {
                let truncated: String = s.chars().take(48).collect();
                format!("\"{}...\"", truncated)
            } else {
                format!("\"{}\"", s)
            }
        }
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Object(m) => format!("Object {{{}}}", m.len()),
        Value::Array(a) => format!("Array [{}]", a.len()),
    }
}

/// 从根 Value 构建整棵 arena 树。
///
/// 容器节点的初始展开状态：`expand_all || depth < 2`；标量与空容器
/// 没有开关，展开标志恒为 false。
pub fn build_tree(root: &Value, expand_all: bool) -> Vec<TreeNode> {
    fn walk(out: &mut Vec<TreeNode>, v: &Value, name: &str, depth: u32, expand_all: bool) {
        let children = match v {
            Value::Object(m) => m.len() as u32,
            Value::Array(a) => a.len() as u32,
            _ => 0,
        };
        let is_container = matches!(v, Value::Object(_) | Value::Array(_));
        out.push(TreeNode {
            id: out.len(),
            name: name.to_string(),
            kind: kind_of(v),
            children,
            preview: preview_of(v),
            depth,
            expanded: is_container && children > 0 && (expand_all || depth < 2),
            visible: true,
        });
        match v {
            Value::Object(map) => {
                for (k, child) in map {
                    walk(out, child, k, depth + 1, expand_all);
                }
            }
            Value::Array(arr) => {
                for (idx, child) in arr.iter().enumerate() {
                    walk(out, child, &format!("[{}]", idx), depth + 1, expand_all);
                }
            }
            _ => {}
        }
    }

    let mut out = Vec::with_capacity(64);
    walk(&mut out, root, "$", 0, expand_all);
    out
}

/// 树视图面板状态
#[derive(Debug, Default)]
pub struct TreeState {
    /// 用户粘贴的原始文本
    pub input: String,
    /// 最近一次成功解析的 DOM；解析失败时为 None（空树即"无内容"）
    pub dom: Option<Value>,
    /// 扁平节点序列，下标即节点编号
    pub nodes: Vec<TreeNode>,
    /// 全局展开标志（持久化；同时作为新树的初始种子）
    pub expand_all: bool,
}

impl TreeState {
    /// 解析输入并重建整棵树；失败时清空树（静默吸收，不上抛错误）
    pub fn parse(&mut self) {
        match serde_json::from_str::<Value>(&self.input) {
            Ok(v) => {
                self.nodes = build_tree(&v, self.expand_all);
                self.dom = Some(v);
                self.update_visibility();
            }
            Err(e) => {
                tracing::warn!("树视图解析失败，清空展示: {}", e);
                self.dom = None;
                self.nodes.clear();
            }
        }
    }

    /// 翻转单个容器节点的展开状态；标量与空容器忽略
    pub fn toggle(&mut self, id: usize) {
        if let Some(node) = self.nodes.get_mut(id) {
            if node.can_toggle() {
                node.expanded = !node.expanded;
                self.update_visibility();
            }
        }
    }

    /// 展开/折叠全部：显式重置每个容器的标志（全局开关是权威状态，
    /// 不只是挂载时的种子）
    pub fn set_all_expanded(&mut self, expanded: bool) {
        self.expand_all = expanded;
        for node in &mut self.nodes {
            if node.can_toggle() {
                node.expanded = expanded;
            }
        }
        self.update_visibility();
    }

    /// 可见性规则：所有祖先都展开的节点才可见，根节点恒可见
    pub fn update_visibility(&mut self) {
        // ancestors[d] 记录深度 d 上最近一个祖先的展开标志
        let mut ancestors: Vec<bool> = Vec::new();
        for node in &mut self.nodes {
            ancestors.truncate(node.depth as usize);
            node.visible = ancestors.iter().all(|&e| e);
            ancestors.push(node.expanded);
        }
    }

    /// 供 UI 渲染的可见节点
    pub fn visible_nodes(&self) -> impl Iterator<Item = &TreeNode> {
        self.nodes.iter().filter(|n| n.visible)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parsed(input: &str) -> TreeState {
        let mut st = TreeState {
            input: input.to_string(),
            ..Default::default()
        };
        st.parse();
        st
    }

    fn node_by_name<'a>(st: &'a TreeState, name: &str) -> &'a TreeNode {
        st.nodes.iter().find(|n| n.name == name).expect("节点应该存在")
    }

    #[test]
    fn test_ids_assigned_in_depth_first_order() {
        let st = parsed(r#"{"a": {"b": 1}, "c": [true]}"#);
        let names: Vec<&str> = st.nodes.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["$", "a", "b", "c", "[0]"], "遍历顺序应该是深度优先");
        for (i, n) in st.nodes.iter().enumerate() {
            assert_eq!(n.id, i, "编号应该等于下标");
        }
    }

    #[test]
    fn test_depth_seed_rule() {
        // 深度0、1的容器默认展开，深度≥2折叠
        let st = parsed(r#"{"a":{"b":{"c":1}}}"#);
        assert!(node_by_name(&st, "$").expanded, "根容器（深度0）应该展开");
        assert!(node_by_name(&st, "a").expanded, "深度1容器应该展开");
        assert!(!node_by_name(&st, "b").expanded, "深度2容器应该折叠");
        // c 是标量叶子，没有状态
        let c = node_by_name(&st, "c");
        assert!(!c.can_toggle(), "标量叶子不应有折叠开关");
    }

    #[test]
    fn test_expand_all_seed_overrides_depth_rule() {
        let mut st = TreeState {
            input: r#"{"a":{"b":{"c":{"d":1}}}}"#.to_string(),
            expand_all: true,
            ..Default::default()
        };
        st.parse();
        assert!(node_by_name(&st, "c").expanded, "expand_all 种子应该展开深层容器");
    }

    #[test]
    fn test_toggle_flips_only_target_node() {
        let mut st = parsed(r#"{"a": {"x": 1}, "b": {"y": 2}}"#);
        let a_id = node_by_name(&st, "a").id;
        let b_expanded = node_by_name(&st, "b").expanded;
        st.toggle(a_id);
        assert!(!st.nodes[a_id].expanded, "目标节点应该被折叠");
        assert_eq!(node_by_name(&st, "b").expanded, b_expanded, "兄弟节点不受影响");
    }

    #[test]
    fn test_toggle_ignores_scalar_and_empty_container() {
        let mut st = parsed(r#"{"empty": {}, "n": 5}"#);
        let empty = node_by_name(&st, "empty");
        assert!(!empty.can_toggle(), "空容器没有折叠开关");
        let empty_id = empty.id;
        let n_id = node_by_name(&st, "n").id;
        st.toggle(empty_id);
        st.toggle(n_id);
        assert!(!st.nodes[empty_id].expanded);
        assert!(!st.nodes[n_id].expanded);
    }

    #[test]
    fn test_set_all_expanded_resets_every_flag() {
        let mut st = parsed(r#"{"a":{"b":{"c":{"d":1}}}}"#);
        st.set_all_expanded(true);
        assert!(st.nodes.iter().filter(|n| n.can_toggle()).all(|n| n.expanded));
        // 手动折叠一个节点后再全局展开，应该被覆盖（全局开关是权威状态）
        let a_id = node_by_name(&st, "a").id;
        st.toggle(a_id);
        st.set_all_expanded(true);
        assert!(st.nodes[a_id].expanded, "全局展开应该覆盖局部折叠");
        st.set_all_expanded(false);
        assert!(st.nodes.iter().filter(|n| n.can_toggle()).all(|n| !n.expanded));
    }

    #[test]
    fn test_visibility_follows_ancestor_expansion() {
        let mut st = parsed(r#"{"a": {"b": {"c": 1}}}"#);
        // 深度2的 b 默认折叠，c 不可见
        assert!(node_by_name(&st, "a").visible);
        assert!(node_by_name(&st, "b").visible, "b 的祖先都展开，应该可见");
        assert!(!node_by_name(&st, "c").visible, "折叠容器的子节点不可见");
        let b_id = node_by_name(&st, "b").id;
        st.toggle(b_id);
        assert!(node_by_name(&st, "c").visible, "展开 b 后 c 应该可见");
    }

    #[test]
    fn test_scalar_previews_are_literal_tokens() {
        let st = parsed(r#"{"s": "文本", "n": 42, "f": 3.5, "t": true, "z": null}"#);
        assert_eq!(node_by_name(&st, "s").preview, "\"文本\"");
        assert_eq!(node_by_name(&st, "n").preview, "42");
        assert_eq!(node_by_name(&st, "f").preview, "3.5");
        assert_eq!(node_by_name(&st, "t").preview, "true");
        assert_eq!(node_by_name(&st, "z").preview, "null");
    }

    #[test]
    fn test_container_previews_show_size() {
        let st = parsed(r#"{"o": {"a": 1, "b": 2}, "arr": [1, 2, 3]}"#);
        assert_eq!(node_by_name(&st, "o").preview, "Object {2}");
        assert_eq!(node_by_name(&st, "arr").preview, "Array [3]");
    }

    #[test]
    fn test_children_keep_original_order() {
        let tree = build_tree(&json!({"z": 1, "a": 2, "m": 3}), false);
        let names: Vec<&str> = tree.iter().skip(1).map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["z", "a", "m"], "子节点应该保持原始键顺序");
    }

    #[test]
    fn test_parse_failure_clears_tree() {
        let mut st = parsed(r#"{"ok": 1}"#);
        assert!(!st.nodes.is_empty());
        st.input = "{bad json".to_string();
        st.parse();
        assert!(st.dom.is_none(), "解析失败后 DOM 应该为空");
        assert!(st.nodes.is_empty(), "解析失败后树应该被清空");
    }
}
