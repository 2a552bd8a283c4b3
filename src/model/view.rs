//! 只读视图：把节点森林展平为带深度的行，供展示层渲染与折叠

use std::collections::HashSet;

use serde::Serialize;
use serde_json::Value;

use crate::model::store::{NodeId, NodeKind, TreeStore};

#[derive(Debug, Clone, Serialize)]
pub struct ViewRow {
    pub id: NodeId,
    /// 展示文本（逻辑键 + 类型后缀）
    pub text: String,
    /// 文档内的 RFC 9535 JSONPath
    pub path: String,
    pub kind: NodeKind,
    /// 子元素数量
    pub children: u32,
    /// 轻量预览
    pub preview: String,
    pub depth: u32,
    pub expanded: bool,
    pub visible: bool,
    pub is_document_root: bool,
    pub is_file_backed: bool,
}

#[derive(Debug, Default)]
pub struct TreeView {
    rows: Vec<ViewRow>,
}

fn preview_of(store: &TreeStore, id: NodeId) -> String {
    let Ok(node) = store.get(id) else {
        return String::new();
    };
    match (node.kind, &node.value) {
        (NodeKind::Mapping, _) => format!("{{..}} ({} keys)", node.children.len()),
        (NodeKind::Sequence, _) => format!("[..] ({} items)", node.children.len()),
        (NodeKind::Leaf, Some(Value::String(s))) => {
            let s = s.trim();
            if s.chars().count() > 32 {
                let truncated: String = s.chars().take(32).collect();
                format!("\"{}...\"", truncated)
            } else {
                format!("\"{}\"", s)
            }
        }
        (NodeKind::Leaf, Some(v)) => v.to_string(),
        (NodeKind::Leaf, None) => "null".to_string(),
    }
}

/// 点号段只接受成员名：首字符为字母或下划线，其余为字母数字或下划线
fn is_member_name(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// 父路径 + 子段。非成员名的字段使用 bracket-notation
fn child_path(parent_path: &str, parent_kind: NodeKind, key: &str) -> String {
    match parent_kind {
        NodeKind::Sequence => format!("{}[{}]", parent_path, key),
        _ if is_member_name(key) => format!("{}.{}", parent_path, key),
        _ => format!("{}['{}']", parent_path, key.replace('\'', "\\'")),
    }
}

impl TreeView {
    /// 按深度优先顺序构建；默认全部折叠，只显示森林根下的节点
    pub fn build(store: &TreeStore) -> Self {
        let mut view = Self::default();
        for root in store.roots() {
            view.walk(store, *root);
        }
        view.update_visibility_by_expansion();
        view
    }

    /// 结构变化后重建，保留仍存在节点的展开状态
    pub fn refresh(&mut self, store: &TreeStore) {
        let expanded: HashSet<NodeId> = self.rows.iter().filter(|r| r.expanded).map(|r| r.id).collect();
        *self = Self::build(store);
        for row in &mut self.rows {
            row.expanded = expanded.contains(&row.id);
        }
        self.update_visibility_by_expansion();
    }

    /// 显式栈前序遍历，子节点逆序入栈以保持原顺序
    fn walk(&mut self, store: &TreeStore, root: NodeId) {
        let mut stack = vec![(root, "$".to_string(), 0u32)];
        while let Some((id, path, depth)) = stack.pop() {
            let Ok(node) = store.get(id) else {
                continue;
            };
            for child in node.children.iter().rev() {
                let Ok(child_node) = store.get(*child) else {
                    continue;
                };
                stack.push((*child, child_path(&path, node.kind, &child_node.key), depth + 1));
            }
            self.rows.push(ViewRow {
                id,
                text: format!("{}{}", node.key, node.kind.display_suffix()),
                path,
                kind: node.kind,
                children: node.children.len() as u32,
                preview: preview_of(store, id),
                depth,
                expanded: false,
                visible: true,
                is_document_root: node.is_document_root,
                is_file_backed: node.is_file_backed,
            });
        }
    }

    pub fn rows(&self) -> &[ViewRow] {
        &self.rows
    }

    pub fn visible_rows(&self) -> impl Iterator<Item = &ViewRow> {
        self.rows.iter().filter(|r| r.visible)
    }

    pub fn row(&self, id: NodeId) -> Option<&ViewRow> {
        self.rows.iter().find(|r| r.id == id)
    }

    /// 在指定文档内按路径查找行
    pub fn find_by_path(&self, root: NodeId, path: &str) -> Option<&ViewRow> {
        let start = self.rows.iter().position(|r| r.id == root)?;
        let base_depth = self.rows[start].depth;
        std::iter::once(&self.rows[start])
            .chain(self.rows[start + 1..].iter().take_while(|r| r.depth > base_depth))
            .find(|r| r.path == path)
    }

    pub fn expand_all(&mut self) {
        for row in &mut self.rows {
            row.expanded = true;
        }
        self.update_visibility_by_expansion();
    }

    pub fn collapse_all(&mut self) {
        for row in &mut self.rows {
            row.expanded = false;
        }
        self.update_visibility_by_expansion();
    }

    /// 切换节点的展开状态，返回切换后的状态
    pub fn toggle(&mut self, id: NodeId) -> Option<bool> {
        let row = self.rows.iter_mut().find(|r| r.id == id)?;
        row.expanded = !row.expanded;
        let state = row.expanded;
        self.update_visibility_by_expansion();
        Some(state)
    }

    /// 根据展开状态更新节点可见性
    fn update_visibility_by_expansion(&mut self) {
        for node in &mut self.rows {
            node.visible = node.depth == 0;
        }

        // 逐行显示已展开且可见节点的直接子节点
        for i in 0..self.rows.len() {
            if self.rows[i].expanded && self.rows[i].visible {
                let parent_depth = self.rows[i].depth;
                for j in (i + 1)..self.rows.len() {
                    if self.rows[j].depth == parent_depth + 1 {
                        self.rows[j].visible = true;
                    } else if self.rows[j].depth <= parent_depth {
                        break;
                    }
                }
            }
        }
    }

    /// 缩进文本渲染可见行
    pub fn render(&self) -> String {
        let mut out = String::new();
        for row in self.visible_rows() {
            let marker = match (row.kind.is_container(), row.expanded) {
                (true, true) => "▾ ",
                (true, false) => "▸ ",
                (false, _) => "  ",
            };
            out.push_str(&"  ".repeat(row.depth as usize));
            out.push_str(marker);
            out.push_str(&row.text);
            if row.kind == NodeKind::Leaf {
                out.push_str(" : ");
                out.push_str(&row.preview);
            }
            out.push('\n');
        }
        out
    }
}
