//! 节点仓库（TreeNode Store）：以 id 寻址的节点池，只负责结构与遍历，不含业务逻辑

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::model::editor::EditorError;

/// 节点标识，在仓库生命周期内唯一且不复用
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NodeId(u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// 节点类型：映射 / 序列 / 叶子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NodeKind {
    Mapping,
    Sequence,
    Leaf,
}

impl NodeKind {
    pub fn is_container(self) -> bool {
        !matches!(self, NodeKind::Leaf)
    }

    /// 展示文本的类型后缀，仅用于渲染
    pub fn display_suffix(self) -> &'static str {
        match self {
            NodeKind::Mapping => "={}",
            NodeKind::Sequence => "=[]",
            NodeKind::Leaf => "",
        }
    }
}

/// 叶子值只能是标量（字符串/数字/布尔/空）
pub fn is_scalar(v: &Value) -> bool {
    !matches!(v, Value::Object(_) | Value::Array(_))
}

#[derive(Debug, Clone)]
pub struct TreeNode {
    pub id: NodeId,
    /// None 表示直接挂在森林根下
    pub parent: Option<NodeId>,
    /// 有序子节点；序列节点的顺序即数组下标
    pub children: Vec<NodeId>,
    pub kind: NodeKind,
    /// 逻辑键（映射键名或序列下标），不含展示后缀
    pub key: String,
    /// 仅叶子节点有值
    pub value: Option<Value>,
    pub is_document_root: bool,
    /// 文件关联的文档根，此时 key 即文件路径
    pub is_file_backed: bool,
    /// 创建时缓存的所属文档根；不支持改挂父节点，因此缓存永不失效
    pub document_root: Option<NodeId>,
}

impl TreeNode {
    pub fn is_leaf(&self) -> bool {
        self.kind == NodeKind::Leaf
    }
}

/// 节点池。所有操作同步、纯内存
#[derive(Debug, Default)]
pub struct TreeStore {
    nodes: HashMap<NodeId, TreeNode>,
    /// 森林根的有序子节点
    roots: Vec<NodeId>,
    next_id: u64,
}

impl TreeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn get(&self, id: NodeId) -> Result<&TreeNode, EditorError> {
        self.nodes.get(&id).ok_or(EditorError::NotFound(id))
    }

    fn get_mut(&mut self, id: NodeId) -> Result<&mut TreeNode, EditorError> {
        self.nodes.get_mut(&id).ok_or(EditorError::NotFound(id))
    }

    /// 森林根下的节点（通常都是文档根）
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn children(&self, id: NodeId) -> Result<&[NodeId], EditorError> {
        Ok(&self.get(id)?.children)
    }

    pub fn parent(&self, id: NodeId) -> Result<Option<NodeId>, EditorError> {
        Ok(self.get(id)?.parent)
    }

    /// 在 parent 下创建普通节点；parent 为 None 时挂到森林根但不标记为文档根
    pub fn create_node(
        &mut self,
        parent: Option<NodeId>,
        kind: NodeKind,
        key: impl Into<String>,
        value: Option<Value>,
    ) -> Result<NodeId, EditorError> {
        self.insert(parent, kind, key.into(), value, false)
    }

    /// 在森林根下创建文档根节点
    pub fn create_document_root(
        &mut self,
        kind: NodeKind,
        key: impl Into<String>,
        value: Option<Value>,
    ) -> Result<NodeId, EditorError> {
        self.insert(None, kind, key.into(), value, true)
    }

    fn insert(
        &mut self,
        parent: Option<NodeId>,
        kind: NodeKind,
        key: String,
        value: Option<Value>,
        document_root: bool,
    ) -> Result<NodeId, EditorError> {
        // 先完成全部校验，避免部分写入
        let payload_ok = match (kind, &value) {
            (NodeKind::Leaf, Some(v)) => is_scalar(v),
            (NodeKind::Leaf, None) => false,
            (_, v) => v.is_none(),
        };
        if !payload_ok {
            return Err(EditorError::InvalidPayload { kind });
        }
        let inherited_root = match parent {
            Some(p) => {
                let parent_node = self.get(p)?;
                if !parent_node.kind.is_container() {
                    return Err(EditorError::InvalidKind {
                        id: p,
                        kind: parent_node.kind,
                        op: "create_child",
                    });
                }
                parent_node.document_root
            }
            None => None,
        };

        let id = NodeId(self.next_id);
        self.next_id += 1;
        let cached_root = if document_root { Some(id) } else { inherited_root };
        self.nodes.insert(
            id,
            TreeNode {
                id,
                parent,
                children: Vec::new(),
                kind,
                key,
                value,
                is_document_root: document_root,
                is_file_backed: false,
                document_root: cached_root,
            },
        );
        match parent {
            Some(p) => self.get_mut(p)?.children.push(id),
            None => self.roots.push(id),
        }
        Ok(id)
    }

    /// 删除节点及其全部后代，并从父节点的子列表中摘除
    pub fn delete_subtree(&mut self, id: NodeId) -> Result<usize, EditorError> {
        let parent = self.get(id)?.parent;

        let mut stack = vec![id];
        let mut removed = 0;
        while let Some(cur) = stack.pop() {
            if let Some(node) = self.nodes.remove(&cur) {
                stack.extend(node.children);
                removed += 1;
            }
        }

        let siblings = match parent {
            Some(p) => &mut self.get_mut(p)?.children,
            None => &mut self.roots,
        };
        siblings.retain(|c| *c != id);
        tracing::debug!("删除子树 {}：共 {} 个节点", id, removed);
        Ok(removed)
    }

    pub fn set_key(&mut self, id: NodeId, key: impl Into<String>) -> Result<(), EditorError> {
        self.get_mut(id)?.key = key.into();
        Ok(())
    }

    /// 替换叶子值；非叶子节点或非标量值返回 InvalidKind
    pub fn set_value(&mut self, id: NodeId, value: Value) -> Result<(), EditorError> {
        let node = self.get_mut(id)?;
        if !node.is_leaf() || !is_scalar(&value) {
            return Err(EditorError::InvalidKind { id, kind: node.kind, op: "set_value" });
        }
        node.value = Some(value);
        Ok(())
    }

    /// 标记文档根为文件关联
    pub fn set_file_backed(&mut self, id: NodeId, file_backed: bool) -> Result<(), EditorError> {
        let node = self.get_mut(id)?;
        if !node.is_document_root {
            return Err(EditorError::NotDocumentRoot(id));
        }
        node.is_file_backed = file_backed;
        Ok(())
    }

    /// 清空整个森林；id 计数不回退
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.roots.clear();
    }
}
