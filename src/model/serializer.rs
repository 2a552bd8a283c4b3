//! 序列化器：节点树 <-> serde_json::Value 的双向转换

use serde_json::{Map, Value};

use crate::model::editor::EditorError;
use crate::model::store::{NodeId, NodeKind, TreeStore};

/// 按运行时形状建树。parent 为 None 时首个节点成为文档根
///
/// 显式栈逐层展开，深度不受线程栈限制
pub fn populate(
    store: &mut TreeStore,
    value: &Value,
    parent: Option<NodeId>,
    key: &str,
) -> Result<NodeId, EditorError> {
    if let Some(p) = parent {
        let node = store.get(p)?;
        if !node.kind.is_container() {
            return Err(EditorError::InvalidKind { id: p, kind: node.kind, op: "populate" });
        }
    }

    let (kind, scalar) = shape_of(value);
    let id = match parent {
        Some(p) => store.create_node(Some(p), kind, key, scalar)?,
        None => store.create_document_root(kind, key, scalar)?,
    };

    let mut pending = vec![(value, id)];
    while let Some((value, parent)) = pending.pop() {
        match value {
            Value::Object(map) => {
                for (k, child) in map {
                    if let Some(next) = populate_child(store, child, parent, k)? {
                        pending.push(next);
                    }
                }
            }
            Value::Array(arr) => {
                for (idx, child) in arr.iter().enumerate() {
                    if let Some(next) = populate_child(store, child, parent, &idx.to_string())? {
                        pending.push(next);
                    }
                }
            }
            _ => {}
        }
    }
    Ok(id)
}

fn shape_of(value: &Value) -> (NodeKind, Option<Value>) {
    match value {
        Value::Object(_) => (NodeKind::Mapping, None),
        Value::Array(_) => (NodeKind::Sequence, None),
        other => (NodeKind::Leaf, Some(other.clone())),
    }
}

/// 创建单个子节点；容器返回待展开项
fn populate_child<'v>(
    store: &mut TreeStore,
    value: &'v Value,
    parent: NodeId,
    key: &str,
) -> Result<Option<(&'v Value, NodeId)>, EditorError> {
    let (kind, scalar) = shape_of(value);
    let id = store.create_node(Some(parent), kind, key, scalar)?;
    Ok(kind.is_container().then_some((value, id)))
}

enum Step {
    Enter(NodeId),
    Exit(NodeId),
}

/// populate 的逆过程，按子节点顺序还原
pub fn extract(store: &TreeStore, id: NodeId) -> Result<Value, EditorError> {
    let mut steps = vec![Step::Enter(id)];
    // 已还原的值，容器退出时从尾部取回其全部子值
    let mut done: Vec<Value> = Vec::new();

    while let Some(step) = steps.pop() {
        match step {
            Step::Enter(cur) => {
                let node = store.get(cur)?;
                if node.kind == NodeKind::Leaf {
                    done.push(node.value.clone().unwrap_or(Value::Null));
                    continue;
                }
                steps.push(Step::Exit(cur));
                steps.extend(node.children.iter().rev().map(|c| Step::Enter(*c)));
            }
            Step::Exit(cur) => {
                let node = store.get(cur)?;
                let values = done.split_off(done.len() - node.children.len());
                let value = match node.kind {
                    NodeKind::Mapping => {
                        let mut map = Map::with_capacity(values.len());
                        for (child, v) in node.children.iter().zip(values) {
                            // 同名键：后出现的值覆盖，位置保留在首次出现处
                            map.insert(logical_key(store, *child)?.to_string(), v);
                        }
                        Value::Object(map)
                    }
                    _ => Value::Array(values),
                };
                done.push(value);
            }
        }
    }
    done.pop().ok_or(EditorError::NotFound(id))
}

/// 逻辑键：入参 key 原样返回，不带展示后缀
pub fn logical_key(store: &TreeStore, id: NodeId) -> Result<&str, EditorError> {
    Ok(store.get(id)?.key.as_str())
}

/// 渲染用文本：映射追加 `={}`，序列追加 `=[]`
pub fn display_text(store: &TreeStore, id: NodeId) -> Result<String, EditorError> {
    let node = store.get(id)?;
    Ok(format!("{}{}", node.key, node.kind.display_suffix()))
}
