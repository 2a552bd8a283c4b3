//! 归属解析：节点 -> 所属文档根 -> 文件路径

use std::path::PathBuf;

use crate::model::editor::EditorError;
use crate::model::store::{NodeId, TreeStore};

/// 所属文档根。读取节点创建时缓存的根 id，不做递归上溯；
/// 挂在森林根下但未标记为文档根的节点返回 None
pub fn find_document_root(store: &TreeStore, id: NodeId) -> Result<Option<NodeId>, EditorError> {
    Ok(store.get(id)?.document_root)
}

/// 所属文档的文件路径；无文档根或未关联文件时返回 None
pub fn find_filepath(store: &TreeStore, id: NodeId) -> Result<Option<PathBuf>, EditorError> {
    let Some(root) = find_document_root(store, id)? else {
        return Ok(None);
    };
    let root = store.get(root)?;
    Ok(root.is_file_backed.then(|| PathBuf::from(&root.key)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::serializer::populate;
    use crate::model::store::NodeKind;
    use serde_json::json;

    #[test]
    fn test_descendant_resolves_to_root() {
        let mut store = TreeStore::new();
        let root = populate(&mut store, &json!({"a": {"b": ["c"]}}), None, "doc").unwrap();
        let a = store.children(root).unwrap()[0];
        let b = store.children(a).unwrap()[0];
        let c = store.children(b).unwrap()[0];

        assert_eq!(find_document_root(&store, c).unwrap(), Some(root));
        assert_eq!(find_document_root(&store, root).unwrap(), Some(root));
    }

    #[test]
    fn test_filepath_only_for_file_backed_roots() {
        let mut store = TreeStore::new();
        let root = populate(&mut store, &json!({"k": "v"}), None, "/tmp/data.json").unwrap();
        let leaf = store.children(root).unwrap()[0];

        assert_eq!(find_filepath(&store, leaf).unwrap(), None, "未关联文件时不应返回路径");

        store.set_file_backed(root, true).unwrap();
        assert_eq!(find_filepath(&store, leaf).unwrap(), Some(PathBuf::from("/tmp/data.json")));
    }

    #[test]
    fn test_detached_forest_node_has_no_document() {
        let mut store = TreeStore::new();
        let loose = store.create_node(None, NodeKind::Mapping, "loose", None).unwrap();
        let child = store.create_node(Some(loose), NodeKind::Leaf, "x", Some(json!(1))).unwrap();

        assert_eq!(find_document_root(&store, child).unwrap(), None);
        assert_eq!(find_filepath(&store, child).unwrap(), None);
    }

    #[test]
    fn test_deep_tree_resolves_without_recursion() {
        let mut store = TreeStore::new();
        let root = store.create_document_root(NodeKind::Mapping, "deep", None).unwrap();
        let mut cur = root;
        for depth in 0..10_000 {
            cur = store
                .create_node(Some(cur), NodeKind::Mapping, depth.to_string(), None)
                .unwrap();
        }
        assert_eq!(find_document_root(&store, cur).unwrap(), Some(root));
    }

    #[test]
    fn test_unknown_node_is_not_found() {
        let mut store = TreeStore::new();
        let root = populate(&mut store, &json!({}), None, "doc").unwrap();
        store.delete_subtree(root).unwrap();
        assert!(matches!(find_document_root(&store, root), Err(EditorError::NotFound(_))));
    }
}
