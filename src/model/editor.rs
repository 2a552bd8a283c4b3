//! Editor：变更引擎。增删改节点，并在所属文档关联文件时整体回写

use std::path::{Path, PathBuf};

use jsonpath_rust::JsonPath;
use serde_json::{json, Value};
use thiserror::Error;

use crate::model::ownership::{find_document_root, find_filepath};
use crate::model::serializer::{extract, logical_key, populate};
use crate::model::store::{is_scalar, NodeId, NodeKind, TreeStore};
use crate::utils::fs::{encode_json, read_json_file, FileIo, LocalFs};

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("节点不存在: {0}")]
    NotFound(NodeId),
    #[error("文件不存在: {}", .0.display())]
    FileNotFound(PathBuf),
    #[error("文件路径不是有效UTF-8: {}", .0.display())]
    NonUtf8Path(PathBuf),
    #[error("节点数据与类型不符: {kind:?}")]
    InvalidPayload { kind: NodeKind },
    #[error("节点类型不支持该操作: {id} 为 {kind:?}，操作 {op}")]
    InvalidKind {
        id: NodeId,
        kind: NodeKind,
        op: &'static str,
    },
    #[error("无效选择: {0} 不支持该操作")]
    InvalidSelection(NodeId),
    #[error("未选择任何节点")]
    NoSelection,
    #[error("不是文档根节点: {0}")]
    NotDocumentRoot(NodeId),
    #[error("只读模式，禁止修改")]
    ReadOnly,
    #[error("IO失败: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON解析失败: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("JSONPath错误: {0}")]
    JsonPath(String),
}

/// 文件关联文档的根键即文件路径
fn utf8_key(path: &Path) -> Result<&str, EditorError> {
    path.to_str().ok_or_else(|| EditorError::NonUtf8Path(path.to_path_buf()))
}

/// 编辑器配置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorConfig {
    /// 只读：拒绝一切修改，仍可加载与查看
    pub readonly: bool,
    /// 回写时格式化输出
    pub pretty: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self { readonly: false, pretty: true }
    }
}

/// 新增子节点的值
#[derive(Debug, Clone, PartialEq)]
pub enum ValueHint {
    Mapping,
    Sequence,
    Text(String),
    Filepath(PathBuf),
    /// 任意嵌套数据，按形状递归建树
    Json(Value),
}

impl ValueHint {
    fn into_value(self) -> Value {
        match self {
            ValueHint::Mapping => json!({}),
            ValueHint::Sequence => json!([]),
            ValueHint::Text(s) => Value::String(s),
            ValueHint::Filepath(p) => Value::String(p.to_string_lossy().into_owned()),
            ValueHint::Json(v) => v,
        }
    }
}

/// 回写结果。写失败不回滚内存中的修改
#[derive(Debug)]
pub enum Persist {
    /// 所属文档未关联文件
    Skipped,
    Saved(PathBuf),
    Failed { path: PathBuf, error: EditorError },
}

/// 一次成功的结构修改
#[derive(Debug)]
pub struct Change {
    pub node: NodeId,
    pub persist: Persist,
}

impl Change {
    pub fn saved_to(&self) -> Option<&Path> {
        match &self.persist {
            Persist::Saved(p) => Some(p),
            _ => None,
        }
    }

    /// 非致命的回写警告
    pub fn warning(&self) -> Option<&EditorError> {
        match &self.persist {
            Persist::Failed { error, .. } => Some(error),
            _ => None,
        }
    }
}

pub struct Editor {
    store: TreeStore,
    io: Box<dyn FileIo>,
    config: EditorConfig,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(LocalFs)
    }
}

impl Editor {
    pub fn new(io: impl FileIo + 'static) -> Self {
        Self::with_config(io, EditorConfig::default())
    }

    pub fn with_config(io: impl FileIo + 'static, config: EditorConfig) -> Self {
        Self { store: TreeStore::new(), io: Box::new(io), config }
    }

    /// 只读视图，展示层不能绕过编辑器修改节点
    pub fn store(&self) -> &TreeStore {
        &self.store
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    fn ensure_writable(&self) -> Result<(), EditorError> {
        if self.config.readonly {
            return Err(EditorError::ReadOnly);
        }
        Ok(())
    }

    /// 加载JSON文件，作为文件关联的文档根挂到森林根下
    ///
    /// 根键即回写路径，必须能无损还原，因此拒绝非UTF-8路径
    pub fn load_file(&mut self, path: &Path) -> Result<NodeId, EditorError> {
        let key = utf8_key(path)?;
        let dom = read_json_file(self.io.as_ref(), path)?;
        let root = populate(&mut self.store, &dom, None, key)?;
        self.store.set_file_backed(root, true)?;
        tracing::info!("文件加载成功: {}，当前共 {} 个节点", path.display(), self.store.len());
        Ok(root)
    }

    /// 新建空JSON文件 `{}` 并加载
    pub fn create_file(&mut self, path: &Path) -> Result<NodeId, EditorError> {
        self.ensure_writable()?;
        utf8_key(path)?;
        let bytes = encode_json(&json!({}), self.config.pretty)?;
        self.io.write_file(path, &bytes)?;
        tracing::info!("已创建JSON文件: {}", path.display());
        self.load_file(path)
    }

    /// 以给定数据新建未关联文件的文档
    pub fn create_document(&mut self, name: &str, data: &Value) -> Result<NodeId, EditorError> {
        self.ensure_writable()?;
        let root = populate(&mut self.store, data, None, name)?;
        tracing::info!("新建文档: {} ({})", name, root);
        Ok(root)
    }

    /// 移除全部文档，不回写任何文件
    pub fn clear(&mut self) -> Result<(), EditorError> {
        self.ensure_writable()?;
        self.store.clear();
        tracing::info!("已清空全部文档");
        Ok(())
    }

    /// 在映射/序列节点下新增子节点。序列只能追加，键强制为当前子节点数
    pub fn add_child(&mut self, parent: NodeId, key: &str, hint: ValueHint) -> Result<Change, EditorError> {
        self.ensure_writable()?;
        let node = self.store.get(parent)?;
        let key = match node.kind {
            NodeKind::Leaf => return Err(EditorError::InvalidSelection(parent)),
            NodeKind::Sequence => node.children.len().to_string(),
            NodeKind::Mapping => key.to_string(),
        };

        let id = populate(&mut self.store, &hint.into_value(), Some(parent), &key)?;
        tracing::info!("新增节点 {} 于 {}，键: {}", id, parent, key);
        let persist = self.persist_if_owned(parent)?;
        Ok(Change { node: id, persist })
    }

    /// 编辑节点：容器只能改键，叶子改值；键只在父节点为映射或位于森林根下时可改
    pub fn edit_node(
        &mut self,
        id: NodeId,
        new_key: Option<&str>,
        new_value: Option<Value>,
    ) -> Result<Change, EditorError> {
        self.ensure_writable()?;
        let node = self.store.get(id)?;

        if new_key.is_none() && new_value.is_none() {
            return Err(EditorError::InvalidKind { id, kind: node.kind, op: "edit_empty" });
        }
        if let Some(v) = &new_value {
            if !node.is_leaf() || !is_scalar(v) {
                return Err(EditorError::InvalidKind { id, kind: node.kind, op: "edit_value" });
            }
        }
        if new_key.is_some() {
            if let Some(p) = node.parent {
                if self.store.get(p)?.kind != NodeKind::Mapping {
                    return Err(EditorError::InvalidSelection(id));
                }
            }
        }

        if let Some(k) = new_key {
            if node.is_file_backed {
                tracing::info!("文档 {} 的文件路径更新为: {}", id, k);
            }
            self.store.set_key(id, k)?;
        }
        if let Some(v) = new_value {
            self.store.set_value(id, v)?;
        }
        tracing::info!("编辑节点 {}", id);
        let persist = self.persist_if_owned(id)?;
        Ok(Change { node: id, persist })
    }

    /// 删除节点。文档根只清空其子节点，保留根与文件关联
    pub fn remove_node(&mut self, id: NodeId) -> Result<Change, EditorError> {
        self.ensure_writable()?;
        // 删除前解析所属文档根
        let root = find_document_root(&self.store, id)?;

        if root == Some(id) {
            let children = self.store.children(id)?.to_vec();
            for child in children {
                self.store.delete_subtree(child)?;
            }
            tracing::info!("已清空文档根 {} 的子节点", id);
        } else {
            self.store.delete_subtree(id)?;
            tracing::info!("已删除节点 {}", id);
        }

        let persist = match root {
            Some(r) => self.persist_root(r)?,
            None => Persist::Skipped,
        };
        Ok(Change { node: id, persist })
    }

    /// 所属文档关联文件时整体回写；仅节点不存在时返回错误
    pub fn persist_if_owned(&self, id: NodeId) -> Result<Persist, EditorError> {
        match find_document_root(&self.store, id)? {
            Some(root) => self.persist_root(root),
            None => Ok(Persist::Skipped),
        }
    }

    fn persist_root(&self, root: NodeId) -> Result<Persist, EditorError> {
        let Some(path) = find_filepath(&self.store, root)? else {
            return Ok(Persist::Skipped);
        };
        let dom = extract(&self.store, root)?;

        let written = encode_json(&dom, self.config.pretty)
            .and_then(|bytes| self.io.write_file(&path, &bytes).map_err(EditorError::from));
        match written {
            Ok(()) => {
                tracing::info!("JSON文件已保存到: {}", path.display());
                Ok(Persist::Saved(path))
            }
            Err(error) => {
                tracing::warn!("文件保存失败: {}，内存修改已保留: {}", path.display(), error);
                Ok(Persist::Failed { path, error })
            }
        }
    }

    /// (逻辑键, 子树数据)
    pub fn key_value(&self, id: NodeId) -> Result<(String, Value), EditorError> {
        let key = logical_key(&self.store, id)?.to_string();
        Ok((key, extract(&self.store, id)?))
    }

    /// 对节点所属文档执行 JSONPath 查询，返回匹配值的拷贝
    pub fn query(&self, id: NodeId, json_path: &str) -> Result<Vec<Value>, EditorError> {
        let base = find_document_root(&self.store, id)?.unwrap_or(id);
        let dom = extract(&self.store, base)?;
        let hits: Vec<&Value> = dom
            .query(json_path)
            .map_err(|e| EditorError::JsonPath(e.to_string()))?;
        Ok(hits.into_iter().cloned().collect())
    }

    /// 按 JSONPath 提取第一个匹配值的 pretty 字符串
    pub fn extract_subtree_pretty(&self, id: NodeId, json_path: &str) -> Result<String, EditorError> {
        let first = self
            .query(id, json_path)?
            .into_iter()
            .next()
            .ok_or_else(|| EditorError::JsonPath("未匹配到任何节点".into()))?;
        Ok(serde_json::to_string_pretty(&first)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::fs::MemoryFs;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const DOC: &str = "/data/doc.json";

    fn file_editor(content: &str) -> (Editor, MemoryFs, NodeId) {
        let fs = MemoryFs::new().with_file(DOC, content);
        let mut editor = Editor::new(fs.clone());
        let root = editor.load_file(Path::new(DOC)).expect("加载文件失败");
        (editor, fs, root)
    }

    fn child(editor: &Editor, parent: NodeId, key: &str) -> NodeId {
        *editor
            .store()
            .children(parent)
            .unwrap()
            .iter()
            .find(|c| logical_key(editor.store(), **c).unwrap() == key)
            .expect("子节点不存在")
    }

    fn saved(fs: &MemoryFs) -> Value {
        serde_json::from_slice(&fs.contents(Path::new(DOC)).unwrap()).unwrap()
    }

    #[test]
    fn test_load_marks_file_backed_root() {
        let (editor, _, root) = file_editor(r#"{"a": 1, "b": [2, 3]}"#);
        let node = editor.store().get(root).unwrap();

        assert!(node.is_document_root && node.is_file_backed);
        assert_eq!(extract(editor.store(), root).unwrap(), json!({"a": 1, "b": [2, 3]}));
    }

    #[test]
    fn test_filepath_of_descendant_leaf() {
        let (editor, _, root) = file_editor(r#"{"user": {"tags": ["x"]}}"#);
        let user = child(&editor, root, "user");
        let tags = child(&editor, user, "tags");
        let leaf = child(&editor, tags, "0");

        assert_eq!(find_filepath(editor.store(), leaf).unwrap(), Some(PathBuf::from(DOC)));
    }

    #[test]
    fn test_load_missing_file() {
        let mut editor = Editor::new(MemoryFs::new());
        let err = editor.load_file(Path::new("/nope.json")).unwrap_err();
        assert!(matches!(err, EditorError::FileNotFound(_)));
        assert!(editor.store().is_empty());
    }

    #[test]
    fn test_add_to_mapping_persists() {
        let (mut editor, fs, root) = file_editor(r#"{"a": 1}"#);

        let change = editor.add_child(root, "name", ValueHint::Text("张三".into())).unwrap();
        assert_eq!(change.saved_to(), Some(Path::new(DOC)));
        assert_eq!(saved(&fs), json!({"a": 1, "name": "张三"}));
    }

    #[test]
    fn test_add_to_sequence_forces_index_key() {
        let (mut editor, fs, root) = file_editor(r#"{"b": [2, 3]}"#);
        let seq = child(&editor, root, "b");

        let change = editor.add_child(seq, "ignored", ValueHint::Text("x".into())).unwrap();
        assert_eq!(logical_key(editor.store(), change.node).unwrap(), "2");
        assert_eq!(saved(&fs), json!({"b": [2, 3, "x"]}));
    }

    #[test]
    fn test_sequence_append_keys_are_contiguous() {
        let mut editor = Editor::new(MemoryFs::new());
        let root = editor.create_document("list", &json!([])).unwrap();

        for i in 0..5 {
            let hint = if i % 2 == 0 { ValueHint::Mapping } else { ValueHint::Text(i.to_string()) };
            editor.add_child(root, "k", hint).unwrap();
        }
        let keys: Vec<&str> = editor
            .store()
            .children(root)
            .unwrap()
            .iter()
            .map(|c| logical_key(editor.store(), *c).unwrap())
            .collect();
        assert_eq!(keys, ["0", "1", "2", "3", "4"]);
    }

    #[test]
    fn test_add_nested_containers_and_json() {
        let (mut editor, fs, root) = file_editor("{}");

        let map = editor.add_child(root, "settings", ValueHint::Mapping).unwrap().node;
        editor.add_child(map, "list", ValueHint::Sequence).unwrap();
        editor
            .add_child(root, "raw", ValueHint::Json(json!({"x": [1, {"y": null}]})))
            .unwrap();
        editor
            .add_child(root, "path", ValueHint::Filepath(PathBuf::from("/etc/hosts")))
            .unwrap();

        assert_eq!(
            saved(&fs),
            json!({"settings": {"list": []}, "raw": {"x": [1, {"y": null}]}, "path": "/etc/hosts"})
        );
    }

    #[test]
    fn test_add_on_leaf_is_invalid_selection() {
        let (mut editor, fs, root) = file_editor(r#"{"a": 1}"#);
        let leaf = child(&editor, root, "a");
        let before = editor.store().len();

        let err = editor.add_child(leaf, "x", ValueHint::Mapping).unwrap_err();
        assert!(matches!(err, EditorError::InvalidSelection(id) if id == leaf));
        assert_eq!(editor.store().len(), before);
        assert!(fs.writes().is_empty(), "失败的操作不应回写");
    }

    #[test]
    fn test_edit_leaf_value() {
        let (mut editor, fs, root) = file_editor(r#"{"greeting": "hi", "n": 1}"#);
        let leaf = child(&editor, root, "greeting");

        editor.edit_node(leaf, None, Some(json!("hello"))).unwrap();
        assert_eq!(
            extract(editor.store(), root).unwrap(),
            json!({"greeting": "hello", "n": 1})
        );
        assert_eq!(saved(&fs), json!({"greeting": "hello", "n": 1}));
    }

    #[test]
    fn test_edit_container_key() {
        let (mut editor, fs, root) = file_editor(r#"{"old": {"k": "v"}}"#);
        let map = child(&editor, root, "old");

        editor.edit_node(map, Some("new"), None).unwrap();
        assert_eq!(saved(&fs), json!({"new": {"k": "v"}}));
    }

    #[test]
    fn test_edit_rejects_value_on_container_and_key_in_sequence() {
        let (mut editor, fs, root) = file_editor(r#"{"list": ["a"]}"#);
        let list = child(&editor, root, "list");
        let item = child(&editor, list, "0");

        assert!(matches!(
            editor.edit_node(list, Some("renamed"), Some(json!("v"))),
            Err(EditorError::InvalidKind { .. })
        ));
        assert_eq!(logical_key(editor.store(), list).unwrap(), "list", "校验失败时不应部分修改");

        assert!(matches!(
            editor.edit_node(item, Some("5"), None),
            Err(EditorError::InvalidSelection(_))
        ));
        assert!(matches!(
            editor.edit_node(item, None, Some(json!({"x": 1}))),
            Err(EditorError::InvalidKind { .. })
        ));
        assert!(fs.writes().is_empty());
    }

    #[test]
    fn test_empty_edit_is_rejected_without_write() {
        let (mut editor, fs, root) = file_editor(r#"{"a": 1}"#);
        let leaf = child(&editor, root, "a");

        assert!(matches!(
            editor.edit_node(leaf, None, None),
            Err(EditorError::InvalidKind { id, op: "edit_empty", .. }) if id == leaf
        ));
        assert!(matches!(
            editor.edit_node(root, None, None),
            Err(EditorError::InvalidKind { kind: NodeKind::Mapping, .. })
        ));
        assert!(fs.writes().is_empty(), "空编辑不应回写");
    }

    #[test]
    fn test_rename_file_backed_root_changes_save_target() {
        let (mut editor, fs, root) = file_editor(r#"{"a": 1}"#);

        editor.edit_node(root, Some("/data/renamed.json"), None).unwrap();
        let writes = fs.writes();
        assert_eq!(writes.last().unwrap().0, PathBuf::from("/data/renamed.json"));
    }

    #[test]
    fn test_remove_non_root_subtree() {
        let (mut editor, fs, root) = file_editor(r#"{"a": {"deep": [1]}, "b": 2}"#);
        let a = child(&editor, root, "a");
        let deep = child(&editor, a, "deep");

        editor.remove_node(a).unwrap();
        assert_eq!(saved(&fs), json!({"b": 2}));
        assert!(matches!(editor.store().children(a), Err(EditorError::NotFound(_))));
        assert!(matches!(editor.store().parent(deep), Err(EditorError::NotFound(_))));
    }

    #[test]
    fn test_remove_root_keeps_document_alive() {
        let (mut editor, fs, root) = file_editor(r#"{"a": 1, "b": [2]}"#);

        editor.remove_node(root).unwrap();
        let node = editor.store().get(root).unwrap();
        assert!(node.is_document_root && node.is_file_backed);
        assert!(node.children.is_empty());
        assert_eq!(saved(&fs), json!({}));

        let writes_before = fs.writes().len();
        let change = editor.add_child(root, "again", ValueHint::Text("yes".into())).unwrap();
        assert!(change.saved_to().is_some());
        assert_eq!(fs.writes().len(), writes_before + 1);
        assert_eq!(saved(&fs), json!({"again": "yes"}));
    }

    #[test]
    fn test_persist_is_idempotent() {
        let (editor, fs, root) = file_editor(r#"{"z": [1, {"y": "中文"}], "a": null}"#);

        editor.persist_if_owned(root).unwrap();
        editor.persist_if_owned(root).unwrap();
        let writes = fs.writes();
        assert_eq!(writes.len(), 2);
        assert_eq!(writes[0].1, writes[1].1, "两次回写应字节一致");
    }

    #[test]
    fn test_persist_failure_keeps_memory_change() {
        let (mut editor, fs, root) = file_editor(r#"{"a": 1}"#);
        fs.set_fail_writes(true);

        let change = editor.add_child(root, "b", ValueHint::Text("2".into())).unwrap();
        assert!(matches!(change.warning(), Some(EditorError::Io(_))));
        assert_eq!(extract(editor.store(), root).unwrap(), json!({"a": 1, "b": "2"}));
        assert_eq!(saved(&fs), json!({"a": 1}), "文件内容应保持旧值");
    }

    #[test]
    fn test_in_memory_document_never_writes() {
        let fs = MemoryFs::new();
        let mut editor = Editor::new(fs.clone());
        let root = editor.create_document("scratch", &json!({})).unwrap();

        let change = editor.add_child(root, "k", ValueHint::Text("v".into())).unwrap();
        assert!(matches!(change.persist, Persist::Skipped));
        assert!(fs.writes().is_empty());
    }

    #[test]
    fn test_readonly_rejects_mutations() {
        let fs = MemoryFs::new().with_file(DOC, r#"{"a": 1}"#);
        let config = EditorConfig { readonly: true, ..EditorConfig::default() };
        let mut editor = Editor::with_config(fs.clone(), config);

        let root = editor.load_file(Path::new(DOC)).unwrap();
        assert!(matches!(editor.add_child(root, "b", ValueHint::Mapping), Err(EditorError::ReadOnly)));
        assert!(matches!(editor.remove_node(root), Err(EditorError::ReadOnly)));
        assert!(fs.writes().is_empty());
    }

    #[test]
    fn test_create_file_writes_empty_object() {
        let fs = MemoryFs::new();
        let mut editor = Editor::new(fs.clone());
        let root = editor.create_file(Path::new("/new.json")).unwrap();

        assert!(editor.store().get(root).unwrap().is_file_backed);
        assert_eq!(fs.writes().len(), 1);
        assert_eq!(extract(editor.store(), root).unwrap(), json!({}));
    }

    #[test]
    fn test_clear_removes_everything() {
        let (mut editor, fs, _) = file_editor(r#"{"a": 1}"#);
        editor.create_document("other", &json!([])).unwrap();

        editor.clear().unwrap();
        assert!(editor.store().roots().is_empty());
        assert!(fs.writes().is_empty(), "清空不应回写文件");
    }

    #[test]
    fn test_key_value_pair() {
        let (editor, _, root) = file_editor(r#"{"user": {"name": "张三"}}"#);
        let user = child(&editor, root, "user");
        assert_eq!(editor.key_value(user).unwrap(), ("user".to_string(), json!({"name": "张三"})));
    }

    #[test]
    fn test_query_and_extract_subtree() {
        let (editor, _, root) = file_editor(r#"{"user": {"name": "张三", "age": 30}}"#);
        let user = child(&editor, root, "user");

        // 从任意节点查询都作用于整个文档
        assert_eq!(editor.query(user, "$.user.name").unwrap(), vec![json!("张三")]);
        assert!(editor.extract_subtree_pretty(root, "$.user").unwrap().contains("30"));
        assert!(editor.extract_subtree_pretty(root, "$.nonexistent").is_err());
    }

    #[test]
    fn test_load_from_real_file_and_save_back() {
        let mut file = NamedTempFile::new().expect("创建临时文件失败");
        file.write_all(br#"{"items": ["first"]}"#).expect("写入临时文件失败");

        let mut editor = Editor::default();
        let root = editor.load_file(file.path()).unwrap();
        let items = child(&editor, root, "items");
        editor.add_child(items, "", ValueHint::Text("second".into())).unwrap();

        let on_disk: Value = serde_json::from_slice(&std::fs::read(file.path()).unwrap()).unwrap();
        assert_eq!(on_disk, json!({"items": ["first", "second"]}));
    }

    #[test]
    fn test_query_digit_leading_key() {
        let (editor, _, root) = file_editor(r#"{"0": "zero", "1a": "mixed"}"#);
        assert_eq!(editor.query(root, "$['0']").unwrap(), vec![json!("zero")]);
        assert_eq!(editor.query(root, "$['1a']").unwrap(), vec![json!("mixed")]);
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_path_is_rejected() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = tempfile::tempdir().expect("创建临时目录失败");
        let path = dir.path().join(OsStr::from_bytes(b"data\xFF.json"));
        std::fs::write(&path, br#"{"a": 1}"#).expect("写入临时文件失败");

        let mut editor = Editor::default();
        assert!(matches!(editor.load_file(&path), Err(EditorError::NonUtf8Path(p)) if p == path));
        assert!(editor.store().is_empty(), "拒绝加载时不应建树");

        let other = dir.path().join(OsStr::from_bytes(b"new\xFE.json"));
        assert!(matches!(editor.create_file(&other), Err(EditorError::NonUtf8Path(_))));

        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1, "不应写出任何替代文件");
        assert_eq!(std::fs::read(&path).unwrap(), br#"{"a": 1}"#.to_vec());
    }
}
