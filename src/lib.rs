//! JSON树编辑器核心库
//!
//! 提供节点仓库、树与JSON数据的双向转换、文档归属解析，
//! 以及增删改操作与文件关联文档的整体回写

pub mod model;
pub mod utils;
pub mod vm;

// 重新导出主要类型
pub use model::editor::{Change, Editor, EditorConfig, EditorError, Persist, ValueHint};
pub use model::ownership::{find_document_root, find_filepath};
pub use model::serializer::{display_text, extract, logical_key, populate};
pub use model::store::{NodeId, NodeKind, TreeNode, TreeStore};
pub use model::view::{TreeView, ViewRow};
pub use utils::fs::{FileIo, LocalFs, MemoryFs};
pub use vm::input::{InputOutcome, InputProvider, ScriptedInput, ValueKind};
