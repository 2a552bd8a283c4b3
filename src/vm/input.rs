//! 输入桥接：展示层提供字符串/确认，核心据此执行增删改。
//! 空白输入视为取消，不作为错误上报

use std::collections::VecDeque;
use std::path::PathBuf;

use serde_json::{json, Value};

use crate::model::editor::{Change, Editor, EditorError, ValueHint};
use crate::model::store::{NodeId, NodeKind};

/// 展示层实现的阻塞式输入接口
pub trait InputProvider {
    fn ask_string(&mut self, title: &str, prompt: &str) -> Option<String>;
    fn confirm(&mut self, title: &str, prompt: &str) -> bool;
    fn ask_filepath(&mut self, title: &str) -> Option<PathBuf>;
}

/// 新增时选择的值类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Mapping,
    Sequence,
    Text,
    Filepath,
}

#[derive(Debug)]
pub enum InputOutcome {
    Applied(Change),
    /// 新建或加载了文档根
    Opened(NodeId),
    Cancelled,
}

impl InputOutcome {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, InputOutcome::Cancelled)
    }
}

fn non_blank(s: Option<String>) -> Option<String> {
    s.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

fn ask_value(input: &mut dyn InputProvider, kind: ValueKind) -> Option<ValueHint> {
    match kind {
        ValueKind::Mapping => Some(ValueHint::Mapping),
        ValueKind::Sequence => Some(ValueHint::Sequence),
        ValueKind::Text => non_blank(input.ask_string("输入字符串值", "value = ")).map(ValueHint::Text),
        ValueKind::Filepath => input.ask_filepath("选择文件路径").map(ValueHint::Filepath),
    }
}

/// 在选中节点下新增。选中叶子时改选其父节点重试一次
pub fn add_from_input(
    editor: &mut Editor,
    input: &mut dyn InputProvider,
    selection: Option<NodeId>,
    kind: ValueKind,
) -> Result<InputOutcome, EditorError> {
    let mut target = selection.ok_or(EditorError::NoSelection)?;
    let mut redirected = false;

    loop {
        let (kind_here, parent) = {
            let node = editor.store().get(target)?;
            (node.kind, node.parent)
        };
        match kind_here {
            NodeKind::Mapping => {
                let Some(key) = non_blank(input.ask_string("输入", "key = ")) else {
                    return Ok(InputOutcome::Cancelled);
                };
                let Some(hint) = ask_value(input, kind) else {
                    return Ok(InputOutcome::Cancelled);
                };
                return editor.add_child(target, &key, hint).map(InputOutcome::Applied);
            }
            NodeKind::Sequence => {
                let Some(hint) = ask_value(input, kind) else {
                    return Ok(InputOutcome::Cancelled);
                };
                return editor.add_child(target, "", hint).map(InputOutcome::Applied);
            }
            NodeKind::Leaf => match parent {
                Some(parent) if !redirected => {
                    tracing::debug!("选中叶子 {}，改选父节点 {}", target, parent);
                    target = parent;
                    redirected = true;
                }
                _ => return Err(EditorError::InvalidSelection(target)),
            },
        }
    }
}

/// 编辑选中节点：父节点为映射（或位于森林根下）时可改键，叶子可改值
pub fn edit_from_input(
    editor: &mut Editor,
    input: &mut dyn InputProvider,
    selection: Option<NodeId>,
) -> Result<InputOutcome, EditorError> {
    // 森林根本身不可编辑
    let Some(id) = selection else {
        return Ok(InputOutcome::Cancelled);
    };
    let node = editor.store().get(id)?;
    let key_editable = match node.parent {
        Some(p) => editor.store().get(p)?.kind == NodeKind::Mapping,
        None => true,
    };
    let is_leaf = node.is_leaf();

    let new_key = if key_editable && input.confirm("确认?", "编辑键名?") {
        non_blank(input.ask_string("键名输入", "new key = "))
    } else {
        None
    };
    let new_value = if is_leaf && input.confirm("确认?", "编辑值?") {
        non_blank(input.ask_string("值输入", "new value = ")).map(Value::String)
    } else {
        None
    };

    if new_key.is_none() && new_value.is_none() {
        return Ok(InputOutcome::Cancelled);
    }
    editor
        .edit_node(id, new_key.as_deref(), new_value)
        .map(InputOutcome::Applied)
}

pub fn remove_from_input(
    editor: &mut Editor,
    input: &mut dyn InputProvider,
    selection: Option<NodeId>,
) -> Result<InputOutcome, EditorError> {
    let Some(id) = selection else {
        return Ok(InputOutcome::Cancelled);
    };
    if !input.confirm("确认?", "删除该节点?") {
        return Ok(InputOutcome::Cancelled);
    }
    editor.remove_node(id).map(InputOutcome::Applied)
}

/// 新建未关联文件的空文档
pub fn new_document_from_input(
    editor: &mut Editor,
    input: &mut dyn InputProvider,
) -> Result<InputOutcome, EditorError> {
    let Some(name) = non_blank(input.ask_string("JSON名称?", "name = ")) else {
        return Ok(InputOutcome::Cancelled);
    };
    editor.create_document(&name, &json!({})).map(InputOutcome::Opened)
}

pub fn load_file_from_input(
    editor: &mut Editor,
    input: &mut dyn InputProvider,
) -> Result<InputOutcome, EditorError> {
    let Some(path) = input.ask_filepath("加载JSON文件") else {
        return Ok(InputOutcome::Cancelled);
    };
    editor.load_file(&path).map(InputOutcome::Opened)
}

pub fn new_file_from_input(
    editor: &mut Editor,
    input: &mut dyn InputProvider,
) -> Result<InputOutcome, EditorError> {
    let Some(path) = input.ask_filepath("新建JSON文件") else {
        return Ok(InputOutcome::Cancelled);
    };
    editor.create_file(&path).map(InputOutcome::Opened)
}

/// 预先给定应答序列的输入源，用于命令行与测试；应答耗尽视为取消
#[derive(Debug, Default)]
pub struct ScriptedInput {
    strings: VecDeque<String>,
    confirms: VecDeque<bool>,
    paths: VecDeque<PathBuf>,
}

impl ScriptedInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer(mut self, s: impl Into<String>) -> Self {
        self.strings.push_back(s.into());
        self
    }

    pub fn confirm_with(mut self, yes: bool) -> Self {
        self.confirms.push_back(yes);
        self
    }

    pub fn path(mut self, p: impl Into<PathBuf>) -> Self {
        self.paths.push_back(p.into());
        self
    }
}

impl InputProvider for ScriptedInput {
    fn ask_string(&mut self, title: &str, prompt: &str) -> Option<String> {
        tracing::debug!("{} {}", title, prompt);
        self.strings.pop_front()
    }

    fn confirm(&mut self, _title: &str, _prompt: &str) -> bool {
        self.confirms.pop_front().unwrap_or(false)
    }

    fn ask_filepath(&mut self, _title: &str) -> Option<PathBuf> {
        self.paths.pop_front()
    }
}
