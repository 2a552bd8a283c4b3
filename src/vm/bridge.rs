//! VM桥接层：命令行参数 -> 编辑器操作
//!
//! 节点用视图里的 JSONPath 寻址（`$`、`$.a`、`$.b[0]`），
//! 文件关联的修改由编辑器自动回写

use std::path::PathBuf;

use anyhow::{anyhow, bail, Context};

use crate::model::editor::{Change, Editor, Persist, ValueHint};
use crate::model::performance::{run_performance_suite, PerformanceResult, DEFAULT_SCALES};
use crate::model::serializer::extract;
use crate::model::store::NodeId;
use crate::model::view::TreeView;

// === 常量定义（消除魔法值） ===
pub const STATUS_LOADED: &str = "文件加载完成";
pub const STATUS_CREATED: &str = "文件已创建";
pub const STATUS_WRITE_BACK_SUCCESS: &str = "回写成功";
pub const STATUS_NOT_FILE_BACKED: &str = "未关联文件，未回写";
pub const STATUS_ERROR_PREFIX: &str = "错误: ";

pub const USAGE: &str = "用法:
  json_tree_editor show <file> [--expand] [--json]
  json_tree_editor add <file> <node-path> <key> <value|{}|[]>
  json_tree_editor edit <file> <node-path> [--key K] [--value V]
  json_tree_editor remove <file> <node-path>
  json_tree_editor new <file>
  json_tree_editor bench";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Show { file: PathBuf, expand: bool, json: bool },
    Add { file: PathBuf, path: String, key: String, value: String },
    Edit { file: PathBuf, path: String, key: Option<String>, value: Option<String> },
    Remove { file: PathBuf, path: String },
    New { file: PathBuf },
    Bench,
}

impl Command {
    pub fn parse<I>(args: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut args = args.into_iter();
        let name = args.next().ok_or_else(|| anyhow!("缺少命令"))?;
        if name == "bench" {
            if let Some(extra) = args.next() {
                bail!("bench 不接受参数: {}", extra);
            }
            return Ok(Command::Bench);
        }
        let file = PathBuf::from(args.next().ok_or_else(|| anyhow!("缺少文件路径"))?);
        let rest: Vec<String> = args.collect();

        let cmd = match name.as_str() {
            "show" => Command::Show {
                file,
                expand: rest.iter().any(|a| a == "--expand"),
                json: rest.iter().any(|a| a == "--json"),
            },
            "add" => match rest.as_slice() {
                [path, key, value] => Command::Add {
                    file,
                    path: path.clone(),
                    key: key.clone(),
                    value: value.clone(),
                },
                _ => bail!("add 需要 <node-path> <key> <value>"),
            },
            "edit" => {
                let (path, flags) = rest.split_first().ok_or_else(|| anyhow!("edit 需要 <node-path>"))?;
                let mut key = None;
                let mut value = None;
                let mut flags = flags.iter();
                while let Some(flag) = flags.next() {
                    let slot = match flag.as_str() {
                        "--key" => &mut key,
                        "--value" => &mut value,
                        other => bail!("未知参数: {}", other),
                    };
                    *slot = Some(flags.next().ok_or_else(|| anyhow!("{} 缺少取值", flag))?.clone());
                }
                if key.is_none() && value.is_none() {
                    bail!("edit 至少需要 --key 或 --value");
                }
                Command::Edit { file, path: path.clone(), key, value }
            }
            "remove" => match rest.as_slice() {
                [path] => Command::Remove { file, path: path.clone() },
                _ => bail!("remove 需要 <node-path>"),
            },
            "new" => Command::New { file },
            other => bail!("未知命令: {}", other),
        };
        Ok(cmd)
    }
}

fn hint_of(value: &str) -> ValueHint {
    match value.trim() {
        "{}" => ValueHint::Mapping,
        "[]" => ValueHint::Sequence,
        _ => ValueHint::Text(value.to_string()),
    }
}

fn resolve(editor: &Editor, root: NodeId, path: &str) -> anyhow::Result<NodeId> {
    let view = TreeView::build(editor.store());
    view.find_by_path(root, path)
        .map(|row| row.id)
        .ok_or_else(|| anyhow!("未匹配到节点: {}", path))
}

fn report(change: &Change) -> anyhow::Result<String> {
    match &change.persist {
        Persist::Saved(p) => Ok(format!("{}: {}", STATUS_WRITE_BACK_SUCCESS, p.display())),
        Persist::Skipped => Ok(STATUS_NOT_FILE_BACKED.to_string()),
        Persist::Failed { path, error } => {
            bail!("{}回写失败 {}: {}", STATUS_ERROR_PREFIX, path.display(), error)
        }
    }
}

fn bench_report(results: &[PerformanceResult]) -> anyhow::Result<String> {
    let mut out = String::new();
    for r in results {
        let mark = if r.success { "✓" } else { "✗" };
        out.push_str(&format!("{} {} {}ms {}\n", mark, r.operation, r.duration_ms, r.details));
    }
    if let Some(failed) = results.iter().find(|r| !r.success) {
        bail!("{}性能测试失败 {}: {}\n{}", STATUS_ERROR_PREFIX, failed.operation, failed.details, out);
    }
    Ok(out)
}

/// 执行命令，返回要输出的文本
pub fn run(editor: &mut Editor, cmd: &Command) -> anyhow::Result<String> {
    match cmd {
        Command::Bench => bench_report(&run_performance_suite(&DEFAULT_SCALES)),
        Command::New { file } => {
            editor
                .create_file(file)
                .with_context(|| format!("新建失败: {}", file.display()))?;
            Ok(format!("{}: {}", STATUS_CREATED, file.display()))
        }
        Command::Show { file, expand, json } => {
            let root = editor
                .load_file(file)
                .with_context(|| format!("加载失败: {}", file.display()))?;
            tracing::info!("{}: {}", STATUS_LOADED, file.display());
            let mut view = TreeView::build(editor.store());
            if *expand {
                view.expand_all();
            } else {
                view.toggle(root);
            }
            if *json {
                let rows: Vec<_> = view.visible_rows().collect();
                return Ok(serde_json::to_string_pretty(&rows)?);
            }
            Ok(view.render())
        }
        Command::Add { file, path, key, value } => {
            let root = editor.load_file(file)?;
            let parent = resolve(editor, root, path)?;
            let change = editor.add_child(parent, key, hint_of(value))?;
            report(&change)
        }
        Command::Edit { file, path, key, value } => {
            let root = editor.load_file(file)?;
            let id = resolve(editor, root, path)?;
            let new_value = value.clone().map(serde_json::Value::String);
            let change = editor.edit_node(id, key.as_deref(), new_value)?;
            report(&change)
        }
        Command::Remove { file, path } => {
            let root = editor.load_file(file)?;
            let id = resolve(editor, root, path)?;
            let change = editor.remove_node(id)?;
            let message = report(&change)?;
            let remaining = extract(editor.store(), root)?;
            Ok(format!("{}\n{}", message, serde_json::to_string_pretty(&remaining)?))
        }
    }
}
