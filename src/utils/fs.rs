//! IO helper: file access collaborator and JSON encode/decode

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use serde_json::Value;
use crate::model::editor::EditorError;

/// 文件读写协作方。编辑器只通过该接口访问文件
pub trait FileIo {
    fn read_file(&self, path: &Path) -> io::Result<Vec<u8>>;
    fn write_file(&self, path: &Path, bytes: &[u8]) -> io::Result<()>;
}

/// 本地文件系统
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFs;

impl FileIo for LocalFs {
    fn read_file(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(path)
    }

    fn write_file(&self, path: &Path, bytes: &[u8]) -> io::Result<()> {
        std::fs::write(path, bytes)
    }
}

#[derive(Debug, Default)]
struct MemoryFsInner {
    files: BTreeMap<PathBuf, Vec<u8>>,
    writes: Vec<(PathBuf, Vec<u8>)>,
    fail_writes: bool,
}

/// 内存文件系统：记录每次写入，可注入写失败。克隆共享同一份数据
#[derive(Debug, Default, Clone)]
pub struct MemoryFs {
    inner: Rc<RefCell<MemoryFsInner>>,
}

impl MemoryFs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(self, path: impl Into<PathBuf>, content: impl Into<Vec<u8>>) -> Self {
        self.inner.borrow_mut().files.insert(path.into(), content.into());
        self
    }

    pub fn contents(&self, path: &Path) -> Option<Vec<u8>> {
        self.inner.borrow().files.get(path).cloned()
    }

    /// 按顺序返回所有写入记录
    pub fn writes(&self) -> Vec<(PathBuf, Vec<u8>)> {
        self.inner.borrow().writes.clone()
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.inner.borrow_mut().fail_writes = fail;
    }
}

impl FileIo for MemoryFs {
    fn read_file(&self, path: &Path) -> io::Result<Vec<u8>> {
        self.inner
            .borrow()
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, path.display().to_string()))
    }

    fn write_file(&self, path: &Path, bytes: &[u8]) -> io::Result<()> {
        let mut inner = self.inner.borrow_mut();
        if inner.fail_writes {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "写入被拒绝"));
        }
        inner.files.insert(path.to_path_buf(), bytes.to_vec());
        inner.writes.push((path.to_path_buf(), bytes.to_vec()));
        Ok(())
    }
}

/// 从文件读取JSON数据；文件不存在映射为 FileNotFound
pub fn read_json_file(fs: &dyn FileIo, p: &Path) -> Result<Value, EditorError> {
    let bytes = fs.read_file(p).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => EditorError::FileNotFound(p.to_path_buf()),
        _ => EditorError::Io(e),
    })?;
    let v: Value = serde_json::from_slice(&bytes)?;
    Ok(v)
}

/// 序列化整个文档（pretty 控制是否格式化输出）
pub fn encode_json(value: &Value, pretty: bool) -> Result<Vec<u8>, EditorError> {
    let bytes = if pretty {
        serde_json::to_vec_pretty(value)?
    } else {
        serde_json::to_vec(value)?
    };
    Ok(bytes)
}
