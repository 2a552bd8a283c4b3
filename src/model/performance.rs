//! 性能基准测试模块
//!
//! 测量大文档的建树、还原与整体回写耗时

use std::path::Path;
use std::time::Instant;

use serde_json::{json, Value};

use crate::model::editor::{Editor, Persist};
use crate::model::serializer::{extract, populate};
use crate::model::store::TreeStore;
use crate::utils::fs::MemoryFs;

/// 性能测试结果
#[derive(Debug)]
pub struct PerformanceResult {
    pub operation: String,
    pub duration_ms: u128,
    pub success: bool,
    pub details: String,
}

impl PerformanceResult {
    pub fn new(operation: &str, duration_ms: u128, success: bool, details: &str) -> Self {
        Self {
            operation: operation.to_string(),
            duration_ms,
            success,
            details: details.to_string(),
        }
    }
}

/// 生成大型测试JSON数据
pub fn generate_large_json(depth: usize, width: usize) -> Value {
    fn nested(current_depth: usize, max_depth: usize, width: usize) -> Value {
        if current_depth >= max_depth {
            return json!("叶子节点值");
        }
        let mut obj = serde_json::Map::new();
        for i in 0..width {
            let value = match i % 4 {
                0 => json!(format!("字符串值_{}", i)),
                1 => json!(i as i64),
                2 => json!([i, i + 1, {"flag": i % 2 == 0}]),
                _ => nested(current_depth + 1, max_depth, width / 2),
            };
            obj.insert(format!("field_{}", i), value);
        }
        Value::Object(obj)
    }

    let items: Vec<Value> = (0..width * 10)
        .map(|i| json!({"id": i, "name": format!("项目_{}", i), "active": i % 3 == 0}))
        .collect();
    json!({
        "metadata": {"depth": depth, "width": width},
        "data": nested(0, depth, width),
        "items": items,
    })
}

/// 建树耗时
pub fn benchmark_populate(data: &Value) -> (TreeStore, PerformanceResult) {
    let mut store = TreeStore::new();
    let start = Instant::now();
    let result = populate(&mut store, data, None, "bench.json");
    let duration = start.elapsed().as_millis();

    let perf = match result {
        Ok(_) => PerformanceResult::new("建树", duration, true, &format!("创建了 {} 个节点", store.len())),
        Err(e) => PerformanceResult::new("建树", duration, false, &format!("建树失败: {}", e)),
    };
    (store, perf)
}

/// 还原耗时，并校验与输入一致
pub fn benchmark_extract(store: &TreeStore, expected: &Value) -> PerformanceResult {
    let Some(root) = store.roots().first().copied() else {
        return PerformanceResult::new("还原", 0, false, "没有文档根");
    };
    let start = Instant::now();
    let result = extract(store, root);
    let duration = start.elapsed().as_millis();

    match result {
        Ok(v) => PerformanceResult::new("还原", duration, &v == expected, "还原完成"),
        Err(e) => PerformanceResult::new("还原", duration, false, &format!("还原失败: {}", e)),
    }
}

/// 整体回写耗时（内存文件系统）
pub fn benchmark_persist(data: &Value) -> PerformanceResult {
    let path = Path::new("/bench/persist.json");
    let content = match serde_json::to_vec(data) {
        Ok(c) => c,
        Err(e) => return PerformanceResult::new("回写", 0, false, &format!("序列化失败: {}", e)),
    };
    let fs = MemoryFs::new().with_file(path, content);
    let mut editor = Editor::new(fs.clone());
    let root = match editor.load_file(path) {
        Ok(r) => r,
        Err(e) => return PerformanceResult::new("回写", 0, false, &format!("加载失败: {}", e)),
    };

    let start = Instant::now();
    let result = editor.persist_if_owned(root);
    let duration = start.elapsed().as_millis();

    match result {
        Ok(Persist::Saved(_)) => {
            let bytes = fs.contents(path).map(|c| c.len()).unwrap_or(0);
            PerformanceResult::new("回写", duration, true, &format!("写入了 {} 字节", bytes))
        }
        Ok(other) => PerformanceResult::new("回写", duration, false, &format!("未回写: {:?}", other)),
        Err(e) => PerformanceResult::new("回写", duration, false, &format!("回写失败: {}", e)),
    }
}

/// 默认测试规模（深度，宽度）
pub const DEFAULT_SCALES: [(usize, usize); 3] = [(3, 10), (4, 20), (5, 30)];

/// 运行综合性能测试
pub fn run_performance_suite(scales: &[(usize, usize)]) -> Vec<PerformanceResult> {
    let mut results = Vec::new();
    for &(depth, width) in scales {
        tracing::info!("测试规模：深度{}，宽度{}", depth, width);
        let data = generate_large_json(depth, width);

        let (store, populated) = benchmark_populate(&data);
        results.push(populated);
        results.push(benchmark_extract(&store, &data));
        results.push(benchmark_persist(&data));
    }
    results
}
