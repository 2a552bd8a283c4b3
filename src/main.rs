//! 程序入口：初始化日志，解析命令并交给编辑器执行

use tracing_subscriber::fmt::SubscriberBuilder;

use json_tree_editor::vm::bridge::{run, Command, STATUS_ERROR_PREFIX, USAGE};
use json_tree_editor::Editor;

fn main() -> anyhow::Result<()> {
    // 初始化日志输出到 stderr，stdout 留给命令结果
    let _ = SubscriberBuilder::default()
        .with_max_level(tracing::Level::INFO)
        .with_writer(std::io::stderr)
        .try_init();

    let cmd = match Command::parse(std::env::args().skip(1)) {
        Ok(cmd) => cmd,
        Err(e) => {
            eprintln!("{}{}\n\n{}", STATUS_ERROR_PREFIX, e, USAGE);
            std::process::exit(2);
        }
    };

    let mut editor = Editor::default();
    let output = run(&mut editor, &cmd)?;
    println!("{}", output);
    Ok(())
}
