use anyhow::Result;
use checkers_cli::{CliSettings, Shell};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> Result<()> {
    let settings = CliSettings::load();

    // 初始化日志（RUST_LOG 优先于设置中的日志级别），输出到 stderr 以免打乱棋盘
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(settings.log_level.to_level_filter().into())
                .from_env_lossy(),
        )
        .init();

    info!(
        "英式跳棋启动中... 玩家执 {}，日志级别 {}",
        settings.human_color,
        settings.log_level.display_name()
    );

    let mut shell = Shell::new(settings);
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    shell.run(stdin.lock(), &mut stdout)?;

    Ok(())
}
