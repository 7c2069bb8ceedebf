use anyhow::{Context, Result};
use clap::Parser;
use mcp_report_client::utils::logging;
use mcp_report_client::{App, Config, RoutingTag, RunRequest, TransportKind};
use std::path::PathBuf;
use std::process::ExitCode;

/// 把文件和请求发给 MCP 服务，打印报告，可选导出 PDF
#[derive(Debug, Parser)]
#[command(name = "mcp-report", version, about)]
struct Cli {
    /// 要分析的文件
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// 请求内容
    #[arg(short, long)]
    request: String,

    /// 路由标签：분석 | 문체 (也接受 analysis / style)
    #[arg(short, long, default_value = "분석")]
    tag: RoutingTag,

    /// 传输方式：http | websocket
    #[arg(long)]
    transport: Option<TransportKind>,

    /// TOML 配置文件
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// 成功后导出 PDF
    #[arg(short, long)]
    export: bool,

    /// PDF 输出目录
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// 显示详细日志
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn load_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_toml_file(path)
                .with_context(|| format!("加载配置文件失败: {}", path.display()))?,
            None => Config::from_env(),
        };

        if let Some(transport) = self.transport {
            config.transport = transport;
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.display().to_string();
        }
        config.verbose_logging |= self.verbose;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // 加载配置
    let config = cli.load_config()?;

    // 初始化日志
    logging::init(config.verbose_logging);

    // 初始化并运行应用
    let app = App::initialize(config)?;
    let summary = app
        .run(RunRequest {
            file: cli.file,
            request_text: cli.request,
            tag: cli.tag,
            export: cli.export,
        })
        .await?;

    Ok(if summary.succeeded() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
