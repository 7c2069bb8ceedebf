//! 提交 → 观察 → 导出 的完整流程

use async_trait::async_trait;
use mcp_report_client::{
    App, Config, DocumentSurface, ExportFlow, FailureKind, RoutingTag, RunRequest,
    SessionStatus, SubmissionInput, SubmitOutcome, TransportAdapter, TransportRequest,
    TransportResult,
};
use std::sync::{Arc, Mutex};

/// 记录收到的请求并返回固定结果
struct FakeTransport {
    result: TransportResult,
    seen: Mutex<Vec<TransportRequest>>,
}

impl FakeTransport {
    fn new(result: TransportResult) -> Arc<Self> {
        Arc::new(Self {
            result,
            seen: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl TransportAdapter for FakeTransport {
    fn name(&self) -> &'static str {
        "fake"
    }

    async fn invoke(&self, request: TransportRequest) -> TransportResult {
        self.seen.lock().unwrap().push(request);
        self.result.clone()
    }
}

/// 只记录文字和换页的 surface
struct TextSurface {
    pages: Vec<Vec<(String, f32)>>,
    font_set_on_page: Vec<bool>,
}

impl TextSurface {
    fn new() -> Self {
        Self {
            pages: vec![Vec::new()],
            font_set_on_page: vec![false],
        }
    }
}

impl DocumentSurface for TextSurface {
    fn add_page(&mut self) {
        self.pages.push(Vec::new());
        self.font_set_on_page.push(false);
    }

    fn apply_font(&mut self, _size_pt: f32) {
        if let Some(flag) = self.font_set_on_page.last_mut() {
            *flag = true;
        }
    }

    fn set_text_color(&mut self, _rgb: (u8, u8, u8)) {}

    fn write_text(&mut self, text: &str, _x: f32, y: f32) {
        assert_eq!(self.font_set_on_page.last(), Some(&true), "写字前必须设置字体");
        if let Some(page) = self.pages.last_mut() {
            page.push((text.to_string(), y));
        }
    }
}

fn write_input_file(name: &str, content: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join("mcp_report_client_flow_test");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

#[tokio::test]
async fn test_korean_report_flows_into_export_layout() {
    let report = "### 요약\n**핵심**: 매출이 증가했습니다.\n\n세부 내용은 아래와 같습니다.";
    let transport = FakeTransport::new(TransportResult::Success(report.to_string()));
    let app = App::with_transport(Config::default(), transport.clone());
    let input = write_input_file("분기 보고서.txt", "1분기 매출 자료");

    let summary = app
        .run(RunRequest {
            file: Some(input),
            request_text: "summarize".to_string(),
            tag: RoutingTag::Analysis,
            export: false,
        })
        .await
        .unwrap();

    assert!(summary.succeeded());
    assert_eq!(summary.session.report(), Some(report));

    {
        let seen = transport.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].file().unwrap().name, "분기 보고서.txt");
        assert_eq!(seen[0].file().unwrap().mime, "text/plain");
    }

    let flow = ExportFlow::new(app.config());
    let mut surface = TextSurface::new();
    let job = flow.export_to(&summary.session, &mut surface).unwrap();

    assert_eq!(job.pages.len(), 1);
    assert_eq!(
        surface.pages[0],
        vec![
            ("MCP 분석 결과 보고서".to_string(), 20.0),
            ("파일명: 분기 보고서.txt".to_string(), 26.0),
            ("Controller 태그: 분석".to_string(), 32.0),
            ("요약".to_string(), 44.0),
            ("핵심: 매출이 증가했습니다.".to_string(), 50.0),
            ("세부 내용은 아래와 같습니다.".to_string(), 62.0),
        ]
    );
}

#[tokio::test]
async fn test_long_report_repeats_font_on_every_page() {
    let report = "가나다라 마바사아 자차카타 파하 ".repeat(400);
    let app = App::with_transport(
        Config {
            require_file: false,
            ..Config::default()
        },
        FakeTransport::new(TransportResult::Success(report)),
    );

    let summary = app
        .run(RunRequest {
            request_text: "긴 보고서".to_string(),
            tag: RoutingTag::StyleCorrection,
            ..RunRequest::default()
        })
        .await
        .unwrap();

    let mut surface = TextSurface::new();
    let job = app
        .export_flow()
        .export_to(&summary.session, &mut surface)
        .unwrap();

    assert!(job.pages.len() > 1);
    assert_eq!(surface.pages.len(), job.pages.len());
    assert!(surface.font_set_on_page.iter().all(|set| *set));
    assert!(surface.pages[0].contains(&("파일명: N/A".to_string(), 26.0)));
    assert!(surface.pages[0].contains(&("Controller 태그: 문체".to_string(), 32.0)));
    // 后续页从上边距开始，没有标题
    assert_eq!(surface.pages[1][0].1, 20.0);
    assert!(surface.pages[1].iter().all(|(text, _)| !text.starts_with("MCP")));
}

#[tokio::test]
async fn test_missing_file_never_reaches_transport() {
    let transport = FakeTransport::new(TransportResult::Success("unused".to_string()));
    let app = App::with_transport(Config::default(), transport.clone());

    let summary = app
        .run(RunRequest {
            request_text: "요약".to_string(),
            export: true,
            ..RunRequest::default()
        })
        .await
        .unwrap();

    assert!(transport.seen.lock().unwrap().is_empty());
    assert_eq!(summary.session.failure().unwrap().kind, FailureKind::Validation);
    assert!(summary.exported.is_none());
    assert!(ExportFlow::new(app.config())
        .build_job(&summary.session)
        .is_err());
}

#[tokio::test]
async fn test_network_failure_then_retry_succeeds() {
    let config = Config {
        require_file: false,
        ..Config::default()
    };
    let failing = App::with_transport(
        config,
        FakeTransport::new(TransportResult::network("connection refused")),
    );
    let summary = failing
        .run(RunRequest {
            request_text: "요약".to_string(),
            ..RunRequest::default()
        })
        .await
        .unwrap();
    assert!(matches!(
        summary.session.status(),
        SessionStatus::Failed { reason } if reason.kind == FailureKind::Network
    ));
    assert!(!summary.session.export_eligible());

    // 同一个编排器失败后可以直接重新提交
    let orchestrator = failing.orchestrator();
    let outcome = orchestrator
        .submit(SubmissionInput::new(None, "다시 요약", RoutingTag::Analysis))
        .await;
    assert_ne!(outcome, SubmitOutcome::Ignored);
}

#[tokio::test]
async fn test_export_writes_pdf_file() {
    let output_dir = std::env::temp_dir().join("mcp_report_client_export_test");
    let config = Config {
        require_file: false,
        font_path: concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/RobotoMedium.ttf")
            .to_string(),
        output_dir: output_dir.display().to_string(),
        ..Config::default()
    };
    let report = "Quarterly revenue grew by twelve percent. ".repeat(200);
    let app = App::with_transport(config, FakeTransport::new(TransportResult::Success(report)));

    let summary = app
        .run(RunRequest {
            request_text: "summarize".to_string(),
            export: true,
            ..RunRequest::default()
        })
        .await
        .unwrap();

    let path = summary.exported.unwrap();
    assert_eq!(path, output_dir.join("MCP_분석결과_report.pdf"));

    let bytes = std::fs::read(path).unwrap();
    assert!(bytes.starts_with(b"%PDF"));
    let document = lopdf::Document::load_mem(&bytes).unwrap();
    assert!(document.get_pages().len() > 1);
}
