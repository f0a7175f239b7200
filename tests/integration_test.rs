use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use hint_coach::infrastructure::HISTORY_KEY;
use hint_coach::utils::logging;
use hint_coach::{
    AppError, AppResult, Config, Gateway, HistoryLog, ImageAttachment, LineClass,
    MemoryStateStore, Phase, StateStore, SubjectMode, SubmitOutcome, TutorGateway, TutorSession,
};

/// 按脚本应答的测试网关，记录每个能力被调用的次数
struct ScriptedGateway {
    extract: Result<String, String>,
    hint: Result<String, String>,
    locate: Result<String, String>,
    extract_calls: AtomicUsize,
    hint_calls: AtomicUsize,
    locate_calls: AtomicUsize,
}

/// `Arc<ScriptedGateway>` 的本地包装：孤儿规则不允许直接为 `Arc<_>` 实现外部 trait
#[derive(Clone)]
struct ScriptedHandle(Arc<ScriptedGateway>);

impl std::ops::Deref for ScriptedHandle {
    type Target = ScriptedGateway;

    fn deref(&self) -> &ScriptedGateway {
        &self.0
    }
}

impl ScriptedGateway {
    fn new(
        extract: Result<&str, &str>,
        hint: Result<&str, &str>,
        locate: Result<&str, &str>,
    ) -> ScriptedHandle {
        ScriptedHandle(Arc::new(Self {
            extract: extract.map(str::to_string).map_err(str::to_string),
            hint: hint.map(str::to_string).map_err(str::to_string),
            locate: locate.map(str::to_string).map_err(str::to_string),
            extract_calls: AtomicUsize::new(0),
            hint_calls: AtomicUsize::new(0),
            locate_calls: AtomicUsize::new(0),
        }))
    }
}

impl TutorGateway for ScriptedHandle {
    async fn extract_text(
        &self,
        _images: &[ImageAttachment],
        _ask: &str,
        _mode: SubjectMode,
    ) -> AppResult<String> {
        self.extract_calls.fetch_add(1, Ordering::SeqCst);
        self.extract.clone().map_err(AppError::Other)
    }

    async fn request_hint(
        &self,
        _code: &str,
        _ask: &str,
        _images: &[ImageAttachment],
        _mode: SubjectMode,
    ) -> AppResult<String> {
        self.hint_calls.fetch_add(1, Ordering::SeqCst);
        self.hint.clone().map_err(AppError::Other)
    }

    async fn locate_lines(&self, _code: &str, _ask: &str, _mode: SubjectMode) -> AppResult<String> {
        self.locate_calls.fetch_add(1, Ordering::SeqCst);
        self.locate.clone().map_err(AppError::Other)
    }
}

fn new_session(gateway: ScriptedHandle) -> TutorSession<ScriptedHandle> {
    let history = HistoryLog::new(Arc::new(MemoryStateStore::new()));
    TutorSession::new(gateway, history)
}

fn sample_image() -> ImageAttachment {
    ImageAttachment::new("作业.png", "data:image/png;base64,AAAA")
}

#[tokio::test]
async fn test_full_submission_flow() {
    let gateway = ScriptedGateway::new(
        Ok(""),
        Ok("先检查循环变量有没有在循环体里更新。"),
        Ok("LINES:\n- 2 | 循环变量没有更新\nNOTE: none"),
    );
    let mut session = new_session(gateway.clone());

    session.set_mode(SubjectMode::Cs);
    session.set_code("int i = 0;\nwhile (i < 10) {\n    printf(\"%d\", i);\n}\nreturn 0;");
    session.set_ask("为什么我的循环停不下来");

    let outcome = session.submit().await.expect("提交不应被拒绝");

    assert_eq!(outcome, SubmitOutcome::Done);
    assert_eq!(session.phase(), Phase::Done);
    assert_eq!(session.response(), "先检查循环变量有没有在循环体里更新。");

    // 没有图片且有文本，识别环节不应发生
    assert_eq!(gateway.extract_calls.load(Ordering::SeqCst), 0);
    assert_eq!(gateway.hint_calls.load(Ordering::SeqCst), 1);
    assert_eq!(gateway.locate_calls.load(Ordering::SeqCst), 1);

    // 这一轮被记入历史
    assert_eq!(session.history().len(), 1);
    assert_eq!(session.history().items()[0].ai_text, session.response());

    // 定位结果：第 2 行命中，展示窗口加宽到 1-3
    let locator = session.locator();
    assert_eq!(locator.ranges.len(), 1);
    assert_eq!((locator.ranges[0].start, locator.ranges[0].end), (2, 2));
    assert_eq!((locator.windows[0].start, locator.windows[0].end), (1, 3));
    assert_eq!(locator.note, "none");

    // 逐行分类：上下文 / 命中 / 上下文 / 普通 / 普通
    assert_eq!(
        session.line_classes(),
        vec![
            LineClass::Context,
            LineClass::Hit,
            LineClass::Context,
            LineClass::Plain,
            LineClass::Plain,
        ]
    );
}

#[tokio::test]
async fn test_extraction_feeds_submission() {
    let gateway = ScriptedGateway::new(
        Ok("x = 1\ny = x +"),
        Ok("看看第二行的表达式写完整了吗？"),
        Ok("LINES:\n- 2 | 表达式不完整"),
    );
    let mut session = new_session(gateway.clone());

    session.set_mode(SubjectMode::Cs);
    session.set_ask("这段代码哪里错了");
    session.set_images(vec![sample_image()]);

    let outcome = session.submit().await.expect("提交不应被拒绝");

    assert_eq!(outcome, SubmitOutcome::Done);
    assert_eq!(gateway.extract_calls.load(Ordering::SeqCst), 1);
    // 识别出的文本进入工作状态，后续步骤在它之上进行
    assert_eq!(session.code(), "x = 1\ny = x +");
    assert_eq!(session.history().items()[0].code, "x = 1\ny = x +");
}

#[tokio::test]
async fn test_empty_extraction_fails_submission() {
    let gateway = ScriptedGateway::new(Ok("   \n  "), Ok("不该到这一步"), Ok("不该到这一步"));
    let mut session = new_session(gateway.clone());

    session.set_ask("图片里的题怎么做");
    session.set_images(vec![sample_image()]);

    let outcome = session.submit().await.expect("提交不应被拒绝");

    assert_eq!(outcome, SubmitOutcome::Failed);
    assert_eq!(session.phase(), Phase::Failed);
    assert!(session.response().starts_with("Oops — "));

    // 识别拿不到文字时，后续两步都不发生
    assert_eq!(gateway.hint_calls.load(Ordering::SeqCst), 0);
    assert_eq!(gateway.locate_calls.load(Ordering::SeqCst), 0);

    // 失败同样记入历史，应答就是 Oops 文本
    assert_eq!(session.history().len(), 1);
    assert_eq!(session.history().items()[0].ai_text, session.response());
}

#[tokio::test]
async fn test_extraction_error_fails_submission() {
    let gateway = ScriptedGateway::new(Err("识别服务维护中"), Ok("不该到这一步"), Ok("不该到这一步"));
    let mut session = new_session(gateway.clone());

    session.set_ask("帮我看看");
    session.set_images(vec![sample_image()]);

    let outcome = session.submit().await.expect("提交不应被拒绝");

    assert_eq!(outcome, SubmitOutcome::Failed);
    assert!(session.response().starts_with("Oops — "));
    assert!(session.response().contains("识别服务维护中"));
    assert_eq!(gateway.hint_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_hint_failure_fails_submission() {
    let gateway = ScriptedGateway::new(Ok(""), Err("网络超时"), Ok("不该到这一步"));
    let mut session = new_session(gateway.clone());

    session.set_code("print('hi')");
    session.set_ask("这样写对吗");

    let outcome = session.submit().await.expect("提交不应被拒绝");

    assert_eq!(outcome, SubmitOutcome::Failed);
    assert!(session.response().starts_with("Oops — "));
    assert!(session.response().contains("网络超时"));
    // 提示都没拿到，不再定位
    assert_eq!(gateway.locate_calls.load(Ordering::SeqCst), 0);
    assert_eq!(session.history().len(), 1);
}

#[tokio::test]
async fn test_locator_failure_degrades_gracefully() {
    let gateway = ScriptedGateway::new(
        Ok(""),
        Ok("想想边界条件。"),
        Err("定位服务不可用"),
    );
    let mut session = new_session(gateway.clone());

    session.set_code("a\nb\nc");
    session.set_ask("哪里有问题");

    let outcome = session.submit().await.expect("提交不应被拒绝");

    // 提示已经到手，定位失败只降级
    assert_eq!(outcome, SubmitOutcome::Done);
    assert_eq!(session.phase(), Phase::Done);
    assert_eq!(session.response(), "想想边界条件。");

    let locator = session.locator();
    assert!(locator.ranges.is_empty());
    assert!(locator.windows.is_empty());
    assert!(locator.note.starts_with("Oops — "));
    assert!(locator.note.contains("定位服务不可用"));
}

#[tokio::test]
async fn test_unparseable_locator_reply_yields_empty_result() {
    let gateway = ScriptedGateway::new(
        Ok(""),
        Ok("先想想输入范围。"),
        Ok("这道题我觉得整体都挺好的，没什么要标的。"),
    );
    let mut session = new_session(gateway);

    session.set_code("x\ny");
    session.set_ask("看看呗");

    let outcome = session.submit().await.expect("提交不应被拒绝");

    assert_eq!(outcome, SubmitOutcome::Done);
    assert!(session.locator().is_empty());
    assert_eq!(session.response(), "先想想输入范围。");
}

#[tokio::test]
async fn test_history_cap_keeps_latest_ten() {
    let gateway = ScriptedGateway::new(Ok(""), Ok("提示"), Ok("LINES:\nNOTE: none"));
    let mut session = new_session(gateway);

    for i in 1..=12 {
        session.reset().expect("空闲状态下重置不应失败");
        session.set_code("print(1)");
        session.set_ask(format!("问题 {}", i));
        session.submit().await.expect("提交不应被拒绝");
    }

    // 只留最近 10 条，最新的在最前面
    assert_eq!(session.history().len(), 10);
    assert_eq!(session.history().items()[0].ask, "问题 12");
    assert_eq!(session.history().items()[9].ask, "问题 3");
}

#[tokio::test]
async fn test_history_snapshot_is_isolated() {
    let gateway = ScriptedGateway::new(
        Ok("图里的代码"),
        Ok("提示"),
        Ok("LINES:\nNOTE: none"),
    );
    let mut session = new_session(gateway);

    session.set_ask("原始问题");
    session.set_images(vec![sample_image()]);
    session.submit().await.expect("提交不应被拒绝");

    // 提交后继续改工作状态，历史快照不受影响
    session.set_code("改掉的代码");
    session.set_ask("改掉的问题");
    session.set_images(Vec::new());

    let item = &session.history().items()[0];
    assert_eq!(item.ask, "原始问题");
    assert_eq!(item.code, "图里的代码");
    assert_eq!(item.images.len(), 1);
    assert_eq!(item.images[0].name, "作业.png");
}

#[tokio::test]
async fn test_reset_keeps_history_and_clear_empties_store() {
    let store = Arc::new(MemoryStateStore::new());
    let gateway = ScriptedGateway::new(Ok(""), Ok("提示"), Ok("LINES:\n- 1 | x"));
    let mut session = TutorSession::new(gateway, HistoryLog::new(store.clone()));

    session.set_code("print(1)");
    session.set_ask("问题");
    session.submit().await.expect("提交不应被拒绝");

    // 重置只清工作状态
    session.reset().expect("空闲状态下重置不应失败");
    assert!(session.code().is_empty());
    assert!(session.response().is_empty());
    assert_eq!(session.history().len(), 1);
    assert!(store.read(HISTORY_KEY).unwrap().is_some());

    // 清历史连持久化的键一起清掉
    session.clear_history();
    assert_eq!(session.history().len(), 0);
    assert!(store.read(HISTORY_KEY).unwrap().is_none());
}

#[tokio::test]
async fn test_history_survives_across_sessions() {
    let store = Arc::new(MemoryStateStore::new());

    {
        let gateway = ScriptedGateway::new(Ok(""), Ok("第一轮提示"), Ok("LINES:\nNOTE: none"));
        let mut session = TutorSession::new(gateway, HistoryLog::new(store.clone()));
        session.set_code("print(1)");
        session.set_ask("第一轮问题");
        session.submit().await.expect("提交不应被拒绝");
    }

    // 新会话从同一个存储里恢复历史
    let gateway = ScriptedGateway::new(Ok(""), Ok("提示"), Ok("LINES:\nNOTE: none"));
    let session = TutorSession::new(gateway, HistoryLog::new(store));
    assert_eq!(session.history().len(), 1);
    assert_eq!(session.history().items()[0].ask, "第一轮问题");
}

/// 走真实网关的端到端测试（需要可用的托管服务或 LLM 配置）
#[tokio::test]
#[ignore] // 默认忽略，需要手动运行：cargo test -- --ignored
async fn test_live_submission_round_trip() {
    // 初始化日志
    logging::init();

    // 加载配置
    let config = Config::from_env();

    // 装配会话
    let gateway = Gateway::from_config(&config);
    let history = HistoryLog::new(Arc::new(MemoryStateStore::new()));
    let mut session = TutorSession::new(gateway, history);

    session.set_mode(SubjectMode::Cs);
    session.set_code(
        "fn main() {\n    let mut i = 0;\n    while i < 10 {\n        println!(\"{}\", i);\n    }\n}",
    );
    session.set_ask("为什么我的循环停不下来");

    let outcome = session.submit().await.expect("提交不应被拒绝");

    println!("结果: {:?}", outcome);
    println!("\n========== 应答 ==========");
    println!("{}", session.response());
    println!("==========================\n");
    if !session.locator().ranges.is_empty() {
        println!("定位到 {} 段相关行", session.locator().ranges.len());
    }

    assert!(!session.response().is_empty(), "应答不应为空");
}
