use serde_json::json;
use std::path::Path;
use toeic_draft_check::models::load_draft_file;
use toeic_draft_check::utils::logging;
use toeic_draft_check::{
    validate, App, CheckOutcome, Config, DraftCtx, DraftFlow, DraftStore, ErrorLocation,
    FullTestDraft, Part,
};

fn test_config(dir: &Path) -> Config {
    Config {
        max_concurrent_drafts: 2,
        draft_folder: dir.join("drafts").to_string_lossy().to_string(),
        draft_store_dir: dir.join("cache").to_string_lossy().to_string(),
        report_file: dir.join("report.txt").to_string_lossy().to_string(),
        verbose_logging: true,
        output_log_file: dir.join("output.txt").to_string_lossy().to_string(),
    }
}

fn listening_group(audio: Option<&str>) -> serde_json::Value {
    json!({
        "audioUrl": audio,
        "imagesUrl": ["https://cdn.example.com/photo.png"],
        "questions": [{
            "choices": { "A": "He is reading.", "B": "He is eating.", "C": "He is sleeping.", "D": "He is running." },
            "correctAnswer": "A"
        }]
    })
}

#[tokio::test]
async fn test_app_checks_draft_folder() {
    logging::init(true);

    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    let drafts = dir.path().join("drafts");
    std::fs::create_dir_all(&drafts).unwrap();

    std::fs::write(
        drafts.join("a_valid.json"),
        json!({ "Part 1": [listening_group(Some("https://cdn.example.com/q1.mp3"))] }).to_string(),
    )
    .unwrap();
    std::fs::write(
        drafts.join("b_missing_audio.json"),
        json!({ "Part 1": [listening_group(None)] }).to_string(),
    )
    .unwrap();
    std::fs::write(
        drafts.join("c_part7_short.toml"),
        r#"
[["Part 7"]]
imagesUrl = ["passage.png"]
[["Part 7".questions]]
textQuestion = "What is the purpose of the e-mail?"
correctAnswer = "B"
["Part 7".questions.choices]
A = "To apologize"
B = "To confirm an order"
"#,
    )
    .unwrap();
    // 解析失败的文件计入失败数
    std::fs::write(drafts.join("d_broken.json"), "{").unwrap();
    std::fs::write(drafts.join("notes.txt"), "ignored").unwrap();

    let stats = App::initialize(config.clone()).await.unwrap().run().await.unwrap();
    assert_eq!(stats.total, 4);
    assert_eq!(stats.passed, 1);
    assert_eq!(stats.blocked, 2);
    assert_eq!(stats.failed, 1);
    assert!(!stats.is_clean());

    let report = std::fs::read_to_string(&config.report_file).unwrap();
    assert!(report.contains("草稿 b_missing_audio"));
    assert!(report.contains("草稿 c_part7_short"));
    assert!(!report.contains("a_valid"));
}

#[tokio::test]
async fn test_app_counts_part_that_is_not_a_list_as_failed() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    std::fs::create_dir_all(&config.draft_folder).unwrap();
    std::fs::write(
        Path::new(&config.draft_folder).join("x.json"),
        json!({ "Part 3": { "audioUrl": "" } }).to_string(),
    )
    .unwrap();

    let stats = App::initialize(config).await.unwrap().run().await.unwrap();
    assert_eq!(stats.total, 1);
    assert_eq!(stats.failed, 1);
    assert_eq!(stats.passed, 0);
    assert!(!stats.is_clean());
}

#[tokio::test]
async fn test_app_submits_cached_drafts() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    let store = DraftStore::new(&config.draft_store_dir);

    let valid: FullTestDraft = serde_json::from_value(json!({
        "Part 1": [listening_group(Some("q1.mp3"))]
    }))
    .unwrap();
    let invalid: FullTestDraft = serde_json::from_value(json!({
        "Part 1": [listening_group(None)]
    }))
    .unwrap();
    store.save("wizard-a", &valid).await.unwrap();
    store.save("wizard-b", &invalid).await.unwrap();
    std::fs::write(Path::new(&config.draft_store_dir).join("wizard-c.json"), "{ nope").unwrap();

    // 上一次运行的报告会被清空
    std::fs::write(&config.report_file, "草稿 previous-run\n").unwrap();

    // 草稿目录不存在时只处理缓存
    let stats = App::initialize(config.clone()).await.unwrap().run().await.unwrap();
    assert_eq!(stats.total, 3);
    assert_eq!(stats.passed, 1);
    assert_eq!(stats.blocked, 1);
    assert_eq!(stats.failed, 1);

    assert_eq!(
        store.keys().await.unwrap(),
        vec!["wizard-b".to_string(), "wizard-c".to_string()]
    );

    let report = std::fs::read_to_string(&config.report_file).unwrap();
    assert!(report.contains("草稿 wizard-b"));
    assert!(!report.contains("previous-run"));
}

#[tokio::test]
async fn test_app_with_empty_folder() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    std::fs::create_dir_all(&config.draft_folder).unwrap();

    let stats = App::initialize(config).await.unwrap().run().await.unwrap();
    assert_eq!(stats.total, 0);
    assert!(stats.is_clean());
}

#[tokio::test]
async fn test_submit_discards_only_valid_drafts() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    let store = DraftStore::new(&config.draft_store_dir);
    let flow = DraftFlow::new(&config);

    let valid: FullTestDraft = serde_json::from_value(json!({
        "Part 2": [listening_group(Some("q.mp3"))]
    }))
    .unwrap();
    let invalid: FullTestDraft = serde_json::from_value(json!({
        "Part 2": [listening_group(Some(""))]
    }))
    .unwrap();

    store.save("valid", &valid).await.unwrap();
    store.save("invalid", &invalid).await.unwrap();

    let outcome = flow.submit(&store, &DraftCtx::new("valid", 1)).await.unwrap();
    assert_eq!(outcome, CheckOutcome::Ready);

    let outcome = flow.submit(&store, &DraftCtx::new("invalid", 2)).await.unwrap();
    match outcome {
        CheckOutcome::Blocked(report) => {
            assert_eq!(report.first, ErrorLocation { part: 2, group: Some(0) });
        }
        CheckOutcome::Ready => panic!("空音频不应通过"),
    }

    assert_eq!(store.keys().await.unwrap(), vec!["invalid".to_string()]);
    assert!(flow.submit(&store, &DraftCtx::new("valid", 3)).await.is_err());
}

#[tokio::test]
async fn test_loaded_file_matches_report_shape() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("draft.json");
    std::fs::write(
        &path,
        json!({
            "Part 5": [
                { "questions": [{ "choices": { "A": "x", "B": "y" }, "correctAnswer": "A", "textQuestion": "Fill in." }] },
                { "questions": [{ "choices": { "A": "x", "B": "y" }, "correctAnswer": "C", "textQuestion": "Fill in." }] }
            ],
            "Part 2": [{ "questions": [] }]
        })
        .to_string(),
    )
    .unwrap();

    let file = load_draft_file(&path).await.unwrap();
    let report = validate(&file.draft).unwrap();

    assert_eq!(
        serde_json::to_value(&report).unwrap(),
        json!({
            "first": { "part": 2, "group": 0 },
            "all": [{ "part": 2, "group": 0 }, { "part": 5, "group": 1 }],
            "parts": [2, 5]
        })
    );
    assert_eq!(report.groups_for(Part::Part5), vec![1]);
}
