use anyhow::{anyhow, Result};
use async_trait::async_trait;
use interrogation_npc::{
    ChatMessage, GameConfig, InterrogationEngine, LlmClient, Role, Suspect, UtteranceType,
    CORE_MARKER,
};
use std::collections::VecDeque;
use std::fs;
use std::sync::Mutex;

/// Replies with canned answers in order
struct ScriptedClient {
    replies: Mutex<VecDeque<Result<String, String>>>,
}

impl ScriptedClient {
    fn new(replies: Vec<Result<&str, &str>>) -> Self {
        Self {
            replies: Mutex::new(
                replies
                    .into_iter()
                    .map(|r| r.map(str::to_string).map_err(str::to_string))
                    .collect(),
            ),
        }
    }
}

#[async_trait]
impl LlmClient for ScriptedClient {
    async fn chat(&self, messages: &[ChatMessage], _config: &GameConfig) -> Result<String> {
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages.last().map(|m| m.role), Some(Role::User));
        match self.replies.lock().unwrap().pop_front() {
            Some(Ok(reply)) => Ok(reply),
            Some(Err(e)) => Err(anyhow!(e)),
            None => Err(anyhow!("script exhausted")),
        }
    }
}

fn write_case(dir: &std::path::Path) {
    fs::create_dir_all(dir.join("case")).unwrap();
    fs::write(dir.join("case").join("truth_pack.md"), "범인: B").unwrap();
    for (id, core) in [("A", r#"["나는 죽이지 않았다."]"#), ("B", r#"["D도 죽이지 않았다."]"#)] {
        let suspect_dir = dir.join("suspects").join(id);
        fs::create_dir_all(&suspect_dir).unwrap();
        fs::write(suspect_dir.join("core.json"), core).unwrap();
        fs::write(suspect_dir.join("sheet.md"), format!("{} sheet", id)).unwrap();
    }
}

fn engine_with(dir: &std::path::Path, client: ScriptedClient) -> InterrogationEngine {
    let _ = env_logger::builder().is_test(true).try_init();
    let config = GameConfig::default().with_data_path(dir);
    InterrogationEngine::new(config, client)
}

#[tokio::test]
async fn loads_suspects_and_records_core_reveal() {
    let dir = tempfile::tempdir().unwrap();
    write_case(dir.path());

    let client = ScriptedClient::new(vec![Ok(
        r#"{"json_list":[{"w":"난","bold":true},{"w":"아니다","bold":true},{"w":".","bold":false}],"speaker":"A","utterance_type":"core"}"#,
    )]);
    let engine = engine_with(dir.path(), client);
    assert_eq!(engine.load_suspects().unwrap(), 2);

    let suspects = engine.suspects().unwrap();
    assert_eq!(suspects[0].core_statements, vec!["나는 죽이지 않았다."]);

    let entry = engine.interrogate("A", "범인이야?").await.unwrap();
    assert_eq!(entry.utterance_type, Some(UtteranceType::Core));
    assert_eq!(entry.content, format!("{}\n\n**난 아니다**.", CORE_MARKER));

    let transcript = engine.transcript("A").unwrap();
    assert_eq!(transcript.len(), 2);
    assert_eq!(transcript[0].content, "범인이야?");
    assert_eq!(engine.core_reveals("A").unwrap().len(), 1);

    let history = engine.history("A").unwrap();
    assert!(history[0].content.contains("나는 죽이지 않았다."));
    assert!(history[0].content.contains("범인: B"));
    assert!(history[0].content.contains("A sheet"));
    assert!(history[2].content.contains("\"utterance_type\":\"core\""));
}

#[tokio::test]
async fn plain_text_reply_is_shown_verbatim() {
    let dir = tempfile::tempdir().unwrap();
    let client = ScriptedClient::new(vec![Ok("모르겠는데요.")]);
    let engine = engine_with(dir.path(), client);
    engine.add_suspect(Suspect::new("E", "E")).unwrap();

    let entry = engine.interrogate("E", "21:33에 어디 있었죠?").await.unwrap();
    assert_eq!(entry.content, "모르겠는데요.");
    assert_eq!(entry.speaker.as_deref(), Some("E"));
    assert_eq!(entry.utterance_type, Some(UtteranceType::Normal));
}

#[tokio::test]
async fn failed_call_leaves_model_history_consistent() {
    let dir = tempfile::tempdir().unwrap();
    let client = ScriptedClient::new(vec![
        Err("rate limited"),
        Ok(r#"{"json_list":[{"w":"기록","bold":false},{"w":"보세요","bold":false}],"speaker":"D"}"#),
    ]);
    let engine = engine_with(dir.path(), client);
    engine.add_suspect(Suspect::new("D", "D")).unwrap();

    assert!(engine.interrogate("D", "첫 질문").await.is_err());
    let history = engine.history("D").unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].role, Role::System);

    let entry = engine.interrogate("D", "다시 묻지").await.unwrap();
    assert_eq!(entry.content, "기록 보세요");
    let history = engine.history("D").unwrap();
    assert_eq!(history.len(), 3);
    assert_eq!(history[1].content, "심문 : 다시 묻지");
}

#[tokio::test]
async fn interrogates_many_rooms() {
    let dir = tempfile::tempdir().unwrap();
    let reply = r#"{"json_list":[{"w":"아니요","bold":false}]}"#;
    let client = ScriptedClient::new(vec![Ok(reply), Ok(reply)]);
    let engine = engine_with(dir.path(), client);
    engine.add_suspect(Suspect::new("A", "A")).unwrap();
    engine.add_suspect(Suspect::new("B", "B")).unwrap();

    let questions = vec![
        ("A".to_string(), "했어?".to_string()),
        ("B".to_string(), "했어?".to_string()),
        ("Z".to_string(), "누구?".to_string()),
    ];
    let results = engine.interrogate_many(&questions).await;
    assert_eq!(results.len(), 3);
    assert_eq!(results[0].as_ref().unwrap().speaker.as_deref(), Some("A"));
    assert_eq!(results[1].as_ref().unwrap().speaker.as_deref(), Some("B"));
    assert!(results[2].is_err());
}
