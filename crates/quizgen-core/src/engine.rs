//! Central quiz engine.
//!
//! Wires prompt building, the provider call, response validation, storage
//! and the session together behind the operations a front end needs:
//! request generation, show the current question, submit an answer,
//! advance, and read the result.

use std::sync::Arc;
use std::time::Instant;

use tracing::{info, warn};

use crate::error::{GenerationError, ParseError, SessionError, StoreError};
use crate::model::{CefrLevel, Question, QuestionSet};
use crate::parser::parse_response;
use crate::prompt::{PromptBuilder, DEFAULT_QUESTION_COUNT, SYSTEM_PROMPT};
use crate::session::{AnswerFeedback, QuizResult, Session};
use crate::traits::{GenerateRequest, QuestionStore, QuizProvider};

/// Configuration for the quiz engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Number of questions requested per generation.
    pub question_count: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            question_count: DEFAULT_QUESTION_COUNT,
        }
    }
}

/// Owns the provider, the store and the single active session.
pub struct QuizEngine {
    provider: Arc<dyn QuizProvider>,
    store: Box<dyn QuestionStore>,
    prompts: PromptBuilder,
    session: Session,
}

impl QuizEngine {
    pub fn new(
        provider: Arc<dyn QuizProvider>,
        store: Box<dyn QuestionStore>,
        config: EngineConfig,
    ) -> Self {
        Self {
            provider,
            store,
            prompts: PromptBuilder::new(config.question_count),
            session: Session::new(),
        }
    }

    /// Run one generation cycle: prompt, call the provider once, validate,
    /// replace the stored set, then start a fresh session on it.
    ///
    /// The model is whatever the provider was configured with. Taking
    /// `&mut self` keeps at most one generation in flight. On failure
    /// neither the stored set nor the current session is touched.
    pub async fn request_generation(
        &mut self,
        level: CefrLevel,
        hint: Option<&str>,
    ) -> Result<Arc<QuestionSet>, GenerationError> {
        let start = Instant::now();
        let prompt = self.prompts.build(level, hint);
        let request = GenerateRequest::new(prompt).with_system_prompt(SYSTEM_PROMPT);

        info!(
            provider = self.provider.name(),
            model = self.provider.default_model(),
            %level,
            "requesting questions"
        );

        let response = self.provider.generate(&request).await?;
        let questions = parse_response(&response.content)?;

        let requested = self.prompts.question_count();
        if questions.len() != requested {
            warn!(
                requested,
                received = questions.len(),
                "provider returned a different number of questions, using what was generated"
            );
        }

        self.store.replace(&questions)?;

        if self.session.is_active() {
            info!("new question set replaces the in-progress session");
        }
        // parse_response never yields an empty set, so this cannot fail.
        let questions = Arc::new(questions);
        self.session
            .start(Arc::clone(&questions))
            .map_err(|_| ParseError::NoQuestions)?;

        info!(
            count = questions.len(),
            model = %response.model,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "question set ready"
        );
        Ok(questions)
    }

    /// Start a session on whatever set is already stored.
    pub fn resume(&mut self) -> Result<Option<Arc<QuestionSet>>, StoreError> {
        let Some(questions) = self.store.load_all()? else {
            return Ok(None);
        };
        // A store that hands back `Some` with no rows breaks the trait
        // contract; report it as a store problem.
        let questions = Arc::new(questions);
        self.session
            .start(Arc::clone(&questions))
            .map_err(|_| StoreError::EmptySet)?;
        info!(count = questions.len(), "resumed stored question set");
        Ok(Some(questions))
    }

    pub fn current_question(&self) -> Result<&Question, SessionError> {
        self.session.current_question()
    }

    pub fn submit_answer(&mut self, choice_index: usize) -> Result<AnswerFeedback, SessionError> {
        self.session.submit_answer(choice_index)
    }

    /// Returns whether another question is available.
    pub fn advance(&mut self) -> Result<bool, SessionError> {
        self.session.advance()
    }

    pub fn result(&self) -> Result<QuizResult, SessionError> {
        self.session.result()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Mutable access for front ends that drive the session directly.
    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn provider(&self) -> &dyn QuizProvider {
        self.provider.as_ref()
    }

    pub fn store(&self) -> &dyn QuestionStore {
        self.store.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::json;

    use crate::error::ProviderError;
    use crate::session::SessionPhase;
    use crate::traits::GenerateResponse;

    /// Replays queued responses in order.
    struct ScriptedProvider {
        replies: Mutex<Vec<Result<String, ProviderError>>>,
        prompts: Arc<Mutex<Vec<GenerateRequest>>>,
    }

    impl ScriptedProvider {
        fn new(replies: Vec<Result<String, ProviderError>>) -> Self {
            Self {
                replies: Mutex::new(replies.into_iter().rev().collect()),
                prompts: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    #[async_trait]
    impl QuizProvider for ScriptedProvider {
        fn name(&self) -> &str {
            "scripted"
        }

        fn default_model(&self) -> &str {
            "scripted-model"
        }

        async fn generate(
            &self,
            request: &GenerateRequest,
        ) -> Result<GenerateResponse, ProviderError> {
            self.prompts.lock().unwrap().push(request.clone());
            let reply = self
                .replies
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| Err(ProviderError::NetworkError("no reply".into())));
            reply.map(|content| GenerateResponse {
                content,
                model: "scripted-model".into(),
                latency_ms: 1,
            })
        }
    }

    #[derive(Default)]
    struct MemoryStore {
        rows: Arc<Mutex<Option<QuestionSet>>>,
        fail_writes: bool,
    }

    impl QuestionStore for MemoryStore {
        fn replace(&mut self, questions: &QuestionSet) -> Result<(), StoreError> {
            if self.fail_writes {
                return Err(StoreError::Database("disk full".into()));
            }
            *self.rows.lock().unwrap() = Some(questions.clone());
            Ok(())
        }

        fn load_all(&self) -> Result<Option<QuestionSet>, StoreError> {
            Ok(self.rows.lock().unwrap().clone())
        }
    }

    fn response(count: usize, tag: &str) -> String {
        let items: Vec<_> = (0..count)
            .map(|i| {
                json!({
                    "question": format!("{tag} {i}: He ___ up early."),
                    "options": ["get", "gets", "got", "getting"],
                    "answer": 2,
                    "translation": "彼は早く起きます。",
                    "explanation": "三人称単数なので gets です。"
                })
            })
            .collect();
        serde_json::Value::Array(items).to_string()
    }

    fn build_engine(
        replies: Vec<Result<String, ProviderError>>,
        store: MemoryStore,
    ) -> (QuizEngine, Arc<Mutex<Vec<GenerateRequest>>>) {
        let provider = ScriptedProvider::new(replies);
        let prompts = Arc::clone(&provider.prompts);
        let config = EngineConfig { question_count: 5 };
        (
            QuizEngine::new(Arc::new(provider), Box::new(store), config),
            prompts,
        )
    }

    #[tokio::test]
    async fn generation_stores_and_starts_session() {
        let store = MemoryStore::default();
        let rows = Arc::clone(&store.rows);
        let (mut engine, prompts) = build_engine(vec![Ok(response(5, "first"))], store);

        let set = engine
            .request_generation(CefrLevel::B2, Some("phrasal verbs"))
            .await
            .unwrap();
        assert_eq!(set.len(), 5);
        assert_eq!(rows.lock().unwrap().as_ref().unwrap(), &*set);
        assert_eq!(engine.session().phase(), SessionPhase::QuestionDisplayed);

        let sent = prompts.lock().unwrap();
        assert!(sent[0].prompt.contains("CEFR B2"));
        assert!(sent[0].prompt.contains("phrasal verbs"));
        assert_eq!(sent[0].model, None);
        assert_eq!(sent[0].system_prompt.as_deref(), Some(SYSTEM_PROMPT));
    }

    #[tokio::test]
    async fn full_round_scores() {
        let (mut engine, _) = build_engine(vec![Ok(response(2, "q"))], MemoryStore::default());
        engine.request_generation(CefrLevel::B1, None).await.unwrap();

        assert!(engine.submit_answer(1).unwrap().is_correct);
        assert!(engine.advance().unwrap());
        assert!(!engine.submit_answer(0).unwrap().is_correct);
        assert!(!engine.advance().unwrap());
        assert_eq!(engine.result().unwrap(), QuizResult { score: 1, total: 2 });
    }

    #[tokio::test]
    async fn failed_generation_keeps_session_and_store() {
        let store = MemoryStore::default();
        let rows = Arc::clone(&store.rows);
        let (mut engine, _) = build_engine(
            vec![
                Ok(response(3, "old")),
                Ok("[{\"question\": \"broken\"}]".into()),
                Err(ProviderError::AuthenticationFailed("bad key".into())),
            ],
            store,
        );

        let original = engine.request_generation(CefrLevel::A2, None).await.unwrap();
        engine.submit_answer(1).unwrap();

        let err = engine.request_generation(CefrLevel::A2, None).await.unwrap_err();
        assert!(matches!(err, GenerationError::Parse(_)));
        let err = engine.request_generation(CefrLevel::A2, None).await.unwrap_err();
        assert!(matches!(
            err,
            GenerationError::Provider(ProviderError::AuthenticationFailed(_))
        ));

        assert_eq!(rows.lock().unwrap().as_ref().unwrap(), &*original);
        assert_eq!(engine.session().phase(), SessionPhase::AnswerRecorded);
        assert_eq!(engine.session().answers().len(), 1);
    }

    #[tokio::test]
    async fn store_failure_is_reported() {
        let store = MemoryStore {
            fail_writes: true,
            ..Default::default()
        };
        let (mut engine, _) = build_engine(vec![Ok(response(2, "q"))], store);
        let err = engine.request_generation(CefrLevel::C1, None).await.unwrap_err();
        assert!(matches!(err, GenerationError::Store(_)));
        assert_eq!(engine.session().phase(), SessionPhase::AwaitingStart);
    }

    #[tokio::test]
    async fn regeneration_resets_active_session() {
        let (mut engine, _) = build_engine(
            vec![Ok(response(3, "old")), Ok(response(4, "new"))],
            MemoryStore::default(),
        );
        engine.request_generation(CefrLevel::B1, None).await.unwrap();
        engine.submit_answer(0).unwrap();
        engine.advance().unwrap();

        engine.request_generation(CefrLevel::B1, None).await.unwrap();
        assert_eq!(engine.session().position(), (0, 4));
        assert!(engine.session().answers().is_empty());
        assert!(engine.current_question().unwrap().prompt_text.starts_with("new 0"));
    }

    #[test]
    fn resume_uses_stored_set() {
        let (mut engine, _) = build_engine(vec![], MemoryStore::default());
        assert!(engine.resume().unwrap().is_none());
        assert_eq!(engine.session().phase(), SessionPhase::AwaitingStart);

        let store = MemoryStore::default();
        *store.rows.lock().unwrap() = Some(crate::model::fixtures::set(2));
        let (mut engine, _) = build_engine(vec![], store);
        let set = engine.resume().unwrap().unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(engine.current_question().unwrap(), &set[0]);
    }

    #[test]
    fn resume_rejects_empty_stored_set() {
        let store = MemoryStore::default();
        *store.rows.lock().unwrap() = Some(QuestionSet::default());
        let (mut engine, _) = build_engine(vec![], store);

        assert!(matches!(engine.resume(), Err(StoreError::EmptySet)));
        assert_eq!(engine.session().phase(), SessionPhase::AwaitingStart);
    }
}
