//! Guarded access to a text generator

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use once_cell::sync::Lazy;
use regex::Regex;

use super::client::{AnthropicClient, Unconfigured};
use super::prompts::CoachContext;
use super::{ChatMessage, CoachError, TextGenerator};
use crate::config::CoachSettings;

pub const ASK_FALLBACK: &str = "Sorry, I'm having trouble responding right now...";
pub const INSIGHTS_FALLBACK: &str = "Couldn't connect to AI coach. Try again later.";

const ASK_MAX_TOKENS: u32 = 400;
const TASKS_MAX_TOKENS: u32 = 300;

static CODE_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"```(?:json)?").expect("code fence pattern"));

/// Parse a JSON array of task names, tolerating markdown code fences.
/// Blank names are dropped.
pub fn parse_task_list(text: &str) -> Result<Vec<String>, CoachError> {
    let clean = CODE_FENCE.replace_all(text, "");
    let names: Vec<String> =
        serde_json::from_str(clean.trim()).map_err(|e| CoachError::Parse(e.to_string()))?;
    Ok(names
        .into_iter()
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .collect())
}

/// Clears an in-flight flag when dropped
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Wraps a generator with one in-flight flag per trigger and a cooldown
/// between task generations
pub struct Coach {
    generator: Box<dyn TextGenerator>,
    max_tokens: u32,
    cooldown: Duration,
    asking: AtomicBool,
    analyzing: AtomicBool,
    generating: AtomicBool,
    last_generation: Mutex<Option<Instant>>,
}

impl Coach {
    pub fn new(generator: Box<dyn TextGenerator>, max_tokens: u32, cooldown: Duration) -> Self {
        Self {
            generator,
            max_tokens,
            cooldown,
            asking: AtomicBool::new(false),
            analyzing: AtomicBool::new(false),
            generating: AtomicBool::new(false),
            last_generation: Mutex::new(None),
        }
    }

    /// Coach over the configured client, reading the key from the env var
    /// named in `settings`
    pub fn from_settings(settings: &CoachSettings) -> Self {
        Self::with_key(settings, std::env::var(&settings.api_key_env).ok())
    }

    /// Without a usable key every request fails, so `ask` and `insights`
    /// answer with their fallback text and task generation reports
    /// [`CoachError::MissingCredential`].
    pub fn with_key(settings: &CoachSettings, key: Option<String>) -> Self {
        let generator: Box<dyn TextGenerator> = match AnthropicClient::from_key(settings, key) {
            Ok(client) => Box::new(client),
            Err(e) => {
                tracing::warn!("{}", e);
                Box::new(Unconfigured::new(settings.api_key_env.clone()))
            }
        };
        Self::new(
            generator,
            settings.max_tokens,
            Duration::from_secs(settings.cooldown_secs),
        )
    }

    /// Answer a free-form question. Any failure yields [`ASK_FALLBACK`].
    pub fn ask(&self, question: &str, ctx: &CoachContext) -> String {
        let Some(_guard) = InFlight::acquire(&self.asking) else {
            return ASK_FALLBACK.to_string();
        };
        let messages = [ChatMessage::user(ctx.chat_prompt(question))];
        match self.generator.complete(&messages, ASK_MAX_TOKENS) {
            Ok(reply) if !reply.trim().is_empty() => reply,
            Ok(_) => ASK_FALLBACK.to_string(),
            Err(e) => {
                tracing::warn!("Coach chat failed: {:#}", e);
                ASK_FALLBACK.to_string()
            }
        }
    }

    /// Progress insights. `None` when there are no habits to talk about.
    pub fn insights(&self, ctx: &CoachContext) -> Option<String> {
        if ctx.habits.is_empty() {
            return None;
        }
        let Some(_guard) = InFlight::acquire(&self.analyzing) else {
            return Some(INSIGHTS_FALLBACK.to_string());
        };
        let messages = [ChatMessage::user(ctx.insights_prompt())];
        let text = match self.generator.complete(&messages, self.max_tokens) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("Coach insights failed: {:#}", e);
                INSIGHTS_FALLBACK.to_string()
            }
        };
        Some(text)
    }

    fn start_generation(&self) -> Result<(), CoachError> {
        let mut last = match self.last_generation.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(at) = *last {
            let elapsed = at.elapsed();
            if elapsed < self.cooldown {
                let wait = (self.cooldown - elapsed).as_secs_f64().ceil() as u64;
                return Err(CoachError::CoolingDown(wait.max(1)));
            }
        }
        *last = Some(Instant::now());
        Ok(())
    }

    /// Generate task names for today
    pub fn generate_daily_tasks(&self, ctx: &CoachContext) -> Result<Vec<String>, CoachError> {
        let _guard = InFlight::acquire(&self.generating).ok_or(CoachError::InFlight)?;
        self.start_generation()?;

        let messages = [ChatMessage::user(ctx.tasks_prompt())];
        let text = self
            .generator
            .complete(&messages, TASKS_MAX_TOKENS)
            .map_err(|e| {
                tracing::warn!("Coach task generation failed: {:#}", e);
                match e.downcast::<CoachError>() {
                    Ok(coach_error) => coach_error,
                    Err(e) => CoachError::Service(e),
                }
            })?;
        let names = parse_task_list(&text)?;
        tracing::debug!("Coach generated {} tasks", names.len());
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Arc;

    /// Replays canned replies and records every prompt it was sent
    #[derive(Default)]
    struct Scripted {
        replies: Mutex<VecDeque<anyhow::Result<String>>>,
        prompts: Arc<Mutex<Vec<String>>>,
    }

    impl Scripted {
        fn with(replies: Vec<anyhow::Result<String>>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                prompts: Arc::default(),
            }
        }
    }

    impl TextGenerator for Scripted {
        fn complete(&self, messages: &[ChatMessage], _max_tokens: u32) -> anyhow::Result<String> {
            self.prompts
                .lock()
                .unwrap()
                .extend(messages.iter().map(|m| m.content.clone()));
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(anyhow::anyhow!("no reply scripted")))
        }
    }

    fn coach(replies: Vec<anyhow::Result<String>>, cooldown: Duration) -> Coach {
        Coach::new(Box::new(Scripted::with(replies)), 1000, cooldown)
    }

    #[test]
    fn test_parse_task_list_strips_fences() {
        let text = "```json\n[\"Stretch\", \"  \", \"Plan week\"]\n```";
        assert_eq!(parse_task_list(text).unwrap(), vec!["Stretch", "Plan week"]);
        assert!(matches!(
            parse_task_list("Here are your tasks!"),
            Err(CoachError::Parse(_))
        ));
    }

    #[test]
    fn test_ask_falls_back_on_failure() {
        let c = coach(
            vec![Ok("Keep going!".into()), Err(anyhow::anyhow!("API error: 500"))],
            Duration::ZERO,
        );
        let ctx = CoachContext::default();
        assert_eq!(c.ask("hi", &ctx), "Keep going!");
        assert_eq!(c.ask("hi", &ctx), ASK_FALLBACK);
    }

    #[test]
    fn test_insights_need_habits() {
        let c = coach(vec![Err(anyhow::anyhow!("offline"))], Duration::ZERO);
        assert_eq!(c.insights(&CoachContext::default()), None);

        let ctx = CoachContext {
            habits: vec![crate::coach::HabitSummary {
                name: "Read".into(),
                streak: 2,
                completion_rate: 50,
                done_today: false,
            }],
            ..CoachContext::default()
        };
        assert_eq!(c.insights(&ctx).as_deref(), Some(INSIGHTS_FALLBACK));
    }

    #[test]
    fn test_generation_cooldown() {
        let c = coach(
            vec![Ok("[\"A\"]".into()), Ok("[\"B\"]".into())],
            Duration::from_secs(60),
        );
        let ctx = CoachContext::default();
        assert_eq!(c.generate_daily_tasks(&ctx).unwrap(), vec!["A"]);
        assert!(matches!(
            c.generate_daily_tasks(&ctx),
            Err(CoachError::CoolingDown(_))
        ));
    }

    #[test]
    fn test_generation_service_error() {
        let c = coach(vec![Err(anyhow::anyhow!("API error: 401"))], Duration::ZERO);
        let err = c.generate_daily_tasks(&CoachContext::default()).unwrap_err();
        assert!(matches!(err, CoachError::Service(_)));
        assert!(err.to_string().contains("401"));
    }

    #[test]
    fn test_missing_key_falls_back() {
        let c = Coach::with_key(&CoachSettings::default(), None);
        let ctx = CoachContext {
            habits: vec![crate::coach::HabitSummary {
                name: "Read".into(),
                streak: 0,
                completion_rate: 0,
                done_today: false,
            }],
            ..CoachContext::default()
        };

        assert_eq!(c.ask("how am I doing?", &ctx), ASK_FALLBACK);
        assert_eq!(c.insights(&ctx).as_deref(), Some(INSIGHTS_FALLBACK));
        assert!(matches!(
            c.generate_daily_tasks(&ctx),
            Err(CoachError::MissingCredential(_))
        ));
    }

    #[test]
    fn test_in_flight_guard_blocks_until_dropped() {
        let flag = AtomicBool::new(false);
        let guard = InFlight::acquire(&flag);
        assert!(guard.is_some());
        assert!(InFlight::acquire(&flag).is_none());
        drop(guard);
        assert!(InFlight::acquire(&flag).is_some());
    }
}
