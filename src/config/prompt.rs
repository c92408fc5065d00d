use crate::models::chat::ChatMessage;
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::error::Error;
use std::fmt;
use std::fs;
use std::str::FromStr;
use std::sync::Arc;
use log::info;

const AURORA_PERSONA: &str = "You are Aurora — a calm, warm, intelligent mentor with soft humor
and big-sister energy. You speak in a friendly, reassuring tone.
You understand Pakistani student life and can reference helpful
cultural context when relevant.";

const CHAT_INSTRUCTIONS: &str = "Carry a natural, warm, fun conversation.
Be supportive, kind, helpful, and slightly playful.";

const STUDY_INSTRUCTIONS: &str = "Explain concepts clearly with structure:
1. Explanation
2. Examples
3. Practice Questions
Keep it simple and helpful.";

const LEARN_INSTRUCTIONS: &str = "Give short mini-lessons.
Use:
- Definition
- Why it matters
- Real example
- 1 small action they can take today";

const MOTIVATION_INSTRUCTIONS: &str = "Encourage them with sincerity.
Give small actionable steps.
Avoid generic clichés — be emotionally intelligent.";

static BUILTIN_PROMPTS: Lazy<Arc<PromptConfig>> = Lazy::new(|| Arc::new(PromptConfig::default()));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Chat,
    Study,
    Learn,
    Motivation,
}

impl Mode {
    pub const ALL: [Mode; 4] = [Mode::Chat, Mode::Study, Mode::Learn, Mode::Motivation];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Chat => "chat",
            Mode::Study => "study",
            Mode::Learn => "learn",
            Mode::Motivation => "motivation",
        }
    }

    /// Resolves a client-supplied mode. Anything unrecognised is `Chat`.
    pub fn resolve(requested: &str) -> Self {
        requested.parse().unwrap_or_default()
    }
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Chat
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct ParseModeError {
    message: String,
}

impl fmt::Display for ParseModeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for ParseModeError {}

impl FromStr for Mode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "chat" => Ok(Mode::Chat),
            "study" => Ok(Mode::Study),
            "learn" => Ok(Mode::Learn),
            "motivation" => Ok(Mode::Motivation),
            _ =>
                Err(ParseModeError {
                    message: format!("Unknown mode: '{}'", s),
                }),
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ModeInstructions {
    pub chat: String,
    pub study: String,
    pub learn: String,
    pub motivation: String,
}

impl Default for ModeInstructions {
    fn default() -> Self {
        Self {
            chat: CHAT_INSTRUCTIONS.to_string(),
            study: STUDY_INSTRUCTIONS.to_string(),
            learn: LEARN_INSTRUCTIONS.to_string(),
            motivation: MOTIVATION_INSTRUCTIONS.to_string(),
        }
    }
}

/// Persona plus one instruction block per mode. Fields missing from a
/// prompts file keep their built-in text.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct PromptConfig {
    pub persona: String,
    pub modes: ModeInstructions,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            persona: AURORA_PERSONA.to_string(),
            modes: ModeInstructions::default(),
        }
    }
}

impl PromptConfig {
    pub fn instructions(&self, mode: Mode) -> &str {
        match mode {
            Mode::Chat => &self.modes.chat,
            Mode::Study => &self.modes.study,
            Mode::Learn => &self.modes.learn,
            Mode::Motivation => &self.modes.motivation,
        }
    }

    pub fn system_prompt(&self, mode: Mode) -> String {
        format!(
            "{}\n\nMode: {}\n\nInstructions:\n{}",
            self.persona.trim(),
            mode.as_str().to_uppercase(),
            self.instructions(mode).trim()
        )
    }

    /// Prepends the synthesized system message to `history`, which is
    /// copied through untouched.
    pub fn compose(&self, requested_mode: &str, history: &[ChatMessage]) -> Vec<ChatMessage> {
        let mode = Mode::resolve(requested_mode);
        let mut messages = Vec::with_capacity(history.len() + 1);
        messages.push(ChatMessage::system(self.system_prompt(mode)));
        messages.extend(history.iter().cloned());
        messages
    }
}

pub fn builtin_prompts() -> Arc<PromptConfig> {
    BUILTIN_PROMPTS.clone()
}

pub fn load_prompts(path: &str) -> Result<Arc<PromptConfig>, Box<dyn Error + Send + Sync>> {
    let file_content = fs
        ::read_to_string(path)
        .map_err(|e| format!("Failed to read prompts file '{}': {}", path, e))?;
    let config: PromptConfig = serde_json
        ::from_str(&file_content)
        .map_err(|e| format!("Failed to parse prompts file '{}': {}", path, e))?;
    info!("Loaded prompt configuration from '{}'", path);
    Ok(Arc::new(config))
}

pub fn load_prompts_or_builtin(
    path: Option<&str>
) -> Result<Arc<PromptConfig>, Box<dyn Error + Send + Sync>> {
    match path {
        Some(p) if !p.trim().is_empty() => load_prompts(p),
        _ => Ok(builtin_prompts()),
    }
}
