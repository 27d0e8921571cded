//! Scene records — one narrative beat each, plus the choices and entry
//! actions hanging off them.

use serde::Deserialize;

use crate::schema::condition::Condition;
use crate::schema::value::Value;

/// Horizontal slot for the character sprite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum CharacterPosition {
    Left,
    #[default]
    Center,
    Right,
}

impl CharacterPosition {
    /// Horizontal anchor as a fraction of the logical width.
    pub fn anchor(&self) -> f32 {
        match self {
            Self::Left => 0.2,
            Self::Center => 0.5,
            Self::Right => 0.8,
        }
    }
}

/// A side effect applied when a scene becomes current via a jump.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub enum Action {
    SetVariable { name: String, value: Value },
}

impl Action {
    pub fn set_variable(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::SetVariable {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A selectable branch out of a scene, optionally gated by a condition.
#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    pub text: String,
    pub target: String,
    #[serde(default)]
    pub condition: Option<Condition>,
}

/// One narrative beat: dialogue text, optional speaker art and background,
/// and how the story continues from here.
///
/// Scenes without an `id` are only reachable in linear order. A scene with
/// visible choices never auto-advances through `next` — the choice overlay
/// takes precedence until one is picked.
#[derive(Debug, Clone, Deserialize)]
pub struct Scene {
    #[serde(default)]
    pub id: Option<String>,
    pub text: String,
    /// Key into the character art cache.
    #[serde(default)]
    pub speaker_key: Option<String>,
    /// Display name; falls back to the art key when unset.
    #[serde(default)]
    pub speaker_name: Option<String>,
    /// Key into the background cache.
    #[serde(default)]
    pub background: Option<String>,
    #[serde(default)]
    pub position: CharacterPosition,
    /// Explicit sprite scale; height-fit when unset.
    #[serde(default)]
    pub scale: Option<f32>,
    #[serde(default)]
    pub choices: Vec<Choice>,
    /// Explicit successor id, overriding the positional successor.
    #[serde(default)]
    pub next: Option<String>,
    /// Applied in order on every jump into this scene.
    #[serde(default)]
    pub on_enter: Vec<Action>,
}

impl Scene {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: None,
            text: text.into(),
            speaker_key: None,
            speaker_name: None,
            background: None,
            position: CharacterPosition::default(),
            scale: None,
            choices: Vec::new(),
            next: None,
            on_enter: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_character(mut self, key: impl Into<String>) -> Self {
        self.speaker_key = Some(key.into());
        self
    }

    pub fn with_speaker_name(mut self, name: impl Into<String>) -> Self {
        self.speaker_name = Some(name.into());
        self
    }

    pub fn with_background(mut self, key: impl Into<String>) -> Self {
        self.background = Some(key.into());
        self
    }

    pub fn at(mut self, position: CharacterPosition) -> Self {
        self.position = position;
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = Some(scale);
        self
    }

    pub fn with_next(mut self, id: impl Into<String>) -> Self {
        self.next = Some(id.into());
        self
    }

    pub fn with_choice(
        mut self,
        text: impl Into<String>,
        target: impl Into<String>,
        condition: Option<Condition>,
    ) -> Self {
        self.add_choice(text, target, condition);
        self
    }

    pub fn with_on_enter(mut self, action: Action) -> Self {
        self.on_enter.push(action);
        self
    }

    pub fn add_choice(
        &mut self,
        text: impl Into<String>,
        target: impl Into<String>,
        condition: Option<Condition>,
    ) {
        self.choices.push(Choice {
            text: text.into(),
            target: target.into(),
            condition,
        });
    }

    pub fn has_choices(&self) -> bool {
        !self.choices.is_empty()
    }

    /// Name shown in the text box, defaulting to the art key.
    pub fn display_name(&self) -> Option<&str> {
        self.speaker_name.as_deref().or(self.speaker_key.as_deref())
    }
}
