//! Scene graph traversal: the ordered scene list, the id index, and the
//! cursor state machine driving linear, explicit, and choice-gated moves.

use rustc_hash::FxHashMap;
use thiserror::Error;
use tracing::warn;

use crate::core::eval::evaluate;
use crate::core::variables::VariableStore;
use crate::schema::scene::{Action, Choice, Scene};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoryError {
    #[error("scene not found: {0}")]
    SceneNotFound(String),
    #[error("the story has no scenes")]
    NoCurrentScene,
    #[error("scene {scene} references unknown scene {target}")]
    UnresolvedTarget { scene: String, target: String },
}

/// Outcome of an `advance` request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// The current scene has selectable choices; the cursor did not move.
    ChoicesOpen,
    /// The cursor moved to a successor scene.
    Moved,
    /// Terminal scene; nothing happened.
    End,
}

/// Keep only the choices whose condition currently holds, preserving
/// authored order. An empty result means no interactive choice is
/// available and the caller falls back to `next`/positional advance.
pub fn filter_choices<'a>(choices: &'a [Choice], vars: &VariableStore) -> Vec<&'a Choice> {
    choices
        .iter()
        .filter(|c| evaluate(c.condition.as_ref(), vars))
        .collect()
}

/// The set of scenes plus an id→position index built as scenes are added.
/// Scenes are immutable once added; only the cursor moves.
#[derive(Debug, Clone, Default)]
pub struct SceneGraph {
    scenes: Vec<Scene>,
    index: FxHashMap<String, usize>,
    cursor: usize,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, scene: Scene) {
        if let Some(id) = scene.id.clone() {
            if self.index.insert(id.clone(), self.scenes.len()).is_some() {
                warn!(scene_id = %id, "duplicate scene id, last one wins");
            }
        }
        self.scenes.push(scene);
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// The scene under the cursor. An empty graph is a valid state that
    /// has no current scene.
    pub fn current(&self) -> Result<&Scene, StoryError> {
        self.scenes.get(self.cursor).ok_or(StoryError::NoCurrentScene)
    }

    /// Currently selectable choices of the current scene, in authored
    /// order. Empty for an empty graph.
    pub fn visible_choices(&self, vars: &VariableStore) -> Vec<&Choice> {
        match self.scenes.get(self.cursor) {
            Some(scene) => filter_choices(&scene.choices, vars),
            None => Vec::new(),
        }
    }

    /// Whether a forward move could do anything from the current scene.
    pub fn can_advance(&self, vars: &VariableStore) -> bool {
        match self.scenes.get(self.cursor) {
            Some(scene) => {
                !filter_choices(&scene.choices, vars).is_empty()
                    || scene.next.is_some()
                    || self.cursor + 1 < self.scenes.len()
            }
            None => false,
        }
    }

    pub fn can_retreat(&self) -> bool {
        self.cursor > 0
    }

    /// Move forward. Selectable choices take precedence and leave the
    /// cursor alone; otherwise an explicit `next` id is followed (running
    /// its `on_enter` actions), otherwise the cursor steps to the next
    /// positional scene without side effects. On the terminal scene this
    /// is an idempotent no-op.
    pub fn advance(&mut self, vars: &mut VariableStore) -> Result<Advance, StoryError> {
        let Some(scene) = self.scenes.get(self.cursor) else {
            return Ok(Advance::End);
        };
        if !filter_choices(&scene.choices, vars).is_empty() {
            return Ok(Advance::ChoicesOpen);
        }
        if let Some(next) = scene.next.clone() {
            self.jump(&next, vars)?;
            return Ok(Advance::Moved);
        }
        if self.cursor + 1 < self.scenes.len() {
            self.cursor += 1;
            return Ok(Advance::Moved);
        }
        Ok(Advance::End)
    }

    /// Pure positional step back, independent of how the scene was
    /// reached. Never runs `on_enter`. Returns false at the start.
    pub fn retreat(&mut self) -> bool {
        if self.cursor > 0 {
            self.cursor -= 1;
            true
        } else {
            false
        }
    }

    /// Jump to a scene by id and apply its `on_enter` actions in order.
    /// Actions re-run on every visit. A miss leaves the cursor unchanged.
    pub fn jump(&mut self, id: &str, vars: &mut VariableStore) -> Result<(), StoryError> {
        let position = *self
            .index
            .get(id)
            .ok_or_else(|| StoryError::SceneNotFound(id.to_string()))?;
        self.cursor = position;
        for action in &self.scenes[position].on_enter {
            match action {
                Action::SetVariable { name, value } => vars.set(name.clone(), value.clone()),
            }
        }
        Ok(())
    }

    /// Load-time referential check: every choice target and explicit
    /// `next` must resolve to a known scene id.
    pub fn validate(&self) -> Result<(), StoryError> {
        for (position, scene) in self.scenes.iter().enumerate() {
            let label = scene
                .id
                .clone()
                .unwrap_or_else(|| format!("#{position}"));
            if let Some(next) = &scene.next {
                if !self.index.contains_key(next) {
                    return Err(StoryError::UnresolvedTarget {
                        scene: label,
                        target: next.clone(),
                    });
                }
            }
            for choice in &scene.choices {
                if !self.index.contains_key(&choice.target) {
                    return Err(StoryError::UnresolvedTarget {
                        scene: label,
                        target: choice.target.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}
