//! Pointer and window event routing.
//!
//! The router owns the transient UI state (choice overlay, exit dialog,
//! running flag) and resolves pointer positions against the hit map the
//! renderer produced for the previous frame. Overlays are strictly
//! prioritized: the exit dialog swallows everything, then the choice
//! overlay, then navigation, then the background click fall-through.

use tracing::debug;

use crate::core::graph::{Advance, SceneGraph, StoryError};
use crate::core::render::{FrameState, HitMap};
use crate::core::variables::VariableStore;
use crate::core::viewport::Viewport;

/// Host-independent input events, already in physical screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDown { x: f32, y: f32 },
    Resize { width: u32, height: u32 },
    ToggleFullscreen { display_width: u32, display_height: u32 },
    KeyEscape,
    Quit,
}

#[derive(Debug, Clone, Default)]
pub struct InputRouter {
    choices_open: bool,
    exit_dialog_open: bool,
    running: bool,
}

impl InputRouter {
    pub fn new() -> Self {
        Self {
            choices_open: false,
            exit_dialog_open: false,
            running: true,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn choices_open(&self) -> bool {
        self.choices_open
    }

    pub fn exit_dialog_open(&self) -> bool {
        self.exit_dialog_open
    }

    /// Snapshot the router state for the renderer.
    pub fn frame_state(&self, graph: &SceneGraph, vars: &VariableStore) -> FrameState {
        FrameState {
            choices_open: self.choices_open,
            exit_dialog_open: self.exit_dialog_open,
            can_back: graph.can_retreat(),
            can_forward: graph.can_advance(vars),
        }
    }

    /// Close any overlay; used after an external jump invalidates it.
    pub fn reset_overlays(&mut self) {
        self.choices_open = false;
        self.exit_dialog_open = false;
    }

    pub fn route(
        &mut self,
        event: InputEvent,
        graph: &mut SceneGraph,
        vars: &mut VariableStore,
        viewport: &mut Viewport,
        hits: &HitMap,
    ) -> Result<(), StoryError> {
        match event {
            InputEvent::Quit => {
                self.running = false;
            }
            InputEvent::KeyEscape => {
                if self.exit_dialog_open {
                    self.exit_dialog_open = false;
                } else {
                    self.exit_dialog_open = true;
                }
            }
            InputEvent::Resize { width, height } => {
                // the window manager drives geometry while fullscreen
                if !viewport.is_fullscreen() {
                    viewport.resize(width, height);
                }
            }
            InputEvent::ToggleFullscreen {
                display_width,
                display_height,
            } => {
                viewport.toggle_fullscreen(display_width, display_height);
            }
            InputEvent::PointerDown { x, y } => {
                let Some((lx, ly)) = viewport.screen_to_logical(x, y) else {
                    debug!(x, y, "pointer in letterbox, ignored");
                    return Ok(());
                };
                self.pointer(lx, ly, graph, vars, hits)?;
            }
        }
        Ok(())
    }

    fn pointer(
        &mut self,
        x: f32,
        y: f32,
        graph: &mut SceneGraph,
        vars: &mut VariableStore,
        hits: &HitMap,
    ) -> Result<(), StoryError> {
        if self.exit_dialog_open {
            if hits.dialog_yes.is_some_and(|r| r.contains(x, y)) {
                self.running = false;
            } else if hits.dialog_no.is_some_and(|r| r.contains(x, y)) {
                self.exit_dialog_open = false;
            }
            return Ok(());
        }

        if self.choices_open {
            for (rect, target) in &hits.choices {
                if rect.contains(x, y) {
                    let target = target.clone();
                    graph.jump(&target, vars)?;
                    self.choices_open = false;
                    return Ok(());
                }
            }
            // clicks outside the buttons leave the overlay up
            return Ok(());
        }

        if hits.back.is_some_and(|r| r.contains(x, y)) {
            graph.retreat();
            return Ok(());
        }
        if hits.forward.is_some_and(|r| r.contains(x, y)) {
            if graph.advance(vars)? == Advance::ChoicesOpen {
                self.choices_open = true;
            }
            return Ok(());
        }

        // anywhere else on the stage advances the story
        if graph.advance(vars)? == Advance::ChoicesOpen {
            self.choices_open = true;
        }
        Ok(())
    }
}
