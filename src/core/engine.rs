//! The top-level engine: one struct owning the graph, variables, assets,
//! viewport, renderer, and router, driven by the host's event and render
//! loop.

use tracing::info;

use crate::core::assets::{AssetStore, ImageLoader, ImageSpec, NoopLoader};
use crate::core::graph::{Advance, SceneGraph, StoryError};
use crate::core::input::{InputEvent, InputRouter};
use crate::core::layout::TextMeasure;
use crate::core::render::{DrawSurface, HitMap, SceneRenderer, Theme};
use crate::core::variables::VariableStore;
use crate::core::viewport::Viewport;
use crate::schema::scene::{Choice, Scene};
use crate::schema::value::Value;

pub struct EngineBuilder {
    logical: (u32, u32),
    physical: Option<(u32, u32)>,
    theme: Theme,
    loader: Box<dyn ImageLoader>,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self {
            logical: (800, 600),
            physical: None,
            theme: Theme::default(),
            loader: Box::new(NoopLoader),
        }
    }
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// The fixed design resolution every scene is authored against.
    pub fn logical_size(mut self, width: u32, height: u32) -> Self {
        self.logical = (width, height);
        self
    }

    /// Initial surface size; defaults to the logical size.
    pub fn physical_size(mut self, width: u32, height: u32) -> Self {
        self.physical = Some((width, height));
        self
    }

    pub fn theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn image_loader(mut self, loader: impl ImageLoader + 'static) -> Self {
        self.loader = Box::new(loader);
        self
    }

    pub fn build(self) -> Engine {
        let (lw, lh) = self.logical;
        let (pw, ph) = self.physical.unwrap_or(self.logical);
        Engine {
            graph: SceneGraph::new(),
            vars: VariableStore::new(),
            assets: AssetStore::new(lw, lh),
            viewport: Viewport::new(lw, lh, pw, ph),
            renderer: SceneRenderer::new(self.theme),
            router: InputRouter::new(),
            loader: self.loader,
            hits: HitMap::default(),
        }
    }
}

pub struct Engine {
    graph: SceneGraph,
    vars: VariableStore,
    assets: AssetStore,
    viewport: Viewport,
    renderer: SceneRenderer,
    router: InputRouter,
    loader: Box<dyn ImageLoader>,
    /// Hit regions of the last rendered frame.
    hits: HitMap,
}

impl Engine {
    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    // --- authoring ---

    pub fn add_scene(&mut self, scene: Scene) {
        self.graph.add(scene);
    }

    pub fn add_character(&mut self, key: impl Into<String>, spec: ImageSpec) {
        self.assets.insert_character(key, spec, self.loader.as_ref());
    }

    pub fn add_background(&mut self, key: impl Into<String>, spec: ImageSpec) {
        self.assets.insert_background(key, spec, self.loader.as_ref());
    }

    pub fn set_variable(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.vars.set(name, value);
    }

    /// Referential check over the loaded story; call once after authoring.
    pub fn validate(&self) -> Result<(), StoryError> {
        self.graph.validate()?;
        info!(scenes = self.graph.len(), "story validated");
        Ok(())
    }

    // --- traversal ---

    pub fn current_scene(&self) -> Result<&Scene, StoryError> {
        self.graph.current()
    }

    pub fn visible_choices(&self) -> Vec<&Choice> {
        self.graph.visible_choices(&self.vars)
    }

    pub fn variables(&self) -> &VariableStore {
        &self.vars
    }

    pub fn jump(&mut self, id: &str) -> Result<(), StoryError> {
        self.graph.jump(id, &mut self.vars)?;
        // a direct jump invalidates whatever overlay was up
        self.router.reset_overlays();
        Ok(())
    }

    pub fn advance(&mut self) -> Result<Advance, StoryError> {
        self.graph.advance(&mut self.vars)
    }

    pub fn retreat(&mut self) -> bool {
        self.graph.retreat()
    }

    // --- loop ---

    pub fn handle_event(&mut self, event: InputEvent) -> Result<(), StoryError> {
        self.router.route(
            event,
            &mut self.graph,
            &mut self.vars,
            &mut self.viewport,
            &self.hits,
        )
    }

    /// Compose and present one frame, refreshing the hit map subsequent
    /// pointer events resolve against. An empty story presents a blank
    /// frame.
    pub fn render(
        &mut self,
        surface: &mut dyn DrawSurface,
        measure: &dyn TextMeasure,
    ) -> Result<(), StoryError> {
        let Ok(scene) = self.graph.current() else {
            self.hits = HitMap::default();
            surface.present();
            return Ok(());
        };
        let choices = self.graph.visible_choices(&self.vars);
        let frame = self.router.frame_state(&self.graph, &self.vars);
        self.hits = self.renderer.compose(
            surface,
            measure,
            scene,
            &choices,
            &self.assets,
            &self.viewport,
            frame,
        );
        surface.present();
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.router.is_running()
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }
}
