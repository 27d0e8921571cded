//! Per-frame scene composition onto an abstract draw surface.
//!
//! Everything here works in logical coordinates; the host's surface
//! implementation applies the viewport transform when it realizes blits
//! and rects. Composition also produces the frame's [`HitMap`] so the
//! input router tests pointer events against exactly what was drawn.

use serde::{Deserialize, Serialize};

use crate::core::assets::{AssetStore, Bitmap};
use crate::core::layout::{wrap, TextMeasure};
use crate::core::viewport::Viewport;
use crate::schema::scene::{Choice, Scene};

/// RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
}

/// Axis-aligned rectangle in logical coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x < self.x + self.w && y >= self.y && y < self.y + self.h
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.w / 2.0, self.y + self.h / 2.0)
    }
}

/// Visual constants for the stock chrome. Every length is in logical
/// pixels of the design resolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub text_box_height: f32,
    pub text_box_padding: f32,
    pub button_width: f32,
    pub button_height: f32,
    pub button_padding: f32,
    pub font_size: f32,
    pub name_font_size: f32,
    pub button_font_size: f32,
    pub text_line_spacing: f32,
    pub max_text_lines: usize,
    /// Character sprite slot height as a fraction of the logical height.
    pub character_height_fraction: f32,
    pub choice_height: f32,
    pub choice_padding: f32,
    /// Choice button width as a fraction of the logical width.
    pub choice_width_fraction: f32,
    pub dialog_width: f32,
    pub dialog_height: f32,
    pub background_color: Color,
    pub text_color: Color,
    pub name_color: Color,
    pub button_color: Color,
    pub button_disabled_color: Color,
    pub text_box_scrim: Color,
    pub choice_scrim: Color,
    pub dialog_scrim: Color,
    pub back_label: String,
    pub forward_label: String,
    pub quit_prompt: String,
    pub quit_yes_label: String,
    pub quit_no_label: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            text_box_height: 180.0,
            text_box_padding: 15.0,
            button_width: 100.0,
            button_height: 40.0,
            button_padding: 20.0,
            font_size: 24.0,
            name_font_size: 32.0,
            button_font_size: 20.0,
            text_line_spacing: 4.0,
            max_text_lines: 5,
            character_height_fraction: 0.25,
            choice_height: 50.0,
            choice_padding: 10.0,
            choice_width_fraction: 0.8,
            dialog_width: 400.0,
            dialog_height: 150.0,
            background_color: Color::WHITE,
            text_color: Color::BLACK,
            name_color: Color::rgb(50, 50, 150),
            button_color: Color::rgb(200, 200, 200),
            button_disabled_color: Color::rgb(100, 100, 100),
            text_box_scrim: Color::rgba(0, 0, 0, 180),
            choice_scrim: Color::rgba(0, 0, 0, 160),
            dialog_scrim: Color::rgba(0, 0, 0, 128),
            back_label: "Back".to_string(),
            forward_label: "Forward".to_string(),
            quit_prompt: "Quit the game?".to_string(),
            quit_yes_label: "Yes".to_string(),
            quit_no_label: "No".to_string(),
        }
    }
}

/// The abstract display collaborator: accepts draw primitives in logical
/// coordinates and presents a finished frame.
pub trait DrawSurface {
    fn blit(&mut self, image: &Bitmap, dest: Rect);
    fn fill_rect(&mut self, rect: Rect, color: Color);
    fn draw_text(&mut self, text: &str, x: f32, y: f32, size: f32, color: Color);
    fn present(&mut self);
}

/// Interactive regions drawn this frame, in logical coordinates.
#[derive(Debug, Clone, Default)]
pub struct HitMap {
    pub back: Option<Rect>,
    pub forward: Option<Rect>,
    /// One entry per visible choice, carrying its target scene id.
    pub choices: Vec<(Rect, String)>,
    pub dialog_yes: Option<Rect>,
    pub dialog_no: Option<Rect>,
}

/// Transient UI flags the router owns, snapshotted for one frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameState {
    pub choices_open: bool,
    pub exit_dialog_open: bool,
    pub can_back: bool,
    pub can_forward: bool,
}

/// Dest rect that covers the full logical area while preserving the
/// bitmap's aspect ratio, cropping the overflowing axis.
fn cover_rect(bitmap: &Bitmap, logical_w: f32, logical_h: f32) -> Rect {
    let scale = (logical_w / bitmap.width as f32).max(logical_h / bitmap.height as f32);
    let w = bitmap.width as f32 * scale;
    let h = bitmap.height as f32 * scale;
    Rect::new((logical_w - w) / 2.0, (logical_h - h) / 2.0, w, h)
}

pub struct SceneRenderer {
    pub theme: Theme,
}

impl SceneRenderer {
    pub fn new(theme: Theme) -> Self {
        Self { theme }
    }

    /// Compose one frame: background, sprite, text box, navigation, and
    /// whichever overlay is active. Does not present.
    pub fn compose(
        &self,
        surface: &mut dyn DrawSurface,
        measure: &dyn TextMeasure,
        scene: &Scene,
        choices: &[&Choice],
        assets: &AssetStore,
        viewport: &Viewport,
        frame: FrameState,
    ) -> HitMap {
        let (w, h) = viewport.logical_size();
        let t = &self.theme;
        let mut hits = HitMap::default();

        surface.fill_rect(Rect::new(0.0, 0.0, w, h), t.background_color);

        if let Some(key) = &scene.background {
            let bitmap = assets
                .background(key)
                .unwrap_or_else(|| assets.fallback_background());
            surface.blit(bitmap, cover_rect(bitmap, w, h));
        }

        if let Some(key) = &scene.speaker_key {
            if let Some(art) = assets.character(key) {
                let slot_h = h * t.character_height_fraction;
                let (dw, dh) = match scene.scale {
                    Some(s) => (art.width as f32 * s, art.height as f32 * s),
                    None => {
                        let ratio = slot_h / art.height as f32;
                        (art.width as f32 * ratio, slot_h)
                    }
                };
                let x = w * scene.position.anchor() - dw / 2.0;
                let y = h - t.text_box_height - slot_h;
                surface.blit(art, Rect::new(x, y, dw, dh));
            }
        }

        let box_y = h - t.text_box_height;
        surface.fill_rect(Rect::new(0.0, box_y, w, t.text_box_height), t.text_box_scrim);
        surface.fill_rect(
            Rect::new(
                t.text_box_padding,
                box_y + t.text_box_padding,
                w - 2.0 * t.text_box_padding,
                t.text_box_height - 2.0 * t.text_box_padding,
            ),
            Color::WHITE,
        );

        let mut name_height = 0.0;
        if let Some(name) = scene.display_name() {
            surface.draw_text(name, 20.0, box_y + 15.0, t.name_font_size, t.name_color);
            name_height = t.name_font_size + 10.0;
        }

        let left_margin = t.button_width + 2.0 * t.button_padding;
        let text_area_width = w - 2.0 * left_margin;
        let lines = wrap(&scene.text, text_area_width, t.max_text_lines, measure);
        let text_start_y = box_y + t.text_box_padding + name_height;
        for (i, line) in lines.iter().enumerate() {
            surface.draw_text(
                line,
                left_margin,
                text_start_y + i as f32 * (t.font_size + t.text_line_spacing),
                t.font_size,
                t.text_color,
            );
        }

        if !frame.choices_open {
            let button_y = h - t.text_box_height / 2.0 - t.button_height / 2.0;
            let back = Rect::new(t.button_padding, button_y, t.button_width, t.button_height);
            let forward = Rect::new(
                w - t.button_width - t.button_padding,
                button_y,
                t.button_width,
                t.button_height,
            );
            self.button(surface, measure, back, &t.back_label, frame.can_back);
            self.button(surface, measure, forward, &t.forward_label, frame.can_forward);
            hits.back = Some(back);
            hits.forward = Some(forward);
        }

        if frame.exit_dialog_open {
            surface.fill_rect(Rect::new(0.0, 0.0, w, h), t.dialog_scrim);
            let dialog = Rect::new(
                (w - t.dialog_width) / 2.0,
                (h - t.dialog_height) / 2.0,
                t.dialog_width,
                t.dialog_height,
            );
            self.bordered(surface, dialog, Color::WHITE);
            let prompt_w = measure.width(&t.quit_prompt);
            surface.draw_text(
                &t.quit_prompt,
                dialog.x + (dialog.w - prompt_w) / 2.0,
                dialog.y + 40.0 - t.font_size / 2.0,
                t.font_size,
                t.text_color,
            );
            let button_y = dialog.y + dialog.h - t.button_height - t.button_padding;
            let yes = Rect::new(
                dialog.x + t.button_padding,
                button_y,
                t.button_width,
                t.button_height,
            );
            let no = Rect::new(
                dialog.x + dialog.w - t.button_width - t.button_padding,
                button_y,
                t.button_width,
                t.button_height,
            );
            self.button(surface, measure, yes, &t.quit_yes_label, true);
            self.button(surface, measure, no, &t.quit_no_label, true);
            hits.dialog_yes = Some(yes);
            hits.dialog_no = Some(no);
        } else if frame.choices_open {
            surface.fill_rect(Rect::new(0.0, 0.0, w, h), t.choice_scrim);
            let choice_w = w * t.choice_width_fraction;
            let step = t.choice_height + t.choice_padding;
            let total = choices.len() as f32 * step - t.choice_padding;
            let start_y = (h - total) / 2.0;
            for (i, choice) in choices.iter().enumerate() {
                let rect = Rect::new(
                    (w - choice_w) / 2.0,
                    start_y + i as f32 * step,
                    choice_w,
                    t.choice_height,
                );
                self.bordered(surface, rect, t.button_color);
                self.centered_text(surface, measure, &choice.text, rect, t.font_size, t.text_color);
                hits.choices.push((rect, choice.target.clone()));
            }
        }

        hits
    }

    fn bordered(&self, surface: &mut dyn DrawSurface, rect: Rect, fill: Color) {
        surface.fill_rect(rect, Color::BLACK);
        surface.fill_rect(
            Rect::new(rect.x + 2.0, rect.y + 2.0, rect.w - 4.0, rect.h - 4.0),
            fill,
        );
    }

    fn button(
        &self,
        surface: &mut dyn DrawSurface,
        measure: &dyn TextMeasure,
        rect: Rect,
        label: &str,
        enabled: bool,
    ) {
        let t = &self.theme;
        let fill = if enabled {
            t.button_color
        } else {
            t.button_disabled_color
        };
        self.bordered(surface, rect, fill);
        self.centered_text(surface, measure, label, rect, t.button_font_size, t.text_color);
    }

    fn centered_text(
        &self,
        surface: &mut dyn DrawSurface,
        measure: &dyn TextMeasure,
        text: &str,
        rect: Rect,
        size: f32,
        color: Color,
    ) {
        let tw = measure.width(text);
        let (cx, cy) = rect.center();
        surface.draw_text(text, cx - tw / 2.0, cy - size / 2.0, size, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::layout::MonospaceMeasure;
    use crate::schema::scene::CharacterPosition;

    #[derive(Debug, PartialEq)]
    enum Op {
        Blit { dest: Rect, size: (u32, u32) },
        Fill { rect: Rect, color: Color },
        Text { text: String },
        Present,
    }

    #[derive(Default)]
    struct RecordingSurface {
        ops: Vec<Op>,
    }

    impl DrawSurface for RecordingSurface {
        fn blit(&mut self, image: &Bitmap, dest: Rect) {
            self.ops.push(Op::Blit {
                dest,
                size: (image.width, image.height),
            });
        }

        fn fill_rect(&mut self, rect: Rect, color: Color) {
            self.ops.push(Op::Fill { rect, color });
        }

        fn draw_text(&mut self, text: &str, _x: f32, _y: f32, _size: f32, _color: Color) {
            self.ops.push(Op::Text {
                text: text.to_string(),
            });
        }

        fn present(&mut self) {
            self.ops.push(Op::Present);
        }
    }

    const M: MonospaceMeasure = MonospaceMeasure { advance: 1.0 };

    fn fixture() -> (SceneRenderer, AssetStore, Viewport) {
        (
            SceneRenderer::new(Theme::default()),
            AssetStore::new(800, 600),
            Viewport::new(800, 600, 800, 600),
        )
    }

    #[test]
    fn nav_buttons_drawn_and_mapped() {
        let (renderer, assets, viewport) = fixture();
        let mut surface = RecordingSurface::default();
        let scene = Scene::new("hello");
        let hits = renderer.compose(
            &mut surface,
            &M,
            &scene,
            &[],
            &assets,
            &viewport,
            FrameState {
                can_forward: true,
                ..FrameState::default()
            },
        );
        let back = hits.back.unwrap();
        let forward = hits.forward.unwrap();
        assert_eq!((back.x, back.w), (20.0, 100.0));
        assert_eq!(forward.x, 800.0 - 100.0 - 20.0);
        assert!(hits.choices.is_empty());
        assert!(surface
            .ops
            .iter()
            .any(|op| matches!(op, Op::Text { text } if text == "Forward")));
    }

    #[test]
    fn choice_overlay_replaces_nav() {
        let (renderer, assets, viewport) = fixture();
        let mut surface = RecordingSurface::default();
        let scene = Scene::new("pick")
            .with_choice("Door", "door", None)
            .with_choice("Window", "window", None);
        let refs: Vec<&Choice> = scene.choices.iter().collect();
        let hits = renderer.compose(
            &mut surface,
            &M,
            &scene,
            &refs,
            &assets,
            &viewport,
            FrameState {
                choices_open: true,
                ..FrameState::default()
            },
        );
        assert!(hits.back.is_none());
        assert!(hits.forward.is_none());
        assert_eq!(hits.choices.len(), 2);
        assert_eq!(hits.choices[0].1, "door");
        // stacked top to bottom, centered horizontally
        assert!(hits.choices[0].0.y < hits.choices[1].0.y);
        assert_eq!(hits.choices[0].0.x, (800.0 - 640.0) / 2.0);
    }

    #[test]
    fn unknown_background_falls_back_to_placeholder() {
        let (renderer, assets, viewport) = fixture();
        let mut surface = RecordingSurface::default();
        let scene = Scene::new("x").with_background("never_registered");
        renderer.compose(
            &mut surface,
            &M,
            &scene,
            &[],
            &assets,
            &viewport,
            FrameState::default(),
        );
        assert!(surface
            .ops
            .iter()
            .any(|op| matches!(op, Op::Blit { size: (800, 600), .. })));
    }

    #[test]
    fn character_sprite_anchored_and_height_fit() {
        let (renderer, mut assets, viewport) = fixture();
        assets.insert_character(
            "lily",
            crate::core::assets::ImageSpec::placeholder(100, 300),
            &crate::core::assets::NoopLoader,
        );
        let mut surface = RecordingSurface::default();
        let scene = Scene::new("hi")
            .with_character("lily")
            .at(CharacterPosition::Right);
        renderer.compose(
            &mut surface,
            &M,
            &scene,
            &[],
            &assets,
            &viewport,
            FrameState::default(),
        );
        let blit = surface
            .ops
            .iter()
            .find_map(|op| match op {
                Op::Blit { dest, size: (100, 300) } => Some(*dest),
                _ => None,
            })
            .expect("sprite blit");
        // slot height 150, width scaled to 50, anchored at x = 640
        assert_eq!(blit.h, 150.0);
        assert_eq!(blit.w, 50.0);
        assert_eq!(blit.x, 800.0 * 0.8 - 25.0);
        assert_eq!(blit.y, 600.0 - 180.0 - 150.0);
    }

    #[test]
    fn dialogue_respects_line_cap() {
        let (renderer, assets, viewport) = fixture();
        let mut surface = RecordingSurface::default();
        let long_text = "word ".repeat(400);
        let scene = Scene::new(long_text);
        renderer.compose(
            &mut surface,
            &M,
            &scene,
            &[],
            &assets,
            &viewport,
            FrameState::default(),
        );
        let dialogue_lines = surface
            .ops
            .iter()
            .filter(|op| matches!(op, Op::Text { text } if text.starts_with("word")))
            .count();
        assert_eq!(dialogue_lines, 5);
    }

    #[test]
    fn exit_dialog_takes_priority_over_choices() {
        let (renderer, assets, viewport) = fixture();
        let mut surface = RecordingSurface::default();
        let scene = Scene::new("pick").with_choice("Go", "g", None);
        let refs: Vec<&Choice> = scene.choices.iter().collect();
        let hits = renderer.compose(
            &mut surface,
            &M,
            &scene,
            &refs,
            &assets,
            &viewport,
            FrameState {
                choices_open: true,
                exit_dialog_open: true,
                ..FrameState::default()
            },
        );
        assert!(hits.dialog_yes.is_some());
        assert!(hits.dialog_no.is_some());
        assert!(hits.choices.is_empty());
    }

    #[test]
    fn cover_rect_crops_the_wide_axis() {
        let bitmap = Bitmap::filled(400, 100, Color::BLACK);
        let rect = cover_rect(&bitmap, 800.0, 600.0);
        // scaled by 6 on height, overflowing horizontally, centered
        assert_eq!(rect.h, 600.0);
        assert_eq!(rect.w, 2400.0);
        assert_eq!(rect.x, (800.0 - 2400.0) / 2.0);
        assert_eq!(rect.y, 0.0);
    }
}
