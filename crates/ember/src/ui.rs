//! Retained screen-space UI: a canvas, images, buttons and flow tables.
//!
//! Nodes live in an arena owned by [`Ui`] and are addressed by [`NodeId`].
//! The root canvas always covers the window. Everything is positioned by its
//! center in screen pixels (origin bottom-left, y up), the space the camera's
//! screen projection maps.
//!
//! ```text
//!   canvas (window)
//!    └─ table (fill x, margins, spacing 10)
//!        ├─ button ─► click: press inside, release
//!        ├─ image
//!        └─ image   rows flow left → right, wrap downwards
//! ```
//!
//! Each frame the loop calls [`Ui::update`] with the input state and the
//! pointer in screen space, then [`Ui::draw`] with the screen projection set.
//!
//! ## Comparison
//!
//! - **Dear ImGui / egui**: immediate mode, rebuilt every frame. Here nodes
//!   persist and only layout reruns.
//! - **Unity uGUI**: the same canvas → rect-transform tree, without anchors.

use crate::color::Color;
use crate::input::{InputState, MouseButton};
use crate::math::{BVec2, Rect, Vec2};
use crate::render2d::{Draw, Sprite};

/// Default gap between table cells, in pixels.
pub const DEFAULT_TABLE_SPACING: f32 = 10.0;
/// Size given to new nodes until set explicitly.
pub const DEFAULT_NODE_SIZE: Vec2 = Vec2::new(80.0, 80.0);

/// Handle to a node in a [`Ui`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// Inner padding of a [`Table`](NodeKind::Table).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Margins {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Margins {
    pub fn all(value: f32) -> Self {
        Self {
            left: value,
            right: value,
            top: value,
            bottom: value,
        }
    }
}

pub enum NodeKind {
    Canvas,
    /// Draws `sprite` tinted by `color`, or a plain rect when the sprite is
    /// missing or invalid.
    Image { sprite: Option<Sprite>, color: Color },
    Button {
        color: Color,
        held: bool,
        clicked: bool,
        on_click: Option<Box<dyn FnMut()>>,
    },
    /// Lays its children out in rows, left to right, wrapping when a row
    /// runs past the right margin.
    Table {
        spacing: Vec2,
        fill: BVec2,
        margins: Margins,
    },
}

impl std::fmt::Debug for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Canvas => f.write_str("Canvas"),
            Self::Image { sprite, color } => f
                .debug_struct("Image")
                .field("sprite", sprite)
                .field("color", color)
                .finish(),
            Self::Button {
                color,
                held,
                on_click,
                ..
            } => f
                .debug_struct("Button")
                .field("color", color)
                .field("held", held)
                .field("has_on_click", &on_click.is_some())
                .finish(),
            Self::Table {
                spacing,
                fill,
                margins,
            } => f
                .debug_struct("Table")
                .field("spacing", spacing)
                .field("fill", fill)
                .field("margins", margins)
                .finish(),
        }
    }
}

#[derive(Debug)]
struct Node {
    position: Vec2,
    size: Vec2,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    alive: bool,
    kind: NodeKind,
}

impl Node {
    fn new(kind: NodeKind, parent: Option<NodeId>) -> Self {
        Self {
            position: Vec2::ZERO,
            size: DEFAULT_NODE_SIZE,
            parent,
            children: Vec::new(),
            alive: true,
            kind,
        }
    }
}

#[derive(Debug)]
pub struct Ui {
    nodes: Vec<Node>,
}

impl Ui {
    /// A UI whose root canvas covers a `width` x `height` pixel window.
    pub fn new(width: u32, height: u32) -> Self {
        let mut ui = Self {
            nodes: vec![Node::new(NodeKind::Canvas, None)],
        };
        ui.resize(width, height);
        ui
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Track the window size on the root canvas.
    pub fn resize(&mut self, width: u32, height: u32) {
        let size = Vec2::new(width as f32, height as f32);
        let root = &mut self.nodes[0];
        root.size = size;
        root.position = size * 0.5;
    }

    // ── Building ────────────────────────────────────────────────────────

    pub fn image(&mut self, parent: NodeId, sprite: Option<Sprite>) -> NodeId {
        self.add(
            parent,
            NodeKind::Image {
                sprite,
                color: Color::WHITE,
            },
        )
    }

    pub fn button(&mut self, parent: NodeId) -> NodeId {
        self.add(
            parent,
            NodeKind::Button {
                color: Color::WHITE,
                held: false,
                clicked: false,
                on_click: None,
            },
        )
    }

    pub fn table(&mut self, parent: NodeId) -> NodeId {
        self.add(
            parent,
            NodeKind::Table {
                spacing: Vec2::splat(DEFAULT_TABLE_SPACING),
                fill: BVec2::FALSE,
                margins: Margins::default(),
            },
        )
    }

    fn add(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(kind, Some(parent)));
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Detach a node and its subtree. The root cannot be removed.
    pub fn remove(&mut self, id: NodeId) {
        if id == self.root() || !self.contains(id) {
            return;
        }
        if let Some(parent) = self.nodes[id.0].parent {
            self.nodes[parent.0].children.retain(|&c| c != id);
        }
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            let node = &mut self.nodes[next.0];
            node.alive = false;
            node.parent = None;
            stack.extend(node.children.drain(..));
        }
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.get(id.0).is_some_and(|n| n.alive)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.0].kind
    }

    // ── Properties ──────────────────────────────────────────────────────

    pub fn position(&self, id: NodeId) -> Vec2 {
        self.nodes[id.0].position
    }

    pub fn set_position(&mut self, id: NodeId, position: Vec2) {
        self.nodes[id.0].position = position;
    }

    pub fn size(&self, id: NodeId) -> Vec2 {
        self.nodes[id.0].size
    }

    pub fn set_size(&mut self, id: NodeId, size: Vec2) {
        self.nodes[id.0].size = size;
    }

    pub fn rect(&self, id: NodeId) -> Rect {
        let node = &self.nodes[id.0];
        Rect::new(node.position, node.size)
    }

    /// Tint of an image or fill of a button. Ignored for other nodes.
    pub fn set_color(&mut self, id: NodeId, new_color: Color) {
        match &mut self.nodes[id.0].kind {
            NodeKind::Image { color, .. } | NodeKind::Button { color, .. } => *color = new_color,
            _ => {}
        }
    }

    pub fn set_sprite(&mut self, id: NodeId, new_sprite: Option<Sprite>) {
        if let NodeKind::Image { sprite, .. } = &mut self.nodes[id.0].kind {
            *sprite = new_sprite;
        }
    }

    /// Callback run when the button is clicked.
    pub fn on_click(&mut self, id: NodeId, callback: impl FnMut() + 'static) {
        if let NodeKind::Button { on_click, .. } = &mut self.nodes[id.0].kind {
            *on_click = Some(Box::new(callback));
        }
    }

    /// `true` if the button was clicked during the last [`update`](Self::update).
    pub fn clicked(&self, id: NodeId) -> bool {
        matches!(self.nodes[id.0].kind, NodeKind::Button { clicked: true, .. })
    }

    pub fn set_spacing(&mut self, id: NodeId, new_spacing: Vec2) {
        if let NodeKind::Table { spacing, .. } = &mut self.nodes[id.0].kind {
            *spacing = new_spacing;
        }
    }

    /// Stretch a table to its parent's width and/or height.
    pub fn set_fill(&mut self, id: NodeId, new_fill: BVec2) {
        if let NodeKind::Table { fill, .. } = &mut self.nodes[id.0].kind {
            *fill = new_fill;
        }
    }

    pub fn set_margins(&mut self, id: NodeId, new_margins: Margins) {
        if let NodeKind::Table { margins, .. } = &mut self.nodes[id.0].kind {
            *margins = new_margins;
        }
    }

    // ── Frame ───────────────────────────────────────────────────────────

    /// Run button logic and table layout, parents before children.
    ///
    /// `pointer` is the cursor in screen space (see
    /// [`Camera2d::viewport_to_screen`](crate::camera::Camera2d::viewport_to_screen)).
    pub fn update(&mut self, input: &InputState, pointer: Vec2) {
        self.update_node(self.root(), input, pointer);
    }

    fn update_node(&mut self, id: NodeId, input: &InputState, pointer: Vec2) {
        let rect = self.rect(id);
        let parent = self.nodes[id.0].parent;
        match &mut self.nodes[id.0].kind {
            NodeKind::Button {
                held,
                clicked,
                on_click,
                ..
            } => {
                *clicked = false;
                if *held && input.mouse_just_released(MouseButton::Left) {
                    *held = false;
                    *clicked = true;
                    if let Some(callback) = on_click {
                        callback();
                    }
                }
                if rect.contains(pointer) && input.mouse_just_pressed(MouseButton::Left) {
                    *held = true;
                }
            }
            NodeKind::Table {
                spacing,
                fill,
                margins,
            } => {
                let (spacing, fill, margins) = (*spacing, *fill, *margins);
                if let Some(parent) = parent {
                    self.fill_from_parent(id, parent, fill);
                }
                self.layout_table(id, spacing, margins);
            }
            NodeKind::Canvas | NodeKind::Image { .. } => {}
        }

        for i in 0..self.nodes[id.0].children.len() {
            let child = self.nodes[id.0].children[i];
            self.update_node(child, input, pointer);
        }
    }

    fn fill_from_parent(&mut self, id: NodeId, parent: NodeId, fill: BVec2) {
        let (parent_pos, parent_size) = (self.nodes[parent.0].position, self.nodes[parent.0].size);
        let node = &mut self.nodes[id.0];
        if fill.x {
            node.size.x = parent_size.x;
            node.position.x = parent_pos.x;
        }
        if fill.y {
            node.size.y = parent_size.y;
            node.position.y = parent_pos.y;
        }
    }

    fn layout_table(&mut self, id: NodeId, spacing: Vec2, margins: Margins) {
        let (position, size) = (self.nodes[id.0].position, self.nodes[id.0].size);
        let half = size * 0.5;
        let row_start = Vec2::new(-half.x + margins.left, half.y - margins.top);
        let mut cursor = row_start;
        let mut row_height = 0.0_f32;

        for i in 0..self.nodes[id.0].children.len() {
            let child = self.nodes[id.0].children[i];
            let child_size = self.nodes[child.0].size;

            // A cell wider than the whole row still gets a row of its own.
            let row_started = cursor.x > row_start.x;
            if row_started && cursor.x + child_size.x + half.x + margins.right > size.x {
                cursor.y -= row_height + spacing.y;
                cursor.x = row_start.x;
                row_height = 0.0;
            }

            let child_half = child_size * 0.5;
            self.nodes[child.0].position =
                position + cursor + Vec2::new(child_half.x, -child_half.y);

            row_height = row_height.max(child_size.y);
            cursor.x += child_size.x + spacing.x;
        }
    }

    /// Draw the tree. Expects the screen projection to be set on `draw`;
    /// the ambient color is restored afterwards.
    pub fn draw(&self, draw: &mut Draw) {
        let previous = draw.color();
        self.draw_node(self.root(), draw);
        draw.set_color(previous);
    }

    fn draw_node(&self, id: NodeId, draw: &mut Draw) {
        let node = &self.nodes[id.0];
        match &node.kind {
            NodeKind::Image { sprite, color } => {
                draw.set_color(*color);
                match sprite.filter(Sprite::is_valid) {
                    Some(sprite) => draw.sprite_with(sprite, node.position, node.size, 0.0),
                    None => draw.rect(node.position, node.size),
                }
            }
            NodeKind::Button { color, .. } => {
                draw.set_color(*color);
                draw.rect(node.position, node.size);
            }
            NodeKind::Canvas | NodeKind::Table { .. } => {}
        }
        for &child in &node.children {
            self.draw_node(child, draw);
        }
    }
}

impl Default for Ui {
    fn default() -> Self {
        Self::new(1280, 720)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::render2d::{PipelineKind, RecordingBackend, TextureHandle};

    fn click(ui: &mut Ui, pointer: Vec2) {
        let mut input = InputState::new();
        input.mouse.press(MouseButton::Left);
        ui.update(&input, pointer);
        input.clear_just();
        input.mouse.release(MouseButton::Left);
        ui.update(&input, pointer);
    }

    #[test]
    fn canvas_tracks_window() {
        let mut ui = Ui::new(800, 600);
        assert_eq!(ui.position(ui.root()), Vec2::new(400.0, 300.0));
        ui.resize(1024, 768);
        assert_eq!(ui.size(ui.root()), Vec2::new(1024.0, 768.0));
    }

    #[test]
    fn button_clicks_on_release_after_press_inside() {
        let mut ui = Ui::new(800, 600);
        let button = ui.button(ui.root());
        ui.set_position(button, Vec2::new(100.0, 100.0));
        let count = Rc::new(Cell::new(0));
        let seen = count.clone();
        ui.on_click(button, move || seen.set(seen.get() + 1));

        click(&mut ui, Vec2::new(110.0, 90.0));
        assert_eq!(count.get(), 1);
        assert!(ui.clicked(button));

        ui.update(&InputState::new(), Vec2::ZERO);
        assert!(!ui.clicked(button));
    }

    #[test]
    fn press_outside_does_not_click() {
        let mut ui = Ui::new(800, 600);
        let button = ui.button(ui.root());
        ui.set_position(button, Vec2::new(100.0, 100.0));
        click(&mut ui, Vec2::new(500.0, 500.0));
        assert!(!ui.clicked(button));
    }

    #[test]
    fn table_flows_and_wraps() {
        let mut ui = Ui::new(300, 300);
        let table = ui.table(ui.root());
        ui.set_fill(table, BVec2::TRUE);
        let cells: Vec<_> = (0..3).map(|_| ui.image(table, None)).collect();
        ui.update(&InputState::new(), Vec2::ZERO);

        // Table covers the canvas: top-left corner at (0, 300).
        assert_eq!(ui.position(cells[0]), Vec2::new(40.0, 260.0));
        assert_eq!(ui.position(cells[1]), Vec2::new(130.0, 260.0));
        assert_eq!(ui.position(cells[2]), Vec2::new(220.0, 260.0));

        // 3 * (80 + 10) = 270; another 80 would pass 300, so it wraps.
        let fourth = ui.image(table, None);
        ui.update(&InputState::new(), Vec2::ZERO);
        assert_eq!(ui.position(fourth), Vec2::new(40.0, 170.0));
    }

    #[test]
    fn rows_advance_by_their_own_height() {
        let mut ui = Ui::new(200, 400);
        let table = ui.table(ui.root());
        ui.set_fill(table, BVec2::TRUE);
        let tall = ui.image(table, None);
        ui.set_size(tall, Vec2::new(150.0, 120.0));
        let second_row = ui.image(table, None);
        let third_row = ui.image(table, None);
        ui.set_size(third_row, Vec2::new(150.0, 20.0));
        let fourth_row = ui.image(table, None);
        ui.update(&InputState::new(), Vec2::ZERO);

        assert_eq!(ui.position(tall), Vec2::new(75.0, 340.0));
        // Row 1 is 120 tall: next row top at 400 - 130 = 270.
        assert_eq!(ui.position(second_row), Vec2::new(40.0, 230.0));
        // Row 2 is 80 tall: top at 270 - 90 = 180.
        assert_eq!(ui.position(third_row), Vec2::new(75.0, 170.0));
        // Row 3 is only 20 tall: top at 180 - 30 = 150.
        assert_eq!(ui.position(fourth_row), Vec2::new(40.0, 110.0));
    }

    #[test]
    fn margins_offset_the_first_cell() {
        let mut ui = Ui::new(400, 400);
        let table = ui.table(ui.root());
        ui.set_fill(table, BVec2::TRUE);
        ui.set_margins(
            table,
            Margins {
                left: 20.0,
                top: 5.0,
                ..Margins::default()
            },
        );
        let cell = ui.image(table, None);
        ui.update(&InputState::new(), Vec2::ZERO);
        assert_eq!(ui.position(cell), Vec2::new(60.0, 355.0));
    }

    #[test]
    fn images_draw_sprite_or_fallback_rect() {
        let mut ui = Ui::new(800, 600);
        let texture = TextureHandle::new(1, 16, 16);
        ui.image(ui.root(), Some(Sprite::new(texture)));
        ui.image(ui.root(), None);

        let mut draw = Draw::new();
        ui.draw(&mut draw);
        let mut backend = RecordingBackend::new();
        draw.flush(&mut backend);

        let kinds: Vec<_> = backend.submissions().iter().map(|s| s.kind).collect();
        assert_eq!(kinds, vec![PipelineKind::Sprite, PipelineKind::Color]);
        assert_eq!(draw.color(), Color::WHITE);
        assert!(draw.sprite().is_none());
    }

    #[test]
    fn a_button_after_an_image_paints_on_top() {
        let mut ui = Ui::new(800, 600);
        let texture = TextureHandle::new(1, 16, 16);
        ui.image(ui.root(), None);
        ui.image(ui.root(), Some(Sprite::new(texture)));
        ui.button(ui.root());

        let mut draw = Draw::new();
        ui.draw(&mut draw);
        let mut backend = RecordingBackend::new();
        draw.flush(&mut backend);

        let kinds: Vec<_> = backend.submissions().iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![PipelineKind::Color, PipelineKind::Sprite, PipelineKind::Color]
        );
    }

    #[test]
    fn removed_nodes_stop_drawing() {
        let mut ui = Ui::new(800, 600);
        let table = ui.table(ui.root());
        let button = ui.button(table);
        ui.remove(table);
        assert!(!ui.contains(table));
        assert!(!ui.contains(button));
        assert!(ui.children(ui.root()).is_empty());
    }
}
