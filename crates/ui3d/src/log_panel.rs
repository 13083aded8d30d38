//! Event log panel - a bounded message queue shown as 3D text lines

use crate::components::{Panel3D, Text3D};
use crate::render::{FontAtlas, TextMesh};
use glam::Vec3;
use raypanel_core::{Color, LogSink, NodeId, SceneGraph, Transform};
use std::collections::VecDeque;
use tracing::debug;

/// Messages kept by default
pub const DEFAULT_MAX_LOGS: usize = 5;

/// Placement of text lines inside the panel
#[derive(Debug, Clone, Copy, PartialEq)]
struct LogLayout {
    /// Left edge of every line
    left: f32,
    /// Baseline of the first line
    top: f32,
    /// Vertical distance between lines
    line_spacing: f32,
    /// Glyph size in world units
    font_size: f32,
    /// Text color
    color: Color,
}

impl Default for LogLayout {
    fn default() -> Self {
        Self {
            left: -0.55,
            top: 0.15,
            line_spacing: 0.08,
            font_size: 0.04,
            color: [1.0, 1.0, 1.0, 1.0],
        }
    }
}

/// One renderable line
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    /// Placed text, relative to the panel node
    pub text: Text3D,
    /// Glyph quads for `text`
    pub mesh: TextMesh,
}

/// FIFO of recent messages plus their renderable lines
#[derive(Debug)]
pub struct EventLog {
    messages: VecDeque<String>,
    max_logs: usize,
    layout: LogLayout,
    background: Panel3D,
    font: Option<FontAtlas>,
    lines: Vec<TextLine>,
    node: Option<NodeId>,
    rebuilds: u64,
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_LOGS)
    }
}

impl EventLog {
    /// Empty log holding at most `max_logs` messages (minimum one)
    pub fn new(max_logs: usize) -> Self {
        let max_logs = max_logs.max(1);
        Self {
            messages: VecDeque::with_capacity(max_logs + 1),
            max_logs,
            layout: LogLayout::default(),
            background: Panel3D::new(Vec3::ZERO, 1.2, 0.4),
            font: None,
            lines: Vec::new(),
            node: None,
            rebuilds: 0,
        }
    }

    /// Place the panel in the scene: a group node with the background quad
    /// as its child. Text lines are expressed relative to the group.
    pub fn spawn(&mut self, scene: &mut SceneGraph, parent: NodeId, position: Vec3) -> NodeId {
        let node = scene.spawn(parent, "log_panel", Transform::new(position));
        self.background.spawn(scene, node, "log_background");
        self.node = Some(node);
        node
    }

    /// Push a message, evicting the oldest beyond capacity, then rebuild.
    pub fn append(&mut self, message: impl Into<String>) {
        self.push(message.into());
    }

    fn push(&mut self, message: String) {
        debug!(%message, "log panel message");
        self.messages.push_back(message);
        while self.messages.len() > self.max_logs {
            self.messages.pop_front();
        }
        self.rebuild();
    }

    /// Provide the glyph set; lines are rebuilt immediately.
    pub fn set_font(&mut self, font: FontAtlas) {
        self.font = Some(font);
        self.rebuild();
    }

    /// Whether the glyph set has arrived
    pub fn is_ready(&self) -> bool {
        self.font.is_some()
    }

    /// Rasterization size of the current glyph set
    pub fn font_size(&self) -> Option<f32> {
        self.font.as_ref().map(|font| font.font_size)
    }

    /// Rebuild one line per message. No-op until a font is available.
    ///
    /// Returns whether lines were built.
    pub fn rebuild(&mut self) -> bool {
        let Some(font) = self.font.as_ref() else {
            return false;
        };

        let layout = self.layout;
        self.lines = self
            .messages
            .iter()
            .enumerate()
            .map(|(i, message)| {
                let y = layout.top - i as f32 * layout.line_spacing;
                let text = Text3D::new(Vec3::new(layout.left, y, 0.0), message.as_str())
                    .with_font_size(layout.font_size)
                    .with_color(layout.color);
                let mesh = TextMesh::build(font, &text);
                TextLine { text, mesh }
            })
            .collect();
        self.rebuilds += 1;
        true
    }

    /// Queued messages, oldest first
    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.messages.iter().map(String::as_str)
    }

    /// Renderable lines from the last rebuild
    pub fn lines(&self) -> &[TextLine] {
        &self.lines
    }

    /// Number of queued messages
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether no messages are queued
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Capacity
    pub fn max_logs(&self) -> usize {
        self.max_logs
    }

    /// Scene node hosting the panel, once spawned
    pub fn node(&self) -> Option<NodeId> {
        self.node
    }

    /// How many times lines have been rebuilt
    pub fn rebuild_count(&self) -> u64 {
        self.rebuilds
    }
}

impl LogSink for EventLog {
    fn append(&mut self, message: String) {
        self.push(message);
    }
}
