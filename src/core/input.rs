//! Input capabilities injected into the interaction core.
//!
//! The web front-end feeds these from window listeners; tests build them
//! directly, so nothing here touches a real display.

use glam::{Vec2, Vec3};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub alt: bool,
    pub ctrl: bool,
}

impl Modifiers {
    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        alt: false,
        ctrl: false,
    };

    pub fn union(self, other: Modifiers) -> Modifiers {
        Modifiers {
            shift: self.shift || other.shift,
            alt: self.alt || other.alt,
            ctrl: self.ctrl || other.ctrl,
        }
    }
}

/// Backing-store size of the drawing surface, in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Pixel position to normalized device coordinates (y up).
    pub fn to_ndc(&self, px: Vec2) -> Vec2 {
        Vec2::new(
            2.0 * px.x / self.width as f32 - 1.0,
            1.0 - 2.0 * px.y / self.height as f32,
        )
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

pub trait InputSource {
    /// Modifier keys currently held, as tracked outside pointer events.
    fn modifiers(&self) -> Modifiers;
    fn viewport(&self) -> Viewport;
}

/// Key state maintained from keydown/keyup.
#[derive(Clone, Copy, Debug, Default)]
pub struct KeyState {
    pub held: Modifiers,
    pub viewport: Viewport,
}

impl KeyState {
    /// Returns true if `key` is a tracked modifier.
    pub fn key_changed(&mut self, key: &str, down: bool) -> bool {
        match key {
            "Shift" => self.held.shift = down,
            "Alt" => self.held.alt = down,
            "Control" => self.held.ctrl = down,
            _ => return false,
        }
        true
    }

    /// Focus loss swallows keyups, so forget everything.
    pub fn release_all(&mut self) {
        self.held = Modifiers::default();
    }
}

impl InputSource for KeyState {
    fn modifiers(&self) -> Modifiers {
        self.held
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerKind {
    Move,
    Down,
    Up,
}

/// A pointer event already resolved against the scene.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerSample {
    pub kind: PointerKind,
    pub modifiers: Modifiers,
    /// Where the pointer ray meets foam, if it does.
    pub world_point: Option<Vec3>,
}

impl PointerSample {
    pub fn new(kind: PointerKind, modifiers: Modifiers, world_point: Option<Vec3>) -> Self {
        Self {
            kind,
            modifiers,
            world_point,
        }
    }
}

#[derive(Default, Clone, Copy, Debug)]
pub struct DragState {
    pub active: bool,
    pub last: Vec2,
}

/// Keyboard shortcuts shared by the viewer and the visualizer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    ToggleWipeMode,
    ApplyFoam,
    ClearFoam,
    ZoomIn,
    ZoomOut,
    RadiusDown,
    RadiusUp,
    TogglePlayback,
    ToggleHelp,
}

#[inline]
pub fn action_for_key(key: &str) -> Option<KeyAction> {
    match key {
        "m" | "M" => Some(KeyAction::ToggleWipeMode),
        "f" | "F" => Some(KeyAction::ApplyFoam),
        "c" | "C" => Some(KeyAction::ClearFoam),
        "+" | "=" => Some(KeyAction::ZoomIn),
        "-" | "_" => Some(KeyAction::ZoomOut),
        "[" => Some(KeyAction::RadiusDown),
        "]" => Some(KeyAction::RadiusUp),
        " " => Some(KeyAction::TogglePlayback),
        "h" | "H" => Some(KeyAction::ToggleHelp),
        _ => None,
    }
}
