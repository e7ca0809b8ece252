//! Host input events, key bindings, and the listener registry.
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// One active touch contact, in client pixels.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct TouchPoint {
    pub x: f64,
    pub y: f64,
}

impl TouchPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Distance between the first two touches, or 0 with fewer than two.
pub fn touch_distance(touches: &[TouchPoint]) -> f64 {
    match touches {
        [a, b, ..] => (a.x - b.x).hypot(a.y - b.y),
        _ => 0.0,
    }
}

/// Events forwarded by the host. Coordinates are client pixels.
///
/// Touch events carry the touches still active after the event, like the
/// platform's `touches` list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    PointerDown { x: f64, y: f64 },
    PointerUp,
    PointerMove { x: f64, y: f64 },
    PointerLeave,
    Wheel { delta_y: f64 },
    TouchStart { touches: Vec<TouchPoint> },
    TouchMove { touches: Vec<TouchPoint> },
    TouchEnd { touches: Vec<TouchPoint> },
    KeyDown { key: String },
    KeyUp { key: String },
    Resize { width: f64, height: f64 },
    ContextLost,
    ContextRestored,
}

impl InputEvent {
    /// The listener that must be attached for this event to be delivered.
    pub fn listener(&self) -> Listener {
        match self {
            InputEvent::PointerDown { .. } => Listener::PointerDown,
            InputEvent::PointerUp => Listener::PointerUp,
            InputEvent::PointerMove { .. } => Listener::PointerMove,
            InputEvent::PointerLeave => Listener::PointerLeave,
            InputEvent::Wheel { .. } => Listener::Wheel,
            InputEvent::TouchStart { .. } => Listener::TouchStart,
            InputEvent::TouchMove { .. } => Listener::TouchMove,
            InputEvent::TouchEnd { .. } => Listener::TouchEnd,
            InputEvent::KeyDown { .. } => Listener::KeyDown,
            InputEvent::KeyUp { .. } => Listener::KeyUp,
            InputEvent::Resize { .. } => Listener::Resize,
            InputEvent::ContextLost => Listener::ContextLost,
            InputEvent::ContextRestored => Listener::ContextRestored,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum ListenerTarget {
    /// The rendering surface itself.
    Surface,
    /// The host window; these outlive the surface and are the ones that leak.
    Window,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Listener {
    PointerDown,
    PointerUp,
    PointerMove,
    PointerLeave,
    Wheel,
    TouchStart,
    TouchMove,
    TouchEnd,
    KeyDown,
    KeyUp,
    Resize,
    ContextLost,
    ContextRestored,
}

impl Listener {
    pub const ALL: [Listener; 13] = [
        Listener::PointerDown,
        Listener::PointerUp,
        Listener::PointerMove,
        Listener::PointerLeave,
        Listener::Wheel,
        Listener::TouchStart,
        Listener::TouchMove,
        Listener::TouchEnd,
        Listener::KeyDown,
        Listener::KeyUp,
        Listener::Resize,
        Listener::ContextLost,
        Listener::ContextRestored,
    ];

    pub fn target(self) -> ListenerTarget {
        match self {
            Listener::PointerUp
            | Listener::PointerMove
            | Listener::KeyDown
            | Listener::KeyUp
            | Listener::Resize => ListenerTarget::Window,
            _ => ListenerTarget::Surface,
        }
    }
}

/// Tracks which listeners the canvas currently holds.
///
/// Events whose listener is not attached are ignored, so a detached canvas
/// cannot be driven by stray host events.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Listeners {
    attached: BTreeSet<Listener>,
}

impl Listeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach_all(&mut self) {
        self.attached.extend(Listener::ALL);
    }

    /// Removes every listener, returning how many were attached.
    pub fn detach_all(&mut self) -> usize {
        let n = self.attached.len();
        self.attached.clear();
        n
    }

    pub fn is_attached(&self, listener: Listener) -> bool {
        self.attached.contains(&listener)
    }

    pub fn accepts(&self, event: &InputEvent) -> bool {
        self.is_attached(event.listener())
    }

    pub fn len(&self) -> usize {
        self.attached.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attached.is_empty()
    }

    pub fn on(&self, target: ListenerTarget) -> usize {
        self.attached.iter().filter(|l| l.target() == target).count()
    }
}

/// Continuous movement actions driven by held keys.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Action {
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBindings {
    bindings: Vec<(Action, Vec<String>)>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        let keys = |ks: &[&str]| ks.iter().map(|k| k.to_string()).collect::<Vec<_>>();
        Self {
            bindings: vec![
                (Action::Forward, keys(&["w", "W", "ArrowUp"])),
                (Action::Backward, keys(&["s", "S", "ArrowDown"])),
                (Action::Left, keys(&["a", "A", "ArrowLeft"])),
                (Action::Right, keys(&["d", "D", "ArrowRight"])),
                (Action::Up, keys(&["e", "E"])),
                (Action::Down, keys(&["q", "Q"])),
            ],
        }
    }
}

impl KeyBindings {
    /// Replaces the keys bound to `action`.
    pub fn bind(&mut self, action: Action, keys: &[&str]) {
        let keys: Vec<String> = keys.iter().map(|k| k.to_string()).collect();
        match self.bindings.iter_mut().find(|(a, _)| *a == action) {
            Some((_, bound)) => *bound = keys,
            None => self.bindings.push((action, keys)),
        }
    }

    pub fn action(&self, key: &str) -> Option<Action> {
        self.bindings
            .iter()
            .find(|(_, keys)| keys.iter().any(|k| k == key))
            .map(|(action, _)| *action)
    }
}

/// Keys currently held down, resolved to actions on demand.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct HeldKeys {
    keys: BTreeSet<String>,
}

impl HeldKeys {
    pub fn press(&mut self, key: &str) {
        self.keys.insert(key.to_string());
    }

    pub fn release(&mut self, key: &str) {
        self.keys.remove(key);
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }

    pub fn actions(&self, bindings: &KeyBindings) -> BTreeSet<Action> {
        self.keys.iter().filter_map(|k| bindings.action(k)).collect()
    }
}
