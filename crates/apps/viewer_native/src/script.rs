//! Scripted input session replayed by the headless viewer.
//!
//! The session is a pure function of the frame index, so two runs with the
//! same arguments produce the same summary.
use canvas::input::{InputEvent, TouchPoint};

pub const VIEWPORT: (f64, f64) = (1280.0, 720.0);

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Modality {
    Pointer,
    Touch,
}

#[derive(Debug, Copy, Clone)]
pub struct Script {
    modality: Modality,
}

impl Script {
    pub fn new(modality: Modality) -> Self {
        Self { modality }
    }

    pub fn events_for(&self, frame: u64) -> Vec<InputEvent> {
        let (w, h) = VIEWPORT;
        let mut out = Vec::new();
        if frame == 0 {
            out.push(InputEvent::Resize {
                width: w,
                height: h,
            });
        }

        match self.modality {
            Modality::Pointer => pointer_session(frame, &mut out),
            Modality::Touch => touch_session(frame, &mut out),
        }

        match frame {
            200 => out.push(key_down("w")),
            260 => out.push(key_up("w")),
            300 => out.push(key_down("d")),
            330 => out.push(key_up("d")),
            340 => out.push(key_down("e")),
            350 => out.push(key_up("e")),
            400 => out.push(InputEvent::ContextLost),
            401 => out.push(InputEvent::ContextRestored),
            _ => {}
        }
        out
    }
}

fn pointer_session(frame: u64, out: &mut Vec<InputEvent>) {
    let (w, h) = VIEWPORT;
    match frame {
        // Hover towards the upper right: drift only.
        10..=59 => out.push(InputEvent::PointerMove {
            x: w * 0.5 + (frame - 10) as f64 * 4.0,
            y: h * 0.5 - (frame - 10) as f64 * 2.0,
        }),
        60 => out.push(InputEvent::PointerDown { x: 640.0, y: 360.0 }),
        61..=89 => out.push(InputEvent::PointerMove {
            x: 640.0 + (frame - 60) as f64 * 6.0,
            y: 360.0 + (frame - 60) as f64 * 2.0,
        }),
        90 => out.push(InputEvent::PointerUp),
        // Scroll forward into the scene.
        120..=150 => out.push(InputEvent::Wheel { delta_y: -60.0 }),
        500 => out.push(InputEvent::PointerLeave),
        _ => {}
    }
}

fn touch_session(frame: u64, out: &mut Vec<InputEvent>) {
    let one = |x: f64, y: f64| vec![TouchPoint::new(x, y)];
    let two = |spread: f64| {
        vec![
            TouchPoint::new(640.0 - spread, 360.0),
            TouchPoint::new(640.0 + spread, 360.0),
        ]
    };
    match frame {
        60 => out.push(InputEvent::TouchStart {
            touches: one(640.0, 360.0),
        }),
        61..=89 => out.push(InputEvent::TouchMove {
            touches: one(640.0 + (frame - 60) as f64 * 6.0, 360.0),
        }),
        90 => out.push(InputEvent::TouchEnd { touches: vec![] }),
        // Pinch out: spreading fingers moves forward.
        120 => out.push(InputEvent::TouchStart { touches: two(50.0) }),
        121..=150 => out.push(InputEvent::TouchMove {
            touches: two(50.0 + (frame - 120) as f64 * 8.0),
        }),
        151 => out.push(InputEvent::TouchEnd { touches: vec![] }),
        _ => {}
    }
}

fn key_down(key: &str) -> InputEvent {
    InputEvent::KeyDown {
        key: key.to_string(),
    }
}

fn key_up(key: &str) -> InputEvent {
    InputEvent::KeyUp {
        key: key.to_string(),
    }
}
