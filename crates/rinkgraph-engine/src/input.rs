use crossbeam_channel::{Receiver, Sender, TryIter};
use glam::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchPoint {
    pub id: u64,
    pub pos: Vec2,
}

/// Raw input as produced by the host's event handlers. Handlers only enqueue
/// these; the frame loop applies them to the camera.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    PointerDown { pos: Vec2, button: PointerButton },
    PointerMove { pos: Vec2 },
    PointerUp { pos: Vec2, button: PointerButton },
    PointerLeave,
    Wheel { delta_y: f32 },
    TouchStart { touches: Vec<TouchPoint> },
    TouchMove { touches: Vec<TouchPoint> },
    TouchEnd { touches: Vec<TouchPoint> },
    Resize { width: f32, height: f32 },
}

/// Cloneable producer side of an engine's input queue. Sending fails once the
/// engine has been disposed.
#[derive(Debug, Clone)]
pub struct InputSender {
    tx: Sender<InputEvent>,
}

impl InputSender {
    /// Returns `false` when the engine is gone.
    pub fn send(&self, ev: InputEvent) -> bool {
        self.tx.send(ev).is_ok()
    }

    pub fn pointer_down(&self, x: f32, y: f32, button: PointerButton) -> bool {
        self.send(InputEvent::PointerDown {
            pos: Vec2::new(x, y),
            button,
        })
    }

    pub fn pointer_move(&self, x: f32, y: f32) -> bool {
        self.send(InputEvent::PointerMove { pos: Vec2::new(x, y) })
    }

    pub fn pointer_up(&self, x: f32, y: f32, button: PointerButton) -> bool {
        self.send(InputEvent::PointerUp {
            pos: Vec2::new(x, y),
            button,
        })
    }

    pub fn pointer_leave(&self) -> bool {
        self.send(InputEvent::PointerLeave)
    }

    pub fn wheel(&self, delta_y: f32) -> bool {
        self.send(InputEvent::Wheel { delta_y })
    }

    pub fn touch_start(&self, touches: &[TouchPoint]) -> bool {
        self.send(InputEvent::TouchStart {
            touches: touches.to_vec(),
        })
    }

    pub fn touch_move(&self, touches: &[TouchPoint]) -> bool {
        self.send(InputEvent::TouchMove {
            touches: touches.to_vec(),
        })
    }

    pub fn touch_end(&self, touches: &[TouchPoint]) -> bool {
        self.send(InputEvent::TouchEnd {
            touches: touches.to_vec(),
        })
    }

    pub fn resize(&self, width: f32, height: f32) -> bool {
        self.send(InputEvent::Resize { width, height })
    }
}

#[derive(Debug)]
pub(crate) struct InputQueue {
    tx: Sender<InputEvent>,
    rx: Option<Receiver<InputEvent>>,
}

impl InputQueue {
    pub(crate) fn new() -> Self {
        let (tx, rx) = crossbeam_channel::unbounded();
        Self { tx, rx: Some(rx) }
    }

    pub(crate) fn sender(&self) -> InputSender {
        InputSender {
            tx: self.tx.clone(),
        }
    }

    pub(crate) fn push(&self, ev: InputEvent) {
        if self.rx.is_some() {
            let _ = self.tx.send(ev);
        }
    }

    pub(crate) fn drain(&self) -> Option<TryIter<'_, InputEvent>> {
        self.rx.as_ref().map(|rx| rx.try_iter())
    }

    /// Detaches every producer: pending events are dropped and later sends
    /// fail.
    pub(crate) fn close(&mut self) {
        self.rx = None;
    }
}
