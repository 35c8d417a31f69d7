use bevy::input::mouse::{MouseButtonInput, MouseWheel};
use bevy::input::touch::{TouchInput, TouchPhase};
use bevy::input::ButtonState;
use bevy::prelude::*;
use bevy::window::{CursorLeft, CursorMoved, WindowResized};
use bevy_egui::EguiContexts;
use rinkgraph_engine::{PointerButton, TouchPoint};
use std::collections::BTreeMap;

use crate::app::resources::EngineRes;

#[derive(Default)]
pub struct PointerTracker {
    cursor: Option<Vec2>,
    touches: BTreeMap<u64, Vec2>,
}

impl PointerTracker {
    fn touch_points(&self) -> Vec<TouchPoint> {
        self.touches
            .iter()
            .map(|(id, pos)| TouchPoint { id: *id, pos: *pos })
            .collect()
    }
}

fn map_button(button: MouseButton) -> Option<PointerButton> {
    match button {
        MouseButton::Left => Some(PointerButton::Primary),
        MouseButton::Right => Some(PointerButton::Secondary),
        MouseButton::Middle => Some(PointerButton::Middle),
        _ => None,
    }
}

pub fn sync_viewport(windows: Query<&Window>, engine: Res<EngineRes>) {
    let Ok(window) = windows.get_single() else {
        return;
    };
    engine.0.resize(window.width(), window.height());
}

/// Forwards window input to the engine queue. Presses and wheel over egui
/// widgets stay with egui.
#[allow(clippy::too_many_arguments)]
pub fn forward_input(
    mut contexts: EguiContexts,
    engine: Res<EngineRes>,
    mut moved: EventReader<CursorMoved>,
    mut left: EventReader<CursorLeft>,
    mut buttons: EventReader<MouseButtonInput>,
    mut wheel: EventReader<MouseWheel>,
    mut touches: EventReader<TouchInput>,
    mut resized: EventReader<WindowResized>,
    mut tracker: Local<PointerTracker>,
) {
    let engine = &engine.0;
    let ctx = contexts.ctx_mut();
    let egui_owns = ctx.wants_pointer_input() || ctx.is_pointer_over_area();

    for ev in resized.read() {
        engine.resize(ev.width, ev.height);
    }

    for ev in moved.read() {
        tracker.cursor = Some(ev.position);
        engine.on_pointer_move(ev.position.x, ev.position.y);
    }

    if left.read().count() > 0 {
        tracker.cursor = None;
        engine.on_pointer_leave();
    }

    for ev in buttons.read() {
        let (Some(button), Some(pos)) = (map_button(ev.button), tracker.cursor) else {
            continue;
        };
        match ev.state {
            ButtonState::Pressed if !egui_owns => engine.on_pointer_down(pos.x, pos.y, button),
            ButtonState::Pressed => {}
            ButtonState::Released => engine.on_pointer_up(pos.x, pos.y, button),
        }
    }

    for ev in wheel.read() {
        if !egui_owns {
            // bevy reports scroll-up as positive; the engine zooms out on positive
            engine.on_wheel(-ev.y);
        }
    }

    for ev in touches.read() {
        match ev.phase {
            TouchPhase::Started => {
                tracker.touches.insert(ev.id, ev.position);
                engine.on_touch_start(&tracker.touch_points());
            }
            TouchPhase::Moved => {
                tracker.touches.insert(ev.id, ev.position);
                engine.on_touch_move(&tracker.touch_points());
            }
            TouchPhase::Ended | TouchPhase::Canceled => {
                tracker.touches.remove(&ev.id);
                engine.on_touch_end(&tracker.touch_points());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_mouse_buttons() {
        assert_eq!(map_button(MouseButton::Left), Some(PointerButton::Primary));
        assert_eq!(map_button(MouseButton::Right), Some(PointerButton::Secondary));
        assert_eq!(map_button(MouseButton::Back), None);
    }

    #[test]
    fn touch_points_are_ordered_by_id() {
        let mut tracker = PointerTracker::default();
        tracker.touches.insert(7, Vec2::new(1.0, 1.0));
        tracker.touches.insert(2, Vec2::new(5.0, 5.0));
        let ids: Vec<u64> = tracker.touch_points().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![2, 7]);
    }
}
