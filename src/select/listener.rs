//! Global pointer listener using the `rdev` crate.
//!
//! `rdev::listen` blocks its thread forever, so it runs on a dedicated
//! thread and forwards translated events over a channel. The receiving
//! side is a plain iterator: it ends when the listener thread dies.
//!
//! macOS: the terminal needs Accessibility permission, otherwise the
//! listener fails immediately and selection is aborted.

use super::selector::{PointerButton, PointerEvent, SelectionError};
use crate::capture::Point;
use std::sync::mpsc::{self, Receiver};

/// One-shot rendezvous between the listener thread and the selection call.
///
/// Dropping it detaches the listener; its remaining events go nowhere.
pub struct PointerEvents {
    receiver: Receiver<PointerEvent>,
}

impl PointerEvents {
    pub fn listen() -> Result<Self, SelectionError> {
        let (sender, receiver) = mpsc::channel();

        std::thread::Builder::new()
            .name("pointer-listener".into())
            .spawn(move || {
                let mut position = Point::new(0, 0);
                let result = rdev::listen(move |event| {
                    if let Some(pointer) = translate(&event.event_type, &mut position) {
                        // Receiver gone means selection is over.
                        let _ = sender.send(pointer);
                    }
                });
                if let Err(e) = result {
                    log::error!("[SELECT] Pointer listener stopped: {:?}", e);
                }
            })
            .map_err(|e| SelectionError::Listener(e.to_string()))?;

        Ok(Self { receiver })
    }
}

impl Iterator for PointerEvents {
    type Item = PointerEvent;

    fn next(&mut self) -> Option<PointerEvent> {
        self.receiver.recv().ok()
    }
}

/// Button events carry no coordinates in `rdev`; presses and releases are
/// stamped with the last position seen in a move event.
fn translate(event: &rdev::EventType, position: &mut Point) -> Option<PointerEvent> {
    match event {
        rdev::EventType::MouseMove { x, y } => {
            *position = Point::new(x.round() as i32, y.round() as i32);
            None
        }
        rdev::EventType::ButtonPress(button) => Some(PointerEvent::Press {
            button: map_button(button),
            at: *position,
        }),
        rdev::EventType::ButtonRelease(button) => Some(PointerEvent::Release {
            button: map_button(button),
            at: *position,
        }),
        _ => None,
    }
}

fn map_button(button: &rdev::Button) -> PointerButton {
    match button {
        rdev::Button::Left => PointerButton::Left,
        rdev::Button::Right => PointerButton::Right,
        rdev::Button::Middle => PointerButton::Middle,
        _ => PointerButton::Other,
    }
}
