//! Corner collection — functional core of region selection.
//!
//! Consumes an ordered stream of pointer events and produces a normalized
//! rectangle. Where the events come from is the listener's business.

use crate::capture::{Point, Rectangle, RegionError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Left,
    Right,
    Middle,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEvent {
    Press { button: PointerButton, at: Point },
    Release { button: PointerButton, at: Point },
}

/// Waits for two left-button presses and returns them in click order.
///
/// Every other event is ignored. `on_click` sees each accepted corner as
/// it arrives (1-based index). If the stream ends first, selection is
/// aborted.
pub fn collect_corners<I, F>(events: I, mut on_click: F) -> Result<(Point, Point), SelectionError>
where
    I: IntoIterator<Item = PointerEvent>,
    F: FnMut(usize, Point),
{
    let mut first: Option<Point> = None;

    for event in events {
        let PointerEvent::Press {
            button: PointerButton::Left,
            at,
        } = event
        else {
            continue;
        };

        match first {
            None => {
                on_click(1, at);
                first = Some(at);
            }
            Some(a) => {
                on_click(2, at);
                return Ok((a, at));
            }
        }
    }

    Err(SelectionError::SelectionAborted {
        collected: usize::from(first.is_some()),
    })
}

/// Collects two corners and turns them into a validated rectangle.
pub fn select_region<I, F>(events: I, on_click: F) -> Result<Rectangle, SelectionError>
where
    I: IntoIterator<Item = PointerEvent>,
    F: FnMut(usize, Point),
{
    let (a, b) = collect_corners(events, on_click)?;
    Ok(Rectangle::from_corners(a, b).validated()?)
}

#[derive(Debug, thiserror::Error)]
pub enum SelectionError {
    #[error("Region selection aborted after {collected} of 2 clicks")]
    SelectionAborted { collected: usize },

    #[error(transparent)]
    InvalidRegion(#[from] RegionError),

    #[error("Pointer listener could not start: {0}")]
    Listener(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(button: PointerButton, x: i32, y: i32) -> PointerEvent {
        PointerEvent::Press {
            button,
            at: Point::new(x, y),
        }
    }

    fn release(x: i32, y: i32) -> PointerEvent {
        PointerEvent::Release {
            button: PointerButton::Left,
            at: Point::new(x, y),
        }
    }

    #[test]
    fn two_left_presses_make_a_rectangle() {
        let events = vec![press(PointerButton::Left, 300, 400), press(PointerButton::Left, 100, 50)];
        let rect = select_region(events, |_, _| {}).unwrap();
        assert_eq!(rect, Rectangle::new(100, 50, 300, 400));
    }

    #[test]
    fn other_buttons_and_releases_are_ignored() {
        let events = vec![
            press(PointerButton::Right, 1, 1),
            press(PointerButton::Left, 10, 10),
            release(10, 10),
            press(PointerButton::Middle, 2, 2),
            press(PointerButton::Other, 3, 3),
            press(PointerButton::Left, 60, 90),
            press(PointerButton::Left, 999, 999),
        ];
        let mut seen = Vec::new();
        let corners = collect_corners(events, |n, p| seen.push((n, p))).unwrap();
        assert_eq!(corners, (Point::new(10, 10), Point::new(60, 90)));
        assert_eq!(seen, vec![(1, Point::new(10, 10)), (2, Point::new(60, 90))]);
    }

    #[test]
    fn stream_ending_early_aborts() {
        let result = collect_corners(vec![press(PointerButton::Left, 5, 5)], |_, _| {});
        assert!(matches!(
            result,
            Err(SelectionError::SelectionAborted { collected: 1 })
        ));

        let result = collect_corners(Vec::new(), |_, _| {});
        assert!(matches!(
            result,
            Err(SelectionError::SelectionAborted { collected: 0 })
        ));
    }

    #[test]
    fn same_column_clicks_are_invalid() {
        let events = vec![press(PointerButton::Left, 40, 10), press(PointerButton::Left, 40, 90)];
        let result = select_region(events, |_, _| {});
        assert!(matches!(result, Err(SelectionError::InvalidRegion(_))));
    }
}
