//! Shared window-manager transition helpers used by the desktop reducer.

use crate::model::{
    DesktopState, ResizeEdge, Viewport, WindowId, WindowRect, MIN_OPEN_TOP_OFFSET, TOP_BAR_HEIGHT,
};

/// Minimum allowed managed window width.
pub const MIN_WINDOW_WIDTH: i32 = 220;
/// Minimum allowed managed window height.
pub const MIN_WINDOW_HEIGHT: i32 = 140;
/// Gap kept between a maximized window and the viewport sides.
pub const MAXIMIZED_MARGIN: i32 = 10;
/// Vertical space kept free for the menu bar and dock while maximized.
pub const MAXIMIZED_VERTICAL_RESERVE: i32 = 120;

/// Centers a window of `w` x `h` in `viewport`, nudged upward and clamped to the open offset.
pub fn centered_rect(w: i32, h: i32, viewport: Viewport) -> WindowRect {
    WindowRect {
        x: (viewport.w - w) / 2,
        y: ((viewport.h - h) / 2 - 30).max(MIN_OPEN_TOP_OFFSET),
        w,
        h,
    }
}

/// Rect a maximized window occupies inside `viewport`.
pub fn maximized_rect(viewport: Viewport) -> WindowRect {
    WindowRect {
        x: MAXIMIZED_MARGIN,
        y: TOP_BAR_HEIGHT + MAXIMIZED_MARGIN,
        w: viewport.w - MAXIMIZED_MARGIN * 2,
        h: viewport.h - MAXIMIZED_VERTICAL_RESERVE,
    }
    .clamped_min(MIN_WINDOW_WIDTH, MIN_WINDOW_HEIGHT)
}

/// Hands out the next z-index from the desktop counter.
pub fn next_z_index(state: &mut DesktopState) -> u32 {
    let z = state.next_z_index;
    state.next_z_index = state.next_z_index.saturating_add(1);
    z
}

/// Raises `window_id` above every other window, makes it active and un-minimizes it.
///
/// Returns `false` when the window does not exist; the state is left untouched in that case.
pub fn focus_window_internal(state: &mut DesktopState, window_id: WindowId) -> bool {
    if !state.windows.iter().any(|w| w.id == window_id) {
        return false;
    }
    let z = next_z_index(state);
    if let Some(window) = state.windows.iter_mut().find(|w| w.id == window_id) {
        window.z_index = z;
        window.minimized = false;
    }
    state.active_window = Some(window_id);
    true
}

/// Applies resize deltas for a given edge/corner drag.
pub fn resize_rect(start: WindowRect, edge: ResizeEdge, dx: i32, dy: i32) -> WindowRect {
    match edge {
        ResizeEdge::East => WindowRect {
            w: start.w + dx,
            ..start
        },
        ResizeEdge::West => WindowRect {
            x: start.x + dx,
            w: start.w - dx,
            ..start
        },
        ResizeEdge::South => WindowRect {
            h: start.h + dy,
            ..start
        },
        ResizeEdge::North => WindowRect {
            y: start.y + dy,
            h: start.h - dy,
            ..start
        },
        ResizeEdge::NorthEast => WindowRect {
            y: start.y + dy,
            h: start.h - dy,
            w: start.w + dx,
            ..start
        },
        ResizeEdge::NorthWest => WindowRect {
            x: start.x + dx,
            y: start.y + dy,
            w: start.w - dx,
            h: start.h - dy,
        },
        ResizeEdge::SouthEast => WindowRect {
            w: start.w + dx,
            h: start.h + dy,
            ..start
        },
        ResizeEdge::SouthWest => WindowRect {
            x: start.x + dx,
            w: start.w - dx,
            h: start.h + dy,
            ..start
        },
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn centered_rect_respects_minimum_top_offset() {
        let viewport = Viewport { w: 1200, h: 800 };
        assert_eq!(
            centered_rect(800, 500, viewport),
            WindowRect {
                x: 200,
                y: 120,
                w: 800,
                h: 500
            }
        );

        let short = Viewport { w: 1000, h: 600 };
        assert_eq!(centered_rect(360, 600, short).y, MIN_OPEN_TOP_OFFSET);
    }

    #[test]
    fn maximized_rect_leaves_room_for_bars() {
        let rect = maximized_rect(Viewport { w: 1440, h: 900 });
        assert_eq!(
            rect,
            WindowRect {
                x: 10,
                y: 34,
                w: 1420,
                h: 780
            }
        );
    }

    #[test]
    fn north_west_resize_moves_origin() {
        let start = WindowRect {
            x: 100,
            y: 100,
            w: 400,
            h: 300,
        };
        assert_eq!(
            resize_rect(start, ResizeEdge::NorthWest, -20, -10),
            WindowRect {
                x: 80,
                y: 90,
                w: 420,
                h: 310
            }
        );
    }
}
