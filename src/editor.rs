//! Pointer-driven move/resize state machine for the active box set.
//!
//! The editor operates purely in natural-pixel space; callers convert
//! screen pointer positions through
//! [`ViewportMetrics::screen_to_natural`](crate::viewport::ViewportMetrics::screen_to_natural)
//! first. States: Idle, Dragging-Move, Dragging-Resize(handle). A gesture
//! starts on pointer-down (edit mode only), self-loops on pointer-move,
//! and returns to Idle on pointer-up/cancel. Gestures are exclusive: a
//! second pointer-down while dragging is suppressed.
//!
//! Every move/resize step emits a full replacement of the active box
//! collection so observers see one consistent snapshot per step.

use crate::model::AnnotationBox;
use crate::viewport::NaturalPoint;

/// Minimum box edge length in natural-pixel units.
pub const MIN_BOX_SIZE: f64 = 8.0;

/// One of the eight fixed resize handles on a box's perimeter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Handle {
    N,
    S,
    E,
    W,
    Ne,
    Nw,
    Se,
    Sw,
}

impl Handle {
    /// All handles, corner and edge-midpoint.
    pub const ALL: [Handle; 8] = [
        Handle::N,
        Handle::S,
        Handle::E,
        Handle::W,
        Handle::Ne,
        Handle::Nw,
        Handle::Se,
        Handle::Sw,
    ];

    /// Handles containing `e` grow width with the pointer.
    #[inline]
    fn grows_east(&self) -> bool {
        matches!(self, Handle::E | Handle::Ne | Handle::Se)
    }

    /// Handles containing `w` grow width against the pointer and shift x,
    /// anchoring the east edge.
    #[inline]
    fn grows_west(&self) -> bool {
        matches!(self, Handle::W | Handle::Nw | Handle::Sw)
    }

    #[inline]
    fn grows_south(&self) -> bool {
        matches!(self, Handle::S | Handle::Se | Handle::Sw)
    }

    #[inline]
    fn grows_north(&self) -> bool {
        matches!(self, Handle::N | Handle::Ne | Handle::Nw)
    }
}

/// Whether a gesture moves the whole body or drags one handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragMode {
    Move,
    Resize(Handle),
}

/// Transient per-gesture state. Created on pointer-down, destroyed on
/// pointer-up/cancel, never persisted.
#[derive(Clone, Debug)]
pub struct DragState {
    pub target_box_id: String,
    pub pointer_start: NaturalPoint,
    pub origin_x: f64,
    pub origin_y: f64,
    pub origin_width: f64,
    pub origin_height: f64,
    pub mode: DragMode,
}

/// The drag/resize state machine.
#[derive(Debug, Default)]
pub struct BoxEditor {
    edit_mode: bool,
    drag: Option<DragState>,
}

impl BoxEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pointer-down handlers are no-ops outside edit mode.
    pub fn set_edit_mode(&mut self, enabled: bool) {
        self.edit_mode = enabled;
        if !enabled {
            self.drag = None;
        }
    }

    #[inline]
    pub fn edit_mode(&self) -> bool {
        self.edit_mode
    }

    #[inline]
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// The in-flight gesture, if any.
    pub fn drag_state(&self) -> Option<&DragState> {
        self.drag.as_ref()
    }

    /// Pointer-down on a box body: Idle -> Dragging-Move.
    ///
    /// Suppressed outside edit mode, while another gesture is active, or
    /// when the box id is not in the active set.
    pub fn pointer_down_body(
        &mut self,
        boxes: &[AnnotationBox],
        box_id: &str,
        pointer: NaturalPoint,
    ) {
        self.begin(boxes, box_id, pointer, DragMode::Move);
    }

    /// Pointer-down on a resize handle: Idle -> Dragging-Resize(handle).
    pub fn pointer_down_handle(
        &mut self,
        boxes: &[AnnotationBox],
        box_id: &str,
        handle: Handle,
        pointer: NaturalPoint,
    ) {
        self.begin(boxes, box_id, pointer, DragMode::Resize(handle));
    }

    fn begin(
        &mut self,
        boxes: &[AnnotationBox],
        box_id: &str,
        pointer: NaturalPoint,
        mode: DragMode,
    ) {
        if !self.edit_mode || self.drag.is_some() {
            return;
        }
        let Some(target) = boxes.iter().find(|b| b.id == box_id) else {
            return;
        };

        self.drag = Some(DragState {
            target_box_id: target.id.clone(),
            pointer_start: pointer,
            origin_x: target.x,
            origin_y: target.y,
            origin_width: target.width,
            origin_height: target.height,
            mode,
        });
    }

    /// Pointer-move: recomputes the target from the delta between current
    /// and start pointer positions and returns a full replacement of the
    /// active box collection. `None` while Idle.
    pub fn pointer_move(
        &self,
        boxes: &[AnnotationBox],
        pointer: NaturalPoint,
    ) -> Option<Vec<AnnotationBox>> {
        let drag = self.drag.as_ref()?;
        let dx = pointer.x - drag.pointer_start.x;
        let dy = pointer.y - drag.pointer_start.y;

        let next = boxes
            .iter()
            .map(|bx| {
                if bx.id != drag.target_box_id {
                    return bx.clone();
                }
                let mut updated = bx.clone();
                match drag.mode {
                    DragMode::Move => {
                        updated.x = drag.origin_x + dx;
                        updated.y = drag.origin_y + dy;
                    }
                    DragMode::Resize(handle) => apply_resize(&mut updated, drag, handle, dx, dy),
                }
                updated
            })
            .collect();
        Some(next)
    }

    /// Pointer-up or pointer-cancel, observed at whole-surface scope:
    /// Dragging-* -> Idle.
    pub fn pointer_up(&mut self) {
        self.drag = None;
    }
}

/// Anchored resize: the edge opposite the dragged handle stays fixed,
/// including when the size clamp kicks in.
fn apply_resize(bx: &mut AnnotationBox, drag: &DragState, handle: Handle, dx: f64, dy: f64) {
    let mut x = drag.origin_x;
    let mut y = drag.origin_y;
    let mut width = drag.origin_width;
    let mut height = drag.origin_height;

    if handle.grows_east() {
        width = drag.origin_width + dx;
    }
    if handle.grows_west() {
        width = drag.origin_width - dx;
        x = drag.origin_x + dx;
    }
    if handle.grows_south() {
        height = drag.origin_height + dy;
    }
    if handle.grows_north() {
        height = drag.origin_height - dy;
        y = drag.origin_y + dy;
    }

    if width < MIN_BOX_SIZE {
        if handle.grows_west() {
            // keep the east edge at its gesture-start position
            x = drag.origin_x + drag.origin_width - MIN_BOX_SIZE;
        }
        width = MIN_BOX_SIZE;
    }
    if height < MIN_BOX_SIZE {
        if handle.grows_north() {
            y = drag.origin_y + drag.origin_height - MIN_BOX_SIZE;
        }
        height = MIN_BOX_SIZE;
    }

    bx.x = x;
    bx.y = y;
    bx.width = width;
    bx.height = height;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boxes() -> Vec<AnnotationBox> {
        vec![
            AnnotationBox::new("a", 10.0, 10.0, 40.0, 30.0),
            AnnotationBox::new("b", 100.0, 100.0, 20.0, 20.0),
        ]
    }

    fn editor() -> BoxEditor {
        let mut ed = BoxEditor::new();
        ed.set_edit_mode(true);
        ed
    }

    #[test]
    fn move_translates_without_resizing() {
        let boxes = boxes();
        let mut ed = editor();
        ed.pointer_down_body(&boxes, "a", NaturalPoint::new(20.0, 20.0));
        let next = ed
            .pointer_move(&boxes, NaturalPoint::new(25.0, 12.0))
            .unwrap();

        assert_eq!(next[0].x, 15.0);
        assert_eq!(next[0].y, 2.0);
        assert_eq!(next[0].width, 40.0);
        assert_eq!(next[0].height, 30.0);
        // untouched sibling survives in the snapshot
        assert_eq!(next[1], boxes[1]);
    }

    #[test]
    fn deltas_accumulate_from_gesture_origin_not_last_step() {
        let boxes = boxes();
        let mut ed = editor();
        ed.pointer_down_body(&boxes, "a", NaturalPoint::new(0.0, 0.0));

        // intermediate snapshots are not fed back; each step recomputes
        // from the same origin
        let _ = ed.pointer_move(&boxes, NaturalPoint::new(100.0, 100.0));
        let next = ed.pointer_move(&boxes, NaturalPoint::new(3.0, 4.0)).unwrap();
        assert_eq!(next[0].x, 13.0);
        assert_eq!(next[0].y, 14.0);
    }

    #[test]
    fn east_handle_grows_width_only() {
        let boxes = boxes();
        let mut ed = editor();
        ed.pointer_down_handle(&boxes, "a", Handle::E, NaturalPoint::new(50.0, 25.0));
        let next = ed
            .pointer_move(&boxes, NaturalPoint::new(57.0, 90.0))
            .unwrap();

        assert_eq!(next[0].width, 47.0);
        assert_eq!(next[0].x, 10.0);
        assert_eq!(next[0].height, 30.0);
    }

    #[test]
    fn west_handle_anchors_east_edge() {
        let boxes = boxes();
        let mut ed = editor();
        ed.pointer_down_handle(&boxes, "a", Handle::W, NaturalPoint::new(10.0, 25.0));
        let next = ed
            .pointer_move(&boxes, NaturalPoint::new(4.0, 25.0))
            .unwrap();

        assert_eq!(next[0].x, 4.0);
        assert_eq!(next[0].width, 46.0);
        assert_eq!(next[0].right(), 50.0);
    }

    #[test]
    fn corner_handle_combines_both_axes() {
        let boxes = boxes();
        let mut ed = editor();
        ed.pointer_down_handle(&boxes, "a", Handle::Se, NaturalPoint::new(50.0, 40.0));
        let next = ed
            .pointer_move(&boxes, NaturalPoint::new(60.0, 55.0))
            .unwrap();

        assert_eq!(next[0].width, 50.0);
        assert_eq!(next[0].height, 45.0);
        assert_eq!((next[0].x, next[0].y), (10.0, 10.0));
    }

    #[test]
    fn shrinking_nw_past_floor_keeps_bottom_right_fixed() {
        let boxes = boxes();
        let mut ed = editor();
        ed.pointer_down_handle(&boxes, "a", Handle::Nw, NaturalPoint::new(10.0, 10.0));
        // drag far past the opposite corner
        let next = ed
            .pointer_move(&boxes, NaturalPoint::new(200.0, 200.0))
            .unwrap();

        assert_eq!(next[0].width, MIN_BOX_SIZE);
        assert_eq!(next[0].height, MIN_BOX_SIZE);
        assert_eq!(next[0].right(), 50.0);
        assert_eq!(next[0].bottom(), 40.0);
    }

    #[test]
    fn shrinking_se_clamps_without_moving_origin() {
        let boxes = boxes();
        let mut ed = editor();
        ed.pointer_down_handle(&boxes, "a", Handle::Se, NaturalPoint::new(50.0, 40.0));
        let next = ed
            .pointer_move(&boxes, NaturalPoint::new(-100.0, -100.0))
            .unwrap();

        assert_eq!((next[0].x, next[0].y), (10.0, 10.0));
        assert_eq!(next[0].width, MIN_BOX_SIZE);
        assert_eq!(next[0].height, MIN_BOX_SIZE);
    }

    #[test]
    fn pointer_down_is_a_no_op_outside_edit_mode() {
        let boxes = boxes();
        let mut ed = BoxEditor::new();
        ed.pointer_down_body(&boxes, "a", NaturalPoint::new(20.0, 20.0));
        assert!(!ed.is_dragging());
        assert!(ed.pointer_move(&boxes, NaturalPoint::new(0.0, 0.0)).is_none());
    }

    #[test]
    fn second_pointer_down_is_suppressed_during_a_gesture() {
        let boxes = boxes();
        let mut ed = editor();
        ed.pointer_down_body(&boxes, "a", NaturalPoint::new(20.0, 20.0));
        ed.pointer_down_body(&boxes, "b", NaturalPoint::new(110.0, 110.0));

        assert_eq!(ed.drag_state().unwrap().target_box_id, "a");

        ed.pointer_up();
        assert!(!ed.is_dragging());
        ed.pointer_down_body(&boxes, "b", NaturalPoint::new(110.0, 110.0));
        assert_eq!(ed.drag_state().unwrap().target_box_id, "b");
    }

    #[test]
    fn unknown_box_id_never_forms_a_gesture() {
        let boxes = boxes();
        let mut ed = editor();
        ed.pointer_down_body(&boxes, "zzz", NaturalPoint::new(0.0, 0.0));
        assert!(!ed.is_dragging());
    }

    #[test]
    fn leaving_edit_mode_cancels_the_gesture() {
        let boxes = boxes();
        let mut ed = editor();
        ed.pointer_down_body(&boxes, "a", NaturalPoint::new(20.0, 20.0));
        ed.set_edit_mode(false);
        assert!(!ed.is_dragging());
    }
}
