//! # Box Generation
//!
//! Random rectangle placement inside bounds, with optional overlap
//! rejection and spacing limits. Used both for the fort footprint search and
//! for packing rooms inside it.

use crate::geometry::{random_between, IntRange, Rect};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// How a new box may relate to boxes already placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverlapPolicy {
    /// Boxes may overlap freely
    Irrelevant,
    /// Reject any box sharing a cell with an existing one
    NeverOverlap,
}

/// Parameters for one call to [`generate_boxes`].
///
/// `width` and `height` are corner-to-corner spans (`x2 - x1`), so a span
/// of 9 covers ten cells. `x_bounds` and `y_bounds` are the inclusive
/// coordinates every box corner must stay within.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxRequest {
    pub overlap: OverlapPolicy,
    pub count: IntRange,
    pub width: IntRange,
    pub height: IntRange,
    /// Minimum gap to every other box, maximum gap to the nearest one
    pub spacing: Option<IntRange>,
    pub x_bounds: IntRange,
    pub y_bounds: IntRange,
    /// Random draws per box before giving up on it
    pub attempts_per_box: u32,
}

impl BoxRequest {
    pub fn new(
        overlap: OverlapPolicy,
        count: IntRange,
        width: IntRange,
        height: IntRange,
        x_bounds: IntRange,
        y_bounds: IntRange,
    ) -> Self {
        Self {
            overlap,
            count,
            width,
            height,
            spacing: None,
            x_bounds,
            y_bounds,
            attempts_per_box: 100,
        }
    }

    pub fn with_spacing(mut self, spacing: IntRange) -> Self {
        self.spacing = Some(spacing);
        self
    }

    pub fn with_attempts(mut self, attempts_per_box: u32) -> Self {
        self.attempts_per_box = attempts_per_box;
        self
    }
}

/// Places up to a random number of boxes inside the bounds.
///
/// `existing` boxes take part in overlap and spacing checks but are not
/// returned. Boxes come back in acceptance order. When a box cannot be
/// placed within its attempt budget, generation stops and returns what was
/// accepted so far, which may be nothing.
///
/// # Examples
///
/// ```
/// use palisade::{generate_boxes, BoxRequest, IntRange, OverlapPolicy};
/// use palisade::generation::utils::create_rng;
///
/// let request = BoxRequest::new(
///     OverlapPolicy::NeverOverlap,
///     IntRange::new(3, 3),
///     IntRange::new(4, 6),
///     IntRange::new(4, 6),
///     IntRange::new(0, 60),
///     IntRange::new(0, 60),
/// );
/// let boxes = generate_boxes(&[], &request, &mut create_rng(1));
/// assert!(boxes.len() <= 3);
/// ```
pub fn generate_boxes<R: Rng + ?Sized>(
    existing: &[Rect],
    request: &BoxRequest,
    rng: &mut R,
) -> Vec<Rect> {
    let target = request.count.roll(rng).max(0) as usize;
    let mut accepted: Vec<Rect> = Vec::with_capacity(target);

    for _ in 0..target {
        match try_place_box(existing, &accepted, request, rng) {
            Some(rect) => accepted.push(rect),
            None => {
                log::debug!(
                    "box packing stopped after {} of {} boxes",
                    accepted.len(),
                    target
                );
                break;
            }
        }
    }

    accepted
}

fn try_place_box<R: Rng + ?Sized>(
    existing: &[Rect],
    accepted: &[Rect],
    request: &BoxRequest,
    rng: &mut R,
) -> Option<Rect> {
    for _ in 0..request.attempts_per_box {
        let Some(candidate) = draw_candidate(request, rng) else {
            continue;
        };

        let others = existing.iter().chain(accepted.iter());

        if request.overlap == OverlapPolicy::NeverOverlap
            && others.clone().any(|other| candidate.intersects(other))
        {
            continue;
        }

        if let Some(spacing) = request.spacing {
            if others.clone().any(|other| candidate.separation(other) < spacing.min) {
                continue;
            }

            let nearest = others.map(|other| candidate.separation(other)).min();
            if matches!(nearest, Some(gap) if gap > spacing.max) {
                continue;
            }
        }

        return Some(candidate);
    }

    None
}

/// Draws one box that fits the bounds, or `None` if the drawn size does not.
fn draw_candidate<R: Rng + ?Sized>(request: &BoxRequest, rng: &mut R) -> Option<Rect> {
    let width = request.width.roll(rng).max(0);
    let height = request.height.roll(rng).max(0);

    let x1 = random_between(rng, request.x_bounds.min, request.x_bounds.max - width)?;
    let y1 = random_between(rng, request.y_bounds.min, request.y_bounds.max - height)?;

    Some(Rect::new(x1, y1, x1 + width, y1 + height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::utils::create_rng;

    fn room_request() -> BoxRequest {
        BoxRequest::new(
            OverlapPolicy::NeverOverlap,
            IntRange::new(1, 8),
            IntRange::new(9, 40),
            IntRange::new(8, 14),
            IntRange::new(2, 50),
            IntRange::new(2, 22),
        )
        .with_spacing(IntRange::new(6, 999))
    }

    #[test]
    fn test_boxes_stay_inside_bounds() {
        let request = room_request();
        for seed in 0..50 {
            let boxes = generate_boxes(&[], &request, &mut create_rng(seed));
            for rect in boxes {
                assert!(rect.x1 >= 2 && rect.x2 <= 50, "{:?}", rect);
                assert!(rect.y1 >= 2 && rect.y2 <= 22, "{:?}", rect);
                assert!(request.width.contains(rect.x2 - rect.x1));
                assert!(request.height.contains(rect.y2 - rect.y1));
            }
        }
    }

    #[test]
    fn test_never_overlap_respects_spacing() {
        let request = room_request();
        for seed in 0..50 {
            let boxes = generate_boxes(&[], &request, &mut create_rng(seed));
            for (i, a) in boxes.iter().enumerate() {
                for b in boxes.iter().skip(i + 1) {
                    assert!(!a.intersects(b));
                    assert!(a.separation(b) >= 6);
                }
            }
        }
    }

    #[test]
    fn test_existing_boxes_are_avoided_but_not_returned() {
        let blocker = Rect::new(0, 0, 30, 30);
        let request = BoxRequest::new(
            OverlapPolicy::NeverOverlap,
            IntRange::new(4, 4),
            IntRange::new(2, 4),
            IntRange::new(2, 4),
            IntRange::new(0, 60),
            IntRange::new(0, 60),
        );

        let boxes = generate_boxes(&[blocker], &request, &mut create_rng(3));
        assert!(!boxes.contains(&blocker));
        assert!(boxes.iter().all(|rect| !rect.intersects(&blocker)));
    }

    #[test]
    fn test_oversized_request_yields_nothing() {
        let request = BoxRequest::new(
            OverlapPolicy::Irrelevant,
            IntRange::new(1, 1),
            IntRange::new(30, 50),
            IntRange::new(16, 24),
            IntRange::new(1, 10),
            IntRange::new(1, 10),
        );
        assert!(generate_boxes(&[], &request, &mut create_rng(9)).is_empty());
    }

    #[test]
    fn test_zero_count_yields_nothing() {
        let mut request = room_request();
        request.count = IntRange::single(0);
        assert!(generate_boxes(&[], &request, &mut create_rng(11)).is_empty());
    }

    #[test]
    fn test_generation_is_deterministic() {
        let request = room_request();
        let a = generate_boxes(&[], &request, &mut create_rng(77));
        let b = generate_boxes(&[], &request, &mut create_rng(77));
        assert_eq!(a, b);
    }
}
