//! Staggered text swaps.
//!
//! Every text element fades out, swaps its text and fades back in on its own
//! schedule, offset by its position in reading order. The schedule lives in a
//! [`Timeline`] driven by an explicit clock, so a page update can be stepped
//! deterministically and a newer update can cancel what an older one left
//! pending.
//!
//! # Invariants
//!
//! 1. Element `i` in reading order starts fading out at `i * STAGGER_STEP`.
//! 2. Its text is swapped `FADE_OUT` later and the `changed` class is cleared
//!    another `FADE_IN_CLEANUP` after that.
//! 3. Only tasks of the current generation ever run.

use std::time::Duration;

use crate::render::Rect;

pub const STAGGER_STEP: Duration = Duration::from_millis(30);
pub const FADE_OUT: Duration = Duration::from_millis(200);
pub const FADE_IN_CLEANUP: Duration = Duration::from_millis(300);

/// Elements whose tops differ by no more than this many pixels share a row.
pub const ROW_TOLERANCE: f64 = 10.0;

pub const CHANGING_CLASS: &str = "changing";
pub const CHANGED_CLASS: &str = "changed";

/// Indices of `rects` ordered top-to-bottom, then left-to-right within a row.
///
/// Rows are formed greedily from the topmost element: anything within
/// [`ROW_TOLERANCE`] of a row's first element joins that row.
pub fn reading_order(rects: &[Rect]) -> Vec<usize> {
    let mut by_top: Vec<usize> = (0..rects.len()).collect();
    by_top.sort_by(|&a, &b| rects[a].top.total_cmp(&rects[b].top));

    let mut order = Vec::with_capacity(rects.len());
    let mut row: Vec<usize> = Vec::new();
    let mut row_top = 0.0;
    for index in by_top {
        let top = rects[index].top;
        if !row.is_empty() && top - row_top > ROW_TOLERANCE {
            flush_row(rects, &mut row, &mut order);
        }
        if row.is_empty() {
            row_top = top;
        }
        row.push(index);
    }
    flush_row(rects, &mut row, &mut order);
    order
}

fn flush_row(rects: &[Rect], row: &mut Vec<usize>, order: &mut Vec<usize>) {
    row.sort_by(|&a, &b| rects[a].left.total_cmp(&rects[b].left));
    order.append(row);
}

/// Linear stagger offsets: `offset[i] = i * step`.
pub fn stagger_offsets(count: usize, step: Duration) -> Vec<Duration> {
    (0..count)
        .map(|i| step.saturating_mul(i as u32))
        .collect()
}

/// One phase of a text swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Add `changing`.
    FadeOut,
    /// Swap the text, drop `changing`, add `changed`.
    Swap,
    /// Drop `changed`.
    Cleanup,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Task {
    due: Duration,
    generation: u64,
    target: usize,
    step: Step,
}

/// A task that came due during [`Timeline::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Due {
    pub target: usize,
    pub step: Step,
}

#[derive(Debug, Default)]
pub struct Timeline {
    now: Duration,
    generation: u64,
    tasks: Vec<Task>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Start a new update generation, cancelling every task still pending
    /// from older ones. Returns the targets that had cancelled tasks.
    pub fn begin_generation(&mut self) -> Vec<usize> {
        self.generation += 1;
        let current = self.generation;
        let mut cancelled: Vec<usize> = self
            .tasks
            .iter()
            .filter(|t| t.generation != current)
            .map(|t| t.target)
            .collect();
        cancelled.sort_unstable();
        cancelled.dedup();
        self.tasks.retain(|t| t.generation == current);
        cancelled
    }

    /// Queue the fade-out / swap / cleanup sequence for `target`, starting
    /// `offset` from now.
    pub fn schedule_swap(&mut self, target: usize, offset: Duration) {
        let start = self.now + offset;
        let swap = start + FADE_OUT;
        for (due, step) in [
            (start, Step::FadeOut),
            (swap, Step::Swap),
            (swap + FADE_IN_CLEANUP, Step::Cleanup),
        ] {
            self.tasks.push(Task {
                due,
                generation: self.generation,
                target,
                step,
            });
        }
    }

    /// Move the clock forward by `dt` and drain every task now due, earliest
    /// first. Ties keep scheduling order.
    pub fn advance(&mut self, dt: Duration) -> Vec<Due> {
        self.now += dt;
        let now = self.now;
        let mut due: Vec<Task> = Vec::new();
        self.tasks.retain(|t| {
            if t.due <= now {
                due.push(*t);
                false
            } else {
                true
            }
        });
        due.sort_by_key(|t| t.due);
        due.into_iter()
            .map(|t| Due {
                target: t.target,
                step: t.step,
            })
            .collect()
    }

    /// Time until the earliest pending task, if any.
    pub fn next_due(&self) -> Option<Duration> {
        self.tasks
            .iter()
            .map(|t| t.due.saturating_sub(self.now))
            .min()
    }

    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_idle(&self) -> bool {
        self.tasks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reading_order_rows_then_columns() {
        let rects = [
            Rect::new(100.0, 0.0),
            Rect::new(5.0, 300.0),
            Rect::new(0.0, 10.0),
            Rect::new(50.0, 0.0),
        ];
        assert_eq!(reading_order(&rects), vec![2, 1, 3, 0]);
    }

    #[test]
    fn offsets_are_linear() {
        assert!(stagger_offsets(0, STAGGER_STEP).is_empty());
        assert_eq!(
            stagger_offsets(3, STAGGER_STEP),
            vec![
                Duration::ZERO,
                Duration::from_millis(30),
                Duration::from_millis(60)
            ]
        );
    }

    #[test]
    fn swap_sequence_timing() {
        let mut tl = Timeline::new();
        tl.begin_generation();
        tl.schedule_swap(0, Duration::ZERO);
        tl.schedule_swap(1, STAGGER_STEP);

        assert_eq!(
            tl.advance(Duration::ZERO),
            vec![Due { target: 0, step: Step::FadeOut }]
        );
        assert_eq!(
            tl.advance(Duration::from_millis(30)),
            vec![Due { target: 1, step: Step::FadeOut }]
        );
        assert_eq!(tl.next_due(), Some(Duration::from_millis(170)));
        assert_eq!(
            tl.advance(Duration::from_millis(200)),
            vec![
                Due { target: 0, step: Step::Swap },
                Due { target: 1, step: Step::Swap }
            ]
        );
        assert_eq!(tl.advance(Duration::from_millis(269)), vec![]);
        assert_eq!(
            tl.advance(Duration::from_millis(1)),
            vec![Due { target: 0, step: Step::Cleanup }]
        );
        tl.advance(Duration::from_millis(30));
        assert!(tl.is_idle());
    }

    #[test]
    fn new_generation_cancels_pending_tasks() {
        let mut tl = Timeline::new();
        tl.begin_generation();
        tl.schedule_swap(0, Duration::ZERO);
        tl.schedule_swap(3, STAGGER_STEP);
        tl.advance(Duration::from_millis(10));

        let cancelled = tl.begin_generation();
        assert_eq!(cancelled, vec![0, 3]);
        assert!(tl.is_idle());
        assert_eq!(tl.generation(), 2);

        tl.schedule_swap(3, Duration::ZERO);
        let due = tl.advance(Duration::from_secs(1));
        assert_eq!(due.len(), 3);
        assert!(due.iter().all(|d| d.target == 3));
    }
}
