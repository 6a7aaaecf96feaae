//! Time-based sliding-window split.
//!
//! Partitions an interaction stream into a historical background portion
//! (everything before `background_t`) and consecutive evaluation windows of
//! `window_size` seconds each.

use crate::error::EvalError;
use crate::interactions::{Interaction, Interactions};

/// Sliding-window split parameters for one evaluation run.
#[derive(Debug, Clone, Copy)]
pub struct SlidingWindow {
    /// Epoch second separating background data from evaluation data.
    pub background_t: i64,
    /// Width of each evaluation window, in seconds.
    pub window_size: i64,
    /// Recommendation-list cutoff applied throughout the run.
    pub top_k: usize,
}

/// One evaluation window: its start timestamp and the events that fall in it.
#[derive(Debug)]
pub struct EvalWindow {
    pub start_t: i64,
    pub interactions: Interactions,
}

/// Result of splitting a stream: background history plus evaluation windows.
#[derive(Debug)]
pub struct Split {
    pub background: Interactions,
    pub windows: Vec<EvalWindow>,
}

impl SlidingWindow {
    pub fn new(background_t: i64, window_size: i64, top_k: usize) -> Result<Self, EvalError> {
        if window_size <= 0 {
            return Err(EvalError::Configuration(format!(
                "window size must be positive, got {window_size}"
            )));
        }
        if top_k == 0 {
            return Err(EvalError::Configuration("top-K must be positive".into()));
        }
        Ok(Self {
            background_t,
            window_size,
            top_k,
        })
    }

    /// Split a stream into background and evaluation windows.
    ///
    /// Fails with a configuration error when the split point leaves no
    /// evaluation data (the run could never produce a result).
    pub fn split(&self, data: &Interactions) -> Result<Split, EvalError> {
        let mut background = Vec::new();
        let mut evaluation: Vec<Interaction> = Vec::new();
        for event in data {
            if event.timestamp < self.background_t {
                background.push(*event);
            } else {
                evaluation.push(*event);
            }
        }

        if evaluation.is_empty() {
            return Err(EvalError::Configuration(format!(
                "no interactions at or after split point {}",
                self.background_t
            )));
        }

        let mut windows: Vec<EvalWindow> = Vec::new();
        for event in evaluation {
            let offset = (event.timestamp - self.background_t) / self.window_size;
            let start_t = self.background_t + offset * self.window_size;
            match windows.last_mut() {
                Some(last) if last.start_t == start_t => last.interactions.push(event),
                _ => windows.push(EvalWindow {
                    start_t,
                    interactions: Interactions::new(vec![event]),
                }),
            }
        }

        Ok(Split {
            background: Interactions::new(background),
            windows,
        })
    }
}
