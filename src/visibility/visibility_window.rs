use std::fmt::{Display, Formatter};

/// Contiguous interval `[t_start, t_end]` in which a target was visible at every sample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibilityWindow {
    target_id: String,
    visible: bool,
    t_start: i64,
    t_end: i64,
}

impl VisibilityWindow {
    pub fn new(target_id: &str, t_start: i64, t_end: i64) -> Self {
        Self {
            target_id: target_id.to_string(),
            visible: true,
            t_start,
            t_end,
        }
    }

    /// The empty result for a target that is not visible at `t`.
    pub fn not_visible(target_id: &str, t: i64) -> Self {
        Self {
            target_id: target_id.to_string(),
            visible: false,
            t_start: t,
            t_end: t,
        }
    }

    pub fn target_id(&self) -> &str { &self.target_id }
    pub fn is_visible(&self) -> bool { self.visible }
    pub fn t_start(&self) -> i64 { self.t_start }
    pub fn t_end(&self) -> i64 { self.t_end }
    pub fn interval(&self) -> (i64, i64) { (self.t_start, self.t_end) }

    /// Window length in seconds, always a multiple of the scan step.
    pub fn len(&self) -> i64 { self.t_end - self.t_start }

    pub fn is_empty(&self) -> bool { self.len() == 0 }

    /// Checks whether a capture of `duration` seconds fits between start and end.
    pub fn fits(&self, duration: i64) -> bool { self.visible && self.len() >= duration }
}

impl Display for VisibilityWindow {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.visible {
            write!(f, "{} visible [{}s, {}s]", self.target_id, self.t_start, self.t_end)
        } else {
            write!(f, "{} not visible at {}s", self.target_id, self.t_start)
        }
    }
}
