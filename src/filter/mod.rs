//! Selection filters.
//!
//! Six independent predicates prune the source graph during traversal:
//! step name, frame increment, frame value, instance name, history output
//! name and history region name. Each defaults to "match all"; the literal
//! string `"all"` from the CLI contract means unfiltered. The predicates
//! run before the expensive bulk extraction of a frame or instance, so a
//! non-match short-circuits without allocating that subtree's payload.

/// A single name predicate: match everything or one exact name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum NameFilter {
    /// Match every name.
    #[default]
    All,
    /// Match one exact name.
    Exact(String),
}

impl NameFilter {
    /// Parse a CLI-layer selection string; `"all"` or empty means all.
    pub fn parse(value: &str) -> Self {
        if value.is_empty() || value == "all" {
            NameFilter::All
        } else {
            NameFilter::Exact(value.to_string())
        }
    }

    /// Whether the filter admits `name`.
    pub fn admits(&self, name: &str) -> bool {
        match self {
            NameFilter::All => true,
            NameFilter::Exact(selected) => selected == name,
        }
    }
}

/// The full selection: one predicate per axis.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Selection {
    step: NameFilter,
    frame: NameFilter,
    frame_value: Option<String>,
    instance: NameFilter,
    history: NameFilter,
    history_region: NameFilter,
}

impl Selection {
    /// A selection that admits everything.
    pub fn all() -> Self {
        Self::default()
    }

    /// Restrict to one step name (`"all"` clears the restriction).
    pub fn with_step(mut self, step: &str) -> Self {
        self.step = NameFilter::parse(step);
        self
    }

    /// Restrict to one frame increment (`"all"` clears the restriction).
    pub fn with_frame(mut self, frame: &str) -> Self {
        self.frame = NameFilter::parse(frame);
        self
    }

    /// Restrict frames by a substring of the frame value's canonical
    /// rendering (`"all"` clears the restriction).
    pub fn with_frame_value(mut self, value: &str) -> Self {
        self.frame_value = if value.is_empty() || value == "all" {
            None
        } else {
            Some(value.to_string())
        };
        self
    }

    /// Restrict to one instance name (`"all"` clears the restriction).
    pub fn with_instance(mut self, instance: &str) -> Self {
        self.instance = NameFilter::parse(instance);
        self
    }

    /// Restrict to one history output name (`"all"` clears the
    /// restriction).
    pub fn with_history(mut self, history: &str) -> Self {
        self.history = NameFilter::parse(history);
        self
    }

    /// Restrict to one history region name (`"all"` clears the
    /// restriction).
    pub fn with_history_region(mut self, region: &str) -> Self {
        self.history_region = NameFilter::parse(region);
        self
    }

    /// Whether the step named `name` is selected.
    pub fn matches_step(&self, name: &str) -> bool {
        self.step.admits(name)
    }

    /// Whether the frame with `increment` is selected.
    pub fn matches_frame(&self, increment: i32) -> bool {
        self.frame.admits(&increment.to_string())
    }

    /// Whether a frame with `value` is selected.
    ///
    /// The selection string is matched as a substring of the value's fixed
    /// 6-decimal rendering. This is an intentionally loose, string-based
    /// filter: `"0.5"` matches `0.500000` and also `10.500000`.
    pub fn matches_frame_value(&self, value: f32) -> bool {
        match &self.frame_value {
            None => true,
            Some(selected) => Self::render_frame_value(value).contains(selected.as_str()),
        }
    }

    /// Whether the instance named `name` is selected.
    pub fn matches_instance(&self, name: &str) -> bool {
        self.instance.admits(name)
    }

    /// Whether the history output named `name` is selected.
    pub fn matches_history(&self, name: &str) -> bool {
        self.history.admits(name)
    }

    /// Whether the history region named `name` is selected.
    pub fn matches_history_region(&self, name: &str) -> bool {
        self.history_region.admits(name)
    }

    /// True when no axis restricts anything.
    pub fn is_unfiltered(&self) -> bool {
        *self == Self::default()
    }

    /// Canonical decimal rendering a frame value is matched against.
    pub fn render_frame_value(value: f32) -> String {
        format!("{value:.6}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_admit_everything() {
        let selection = Selection::all();
        assert!(selection.is_unfiltered());
        assert!(selection.matches_step("Step-1"));
        assert!(selection.matches_frame(17));
        assert!(selection.matches_frame_value(3.25));
        assert!(selection.matches_instance("INST-1"));
        assert!(selection.matches_history("U1"));
        assert!(selection.matches_history_region("NodeSet PUNCH"));
    }

    #[test]
    fn test_all_keyword_clears() {
        let selection = Selection::all()
            .with_step("all")
            .with_frame("all")
            .with_frame_value("all")
            .with_instance("all");
        assert!(selection.is_unfiltered());
    }

    #[test]
    fn test_step_filter() {
        let selection = Selection::all().with_step("Step-2");
        assert!(selection.matches_step("Step-2"));
        assert!(!selection.matches_step("Step-1"));
    }

    #[test]
    fn test_frame_filter_is_exact() {
        let selection = Selection::all().with_frame("3");
        assert!(selection.matches_frame(3));
        assert!(!selection.matches_frame(30));
        assert!(!selection.matches_frame(0));
    }

    #[test]
    fn test_frame_value_substring() {
        let selection = Selection::all().with_frame_value("0.5");
        assert!(selection.matches_frame_value(0.5));
        assert!(!selection.matches_frame_value(1.25));
        // Loose by design: the substring also occurs in 10.500000.
        assert!(selection.matches_frame_value(10.5));
    }

    #[test]
    fn test_render_frame_value() {
        assert_eq!(Selection::render_frame_value(0.5), "0.500000");
        assert_eq!(Selection::render_frame_value(1.25), "1.250000");
    }

    #[test]
    fn test_history_filters() {
        let selection = Selection::all()
            .with_history_region("NodeSet PUNCH")
            .with_history("U1");
        assert!(selection.matches_history_region("NodeSet PUNCH"));
        assert!(!selection.matches_history_region("NodeSet DIE"));
        assert!(selection.matches_history("U1"));
        assert!(!selection.matches_history("U2"));
    }
}
