use std::fmt;

/// Action bound to a button.
///
/// `target` / `message` may be empty when the layout omitted them; the
/// dispatcher treats those as no-ops rather than rejecting the document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Action {
    NextLayout,
    PrevLayout,
    GotoLayout { target: String },
    UpdateText { target: String, message: String },
    AppendText { target: String, message: String },
    Quit,
}

impl Action {
    pub const NEXT_LAYOUT: &'static str = "next_layout";
    pub const PREV_LAYOUT: &'static str = "prev_layout";
    pub const GOTO_LAYOUT: &'static str = "goto_layout";
    pub const UPDATE_TEXT: &'static str = "update_text";
    pub const APPEND_TEXT: &'static str = "append_text";
    pub const QUIT: &'static str = "quit";

    /// Build from the wire vocabulary. Returns `None` for unknown names.
    pub fn from_wire(name: &str, target: Option<&str>, message: Option<&str>) -> Option<Self> {
        let target = || target.unwrap_or_default().to_string();
        let message = || message.unwrap_or_default().to_string();
        let action = match name {
            Self::NEXT_LAYOUT => Self::NextLayout,
            Self::PREV_LAYOUT => Self::PrevLayout,
            Self::GOTO_LAYOUT => Self::GotoLayout { target: target() },
            Self::UPDATE_TEXT => Self::UpdateText {
                target: target(),
                message: message(),
            },
            Self::APPEND_TEXT => Self::AppendText {
                target: target(),
                message: message(),
            },
            Self::QUIT => Self::Quit,
            _ => return None,
        };
        Some(action)
    }

    pub fn wire_name(&self) -> &'static str {
        match self {
            Self::NextLayout => Self::NEXT_LAYOUT,
            Self::PrevLayout => Self::PREV_LAYOUT,
            Self::GotoLayout { .. } => Self::GOTO_LAYOUT,
            Self::UpdateText { .. } => Self::UPDATE_TEXT,
            Self::AppendText { .. } => Self::APPEND_TEXT,
            Self::Quit => Self::QUIT,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GotoLayout { target }
            | Self::UpdateText { target, .. }
            | Self::AppendText { target, .. } => write!(f, "{}({target})", self.wire_name()),
            _ => f.write_str(self.wire_name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_wire_vocabulary() {
        assert_eq!(Action::from_wire("next_layout", None, None), Some(Action::NextLayout));
        assert_eq!(Action::from_wire("prev_layout", None, None), Some(Action::PrevLayout));
        assert_eq!(Action::from_wire("quit", Some("ignored"), None), Some(Action::Quit));
        assert_eq!(
            Action::from_wire("goto_layout", Some("aftaler"), None),
            Some(Action::GotoLayout {
                target: "aftaler".into()
            })
        );
        assert_eq!(
            Action::from_wire("append_text", Some("log"), Some("hi")),
            Some(Action::AppendText {
                target: "log".into(),
                message: "hi".into()
            })
        );
        assert_eq!(Action::from_wire("reboot", None, None), None);
    }

    #[test]
    fn missing_parameters_become_empty() {
        assert_eq!(
            Action::from_wire("update_text", None, None),
            Some(Action::UpdateText {
                target: String::new(),
                message: String::new()
            })
        );
    }

    #[test]
    fn wire_name_round_trips() {
        for name in ["next_layout", "prev_layout", "goto_layout", "update_text", "append_text", "quit"] {
            let action = Action::from_wire(name, Some("t"), Some("m")).unwrap();
            assert_eq!(action.wire_name(), name);
        }
    }

    #[test]
    fn display_includes_target() {
        let a = Action::GotoLayout {
            target: "main".into(),
        };
        assert_eq!(a.to_string(), "goto_layout(main)");
        assert_eq!(Action::Quit.to_string(), "quit");
    }
}
