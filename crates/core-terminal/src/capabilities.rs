//! Terminal capability probing.
//!
//! Detection runs once at startup and only looks at the environment. A
//! terminal that does not advertise truecolor gets colours folded onto the
//! xterm 256-colour cube.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub struct TerminalCapabilities {
    pub truecolor: bool,
}

impl TerminalCapabilities {
    pub fn detect() -> Self {
        let colorterm = std::env::var("COLORTERM").ok();
        Self::from_colorterm(colorterm.as_deref())
    }

    pub fn from_colorterm(value: Option<&str>) -> Self {
        let truecolor = value.is_some_and(|v| {
            v.eq_ignore_ascii_case("truecolor") || v.eq_ignore_ascii_case("24bit")
        });
        Self { truecolor }
    }

    pub fn with_truecolor(truecolor: bool) -> Self {
        Self { truecolor }
    }
}
