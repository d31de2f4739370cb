//! Known terminal emulators and how to run a command in each

/// A terminal emulator that can run `ssh`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalCandidate {
    /// Preference id stored in settings
    pub id: &'static str,
    pub display_name: &'static str,
    pub executable: &'static str,
    /// Arguments placed between the executable and `ssh ...`
    pub exec_args: &'static [&'static str],
}

const fn candidate(
    id: &'static str,
    display_name: &'static str,
    exec_args: &'static [&'static str],
) -> TerminalCandidate {
    TerminalCandidate {
        id,
        display_name,
        executable: id,
        exec_args,
    }
}

const EXECUTE: &[&str] = &["-e"];
const DOUBLE_DASH: &[&str] = &["--"];

/// Every supported terminal, in the order offered to users
pub const TERMINAL_CANDIDATES: &[TerminalCandidate] = &[
    candidate("konsole", "Konsole", &["--noclose", "-e"]),
    candidate("gnome-terminal", "GNOME Terminal", DOUBLE_DASH),
    candidate("kgx", "GNOME Console (kgx)", DOUBLE_DASH),
    candidate("kitty", "Kitty", &[]),
    candidate("alacritty", "Alacritty", EXECUTE),
    candidate("tilix", "Tilix", EXECUTE),
    candidate("xfce4-terminal", "Xfce4 Terminal", EXECUTE),
    candidate("lxterminal", "LXTerminal", EXECUTE),
    candidate("qterminal", "QTerminal", EXECUTE),
    candidate("terminator", "Terminator", EXECUTE),
    candidate("mate-terminal", "MATE Terminal", EXECUTE),
    candidate("wezterm", "WezTerm", &["start", "--"]),
    candidate("urxvt", "rxvt-unicode", EXECUTE),
    candidate("sakura", "Sakura", EXECUTE),
    candidate("xterm", "xterm", &["-hold", "-e"]),
    candidate(
        "x-terminal-emulator",
        "System Default (x-terminal-emulator)",
        EXECUTE,
    ),
];

/// Order in which terminals are tried when nothing else is configured
pub const FALLBACK_ORDER: &[&str] = &[
    "konsole",
    "gnome-terminal",
    "kgx",
    "x-terminal-emulator",
    "kitty",
    "alacritty",
    "tilix",
    "xfce4-terminal",
    "lxterminal",
    "qterminal",
    "terminator",
    "mate-terminal",
    "wezterm",
    "urxvt",
    "sakura",
    "xterm",
];

/// Look up a known terminal by preference id
pub fn find_candidate(id: &str) -> Option<&'static TerminalCandidate> {
    TERMINAL_CANDIDATES.iter().find(|c| c.id == id)
}

/// Human-readable name for a terminal preference id
pub fn terminal_display_name(id: &str) -> String {
    match id {
        "" | "auto" => "Automatic".to_string(),
        "custom" => "Custom command".to_string(),
        other => find_candidate(other)
            .map(|c| c.display_name.to_string())
            .unwrap_or_else(|| other.to_string()),
    }
}
