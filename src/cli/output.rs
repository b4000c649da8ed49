//! Shared CLI output helpers.
//!
//! Color scheme (respects NO_COLOR):
//! - Green: success
//! - Red: errors
//! - Cyan: hints, handles
//! - Dimmed: secondary info
//!
//! Status messages go to stderr so stdout stays clean for piping.

use console::style;

/// Check if color output is disabled via NO_COLOR env var.
fn colors_enabled() -> bool {
    std::env::var_os("NO_COLOR").is_none() && console::colors_enabled_stderr()
}

/// Print a success message with checkmark (green) to stderr.
///
/// Example: `✓ stored database password`
pub fn success(msg: &str) {
    if colors_enabled() {
        eprintln!("{} {}", style("✓").for_stderr().green(), msg);
    } else {
        eprintln!("✓ {}", msg);
    }
}

/// Print an error message to stderr (red).
///
/// Example: `✗ no secret stored for database password`
pub fn error(msg: &str) {
    if colors_enabled() {
        eprintln!("{} {}", style("✗").for_stderr().red(), msg);
    } else {
        eprintln!("✗ {}", msg);
    }
}

/// Print a hint message to stderr (cyan).
///
/// Example: `→ pipe the output: kloak unveil db password | pbcopy`
pub fn hint(msg: &str) {
    if colors_enabled() {
        eprintln!("{} {}", style("→").for_stderr().cyan(), style(msg).for_stderr().cyan());
    } else {
        eprintln!("→ {}", msg);
    }
}

/// Format a secret handle in cyan.
pub fn handle(h: &str) -> String {
    if colors_enabled() {
        style(h).cyan().to_string()
    } else {
        h.to_string()
    }
}

/// Format a secondary value, dimmed.
pub fn dimmed(s: &str) -> String {
    if colors_enabled() {
        style(s).dim().to_string()
    } else {
        s.to_string()
    }
}

/// Print a stdout line meant for scripts, without decoration.
pub fn raw(line: &str) {
    println!("{}", line);
}
