//! 输出样式（owo-colors stylesheet）

use console::Term;
use owo_colors::Style;

/// Centralized stylesheet for table output. The default sheet is plain text.
#[derive(Debug, Default, Clone)]
pub struct Styles {
    pub success: Style,
    pub warning: Style,
    pub error: Style,
    pub info: Style,
    pub muted: Style,
    pub dim: Style,
    pub bold: Style,
    pub header: Style,
    /// Host names in section titles
    pub host: Style,
}

impl Styles {
    /// Colored when stdout is a terminal, `no_color` is off and `NO_COLOR` is unset.
    pub fn for_stdout(no_color: bool) -> Self {
        let mut styles = Self::default();
        if !no_color && Term::stdout().is_term() && std::env::var_os("NO_COLOR").is_none() {
            styles.colorize();
        }
        styles
    }

    pub fn colorize(&mut self) {
        self.success = Style::new().green();
        self.warning = Style::new().yellow();
        self.error = Style::new().red();
        self.info = Style::new().blue();
        self.muted = Style::new().bright_black();
        self.dim = Style::new().dimmed();
        self.bold = Style::new().bold();
        self.header = Style::new().bold().cyan();
        self.host = Style::new().bold().red();
    }
}
