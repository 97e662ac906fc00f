pub mod catppuccin {
    use nu_ansi_term::Color;
    pub struct Mocha;
    impl Mocha {
        pub const TEXT: Color = Color::Rgb(205, 214, 244);
        pub const SURFACE2: Color = Color::Rgb(108, 112, 134);

        pub const RED: Color = Color::Rgb(243, 139, 168);
        pub const YELLOW: Color = Color::Rgb(249, 226, 175);
        pub const PEACH: Color = Color::Rgb(250, 179, 135);
    }
}

use nu_ansi_term::Style;

use self::catppuccin::Mocha;

/// Styles used for diagnostics on stderr.
#[derive(Debug, Clone, Copy)]
pub struct DiagnosticStyle {
    pub headline: Style,
    pub abort: Style,
    pub context: Style,
    pub caret: Style,
    pub gutter: Style,
}

impl DiagnosticStyle {
    pub fn colored() -> Self {
        Self {
            headline: Style::new().bold().fg(Mocha::RED),
            abort: Style::new().fg(Mocha::PEACH),
            context: Style::new().fg(Mocha::TEXT),
            caret: Style::new().bold().fg(Mocha::YELLOW),
            gutter: Style::new().fg(Mocha::SURFACE2),
        }
    }

    pub fn plain() -> Self {
        Self {
            headline: Style::new(),
            abort: Style::new(),
            context: Style::new(),
            caret: Style::new(),
            gutter: Style::new(),
        }
    }

    pub fn pick(color: bool) -> Self {
        if color { Self::colored() } else { Self::plain() }
    }
}
