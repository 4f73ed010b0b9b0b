use wstail_relay::render::Render;

/// Scrubs ANSI escape sequences out of log lines; viewers get clean plain
/// text regardless of how colorful the publisher's output was.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct AnsiScrub;

impl Render for AnsiScrub {
    fn render(&self, line: &str) -> String {
        strip_ansi_escapes::strip_str(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_color_codes() {
        let rendered = AnsiScrub.render("\x1b[31mred\x1b[0m plain");
        assert_eq!(rendered, "red plain");
    }

    #[test]
    fn leaves_plain_lines_alone() {
        assert_eq!(AnsiScrub.render("just text"), "just text");
    }
}
