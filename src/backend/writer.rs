//! Output writer with indentation tracking
//!
//! Handles writing generated Go code with tab indentation, the way `gofmt` lays it out.

/// Writer that tracks indentation and builds the generated source
pub struct CodeWriter {
    /// The output buffer
    output: String,
    /// Current indentation level
    indent_level: usize,
    /// Whether we're at the start of a line
    at_line_start: bool,
}

impl Default for CodeWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl CodeWriter {
    pub fn new() -> Self {
        Self {
            output: String::new(),
            indent_level: 0,
            at_line_start: true,
        }
    }

    /// Get the generated output
    pub fn finish(self) -> String {
        self.output
    }

    pub fn indent(&mut self) {
        self.indent_level += 1;
    }

    pub fn dedent(&mut self) {
        self.indent_level = self.indent_level.saturating_sub(1);
    }

    /// Write indentation if at line start
    fn write_indent(&mut self) {
        if self.at_line_start {
            for _ in 0..self.indent_level {
                self.output.push('\t');
            }
            self.at_line_start = false;
        }
    }

    /// Write a string (with auto-indent)
    pub fn write(&mut self, s: &str) {
        if s.is_empty() {
            return;
        }
        self.write_indent();
        self.output.push_str(s);
    }

    /// Write a string and newline
    pub fn writeln(&mut self, s: &str) {
        self.write(s);
        self.newline();
    }

    /// Write just a newline. Blank lines carry no indentation.
    pub fn newline(&mut self) {
        self.output.push('\n');
        self.at_line_start = true;
    }

    /// Write `open`, run `body` one level deeper, then write `close`.
    pub fn block(&mut self, open: &str, close: &str, body: impl FnOnce(&mut Self)) {
        self.writeln(open);
        self.indent();
        body(self);
        self.dedent();
        self.writeln(close);
    }

    pub fn current_indent(&self) -> usize {
        self.indent_level
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_writer_empty_output() {
        assert_eq!(CodeWriter::new().finish(), "");
    }

    #[test]
    fn test_write_and_writeln() {
        let mut writer = CodeWriter::new();
        writer.write("package");
        writer.write(" main");
        writer.newline();
        writer.writeln("");
        assert_eq!(writer.finish(), "package main\n\n");
    }

    #[test]
    fn test_indent_uses_tabs() {
        let mut writer = CodeWriter::new();
        writer.indent();
        writer.indent();
        writer.writeln("x := 1");
        assert_eq!(writer.finish(), "\t\tx := 1\n");
    }

    #[test]
    fn test_blank_line_not_indented() {
        let mut writer = CodeWriter::new();
        writer.indent();
        writer.writeln("a");
        writer.newline();
        writer.writeln("b");
        assert_eq!(writer.finish(), "\ta\n\n\tb\n");
    }

    #[test]
    fn test_dedent_at_zero_stays_zero() {
        let mut writer = CodeWriter::new();
        writer.dedent();
        assert_eq!(writer.current_indent(), 0);
    }

    #[test]
    fn test_nested_blocks() {
        let mut writer = CodeWriter::new();
        writer.block("func main() {", "}", |w| {
            w.block("if ok {", "}", |w| {
                w.writeln("run()");
            });
        });
        assert_eq!(writer.finish(), "func main() {\n\tif ok {\n\t\trun()\n\t}\n}\n");
    }
}
