//! Canonical text rendering of a parsed program.
//!
//! The printer walks the tree once, emitting one output line per statement
//! and one per body delimiter. Comments are consumed from a single cursor
//! in source order, so every comment is printed exactly once:
//!
//! - comments on lines before an item become standalone lines above it;
//! - comments on the line where an item ends are appended after it;
//! - comments inside a body stay inside it, at the body's indentation;
//! - whatever remains at the end is printed as standalone lines.

mod expression;
mod layout;
mod statement;

pub use layout::{Category, blank_line_between};

use tracing::trace;

use crate::ast::{Block, ElseBranch, IfStatement, Program, Span, Statement, StatementOrScope};
use crate::config::FormatConfig;
use crate::trivia::Comment;

/// Render `program` with its `comments` interleaved.
pub fn print(program: &Program, comments: &[Comment], config: &FormatConfig) -> String {
    let mut printer = Printer::new(config, comments);
    printer.print_program(program);
    printer.finish()
}

fn needs_blank(prev: Option<Category>, curr: Category) -> bool {
    prev.is_some_and(|prev| blank_line_between(prev, curr))
}

struct Printer<'a> {
    config: &'a FormatConfig,
    comments: &'a [Comment],
    cursor: usize,
    lines: Vec<String>,
}

impl<'a> Printer<'a> {
    fn new(config: &'a FormatConfig, comments: &'a [Comment]) -> Self {
        Self {
            config,
            comments,
            cursor: 0,
            lines: Vec::new(),
        }
    }

    fn print_program(&mut self, program: &Program) {
        let mut prev = None;

        if let Some(version) = &program.version {
            let leading = self.take_before(version.span.start);
            self.push_comments(0, leading);

            let mut line = format!("OPENQASM {};", version.number);
            let trailing = self.take_through_line(version.span.end_line);
            append_comments(&mut line, trailing);
            self.push_line(0, line);
            prev = Some(Category::Version);
        }

        for item in &program.statements {
            self.print_item(0, item, &mut prev);
        }

        let rest = self.take_while(|_| true);
        self.push_comments(0, rest);
    }

    fn print_item(&mut self, level: usize, item: &StatementOrScope, prev: &mut Option<Category>) {
        let span = item.span();
        let category = Category::of(item);

        // Anything before the item's last line cannot share a line with it.
        let standalone = if item.has_body() {
            self.take_while(|c| c.offset < span.start && c.line < span.start_line)
        } else {
            self.take_while(|c| c.offset < span.end && c.line < span.end_line)
        };
        if !standalone.is_empty() {
            if needs_blank(*prev, Category::Comment) {
                self.push_blank();
            }
            self.push_comments(level, standalone);
            *prev = Some(Category::Comment);
        }

        if needs_blank(*prev, category) {
            self.push_blank();
        }
        trace!(?category, line = span.start_line, level, "printing item");

        match item {
            StatementOrScope::Statement(statement, span) => {
                self.print_statement(level, statement, *span);
            }
            StatementOrScope::Scope(block) => {
                let prefix = self.take_before(block.span.start);
                self.open_block(level, "{".to_string(), prefix, block);
                self.close_block(level, block);
            }
        }
        *prev = Some(category);
    }

    fn print_statement(&mut self, level: usize, statement: &Statement, span: Span) {
        if let Statement::If(branch) = statement {
            self.print_if(level, branch, span);
            return;
        }

        match (statement::header(statement), statement.body()) {
            (Some(header), Some(body)) => {
                let prefix = self.take_before(span.start);
                self.open_block(level, format!("{header} {{"), prefix, body);
                self.close_block(level, body);
            }
            _ => {
                let mut line = statement::render(statement);
                let trailing = self.take_through_line(span.end_line);
                append_comments(&mut line, trailing);
                self.push_line(level, line);
            }
        }
    }

    /// Print an `if` and its whole `else if` chain.
    fn print_if(&mut self, level: usize, first: &IfStatement, span: Span) {
        let mut branch = first;
        let mut opening = format!("{} {{", statement::if_header(branch));
        let mut prefix = self.take_before(span.start);

        loop {
            self.open_block(level, opening, prefix, &branch.then_body);
            match &branch.else_branch {
                None => {
                    self.close_block(level, &branch.then_body);
                    return;
                }
                Some(ElseBranch::If(next)) => {
                    prefix = self.take_through_line(branch.then_body.span.end_line);
                    opening = format!("}} else {} {{", statement::if_header(next));
                    branch = &**next;
                }
                Some(ElseBranch::Block(block)) => {
                    let between = self.take_through_line(branch.then_body.span.end_line);
                    self.open_block(level, "} else {".to_string(), between, block);
                    self.close_block(level, block);
                    return;
                }
            }
        }
    }

    /// Emit the opening line and the contents of a body, but not its `}`.
    fn open_block(&mut self, level: usize, mut line: String, prefix: &[Comment], block: &Block) {
        append_comments(&mut line, prefix);
        // A comment after the first body statement on the header line trails that statement.
        let body_start = block
            .statements
            .first()
            .map_or(block.span.end, |item| item.span().start);
        let start_line = block.span.start_line;
        let header = self.take_while(|c| c.line <= start_line && c.offset < body_start);
        append_comments(&mut line, header);
        self.push_line(level, line);

        let mut prev = None;
        for item in &block.statements {
            self.print_item(level + 1, item, &mut prev);
        }

        let inner = self.take_before(block.span.end);
        self.push_comments(level + 1, inner);
    }

    fn close_block(&mut self, level: usize, block: &Block) {
        let mut line = "}".to_string();
        let trailing = self.take_through_line(block.span.end_line);
        append_comments(&mut line, trailing);
        self.push_line(level, line);
    }

    /// Consume comments from the cursor while `keep` holds.
    fn take_while(&mut self, keep: impl Fn(&Comment) -> bool) -> &'a [Comment] {
        let comments = self.comments;
        let start = self.cursor;
        while comments.get(self.cursor).is_some_and(&keep) {
            self.cursor += 1;
        }
        &comments[start..self.cursor]
    }

    fn take_before(&mut self, offset: usize) -> &'a [Comment] {
        self.take_while(|c| c.offset < offset)
    }

    fn take_through_line(&mut self, line: usize) -> &'a [Comment] {
        self.take_while(|c| c.line <= line)
    }

    fn push_line(&mut self, level: usize, text: String) {
        self.lines
            .push(format!("{}{text}", self.config.indent_str(level)));
    }

    fn push_blank(&mut self) {
        self.lines.push(String::new());
    }

    fn push_comments(&mut self, level: usize, comments: &[Comment]) {
        for comment in comments {
            self.push_line(level, comment.text.clone());
        }
    }

    fn finish(self) -> String {
        if self.lines.is_empty() {
            return String::new();
        }
        let mut out = self.lines.join("\n");
        if self.config.trailing_newline() {
            out.push('\n');
        }
        out
    }
}

fn append_comments(line: &mut String, comments: &[Comment]) {
    for comment in comments {
        line.push(' ');
        line.push_str(&comment.text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use crate::trivia::collect_comments;

    fn render_with(source: &str, config: &FormatConfig) -> String {
        let parsed = parse(source).unwrap();
        let comments = collect_comments(&parsed.tokens);
        print(&parsed.program, &comments, config)
    }

    fn render(source: &str) -> String {
        render_with(source, &FormatConfig::default())
    }

    #[test]
    fn test_version_and_statements() {
        assert_eq!(
            render("OPENQASM 3.0;\nqubit[2] q;\nh q[0];"),
            "OPENQASM 3.0;\nqubit[2] q;\nh q[0];\n"
        );
    }

    #[test]
    fn test_include_is_followed_by_blank_line() {
        assert_eq!(
            render("OPENQASM 3.0;\ninclude \"a.inc\";\ninclude \"b.inc\";\nqubit q;"),
            "OPENQASM 3.0;\ninclude \"a.inc\";\ninclude \"b.inc\";\n\nqubit q;\n"
        );
    }

    #[test]
    fn test_gate_definitions_are_set_apart() {
        let source = "qubit q;\ngate a x { h x; }\ngate b x { x x; }\nh q;";
        assert_eq!(
            render(source),
            "qubit q;\n\ngate a x {\n  h x;\n}\ngate b x {\n  x x;\n}\n\nh q;\n"
        );
    }

    #[test]
    fn test_comments_keep_their_lines() {
        let source = "// init\nOPENQASM 3.0;\nqubit q; // main\n";
        assert_eq!(render(source), source);
    }

    #[test]
    fn test_comment_after_include_gets_blank_line() {
        assert_eq!(
            render("include \"a.inc\";\n// qubits\nqubit q;"),
            "include \"a.inc\";\n\n// qubits\nqubit q;\n"
        );
    }

    #[test]
    fn test_comments_inside_bodies() {
        let source = "gate g a { // head\n// lead\nh a; // tail\n/* end */\n} // after\n";
        assert_eq!(
            render(source),
            "gate g a { // head\n  // lead\n  h a; // tail\n  /* end */\n} // after\n"
        );
    }

    #[test]
    fn test_unconsumed_comments_trail() {
        assert_eq!(render("qubit q;\n// bye\n/* done */"), "qubit q;\n// bye\n/* done */\n");
    }

    #[test]
    fn test_comment_inside_statement_moves_above_it() {
        assert_eq!(render("cx a, // first\nb;"), "// first\ncx a, b;\n");
    }

    #[test]
    fn test_comment_after_unbraced_body_trails_the_statement() {
        let formatted = render("if (c) x q; // t");
        assert_eq!(formatted, "if (c) {\n  x q; // t\n}\n");
        assert_eq!(render(&formatted), formatted);

        assert_eq!(render("if (c) { x q; } // t"), "if (c) {\n  x q; // t\n}\n");
        assert_eq!(render("box { } // t"), "box {\n} // t\n");
        assert_eq!(render("box { /* in */ }"), "box { /* in */\n}\n");
    }

    #[test]
    fn test_if_else_chain() {
        let source = "if (c==1) x q; else if (c == 2) { y q; } else { z q; }";
        assert_eq!(
            render(source),
            "if (c == 1) {\n  x q;\n} else if (c == 2) {\n  y q;\n} else {\n  z q;\n}\n"
        );
    }

    #[test]
    fn test_nested_bodies_and_indent_width() {
        let source = "for i in [0:3] { while (b) { reset q; } }";
        assert_eq!(
            render_with(source, &FormatConfig::new(4, true)),
            "for i in [0:3] {\n    while (b) {\n        reset q;\n    }\n}\n"
        );
    }

    #[test]
    fn test_bare_scope_and_empty_body() {
        assert_eq!(render("{ h q; }"), "{\n  h q;\n}\n");
        assert_eq!(render("box { }"), "box {\n}\n");
    }

    #[test]
    fn test_no_trailing_newline() {
        let config = FormatConfig::default().with_trailing_newline(false);
        assert_eq!(render_with("qubit q;", &config), "qubit q;");
    }

    #[test]
    fn test_empty_program() {
        assert_eq!(render(""), "");
        assert_eq!(render("// only\n"), "// only\n");
    }
}
