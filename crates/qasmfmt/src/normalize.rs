//! Lenient text normalization applied before parsing.
//!
//! Puts each `;`-terminated statement on its own line and repairs a few
//! common spacing omissions (`qubit[2]q`, `hq[0]`, `measureq->c`) so that
//! concatenated input still parses. A comment written after a `;` on the
//! same line stays on that statement's line. Text inside comments and
//! string literals is never rewritten.
//!
//! Already well-spaced statements pass through unchanged apart from
//! whitespace trimming.

/// Every reserved word; a line made of one of these alone is never split.
const KEYWORDS: &[&str] = &[
    "OPENQASM", "include", "qubit", "bit", "int", "uint", "float", "angle", "bool", "complex",
    "duration", "stretch", "array", "const", "input", "output", "let", "gate", "def", "extern",
    "box", "if", "else", "for", "while", "in", "return", "break", "continue", "end", "measure",
    "reset", "barrier", "delay", "ctrl", "negctrl", "inv", "pow", "pi", "tau", "euler", "true",
    "false",
];

/// Statement keywords preferred as the split point of a concatenated run.
const OPERATION_KEYWORDS: &[&str] = &["measure", "reset", "barrier"];

/// Declaration keywords whose missing space before the name is repaired.
const DECLARATION_KEYWORDS: &[&str] = &["qubit", "bit"];

/// Normalize `source` into one statement per line with spacing repaired.
pub fn normalize(source: &str) -> String {
    let joined = split_statements(source).join("\n");
    let mut state = LineState::default();
    joined
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| state.fix_line(line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Split on `;` outside comments and strings.
///
/// Fragments that are empty after trimming are dropped; a trailing fragment
/// without `;` is kept as written.
fn split_statements(source: &str) -> Vec<String> {
    let bytes = source.as_bytes();
    let mut statements = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'"' => i = skip_string(bytes, i),
            b'/' if bytes.get(i + 1) == Some(&b'/') => i = skip_line_comment(bytes, i),
            b'/' if bytes.get(i + 1) == Some(&b'*') => i = skip_block_comment(source, i),
            b';' => {
                let body = source[start..i].trim();
                let end = trailing_comments_end(source, i + 1);
                let trailing = source[i + 1..end].trim();

                let mut statement = String::new();
                if !body.is_empty() {
                    statement.push_str(body);
                    if ends_in_line_comment(body) {
                        statement.push('\n');
                    }
                    statement.push(';');
                }
                if !trailing.is_empty() {
                    if !statement.is_empty() {
                        statement.push(' ');
                    }
                    statement.push_str(trailing);
                }
                if !statement.is_empty() {
                    statements.push(statement);
                }

                start = end;
                i = end;
            }
            _ => i += 1,
        }
    }

    let rest = source[start..].trim();
    if !rest.is_empty() {
        statements.push(rest.to_string());
    }
    statements
}

/// End of the comments following a `;` on the same line.
fn trailing_comments_end(source: &str, from: usize) -> usize {
    let bytes = source.as_bytes();
    let mut i = from;
    loop {
        while i < bytes.len() && matches!(bytes[i], b' ' | b'\t' | b'\r') {
            i += 1;
        }
        if source[i..].starts_with("//") {
            return skip_line_comment(bytes, i);
        }
        if source[i..].starts_with("/*") {
            i = skip_block_comment(source, i);
            continue;
        }
        return i;
    }
}

/// Index just past a string literal starting at `start`, stopping at a
/// line break if the literal is unterminated.
fn skip_string(bytes: &[u8], start: usize) -> usize {
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'"' => return i + 1,
            b'\n' => return i,
            _ => i += 1,
        }
    }
    i
}

/// Index of the line break ending a `//` comment, or end of input.
fn skip_line_comment(bytes: &[u8], start: usize) -> usize {
    bytes[start..]
        .iter()
        .position(|&b| b == b'\n')
        .map_or(bytes.len(), |p| start + p)
}

/// Index just past the `*/` closing a block comment, or end of input.
fn skip_block_comment(source: &str, start: usize) -> usize {
    source[start + 2..]
        .find("*/")
        .map_or(source.len(), |p| start + 2 + p + 2)
}

/// Whether `text` ends inside a `//` comment, so a `;` appended to it would
/// be swallowed.
fn ends_in_line_comment(text: &str) -> bool {
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'"' => i = skip_string(bytes, i),
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                i = skip_line_comment(bytes, i);
                if i >= bytes.len() {
                    return true;
                }
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => i = skip_block_comment(text, i),
            _ => i += 1,
        }
    }
    false
}

/// Whether `text` leaves a block comment open at its end.
fn ends_inside_block_comment(text: &str) -> bool {
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'"' => i = skip_string(bytes, i),
            b'/' if bytes.get(i + 1) == Some(&b'/') => return false,
            b'/' if bytes.get(i + 1) == Some(&b'*') => match text[i + 2..].find("*/") {
                Some(p) => i += 2 + p + 2,
                None => return true,
            },
            _ => i += 1,
        }
    }
    false
}

/// Byte index where the first comment on a line starts.
fn comment_start(line: &str) -> Option<usize> {
    let bytes = line.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'"' => i = skip_string(bytes, i),
            b'/' if matches!(bytes.get(i + 1), Some(b'/' | b'*')) => return Some(i),
            _ => i += 1,
        }
    }
    None
}

/// Per-line state carried across the normalized text.
#[derive(Debug)]
struct LineState {
    in_block_comment: bool,
    /// Whether the next code line begins a new statement.
    at_statement_start: bool,
}

impl Default for LineState {
    fn default() -> Self {
        Self {
            in_block_comment: false,
            at_statement_start: true,
        }
    }
}

impl LineState {
    fn fix_line(&mut self, line: &str) -> String {
        if self.in_block_comment {
            if let Some(p) = line.find("*/") {
                self.in_block_comment = ends_inside_block_comment(&line[p + 2..]);
            }
            return line.to_string();
        }

        let (code, comment) = match comment_start(line) {
            Some(p) => (line[..p].trim_end(), &line[p..]),
            None => (line, ""),
        };
        self.in_block_comment = ends_inside_block_comment(comment);

        if code.is_empty() {
            return line.to_string();
        }

        let fixed = if self.at_statement_start {
            fix_statement(code)
        } else {
            code.to_string()
        };
        self.at_statement_start = code.ends_with(&[';', '{', '}'][..]);

        if comment.is_empty() {
            fixed
        } else {
            format!("{fixed} {comment}")
        }
    }
}

/// Apply the spacing repairs to one statement's code.
fn fix_statement(code: &str) -> String {
    let (body, terminator) = match code.strip_suffix(';') {
        Some(body) => (body.trim_end(), ";"),
        None => (code, ""),
    };

    let mut text = space_include(body);
    text = space_designated_declaration(&text);
    if let Some(split) = split_bare_declaration(&text) {
        text = split;
    }
    if let Some(split) = split_gate_call(&text) {
        text = split;
    }
    text = space_measure_arrow(&text);
    text = space_version(&text);

    text.push_str(terminator);
    text
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

fn is_ident_continue(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// End of the identifier starting at `from`, if one starts there.
fn ident_end(bytes: &[u8], from: usize) -> Option<usize> {
    if !bytes.get(from).copied().is_some_and(is_ident_start) {
        return None;
    }
    let len = bytes[from..]
        .iter()
        .position(|&b| !is_ident_continue(b))
        .unwrap_or(bytes.len() - from);
    Some(from + len)
}

/// End of a non-empty `[...]` group starting at `from`.
fn bracket_end(bytes: &[u8], from: usize) -> Option<usize> {
    if bytes.get(from) != Some(&b'[') {
        return None;
    }
    let close = bytes[from + 1..].iter().position(|&b| b == b']')?;
    (close > 0).then_some(from + 1 + close + 1)
}

/// End of an operand whose identifier ends at `ident_end`: past one
/// optional `[...]` group.
fn operand_end(bytes: &[u8], ident_end: usize) -> usize {
    bracket_end(bytes, ident_end).unwrap_or(ident_end)
}

fn is_identifier(text: &str) -> bool {
    ident_end(text.as_bytes(), 0) == Some(text.len())
}

fn insert_spaces(text: &str, mut positions: Vec<usize>) -> String {
    positions.sort_unstable();
    positions.dedup();
    let mut out = String::with_capacity(text.len() + positions.len());
    let mut copied = 0;
    for pos in positions {
        out.push_str(&text[copied..pos]);
        out.push(' ');
        copied = pos;
    }
    out.push_str(&text[copied..]);
    out
}

/// `include"file"` becomes `include "file"`.
fn space_include(text: &str) -> String {
    let bytes = text.as_bytes();
    let positions = text
        .match_indices("include\"")
        .filter(|&(pos, _)| pos == 0 || !is_ident_continue(bytes[pos - 1]))
        .filter(|&(pos, _)| text[pos + "include\"".len()..].contains('"'))
        .map(|(pos, _)| pos + "include".len())
        .collect();
    insert_spaces(text, positions)
}

/// `qubit[2]q` becomes `qubit[2] q`; likewise for `bit`.
fn space_designated_declaration(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut positions = Vec::new();
    for keyword in DECLARATION_KEYWORDS {
        for (pos, _) in text.match_indices(*keyword) {
            if pos > 0 && is_ident_continue(bytes[pos - 1]) {
                continue;
            }
            if let Some(close) = bracket_end(bytes, pos + keyword.len()) {
                if bytes.get(close).copied().is_some_and(is_ident_start) {
                    positions.push(close);
                }
            }
        }
    }
    insert_spaces(text, positions)
}

/// A statement that is exactly `qubitq` or `bitc`.
fn split_bare_declaration(text: &str) -> Option<String> {
    DECLARATION_KEYWORDS.iter().find_map(|keyword| {
        let rest = text.strip_prefix(*keyword)?;
        is_identifier(rest).then(|| format!("{keyword} {rest}"))
    })
}

/// Where to split a run like `cxq` into gate name and operand name.
///
/// A run opening with a statement keyword splits after the keyword;
/// otherwise the operand takes the last identifier-start letter.
fn split_point(run: &str) -> Option<usize> {
    if KEYWORDS.contains(&run) {
        return None;
    }
    let bytes = run.as_bytes();
    for keyword in OPERATION_KEYWORDS {
        if run.len() > keyword.len()
            && run.starts_with(*keyword)
            && is_ident_start(bytes[keyword.len()])
        {
            return Some(keyword.len());
        }
    }
    (1..run.len()).rev().find(|&i| is_ident_start(bytes[i]))
}

/// A statement with no whitespace of the form `hq`, `hq[0]` or
/// `cxq[0],q[1]`.
fn split_gate_call(text: &str) -> Option<String> {
    if text.contains(char::is_whitespace) {
        return None;
    }
    let bytes = text.as_bytes();
    let run_end = ident_end(bytes, 0)?;
    let run = &text[..run_end];
    let first_end = operand_end(bytes, run_end);

    if first_end == bytes.len() {
        let split = split_point(run)?;
        return Some(format!("{} {}", &run[..split], &text[split..]));
    }

    if bytes[first_end] != b',' {
        return None;
    }
    let second_start = first_end + 1;
    let second_ident_end = ident_end(bytes, second_start)?;
    if operand_end(bytes, second_ident_end) != bytes.len() {
        return None;
    }
    let split = split_point(run)?;
    Some(format!(
        "{} {}, {}",
        &run[..split],
        &text[split..first_end],
        &text[second_start..]
    ))
}

/// `measureq->c` becomes `measure q -> c`.
fn space_measure_arrow(text: &str) -> String {
    const MEASURE: &str = "measure";
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len() + 4);
    let mut copied = 0;

    for (pos, _) in text.match_indices(MEASURE) {
        if pos < copied || (pos > 0 && is_ident_continue(bytes[pos - 1])) {
            continue;
        }
        let first_start = pos + MEASURE.len();
        let Some(first_ident_end) = ident_end(bytes, first_start) else {
            continue;
        };
        let first_end = operand_end(bytes, first_ident_end);
        if !text[first_end..].starts_with("->") {
            continue;
        }
        let second_start = first_end + 2;
        let Some(second_ident_end) = ident_end(bytes, second_start) else {
            continue;
        };
        let second_end = operand_end(bytes, second_ident_end);

        out.push_str(&text[copied..pos]);
        out.push_str("measure ");
        out.push_str(&text[first_start..first_end]);
        out.push_str(" -> ");
        out.push_str(&text[second_start..second_end]);
        copied = second_end;
    }

    out.push_str(&text[copied..]);
    out
}

/// `OPENQASM3.0` becomes `OPENQASM 3.0`.
fn space_version(text: &str) -> String {
    match text.strip_prefix("OPENQASM") {
        Some(rest) if rest.starts_with(|c: char| c.is_ascii_digit()) => {
            format!("OPENQASM {rest}")
        }
        _ => text.to_string(),
    }
}
