//! Splitting of an input line into chained command segments.
//!
//! A line is a sequence of segments separated by `;`, `&&` or `||`. The scan is
//! purely textual: operators inside quotes still split the line.

/// The gate in front of a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// First segment of the line; always runs.
    None,
    /// Preceded by `&&`; runs only after a zero status.
    And,
    /// Preceded by `||`; runs only after a non-zero status.
    Or,
    /// Preceded by `;`; always runs.
    Semi,
}

impl Operator {
    /// Whether a segment behind this gate runs given the last status.
    pub fn permits(self, last_status: i32) -> bool {
        match self {
            Operator::None | Operator::Semi => true,
            Operator::And => last_status == 0,
            Operator::Or => last_status != 0,
        }
    }
}

/// One command unit of a line together with the operator gating it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
    pub text: &'a str,
    pub operator: Operator,
}

/// Splits `line` into segments, scanning left to right.
///
/// Two-character operators are matched before `;`, and a lone `|` or `&` is
/// ordinary text. Empty segments are kept; they tokenize to nothing and are
/// skipped at execution.
pub fn split_into_segments(line: &str) -> Vec<Segment<'_>> {
    let bytes = line.as_bytes();
    let mut out = Vec::new();
    let mut operator = Operator::None;
    let mut start = 0;
    let mut pos = 0;

    while pos < bytes.len() {
        let (next, width) = match (bytes[pos], bytes.get(pos + 1)) {
            (b'|', Some(b'|')) => (Operator::Or, 2),
            (b'&', Some(b'&')) => (Operator::And, 2),
            (b';', _) => (Operator::Semi, 1),
            _ => {
                pos += 1;
                continue;
            }
        };
        out.push(Segment {
            text: &line[start..pos],
            operator,
        });
        operator = next;
        pos += width;
        start = pos;
    }

    out.push(Segment {
        text: &line[start..],
        operator,
    });
    out
}
