//! Run-length encoded pattern loading.
//!
//! The accepted text looks like
//!
//! ```text
//! #N Glider
//! x = 3, y = 3, rule = B3/S23
//! bob$2bo$3o!
//! ```
//!
//! Lines before the header, `#` comments included, are skipped. In the body a run count may
//! prefix `b` (dead), `o` (alive) or `$` (end of row), and `!` ends the
//! pattern. Rows shorter than the declared width are padded with dead cells.

use tracing::warn;

use crate::error::{LifeError, Result};
use crate::grid::Grid;
use crate::step::CONWAY_RULE;

/// Dead cells placed around a loaded pattern on every side.
pub const DEFAULT_PATTERN_MARGIN: usize = 50;

/// A decoded pattern before it is placed on a grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    /// Columns, from the `x` header field.
    pub width: usize,
    /// Rows, from the `y` header field.
    pub height: usize,
    pub rule: String,
    /// Exactly `height` rows of exactly `width` cells.
    pub rows: Vec<Vec<bool>>,
}

impl Pattern {
    /// Whether the declared rule is the one the engine runs.
    pub fn is_conway(&self) -> bool {
        let rule = self.rule.to_ascii_uppercase();
        rule == CONWAY_RULE || rule == "23/3"
    }

    /// Places the pattern on a grid with `margin` dead cells on every side.
    pub fn to_grid(&self, margin: usize) -> Result<Grid> {
        let inner = Grid::from_rows(self.rows.clone())?;
        Ok(Grid::with_margin(&inner, margin))
    }
}

/// Largest `x * y` a pattern header may declare.
pub const MAX_PATTERN_CELLS: usize = 1 << 24;

struct Header {
    width: usize,
    height: usize,
    rule: String,
}

/// Whether `line` opens with `x =`, the start of an RLE header.
fn is_header(line: &str) -> bool {
    let line = line.trim_start();
    (line.starts_with('x') || line.starts_with('X')) && line[1..].trim_start().starts_with('=')
}

/// Reads `x = <cols>, y = <rows>[, rule = <rule>]`. The rule runs to the end
/// of the line and may itself contain commas.
fn parse_header(line: &str) -> Result<Header> {
    let mut width = None;
    let mut height = None;
    let mut rule = None;
    let mut rest = line;

    loop {
        let Some((key, after)) = rest.split_once('=') else {
            return Err(LifeError::malformed(format!(
                "header field `{}` is not of the form key = value",
                rest.trim()
            )));
        };
        let key = key.trim().to_ascii_lowercase();
        if key == "rule" {
            rule = Some(after.trim().to_string());
            break;
        }

        let (value, next) = match after.split_once(',') {
            Some((value, next)) => (value.trim(), Some(next)),
            None => (after.trim(), None),
        };
        match key.as_str() {
            "x" => width = Some(parse_dimension("x", value)?),
            "y" => height = Some(parse_dimension("y", value)?),
            _ => {}
        }

        match next {
            Some(next) => rest = next,
            None => break,
        }
    }

    let width = width.ok_or_else(|| LifeError::malformed("header is missing `x`"))?;
    let height = height.ok_or_else(|| LifeError::malformed("header is missing `y`"))?;
    match width.checked_mul(height) {
        Some(cells) if cells <= MAX_PATTERN_CELLS => {}
        _ => {
            return Err(LifeError::malformed(format!(
                "declared size {width}x{height} exceeds {MAX_PATTERN_CELLS} cells"
            )))
        }
    }

    Ok(Header {
        width,
        height,
        rule: rule.unwrap_or_else(|| CONWAY_RULE.to_string()),
    })
}

fn parse_dimension(name: &str, value: &str) -> Result<usize> {
    match value.parse::<usize>() {
        Ok(0) => Err(LifeError::malformed(format!("header `{name}` must be positive"))),
        Ok(n) if n > MAX_PATTERN_CELLS => Err(LifeError::malformed(format!(
            "header `{name}` = {n} exceeds {MAX_PATTERN_CELLS}"
        ))),
        Ok(n) => Ok(n),
        Err(_) => Err(LifeError::malformed(format!(
            "header `{name}` has non-numeric value `{value}`"
        ))),
    }
}

/// Appends a finished row. Rows past the declared height are dropped when
/// dead and rejected when they hold live cells.
fn push_row(rows: &mut Vec<Vec<bool>>, row: Vec<bool>, height: usize) -> Result<()> {
    if rows.len() < height {
        rows.push(row);
        Ok(())
    } else if row.contains(&true) {
        Err(LifeError::malformed(format!(
            "pattern has more rows than the declared {height}"
        )))
    } else {
        Ok(())
    }
}

/// Expands the body into at most `height` rows of at most `width` cells.
/// Tags other than `o` count as dead.
fn parse_body(body: &str, width: usize, height: usize) -> Result<Vec<Vec<bool>>> {
    let mut rows = Vec::new();
    let mut row = Vec::new();
    let mut run: Option<usize> = None;

    for ch in body.chars() {
        if ch == '!' {
            break;
        }
        if let Some(digit) = ch.to_digit(10) {
            let count = run
                .unwrap_or(0)
                .checked_mul(10)
                .and_then(|n| n.checked_add(digit as usize))
                .ok_or_else(|| LifeError::malformed("run count too large"))?;
            run = Some(count);
            continue;
        }
        if ch.is_whitespace() {
            continue;
        }
        let count = run.take().unwrap_or(1);
        match ch {
            '$' => {
                push_row(&mut rows, std::mem::take(&mut row), height)?;
                let blank = count.saturating_sub(1).min(height.saturating_sub(rows.len()));
                rows.extend(std::iter::repeat_with(Vec::new).take(blank));
            }
            'o' => {
                if count > width - row.len() {
                    return Err(LifeError::malformed(format!(
                        "row {} is wider than the declared width {width}",
                        rows.len()
                    )));
                }
                row.extend(std::iter::repeat(true).take(count));
            }
            _ => row.extend(std::iter::repeat(false).take(count.min(width - row.len()))),
        }
    }
    push_row(&mut rows, row, height)?;
    Ok(rows)
}

/// Decodes RLE text.
///
/// Lines before the header are skipped whatever they contain.
///
/// # Errors
///
/// [`LifeError::MalformedPattern`] when no header line is found, when the
/// header is missing `x` or `y` or declares more than
/// [`MAX_PATTERN_CELLS`] cells, when a run count overflows, or when live
/// cells fall outside the declared size.
pub fn parse_pattern(text: &str) -> Result<Pattern> {
    let mut lines = text.lines().map(str::trim).skip_while(|line| !is_header(line));

    let header_line = lines
        .next()
        .ok_or_else(|| LifeError::malformed("missing `x = <cols>, y = <rows>` header"))?;
    let header = parse_header(header_line)?;

    let body: String = lines.collect();
    let mut rows = parse_body(&body, header.width, header.height)?;
    for row in &mut rows {
        row.resize(header.width, false);
    }
    rows.resize(header.height, vec![false; header.width]);

    Ok(Pattern {
        width: header.width,
        height: header.height,
        rule: header.rule,
        rows,
    })
}

/// Decodes RLE text and places it on a grid with the default margin.
pub fn load_pattern(text: &str) -> Result<Grid> {
    let pattern = parse_pattern(text)?;
    if !pattern.is_conway() {
        warn!(rule = %pattern.rule, "pattern declares a rule other than B3/S23, running B3/S23");
    }
    pattern.to_grid(DEFAULT_PATTERN_MARGIN)
}

#[cfg(test)]
mod tests {
    use super::*;

    const GLIDER: &str = "#N Glider\n#C A comment\nx = 3, y = 3, rule = B3/S23\nbob$2bo$3o!\n";

    #[test]
    fn test_parse_glider() {
        let pattern = parse_pattern(GLIDER).unwrap();
        assert_eq!(pattern.width, 3);
        assert_eq!(pattern.height, 3);
        assert_eq!(pattern.rule, "B3/S23");
        assert_eq!(
            pattern.rows,
            vec![
                vec![false, true, false],
                vec![false, false, true],
                vec![true, true, true],
            ]
        );
        assert!(pattern.is_conway());
    }

    #[test]
    fn test_body_across_lines_and_counted_newlines() {
        let text = "x = 4, y = 4\n2o\n2$\n3bo!";
        let pattern = parse_pattern(text).unwrap();
        assert_eq!(pattern.rule, CONWAY_RULE);
        assert_eq!(pattern.rows[0], vec![true, true, false, false]);
        assert_eq!(pattern.rows[1], vec![false; 4]);
        assert_eq!(pattern.rows[2], vec![false, false, false, true]);
        assert_eq!(pattern.rows[3], vec![false; 4]);
    }

    #[test]
    fn test_multi_digit_runs() {
        let pattern = parse_pattern("x = 12, y = 1, rule = B3/S23\n10bo!").unwrap();
        assert!(pattern.rows[0][10]);
        assert_eq!(pattern.rows[0].iter().filter(|&&c| c).count(), 1);
    }

    #[test]
    fn test_text_after_bang_ignored() {
        let pattern = parse_pattern("x = 2, y = 1\n2o!\nthis is trailing text").unwrap();
        assert_eq!(pattern.rows, vec![vec![true, true]]);
    }

    #[test]
    fn test_missing_header() {
        let err = parse_pattern("#C only comments\nbo$2bo!").unwrap_err();
        assert!(matches!(err, LifeError::MalformedPattern { .. }));
        assert!(parse_pattern("").is_err());
    }

    #[test]
    fn test_header_missing_field() {
        let err = parse_pattern("x = 3, rule = B3/S23\n3o!").unwrap_err();
        assert_eq!(
            err,
            LifeError::MalformedPattern {
                reason: "header is missing `y`".to_string()
            }
        );
    }

    #[test]
    fn test_header_bad_number() {
        assert!(parse_pattern("x = three, y = 1\n3o!").is_err());
        assert!(parse_pattern("x = 0, y = 1\n!").is_err());
    }

    #[test]
    fn test_body_overflow_rejected() {
        assert!(parse_pattern("x = 2, y = 1\n3o!").is_err());
        assert!(parse_pattern("x = 2, y = 1\n2o$2o!").is_err());
        // Trailing dead cells and empty rows are tolerated.
        assert!(parse_pattern("x = 2, y = 1\n2o3b$!").is_ok());
    }

    #[test]
    fn test_load_pattern_adds_margin() {
        let grid = load_pattern(GLIDER).unwrap();
        assert_eq!(grid.dimensions(), (103, 103));
        assert_eq!(grid.population(), 5);
        assert!(grid.is_alive(50, 51));
        assert!(grid.is_alive(52, 50));
    }

    #[test]
    fn test_other_rule_still_loads() {
        let pattern = parse_pattern("x = 1, y = 1, rule = B36/S23\no!").unwrap();
        assert!(!pattern.is_conway());
        assert!(load_pattern("x = 1, y = 1, rule = B36/S23\no!").is_ok());
    }

    #[test]
    fn test_huge_run_count_rejected() {
        let err = parse_pattern("x = 2, y = 1\n99999999999999999999999o!").unwrap_err();
        assert_eq!(err, LifeError::malformed("run count too large"));
        // Long dead runs and blank-row runs are clipped to the declared size.
        assert!(parse_pattern("x = 2, y = 2\n99999999999b$o!").is_ok());
        assert!(parse_pattern("x = 2, y = 3\no99999999999$!").is_ok());
        assert!(parse_pattern("x = 2, y = 2\no99999999999$o!").is_err());
    }

    #[test]
    fn test_huge_dimensions_rejected() {
        let err = parse_pattern("x = 18446744073709551615, y = 1\no!").unwrap_err();
        assert!(matches!(err, LifeError::MalformedPattern { .. }));
        assert!(parse_pattern("x = 100000, y = 100000\no!").is_err());
        assert!(parse_pattern("x = 4096, y = 4096\no!").is_ok());
    }

    #[test]
    fn test_rule_with_commas() {
        let pattern = parse_pattern("x = 3, y = 1, rule = B3/S23:T10,10\n3o!").unwrap();
        assert_eq!(pattern.rule, "B3/S23:T10,10");
        assert_eq!(pattern.rows, vec![vec![true; 3]]);
        assert!(!pattern.is_conway());
    }

    #[test]
    fn test_header_found_after_plain_text() {
        let pattern = parse_pattern("Glider, from the wiki\nX = 3, Y = 3\nbob$2bo$3o!").unwrap();
        assert_eq!((pattern.width, pattern.height), (3, 3));
        assert_eq!(pattern.rows[2], vec![true; 3]);
    }
}
