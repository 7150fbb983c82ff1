use crate::header_bag::GameHeaderBag;
use once_cell::sync::Lazy;
use regex::bytes::Regex;
use serde::Serialize;
use std::io::{self, BufRead};

/// `[Tag "Value"]`. The value runs greedily to the last `"` before the closing bracket.
static HEADER_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?-u)^\[([A-Za-z0-9]+)\s"(.*)"\]$"#).expect("header line pattern is valid")
});

/// One indexed game: where to resume reading it and its header tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameEntry {
    pub offset: u64,
    pub headers: GameHeaderBag,
}

fn strip_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

/// Split a header line into its tag and value, or `None` for any other line.
pub(crate) fn parse_header_line(line: &[u8]) -> Option<(String, String)> {
    let caps = HEADER_LINE.captures(strip_line_ending(line))?;
    let tag = String::from_utf8_lossy(caps.get(1)?.as_bytes()).into_owned();
    let value = String::from_utf8_lossy(caps.get(2)?.as_bytes()).into_owned();
    Some((tag, value))
}

/// Single forward pass over an archive.
///
/// Header lines accumulate into the pending game. Any other line commits the pending
/// game (if it has at least one tag) at the offset recorded after the previous
/// non-header line, then moves that offset past itself. A game still pending at end of
/// input is committed too. Games with no header lines never produce an entry.
pub(crate) fn scan_games<R: BufRead>(reader: &mut R) -> io::Result<Vec<GameEntry>> {
    let mut games = Vec::new();
    let mut current = GameHeaderBag::new();
    let mut last_pos = 0u64;
    let mut pos = 0u64;
    let mut line = Vec::new();

    loop {
        line.clear();
        let read = reader.read_until(b'\n', &mut line)?;
        if read == 0 {
            break;
        }
        pos += read as u64;

        if let Some((tag, value)) = parse_header_line(&line) {
            current.set(tag, value);
            continue;
        }

        if !current.is_empty() {
            games.push(GameEntry {
                offset: last_pos,
                headers: std::mem::take(&mut current),
            });
        }
        last_pos = pos;
    }

    if !current.is_empty() {
        games.push(GameEntry {
            offset: last_pos,
            headers: current,
        });
    }

    Ok(games)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    fn scan(text: &str) -> Vec<GameEntry> {
        scan_games(&mut Cursor::new(text.as_bytes())).unwrap()
    }

    fn offsets(games: &[GameEntry]) -> Vec<u64> {
        games.iter().map(|g| g.offset).collect()
    }

    #[test]
    fn parses_header_line() {
        assert_eq!(
            parse_header_line(b"[Event \"Casual Game\"]\n"),
            Some(("Event".to_string(), "Casual Game".to_string()))
        );
        assert_eq!(
            parse_header_line(b"[Site \"?\"]\r\n"),
            Some(("Site".to_string(), "?".to_string()))
        );
    }

    #[test]
    fn value_runs_to_last_quote() {
        assert_eq!(
            parse_header_line(br#"[Annotator "a \"quoted\" name"]"#),
            Some(("Annotator".to_string(), r#"a \"quoted\" name"#.to_string()))
        );
    }

    #[test]
    fn rejects_non_header_lines() {
        let lines: [&[u8]; 8] = [
            b"",
            b"\n",
            b"1. e4 e5 2. Nf3 *",
            b"[Event\"x\"]",
            b"[Event-Name \"x\"]",
            b"[Event \"x\"] trailing",
            b" [Event \"x\"]",
            b"[Event x]",
        ];
        for line in lines {
            assert_eq!(parse_header_line(line), None, "{:?}", String::from_utf8_lossy(line));
        }
    }

    #[test]
    fn single_game() {
        let games = scan("[Event \"Test\"]\n[Site \"?\"]\n\n1. e4 e5\n");

        assert_eq!(games.len(), 1);
        assert_eq!(games[0].offset, 0);
        assert_eq!(games[0].headers.get("Event").unwrap(), "Test");
        assert_eq!(games[0].headers.get("site").unwrap(), "?");
    }

    #[test]
    fn offset_is_position_after_last_non_header_line() {
        let text = "[Event \"A\"]\n\n1. e4 *\n\n[Event \"B\"]\n\n1. d4 *\n";
        let games = scan(text);

        let second = text.find("[Event \"B\"]").unwrap() as u64;
        assert_eq!(offsets(&games), vec![0, second]);
    }

    #[test]
    fn headers_right_after_movetext_commit_at_end_of_movetext() {
        let text = "[Event \"A\"]\n1. e4 *\n[Event \"B\"]\n1. d4 *\n";
        let games = scan(text);

        // The first movetext line commits game A at 0 and moves the offset past itself.
        let after_first_movetext = "[Event \"A\"]\n1. e4 *\n".len() as u64;
        assert_eq!(offsets(&games), vec![0, after_first_movetext]);
    }

    #[test]
    fn trailing_game_without_separator_is_flushed() {
        let games = scan("1. e4 *\n\n[Event \"Last\"]\n[Result \"*\"]");

        assert_eq!(games.len(), 1);
        assert_eq!(games[0].offset, "1. e4 *\n\n".len() as u64);
        assert_eq!(games[0].headers.len(), 2);
    }

    #[test]
    fn headerless_game_is_dropped() {
        let games = scan("1. e4 e5 *\n\n[Event \"A\"]\n\n1. d4 *\n\n1. c4 *\n");
        assert_eq!(games.len(), 1);
        assert_eq!(games[0].headers.get("Event").unwrap(), "A");
    }

    #[test]
    fn repeated_tag_overwrites_within_game() {
        let games = scan("[Event \"first\"]\n[EVENT \"second\"]\n\n");
        assert_eq!(games[0].headers.iter().collect::<Vec<_>>(), vec![("Event", "second")]);
    }

    #[test]
    fn crlf_offsets_count_both_bytes() {
        let games = scan("\r\n[Event \"A\"]\r\n\r\n1. e4 *\r\n");
        assert_eq!(offsets(&games), vec![2]);
    }

    #[test]
    fn invalid_utf8_does_not_abort_scan() {
        let mut bytes = b"[White \"M\xfcller\"]\n\n\xff\xfe movetext\n".to_vec();
        bytes.extend_from_slice(b"[Event \"B\"]\n");
        let games = scan_games(&mut Cursor::new(bytes)).unwrap();

        assert_eq!(games.len(), 2);
        assert_eq!(games[0].headers.get("White").unwrap(), "M\u{fffd}ller");
    }

    #[test]
    fn empty_input_has_no_games() {
        assert!(scan("").is_empty());
        assert!(scan("\n\n\n").is_empty());
    }
}
