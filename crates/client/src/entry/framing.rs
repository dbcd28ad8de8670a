#![forbid(unsafe_code)]

use std::io::{BufRead, Write};

const MAX_CONTENT_LENGTH_BYTES: usize = 16 * 1024 * 1024;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransportMode {
    NewlineJson,
    ContentLength,
}

impl TransportMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "newline" | "newline-json" | "ndjson" => Some(Self::NewlineJson),
            "content-length" | "lsp" => Some(Self::ContentLength),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::NewlineJson => "newline",
            Self::ContentLength => "content-length",
        }
    }
}

pub fn detect_mode_from_first_line(line: &str) -> Option<TransportMode> {
    let trimmed = line.trim_start();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        return Some(TransportMode::NewlineJson);
    }
    let lower = trimmed.to_ascii_lowercase();
    if lower.starts_with("content-length:") || lower.starts_with("content-type:") {
        return Some(TransportMode::ContentLength);
    }
    None
}

pub(crate) fn parse_content_length_header(line: &str) -> Option<usize> {
    let (key, value) = line.trim().split_once(':')?;
    if !key.trim().eq_ignore_ascii_case("content-length") {
        return None;
    }
    value.trim().parse::<usize>().ok()
}

/// Reads headers up to the blank line, then the body. `first_header` is a line the
/// caller already consumed. Returns `None` on EOF.
pub(crate) fn read_content_length_frame<R: BufRead>(
    reader: &mut R,
    first_header: Option<String>,
) -> std::io::Result<Option<Vec<u8>>> {
    let mut header = match first_header {
        Some(seed) => seed,
        None => {
            let mut line = String::new();
            if reader.read_line(&mut line)? == 0 {
                return Ok(None);
            }
            line
        }
    };

    let mut content_length = parse_content_length_header(&header);
    while !header.trim_end().is_empty() {
        header.clear();
        if reader.read_line(&mut header)? == 0 {
            return Ok(None);
        }
        if content_length.is_none() {
            content_length = parse_content_length_header(&header);
        }
    }

    let Some(len) = content_length else {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            "Missing Content-Length header",
        ));
    };
    if len > MAX_CONTENT_LENGTH_BYTES {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            "Content-Length exceeds max allowed size",
        ));
    }

    let mut body = vec![0u8; len];
    reader.read_exact(&mut body)?;
    Ok(Some(body))
}

pub(crate) fn write_frame<W: Write>(
    writer: &mut W,
    mode: TransportMode,
    body: &str,
) -> std::io::Result<()> {
    match mode {
        TransportMode::NewlineJson => writeln!(writer, "{body}")?,
        TransportMode::ContentLength => {
            write!(writer, "Content-Length: {}\r\n\r\n", body.len())?;
            writer.write_all(body.as_bytes())?;
        }
    }
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn first_line_picks_framing() {
        assert_eq!(
            detect_mode_from_first_line("  {\"cmd\": []}"),
            Some(TransportMode::NewlineJson)
        );
        assert_eq!(
            detect_mode_from_first_line("Content-Length: 12\r\n"),
            Some(TransportMode::ContentLength)
        );
        assert_eq!(detect_mode_from_first_line("\r\n"), None);
        assert_eq!(detect_mode_from_first_line("hello"), None);
    }

    #[test]
    fn content_length_frame_reads_exact_body() {
        let input = "Content-Type: application/json\r\nContent-Length: 2\r\n\r\n{}{\"x\":1}";
        let mut reader = Cursor::new(input.as_bytes());
        let body = read_content_length_frame(&mut reader, None).unwrap().unwrap();
        assert_eq!(body, b"{}");
    }

    #[test]
    fn missing_length_is_invalid_data() {
        let mut reader = Cursor::new("X-Other: 1\r\n\r\n".as_bytes());
        let err = read_content_length_frame(&mut reader, None).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
    }

    #[test]
    fn eof_mid_header_is_end_of_stream() {
        let mut reader = Cursor::new("Content-Length: 5\r\n".as_bytes());
        assert!(read_content_length_frame(&mut reader, None).unwrap().is_none());
    }

    #[test]
    fn written_frames_match_mode() {
        let mut out = Vec::new();
        write_frame(&mut out, TransportMode::ContentLength, "{\"a\":1}").unwrap();
        write_frame(&mut out, TransportMode::NewlineJson, "{}").unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Content-Length: 7\r\n\r\n{\"a\":1}{}\n"
        );
    }
}
