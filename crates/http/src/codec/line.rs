//! Start line grammar.
//!
//! Both parsers take the line without its CRLF and report offsets relative to the
//! start of that line. A request line is scanned in three phases (method, target,
//! version) separated by exactly one SP; a status line in three phases (version,
//! code, reason) where the reason may be empty.

use http::Method;
use tracing::trace;

use crate::protocol::{
    is_reason_byte, is_version_shaped, status_code, HttpVersion, ParseError, RequestLine, RequestTarget, StatusLine,
};
use crate::utils::{ensure, is_tchar};

/// Parses `method SP request-target SP HTTP-version`.
///
/// Only versions in `versions` are accepted; a well formed version token outside that
/// set is reported as [`ParseError::UnsupportedVersion`].
pub(crate) fn parse_request_line(line: &[u8], versions: &[HttpVersion]) -> Result<RequestLine, ParseError> {
    let malformed = |offset| ParseError::malformed_request_line(line, offset);

    // method
    let method_end = line.iter().position(|b| *b == b' ').ok_or_else(|| malformed(line.len()))?;
    ensure!(method_end > 0, malformed(0));
    if let Some(pos) = line[..method_end].iter().position(|b| !is_tchar(*b)) {
        return Err(malformed(pos));
    }

    // target
    let target_start = method_end + 1;
    let target_len = line[target_start..].iter().position(|b| *b == b' ').ok_or_else(|| malformed(line.len()))?;
    ensure!(target_len > 0, malformed(target_start));
    let target_end = target_start + target_len;

    // version
    let version_start = target_end + 1;
    let version_token = &line[version_start..];
    ensure!(!version_token.is_empty(), malformed(version_start));
    if let Some(pos) = version_token.iter().position(|b| *b == b' ') {
        return Err(malformed(version_start + pos));
    }
    let version = parse_version(version_token, versions).map_err(|e| match e {
        VersionError::Malformed => malformed(version_start),
        VersionError::Unsupported => ParseError::unsupported_version(version_token, version_start),
    })?;

    let method = Method::from_bytes(&line[..method_end]).ok().ok_or_else(|| malformed(0))?;
    let target = RequestTarget::parse(&method, &line[target_start..target_end]).map_err(|e| e.at(target_start))?;

    trace!(%method, %target, %version, "parsed request line");
    Ok(RequestLine { method, target, version })
}

/// Parses `HTTP-version SP status-code SP [ reason-phrase ]`.
///
/// The SP before an empty reason may be missing, so `HTTP/1.1 200` is accepted.
pub(crate) fn parse_status_line(line: &[u8], versions: &[HttpVersion]) -> Result<StatusLine, ParseError> {
    let malformed = |offset| ParseError::malformed_status_line(line, offset);

    // version
    let version_end = line.iter().position(|b| *b == b' ').ok_or_else(|| malformed(line.len()))?;
    let version_token = &line[..version_end];
    let version = parse_version(version_token, versions).map_err(|e| match e {
        VersionError::Malformed => malformed(0),
        VersionError::Unsupported => ParseError::unsupported_version(version_token, 0),
    })?;

    // status code, exactly three digits
    let code_start = version_end + 1;
    let rest = &line[code_start..];
    ensure!(rest.len() >= 3, malformed(code_start));
    if let Some(pos) = rest[..3].iter().position(|b| !b.is_ascii_digit()) {
        return Err(malformed(code_start + pos));
    }
    let code = rest[..3].iter().fold(0u16, |acc, b| acc * 10 + u16::from(b - b'0'));
    let status = status_code(code).ok_or_else(|| malformed(code_start))?;

    // reason
    let reason = match rest.get(3) {
        None => "",
        Some(b' ') => {
            let reason_start = code_start + 4;
            let raw = &line[reason_start..];
            if let Some(pos) = raw.iter().position(|b| !is_reason_byte(*b)) {
                return Err(malformed(reason_start + pos));
            }
            std::str::from_utf8(raw).map_err(|e| malformed(reason_start + e.valid_up_to()))?
        }
        Some(_) => return Err(malformed(code_start + 3)),
    };

    trace!(%version, status = status.as_u16(), reason, "parsed status line");
    Ok(StatusLine { version, status, reason: reason.to_owned() })
}

enum VersionError {
    Malformed,
    Unsupported,
}

fn parse_version(token: &[u8], versions: &[HttpVersion]) -> Result<HttpVersion, VersionError> {
    ensure!(is_version_shaped(token), VersionError::Malformed);
    HttpVersion::from_token(token).filter(|version| versions.contains(version)).ok_or(VersionError::Unsupported)
}
