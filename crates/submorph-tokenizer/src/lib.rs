// crates/submorph-tokenizer/src/lib.rs

//! Parse a hostname into `(subdomain, root, levels[tokens])`.

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

use psl::Psl;
use submorph_core::{Error, Level, Result, Token, TokenKind, TokenizedDomain};

/// Tokenize one hostname.
///
/// # Errors
/// Returns [`Error::InvalidDomain`] if a `*` appears anywhere but a leading
/// `*.`, or if no public-suffix root can be determined.
pub fn tokenize(host: &str) -> Result<TokenizedDomain> {
    let original = host.to_string();

    let stripped = host.strip_prefix("*.").unwrap_or(host);
    if stripped.contains('*') {
        return Err(Error::InvalidDomain {
            input: original,
            reason: "'*' may only appear as a leading \"*.\"".into(),
        });
    }
    if stripped.is_empty() {
        return Err(Error::InvalidDomain {
            input: original,
            reason: "empty hostname after wildcard strip".into(),
        });
    }

    let (subdomain, root) = split_root(stripped).ok_or_else(|| Error::InvalidDomain {
        input: original.clone(),
        reason: "could not determine a public-suffix registrable root".into(),
    })?;

    let levels = if subdomain.is_empty() {
        Vec::new()
    } else {
        subdomain
            .split('.')
            .enumerate()
            .map(|(index, label)| Level {
                index: index as u32,
                tokens: tokenize_label(label),
            })
            .collect()
    };

    Ok(TokenizedDomain {
        original,
        subdomain,
        root,
        levels,
    })
}

/// Split `host` into `(subdomain, root)` using the public suffix list.
/// Returns `(String::new(), host)` when `host` is its own registrable root.
fn split_root(host: &str) -> Option<(String, String)> {
    let domain = psl::List.domain(host.as_bytes())?;
    let root = std::str::from_utf8(domain.as_bytes()).ok()?.to_string();
    if host == root {
        return Some((String::new(), root));
    }
    let subdomain = host.strip_suffix(&root)?.strip_suffix('.')?.to_string();
    Some((subdomain, root))
}

/// Tokenize one dot-separated label.
fn tokenize_label(label: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut position = 0u32;
    for piece in dash_pieces(label) {
        for chunk in split_piece(&piece) {
            let kind = classify(&chunk);
            tokens.push(Token::new(chunk, kind, position));
            position += 1;
        }
    }
    tokens
}

/// Split a label on `-`: the first piece keeps no prefix, every subsequent
/// piece carries a leading `-`.
fn dash_pieces(label: &str) -> Vec<String> {
    let mut parts = label.split('-');
    let mut out = Vec::new();
    if let Some(first) = parts.next() {
        if !first.is_empty() {
            out.push(first.to_string());
        }
    }
    for rest in parts {
        out.push(format!("-{rest}"));
    }
    out
}

/// Split one dash-piece around maximal digit runs, except a piece that is
/// solely `-` followed by digits, which is kept whole.
fn split_piece(piece: &str) -> Vec<String> {
    if let Some(digits) = piece.strip_prefix('-') {
        if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
            return vec![piece.to_string()];
        }
    }
    split_digit_runs(piece)
}

/// Split `s` into maximal runs of (all-digit | not-all-digit) characters,
/// in order.
fn split_digit_runs(s: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut cur = String::new();
    let mut cur_is_digit: Option<bool> = None;
    for ch in s.chars() {
        let is_digit = ch.is_ascii_digit();
        if cur_is_digit == Some(is_digit) || cur_is_digit.is_none() {
            cur.push(ch);
        } else {
            out.push(std::mem::take(&mut cur));
            cur.push(ch);
        }
        cur_is_digit = Some(is_digit);
    }
    if !cur.is_empty() {
        out.push(cur);
    }
    out
}

/// Classify a token: leading `-` wins over all-digit, which wins over Word.
fn classify(value: &str) -> TokenKind {
    if value.starts_with('-') {
        TokenKind::Dash
    } else if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) {
        TokenKind::Number
    } else {
        TokenKind::Word
    }
}
