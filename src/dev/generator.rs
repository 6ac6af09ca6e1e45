// src/dev/generator.rs
// Random source text shared by fuzz_scan and the property tests.

use rand::Rng;

/// Mixed C-like text of at least `target_len` bytes: identifiers,
/// numbers, strings with escapes, comments, brackets (balanced or not), and
/// the occasional non-ASCII character.
pub fn gen_source<R: Rng>(rng: &mut R, target_len: usize) -> String {
    let mut out = String::with_capacity(target_len + target_len / 8);
    while out.len() < target_len {
        let roll = rng.random_range(0u32..100);
        match roll {
            0..=21 => push_ident(rng, &mut out),
            22..=31 => push_int(rng, &mut out),
            32..=46 => push_ws(rng, &mut out),
            47..=54 => push_string(rng, &mut out),
            55..=59 => push_line_comment(rng, &mut out),
            60..=64 => push_block_comment(rng, &mut out),
            65..=69 => out.push(random_non_ascii(rng)),
            70..=99 => push_punct(rng, &mut out),
            _ => unreachable!(),
        }
    }
    out
}

/// Balanced brackets around identifiers and spaces, nested at most
/// `max_depth` deep. Contains no quotes, escapes or comments.
pub fn gen_balanced<R: Rng>(rng: &mut R, max_depth: usize) -> String {
    let mut out = String::new();
    push_group(rng, &mut out, max_depth);
    out
}

fn push_group<R: Rng>(rng: &mut R, out: &mut String, depth: usize) {
    const PAIRS: [(char, char); 3] = [('(', ')'), ('[', ']'), ('{', '}')];
    let (open, close) = PAIRS[rng.random_range(0..PAIRS.len())];
    out.push(open);
    let items = rng.random_range(0..=4);
    for _ in 0..items {
        if depth > 1 && rng.random_bool(0.4) {
            push_group(rng, out, depth - 1);
        } else if rng.random_bool(0.5) {
            push_ident(rng, out);
        } else {
            out.push(' ');
        }
    }
    out.push(close);
}

fn push_ident<R: Rng>(rng: &mut R, out: &mut String) {
    let len = rng.random_range(1..=10);
    out.push(random_alpha(rng));
    for _ in 1..len {
        if rng.random_bool(0.7) {
            out.push(random_alpha(rng));
        } else {
            out.push(random_digit(rng));
        }
    }
}

fn push_int<R: Rng>(rng: &mut R, out: &mut String) {
    let len = rng.random_range(1..=6);
    for _ in 0..len {
        out.push(random_digit(rng));
    }
}

fn push_ws<R: Rng>(rng: &mut R, out: &mut String) {
    let opts: [char; 3] = [' ', '\t', '\n'];
    let len = rng.random_range(1..=4);
    for _ in 0..len {
        out.push(opts[rng.random_range(0..opts.len())]);
    }
}

fn push_string<R: Rng>(rng: &mut R, out: &mut String) {
    let quote = if rng.random_bool(0.8) { '"' } else { '\'' };
    out.push(quote);
    const BODY: &[u8] = b"abc xyz()[]{}\\\"'";
    let len = rng.random_range(0..=12);
    for _ in 0..len {
        out.push(BODY[rng.random_range(0..BODY.len())] as char);
    }
    // Sometimes left unterminated on purpose.
    if rng.random_bool(0.9) {
        out.push(quote);
    }
}

fn push_line_comment<R: Rng>(rng: &mut R, out: &mut String) {
    out.push_str("//");
    const ALPH: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789 +-*/()[]{}\"";
    let len = rng.random_range(0..=24);
    for _ in 0..len {
        out.push(ALPH[rng.random_range(0..ALPH.len())] as char);
    }
    out.push('\n');
}

fn push_block_comment<R: Rng>(rng: &mut R, out: &mut String) {
    out.push_str("/*");
    const BODY: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789 +-()[]{}\n";
    let chunks = rng.random_range(0..=6);
    for _ in 0..chunks {
        let k = rng.random_range(1..=6);
        for _ in 0..k {
            out.push(BODY[rng.random_range(0..BODY.len())] as char);
        }
        if rng.random_bool(0.2) {
            out.push('*');
        }
    }
    if rng.random_bool(0.9) {
        out.push_str("*/");
    }
}

fn push_punct<R: Rng>(rng: &mut R, out: &mut String) {
    let ops = [
        "(", ")", "[", "]", "{", "}", "+", "-", "*", "/", "=", "==", ";", ",", ".", "<", ">", "!",
        "&&", "\\",
    ];
    out.push_str(ops[rng.random_range(0..ops.len())]);
    if rng.random_bool(0.25) {
        out.push(' ');
    }
}

fn random_alpha<R: Rng>(rng: &mut R) -> char {
    let set = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ_";
    set[rng.random_range(0..set.len())] as char
}

fn random_digit<R: Rng>(rng: &mut R) -> char {
    let set = b"0123456789";
    set[rng.random_range(0..set.len())] as char
}

fn random_non_ascii<R: Rng>(rng: &mut R) -> char {
    let set = ['é', 'ß', 'λ', 'あ', '字', '€'];
    set[rng.random_range(0..set.len())]
}
