// src/lexer/tables/io.rs
use std::{
    io::{BufWriter, Write},
    path::Path,
};

use anyhow::{Context, Result, anyhow, bail};
use serde::{Deserialize, Serialize};
use serde_with::serde_as;

use super::Tables;

// -------------------- JSON (de)serialization --------------------

#[serde_as]
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TablesDisk {
    name: String,
    num_states: u16,
    num_alphabets: u16,
    #[serde_as(as = "[_; 256]")]
    alphabet_of: [u16; 256],
    accept: Vec<bool>,
    label: Vec<String>,
    transitions: Vec<u16>,
}
impl From<&Tables> for TablesDisk {
    fn from(t: &Tables) -> Self {
        Self {
            name: t.name().to_string(),
            num_states: t.num_states(),
            num_alphabets: t.num_alphabets(),
            alphabet_of: *t.alphabet_map(),
            accept: t.accept_flags().to_vec(),
            label: t.labels().to_vec(),
            transitions: t.transition_matrix().to_vec(),
        }
    }
}
impl TablesDisk {
    fn into_tables(self) -> Result<Tables> {
        Tables::new(
            self.name,
            self.num_states,
            self.num_alphabets,
            self.alphabet_of,
            self.accept,
            self.label,
            self.transitions,
        )
    }
}

pub fn save_tables_json(path: &Path, t: &Tables) -> Result<()> {
    let f = std::fs::File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut w = BufWriter::new(f);
    serde_json::to_writer_pretty(&mut w, &TablesDisk::from(t))?;
    w.flush()?;
    Ok(())
}

pub fn load_tables_json_bytes(data: &[u8]) -> Result<Tables> {
    serde_json::from_slice::<TablesDisk>(data)
        .context("failed to parse tables JSON")?
        .into_tables()
}

// -------------------- Compact binary --------------------
//   magic: 8 bytes = "SXDFA001"
//   u32:   num_states
//   u32:   num_alphabets
//   u16:   alphabet_of[256]
//   u8:    accept bits, (num_states + 7) / 8 bytes, LSB first
//   per state: u16 label length + UTF-8 bytes
//   u16:   transitions[num_states * num_alphabets]
//   u16 name length + UTF-8 bytes

const BIN_MAGIC: &[u8; 8] = b"SXDFA001";

pub fn write_tables_bin<W: Write>(w: &mut W, t: &Tables) -> Result<()> {
    w.write_all(BIN_MAGIC)?;
    w.write_all(&(t.num_states() as u32).to_le_bytes())?;
    w.write_all(&(t.num_alphabets() as u32).to_le_bytes())?;
    for &a in t.alphabet_map() {
        w.write_all(&a.to_le_bytes())?;
    }

    let mut bits = vec![0u8; (t.num_states() as usize + 7) / 8];
    for (i, &accept) in t.accept_flags().iter().enumerate() {
        if accept {
            bits[i / 8] |= 1 << (i % 8);
        }
    }
    w.write_all(&bits)?;

    for label in t.labels() {
        write_str(w, label)?;
    }
    for &s in t.transition_matrix() {
        w.write_all(&s.to_le_bytes())?;
    }
    write_str(w, t.name())?;
    Ok(())
}

fn write_str<W: Write>(w: &mut W, s: &str) -> Result<()> {
    let len = u16::try_from(s.len()).map_err(|_| anyhow!("string too long: {} bytes", s.len()))?;
    w.write_all(&len.to_le_bytes())?;
    w.write_all(s.as_bytes())?;
    Ok(())
}

pub fn save_tables_bin(path: &Path, t: &Tables) -> Result<()> {
    let f = std::fs::File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut w = BufWriter::new(f);
    write_tables_bin(&mut w, t)?;
    w.flush()?;
    Ok(())
}

#[inline]
fn take<'a>(buf: &mut &'a [u8], n: usize, what: &str) -> Result<&'a [u8]> {
    if buf.len() < n {
        bail!("truncated {what}: need {n} bytes, have {}", buf.len());
    }
    let (head, rest) = buf.split_at(n);
    *buf = rest;
    Ok(head)
}

#[inline]
fn take_u32(buf: &mut &[u8], what: &str) -> Result<u32> {
    let b = take(buf, 4, what)?;
    Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
}

#[inline]
fn take_u16(buf: &mut &[u8], what: &str) -> Result<u16> {
    let b = take(buf, 2, what)?;
    Ok(u16::from_le_bytes([b[0], b[1]]))
}

fn take_str(buf: &mut &[u8], what: &str) -> Result<String> {
    let len = take_u16(buf, what)? as usize;
    let bytes = take(buf, len, what)?;
    String::from_utf8(bytes.to_vec()).with_context(|| format!("{what} is not UTF-8"))
}

pub fn load_tables_bin_bytes(mut data: &[u8]) -> Result<Tables> {
    let magic = take(&mut data, 8, "magic")?;
    if magic != BIN_MAGIC {
        bail!("bad magic in tables .bin");
    }
    let num_states = u16::try_from(take_u32(&mut data, "num_states")?)
        .context("num_states exceeds u16")?;
    let num_alphabets = u16::try_from(take_u32(&mut data, "num_alphabets")?)
        .context("num_alphabets exceeds u16")?;

    let mut alphabet_of = [0u16; 256];
    for a in alphabet_of.iter_mut() {
        *a = take_u16(&mut data, "alphabet_of")?;
    }

    let n = num_states as usize;
    let bits = take(&mut data, (n + 7) / 8, "accept bits")?;
    let accept = (0..n).map(|i| (bits[i / 8] >> (i % 8)) & 1 == 1).collect();

    let mut labels = Vec::with_capacity(n);
    for _ in 0..n {
        labels.push(take_str(&mut data, "label")?);
    }

    let total = n * num_alphabets as usize;
    let mut transitions = Vec::with_capacity(total);
    for _ in 0..total {
        transitions.push(take_u16(&mut data, "transitions")?);
    }
    let name = take_str(&mut data, "name")?;

    Tables::new(
        name,
        num_states,
        num_alphabets,
        alphabet_of,
        accept,
        labels,
        transitions,
    )
}

/// Loads `.json` or `.bin` tables, chosen by extension.
pub fn load_tables_file(path: &Path) -> Result<Tables> {
    let data = std::fs::read(path).with_context(|| format!("read {}", path.display()))?;
    let tables = match path.extension().and_then(|e| e.to_str()) {
        Some("json") => load_tables_json_bytes(&data),
        Some("bin") => load_tables_bin_bytes(&data),
        other => bail!("unsupported tables extension {other:?} for {}", path.display()),
    }
    .with_context(|| format!("load {}", path.display()))?;
    log::debug!(
        "[tables] loaded '{}' from {}: {} states, {} alphabet classes",
        tables.name(),
        path.display(),
        tables.num_states(),
        tables.num_alphabets()
    );
    Ok(tables)
}
