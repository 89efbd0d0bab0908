//! Bag-of-cells serialization
//!
//! Output is byte-compatible with the reference JS SDK (`toBoc()` defaults:
//! no index, CRC32C trailer), so payload strings match what wallets and
//! explorers produce for the same cell tree.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::cell::{Cell, CellError};

const BOC_MAGIC: [u8; 4] = [0xb5, 0xee, 0x9c, 0x72];
const FLAG_HAS_IDX: u8 = 0x80;
const FLAG_HAS_CRC: u8 = 0x40;

// =============================================================================
// Serialization
// =============================================================================

struct IndexedCell<'a> {
    cell: &'a Cell,
    refs: Vec<usize>,
}

/// Order cells so every reference points forward, deduplicating by hash
fn topological_sort(root: &Cell) -> Vec<IndexedCell<'_>> {
    // Breadth-first collection, insertion ordered
    let mut order: Vec<[u8; 32]> = Vec::new();
    let mut cells: HashMap<[u8; 32], &Cell> = HashMap::new();
    let mut pending: Vec<&Cell> = vec![root];
    while !pending.is_empty() {
        let batch = std::mem::take(&mut pending);
        for cell in batch {
            let hash = cell.hash();
            if cells.contains_key(&hash) {
                continue;
            }
            order.push(hash);
            cells.insert(hash, cell);
            pending.extend(cell.refs().iter().map(|r| r.as_ref()));
        }
    }

    fn visit(
        hash: [u8; 32],
        cells: &HashMap<[u8; 32], &Cell>,
        unvisited: &mut HashSet<[u8; 32]>,
        sorted: &mut Vec<[u8; 32]>,
    ) {
        if !unvisited.remove(&hash) {
            return;
        }
        if let Some(cell) = cells.get(&hash) {
            for r in cell.refs().iter().rev() {
                visit(r.hash(), cells, unvisited, sorted);
            }
        }
        sorted.push(hash);
    }

    let mut unvisited: HashSet<[u8; 32]> = order.iter().copied().collect();
    let mut sorted = Vec::with_capacity(order.len());
    for hash in &order {
        visit(*hash, &cells, &mut unvisited, &mut sorted);
    }
    sorted.reverse();

    let indexes: HashMap<[u8; 32], usize> =
        sorted.iter().enumerate().map(|(i, h)| (*h, i)).collect();

    sorted
        .iter()
        .filter_map(|hash| cells.get(hash).copied())
        .map(|cell| IndexedCell {
            cell,
            refs: cell
                .refs()
                .iter()
                .filter_map(|r| indexes.get(&r.hash()).copied())
                .collect(),
        })
        .collect()
}

fn byte_width(n: usize) -> usize {
    let bits = usize::BITS - n.leading_zeros();
    (bits as usize).div_ceil(8).max(1)
}

fn push_uint(out: &mut Vec<u8>, value: usize, bytes: usize) {
    let be = (value as u64).to_be_bytes();
    out.extend_from_slice(&be[8 - bytes..]);
}

/// Serialize a cell tree with a single root
pub fn serialize(root: &Cell) -> Vec<u8> {
    let cells = topological_sort(root);
    let size_bytes = byte_width(cells.len());

    let total_cell_size: usize = cells
        .iter()
        .map(|c| 2 + c.cell.bit_len().div_ceil(8) + c.refs.len() * size_bytes)
        .sum();
    let offset_bytes = byte_width(total_cell_size);

    let mut out = Vec::with_capacity(16 + total_cell_size + 4);
    out.extend_from_slice(&BOC_MAGIC);
    out.push(FLAG_HAS_CRC | size_bytes as u8);
    out.push(offset_bytes as u8);
    push_uint(&mut out, cells.len(), size_bytes);
    push_uint(&mut out, 1, size_bytes);
    push_uint(&mut out, 0, size_bytes);
    push_uint(&mut out, total_cell_size, offset_bytes);
    push_uint(&mut out, 0, size_bytes);

    for indexed in &cells {
        out.extend_from_slice(&indexed.cell.descriptors());
        out.extend_from_slice(&indexed.cell.padded_data());
        for r in &indexed.refs {
            push_uint(&mut out, *r, size_bytes);
        }
    }

    let crc = crc32c(&out);
    out.extend_from_slice(&crc.to_le_bytes());
    out
}

pub fn serialize_base64(root: &Cell) -> String {
    STANDARD.encode(serialize(root))
}

// =============================================================================
// Deserialization
// =============================================================================

struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn take(&mut self, n: usize) -> Result<&'a [u8], BocError> {
        let end = self.pos.checked_add(n).ok_or(BocError::Truncated)?;
        let slice = self.data.get(self.pos..end).ok_or(BocError::Truncated)?;
        self.pos = end;
        Ok(slice)
    }

    fn byte(&mut self) -> Result<u8, BocError> {
        Ok(self.take(1)?[0])
    }

    fn uint(&mut self, bytes: usize) -> Result<usize, BocError> {
        Ok(self
            .take(bytes)?
            .iter()
            .fold(0usize, |acc, b| (acc << 8) | *b as usize))
    }
}

struct RawCell {
    data: Vec<u8>,
    bit_len: usize,
    refs: Vec<usize>,
}

/// Parse a single-root bag of cells
pub fn deserialize(bytes: &[u8]) -> Result<Cell, BocError> {
    let mut r = Reader { data: bytes, pos: 0 };

    if r.take(4)? != BOC_MAGIC {
        return Err(BocError::InvalidMagic);
    }

    let flags = r.byte()?;
    let has_idx = flags & FLAG_HAS_IDX != 0;
    let has_crc = flags & FLAG_HAS_CRC != 0;
    let size_bytes = (flags & 0x07) as usize;
    if size_bytes == 0 || size_bytes > 4 {
        return Err(BocError::InvalidHeader(format!("size_bytes = {size_bytes}")));
    }
    let offset_bytes = r.byte()? as usize;
    if offset_bytes == 0 || offset_bytes > 8 {
        return Err(BocError::InvalidHeader(format!(
            "offset_bytes = {offset_bytes}"
        )));
    }

    let cell_count = r.uint(size_bytes)?;
    let root_count = r.uint(size_bytes)?;
    let _absent = r.uint(size_bytes)?;
    let _total_cell_size = r.uint(offset_bytes)?;
    if root_count == 0 {
        return Err(BocError::InvalidHeader("no roots".to_string()));
    }
    if root_count > cell_count {
        return Err(BocError::InvalidHeader(format!(
            "{root_count} roots for {cell_count} cells"
        )));
    }

    let mut roots = Vec::with_capacity(root_count);
    for _ in 0..root_count {
        roots.push(r.uint(size_bytes)?);
    }
    if has_idx {
        let index_len = cell_count
            .checked_mul(offset_bytes)
            .ok_or(BocError::Truncated)?;
        r.take(index_len)?;
    }

    let mut raw = Vec::with_capacity(cell_count.min(bytes.len()));
    for _ in 0..cell_count {
        raw.push(read_cell(&mut r, size_bytes)?);
    }

    if has_crc {
        let body_end = r.pos;
        let stored = r.take(4)?;
        let stored = u32::from_le_bytes([stored[0], stored[1], stored[2], stored[3]]);
        let computed = crc32c(&bytes[..body_end]);
        if stored != computed {
            return Err(BocError::ChecksumMismatch);
        }
    }

    // References only point forward, so build from the tail
    let mut built: Vec<Option<Arc<Cell>>> = vec![None; cell_count];
    for idx in (0..cell_count).rev() {
        let raw_cell = &raw[idx];
        let mut refs = Vec::with_capacity(raw_cell.refs.len());
        for &ref_idx in &raw_cell.refs {
            if ref_idx <= idx {
                return Err(BocError::InvalidReference { from: idx, to: ref_idx });
            }
            let child = built
                .get(ref_idx)
                .and_then(|c| c.clone())
                .ok_or(BocError::InvalidReference { from: idx, to: ref_idx })?;
            refs.push(child);
        }
        let cell = Cell::from_parts(raw_cell.data.clone(), raw_cell.bit_len, refs)?;
        built[idx] = Some(Arc::new(cell));
    }

    let root = roots[0];
    built
        .get(root)
        .and_then(|c| c.clone())
        .map(|c| c.as_ref().clone())
        .ok_or(BocError::InvalidReference { from: 0, to: root })
}

fn read_cell(r: &mut Reader<'_>, size_bytes: usize) -> Result<RawCell, BocError> {
    let d1 = r.byte()?;
    let d2 = r.byte()?;

    let ref_count = (d1 & 0x07) as usize;
    if ref_count > 4 {
        return Err(BocError::InvalidCell("more than 4 references".to_string()));
    }
    if d1 & 0x08 != 0 {
        return Err(BocError::InvalidCell("exotic cells are not supported".to_string()));
    }
    if d1 >> 5 != 0 {
        return Err(BocError::InvalidCell("non-zero level mask".to_string()));
    }
    if d1 & 0x10 != 0 {
        // stored hash and depth of a level-0 cell
        r.take(32 + 2)?;
    }

    let data_len = (d2 as usize).div_ceil(2);
    let mut data = r.take(data_len)?.to_vec();
    let bit_len = if d2 % 2 == 1 {
        let last = data.last().copied().unwrap_or(0);
        if last == 0 {
            return Err(BocError::InvalidCell("missing completion tag".to_string()));
        }
        let pad = last.trailing_zeros() as usize + 1;
        if let Some(b) = data.last_mut() {
            *b &= !(1u8 << (pad - 1));
        }
        data_len * 8 - pad
    } else {
        data_len * 8
    };

    let mut refs = Vec::with_capacity(ref_count);
    for _ in 0..ref_count {
        refs.push(r.uint(size_bytes)?);
    }

    Ok(RawCell { data, bit_len, refs })
}

/// Parse a base64 bag of cells (standard or url-safe alphabet)
pub fn parse_base64(boc: &str) -> Result<Cell, BocError> {
    let boc = boc.trim();
    let bytes = if boc.contains('-') || boc.contains('_') {
        base64::engine::general_purpose::URL_SAFE.decode(boc)
    } else {
        STANDARD.decode(boc)
    }
    .map_err(|e| BocError::InvalidBase64(e.to_string()))?;
    deserialize(&bytes)
}

/// CRC32C (Castagnoli), reflected
pub(crate) fn crc32c(data: &[u8]) -> u32 {
    let mut crc = !0u32;
    for &byte in data {
        crc ^= byte as u32;
        for _ in 0..8 {
            crc = if crc & 1 != 0 {
                (crc >> 1) ^ 0x82F6_3B78
            } else {
                crc >> 1
            };
        }
    }
    !crc
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BocError {
    #[error("Not a bag of cells: bad magic")]
    InvalidMagic,

    #[error("Invalid bag of cells header: {0}")]
    InvalidHeader(String),

    #[error("Bag of cells is truncated")]
    Truncated,

    #[error("Bag of cells checksum mismatch")]
    ChecksumMismatch,

    #[error("Invalid cell: {0}")]
    InvalidCell(String),

    #[error("Cell {from} references invalid index {to}")]
    InvalidReference { from: usize, to: usize },

    #[error("Invalid base64: {0}")]
    InvalidBase64(String),

    #[error(transparent)]
    Cell(#[from] CellError),
}
