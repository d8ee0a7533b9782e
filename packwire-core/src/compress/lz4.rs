// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! LZ4 block format codec.
//!
//! Produces and consumes raw LZ4 blocks (no frame header, no checksum), so
//! output interoperates with any other LZ4 block implementation. A block
//! is a run of sequences, each a token byte, optional literal-length
//! extension bytes, the literals, a little-endian 16-bit match offset and
//! optional match-length extension bytes. The last sequence carries
//! literals only.
//!
//! Inputs shorter than [`LIMIT_64K`] are matched with a table of 16-bit
//! positions, larger inputs with 32-bit positions. Both tables are
//! thread-local and zeroed before every use.

use crate::error::Error;
use byteorder::{ByteOrder, LittleEndian};
use std::cell::RefCell;
use tracing::debug;

const MINMATCH: usize = 4;
const LASTLITERALS: usize = 5;
const MFLIMIT: usize = 12;
const ML_BITS: u32 = 4;
const ML_MASK: usize = (1 << ML_BITS) - 1;
const RUN_MASK: usize = (1 << (8 - ML_BITS)) - 1;
const SKIP_STRENGTH: u32 = 6;
const MAX_DISTANCE: usize = 65535;

const HASH_LOG_64K: u32 = 13;
const HASH_LOG_LARGE: u32 = 12;

/// Inputs below this length use the 16-bit position table.
pub const LIMIT_64K: usize = 65536 + (MFLIMIT - 1);

/// Largest input the encoder accepts.
pub const MAX_INPUT_LEN: usize = 0x7E00_0000;

thread_local! {
    static TABLE_64K: RefCell<Vec<u16>> = RefCell::new(vec![0; 1 << HASH_LOG_64K]);
    static TABLE_LARGE: RefCell<Vec<u32>> = RefCell::new(vec![0; 1 << HASH_LOG_LARGE]);
}

/// Upper bound of the encoded size of `len` input bytes.
#[inline(always)]
pub const fn max_compressed_len(len: usize) -> usize {
    len + len / 255 + 16
}

/// Compresses `input` into `output` and returns the number of bytes
/// written. An `output` of [`max_compressed_len`] bytes always suffices.
pub fn encode(input: &[u8], output: &mut [u8]) -> Result<usize, Error> {
    if input.len() < LIMIT_64K {
        encode_64k(input, output)
    } else {
        encode_large(input, output)
    }
}

/// Compresses an input shorter than [`LIMIT_64K`] using 16-bit positions.
pub fn encode_64k(input: &[u8], output: &mut [u8]) -> Result<usize, Error> {
    if input.len() >= LIMIT_64K {
        return Err(Error::unsupported(format!(
            "input of {} bytes is too long for the 64 KiB encoder",
            input.len()
        )));
    }
    TABLE_64K.with(|table| {
        let mut table = table.borrow_mut();
        table.fill(0);
        compress_with(input, output, &mut Table16(&mut table))
    })
}

/// Compresses an input of any length using 32-bit positions.
pub fn encode_large(input: &[u8], output: &mut [u8]) -> Result<usize, Error> {
    if input.len() > MAX_INPUT_LEN {
        return Err(Error::unsupported(format!(
            "input of {} bytes exceeds the LZ4 limit of {MAX_INPUT_LEN}",
            input.len()
        )));
    }
    TABLE_LARGE.with(|table| {
        let mut table = table.borrow_mut();
        table.fill(0);
        compress_with(input, output, &mut Table32(&mut table))
    })
}

trait PositionTable {
    const HASH_LOG: u32;

    fn get(&self, hash: usize) -> usize;

    fn put(&mut self, hash: usize, position: usize);

    #[inline(always)]
    fn hash(sequence: u32) -> usize {
        (sequence.wrapping_mul(2654435761) >> (32 - Self::HASH_LOG)) as usize
    }
}

struct Table16<'t>(&'t mut [u16]);

impl PositionTable for Table16<'_> {
    const HASH_LOG: u32 = HASH_LOG_64K;

    #[inline(always)]
    fn get(&self, hash: usize) -> usize {
        self.0[hash] as usize
    }

    #[inline(always)]
    fn put(&mut self, hash: usize, position: usize) {
        self.0[hash] = position as u16;
    }
}

struct Table32<'t>(&'t mut [u32]);

impl PositionTable for Table32<'_> {
    const HASH_LOG: u32 = HASH_LOG_LARGE;

    #[inline(always)]
    fn get(&self, hash: usize) -> usize {
        self.0[hash] as usize
    }

    #[inline(always)]
    fn put(&mut self, hash: usize, position: usize) {
        self.0[hash] = position as u32;
    }
}

/// Bounds-checked output cursor.
struct Sink<'o> {
    buf: &'o mut [u8],
    pos: usize,
    required: usize,
}

impl Sink<'_> {
    #[inline(always)]
    fn overflow(&self) -> Error {
        Error::buffer_too_small(self.required, self.buf.len())
    }

    #[inline(always)]
    fn push(&mut self, byte: u8) -> Result<(), Error> {
        if self.pos >= self.buf.len() {
            return Err(self.overflow());
        }
        self.buf[self.pos] = byte;
        self.pos += 1;
        Ok(())
    }

    #[inline(always)]
    fn extend(&mut self, bytes: &[u8]) -> Result<(), Error> {
        let end = self.pos + bytes.len();
        if end > self.buf.len() {
            return Err(self.overflow());
        }
        self.buf[self.pos..end].copy_from_slice(bytes);
        self.pos = end;
        Ok(())
    }

    /// Writes the 255-run extension of a length that overflowed its nibble.
    fn push_length(&mut self, mut len: usize) -> Result<(), Error> {
        while len >= 255 {
            self.push(255)?;
            len -= 255;
        }
        self.push(len as u8)
    }

    /// Emits a token and its literals, and the match if there is one.
    fn sequence(&mut self, literals: &[u8], matched: Option<(usize, usize)>) -> Result<(), Error> {
        let lit_len = literals.len();
        let lit_nibble = lit_len.min(RUN_MASK);
        let match_nibble = matched.map_or(0, |(_, len)| (len - MINMATCH).min(ML_MASK));
        self.push(((lit_nibble << ML_BITS) | match_nibble) as u8)?;
        if lit_len >= RUN_MASK {
            self.push_length(lit_len - RUN_MASK)?;
        }
        self.extend(literals)?;
        if let Some((offset, len)) = matched {
            let mut field = [0u8; 2];
            LittleEndian::write_u16(&mut field, offset as u16);
            self.extend(&field)?;
            if len - MINMATCH >= ML_MASK {
                self.push_length(len - MINMATCH - ML_MASK)?;
            }
        }
        Ok(())
    }
}

#[inline(always)]
fn read_u32(input: &[u8], pos: usize) -> u32 {
    LittleEndian::read_u32(&input[pos..pos + 4])
}

/// Length of the common run at `forward` and `back`, stopping at `limit`.
#[inline(always)]
fn common_len(input: &[u8], mut forward: usize, mut back: usize, limit: usize) -> usize {
    let start = forward;
    while forward + 8 <= limit {
        let diff = LittleEndian::read_u64(&input[forward..forward + 8])
            ^ LittleEndian::read_u64(&input[back..back + 8]);
        if diff != 0 {
            return forward + (diff.trailing_zeros() / 8) as usize - start;
        }
        forward += 8;
        back += 8;
    }
    while forward < limit && input[forward] == input[back] {
        forward += 1;
        back += 1;
    }
    forward - start
}

fn compress_with<H: PositionTable>(input: &[u8], output: &mut [u8], table: &mut H) -> Result<usize, Error> {
    let len = input.len();
    let mut sink = Sink {
        buf: output,
        pos: 0,
        required: max_compressed_len(len),
    };
    let mut anchor: usize = 0;

    if len > MFLIMIT {
        // Matches start before `match_start_limit` and end by `match_end_limit`.
        let match_start_limit = len - MFLIMIT;
        let match_end_limit = len - LASTLITERALS;
        table.put(H::hash(read_u32(input, 0)), 0);
        let mut ip: usize = 1;

        'search: loop {
            let mut attempts = 1usize << SKIP_STRENGTH;
            let mut candidate;
            loop {
                if ip >= match_start_limit {
                    break 'search;
                }
                let sequence = read_u32(input, ip);
                let hash = H::hash(sequence);
                candidate = table.get(hash);
                table.put(hash, ip);
                if candidate < ip && ip - candidate <= MAX_DISTANCE && read_u32(input, candidate) == sequence {
                    break;
                }
                ip += attempts >> SKIP_STRENGTH;
                attempts += 1;
            }

            while ip > anchor && candidate > 0 && input[ip - 1] == input[candidate - 1] {
                ip -= 1;
                candidate -= 1;
            }

            let match_len = MINMATCH + common_len(input, ip + MINMATCH, candidate + MINMATCH, match_end_limit);
            sink.sequence(&input[anchor..ip], Some((ip - candidate, match_len)))?;
            ip += match_len;
            anchor = ip;
            if ip >= match_start_limit {
                break;
            }
            table.put(H::hash(read_u32(input, ip - 2)), ip - 2);
        }
    }

    sink.sequence(&input[anchor..], None)?;
    Ok(sink.pos)
}

#[cold]
fn corrupted(message: String) -> Error {
    debug!("lz4 block rejected: {message}");
    Error::corrupted(message)
}

fn read_length(input: &[u8], ip: &mut usize) -> Result<usize, Error> {
    let mut total = 0usize;
    loop {
        let byte = *input
            .get(*ip)
            .ok_or_else(|| corrupted("length run past the end of the block".to_string()))?;
        *ip += 1;
        total = total
            .checked_add(byte as usize)
            .ok_or_else(|| corrupted("length run overflows".to_string()))?;
        if byte != 255 {
            return Ok(total);
        }
    }
}

/// Decompresses one block into `output`, which must be exactly the
/// original length. Fails with [`Error::Corrupted`] if the block does not
/// decode to exactly `output.len()` bytes or refers back past the start
/// of the output.
pub fn decode(input: &[u8], output: &mut [u8]) -> Result<usize, Error> {
    let out_len = output.len();
    let mut ip: usize = 0;
    let mut op: usize = 0;
    loop {
        let token = *input
            .get(ip)
            .ok_or_else(|| corrupted("block ended before its last sequence".to_string()))?;
        ip += 1;

        let mut lit_len = (token >> ML_BITS) as usize;
        if lit_len == RUN_MASK {
            lit_len += read_length(input, &mut ip)?;
        }
        let literals = input
            .get(ip..ip.saturating_add(lit_len))
            .ok_or_else(|| corrupted(format!("{lit_len} literals past the end of the block")))?;
        let out = output
            .get_mut(op..op.saturating_add(lit_len))
            .ok_or_else(|| corrupted(format!("literals overrun the {out_len} byte output")))?;
        out.copy_from_slice(literals);
        ip += lit_len;
        op += lit_len;

        if ip == input.len() {
            break;
        }

        let field = input
            .get(ip..ip + 2)
            .ok_or_else(|| corrupted("truncated match offset".to_string()))?;
        let offset = LittleEndian::read_u16(field) as usize;
        ip += 2;
        if offset == 0 || offset > op {
            return Err(corrupted(format!(
                "match offset {offset} at output position {op}"
            )));
        }

        let mut match_len = (token as usize) & ML_MASK;
        if match_len == ML_MASK {
            match_len += read_length(input, &mut ip)?;
        }
        match_len += MINMATCH;
        let end = op
            .checked_add(match_len)
            .filter(|&end| end <= out_len)
            .ok_or_else(|| corrupted(format!("match overruns the {out_len} byte output")))?;

        let from = op - offset;
        if offset >= match_len {
            output.copy_within(from..from + match_len, op);
        } else {
            for i in 0..match_len {
                output[op + i] = output[from + i];
            }
        }
        op = end;
    }

    if op != out_len {
        return Err(corrupted(format!(
            "block decoded to {op} bytes, expected {out_len}"
        )));
    }
    Ok(op)
}
