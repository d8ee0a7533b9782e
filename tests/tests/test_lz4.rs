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

use packwire::{CompressionKind, Error, Packer};
use packwire_core::compress::lz4;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn compress(input: &[u8]) -> Vec<u8> {
    let mut out = vec![0; lz4::max_compressed_len(input.len())];
    let n = lz4::encode(input, &mut out).unwrap();
    out.truncate(n);
    out
}

fn decompress(block: &[u8], len: usize) -> Result<Vec<u8>, Error> {
    let mut out = vec![0; len];
    lz4::decode(block, &mut out)?;
    Ok(out)
}

fn text(len: usize) -> Vec<u8> {
    let words = ["pool", "block", "span", "commit", "rent", "return", "codec"];
    let mut out = Vec::with_capacity(len + 8);
    let mut i = 0usize;
    while out.len() < len {
        out.extend_from_slice(words[(i * 7 + i / 3) % words.len()].as_bytes());
        out.push(b' ');
        i += 1;
    }
    out.truncate(len);
    out
}

#[test]
fn test_repeating_pattern_shrinks() {
    let input: Vec<u8> = b"abcd".iter().copied().cycle().take(10_000).collect();
    let block = compress(&input);
    assert!(block.len() < 100, "compressed to {} bytes", block.len());
    assert_eq!(decompress(&block, input.len()).unwrap(), input);
}

#[test]
fn test_high_entropy_input_stays_within_bound() {
    let mut rng = StdRng::seed_from_u64(7);
    for len in [1usize, 15, 300, 70_000] {
        let mut input = vec![0u8; len];
        rng.fill(&mut input[..]);
        let block = compress(&input);
        assert!(block.len() <= lz4::max_compressed_len(len));
        assert_eq!(decompress(&block, len).unwrap(), input);
    }
}

#[test]
fn test_small_and_large_inputs() {
    for len in [0usize, 1, 12, 13, 1000, lz4::LIMIT_64K - 1, lz4::LIMIT_64K, 300_000] {
        let input = text(len);
        let block = compress(&input);
        assert_eq!(decompress(&block, len).unwrap(), input, "length {len}");
    }
}

#[test]
fn test_reference_decoder_reads_our_blocks() {
    for len in [5usize, 4096, 100_000] {
        let input = text(len);
        let block = compress(&input);
        let restored = lz4_flex::block::decompress(&block, len).unwrap();
        assert_eq!(restored, input);
    }
}

#[test]
fn test_we_read_reference_blocks() {
    let mut rng = StdRng::seed_from_u64(11);
    let mut input = text(50_000);
    // sprinkle noise so the block mixes literals and matches
    for _ in 0..500 {
        let at = rng.gen_range(0..input.len());
        input[at] = rng.gen();
    }
    let block = lz4_flex::block::compress(&input);
    assert_eq!(decompress(&block, input.len()).unwrap(), input);
}

#[test]
fn test_small_table_variant_rejects_large_input() {
    let input = text(lz4::LIMIT_64K + 1);
    let mut out = vec![0; lz4::max_compressed_len(input.len())];
    assert!(matches!(lz4::encode_64k(&input, &mut out), Err(Error::Unsupported(_))));
    let n = lz4::encode_large(&input, &mut out).unwrap();
    assert_eq!(decompress(&out[..n], input.len()).unwrap(), input);
}

#[test]
fn test_output_too_small() {
    let input = text(1000);
    let mut out = vec![0; 10];
    assert!(matches!(lz4::encode(&input, &mut out), Err(Error::BufferTooSmall { .. })));
}

#[test]
fn test_corrupt_blocks_are_reported() {
    // one literal then a match at offset 0
    assert!(matches!(decompress(&[0x10, b'a', 0x00, 0x00], 5), Err(Error::Corrupted(_))));
    // match reaching before the start of the output
    assert!(matches!(decompress(&[0x10, b'a', 0x05, 0x00], 5), Err(Error::Corrupted(_))));
    // five literals announced, two present
    assert!(matches!(decompress(&[0x50, b'a', b'b'], 5), Err(Error::Corrupted(_))));
    // truncated offset
    assert!(matches!(decompress(&[0x10, b'a', 0x01], 5), Err(Error::Corrupted(_))));
    // empty block
    assert!(matches!(decompress(&[], 0), Err(Error::Corrupted(_))));
}

#[test]
fn test_wrong_expected_length_is_corruption() {
    let input = text(2000);
    let block = compress(&input);
    assert!(matches!(decompress(&block, 1999), Err(Error::Corrupted(_))));
    assert!(matches!(decompress(&block, 2001), Err(Error::Corrupted(_))));
}

#[test]
fn test_packer_compress_helpers() {
    let packer = Packer::default().max_decompressed_len(4096);
    let input = text(4000);
    let payload = packer.compress(CompressionKind::Lz4, &input).unwrap();
    assert!(payload.len() < input.len());
    assert_eq!(packer.decompress(CompressionKind::Lz4, &payload).unwrap(), input);

    let too_big = packer.compress(CompressionKind::Lz4, &text(5000)).unwrap();
    assert!(matches!(
        packer.decompress(CompressionKind::Lz4, &too_big),
        Err(Error::InvalidFormat(_))
    ));
    assert_eq!(packer.compress(CompressionKind::None, b"raw").unwrap(), b"raw");
}
