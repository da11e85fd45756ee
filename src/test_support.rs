//! Fixture helpers shared by the unit tests.

use std::fs;
use std::path::Path;

const SAMPLE_RATE: u32 = 44_100;

/// Writes a minimal mono 16-bit PCM WAV of `seconds` length so tests can
/// exercise real file parsing without shipping audio fixtures.
pub(crate) fn write_minimal_wav(path: &Path, seconds: u32) {
    let sample_count = SAMPLE_RATE * seconds;
    let data_len = sample_count * 2;

    let mut bytes = Vec::with_capacity(44 + data_len as usize);
    bytes.extend_from_slice(b"RIFF");
    bytes.extend_from_slice(&(36 + data_len).to_le_bytes());
    bytes.extend_from_slice(b"WAVE");

    bytes.extend_from_slice(b"fmt ");
    bytes.extend_from_slice(&16u32.to_le_bytes());
    bytes.extend_from_slice(&1u16.to_le_bytes()); // PCM
    bytes.extend_from_slice(&1u16.to_le_bytes()); // mono
    bytes.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
    bytes.extend_from_slice(&(SAMPLE_RATE * 2).to_le_bytes()); // byte rate
    bytes.extend_from_slice(&2u16.to_le_bytes()); // block align
    bytes.extend_from_slice(&16u16.to_le_bytes()); // bits per sample

    bytes.extend_from_slice(b"data");
    bytes.extend_from_slice(&data_len.to_le_bytes());
    bytes.resize(44 + data_len as usize, 0);

    fs::write(path, bytes).expect("wav fixture should be writable");
}
