//! Spectral-peak code generator.
//!
//! Frames the signal with a Hann window, takes FFT magnitudes, picks local
//! peaks and hashes pairs of nearby peaks. The hashes are written in the
//! Echoprint code-string layout: every time offset as five hex digits, then
//! every hash as five hex digits, zlib-compressed and URL-safe base64 encoded.

use crate::codegen::Codegen;
use crate::error::{EchoprintError, Result};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE;
use flate2::Compression;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use rustfft::{FftPlanner, num_complex::Complex};
use std::f32::consts::PI;
use std::io::{Read, Write};

/// Samples per analysis frame.
pub const FRAME_SIZE: usize = 512;

/// Samples between consecutive frames.
pub const HOP_SIZE: usize = 256;

/// Magnitudes below this are never peaks.
const MAGNITUDE_THRESHOLD: f32 = 0.01;

/// How many following peaks each peak is paired with.
const FAN_VALUE: usize = 5;

/// Largest frame distance between paired peaks. Must fit in 6 bits.
const MAX_TIME_DELTA: usize = 63;

/// Hex digits per field in the code string.
const FIELD_WIDTH: usize = 5;

/// One (time offset, hash) pair of a code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeEntry {
    /// Frame index of the anchor peak.
    pub offset: u32,
    /// 20-bit hash of the peak pair.
    pub hash: u32,
}

/// Built-in code generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct SpectralCodegen;

impl SpectralCodegen {
    pub fn new() -> Self {
        Self
    }

    /// Computes the raw code entries without encoding them.
    pub fn entries(&self, samples: &[f32]) -> Result<Vec<CodeEntry>> {
        if samples.len() < FRAME_SIZE {
            return Err(EchoprintError::Fingerprint {
                message: format!(
                    "need at least {} samples, got {}",
                    FRAME_SIZE,
                    samples.len()
                ),
            });
        }

        let frames = frame(samples);
        let magnitudes = fft_magnitude(&frames);
        let peaks = find_peaks(&magnitudes, MAGNITUDE_THRESHOLD);
        Ok(generate_hashes(&peaks))
    }
}

impl Codegen for SpectralCodegen {
    fn generate(&self, samples: &[f32]) -> Result<String> {
        let entries = self.entries(samples)?;
        encode_code(&entries)
    }

    fn name(&self) -> &str {
        "spectral"
    }
}

/// Split samples into overlapping Hann-windowed frames.
///
/// Only whole frames are produced; a trailing partial frame is dropped.
fn frame(samples: &[f32]) -> Vec<Vec<f32>> {
    let window = hann_window(FRAME_SIZE);

    samples
        .windows(FRAME_SIZE)
        .step_by(HOP_SIZE)
        .map(|slice| slice.iter().zip(&window).map(|(s, w)| s * w).collect())
        .collect()
}

fn hann_window(size: usize) -> Vec<f32> {
    let n = size as f32;
    (0..size)
        .map(|i| 0.5 * (1.0 - (2.0 * PI * i as f32 / (n - 1.0)).cos()))
        .collect()
}

/// FFT magnitude spectra for each frame (first `n/2` bins only).
fn fft_magnitude(frames: &[Vec<f32>]) -> Vec<Vec<f32>> {
    let mut planner = FftPlanner::<f32>::new();
    let fft = planner.plan_fft_forward(FRAME_SIZE);
    let mut buffer = vec![Complex { re: 0.0, im: 0.0 }; FRAME_SIZE];

    frames
        .iter()
        .map(|frame| {
            for (slot, &v) in buffer.iter_mut().zip(frame) {
                *slot = Complex { re: v, im: 0.0 };
            }
            fft.process(&mut buffer);
            buffer[..FRAME_SIZE / 2]
                .iter()
                .map(|c| (c.re * c.re + c.im * c.im).sqrt())
                .collect()
        })
        .collect()
}

/// Strict local maxima over a 3x3 time/frequency neighbourhood.
///
/// Returned in (frame, bin) order.
fn find_peaks(spectrogram: &[Vec<f32>], magnitude_threshold: f32) -> Vec<(usize, usize)> {
    let frames = spectrogram.len();
    if frames < 3 {
        return Vec::new();
    }
    let bins = spectrogram[0].len();

    let mut peaks = Vec::new();
    for t in 1..frames - 1 {
        for f in 1..bins - 1 {
            let val = spectrogram[t][f];
            if val < magnitude_threshold {
                continue;
            }

            let is_peak = (t - 1..=t + 1).all(|tt| {
                (f - 1..=f + 1).all(|ff| (tt == t && ff == f) || spectrogram[tt][ff] < val)
            });
            if is_peak {
                peaks.push((t, f));
            }
        }
    }
    peaks
}

/// Pair each peak with up to `FAN_VALUE` later peaks within `MAX_TIME_DELTA` frames.
fn generate_hashes(peaks: &[(usize, usize)]) -> Vec<CodeEntry> {
    let mut entries = Vec::new();

    for (i, &(t1, f1)) in peaks.iter().enumerate() {
        for &(t2, f2) in peaks.iter().skip(i + 1).take(FAN_VALUE) {
            let dt = t2 - t1;
            if dt > MAX_TIME_DELTA {
                break;
            }
            // 7 bits per quantized bin, 6 bits of time delta: 20 bits total
            let hash = (((f1 >> 1) as u32) << 13) | (((f2 >> 1) as u32) << 6) | dt as u32;
            entries.push(CodeEntry {
                offset: t1 as u32,
                hash,
            });
        }
    }

    entries
}

/// Encode entries into a compressed, base64 code string.
pub fn encode_code(entries: &[CodeEntry]) -> Result<String> {
    let mut text = String::with_capacity(entries.len() * FIELD_WIDTH * 2);
    for entry in entries {
        text.push_str(&format!("{:05x}", entry.offset & 0xF_FFFF));
    }
    for entry in entries {
        text.push_str(&format!("{:05x}", entry.hash & 0xF_FFFF));
    }

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(text.as_bytes())?;
    let compressed = encoder.finish()?;

    Ok(URL_SAFE.encode(compressed))
}

/// Decode a code string produced by [`encode_code`].
pub fn decode_code(code: &str) -> Result<Vec<CodeEntry>> {
    let compressed = URL_SAFE
        .decode(code.trim())
        .map_err(|e| EchoprintError::Fingerprint {
            message: format!("Invalid code encoding: {}", e),
        })?;

    let mut text = String::new();
    ZlibDecoder::new(compressed.as_slice())
        .read_to_string(&mut text)
        .map_err(|e| EchoprintError::Fingerprint {
            message: format!("Invalid code compression: {}", e),
        })?;

    if text.len() % (FIELD_WIDTH * 2) != 0 {
        return Err(EchoprintError::Fingerprint {
            message: format!("Code body has odd length {}", text.len()),
        });
    }

    let fields = text
        .as_bytes()
        .chunks(FIELD_WIDTH)
        .map(|field| {
            std::str::from_utf8(field)
                .ok()
                .and_then(|s| u32::from_str_radix(s, 16).ok())
                .ok_or_else(|| EchoprintError::Fingerprint {
                    message: "Code body is not hexadecimal".to_string(),
                })
        })
        .collect::<Result<Vec<u32>>>()?;

    let (offsets, hashes) = fields.split_at(fields.len() / 2);
    Ok(offsets
        .iter()
        .zip(hashes)
        .map(|(&offset, &hash)| CodeEntry { offset, hash })
        .collect())
}
