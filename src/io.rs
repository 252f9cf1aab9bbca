//! Safetensors I/O for recordings and detection results.
//!
//! Reader: a recording file holds
//!   `data`   [T] or [C, T]   F32 | F64   samples
//!   `sfreq`  [1] or []       F32 | F64   sampling rate (Hz)
//!   `hypno`  [T]             I32 | I64 | F32 | F64   optional, per-sample stages
//!
//! Writer: [`StWriter`] serialises F64 / I64 tensors, e.g. detected indices.
use anyhow::{bail, Context, Result};
use ndarray::Array2;
use std::collections::HashMap;
use std::path::Path;

use crate::detect::DetectionResult;

// ── Low-level safetensors parser (raw bytes → Vec) ───────────────────────────

fn parse_header(bytes: &[u8]) -> Result<(HashMap<String, serde_json::Value>, usize)> {
    if bytes.len() < 8 {
        bail!("safetensors file too small");
    }
    let mut len_bytes = [0u8; 8];
    len_bytes.copy_from_slice(&bytes[..8]);
    let n = usize::try_from(u64::from_le_bytes(len_bytes))
        .context("safetensors header length overflows")?;
    let data_start = 8usize
        .checked_add(n)
        .context("safetensors header length overflows")?;
    let header_bytes = bytes
        .get(8..data_start)
        .context("safetensors header length exceeds file size")?;
    let header: HashMap<String, serde_json::Value> =
        serde_json::from_slice(header_bytes).context("failed to parse safetensors header")?;
    Ok((header, data_start))
}

fn tensor_bytes<'a>(bytes: &'a [u8], data_start: usize, entry: &serde_json::Value) -> Result<&'a [u8]> {
    let offsets = entry["data_offsets"]
        .as_array()
        .context("tensor entry has no data_offsets")?;
    let offset = |i: usize| -> Result<usize> {
        let v = offsets.get(i).and_then(|v| v.as_u64()).context("bad data_offsets")?;
        usize::try_from(v)
            .ok()
            .and_then(|v| data_start.checked_add(v))
            .context("data_offsets overflow")
    };
    bytes.get(offset(0)?..offset(1)?).context("tensor data out of bounds")
}

fn shape_of(entry: &serde_json::Value) -> Result<Vec<usize>> {
    entry["shape"]
        .as_array()
        .context("tensor entry has no shape")?
        .iter()
        .map(|v| v.as_u64().map(|d| d as usize).context("bad shape dimension"))
        .collect()
}

/// Decode any supported numeric tensor as f64.
fn read_as_f64(bytes: &[u8], data_start: usize, entry: &serde_json::Value) -> Result<Vec<f64>> {
    let raw = tensor_bytes(bytes, data_start, entry)?;
    let dtype = entry["dtype"].as_str().context("tensor entry has no dtype")?;
    let vals = match dtype {
        "F32" => raw.chunks_exact(4)
            .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]) as f64)
            .collect(),
        "F64" => raw.chunks_exact(8)
            .map(|b| f64::from_le_bytes([b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]]))
            .collect(),
        "I32" => raw.chunks_exact(4)
            .map(|b| i32::from_le_bytes([b[0], b[1], b[2], b[3]]) as f64)
            .collect(),
        "I64" => raw.chunks_exact(8)
            .map(|b| i64::from_le_bytes([b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]]) as f64)
            .collect(),
        other => bail!("unsupported dtype {other}"),
    };
    Ok(vals)
}

// ── Public structs ────────────────────────────────────────────────────────────

/// A recording loaded from safetensors.
pub struct Recording {
    /// [C, T] samples; a 1-D `data` tensor becomes a single row.
    pub data: Array2<f64>,
    /// Sampling rate (Hz).
    pub sfreq: f64,
    /// Per-sample sleep stages, if the file has a `hypno` tensor.
    pub hypno: Option<Vec<i32>>,
}

impl Recording {
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let (header, data_start) = parse_header(&bytes)?;

        let data_entry = header.get("data").context("missing 'data' key")?;
        let data_shape = shape_of(data_entry)?;
        let data_vec = read_as_f64(&bytes, data_start, data_entry)?;
        let (n_ch, n_t) = match data_shape.as_slice() {
            [t] => (1, *t),
            [c, t] => (*c, *t),
            other => bail!("'data' must be 1-D or 2-D, got shape {other:?}"),
        };
        let data = Array2::from_shape_vec((n_ch, n_t), data_vec)
            .context("'data' shape does not match its byte length")?;

        let sfreq_entry = header.get("sfreq").context("missing 'sfreq' key")?;
        let sfreq = *read_as_f64(&bytes, data_start, sfreq_entry)?
            .first()
            .context("'sfreq' is empty")?;

        let hypno = match header.get("hypno") {
            Some(e) => {
                let stages = read_as_f64(&bytes, data_start, e)?;
                if stages.len() != n_t {
                    bail!("'hypno' has {} samples, 'data' has {n_t}", stages.len());
                }
                Some(stages.into_iter().map(|s| s.round() as i32).collect())
            }
            None => None,
        };

        Ok(Recording { data, sfreq, hypno })
    }

    pub fn n_channels(&self) -> usize {
        self.data.nrows()
    }

    /// Samples of channel `ch`.
    pub fn channel(&self, ch: usize) -> Result<Vec<f64>> {
        if ch >= self.data.nrows() {
            bail!("channel {ch} out of range (recording has {})", self.data.nrows());
        }
        Ok(self.data.row(ch).to_vec())
    }
}

// ── Generic safetensors builder ───────────────────────────────────────────────

/// Safetensors file writer for F64 and I64 tensors.
///
/// ```rust,no_run
/// use sleepdet::io::StWriter;
/// use std::path::Path;
/// let mut w = StWriter::new();
/// w.add_f64("data", &[1.0, 2.0, 3.0], &[3]);
/// w.add_f64("sfreq", &[100.0], &[1]);
/// w.write(Path::new("/tmp/rec.safetensors")).unwrap();
/// ```
#[derive(Default)]
pub struct StWriter {
    entries: Vec<(String, Vec<u8>, &'static str, Vec<usize>)>,
}

impl StWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_f64(&mut self, name: &str, data: &[f64], shape: &[usize]) {
        let bytes: Vec<u8> = data.iter().flat_map(|v| v.to_le_bytes()).collect();
        self.entries.push((name.to_string(), bytes, "F64", shape.to_vec()));
    }

    pub fn add_i64(&mut self, name: &str, data: &[i64], shape: &[usize]) {
        let bytes: Vec<u8> = data.iter().flat_map(|v| v.to_le_bytes()).collect();
        self.entries.push((name.to_string(), bytes, "I64", shape.to_vec()));
    }

    /// Add `indices` [N], `events` [E, 2] (start, stop) and `summary`
    /// [count, density, valid_len] for one detection.
    pub fn add_detection(&mut self, prefix: &str, result: &DetectionResult) {
        let indices: Vec<i64> = result.indices.iter().map(|&i| i as i64).collect();
        self.add_i64(&format!("{prefix}indices"), &indices, &[indices.len()]);

        let events: Vec<i64> = result.events.iter()
            .flat_map(|e| [e.start as i64, e.stop as i64])
            .collect();
        self.add_i64(&format!("{prefix}events"), &events, &[result.events.len(), 2]);

        self.add_f64(
            &format!("{prefix}summary"),
            &[result.count as f64, result.density, result.valid_len as f64],
            &[3],
        );
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        use std::io::Write;
        let mut header_map = serde_json::Map::new();
        let mut offset: usize = 0;
        for (name, data, dtype, shape) in &self.entries {
            header_map.insert(name.clone(), serde_json::json!({
                "dtype": dtype,
                "shape": shape,
                "data_offsets": [offset, offset + data.len()],
            }));
            offset += data.len();
        }
        let hdr_bytes = serde_json::to_vec(&header_map)?;
        let pad = (8 - hdr_bytes.len() % 8) % 8;
        let padded: Vec<u8> = hdr_bytes.into_iter()
            .chain(std::iter::repeat(b' ').take(pad))
            .collect();
        let mut f = std::fs::File::create(path)
            .with_context(|| format!("creating {}", path.display()))?;
        f.write_all(&(padded.len() as u64).to_le_bytes())?;
        f.write_all(&padded)?;
        for (_, data, _, _) in &self.entries {
            f.write_all(data)?;
        }
        Ok(())
    }
}
