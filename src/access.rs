use crate::utils::ResultsError;
use log::debug;
use rand::Rng;
use rayon::prelude::*;
use serde::Serialize;
use std::hint::black_box;
use std::mem::{align_of, size_of};
use std::path::Path;
use std::time::Instant;

/// Accumulators used by both sums, one per vector lane of a 256-bit register.
pub const LANES: usize = 4;

/// Alignment of a 256-bit vector load.
pub const VECTOR_ALIGN: usize = 32;

/// How the misaligned copy of the data is shifted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Misalignment {
    /// One f64 past a vector boundary: values stay naturally aligned,
    /// vector loads over them do not.
    Element,
    /// One byte past an f64 boundary: every value is misaligned.
    Byte,
}

/// One benchmark run, written as one row of the results csv.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RunRecord {
    pub run: u32,
    pub aligned_sum: f64,
    pub aligned_time: f64,
    pub unaligned_sum: f64,
    pub unaligned_time: f64,
}

/// Bytes holding a copy of the values that starts one byte past an f64 boundary,
/// so that every value read from it is misaligned.
#[derive(Debug, Clone)]
pub struct MisalignedBuffer {
    bytes: Vec<u8>,
    start: usize,
    len: usize,
}

impl MisalignedBuffer {
    pub fn from_values(values: &[f64]) -> MisalignedBuffer {
        let width = size_of::<f64>();
        let align = align_of::<f64>();
        let mut bytes = vec![0u8; values.len() * width + align];
        let to_aligned = match bytes.as_ptr().align_offset(align) {
            usize::MAX => 0,
            o => o,
        };
        let start = (to_aligned + 1) % align;
        bytes[start..]
            .chunks_exact_mut(width)
            .zip(values)
            .for_each(|(chunk, v)| chunk.copy_from_slice(&v.to_ne_bytes()));
        MisalignedBuffer {
            bytes,
            start,
            len: values.len(),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[self.start..self.start + self.len * size_of::<f64>()]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_misaligned(&self) -> bool {
        self.as_bytes().as_ptr() as usize % align_of::<f64>() != 0
    }
}

/// A copy of the values that starts one f64 past a 32-byte boundary.
#[derive(Debug, Clone)]
pub struct LaneMisalignedBuffer {
    data: Vec<f64>,
    start: usize,
    len: usize,
}

impl LaneMisalignedBuffer {
    pub fn from_values(values: &[f64]) -> LaneMisalignedBuffer {
        let per_vector = VECTOR_ALIGN / size_of::<f64>();
        let mut data = vec![0f64; values.len() + per_vector];
        let to_aligned = match data.as_ptr().align_offset(VECTOR_ALIGN) {
            usize::MAX => 0,
            o => o,
        };
        let start = (to_aligned + 1) % per_vector;
        data[start..start + values.len()].copy_from_slice(values);
        LaneMisalignedBuffer {
            data,
            start,
            len: values.len(),
        }
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data[self.start..self.start + self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_misaligned(&self) -> bool {
        self.as_slice().as_ptr() as usize % VECTOR_ALIGN != 0
    }
}

// the misaligned copy used by the timed runs
enum Shifted {
    Element(LaneMisalignedBuffer),
    Byte(MisalignedBuffer),
}

/// Uniform values in [0, 1), filled in parallel with one rng per worker.
pub fn random_data(size: usize) -> Vec<f64> {
    let mut data = vec![0f64; size];
    data.par_iter_mut()
        .for_each_init(rand::rng, |rng, x| *x = rng.random_range(0.0..1.0));
    data
}

/// Lane-wise sum over f64 values, scalar tail at the end.
/// The values are naturally aligned, their vector alignment is whatever the slice has.
pub fn sum_aligned(data: &[f64]) -> f64 {
    let mut acc = [0f64; LANES];
    let chunks = data.chunks_exact(LANES);
    let tail = chunks.remainder();
    for chunk in chunks {
        acc.iter_mut().zip(chunk).for_each(|(a, v)| *a += v);
    }
    acc.iter().sum::<f64>() + tail.iter().sum::<f64>()
}

/// Same lane-wise sum as sum_aligned,
/// but each value is decoded from bytes that need not be aligned.
/// Trailing bytes that do not make a whole f64 are ignored.
pub fn sum_unaligned(bytes: &[u8]) -> f64 {
    let width = size_of::<f64>();
    let mut acc = [0f64; LANES];
    let chunks = bytes.chunks_exact(LANES * width);
    let tail = chunks.remainder();
    for chunk in chunks {
        acc.iter_mut()
            .zip(chunk.chunks_exact(width))
            .for_each(|(a, v)| *a += read_f64(v));
    }
    acc.iter().sum::<f64>() + tail.chunks_exact(width).map(read_f64).sum::<f64>()
}

fn read_f64(b: &[u8]) -> f64 {
    let mut raw = [0u8; size_of::<f64>()];
    raw.copy_from_slice(b);
    f64::from_ne_bytes(raw)
}

/// Run f once and return its result with the elapsed wall time in seconds.
pub fn time_it<T, F>(f: F) -> (T, f64)
where
    F: FnOnce() -> T,
{
    let start = Instant::now();
    let out = black_box(f());
    (out, start.elapsed().as_secs_f64())
}

/// Time the aligned and the misaligned sum of the data, once per run.
/// Runs are numbered from 1.
pub fn measure_runs(data: &[f64], runs: u32, mode: Misalignment) -> Vec<RunRecord> {
    let shifted = match mode {
        Misalignment::Element => Shifted::Element(LaneMisalignedBuffer::from_values(data)),
        Misalignment::Byte => Shifted::Byte(MisalignedBuffer::from_values(data)),
    };
    let misaligned = match &shifted {
        Shifted::Element(b) => b.is_misaligned(),
        Shifted::Byte(b) => b.is_misaligned(),
    };
    debug!(
        "{:?} shifted copy of {} values, misaligned: {}",
        mode,
        data.len(),
        misaligned
    );
    let mut records = Vec::with_capacity(runs as usize);
    for run in 1..=runs {
        let (aligned_sum, aligned_time) = time_it(|| sum_aligned(black_box(data)));
        let (unaligned_sum, unaligned_time) = match &shifted {
            Shifted::Element(b) => time_it(|| sum_aligned(black_box(b.as_slice()))),
            Shifted::Byte(b) => time_it(|| sum_unaligned(black_box(b.as_bytes()))),
        };
        debug!(
            "run {}: aligned {:e} s, unaligned {:e} s",
            run, aligned_time, unaligned_time
        );
        records.push(RunRecord {
            run,
            aligned_sum,
            aligned_time,
            unaligned_sum,
            unaligned_time,
        });
    }
    records
}

/// Write the records to csv, header included, overwriting the file.
pub fn write_csv<P>(records: &[RunRecord], fout: P) -> Result<(), ResultsError>
where
    P: AsRef<Path>,
{
    let mut wtr = csv::Writer::from_path(fout)?;
    for r in records {
        wtr.serialize(r)?;
    }
    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}
