//! Parallel compression of independent buffers.
//!
//! Each codec call owns its tree, code table and cursors, so buffers can be
//! spread across a worker pool with no coordination beyond handing out jobs
//! and putting results back in input order.

use crossbeam::channel::{bounded, unbounded, Receiver, Sender};

use crate::error::{Error, Result};
use crate::CodecConfig;

/// Upper bound on worker threads
const MAX_THREADS: usize = 32;

/// Resolve a requested thread count (0 = auto) for `jobs` jobs
pub fn effective_threads(num_threads: usize, jobs: usize) -> usize {
    let requested = match num_threads {
        0 => num_cpus::get().clamp(1, MAX_THREADS),
        n => n.clamp(1, MAX_THREADS),
    };
    requested.min(jobs.max(1))
}

/// Compress every input, returning one result per input in the same order
pub fn compress_all<T>(
    inputs: &[T],
    config: &CodecConfig,
    num_threads: usize,
) -> Result<Vec<Result<Vec<u8>>>>
where
    T: AsRef<[u8]> + Sync,
{
    run_batch(inputs, num_threads, |data| crate::compress(data, config))
}

/// Decompress every container, returning one result per input in order
pub fn decompress_all<T>(
    inputs: &[T],
    config: &CodecConfig,
    num_threads: usize,
) -> Result<Vec<Result<Vec<u8>>>>
where
    T: AsRef<[u8]> + Sync,
{
    run_batch(inputs, num_threads, |data| crate::decompress(data, config))
}

/// Run `op` over every input on a scoped worker pool
///
/// A failing input does not stop the batch; its error is returned in its
/// slot. The outer `Result` only fails if a worker thread panics.
fn run_batch<T, F>(inputs: &[T], num_threads: usize, op: F) -> Result<Vec<Result<Vec<u8>>>>
where
    T: AsRef<[u8]> + Sync,
    F: Fn(&[u8]) -> Result<Vec<u8>> + Sync,
{
    let num_threads = effective_threads(num_threads, inputs.len());

    if num_threads == 1 {
        return Ok(inputs.iter().map(|input| op(input.as_ref())).collect());
    }

    let (job_tx, job_rx): (Sender<usize>, Receiver<usize>) = bounded(inputs.len());
    let (result_tx, result_rx): (Sender<(usize, Result<Vec<u8>>)>, Receiver<_>) = unbounded();

    for id in 0..inputs.len() {
        job_tx
            .send(id)
            .map_err(|_| Error::Internal("Job channel disconnected".to_string()))?;
    }
    // Workers stop once the queue drains
    drop(job_tx);

    let op = &op;
    let result = crossbeam::scope(|scope| {
        for _ in 0..num_threads {
            let job_rx = job_rx.clone();
            let result_tx = result_tx.clone();

            scope.spawn(move |_| {
                for id in job_rx.iter() {
                    if result_tx.send((id, op(inputs[id].as_ref()))).is_err() {
                        break;
                    }
                }
            });
        }
    });
    result.map_err(|_| Error::Internal("Thread panicked".to_string()))?;

    drop(result_tx);

    let mut slots: Vec<Option<Result<Vec<u8>>>> = (0..inputs.len()).map(|_| None).collect();
    for (id, output) in result_rx.iter() {
        slots[id] = Some(output);
    }

    slots
        .into_iter()
        .enumerate()
        .map(|(id, slot)| {
            slot.ok_or_else(|| Error::Internal(format!("No result for batch item {}", id)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ContainerFormat;

    fn inputs() -> Vec<Vec<u8>> {
        vec![
            b"first buffer first buffer".to_vec(),
            Vec::new(),
            vec![b'z'; 3000],
            (0..=255u8).cycle().take(5000).collect(),
        ]
    }

    #[test]
    fn test_effective_threads() {
        assert_eq!(effective_threads(4, 10), 4);
        assert_eq!(effective_threads(8, 2), 2);
        assert_eq!(effective_threads(1, 0), 1);
        assert!(effective_threads(0, 100) >= 1);
        assert_eq!(effective_threads(1000, 1000), MAX_THREADS);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let config = CodecConfig::default();
        let data = inputs();

        let sequential = compress_all(&data, &config, 1).unwrap();
        let parallel = compress_all(&data, &config, 4).unwrap();

        assert_eq!(sequential.len(), parallel.len());
        for (s, p) in sequential.iter().zip(&parallel) {
            assert_eq!(s.as_ref().unwrap(), p.as_ref().unwrap());
        }
    }

    #[test]
    fn test_batch_roundtrip() {
        let config = CodecConfig::default().with_format(ContainerFormat::Framed);
        let data = inputs();

        let compressed: Vec<Vec<u8>> = compress_all(&data, &config, 3)
            .unwrap()
            .into_iter()
            .map(|r| r.unwrap())
            .collect();
        let restored = decompress_all(&compressed, &config, 3).unwrap();

        for (original, out) in data.iter().zip(restored) {
            assert_eq!(&out.unwrap(), original);
        }
    }

    #[test]
    fn test_errors_stay_in_their_slot() {
        let config = CodecConfig::default();
        let good = crate::compress(b"good good good", &config).unwrap();
        let containers = vec![good.clone(), vec![1, 2, 3], good];

        let results = decompress_all(&containers, &config, 2).unwrap();
        assert!(results[0].is_ok());
        assert!(matches!(results[1], Err(Error::MalformedHeader { .. })));
        assert_eq!(results[2].as_ref().unwrap(), b"good good good");
    }
}
