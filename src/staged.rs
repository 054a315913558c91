//! Three-thread pipeline: decoder → filter → encoder.
//!
//! Records are moved through bounded channels, so no two stages ever touch
//! the same buffer. Spent records are handed back to the decoder over a
//! recycle channel and refilled instead of allocating anew. The decoder only
//! ever takes records out of that channel, which means a record is never
//! refilled while a downstream stage still holds it.

use crate::error::FastqError;
use crate::filter::Disposition;
use crate::histogram::LengthHistogram;
use crate::pipeline::{Pipeline, RunSummary, Warning};
use crate::policy::MAX_QUEUE_CAPACITY;
use crate::reader::FastqReader;
use crate::record::FastqRecord;
use crate::writer::FastqWriter;

use crossbeam_channel::{Receiver, Sender, bounded};
use std::io::Write;
use std::thread::{self, ScopedJoinHandle};

/// Queue B payload; rejected records only travel when a reject sink exists.
enum Routed {
    Kept(FastqRecord),
    Rejected(FastqRecord),
}

#[derive(Default)]
struct DecodeReport {
    decoded: u64,
    warning: Option<Warning>,
}

#[derive(Default)]
struct FilterReport {
    histogram: LengthHistogram,
    rejected: u64,
}

pub(crate) fn run<W, X>(
    pipeline: &Pipeline,
    queue_capacity: usize,
    reader: &mut FastqReader,
    out: &mut FastqWriter<W>,
    rejects: Option<&mut FastqWriter<X>>,
) -> Result<RunSummary, FastqError>
where
    W: Write + Send,
    X: Write + Send,
{
    let cap = queue_capacity.clamp(1, MAX_QUEUE_CAPACITY);
    if cap != queue_capacity {
        log::warn!("queue capacity {queue_capacity} out of range, using {cap}");
    }
    let (decoded_tx, decoded_rx) = bounded::<FastqRecord>(cap);
    let (routed_tx, routed_rx) = bounded::<Routed>(cap);
    // at most 2 * cap + 3 records exist at once, so releasing never blocks
    let (release_tx, release_rx) =
        bounded::<FastqRecord>(cap.saturating_mul(2).saturating_add(4));
    let save_rejects = rejects.is_some();

    log::debug!("starting staged pipeline, queue capacity {cap}");

    let (decoded, filtered, written) = thread::scope(|s| {
        let decoder = s.spawn(move || decode_stage(pipeline, reader, decoded_tx, release_rx));
        let filter = {
            let release_tx = release_tx.clone();
            s.spawn(move || filter_stage(pipeline, decoded_rx, routed_tx, release_tx, save_rejects))
        };
        let encoder = s.spawn(move || encode_stage(routed_rx, out, rejects, release_tx));

        (
            join(decoder, "decoder").and_then(|r| r),
            join(filter, "filter"),
            join(encoder, "encoder").and_then(|r| r),
        )
    });

    // upstream failures first: a read error is the cause, not the symptom
    let decoded = decoded?;
    let filtered = filtered?;
    let written = written?;

    let mut histogram = LengthHistogram::new();
    histogram.merge(&filtered.histogram);

    Ok(RunSummary {
        decoded: decoded.decoded,
        written,
        rejected: filtered.rejected,
        histogram,
        warnings: decoded.warning.into_iter().collect(),
    })
}

fn join<T>(handle: ScopedJoinHandle<'_, T>, stage: &'static str) -> Result<T, FastqError> {
    handle.join().map_err(|_| {
        log::error!("{stage} stage panicked");
        FastqError::StagePanicked { stage }
    })
}

fn decode_stage(
    pipeline: &Pipeline,
    reader: &mut FastqReader,
    tx: Sender<FastqRecord>,
    pool: Receiver<FastqRecord>,
) -> Result<DecodeReport, FastqError> {
    let mut report = DecodeReport::default();
    loop {
        let mut rec = pool
            .try_recv()
            .unwrap_or_else(|_| FastqRecord::with_capacity(1024));
        match reader.read_into(&mut rec) {
            Ok(true) => {}
            Ok(false) => break,
            Err(err) => {
                report.warning = pipeline.on_decode_error(err)?;
                break;
            }
        }
        report.decoded += 1;
        if tx.send(rec).is_err() {
            log::debug!("decoder: filter hung up early");
            break;
        }
    }
    log::debug!("decoder done after {} records", report.decoded);
    Ok(report)
}

fn filter_stage(
    pipeline: &Pipeline,
    rx: Receiver<FastqRecord>,
    tx: Sender<Routed>,
    release: Sender<FastqRecord>,
    save_rejects: bool,
) -> FilterReport {
    let config = pipeline.config();
    let observe = pipeline.observes();
    let mut report = FilterReport::default();

    for rec in rx.iter() {
        let len = rec.seq_len();
        if observe {
            report.histogram.record(len);
        }
        let routed = match config.disposition(len) {
            Disposition::Write => Routed::Kept(rec),
            Disposition::Reject => {
                report.rejected += 1;
                if !save_rejects {
                    let _ = release.try_send(rec);
                    continue;
                }
                Routed::Rejected(rec)
            }
            Disposition::Observe => {
                let _ = release.try_send(rec);
                continue;
            }
        };
        if tx.send(routed).is_err() {
            log::debug!("filter: encoder hung up early");
            break;
        }
    }
    log::debug!("filter done");
    report
}

/// Sole owner of the output streams. Flushes once the routed queue closes.
fn encode_stage<W, X>(
    rx: Receiver<Routed>,
    out: &mut FastqWriter<W>,
    mut rejects: Option<&mut FastqWriter<X>>,
    release: Sender<FastqRecord>,
) -> Result<u64, FastqError>
where
    W: Write,
    X: Write,
{
    let mut written = 0u64;
    for routed in rx.iter() {
        let rec = match routed {
            Routed::Kept(rec) => {
                out.write_record(&rec)?;
                written += 1;
                rec
            }
            Routed::Rejected(rec) => {
                if let Some(w) = rejects.as_deref_mut() {
                    w.write_record(&rec)?;
                }
                rec
            }
        };
        let _ = release.try_send(rec);
    }
    out.flush()?;
    if let Some(w) = rejects {
        w.flush()?;
    }
    log::debug!("encoder done after {written} records");
    Ok(written)
}
