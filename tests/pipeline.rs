use std::io::{self, Cursor, Write};
use vgel::{
    Execution, FastqError, FastqReader, FastqWriter, FilterConfig, MAX_QUEUE_CAPACITY, Mode,
    Pipeline, PipelineOptions, RunSummary, TruncationPolicy, Warning,
};

fn fastq(lengths: &[usize]) -> String {
    let mut out = String::new();
    for (i, &len) in lengths.iter().enumerate() {
        out.push_str(&format!("@JSB:1:FC000:1:{len}:{i}:{i} 0:N:0:ACTG\n"));
        out.push_str(&"A".repeat(len));
        out.push_str("\n+\n");
        out.push_str(&"@".repeat(len));
        out.push('\n');
    }
    out
}

fn executions() -> [Execution; 3] {
    [
        Execution::Direct,
        Execution::staged(),
        Execution::Staged { queue_capacity: 1 },
    ]
}

fn run(input: &str, config: FilterConfig, opts: PipelineOptions) -> (RunSummary, Vec<u8>) {
    let mut reader = FastqReader::from_bufread(Cursor::new(input.as_bytes().to_vec()));
    let mut out = FastqWriter::new(Vec::new());
    let summary = Pipeline::new(config, opts)
        .run(&mut reader, &mut out)
        .unwrap();
    (summary, out.into_inner().unwrap())
}

fn seq_lengths(output: &[u8]) -> Vec<usize> {
    let text = std::str::from_utf8(output).unwrap();
    text.lines().skip(1).step_by(4).map(str::len).collect()
}

fn with(execution: Execution) -> PipelineOptions {
    PipelineOptions {
        execution,
        histogram: true,
        ..PipelineOptions::default()
    }
}

#[test]
fn keep_selects_inside_range() {
    for exec in executions() {
        let (summary, out) = run(
            &fastq(&[10, 50, 100, 150]),
            FilterConfig::new(50, 100, Mode::Keep),
            with(exec),
        );
        assert_eq!(seq_lengths(&out), vec![50, 100], "{exec:?}");
        assert_eq!(summary.decoded, 4);
        assert_eq!(summary.written, 2);
        assert_eq!(summary.rejected, 2);
        assert!(summary.warnings.is_empty());
    }
}

#[test]
fn discard_selects_outside_range() {
    for exec in executions() {
        let (summary, out) = run(
            &fastq(&[10, 50, 100, 150]),
            FilterConfig::new(50, 100, Mode::Discard),
            with(exec),
        );
        assert_eq!(seq_lengths(&out), vec![10, 150], "{exec:?}");
        assert_eq!(summary.written, 2);
    }
}

#[test]
fn truncated_tail_is_dropped_with_warning() {
    let mut input = fastq(&[10, 50, 100, 150]);
    input.push_str("@JSB:partial\nACGT\n");
    for exec in executions() {
        let (summary, out) = run(&input, FilterConfig::new(50, 100, Mode::Keep), with(exec));
        assert_eq!(seq_lengths(&out), vec![50, 100], "{exec:?}");
        assert_eq!(summary.decoded, 4);
        assert_eq!(summary.histogram.total(), 4);
        assert_eq!(
            summary.warnings,
            vec![Warning::TruncatedRecord {
                lines: 2,
                line_num: 18
            }]
        );
        assert!(!String::from_utf8(out).unwrap().contains("partial"));
    }
}

#[test]
fn truncated_tail_can_be_fatal() {
    let mut input = fastq(&[10]);
    input.push_str("@cut\n");
    for exec in executions() {
        let mut reader = FastqReader::from_bufread(Cursor::new(input.clone().into_bytes()));
        let mut out = FastqWriter::new(Vec::new());
        let opts = PipelineOptions {
            execution: exec,
            truncation: TruncationPolicy::Fail,
            ..PipelineOptions::default()
        };
        let err = Pipeline::new(FilterConfig::new(0, 100, Mode::Keep), opts)
            .run(&mut reader, &mut out)
            .unwrap_err();
        assert!(err.is_truncation(), "{exec:?}: {err}");
    }
}

#[test]
fn empty_sequence_counts_as_zero() {
    for exec in executions() {
        let (summary, out) = run(&fastq(&[0]), FilterConfig::new(0, 0, Mode::Keep), with(exec));
        assert_eq!(summary.written, 1);
        assert_eq!(summary.histogram.count(0), 1);
        assert_eq!(out, b"@JSB:1:FC000:1:0:0:0 0:N:0:ACTG\n\n+\n\n");
    }
}

#[test]
fn inspect_writes_nothing_but_counts_everything() {
    let lengths = [50, 100, 10, 50];
    for exec in executions() {
        let opts = PipelineOptions {
            execution: exec,
            histogram: false,
            ..PipelineOptions::default()
        };
        let (summary, out) = run(&fastq(&lengths), FilterConfig::new(0, 60, Mode::Inspect), opts);
        assert!(out.is_empty());
        assert_eq!(summary.written, 0);
        assert_eq!(summary.rejected, 0);
        let pairs: Vec<(usize, u64)> = summary.histogram.snapshot().iter().collect();
        assert_eq!(pairs, vec![(10, 1), (50, 2), (100, 1)]);
    }
}

#[test]
fn histogram_off_by_default_outside_inspect() {
    let (summary, _) = run(
        &fastq(&[1, 2, 3]),
        FilterConfig::new(0, 10, Mode::Keep),
        PipelineOptions::default(),
    );
    assert!(summary.histogram.is_empty());
}

#[test]
fn histogram_total_matches_decoded() {
    let lengths: Vec<usize> = (0..997).map(|i| (i * 37) % 151).collect();
    for exec in executions() {
        let (summary, _) = run(&fastq(&lengths), FilterConfig::new(40, 90, Mode::Discard), with(exec));
        assert_eq!(summary.decoded, lengths.len() as u64);
        assert_eq!(summary.histogram.total(), summary.decoded);
        assert_eq!(summary.written + summary.rejected, summary.decoded);
    }
}

#[test]
fn models_agree_on_output() {
    let lengths: Vec<usize> = (0..5000).map(|i| (i * 7919) % 301).collect();
    let input = fastq(&lengths);
    for mode in [Mode::Keep, Mode::Discard, Mode::Inspect] {
        let config = FilterConfig::new(75, 225, mode);
        let (direct, direct_out) = run(&input, config, with(Execution::Direct));
        for exec in [Execution::staged(), Execution::Staged { queue_capacity: 3 }] {
            let (staged, staged_out) = run(&input, config, with(exec));
            assert_eq!(staged_out, direct_out, "{mode:?} {exec:?}");
            assert_eq!(staged.written, direct.written);
            assert_eq!(staged.histogram, direct.histogram);
        }
    }
}

#[test]
fn out_of_range_queue_capacity_is_clamped() {
    let input = fastq(&[10, 50, 100, 150]);
    for queue_capacity in [0, MAX_QUEUE_CAPACITY + 1, usize::MAX / 2 + 1, usize::MAX] {
        let (summary, out) = run(
            &input,
            FilterConfig::new(50, 100, Mode::Keep),
            with(Execution::Staged { queue_capacity }),
        );
        assert_eq!(seq_lengths(&out), vec![50, 100], "capacity {queue_capacity}");
        assert_eq!(summary.decoded, 4);
    }
}

#[test]
fn keep_and_discard_partition_the_input() {
    let lengths: Vec<usize> = (0..400).map(|i| (i * 13) % 97).collect();
    let input = fastq(&lengths);
    for exec in executions() {
        let (_, kept) = run(&input, FilterConfig::new(20, 60, Mode::Keep), with(exec));
        let (_, discarded) = run(&input, FilterConfig::new(20, 60, Mode::Discard), with(exec));
        let mut all = seq_lengths(&kept);
        all.extend(seq_lengths(&discarded));
        all.sort_unstable();
        let mut expected = lengths.clone();
        expected.sort_unstable();
        assert_eq!(all, expected);
    }
}

#[test]
fn rejects_go_to_second_sink_in_order() {
    let input = fastq(&[10, 50, 100, 150, 20, 70]);
    for exec in executions() {
        let mut reader = FastqReader::from_bufread(Cursor::new(input.clone().into_bytes()));
        let mut out = FastqWriter::new(Vec::new());
        let mut excised = FastqWriter::new(Vec::new());
        let summary = Pipeline::new(FilterConfig::new(50, 100, Mode::Discard), with(exec))
            .run_with_rejects(&mut reader, &mut out, &mut excised)
            .unwrap();
        assert_eq!(seq_lengths(&out.into_inner().unwrap()), vec![10, 150, 20]);
        assert_eq!(seq_lengths(&excised.into_inner().unwrap()), vec![50, 100, 70]);
        assert_eq!(summary.rejected, 3);
    }
}

#[test]
fn inverted_range_warns_and_proceeds() {
    let input = fastq(&[5, 10, 15]);
    for exec in executions() {
        let (keep, out) = run(&input, FilterConfig::new(12, 8, Mode::Keep), with(exec));
        assert!(out.is_empty());
        assert_eq!(keep.warnings, vec![Warning::InvertedRange { min: 12, max: 8 }]);

        let (_, out) = run(&input, FilterConfig::new(12, 8, Mode::Discard), with(exec));
        assert_eq!(seq_lengths(&out), vec![5, 10, 15]);
    }
}

#[test]
fn output_is_byte_identical_to_kept_input() {
    let input = "@a desc\nACGT\n+a desc\nIIII\n@b\nAC\n+\n##\n";
    for exec in executions() {
        let (_, out) = run(input, FilterConfig::new(0, usize::MAX, Mode::Keep), with(exec));
        assert_eq!(out, input.as_bytes());
    }
}

struct FailingWriter {
    budget: usize,
}

impl Write for FailingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if buf.len() > self.budget {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "sink closed"));
        }
        self.budget -= buf.len();
        Ok(buf.len())
    }
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn write_failure_aborts_the_run() {
    // far more than the 64 KiB writer buffer so the failure happens mid-run
    let lengths = vec![100; 5000];
    let input = fastq(&lengths);
    for exec in executions() {
        let mut reader = FastqReader::from_bufread(Cursor::new(input.clone().into_bytes()));
        let mut out = FastqWriter::new(FailingWriter { budget: 1024 });
        let err = Pipeline::new(FilterConfig::new(0, 1000, Mode::Keep), with(exec))
            .run(&mut reader, &mut out)
            .unwrap_err();
        assert!(matches!(err, FastqError::Write { .. }), "{exec:?}: {err}");
    }
}

struct FailingReader;

impl io::Read for FailingReader {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::other("disk on fire"))
    }
}

#[test]
fn read_failure_aborts_the_run() {
    for exec in executions() {
        let mut reader = FastqReader::from_bufread(io::BufReader::new(FailingReader));
        let mut out = FastqWriter::new(Vec::new());
        let err = Pipeline::new(FilterConfig::new(0, 10, Mode::Keep), with(exec))
            .run(&mut reader, &mut out)
            .unwrap_err();
        assert!(matches!(err, FastqError::Read { .. }), "{exec:?}: {err}");
    }
}
