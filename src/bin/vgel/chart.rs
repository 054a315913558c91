//! Horizontal bar chart of a length histogram.

use std::io::{self, Write};
use vgel::LengthSnapshot;

/// Every length from the shortest to the longest observed, gaps as zero.
pub fn dense(snapshot: &LengthSnapshot) -> Vec<(usize, u64)> {
    let (Some(lo), Some(hi)) = (snapshot.min_length(), snapshot.max_length()) else {
        return Vec::new();
    };
    let mut rows: Vec<(usize, u64)> = (lo..=hi).map(|len| (len, 0)).collect();
    for (len, n) in snapshot {
        rows[len - lo].1 = n;
    }
    rows
}

/// Bars scaled linearly so the tallest spans `width` columns.
pub fn render<W: Write>(out: &mut W, snapshot: &LengthSnapshot, width: usize) -> io::Result<()> {
    let rows = dense(snapshot);
    let Some(peak) = rows.iter().map(|&(_, n)| n).max() else {
        return writeln!(out, "no records");
    };
    let label_width = rows.last().map_or(1, |(len, _)| len.to_string().len());
    for (len, n) in rows {
        let bar = if peak == 0 {
            0
        } else {
            ((n as u128 * width as u128 + peak as u128 - 1) / peak as u128) as usize
        };
        writeln!(out, "{len:>label_width$} │{} {n}", "█".repeat(bar))?;
    }
    Ok(())
}

/// Plain `len count` table.
pub fn table<W: Write>(out: &mut W, snapshot: &LengthSnapshot) -> io::Result<()> {
    writeln!(out, "len\tcount")?;
    for (len, n) in snapshot {
        writeln!(out, "{len}\t{n}")?;
    }
    Ok(())
}
