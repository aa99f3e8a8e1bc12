//! Variant-column scanning over synthetic alignments.

// `criterion_group!` generates an undocumented `benches` fn.
#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use msalink::alignment::{AlignmentModel, Sequence};

const RESIDUES: &[u8] = b"ACDEFGHIKLMNPQRSTVWY";

/// `rows` sequences of `len` columns; every row differs from the reference
/// at every `stride`-th column.
fn alignment(rows: usize, len: usize, stride: usize) -> AlignmentModel {
    let reference: Vec<u8> =
        (0..len).map(|i| RESIDUES[i % RESIDUES.len()]).collect();
    let sequences = (0..rows)
        .map(|r| {
            let residues: String = reference
                .iter()
                .enumerate()
                .map(|(c, &s)| {
                    if r > 0 && c % stride == 0 {
                        '-'
                    } else {
                        char::from(s)
                    }
                })
                .collect();
            Sequence::new(format!("s{r}"), &residues, format!("c{r}_A"))
        })
        .collect();
    let mut model = AlignmentModel::new();
    let _ = model.load(sequences);
    model
}

fn variant_scan_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("variant_columns");

    for rows in [10, 100, 1000] {
        let sparse = alignment(rows, 500, 50);
        let _ = group.bench_function(format!("{rows}_rows_sparse"), |b| {
            b.iter(|| black_box(sparse.variant_columns().count()))
        });

        // Only column 0 differs.
        let conserved = alignment(rows, 500, usize::MAX);
        let _ = group.bench_function(format!("{rows}_rows_conserved"), |b| {
            b.iter(|| black_box(conserved.variant_columns().count()))
        });
    }
    group.finish();
}

fn conserved_scan_benchmark(c: &mut Criterion) {
    let model = alignment(200, 1000, 7);
    let _ = c.bench_function("conserved_columns_200x1000", |b| {
        b.iter(|| black_box(model.conserved_columns().count()))
    });
}

criterion_group!(benches, variant_scan_benchmark, conserved_scan_benchmark);
criterion_main!(benches);
