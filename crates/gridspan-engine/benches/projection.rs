use criterion::{Criterion, criterion_group, criterion_main};
use gridspan_engine::editing::{SelectionRect, Table};
use gridspan_engine::matrix::Matrix;
use gridspan_engine::model::{CellSpec, Grid};

/// A grid where every third cell on every other row spans 2x2, forcing the
/// projector to splice continuations and resolve overlaps.
fn spanned_grid(rows: usize, cols: usize) -> Grid {
    let mut specs = Vec::with_capacity(rows);
    // Remaining rows of coverage per column from spans anchored above, so
    // shadowed columns don't get a second anchor.
    let mut carry = vec![0usize; cols];
    for r in 0..rows {
        let mut row = Vec::new();
        let mut c = 0;
        while c < cols {
            if carry[c] > 0 {
                carry[c] -= 1;
                c += 1;
                continue;
            }
            if r % 2 == 0 && c % 3 == 0 && r + 1 < rows && c + 1 < cols && carry[c + 1] == 0 {
                row.push(CellSpec::spanned(2, 2));
                carry[c] = 1;
                carry[c + 1] = 1;
                c += 2;
            } else {
                row.push(CellSpec::plain());
                c += 1;
            }
        }
        specs.push(row);
    }
    Grid::from_rows(specs).unwrap()
}

fn bench_projection(c: &mut Criterion) {
    let mut group = c.benchmark_group("projection");

    for size in [10usize, 50, 100] {
        let grid = spanned_grid(size, size);
        group.bench_function(format!("project_{size}x{size}"), |b| {
            b.iter(|| {
                let matrix = Matrix::project(&grid);
                std::hint::black_box(matrix);
            });
        });
    }

    group.finish();
}

fn bench_normalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize");

    let grid = spanned_grid(100, 100);
    let matrix = Matrix::project(&grid);
    let rect = SelectionRect::new((1, 1), (80, 80));

    group.bench_function("normalize_100x100", |b| {
        b.iter(|| {
            let normalized = rect.normalize(&grid, &matrix);
            std::hint::black_box(normalized);
        });
    });

    group.finish();
}

fn bench_commands(c: &mut Criterion) {
    use gridspan_engine::Cmd;

    let mut group = c.benchmark_group("commands");
    group.sample_size(10);

    group.bench_function("add_row_100x100", |b| {
        b.iter(|| {
            let mut table = Table::new(100, 100);
            table.set_selection(SelectionRect::cell(50, 50));
            let patch = table.apply(Cmd::AddRowToTop);
            std::hint::black_box(patch);
        });
    });

    group.bench_function("merge_then_split_50x50", |b| {
        b.iter(|| {
            let mut table = Table::new(50, 50);
            table.set_selection(SelectionRect::new((10, 10), (40, 40)));
            table.apply(Cmd::MergeCells);
            let patch = table.apply(Cmd::SplitCells);
            std::hint::black_box(patch);
        });
    });

    group.finish();
}

criterion_group!(benches, bench_projection, bench_normalize, bench_commands);
criterion_main!(benches);
