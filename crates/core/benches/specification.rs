use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use catalog_core::specification::Criterion as Leaf;
use catalog_core::{FieldValue, QueryPredicate, Record, Specification};
use rust_decimal::Decimal;

#[derive(Debug, Clone)]
struct Row {
    price: Decimal,
    stock: i64,
    featured: bool,
}

impl Record for Row {
    fn field(&self, name: &str) -> FieldValue {
        match name {
            "price" => self.price.into(),
            "stock" => self.stock.into(),
            "featured" => self.featured.into(),
            _ => FieldValue::Null,
        }
    }
}

#[derive(Debug)]
struct PriceAtMost(Decimal);

impl Leaf<Row> for PriceAtMost {
    fn is_satisfied_by(&self, row: &Row) -> bool {
        row.price <= self.0
    }

    fn to_predicate(&self) -> QueryPredicate {
        QueryPredicate::le("price", self.0)
    }
}

#[derive(Debug)]
struct InStock;

impl Leaf<Row> for InStock {
    fn is_satisfied_by(&self, row: &Row) -> bool {
        row.stock > 0
    }

    fn to_predicate(&self) -> QueryPredicate {
        QueryPredicate::gt("stock", 0i64)
    }
}

#[derive(Debug)]
struct Featured;

impl Leaf<Row> for Featured {
    fn is_satisfied_by(&self, row: &Row) -> bool {
        row.featured
    }

    fn to_predicate(&self) -> QueryPredicate {
        QueryPredicate::eq("featured", true)
    }
}

fn rows(n: usize) -> Vec<Row> {
    (0..n)
        .map(|i| Row {
            price: Decimal::new((i as i64 * 37) % 10_000, 2),
            stock: (i as i64 % 7) - 2,
            featured: i % 3 == 0,
        })
        .collect()
}

/// Alternating And/Or chain of `depth` levels over the three leaves.
fn tree(depth: usize) -> Specification<Row> {
    (0..depth).fold(Specification::leaf(InStock), |acc, level| {
        let next = match level % 3 {
            0 => Specification::leaf(PriceAtMost(Decimal::from(50))),
            1 => Specification::leaf(Featured).not(),
            _ => Specification::leaf(InStock),
        };
        if level % 2 == 0 { acc.and(next) } else { acc.or(next) }
    })
}

fn bench_evaluation_paths(c: &mut Criterion) {
    let data = rows(1_000);
    let mut group = c.benchmark_group("specification_evaluation");
    group.throughput(Throughput::Elements(data.len() as u64));

    for depth in [1usize, 4, 16] {
        let spec = tree(depth);
        let predicate = spec.to_query_predicate();

        group.bench_with_input(BenchmarkId::new("in_memory", depth), &spec, |b, spec| {
            b.iter(|| data.iter().filter(|r| spec.is_satisfied_by(black_box(r))).count())
        });

        group.bench_with_input(BenchmarkId::new("predicate", depth), &predicate, |b, p| {
            b.iter(|| data.iter().filter(|r| p.evaluate(black_box(*r))).count())
        });
    }

    group.finish();
}

fn bench_translation(c: &mut Criterion) {
    let spec = tree(32);
    c.bench_function("to_query_predicate_depth_32", |b| {
        b.iter(|| black_box(&spec).to_query_predicate().simplify())
    });
}

criterion_group!(benches, bench_evaluation_paths, bench_translation);
criterion_main!(benches);
