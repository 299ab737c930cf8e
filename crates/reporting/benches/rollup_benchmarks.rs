use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;

use backoffice_invoicing::{Document, DocumentId, DocumentStatus, LineItem, LineProduct, Transaction};
use backoffice_parties::PartyId;
use backoffice_products::ProductId;
use backoffice_reporting::{ReportContext, Rollup, summarize_document};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 10).unwrap_or_default()
}

/// Mixed workload: a few parties, varied statuses, every third document an
/// expense, some lines without a price.
fn documents(count: usize) -> Vec<Document> {
    let parties: Vec<PartyId> = (0..16).map(|_| PartyId::generate()).collect();
    let statuses = [
        DocumentStatus::Pending,
        DocumentStatus::HalfPaid,
        DocumentStatus::Paid,
        DocumentStatus::Void,
    ];

    (0..count)
        .map(|i| {
            let mut d = Document::new(DocumentId::generate(), i.to_string(), statuses[i % 4]);
            d.party_id = Some(parties[i % parties.len()]);
            d.issue_date = Some(today() - Duration::days((i % 365) as i64));
            d.due_date = Some(today() + Duration::days((i % 30) as i64 - 10));
            d.lines = (0..5)
                .map(|n| LineItem {
                    product: Some(LineProduct {
                        product_id: ProductId::generate(),
                        gross_price: (n != 4).then(|| Decimal::from(1190 * (n + 1))),
                    }),
                    quantity: Some(Decimal::from(n + 1)),
                    quantity_paid: Some(Decimal::from(n % 2)),
                })
                .collect();
            d.transactions.push(if i % 3 == 0 {
                Transaction::expense()
            } else {
                Transaction::income()
            });
            d
        })
        .collect()
}

fn bench_summarize(c: &mut Criterion) {
    let ctx = ReportContext::new(today());
    let docs = documents(1);
    c.bench_function("summarize_document", |b| {
        b.iter(|| summarize_document(black_box(&docs[0]), &ctx));
    });
}

fn bench_rollup(c: &mut Criterion) {
    let mut group = c.benchmark_group("rollup");
    let ctx = ReportContext::new(today());

    for size in [100usize, 1_000, 10_000] {
        let docs = documents(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &docs, |b, docs| {
            b.iter(|| {
                let summaries = docs.iter().map(|d| summarize_document(d, &ctx));
                Rollup::from_summaries(summaries, ctx.today)
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_summarize, bench_rollup);
criterion_main!(benches);
