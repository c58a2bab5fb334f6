use chrono::{DateTime, Duration, Local, NaiveDate, NaiveTime, TimeZone, Utc};
use clap::Args;
use std::sync::Arc;
use supplier_eval::config::AppConfig;
use supplier_eval::error::AppError;
use supplier_eval::evaluation::{
    BatchEvaluation, EvaluationPeriod, EvaluationRecord, InMemorySupplierStore, OrderId,
    OrderLineItem, PurchaseOrder, Receipt, ReceiptId, ReceiptLineItem, Supplier,
    SupplierCategory, SupplierEvaluationService, SupplierId, SupplierStatus, WeightConfig,
};

pub(crate) type DemoService =
    SupplierEvaluationService<InMemorySupplierStore, InMemorySupplierStore>;

#[derive(Args, Debug)]
pub(crate) struct EvaluateArgs {
    /// Supplier identifier (demo store: sup-steel, sup-resin, sup-fasten)
    #[arg(long)]
    pub(crate) supplier: String,
    /// Evaluation period (YYYY-MM). Defaults to the current month.
    #[arg(long)]
    pub(crate) period: Option<String>,
    /// Weights as delivery,quality,price,response (e.g. 30,30,20,20)
    #[arg(long)]
    pub(crate) weights: Option<WeightConfig>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct RankArgs {
    /// Evaluation period (YYYY-MM). Defaults to the current month.
    #[arg(long)]
    pub(crate) period: Option<String>,
    /// Number of suppliers to list. Defaults to EVAL_RANKING_LIMIT.
    #[arg(long)]
    pub(crate) limit: Option<usize>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct BatchArgs {
    /// Evaluation period (YYYY-MM). Defaults to the current month.
    #[arg(long)]
    pub(crate) period: Option<String>,
    /// Weights as delivery,quality,price,response
    #[arg(long)]
    pub(crate) weights: Option<WeightConfig>,
}

pub(crate) fn run_evaluate(args: EvaluateArgs) -> Result<(), AppError> {
    let EvaluateArgs {
        supplier,
        period,
        weights,
    } = args;
    let (service, period) = demo_service(period)?;

    let record = service.evaluate(&SupplierId(supplier), &period, weights)?;
    render_record(&record);
    Ok(())
}

pub(crate) fn run_rank(args: RankArgs) -> Result<(), AppError> {
    let (service, period) = demo_service(args.period)?;
    let limit = args.limit.unwrap_or_else(|| service.ranking_limit());

    service.batch_evaluate(&period, None)?;
    let ranking = service.rank(&period, limit)?;

    println!("=== Supplier Ranking {period} ===");
    if ranking.is_empty() {
        println!("No evaluations recorded for {period}.");
    }
    for (position, record) in ranking.iter().enumerate() {
        let row = record.summary_view();
        println!(
            "{:>2}. {:<8} {:<28} {:>6.2}  {:<2}  (delivery {:.2}, quality {:.2}, price {:.2}, response {:.2})",
            position + 1,
            row.supplier_code,
            row.supplier_name,
            row.overall_score,
            row.rating,
            row.delivery_score,
            row.quality_score,
            row.price_score,
            row.response_score,
        );
    }
    Ok(())
}

pub(crate) fn run_batch(args: BatchArgs) -> Result<(), AppError> {
    let (service, period) = demo_service(args.period)?;
    let batch = service.batch_evaluate(&period, args.weights)?;
    render_batch(&batch);
    Ok(())
}

/// Service over a freshly seeded demo store, using the configured defaults.
fn demo_service(period: Option<String>) -> Result<(DemoService, String), AppError> {
    let config = AppConfig::load()?;
    let period = match period {
        Some(raw) => raw
            .parse::<EvaluationPeriod>()
            .map_err(|err| AppError::Evaluation(err.into()))?,
        None => current_period(),
    };

    let store = demo_store(period);
    let service = SupplierEvaluationService::new(Arc::new(store.clone()), Arc::new(store))
        .with_default_weights(config.evaluation.default_weights)
        .with_ranking_limit(config.evaluation.ranking_limit);
    Ok((service, period.to_string()))
}

pub(crate) fn current_period() -> EvaluationPeriod {
    EvaluationPeriod::containing(Local::now().date_naive())
}

/// Four suppliers with a month of order history inside `period`.
///
/// STEEL delivers on time with clean inspections and quick approvals, RESIN runs late
/// with more rejects and slow approvals, FASTEN has orders but nothing received yet.
/// The blacklisted SCRAP supplier is skipped by batch runs.
pub(crate) fn demo_store(period: EvaluationPeriod) -> InMemorySupplierStore {
    let store = InMemorySupplierStore::default();
    let first = period.first_day();

    store.add_supplier(demo_supplier("sup-steel", "STEEL", "Northern Steel Works"));
    store.add_supplier(demo_supplier("sup-resin", "RESIN", "Coastal Resin Supply"));
    store.add_supplier(demo_supplier("sup-fasten", "FASTEN", "Precision Fasteners"));
    store.add_supplier(Supplier {
        status: SupplierStatus::Blacklisted,
        ..demo_supplier("sup-scrap", "SCRAP", "Salvage Metals")
    });

    // (order, supplier, unit price, received day, received, qualified, approval hours)
    let history: [(&str, &str, f64, Option<i64>, f64, f64, i64); 7] = [
        ("po-1001", "sup-steel", 7.5, Some(8), 200.0, 198.0, 4),
        ("po-1002", "sup-steel", 7.6, Some(9), 150.0, 150.0, 6),
        ("po-1003", "sup-steel", 7.4, Some(10), 250.0, 246.0, 8),
        ("po-1004", "sup-resin", 12.5, Some(13), 100.0, 88.0, 70),
        ("po-1005", "sup-resin", 12.0, Some(16), 120.0, 110.0, 96),
        ("po-1006", "sup-fasten", 9.0, None, 0.0, 0.0, 20),
        ("po-1007", "sup-scrap", 8.0, Some(5), 50.0, 20.0, 2),
    ];

    for (order_id, supplier_id, unit_price, received_day, received, qualified, hours) in history
    {
        let submitted_at = morning_of(day_in(first, 1));
        let quantity = if received > 0.0 { received } else { 500.0 };

        store.add_order(PurchaseOrder {
            id: OrderId(order_id.to_string()),
            supplier_id: SupplierId(supplier_id.to_string()),
            order_date: day_in(first, 1),
            promised_date: Some(day_in(first, 10)),
            required_date: Some(day_in(first, 14)),
            submitted_at: Some(submitted_at),
            approved_at: Some(submitted_at + Duration::hours(hours)),
            total_amount: unit_price * quantity,
            lines: vec![OrderLineItem {
                order_id: OrderId(order_id.to_string()),
                unit_price,
                quantity,
            }],
        });

        if let Some(offset) = received_day {
            let receipt_id = ReceiptId(format!("gr-{order_id}"));
            store.add_receipt(
                Receipt {
                    id: receipt_id.clone(),
                    order_id: OrderId(order_id.to_string()),
                    receipt_date: day_in(first, offset),
                },
                vec![ReceiptLineItem {
                    receipt_id,
                    received_qty: received,
                    qualified_qty: qualified,
                    rejected_qty: received - qualified,
                }],
            );
        }
    }

    store
}

fn demo_supplier(id: &str, code: &str, name: &str) -> Supplier {
    Supplier {
        id: SupplierId(id.to_string()),
        code: code.to_string(),
        name: name.to_string(),
        status: SupplierStatus::Active,
        category: SupplierCategory::Material,
    }
}

/// `first` shifted to the one-based day of the same month.
fn day_in(first: NaiveDate, day: i64) -> NaiveDate {
    first + Duration::days(day - 1)
}

fn morning_of(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)) + Duration::hours(8)
}

fn render_record(record: &EvaluationRecord) {
    let breakdown = &record.breakdown;
    println!(
        "=== {} {} ({}) ===",
        record.supplier_code, record.supplier_name, record.period
    );
    println!(
        "Window: {} to {} | orders: {} | amount: {:.2}",
        record.period_start, record.period_end, record.total_orders, record.total_amount
    );
    println!(
        "Delivery  {:>6.2}  on-time {:.2}% ({} on time, {} late, avg delay {:.2} days)",
        breakdown.delivery.score,
        breakdown.delivery.on_time_rate,
        breakdown.delivery.on_time_orders,
        breakdown.delivery.late_orders,
        breakdown.delivery.avg_delay_days
    );
    println!(
        "Quality   {:>6.2}  {} of {} qualified, {} rejected",
        breakdown.quality.score,
        breakdown.quality.qualified_qty,
        breakdown.quality.received_qty,
        breakdown.quality.rejected_qty
    );
    println!(
        "Price     {:>6.2}  supplier avg {} vs market {} ({:+.2}%)",
        breakdown.price.score,
        format_price(breakdown.price.supplier_avg_price),
        format_price(breakdown.price.market_avg_price),
        breakdown.price.vs_market_pct
    );
    println!(
        "Response  {:>6.2}  avg {:.2}h over {} orders",
        breakdown.response.score, breakdown.response.avg_hours, breakdown.response.measured_orders
    );
    println!(
        "Overall   {:>6.2}  rating {} (weights {}/{}/{}/{})",
        record.overall_score,
        record.rating,
        record.weights.delivery,
        record.weights.quality,
        record.weights.price,
        record.weights.response
    );
}

fn render_batch(batch: &BatchEvaluation) {
    println!("=== Batch Evaluation {} ===", batch.period);
    for record in batch.records() {
        println!(
            "  ok    {:<8} {:>6.2}  {}",
            record.supplier_code, record.overall_score, record.rating
        );
    }
    for failure in batch.failures() {
        println!("  fail  {:<8} {}", failure.supplier_code, failure.reason);
    }
    println!(
        "Evaluated {}, failed {}",
        batch.evaluated_count(),
        batch.failures().count()
    );
}

fn format_price(price: Option<f64>) -> String {
    price
        .map(|value| format!("{value:.2}"))
        .unwrap_or_else(|| "n/a".to_string())
}
