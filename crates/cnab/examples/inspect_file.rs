//! Simple inspector for CNAB 240/400 files.

use std::collections::BTreeMap;
use std::fs;

use cnab::codec::{Lines, is_blank_line};
use cnab::{CNAB240, CNAB400, Layout, PrefixMap, Record};
use lazy_static::lazy_static;

// =============================================================================
// CNAB 240
// =============================================================================

/// Control fields shared by every CNAB 240 line.
#[derive(Debug, Default)]
struct Control240 {
    bank: String,
    batch: String,
    record_type: u8,
    segment: String,
}

impl Record for Control240 {
    fn layout() -> &'static Layout<Self> {
        lazy_static! {
            static ref LAYOUT: Layout<Control240> = Layout::<Control240>::builder()
                .field("bank", "0,3", |r| &r.bank, |r| &mut r.bank)
                .field("batch", "3,7", |r| &r.batch, |r| &mut r.batch)
                .field("record_type", "7,8", |r| &r.record_type, |r| &mut r.record_type)
                .field("segment", "13,14", |r| &r.segment, |r| &mut r.segment)
                .build();
        }
        &LAYOUT
    }
}

fn record_type_name(record_type: u8) -> &'static str {
    match record_type {
        0 => "file header",
        1 => "batch header",
        2 => "initial batch records",
        3 => "detail",
        4 => "final batch records",
        5 => "batch trailer",
        9 => "file trailer",
        _ => "unknown",
    }
}

fn inspect_240(data: &[u8]) {
    let mut lines: Vec<Control240> = Vec::new();
    cnab::unmarshal(data, &mut lines).expect("Failed to decode");

    let mut by_type: BTreeMap<u8, usize> = BTreeMap::new();
    let mut by_segment: BTreeMap<String, usize> = BTreeMap::new();
    for line in &lines {
        *by_type.entry(line.record_type).or_default() += 1;
        if line.record_type == 3 {
            *by_segment.entry(line.segment.clone()).or_default() += 1;
        }
    }

    println!("\n=== CNAB 240 ({} lines) ===", lines.len());
    if let Some(first) = lines.first() {
        println!("Bank: {}", first.bank);
    }
    for (record_type, count) in &by_type {
        println!("  [{}] {}: {}", record_type, record_type_name(*record_type), count);
    }
    for (segment, count) in &by_segment {
        println!("  segment {}: {}", segment, count);
    }
}

// =============================================================================
// CNAB 400
// =============================================================================

#[derive(Debug, Default)]
struct Header400 {
    operation: String,
    company: String,
    bank: String,
    bank_name: String,
}

impl Record for Header400 {
    fn layout() -> &'static Layout<Self> {
        lazy_static! {
            static ref LAYOUT: Layout<Header400> = Layout::<Header400>::builder()
                .field("operation", "2,9", |r| &r.operation, |r| &mut r.operation)
                .field("company", "46,76", |r| &r.company, |r| &mut r.company)
                .field("bank", "76,79", |r| &r.bank, |r| &mut r.bank)
                .field("bank_name", "79,94", |r| &r.bank_name, |r| &mut r.bank_name)
                .build();
        }
        &LAYOUT
    }
}

#[derive(Debug, Default)]
struct Detail400 {
    our_number: String,
    amount: f64,
    sequence: u32,
}

impl Record for Detail400 {
    fn layout() -> &'static Layout<Self> {
        lazy_static! {
            static ref LAYOUT: Layout<Detail400> = Layout::<Detail400>::builder()
                .field("our_number", "62,70", |r| &r.our_number, |r| &mut r.our_number)
                .field("amount", "126,139", |r| &r.amount, |r| &mut r.amount)
                .field("sequence", "394,400", |r| &r.sequence, |r| &mut r.sequence)
                .build();
        }
        &LAYOUT
    }
}

#[derive(Debug, Default)]
struct Trailer400 {
    sequence: u32,
}

impl Record for Trailer400 {
    fn layout() -> &'static Layout<Self> {
        lazy_static! {
            static ref LAYOUT: Layout<Trailer400> = Layout::<Trailer400>::builder()
                .field("sequence", "394,400", |r| &r.sequence, |r| &mut r.sequence)
                .build();
        }
        &LAYOUT
    }
}

fn inspect_400(data: &[u8]) {
    let mut header = Header400::default();
    let mut details: Vec<Detail400> = Vec::new();
    let mut trailer = Trailer400::default();

    let mut routes = PrefixMap::new()
        .route("0", &mut header)
        .route("1", &mut details)
        .route("9", &mut trailer);
    cnab::unmarshal(data, &mut routes).expect("Failed to decode");
    drop(routes);

    println!("\n=== CNAB 400 ===");
    println!("Operation: {}", header.operation);
    println!("Company: {}", header.company);
    println!("Bank: {} {}", header.bank, header.bank_name);

    let total: f64 = details.iter().map(|d| d.amount).sum();
    println!("Details: {} (total {:.2})", details.len(), total);
    for detail in details.iter().take(20) {
        println!(
            "  #{:06} {:<8} {:>14.2}",
            detail.sequence, detail.our_number, detail.amount
        );
    }
    if details.len() > 20 {
        println!("  ... and {} more", details.len() - 20);
    }
    println!("Trailer sequence: {}", trailer.sequence);
}

fn main() {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "remessa.rem".to_string());

    println!("Reading: {}", path);

    let data = fs::read(&path).expect("Failed to read file");
    println!("File size: {} bytes", data.len());

    let width = Lines::new(&data)
        .find(|line| !is_blank_line(line))
        .map(|line| line.len())
        .unwrap_or(0);

    match width {
        CNAB240 => inspect_240(&data),
        CNAB400 => inspect_400(&data),
        // a lone line may still carry the final control byte
        w if w == CNAB240 + 1 => inspect_240(&data),
        w if w == CNAB400 + 1 => inspect_400(&data),
        other => println!("Unsupported line width: {}", other),
    }
}
