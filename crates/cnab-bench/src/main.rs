//! Benchmark for CNAB 240 remittance files.
//!
//! Builds a payment remittance (file header, one detail per payment, file
//! trailer) from JSON data, or from synthetic payments when no file is
//! given, then times encoding and prefix-dispatched decoding.

use std::fs;
use std::time::Instant;

use cnab::{Layout, PrefixMap, Record};
use lazy_static::lazy_static;
use serde::Deserialize;

// =============================================================================
// JSON DATA STRUCTURES
// =============================================================================

#[derive(Debug, Deserialize)]
struct Payment {
    id: u32,
    payee: String,
    document: u64,
    bank: u16,
    branch: u32,
    account: u64,
    amount: f64,
    #[serde(default)]
    description: Option<String>,
}

fn synthetic_payments(count: u32) -> Vec<Payment> {
    (1..=count)
        .map(|id| Payment {
            id,
            payee: format!("Fornecedor {id}"),
            document: 10_000_000_000 + u64::from(id),
            bank: [1, 33, 104, 237, 341][id as usize % 5],
            branch: 1000 + id % 9000,
            account: 100_000 + u64::from(id) * 7,
            amount: f64::from(id % 100_000) + f64::from(id % 100) / 100.0,
            description: (id % 3 == 0).then(|| format!("Nota fiscal {id}")),
        })
        .collect()
}

// =============================================================================
// CNAB 240 RECORDS
// =============================================================================

const BANK_CODE: u16 = 341;

#[derive(Debug, Default, Clone, PartialEq)]
struct FileHeader {
    bank: u16,
    batch: u16,
    record_type: u8,
    company_document: u64,
    company_name: String,
    bank_name: String,
    file_sequence: u32,
}

impl Record for FileHeader {
    fn layout() -> &'static Layout<Self> {
        lazy_static! {
            static ref LAYOUT: Layout<FileHeader> = Layout::<FileHeader>::builder()
                .field("bank", "0,3", |r| &r.bank, |r| &mut r.bank)
                .field("batch", "3,7", |r| &r.batch, |r| &mut r.batch)
                .field("record_type", "7,8", |r| &r.record_type, |r| &mut r.record_type)
                .field("company_document", "18,32", |r| &r.company_document, |r| &mut r.company_document)
                .field("company_name", "72,102", |r| &r.company_name, |r| &mut r.company_name)
                .field("bank_name", "102,132", |r| &r.bank_name, |r| &mut r.bank_name)
                .field("file_sequence", "157,163", |r| &r.file_sequence, |r| &mut r.file_sequence)
                .build();
        }
        &LAYOUT
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
struct Detail {
    bank: u16,
    batch: u16,
    record_type: u8,
    sequence: u32,
    segment: String,
    payee_bank: u16,
    payee_branch: u32,
    payee_account: u64,
    payee_name: String,
    reference: u32,
    amount: f64,
    payee_document: u64,
    description: String,
}

impl Record for Detail {
    fn layout() -> &'static Layout<Self> {
        lazy_static! {
            static ref LAYOUT: Layout<Detail> = Layout::<Detail>::builder()
                .field("bank", "0,3", |r| &r.bank, |r| &mut r.bank)
                .field("batch", "3,7", |r| &r.batch, |r| &mut r.batch)
                .field("record_type", "7,8", |r| &r.record_type, |r| &mut r.record_type)
                .field("sequence", "8,13", |r| &r.sequence, |r| &mut r.sequence)
                .field("segment", "13,14", |r| &r.segment, |r| &mut r.segment)
                .field("payee_bank", "20,23", |r| &r.payee_bank, |r| &mut r.payee_bank)
                .field("payee_branch", "23,28", |r| &r.payee_branch, |r| &mut r.payee_branch)
                .field("payee_account", "29,41", |r| &r.payee_account, |r| &mut r.payee_account)
                .field("payee_name", "43,73", |r| &r.payee_name, |r| &mut r.payee_name)
                .field("reference", "73,93", |r| &r.reference, |r| &mut r.reference)
                .field("amount", "119,134", |r| &r.amount, |r| &mut r.amount)
                .field("payee_document", "203,217", |r| &r.payee_document, |r| &mut r.payee_document)
                .field("description", "177,203", |r| &r.description, |r| &mut r.description)
                .build();
        }
        &LAYOUT
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
struct FileTrailer {
    bank: u16,
    batch: u16,
    record_type: u8,
    batches: u32,
    records: u32,
}

impl Record for FileTrailer {
    fn layout() -> &'static Layout<Self> {
        lazy_static! {
            static ref LAYOUT: Layout<FileTrailer> = Layout::<FileTrailer>::builder()
                .field("bank", "0,3", |r| &r.bank, |r| &mut r.bank)
                .field("batch", "3,7", |r| &r.batch, |r| &mut r.batch)
                .field("record_type", "7,8", |r| &r.record_type, |r| &mut r.record_type)
                .field("batches", "17,23", |r| &r.batches, |r| &mut r.batches)
                .field("records", "23,29", |r| &r.records, |r| &mut r.records)
                .build();
        }
        &LAYOUT
    }
}

// =============================================================================
// CONVERSION
// =============================================================================

fn build_remittance(payments: &[Payment]) -> (FileHeader, Vec<Detail>, FileTrailer) {
    let header = FileHeader {
        bank: BANK_CODE,
        batch: 0,
        record_type: 0,
        company_document: 12_345_678_000_199,
        company_name: "Empresa Exemplo Ltda".to_string(),
        bank_name: "Banco Exemplo".to_string(),
        file_sequence: 1,
    };

    let details: Vec<Detail> = payments
        .iter()
        .enumerate()
        .map(|(i, payment)| Detail {
            bank: BANK_CODE,
            batch: 1,
            record_type: 3,
            sequence: (i as u32 % 99_999) + 1,
            segment: "A".to_string(),
            payee_bank: payment.bank,
            payee_branch: payment.branch,
            payee_account: payment.account,
            payee_name: payment.payee.clone(),
            reference: payment.id,
            amount: payment.amount,
            payee_document: payment.document,
            description: payment.description.clone().unwrap_or_default(),
        })
        .collect();

    let trailer = FileTrailer {
        bank: BANK_CODE,
        batch: 9999,
        record_type: 9,
        batches: 1,
        records: details.len() as u32 + 2,
    };

    (header, details, trailer)
}

fn main() {
    let payments = match std::env::args().nth(1) {
        Some(path) => {
            println!("Loading payments from: {}", path);
            let json_data = fs::read_to_string(&path).expect("Failed to read payments file");

            let parse_start = Instant::now();
            let payments: Vec<Payment> =
                serde_json::from_str(&json_data).expect("Failed to parse JSON");
            println!("Loaded {} payments in {:?}", payments.len(), parse_start.elapsed());
            payments
        }
        None => {
            let payments = synthetic_payments(100_000);
            println!("Generated {} synthetic payments", payments.len());
            payments
        }
    };

    let convert_start = Instant::now();
    let (header, details, trailer) = build_remittance(&payments);
    println!(
        "Converted to {} records in {:?}",
        details.len() + 2,
        convert_start.elapsed()
    );

    // Encoding
    let encode_start = Instant::now();
    let encoded = cnab::marshal_240(&[&header, &details, &trailer]).expect("Failed to encode");
    let encode_time = encode_start.elapsed();

    println!("\nEncoded: {} bytes in {:?}", encoded.len(), encode_time);
    println!(
        "  Throughput: {:.2} MB/s",
        (encoded.len() as f64 / 1_000_000.0) / encode_time.as_secs_f64()
    );

    // Decoding, routed by the "bank + batch" prefix
    let mut decoded_header = FileHeader::default();
    let mut decoded_details: Vec<Detail> = Vec::with_capacity(details.len());
    let mut decoded_trailer = FileTrailer::default();

    let decode_start = Instant::now();
    let mut routes = PrefixMap::new()
        .route(format!("{BANK_CODE:03}0000"), &mut decoded_header)
        .route(format!("{BANK_CODE:03}00013"), &mut decoded_details)
        .route(format!("{BANK_CODE:03}9999"), &mut decoded_trailer);
    cnab::unmarshal(&encoded, &mut routes).expect("Failed to decode");
    drop(routes);
    let decode_time = decode_start.elapsed();

    println!("\nDecoded: {} details in {:?}", decoded_details.len(), decode_time);
    println!(
        "  Throughput: {:.2} MB/s",
        (encoded.len() as f64 / 1_000_000.0) / decode_time.as_secs_f64()
    );

    // Verify round-trip of what the format keeps
    let mut round_trip_ok = decoded_details.len() == details.len();
    round_trip_ok &= decoded_trailer.records == trailer.records;
    round_trip_ok &= decoded_header.company_document == header.company_document;
    for (original, decoded) in details.iter().zip(&decoded_details) {
        round_trip_ok &= original.reference == decoded.reference
            && original.payee_document == decoded.payee_document
            && (original.amount - decoded.amount).abs() < 0.005;
    }
    println!(
        "\nRound-trip: {}",
        if round_trip_ok { "OK" } else { "MISMATCH" }
    );

    let reencoded = cnab::marshal_240(&[&decoded_header, &decoded_details, &decoded_trailer])
        .expect("Failed to re-encode");
    println!(
        "Re-encode identical: {}",
        if reencoded == encoded { "yes" } else { "no" }
    );
}
