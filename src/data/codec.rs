//! CSV codec for the member store file.
//!
//! The file is one header row followed by one row per member, fields in the fixed
//! order of [`HEADER`]. Fields containing commas or quotes are quoted by the CSV
//! writer, so free-text strike reasons survive a round trip.

use std::io;

use csv::{ReaderBuilder, StringRecord, WriterBuilder};

use crate::error::store::MalformedRecord;
use crate::model::member::{MemberRecord, MAX_STRIKES};

pub const COLUMN_COUNT: usize = 9;

pub const HEADER: [&str; COLUMN_COUNT] = [
    "ID",
    "DisplayName",
    "MembershipStatus",
    "StrikeCount",
    "Reason1",
    "Reason2",
    "Reason3",
    "Reason4",
    "BanExpiry",
];

/// A data row that was skipped while decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    /// 1-based line number in the file.
    pub line: u64,
    pub error: MalformedRecord,
}

/// Records decoded from a store file, plus the rows that could not be decoded.
#[derive(Debug, Default)]
pub struct Decoded {
    pub records: Vec<MemberRecord>,
    pub skipped: Vec<SkippedRow>,
}

/// Decodes a store file.
///
/// Malformed rows are collected in [`Decoded::skipped`] and decoding continues with
/// the next row. Only an I/O failure of the underlying reader aborts decoding.
///
/// # Arguments
/// - `reader` - Source of the CSV text, header row included
///
/// # Returns
/// - `Ok(Decoded)` - All decodable records and the skipped rows
/// - `Err(csv::Error)` - Reading from `reader` failed
pub fn decode<R: io::Read>(reader: R) -> Result<Decoded, csv::Error> {
    let mut reader = ReaderBuilder::new().flexible(true).from_reader(reader);
    let mut decoded = Decoded::default();

    for (index, row) in reader.records().enumerate() {
        // Header is line 1, so the first data row is line 2 when positions are missing.
        let fallback_line = index as u64 + 2;

        match row {
            Ok(row) => {
                let line = row.position().map(|p| p.line()).unwrap_or(fallback_line);
                match decode_row(&row) {
                    Ok(record) => decoded.records.push(record),
                    Err(error) => decoded.skipped.push(SkippedRow { line, error }),
                }
            }
            Err(err) if err.is_io_error() => return Err(err),
            Err(err) => {
                let line = err.position().map(|p| p.line()).unwrap_or(fallback_line);
                decoded.skipped.push(SkippedRow {
                    line,
                    error: MalformedRecord::Unreadable(err.to_string()),
                });
            }
        }
    }

    Ok(decoded)
}

/// Encodes records into a complete store file, header row first.
pub fn encode<'a, W, I>(writer: W, records: I) -> Result<(), csv::Error>
where
    W: io::Write,
    I: IntoIterator<Item = &'a MemberRecord>,
{
    let mut writer = WriterBuilder::new().from_writer(writer);

    writer.write_record(HEADER)?;
    for record in records {
        writer.write_record(encode_row(record))?;
    }
    writer.flush()?;

    Ok(())
}

fn encode_row(record: &MemberRecord) -> [String; COLUMN_COUNT] {
    let [r1, r2, r3, r4] = record.strike_reasons.clone();
    [
        record.id.to_string(),
        record.display_name.clone(),
        record.status.to_string(),
        record.strike_count.to_string(),
        r1,
        r2,
        r3,
        r4,
        record.ban_expiry.to_string(),
    ]
}

fn decode_row(row: &StringRecord) -> Result<MemberRecord, MalformedRecord> {
    if row.len() != COLUMN_COUNT {
        return Err(MalformedRecord::ColumnCount {
            expected: COLUMN_COUNT,
            found: row.len(),
        });
    }
    let field = |index: usize| row.get(index).unwrap_or_default();

    let id = field(0)
        .trim()
        .parse::<u64>()
        .map_err(|_| MalformedRecord::InvalidId(field(0).to_string()))?;
    let status = field(2).parse().map_err(MalformedRecord::InvalidStatus)?;
    let strike_count = field(3)
        .trim()
        .parse::<u8>()
        .ok()
        .filter(|count| *count <= MAX_STRIKES)
        .ok_or_else(|| MalformedRecord::InvalidStrikeCount(field(3).to_string()))?;
    let ban_expiry = field(8).parse().map_err(MalformedRecord::InvalidBanExpiry)?;

    Ok(MemberRecord {
        id,
        display_name: field(1).to_string(),
        status,
        strike_count,
        strike_reasons: [4, 5, 6, 7].map(|index| field(index).to_string()),
        ban_expiry,
    })
}
