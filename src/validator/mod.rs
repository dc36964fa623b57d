//! # IDX Validation Module
//!
//! Integrity validation for IDX files.
//!
//! ## Validation Checklist
//!
//! 1. **Header**: the preamble parses (reserved prefix, type tag, dimensions)
//! 2. **Record count**: the file declares at least one record
//! 3. **Payload size**: the file length matches header + declared payload
//! 4. **Records**: every declared record can be read in full
//! 5. **Finite values**: floating-point payloads contain no NaN or infinity
//!
//! ## Usage
//!
//! ```rust,no_run
//! use idxfile::reader::ReaderConfig;
//! use idxfile::validator::validate_idx_file;
//! use std::path::Path;
//!
//! let report = validate_idx_file(Path::new("t10k-images-idx3-ubyte"), &ReaderConfig::default())?;
//! println!("{}", report);
//! # Ok::<(), idxfile::IdxError>(())
//! ```

use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::debug;

use crate::element::{Element, ElementType};
use crate::error::IdxError;
use crate::reader::{IdxReader, ReaderConfig};

pub use report::{CheckStatus, ValidationCheck, ValidationReport};

mod report;

const CHECK_HEADER: &str = "Header";
const CHECK_RECORD_COUNT: &str = "Record count";
const CHECK_PAYLOAD_SIZE: &str = "Payload size";
const CHECK_RECORDS: &str = "Records readable";
const CHECK_FINITE: &str = "Finite values";

/// Validate the IDX file at `path`.
///
/// Problems with the file contents are reported as failed checks; only a file
/// that cannot be opened at all is returned as an error.
pub fn validate_idx_file(path: &Path, config: &ReaderConfig) -> Result<ValidationReport, IdxError> {
    let mut report = ValidationReport::new(path.display().to_string());

    let file = File::open(path)?;
    let file_len = file.metadata()?.len();
    debug!("Validating {} ({} bytes)", path.display(), file_len);

    validate_stream(file, Some(file_len), config, &mut report);
    Ok(report)
}

/// Validate an IDX stream, appending check results to `report`.
///
/// `stream_len` enables the payload size check when the total length is known.
pub fn validate_stream<R: Read>(
    source: R,
    stream_len: Option<u64>,
    config: &ReaderConfig,
    report: &mut ValidationReport,
) {
    let mut reader = match IdxReader::open_with_config(source, config.clone()) {
        Ok(reader) => reader,
        Err(e) => {
            report.add_check(ValidationCheck::failed(CHECK_HEADER, e.to_string()));
            for name in [CHECK_RECORD_COUNT, CHECK_PAYLOAD_SIZE, CHECK_RECORDS] {
                report.add_check(ValidationCheck::skipped(name));
            }
            return;
        }
    };

    let header = reader.header().clone();
    report.add_check(ValidationCheck::ok_with(
        CHECK_HEADER,
        format!("{} {:?}", header.element_type(), header.dimensions()),
    ));

    if header.record_count() == 0 {
        report.add_check(ValidationCheck::warning(
            CHECK_RECORD_COUNT,
            "file declares zero records",
        ));
    } else {
        report.add_check(ValidationCheck::ok_with(
            CHECK_RECORD_COUNT,
            format!("{} records", header.record_count()),
        ));
    }

    match stream_len {
        Some(actual) => {
            let expected = header.encoded_len() as u64 + header.payload_byte_len();
            report.add_check(check_payload_size(expected, actual));
        }
        None => report.add_check(ValidationCheck::skipped(CHECK_PAYLOAD_SIZE)),
    }

    let mut non_finite = 0usize;
    let mut failure = None;
    while !reader.is_exhausted() {
        match reader.read_raw() {
            Ok(bytes) => non_finite += count_non_finite(header.element_type(), &bytes),
            Err(e) => {
                failure = Some(e);
                break;
            }
        }
    }

    match failure {
        Some(e) => report.add_check(ValidationCheck::failed(CHECK_RECORDS, e.to_string())),
        None => report.add_check(ValidationCheck::ok(CHECK_RECORDS)),
    }

    if header.element_type().is_float() {
        if non_finite > 0 {
            report.add_check(ValidationCheck::warning(
                CHECK_FINITE,
                format!("{} NaN or infinite values", non_finite),
            ));
        } else {
            report.add_check(ValidationCheck::ok(CHECK_FINITE));
        }
    }
}

fn check_payload_size(expected: u64, actual: u64) -> ValidationCheck {
    if actual == expected {
        ValidationCheck::ok_with(CHECK_PAYLOAD_SIZE, format!("{} bytes", actual))
    } else if actual > expected {
        ValidationCheck::warning(
            CHECK_PAYLOAD_SIZE,
            format!("{} trailing bytes after the last record", actual - expected),
        )
    } else {
        ValidationCheck::failed(
            CHECK_PAYLOAD_SIZE,
            format!(
                "file is {} bytes short of the declared {} bytes",
                expected - actual,
                expected
            ),
        )
    }
}

fn count_non_finite(element_type: ElementType, bytes: &[u8]) -> usize {
    match element_type {
        ElementType::F32 => f32::decode_be(bytes).iter().filter(|v| !v.is_finite()).count(),
        ElementType::F64 => f64::decode_be(bytes).iter().filter(|v| !v.is_finite()).count(),
        _ => 0,
    }
}
