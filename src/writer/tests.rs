use super::*;
use crate::reader::IdxReader;
use std::io::Cursor;

#[test]
fn test_write_scenario_a() -> Result<(), IdxError> {
    let mut writer = IdxWriter::new(Vec::new(), ElementType::U8, vec![1, 2, 2])?;
    writer.write(&[1u8, 2, 3, 4])?;

    let (bytes, stats) = writer.finish_into_inner()?;
    assert_eq!(
        bytes,
        vec![
            0x00, 0x00, 0x08, 0x03, //
            0x00, 0x00, 0x00, 0x01, //
            0x00, 0x00, 0x00, 0x02, //
            0x00, 0x00, 0x00, 0x02, //
            0x01, 0x02, 0x03, 0x04,
        ]
    );
    assert_eq!(stats.records_written, 1);
    assert_eq!(stats.bytes_written, 20);

    Ok(())
}

#[test]
fn test_write_read_roundtrip_f32() -> Result<(), IdxError> {
    let records = vec![vec![0.5f32, -1.25, f32::MAX], vec![f32::MIN_POSITIVE, 0.0, -0.0]];

    let mut writer = IdxWriter::new(Vec::new(), ElementType::F32, vec![2, 3])?;
    writer.write_records::<f32, _>(&records)?;
    let (bytes, _) = writer.finish_into_inner()?;

    let mut reader = IdxReader::open(Cursor::new(bytes))?;
    for expected in &records {
        let actual = reader.read_f32()?;
        let expected_bits: Vec<u32> = expected.iter().map(|v| v.to_bits()).collect();
        let actual_bits: Vec<u32> = actual.iter().map(|v| v.to_bits()).collect();
        assert_eq!(actual_bits, expected_bits);
    }
    assert!(reader.is_exhausted());

    Ok(())
}

#[test]
fn test_write_raw_checks_length() -> Result<(), IdxError> {
    let mut writer = IdxWriter::new(Vec::new(), ElementType::I16, vec![1, 2])?;

    assert!(matches!(
        writer.write_raw(&[0, 1, 0]),
        Err(IdxError::RecordLength {
            expected: 4,
            actual: 3
        })
    ));
    writer.write_raw(&[0, 1, 0, 2])?;
    writer.finish()?;

    Ok(())
}

#[test]
fn test_write_checks_type_and_length() -> Result<(), IdxError> {
    let mut writer = IdxWriter::new(Vec::new(), ElementType::I32, vec![1, 2])?;

    assert!(matches!(
        writer.write(&[1i16, 2]),
        Err(IdxError::TypeMismatch {
            declared: ElementType::I32,
            requested: ElementType::I16
        })
    ));
    assert!(matches!(
        writer.write(&[1i32, 2, 3]),
        Err(IdxError::RecordLength {
            expected: 2,
            actual: 3
        })
    ));
    assert_eq!(writer.stats().records_written, 0);

    writer.write(&[1i32, 2])?;
    writer.finish()?;

    Ok(())
}

#[test]
fn test_write_past_declared_count() -> Result<(), IdxError> {
    let mut writer = IdxWriter::new(Vec::new(), ElementType::U8, vec![1])?;
    writer.write(&[9u8])?;

    assert!(matches!(
        writer.write(&[10u8]),
        Err(IdxError::Exhausted { count: 1 })
    ));
    writer.finish()?;

    Ok(())
}

#[test]
fn test_finish_before_all_records() -> Result<(), IdxError> {
    let mut writer = IdxWriter::new(Vec::new(), ElementType::U8, vec![3, 1])?;
    writer.write(&[1u8])?;

    assert!(matches!(
        writer.finish(),
        Err(IdxError::IncompleteWrite {
            written: 1,
            declared: 3
        })
    ));

    Ok(())
}

#[test]
fn test_new_rejects_empty_dimensions() {
    assert!(matches!(
        IdxWriter::new(Vec::new(), ElementType::U8, vec![]),
        Err(IdxError::Size(_))
    ));
}

#[test]
fn test_dropped_writer_flushes_written_records() -> Result<(), IdxError> {
    let mut sink = Vec::new();
    {
        let mut writer = IdxWriter::new(&mut sink, ElementType::U8, vec![2, 2])?;
        writer.write(&[7u8, 8])?;
    }

    // Header (12 bytes) plus the one record written before the drop
    assert_eq!(sink.len(), 14);
    assert_eq!(&sink[12..], &[7, 8]);

    let mut reader = IdxReader::open(Cursor::new(sink))?;
    assert_eq!(reader.read_u8()?, vec![7, 8]);
    assert!(matches!(
        reader.read_u8(),
        Err(IdxError::TruncatedRecord { index: 1, .. })
    ));

    Ok(())
}

#[test]
fn test_stats_track_each_record() -> Result<(), IdxError> {
    let mut writer = IdxWriter::new(Vec::new(), ElementType::I16, vec![2, 3])?;
    assert_eq!(writer.stats().bytes_written, 12);

    writer.write(&[1i16, 2, 3])?;
    assert_eq!(writer.stats().records_written, 1);
    assert_eq!(writer.stats().bytes_written, 18);

    writer.write_raw(&[0, 4, 0, 5, 0, 6])?;
    let (bytes, stats) = writer.finish_into_inner()?;
    assert_eq!(stats.records_written, 2);
    assert_eq!(stats.bytes_written, bytes.len() as u64);

    Ok(())
}
