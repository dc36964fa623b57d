//! Producer/consumer delivery of decoded records.
//!
//! The reader itself is synchronous. This module layers a single producer
//! thread on top of it that drains records into a bounded channel, so that
//! decoding overlaps with whatever the consumer does with each record.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐     bounded channel      ┌─────────────┐
//! │ Producer thread  │ ──Result<Vec<T>>──────▶  │  Consumer   │
//! │ (IdxReader loop) │                          │  (caller)   │
//! └──────────────────┘   closes at end/error    └─────────────┘
//! ```
//!
//! The channel is closed after the last declared record or after the first
//! error has been delivered; consumers see this as the end of iteration.
//! Dropping or joining the [`RecordChannel`] signals the producer to stop, even
//! while clones of the receiver are still alive.
//!
//! # Example
//!
//! ```rust,no_run
//! use idxfile::channel::{spawn_record_channel, ChannelConfig};
//! use idxfile::reader::IdxReader;
//!
//! let reader = IdxReader::open_file("train-images-idx3-ubyte")?;
//! let channel = spawn_record_channel::<_, u8>(reader, ChannelConfig::default())?;
//!
//! for record in channel {
//!     let pixels = record?;
//!     println!("{} pixels", pixels.len());
//! }
//! # Ok::<(), idxfile::IdxError>(())
//! ```

use std::io::Read;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{bounded, never, select, Receiver, Sender, TryRecvError};
use log::debug;

use crate::element::Element;
use crate::error::IdxError;
use crate::reader::IdxReader;

/// Configuration for the record channel
#[derive(Debug, Clone)]
pub struct ChannelConfig {
    /// Number of decoded records buffered between producer and consumer
    pub capacity: usize,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self { capacity: 16 }
    }
}

/// Statistics reported by the producer thread
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelStats {
    /// Records successfully decoded and delivered
    pub records_sent: u32,
}

/// Receiving end of a record pipeline
///
/// Iterating yields each record in file order, then ends once the channel is
/// closed.
pub struct RecordChannel<T> {
    /// Replaced by a never-ready receiver on join() or drop
    receiver: Receiver<Result<Vec<T>, IdxError>>,
    /// Dropping the sender tells the producer to stop
    stop: Option<Sender<()>>,
    /// None after join() is called
    handle: Option<JoinHandle<ChannelStats>>,
}

/// Spawn a producer thread decoding records of type `T` from `reader`
pub fn spawn_record_channel<R, T>(
    reader: IdxReader<R>,
    config: ChannelConfig,
) -> Result<RecordChannel<T>, IdxError>
where
    R: Read + Send + 'static,
    T: Element,
{
    spawn_with(reader, config, IdxReader::read::<T>)
}

/// Spawn a producer thread delivering undecoded records from `reader`
pub fn spawn_raw_record_channel<R>(
    reader: IdxReader<R>,
    config: ChannelConfig,
) -> Result<RecordChannel<u8>, IdxError>
where
    R: Read + Send + 'static,
{
    spawn_with(reader, config, IdxReader::read_raw)
}

fn spawn_with<R, T>(
    mut reader: IdxReader<R>,
    config: ChannelConfig,
    read_next: fn(&mut IdxReader<R>) -> Result<Vec<T>, IdxError>,
) -> Result<RecordChannel<T>, IdxError>
where
    R: Read + Send + 'static,
    T: Send + 'static,
{
    let (sender, receiver) = bounded(config.capacity);
    let (stop, stop_signal) = bounded::<()>(0);

    let handle = thread::Builder::new()
        .name("idx-reader".to_string())
        .spawn(move || {
            let mut stats = ChannelStats { records_sent: 0 };

            while !reader.is_exhausted() {
                if let Err(TryRecvError::Disconnected) = stop_signal.try_recv() {
                    debug!("Record channel stopped after {} records", stats.records_sent);
                    return stats;
                }

                let result = read_next(&mut reader);
                let failed = result.is_err();
                let delivered = select! {
                    send(sender, result) -> sent => sent.is_ok(),
                    recv(stop_signal) -> _ => false,
                };
                if !delivered {
                    debug!(
                        "Record consumer disconnected after {} records",
                        stats.records_sent
                    );
                    return stats;
                }
                if failed {
                    break;
                }
                stats.records_sent += 1;
            }

            // Sender drops here, closing the channel
            stats
        })?;

    Ok(RecordChannel {
        receiver,
        stop: Some(stop),
        handle: Some(handle),
    })
}

impl<T> RecordChannel<T> {
    /// Receiving end of the channel.
    ///
    /// Clone it to fan records out to several consumer threads; crossbeam
    /// receivers are multi-consumer and each record is delivered once.
    pub fn receiver(&self) -> &Receiver<Result<Vec<T>, IdxError>> {
        &self.receiver
    }

    /// Stop the producer and drop our end of the channel
    fn disconnect(&mut self) {
        self.stop.take();
        drop(std::mem::replace(&mut self.receiver, never()));
    }

    /// Stop the producer thread and wait for it to exit.
    ///
    /// Records not yet received are discarded, including those that clones of
    /// the receiver have not picked up yet.
    pub fn join(mut self) -> Result<ChannelStats, IdxError> {
        self.disconnect();
        match self.handle.take() {
            Some(handle) => handle.join().map_err(|_| IdxError::ProducerPanicked),
            None => Ok(ChannelStats { records_sent: 0 }),
        }
    }
}

impl<T> Iterator for RecordChannel<T> {
    type Item = Result<Vec<T>, IdxError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.receiver.recv().ok()
    }
}

impl<T> Drop for RecordChannel<T> {
    fn drop(&mut self) {
        self.disconnect();
        if let Some(handle) = self.handle.take() {
            // Best-effort join - ignore result since we can't return errors from Drop
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementType;
    use crate::writer::IdxWriter;
    use std::io::Cursor;
    use std::time::Duration;

    fn i32_file(count: u32) -> Vec<u8> {
        let mut writer = IdxWriter::new(Vec::new(), ElementType::I32, vec![count, 2]).unwrap();
        for i in 0..count as i32 {
            writer.write(&[i, -i]).unwrap();
        }
        writer.finish_into_inner().unwrap().0
    }

    #[test]
    fn test_delivers_all_records_in_order() {
        let reader = IdxReader::open(Cursor::new(i32_file(50))).unwrap();
        let mut channel =
            spawn_record_channel::<_, i32>(reader, ChannelConfig { capacity: 4 }).unwrap();

        let records: Vec<Vec<i32>> = channel.by_ref().collect::<Result<_, _>>().unwrap();
        assert_eq!(records.len(), 50);
        for (i, record) in records.iter().enumerate() {
            assert_eq!(record, &vec![i as i32, -(i as i32)]);
        }

        let stats = channel.join().unwrap();
        assert_eq!(stats.records_sent, 50);
    }

    #[test]
    fn test_type_mismatch_closes_channel() {
        let reader = IdxReader::open(Cursor::new(i32_file(3))).unwrap();
        let mut channel = spawn_record_channel::<_, f32>(reader, ChannelConfig::default()).unwrap();

        assert!(matches!(
            channel.next(),
            Some(Err(IdxError::TypeMismatch { .. }))
        ));
        assert!(channel.next().is_none());
        assert_eq!(channel.join().unwrap().records_sent, 0);
    }

    #[test]
    fn test_truncated_payload_delivers_prefix_then_error() {
        let mut bytes = i32_file(3);
        bytes.truncate(bytes.len() - 2);
        let reader = IdxReader::open(Cursor::new(bytes)).unwrap();
        let channel = spawn_raw_record_channel(reader, ChannelConfig::default()).unwrap();

        let results: Vec<_> = channel.collect();
        assert_eq!(results.len(), 3);
        assert!(results[0].is_ok());
        assert!(results[1].is_ok());
        assert!(matches!(
            results[2],
            Err(IdxError::TruncatedRecord { index: 2, .. })
        ));
    }

    #[test]
    fn test_multiple_consumers() {
        let reader = IdxReader::open(Cursor::new(i32_file(100))).unwrap();
        let channel = spawn_record_channel::<_, i32>(reader, ChannelConfig { capacity: 2 }).unwrap();

        let workers: Vec<_> = (0..3)
            .map(|_| {
                let receiver = channel.receiver().clone();
                std::thread::spawn(move || receiver.iter().filter(|r| r.is_ok()).count())
            })
            .collect();

        let total: usize = workers.into_iter().map(|w| w.join().unwrap()).sum();
        assert_eq!(total, 100);
        assert_eq!(channel.join().unwrap().records_sent, 100);
    }

    #[test]
    fn test_drop_with_cloned_receiver_does_not_block() {
        let reader = IdxReader::open(Cursor::new(i32_file(100))).unwrap();
        let channel =
            spawn_record_channel::<_, i32>(reader, ChannelConfig { capacity: 1 }).unwrap();
        let clone = channel.receiver().clone();

        let (done_tx, done_rx) = bounded(1);
        std::thread::spawn(move || {
            drop(channel);
            done_tx.send(()).unwrap();
        });

        assert!(done_rx.recv_timeout(Duration::from_secs(5)).is_ok());
        // Only records buffered before the stop remain
        assert!(clone.iter().count() <= 2);
    }

    #[test]
    fn test_early_drop_stops_producer() {
        let reader = IdxReader::open(Cursor::new(i32_file(1000))).unwrap();
        let mut channel =
            spawn_record_channel::<_, i32>(reader, ChannelConfig { capacity: 1 }).unwrap();

        assert!(channel.next().is_some());
        let stats = channel.join().unwrap();
        assert!(stats.records_sent < 1000);
    }
}
