//! Record marking over tokio streams.
//!
//! Thin glue between an async socket and the synchronous record codec:
//! [`RecordReader`] feeds socket reads to a [`RecordMarkingDecoder`] and
//! yields complete records, [`write_record`] frames a record and writes it out.

use anyhow::anyhow;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, trace};

use super::wire::{RecordMarkingDecoder, RecordMarkingEncoder};
use super::MAX_RPC_RECORD_LENGTH;
use crate::protocol::xdr::writer::DEFAULT_BUFFER_CAPACITY;

/// Reads record-marked RPC messages from an async byte stream
#[derive(Debug)]
pub struct RecordReader<R> {
    source: R,
    decoder: RecordMarkingDecoder,
    read_buffer: Vec<u8>,
}

impl<R: AsyncRead + Unpin> RecordReader<R> {
    /// Creates a reader rejecting records above [`MAX_RPC_RECORD_LENGTH`]
    pub fn new(source: R) -> Self {
        Self::with_decoder(
            source,
            RecordMarkingDecoder::new().with_max_record_length(MAX_RPC_RECORD_LENGTH),
        )
    }

    pub fn with_decoder(source: R, decoder: RecordMarkingDecoder) -> Self {
        Self { source, decoder, read_buffer: vec![0; DEFAULT_BUFFER_CAPACITY] }
    }

    /// Waits for the next complete record.
    ///
    /// Returns `Ok(None)` when the stream ends between records. A stream
    /// ending inside a record, or a record over the limit, is an error.
    pub async fn next_record(&mut self) -> anyhow::Result<Option<Vec<u8>>> {
        loop {
            if let Some(record) = self.decoder.read_record()? {
                trace!("Received record of {} bytes", record.len());
                return Ok(Some(record));
            }

            let read = self.source.read(&mut self.read_buffer).await?;
            if read == 0 {
                if self.decoder.is_idle() {
                    debug!("Stream closed");
                    return Ok(None);
                }
                return Err(anyhow!(
                    "stream closed inside a record, {} bytes pending",
                    self.decoder.buffered_len()
                ));
            }
            self.decoder.push(&self.read_buffer[..read]);
        }
    }

    pub fn into_inner(self) -> R {
        self.source
    }
}

/// Frames `record` with `encoder` and writes it to `dest`
pub async fn write_record<W: AsyncWrite + Unpin>(
    dest: &mut W,
    encoder: &mut RecordMarkingEncoder,
    record: &[u8],
) -> anyhow::Result<()> {
    let framed = encoder.encode_record(record)?;
    trace!("Writing record of {} bytes", framed.len());
    dest.write_all(framed).await?;
    Ok(())
}
