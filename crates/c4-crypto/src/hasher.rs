use std::fmt;
use std::io::{self, ErrorKind, Read, Write};

use c4_types::{Digest, Identifier, DIGEST_LEN};
use sha2::{Digest as _, Sha512};

/// Bytes read per call when identifying a stream.
pub const CHUNK_SIZE: usize = 8 * 1024;

/// Incremental SHA-512 hasher producing C4 digests.
///
/// Bytes may be written in any number of calls. [`digest`] and
/// [`identifier`] take a snapshot of the current state, so they can be called
/// repeatedly and writing may continue afterwards.
///
/// [`digest`]: StreamHasher::digest
/// [`identifier`]: StreamHasher::identifier
#[derive(Clone, Default)]
pub struct StreamHasher {
    state: Sha512,
    written: u64,
}

impl StreamHasher {
    /// Create a hasher with no bytes written.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed bytes into the hash. Always consumes the whole slice.
    pub fn write(&mut self, data: &[u8]) -> usize {
        self.state.update(data);
        self.written += data.len() as u64;
        data.len()
    }

    /// Digest of everything written since construction or the last reset.
    pub fn digest(&self) -> Digest {
        let mut bytes = [0u8; DIGEST_LEN];
        bytes.copy_from_slice(&self.state.clone().finalize());
        Digest::from_array(bytes)
    }

    /// Identifier of everything written since construction or the last reset.
    pub fn identifier(&self) -> Identifier {
        self.digest().id()
    }

    /// Discard all written bytes and start over.
    pub fn reset(&mut self) {
        self.state = Sha512::new();
        self.written = 0;
    }

    /// Number of bytes written since construction or the last reset.
    pub fn bytes_written(&self) -> u64 {
        self.written
    }
}

impl fmt::Debug for StreamHasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamHasher")
            .field("written", &self.written)
            .finish_non_exhaustive()
    }
}

impl Write for StreamHasher {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(StreamHasher::write(self, buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Read `reader` to exhaustion and return the digest of its bytes.
pub fn identify_digest<R: Read>(mut reader: R) -> io::Result<Digest> {
    let mut hasher = StreamHasher::new();
    let mut buf = vec![0u8; CHUNK_SIZE];
    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.write(&buf[..n]);
    }
    Ok(hasher.digest())
}

/// Read `reader` to exhaustion and return the C4 id of its bytes.
pub fn identify<R: Read>(reader: R) -> io::Result<Identifier> {
    identify_digest(reader).map(Identifier::from)
}

/// Alias of [`identify`].
pub fn encode<R: Read>(reader: R) -> io::Result<Identifier> {
    identify(reader)
}

/// C4 id of an in-memory byte slice.
pub fn identify_bytes(data: &[u8]) -> Identifier {
    Digest::hash(data).id()
}
