use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;

use sha1::{Digest, Sha1};

/// Bytes digested from each end of a file for the sample fingerprint.
pub const SAMPLE_CHUNK: usize = 64 * 1024;

/// Hex SHA-1 of the first 64 KiB and, only when the file is larger than one
/// chunk, also the last 64 KiB, fed into the same digest in that order.
pub fn sample_sha1(path: &Path) -> io::Result<String> {
    let mut file = File::open(path)?;
    let size = file.metadata()?.len();

    let mut hasher = Sha1::new();
    let mut buffer = vec![0u8; SAMPLE_CHUNK];

    let read = read_up_to(&mut file, &mut buffer)?;
    hasher.update(&buffer[..read]);

    if size > SAMPLE_CHUNK as u64 {
        file.seek(SeekFrom::End(-(SAMPLE_CHUNK as i64)))?;
        let read = read_up_to(&mut file, &mut buffer)?;
        hasher.update(&buffer[..read]);
    }

    Ok(hex::encode(hasher.finalize()))
}

/// Hex SHA-1 of the entire byte stream, read sequentially in chunks.
pub fn full_sha1(path: &Path) -> io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha1::new();
    let mut buffer = vec![0u8; SAMPLE_CHUNK];

    loop {
        let read = file.read(&mut buffer)?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }

    Ok(hex::encode(hasher.finalize()))
}

// Read::read may return short counts; fill the buffer until EOF.
fn read_up_to(file: &mut File, buffer: &mut [u8]) -> io::Result<usize> {
    let mut total = 0;
    while total < buffer.len() {
        let read = file.read(&mut buffer[total..])?;
        if read == 0 {
            break;
        }
        total += read;
    }
    Ok(total)
}
