//! Persisted reference-data snapshots.
//!
//! A snapshot stores an already prepared [`ReferenceData`] bundle so a scoring
//! run can skip ingestion. The file starts with the `SSRD` magic and a
//! little-endian `u16` format version, followed by a `bincode` payload.

use std::{
    fs::File,
    io::{BufReader, BufWriter, Read, Write},
    path::{Path, PathBuf},
};

use bincode::{deserialize_from, serialize_into};
use serde::Serialize;
use thiserror::Error;

use crate::ReferenceData;

/// File identifier for reference snapshots.
pub(crate) const SNAPSHOT_MAGIC: [u8; 4] = *b"SSRD";

/// Supported snapshot format version.
pub(crate) const SNAPSHOT_VERSION: u16 = 1;

#[derive(Serialize)]
struct SnapshotFile<'a> {
    magic: [u8; 4],
    version: u16,
    data: &'a ReferenceData,
}

/// Error emitted when loading a reference snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// The snapshot could not be read from disk.
    #[error("failed to read reference snapshot from {path}: {source}")]
    Io {
        /// Snapshot location.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The payload could not be decoded.
    #[error("failed to decode reference snapshot from {path}: {source}")]
    Decode {
        /// Snapshot location.
        path: PathBuf,
        /// Decoder error returned by `bincode`.
        #[source]
        source: bincode::Error,
    },
    /// The file did not start with the snapshot magic.
    #[error("invalid reference snapshot magic: expected {expected:?}, found {found:?}")]
    InvalidMagic {
        /// Expected byte sequence.
        expected: [u8; 4],
        /// Sequence read from the file.
        found: [u8; 4],
    },
    /// The file uses an unsupported format version.
    #[error("unsupported reference snapshot version {found}; supported version is {supported}")]
    UnsupportedVersion {
        /// Version present in the file header.
        found: u16,
        /// Version written by this build.
        supported: u16,
    },
}

/// Error emitted when writing a reference snapshot.
#[derive(Debug, Error)]
pub enum SnapshotWriteError {
    /// Writing bytes to disk failed.
    #[error("failed to write reference snapshot to {path}: {source}")]
    Io {
        /// Destination path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The bundle could not be encoded.
    #[error("failed to encode reference snapshot for {path}: {source}")]
    Encode {
        /// Destination path.
        path: PathBuf,
        /// Encoder failure from `bincode`.
        #[source]
        source: bincode::Error,
    },
}

/// Persist `data` as a reference snapshot. Existing files are truncated.
///
/// # Errors
/// Returns [`SnapshotWriteError`] when the file cannot be created, encoded or
/// flushed.
pub fn write_reference_snapshot(
    path: &Path,
    data: &ReferenceData,
) -> Result<(), SnapshotWriteError> {
    let io_error = |source| SnapshotWriteError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(io_error)?;
    let mut writer = BufWriter::new(file);
    let payload = SnapshotFile {
        magic: SNAPSHOT_MAGIC,
        version: SNAPSHOT_VERSION,
        data,
    };
    serialize_into(&mut writer, &payload).map_err(|source| SnapshotWriteError::Encode {
        path: path.to_path_buf(),
        source,
    })?;
    writer.flush().map_err(io_error)?;
    writer.get_ref().sync_all().map_err(io_error)
}

/// Load a reference snapshot written by [`write_reference_snapshot`].
///
/// # Errors
/// Returns [`SnapshotError`] when the file is missing, has the wrong header
/// or cannot be decoded.
#[expect(
    clippy::little_endian_bytes,
    reason = "the snapshot header stores its version little-endian"
)]
pub fn load_reference_snapshot(path: &Path) -> Result<ReferenceData, SnapshotError> {
    let io_error = |source| SnapshotError::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut reader = BufReader::new(File::open(path).map_err(io_error)?);

    let mut magic = [0_u8; 4];
    reader.read_exact(&mut magic).map_err(io_error)?;
    if magic != SNAPSHOT_MAGIC {
        return Err(SnapshotError::InvalidMagic {
            expected: SNAPSHOT_MAGIC,
            found: magic,
        });
    }

    let mut version_bytes = [0_u8; 2];
    reader.read_exact(&mut version_bytes).map_err(io_error)?;
    let version = u16::from_le_bytes(version_bytes);
    if version != SNAPSHOT_VERSION {
        return Err(SnapshotError::UnsupportedVersion {
            found: version,
            supported: SNAPSHOT_VERSION,
        });
    }

    let data: ReferenceData =
        deserialize_from(&mut reader).map_err(|source| SnapshotError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
    log::info!(
        "loaded reference snapshot from {}: {} tracts, {} amenities",
        path.display(),
        data.current_tracts.len(),
        data.amenities.len()
    );
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use std::fs;
    use tempfile::TempDir;

    #[fixture]
    fn snapshot_path() -> (TempDir, PathBuf) {
        let dir = TempDir::new().expect("create temp dir");
        let path = dir.path().join("reference.ssrd");
        (dir, path)
    }

    #[rstest]
    fn missing_file_is_an_io_error() {
        let err = load_reference_snapshot(Path::new("/non-existent/reference.ssrd"))
            .expect_err("missing file");
        assert!(matches!(err, SnapshotError::Io { .. }));
    }

    #[rstest]
    fn rejects_invalid_magic(#[from(snapshot_path)] (_dir, path): (TempDir, PathBuf)) {
        fs::write(&path, b"WSPI\x01\x00").expect("write header");
        let err = load_reference_snapshot(&path).expect_err("bad magic");
        assert!(matches!(err, SnapshotError::InvalidMagic { found, .. } if &found == b"WSPI"));
    }

    #[rstest]
    fn rejects_future_versions(#[from(snapshot_path)] (_dir, path): (TempDir, PathBuf)) {
        let mut bytes = SNAPSHOT_MAGIC.to_vec();
        bytes.extend_from_slice(&(SNAPSHOT_VERSION + 1).to_le_bytes());
        fs::write(&path, bytes).expect("write header");
        let err = load_reference_snapshot(&path).expect_err("future version");
        assert!(matches!(
            err,
            SnapshotError::UnsupportedVersion { found, supported }
                if found == SNAPSHOT_VERSION + 1 && supported == SNAPSHOT_VERSION
        ));
    }

    #[rstest]
    fn truncated_payload_is_a_decode_error(
        #[from(snapshot_path)] (_dir, path): (TempDir, PathBuf),
    ) {
        let mut bytes = SNAPSHOT_MAGIC.to_vec();
        bytes.extend_from_slice(&SNAPSHOT_VERSION.to_le_bytes());
        fs::write(&path, bytes).expect("write header");
        let err = load_reference_snapshot(&path).expect_err("empty payload");
        assert!(matches!(err, SnapshotError::Decode { .. }));
    }
}
