//! End-to-end tests for the output session
//!
//! Drives a full run through the real file-backed session: protocol
//! violations first, then one event archived and read back byte for byte.

use std::fs;

use cherenkov_core::geometry::Vec3;
use cherenkov_core::photon::CompressedPhoton;
use cherenkov_core::{
    DetectorSphere, Encoding, EventHeader, OutputSession, PhotonBunch, PhotonRecord, RunHeader,
    SessionError, SessionState,
};

const HEADER_WORDS: usize = 273;
const OBSERVATION_LEVEL_CM: f32 = 2.2e5;

fn run_header() -> RunHeader {
    let mut words = [0f32; HEADER_WORDS];
    words[0] = f32::from_le_bytes(*b"RUNH");
    words[4] = 1.0;
    words[5] = OBSERVATION_LEVEL_CM;
    RunHeader::from_words(words)
}

fn event_header(event_number: f32) -> EventHeader {
    let mut words = [0f32; HEADER_WORDS];
    words[0] = f32::from_le_bytes(*b"EVTH");
    words[1] = event_number;
    words[6] = 1.2e6;
    words[10] = 0.0;
    EventHeader::from_words(words)
}

fn compressed_record(
    bunch: &PhotonBunch,
    detector: &DetectorSphere,
    session: &OutputSession,
) -> PhotonRecord {
    let photon = CompressedPhoton::from_bunch(bunch, detector, &session.constants())
        .expect("valid bunch");
    PhotonRecord::Compressed(photon)
}

#[test]
fn append_without_an_open_block_fails() {
    let dir = tempfile::tempdir().unwrap();
    let base = dir.path().join("run");
    let mut session = OutputSession::open(base.to_str().unwrap(), Encoding::Compressed);

    session.write_run_header(&run_header()).unwrap();
    session.write_event_header(&event_header(1.0), 1).unwrap();

    let record = PhotonRecord::Compressed(CompressedPhoton::from_bytes(&[0u8; 16]));
    assert!(matches!(
        session.append(&record),
        Err(SessionError::Precondition {
            state: SessionState::EventHeaderWritten,
            ..
        })
    ));
}

#[test]
fn append_after_close_fails() {
    let dir = tempfile::tempdir().unwrap();
    let base = dir.path().join("run");
    let mut session = OutputSession::open(base.to_str().unwrap(), Encoding::Compressed);

    session.write_run_header(&run_header()).unwrap();
    session.write_event_header(&event_header(1.0), 1).unwrap();
    session.open_photon_block(1).unwrap();
    session.close_photon_block().unwrap();

    let record = PhotonRecord::Compressed(CompressedPhoton::from_bytes(&[0u8; 16]));
    assert!(matches!(
        session.append(&record),
        Err(SessionError::Precondition {
            state: SessionState::EventClosed,
            ..
        })
    ));
}

#[test]
fn photon_block_cannot_open_before_its_event_header() {
    let dir = tempfile::tempdir().unwrap();
    let base = dir.path().join("run");
    let mut session = OutputSession::open(base.to_str().unwrap(), Encoding::Compressed);

    session.write_run_header(&run_header()).unwrap();
    assert!(session.open_photon_block(1).is_err());
}

#[test]
fn photon_block_cannot_open_twice() {
    let dir = tempfile::tempdir().unwrap();
    let base = dir.path().join("run");
    let mut session = OutputSession::open(base.to_str().unwrap(), Encoding::Compressed);

    session.write_run_header(&run_header()).unwrap();
    session.write_event_header(&event_header(1.0), 1).unwrap();
    session.open_photon_block(1).unwrap();

    assert!(matches!(
        session.open_photon_block(1),
        Err(SessionError::Precondition {
            state: SessionState::EventOpen,
            ..
        })
    ));
}

#[test]
fn mixed_encodings_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let base = dir.path().join("run");
    let mut session = OutputSession::open(base.to_str().unwrap(), Encoding::Compressed);

    session.write_run_header(&run_header()).unwrap();
    session.write_event_header(&event_header(1.0), 1).unwrap();
    session.open_photon_block(1).unwrap();

    let raw = PhotonRecord::Raw(PhotonBunch::from_producer(
        1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1e6, 433.0, 0.0, 0.0,
    ));
    assert!(matches!(
        session.append(&raw),
        Err(SessionError::EncodingMismatch {
            configured: Encoding::Compressed,
            given: Encoding::Raw,
        })
    ));
}

#[test]
fn one_event_archived_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let base = dir.path().join("run001");
    let base_str = base.to_str().unwrap();
    let mut session = OutputSession::open(base_str, Encoding::Compressed);

    session.write_run_header(&run_header()).unwrap();
    session.write_event_header(&event_header(1.0), 1).unwrap();
    session.open_photon_block(1).unwrap();

    let detector = DetectorSphere::new(Vec3::new(100.0, 0.0, 0.0), 10.0);

    // Two bunches inside the sphere's footprint, one far outside
    let bunches = [
        PhotonBunch::from_producer(1.0, 105.0, 0.0, 0.0, 0.0, 650.0, 9.0e5, 433.0, 0.0, 0.0),
        PhotonBunch::from_producer(1.0, 500.0, 500.0, 0.0, 0.0, 655.0, 9.0e5, 390.0, 0.0, 0.0),
        PhotonBunch::from_producer(0.8, 98.0, -3.0, 0.01, 0.0, 648.0, 8.5e5, 501.0, 0.0, 0.0),
    ];

    let mut archived = Vec::new();
    for bunch in bunches {
        if detector.is_hit_by_photon(&bunch).unwrap() {
            let mut hit = bunch;
            detector.transform_to_detector_frame(&mut hit);
            let record = compressed_record(&hit, &detector, &session);
            session.append(&record).unwrap();
            archived.push(record);
        }
    }
    session.close_photon_block().unwrap();

    assert_eq!(archived.len(), 2);

    // Run header, event header and README all exist with the right sizes
    let runh = fs::read(format!("{}.runh", base_str)).unwrap();
    assert_eq!(runh.len(), HEADER_WORDS * 4);
    assert_eq!(&runh[0..4], b"RUNH");

    let evth = fs::read(format!("{}.evth.1", base_str)).unwrap();
    assert_eq!(evth.len(), HEADER_WORDS * 4);
    assert_eq!(&evth[0..4], b"EVTH");

    let readme = fs::read_to_string(format!("{}.README.md", base_str)).unwrap();
    assert!(readme.contains("little endian"));

    // The block holds exactly the two accepted records, in order
    let block = fs::read(format!("{}.bunches.1", base_str)).unwrap();
    assert_eq!(block.len(), 2 * 16);
    for (chunk, record) in block.chunks_exact(16).zip(&archived) {
        assert_eq!(chunk, record.to_bytes().as_slice());
    }
}

#[test]
fn raw_encoding_round_trips_through_the_block_file() {
    let dir = tempfile::tempdir().unwrap();
    let base = dir.path().join("run002");
    let base_str = base.to_str().unwrap();
    let mut session = OutputSession::open(base_str, Encoding::Raw);

    session.write_run_header(&run_header()).unwrap();
    session.write_event_header(&event_header(1.0), 1).unwrap();
    session.open_photon_block(1).unwrap();

    let bunch =
        PhotonBunch::from_producer(0.9, 12.5, -7.0, 0.05, 0.0, 702.0, 8.8e5, 433.0, 0.0, 0.0);
    session.append(&PhotonRecord::Raw(bunch)).unwrap();
    session.close_photon_block().unwrap();

    let block = fs::read(format!("{}.bunches.1", base_str)).unwrap();
    assert_eq!(block.len(), 40);

    let mut bytes = [0u8; 40];
    bytes.copy_from_slice(&block);
    assert_eq!(PhotonBunch::from_bytes(&bytes), bunch);
}
