//! Event-Scoped Binary Output Session
//!
//! ## Overview
//!
//! One [`OutputSession`] owns every file of one simulation run. The producer
//! drives it strictly in lifecycle order: run header once, then per event an
//! event header, a photon block with any number of appended records, and a
//! close. The session derives the codec constants from the headers as they
//! arrive, so by the time the first record is appended the observation
//! level, the local speed of light and the event time offset are all pinned.
//!
//! ## File layout
//!
//! For a base path `<base>` the session writes
//!
//! | file                   | content                                |
//! |------------------------|----------------------------------------|
//! | `<base>.README.md`     | static format description              |
//! | `<base>.runh`          | 273 float words, run header            |
//! | `<base>.evth.<n>`      | 273 float words, event header          |
//! | `<base>.bunches.<n>`   | fixed-size photon records, one block   |
//!
//! ## Failure model
//!
//! Every fault is fatal for the run. Illegal call orderings surface as
//! [`SessionError::Precondition`] before any byte is written, so a protocol
//! bug in the producer cannot leave a half-written block behind.

use std::fs::File;
use std::io::{BufWriter, Write};

use libm::cosf;

use crate::atmosphere;
use crate::constants::format::{BLOCK_SUFFIX, EVTH_SUFFIX, README_SUFFIX, RUNH_SUFFIX};
use crate::constants::physics::VACUUM_SPEED_OF_LIGHT_CM_PER_NS;
use crate::errors::SessionError;
use crate::header::{EventHeader, RunHeader};
use crate::photon::SessionConstants;
use crate::record::{Encoding, PhotonRecord};

/// Format notes written once per run next to the data files.
const README_TEXT: &str = "\
# Cherenkov photon archive

One run header, then per event one event header and one photon block.
All multi-byte values are little endian.

## Header files (`.runh`, `.evth.<event>`)

273 float32 words as delivered by the air-shower simulator, including the
four-character block marker in word 0. 1092 bytes per file.

## Photon blocks (`.bunches.<event>`)

A block holds fixed-size records of a single form.

Raw form, 40 bytes per bunch, ten float32 words:

    size, x [cm], y [cm], cx, cy, arrival time [ns],
    emission altitude [cm above sea level], wavelength [nm],
    mother mass [GeV], mother charge

Compressed form, 16 bytes per photon, eight int16 words:

    x, y          position / 26000 cm * 32768, detector frame
    cx, cy        direction cosine * 32768
    arrival time  relative to the shower front, 0.1 ns steps
    wavelength    wavelength [nm] * 32768
    emission alt  |altitude| / 10^7 cm * 32768
    mother        particle tag

Quantization rounds half away from zero and saturates at the int16 range.
";

/// Lifecycle states of an output session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No file touched yet.
    Unopened,
    /// Run header and README are on disk.
    RunHeaderWritten,
    /// An event header is on disk, its photon block not yet opened.
    EventHeaderWritten,
    /// A photon block is open and accepting records.
    EventOpen,
    /// The previous event's block is closed; ready for the next event.
    EventClosed,
}

/// Writes one run's archive: headers, photon blocks and README.
///
/// See the module docs for the file layout and the lifecycle rules.
#[derive(Debug)]
pub struct OutputSession {
    output_base: String,
    encoding: Encoding,
    state: SessionState,
    observation_level: f32,
    speed_of_light_on_observation_level: f32,
    time_offset: f32,
    current_block: Option<BufWriter<File>>,
    current_block_path: String,
}

fn io_error(path: &str, source: std::io::Error) -> SessionError {
    SessionError::Io {
        path: String::from(path),
        source,
    }
}

impl OutputSession {
    /// Create a session writing files under `<output_base>.*`.
    ///
    /// Touches nothing on disk; the first write happens in
    /// [`write_run_header`](Self::write_run_header).
    pub fn open(output_base: &str, encoding: Encoding) -> Self {
        Self {
            output_base: String::from(output_base),
            encoding,
            state: SessionState::Unopened,
            observation_level: -1.0,
            speed_of_light_on_observation_level: VACUUM_SPEED_OF_LIGHT_CM_PER_NS,
            time_offset: 0.0,
            current_block: None,
            current_block_path: String::new(),
        }
    }

    /// Record form this session was opened with.
    pub const fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// Current lifecycle state.
    pub const fn state(&self) -> SessionState {
        self.state
    }

    /// Codec constants derived so far.
    ///
    /// Meaningful once the run header is written; the time offset updates
    /// with every event header.
    pub const fn constants(&self) -> SessionConstants {
        SessionConstants {
            observation_level: self.observation_level,
            speed_of_light_on_observation_level: self.speed_of_light_on_observation_level,
            time_offset: self.time_offset,
        }
    }

    fn expect_state(
        &self,
        operation: &'static str,
        allowed: &[SessionState],
    ) -> Result<(), SessionError> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(SessionError::Precondition {
                operation,
                state: self.state,
            })
        }
    }

    fn path(&self, suffix: &str) -> String {
        let mut path = self.output_base.clone();
        path.push_str(suffix);
        path
    }

    fn event_path(&self, suffix: &str, event_number: u32) -> String {
        let mut path = self.path(suffix);
        path.push_str(&event_number.to_string());
        path
    }

    /// Write the README and the run header file, and derive the run-scoped
    /// codec constants from the header.
    pub fn write_run_header(&mut self, runh: &RunHeader) -> Result<(), SessionError> {
        self.expect_state("write run header", &[SessionState::Unopened])?;

        self.observation_level = runh.observation_level()?;
        self.speed_of_light_on_observation_level =
            atmosphere::speed_of_light(self.observation_level);

        let readme_path = self.path(README_SUFFIX);
        std::fs::write(&readme_path, README_TEXT).map_err(|e| io_error(&readme_path, e))?;

        let runh_path = self.path(RUNH_SUFFIX);
        let mut out = BufWriter::new(File::create(&runh_path).map_err(|e| io_error(&runh_path, e))?);
        runh.write_to(&mut out).map_err(|e| io_error(&runh_path, e))?;
        out.flush().map_err(|e| io_error(&runh_path, e))?;

        #[cfg(feature = "log")]
        log::info!(
            "run header written: observation level {} cm, c_obs {} cm/ns",
            self.observation_level,
            self.speed_of_light_on_observation_level
        );

        self.state = SessionState::RunHeaderWritten;
        Ok(())
    }

    /// Write the per-event header file and derive the event time offset.
    ///
    /// The offset is the straight-line light travel time from the first
    /// interaction down to the observation level along the shower axis.
    /// A negative first-interaction height means the simulator did not
    /// record one; the top of the atmosphere stands in for it.
    pub fn write_event_header(
        &mut self,
        evth: &EventHeader,
        event_number: u32,
    ) -> Result<(), SessionError> {
        self.expect_state(
            "write event header",
            &[SessionState::RunHeaderWritten, SessionState::EventClosed],
        )?;

        let mut z_first = evth.first_interaction_height();
        if z_first < 0.0 {
            z_first = atmosphere::height_above_sea_level(0.0);
        }
        self.time_offset = (z_first - self.observation_level)
            / cosf(evth.zenith_rad())
            / VACUUM_SPEED_OF_LIGHT_CM_PER_NS;

        let evth_path = self.event_path(EVTH_SUFFIX, event_number);
        let mut out = BufWriter::new(File::create(&evth_path).map_err(|e| io_error(&evth_path, e))?);
        evth.write_to(&mut out).map_err(|e| io_error(&evth_path, e))?;
        out.flush().map_err(|e| io_error(&evth_path, e))?;

        #[cfg(feature = "log")]
        log::info!("event {} header written: time offset {} ns", event_number, self.time_offset);

        self.state = SessionState::EventHeaderWritten;
        Ok(())
    }

    /// Create this event's photon block file. At most one block is open at
    /// a time.
    pub fn open_photon_block(&mut self, event_number: u32) -> Result<(), SessionError> {
        self.expect_state("open photon block", &[SessionState::EventHeaderWritten])?;

        let block_path = self.event_path(BLOCK_SUFFIX, event_number);
        let file = File::create(&block_path).map_err(|e| io_error(&block_path, e))?;
        self.current_block = Some(BufWriter::new(file));
        self.current_block_path = block_path;

        self.state = SessionState::EventOpen;
        Ok(())
    }

    /// Append one record to the open photon block.
    ///
    /// The record's form must match the session's configured encoding;
    /// blocks never mix forms.
    pub fn append(&mut self, record: &PhotonRecord) -> Result<(), SessionError> {
        self.expect_state("append photon record", &[SessionState::EventOpen])?;

        if record.encoding() != self.encoding {
            return Err(SessionError::EncodingMismatch {
                configured: self.encoding,
                given: record.encoding(),
            });
        }

        match self.current_block.as_mut() {
            Some(block) => record
                .write_to(block)
                .map_err(|e| io_error(&self.current_block_path, e)),
            // EventOpen guarantees a block is present.
            None => Err(SessionError::Precondition {
                operation: "append photon record",
                state: self.state,
            }),
        }
    }

    /// Flush and close the open photon block.
    pub fn close_photon_block(&mut self) -> Result<(), SessionError> {
        self.expect_state("close photon block", &[SessionState::EventOpen])?;

        if let Some(mut block) = self.current_block.take() {
            block
                .flush()
                .map_err(|e| io_error(&self.current_block_path, e))?;
        }
        self.current_block_path.clear();

        self.state = SessionState::EventClosed;
        Ok(())
    }
}

impl Drop for OutputSession {
    /// Flush any block still open so an early teardown loses no records.
    fn drop(&mut self) {
        if let Some(mut block) = self.current_block.take() {
            if block.flush().is_err() {
                #[cfg(feature = "log")]
                log::error!("failed to flush photon block '{}'", self.current_block_path);
            }
        }
    }
}
