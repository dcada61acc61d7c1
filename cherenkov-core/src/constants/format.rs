//! Archive Format Constants
//!
//! Quantization ranges and record sizes of the on-disk layout. The
//! compressed photon record trades precision for size: every field is
//! mapped onto a signed 16-bit integer against a fixed physical range, so
//! round-trip fidelity is bounded by one quantization step (range / 32768).
//!
//! Changing any value here changes the wire format; the session README
//! written next to every archive documents the layout these constants pin
//! down.

/// Full-scale factor of the signed 16-bit quantization.
pub const QUANT_SCALE: f32 = 32768.0;

/// Position full range (cm): +-260 m around the detector center.
pub const POSITION_RANGE_CM: f32 = 260.0e2;

/// Emission altitude full range (cm): 100 km above sea level, sign-stripped.
pub const EMISSION_ALTITUDE_RANGE_CM: f32 = 100_000.0e2;

/// Arrival time quantization step (ns).
///
/// Relative arrival times are stored in 0.1 ns steps, spanning
/// +-3.2767 microseconds around the event time origin.
pub const ARRIVAL_TIME_STEP_NS: f32 = 0.1;

/// Number of 32-bit float words in a run or event header block.
pub const HEADER_WORDS: usize = 273;

/// Size of one raw photon bunch record: 10 x float32.
pub const RAW_RECORD_SIZE: usize = 40;

/// Size of one compressed photon record: 8 x int16.
pub const COMPRESSED_RECORD_SIZE: usize = 16;

/// Suffix of the run header file.
pub const RUNH_SUFFIX: &str = ".runh";

/// Suffix template of per-event header files; the event number is appended.
pub const EVTH_SUFFIX: &str = ".evth.";

/// Suffix template of per-event photon block files.
pub const BLOCK_SUFFIX: &str = ".bunches.";

/// Suffix of the static layout documentation file.
pub const README_SUFFIX: &str = ".README.md";
