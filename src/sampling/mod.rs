//! Stochastic record generator.
//!
//! Every sampler takes the random stream as an explicit `&mut R: Rng`
//! argument; nothing here touches ambient global state. Each patient gets
//! its own stream derived from the master seed, so patients can be
//! generated in any order (or concurrently) with identical output.

pub mod daily;
pub mod medication;
pub mod patient;
pub mod tables;
pub mod vitals;

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use sha2::{Digest, Sha256};

pub use daily::sample_day;
pub use medication::assign_medications;
pub use patient::{sample_conditions, sample_patient, PatientTraits};
pub use tables::{Distributions, SamplingTables};

/// Discrete weights for "how many repeated events", favouring few.
pub const EXPONENTIAL_DECAY_WEIGHTS: [f64; 5] = [0.516, 0.258, 0.129, 0.065, 0.032];

/// Random stream type used for generation.
pub type PatientRng = ChaCha20Rng;

/// Sub-seed for one patient: first 8 bytes of SHA-256(master ‖ index).
pub fn derive_patient_seed(master_seed: u64, patient_index: u64) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(master_seed.to_le_bytes());
    hasher.update(patient_index.to_le_bytes());
    let digest = hasher.finalize();

    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(bytes)
}

pub fn patient_rng(master_seed: u64, patient_index: u64) -> PatientRng {
    PatientRng::seed_from_u64(derive_patient_seed(master_seed, patient_index))
}

/// Round half away from zero to one decimal place.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
