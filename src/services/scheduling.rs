use std::collections::BTreeSet;
use std::str::FromStr;

use rand::seq::SliceRandom;
use rand::{Rng, RngCore};

use crate::models::Service;
use crate::services::dialogue::clinic::{self, Doctor};

/// Answers "is this time free?" for a department. No calendar is consulted;
/// implementations decide from the mode they were built with.
pub trait SlotBook: Send + Sync {
    fn is_available(&self, service: Service, time: &str, rng: &mut dyn RngCore) -> bool;
}

/// Coin flip per request.
pub struct RandomSlotBook;

impl SlotBook for RandomSlotBook {
    fn is_available(&self, _service: Service, _time: &str, rng: &mut dyn RngCore) -> bool {
        rng.gen_bool(0.5)
    }
}

/// Every request gets the same answer.
pub struct FixedSlotBook {
    pub open: bool,
}

impl SlotBook for FixedSlotBook {
    fn is_available(&self, _service: Service, _time: &str, _rng: &mut dyn RngCore) -> bool {
        self.open
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AvailabilityMode {
    Random,
    Open,
    Booked,
}

impl AvailabilityMode {
    pub fn slot_book(self) -> Box<dyn SlotBook> {
        match self {
            AvailabilityMode::Random => Box::new(RandomSlotBook),
            AvailabilityMode::Open => Box::new(FixedSlotBook { open: true }),
            AvailabilityMode::Booked => Box::new(FixedSlotBook { open: false }),
        }
    }
}

impl FromStr for AvailabilityMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "random" => Ok(AvailabilityMode::Random),
            "open" => Ok(AvailabilityMode::Open),
            "booked" => Ok(AvailabilityMode::Booked),
            other => Err(format!("unknown availability mode: {other}")),
        }
    }
}

/// A random open slot for the department, never the one just turned down.
pub fn suggest_alternative<R: Rng + ?Sized>(
    service: Service,
    previous: Option<&str>,
    rng: &mut R,
) -> &'static str {
    let slots = clinic::open_slots(service);
    let candidates: Vec<&'static str> = slots
        .iter()
        .copied()
        .filter(|slot| Some(*slot) != previous)
        .collect();
    let pool: &[&'static str] = if candidates.is_empty() { slots } else { &candidates };
    pool.choose(rng).copied().unwrap_or("tomorrow at 10:00 AM")
}

/// A random doctor of the department the caller has not turned down.
/// Once everyone has been rejected the whole department is eligible again.
pub fn pick_doctor<R: Rng + ?Sized>(
    service: Service,
    rejected: &BTreeSet<String>,
    rng: &mut R,
) -> &'static Doctor {
    let all = clinic::doctors(service);
    let remaining: Vec<&'static Doctor> =
        all.iter().filter(|d| !rejected.contains(d.name)).collect();
    match remaining.choose(rng) {
        Some(doctor) => *doctor,
        // rosters are never empty
        None => &all[rng.gen_range(0..all.len())],
    }
}
