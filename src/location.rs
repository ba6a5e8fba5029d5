//! Best-effort device location.
//!
//! A [`LocationProvider`] is asked for a fix and answers later, possibly
//! much later, through the [`FixReply`] it was handed. Replies travel over a
//! channel back to the draft, which applies them on its own thread. Each reply
//! carries the draft generation it was requested for, so the draft can
//! discard fixes that arrive after a reset.

use serde::Serialize;
use std::sync::mpsc::Sender;
use thiserror::Error;

/// Meters to feet, as the blog's front matter expects.
pub const METERS_TO_FEET: f64 = 3.28084;

/// A position fix. Altitude is in meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64, altitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            altitude,
        }
    }

    /// Altitude in whole feet, truncated toward zero.
    pub fn altitude_feet(&self) -> i64 {
        (self.altitude * METERS_TO_FEET) as i64
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LocationError {
    #[error("Location access denied")]
    Denied,
    #[error("Location unavailable: {0}")]
    Unavailable(String),
}

/// A fix (or failure) tagged with the draft generation that requested it.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationFix {
    pub generation: u64,
    pub result: Result<Coordinate, LocationError>,
}

/// One-shot reply handle for a location request.
#[derive(Debug)]
pub struct FixReply {
    generation: u64,
    tx: Sender<LocationFix>,
}

impl FixReply {
    pub(crate) fn new(generation: u64, tx: Sender<LocationFix>) -> Self {
        Self { generation, tx }
    }

    /// Deliver the answer. A dropped draft simply never sees it.
    pub fn deliver(self, result: Result<Coordinate, LocationError>) {
        let _ = self.tx.send(LocationFix {
            generation: self.generation,
            result,
        });
    }
}

/// Source of location fixes.
///
/// `request_fix` must not block; providers may answer inline or keep the
/// reply and deliver it from another thread.
pub trait LocationProvider: Send {
    fn request_fix(&self, reply: FixReply);
}

impl<P: LocationProvider + ?Sized> LocationProvider for Box<P> {
    fn request_fix(&self, reply: FixReply) {
        (**self).request_fix(reply)
    }
}

/// Always answers with the same coordinate.
#[derive(Debug, Clone, Copy)]
pub struct FixedLocation(pub Coordinate);

impl LocationProvider for FixedLocation {
    fn request_fix(&self, reply: FixReply) {
        reply.deliver(Ok(self.0));
    }
}

/// No positioning available; every request fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLocation;

impl LocationProvider for NoLocation {
    fn request_fix(&self, reply: FixReply) {
        reply.deliver(Err(LocationError::Unavailable(
            "no location source configured".to_string(),
        )));
    }
}
