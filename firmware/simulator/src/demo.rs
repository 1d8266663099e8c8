//! Demo data source.
//!
//! Stands in for the real timetable client: a background thread produces a
//! fresh snapshot every refresh interval, with minutes counting down between
//! refreshes and an occasional simulated outage.

use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use board_common::{DepartureRecord, DisruptionKind, DisruptionRecord, ProductKind, StationSnapshot};
use tracing::{debug, info};

/// One refresh result.
#[derive(Debug)]
pub enum FeedUpdate {
    Snapshot(Vec<StationSnapshot>),
    Failed,
}

/// Line, direction, headway in minutes, product, delay.
type Service = (&'static str, &'static str, i64, ProductKind, i64);

const ALEXANDERPLATZ: [Service; 6] = [
    ("U2", "S+U Pankow", 5, ProductKind::Subway, 0),
    ("S5", "Strausberg Nord", 10, ProductKind::Suburban, 2),
    ("M4", "Zingster Str.", 7, ProductKind::Tram, 0),
    ("U8", "Wittenau", 6, ProductKind::Subway, -1),
    ("RE1", "Frankfurt (Oder) über Erkner, Fürstenwalde", 30, ProductKind::Regional, 4),
    ("100", "Zoologischer Garten", 8, ProductKind::Bus, 0),
];

const OSTKREUZ: [Service; 5] = [
    ("S3", "Erkner", 10, ProductKind::Suburban, 0),
    ("S41", "Ring im Uhrzeigersinn", 5, ProductKind::Suburban, 1),
    ("M10", "Hauptbahnhof", 6, ProductKind::Tram, 0),
    ("F10", "Wannsee", 60, ProductKind::Ferry, 0),
    ("FEX", "Flughafen BER", 30, ProductKind::Express, -2),
];

/// Demo snapshot for refresh number `cycle`.
///
/// Each service departs every `headway` minutes; the next departure moves
/// one minute closer per cycle.
pub fn snapshot(cycle: u64) -> Vec<StationSnapshot> {
    let mut alex = station("900100003", "S+U Alexanderplatz Bhf (Berlin)", 4, &ALEXANDERPLATZ, cycle);
    let mut ostkreuz = station("900120003", "S Ostkreuz Bhf (Berlin)", 7, &OSTKREUZ, cycle);

    if cycle % 4 < 2 {
        ostkreuz = ostkreuz.with_disruption(DisruptionRecord::new(
            DisruptionKind::Warning,
            "Aufzug zu Gleis 3 außer Betrieb",
        ));
    }
    alex.departures.sort_by_key(|d| d.minutes_until);
    ostkreuz.departures.sort_by_key(|d| d.minutes_until);
    vec![alex, ostkreuz]
}

fn station(
    id: &str,
    name: &str,
    walking_time: u32,
    services: &[Service],
    cycle: u64,
) -> StationSnapshot {
    let mut station = StationSnapshot::new(id, name, walking_time);
    for &(line, direction, headway, product, delay) in services {
        let minutes = headway - 1 - (cycle as i64 % headway);
        station = station.with_departure(DepartureRecord::new(line, direction, minutes, product).with_delay(delay));
    }
    station
}

/// Start the demo source. It stops once the receiver is dropped.
pub fn spawn(
    interval: Duration,
    outage_every: u32,
) -> (Receiver<FeedUpdate>, JoinHandle<()>) {
    let (tx, rx) = mpsc::channel();
    let handle = thread::spawn(move || run(&tx, interval, outage_every));
    (rx, handle)
}

fn run(
    tx: &Sender<FeedUpdate>,
    interval: Duration,
    outage_every: u32,
) {
    info!(interval_s = interval.as_secs(), "demo feed started");
    for cycle in 0u64.. {
        let outage = outage_every > 0 && cycle > 0 && cycle % u64::from(outage_every) == 0;
        let update = if outage { FeedUpdate::Failed } else { FeedUpdate::Snapshot(snapshot(cycle)) };
        debug!(cycle, outage, "demo refresh");
        if tx.send(update).is_err() {
            break;
        }
        thread::sleep(interval);
    }
    info!("demo feed stopped");
}
