use std::sync::Arc;
use std::thread;

use j1939_diagnostics::{
    Packet, RawMessage,
    j1939::{DiagnosticReadinessPacket, Dm26TripReadiness, PGN_DM5, PGN_DM26},
    monitored_system::{
        CompositeMonitoredSystem, MonitoredSystem, Status, VEHICLE_ADDRESS, VehicleReadiness,
    },
    readiness::{CONTINUOUS_SYSTEMS, NON_CONTINUOUS_SYSTEMS, ReadinessStatus},
};

const ENGINE: u8 = 0x00;
const TRANSMISSION: u8 = 0x03;
const AFTERTREATMENT: u8 = 0x3D;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn dm5(source_address: u8, data: [u8; 8]) -> DiagnosticReadinessPacket {
    let msg = RawMessage::new(PGN_DM5, source_address, data.to_vec());
    DiagnosticReadinessPacket::decode(&msg).unwrap()
}

/// Catalyst supported and complete
fn engine_dm5() -> DiagnosticReadinessPacket {
    dm5(ENGINE, [0x00, 0x00, 0x14, 0x00, 0x01, 0x00, 0x00, 0x00])
}

/// Catalyst supported and not complete
fn aftertreatment_dm5() -> DiagnosticReadinessPacket {
    dm5(AFTERTREATMENT, [0x00, 0x00, 0x14, 0x00, 0x01, 0x00, 0x01, 0x00])
}

/// Not an OBD module, every bit is ignored
fn transmission_dm5() -> DiagnosticReadinessPacket {
    dm5(TRANSMISSION, [0x00, 0x00, 0x05, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF])
}

#[test]
fn test_composite_merge_rules() {
    init_logger();
    let report = |status, addr| MonitoredSystem::new("Misfire", status, addr, 0x0310);

    let c = CompositeMonitoredSystem::new("Misfire", VEHICLE_ADDRESS, 0x0310);
    c.add_report(&report(Status::Complete, 0x00));
    c.add_report(&report(Status::NotComplete, 0x01));
    c.add_report(&report(Status::NotSupported, 0x02));
    assert_eq!(c.status(), Status::NotComplete);

    let c = CompositeMonitoredSystem::new("Misfire", VEHICLE_ADDRESS, 0x0310);
    c.add_report(&report(Status::Complete, 0x00));
    c.add_report(&report(Status::NotSupported, 0x02));
    assert_eq!(c.status(), Status::Complete);

    let c = CompositeMonitoredSystem::new("Misfire", VEHICLE_ADDRESS, 0x0310);
    for addr in 0..5 {
        c.add_report(&report(Status::NotSupported, addr));
    }
    assert_eq!(c.status(), Status::NotSupported);
    assert_eq!(c.source_addresses(), vec![0, 1, 2, 3, 4]);
}

#[test]
fn test_vehicle_readiness() {
    init_logger();
    let vehicle = VehicleReadiness::new();
    assert_eq!(vehicle.status_of("Catalyst"), None);

    assert_eq!(vehicle.add_packet(&engine_dm5()), vec!["Catalyst".to_string()]);
    assert_eq!(vehicle.status_of("Catalyst"), Some(Status::Complete));

    assert!(vehicle.add_packet(&transmission_dm5()).is_empty());
    assert_eq!(vehicle.status_of("Catalyst"), Some(Status::Complete));

    assert_eq!(vehicle.add_packet(&aftertreatment_dm5()), vec!["Catalyst".to_string()]);
    assert_eq!(vehicle.status_of("Catalyst"), Some(Status::NotComplete));

    // The aftertreatment module finishes its catalyst monitor
    let done = dm5(AFTERTREATMENT, [0x00, 0x00, 0x14, 0x00, 0x01, 0x00, 0x00, 0x00]);
    assert_eq!(vehicle.add_packet(&done), vec!["Catalyst".to_string()]);
    assert_eq!(vehicle.status_of("Catalyst"), Some(Status::Complete));

    let systems = vehicle.systems();
    assert_eq!(systems.len(), CONTINUOUS_SYSTEMS.len() + NON_CONTINUOUS_SYSTEMS.len());
    assert!(systems.iter().all(|s| s.source_address == VEHICLE_ADDRESS));
    assert!(systems.windows(2).all(|w| w[0].name < w[1].name));
    assert_eq!(
        systems.iter().filter(|s| s.status != Status::NotSupported).count(),
        1
    );
}

#[test]
fn test_dm26_and_dm5_mix() {
    init_logger();
    let vehicle = VehicleReadiness::new();
    vehicle.add_packet(&engine_dm5());
    // The trip readiness of the engine says the catalyst has not completed this drive cycle
    let dm26 = Dm26TripReadiness::decode(&RawMessage::new(
        PGN_DM26,
        ENGINE,
        vec![0x10, 0x00, 0x00, 0x00, 0x01, 0x00, 0x01, 0x00],
    ))
    .unwrap();
    vehicle.add_packet(&dm26);
    assert_eq!(vehicle.status_of("Catalyst"), Some(Status::NotComplete));
}

#[test]
fn test_packet_dispatch_into_aggregation() {
    init_logger();
    let vehicle = VehicleReadiness::new();
    let data = vec![0x00, 0x00, 0x14, 0x77, 0x00, 0x00, 0x00, 0x00];
    let raw = RawMessage::new(PGN_DM5, ENGINE, data);
    let packet = Packet::decode(&raw).unwrap();
    let readiness: &dyn ReadinessStatus = match &packet {
        Packet::DiagnosticReadiness(p) => p,
        other => panic!("Unexpected packet {other:?}"),
    };
    let changed = vehicle.add_packet(readiness);
    // Every continuously monitored system is supported and not complete
    assert_eq!(changed.len(), 3);
    assert_eq!(vehicle.status_of("Fuel System"), Some(Status::NotComplete));
    assert_eq!(vehicle.status_of("Misfire"), Some(Status::NotComplete));
}

#[test]
fn test_concurrent_reports() {
    init_logger();
    let vehicle = Arc::new(VehicleReadiness::new());
    let packets = vec![engine_dm5(), aftertreatment_dm5(), transmission_dm5()];

    let handles: Vec<_> = packets
        .into_iter()
        .map(|p| {
            let vehicle = vehicle.clone();
            thread::spawn(move || {
                for _ in 0..100 {
                    vehicle.add_packet(&p);
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    // Arrival order does not matter, a single not complete report wins
    assert_eq!(vehicle.status_of("Catalyst"), Some(Status::NotComplete));
    assert_eq!(vehicle.status_of("Misfire"), Some(Status::NotSupported));
}

#[test]
fn test_concurrent_composite() {
    init_logger();
    let composite = Arc::new(CompositeMonitoredSystem::new(
        "EGR/VVT system",
        VEHICLE_ADDRESS,
        0x0480,
    ));
    let handles: Vec<_> = (0u8..8)
        .map(|addr| {
            let composite = composite.clone();
            thread::spawn(move || {
                let status = if addr == 7 { Status::NotComplete } else { Status::Complete };
                composite.add_report(&MonitoredSystem::new("EGR/VVT system", status, addr, 0x0480));
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
    assert_eq!(composite.status(), Status::NotComplete);
    assert_eq!(composite.source_addresses().len(), 8);
}
