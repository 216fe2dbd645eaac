// Hardcoded initial snapshots loaded when the dashboard mounts

use super::entity::{MapLocation, Position, SafetyStatus, TimeAgo, TouristRecord};

/// Initial map snapshot (four tourists across the north-east)
pub fn map_locations() -> Vec<MapLocation> {
    [
        ("1", "John Doe", 26.1445, 91.7362, SafetyStatus::Safe, 2),
        ("2", "Jane Smith", 25.5788, 91.8933, SafetyStatus::Safe, 5),
        ("3", "Mike Johnson", 24.6637, 93.9063, SafetyStatus::Distress, 15),
        ("4", "Sarah Wilson", 27.0844, 88.2663, SafetyStatus::Safe, 8),
    ]
    .into_iter()
    .map(|(id, name, lat, lng, status, minutes)| MapLocation {
        id: id.to_string(),
        name: name.to_string(),
        position: Position { lat, lng },
        status,
        last_update: TimeAgo::short(minutes),
    })
    .collect()
}

/// Initial list snapshot (six tourists, one in distress)
pub fn tourist_records() -> Vec<TouristRecord> {
    [
        (
            "TST-001",
            "John Doe",
            "A12345678",
            2,
            SafetyStatus::Safe,
            "Tawang Monastery",
            "+91-9876543210",
        ),
        (
            "TST-002",
            "Jane Smith",
            "B87654321",
            5,
            SafetyStatus::Safe,
            "Sela Pass",
            "+91-9876543211",
        ),
        (
            "TST-003",
            "Mike Johnson",
            "C11223344",
            15,
            SafetyStatus::Distress,
            "Bumla Pass",
            "+91-9876543212",
        ),
        (
            "TST-004",
            "Sarah Wilson",
            "D55667788",
            1,
            SafetyStatus::Safe,
            "Madhuri Lake",
            "+91-9876543213",
        ),
        (
            "TST-005",
            "David Brown",
            "E99887766",
            8,
            SafetyStatus::Safe,
            "Nuranang Falls",
            "+91-9876543214",
        ),
        (
            "TST-006",
            "Lisa Garcia",
            "F44556677",
            3,
            SafetyStatus::Safe,
            "Jaswantgarh",
            "+91-9876543215",
        ),
    ]
    .into_iter()
    .map(
        |(id, full_name, passport, minutes, status, location, contact)| TouristRecord {
            id: id.to_string(),
            full_name: full_name.to_string(),
            passport_number: passport.to_string(),
            last_seen: TimeAgo::long(minutes),
            status,
            location: location.to_string(),
            emergency_contact: contact.to_string(),
        },
    )
    .collect()
}
