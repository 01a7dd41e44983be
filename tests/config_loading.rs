//! Loading fort profiles and population tables from JSON files.

use palisade::generation::utils::create_rng;
use palisade::{
    FortMaker, FortProfile, IntRange, PalisadeError, PalisadeResult, PopulationResolver,
    PopulationTables, Zone,
};
use std::io::Write;
use tempfile::NamedTempFile;

fn write_temp(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(contents.as_bytes()).expect("write temp file");
    file
}

#[test]
fn test_partial_profile_fills_defaults() -> PalisadeResult<()> {
    let file = write_temp(
        r#"{
            "faction": "Mopango",
            "wall_blueprint": "StoneWall",
            "zone_table": "Camp",
            "layout": { "room_count": { "min": 2, "max": 2 } }
        }"#,
    );

    let profile = FortProfile::load(file.path())?;
    assert_eq!(profile.faction, "Mopango");
    assert_eq!(profile.wall_blueprint, "StoneWall");
    assert_eq!(profile.layout.room_count, IntRange::new(2, 2));
    assert_eq!(profile.layout.room_width, IntRange::new(9, 40));
    assert_eq!(profile.layout.door_attempts, 1000);
    Ok(())
}

#[test]
fn test_profile_round_trips_through_file() -> PalisadeResult<()> {
    let robots = FortProfile::robots();
    let file = write_temp(&serde_json::to_string_pretty(&robots)?);

    assert_eq!(FortProfile::load(file.path())?, robots);
    Ok(())
}

#[test]
fn test_invalid_profiles_are_rejected() {
    let inverted = write_temp(r#"{ "layout": { "room_height": { "min": 9, "max": 3 } } }"#);
    assert!(matches!(
        FortProfile::load(inverted.path()),
        Err(PalisadeError::InvalidConfig(_))
    ));

    let bad_chance = write_temp(r#"{ "defenses": { "power_chance": -0.1 } }"#);
    assert!(matches!(
        FortProfile::load(bad_chance.path()),
        Err(PalisadeError::InvalidConfig(_))
    ));

    let malformed = write_temp("{ not json");
    assert!(matches!(
        FortProfile::load(malformed.path()),
        Err(PalisadeError::Serde(_))
    ));

    assert!(matches!(
        FortProfile::load("/nonexistent/palisade/profile.json"),
        Err(PalisadeError::Io(_))
    ));
}

#[test]
fn test_custom_tables_drive_population() -> PalisadeResult<()> {
    let file = write_temp(
        r#"{
            "tables": {
                "Camp": {
                    "rolls": { "min": 3, "max": 3 },
                    "entries": [
                        { "blueprint": "Tent", "hint": "Inside" },
                        { "blueprint": "@Guards", "weight": 0 }
                    ]
                },
                "Guards": {
                    "entries": [ { "blueprint": "Joppa Guard" } ]
                }
            }
        }"#,
    );

    let tables = PopulationTables::load(file.path())?;
    let results = tables.generate("Camp", "zonetier", "1", &mut create_rng(0));
    assert_eq!(results.len(), 3);
    assert!(results.iter().all(|r| r.blueprint == "Tent" && r.hint == "Inside"));

    let mut profile = FortProfile::for_testing();
    profile.zone_table = "Camp".to_string();
    let maker = FortMaker::with_resolver(profile, tables);
    let mut zone = Zone::standard(1);
    let layout = maker.build(&mut zone, &mut create_rng(4))?;

    assert_eq!(layout.population, 3);
    assert_eq!(zone.count_blueprint("Tent"), 3);
    Ok(())
}
