// Compiled-in county extra-feature rules.
//
// Pattern rules are tried against both the feature code and its description,
// so they carry a code prefix (`^POL`) and a description phrase (`POOL`) side
// by side. Exact-code rules cover appraiser codes whose text says nothing.

use crate::error::RuleError;
use crate::types::LayoutDescriptor;

use super::builder::{RuleTable, RuleTableBuilder};
use super::rule::RuleDescriptor;

fn rule() -> RuleDescriptor {
    RuleDescriptor::new()
}

fn exterior(space_type: &str, is_finished: bool) -> LayoutDescriptor {
    LayoutDescriptor::exterior(space_type, is_finished)
}

fn interior(space_type: &str) -> LayoutDescriptor {
    LayoutDescriptor::interior(space_type)
}

fn unfinished(space_type: &str) -> LayoutDescriptor {
    LayoutDescriptor {
        is_finished: false,
        ..LayoutDescriptor::interior(space_type)
    }
}

/// The default table: built-in pattern rules followed by built-in exact codes.
pub fn county_rule_table() -> Result<RuleTable, RuleError> {
    let mut builder = RuleTableBuilder::new();
    register_builtin_rules(&mut builder)?;
    Ok(builder.build())
}

pub fn register_builtin_rules(builder: &mut RuleTableBuilder) -> Result<(), RuleError> {
    register_pattern_rules(builder)?;
    register_exact_code_rules(builder);
    Ok(())
}

fn register_pattern_rules(b: &mut RuleTableBuilder) -> Result<(), RuleError> {
    // Water features
    b.pattern_rule(
        "pool",
        // Descriptions like "POOL HEATER" or "POOL ENCLOSURE" name pool accessories,
        // so a bare POOL only counts alone or followed by its shell material.
        &[
            r"^POL(\d|$)",
            r"^POOL$",
            r"SWIM(MING)?\s+POOL",
            r"IN-?\s*GROUND\s+POOL",
            r"\bPOOL\s*[-/,]?\s*(CONC|GUNITE|VINYL|FIBERGLASS)",
        ],
        rule().layout(exterior("Outdoor Pool", true)),
    )?;
    b.pattern_rule(
        "spa",
        &[r"^SPA(\d|\b)", r"HOT\s*TUB", r"JACUZZI", r"WHIRLPOOL"],
        rule().layout(exterior("Hot Tub / Spa Area", true)),
    )?;
    b.pattern_rule(
        "screen_enclosure",
        &[r"^SCR", r"SCREEN(ED)?\s*(ENCL|ROOM|PORCH)", r"POOL\s+(ENCL|CAGE|SCREEN)"],
        rule().layout(exterior("Screened Porch", true)),
    )?;

    // Porches, patios and decks
    b.pattern_rule(
        "open_porch",
        &[r"^OPF", r"^OP\b", r"OPEN\s+PORCH"],
        rule().layout(exterior("Porch", true)),
    )?;
    b.pattern_rule(
        "enclosed_porch",
        &[r"^EPF", r"ENCL(OSED)?\s+PORCH"],
        rule().layout(exterior("Enclosed Porch", true)),
    )?;
    b.pattern_rule(
        "patio",
        &[r"^PAT", r"PATIO"],
        rule().layout(exterior("Patio", true)),
    )?;
    b.pattern_rule(
        "deck",
        &[r"^DCK", r"^DECK", r"WOOD\s+DECK"],
        rule().layout(exterior("Deck", true)),
    )?;
    b.pattern_rule(
        "balcony",
        &[r"^BAL", r"BALCON"],
        rule().layout(exterior("Balcony", true)),
    )?;
    b.pattern_rule(
        "gazebo",
        &[r"GAZEBO", r"^GZB"],
        rule().layout(exterior("Gazebo", true)).accessory("Gazebo"),
    )?;
    b.pattern_rule(
        "pergola",
        &[r"PERGOLA", r"\bARBOR\b"],
        rule().layout(exterior("Pergola", false)),
    )?;
    b.pattern_rule(
        "outdoor_kitchen",
        &[r"OUTDOOR\s+KITCHEN", r"SUMMER\s+KITCHEN", r"^OKT"],
        rule().layout(exterior("Outdoor Kitchen", true)),
    )?;
    b.pattern_rule(
        "canopy",
        &[r"CANOPY", r"AWNING", r"^CNP"],
        rule().accessory("Canopy"),
    )?;

    // Vehicle storage
    b.pattern_rule(
        "attached_garage",
        &[r"^AGR", r"ATT(ACHED)?\.?\s+GAR"],
        rule().layout(unfinished("Attached Garage")),
    )?;
    b.pattern_rule(
        "detached_garage",
        &[r"^DGR", r"DET(ACHED)?\.?\s+GAR"],
        rule()
            .layout(unfinished("Detached Garage"))
            .accessory("Detached Garage"),
    )?;
    b.pattern_rule(
        "carport",
        &[r"^CPT", r"CARPORT"],
        rule().layout(exterior("Carport", false)).accessory("Carport"),
    )?;

    // Outbuildings
    b.pattern_rule(
        "shed",
        &[r"^SHD", r"\bSHED\b", r"STORAGE\s+BLDG", r"UTILITY\s+BLDG"],
        rule().layout(exterior("Shed", false)).accessory("Shed"),
    )?;
    b.pattern_rule(
        "barn",
        &[r"^BRN", r"\bBARN\b", r"\bSTABLES?\b"],
        rule().layout(exterior("Barn", false)).accessory("Barn"),
    )?;
    b.pattern_rule(
        "greenhouse",
        &[r"GREEN\s*HOUSE", r"^GRH"],
        rule().layout(exterior("Greenhouse", true)).accessory("Greenhouse"),
    )?;
    b.pattern_rule(
        "workshop",
        &[r"WORK\s*SHOP", r"^WSH"],
        rule().layout(unfinished("Workshop")).accessory("Workshop"),
    )?;
    b.pattern_rule(
        "guest_house",
        &[r"GUEST\s+(HOUSE|QTRS|QUARTERS)", r"^GHS", r"CABANA"],
        rule().layout(interior("Guest House")).accessory("Guest House"),
    )?;
    b.pattern_rule(
        "pump_house",
        &[r"PUMP\s*HOUSE", r"WELL\s+HOUSE"],
        rule().accessory("Pump House"),
    )?;
    b.pattern_rule(
        "mobile_home",
        &[r"MOBILE\s+HOME", r"^MH\b"],
        rule().accessory("Mobile Home"),
    )?;

    // Waterfront
    b.pattern_rule(
        "boat_dock",
        &[r"^DOC", r"BOAT\s+DOCK", r"WOOD\s+DOCK", r"\bPIER\b"],
        rule().accessory("Boat Dock"),
    )?;
    b.pattern_rule(
        "boat_lift",
        &[r"BOAT\s*LIFT", r"^BLF"],
        rule().accessory("Boat Lift"),
    )?;
    b.pattern_rule(
        "seawall",
        &[r"SEA\s*WALL", r"BULKHEAD", r"^SWL"],
        rule().accessory("Seawall"),
    )?;

    // Site improvements
    b.pattern_rule(
        "fence",
        &[r"^F(N|CL|WD|VN)", r"\bFENC"],
        rule().accessory("Fence"),
    )?;
    b.pattern_rule(
        "fence_chain_link",
        &[r"^FCL", r"CHAIN\s*LINK"],
        rule().structure("fencing_type", "ChainLink"),
    )?;
    b.pattern_rule(
        "fence_wood",
        &[r"^FWD", r"WOOD\s+FENC", r"FENCE.*\bWOOD\b"],
        rule().structure("fencing_type", "Wood"),
    )?;
    b.pattern_rule(
        "fence_vinyl",
        &[r"^FVN", r"VINYL\s+FENC", r"FENCE.*\bVINYL\b"],
        rule().structure("fencing_type", "Vinyl"),
    )?;
    b.pattern_rule(
        "wall",
        &[r"MASONRY\s+WALL", r"RETAINING\s+WALL", r"^MWL"],
        rule().accessory("Wall"),
    )?;
    b.pattern_rule(
        "driveway",
        &[r"DRIVE\s*WAY", r"^DRV"],
        rule().accessory("Driveway"),
    )?;
    b.pattern_rule(
        "paving",
        &[r"ASPHALT", r"PAVING", r"^PAV"],
        rule().accessory("Paved Area"),
    )?;
    b.pattern_rule(
        "sport_court",
        &[r"TENNIS", r"BASKETBALL", r"SPORT\s+COURT", r"^TNC"],
        rule().accessory("Sport Court"),
    )?;
    b.pattern_rule(
        "light_pole",
        &[r"LIGHT\s*(POLE|FIXTURE|STANDARD)", r"^LTP"],
        rule().accessory("Light Pole"),
    )?;
    b.pattern_rule(
        "loading_dock",
        &[r"LOADING\s+(DOCK|PLATFORM)", r"^LDK"],
        rule().accessory("Loading Dock"),
    )?;

    // Building systems
    b.pattern_rule(
        "elevator",
        &[r"^ELV", r"ELEVATOR", r"CHAIR\s*LIFT"],
        rule().smart_feature("Elevator"),
    )?;
    b.pattern_rule(
        "fire_sprinkler",
        &[r"FIRE\s+(SPRINKLER|SUPPRESSION)", r"^FSP"],
        rule().smart_feature("Fire Sprinkler System"),
    )?;
    b.pattern_rule(
        "irrigation",
        &[r"IRRIGATION", r"LAWN\s+SPRINKLER", r"^IRR"],
        rule().smart_feature("Irrigation System"),
    )?;
    b.pattern_rule(
        "fire_alarm",
        &[r"FIRE\s+ALARM", r"^FAL"],
        rule().smart_feature("Fire Alarm System"),
    )?;
    b.pattern_rule(
        "security",
        &[r"SECURITY", r"BURGLAR\s+ALARM", r"^SEC(\d|$)"],
        rule().smart_feature("Security System"),
    )?;
    b.pattern_rule(
        "solar",
        &[r"SOLAR", r"^SOL(\d|$)", r"PHOTO\s*VOLTAIC", r"\bPV\b"],
        rule()
            .smart_feature("Solar Panels")
            .utility("solar_panel_present", true)
            .utility("solar_panel_type", "Photovoltaic"),
    )?;
    // Must stay after "solar": overrides the panel type for thermal systems.
    b.pattern_rule(
        "solar_thermal",
        &[r"SOLAR\s+(WATER|HEAT|HTR)"],
        rule()
            .utility("solar_panel_type", "SolarThermal")
            .utility("water_heater_type", "Solar"),
    )?;
    b.pattern_rule(
        "generator",
        &[r"GENERATOR", r"^GEN\b"],
        rule().smart_feature("Backup Generator"),
    )?;
    b.pattern_rule(
        "central_air",
        &[r"CENTRAL\s+(A/?C|AIR)", r"^CAC"],
        rule()
            .utility("cooling_system_type", "CentralAir")
            .utility("hvac_system_configuration", "SplitSystem"),
    )?;
    b.pattern_rule(
        "window_ac",
        &[r"WINDOW\s+(A/?C|UNIT)", r"WALL\s+A/?C", r"^WAC"],
        rule().utility("cooling_system_type", "WindowAirConditioner"),
    )?;
    b.pattern_rule(
        "heat_pump",
        &[r"HEAT\s*PUMP", r"^HTP"],
        rule().utility("heating_system_type", "HeatPump"),
    )?;
    b.pattern_rule(
        "well",
        &[r"\bWELL\b", r"^WEL(\d|$)"],
        rule().utility("water_source_type", "Well"),
    )?;
    b.pattern_rule(
        "septic",
        &[r"SEPTIC", r"^SEP(\d|$)"],
        rule().utility("sewer_type", "Septic"),
    )?;

    // Interior features
    b.pattern_rule(
        "fireplace",
        &[r"FIRE\s*PLACE", r"^FPL", r"^FP\d"],
        rule().structure("fireplace_present", true),
    )?;
    b.pattern_rule(
        "wood_stove",
        &[r"WOOD\s*STOVE", r"^WST"],
        rule()
            .structure("fireplace_present", true)
            .structure("fireplace_type", "WoodStove"),
    )?;
    b.pattern_rule(
        "wet_bar",
        &[r"WET\s*BAR", r"^WBR"],
        rule().layout(interior("Bar Area")),
    )?;
    b.pattern_rule(
        "sauna",
        &[r"SAUNA", r"STEAM\s+ROOM"],
        rule().layout(interior("Sauna")),
    )?;
    b.pattern_rule(
        "wine_cellar",
        &[r"WINE\s+(CELLAR|ROOM)"],
        rule().layout(interior("Wine Cellar")),
    )?;
    b.pattern_rule(
        "finished_basement",
        &[r"FIN(ISHED)?\.?\s+(BSMT|BASEMENT)", r"^BSF"],
        rule()
            .layout(interior("Basement"))
            .structure("foundation_type", "Basement"),
    )?;
    b.pattern_rule(
        "unfinished_basement",
        &[r"UNF(INISHED)?\.?\s+(BSMT|BASEMENT)", r"^BSU"],
        rule()
            .layout(unfinished("Basement"))
            .structure("foundation_type", "Basement"),
    )?;
    b.pattern_rule(
        "finished_attic",
        &[r"FIN(ISHED)?\.?\s+ATTIC", r"^ATF"],
        rule().layout(interior("Attic")),
    )?;
    b.pattern_rule(
        "storm_shutters",
        &[r"(STORM|HURRICANE)\s+SHUTTER", r"^SHT"],
        rule().structure("storm_shutter_present", true),
    )?;

    Ok(())
}

fn register_exact_code_rules(b: &mut RuleTableBuilder) {
    // Pool and spa shells by construction
    b.exact_code_rule(
        &["PLCV", "PLCN", "PLFG"],
        rule().layout(exterior("Outdoor Pool", true)),
    );
    b.exact_code_rule(&["SPCV", "SPCN"], rule().layout(exterior("Hot Tub / Spa Area", true)));
    b.exact_code_rule(
        &["SC1", "SC2", "SC3", "ENC1"],
        rule().layout(exterior("Screened Porch", true)),
    );

    // Porch, patio and deck grades
    b.exact_code_rule(&["OPP", "OP1", "OP2"], rule().layout(exterior("Porch", true)));
    b.exact_code_rule(&["PT1", "PT2", "PTC"], rule().layout(exterior("Patio", true)));
    b.exact_code_rule(&["CDK", "WDK"], rule().layout(exterior("Deck", true)));
    b.exact_code_rule(&["SUN", "SRM"], rule().layout(interior("Sunroom")));

    // Garages and outbuildings
    b.exact_code_rule(&["AG1", "AG2"], rule().layout(unfinished("Attached Garage")));
    b.exact_code_rule(
        &["DG1", "DG2"],
        rule()
            .layout(unfinished("Detached Garage"))
            .accessory("Detached Garage"),
    );
    b.exact_code_rule(
        &["CR1", "CR2"],
        rule().layout(exterior("Carport", false)).accessory("Carport"),
    );
    b.exact_code_rule(
        &["SH1", "SH2", "UB1"],
        rule().layout(exterior("Shed", false)).accessory("Shed"),
    );
    b.exact_code_rule(
        &["BN1", "BN2", "PBN"],
        rule().layout(exterior("Barn", false)).accessory("Barn"),
    );
    b.exact_code_rule(
        &["GH1"],
        rule().layout(interior("Guest House")).accessory("Guest House"),
    );

    // Waterfront
    b.exact_code_rule(&["BH1", "BH2"], rule().accessory("Boat House"));
    b.exact_code_rule(&["BL1", "BL2"], rule().accessory("Boat Lift"));
    b.exact_code_rule(&["SW1", "SW2"], rule().accessory("Seawall"));

    // Site
    b.exact_code_rule(&["TC1", "TC2"], rule().accessory("Sport Court"));
    b.exact_code_rule(&["ASP", "CONC", "CNC"], rule().accessory("Paved Area"));

    // Systems
    b.exact_code_rule(&["EL1", "EL2", "ELC"], rule().smart_feature("Elevator"));
    b.exact_code_rule(&["FS1", "FS2"], rule().smart_feature("Fire Sprinkler System"));
    b.exact_code_rule(&["GN1", "GN2"], rule().smart_feature("Backup Generator"));
    b.exact_code_rule(
        &["PV1", "PV2"],
        rule()
            .smart_feature("Solar Panels")
            .utility("solar_panel_present", true)
            .utility("solar_panel_type", "Photovoltaic"),
    );
    b.exact_code_rule(&["WL1", "WL2"], rule().utility("water_source_type", "Well"));
    b.exact_code_rule(&["ST1", "ST2"], rule().utility("sewer_type", "Septic"));

    // Fireplaces
    b.exact_code_rule(
        &["FPM"],
        rule()
            .structure("fireplace_present", true)
            .structure("fireplace_type", "Masonry"),
    );
    b.exact_code_rule(
        &["FP", "FPP"],
        rule()
            .structure("fireplace_present", true)
            .structure("fireplace_type", "Prefabricated"),
    );
    b.exact_code_rule(&["WB1"], rule().layout(interior("Bar Area")));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::rule::RuleKind;

    #[test]
    fn test_builtin_table_compiles() {
        let table = county_rule_table().unwrap();
        assert!(table.len() > 70);
        assert!(table.rules().iter().all(|r| !r.matchers.is_empty()));
        assert!(table.rules().iter().all(|r| !r.descriptor.is_empty()));
    }

    #[test]
    fn test_builtin_families_are_ordered() {
        let table = county_rule_table().unwrap();
        let first_exact = table
            .rules()
            .iter()
            .position(|r| r.kind == RuleKind::ExactCode)
            .unwrap();
        assert!(table.rules()[first_exact..]
            .iter()
            .all(|r| r.kind == RuleKind::ExactCode));
        assert_eq!(table.rules()[0].label, "pool");
    }

    #[test]
    fn test_builtin_fingerprint_is_stable() {
        let a = county_rule_table().unwrap().fingerprint();
        let b = county_rule_table().unwrap().fingerprint();
        assert_eq!(a, b);
    }
}
