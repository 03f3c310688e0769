// 🚗 Vehicle Records
// Land vehicles carry {doors, wheels}, aircraft carry {maxAltitude, range}.

use super::TypedRecord;
use crate::dispatch::{
    require_f64, require_i32, require_i64, require_string, require_u32, FieldPair, Key, Shape,
};
use crate::error::DispatchError;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fmt;

// Second spelling is the one the legacy vehicle forms post
const ID: Key = Key::new("id");
const MODEL: Key = Key::aliased("model", &["modelo"]);
const YEAR_BUILT: Key = Key::aliased("yearBuilt", &["anoFab"]);
const MAX_SPEED: Key = Key::aliased("maxSpeed", &["velMax"]);
const DOORS: Key = Key::aliased("doors", &["cantPue"]);
const WHEELS: Key = Key::aliased("wheels", &["cantRue"]);
const MAX_ALTITUDE: Key = Key::aliased("maxAltitude", &["altMax"]);
const RANGE: Key = Key::aliased("range", &["autonomia"]);

const PAIRS: [FieldPair; 2] = [
    FieldPair::new("land", DOORS, WHEELS),
    FieldPair::new("air", MAX_ALTITUDE, RANGE),
];

// ============================================================================
// VEHICLE KIND
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum VehicleKind {
    Base,
    Land { doors: u32, wheels: u32 },
    Air { max_altitude: f64, range: f64 },
}

impl VehicleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleKind::Base => "base",
            VehicleKind::Land { .. } => "land",
            VehicleKind::Air { .. } => "air",
        }
    }
}

// ============================================================================
// VEHICLE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: i64,
    pub model: String,
    pub year_built: i32,
    pub max_speed: f64,
    pub kind: VehicleKind,
}

impl Vehicle {
    pub fn new(id: i64, model: impl Into<String>, year_built: i32, max_speed: f64) -> Self {
        Vehicle {
            id,
            model: model.into(),
            year_built,
            max_speed,
            kind: VehicleKind::Base,
        }
    }

    pub fn land(mut self, doors: u32, wheels: u32) -> Self {
        self.kind = VehicleKind::Land { doors, wheels };
        self
    }

    pub fn air(mut self, max_altitude: f64, range: f64) -> Self {
        self.kind = VehicleKind::Air {
            max_altitude,
            range,
        };
        self
    }

    pub fn is_land(&self) -> bool {
        matches!(self.kind, VehicleKind::Land { .. })
    }

    pub fn is_air(&self) -> bool {
        matches!(self.kind, VehicleKind::Air { .. })
    }
}

impl TypedRecord for Vehicle {
    const FAMILY: &'static str = "vehicle";

    fn field_pairs() -> &'static [FieldPair] {
        &PAIRS
    }

    fn build(fields: &Map<String, Value>, shape: Shape) -> Result<Self, DispatchError> {
        let vehicle = Vehicle::new(
            require_i64(fields, ID)?,
            require_string(fields, MODEL)?,
            require_i32(fields, YEAR_BUILT)?,
            require_f64(fields, MAX_SPEED)?,
        );

        match shape {
            Shape::Base => Ok(vehicle),
            Shape::Variant(0) => Ok(vehicle.land(require_u32(fields, DOORS)?, require_u32(fields, WHEELS)?)),
            Shape::Variant(1) => Ok(vehicle.air(require_f64(fields, MAX_ALTITUDE)?, require_f64(fields, RANGE)?)),
            other => Err(DispatchError::unbuildable(Self::FAMILY, other)),
        }
    }

    fn to_fields(&self) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert(ID.name.to_string(), json!(self.id));
        fields.insert(MODEL.name.to_string(), json!(self.model));
        fields.insert(YEAR_BUILT.name.to_string(), json!(self.year_built));
        fields.insert(MAX_SPEED.name.to_string(), json!(self.max_speed));

        match &self.kind {
            VehicleKind::Base => {}
            VehicleKind::Land { doors, wheels } => {
                fields.insert(DOORS.name.to_string(), json!(doors));
                fields.insert(WHEELS.name.to_string(), json!(wheels));
            }
            VehicleKind::Air {
                max_altitude,
                range,
            } => {
                fields.insert(MAX_ALTITUDE.name.to_string(), json!(max_altitude));
                fields.insert(RANGE.name.to_string(), json!(range));
            }
        }

        fields
    }

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn kind(&self) -> &'static str {
        self.kind.as_str()
    }
}

impl fmt::Display for Vehicle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} {} ({}) max {} km/h",
            self.id, self.model, self.year_built, self.max_speed
        )?;

        match &self.kind {
            VehicleKind::Base => Ok(()),
            VehicleKind::Land { doors, wheels } => write!(f, " | {} doors, {} wheels", doors, wheels),
            VehicleKind::Air {
                max_altitude,
                range,
            } => write!(f, " | ceiling {} m, range {} km", max_altitude, range),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
