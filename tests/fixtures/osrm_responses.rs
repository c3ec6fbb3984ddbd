//! Trimmed OSRM `/route/v1/driving` responses (`geometries=geojson&steps=true`).

/// Bellagio to Caesars Palace, one leg, four steps. The third step has no
/// street name.
pub const BELLAGIO_TO_CAESARS: &str = r#"{
  "code": "Ok",
  "routes": [{
    "distance": 842.3,
    "duration": 121.7,
    "weight": 121.7,
    "weight_name": "routability",
    "geometry": {
      "type": "LineString",
      "coordinates": [
        [-115.1767, 36.1126], [-115.1752, 36.1127], [-115.1736, 36.1131],
        [-115.1728, 36.1147], [-115.1727, 36.1158], [-115.1745, 36.1162]
      ]
    },
    "legs": [{
      "distance": 842.3,
      "duration": 121.7,
      "summary": "Las Vegas Boulevard South",
      "steps": [
        { "name": "Bellagio Drive", "distance": 268.1, "duration": 38.2,
          "maneuver": { "type": "depart", "location": [-115.1767, 36.1126] } },
        { "name": "Las Vegas Boulevard South", "distance": 301.4, "duration": 40.9,
          "maneuver": { "type": "turn", "modifier": "left", "location": [-115.1736, 36.1131] } },
        { "name": "", "distance": 272.8, "duration": 42.6,
          "maneuver": { "type": "turn", "modifier": "left", "location": [-115.1727, 36.1158] } },
        { "name": "", "distance": 0.0, "duration": 0.0,
          "maneuver": { "type": "arrive", "location": [-115.1745, 36.1162] } }
      ]
    }]
  }],
  "waypoints": [
    { "name": "Bellagio Drive", "location": [-115.1767, 36.1126] },
    { "name": "", "location": [-115.1745, 36.1162] }
  ]
}"#;

pub const NO_ROUTE: &str = r#"{
  "code": "NoRoute",
  "message": "Impossible route between points",
  "routes": []
}"#;

/// Claims success but carries no routes.
pub const EMPTY_ROUTES: &str = r#"{ "code": "Ok", "routes": [] }"#;

/// A route collapsed to a single coordinate.
pub const DEGENERATE_GEOMETRY: &str = r#"{
  "code": "Ok",
  "routes": [{
    "distance": 0.0,
    "duration": 0.0,
    "geometry": { "type": "LineString", "coordinates": [[-115.1767, 36.1126]] },
    "legs": []
  }]
}"#;

pub const TOO_BIG: &str = r#"{
  "code": "TooBig",
  "message": "Too many trace coordinates"
}"#;
