use raychain::*;
use std::error::Error;

pub use serde_json;

/// Reads a JSON array of exactly `D` numbers.
pub fn json_array_to_float_array<const D: usize>(
    json_array: &[serde_json::Value],
) -> Option<[Float; D]> {
    let array: &[serde_json::Value; D] = json_array.try_into().ok()?;

    let mut coords = [0.; D];
    for (coord, value) in coords.iter_mut().zip(array) {
        *coord = value.as_f64()? as Float;
    }
    Some(coords)
}

/// Reads the point stored under `key` in `json`.
pub fn point_field(json: &serde_json::Value, key: &str) -> Result<Point, Box<dyn Error>> {
    let coords = json
        .get(key)
        .and_then(serde_json::Value::as_array)
        .ok_or_else(|| format!("missing {key}"))?;

    json_array_to_float_array(coords)
        .map(Point::from)
        .ok_or_else(|| format!("{key} must be an array of 2 numbers").into())
}

pub fn map_json_array<C: FromIterator<T>, T>(
    json: &serde_json::Value,
    map: impl FnMut(&serde_json::Value) -> Result<T, Box<dyn Error>>,
) -> Result<C, Box<dyn Error>> {
    json.as_array()
        .ok_or("json value must be an array")?
        .iter()
        .map(map)
        .collect()
}

pub trait JsonSer {
    /// Serialize `self` into a JSON value.
    fn to_json(&self) -> serde_json::Value;
}

pub trait JsonDes {
    /// Deserialize from a JSON value.
    ///
    /// Returns an error if `json`'s format or values are invalid.
    fn from_json(json: &serde_json::Value) -> Result<Self, Box<dyn Error>>
    where
        Self: Sized;
}

impl<T: JsonSer> JsonSer for [T] {
    fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Array(Vec::from_iter(self.iter().map(T::to_json)))
    }
}

impl<T: JsonDes> JsonDes for Vec<T> {
    fn from_json(json: &serde_json::Value) -> Result<Self, Box<dyn Error>> {
        map_json_array(json, T::from_json)
    }
}

impl JsonSer for Response {
    fn to_json(&self) -> serde_json::Value {
        match self {
            Response::Reflect => "reflect",
            Response::Absorb => "absorb",
        }
        .into()
    }
}

impl JsonDes for Response {
    fn from_json(json: &serde_json::Value) -> Result<Self, Box<dyn Error>> {
        match json.as_str().ok_or("response must be a string")? {
            "reflect" => Ok(Self::Reflect),
            "absorb" => Ok(Self::Absorb),
            other => Err(format!("invalid response: {other}").into()),
        }
    }
}

impl JsonSer for Mobility {
    fn to_json(&self) -> serde_json::Value {
        match self {
            Mobility::Movable => "movable",
            Mobility::Static => "static",
        }
        .into()
    }
}

impl JsonDes for Mobility {
    fn from_json(json: &serde_json::Value) -> Result<Self, Box<dyn Error>> {
        match json.as_str().ok_or("mobility must be a string")? {
            "movable" => Ok(Self::Movable),
            "static" => Ok(Self::Static),
            other => Err(format!("invalid mobility: {other}").into()),
        }
    }
}

impl JsonSer for Boundary {
    /// The format of the returned object is explained in [`Self::from_json`]
    fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "p1": self.p1().as_slice(),
            "p2": self.p2().as_slice(),
            "response": self.response().to_json(),
            "mobility": self.mobility().to_json(),
        })
    }
}

impl JsonDes for Boundary {
    /// Deserialize a boundary from a JSON object of the following format:
    ///
    /// ```json
    /// {
    ///     "p1": [90, 40],
    ///     "p2": [100, 100], // must differ from "p1"
    ///     "response": "reflect", // or "absorb"
    ///     "mobility": "movable", // or "static"
    /// }
    /// ```
    fn from_json(json: &serde_json::Value) -> Result<Self, Box<dyn Error>> {
        let response = Response::from_json(json.get("response").ok_or("missing response")?)?;
        let mobility = Mobility::from_json(json.get("mobility").ok_or("missing mobility")?)?;

        let boundary = Boundary::try_new(
            point_field(json, "p1")?,
            point_field(json, "p2")?,
            response,
            mobility,
        )?;

        Ok(boundary)
    }
}

impl<const N: usize> JsonSer for BoundarySet<N> {
    fn to_json(&self) -> serde_json::Value {
        self.as_slice().to_json()
    }
}

impl<const N: usize> JsonDes for BoundarySet<N> {
    /// Deserialize an array of boundaries, see [`Boundary::from_json`].
    ///
    /// Fails if there are more than `N` of them.
    fn from_json(json: &serde_json::Value) -> Result<Self, Box<dyn Error>> {
        let boundaries: Vec<Boundary> = Vec::from_json(json)?;

        let mut set = Self::new();
        for boundary in boundaries {
            set.push(boundary)?;
        }
        Ok(set)
    }
}

impl JsonSer for Source {
    fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "origin": self.origin.as_slice(),
            "aim": self.aim.as_slice(),
        })
    }
}

impl JsonDes for Source {
    /// ```json
    /// {
    ///     "origin": [0, 0],
    ///     "aim": [50, 50],
    /// }
    /// ```
    fn from_json(json: &serde_json::Value) -> Result<Self, Box<dyn Error>> {
        Ok(Self::new(
            point_field(json, "origin")?,
            point_field(json, "aim")?,
        ))
    }
}

impl JsonSer for SimulationConfig {
    fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "max_depth": self.max_depth,
            "min_hit_distance_sq": self.min_hit_distance_sq,
            "probe_length": self.probe_length,
            "source_length": self.source_length,
        })
    }
}

impl JsonDes for SimulationConfig {
    /// Every field is optional, missing ones keep their default value.
    /// `probe_length` and `source_length` must be positive.
    ///
    /// ```json
    /// {
    ///     "max_depth": 20,
    ///     "min_hit_distance_sq": 100.0,
    ///     "probe_length": 300.0,
    ///     "source_length": 100.0,
    /// }
    /// ```
    fn from_json(json: &serde_json::Value) -> Result<Self, Box<dyn Error>> {
        if !json.is_object() {
            return Err("config must be an object".into());
        }

        let float = |key: &str, default: Float, positive: bool| -> Result<Float, Box<dyn Error>> {
            json.get(key).map_or(Ok(default), |v| {
                v.as_f64()
                    .filter(|f| f.is_finite() && if positive { *f > 0.0 } else { *f >= 0.0 })
                    .ok_or_else(|| {
                        let bound = if positive { "positive" } else { "non-negative" };
                        format!("{key} must be a {bound} number").into()
                    })
            })
        };

        let default = Self::default();

        let max_depth = match json.get("max_depth") {
            None => default.max_depth,
            Some(v) => {
                let depth = v
                    .as_u64()
                    .ok_or("max_depth must be a non-negative integer")?;
                usize::try_from(depth).map_err(|_| format!("max_depth is too large: {depth}"))?
            }
        };

        Ok(Self {
            max_depth,
            min_hit_distance_sq: float("min_hit_distance_sq", default.min_hit_distance_sq, false)?,
            // a zero length ray can't hit or be reflected
            probe_length: float("probe_length", default.probe_length, true)?,
            source_length: float("source_length", default.source_length, true)?,
        })
    }
}

/// Everything a layout file holds.
#[derive(Clone, Debug, PartialEq)]
pub struct Layout<const N: usize = DEFAULT_CAPACITY> {
    pub boundaries: BoundarySet<N>,
    pub source: Option<Source>,
    pub config: SimulationConfig,
}

pub fn serialize_layout<const N: usize>(layout: &Layout<N>) -> serde_json::Value {
    let mut json = serde_json::json!({
        "boundaries": layout.boundaries.to_json(),
        "config": layout.config.to_json(),
    });

    if let Some(source) = &layout.source {
        json["source"] = source.to_json();
    }

    json
}

/// Deserialize a layout from a JSON object of the following format:
///
/// ```json
/// {
///     "boundaries": [ /* see `Boundary::from_json` */ ],
///     "source": { "origin": [0, 0], "aim": [50, 50] }, // optional
///     "config": { "max_depth": 20 }, // optional, see `SimulationConfig::from_json`
/// }
/// ```
pub fn deserialize_layout<const N: usize>(
    json: &serde_json::Value,
) -> Result<Layout<N>, Box<dyn Error>> {
    let boundaries =
        BoundarySet::from_json(json.get("boundaries").ok_or("boundaries field expected")?)?;

    let source = json.get("source").map(Source::from_json).transpose()?;

    let config = json
        .get("config")
        .map(SimulationConfig::from_json)
        .transpose()?
        .unwrap_or_default();

    log::debug!(
        "loaded layout: {} boundaries, source: {}",
        boundaries.len(),
        if source.is_some() { "yes" } else { "no" },
    );

    Ok(Layout {
        boundaries,
        source,
        config,
    })
}
