//! JSON request and response model.
//!
//! A request lists containers under `box` and item kinds under `item`. Each
//! item kind is expanded into `count` units named `name-1`, `name-2`, ...;
//! a container with a `count` above one is expanded the same way.

use crate::allocator::SequentialAllocator;
use crate::boundary::{Container, DEFAULT_MAX_WEIGHT};
use crate::geometry::{Item, OrientationConstraint, Shape, DEFAULT_LOAD_BEAR, DEFAULT_WEIGHT};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use stowage_core::result::PackingResult;
use stowage_core::solver::PackingConfig;
use stowage_core::{Error, Result};

fn default_count() -> usize {
    1
}

/// Zero counts as unset for numeric fields that fall back to a default.
fn nonzero_or(value: Option<f64>, default: f64) -> f64 {
    value.filter(|v| *v != 0.0).unwrap_or(default)
}

/// A packing request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PackRequest {
    /// Containers in the order they are filled.
    #[serde(rename = "box", default)]
    pub containers: Vec<ContainerSpec>,

    /// Item kinds.
    #[serde(rename = "item", default)]
    pub items: Vec<ItemSpec>,

    /// Packing options.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<OptionsSpec>,
}

/// Container entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContainerSpec {
    /// Container name.
    pub name: String,

    /// Dimensions [width, height, depth].
    #[serde(rename = "WHD")]
    pub whd: [f64; 3],

    /// Weight capacity. Absent or zero means the default capacity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,

    /// Clearance kept free along every wall.
    #[serde(rename = "coner", alias = "corner", default)]
    pub corner: f64,

    /// Number of identical containers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

/// Item kind entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemSpec {
    /// Base name of the units.
    pub name: String,

    /// Dimensions [width, height, depth].
    #[serde(rename = "WHD")]
    pub whd: [f64; 3],

    /// Number of units.
    #[serde(default = "default_count")]
    pub count: usize,

    /// Weight of one unit. Absent or zero means the default weight.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,

    /// Maximum weight that may rest on one unit. Absent or zero means unlimited.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loadbear: Option<f64>,

    /// Whether the unit may be laid over (`1`/`true`) or must stay upright.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updown: Option<Flag>,

    /// Shape: `1` or `"cube"` for a box, anything else for a cylinder.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ShapeCode>,

    /// Presentation tag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// A boolean accepted as `true`/`false` or as a number.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Flag {
    /// JSON boolean.
    Bool(bool),
    /// Non-zero is true.
    Int(i64),
}

impl Flag {
    /// Returns the truth value.
    pub fn is_set(self) -> bool {
        match self {
            Flag::Bool(b) => b,
            Flag::Int(i) => i != 0,
        }
    }
}

/// Shape given either as a numeric code or by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ShapeCode {
    /// `1` is a box.
    Code(i64),
    /// `"cube"` or `"box"` is a box.
    Name(String),
}

impl ShapeCode {
    /// Maps the code onto a shape.
    pub fn shape(&self) -> Shape {
        match self {
            ShapeCode::Code(1) => Shape::Cuboid,
            ShapeCode::Name(name)
                if name.eq_ignore_ascii_case("cube") || name.eq_ignore_ascii_case("box") =>
            {
                Shape::Cuboid
            }
            _ => Shape::Cylinder,
        }
    }
}

/// Option overrides. Unset fields keep their defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OptionsSpec {
    /// Try larger items first.
    #[serde(default, alias = "biggerFirst")]
    pub bigger_first: Option<bool>,

    /// Spread identical items across containers.
    #[serde(default, alias = "distributeItems")]
    pub distribute_items: Option<bool>,

    /// Floor-up extreme points with projection.
    #[serde(default, alias = "fixPoint")]
    pub fix_point: Option<bool>,

    /// Enforce support and load-bearing limits.
    #[serde(default, alias = "checkStable")]
    pub check_stable: Option<bool>,

    /// Minimum supported fraction of a raised item's base.
    #[serde(default, alias = "supportSurfaceRatio")]
    pub support_surface_ratio: Option<f64>,

    /// Rounding precision.
    #[serde(default, alias = "decimalPrecision", alias = "number_of_decimals")]
    pub decimal_precision: Option<u32>,
}

impl OptionsSpec {
    /// Applies the overrides to the default configuration.
    pub fn to_config(&self) -> PackingConfig {
        let mut config = PackingConfig::default();

        if let Some(v) = self.bigger_first {
            config.bigger_first = v;
        }
        if let Some(v) = self.distribute_items {
            config.distribute_items = v;
        }
        if let Some(v) = self.fix_point {
            config.fix_point = v;
        }
        if let Some(v) = self.check_stable {
            config.check_stable = v;
        }
        if let Some(v) = self.support_surface_ratio {
            config.support_surface_ratio = v;
        }
        if let Some(v) = self.decimal_precision {
            config.decimal_precision = v;
        }

        config
    }
}

impl ContainerSpec {
    /// Expands the entry into containers.
    pub fn expand(&self) -> Vec<Container> {
        let build = |name: String| {
            Container::new(name, self.whd[0], self.whd[1], self.whd[2])
                .with_max_weight(nonzero_or(self.weight, DEFAULT_MAX_WEIGHT))
                .with_corner(self.corner)
        };

        match self.count {
            Some(n) if n > 1 => (1..=n)
                .map(|i| build(format!("{}-{}", self.name, i)))
                .collect(),
            _ => vec![build(self.name.clone())],
        }
    }
}

impl ItemSpec {
    /// Returns the orientation rule for the units.
    pub fn orientation(&self) -> OrientationConstraint {
        match self.updown {
            Some(flag) if !flag.is_set() => OrientationConstraint::Upright,
            _ => OrientationConstraint::Any,
        }
    }

    /// Returns the shape of the units.
    pub fn shape(&self) -> Shape {
        self.kind.as_ref().map(ShapeCode::shape).unwrap_or_default()
    }

    /// Expands the entry into `count` units.
    pub fn expand(&self) -> Vec<Item> {
        (1..=self.count)
            .map(|i| {
                let item = Item::new(
                    format!("{}-{}", self.name, i),
                    self.whd[0],
                    self.whd[1],
                    self.whd[2],
                )
                .with_shape(self.shape())
                .with_weight(nonzero_or(self.weight, DEFAULT_WEIGHT))
                .with_load_bear(nonzero_or(self.loadbear, DEFAULT_LOAD_BEAR))
                .with_orientation(self.orientation());

                match &self.color {
                    Some(color) => item.with_color(color.clone()),
                    None => item,
                }
            })
            .collect()
    }
}

impl PackRequest {
    /// Parses a request from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Serializes the request to JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Returns the effective configuration.
    pub fn config(&self) -> PackingConfig {
        self.options
            .as_ref()
            .map(OptionsSpec::to_config)
            .unwrap_or_default()
    }

    /// Checks the request shape before expansion.
    pub fn validate(&self) -> Result<()> {
        if self.containers.is_empty() || self.items.is_empty() {
            return Err(Error::InvalidInput(
                "Missing container or item data".into(),
            ));
        }

        if let Some(spec) = self.items.iter().find(|s| s.name.is_empty()) {
            return Err(Error::InvalidItem(format!(
                "Item kind with dimensions {:?} has no name",
                spec.whd
            )));
        }

        if let Some(spec) = self.items.iter().find(|s| s.count == 0) {
            return Err(Error::InvalidInput(format!(
                "Count of item '{}' must be positive",
                spec.name
            )));
        }

        if let Some(spec) = self.containers.iter().find(|s| s.count == Some(0)) {
            return Err(Error::InvalidInput(format!(
                "Count of container '{}' must be positive",
                spec.name
            )));
        }

        self.config().validate()
    }

    /// Expands every container entry in order.
    pub fn containers(&self) -> Vec<Container> {
        self.containers.iter().flat_map(ContainerSpec::expand).collect()
    }

    /// Expands every item entry in order.
    pub fn items(&self) -> Vec<Item> {
        self.items.iter().flat_map(ItemSpec::expand).collect()
    }

    /// Validates, expands and allocates the request.
    pub fn run(&self) -> Result<PackingResult> {
        self.validate()?;
        SequentialAllocator::new(self.config()).allocate(&self.containers(), self.items())
    }
}

/// Response envelope. Failed runs carry only `success` and `message`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackResponse {
    /// Whether the run completed.
    pub success: bool,

    /// Status or error message.
    pub message: String,

    /// Packing outcome of a completed run.
    #[serde(flatten)]
    pub result: Option<PackingResult>,
}

impl PackResponse {
    /// Creates a success response.
    pub fn completed(result: PackingResult) -> Self {
        Self {
            success: true,
            message: "Calculation completed".into(),
            result: Some(result),
        }
    }

    /// Creates an error response.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            result: None,
        }
    }

    /// Serializes the response to JSON.
    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        };
        json.map_err(|e| Error::Serialization(e.to_string()))
    }
}

/// Runs a request; failures are reported in the response.
pub fn pack_request(request: &PackRequest) -> PackResponse {
    match request.run() {
        Ok(result) => PackResponse::completed(result),
        Err(Error::InvalidInput(message)) => PackResponse::error(message),
        Err(e) => PackResponse::error(format!("Packing calculation error: {}", e)),
    }
}

/// Runs a JSON request and returns the JSON response.
///
/// Malformed requests produce an error response. Only a failure to
/// serialize the response itself is returned as `Err`.
pub fn pack_json(json: &str) -> Result<String> {
    let response = match PackRequest::from_json(json) {
        Ok(request) => pack_request(&request),
        Err(e) => PackResponse::error(format!("Invalid request: {}", e)),
    };
    response.to_json(false)
}

/// Runs independent requests in parallel. Responses keep request order.
pub fn pack_batch(requests: &[PackRequest]) -> Vec<PackResponse> {
    requests.par_iter().map(pack_request).collect()
}
