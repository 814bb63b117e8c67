use crate::foundation::core::BezPath;
use crate::foundation::error::{StudioError, StudioResult};
use crate::shirt::ShirtModel;

/// Width and height of the coordinate space the outlines are drawn in.
pub const GARMENT_VIEWBOX: (f64, f64) = (200.0, 240.0);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewSide {
    #[default]
    Front,
    Back,
}

impl ViewSide {
    pub fn flipped(self) -> Self {
        match self {
            ViewSide::Front => ViewSide::Back,
            ViewSide::Back => ViewSide::Front,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ViewSide::Front => "Frente",
            ViewSide::Back => "Atrás",
        }
    }
}

/// SVG path data for one garment silhouette.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GarmentOutline {
    pub body: &'static str,
    pub neck: &'static str,
    pub sleeves: &'static str,
    pub details: &'static str,
}

impl GarmentOutline {
    pub fn for_model(model: ShirtModel, side: ViewSide) -> Self {
        match (model, side) {
            (ShirtModel::Classic, ViewSide::Front) => Self {
                body: "M60 30 L140 30 L160 50 L160 200 L40 200 L40 50 Z",
                neck: "M80 30 L80 45 Q100 55 120 45 L120 30",
                sleeves: "M40 50 L20 70 L25 120 L40 110 Z M160 50 L180 70 L175 120 L160 110 Z",
                details: "M40 50 L160 50 M60 200 L140 200",
            },
            (ShirtModel::Fitted, ViewSide::Front) => Self {
                body: "M70 30 L130 30 L145 50 L140 200 L60 200 L55 50 Z",
                neck: "M85 30 L85 45 Q100 55 115 45 L115 30",
                sleeves: "M55 50 L35 65 L40 110 L55 105 Z M145 50 L165 65 L160 110 L145 105 Z",
                details: "M55 50 L145 50 M70 200 L130 200",
            },
            (ShirtModel::Oversized, ViewSide::Front) => Self {
                body: "M50 30 L150 30 L175 50 L175 210 L25 210 L25 50 Z",
                neck: "M75 30 L75 45 Q100 55 125 45 L125 30",
                sleeves: "M25 50 L5 75 L10 130 L25 120 Z M175 50 L195 75 L190 130 L175 120 Z",
                details: "M25 50 L175 50 M50 210 L150 210",
            },
            (ShirtModel::Classic, ViewSide::Back) => Self {
                body: "M60 30 L140 30 L160 50 L160 200 L40 200 L40 50 Z",
                neck: "M80 30 Q100 25 120 30",
                sleeves: "M40 50 L20 70 L25 120 L40 110 Z M160 50 L180 70 L175 120 L160 110 Z",
                details: "M40 50 L160 50 M60 200 L140 200 M100 30 L100 200",
            },
            (ShirtModel::Fitted, ViewSide::Back) => Self {
                body: "M70 30 L130 30 L145 50 L140 200 L60 200 L55 50 Z",
                neck: "M85 30 Q100 25 115 30",
                sleeves: "M55 50 L35 65 L40 110 L55 105 Z M145 50 L165 65 L160 110 L145 105 Z",
                details: "M55 50 L145 50 M70 200 L130 200 M100 30 L100 200",
            },
            (ShirtModel::Oversized, ViewSide::Back) => Self {
                body: "M50 30 L150 30 L175 50 L175 210 L25 210 L25 50 Z",
                neck: "M75 30 Q100 25 125 30",
                sleeves: "M25 50 L5 75 L10 130 L25 120 Z M175 50 L195 75 L190 130 L175 120 Z",
                details: "M25 50 L175 50 M50 210 L150 210 M100 30 L100 210",
            },
        }
    }

    /// Parsed body silhouette, for hit-testing and bounds.
    pub fn body_path(&self) -> StudioResult<BezPath> {
        BezPath::from_svg(self.body)
            .map_err(|e| StudioError::render(format!("invalid garment path: {e}")))
    }
}
