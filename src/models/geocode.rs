use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GeocodeQuery {
    #[schema(example = "Jl. Sudirman No. 5, Senayan, Jakarta Selatan, 12190")]
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GeocodeResponse {
    pub latitude: f64,
    pub longitude: f64,
    pub formatted: String,
    /// The address variant that produced the match.
    pub matched_query: String,
    /// Whether a coarser variant had to be used.
    pub approximate: bool,
}
