pub mod decode;
pub mod error;
pub mod filter;
pub mod inventory;
pub mod numeric;
pub mod precip;
pub mod store;

pub mod prelude {
    pub use crate::decode::bulletin::decode_bulletin;
    pub use crate::decode::{DecoderContext, Modifier, ModifierKind, Observation};
    pub use crate::error::DecodeError;
    pub use crate::filter::Filters;
    pub use crate::inventory::{Station, StationInventory};
    pub use crate::precip::Precipitation;
    pub use crate::store::{ObservationStore, StoredObservation};
}
