pub mod configuration_unit;
pub mod descriptor;
pub mod environment;
pub mod property_source;
pub mod property_sources;
pub mod resource;

pub use configuration_unit::*;
pub use descriptor::*;
pub use environment::*;
pub use property_source::*;
pub use property_sources::*;
pub use resource::*;
